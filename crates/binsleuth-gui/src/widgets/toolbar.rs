/// Top action bar: path field, folder picker, scan controls and theme toggle.
use crate::state::AppState;
use crate::theme;
use egui::Ui;

/// Draw the toolbar.
pub fn toolbar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("🔍 BinSleuth")
                .size(18.0)
                .strong()
                .color(ui.visuals().hyperlink_color),
        );

        ui.separator();

        let scanning = state.phase.is_scanning();

        // Path field; red while the last submitted path is not a directory.
        let text_color = if state.path_invalid {
            theme::INVALID_PATH
        } else {
            ui.visuals().text_color()
        };
        let field_width = (ui.available_width() - 350.0).max(160.0);
        let field = ui.add_enabled(
            !scanning,
            egui::TextEdit::singleline(&mut state.path_input)
                .hint_text("Directory to analyse")
                .text_color(text_color)
                .desired_width(field_width),
        );
        if field.changed() {
            state.path_invalid = false;
        }
        let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if state.path_invalid {
            field.on_hover_text("Not a directory");
        }

        let scan_btn = ui.add_enabled(
            !scanning,
            egui::Button::new("▶ Scan").min_size(egui::vec2(70.0, 28.0)),
        );
        if submitted || scan_btn.clicked() {
            state.submit_path_input();
        }

        let browse_btn = ui
            .add_enabled(
                !scanning,
                egui::Button::new("📂 Browse").min_size(egui::vec2(80.0, 28.0)),
            )
            .on_hover_text("Select root directory");
        if browse_btn.clicked() {
            let mut dialog = rfd::FileDialog::new().set_title("Select root directory");
            if let Some(start) = state.browse_start_dir() {
                dialog = dialog.set_directory(start);
            }
            if let Some(dir) = dialog.pick_folder() {
                state.scan_picked_dir(dir);
            }
        }

        let stop_btn = ui.add_enabled(
            scanning,
            egui::Button::new("⏹ Stop").min_size(egui::vec2(70.0, 28.0)),
        );
        if stop_btn.clicked() {
            state.cancel_scan();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("ℹ").on_hover_text("About BinSleuth").clicked() {
                state.show_about = true;
            }

            let theme_label = if state.dark_mode { "☀" } else { "🌙" };
            let theme_tip = if state.dark_mode {
                "Switch to light mode"
            } else {
                "Switch to dark mode"
            };
            if ui.button(theme_label).on_hover_text(theme_tip).clicked() {
                state.dark_mode = !state.dark_mode;
            }

            let log_tip = if state.show_log {
                "Hide the progress log"
            } else {
                "Show the progress log"
            };
            if ui
                .selectable_label(state.show_log, "📜 Log")
                .on_hover_text(log_tip)
                .clicked()
            {
                state.show_log = !state.show_log;
            }
        });
    });
}
