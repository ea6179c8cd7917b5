/// Binary/text classification from a file's leading bytes.
///
/// This is a byte-class heuristic, not a format detector: a file is binary
/// iff its first [`SAMPLE_LEN`] bytes contain at least one byte outside the
/// text set. The text set is every byte from 0x20 to 0xFF except DEL (0x7F),
/// plus BEL, BS, TAB, LF, FF, CR and ESC. Latin-1 high bytes count as text,
/// so box-drawing characters and old Mac line endings stay text.
///
/// Anything that cannot be read as a regular file is classified text. Read
/// failures are only visible through `debug` logging.
use crate::model::{Classification, FileVerdict};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Number of leading bytes inspected per file.
pub const SAMPLE_LEN: usize = 1024;

/// `true` if `byte` belongs to the text byte set.
#[inline]
pub fn is_text_byte(byte: u8) -> bool {
    matches!(byte, 0x07 | 0x08 | 0x09 | 0x0A | 0x0C | 0x0D | 0x1B) || (byte >= 0x20 && byte != 0x7F)
}

/// `true` if the sample contains any non-text byte. An empty sample is text.
pub fn is_binary_sample(sample: &[u8]) -> bool {
    sample.iter().any(|&b| !is_text_byte(b))
}

/// Classify a single path.
pub fn classify(path: &Path) -> Classification {
    classify_file(path).classification
}

/// Size of the file in bytes, or 0 if it cannot be stat-ed.
pub fn size_of(path: &Path) -> u64 {
    match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(err) => {
            debug!("Cannot stat {}: {err}", path.display());
            0
        }
    }
}

/// Classify a file and measure its size from one open handle.
///
/// Never fails: unreadable files and non-regular paths come back as
/// [`Classification::Text`].
pub fn classify_file(path: &Path) -> FileVerdict {
    match read_verdict(path) {
        Ok(verdict) => verdict,
        Err(err) => {
            debug!("Treating {} as text: {err}", path.display());
            FileVerdict {
                classification: Classification::Text,
                size: size_of(path),
            }
        }
    }
}

fn read_verdict(path: &Path) -> io::Result<FileVerdict> {
    // Stat before opening: opening a FIFO for reading would block.
    if !fs::metadata(path)?.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }

    let file = File::open(path)?;
    let size = file.metadata()?.len();

    let mut sample = Vec::with_capacity(SAMPLE_LEN);
    file.take(SAMPLE_LEN as u64).read_to_end(&mut sample)?;

    let classification = if is_binary_sample(&sample) {
        Classification::Binary
    } else {
        Classification::Text
    };

    Ok(FileVerdict {
        classification,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_text_byte_boundaries() {
        let controls = [0x07, 0x08, 0x09, 0x0A, 0x0C, 0x0D, 0x1B];
        for byte in 0u8..=0xFF {
            let expected = controls.contains(&byte) || (byte >= 0x20 && byte != 0x7F);
            assert_eq!(is_text_byte(byte), expected, "byte {byte:#04x}");
        }
        // Edges that are easy to get wrong.
        assert!(!is_text_byte(0x0B)); // VT
        assert!(!is_text_byte(0x1F));
        assert!(is_text_byte(0x20));
        assert!(!is_text_byte(0x7F));
        assert!(is_text_byte(0x80));
        assert!(is_text_byte(0xFF));
    }

    #[test]
    fn test_empty_sample_is_text() {
        assert!(!is_binary_sample(&[]));
    }

    #[test]
    fn test_empty_file_is_text() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty", b"");
        let verdict = classify_file(&path);
        assert_eq!(verdict.classification, Classification::Text);
        assert_eq!(verdict.size, 0);
    }

    #[test]
    fn test_nul_and_del_are_binary() {
        let dir = TempDir::new().unwrap();
        let nul = write(&dir, "nul", b"abc\0def");
        let del = write(&dir, "del", b"abc\x7fdef");
        assert_eq!(classify(&nul), Classification::Binary);
        assert_eq!(classify(&del), Classification::Binary);
    }

    #[test]
    fn test_mac_line_endings_and_latin1_are_text() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "old.txt", b"line one\rline two\r\xc4\xcd\xcd\xbf\x1b[0m");
        assert_eq!(classify(&path), Classification::Text);
    }

    #[test]
    fn test_only_first_kilobyte_is_sampled() {
        let dir = TempDir::new().unwrap();
        let mut bytes = vec![b'a'; SAMPLE_LEN];
        bytes.push(0x00);
        let path = write(&dir, "late_nul", &bytes);
        let verdict = classify_file(&path);
        assert_eq!(verdict.classification, Classification::Text);
        assert_eq!(verdict.size, SAMPLE_LEN as u64 + 1);

        let mut bytes = vec![b'a'; SAMPLE_LEN - 1];
        bytes.push(0x00);
        let path = write(&dir, "edge_nul", &bytes);
        assert_eq!(classify(&path), Classification::Binary);
    }

    #[test]
    fn test_missing_path_and_directory_are_text() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            classify(&dir.path().join("does-not-exist")),
            Classification::Text
        );
        assert_eq!(classify(dir.path()), Classification::Text);
        assert_eq!(size_of(&dir.path().join("does-not-exist")), 0);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "b.dat", &[0x78, 0x03, 0xFF, 0x00, 0x64]);
        let first = classify_file(&path);
        let second = classify_file(&path);
        assert_eq!(first, second);
        assert_eq!(first.classification, Classification::Binary);
        assert_eq!(first.size, 5);
    }
}
