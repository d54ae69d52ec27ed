//! Inline image attachments
//!
//! Images are sent to multimodal models as standard base64 strings inside
//! the request body.

use crate::errors::{NinoError, Result};
use crate::logging::Logger;
use base64::Engine;
use std::fs;
use std::path::Path;

/// Read each file and base64-encode it, failing on the first unreadable one
pub fn encode_images<P: AsRef<Path>>(paths: &[P], log: &Logger) -> Result<Vec<String>> {
    if paths.is_empty() {
        return Ok(Vec::new());
    }

    let _timer = log.timer(format!("encode {} image(s)", paths.len()));

    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let data = fs::read(path).map_err(|e| {
                log.error(format_args!("Error reading image file '{}': {}", path.display(), e));
                NinoError::file(path, e)
            })?;
            log.debug(format_args!("Encoded '{}' ({} bytes)", path.display(), data.len()));
            Ok(base64::engine::general_purpose::STANDARD.encode(data))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_images() {
        let paths: Vec<&str> = Vec::new();
        assert!(encode_images(&paths, &Logger::disabled()).unwrap().is_empty());
    }

    #[test]
    fn test_encodes_in_order() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("a.png");
        let second = temp.path().join("b.png");
        fs::write(&first, b"hello").unwrap();
        fs::write(&second, [0u8, 255, 16]).unwrap();

        let encoded = encode_images(&[&first, &second], &Logger::disabled()).unwrap();
        assert_eq!(encoded, vec!["aGVsbG8=".to_string(), "AP8Q".to_string()]);
    }

    #[test]
    fn test_missing_file_names_path() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("ok.jpg");
        let missing = temp.path().join("missing.jpg");
        fs::write(&good, b"x").unwrap();

        let err = encode_images(&[&good, &missing], &Logger::disabled()).unwrap_err();
        assert!(matches!(err, NinoError::File { .. }));
        assert!(err.to_string().contains("missing.jpg"));
    }
}
