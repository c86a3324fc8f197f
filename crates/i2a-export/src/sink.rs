use std::path::Path;

use crate::error::ExportError;

/// Write serialized bytes to `target`, replacing any existing file.
///
/// The parent directory must already exist.
///
/// # Errors
/// Returns [`ExportError::Io`] naming `target` if the write fails.
///
/// # Example
/// ```no_run
/// use i2a_export::sink::write_output;
/// use std::path::Path;
/// write_output(Path::new("out.txt"), b"@@\n").unwrap();
/// ```
pub fn write_output(target: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(target, bytes).map_err(|source| ExportError::Io {
        target: target.to_path_buf(),
        source,
    })?;
    log::info!("Écrit : {} ({} octets)", target.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.txt");
        write_output(&path, b"first").unwrap();
        write_output(&path, b"@ \n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"@ \n");
    }

    #[test]
    fn missing_directory_names_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("art.html");
        let err = write_output(&path, b"x").unwrap_err();
        assert!(matches!(err, ExportError::Io { ref target, .. } if *target == path));
        assert!(err.to_string().contains("art.html"));
    }
}
