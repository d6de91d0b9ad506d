//! Filesystem helpers for putting finished files in place.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Copy `src` to `dst` through a sibling `.part` file.
///
/// `dst` is only ever replaced by a complete file. Parent directories are
/// created as needed.
pub fn place_file(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    let part = partial_path(dst);
    tracing::debug!(src = ?src.display(), part = ?part.display(), "staging copy");

    if let Err(e) = fs::copy(src, &part).and_then(|_| fs::rename(&part, dst)) {
        let _ = fs::remove_file(&part);
        return Err(e);
    }

    Ok(())
}

/// `<dst>.part`
pub fn partial_path(dst: &Path) -> PathBuf {
    let mut name = dst.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dst.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_is_sibling() {
        assert_eq!(
            partial_path(Path::new("/out/clip.mp4")),
            PathBuf::from("/out/clip.mp4.part")
        );
    }

    #[test]
    fn places_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("nested/deeper/dst.bin");
        fs::write(&src, b"payload").unwrap();

        place_file(&src, &dst).unwrap();

        assert_eq!(fs::read(&dst).unwrap(), b"payload");
        assert!(src.exists());
        assert!(!partial_path(&dst).exists());
    }

    #[test]
    fn replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("new.txt");
        let dst = dir.path().join("old.txt");
        fs::write(&src, b"new").unwrap();
        fs::write(&dst, b"old").unwrap();

        place_file(&src, &dst).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn missing_source_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("dst.txt");

        assert!(place_file(&dir.path().join("absent"), &dst).is_err());
        assert!(!dst.exists());
        assert!(!partial_path(&dst).exists());
    }
}
