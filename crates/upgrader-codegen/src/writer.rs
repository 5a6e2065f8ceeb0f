//! Writing generated output without leaving partial files behind

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use tracing::info;

use crate::error::CodegenResult;

/// Write `contents` to `dir/file_name` via a temporary file and rename.
///
/// On any error the previous file, if present, is left untouched. An existing
/// file keeps its permissions; a new one gets the mode `fs::write` would give.
pub fn write_atomically(dir: &Path, file_name: &str, contents: &str) -> CodegenResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let target = dir.join(file_name);

    let mut tmp = temp_file_builder().tempfile_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    if let Some(permissions) = existing_permissions(&target)? {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| e.error)?;

    info!(path = %target.display(), bytes = contents.len(), "Wrote generated file");
    Ok(target)
}

fn temp_file_builder() -> Builder<'static, 'static> {
    let mut builder = Builder::new();
    builder.prefix(".upgrader");
    // Created with 0o666 and narrowed by the process umask, like fs::write
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
}

fn existing_permissions(path: &Path) -> CodegenResult<Option<fs::Permissions>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Check whether `path` already holds exactly `contents`
pub fn is_up_to_date(path: &Path, contents: &str) -> CodegenResult<bool> {
    match fs::read_to_string(path) {
        Ok(existing) => Ok(existing == contents),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_atomically(dir.path(), "out.cpp", "first").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        write_atomically(dir.path(), "out.cpp", "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");

        // No temporary files are left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("jit").join("mobile");
        let path = write_atomically(&nested, "out.cpp", "x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_up_to_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.cpp");
        assert!(!is_up_to_date(&path, "x").unwrap());

        fs::write(&path, "x").unwrap();
        assert!(is_up_to_date(&path, "x").unwrap());
        assert!(!is_up_to_date(&path, "y").unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_mode_matches_fs_write() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.cpp");
        fs::write(&plain, "x").unwrap();
        let path = write_atomically(dir.path(), "upgrader_mobile.cpp", "x").unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = write_atomically(dir.path(), "upgrader_mobile.cpp", "first").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_atomically(dir.path(), "upgrader_mobile.cpp", "second").unwrap();
        assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o644);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        write_atomically(dir.path(), "upgrader_mobile.cpp", "third").unwrap();
        assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o640);
        assert_eq!(fs::read_to_string(&path).unwrap(), "third");
    }
}
