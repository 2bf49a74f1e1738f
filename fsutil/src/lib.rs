use std::{
    fs::{self, ReadDir},
    io,
    path::{Path, PathBuf},
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("{0} (from='{1}', to='{2}'): {3}")]
        FromToIO(Msg, PathBuf, PathBuf, #[source] io::Error),

        #[error("Invalid glob pattern '{0}': {1}")]
        InvalidGlob(String, #[source] ::glob::PatternError),
    }
}
pub use error::{Error, Result};

#[must_use]
pub fn read(filepath: impl AsRef<Path>) -> Result<Vec<u8>> {
    fs::read(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn remove_file(filepath: impl AsRef<Path>) -> Result<()> {
    fs::remove_file(&filepath)
        .map_err(|e| Error::SingleIO("Cannot remove file", filepath.as_ref().to_owned(), e))
}

/// Returns `Ok(false)` when there was nothing to remove.
#[must_use]
pub fn remove_file_if_exists(filepath: impl AsRef<Path>) -> Result<bool> {
    match fs::remove_file(&filepath) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::SingleIO(
            "Cannot remove file",
            filepath.as_ref().to_owned(),
            e,
        )),
    }
}

/// Move a file, replacing the destination if it already exists.
#[must_use]
pub fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    // Windows refuses to rename onto an existing file.
    if cfg!(windows) {
        self::remove_file_if_exists(to)?;
    }
    fs::rename(from, to)
        .map_err(|e| Error::FromToIO("Cannot rename file", from.to_owned(), to.to_owned(), e))
}

#[must_use]
pub fn read_dir(dir: impl AsRef<Path>) -> Result<ReadDir> {
    fs::read_dir(&dir).map_err(|e| Error::SingleIO("Cannot read dir", dir.as_ref().to_owned(), e))
}

/// Regular files directly under `dir` whose name matches `filename_pattern`, sorted by path.
pub fn find_files_matching(
    dir: impl AsRef<Path>,
    filename_pattern: &str,
) -> Result<Vec<PathBuf>> {
    let pattern = ::glob::Pattern::new(filename_pattern)
        .map_err(|e| Error::InvalidGlob(filename_pattern.to_owned(), e))?;

    let mut found = Vec::new();
    for entry in self::read_dir(&dir)?.filter_map(std::result::Result::ok) {
        let Ok(file_type) = entry.file_type() else {
            continue
        };
        if file_type.is_dir() {
            continue;
        }
        let filename = entry.file_name();
        if pattern.matches(filename.to_string_lossy().as_ref()) {
            found.push(entry.path());
        }
    }
    found.sort();
    log::debug!(
        "{} file(s) matched '{}' in {:?}",
        found.len(),
        filename_pattern,
        dir.as_ref()
    );
    Ok(found)
}

/// Escape glob metacharacters so `s` matches only itself.
pub fn escape_glob(s: &str) -> String {
    ::glob::Pattern::escape(s)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn remove_file_if_exists_reports_whether_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "x").unwrap();

        assert_eq!(remove_file_if_exists(&path).unwrap(), true);
        assert_eq!(remove_file_if_exists(&path).unwrap(), false);
        assert!(!path.exists());
    }

    #[test]
    fn rename_overwrites_destination() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("from.txt");
        let to = dir.path().join("to.txt");
        fs::write(&from, "new").unwrap();
        fs::write(&to, "old").unwrap();

        rename(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "new");
    }

    #[test]
    fn find_files_matching_skips_dirs_and_other_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("error1.txt"), "").unwrap();
        fs::write(dir.path().join("error12.txt"), "").unwrap();
        fs::write(dir.path().join("input1.txt"), "").unwrap();
        fs::create_dir(dir.path().join("error3.txt")).unwrap();

        let found = find_files_matching(dir.path(), "error[0-9]*.txt").unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("error1.txt"), dir.path().join("error12.txt")]
        );
    }

    #[test]
    fn escaped_glob_matches_literally() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("[x]1.txt"), "").unwrap();
        fs::write(dir.path().join("x1.txt"), "").unwrap();

        let pattern = format!("{}[0-9]*.txt", escape_glob("[x]"));
        let found = find_files_matching(dir.path(), &pattern).unwrap();
        assert_eq!(found, vec![dir.path().join("[x]1.txt")]);
    }

    #[test]
    fn error_message_carries_path() {
        let err = read("/definitely/not/here.txt").unwrap_err();
        assert!(err.to_string().starts_with("Cannot read file (/definitely/not/here.txt)"));
    }
}
