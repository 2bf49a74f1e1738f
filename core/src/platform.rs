use std::path::{Component, Path, PathBuf};

/// OS-dependent details the engine needs. Paths are joined with [`Path::join`], which already
/// picks the right separator; subprocess redirection lives in [`crate::testing::ProcessRunner`].
pub trait Platform: Send + Sync {
    /// Appended to the default artifact name.
    fn executable_suffix(&self) -> &'static str;

    /// Path handed to the OS to start `artifact`.
    /// A bare file name would be looked up in `PATH`, so it gets anchored to the current dir.
    fn invocation_path(&self, artifact: &Path) -> PathBuf {
        match artifact.components().next() {
            Some(Component::Normal(_)) if artifact.parent() == Some(Path::new("")) => {
                Path::new(".").join(artifact)
            }
            _ => artifact.to_owned(),
        }
    }

    fn delete_file(&self, path: &Path) -> fsutil::Result<()> {
        fsutil::remove_file(path)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Posix;

#[derive(Debug, Clone, Copy, Default)]
pub struct Windows;

impl Platform for Posix {
    fn executable_suffix(&self) -> &'static str {
        ".out"
    }
}

impl Platform for Windows {
    fn executable_suffix(&self) -> &'static str {
        ".exe"
    }
}

#[cfg(windows)]
static HOST: Windows = Windows;

#[cfg(not(windows))]
static HOST: Posix = Posix;

/// The platform this binary was built for.
pub fn host() -> &'static dyn Platform {
    &HOST
}
