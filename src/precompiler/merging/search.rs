//! Include resolution against an ordered list of search directories

use super::include::IncludeDirective;
use crate::precompiler::error::MergeError;
use std::path::{Component, Path, PathBuf};

/// Ordered include search directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    dirs: Vec<PathBuf>,
}

/// An include directive mapped to an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInclude {
    pub directive: IncludeDirective,
    /// Absolute, lexically normalised path of the header
    pub path: PathBuf,
}

impl SearchPaths {
    /// Use `dirs` as given. Relative entries resolve against the process
    /// working directory at lookup time.
    pub fn new<P: Into<PathBuf>>(dirs: impl IntoIterator<Item = P>) -> Self {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Make every relative entry absolute against `base`.
    pub fn with_base<P: Into<PathBuf>>(dirs: impl IntoIterator<Item = P>, base: &Path) -> Self {
        Self {
            dirs: dirs
                .into_iter()
                .map(|dir| absolutize(&dir.into(), base))
                .collect(),
        }
    }

    /// Make every relative entry absolute against the current working directory.
    pub fn from_cwd<P: Into<PathBuf>>(dirs: impl IntoIterator<Item = P>) -> Result<Self, MergeError> {
        let cwd = std::env::current_dir().map_err(MergeError::WorkingDirectory)?;
        Ok(Self::with_base(dirs, &cwd))
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Probe for the file named by `directive`.
    ///
    /// An absolute target is taken as is when it exists. Otherwise each
    /// search directory is tried in order and the first existing file wins.
    /// `None` means the header lives outside the resolvable tree.
    pub fn resolve(&self, directive: &IncludeDirective) -> Option<ResolvedInclude> {
        let target = Path::new(&directive.target);
        let found = if target.is_absolute() {
            Some(target.to_path_buf()).filter(|path| path.is_file())
        } else {
            self.dirs
                .iter()
                .map(|dir| dir.join(target))
                .find(|candidate| candidate.is_file())
        }?;

        let path = match std::env::current_dir() {
            Ok(cwd) => absolutize(&found, &cwd),
            Err(_) => normalize(&found),
        };
        Some(ResolvedInclude {
            directive: directive.clone(),
            path,
        })
    }
}

/// Join `path` onto `base` unless it is already absolute, then normalise.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Remove `.` and `..` components without touching the file system.
///
/// Symlinks are not resolved, so `a/link/../b` becomes `a/b`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(Component::ParentDir),
            },
            other => normalized.push(other),
        }
    }
    normalized
}
