//! Location of the step configuration directory.
//!
//! The base path is `$STEPPATH` when set, otherwise `<home>/.step`. The home
//! directory is `$HOME` when set, otherwise the platform user profile.

use crate::context::Context;
use directories::BaseDirs;
use std::{
    env, fs, io,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;

/// Overrides the base configuration path.
pub const PATH_ENV: &str = "STEPPATH";

/// Overrides the user home directory.
pub const HOME_ENV: &str = "HOME";

const DEFAULT_DIR: &str = ".step";
const CONTEXTS_FILE: &str = "contexts.json";
const CURRENT_CONTEXT_FILE: &str = "current-context.json";

pub type PathResult<T> = Result<T, PathError>;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("error obtaining home directory, please define environment variable HOME")]
    MissingHome,
    #[error("file '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("error inspecting {}: {source}", .path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolved home and base directories, computed once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPath {
    home: PathBuf,
    base: PathBuf,
}

impl StepPath {
    /// Resolves the paths from the process environment.
    pub fn from_env() -> PathResult<Self> {
        Self::resolve(
            |key| env::var(key).ok(),
            || BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
        )
    }

    /// Resolves the paths using `lookup` for environment variables and
    /// `platform_home` as the fallback home directory.
    pub fn resolve<E, H>(lookup: E, platform_home: H) -> PathResult<Self>
    where
        E: Fn(&str) -> Option<String>,
        H: FnOnce() -> Option<PathBuf>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let home = match non_empty(HOME_ENV) {
            Some(home) => PathBuf::from(home),
            None => platform_home()
                .filter(|home| !home.as_os_str().is_empty())
                .ok_or(PathError::MissingHome)?,
        };

        let base = match non_empty(PATH_ENV) {
            Some(base) => PathBuf::from(base),
            None => home.join(DEFAULT_DIR),
        };

        Ok(Self {
            home: clean(&home),
            base: clean(&base),
        })
    }

    /// Builds paths rooted at an explicit base directory.
    pub fn with_base(home: impl AsRef<Path>, base: impl AsRef<Path>) -> Self {
        Self {
            home: clean(home.as_ref()),
            base: clean(base.as_ref()),
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn contexts_file(&self) -> PathBuf {
        self.base.join(CONTEXTS_FILE)
    }

    pub fn current_context_file(&self) -> PathBuf {
        self.base.join(CURRENT_CONTEXT_FILE)
    }

    /// Flat defaults file used when contexts are not in use.
    pub fn legacy_defaults_file(&self) -> PathBuf {
        self.base.join("config").join("defaults.json")
    }

    pub fn authority_path(&self, authority: &str) -> PathBuf {
        self.base.join("authorities").join(authority)
    }

    pub fn profile_path(&self, profile: &str) -> PathBuf {
        self.base.join("profiles").join(profile)
    }

    /// Authority directory of `current`, or the base path without a context.
    pub fn path(&self, current: Option<&Context>) -> PathBuf {
        match current {
            Some(ctx) => self.authority_path(&ctx.authority),
            None => self.base.clone(),
        }
    }

    /// Profile directory of `current`, or the base path without a context.
    pub fn profile_base(&self, current: Option<&Context>) -> PathBuf {
        match current {
            Some(ctx) => self.profile_path(&ctx.profile),
            None => self.base.clone(),
        }
    }

    /// Expands `path` the way the step tools interpret user supplied paths.
    ///
    /// Absolute paths are returned unchanged, `~/` is relative to the home
    /// directory, `./` and `../` are relative to the working directory and
    /// anything else is relative to [`StepPath::path`].
    pub fn abs(&self, path: impl AsRef<Path>, current: Option<&Context>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            return path.to_path_buf();
        }

        let slashed = path.to_string_lossy().replace('\\', "/");
        if let Some(rest) = slashed.strip_prefix("~/") {
            return clean(&self.home.join(rest));
        }

        if slashed.starts_with("./") || slashed.starts_with("../") {
            return match env::current_dir() {
                Ok(cwd) => clean(&cwd.join(path)),
                Err(_) => path.to_path_buf(),
            };
        }

        clean(&self.path(current).join(path))
    }

    /// Creates the base directory if missing.
    ///
    /// Creation failures are tolerated since some sandboxed environments do
    /// not allow it; an existing non-directory is an error.
    pub fn ensure_base_dir(&self) -> PathResult<()> {
        match fs::metadata(&self.base) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(PathError::NotADirectory(self.base.clone())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if let Err(err) = create_private_dir(&self.base) {
                    tracing::debug!(path = %self.base.display(), %err, "could not create base directory");
                }
                Ok(())
            }
            Err(source) => Err(PathError::Inspect {
                path: self.base.clone(),
                source,
            }),
        }
    }
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Lexically normalizes `path`: drops `.` segments, folds `..` into the
/// preceding segment and strips trailing separators.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }

    out
}
