use super::error::{ContextError, ContextResult};
use super::{ContextMap, StoredCurrent};
use crate::path::StepPath;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Reads `contexts.json`; a missing file yields an empty map.
///
/// Every entry must carry an authority and a profile.
pub fn load_map(paths: &StepPath) -> ContextResult<ContextMap> {
    let path = paths.contexts_file();
    let Some(contents) = read_optional(&path)? else {
        return Ok(ContextMap::new());
    };

    let mut contexts: ContextMap = parse(&path, &contents)?;
    for (name, ctx) in contexts.iter_mut() {
        ctx.name = name.clone();
        ctx.validate().map_err(|source| ContextError::Invalid {
            name: name.clone(),
            path: path.clone(),
            source: Box::new(source),
        })?;
    }

    tracing::debug!(path = %path.display(), count = contexts.len(), "loaded context map");
    Ok(contexts)
}

/// Reads `current-context.json`; a missing file yields `None`.
pub fn load_current(paths: &StepPath) -> ContextResult<Option<String>> {
    let path = paths.current_context_file();
    let Some(contents) = read_optional(&path)? else {
        return Ok(None);
    };

    let stored: StoredCurrent = parse(&path, &contents)?;
    Ok(Some(stored.context))
}

pub fn write_map(paths: &StepPath, contexts: &ContextMap) -> ContextResult<()> {
    let data = serde_json::to_string_pretty(contexts)?;
    write(&paths.contexts_file(), data.as_bytes(), 0o600)
}

pub fn write_current(paths: &StepPath, name: &str) -> ContextResult<()> {
    let data = serde_json::to_string(&StoredCurrent {
        context: name.to_owned(),
    })?;
    write(&paths.current_context_file(), data.as_bytes(), 0o644)
}

fn read_optional(path: &Path) -> ContextResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ContextError::ReadFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, contents: &str) -> ContextResult<T> {
    serde_json::from_str(contents).map_err(|source| ContextError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, data: &[u8], mode: u32) -> ContextResult<()> {
    let write_error = |source| ContextError::WriteFile {
        path: PathBuf::from(path),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    write_with_mode(path, data, mode).map_err(write_error)?;
    tracing::debug!(path = %path.display(), "wrote context state");
    Ok(())
}

#[cfg(unix)]
fn write_with_mode(path: &Path, data: &[u8], mode: u32) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)?;
    file.write_all(data)
}

#[cfg(not(unix))]
fn write_with_mode(path: &Path, data: &[u8], _mode: u32) -> io::Result<()> {
    fs::write(path, data)
}
