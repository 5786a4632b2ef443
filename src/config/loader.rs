use super::{ConfigError, ConfigMap, ConfigResult, ConfigValue};
use crate::{
    context::{Context, ContextState},
    path::StepPath,
};
use serde_json::{Map, Value};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Keys that would alias the context selection flags.
pub const BANNED_KEYS: [&str; 3] = ["context", "profile", "authority"];

/// Defaults resolved for one command invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    pub values: ConfigMap,
    /// Banned keys removed after merging, one entry per key.
    pub stripped: Vec<String>,
    /// Files that contributed, lowest precedence first.
    pub sources: Vec<PathBuf>,
}

/// Loads the defaults that apply to a command.
///
/// With a context, the authority defaults are read first and the profile
/// defaults override them. Without one, the flat `config/defaults.json`
/// under the base path is used unless contexts are enabled.
#[derive(Debug)]
pub struct ConfigLoader<'a> {
    paths: &'a StepPath,
    enabled: bool,
    legacy_file: Option<PathBuf>,
    context_command: bool,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(paths: &'a StepPath) -> Self {
        Self {
            paths,
            enabled: false,
            legacy_file: None,
            context_command: false,
        }
    }

    /// Loader configured from the state's enablement.
    pub fn for_state(state: &'a ContextState) -> Self {
        Self::new(state.paths()).contexts_enabled(state.enabled())
    }

    pub fn contexts_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Replaces the flat defaults location.
    pub fn with_legacy_file(mut self, path: Option<PathBuf>) -> Self {
        self.legacy_file = path;
        self
    }

    /// Marks the command as one that manages contexts, which must keep
    /// working while no context is selected.
    pub fn context_command(mut self, yes: bool) -> Self {
        self.context_command = yes;
        self
    }

    pub fn load(&self, current: Option<&Context>) -> ConfigResult<ResolvedConfig> {
        let mut resolved = ResolvedConfig::default();
        let mut banned = Vec::new();

        match current {
            Some(ctx) => self.load_context(ctx, &mut resolved, &mut banned)?,
            None if self.enabled => {
                if !self.context_command {
                    return Err(ConfigError::ContextRequired {
                        contexts_file: self.paths.contexts_file(),
                    });
                }
                tracing::debug!("no context selected, skipping defaults");
            }
            None => {
                let path = self
                    .legacy_file
                    .clone()
                    .unwrap_or_else(|| self.paths.legacy_defaults_file());
                if let Some(values) = read_defaults(&path, &mut banned)? {
                    resolved.values = values;
                    resolved.sources.push(path);
                }
            }
        }

        strip_banned(&mut resolved, &banned);
        Ok(resolved)
    }

    fn load_context(
        &self,
        ctx: &Context,
        resolved: &mut ResolvedConfig,
        banned: &mut Vec<String>,
    ) -> ConfigResult<()> {
        ctx.validate().map_err(|source| ConfigError::InvalidContext {
            name: ctx.name.clone(),
            source,
        })?;

        let authority_file = ctx.defaults_file(self.paths);
        let Some(values) = read_defaults(&authority_file, banned)? else {
            return Err(ConfigError::MissingAuthority {
                path: authority_file,
            });
        };
        resolved.values = values;
        resolved.sources.push(authority_file);

        let profile_file = ctx.profile_defaults_file(self.paths);
        if let Some(values) = read_defaults(&profile_file, banned)? {
            resolved.values.extend(values);
            resolved.sources.push(profile_file);
        }

        Ok(())
    }
}

/// Warns once for every banned key seen in any file, whatever its value.
fn strip_banned(resolved: &mut ResolvedConfig, seen: &[String]) {
    for key in BANNED_KEYS {
        let removed = resolved.values.remove(key).is_some();
        if removed || seen.iter().any(|k| k == key) {
            tracing::warn!("cannot set '{key}' attribute in config files");
            resolved.stripped.push(key.to_owned());
        }
    }
}

/// Reads a flat defaults object, `None` when the file does not exist.
///
/// Banned keys are left out of the map and pushed onto `banned`.
fn read_defaults(path: &Path, banned: &mut Vec<String>) -> ConfigResult<Option<ConfigMap>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let raw: Map<String, Value> =
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut values = ConfigMap::new();
    for (key, value) in raw {
        if BANNED_KEYS.contains(&key.as_str()) {
            banned.push(key);
            continue;
        }
        match ConfigValue::from_json(value) {
            Some(value) => {
                values.insert(key, value);
            }
            None => tracing::warn!(
                file = %path.display(),
                "ignoring '{key}': only strings, numbers, booleans and lists can set a flag"
            ),
        }
    }

    tracing::debug!(file = %path.display(), keys = values.len(), "loaded defaults");
    Ok(Some(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextError;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        paths: StepPath,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let paths = StepPath::with_base(temp.path(), temp.path().join(".step"));
            Self { _temp: temp, paths }
        }

        fn write(&self, path: PathBuf, contents: &str) {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
    }

    fn ctx() -> Context {
        Context::new("dev", "alice", "dev-ca")
    }

    #[test]
    fn profile_overrides_authority() {
        let fx = Fixture::new();
        let ctx = ctx();
        fx.write(
            ctx.defaults_file(&fx.paths),
            r#"{"ca-url": "X", "fingerprint": "A"}"#,
        );
        fx.write(ctx.profile_defaults_file(&fx.paths), r#"{"fingerprint": "B"}"#);

        let resolved = ConfigLoader::new(&fx.paths)
            .contexts_enabled(true)
            .load(Some(&ctx))
            .unwrap();

        assert_eq!(resolved.values["fingerprint"], ConfigValue::from("B"));
        assert_eq!(resolved.values["ca-url"], ConfigValue::from("X"));
        assert_eq!(resolved.sources.len(), 2);
    }

    #[test]
    fn missing_profile_file_is_tolerated() {
        let fx = Fixture::new();
        let ctx = ctx();
        fx.write(ctx.defaults_file(&fx.paths), r#"{"ca-url": "X"}"#);

        let resolved = ConfigLoader::new(&fx.paths).load(Some(&ctx)).unwrap();
        assert_eq!(resolved.values.len(), 1);
    }

    #[test]
    fn missing_authority_file_fails() {
        let fx = Fixture::new();
        let ctx = ctx();
        fx.write(ctx.profile_defaults_file(&fx.paths), r#"{"fingerprint": "B"}"#);

        let err = ConfigLoader::new(&fx.paths).load(Some(&ctx)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingAuthority { .. }));
    }

    #[test]
    fn incomplete_context_reads_nothing() {
        let fx = Fixture::new();
        let ctx = Context::new("bad", "p", "");
        fx.write(ctx.defaults_file(&fx.paths), r#"{"ca-url": "leak"}"#);

        let err = ConfigLoader::new(&fx.paths).load(Some(&ctx)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidContext {
                source: ContextError::EmptyAuthority,
                ..
            }
        ));
    }

    #[test]
    fn malformed_file_names_the_file() {
        let fx = Fixture::new();
        let ctx = ctx();
        fx.write(ctx.defaults_file(&fx.paths), r#"{"ca-url": "X"}"#);
        fx.write(ctx.profile_defaults_file(&fx.paths), "B");

        let err = ConfigLoader::new(&fx.paths).load(Some(&ctx)).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => {
                assert_eq!(path, ctx.profile_defaults_file(&fx.paths))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn legacy_file_absent_is_empty() {
        let fx = Fixture::new();
        let resolved = ConfigLoader::new(&fx.paths).load(None).unwrap();

        assert_eq!(resolved, ResolvedConfig::default());
    }

    #[test]
    fn legacy_file_is_loaded() {
        let fx = Fixture::new();
        fx.write(fx.paths.legacy_defaults_file(), r#"{"ca-url": "https://legacy"}"#);

        let resolved = ConfigLoader::new(&fx.paths).load(None).unwrap();
        assert_eq!(resolved.values["ca-url"], ConfigValue::from("https://legacy"));
    }

    #[test]
    fn legacy_file_override() {
        let fx = Fixture::new();
        let custom = fx.paths.home().join("custom.json");
        fx.write(fx.paths.legacy_defaults_file(), r#"{"ca-url": "default"}"#);
        fx.write(custom.clone(), r#"{"ca-url": "custom"}"#);

        let resolved = ConfigLoader::new(&fx.paths)
            .with_legacy_file(Some(custom))
            .load(None)
            .unwrap();
        assert_eq!(resolved.values["ca-url"], ConfigValue::from("custom"));
    }

    #[test]
    fn legacy_file_malformed_fails() {
        let fx = Fixture::new();
        fx.write(fx.paths.legacy_defaults_file(), "[1, 2]");

        let err = ConfigLoader::new(&fx.paths).load(None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn enabled_without_current_requires_selection() {
        let fx = Fixture::new();
        fx.write(fx.paths.legacy_defaults_file(), r#"{"ca-url": "legacy"}"#);

        let err = ConfigLoader::new(&fx.paths)
            .contexts_enabled(true)
            .load(None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ContextRequired { .. }));
        assert!(err.to_string().contains("step context select"));

        let resolved = ConfigLoader::new(&fx.paths)
            .contexts_enabled(true)
            .context_command(true)
            .load(None)
            .unwrap();
        assert!(resolved.values.is_empty());
    }

    #[test]
    fn banned_keys_are_stripped_once_each() {
        let fx = Fixture::new();
        let ctx = ctx();
        fx.write(
            ctx.defaults_file(&fx.paths),
            r#"{"context": "x", "authority": "y", "ca-url": "X"}"#,
        );
        fx.write(
            ctx.profile_defaults_file(&fx.paths),
            r#"{"authority": "z", "profile": "p"}"#,
        );

        let resolved = ConfigLoader::new(&fx.paths).load(Some(&ctx)).unwrap();

        assert_eq!(resolved.values.keys().collect::<Vec<_>>(), ["ca-url"]);
        assert_eq!(resolved.stripped, ["context", "profile", "authority"]);
    }

    #[test]
    fn unsupported_values_are_skipped() {
        let fx = Fixture::new();
        fx.write(
            fx.paths.legacy_defaults_file(),
            r#"{"ca-url": "X", "nested": {"a": 1}, "empty": null}"#,
        );

        let resolved = ConfigLoader::new(&fx.paths).load(None).unwrap();
        assert_eq!(resolved.values.keys().collect::<Vec<_>>(), ["ca-url"]);
    }

    #[test]
    fn banned_keys_are_stripped_whatever_their_value() {
        let fx = Fixture::new();
        fx.write(
            fx.paths.legacy_defaults_file(),
            r#"{"context": null, "profile": {"name": "p"}, "ca-url": "X"}"#,
        );

        let resolved = ConfigLoader::new(&fx.paths).load(None).unwrap();

        assert_eq!(resolved.values.keys().collect::<Vec<_>>(), ["ca-url"]);
        assert_eq!(resolved.stripped, ["context", "profile"]);
    }
}
