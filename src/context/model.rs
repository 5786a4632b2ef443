use super::{ContextError, ContextResult};
use crate::{config::ConfigMap, path::StepPath};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::PathBuf};

/// A named pairing of a profile and an authority.
///
/// The name is the key of the context in [`ContextMap`] and is never
/// persisted inside the entry itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(skip)]
    pub name: String,
    pub profile: String,
    pub authority: String,
    /// Defaults loaded for this context, filled on first use.
    #[serde(skip)]
    pub config: Option<ConfigMap>,
}

impl Context {
    pub fn new(
        name: impl Into<String>,
        profile: impl Into<String>,
        authority: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            profile: profile.into(),
            authority: authority.into(),
            config: None,
        }
    }

    pub fn validate(&self) -> ContextResult<()> {
        if self.name.trim().is_empty() {
            return Err(ContextError::EmptyName);
        }
        if self.authority.is_empty() {
            return Err(ContextError::EmptyAuthority);
        }
        if self.profile.is_empty() {
            return Err(ContextError::EmptyProfile);
        }
        Ok(())
    }

    pub fn authority_path(&self, paths: &StepPath) -> PathBuf {
        paths.authority_path(&self.authority)
    }

    pub fn profile_path(&self, paths: &StepPath) -> PathBuf {
        paths.profile_path(&self.profile)
    }

    /// `authorities/<authority>/config/defaults.json`
    pub fn defaults_file(&self, paths: &StepPath) -> PathBuf {
        self.authority_path(paths).join("config").join("defaults.json")
    }

    /// `profiles/<profile>/config/defaults.json`
    pub fn profile_defaults_file(&self, paths: &StepPath) -> PathBuf {
        self.profile_path(paths).join("config").join("defaults.json")
    }
}

pub type ContextMap = HashMap<String, Context>;

/// Shape of `current-context.json`.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct StoredCurrent {
    pub context: String,
}
