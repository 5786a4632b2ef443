use super::store::{load_current, load_map, write_current, write_map};
use super::{Context, ContextError, ContextMap, ContextResult};
use crate::{config::ConfigMap, path::StepPath, prompt::Prompter};

const SELECT_MESSAGE: &str =
    "Select a context for this command:\t(run 'step context select <name>' to set a default context)";

/// Context map and current-context pointer for one process.
#[derive(Debug)]
pub struct ContextState {
    paths: StepPath,
    contexts: ContextMap,
    current: Option<String>,
}

impl ContextState {
    /// An empty state rooted at `paths`, nothing read from disk.
    pub fn new(paths: StepPath) -> Self {
        Self {
            paths,
            contexts: ContextMap::new(),
            current: None,
        }
    }

    /// Loads `contexts.json` and `current-context.json`.
    ///
    /// Missing files mean contexts are not in use. A current context that is
    /// not in the map is an error. Without a current context the base
    /// directory is created when possible.
    pub fn init(paths: StepPath) -> ContextResult<Self> {
        let contexts = load_map(&paths)?;
        let mut state = Self {
            paths,
            contexts,
            current: None,
        };

        if let Some(name) = load_current(&state.paths)? {
            state.switch(&name)?;
        }

        if state.current.is_none() {
            state.paths.ensure_base_dir()?;
        }

        Ok(state)
    }

    pub fn paths(&self) -> &StepPath {
        &self.paths
    }

    /// True when a current context is set or any context exists.
    pub fn enabled(&self) -> bool {
        self.current.is_some() || !self.contexts.is_empty()
    }

    /// Selects `name` as the current context for this process only.
    ///
    /// Must happen before command flags are bound.
    pub fn switch(&mut self, name: &str) -> ContextResult<()> {
        let Some(ctx) = self.contexts.get(name) else {
            return Err(ContextError::NotFound(name.to_owned()));
        };
        ctx.validate()?;

        tracing::debug!(context = name, "switched current context");
        self.current = Some(name.to_owned());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    pub fn current(&self) -> Option<&Context> {
        self.current.as_deref().and_then(|name| self.contexts.get(name))
    }

    pub fn contexts(&self) -> &ContextMap {
        &self.contexts
    }

    /// Inserts or replaces `ctx` and rewrites `contexts.json`.
    ///
    /// When no context is current yet, `ctx` also becomes the persisted and
    /// in-memory current context.
    pub fn add(&mut self, ctx: Context) -> ContextResult<()> {
        ctx.validate()?;

        let name = ctx.name.clone();
        let mut contexts = self.contexts.clone();
        contexts.insert(name.clone(), ctx);
        write_map(&self.paths, &contexts)?;
        self.contexts = contexts;

        if self.current.is_none() {
            self.save_current(&name)?;
            self.current = Some(name);
        }

        Ok(())
    }

    /// Deletes `name` and rewrites `contexts.json`. The current context can
    /// not be removed.
    pub fn remove(&mut self, name: &str) -> ContextResult<()> {
        if !self.contexts.contains_key(name) {
            return Err(ContextError::NotFound(name.to_owned()));
        }

        if self.current.as_deref() == Some(name) {
            return Err(ContextError::RemoveCurrent(name.to_owned()));
        }

        let mut contexts = self.contexts.clone();
        contexts.remove(name);
        write_map(&self.paths, &contexts)?;
        self.contexts = contexts;
        Ok(())
    }

    /// Persists `name` as the default context for future commands.
    pub fn save_current(&self, name: &str) -> ContextResult<()> {
        if !self.contexts.contains_key(name) {
            return Err(ContextError::NotFound(name.to_owned()));
        }

        write_current(&self.paths, name)
    }

    pub fn list_alphabetical(&self) -> Vec<&Context> {
        let mut entries: Vec<&Context> = self.contexts.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Asks the user which context to use for this command. A single
    /// context is chosen without asking.
    pub fn user_select(&mut self, prompter: &dyn Prompter) -> ContextResult<()> {
        let names: Vec<String> = self
            .list_alphabetical()
            .into_iter()
            .map(|ctx| ctx.name.clone())
            .collect();

        let name = match names.as_slice() {
            [] => return Err(ContextError::Empty),
            [only] => {
                prompter.print_selected("Context", only)?;
                only.clone()
            }
            _ => {
                let index = prompter.select(SELECT_MESSAGE, &names)?;
                names
                    .get(index)
                    .cloned()
                    .ok_or(ContextError::SelectionOutOfRange {
                        index,
                        count: names.len(),
                    })?
            }
        };

        self.switch(&name)
    }

    /// Stores loaded defaults on the current context.
    pub(crate) fn cache_current_config(&mut self, config: ConfigMap) {
        if let Some(ctx) = self
            .current
            .as_deref()
            .and_then(|name| self.contexts.get_mut(name))
        {
            ctx.config = Some(config);
        }
    }
}
