//! Optional profiler integration
//!
//! An external profiler module can be asked to pause and resume collection
//! around uninteresting work. It is only loaded when the host is launched with
//! the configured flag, and any failure just leaves the hooks disabled.

use std::fmt;

use crate::config::ProfilerConfig;
use crate::module::{EntryPoint, Module, ModuleLoader, Procedure};

/// Profiler pause/resume hooks
pub enum ProfilerHooks {
    /// Hooks resolved from a loaded profiler module
    Enabled {
        /// Pause collection
        pause: Procedure,
        /// Resume collection
        resume: Procedure,
        /// Owning module, kept loaded while the hooks are in use
        module: Box<dyn Module>,
    },
    /// No profiler; hooks do nothing
    Disabled,
}

impl ProfilerHooks {
    /// Load the profiler module if `launch_params` contain the enabling flag
    pub fn load(loader: &mut dyn ModuleLoader, config: &ProfilerConfig, launch_params: &[String]) -> Self {
        if !launch_params.iter().any(|param| param == &config.launch_flag) {
            return Self::Disabled;
        }

        let module = loader.load(&config.module);
        if !module.exists() {
            log::warn!("Can't initialize profiler: module '{}' not found", config.module);
            return Self::Disabled;
        }

        match (module.procedure(&config.pause_symbol), module.procedure(&config.resume_symbol)) {
            (EntryPoint::Found(pause), EntryPoint::Found(resume)) => {
                log::info!("Profiler hooks enabled from '{}'", config.module);
                Self::Enabled { pause, resume, module }
            }
            _ => {
                log::warn!(
                    "Can't initialize profiler: '{}' lacks '{}' or '{}'",
                    config.module,
                    config.pause_symbol,
                    config.resume_symbol
                );
                Self::Disabled
            }
        }
    }

    /// Whether real hooks are installed
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    /// Pause profiling
    pub fn pause(&self) {
        if let Self::Enabled { pause, .. } = self {
            pause();
        }
    }

    /// Resume profiling
    pub fn resume(&self) {
        if let Self::Enabled { resume, .. } = self {
            resume();
        }
    }
}

impl Default for ProfilerHooks {
    fn default() -> Self {
        Self::Disabled
    }
}

impl fmt::Debug for ProfilerHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled { module, .. } => write!(f, "Enabled({})", module.name()),
            Self::Disabled => f.write_str("Disabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeLoader, FakeModule};

    fn params(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_without_flag_nothing_is_loaded() {
        let mut loader = FakeLoader::new();
        let journal = loader.journal();

        let hooks = ProfilerHooks::load(&mut loader, &ProfilerConfig::default(), &params(&["-nosound"]));
        assert!(!hooks.is_enabled());
        assert!(journal.loads().is_empty());
    }

    #[test]
    fn test_both_hooks_resolved() {
        let config = ProfilerConfig::default();
        let mut loader = FakeLoader::new().with(
            FakeModule::present(&config.module)
                .with_procedure(&config.pause_symbol)
                .with_procedure(&config.resume_symbol),
        );
        let journal = loader.journal();

        let hooks = ProfilerHooks::load(&mut loader, &config, &params(&["-tune"]));
        assert!(hooks.is_enabled());

        hooks.pause();
        hooks.resume();
        assert_eq!(journal.calls(&config.pause_symbol), 1);
        assert_eq!(journal.calls(&config.resume_symbol), 1);
    }

    #[test]
    fn test_missing_symbol_disables() {
        let config = ProfilerConfig::default();
        let mut loader =
            FakeLoader::new().with(FakeModule::present(&config.module).with_procedure(&config.pause_symbol));

        let hooks = ProfilerHooks::load(&mut loader, &config, &params(&["-tune"]));
        assert!(!hooks.is_enabled());
        hooks.pause();
        hooks.resume();
    }

    #[test]
    fn test_missing_module_disables() {
        let mut loader = FakeLoader::new();
        let hooks = ProfilerHooks::load(&mut loader, &ProfilerConfig::default(), &params(&["-tune"]));
        assert!(!hooks.is_enabled());
    }
}
