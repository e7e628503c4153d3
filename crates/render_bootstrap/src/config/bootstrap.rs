//! # Bootstrap Configuration
//!
//! Everything the renderer bootstrap needs to know about the host: where the
//! renderer modules live and what they are called, which exported symbols to
//! resolve, which renderer the user asked for, and how the optional profiler
//! integration is switched on.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::backend::{BackendId, RenderModule};

/// Dynamic module names per renderer family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleNames {
    /// Baseline renderer module
    pub r1: String,
    /// R2 family module
    pub r2: String,
    /// R3 module
    pub r3: String,
    /// R4 module
    pub r4: String,
}

impl ModuleNames {
    /// Module name for a family
    pub fn get(&self, kind: RenderModule) -> &str {
        match kind {
            RenderModule::R1 => &self.r1,
            RenderModule::R2 => &self.r2,
            RenderModule::R3 => &self.r3,
            RenderModule::R4 => &self.r4,
        }
    }
}

impl Default for ModuleNames {
    fn default() -> Self {
        Self {
            r1: RenderModule::R1.default_module_name().to_string(),
            r2: RenderModule::R2.default_module_name().to_string(),
            r3: RenderModule::R3.default_module_name().to_string(),
            r4: RenderModule::R4.default_module_name().to_string(),
        }
    }
}

/// Exported symbols resolved from renderer modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolNames {
    /// Capability check exported by R3 and R4 (`fn() -> bool`)
    pub capability_check: String,
    /// Sub-capability check gating the R2.5 mode (`fn() -> bool`)
    pub extended_check: String,
    /// Setup hook of the bound renderer (`fn() -> bool`, `true` on success)
    pub setup: String,
}

impl Default for SymbolNames {
    fn default() -> Self {
        Self {
            capability_check: "renderer_check_capability".to_string(),
            extended_check: "renderer_check_extended".to_string(),
            setup: "renderer_setup".to_string(),
        }
    }
}

/// Optional profiler integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Launch parameter that enables the profiler hooks
    pub launch_flag: String,
    /// Profiler module name
    pub module: String,
    /// Exported pause procedure
    pub pause_symbol: String,
    /// Exported resume procedure
    pub resume_symbol: String,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            launch_flag: "-tune".to_string(),
            module: "profiler_api".to_string(),
            pause_symbol: "profiler_pause".to_string(),
            resume_symbol: "profiler_resume".to_string(),
        }
    }
}

/// Complete bootstrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Directory searched for modules before the system path
    pub module_dir: Option<PathBuf>,
    /// Initially requested renderer mode
    pub renderer: String,
    /// Run as a dedicated server (baseline renderer only, no fallback)
    pub dedicated_server: bool,
    /// Close renderer modules that were not selected
    ///
    /// Off by default: unloading a renderer invalidates type information the
    /// host may still hold from it.
    pub unload_unselected: bool,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Module names per renderer family
    pub modules: ModuleNames,
    /// Exported symbol names
    pub symbols: SymbolNames,
    /// Profiler integration
    pub profiler: ProfilerConfig,
}

impl BootstrapConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            module_dir: None,
            renderer: BackendId::R4.mode_name().to_string(),
            dedicated_server: false,
            unload_unselected: false,
            log_level: "info".to_string(),
            modules: ModuleNames::default(),
            symbols: SymbolNames::default(),
            profiler: ProfilerConfig::default(),
        }
    }

    /// Set the module search directory
    pub fn with_module_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.module_dir = Some(dir.into());
        self
    }

    /// Set the initially requested renderer mode
    pub fn with_renderer(mut self, mode: impl Into<String>) -> Self {
        self.renderer = mode.into();
        self
    }

    /// Run as a dedicated server
    pub fn with_dedicated_server(mut self, dedicated: bool) -> Self {
        self.dedicated_server = dedicated;
        self
    }

    /// Close unselected renderer modules after binding
    pub fn with_unload_unselected(mut self, unload: bool) -> Self {
        self.unload_unselected = unload;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// The requested mode, if the configured name is valid
    pub fn requested_mode(&self) -> Option<BackendId> {
        BackendId::from_mode_name(&self.renderer)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requested_mode().is_none() {
            return Err(ConfigError::Invalid(format!(
                "unknown renderer mode '{}'",
                self.renderer
            )));
        }

        for kind in RenderModule::ALL {
            if self.modules.get(kind).trim().is_empty() {
                return Err(ConfigError::Invalid(format!("module name for {} is empty", kind)));
            }
        }

        if self.symbols.setup.is_empty() {
            return Err(ConfigError::Invalid("setup symbol name is empty".to_string()));
        }

        Ok(())
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for BootstrapConfig {}
