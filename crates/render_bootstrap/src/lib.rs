//! # Render Bootstrap
//!
//! Discovers which renderer modules are available on the host, ranks them by
//! capability and binds the process to exactly one of them, degrading tier by
//! tier when the preferred renderer is unusable.
//!
//! ## Pipeline
//!
//! - **Candidate builder**: loads every renderer module once, runs the
//!   capability checks the modules export, closes the ones that fail and
//!   produces the ordered list of selectable modes
//! - **Selector**: walks the requested tiers from R4 down to R1, demoting one
//!   step at a time, with a single forced re-selection before giving up
//! - **Host environment**: takes ownership of the chosen module, publishes the
//!   active binding and runs the renderer's setup hook once
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use render_bootstrap::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BootstrapConfig::load_from_file("bootstrap.toml")?;
//!     let mut api = EngineApi::new(config);
//!     let mut console = RendererConsole::new();
//!
//!     let tier = api.initialize(&mut console, &[])?;
//!     println!("bound to {}", tier);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod backend;
pub mod candidates;
pub mod config;
pub mod console;
pub mod environment;
pub mod foundation;
pub mod module;
pub mod probe;
pub mod profiler;
pub mod selection;

mod engine;
mod error;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;

pub use engine::EngineApi;
pub use error::{BootstrapError, BootstrapResult};

/// Common imports for bootstrap users
pub mod prelude {
    pub use crate::{
        backend::{BackendId, RenderModule},
        candidates::{Candidate, CandidateList, ModeToken},
        config::{BootstrapConfig, Config, ConfigError},
        console::{CommandSurface, RendererConsole},
        environment::{ActiveRendererBinding, HostEnvironment},
        module::{DynamicLibraryLoader, EntryPoint, Module, ModuleLoader},
        profiler::ProfilerHooks,
        selection::{SelectionFlags, SelectionState},
        BootstrapError, BootstrapResult, EngineApi,
    };
}
