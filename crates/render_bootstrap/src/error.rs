//! Bootstrap errors
//!
//! Everything here is fatal for the host: an unavailable backend is handled
//! where it is detected and never becomes an error.

use thiserror::Error;

use crate::backend::RenderModule;
use crate::console::CommandError;

/// Result type for bootstrap operations
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Fatal renderer bootstrap failures
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Dedicated server mode has no fallback for the baseline renderer
    #[error("Dedicated server needs the baseline renderer module '{module}' to work")]
    DedicatedServerRequiresBaseline {
        /// Module that failed to load
        module: String,
    },

    /// No renderer tier could be bound
    #[error("Can't setup renderer: no usable renderer module (requested {requested}, {candidates} candidate modes)")]
    NoRenderer {
        /// Mode requested when selection gave up
        requested: String,
        /// Number of modes the candidate list offered
        candidates: usize,
    },

    /// The selected module does not export its setup hook
    #[error("Renderer module '{module}' ({tier}) does not export '{symbol}'")]
    SetupHookMissing {
        /// Selected tier
        tier: RenderModule,
        /// Module name
        module: String,
        /// Expected symbol
        symbol: String,
    },

    /// The setup hook reported failure
    #[error("Renderer {tier} setup failed")]
    SetupFailed {
        /// Selected tier
        tier: RenderModule,
    },

    /// A renderer was already bound for this process
    #[error("Renderer already bound to {0}")]
    AlreadyBound(RenderModule),

    /// The bound module was not in the registry when ownership was transferred
    #[error("Renderer module for {0} is not loaded")]
    ModuleNotLoaded(RenderModule),

    /// The forced re-selection command failed
    #[error("Renderer re-selection failed: {0}")]
    Command(#[from] CommandError),
}
