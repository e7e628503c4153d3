//! Foundation module - process-level plumbing shared by the bootstrap
//!
//! - Logging initialisation
//! - Process-wide critical error reporting mode

pub mod error_mode;
pub mod logging;
