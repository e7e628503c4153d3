//! Dynamic module abstraction
//!
//! The bootstrap never touches a shared library directly. It asks a
//! [`ModuleLoader`] for a [`Module`] and resolves exported entry points through
//! it. Closing a module is dropping it.

pub mod library;
pub mod registry;

pub use library::DynamicLibraryLoader;
pub use registry::ModuleRegistry;

use std::fmt;
use std::sync::Arc;

/// Zero-argument exported function reporting success or capability
pub type Predicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Zero-argument exported function without a result
pub type Procedure = Arc<dyn Fn() + Send + Sync>;

/// Result of resolving an exported symbol
pub enum EntryPoint<T> {
    /// The symbol was exported by the module
    Found(T),
    /// The module does not export the symbol (or is not loaded)
    NotFound,
}

impl<T> EntryPoint<T> {
    /// Whether the symbol was resolved
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Convert into an `Option`
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

impl<T> fmt::Debug for EntryPoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(_) => f.write_str("Found(..)"),
            Self::NotFound => f.write_str("NotFound"),
        }
    }
}

/// A loaded (or failed-to-load) dynamic module
pub trait Module {
    /// Name the module was requested under
    fn name(&self) -> &str;

    /// Whether the module was actually loaded
    fn exists(&self) -> bool;

    /// Resolve an exported `fn() -> bool`
    fn predicate(&self, symbol: &str) -> EntryPoint<Predicate>;

    /// Resolve an exported `fn()`
    fn procedure(&self, symbol: &str) -> EntryPoint<Procedure>;
}

/// Loads dynamic modules by name
///
/// A load failure is not an error: the returned module reports
/// `exists() == false` and resolves nothing.
pub trait ModuleLoader {
    /// Load the named module
    fn load(&mut self, name: &str) -> Box<dyn Module>;
}
