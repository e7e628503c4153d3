//! Module loader backed by real shared libraries

#![allow(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;

use super::{EntryPoint, Module, ModuleLoader, Predicate, Procedure};

/// Loads renderer modules as shared libraries through `libloading`
///
/// Module names are platform-neutral (`render_r2`); the platform prefix and
/// extension are added here. The configured search directory is tried first,
/// then the system library search path.
#[derive(Debug, Clone, Default)]
pub struct DynamicLibraryLoader {
    search_dir: Option<PathBuf>,
}

impl DynamicLibraryLoader {
    /// Create a loader that only uses the system search path
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader that looks in `dir` before the system search path
    pub fn with_search_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            search_dir: Some(dir.into()),
        }
    }

    /// Directory searched before the system path, if any
    pub fn search_dir(&self) -> Option<&Path> {
        self.search_dir.as_deref()
    }

    fn candidate_paths(&self, name: &str) -> Vec<PathBuf> {
        let file_name = libloading::library_filename(name);
        let mut paths = Vec::with_capacity(2);
        if let Some(dir) = &self.search_dir {
            paths.push(dir.join(&file_name));
        }
        paths.push(PathBuf::from(file_name));
        paths
    }
}

impl ModuleLoader for DynamicLibraryLoader {
    fn load(&mut self, name: &str) -> Box<dyn Module> {
        let mut last_error = None;

        for path in self.candidate_paths(name) {
            // SAFETY: renderer modules are trusted engine components; running
            // their initialisers is the point of loading them.
            match unsafe { Library::new(&path) } {
                Ok(library) => {
                    log::debug!("Loaded module '{}' from {}", name, path.display());
                    return Box::new(LibraryModule {
                        name: name.to_string(),
                        library: Some(Arc::new(library)),
                    });
                }
                Err(err) => last_error = Some(err),
            }
        }

        if let Some(err) = last_error {
            log::debug!("Module '{}' not available: {}", name, err);
        }

        Box::new(LibraryModule {
            name: name.to_string(),
            library: None,
        })
    }
}

/// A shared library opened by [`DynamicLibraryLoader`]
///
/// Resolved callables hold their own reference to the library, so a hook
/// handed to the host keeps the code it points into mapped.
pub struct LibraryModule {
    name: String,
    library: Option<Arc<Library>>,
}

impl Module for LibraryModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists(&self) -> bool {
        self.library.is_some()
    }

    fn predicate(&self, symbol: &str) -> EntryPoint<Predicate> {
        let Some(library) = &self.library else {
            return EntryPoint::NotFound;
        };

        // SAFETY: predicates are exported as `extern "C" fn() -> bool`.
        let func: extern "C" fn() -> bool =
            match unsafe { library.get::<extern "C" fn() -> bool>(symbol.as_bytes()) } {
                Ok(export) => *export,
                Err(err) => {
                    log::trace!("'{}' does not export '{}': {}", self.name, symbol, err);
                    return EntryPoint::NotFound;
                }
            };

        let library = Arc::clone(library);
        EntryPoint::Found(Arc::new(move || {
            let _library = &library;
            func()
        }))
    }

    fn procedure(&self, symbol: &str) -> EntryPoint<Procedure> {
        let Some(library) = &self.library else {
            return EntryPoint::NotFound;
        };

        // SAFETY: procedures are exported as `extern "C" fn()`.
        let func: extern "C" fn() = match unsafe { library.get::<extern "C" fn()>(symbol.as_bytes()) } {
            Ok(export) => *export,
            Err(err) => {
                log::trace!("'{}' does not export '{}': {}", self.name, symbol, err);
                return EntryPoint::NotFound;
            }
        };

        let library = Arc::clone(library);
        EntryPoint::Found(Arc::new(move || {
            let _library = &library;
            func();
        }))
    }
}

impl Drop for LibraryModule {
    fn drop(&mut self) {
        if self.library.is_some() {
            log::debug!("Closing module '{}'", self.name);
        }
    }
}
