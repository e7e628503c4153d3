//! In-memory doubles for the bootstrap's collaborators

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::backend::RenderModule;
use crate::config::SymbolNames;
use crate::foundation::error_mode::ErrorMode;
use crate::module::{EntryPoint, Module, ModuleLoader, Predicate, Procedure};

/// Something observable a double did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A module was requested from the loader
    Load(String),
    /// A loaded module was dropped
    Close(String),
    /// An exported function was invoked: (module, symbol)
    Call(String, String),
    /// Critical error reporting switched
    Suppress(bool),
}

/// Shared, ordered event log
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Event>>>);

impl Journal {
    fn record(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Load(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn closes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Close(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn calls(&self, symbol: &str) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::Call(_, s) if s == symbol))
            .count()
    }

    pub fn position(&self, wanted: &Event) -> Option<usize> {
        self.events().iter().position(|event| event == wanted)
    }
}

/// Scripted module
///
/// Predicates return their scripted value; procedures do nothing but get
/// journaled.
#[derive(Clone)]
pub struct FakeModule {
    name: String,
    exists: bool,
    predicates: HashMap<String, bool>,
    procedures: Vec<String>,
    journal: Journal,
    live: bool,
}

impl FakeModule {
    pub fn present(name: &str) -> Self {
        Self {
            name: name.to_string(),
            exists: true,
            predicates: HashMap::new(),
            procedures: Vec::new(),
            journal: Journal::default(),
            live: false,
        }
    }

    pub fn absent(name: &str) -> Self {
        let mut module = Self::present(name);
        module.exists = false;
        module
    }

    /// A working renderer of `kind`: setup succeeds, capability check passes
    pub fn renderer(kind: RenderModule) -> Self {
        let symbols = SymbolNames::default();
        let module = Self::present(kind.default_module_name()).with_predicate(&symbols.setup, true);
        if kind.requires_capability_check() {
            module.with_predicate(&symbols.capability_check, true)
        } else {
            module
        }
    }

    pub fn with_predicate(mut self, symbol: &str, value: bool) -> Self {
        self.predicates.insert(symbol.to_string(), value);
        self
    }

    pub fn without_predicate(mut self, symbol: &str) -> Self {
        self.predicates.remove(symbol);
        self
    }

    pub fn with_procedure(mut self, symbol: &str) -> Self {
        self.procedures.push(symbol.to_string());
        self
    }
}

impl Module for FakeModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists(&self) -> bool {
        self.exists
    }

    fn predicate(&self, symbol: &str) -> EntryPoint<Predicate> {
        if !self.exists {
            return EntryPoint::NotFound;
        }
        match self.predicates.get(symbol) {
            Some(&value) => {
                let journal = self.journal.clone();
                let module = self.name.clone();
                let symbol = symbol.to_string();
                EntryPoint::Found(Arc::new(move || {
                    journal.record(Event::Call(module.clone(), symbol.clone()));
                    value
                }))
            }
            None => EntryPoint::NotFound,
        }
    }

    fn procedure(&self, symbol: &str) -> EntryPoint<Procedure> {
        if !self.exists || !self.procedures.iter().any(|s| s == symbol) {
            return EntryPoint::NotFound;
        }
        let journal = self.journal.clone();
        let module = self.name.clone();
        let symbol = symbol.to_string();
        EntryPoint::Found(Arc::new(move || {
            journal.record(Event::Call(module.clone(), symbol.clone()));
        }))
    }
}

impl Drop for FakeModule {
    fn drop(&mut self) {
        if self.live {
            self.journal.record(Event::Close(self.name.clone()));
        }
    }
}

/// Loader serving scripted modules; unknown names load as absent
#[derive(Default)]
pub struct FakeLoader {
    modules: HashMap<String, FakeModule>,
    journal: Journal,
}

impl FakeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader with every renderer family present and capable
    pub fn all_renderers() -> Self {
        RenderModule::ALL
            .into_iter()
            .fold(Self::new(), |loader, kind| loader.with(FakeModule::renderer(kind)))
    }

    pub fn with(mut self, module: FakeModule) -> Self {
        self.modules.insert(module.name.clone(), module);
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

impl ModuleLoader for FakeLoader {
    fn load(&mut self, name: &str) -> Box<dyn Module> {
        self.journal.record(Event::Load(name.to_string()));
        let mut module = self
            .modules
            .get(name)
            .cloned()
            .unwrap_or_else(|| FakeModule::absent(name));
        module.journal = self.journal.clone();
        module.live = module.exists;
        Box::new(module)
    }
}

/// Error mode that journals every switch
pub struct FakeErrorMode {
    journal: Journal,
}

impl FakeErrorMode {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl ErrorMode for FakeErrorMode {
    fn set_suppress_critical_errors(&mut self, suppress: bool) {
        self.journal.record(Event::Suppress(suppress));
    }
}
