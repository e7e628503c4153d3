//! Renderer candidate set
//!
//! The builder loads every renderer module once, runs the capability checks
//! and produces the ordered list of selectable modes. Modules that fail their
//! check are closed right away.

use std::fmt;

use crate::backend::{BackendId, RenderModule};
use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, BootstrapResult};
use crate::foundation::error_mode::{ErrorMode, ErrorModeScope};
use crate::module::{ModuleLoader, ModuleRegistry};
use crate::probe::CapabilityProber;

/// One selectable renderer mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Mode name
    pub name: String,
    /// Unique priority id
    pub priority: i32,
    /// Mode this candidate selects
    pub backend: BackendId,
}

impl Candidate {
    /// Candidate entry for a mode
    pub fn new(backend: BackendId) -> Self {
        Self {
            name: backend.mode_name().to_string(),
            priority: backend.priority(),
            backend,
        }
    }
}

/// Mode entry as handed to menus and the console
///
/// Token lists end with a terminator (`id == -1`, empty name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeToken {
    /// Mode name, empty for the terminator
    pub name: String,
    /// Priority id, `-1` for the terminator
    pub id: i32,
}

impl ModeToken {
    /// Id of the end-of-list entry
    pub const TERMINATOR_ID: i32 = -1;

    /// The end-of-list entry
    pub fn terminator() -> Self {
        Self {
            name: String::new(),
            id: Self::TERMINATOR_ID,
        }
    }

    /// Whether this is the end-of-list entry
    pub fn is_terminator(&self) -> bool {
        self.id == Self::TERMINATOR_ID
    }
}

/// Ordered list of viable modes produced by one build pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    entries: Vec<Candidate>,
}

impl CandidateList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, backend: BackendId) {
        debug_assert!(!self.contains(backend));
        self.entries.push(Candidate::new(backend));
    }

    /// First (lowest priority) candidate
    pub fn first(&self) -> Option<&Candidate> {
        self.entries.first()
    }

    /// Whether `backend` was offered
    pub fn contains(&self, backend: BackendId) -> bool {
        self.entries.iter().any(|candidate| candidate.backend == backend)
    }

    /// Look up a candidate by mode name
    pub fn find(&self, name: &str) -> Option<&Candidate> {
        let backend = BackendId::from_mode_name(name)?;
        self.entries.iter().find(|candidate| candidate.backend == backend)
    }

    /// Iterate candidates in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter()
    }

    /// Number of candidates, terminator excluded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no candidates
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Menu tokens, terminator included
    pub fn tokens(&self) -> Vec<ModeToken> {
        self.entries
            .iter()
            .map(|candidate| ModeToken {
                name: candidate.name.clone(),
                id: candidate.priority,
            })
            .chain(std::iter::once(ModeToken::terminator()))
            .collect()
    }

    /// Drop every candidate
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn log_modes(&self) {
        log::info!("Available render modes[{}]:", self.entries.len() + 1);
        for candidate in &self.entries {
            log::info!("{}", candidate.name);
        }
    }
}

impl fmt::Display for CandidateList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.entries.iter().map(|c| c.name.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// What a build call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Modules were loaded and the list populated
    Built,
    /// A list already existed; nothing was loaded
    AlreadyBuilt,
}

/// Loads and probes renderer modules
pub struct CandidateBuilder<'a> {
    config: &'a BootstrapConfig,
    loader: &'a mut dyn ModuleLoader,
    registry: &'a mut ModuleRegistry,
    error_mode: &'a mut dyn ErrorMode,
}

impl<'a> CandidateBuilder<'a> {
    /// Create a builder over the host's collaborators
    pub fn new(
        config: &'a BootstrapConfig,
        loader: &'a mut dyn ModuleLoader,
        registry: &'a mut ModuleRegistry,
        error_mode: &'a mut dyn ErrorMode,
    ) -> Self {
        Self {
            config,
            loader,
            registry,
            error_mode,
        }
    }

    /// Populate `candidates` unless it is already populated
    ///
    /// Dedicated servers only load the baseline module and fail if it is
    /// missing. Otherwise the upper tiers are loaded with critical error
    /// reporting suppressed, probed, and either offered or closed.
    pub fn build(&mut self, candidates: &mut CandidateList, dedicated_server: bool) -> BootstrapResult<BuildOutcome> {
        if !candidates.is_empty() {
            log::debug!("Renderer list already built: {}", candidates);
            return Ok(BuildOutcome::AlreadyBuilt);
        }

        let names = &self.config.modules;
        let baseline = self.loader.load(names.get(RenderModule::R1));
        self.registry.insert(RenderModule::R1, baseline);

        if dedicated_server {
            if !self.registry.exists(RenderModule::R1) {
                log::error!("Dedicated server needs '{}' to work", names.get(RenderModule::R1));
                return Err(BootstrapError::DedicatedServerRequiresBaseline {
                    module: names.get(RenderModule::R1).to_string(),
                });
            }
            candidates.push(BackendId::R1);
            candidates.log_modes();
            return Ok(BuildOutcome::Built);
        }

        {
            let _scope = ErrorModeScope::suppress(&mut *self.error_mode);
            for kind in [RenderModule::R2, RenderModule::R3, RenderModule::R4] {
                let module = self.loader.load(names.get(kind));
                self.registry.insert(kind, module);
            }
        }

        let prober = CapabilityProber::new(&self.config.symbols);

        if self.registry.exists(RenderModule::R1) {
            candidates.push(BackendId::R1);
        }

        if let Some(module) = self.registry.get(RenderModule::R2).filter(|m| m.exists()) {
            candidates.push(BackendId::R2A);
            candidates.push(BackendId::R2);
            if prober.probe(BackendId::R2_5, module) {
                candidates.push(BackendId::R2_5);
            }
        }

        for (kind, backend) in [(RenderModule::R3, BackendId::R3), (RenderModule::R4, BackendId::R4)] {
            let Some(module) = self.registry.get(kind).filter(|m| m.exists()) else {
                continue;
            };
            if prober.probe(backend, module) {
                candidates.push(backend);
            } else {
                log::info!("{} failed its capability check, unloading", kind);
                self.registry.close(kind);
            }
        }

        candidates.log_modes();
        Ok(BuildOutcome::Built)
    }
}
