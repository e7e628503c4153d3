//! Engine bootstrap facade
//!
//! [`EngineApi`] ties the pieces together in the order the host needs them:
//! build the candidate list, select and bind a renderer, then bring up the
//! optional profiler hooks.

use crate::backend::{BackendId, RenderModule};
use crate::candidates::{BuildOutcome, CandidateBuilder, CandidateList, ModeToken};
use crate::config::BootstrapConfig;
use crate::console::CommandSurface;
use crate::environment::HostEnvironment;
use crate::error::{BootstrapError, BootstrapResult};
use crate::foundation::error_mode::{ErrorMode, ProcessErrorMode};
use crate::module::{DynamicLibraryLoader, ModuleLoader, ModuleRegistry};
use crate::profiler::ProfilerHooks;
use crate::selection::{SelectionState, Selector};

/// Owns the renderer bootstrap for one host process
pub struct EngineApi {
    config: BootstrapConfig,
    loader: Box<dyn ModuleLoader>,
    error_mode: Box<dyn ErrorMode>,
    registry: ModuleRegistry,
    candidates: CandidateList,
    state: SelectionState,
    environment: HostEnvironment,
}

impl EngineApi {
    /// Create a bootstrap loading real shared libraries
    pub fn new(config: BootstrapConfig) -> Self {
        let loader = match &config.module_dir {
            Some(dir) => DynamicLibraryLoader::with_search_dir(dir),
            None => DynamicLibraryLoader::new(),
        };
        Self::with_collaborators(config, Box::new(loader), Box::new(ProcessErrorMode::new()))
    }

    /// Create a bootstrap over custom collaborators
    pub fn with_collaborators(
        config: BootstrapConfig,
        loader: Box<dyn ModuleLoader>,
        error_mode: Box<dyn ErrorMode>,
    ) -> Self {
        let mode = config.requested_mode().unwrap_or_else(|| {
            log::warn!("Unknown renderer '{}', requesting {}", config.renderer, BackendId::R1);
            BackendId::R1
        });
        let environment = HostEnvironment::new(config.dedicated_server);

        Self {
            config,
            loader,
            error_mode,
            registry: ModuleRegistry::new(),
            candidates: CandidateList::new(),
            state: SelectionState::for_mode(mode),
            environment,
        }
    }

    /// Load and probe renderer modules, unless already done
    pub fn create_renderer_list(&mut self) -> BootstrapResult<BuildOutcome> {
        CandidateBuilder::new(
            &self.config,
            self.loader.as_mut(),
            &mut self.registry,
            self.error_mode.as_mut(),
        )
        .build(&mut self.candidates, self.config.dedicated_server)
    }

    /// Select a renderer, hand it to the host environment and run its setup
    pub fn initialize_renderers(&mut self, console: &mut dyn CommandSurface) -> BootstrapResult<RenderModule> {
        if let Some(tier) = self.environment.binding().tier() {
            return Err(BootstrapError::AlreadyBound(tier));
        }

        let selection = Selector::new(&self.registry, &self.candidates).select(&mut self.state, console)?;
        let module = self
            .registry
            .take(selection.tier)
            .ok_or(BootstrapError::ModuleNotLoaded(selection.tier))?;
        self.environment.bind(selection, module, &self.config.symbols.setup)?;

        self.registry
            .release_unselected(selection.tier, self.config.unload_unselected);

        Ok(selection.tier)
    }

    /// Full startup: candidate list, renderer binding, profiler hooks
    pub fn initialize(&mut self, console: &mut dyn CommandSurface, launch_params: &[String]) -> BootstrapResult<RenderModule> {
        self.create_renderer_list()?;
        let tier = self.initialize_renderers(console)?;

        let profiler = ProfilerHooks::load(self.loader.as_mut(), &self.config.profiler, launch_params);
        self.environment.set_profiler(profiler);

        Ok(tier)
    }

    /// Modes for menus and the console, terminator included
    pub fn modes(&self) -> Vec<ModeToken> {
        self.candidates.tokens()
    }

    /// The built candidate list
    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    /// Persistent selection state
    pub fn selection_state(&self) -> &SelectionState {
        &self.state
    }

    /// Mutable selection state, for the host's own renderer commands
    pub fn selection_state_mut(&mut self) -> &mut SelectionState {
        &mut self.state
    }

    /// The process-wide host environment
    pub fn environment(&self) -> &HostEnvironment {
        &self.environment
    }

    /// Renderer modules still owned by the bootstrap
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Bootstrap configuration
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Release every module and forget the candidate list and binding
    pub fn destroy(&mut self) {
        log::info!("Shutting down renderer bootstrap");
        self.registry.clear();
        self.environment.reset();
        self.candidates.clear();
    }
}
