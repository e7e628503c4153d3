//! Host environment
//!
//! Process-wide state the rest of the host reads once a renderer is bound:
//! which tier is active, its setup hook, and the profiler hooks. The bound
//! renderer module is owned here for the rest of the process.

use std::fmt;

use crate::backend::{BackendId, RenderModule};
use crate::error::{BootstrapError, BootstrapResult};
use crate::module::{EntryPoint, Module, Predicate};
use crate::profiler::ProfilerHooks;
use crate::selection::Selection;

/// The renderer the host is bound to
#[derive(Clone, Default)]
pub struct ActiveRendererBinding {
    tier: Option<RenderModule>,
    mode: Option<BackendId>,
    setup_hook: Option<Predicate>,
}

impl ActiveRendererBinding {
    /// Numeric tier id, `-1` while unset
    pub fn tier_id(&self) -> i32 {
        self.tier.map_or(-1, RenderModule::tier_id)
    }

    /// Bound tier
    pub fn tier(&self) -> Option<RenderModule> {
        self.tier
    }

    /// Bound mode within the tier
    pub fn mode(&self) -> Option<BackendId> {
        self.mode
    }

    /// Setup hook of the bound renderer
    pub fn setup_hook(&self) -> Option<&Predicate> {
        self.setup_hook.as_ref()
    }

    /// Whether a renderer is bound
    pub fn is_bound(&self) -> bool {
        self.tier.is_some()
    }
}

impl fmt::Debug for ActiveRendererBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveRendererBinding")
            .field("tier_id", &self.tier_id())
            .field("mode", &self.mode)
            .field("setup_hook", &self.setup_hook.is_some())
            .finish()
    }
}

/// Process-wide environment shared with the rest of the host
#[derive(Default)]
pub struct HostEnvironment {
    dedicated_server: bool,
    binding: ActiveRendererBinding,
    bound_module: Option<Box<dyn Module>>,
    profiler: ProfilerHooks,
}

impl HostEnvironment {
    /// Create an unbound environment
    pub fn new(dedicated_server: bool) -> Self {
        Self {
            dedicated_server,
            ..Self::default()
        }
    }

    /// Whether the host runs as a dedicated server
    pub fn is_dedicated_server(&self) -> bool {
        self.dedicated_server
    }

    /// The active renderer binding
    pub fn binding(&self) -> &ActiveRendererBinding {
        &self.binding
    }

    /// The bound renderer module, owned by the environment
    pub fn bound_module(&self) -> Option<&dyn Module> {
        self.bound_module.as_deref()
    }

    /// Profiler hooks
    pub fn profiler(&self) -> &ProfilerHooks {
        &self.profiler
    }

    /// Install profiler hooks
    pub fn set_profiler(&mut self, profiler: ProfilerHooks) {
        self.profiler = profiler;
    }

    /// Bind the selected renderer and run its setup hook once
    ///
    /// Takes ownership of `module`. Fails if a renderer is already bound, the
    /// module does not export `setup_symbol`, or the hook reports failure.
    pub fn bind(&mut self, selection: Selection, module: Box<dyn Module>, setup_symbol: &str) -> BootstrapResult<()> {
        if let Some(tier) = self.binding.tier {
            return Err(BootstrapError::AlreadyBound(tier));
        }

        let hook = match module.predicate(setup_symbol) {
            EntryPoint::Found(hook) => hook,
            EntryPoint::NotFound => {
                log::error!("{} does not export '{}'", module.name(), setup_symbol);
                return Err(BootstrapError::SetupHookMissing {
                    tier: selection.tier,
                    module: module.name().to_string(),
                    symbol: setup_symbol.to_string(),
                });
            }
        };

        log::info!("Binding renderer {} ({}) from '{}'", selection.tier, selection.mode, module.name());
        self.binding = ActiveRendererBinding {
            tier: Some(selection.tier),
            mode: Some(selection.mode),
            setup_hook: Some(hook.clone()),
        };
        self.bound_module = Some(module);

        if !hook() {
            log::error!("Renderer {} setup failed", selection.tier);
            return Err(BootstrapError::SetupFailed { tier: selection.tier });
        }

        Ok(())
    }

    /// Drop the binding, the bound module and the profiler hooks
    pub fn reset(&mut self) {
        self.binding = ActiveRendererBinding::default();
        self.profiler = ProfilerHooks::Disabled;
        if let Some(module) = self.bound_module.take() {
            log::debug!("Releasing bound renderer module '{}'", module.name());
        }
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("dedicated_server", &self.dedicated_server)
            .field("binding", &self.binding)
            .field("profiler", &self.profiler)
            .finish_non_exhaustive()
    }
}
