//! Renderer selection
//!
//! Walks the requested tiers from the most capable down. A requested tier
//! whose module is not loaded is demoted exactly one step; the first requested
//! tier with a loaded module wins. If nothing survives the sweep, the top
//! candidate is force-selected through the command surface and the sweep runs
//! once more.

use bitflags::bitflags;

use crate::backend::{BackendId, RenderModule};
use crate::candidates::CandidateList;
use crate::console::CommandSurface;
use crate::error::{BootstrapError, BootstrapResult};
use crate::module::ModuleRegistry;

/// How many forced re-selections are attempted before giving up
pub const MAX_FORCED_RETRIES: u32 = 1;

bitflags! {
    /// Requested renderer tiers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SelectionFlags: u32 {
        /// Baseline tier requested
        const R1 = 1 << 0;
        /// R2 tier requested
        const R2 = 1 << 1;
        /// R3 tier requested
        const R3 = 1 << 2;
        /// R4 tier requested
        const R4 = 1 << 3;
    }
}

impl SelectionFlags {
    /// Flag of a module family
    pub const fn of(kind: RenderModule) -> Self {
        match kind {
            RenderModule::R1 => Self::R1,
            RenderModule::R2 => Self::R2,
            RenderModule::R3 => Self::R3,
            RenderModule::R4 => Self::R4,
        }
    }
}

/// Persistent selection state threaded through every selection call
///
/// Demotions are written back here, so running the selection again starts
/// from where the previous run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    flags: SelectionFlags,
    requested_mode: Option<BackendId>,
}

impl SelectionState {
    /// State requesting `mode`
    pub fn for_mode(mode: BackendId) -> Self {
        Self {
            flags: SelectionFlags::of(mode.module()),
            requested_mode: Some(mode),
        }
    }

    /// State with explicit flags and no specific mode
    pub fn from_flags(flags: SelectionFlags) -> Self {
        Self {
            flags,
            requested_mode: None,
        }
    }

    /// Request `mode`, dropping any other requested tier
    pub fn request(&mut self, mode: BackendId) {
        self.flags = SelectionFlags::of(mode.module());
        self.requested_mode = Some(mode);
    }

    /// Currently requested tiers
    pub fn flags(&self) -> SelectionFlags {
        self.flags
    }

    /// Specific mode asked for, if any
    pub fn requested_mode(&self) -> Option<BackendId> {
        self.requested_mode
    }

    /// Whether `kind` is requested
    pub fn is_requested(&self, kind: RenderModule) -> bool {
        self.flags.contains(SelectionFlags::of(kind))
    }

    /// Clear `kind` and request the next lower tier instead
    pub fn demote(&mut self, kind: RenderModule) {
        self.flags.remove(SelectionFlags::of(kind));
        let lower = kind.lower();
        if let Some(lower) = lower {
            self.flags.insert(SelectionFlags::of(lower));
        }
        if self.requested_mode.is_some_and(|mode| mode.module() == kind) {
            self.requested_mode = lower.map(RenderModule::default_mode);
        }
    }

    /// Mode to bind for `kind`
    pub fn mode_for(&self, kind: RenderModule) -> BackendId {
        self.requested_mode
            .filter(|mode| mode.module() == kind)
            .unwrap_or_else(|| kind.default_mode())
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::for_mode(BackendId::R1)
    }
}

/// Outcome of a successful selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Bound module family
    pub tier: RenderModule,
    /// Mode within that family
    pub mode: BackendId,
    /// Forced re-selections it took
    pub retries: u32,
}

/// Picks the renderer tier to bind
pub struct Selector<'a> {
    registry: &'a ModuleRegistry,
    candidates: &'a CandidateList,
}

impl<'a> Selector<'a> {
    /// Create a selector over the loaded modules and the built candidate list
    pub fn new(registry: &'a ModuleRegistry, candidates: &'a CandidateList) -> Self {
        Self { registry, candidates }
    }

    /// One top-down pass; demotes unusable requested tiers in `state`
    pub fn sweep(&self, state: &mut SelectionState) -> Option<RenderModule> {
        for kind in RenderModule::DESCENDING {
            if !state.is_requested(kind) {
                continue;
            }
            if self.registry.exists(kind) {
                return Some(kind);
            }
            log::debug!("{} requested but not loaded, demoting", kind);
            state.demote(kind);
        }
        None
    }

    /// Mode to bind for `kind`: the requested one if it was offered, else the tier default
    pub fn mode_for(&self, state: &SelectionState, kind: RenderModule) -> BackendId {
        let mode = state.mode_for(kind);
        if mode == kind.default_mode() || self.candidates.contains(mode) {
            return mode;
        }
        log::warn!("{} was not offered, using {}", mode, kind.default_mode());
        kind.default_mode()
    }

    /// Select a tier, forcing the top candidate at most [`MAX_FORCED_RETRIES`] times
    pub fn select(&self, state: &mut SelectionState, console: &mut dyn CommandSurface) -> BootstrapResult<Selection> {
        let mut retries = 0;

        loop {
            if let Some(tier) = self.sweep(state) {
                let mode = self.mode_for(state, tier);
                log::info!("Selected renderer {} ({})", tier, mode);
                return Ok(Selection { tier, mode, retries });
            }

            let Some(top) = self.candidates.first() else {
                break;
            };
            if retries >= MAX_FORCED_RETRIES {
                log::warn!("Forcing '{}' did not produce a usable renderer", top.name);
                break;
            }

            retries += 1;
            log::warn!("No requested renderer is available, forcing '{}'", top.name);
            console.execute(&format!("renderer {}", top.name), state)?;
        }

        let requested = state
            .requested_mode()
            .map_or_else(|| format!("{:?}", state.flags()), |mode| mode.to_string());
        log::error!("Can't setup renderer: nothing usable (requested {})", requested);
        Err(BootstrapError::NoRenderer {
            requested,
            candidates: self.candidates.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::RendererConsole;
    use crate::testing::FakeModule;

    fn registry_with(kinds: &[RenderModule]) -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        for &kind in kinds {
            registry.insert(kind, Box::new(FakeModule::present(kind.default_module_name())));
        }
        registry
    }

    #[test]
    fn test_demotion_steps_one_tier() {
        let mut state = SelectionState::for_mode(BackendId::R4);
        state.demote(RenderModule::R4);
        assert_eq!(state.flags(), SelectionFlags::R3);
        assert_eq!(state.requested_mode(), Some(BackendId::R3));

        state.demote(RenderModule::R1);
        assert_eq!(state.flags(), SelectionFlags::R3);
    }

    #[test]
    fn test_r4_request_falls_to_r2() {
        let registry = registry_with(&[RenderModule::R1, RenderModule::R2]);
        let candidates = CandidateList::new();
        let mut state = SelectionState::for_mode(BackendId::R4);

        let tier = Selector::new(&registry, &candidates).sweep(&mut state);
        assert_eq!(tier, Some(RenderModule::R2));
        assert_eq!(state.flags(), SelectionFlags::R2);
        assert_eq!(state.mode_for(RenderModule::R2), BackendId::R2);
    }

    #[test]
    fn test_unrequested_tiers_are_skipped() {
        let registry = registry_with(&[RenderModule::R1, RenderModule::R3, RenderModule::R4]);
        let candidates = CandidateList::new();
        let mut state = SelectionState::for_mode(BackendId::R1);

        let tier = Selector::new(&registry, &candidates).sweep(&mut state);
        assert_eq!(tier, Some(RenderModule::R1));
    }

    #[test]
    fn test_sub_mode_preserved() {
        let registry = registry_with(&[RenderModule::R2]);
        let mut candidates = CandidateList::new();
        candidates.push(BackendId::R2A);
        candidates.push(BackendId::R2);
        let mut state = SelectionState::for_mode(BackendId::R2A);
        let mut console = RendererConsole::new();

        let selection = Selector::new(&registry, &candidates)
            .select(&mut state, &mut console)
            .unwrap();
        assert_eq!(selection.mode, BackendId::R2A);
        assert_eq!(selection.retries, 0);
    }

    #[test]
    fn test_unoffered_sub_mode_binds_tier_default() {
        let registry = registry_with(&[RenderModule::R2]);
        let mut candidates = CandidateList::new();
        candidates.push(BackendId::R2A);
        candidates.push(BackendId::R2);
        let mut state = SelectionState::for_mode(BackendId::R2_5);
        let mut console = RendererConsole::new();

        let selection = Selector::new(&registry, &candidates)
            .select(&mut state, &mut console)
            .unwrap();
        assert_eq!(selection.tier, RenderModule::R2);
        assert_eq!(selection.mode, BackendId::R2);
    }

    #[test]
    fn test_sweep_exhausts_all_flags_when_nothing_loaded() {
        let registry = ModuleRegistry::new();
        let candidates = CandidateList::new();
        let mut state = SelectionState::for_mode(BackendId::R4);

        assert_eq!(Selector::new(&registry, &candidates).sweep(&mut state), None);
        assert!(state.flags().is_empty());
    }

    #[test]
    fn test_empty_candidates_is_fatal_without_retry() {
        let registry = ModuleRegistry::new();
        let candidates = CandidateList::new();
        let mut state = SelectionState::for_mode(BackendId::R3);
        let mut console = RendererConsole::new();

        let result = Selector::new(&registry, &candidates).select(&mut state, &mut console);
        assert!(matches!(result, Err(BootstrapError::NoRenderer { candidates: 0, .. })));
        assert!(console.history().is_empty());
    }
}
