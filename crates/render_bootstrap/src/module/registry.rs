//! Single-owner registry of loaded renderer modules
//!
//! Every renderer module handle lives here from load until it is either closed
//! (failed capability check, teardown) or explicitly handed to the host
//! environment with [`ModuleRegistry::take`].

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use super::Module;
use crate::backend::RenderModule;

new_key_type! {
    /// Stable key of a registered module
    pub struct ModuleKey;
}

/// Registry entry
struct Slot {
    kind: RenderModule,
    module: Box<dyn Module>,
}

/// Owns loaded renderer modules, at most one per module family
#[derive(Default)]
pub struct ModuleRegistry {
    slots: SlotMap<ModuleKey, Slot>,
    by_kind: HashMap<RenderModule, ModuleKey>,
    load_counts: HashMap<RenderModule, u32>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly loaded module, closing any previous one of the same family
    pub fn insert(&mut self, kind: RenderModule, module: Box<dyn Module>) -> ModuleKey {
        self.close(kind);
        *self.load_counts.entry(kind).or_insert(0) += 1;

        let key = self.slots.insert(Slot { kind, module });
        self.by_kind.insert(kind, key);
        key
    }

    /// Whether a handle (present or not) is registered for `kind`
    pub fn is_loaded(&self, kind: RenderModule) -> bool {
        self.by_kind.contains_key(&kind)
    }

    /// Whether `kind` is registered and its module actually exists
    pub fn exists(&self, kind: RenderModule) -> bool {
        self.get(kind).is_some_and(|module| module.exists())
    }

    /// Borrow the module registered for `kind`
    pub fn get(&self, kind: RenderModule) -> Option<&dyn Module> {
        let key = self.by_kind.get(&kind)?;
        self.slots.get(*key).map(|slot| slot.module.as_ref())
    }

    /// Close the module registered for `kind`; returns whether one was registered
    pub fn close(&mut self, kind: RenderModule) -> bool {
        match self.by_kind.remove(&kind) {
            Some(key) => {
                if let Some(slot) = self.slots.remove(key) {
                    log::debug!("Releasing {} module '{}'", kind, slot.module.name());
                }
                true
            }
            None => false,
        }
    }

    /// Transfer ownership of the module registered for `kind` to the caller
    pub fn take(&mut self, kind: RenderModule) -> Option<Box<dyn Module>> {
        let key = self.by_kind.remove(&kind)?;
        self.slots.remove(key).map(|slot| slot.module)
    }

    /// Close every module except `keep`, highest tier first
    fn close_all_except(&mut self, keep: Option<RenderModule>) {
        for kind in RenderModule::DESCENDING {
            if Some(kind) != keep {
                self.close(kind);
            }
        }
    }

    /// Close every module except `bound` when `unload` is set, R4 down to R1
    ///
    /// Without `unload` the unselected modules stay resident.
    pub fn release_unselected(&mut self, bound: RenderModule, unload: bool) {
        if unload {
            self.close_all_except(Some(bound));
        } else if !self.is_empty() {
            log::debug!("Keeping {} unselected renderer module(s) loaded", self.len());
        }
    }

    /// Close everything, highest tier first
    pub fn clear(&mut self) {
        self.close_all_except(None);
    }

    /// Module families currently registered, ascending
    pub fn registered(&self) -> Vec<RenderModule> {
        let mut kinds: Vec<RenderModule> = self.slots.values().map(|slot| slot.kind).collect();
        kinds.sort();
        kinds
    }

    /// How many times a module of `kind` has been registered
    pub fn load_count(&self, kind: RenderModule) -> u32 {
        self.load_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Number of registered handles
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the registry holds no handles
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeModule;

    #[test]
    fn test_insert_and_exists() {
        let mut registry = ModuleRegistry::new();
        registry.insert(RenderModule::R1, Box::new(FakeModule::present("render_r1")));
        registry.insert(RenderModule::R3, Box::new(FakeModule::absent("render_r3")));

        assert!(registry.exists(RenderModule::R1));
        assert!(registry.is_loaded(RenderModule::R3));
        assert!(!registry.exists(RenderModule::R3));
        assert!(!registry.exists(RenderModule::R4));
        assert_eq!(registry.registered(), vec![RenderModule::R1, RenderModule::R3]);
    }

    #[test]
    fn test_take_transfers_ownership() {
        let mut registry = ModuleRegistry::new();
        registry.insert(RenderModule::R2, Box::new(FakeModule::present("render_r2")));

        let module = registry.take(RenderModule::R2).unwrap();
        assert_eq!(module.name(), "render_r2");
        assert!(!registry.is_loaded(RenderModule::R2));
        assert!(registry.take(RenderModule::R2).is_none());
    }

    #[test]
    fn test_release_unselected_keeps_bound() {
        let mut registry = ModuleRegistry::new();
        for kind in RenderModule::ALL {
            registry.insert(kind, Box::new(FakeModule::present(kind.default_module_name())));
        }

        registry.release_unselected(RenderModule::R2, false);
        assert_eq!(registry.len(), 4);

        registry.release_unselected(RenderModule::R2, true);
        assert_eq!(registry.registered(), vec![RenderModule::R2]);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reinsert_counts_loads() {
        let mut registry = ModuleRegistry::new();
        registry.insert(RenderModule::R1, Box::new(FakeModule::present("render_r1")));
        registry.insert(RenderModule::R1, Box::new(FakeModule::present("render_r1")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.load_count(RenderModule::R1), 2);
    }
}
