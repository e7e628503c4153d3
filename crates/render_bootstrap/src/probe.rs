//! Capability prober
//!
//! Decides whether a loaded module can actually drive a given mode on this
//! machine. The checks live in the renderer modules themselves and are
//! resolved by symbol name.

use crate::backend::BackendId;
use crate::config::SymbolNames;
use crate::module::{EntryPoint, Module};

/// Runs the capability checks exported by renderer modules
pub struct CapabilityProber<'a> {
    symbols: &'a SymbolNames,
}

impl<'a> CapabilityProber<'a> {
    /// Create a prober resolving the configured check symbols
    pub fn new(symbols: &'a SymbolNames) -> Self {
        Self { symbols }
    }

    /// Whether `module` can drive `backend`
    ///
    /// Baseline modes need nothing beyond a loaded module. Gated modes need an
    /// exported check that returns `true`; a missing check counts as a failure.
    pub fn probe(&self, backend: BackendId, module: &dyn Module) -> bool {
        if !module.exists() {
            return false;
        }

        let symbol = match backend {
            BackendId::R1 | BackendId::R2A | BackendId::R2 => return true,
            BackendId::R2_5 => &self.symbols.extended_check,
            BackendId::R3 | BackendId::R4 => &self.symbols.capability_check,
        };

        match module.predicate(symbol) {
            EntryPoint::Found(check) => {
                let capable = check();
                log::debug!("{} capability check for {}: {}", module.name(), backend, capable);
                capable
            }
            EntryPoint::NotFound => {
                log::debug!("{} exports no '{}', {} unavailable", module.name(), symbol, backend);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeModule;

    #[test]
    fn test_baseline_modes_need_no_check() {
        let symbols = SymbolNames::default();
        let prober = CapabilityProber::new(&symbols);
        let module = FakeModule::present("render_r2");

        assert!(prober.probe(BackendId::R1, &module));
        assert!(prober.probe(BackendId::R2, &module));
        assert!(prober.probe(BackendId::R2A, &module));
    }

    #[test]
    fn test_missing_check_fails_gated_modes() {
        let symbols = SymbolNames::default();
        let prober = CapabilityProber::new(&symbols);
        let module = FakeModule::present("render_r3");

        assert!(!prober.probe(BackendId::R3, &module));
        assert!(!prober.probe(BackendId::R2_5, &module));
    }

    #[test]
    fn test_check_result_is_used() {
        let symbols = SymbolNames::default();
        let prober = CapabilityProber::new(&symbols);

        let capable = FakeModule::present("render_r4").with_predicate(&symbols.capability_check, true);
        let incapable = FakeModule::present("render_r4").with_predicate(&symbols.capability_check, false);

        assert!(prober.probe(BackendId::R4, &capable));
        assert!(!prober.probe(BackendId::R4, &incapable));
    }

    #[test]
    fn test_absent_module_never_capable() {
        let symbols = SymbolNames::default();
        let prober = CapabilityProber::new(&symbols);

        assert!(!prober.probe(BackendId::R1, &FakeModule::absent("render_r1")));
    }
}
