//! Renderer backend catalogue
//!
//! Two views of the same set of renderers:
//!
//! - [`RenderModule`]: the four loadable module families, one dynamic library each
//! - [`BackendId`]: the six selectable modes offered to the user. The R2 module
//!   provides three of them (R2A, R2 and R2.5).

use std::fmt;

/// A loadable renderer module family, ordered by ascending capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderModule {
    /// Baseline renderer, the most compatible one
    R1,
    /// Second generation renderer (hosts the R2A, R2 and R2.5 modes)
    R2,
    /// Third generation renderer
    R3,
    /// Highest capability renderer
    R4,
}

impl RenderModule {
    /// All module families in ascending capability order
    pub const ALL: [RenderModule; 4] = [Self::R1, Self::R2, Self::R3, Self::R4];

    /// Module families in the order the selector walks them
    pub const DESCENDING: [RenderModule; 4] = [Self::R4, Self::R3, Self::R2, Self::R1];

    /// Numeric tier id published through the active binding
    pub const fn tier_id(self) -> i32 {
        match self {
            Self::R1 => 1,
            Self::R2 => 2,
            Self::R3 => 3,
            Self::R4 => 4,
        }
    }

    /// Default dynamic module name for this family
    pub const fn default_module_name(self) -> &'static str {
        match self {
            Self::R1 => "render_r1",
            Self::R2 => "render_r2",
            Self::R3 => "render_r3",
            Self::R4 => "render_r4",
        }
    }

    /// The next lower tier, `None` for the baseline
    pub const fn lower(self) -> Option<RenderModule> {
        match self {
            Self::R1 => None,
            Self::R2 => Some(Self::R1),
            Self::R3 => Some(Self::R2),
            Self::R4 => Some(Self::R3),
        }
    }

    /// Mode selected when this family is requested without a specific mode
    pub const fn default_mode(self) -> BackendId {
        match self {
            Self::R1 => BackendId::R1,
            Self::R2 => BackendId::R2,
            Self::R3 => BackendId::R3,
            Self::R4 => BackendId::R4,
        }
    }

    /// Whether a missing capability hook rejects this module
    ///
    /// R1 and R2 are assumed capable once loaded.
    pub const fn requires_capability_check(self) -> bool {
        matches!(self, Self::R3 | Self::R4)
    }

    /// Selectable modes this module contributes, in priority order
    pub fn modes(self) -> &'static [BackendId] {
        match self {
            Self::R1 => &[BackendId::R1],
            Self::R2 => &[BackendId::R2A, BackendId::R2, BackendId::R2_5],
            Self::R3 => &[BackendId::R3],
            Self::R4 => &[BackendId::R4],
        }
    }
}

impl fmt::Display for RenderModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.tier_id())
    }
}

/// A selectable renderer mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum BackendId {
    /// Baseline mode
    R1,
    /// Plain R2 mode
    R2,
    /// Reduced R2 variant
    R2A,
    /// Extended R2 variant, gated by its own capability check
    R2_5,
    /// R3 mode
    R3,
    /// R4 mode
    R4,
}

impl BackendId {
    /// All modes in priority order
    pub const ALL: [BackendId; 6] = [
        Self::R1,
        Self::R2A,
        Self::R2,
        Self::R2_5,
        Self::R3,
        Self::R4,
    ];

    /// Mode name used by the console and the video quality menu
    pub const fn mode_name(self) -> &'static str {
        match self {
            Self::R1 => "renderer_r1",
            Self::R2A => "renderer_r2a",
            Self::R2 => "renderer_r2",
            Self::R2_5 => "renderer_r2.5",
            Self::R3 => "renderer_r3",
            Self::R4 => "renderer_r4",
        }
    }

    /// Candidate priority; unique per mode
    pub const fn priority(self) -> i32 {
        match self {
            Self::R1 => 0,
            Self::R2A => 1,
            Self::R2 => 2,
            Self::R2_5 => 3,
            Self::R3 => 4,
            Self::R4 => 5,
        }
    }

    /// Module family that provides this mode
    pub const fn module(self) -> RenderModule {
        match self {
            Self::R1 => RenderModule::R1,
            Self::R2 | Self::R2A | Self::R2_5 => RenderModule::R2,
            Self::R3 => RenderModule::R3,
            Self::R4 => RenderModule::R4,
        }
    }

    /// Parse a full mode name (`renderer_r2.5`) or its short form (`r2.5`)
    pub fn from_mode_name(name: &str) -> Option<BackendId> {
        let name = name.trim().to_ascii_lowercase();
        let short = name.strip_prefix("renderer_").unwrap_or(&name);
        match short {
            "r1" => Some(Self::R1),
            "r2a" => Some(Self::R2A),
            "r2" => Some(Self::R2),
            "r2.5" => Some(Self::R2_5),
            "r3" => Some(Self::R3),
            "r4" => Some(Self::R4),
            _ => None,
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mode_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priorities_are_unique_and_ascending() {
        let priorities: Vec<i32> = BackendId::ALL.iter().map(|id| id.priority()).collect();
        assert_eq!(priorities, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_r2_group_maps_to_r2_module() {
        for id in RenderModule::R2.modes() {
            assert_eq!(id.module(), RenderModule::R2);
        }
        assert_eq!(BackendId::R4.module(), RenderModule::R4);
    }

    #[test]
    fn test_mode_name_parsing() {
        assert_eq!(BackendId::from_mode_name("renderer_r2.5"), Some(BackendId::R2_5));
        assert_eq!(BackendId::from_mode_name("R2A"), Some(BackendId::R2A));
        assert_eq!(BackendId::from_mode_name(" r4 "), Some(BackendId::R4));
        assert_eq!(BackendId::from_mode_name("renderer_gl"), None);

        for id in BackendId::ALL {
            assert_eq!(BackendId::from_mode_name(id.mode_name()), Some(id));
        }
    }

    #[test]
    fn test_demotion_chain_ends_at_baseline() {
        assert_eq!(RenderModule::R4.lower(), Some(RenderModule::R3));
        assert_eq!(RenderModule::R2.lower(), Some(RenderModule::R1));
        assert_eq!(RenderModule::R1.lower(), None);
    }

    #[test]
    fn test_only_upper_tiers_require_checks() {
        assert!(!RenderModule::R1.requires_capability_check());
        assert!(!RenderModule::R2.requires_capability_check());
        assert!(RenderModule::R3.requires_capability_check());
        assert!(RenderModule::R4.requires_capability_check());
    }
}
