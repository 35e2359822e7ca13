//! Per-viewer distance culling with density degradation.

use glam::DVec3;

use crate::api::Viewer;

/// Distance-based visibility bucket for a viewer looking at a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VisibilityLevel {
    /// Full quality, every update rendered.
    Full,
    /// Half density, every other update.
    Reduced,
    /// Quarter density, every fourth update.
    Minimal,
    /// Out of range, nothing rendered for this viewer.
    Hidden,
}

impl VisibilityLevel {
    /// Fraction of spawns actually shown to a viewer at this level.
    pub fn density_multiplier(self) -> f64 {
        match self {
            VisibilityLevel::Full => 1.0,
            VisibilityLevel::Reduced => 0.5,
            VisibilityLevel::Minimal => 0.25,
            VisibilityLevel::Hidden => 0.0,
        }
    }

    /// Render every n-th update at this level.
    pub fn update_skip(self) -> u32 {
        match self {
            VisibilityLevel::Full => 1,
            VisibilityLevel::Reduced => 2,
            VisibilityLevel::Minimal => 4,
            VisibilityLevel::Hidden => u32::MAX,
        }
    }
}

/// Distance thresholds for the visibility buckets, in world units.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CullingConfig {
    /// Below this distance: full quality.
    pub full_range: f64,
    /// Below this distance: reduced quality.
    pub reduced_range: f64,
    /// Below this distance: minimal quality; beyond it, hidden.
    pub minimal_range: f64,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            full_range: 16.0,
            reduced_range: 32.0,
            minimal_range: 64.0,
        }
    }
}

/// Buckets viewers by their distance to a particle location.
#[derive(Debug, Clone, Default)]
pub struct VisibilityCuller {
    config: CullingConfig,
}

impl VisibilityCuller {
    pub fn new(config: CullingConfig) -> Self {
        VisibilityCuller { config }
    }

    /// Visibility bucket for one viewer.
    pub fn level_for(&self, viewer: &Viewer, location: DVec3) -> VisibilityLevel {
        let distance = viewer.position.distance(location);
        if distance < self.config.full_range {
            VisibilityLevel::Full
        } else if distance < self.config.reduced_range {
            VisibilityLevel::Reduced
        } else if distance < self.config.minimal_range {
            VisibilityLevel::Minimal
        } else {
            VisibilityLevel::Hidden
        }
    }

    /// Keep only viewers that should see the particle at all, paired with
    /// their visibility level.
    pub fn filter_viewers(
        &self,
        location: DVec3,
        viewers: &[Viewer],
    ) -> Vec<(Viewer, VisibilityLevel)> {
        viewers
            .iter()
            .map(|viewer| (*viewer, self.level_for(viewer, location)))
            .filter(|(_, level)| *level != VisibilityLevel::Hidden)
            .collect()
    }

    /// Stochastic density gate: with `random` uniform in [0, 1), decide
    /// whether a freshly spawned particle is shown to this viewer.
    pub fn should_spawn_for_viewer(&self, viewer: &Viewer, location: DVec3, random: f64) -> bool {
        random < self.level_for(viewer, location).density_multiplier()
    }
}
