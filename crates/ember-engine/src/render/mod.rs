//! The rendering boundary: the abstract contract the simulation calls to
//! materialize, update and destroy visual proxies, plus the cross-cutting
//! visibility and budget policies consumed by renderer implementations.

pub mod budget;
pub mod lod;

#[cfg(test)]
pub(crate) mod testing;

use glam::DVec3;

use crate::api::{ParticleConfig, RenderHandle, Viewer};
use crate::data::Color;

pub use budget::{BudgetConfig, BudgetStrategy, BudgetTracker, ParticleSnapshot};
pub use lod::{CullingConfig, VisibilityCuller, VisibilityLevel};

/// Contract for materializing particle proxies. Implementations are
/// external collaborators; the simulation treats every call as
/// fire-and-forget and never assumes how a handle is backed.
pub trait ParticleRenderer: Send + Sync {
    /// Materialize a proxy at `location` for the given viewers.
    /// Returns [`RenderHandle::INVALID`] (or any negative handle) on
    /// failure; the caller abandons the spawn silently.
    fn spawn(&self, location: DVec3, config: &ParticleConfig, viewers: &[Viewer]) -> RenderHandle;

    /// Move and restyle an existing proxy. Best effort, no feedback.
    fn update(&self, handle: RenderHandle, location: DVec3, color: Color, scale: f64);

    /// Destroy a proxy.
    fn despawn(&self, handle: RenderHandle);

    /// Destroy every proxy this renderer manages.
    fn despawn_all(&self);

    /// Number of currently materialized proxies.
    fn active_count(&self) -> usize;

    /// Distance-based quality level for a particle location:
    /// 0 = full quality, [`LodConfig::HIDDEN`] = not rendered.
    fn calculate_lod(&self, location: DVec3, nearest_viewer: Option<&Viewer>) -> usize {
        LodConfig::default().level_for(location, nearest_viewer)
    }
}

/// Distance thresholds and per-level degradation applied by renderers.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LodConfig {
    pub enabled: bool,
    /// Distance thresholds for each LOD level, in world units.
    pub thresholds: [f64; 4],
    /// Render every n-th update at each level (1 = every tick).
    pub update_skip: [u32; 4],
    /// Scale multiplier at each level.
    pub scale_multiplier: [f64; 4],
}

impl LodConfig {
    /// Highest quality-reduction level that is still rendered.
    pub const MAX_LEVEL: usize = 3;
    /// Sentinel level: beyond the last threshold; nothing is rendered.
    pub const HIDDEN: usize = 4;

    /// Bucket `location` into a LOD level relative to the nearest viewer.
    /// With no viewer at all there is nobody to render to.
    pub fn level_for(&self, location: DVec3, nearest_viewer: Option<&Viewer>) -> usize {
        if !self.enabled {
            return 0;
        }
        let Some(viewer) = nearest_viewer else {
            return Self::HIDDEN;
        };
        let distance = viewer.position.distance(location);
        self.thresholds
            .iter()
            .position(|&threshold| distance < threshold)
            .unwrap_or(Self::HIDDEN)
    }

    /// Whether an update at `tick_index` should be rendered at `level`.
    pub fn should_update(&self, level: usize, tick_index: u64) -> bool {
        if level >= Self::HIDDEN {
            return false;
        }
        let skip = self.update_skip[level].max(1) as u64;
        tick_index % skip == 0
    }

    /// Scale shrink applied at `level`; hidden levels collapse to zero.
    pub fn scale_for(&self, level: usize) -> f64 {
        if level >= Self::HIDDEN {
            0.0
        } else {
            self.scale_multiplier[level]
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            thresholds: [16.0, 32.0, 48.0, 64.0],
            update_skip: [1, 2, 4, 8],
            scale_multiplier: [1.0, 0.8, 0.6, 0.4],
        }
    }
}
