//! Hard caps on concurrently rendered particles, global and per-viewer.
//!
//! Counters are shared across all renderer instances, so they use atomic
//! increments. The global count tracks currently-spawned render handles;
//! it is not the sum of per-viewer counts, since a particle can be visible
//! to any subset of viewers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use glam::DVec3;
use parking_lot::RwLock;

use crate::api::{RenderHandle, Viewer, ViewerId};

/// Victim selection when a viewer's particle count exceeds its cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum BudgetStrategy {
    /// Keep particles closest to the viewer, evict the furthest.
    #[default]
    EvictFurthest,
    /// Keep the most recently spawned particles, evict the oldest.
    EvictOldest,
    /// Evict nothing; renderers fall back to a cheaper render path.
    FallbackCheap,
}

/// Configuration for particle budget limits.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BudgetConfig {
    /// Maximum particles visible to any single viewer.
    pub max_per_viewer: usize,
    /// Maximum particles across the whole process.
    pub max_global: usize,
    /// How to pick victims when a viewer is over budget.
    pub strategy: BudgetStrategy,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_per_viewer: 200,
            max_global: 2000,
            strategy: BudgetStrategy::EvictFurthest,
        }
    }
}

/// Snapshot of one live particle, fed to culling decisions.
#[derive(Debug, Clone)]
pub struct ParticleSnapshot {
    pub handle: RenderHandle,
    pub position: DVec3,
    pub viewers: Vec<ViewerId>,
    pub spawned_at: Duration,
}

/// Tracks live-particle counts and enforces the caps.
#[derive(Debug, Default)]
pub struct BudgetTracker {
    config: BudgetConfig,
    global: AtomicUsize,
    per_viewer: RwLock<HashMap<ViewerId, Arc<AtomicUsize>>>,
}

impl BudgetTracker {
    pub fn new(config: BudgetConfig) -> Self {
        BudgetTracker {
            config,
            global: AtomicUsize::new(0),
            per_viewer: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }

    /// Current number of spawned render handles process-wide.
    pub fn global_count(&self) -> usize {
        self.global.load(Ordering::Relaxed)
    }

    pub fn viewer_count(&self, viewer: ViewerId) -> usize {
        self.per_viewer
            .read()
            .get(&viewer)
            .map(|count| count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn remaining_global(&self) -> usize {
        self.config.max_global.saturating_sub(self.global_count())
    }

    pub fn remaining_for(&self, viewer: ViewerId) -> usize {
        self.config
            .max_per_viewer
            .saturating_sub(self.viewer_count(viewer))
    }

    /// True only if the global cap and every named viewer's cap have room.
    pub fn can_spawn(&self, viewers: &[ViewerId]) -> bool {
        if self.global_count() >= self.config.max_global {
            return false;
        }
        viewers
            .iter()
            .all(|viewer| self.viewer_count(*viewer) < self.config.max_per_viewer)
    }

    /// Record one accepted spawn. Must be paired with `record_despawn`.
    pub fn record_spawn(&self, viewers: &[ViewerId]) {
        self.global.fetch_add(1, Ordering::Relaxed);
        for viewer in viewers {
            self.counter_for(*viewer).fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Undo exactly one prior `record_spawn`.
    pub fn record_despawn(&self, viewers: &[ViewerId]) {
        saturating_decrement(&self.global);
        let map = self.per_viewer.read();
        for viewer in viewers {
            if let Some(count) = map.get(viewer) {
                saturating_decrement(count);
            }
        }
    }

    /// Pick handles to despawn for `viewer` only, per the configured
    /// strategy. Empty unless the viewer is over its cap.
    pub fn cull_victims(
        &self,
        particles: &[ParticleSnapshot],
        viewer: &Viewer,
    ) -> Vec<RenderHandle> {
        let excess = self
            .viewer_count(viewer.id)
            .saturating_sub(self.config.max_per_viewer);
        if excess == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<&ParticleSnapshot> = particles
            .iter()
            .filter(|snapshot| snapshot.viewers.contains(&viewer.id))
            .collect();

        match self.config.strategy {
            BudgetStrategy::EvictFurthest => {
                candidates.sort_by(|a, b| {
                    let da = a.position.distance_squared(viewer.position);
                    let db = b.position.distance_squared(viewer.position);
                    db.total_cmp(&da)
                });
            }
            BudgetStrategy::EvictOldest => {
                candidates.sort_by_key(|snapshot| snapshot.spawned_at);
            }
            BudgetStrategy::FallbackCheap => return Vec::new(),
        }

        candidates
            .into_iter()
            .take(excess)
            .map(|snapshot| snapshot.handle)
            .collect()
    }

    /// Drop tracking for a viewer (disconnect).
    pub fn remove_viewer(&self, viewer: ViewerId) {
        self.per_viewer.write().remove(&viewer);
    }

    /// Reset all counts.
    pub fn reset(&self) {
        self.global.store(0, Ordering::Relaxed);
        self.per_viewer.write().clear();
    }

    fn counter_for(&self, viewer: ViewerId) -> Arc<AtomicUsize> {
        if let Some(count) = self.per_viewer.read().get(&viewer) {
            return Arc::clone(count);
        }
        let mut map = self.per_viewer.write();
        Arc::clone(map.entry(viewer).or_default())
    }
}

fn saturating_decrement(counter: &AtomicUsize) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
        current.checked_sub(1)
    });
}
