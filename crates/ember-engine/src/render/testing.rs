//! Recording renderer used by simulation tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};

use glam::DVec3;
use parking_lot::Mutex;

use crate::api::{ParticleConfig, RenderHandle, Viewer};
use crate::data::Color;
use crate::render::ParticleRenderer;

/// Renderer stub that hands out sequential handles and records calls.
#[derive(Default)]
pub struct RecordingRenderer {
    next_handle: AtomicI32,
    live: Mutex<HashSet<i32>>,
    updates: Mutex<Vec<(RenderHandle, DVec3, Color, f64)>>,
    spawn_calls: AtomicUsize,
    despawn_calls: AtomicUsize,
    fail_spawns: AtomicBool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent spawn report failure.
    pub fn fail_spawns(&self, fail: bool) {
        self.fail_spawns.store(fail, Ordering::Relaxed);
    }

    pub fn spawn_calls(&self) -> usize {
        self.spawn_calls.load(Ordering::Relaxed)
    }

    pub fn despawn_calls(&self) -> usize {
        self.despawn_calls.load(Ordering::Relaxed)
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().len()
    }

    pub fn last_update(&self) -> Option<(RenderHandle, DVec3, Color, f64)> {
        self.updates.lock().last().copied()
    }
}

impl ParticleRenderer for RecordingRenderer {
    fn spawn(&self, _location: DVec3, _config: &ParticleConfig, _viewers: &[Viewer]) -> RenderHandle {
        self.spawn_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_spawns.load(Ordering::Relaxed) {
            return RenderHandle::INVALID;
        }
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.live.lock().insert(handle);
        RenderHandle(handle)
    }

    fn update(&self, handle: RenderHandle, location: DVec3, color: Color, scale: f64) {
        self.updates.lock().push((handle, location, color, scale));
    }

    fn despawn(&self, handle: RenderHandle) {
        self.despawn_calls.fetch_add(1, Ordering::Relaxed);
        self.live.lock().remove(&handle.0);
    }

    fn despawn_all(&self) {
        let mut live = self.live.lock();
        self.despawn_calls.fetch_add(live.len(), Ordering::Relaxed);
        live.clear();
    }

    fn active_count(&self) -> usize {
        self.live.lock().len()
    }
}
