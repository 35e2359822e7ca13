//! Registry and tick driver target for all active emitters.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use glam::DVec3;
use parking_lot::{Mutex, RwLock};

use crate::api::{ConfigError, EmitterConfig, EmitterId, ParticleConfig};
use crate::core::{Clock, ObjectPool};
use crate::emitter::{ActiveParticle, Emitter, EmitterAnchor, EmitterTarget};
use crate::math::Rng;
use crate::render::ParticleRenderer;

/// Owns the set of active emitters and drives their shared tick.
///
/// The surrounding application calls [`EmitterManager::tick`] at a roughly
/// fixed cadence (~20 Hz); the manager measures the actual wall-clock
/// delta between invocations rather than assuming a fixed step, so
/// scheduler jitter does not distort the simulation. A fault while
/// ticking one emitter is caught and logged without aborting the pass
/// for the others.
pub struct EmitterManager {
    renderer: Arc<dyn ParticleRenderer>,
    clock: Arc<dyn Clock>,
    pool: Arc<ObjectPool<ActiveParticle>>,
    emitters: RwLock<HashMap<EmitterId, Emitter>>,
    next_id: AtomicU64,
    seed: u64,
    last_tick: Mutex<Duration>,
    running: AtomicBool,
}

impl EmitterManager {
    /// Particle records cached across all emitters.
    pub const DEFAULT_POOL_CAPACITY: usize = 10_000;

    pub fn new(renderer: Arc<dyn ParticleRenderer>, clock: Arc<dyn Clock>) -> Self {
        Self::with_pool_capacity(renderer, clock, Self::DEFAULT_POOL_CAPACITY)
    }

    pub fn with_pool_capacity(
        renderer: Arc<dyn ParticleRenderer>,
        clock: Arc<dyn Clock>,
        pool_capacity: usize,
    ) -> Self {
        EmitterManager {
            renderer,
            clock,
            pool: Arc::new(ActiveParticle::pool(pool_capacity)),
            emitters: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            seed: 0x51ab_7e0d_9f23_c4b1,
            last_tick: Mutex::new(Duration::ZERO),
            running: AtomicBool::new(false),
        }
    }

    /// Fix the RNG seed base so emitter randomness replays exactly.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of active emitters.
    pub fn emitter_count(&self) -> usize {
        self.emitters.read().len()
    }

    /// Total live particles across all emitters.
    pub fn total_particle_count(&self) -> usize {
        self.emitters
            .read()
            .values()
            .map(Emitter::particle_count)
            .sum()
    }

    /// Begin accepting ticks. Resets the delta baseline so the first tick
    /// does not see the gap since construction.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        *self.last_tick.lock() = self.clock.now();
        log::debug!("emitter manager started");
    }

    /// Stop accepting ticks, stop and clear every emitter, drop the
    /// shared pool cache.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let mut emitters = self.emitters.write();
        for emitter in emitters.values_mut() {
            emitter.stop();
        }
        emitters.clear();
        self.pool.clear();
        log::debug!("emitter manager stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Create an emitter at a fixed world position.
    pub fn create_emitter_at(
        &self,
        location: DVec3,
        emitter_config: EmitterConfig,
        particle_config: ParticleConfig,
    ) -> Result<EmitterId, ConfigError> {
        self.insert_emitter(EmitterAnchor::Fixed(location), emitter_config, particle_config)
    }

    /// Create an emitter bound to a moving target.
    pub fn create_emitter_on(
        &self,
        target: Arc<dyn EmitterTarget>,
        emitter_config: EmitterConfig,
        particle_config: ParticleConfig,
    ) -> Result<EmitterId, ConfigError> {
        self.insert_emitter(EmitterAnchor::Target(target), emitter_config, particle_config)
    }

    fn insert_emitter(
        &self,
        anchor: EmitterAnchor,
        emitter_config: EmitterConfig,
        particle_config: ParticleConfig,
    ) -> Result<EmitterId, ConfigError> {
        let id = EmitterId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let emitter = Emitter::new(
            id,
            anchor,
            emitter_config,
            particle_config,
            Arc::clone(&self.renderer),
            Arc::clone(&self.pool),
            Rng::new(self.seed ^ id.0),
            self.clock.now(),
        )?;
        self.emitters.write().insert(id, emitter);
        Ok(id)
    }

    /// Stop and remove an emitter. Returns false when unknown.
    pub fn remove_emitter(&self, id: EmitterId) -> bool {
        match self.emitters.write().remove(&id) {
            Some(mut emitter) => {
                emitter.stop();
                true
            }
            None => false,
        }
    }

    pub fn has_emitter(&self, id: EmitterId) -> bool {
        self.emitters.read().contains_key(&id)
    }

    /// Read access to an emitter while holding the registry lock.
    pub fn with_emitter<R>(&self, id: EmitterId, f: impl FnOnce(&Emitter) -> R) -> Option<R> {
        self.emitters.read().get(&id).map(f)
    }

    /// Mutable access to an emitter while holding the registry lock.
    pub fn with_emitter_mut<R>(
        &self,
        id: EmitterId,
        f: impl FnOnce(&mut Emitter) -> R,
    ) -> Option<R> {
        self.emitters.write().get_mut(&id).map(f)
    }

    /// Advance the whole simulation by one tick. No-op until `start`.
    pub fn tick(&self) {
        if !self.is_running() {
            return;
        }

        let now = self.clock.now();
        let dt = {
            let mut last = self.last_tick.lock();
            let dt = now.saturating_sub(*last).as_secs_f64();
            *last = now;
            dt
        };

        let mut emitters = self.emitters.write();

        // Lazy cleanup of emitters that stopped themselves last tick.
        emitters.retain(|_, emitter| {
            if emitter.is_active() {
                true
            } else {
                emitter.stop();
                false
            }
        });

        for (id, emitter) in emitters.iter_mut() {
            let result = catch_unwind(AssertUnwindSafe(|| emitter.tick(now, dt)));
            if let Err(fault) = result {
                log::warn!("emitter {:?} tick failed: {}", id, describe_panic(&fault));
            }
        }
    }
}

impl std::fmt::Debug for EmitterManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitterManager")
            .field("emitters", &self.emitter_count())
            .field("running", &self.is_running())
            .finish()
    }
}

fn describe_panic(fault: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = fault.downcast_ref::<&str>() {
        message
    } else if let Some(message) = fault.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
