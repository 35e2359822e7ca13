//! Particle emitters: spawn scheduling, per-particle physics integration,
//! lifecycle management.

pub mod manager;
pub mod shape;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use glam::DVec3;

use crate::api::{ConfigError, EmitterConfig, EmitterId, EmitterKind, ParticleConfig, RenderHandle, Viewer};
use crate::core::ObjectPool;
use crate::math::Rng;
use crate::render::ParticleRenderer;

pub use manager::EmitterManager;
pub use shape::sample_point;

/// Something a trail/continuous emitter can be bound to: supplies a moving
/// position and a validity flag. Once invalid, the emitter stops itself.
pub trait EmitterTarget: Send + Sync {
    fn position(&self) -> DVec3;

    fn is_valid(&self) -> bool {
        true
    }
}

/// Where an emitter sits in the world.
#[derive(Clone)]
pub enum EmitterAnchor {
    /// Fixed world position.
    Fixed(DVec3),
    /// Bound to a moving target.
    Target(Arc<dyn EmitterTarget>),
}

impl EmitterAnchor {
    pub fn position(&self) -> DVec3 {
        match self {
            EmitterAnchor::Fixed(position) => *position,
            EmitterAnchor::Target(target) => target.position(),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            EmitterAnchor::Fixed(_) => true,
            EmitterAnchor::Target(target) => target.is_valid(),
        }
    }
}

impl std::fmt::Debug for EmitterAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmitterAnchor::Fixed(position) => f.debug_tuple("Fixed").field(position).finish(),
            EmitterAnchor::Target(target) => {
                f.debug_tuple("Target").field(&target.position()).finish()
            }
        }
    }
}

/// Mutable runtime record for one live particle. Owned exclusively by the
/// emitter that spawned it; recycled through the pool on expiry and never
/// referenced after release.
#[derive(Debug, Clone)]
pub struct ActiveParticle {
    pub handle: RenderHandle,
    pub config: Arc<ParticleConfig>,
    pub spawn_time: Duration,
    pub lifetime: Duration,
    pub position: DVec3,
    pub velocity: DVec3,
}

impl Default for ActiveParticle {
    fn default() -> Self {
        ActiveParticle {
            handle: RenderHandle::INVALID,
            config: Arc::new(ParticleConfig::default()),
            spawn_time: Duration::ZERO,
            lifetime: Duration::ZERO,
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
        }
    }
}

impl ActiveParticle {
    /// Build a pool of recyclable particle records. Reset only clears the
    /// handle; every other field is overwritten on spawn.
    pub fn pool(max_size: usize) -> ObjectPool<ActiveParticle> {
        ObjectPool::new(ActiveParticle::default, |particle| {
            particle.handle = RenderHandle::INVALID;
        }, max_size)
    }
}

/// A source that spawns and owns a set of particles per its configuration.
///
/// State machine: Active (spawning/updating) until an explicit stop, an
/// elapsed finite duration, or loss of the bound target, after which the
/// emitter is Stopped — terminal, every particle released and despawned,
/// further ticks are no-ops.
pub struct Emitter {
    id: EmitterId,
    emitter_config: EmitterConfig,
    particle_config: Arc<ParticleConfig>,
    anchor: EmitterAnchor,
    renderer: Arc<dyn ParticleRenderer>,
    pool: Arc<ObjectPool<ActiveParticle>>,
    rng: Rng,
    particles: HashMap<RenderHandle, ActiveParticle>,
    viewers: Vec<Viewer>,
    active: bool,
    created_at: Duration,
    /// Spawn interval derived once from the configured rate.
    spawn_interval: Duration,
    last_spawn: Option<Duration>,
    burst_fired: bool,
    last_anchor_position: Option<DVec3>,
}

impl Emitter {
    /// Validate both configs and build an emitter. Invalid configuration
    /// is fatal here; nothing later re-checks it.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EmitterId,
        anchor: EmitterAnchor,
        emitter_config: EmitterConfig,
        particle_config: ParticleConfig,
        renderer: Arc<dyn ParticleRenderer>,
        pool: Arc<ObjectPool<ActiveParticle>>,
        rng: Rng,
        created_at: Duration,
    ) -> Result<Self, ConfigError> {
        emitter_config.validate()?;
        particle_config.validate()?;
        let spawn_interval = Duration::from_secs_f64(1.0 / emitter_config.rate);
        Ok(Emitter {
            id,
            emitter_config,
            particle_config: Arc::new(particle_config),
            anchor,
            renderer,
            pool,
            rng,
            particles: HashMap::new(),
            viewers: Vec::new(),
            active: true,
            created_at,
            spawn_interval,
            last_spawn: None,
            burst_fired: false,
            last_anchor_position: None,
        })
    }

    pub fn id(&self) -> EmitterId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn created_at(&self) -> Duration {
        self.created_at
    }

    /// Current emitter center (anchor position).
    pub fn position(&self) -> DVec3 {
        self.anchor.position()
    }

    pub fn emitter_config(&self) -> &EmitterConfig {
        &self.emitter_config
    }

    pub fn particle_config(&self) -> &ParticleConfig {
        &self.particle_config
    }

    /// Viewers forwarded to the renderer on spawn. Empty means the
    /// renderer decides who sees the particle.
    pub fn set_viewers(&mut self, viewers: Vec<Viewer>) {
        self.viewers = viewers;
    }

    pub fn viewers(&self) -> &[Viewer] {
        &self.viewers
    }

    /// Advance the emitter by one tick. `now` is the monotonic timestamp
    /// supplied by the driver, `dt` the elapsed seconds since last tick.
    pub fn tick(&mut self, now: Duration, dt: f64) {
        if !self.active {
            return;
        }
        if !self.anchor.is_valid() {
            self.stop();
            return;
        }

        let duration = self.emitter_config.duration;
        if duration > 0.0 && (now - self.created_at).as_secs_f64() >= duration {
            self.stop();
            return;
        }

        match self.emitter_config.kind {
            EmitterKind::Continuous => self.tick_continuous(now),
            EmitterKind::Burst => self.tick_burst(now),
            EmitterKind::Trail => self.tick_trail(now),
        }

        self.update_particles(now, dt);
    }

    /// Stop the emitter and despawn all particles. Terminal.
    pub fn stop(&mut self) {
        self.active = false;
        for (handle, particle) in self.particles.drain() {
            self.pool.release(particle);
            self.renderer.despawn(handle);
        }
    }

    fn tick_continuous(&mut self, now: Duration) {
        let due = match self.last_spawn {
            Some(last) => now.saturating_sub(last) >= self.spawn_interval,
            None => true,
        };
        if due {
            let point = self.shape_spawn_point();
            self.spawn_particle(now, point);
            self.last_spawn = Some(now);
        }
    }

    fn tick_burst(&mut self, now: Duration) {
        if self.burst_fired {
            return;
        }
        for _ in 0..self.emitter_config.burst_count {
            let point = self.shape_spawn_point();
            self.spawn_particle(now, point);
        }
        self.burst_fired = true;
    }

    fn tick_trail(&mut self, now: Duration) {
        let current = self.anchor.position();
        if let Some(last) = self.last_anchor_position {
            // Squared comparison; no square root on the hot path.
            let threshold = self.emitter_config.movement_threshold;
            if current.distance_squared(last) >= threshold * threshold {
                let point = self.shape_spawn_point();
                self.spawn_particle(now, point);
            }
        }
        self.last_anchor_position = Some(current);
    }

    fn shape_spawn_point(&mut self) -> DVec3 {
        shape::sample_point(&self.emitter_config.shape, self.anchor.position(), &mut self.rng)
    }

    /// Spawn one particle at `spawn_point`. A renderer spawn failure
    /// (invalid handle) abandons the spawn: nothing tracked, no pool slot
    /// held.
    fn spawn_particle(&mut self, now: Duration, spawn_point: DVec3) -> Option<RenderHandle> {
        if self.particles.len() >= self.emitter_config.max_particles as usize {
            return None;
        }

        let lifetime = self.particle_config.lifetime.sample(&mut self.rng).max(0.0);
        let mut velocity = self.particle_config.velocity.sample(&mut self.rng);

        let radial = self.particle_config.radial_velocity;
        if radial != 0.0 {
            let offset = spawn_point - self.anchor.position();
            // Spawn at (or near) the center gives no meaningful direction;
            // fall back to a random one.
            let direction = if offset.length_squared() > 1e-4 {
                offset.normalize()
            } else {
                self.rng.next_unit_vector()
            };
            velocity += direction * radial;
        }

        let handle = self
            .renderer
            .spawn(spawn_point, &self.particle_config, &self.viewers);
        if !handle.is_valid() {
            return None;
        }

        let mut particle = self.pool.acquire();
        particle.handle = handle;
        particle.config = Arc::clone(&self.particle_config);
        particle.spawn_time = now;
        particle.lifetime = Duration::from_secs_f64(lifetime);
        particle.position = spawn_point;
        particle.velocity = velocity;
        self.particles.insert(handle, particle);

        Some(handle)
    }

    /// Integrate physics and push visual updates, then run the removal
    /// pass so the live set is never mutated mid-iteration.
    fn update_particles(&mut self, now: Duration, dt: f64) {
        let mut expired: Vec<RenderHandle> = Vec::new();

        let gravity_y = self.particle_config.gravity.y;
        // (1 - drag*dt) can go negative for large dt, inverting velocity.
        // That matches the configured cheap approximation; it is not
        // clamped here.
        let drag = 1.0 - self.particle_config.drag * dt;

        for particle in self.particles.values_mut() {
            let age = now.saturating_sub(particle.spawn_time);
            if age >= particle.lifetime {
                expired.push(particle.handle);
                continue;
            }
            let progress = (age.as_secs_f64() / particle.lifetime.as_secs_f64()).clamp(0.0, 1.0);

            particle.velocity.y += gravity_y * dt;
            particle.velocity *= drag;
            particle.position += particle.velocity * dt;

            let color = self.particle_config.color.sample(progress, &mut self.rng);
            let scale = self.particle_config.scale.evaluate(progress);
            self.renderer
                .update(particle.handle, particle.position, color, scale);
        }

        for handle in expired {
            if let Some(particle) = self.particles.remove(&handle) {
                self.pool.release(particle);
            }
            self.renderer.despawn(handle);
        }
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("id", &self.id)
            .field("kind", &self.emitter_config.kind)
            .field("active", &self.active)
            .field("particles", &self.particles.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EmitterShape;
    use crate::data::{ColorRange, ScalarGradient, ValueRange, VectorRange};
    use crate::data::Color;
    use crate::render::testing::RecordingRenderer;

    struct Fixture {
        renderer: Arc<RecordingRenderer>,
        pool: Arc<ObjectPool<ActiveParticle>>,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                renderer: Arc::new(RecordingRenderer::new()),
                pool: Arc::new(ActiveParticle::pool(1000)),
            }
        }

        fn emitter(&self, emitter_config: EmitterConfig, particle_config: ParticleConfig) -> Emitter {
            self.emitter_at(EmitterAnchor::Fixed(DVec3::ZERO), emitter_config, particle_config)
        }

        fn emitter_at(
            &self,
            anchor: EmitterAnchor,
            emitter_config: EmitterConfig,
            particle_config: ParticleConfig,
        ) -> Emitter {
            Emitter::new(
                EmitterId(1),
                anchor,
                emitter_config,
                particle_config,
                self.renderer.clone() as Arc<dyn ParticleRenderer>,
                Arc::clone(&self.pool),
                Rng::new(42),
                Duration::ZERO,
            )
            .unwrap()
        }
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let fx = Fixture::new();
        let result = Emitter::new(
            EmitterId(1),
            EmitterAnchor::Fixed(DVec3::ZERO),
            EmitterConfig::new().with_rate(-2.0),
            ParticleConfig::default(),
            fx.renderer.clone() as Arc<dyn ParticleRenderer>,
            Arc::clone(&fx.pool),
            Rng::new(1),
            Duration::ZERO,
        );
        assert!(result.is_err());
    }

    #[test]
    fn continuous_rate_spawns_expected_count() {
        let fx = Fixture::new();
        let mut emitter = fx.emitter(
            EmitterConfig::new().with_rate(10.0),
            ParticleConfig::new().with_lifetime(ValueRange::Constant(10.0)),
        );
        // 20 ticks of 50ms = 1 simulated second at 10/s.
        for i in 0..20 {
            emitter.tick(secs(i as f64 * 0.05), 0.05);
        }
        let spawned = fx.renderer.spawn_calls();
        assert!((9..=11).contains(&spawned), "spawned {}", spawned);
    }

    #[test]
    fn burst_spawns_once() {
        let fx = Fixture::new();
        let mut emitter = fx.emitter(
            EmitterConfig::new()
                .with_kind(EmitterKind::Burst)
                .with_burst_count(50),
            ParticleConfig::new().with_lifetime(ValueRange::Constant(10.0)),
        );
        emitter.tick(secs(0.0), 0.05);
        assert_eq!(emitter.particle_count(), 50);
        emitter.tick(secs(0.05), 0.05);
        emitter.tick(secs(0.10), 0.05);
        assert_eq!(fx.renderer.spawn_calls(), 50);
    }

    #[test]
    fn burst_respects_max_particle_cap() {
        let fx = Fixture::new();
        let mut emitter = fx.emitter(
            EmitterConfig::new()
                .with_kind(EmitterKind::Burst)
                .with_burst_count(100)
                .with_max_particles(30),
            ParticleConfig::new().with_lifetime(ValueRange::Constant(10.0)),
        );
        emitter.tick(secs(0.0), 0.05);
        assert_eq!(emitter.particle_count(), 30);
    }

    #[test]
    fn duration_expiry_stops_and_clears() {
        let fx = Fixture::new();
        let mut emitter = fx.emitter(
            EmitterConfig::new().with_rate(20.0).with_duration(2.0),
            ParticleConfig::new().with_lifetime(ValueRange::Constant(10.0)),
        );
        let mut now = 0.0;
        while now < 2.5 {
            emitter.tick(secs(now), 0.05);
            now += 0.05;
        }
        assert!(!emitter.is_active());
        assert_eq!(emitter.particle_count(), 0);
        assert_eq!(fx.renderer.active_count(), 0);
    }

    #[test]
    fn particle_expires_at_lifetime() {
        let fx = Fixture::new();
        let mut emitter = fx.emitter(
            EmitterConfig::new()
                .with_kind(EmitterKind::Burst)
                .with_burst_count(1),
            ParticleConfig::new()
                .with_lifetime(ValueRange::Constant(1.0))
                .with_gravity(DVec3::ZERO),
        );
        emitter.tick(secs(0.0), 0.05);
        assert_eq!(emitter.particle_count(), 1);

        emitter.tick(secs(0.99), 0.05);
        assert_eq!(emitter.particle_count(), 1, "present at age 0.99");

        emitter.tick(secs(1.0), 0.05);
        assert_eq!(emitter.particle_count(), 0, "released at age 1.0");
        assert_eq!(fx.renderer.despawn_calls(), 1);
        // Pool got the record back.
        assert_eq!(fx.pool.size(), 1);
    }

    #[test]
    fn physics_integration_applies_gravity_drag_and_euler_step() {
        let fx = Fixture::new();
        let mut emitter = fx.emitter(
            EmitterConfig::new()
                .with_kind(EmitterKind::Burst)
                .with_burst_count(1),
            ParticleConfig::new()
                .with_lifetime(ValueRange::Constant(10.0))
                .with_velocity(VectorRange::Constant(DVec3::new(2.0, 0.0, 0.0)))
                .with_gravity(DVec3::new(0.0, -10.0, 0.0))
                .with_drag(0.5),
        );
        emitter.tick(secs(0.0), 0.0);
        // One 0.1s step: vy = -10*0.1 = -1.0, then drag (1 - 0.5*0.1) = 0.95
        // vx = 2*0.95 = 1.9, vy = -0.95; position = velocity * 0.1.
        emitter.tick(secs(0.1), 0.1);
        let (_, position, _, _) = fx.renderer.last_update().unwrap();
        assert!((position.x - 0.19).abs() < 1e-9, "x {}", position.x);
        assert!((position.y + 0.095).abs() < 1e-9, "y {}", position.y);
    }

    #[test]
    fn visual_update_samples_color_and_scale_by_progress() {
        let fx = Fixture::new();
        let mut emitter = fx.emitter(
            EmitterConfig::new()
                .with_kind(EmitterKind::Burst)
                .with_burst_count(1),
            ParticleConfig::new()
                .with_lifetime(ValueRange::Constant(2.0))
                .with_gravity(DVec3::ZERO)
                .with_color(ColorRange::Animated(crate::data::ColorGradient::between(
                    Color::BLACK,
                    Color::WHITE,
                )))
                .with_scale(ScalarGradient::between(1.0, 3.0)),
        );
        emitter.tick(secs(0.0), 0.0);
        emitter.tick(secs(1.0), 0.05);
        let (_, _, color, scale) = fx.renderer.last_update().unwrap();
        assert!((color.r - 0.5).abs() < 1e-9);
        assert!((scale - 2.0).abs() < 1e-9);
    }

    #[test]
    fn renderer_spawn_failure_is_absorbed() {
        let fx = Fixture::new();
        fx.renderer.fail_spawns(true);
        let mut emitter = fx.emitter(
            EmitterConfig::new()
                .with_kind(EmitterKind::Burst)
                .with_burst_count(10),
            ParticleConfig::default(),
        );
        emitter.tick(secs(0.0), 0.05);
        assert_eq!(emitter.particle_count(), 0);
        assert_eq!(fx.pool.size(), 0, "no pool slot held for failed spawns");
        assert!(emitter.is_active());
    }

    #[test]
    fn radial_velocity_points_outward_from_center() {
        let fx = Fixture::new();
        let mut emitter = fx.emitter(
            EmitterConfig::new()
                .with_kind(EmitterKind::Burst)
                .with_burst_count(1)
                .with_shape(EmitterShape::Sphere { radius: 2.0 }),
            ParticleConfig::new()
                .with_lifetime(ValueRange::Constant(10.0))
                .with_gravity(DVec3::ZERO)
                .with_radial_velocity(5.0),
        );
        emitter.tick(secs(0.0), 0.0);
        let spawn_offset = {
            let particle = emitter.particles.values().next().unwrap();
            (particle.position, particle.velocity)
        };
        let (position, velocity) = spawn_offset;
        // Velocity is the outward direction scaled by the magnitude.
        let outward = position.normalize();
        assert!((velocity - outward * 5.0).length() < 1e-9);
    }

    #[test]
    fn trail_spawns_on_movement_threshold() {
        use parking_lot::Mutex;

        struct MovingTarget {
            position: Mutex<DVec3>,
        }
        impl EmitterTarget for MovingTarget {
            fn position(&self) -> DVec3 {
                *self.position.lock()
            }
        }

        let fx = Fixture::new();
        let target = Arc::new(MovingTarget {
            position: Mutex::new(DVec3::ZERO),
        });
        let mut emitter = fx.emitter_at(
            EmitterAnchor::Target(Arc::clone(&target) as Arc<dyn EmitterTarget>),
            EmitterConfig::new()
                .with_kind(EmitterKind::Trail)
                .with_movement_threshold(1.0),
            ParticleConfig::new().with_lifetime(ValueRange::Constant(10.0)),
        );

        // First tick records the reference position.
        emitter.tick(secs(0.0), 0.05);
        assert_eq!(emitter.particle_count(), 0);

        // Small move: below threshold, no spawn.
        *target.position.lock() = DVec3::new(0.5, 0.0, 0.0);
        emitter.tick(secs(0.05), 0.05);
        assert_eq!(emitter.particle_count(), 0);

        // Moved a full unit since the last tick: spawn.
        *target.position.lock() = DVec3::new(1.5, 0.0, 0.0);
        emitter.tick(secs(0.10), 0.05);
        assert_eq!(emitter.particle_count(), 1);
    }

    #[test]
    fn invalid_target_stops_emitter() {
        struct DeadTarget;
        impl EmitterTarget for DeadTarget {
            fn position(&self) -> DVec3 {
                DVec3::ZERO
            }
            fn is_valid(&self) -> bool {
                false
            }
        }

        let fx = Fixture::new();
        let mut emitter = fx.emitter_at(
            EmitterAnchor::Target(Arc::new(DeadTarget)),
            EmitterConfig::new(),
            ParticleConfig::default(),
        );
        emitter.tick(secs(0.0), 0.05);
        assert!(!emitter.is_active());
    }

    #[test]
    fn stop_is_terminal() {
        let fx = Fixture::new();
        let mut emitter = fx.emitter(
            EmitterConfig::new().with_rate(100.0),
            ParticleConfig::new().with_lifetime(ValueRange::Constant(10.0)),
        );
        emitter.tick(secs(0.0), 0.05);
        assert!(emitter.particle_count() > 0);

        emitter.stop();
        assert!(!emitter.is_active());
        assert_eq!(emitter.particle_count(), 0);
        assert_eq!(fx.renderer.active_count(), 0);

        // Further ticks are no-ops.
        let spawned = fx.renderer.spawn_calls();
        emitter.tick(secs(1.0), 0.05);
        assert_eq!(fx.renderer.spawn_calls(), spawned);
    }
}
