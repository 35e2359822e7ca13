use glam::DVec3;

use crate::api::error::ConfigError;
use crate::data::{ColorRange, ScalarGradient, ValueRange, VectorRange};

/// How an emitter releases particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum EmitterKind {
    /// Emit one particle every `1/rate` seconds.
    #[default]
    Continuous,
    /// Emit `burst_count` particles on the first tick, then nothing.
    Burst,
    /// Emit whenever the bound target moves past the movement threshold.
    /// Only meaningful for target-bound emitters.
    Trail,
}

/// Shape from which spawn points are sampled, relative to the emitter
/// center. All dimensions are validated through [`EmitterShape::validate`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum EmitterShape {
    /// Single point: every particle spawns at the center.
    Point,
    /// Sphere surface.
    Sphere { radius: f64 },
    /// Sphere volume (volume-uniform sampling).
    SphereFilled { radius: f64 },
    /// Planar disc with an orientation normal.
    Circle { radius: f64, normal: DVec3 },
    /// Axis-aligned box volume centered on the emitter.
    Box { width: f64, height: f64, depth: f64 },
    /// Segment between two endpoints (offsets from the center).
    Line { start: DVec3, end: DVec3 },
    /// Cone opening upward from the center (fire, jets).
    Cone { radius: f64, height: f64, angle: f64 },
}

impl EmitterShape {
    pub fn circle(radius: f64) -> Self {
        EmitterShape::Circle {
            radius,
            normal: DVec3::Y,
        }
    }

    /// Check all shape dimensions. Exhaustive by construction: adding a
    /// variant forces this match to be revisited.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |shape, dimension, value: f64| {
            if value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::NonPositiveShapeDimension {
                    shape,
                    dimension,
                    value,
                })
            }
        };
        match *self {
            EmitterShape::Point => Ok(()),
            EmitterShape::Sphere { radius } => positive("sphere", "radius", radius),
            EmitterShape::SphereFilled { radius } => positive("sphere", "radius", radius),
            EmitterShape::Circle { radius, .. } => positive("circle", "radius", radius),
            EmitterShape::Box {
                width,
                height,
                depth,
            } => {
                positive("box", "width", width)?;
                positive("box", "height", height)?;
                positive("box", "depth", depth)
            }
            EmitterShape::Line { start, end } => {
                if start == end {
                    Err(ConfigError::DegenerateLine)
                } else {
                    Ok(())
                }
            }
            EmitterShape::Cone {
                radius,
                height,
                angle,
            } => {
                positive("cone", "radius", radius)?;
                positive("cone", "height", height)?;
                if (0.0..=90.0).contains(&angle) {
                    Ok(())
                } else {
                    Err(ConfigError::ConeAngleOutOfRange(angle))
                }
            }
        }
    }
}

impl Default for EmitterShape {
    fn default() -> Self {
        EmitterShape::Point
    }
}

/// Configuration for emitter behavior.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EmitterConfig {
    /// Emission mode.
    pub kind: EmitterKind,
    /// Particles per second (Continuous mode).
    pub rate: f64,
    /// Particles per burst (Burst mode).
    pub burst_count: u32,
    /// Shape from which spawn points are sampled.
    pub shape: EmitterShape,
    /// Maximum concurrently live particles for this emitter.
    pub max_particles: u32,
    /// Simulation ticks per second the host is expected to drive.
    pub tick_rate: u32,
    /// Emitter lifetime in seconds (0 = infinite).
    pub duration: f64,
    /// Minimum movement distance that triggers a Trail spawn.
    pub movement_threshold: f64,
}

impl EmitterConfig {
    pub const DEFAULT_RATE: f64 = 10.0;
    pub const DEFAULT_BURST_COUNT: u32 = 100;
    pub const DEFAULT_MAX_PARTICLES: u32 = 1000;
    pub const DEFAULT_TICK_RATE: u32 = 20;
    pub const DEFAULT_MOVEMENT_THRESHOLD: f64 = 0.1;

    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_kind(mut self, kind: EmitterKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_burst_count(mut self, count: u32) -> Self {
        self.burst_count = count;
        self
    }

    pub fn with_shape(mut self, shape: EmitterShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_max_particles(mut self, max: u32) -> Self {
        self.max_particles = max;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_movement_threshold(mut self, threshold: f64) -> Self {
        self.movement_threshold = threshold;
        self
    }

    /// Validate every numeric invariant. Called when an emitter is
    /// constructed; any violation is fatal, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate <= 0.0 {
            return Err(ConfigError::NonPositiveRate(self.rate));
        }
        if self.burst_count == 0 {
            return Err(ConfigError::NonPositiveBurstCount(self.burst_count));
        }
        if self.max_particles == 0 {
            return Err(ConfigError::NonPositiveMaxParticles(self.max_particles));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::NonPositiveTickRate(self.tick_rate));
        }
        if self.duration < 0.0 {
            return Err(ConfigError::NegativeDuration(self.duration));
        }
        if self.movement_threshold <= 0.0 {
            return Err(ConfigError::NonPositiveMovementThreshold(
                self.movement_threshold,
            ));
        }
        self.shape.validate()
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            kind: EmitterKind::Continuous,
            rate: Self::DEFAULT_RATE,
            burst_count: Self::DEFAULT_BURST_COUNT,
            shape: EmitterShape::Point,
            max_particles: Self::DEFAULT_MAX_PARTICLES,
            tick_rate: Self::DEFAULT_TICK_RATE,
            duration: 0.0,
            movement_threshold: Self::DEFAULT_MOVEMENT_THRESHOLD,
        }
    }
}

/// Billboard rendering mode hint for the renderer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum BillboardMode {
    /// Face camera center.
    #[default]
    Center,
    /// Face camera with fixed vertical axis.
    Vertical,
    /// Face camera with fixed horizontal axis.
    Horizontal,
    /// No billboarding.
    Fixed,
}

/// Configuration for individual particle behavior.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParticleConfig {
    /// Particle lifetime in seconds.
    pub lifetime: ValueRange,
    /// Color over lifetime.
    pub color: ColorRange,
    /// Scale over lifetime.
    pub scale: ScalarGradient,
    /// Initial velocity.
    pub velocity: VectorRange,
    /// Constant gravity acceleration. Only the vertical component is
    /// applied during integration.
    pub gravity: DVec3,
    /// Air resistance coefficient in [0, 1]. Applied per tick as
    /// `velocity * (1 - drag * dt)`; when `drag * dt` exceeds 1 the
    /// velocity sign inverts. That is the intended cheap approximation,
    /// not clamped away.
    pub drag: f64,
    /// Rotation speed over lifetime (radians/second).
    pub rotation: ValueRange,
    /// Billboard mode hint.
    pub billboard: BillboardMode,
    /// Optional texture token for the renderer.
    pub texture: Option<String>,
    /// Extra velocity magnitude directed from the emitter center toward
    /// the spawn point (outward burst).
    pub radial_velocity: f64,
}

impl ParticleConfig {
    /// Standard Earth gravity vector.
    pub const EARTH_GRAVITY: DVec3 = DVec3::new(0.0, -9.8, 0.0);
    /// No gravity (space/floating effects).
    pub const NO_GRAVITY: DVec3 = DVec3::ZERO;

    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_lifetime(mut self, lifetime: ValueRange) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_color(mut self, color: ColorRange) -> Self {
        self.color = color;
        self
    }

    pub fn with_scale(mut self, scale: ScalarGradient) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_velocity(mut self, velocity: VectorRange) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_gravity(mut self, gravity: DVec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_rotation(mut self, rotation: ValueRange) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_billboard(mut self, billboard: BillboardMode) -> Self {
        self.billboard = billboard;
        self
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    pub fn with_radial_velocity(mut self, magnitude: f64) -> Self {
        self.radial_velocity = magnitude;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.drag) {
            return Err(ConfigError::DragOutOfRange(self.drag));
        }
        Ok(())
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            lifetime: ValueRange::Constant(1.0),
            color: ColorRange::default(),
            scale: ScalarGradient::constant(1.0),
            velocity: VectorRange::default(),
            gravity: Self::EARTH_GRAVITY,
            drag: 0.0,
            rotation: ValueRange::Constant(0.0),
            billboard: BillboardMode::Center,
            texture: None,
            radial_velocity: 0.0,
        }
    }
}

/// Complete particle effect: emitter plus particle configuration,
/// bundled as data for preset catalogs.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Effect {
    /// Unique effect identifier.
    pub id: String,
    pub emitter: EmitterConfig,
    pub particle: ParticleConfig,
    #[serde(default)]
    pub metadata: EffectMetadata,
}

impl Effect {
    pub fn new(
        id: impl Into<String>,
        emitter: EmitterConfig,
        particle: ParticleConfig,
    ) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ConfigError::BlankEffectId);
        }
        emitter.validate()?;
        particle.validate()?;
        Ok(Effect {
            id,
            emitter,
            particle,
            metadata: EffectMetadata::default(),
        })
    }
}

/// Effect metadata for categorization and search.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct EffectMetadata {
    pub name: String,
    pub description: String,
    pub author: String,
    pub tags: Vec<String>,
}
