//! ember-engine: a real-time particle simulation and rendering-budget
//! engine. Emitters schedule spawns, integrate cheap per-particle physics
//! and evaluate animation curves every tick; the render boundary is an
//! abstract contract, and the visibility/budget layer bounds how much of
//! the simulation is actually materialized for each viewer.

pub mod api;
pub mod core;
pub mod data;
pub mod emitter;
pub mod math;
pub mod render;

// Re-export key types at crate root for convenience
pub use api::{
    BillboardMode, ConfigError, Effect, EffectMetadata, EmitterConfig, EmitterId, EmitterKind,
    EmitterShape, ParticleConfig, RenderHandle, Viewer, ViewerId,
};
pub use core::{Clock, ManualClock, ObjectPool, SystemClock};
pub use data::{
    Color, ColorGradient, ColorRange, Gradient, Keyframe, Lerp, ScalarGradient, ValueRange,
    VectorRange,
};
pub use emitter::{
    sample_point, ActiveParticle, Emitter, EmitterAnchor, EmitterManager, EmitterTarget,
};
pub use math::{ease, lerp, lerp_vec3, Easing, Rng};
pub use render::{
    BudgetConfig, BudgetStrategy, BudgetTracker, CullingConfig, LodConfig, ParticleRenderer,
    ParticleSnapshot, VisibilityCuller, VisibilityLevel,
};
