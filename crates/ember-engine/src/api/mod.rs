//! Public configuration surface and boundary types.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    BillboardMode, Effect, EffectMetadata, EmitterConfig, EmitterKind, EmitterShape,
    ParticleConfig,
};
pub use error::ConfigError;
pub use types::{EmitterId, RenderHandle, Viewer, ViewerId};
