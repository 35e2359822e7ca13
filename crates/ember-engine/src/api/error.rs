use thiserror::Error;

/// Fatal configuration errors, rejected at construction time.
/// Invalid values are never clamped into range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("emission rate must be positive, got {0}")]
    NonPositiveRate(f64),
    #[error("burst count must be positive, got {0}")]
    NonPositiveBurstCount(u32),
    #[error("max particles must be positive, got {0}")]
    NonPositiveMaxParticles(u32),
    #[error("tick rate must be positive, got {0}")]
    NonPositiveTickRate(u32),
    #[error("duration must be non-negative, got {0}")]
    NegativeDuration(f64),
    #[error("movement threshold must be positive, got {0}")]
    NonPositiveMovementThreshold(f64),
    #[error("{shape} {dimension} must be positive, got {value}")]
    NonPositiveShapeDimension {
        shape: &'static str,
        dimension: &'static str,
        value: f64,
    },
    #[error("line start and end must be different points")]
    DegenerateLine,
    #[error("cone angle must be within 0..=90 degrees, got {0}")]
    ConeAngleOutOfRange(f64),
    #[error("drag must be within 0..=1, got {0}")]
    DragOutOfRange(f64),
    #[error("effect id must not be blank")]
    BlankEffectId,
}
