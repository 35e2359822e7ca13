//! Core infrastructure: time sources and object pooling.

pub mod clock;
pub mod pool;

pub use clock::{Clock, ManualClock, SystemClock};
pub use pool::ObjectPool;
