use glam::DVec3;

/// Unique identifier for an emitter, generated by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmitterId(pub u64);

/// Unique identifier for a viewer (a camera/player the budget layer
/// tracks particles against).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ViewerId(pub u64);

/// A viewer with a world position, as seen by the visibility/budget layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewer {
    pub id: ViewerId,
    pub position: DVec3,
}

impl Viewer {
    pub fn new(id: u64, position: DVec3) -> Self {
        Viewer {
            id: ViewerId(id),
            position,
        }
    }
}

/// Opaque identifier for a materialized visual proxy, issued by the
/// renderer boundary. Negative values signal spawn failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct RenderHandle(pub i32);

impl RenderHandle {
    /// Sentinel returned by renderers that could not materialize a proxy.
    pub const INVALID: RenderHandle = RenderHandle(-1);

    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}
