pub mod color;
pub mod de;
pub mod format;
pub mod future;
pub mod geo;
pub mod ids;

// Foundation crate: small, well-tested primitives only.
pub use color::*;
pub use format::*;
pub use future::*;
pub use geo::*;
pub use ids::*;
