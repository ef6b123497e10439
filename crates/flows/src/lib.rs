pub mod covariate;
pub mod encoder;
pub mod graphic;
pub mod layer;
pub mod record;
pub mod resolver;
pub mod symbol;

pub use covariate::*;
pub use encoder::*;
pub use graphic::*;
pub use layer::*;
pub use record::*;
pub use resolver::*;
pub use symbol::*;
