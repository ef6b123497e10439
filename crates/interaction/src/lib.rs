//! Session state and the click/UI handlers shared by every map view.

pub mod config;
pub mod controller;
pub mod covariates;
pub mod highlight;
pub mod hit;
pub mod panel;
pub mod state;
pub mod ui;

pub use config::*;
pub use controller::*;
pub use covariates::*;
pub use highlight::*;
pub use hit::*;
pub use panel::*;
pub use state::*;
pub use ui::*;

use foundation::ViewId;

#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    #[error("{0} is not a registered view")]
    UnknownView(ViewId),
    #[error("no region id on feature of layer {layer:?}")]
    MissingRegionId { layer: String },
    #[error("no feature service registered for layer {0:?}")]
    NoRegionService(String),
    #[error(transparent)]
    Query(#[from] query::QueryError),
}
