pub mod generator;
pub mod renderer;
pub mod selector;
pub mod thematic;
pub mod tree;

pub use generator::*;
pub use renderer::*;
pub use selector::*;
pub use thematic::*;
pub use tree::*;

#[derive(Debug, thiserror::Error)]
pub enum SymbologyError {
    #[error("no thematic layer is visible")]
    NoActiveLayer,
    #[error("layer {layer:?} has no thematic option #{index}")]
    UnknownOption { layer: String, index: usize },
    #[error("layer {0:?} has no color scheme")]
    NoColorScheme(String),
    #[error("renderer generation failed: {0}")]
    Generation(String),
}
