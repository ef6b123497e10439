use foundation::Rgba;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub color: Rgba,
    pub width: f64,
}

impl Outline {
    pub const fn new(color: Rgba, width: f64) -> Self {
        Self { color, width }
    }
}

/// Symbol descriptors in the map engine's JSON shape (`{"type": "simple-line", ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Symbol {
    SimpleLine {
        color: Rgba,
        width: f64,
    },
    SimpleMarker {
        color: Rgba,
        size: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        outline: Option<Outline>,
    },
    SimpleFill {
        color: Rgba,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        outline: Option<Outline>,
    },
}

impl Symbol {
    pub fn color(&self) -> Rgba {
        match self {
            Symbol::SimpleLine { color, .. }
            | Symbol::SimpleMarker { color, .. }
            | Symbol::SimpleFill { color, .. } => *color,
        }
    }

    pub fn outline(&self) -> Option<&Outline> {
        match self {
            Symbol::SimpleLine { .. } => None,
            Symbol::SimpleMarker { outline, .. } | Symbol::SimpleFill { outline, .. } => {
                outline.as_ref()
            }
        }
    }

    /// Replaces the outline of symbols that already carry one.
    ///
    /// Returns `true` if the symbol changed.
    pub fn override_outline(&mut self, with: Outline) -> bool {
        match self {
            Symbol::SimpleMarker {
                outline: Some(o), ..
            }
            | Symbol::SimpleFill {
                outline: Some(o), ..
            } => {
                *o = with;
                true
            }
            _ => false,
        }
    }
}
