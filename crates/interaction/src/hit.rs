use flows::{GeometryKind, LayerRole};
use foundation::GraphicId;
use serde_json::{Map, Value};

/// One entry of a view's hit-test result, topmost first.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    /// A feature of a feature layer.
    Feature {
        layer: String,
        geometry: GeometryKind,
        attributes: Map<String, Value>,
    },
    /// A graphic owned by one of the flow overlays.
    Graphic { role: LayerRole, id: GraphicId },
    /// Anything not selectable (basemap, unrelated graphics).
    Other,
}

impl HitTarget {
    pub fn feature(
        layer: impl Into<String>,
        geometry: GeometryKind,
        attributes: Map<String, Value>,
    ) -> Self {
        HitTarget::Feature {
            layer: layer.into(),
            geometry,
            attributes,
        }
    }
}

/// First selectable hit, skipping basemap results and graphics for which
/// `is_live` is false (removed by a redraw since the hit test ran).
pub fn pick_target<F>(hits: &[HitTarget], is_live: F) -> Option<&HitTarget>
where
    F: Fn(LayerRole, GraphicId) -> bool,
{
    hits.iter().find(|h| match h {
        HitTarget::Feature { .. } => true,
        HitTarget::Graphic { role, id } => is_live(*role, *id),
        HitTarget::Other => false,
    })
}

/// Reads an integer `OBJECTID` attribute.
pub fn object_id(attributes: &Map<String, Value>) -> Option<i64> {
    attributes.get("OBJECTID").and_then(|v| match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
