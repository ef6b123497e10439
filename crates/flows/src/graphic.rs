use foundation::{LonLat, SpatialReference};
use serde::{Deserialize, Serialize};

use crate::record::MigrationRecord;
use crate::symbol::Symbol;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Point,
    Polyline,
    Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Polyline {
        paths: Vec<Vec<[f64; 2]>>,
        #[serde(rename = "spatialReference")]
        spatial_reference: SpatialReference,
    },
    Point {
        x: f64,
        y: f64,
        #[serde(rename = "spatialReference")]
        spatial_reference: SpatialReference,
    },
}

impl Geometry {
    /// Two-vertex path from `from` to `to`.
    pub fn segment(from: LonLat, to: LonLat) -> Self {
        Geometry::Polyline {
            paths: vec![vec![from.to_array(), to.to_array()]],
            spatial_reference: SpatialReference::WGS84,
        }
    }

    pub fn point(at: LonLat) -> Self {
        Geometry::Point {
            x: at.lon,
            y: at.lat,
            spatial_reference: SpatialReference::WGS84,
        }
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Polyline { .. } => GeometryKind::Polyline,
            Geometry::Point { .. } => GeometryKind::Point,
        }
    }
}

/// Popup title/content pair with `{field}` placeholders.
///
/// Enrichment always rebuilds from the content the popup had before its first
/// enrichment, so repeated enrichment replaces the appended part instead of
/// stacking it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupTemplate {
    pub title: String,
    pub content: String,
    #[serde(skip)]
    base_content: Option<String>,
}

impl PopupTemplate {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            base_content: None,
        }
    }

    /// Sets `content` to the base content followed by `extra`.
    pub fn enrich(&mut self, extra: &str) {
        let base = self
            .base_content
            .get_or_insert_with(|| self.content.clone());
        self.content = format!("{base}{extra}");
    }

    /// Content as it was before any enrichment.
    pub fn base_content(&self) -> &str {
        self.base_content.as_deref().unwrap_or(&self.content)
    }

    pub fn is_enriched(&self) -> bool {
        self.base_content.is_some()
    }

    /// Substitutes `{field}` placeholders. Unknown fields stay verbatim.
    pub fn expand<F>(&self, lookup: F) -> RenderedPopup
    where
        F: Fn(&str) -> Option<String>,
    {
        RenderedPopup {
            title: expand_placeholders(&self.title, &lookup),
            content: expand_placeholders(&self.content, &lookup),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPopup {
    pub title: String,
    pub content: String,
}

fn expand_placeholders<F>(template: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        match lookup(key) {
            Some(v) => out.push_str(&v),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// A line or point derived from one migration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graphic {
    pub geometry: Geometry,
    pub symbol: Symbol,
    pub attributes: MigrationRecord,
    #[serde(rename = "popupTemplate")]
    pub popup: PopupTemplate,
}

impl Graphic {
    pub fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }

    /// Popup with placeholders filled from this graphic's attributes.
    pub fn rendered_popup(&self) -> RenderedPopup {
        self.popup.expand(|field| self.attributes.attribute(field))
    }
}

#[cfg(test)]
mod tests {
    use super::{Geometry, GeometryKind, PopupTemplate};
    use foundation::LonLat;

    #[test]
    fn enrichment_rebuilds_from_base() {
        let mut p = PopupTemplate::new("t", "base");
        assert_eq!(p.base_content(), "base");
        p.enrich("+one");
        assert_eq!(p.content, "base+one");
        p.enrich("+two");
        assert_eq!(p.content, "base+two");
        p.enrich("+two");
        assert_eq!(p.content, "base+two");
        assert_eq!(p.base_content(), "base");
        assert!(p.is_enriched());
    }

    #[test]
    fn expand_fills_known_placeholders() {
        let p = PopupTemplate::new("{a}, {b} -> {zzz}", "x{a}y{");
        let r = p.expand(|k| match k {
            "a" => Some("A".to_string()),
            "b" => Some("B".to_string()),
            _ => None,
        });
        assert_eq!(r.title, "A, B -> {zzz}");
        assert_eq!(r.content, "xAy{");
    }

    #[test]
    fn geometry_serializes_like_engine_json() {
        let g = Geometry::segment(LonLat::new(1.0, 2.0), LonLat::new(3.0, 4.0));
        assert_eq!(g.kind(), GeometryKind::Polyline);
        let v = serde_json::to_value(&g).unwrap();
        assert_eq!(v["type"], "polyline");
        assert_eq!(v["paths"][0][1][0], 3.0);
        assert_eq!(v["spatialReference"]["wkid"], 4326);
    }
}
