//! Renderer model returned by the generator, and the fixed post-processing
//! applied before it is attached to a thematic layer.

use flows::{Outline, Symbol};
use foundation::Rgba;
use serde::{Deserialize, Serialize};

pub const OUTLINE_COLOR: Rgba = Rgba::new(255, 255, 255, 0.25);
pub const OUTLINE_WIDTH: f64 = 0.2;
pub const THEMATIC_OUTLINE: Outline = Outline::new(OUTLINE_COLOR, OUTLINE_WIDTH);

pub const NO_DATA_COLOR: Rgba = Rgba::new(200, 200, 200, 1.0);
pub const NO_DATA_LABEL: &str = "No Data";

pub const INCLUDED_EFFECT: &str = "drop-shadow(0px, 2px, 8px, #333)";
pub const EXCLUDED_EFFECT: &str = "grayscale(100%) opacity(30%)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBreakInfo {
    pub min_value: f64,
    pub max_value: f64,
    pub symbol: Symbol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueValueInfo {
    pub value: String,
    pub symbol: Symbol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub value: f64,
    pub color: Rgba,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualVariable {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_expression: Option<String>,
    #[serde(default)]
    pub stops: Vec<ColorStop>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Renderer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_expression_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
    #[serde(default)]
    pub class_break_infos: Vec<ClassBreakInfo>,
    #[serde(default)]
    pub unique_value_infos: Vec<UniqueValueInfo>,
    #[serde(default)]
    pub visual_variables: Vec<VisualVariable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_symbol: Option<Symbol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_label: Option<String>,
}

impl Renderer {
    /// Every symbol the renderer carries, default symbol excluded.
    fn symbols_mut(&mut self) -> impl Iterator<Item = &mut Symbol> + '_ {
        self.symbol
            .iter_mut()
            .chain(self.class_break_infos.iter_mut().map(|i| &mut i.symbol))
            .chain(self.unique_value_infos.iter_mut().map(|i| &mut i.symbol))
            .chain(
                self.visual_variables
                    .iter_mut()
                    .flat_map(|vv| vv.stops.iter_mut())
                    .filter_map(|s| s.symbol.as_mut()),
            )
    }

    /// Replaces the outline of every outlined symbol. Returns how many changed.
    pub fn override_outlines(&mut self, outline: Outline) -> usize {
        self.symbols_mut()
            .map(|s| s.override_outline(outline))
            .filter(|changed| *changed)
            .count()
    }
}

/// Applies the fixed thematic styling: uniform faint white outlines and a
/// gray "No Data" fallback.
pub fn finish_renderer(mut renderer: Renderer) -> Renderer {
    renderer.override_outlines(THEMATIC_OUTLINE);
    renderer.default_symbol = Some(Symbol::SimpleFill {
        color: NO_DATA_COLOR,
        outline: Some(THEMATIC_OUTLINE),
    });
    renderer.default_label = Some(NO_DATA_LABEL.to_string());
    renderer
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectFilter {
    #[serde(rename = "where")]
    pub where_clause: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureEffect {
    pub filter: EffectFilter,
    pub included_effect: String,
    pub excluded_effect: String,
}

impl FeatureEffect {
    /// Emphasizes features with a value in `field`, greys out the rest.
    pub fn emphasize_non_null(field: &str) -> Self {
        Self {
            filter: EffectFilter {
                where_clause: format!("{field} IS NOT NULL"),
            },
            included_effect: INCLUDED_EFFECT.to_string(),
            excluded_effect: EXCLUDED_EFFECT.to_string(),
        }
    }
}
