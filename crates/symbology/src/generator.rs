use foundation::{BoxFuture, ViewId};
use serde::Serialize;

use crate::renderer::Renderer;
use crate::thematic::{ThematicOption, color_scheme_name};
use crate::SymbologyError;

pub const DIVERGING_THEME: &str = "above-and-below";
pub const STATISTICS_MIN: f64 = -5000.0;
pub const STATISTICS_MAX: f64 = 5000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSchemeRef {
    pub name: String,
    pub theme: String,
    pub geometry_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basemap: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
}

/// Request for a continuous color renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuousRendererParams {
    pub layer_title: String,
    pub view: ViewId,
    pub value_expression: String,
    pub value_expression_title: String,
    pub color_scheme: ColorSchemeRef,
    pub theme: String,
    pub outline_optimization_enabled: bool,
    pub statistics: Statistics,
}

impl ContinuousRendererParams {
    /// Builds the fixed diverging request for `option` on the layer titled
    /// `layer_title`.
    pub fn for_option(
        layer_title: &str,
        view: ViewId,
        option: &ThematicOption,
        basemap: Option<&str>,
    ) -> Result<Self, SymbologyError> {
        let scheme = color_scheme_name(layer_title)
            .ok_or_else(|| SymbologyError::NoColorScheme(layer_title.to_string()))?;
        Ok(Self {
            layer_title: layer_title.to_string(),
            view,
            value_expression: option.expression.to_string(),
            value_expression_title: option.label.to_string(),
            color_scheme: ColorSchemeRef {
                name: scheme.to_string(),
                theme: DIVERGING_THEME.to_string(),
                geometry_type: "polygon".to_string(),
                basemap: basemap.map(str::to_string),
            },
            theme: DIVERGING_THEME.to_string(),
            outline_optimization_enabled: true,
            statistics: Statistics {
                min: STATISTICS_MIN,
                max: STATISTICS_MAX,
            },
        })
    }
}

/// Map engine's smart-mapping renderer creator.
pub trait RendererGenerator: Send + Sync {
    fn create_continuous_renderer<'a>(
        &'a self,
        params: &'a ContinuousRendererParams,
    ) -> BoxFuture<'a, Result<Renderer, SymbologyError>>;
}
