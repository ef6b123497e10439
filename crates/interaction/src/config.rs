use std::env;

use foundation::{LonLat, ViewId};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIGRATION_SERVICE_URL: &str = "https://services1.arcgis.com/4yjifSiIG17X0gW4/arcgis/rest/services/Commuting_Zone_Migration_Centroid_Test/FeatureServer/0";
pub const DEFAULT_COVARIATE_SERVICE_URL: &str = "https://services8.arcgis.com/peDZJliSvYims39Q/arcgis/rest/services/Commuting_Zone_Covariates_Table/FeatureServer/0";

/// A secondary map view sharing the primary view's map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsetView {
    pub name: String,
    pub center: LonLat,
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub migration_service_url: String,
    pub covariate_service_url: String,
    pub initial_threshold: f64,
    pub slider_min: f64,
    pub slider_max: f64,
    pub min_zoom: u32,
    pub max_zoom: u32,
    pub padding_collapsed: f64,
    pub padding_expanded: f64,
    pub insets: Vec<InsetView>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            migration_service_url: DEFAULT_MIGRATION_SERVICE_URL.to_string(),
            covariate_service_url: DEFAULT_COVARIATE_SERVICE_URL.to_string(),
            initial_threshold: 500.0,
            slider_min: 100.0,
            slider_max: 10_000.0,
            min_zoom: 4,
            max_zoom: 12,
            padding_collapsed: 49.0,
            padding_expanded: 135.0,
            insets: vec![
                InsetView {
                    name: "Alaska".to_string(),
                    center: LonLat::new(-152.4044, 64.2008),
                    zoom: 2.0,
                },
                InsetView {
                    name: "Hawaii".to_string(),
                    center: LonLat::new(-157.5828, 20.8968),
                    zoom: 4.0,
                },
            ],
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `FLOWMAP_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from `lookup`; unparseable values keep the current
    /// setting.
    pub fn with_overrides<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            migration_service_url: lookup("FLOWMAP_MIGRATION_URL")
                .unwrap_or(self.migration_service_url),
            covariate_service_url: lookup("FLOWMAP_COVARIATE_URL")
                .unwrap_or(self.covariate_service_url),
            initial_threshold: env_var_f64(&lookup, "FLOWMAP_THRESHOLD", self.initial_threshold),
            slider_min: env_var_f64(&lookup, "FLOWMAP_SLIDER_MIN", self.slider_min),
            slider_max: env_var_f64(&lookup, "FLOWMAP_SLIDER_MAX", self.slider_max),
            min_zoom: env_var_u32(&lookup, "FLOWMAP_MIN_ZOOM", self.min_zoom),
            max_zoom: env_var_u32(&lookup, "FLOWMAP_MAX_ZOOM", self.max_zoom),
            padding_collapsed: env_var_f64(&lookup, "FLOWMAP_PADDING", self.padding_collapsed),
            padding_expanded: env_var_f64(
                &lookup,
                "FLOWMAP_PADDING_EXPANDED",
                self.padding_expanded,
            ),
            insets: self.insets,
        }
    }

    /// The primary view followed by one id per inset, in configuration order.
    pub fn view_ids(&self) -> Vec<ViewId> {
        (0..=self.insets.len() as u32).map(ViewId).collect()
    }
}

fn env_var_u32<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str, default: u32) -> u32 {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_var_f64<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str, default: f64) -> f64 {
    lookup(key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_published_viewer() {
        let c = AppConfig::default();
        assert_eq!(c.initial_threshold, 500.0);
        assert_eq!((c.slider_min, c.slider_max), (100.0, 10_000.0));
        assert_eq!((c.min_zoom, c.max_zoom), (4, 12));
        assert_eq!(c.insets.len(), 2);
        assert_eq!(c.view_ids(), vec![ViewId(0), ViewId(1), ViewId(2)]);
        assert!(c.migration_service_url.ends_with("/FeatureServer/0"));
    }

    #[test]
    fn overrides_apply_and_bad_values_fall_back() {
        let vars: HashMap<&str, &str> = [
            ("FLOWMAP_THRESHOLD", "1000"),
            ("FLOWMAP_MAX_ZOOM", "not-a-number"),
            ("FLOWMAP_SLIDER_MAX", "NaN"),
            ("FLOWMAP_COVARIATE_URL", "http://localhost/covariates/0"),
        ]
        .into_iter()
        .collect();
        let c = AppConfig::default().with_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(c.initial_threshold, 1000.0);
        assert_eq!(c.max_zoom, 12);
        assert_eq!(c.slider_max, 10_000.0);
        assert_eq!(c.covariate_service_url, "http://localhost/covariates/0");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: AppConfig = serde_json::from_str(r#"{ "initial_threshold": 250 }"#).unwrap();
        assert_eq!(c.initial_threshold, 250.0);
        assert_eq!(c.padding_expanded, 135.0);
        assert_eq!(c.insets[1].name, "Hawaii");
    }
}
