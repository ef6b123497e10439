//! Static table of selectable value expressions per thematic layer.

use serde::Serialize;

pub const HOUSEHOLD_INCOME: &str = "Household Income";
pub const INDIVIDUAL_INCOME: &str = "Individual Income";

/// The mutually exclusive pair of thematic layers.
pub const THEMATIC_LAYER_TITLES: [&str; 2] = [HOUSEHOLD_INCOME, INDIVIDUAL_INCOME];

const FEATURE_PREFIX: &str = "$feature.";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct ThematicOption {
    pub label: &'static str,
    pub expression: &'static str,
}

impl ThematicOption {
    /// Field referenced by the expression (`$feature.x` -> `x`).
    pub fn field(&self) -> &'static str {
        self.expression
            .strip_prefix(FEATURE_PREFIX)
            .unwrap_or(self.expression)
    }
}

const HOUSEHOLD_OPTIONS: [ThematicOption; 5] = [
    ThematicOption {
        label: "Change in Household Income between 1978 and 1992 (1st Percentile)",
        expression: "$feature.change_kfi_pooled_pooled_p1",
    },
    ThematicOption {
        label: "Change in Household Income between 1978 and 1992 (25th Percentile)",
        expression: "$feature.change_kfi_pooled_pooled_p25",
    },
    ThematicOption {
        label: "Change in Household Income between 1978 and 1992 (50th Percentile)",
        expression: "$feature.change_kfi_pooled_pooled_p50",
    },
    ThematicOption {
        label: "Change in Household Income between 1978 and 1992 (75th Percentile)",
        expression: "$feature.change_kfi_pooled_pooled_p75",
    },
    ThematicOption {
        label: "Change in Household Income between 1978 and 1992 (100th Percentile)",
        expression: "$feature.change_kfi_pooled_pooled_p100",
    },
];

const INDIVIDUAL_OPTIONS: [ThematicOption; 5] = [
    ThematicOption {
        label: "Change in Individual Income between 1978 and 1992 (1st Percentile)",
        expression: "$feature.change_kii_pooled_pooled_p1",
    },
    ThematicOption {
        label: "Change in Individual Income between 1978 and 1992 (25th Percentile)",
        expression: "$feature.change_kii_pooled_pooled_p25",
    },
    ThematicOption {
        label: "Change in Individual Income between 1978 and 1992 (50th Percentile)",
        expression: "$feature.change_kii_pooled_pooled_p50",
    },
    ThematicOption {
        label: "Change in Individual Income between 1978 and 1992 (75th Percentile)",
        expression: "$feature.change_kii_pooled_pooled_p75",
    },
    ThematicOption {
        label: "Change in Individual Income between 1978 and 1992 (100th Percentile)",
        expression: "$feature.change_kii_pooled_pooled_p100",
    },
];

/// Options of the layer titled `title`; empty for any other layer.
pub fn options_for(title: &str) -> &'static [ThematicOption] {
    match title {
        HOUSEHOLD_INCOME => &HOUSEHOLD_OPTIONS,
        INDIVIDUAL_INCOME => &INDIVIDUAL_OPTIONS,
        _ => &[],
    }
}

/// Diverging color scheme name used for the layer titled `title`.
pub fn color_scheme_name(title: &str) -> Option<&'static str> {
    match title {
        HOUSEHOLD_INCOME => Some("Green and Blue 3"),
        INDIVIDUAL_INCOME => Some("Red and Green 6"),
        _ => None,
    }
}

pub fn is_thematic_layer(title: &str) -> bool {
    THEMATIC_LAYER_TITLES.contains(&title)
}
