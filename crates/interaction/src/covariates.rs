//! Neighborhood-characteristics tables appended to a flow line's popup.

use flows::{CovariatePair, CovariateRow};
use foundation::round_fraction_percent;

const CELL: &str = "border:1px solid LightGray;";
const VALUE_CELL: &str = "text-align:center; border:1px solid LightGray;";

fn percent_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}%", round_fraction_percent(v)),
        None => "N/A".to_string(),
    }
}

/// One zone's change rates as an HTML table, headed by `label`.
pub fn covariate_table(row: Option<&CovariateRow>, label: &str) -> String {
    let Some(row) = row else {
        return format!("<div>No data for {label}.</div>");
    };
    format!(
        concat!(
            "<div style=\"margin-bottom:8px;\"><b>{label} Neighborhood Characteristics</b></div>",
            "<table style=\"width:100%; border:1px solid LightGray; border-collapse: collapse;\">",
            "<tr><th style=\"{cell}\">Change in Employment Rate 1980-2000</th>",
            "<th style=\"{cell}\">Change in Employment Rate 1990-2010</th></tr>",
            "<tr><td style=\"{value}\">{emp_80}</td><td style=\"{value}\">{emp_90}</td></tr>",
            "<tr><th style=\"{cell}\">Change in College Graduation Rate 1980-2000</th>",
            "<th style=\"{cell}\">Change in College Graduation Rate 1990-2010</th></tr>",
            "<tr><td style=\"{value}\">{coll_80}</td><td style=\"{value}\">{coll_90}</td></tr>",
            "</table>"
        ),
        label = label,
        cell = CELL,
        value = VALUE_CELL,
        emp_80 = percent_cell(row.employment_1980_2000),
        emp_90 = percent_cell(row.employment_1990_2010),
        coll_80 = percent_cell(row.college_1980_2000),
        coll_90 = percent_cell(row.college_1990_2010),
    )
}

/// Origin and destination tables under a common heading.
pub fn enrichment_html(pair: &CovariatePair) -> String {
    format!(
        "<br/><h3>Neighborhood Characteristics</h3>{}<br/>{}",
        covariate_table(pair.origin.as_ref(), "Origin"),
        covariate_table(pair.destination.as_ref(), "Destination"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::ZoneId;

    #[test]
    fn rates_are_rounded_percentages() {
        let row = CovariateRow {
            employment_1980_2000: Some(0.031),
            employment_1990_2010: Some(-0.046),
            college_1980_2000: Some(0.004),
            college_1990_2010: None,
            ..CovariateRow::new(ZoneId(1))
        };
        let html = covariate_table(Some(&row), "Origin");
        assert!(html.contains("<b>Origin Neighborhood Characteristics</b>"));
        assert!(html.contains(">3%<"));
        assert!(html.contains(">-5%<"));
        assert!(html.contains(">0%<"));
        assert!(html.contains(">N/A<"));
    }

    #[test]
    fn missing_row_is_reported() {
        let pair = CovariatePair {
            origin: Some(CovariateRow::new(ZoneId(1))),
            destination: None,
        };
        let html = enrichment_html(&pair);
        assert!(html.starts_with("<br/><h3>Neighborhood Characteristics</h3>"));
        assert!(html.contains("Origin Neighborhood Characteristics"));
        assert!(html.ends_with("<div>No data for Destination.</div>"));
    }
}
