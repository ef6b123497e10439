use foundation::ZoneId;
use foundation::de::opt_f64;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::RecordError;

/// Per-zone change rates from the covariates table.
///
/// Every rate is a fraction; display code multiplies by 100. The service
/// truncates the college-rate column names, and the serde names follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovariateRow {
    pub cz: ZoneId,
    #[serde(default, rename = "change_emp_pooled1980_2000", deserialize_with = "opt_f64")]
    pub employment_1980_2000: Option<f64>,
    #[serde(default, rename = "change_emp_pooled1990_2010", deserialize_with = "opt_f64")]
    pub employment_1990_2010: Option<f64>,
    #[serde(default, rename = "change_frac_coll_pooled1980_200", deserialize_with = "opt_f64")]
    pub college_1980_2000: Option<f64>,
    #[serde(default, rename = "change_frac_coll_pooled1990_201", deserialize_with = "opt_f64")]
    pub college_1990_2010: Option<f64>,
}

impl CovariateRow {
    pub fn new(cz: ZoneId) -> Self {
        Self {
            cz,
            employment_1980_2000: None,
            employment_1990_2010: None,
            college_1980_2000: None,
            college_1990_2010: None,
        }
    }

    pub fn from_attributes(attributes: &Map<String, Value>) -> Result<Self, RecordError> {
        serde_json::from_value(Value::Object(attributes.clone())).map_err(|source| {
            RecordError::Decode {
                kind: "covariate",
                source,
            }
        })
    }
}

/// Covariate rows joined onto one origin/destination pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CovariatePair {
    pub origin: Option<CovariateRow>,
    pub destination: Option<CovariateRow>,
}

impl CovariatePair {
    /// Joins rows by zone id. When origin and destination are the same zone,
    /// one row fills both sides.
    pub fn join(rows: &[CovariateRow], origin: ZoneId, destination: ZoneId) -> Self {
        let mut out = Self::default();
        for row in rows {
            if row.cz == origin {
                out.origin = Some(row.clone());
            }
            if row.cz == destination {
                out.destination = Some(row.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{CovariatePair, CovariateRow};
    use foundation::ZoneId;
    use serde_json::json;

    #[test]
    fn decodes_truncated_column_names() {
        let attrs = json!({
            "cz": "100",
            "change_emp_pooled1980_2000": 0.031,
            "change_emp_pooled1990_2010": -0.012,
            "change_frac_coll_pooled1980_200": 0.08,
            "change_frac_coll_pooled1990_201": null,
            "OBJECTID": 12
        });
        let row = CovariateRow::from_attributes(attrs.as_object().unwrap()).unwrap();
        assert_eq!(row.cz, ZoneId(100));
        assert_eq!(row.employment_1980_2000, Some(0.031));
        assert_eq!(row.employment_1990_2010, Some(-0.012));
        assert_eq!(row.college_1980_2000, Some(0.08));
        assert_eq!(row.college_1990_2010, None);
    }

    #[test]
    fn join_assigns_sides_by_zone() {
        let rows = vec![CovariateRow::new(ZoneId(2)), CovariateRow::new(ZoneId(1))];
        let pair = CovariatePair::join(&rows, ZoneId(1), ZoneId(2));
        assert_eq!(pair.origin.unwrap().cz, ZoneId(1));
        assert_eq!(pair.destination.unwrap().cz, ZoneId(2));

        let pair = CovariatePair::join(&rows, ZoneId(1), ZoneId(3));
        assert!(pair.origin.is_some());
        assert!(pair.destination.is_none());
    }
}
