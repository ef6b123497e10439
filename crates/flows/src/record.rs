use foundation::de::{opt_count, opt_f64};
use foundation::{LonLat, ZoneId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Output fields requested from the migration-flow service.
pub const MIGRATION_FIELDS: [&str; 15] = [
    "o_x_coord",
    "o_y_coord",
    "d_x_coord",
    "d_y_coord",
    "n",
    "o_cz_name",
    "d_cz_name",
    "o_state_name",
    "d_state_name",
    "o_cz",
    "d_cz",
    "n_tot_o",
    "n_tot_d",
    "pr_d_o",
    "pr_o_d",
];

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid {kind} record: {source}")]
    Decode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// One origin -> destination row of the migration table.
///
/// A row with `o_cz == d_cz` is a stayer row: people who remained in their
/// childhood zone. Every other row is a mover row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub o_cz: ZoneId,
    pub d_cz: ZoneId,
    #[serde(default)]
    pub o_cz_name: Option<String>,
    #[serde(default)]
    pub d_cz_name: Option<String>,
    #[serde(default)]
    pub o_state_name: Option<String>,
    #[serde(default)]
    pub d_state_name: Option<String>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub o_x_coord: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub o_y_coord: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub d_x_coord: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub d_y_coord: Option<f64>,
    #[serde(default, deserialize_with = "opt_count")]
    pub n: Option<u64>,
    #[serde(default, deserialize_with = "opt_count")]
    pub n_tot_o: Option<u64>,
    #[serde(default, deserialize_with = "opt_count")]
    pub n_tot_d: Option<u64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub pr_d_o: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub pr_o_d: Option<f64>,
}

impl MigrationRecord {
    /// Bare record with only the pair ids set.
    pub fn new(o_cz: ZoneId, d_cz: ZoneId) -> Self {
        Self {
            o_cz,
            d_cz,
            o_cz_name: None,
            d_cz_name: None,
            o_state_name: None,
            d_state_name: None,
            o_x_coord: None,
            o_y_coord: None,
            d_x_coord: None,
            d_y_coord: None,
            n: None,
            n_tot_o: None,
            n_tot_d: None,
            pr_d_o: None,
            pr_o_d: None,
        }
    }

    /// Decodes a record from a feature's attribute map.
    pub fn from_attributes(attributes: &Map<String, Value>) -> Result<Self, RecordError> {
        serde_json::from_value(Value::Object(attributes.clone())).map_err(|source| {
            RecordError::Decode {
                kind: "migration",
                source,
            }
        })
    }

    pub fn is_stayer(&self) -> bool {
        self.o_cz == self.d_cz
    }

    pub fn is_mover(&self) -> bool {
        !self.is_stayer()
    }

    /// Flow count with a null `n` read as zero.
    pub fn flow_count(&self) -> u64 {
        self.n.unwrap_or(0)
    }

    /// Count used to size a stayer marker.
    ///
    /// Falls back to `n_tot_o`, then `n_tot_d`, whenever `n` is zero or missing.
    pub fn stayer_count(&self) -> u64 {
        [self.n, self.n_tot_o, self.n_tot_d]
            .into_iter()
            .flatten()
            .find(|&v| v > 0)
            .unwrap_or(0)
    }

    pub fn origin(&self) -> Option<LonLat> {
        LonLat::from_parts(self.o_x_coord, self.o_y_coord)
    }

    pub fn destination(&self) -> Option<LonLat> {
        LonLat::from_parts(self.d_x_coord, self.d_y_coord)
    }

    /// Display value of an attribute, by service field name.
    ///
    /// Missing names and numbers render as `None`; unknown field names too.
    pub fn attribute(&self, field: &str) -> Option<String> {
        let text = |v: &Option<String>| v.clone();
        let num = |v: Option<f64>| v.map(|v| v.to_string());
        let count = |v: Option<u64>| v.map(|v| v.to_string());
        match field {
            "o_cz" => Some(self.o_cz.to_string()),
            "d_cz" => Some(self.d_cz.to_string()),
            "o_cz_name" => text(&self.o_cz_name),
            "d_cz_name" => text(&self.d_cz_name),
            "o_state_name" => text(&self.o_state_name),
            "d_state_name" => text(&self.d_state_name),
            "o_x_coord" => num(self.o_x_coord),
            "o_y_coord" => num(self.o_y_coord),
            "d_x_coord" => num(self.d_x_coord),
            "d_y_coord" => num(self.d_y_coord),
            "n" => count(self.n),
            "n_tot_o" => count(self.n_tot_o),
            "n_tot_d" => count(self.n_tot_d),
            "pr_d_o" => num(self.pr_d_o),
            "pr_o_d" => num(self.pr_o_d),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MIGRATION_FIELDS, MigrationRecord};
    use foundation::ZoneId;
    use serde_json::json;

    #[test]
    fn decodes_service_attributes() {
        let attrs = json!({
            "o_cz": 100, "d_cz": "200.0",
            "o_cz_name": "Chicago", "d_cz_name": "Denver",
            "o_state_name": "Illinois", "d_state_name": "Colorado",
            "o_x_coord": -87.6, "o_y_coord": 41.8,
            "d_x_coord": -104.9, "d_y_coord": 39.7,
            "n": 600.0, "n_tot_o": null, "pr_d_o": 0.12
        });
        let rec = MigrationRecord::from_attributes(attrs.as_object().unwrap()).unwrap();
        assert_eq!(rec.o_cz, ZoneId(100));
        assert_eq!(rec.d_cz, ZoneId(200));
        assert_eq!(rec.n, Some(600));
        assert_eq!(rec.n_tot_o, None);
        assert_eq!(rec.n_tot_d, None);
        assert!(rec.is_mover());
        assert_eq!(rec.origin().unwrap().lon, -87.6);
    }

    #[test]
    fn missing_zone_id_is_rejected() {
        let attrs = json!({ "d_cz": 1, "n": 5 });
        let err = MigrationRecord::from_attributes(attrs.as_object().unwrap()).unwrap_err();
        assert!(err.to_string().contains("o_cz"), "{err}");
    }

    #[test]
    fn stayer_count_falls_back_to_totals() {
        let mut rec = MigrationRecord::new(ZoneId(7), ZoneId(7));
        assert_eq!(rec.stayer_count(), 0);
        rec.n = Some(0);
        rec.n_tot_o = Some(5000);
        rec.n_tot_d = Some(10);
        assert_eq!(rec.stayer_count(), 5000);
        rec.n_tot_o = None;
        assert_eq!(rec.stayer_count(), 10);
        rec.n = Some(3);
        assert_eq!(rec.stayer_count(), 3);
    }

    #[test]
    fn every_requested_field_is_addressable() {
        let mut rec = MigrationRecord::new(ZoneId(1), ZoneId(2));
        rec.o_cz_name = Some("A".into());
        rec.d_cz_name = Some("B".into());
        rec.o_state_name = Some("S".into());
        rec.d_state_name = Some("T".into());
        rec.o_x_coord = Some(1.0);
        rec.o_y_coord = Some(1.0);
        rec.d_x_coord = Some(1.0);
        rec.d_y_coord = Some(1.0);
        rec.n = Some(1);
        rec.n_tot_o = Some(1);
        rec.n_tot_d = Some(1);
        rec.pr_d_o = Some(0.5);
        rec.pr_o_d = Some(0.5);
        for field in MIGRATION_FIELDS {
            assert!(rec.attribute(field).is_some(), "{field}");
        }
        assert_eq!(rec.attribute("cz_id"), None);
    }
}
