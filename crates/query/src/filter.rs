use std::fmt;

use serde_json::Value;

/// Literal on the right-hand side of a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Text(String),
}

impl Literal {
    /// Loose equality against an attribute value: numbers and numeric strings
    /// compare by value.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::Int(a), Value::Number(b)) => b.as_f64() == Some(*a as f64),
            (Literal::Int(a), Value::String(b)) => b.trim().parse::<f64>().ok() == Some(*a as f64),
            (Literal::Text(a), Value::String(b)) => a == b,
            (Literal::Text(a), Value::Number(b)) => a.trim().parse::<f64>().ok() == b.as_f64(),
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Text(v) => write!(f, "'{}'", v.replace('\'', "''")),
        }
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<foundation::ZoneId> for Literal {
    fn from(v: foundation::ZoneId) -> Self {
        Literal::Int(v.0)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::Text(v.to_string())
    }
}

/// Attribute filter, rendered as a SQL-92 `where` clause for the service.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    #[default]
    All,
    Eq {
        field: String,
        value: Literal,
    },
    In {
        field: String,
        values: Vec<Literal>,
    },
}

impl Filter {
    pub fn equals(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_in<I, L>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        Filter::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn where_clause(&self) -> String {
        match self {
            Filter::All => "1=1".to_string(),
            Filter::Eq { field, value } => format!("{field} = {value}"),
            Filter::In { field, values } => {
                let list = values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field} IN ({list})")
            }
        }
    }

    pub fn matches(&self, attributes: &serde_json::Map<String, Value>) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => attributes.get(field).is_some_and(|v| value.matches(v)),
            Filter::In { field, values } => attributes
                .get(field)
                .is_some_and(|v| values.iter().any(|l| l.matches(v))),
        }
    }
}

/// Which attribute columns to return.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OutFields {
    #[default]
    All,
    Only(Vec<String>),
}

impl OutFields {
    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OutFields::Only(fields.into_iter().map(Into::into).collect())
    }

    pub fn param(&self) -> String {
        match self {
            OutFields::All => "*".to_string(),
            OutFields::Only(fields) => fields.join(","),
        }
    }
}

/// One `query` request against a feature service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureQuery {
    pub filter: Filter,
    pub object_ids: Vec<i64>,
    pub out_fields: OutFields,
    pub return_geometry: bool,
}

impl FeatureQuery {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn by_object_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            object_ids: ids.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_out_fields(mut self, out_fields: OutFields) -> Self {
        self.out_fields = out_fields;
        self
    }

    pub fn with_geometry(mut self, return_geometry: bool) -> Self {
        self.return_geometry = return_geometry;
        self
    }

    /// Query-string parameters of the REST `query` operation.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![("where", self.filter.where_clause())];
        if !self.object_ids.is_empty() {
            let ids = self
                .object_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.push(("objectIds", ids));
        }
        out.push(("outFields", self.out_fields.param()));
        out.push(("returnGeometry", self.return_geometry.to_string()));
        out.push(("f", "json".to_string()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{FeatureQuery, Filter, Literal, OutFields};
    use foundation::ZoneId;
    use serde_json::json;

    #[test]
    fn renders_where_clauses() {
        assert_eq!(Filter::equals("cz", ZoneId(100)).where_clause(), "cz = 100");
        assert_eq!(
            Filter::is_in("cz", [ZoneId(1), ZoneId(2)]).where_clause(),
            "cz IN (1, 2)"
        );
        assert_eq!(Filter::equals("name", "O'Hare").where_clause(), "name = 'O''Hare'");
        assert_eq!(Filter::All.where_clause(), "1=1");
    }

    #[test]
    fn matches_numbers_loosely() {
        let attrs = json!({ "cz": 100.0, "code": "7" });
        let attrs = attrs.as_object().unwrap();
        assert!(Filter::equals("cz", 100i64).matches(attrs));
        assert!(Filter::equals("code", 7i64).matches(attrs));
        assert!(Filter::is_in("cz", [1i64, 100]).matches(attrs));
        assert!(!Filter::equals("cz", 101i64).matches(attrs));
        assert!(!Filter::equals("missing", 1i64).matches(attrs));
        assert!(Literal::Text("100".into()).matches(&json!(100)));
    }

    #[test]
    fn params_follow_rest_names() {
        let q = FeatureQuery::new(Filter::equals("cz", 5i64))
            .with_out_fields(OutFields::only(["n", "o_cz"]));
        let params = q.params();
        assert!(params.contains(&("where", "cz = 5".to_string())));
        assert!(params.contains(&("outFields", "n,o_cz".to_string())));
        assert!(params.contains(&("returnGeometry", "false".to_string())));
        assert!(params.contains(&("f", "json".to_string())));

        let by_id = FeatureQuery::by_object_ids([3, 4]).params();
        assert!(by_id.contains(&("objectIds", "3,4".to_string())));
        assert!(by_id.contains(&("outFields", "*".to_string())));
    }
}
