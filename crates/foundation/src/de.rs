//! Tolerant numeric deserializers.
//!
//! Attribute tables coming back from feature services mix integers, doubles and
//! numeric strings for the same column. These helpers normalize that at the
//! decoding boundary so the rest of the workspace works with typed values.
//!
//! Use with `#[serde(deserialize_with = "...")]`; the `opt_*` variants also
//! need `#[serde(default)]` so that absent keys decode as `None`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    fn into_f64<E: serde::de::Error>(self) -> Result<Option<f64>, E> {
        match self {
            Numeric::Int(v) => Ok(Some(v as f64)),
            Numeric::Float(v) => Ok(Some(v)),
            Numeric::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                s.parse::<f64>()
                    .map(Some)
                    .map_err(|_| E::custom(format!("expected a number, got {s:?}")))
            }
        }
    }

    fn into_i64<E: serde::de::Error>(self) -> Result<Option<i64>, E> {
        if let Numeric::Int(v) = self {
            return Ok(Some(v));
        }
        let Some(v) = self.into_f64::<E>()? else {
            return Ok(None);
        };
        if !v.is_finite() || v.fract() != 0.0 {
            return Err(E::custom(format!("expected an integral value, got {v}")));
        }
        Ok(Some(v as i64))
    }
}

pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Numeric::deserialize(deserializer)?
        .into_i64::<D::Error>()?
        .ok_or_else(|| D::Error::custom("expected an integer, got an empty string"))
}

pub fn opt_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        Some(n) => n.into_i64(),
        None => Ok(None),
    }
}

/// Non-negative count. Doubles are rounded to the nearest integer.
pub fn opt_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(n) = Option::<Numeric>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let Some(v) = n.into_f64::<D::Error>()? else {
        return Ok(None);
    };
    if !v.is_finite() || v < 0.0 {
        return Err(D::Error::custom(format!("expected a non-negative count, got {v}")));
    }
    Ok(Some(v.round() as u64))
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        Some(n) => Ok(n.into_f64::<D::Error>()?.filter(|v| v.is_finite())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::opt_count")]
        n: Option<u64>,
        #[serde(default, deserialize_with = "super::opt_f64")]
        pr: Option<f64>,
        #[serde(default, deserialize_with = "super::opt_integer")]
        id: Option<i64>,
    }

    #[test]
    fn missing_and_null_decode_as_none() {
        let r: Row = serde_json::from_str(r#"{"n": null}"#).unwrap();
        assert_eq!(r.n, None);
        assert_eq!(r.pr, None);
        assert_eq!(r.id, None);
    }

    #[test]
    fn counts_round_doubles_and_reject_negatives() {
        let r: Row = serde_json::from_str(r#"{"n": 599.6, "pr": "0.25", "id": "7"}"#).unwrap();
        assert_eq!(r.n, Some(600));
        assert_eq!(r.pr, Some(0.25));
        assert_eq!(r.id, Some(7));

        assert!(serde_json::from_str::<Row>(r#"{"n": -1}"#).is_err());
    }

    #[test]
    fn empty_strings_are_missing_values() {
        let r: Row = serde_json::from_str(r#"{"n": "", "pr": " "}"#).unwrap();
        assert_eq!(r.n, None);
        assert_eq!(r.pr, None);
    }
}
