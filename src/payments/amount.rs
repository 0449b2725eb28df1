//! Tolerant decoding for statement amounts.
//!
//! The gateway reports credited/debited amounts as a number, a numeric string,
//! an empty string or `null`. Decoding never fails: anything that is not a
//! usable number degrades to [`OptionalAmount::Absent`] so one malformed field
//! cannot reject a whole statement page.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OptionalAmount {
    Present(f64),
    #[default]
    Absent,
}

impl OptionalAmount {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(Self::Absent, Self::Present),
            Value::String(s) if s.is_empty() => Self::Absent,
            Value::String(s) => serde_json::from_str::<f64>(s)
                .map_or(Self::Absent, Self::Present),
            _ => Self::Absent,
        }
    }

    /// Decodes raw JSON text. Numbers outside the `f64` range and malformed
    /// tokens are [`OptionalAmount::Absent`].
    pub fn from_raw(raw: &str) -> Self {
        serde_json::from_str::<Value>(raw).map_or(Self::Absent, |value| Self::from_json(&value))
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Present(v) => Some(*v),
            Self::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn unwrap_or(&self, default: f64) -> f64 {
        self.value().unwrap_or(default)
    }
}

impl From<Option<f64>> for OptionalAmount {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

impl From<OptionalAmount> for Option<f64> {
    fn from(amount: OptionalAmount) -> Self {
        amount.value()
    }
}

impl<'de> Deserialize<'de> for OptionalAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Buffer the token unparsed; parsing it as a Value would reject
        // out-of-range numbers such as 1e400.
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw.get()))
    }
}

impl Serialize for OptionalAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Present(v) => serializer.serialize_f64(*v),
            Self::Absent => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(raw: &str) -> OptionalAmount {
        serde_json::from_str(raw).expect("decoding never fails on valid JSON")
    }

    #[test]
    fn test_bare_number_is_present() {
        assert_eq!(decode("42.5"), OptionalAmount::Present(42.5));
        assert_eq!(decode("0"), OptionalAmount::Present(0.0));
        assert_eq!(decode("-15"), OptionalAmount::Present(-15.0));
    }

    #[test]
    fn test_numeric_string_is_present() {
        assert_eq!(decode("\"42.5\""), OptionalAmount::Present(42.5));
        assert_eq!(decode("\"1e3\""), OptionalAmount::Present(1000.0));
    }

    #[test]
    fn test_placeholders_are_absent() {
        assert_eq!(decode("\"\""), OptionalAmount::Absent);
        assert_eq!(decode("null"), OptionalAmount::Absent);
    }

    #[test]
    fn test_garbage_degrades_to_absent() {
        assert_eq!(decode("\"abc\""), OptionalAmount::Absent);
        assert_eq!(decode("\"12abc\""), OptionalAmount::Absent);
        assert_eq!(decode("true"), OptionalAmount::Absent);
        assert_eq!(decode("{\"amount\": 1}"), OptionalAmount::Absent);
        assert_eq!(OptionalAmount::from_json(&json!([1, 2])), OptionalAmount::Absent);
    }

    #[test]
    fn test_out_of_range_number_is_absent() {
        assert_eq!(decode("1e400"), OptionalAmount::Absent);
        assert_eq!(decode("-1e400"), OptionalAmount::Absent);
        assert_eq!(decode("\"1e400\""), OptionalAmount::Absent);
        assert_eq!(OptionalAmount::from_raw("12.5"), OptionalAmount::Present(12.5));
    }

    #[test]
    fn test_accessors() {
        let present = OptionalAmount::Present(7.25);
        assert_eq!(present.value(), Some(7.25));
        assert!(present.is_present());
        assert_eq!(OptionalAmount::Absent.unwrap_or(0.0), 0.0);
        assert_eq!(OptionalAmount::from(None), OptionalAmount::Absent);
    }

    #[test]
    fn test_serializes_absent_as_null() {
        assert_eq!(serde_json::to_value(OptionalAmount::Absent).unwrap(), Value::Null);
        assert_eq!(serde_json::to_value(OptionalAmount::Present(3.5)).unwrap(), json!(3.5));
    }
}
