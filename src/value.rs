use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use bigdecimal::BigDecimal;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use smol_str::SmolStr;

// ─── FmValue ────────────────────────────────────────────────────────────────

/// A typed field value.
///
/// `List` only ever holds the occurrences of a repeating field with two or
/// more values; a single occurrence is stored as the scalar itself and none
/// at all as `Null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FmValue {
    #[default]
    Null,
    Text(SmolStr),
    Number(BigDecimal),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    /// Opaque container reference (a URL path on the server). Never fetched.
    Container(SmolStr),
    List(Vec<FmValue>),
}

impl FmValue {
    /// Collapse cast occurrences: none → `Null`, one → scalar, more → `List`.
    pub fn from_occurrences(mut datum: Vec<FmValue>) -> Self {
        match datum.len() {
            0 => FmValue::Null,
            1 => datum.pop().unwrap_or_default(),
            _ => FmValue::List(datum),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FmValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FmValue::Text(s) | FmValue::Container(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            FmValue::Number(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FmValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            FmValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            FmValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FmValue]> {
        match self {
            FmValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Occurrences as a slice regardless of collapsing: `Null` is empty, a
    /// scalar is a one-element slice.
    pub fn occurrences(&self) -> &[FmValue] {
        match self {
            FmValue::Null => &[],
            FmValue::List(items) => items,
            scalar => std::slice::from_ref(scalar),
        }
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────

impl Serialize for FmValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FmValue::Null => serializer.serialize_none(),
            FmValue::Text(s) | FmValue::Container(s) => serializer.serialize_str(s.as_str()),
            // Keeps scale and precision as a string; f64 would not.
            FmValue::Number(d) => serializer.collect_str(d),
            FmValue::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            FmValue::Time(t) => serializer.collect_str(&t.format("%H:%M:%S")),
            FmValue::Timestamp(ts) => serializer.collect_str(&ts.format("%Y-%m-%dT%H:%M:%S")),
            FmValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for v in items {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<BigDecimal> for FmValue {
    fn from(d: BigDecimal) -> Self {
        FmValue::Number(d)
    }
}

impl From<i64> for FmValue {
    fn from(n: i64) -> Self {
        FmValue::Number(BigDecimal::from(n))
    }
}

impl From<i32> for FmValue {
    fn from(n: i32) -> Self {
        FmValue::Number(BigDecimal::from(n))
    }
}

impl From<u64> for FmValue {
    fn from(n: u64) -> Self {
        FmValue::Number(BigDecimal::from(n))
    }
}

impl From<&str> for FmValue {
    fn from(s: &str) -> Self {
        FmValue::Text(SmolStr::from(s))
    }
}

impl From<String> for FmValue {
    fn from(s: String) -> Self {
        FmValue::Text(SmolStr::from(s))
    }
}

impl From<SmolStr> for FmValue {
    fn from(s: SmolStr) -> Self {
        FmValue::Text(s)
    }
}

impl From<NaiveDate> for FmValue {
    fn from(d: NaiveDate) -> Self {
        FmValue::Date(d)
    }
}

impl From<NaiveTime> for FmValue {
    fn from(t: NaiveTime) -> Self {
        FmValue::Time(t)
    }
}

impl From<NaiveDateTime> for FmValue {
    fn from(ts: NaiveDateTime) -> Self {
        FmValue::Timestamp(ts)
    }
}

impl<T: Into<FmValue>> From<Option<T>> for FmValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FmValue::Null, Into::into)
    }
}

impl<T: Into<FmValue>> From<Vec<T>> for FmValue {
    fn from(items: Vec<T>) -> Self {
        FmValue::from_occurrences(items.into_iter().map(Into::into).collect())
    }
}

// ─── Into serde_json::Value ─────────────────────────────────────────────────

impl From<&FmValue> for serde_json::Value {
    fn from(val: &FmValue) -> Self {
        match val {
            FmValue::Null => serde_json::Value::Null,
            FmValue::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            other => serde_json::to_value(other).unwrap_or(serde_json::Value::Null),
        }
    }
}
