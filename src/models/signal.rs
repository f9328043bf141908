use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

// Epoch values at or above this are taken as milliseconds.
const EPOCH_MILLIS_CUTOFF: f64 = 1e12;

/// A numeric field that either holds a finite value or is explicitly
/// unavailable. Backends send these as numbers, numeric strings, null,
/// or not at all; nothing downstream ever sees a NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Value(f64),
    Unavailable,
}

impl Numeric {
    pub fn from_raw(raw: Option<&Value>) -> Self {
        let parsed = match raw {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(v) if v.is_finite() => Numeric::Value(v),
            _ => Numeric::Unavailable,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Numeric::Value(v) => Some(*v),
            Numeric::Unavailable => None,
        }
    }

    /// Lossy projection for charting. Must not be used to recover the
    /// unavailable-vs-zero distinction.
    pub fn or_zero(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Numeric::Value(_))
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Value(v) => write!(f, "{}", v),
            Numeric::Unavailable => write!(f, "N/A"),
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Numeric::Value(v) => serializer.serialize_f64(*v),
            Numeric::Unavailable => serializer.serialize_none(),
        }
    }
}

/// A timestamp field with two distinct failure markers: `Missing` when the
/// raw field was absent (or null), `Invalid` when it was present but did
/// not parse. The split exists so a broken feed is distinguishable from a
/// sparse one when debugging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    At(DateTime<Utc>),
    Invalid,
    Missing,
}

impl Timestamp {
    pub fn from_raw(raw: Option<&Value>) -> Self {
        match raw {
            None | Some(Value::Null) => Timestamp::Missing,
            Some(Value::String(s)) => Self::from_str(s.trim()),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(epoch) if epoch.is_finite() => Self::from_epoch(epoch),
                _ => Timestamp::Invalid,
            },
            Some(_) => Timestamp::Invalid,
        }
    }

    // Offset-less strings are taken as UTC, matching how the backend
    // serializes its UTC instants when it drops the suffix.
    fn from_str(s: &str) -> Self {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Timestamp::At(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Timestamp::At(Utc.from_utc_datetime(&naive));
        }
        if let Some(naive) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Timestamp::At(Utc.from_utc_datetime(&naive));
        }
        Timestamp::Invalid
    }

    fn from_epoch(epoch: f64) -> Self {
        let millis = if epoch.abs() >= EPOCH_MILLIS_CUTOFF {
            epoch
        } else {
            epoch * 1000.0
        };
        match Utc.timestamp_millis_opt(millis as i64) {
            chrono::LocalResult::Single(dt) => Timestamp::At(dt),
            _ => Timestamp::Invalid,
        }
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::At(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::At(dt) => write!(f, "{}", dt.to_rfc3339()),
            Timestamp::Invalid => write!(f, "Invalid Date"),
            Timestamp::Missing => write!(f, "N/A"),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Timestamp::At(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Timestamp::Invalid => serializer.serialize_str("Invalid Date"),
            Timestamp::Missing => serializer.serialize_none(),
        }
    }
}

/// Predicted trade direction. The backend is supposed to send "LONG" or
/// "SHORT" but the set is open, so anything else is carried through as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
    Other(String),
    Unknown,
}

impl Direction {
    pub fn from_raw(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::String(s)) => match s.as_str() {
                "LONG" => Direction::Long,
                "SHORT" => Direction::Short,
                other => Direction::Other(other.to_string()),
            },
            _ => Direction::Unknown,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
            Direction::Other(s) => write!(f, "{}", s),
            Direction::Unknown => write!(f, "?"),
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Direction::Long => serializer.serialize_str("LONG"),
            Direction::Short => serializer.serialize_str("SHORT"),
            Direction::Other(s) => serializer.serialize_str(s),
            Direction::Unknown => serializer.serialize_none(),
        }
    }
}

/// Signal lifecycle status as reported by the backend. Open set; only
/// PENDING and ACTIVE feed the aggregate counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Pending,
    Active,
    Other(String),
    Unknown,
}

impl Status {
    pub fn from_raw(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::String(s)) => match s.as_str() {
                "PENDING" => Status::Pending,
                "ACTIVE" => Status::Active,
                other => Status::Other(other.to_string()),
            },
            _ => Status::Unknown,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pending => write!(f, "PENDING"),
            Status::Active => write!(f, "ACTIVE"),
            Status::Other(s) => write!(f, "{}", s),
            Status::Unknown => write!(f, "N/A"),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Status::Pending => serializer.serialize_str("PENDING"),
            Status::Active => serializer.serialize_str("ACTIVE"),
            Status::Other(s) => serializer.serialize_str(s),
            Status::Unknown => serializer.serialize_none(),
        }
    }
}

/// Identifier for one signal. `Backend` ids are stable; `Positional` ids
/// are the 1-based index within a single fetch batch and must never be
/// used as a key across refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignalId {
    Backend(String),
    Positional(usize),
}

impl SignalId {
    pub fn from_raw(raw: Option<&Value>, index: usize) -> Self {
        match raw {
            Some(Value::String(s)) if !s.is_empty() => SignalId::Backend(s.clone()),
            Some(Value::Number(n)) => SignalId::Backend(n.to_string()),
            _ => SignalId::Positional(index + 1),
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, SignalId::Positional(_))
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalId::Backend(s) => write!(f, "{}", s),
            SignalId::Positional(n) => write!(f, "{}", n),
        }
    }
}

/// One canonical signal record. Every field is always present, holding
/// either a real value or its unavailable marker; renderers never need
/// defensive access chains.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub id: SignalId,
    pub symbol: Option<String>,
    pub direction: Direction,
    pub entry: Numeric,
    pub tp1: Numeric,
    pub tp2: Numeric,
    pub sl: Numeric,
    pub atr: Numeric,
    pub leverage: Numeric,
    pub blended_prob: Numeric,
    pub status: Status,
    pub prediction_time: Timestamp,
    pub valid_from: Timestamp,
    pub valid_to: Timestamp,
    /// Unrecognized raw fields, passed through untouched. Not part of the
    /// canonical contract.
    pub extra: Map<String, Value>,
}

impl Signal {
    pub fn symbol_label(&self) -> &str {
        self.symbol.as_deref().unwrap_or("N/A")
    }

    /// Blended probability as a percentage, when available.
    pub fn confidence_pct(&self) -> Option<f64> {
        self.blended_prob.value().map(|p| p * 100.0)
    }
}

// Serializes back into the raw wire shape so a canonical batch survives
// another pass through the normalizer unchanged. Positional ids are
// omitted; they are re-derived from position.
impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let SignalId::Backend(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        if let Some(symbol) = &self.symbol {
            map.serialize_entry("symbol", symbol)?;
        }
        map.serialize_entry("direction", &self.direction)?;
        map.serialize_entry("entry", &self.entry)?;
        map.serialize_entry("tp1", &self.tp1)?;
        map.serialize_entry("tp2", &self.tp2)?;
        map.serialize_entry("sl", &self.sl)?;
        map.serialize_entry("atr", &self.atr)?;
        map.serialize_entry("leverage", &self.leverage)?;
        map.serialize_entry("blended_prob", &self.blended_prob)?;
        map.serialize_entry("status", &self.status)?;
        map.serialize_entry("prediction_time", &self.prediction_time)?;
        map.serialize_entry("valid_from", &self.valid_from)?;
        map.serialize_entry("valid_to", &self.valid_to)?;
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
