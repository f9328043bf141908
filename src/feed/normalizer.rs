use serde_json::{Map, Value};

use crate::models::{Direction, Numeric, Signal, SignalId, Status, Timestamp};

/// Raw field consulted when `prediction_time` is absent.
const PREDICTION_TIME_FALLBACK: &str = "timestamp";

const CANONICAL_FIELDS: &[&str] = &[
    "id",
    "symbol",
    "direction",
    "entry",
    "tp1",
    "tp2",
    "sl",
    "atr",
    "leverage",
    "blended_prob",
    "status",
    "prediction_time",
    "valid_from",
    "valid_to",
];

/// The shapes the backend has been observed to return for the same
/// endpoint. Detection priority: sequence, then single record, then a
/// `{results: [...]}` wrapper, then nothing usable.
enum Payload<'a> {
    Sequence(&'a [Value]),
    Single(&'a Value),
    Wrapped(&'a [Value]),
    Empty,
}

fn detect(payload: &Value) -> Payload<'_> {
    match payload {
        Value::Array(items) => Payload::Sequence(items),
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(items)) => Payload::Wrapped(items),
            _ => Payload::Single(payload),
        },
        _ => Payload::Empty,
    }
}

/// Convert an arbitrary decoded response body into canonical signals.
/// Never fails: unrecognized shapes degrade to an empty batch and
/// unparsable fields degrade to their unavailable markers. Backend order
/// is preserved.
pub fn normalize(payload: &Value) -> Vec<Signal> {
    let records: &[Value] = match detect(payload) {
        Payload::Sequence(items) | Payload::Wrapped(items) => items,
        Payload::Single(record) => std::slice::from_ref(record),
        Payload::Empty => &[],
    };

    records
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_record(raw, index))
        .collect()
}

fn normalize_record(raw: &Value, index: usize) -> Signal {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);
    let get = |key: &str| fields.get(key);

    let prediction_time = match Timestamp::from_raw(get("prediction_time")) {
        Timestamp::Missing => Timestamp::from_raw(get(PREDICTION_TIME_FALLBACK)),
        parsed => parsed,
    };

    let extra: Map<String, Value> = fields
        .iter()
        .filter(|(key, _)| !CANONICAL_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Signal {
        id: SignalId::from_raw(get("id"), index),
        symbol: get("symbol").and_then(Value::as_str).map(str::to_string),
        direction: Direction::from_raw(get("direction")),
        entry: Numeric::from_raw(get("entry")),
        tp1: Numeric::from_raw(get("tp1")),
        tp2: Numeric::from_raw(get("tp2")),
        sl: Numeric::from_raw(get("sl")),
        atr: Numeric::from_raw(get("atr")),
        leverage: Numeric::from_raw(get("leverage")),
        blended_prob: Numeric::from_raw(get("blended_prob")),
        status: Status::from_raw(get("status")),
        prediction_time,
        valid_from: Timestamp::from_raw(get("valid_from")),
        valid_to: Timestamp::from_raw(get("valid_to")),
        extra,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_payload() {
        let batch = normalize(&json!([{"symbol": "BTC"}, {"symbol": "ETH"}]));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].symbol.as_deref(), Some("BTC"));
        assert_eq!(batch[1].symbol.as_deref(), Some("ETH"));
    }

    #[test]
    fn single_object_payload() {
        let batch = normalize(&json!({"symbol": "BTC", "entry": 100.0}));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].entry, Numeric::Value(100.0));
    }

    #[test]
    fn wrapped_results_payload() {
        let batch = normalize(&json!({"results": [{"symbol": "SOL"}]}));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].symbol.as_deref(), Some("SOL"));
    }

    #[test]
    fn object_with_non_array_results_is_one_record() {
        let batch = normalize(&json!({"results": "pending", "symbol": "BTC"}));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].symbol.as_deref(), Some("BTC"));
    }

    #[test]
    fn garbage_payloads_yield_empty_batches() {
        assert!(normalize(&json!(null)).is_empty());
        assert!(normalize(&json!("oops")).is_empty());
        assert!(normalize(&json!(42)).is_empty());
    }

    #[test]
    fn non_object_records_are_fully_unavailable() {
        let batch = normalize(&json!(["junk"]));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, SignalId::Positional(1));
        assert_eq!(batch[0].entry, Numeric::Unavailable);
        assert_eq!(batch[0].prediction_time, Timestamp::Missing);
    }

    #[test]
    fn positional_ids_are_one_based_per_batch() {
        let batch = normalize(&json!([{}, {"id": "real"}, {}]));
        assert_eq!(batch[0].id, SignalId::Positional(1));
        assert_eq!(batch[1].id, SignalId::Backend("real".to_string()));
        assert_eq!(batch[2].id, SignalId::Positional(3));
    }

    #[test]
    fn prediction_time_fallback_field() {
        let batch = normalize(&json!([{"timestamp": "2024-01-01T00:00:00Z"}]));
        assert!(batch[0].prediction_time.instant().is_some());

        // Unparsable prediction_time does not fall through to the fallback.
        let batch = normalize(&json!([{
            "prediction_time": "garbled",
            "timestamp": "2024-01-01T00:00:00Z"
        }]));
        assert_eq!(batch[0].prediction_time, Timestamp::Invalid);
    }

    #[test]
    fn extra_fields_pass_through() {
        let batch = normalize(&json!([{"symbol": "BTC", "exchange": "binance"}]));
        assert_eq!(batch[0].extra.get("exchange"), Some(&json!("binance")));
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = json!([
            {
                "id": 7,
                "symbol": "BTC",
                "direction": "LONG",
                "entry": "50000.5",
                "tp1": null,
                "sl": "abc",
                "status": "PENDING",
                "prediction_time": "2024-01-01T00:00:00Z",
                "valid_to": "not a date",
                "exchange": "binance"
            },
            {"symbol": "ETH"}
        ]);
        let once = normalize(&raw);
        let twice = normalize(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }
}
