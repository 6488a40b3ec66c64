use serde_json::Value;

use crate::types::Classification;

/// Keys probed, in order, for the authoritative decision object.
const DECISION_KEYS: [&str; 3] = ["final_decision", "ensemble", "ensemble_result"];
/// Alternative spellings of the predicted category.
const CATEGORY_KEYS: [&str; 3] = ["label", "name", "category"];
/// Alternative spellings of the model confidence. The first present key wins
/// even when its value fails numeric coercion.
const CONFIDENCE_KEYS: [&str; 2] = ["confidence", "score"];

/// Maps the classifier's variably-shaped response into the fixed
/// `Classification` contract.
///
/// The decision may arrive nested under any of `DECISION_KEYS` or flat at the
/// top level; field names and types vary per model version. Unknown layouts
/// fall back to defaults rather than failing, and the original body is always
/// preserved in `raw`.
pub fn normalize(raw: Value) -> Classification {
    let decision = DECISION_KEYS
        .iter()
        .find_map(|key| raw.get(key))
        .unwrap_or(&raw);

    let (category, confidence, source) = match decision.as_object() {
        Some(fields) => (
            CATEGORY_KEYS
                .iter()
                .find_map(|key| fields.get(*key))
                .and_then(Value::as_str)
                .map(str::to_string),
            CONFIDENCE_KEYS
                .iter()
                .find_map(|key| fields.get(*key))
                .and_then(as_number)
                .unwrap_or(0.0),
            fields
                .get("source")
                .and_then(Value::as_str)
                .map(str::to_string),
        ),
        None => (None, 0.0, None),
    };

    Classification {
        category,
        confidence,
        source,
        raw,
    }
}

/// Numeric coercion: JSON numbers pass through, string-encoded numbers parse.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
