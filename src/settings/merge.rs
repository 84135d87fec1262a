//! Deep merge of JSON objects.

use serde_json::Value;

/// Merges `overlay` onto `base`. Where both hold an object under the same
/// key the two are merged recursively; otherwise the overlay value wins.
/// Keys only present in `base` are kept.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}
