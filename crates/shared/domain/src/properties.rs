use serde_json::Value;

/// Property mapping carried by every data object and every chain payload.
pub type Properties = serde_json::Map<String, Value>;

/// Merges `overlay` into `base`; keys from `overlay` win on collision.
pub fn merge(base: &mut Properties, overlay: Properties) {
    for (key, value) in overlay {
        base.insert(key, value);
    }
}
