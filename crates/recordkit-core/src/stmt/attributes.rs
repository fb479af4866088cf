use super::Value;

use indexmap::IndexMap;

/// An insertion-ordered map from attribute name to value.
///
/// The same shape serves as a record's attribute map, a query filter and a
/// create/update payload.
pub type Attributes = IndexMap<String, Value>;

/// Returns `base` with every entry of `overriding` written over it.
///
/// Keys present in both maps take the value from `overriding`; keys only in
/// `base` keep their position.
pub fn merge(base: &Attributes, overriding: &Attributes) -> Attributes {
    let mut merged = base.clone();
    for (key, value) in overriding {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
