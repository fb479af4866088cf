use indexmap::IndexMap;
use serde::{ser::SerializeMap, Serialize, Serializer};

/// Identifies an error list: one per attribute plus one for the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKey {
    /// Errors about the record as a whole, such as a missing row.
    Base,

    /// Errors about a single attribute.
    Attribute(String),
}

/// Per-attribute error messages of a record.
///
/// The `Base` list always exists. Lists for attributes are created when an
/// accessor is installed or when an error is first added; clearing empties
/// the lists but keeps them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBag {
    errors: IndexMap<ErrorKey, Vec<String>>,
}

impl ErrorKey {
    pub fn attribute(name: impl Into<String>) -> ErrorKey {
        ErrorKey::Attribute(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            ErrorKey::Base => "base",
            ErrorKey::Attribute(name) => name,
        }
    }
}

impl From<&str> for ErrorKey {
    fn from(name: &str) -> Self {
        match name {
            "base" => ErrorKey::Base,
            name => ErrorKey::Attribute(name.to_string()),
        }
    }
}

impl From<String> for ErrorKey {
    fn from(name: String) -> Self {
        match name.as_str() {
            "base" => ErrorKey::Base,
            _ => ErrorKey::Attribute(name),
        }
    }
}

impl From<&String> for ErrorKey {
    fn from(name: &String) -> Self {
        ErrorKey::from(name.as_str())
    }
}

impl core::fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorBag {
    pub fn new() -> ErrorBag {
        let mut errors = IndexMap::new();
        errors.insert(ErrorKey::Base, vec![]);
        ErrorBag { errors }
    }

    /// Appends `message` to the list for `key`.
    pub fn add(&mut self, key: impl Into<ErrorKey>, message: impl Into<String>) {
        self.errors
            .entry(key.into())
            .or_default()
            .push(message.into());
    }

    /// Creates an empty list for `key` unless one exists.
    pub fn ensure(&mut self, key: impl Into<ErrorKey>) {
        self.errors.entry(key.into()).or_default();
    }

    /// Messages for `key`, empty when none were recorded.
    pub fn on(&self, key: impl Into<ErrorKey>) -> &[String] {
        self.errors
            .get(&key.into())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn base(&self) -> &[String] {
        self.on(ErrorKey::Base)
    }

    pub fn contains_key(&self, key: impl Into<ErrorKey>) -> bool {
        self.errors.contains_key(&key.into())
    }

    /// Empties every list, keeping the keys.
    pub fn clear(&mut self) {
        for messages in self.errors.values_mut() {
            messages.clear();
        }
    }

    /// `true` when any list holds a message.
    pub fn has_error(&self) -> bool {
        self.errors.values().any(|messages| !messages.is_empty())
    }

    pub fn keys(&self) -> impl Iterator<Item = &ErrorKey> {
        self.errors.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ErrorKey, &[String])> {
        self.errors
            .iter()
            .map(|(key, messages)| (key, messages.as_slice()))
    }

    /// Every message, in key order.
    pub fn full_messages(&self) -> Vec<String> {
        self.errors.values().flatten().cloned().collect()
    }
}

impl Default for ErrorBag {
    fn default() -> Self {
        ErrorBag::new()
    }
}

impl Serialize for ErrorBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (key, messages) in &self.errors {
            map.serialize_entry(key.as_str(), messages)?;
        }
        map.end()
    }
}
