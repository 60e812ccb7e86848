//! Pipeline request parameters.
//!
//! [`ParameterSet`] maps parameter names (case-sensitive) to string values.
//! Insertion order is remembered because it is observable in two places:
//! tie-breaking of the case-insensitive V1 sort, and the order of pairs in
//! the final query string. Overwriting a key keeps its original position.

/// Caller access key identifier.
pub const KEY_CALLER_KEY: &str = "callerKey";
/// Pipeline name (`SingleUse`, `Recurring`, ...).
pub const KEY_PIPELINE_NAME: &str = "pipelineName";
/// Protocol version.
pub const KEY_VERSION: &str = "version";
/// Return URL the hosted UI redirects to.
pub const KEY_RETURN_URL: &str = "returnURL";
/// Caller-chosen request reference.
pub const KEY_CALLER_REFERENCE: &str = "callerReference";
/// Signature scheme selector.
pub const KEY_SIGNATURE_VERSION: &str = "signatureVersion";
/// HMAC algorithm name.
pub const KEY_SIGNATURE_METHOD: &str = "signatureMethod";
/// Computed signature; never part of the string-to-sign.
pub const KEY_SIGNATURE: &str = "signature";

/// Ordered, upserting parameter map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`. Last write wins, position is kept.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Upsert every pair, in the iteration order given.
    pub fn set_many<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in pairs {
            self.set(k, v);
        }
    }

    /// Value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Remove `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs that participate in signing (everything except `signature`).
    pub(crate) fn signable(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(k, _)| *k != KEY_SIGNATURE)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        set.set_many(iter);
        set
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for ParameterSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.set_many(iter);
    }
}
