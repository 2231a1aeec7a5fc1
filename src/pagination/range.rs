use std::fmt::Display;

/// Identifier bounds applied on top of a caller predicate.
///
/// All present bounds are intersected: `id < max_id AND id >= since_id AND id > min_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange<K> {
    /// Exclusive upper bound
    pub max_id: Option<K>,
    /// Inclusive lower bound
    pub since_id: Option<K>,
    /// Exclusive lower bound
    pub min_id: Option<K>,
}

impl<K> Default for KeyRange<K> {
    fn default() -> Self {
        Self {
            max_id: None,
            since_id: None,
            min_id: None,
        }
    }
}

impl<K: Ord> KeyRange<K> {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Everything strictly newer than `key`
    pub fn above(key: K) -> Self {
        Self {
            min_id: Some(key),
            ..Self::default()
        }
    }

    /// Everything strictly older than `key`
    pub fn below(key: K) -> Self {
        Self {
            max_id: Some(key),
            ..Self::default()
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.admits_upper(key) && self.admits_lower(key)
    }

    pub fn admits_upper(&self, key: &K) -> bool {
        self.max_id.as_ref().map_or(true, |max| key < max)
    }

    pub fn admits_lower(&self, key: &K) -> bool {
        self.since_id.as_ref().map_or(true, |since| key >= since)
            && self.min_id.as_ref().map_or(true, |min| key > min)
    }

    /// True when no key can satisfy the bounds, whatever the key type.
    ///
    /// Only detects emptiness that holds without knowing key successors, so
    /// `min_id = 9, max_id = 10` on integers is not reported.
    pub fn is_empty(&self) -> bool {
        let Some(max) = &self.max_id else { return false };
        self.since_id.as_ref().is_some_and(|since| since >= max)
            || self.min_id.as_ref().is_some_and(|min| min >= max)
    }
}

impl<K: Display> Display for KeyRange<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(max) = &self.max_id {
            parts.push(format!("id < {}", max));
        }
        if let Some(since) = &self.since_id {
            parts.push(format!("id >= {}", since));
        }
        if let Some(min) = &self.min_id {
            parts.push(format!("id > {}", min));
        }
        if parts.is_empty() {
            write!(f, "unbounded")
        } else {
            write!(f, "{}", parts.join(" AND "))
        }
    }
}
