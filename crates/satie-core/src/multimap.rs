// src/multimap.rs

/// Ordered mapping from string keys to one or more values, shared by query
/// args, form fields and uploaded files.
///
/// Single-value reads (`get`) return the *last* appended value; `get_all`
/// returns the full sequence in insertion order. Absent keys resolve through
/// `Option` or caller defaults — nothing here panics or errors.
#[derive(Debug, Clone)]
pub struct MultiMap<V> {
    entries: Vec<(String, Vec<V>)>,
}

impl<V> MultiMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Last value for `key`, or `None` when the key is absent or empty.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key)
            .and_then(|i| self.entries[i].1.last())
    }

    /// Last value for `key`, or `default`.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    /// All values for `key` in insertion order; empty slice when absent.
    pub fn get_all(&self, key: &str) -> &[V] {
        match self.position(key) {
            Some(i) => &self.entries[i].1,
            None => &[],
        }
    }

    /// Replace the whole sequence for `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.set_all(key, vec![value]);
    }

    /// Replace the whole sequence for `key`.
    pub fn set_all(&mut self, key: impl Into<String>, values: Vec<V>) {
        let key = key.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1 = values,
            None => self.entries.push((key, values)),
        }
    }

    /// Append one value, keeping whatever was there before.
    pub fn append(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Insert `default` only when `key` is absent.
    pub fn set_default(&mut self, key: impl Into<String>, default: V) {
        let key = key.into();
        if self.position(&key).is_none() {
            self.entries.push((key, vec![default]));
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// (key, last value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .filter_map(|(k, vs)| vs.last().map(|v| (k.as_str(), v)))
    }
}

impl<V> Default for MultiMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for MultiMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = MultiMap::new();
        for (k, v) in iter {
            map.append(k, v);
        }
        map
    }
}
