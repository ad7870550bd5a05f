//! Case-insensitive header assembly for outgoing requests.

/// An ordered set of outgoing headers.
///
/// Header names are compared case-insensitively. Setting a header whose name
/// differs only by case from an existing one replaces it, and the casing of
/// the most recent name is the one transmitted.
///
/// # Example
///
/// ```rust
/// use dm_api_client::OutgoingHeaders;
///
/// let mut headers = OutgoingHeaders::new();
/// headers.set("Content-Type", "application/json");
/// headers.set("content-type", "text/plain");
///
/// assert_eq!(headers.len(), 1);
/// assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
/// assert_eq!(headers.iter().next(), Some(("content-type", "text/plain")));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutgoingHeaders {
    entries: Vec<(String, String)>,
}

impl OutgoingHeaders {
    /// Creates an empty header set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a header, replacing any header with the same case-folded name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let key = name.to_ascii_lowercase();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.to_ascii_lowercase() == key)
        {
            Some(entry) => *entry = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    /// Merges headers in order; later entries win.
    pub fn merge<I, K, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.set(name, value);
        }
    }

    /// Looks up a header value by case-insensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first candidate header that is present with a non-empty value.
    #[must_use]
    pub fn first_present<'a, I, S>(&'a self, candidates: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        candidates
            .into_iter()
            .find_map(|name| self.get(name.as_ref()).filter(|value| !value.is_empty()))
    }

    /// Iterates over headers with their transmitted casing.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of distinct headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no header is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
