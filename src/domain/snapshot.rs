//! Cached report payloads.

/// The cached text of one partition's most recent successful fetch.
///
/// The payload is opaque: it is stored and served byte-for-byte as the
/// upstream returned it. The frontend owns parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for Snapshot {
    fn from(body: String) -> Self {
        Self(body)
    }
}
