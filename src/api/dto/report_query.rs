//! Query parameters accepted by the report endpoint.

/// Query string of `GET /`, `GET /summary` and friends.
///
/// Parameters are kept as raw strings: an unknown province code is a 404,
/// not a deserialization failure.
#[derive(Debug, Default)]
pub struct ReportQuery {
    /// Two-letter province code, matched case-insensitively.
    pub province: Option<String>,
    /// Development-only refresh flag; `?refresh`, `?refresh=true`, `?refresh=1` all count.
    pub refresh: Option<String>,
}

impl ReportQuery {
    /// Builds the query from decoded `(name, value)` pairs.
    ///
    /// A repeated parameter keeps its first value and unknown parameters
    /// are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (name, value) in pairs {
            match name.as_str() {
                "province" if query.province.is_none() => query.province = Some(value),
                "refresh" if query.refresh.is_none() => query.refresh = Some(value),
                _ => {}
            }
        }
        query
    }

    /// Whether the `refresh` flag is present and not explicitly disabled.
    pub fn refresh_requested(&self) -> bool {
        match self.refresh.as_deref() {
            None => false,
            Some(v) => !(v.eq_ignore_ascii_case("false") || v == "0"),
        }
    }
}
