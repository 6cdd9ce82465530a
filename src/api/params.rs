//! Typed access to query-string parameters.
//!
//! Repeated keys keep their first value; missing keys read as empty.

use axum::extract::{FromRequestParts, RawQuery};
use axum::http::request::Parts;
use std::{collections::HashMap, convert::Infallible};
use url::form_urlencoded;

#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    #[must_use]
    pub fn parse(query: Option<&str>) -> Self {
        let mut values = HashMap::new();
        for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            values
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self { values }
    }

    /// First value supplied for `key`, if any.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn value_or_empty(&self, key: &str) -> &str {
        self.first(key).unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RawQuery(query) = RawQuery::from_request_parts(parts, state).await?;
        Ok(Self::parse(query.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_wins() {
        let params = QueryParams::parse(Some("username=a&username=b&password=x"));
        assert_eq!(params.first("username"), Some("a"));
        assert_eq!(params.first("password"), Some("x"));
    }

    #[test]
    fn missing_reads_empty() {
        let params = QueryParams::parse(None);
        assert_eq!(params.first("username"), None);
        assert_eq!(params.value_or_empty("username"), "");

        let params = QueryParams::parse(Some("username="));
        assert_eq!(params.first("username"), Some(""));
    }

    #[test]
    fn values_are_percent_decoded() {
        let params = QueryParams::parse(Some("username=m%40tt&password=pass+word%21"));
        assert_eq!(params.value_or_empty("username"), "m@tt");
        assert_eq!(params.value_or_empty("password"), "pass word!");
    }

    #[test]
    fn keys_without_values() {
        let params = QueryParams::parse(Some("multiplier&other=1"));
        assert_eq!(params.first("multiplier"), Some(""));
        assert_eq!(params.first("other"), Some("1"));
    }
}
