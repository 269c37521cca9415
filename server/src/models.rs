use serde::{de::Error as _, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The whole short_code -> original_url mapping, persisted as one JSON object.
pub type LinkMap = BTreeMap<String, String>;

/// Body of `POST /shorten`.
///
/// Both fields are optional at the wire level so that a missing `url` can be
/// answered with a 400 instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShortenRequest {
    pub url: Option<String>,
    #[serde(rename = "shortCode")]
    pub short_code: Option<String>,
}

impl ShortenRequest {
    /// Interpret an already parsed body.
    ///
    /// `null` is refused outright. Any other non-object value carries no
    /// fields, so it reads as a request without a `url`.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Null => Err(serde_json::Error::custom("request body is null")),
            Value::Object(_) => serde_json::from_value(value),
            _ => Ok(Self::default()),
        }
    }
}

/// Successful reply to `POST /shorten`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub success: bool,
    pub short_url: String,
    pub original_url: String,
    pub short_code: String,
}

/// `{ "error": "..." }` body used by every JSON failure response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[cfg_attr(test, derive(Deserialize))]
pub struct ErrorBody {
    pub error: String,
}

/// A link that was just written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub short_code: String,
    pub original_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_bodies_have_no_fields() {
        for value in [json!([]), json!("str"), json!(123), json!(true)] {
            let request = ShortenRequest::from_value(value.clone()).unwrap();
            assert!(request.url.is_none(), "value {value}");
            assert!(request.short_code.is_none(), "value {value}");
        }
    }

    #[test]
    fn null_body_is_refused() {
        assert!(ShortenRequest::from_value(Value::Null).is_err());
    }

    #[test]
    fn object_body_reads_both_fields() {
        let request =
            ShortenRequest::from_value(json!({"url": "https://a.com", "shortCode": "abc"}))
                .unwrap();
        assert_eq!(request.url.as_deref(), Some("https://a.com"));
        assert_eq!(request.short_code.as_deref(), Some("abc"));
    }
}
