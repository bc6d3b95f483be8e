//! Response envelopes

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const DEFAULT_FAILURE: &str = "request was not successful";

/// Result of a request that reached the server
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Ready(T),
    /// No usable data; render an empty state with this reason
    Placeholder { reason: String },
}

impl<T> Fetched<T> {
    pub fn placeholder(reason: impl Into<String>) -> Self {
        Fetched::Placeholder {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Fetched::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Fetched::Ready(value) => Some(value),
            Fetched::Placeholder { .. } => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Fetched<U> {
        match self {
            Fetched::Ready(value) => Fetched::Ready(f(value)),
            Fetched::Placeholder { reason } => Fetched::Placeholder { reason },
        }
    }
}

/// `{success, error?, ...payload}` as sent by every endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub success: bool,
    pub error: Option<String>,
    pub payload: Map<String, Value>,
}

impl Envelope {
    /// Parse a response body. Anything that is not a JSON object becomes an
    /// unsuccessful envelope.
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(mut map)) => {
                let success = matches!(map.remove("success"), Some(Value::Bool(true)));
                let error = match map.remove("error") {
                    Some(Value::String(s)) => Some(s),
                    Some(Value::Null) | None => None,
                    Some(other) => Some(other.to_string()),
                };
                Self {
                    success,
                    error,
                    payload: map,
                }
            }
            _ => Self {
                success: false,
                error: Some("malformed response".to_string()),
                payload: Map::new(),
            },
        }
    }

    pub fn failure_reason(&self) -> String {
        self.error
            .clone()
            .or_else(|| {
                self.payload
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_FAILURE.to_string())
    }

    /// The whole payload, if the request succeeded
    pub fn into_payload(self) -> Fetched<Map<String, Value>> {
        if self.success {
            Fetched::Ready(self.payload)
        } else {
            Fetched::placeholder(self.failure_reason())
        }
    }

    /// One typed payload field, if the request succeeded and it is present
    pub fn field<T: DeserializeOwned>(mut self, name: &str) -> Fetched<T> {
        if !self.success {
            return Fetched::placeholder(self.failure_reason());
        }

        match self.payload.remove(name) {
            None | Some(Value::Null) => Fetched::placeholder(format!("missing field `{name}`")),
            Some(value) => match serde_json::from_value(value) {
                Ok(parsed) => Fetched::Ready(parsed),
                Err(e) => {
                    tracing::warn!(field = %name, "Malformed response field: {}", e);
                    Fetched::placeholder(format!("malformed field `{name}`"))
                }
            },
        }
    }
}
