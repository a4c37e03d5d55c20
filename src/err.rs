use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Failure of a remote student operation.
///
/// Network and business-rule failures share this type; the variant tells them
/// apart where a caller cares to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "error")]
pub enum Error {
    Network { message: String },
    Rejected { status: u16, message: Option<String> },
    Decode { message: String },
    InvalidUrl { message: String },
}

/// Error body the students API sends along with a non-success status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
}

impl Error {
    /// Builds a `Rejected` error from a raw response body, picking the
    /// server-supplied `message` if the body carries one.
    pub fn rejected(status: u16, body: &str) -> Error {
        let message = serde_json::from_str::<ServerMessage>(body)
            .ok()
            .and_then(|it| it.message)
            .filter(|it| !it.trim().is_empty());
        Error::Rejected { status, message }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. })
    }

    /// The request never produced a usable reply: transport failure or a
    /// body that is not the JSON we expected.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Error::Network { .. } | Error::Decode { .. })
    }

    /// Message the server attached to a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Rejected {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Network { message } => write!(f, "network error: {}", message),
            Error::Rejected {
                status,
                message: Some(message),
            } => write!(f, "HTTP {} error: {}", status, message),
            Error::Rejected {
                status,
                message: None,
            } => write!(f, "HTTP {} error", status),
            Error::Decode { message } => write!(f, "malformed response: {}", message),
            Error::InvalidUrl { message } => write!(f, "invalid url: {}", message),
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode {
                message: err.to_string(),
            };
        }
        if let Some(status) = err.status() {
            return Self::Rejected {
                status: status.as_u16(),
                message: None,
            };
        }
        Self::Network {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_picks_server_message() {
        let err = Error::rejected(422, r#"{"message":"Неверные данные"}"#);
        assert_eq!(err.server_message(), Some("Неверные данные"));
        assert_eq!(err.to_string(), "HTTP 422 error: Неверные данные");
    }

    #[test]
    fn rejected_without_message() {
        assert_eq!(Error::rejected(500, "oops").server_message(), None);
        assert_eq!(Error::rejected(404, r#"{"message":"  "}"#).server_message(), None);
        assert_eq!(
            Error::rejected(400, r#"{"errors":[]}"#),
            Error::Rejected {
                status: 400,
                message: None
            }
        );
    }

    #[test]
    fn serializes_tagged() {
        let err = Error::Network {
            message: "refused".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({"error": "Network", "message": "refused"})
        );
    }

    #[test]
    fn bad_json_becomes_decode() {
        let err: Error = serde_json::from_str::<ServerMessage>("<html>")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.is_unreadable());
        assert!(!err.is_network());
        assert_eq!(serde_json::to_value(&err).unwrap()["error"], "Decode");
    }
}
