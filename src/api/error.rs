use serde_json::Value;
use std::fmt;

/// A vendor fault returned inside an otherwise successful HTTP response.
///
/// The backend reports errors as a JSON envelope with
/// `objectType: "KalturaAPIException"` and an opaque `code` string such as
/// `ENTRY_ID_NOT_FOUND` or `QUERY_EXCEEDED_MAX_MATCHES_ALLOWED`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFault {
    pub code: String,
    pub message: String,
}

impl ApiFault {
    /// Extract a fault from a decoded response body, if one is present.
    pub fn from_response(body: &Value) -> Option<Self> {
        let object_type = body.get("objectType")?.as_str()?;
        if object_type != "KalturaAPIException" {
            return None;
        }
        Some(Self {
            code: body
                .get("code")
                .and_then(|c| c.as_str())
                .unwrap_or("UNKNOWN")
                .to_string(),
            message: body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or_default()
                .to_string(),
        })
    }

    /// The object the call referred to does not exist (deleted, wrong ID,
    /// wrong account). Callers usually skip the item and keep going.
    pub fn is_not_found(&self) -> bool {
        self.code.ends_with("_NOT_FOUND") || self.code == "INVALID_OBJECT_ID"
    }

    /// The query would match more objects than the backend allows; the only
    /// fix is narrowing the query (e.g. smaller date chunks).
    pub fn is_query_cap(&self) -> bool {
        self.code == "QUERY_EXCEEDED_MAX_MATCHES_ALLOWED"
    }
}

impl fmt::Display for ApiFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiFault {}

/// Failure modes of a single API round trip, kept separate so the retry
/// policy can classify them.
#[derive(Debug)]
pub enum RequestError {
    /// Transport-level failure (connect, DNS, timeout, non-2xx status).
    Transport(reqwest::Error),
    /// Body arrived but could not be decoded as JSON.
    Decode(reqwest::Error),
    /// The backend returned a fault envelope.
    Fault(ApiFault),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Transport(e) => write!(f, "transport error: {}", e),
            RequestError::Decode(e) => write!(f, "invalid response body: {}", e),
            RequestError::Fault(fault) => write!(f, "API fault {}", fault),
        }
    }
}

impl std::error::Error for RequestError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fault_from_response() {
        let body = json!({
            "objectType": "KalturaAPIException",
            "code": "ENTRY_ID_NOT_FOUND",
            "message": "Entry id \"0_abc\" not found"
        });

        let fault = ApiFault::from_response(&body).unwrap();
        assert_eq!(fault.code, "ENTRY_ID_NOT_FOUND");
        assert!(fault.is_not_found());
        assert!(!fault.is_query_cap());
    }

    #[test]
    fn test_regular_object_is_not_a_fault() {
        let body = json!({
            "objectType": "KalturaMediaEntry",
            "id": "0_abc"
        });
        assert!(ApiFault::from_response(&body).is_none());

        // Plain values (session.start returns a bare string) are fine too.
        assert!(ApiFault::from_response(&json!("djJ8token")).is_none());
    }

    #[test]
    fn test_query_cap_detection() {
        let fault = ApiFault {
            code: "QUERY_EXCEEDED_MAX_MATCHES_ALLOWED".into(),
            message: String::new(),
        };
        assert!(fault.is_query_cap());
    }
}
