//! Registration record types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Workflow state of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    New,
    Done,
    Skip,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::New, Status::Done, Status::Skip];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Done => "done",
            Status::Skip => "skip",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A client-writable text column and its length cap (in characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextField {
    pub name: &'static str,
    pub max_chars: usize,
}

pub const STORE_NAME: TextField = TextField { name: "store_name", max_chars: 255 };
pub const ADDRESS: TextField = TextField { name: "address", max_chars: 500 };
pub const PHONE: TextField = TextField { name: "phone", max_chars: 20 };
pub const NOTE: TextField = TextField { name: "note", max_chars: 2000 };

/// Columns a partial update may touch, in the order they are copied.
pub const UPDATABLE_FIELDS: [&str; 5] = ["status", "note", "store_name", "address", "phone"];

/// Sanitized row sent to the backend on create.
///
/// `id` and `created_at` are assigned by the backend and never sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRegistration {
    pub store_name: String,
    pub address: String,
    pub phone: String,
    pub note: Option<String>,
    pub status: Status,
    /// Caller-supplied value passed through untouched, or the creation time.
    pub submitted_at: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_round_trips_through_text() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
        assert_eq!("DONE".parse::<Status>(), Err(UnknownStatus("DONE".into())));
        assert_eq!(Status::default(), Status::New);
    }

    #[test]
    fn new_registration_serializes_null_note() {
        let record = NewRegistration {
            store_name: "Acme".into(),
            address: "1 Main St".into(),
            phone: "555".into(),
            note: None,
            status: Status::New,
            submitted_at: json!("2024-01-01T00:00:00.000Z"),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["note"], Value::Null);
        assert_eq!(value["status"], "new");
        assert!(value.get("id").is_none());
    }
}
