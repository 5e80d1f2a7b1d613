//! Registration record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Grade or category a registrant is interested in.
///
/// Declaration order is the tie-break order for grouped counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassName {
    #[serde(rename = "5th")]
    Fifth,
    #[serde(rename = "6th")]
    Sixth,
    #[serde(rename = "7th")]
    Seventh,
    #[serde(rename = "8th")]
    Eighth,
    #[serde(rename = "9th")]
    Ninth,
    #[serde(rename = "10th")]
    Tenth,
    #[serde(rename = "11th")]
    Eleventh,
    #[serde(rename = "12th")]
    Twelfth,
    Other,
}

impl ClassName {
    pub const ALL: [ClassName; 9] = [
        ClassName::Fifth,
        ClassName::Sixth,
        ClassName::Seventh,
        ClassName::Eighth,
        ClassName::Ninth,
        ClassName::Tenth,
        ClassName::Eleventh,
        ClassName::Twelfth,
        ClassName::Other,
    ];

    /// Label as submitted by the form and shown in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassName::Fifth => "5th",
            ClassName::Sixth => "6th",
            ClassName::Seventh => "7th",
            ClassName::Eighth => "8th",
            ClassName::Ninth => "9th",
            ClassName::Tenth => "10th",
            ClassName::Eleventh => "11th",
            ClassName::Twelfth => "12th",
            ClassName::Other => "Other",
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClassName::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown class: {s}"))
    }
}

/// Raw fields of a submission, exactly as the client sent them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFields {
    pub full_name: Option<String>,
    pub class_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone_number: Option<String>,
    pub question: Option<String>,
}

/// Trimmed, validated fields ready to become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub full_name: String,
    pub class_name: ClassName,
    pub city: String,
    pub state: String,
    pub phone_number: String,
    pub question: String,
}

/// A stored registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub id: Uuid,
    pub full_name: String,
    pub class_name: ClassName,
    pub city: String,
    pub state: String,
    pub phone_number: String,
    pub question: String,
    pub submitted_at: DateTime<Utc>,
}

impl RegistrationRecord {
    /// Create a record stamped with the current time.
    pub fn new(registration: NewRegistration) -> Self {
        Self::with_submitted_at(registration, Utc::now())
    }

    /// Create a record with an explicit submission time.
    pub fn with_submitted_at(registration: NewRegistration, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: registration.full_name,
            class_name: registration.class_name,
            city: registration.city,
            state: registration.state,
            phone_number: registration.phone_number,
            question: registration.question,
            submitted_at,
        }
    }
}

/// Number of records for one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassCount {
    pub class_name: ClassName,
    pub count: usize,
}

/// Counts taken from one consistent view of the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStats {
    pub total: usize,
    /// Records submitted at or after the requested instant
    pub since: usize,
    pub by_class: Vec<ClassCount>,
}
