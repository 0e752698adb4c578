//! Audit metadata shared by every catalog document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation and last-modification stamps.
///
/// Serialized with camelCase keys and RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditInfo {
    pub created_date: DateTime<Utc>,
    pub created_by: String,
    pub last_modified_date: DateTime<Utc>,
    pub last_modified_by: String,
}

impl AuditInfo {
    /// Stamps a new document as created and last modified by `actor` now.
    pub fn created(actor: &str) -> Self {
        let now = Utc::now();
        Self {
            created_date: now,
            created_by: actor.to_string(),
            last_modified_date: now,
            last_modified_by: actor.to_string(),
        }
    }

    /// Records a modification by `actor` now. Creation stamps are kept.
    pub fn touch(&mut self, actor: &str) {
        self.last_modified_date = Utc::now();
        self.last_modified_by = actor.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::AuditInfo;

    #[test]
    fn touch_keeps_creation_stamp() {
        let mut audit = AuditInfo::created("alice");
        let created_date = audit.created_date;
        audit.touch("bob");
        assert_eq!(audit.created_by, "alice");
        assert_eq!(audit.created_date, created_date);
        assert_eq!(audit.last_modified_by, "bob");
        assert!(audit.last_modified_date >= created_date);
    }

    #[test]
    fn serializes_camel_case_rfc3339() {
        let audit = AuditInfo::created("alice");
        let json = serde_json::to_value(&audit).unwrap();
        assert_eq!(json["createdBy"], "alice");
        let stamp = json["createdDate"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }
}
