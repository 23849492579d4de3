use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInquiry {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

impl ContactInquiry {
    pub fn subject_display(&self) -> &str {
        match self.subject {
            Some(ref s) if !s.is_empty() => s,
            _ => "(no subject)",
        }
    }

    /// Marker shown in the inquiries list
    pub fn read_marker(&self) -> &'static str {
        if self.read {
            " "
        } else {
            "●"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contact_inquiry() {
        let json = r#"{
            "_id": "66d4bb22e4a1d20012cc9911",
            "name": "Tom Alvarez",
            "email": "tom@example.com",
            "phone": "(555) 201-8876",
            "subject": "Warehouse expansion quote",
            "message": "We are planning a 20,000 sqft expansion.",
            "read": false,
            "createdAt": "2026-02-02T08:30:00.000Z"
        }"#;

        let inquiry: ContactInquiry = serde_json::from_str(json).expect("Failed to parse inquiry");
        assert_eq!(inquiry.name, "Tom Alvarez");
        assert_eq!(inquiry.subject_display(), "Warehouse expansion quote");
        assert!(!inquiry.read);
        assert_eq!(inquiry.read_marker(), "●");
    }

    #[test]
    fn test_empty_subject_placeholder() {
        let json = r#"{
            "_id": "c2",
            "name": "Ana",
            "email": "ana@example.com",
            "message": "Call me back please.",
            "read": true
        }"#;
        let inquiry: ContactInquiry = serde_json::from_str(json).expect("Failed to parse inquiry");
        assert_eq!(inquiry.subject_display(), "(no subject)");
        assert_eq!(inquiry.read_marker(), " ");
    }
}
