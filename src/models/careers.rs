use serde::{Deserialize, Serialize};

/// Review state for a career application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    New,
    Reviewed,
    Shortlisted,
    Rejected,
}

impl ApplicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::New => "new",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Next state in the review cycle (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            ApplicationStatus::New => ApplicationStatus::Reviewed,
            ApplicationStatus::Reviewed => ApplicationStatus::Shortlisted,
            ApplicationStatus::Shortlisted => ApplicationStatus::Rejected,
            ApplicationStatus::Rejected => ApplicationStatus::New,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerApplication {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub position: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "resumeUrl", default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

impl CareerApplication {
    pub fn message_display(&self) -> &str {
        self.message.as_deref().unwrap_or("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_career_application() {
        let json = r#"{
            "_id": "66c0aa11e4a1d20012ffee00",
            "name": "Priya Shah",
            "email": "priya@example.com",
            "phone": "5559876543",
            "position": "Site Supervisor",
            "message": "Eight years running commercial sites.",
            "resumeUrl": "https://cdn.example.com/resumes/priya.pdf",
            "status": "shortlisted",
            "createdAt": "2026-01-19T15:02:10.000Z"
        }"#;

        let app: CareerApplication =
            serde_json::from_str(json).expect("Failed to parse application");
        assert_eq!(app.name, "Priya Shah");
        assert_eq!(app.position, "Site Supervisor");
        assert_eq!(app.status, ApplicationStatus::Shortlisted);
    }

    #[test]
    fn test_missing_status_defaults_to_new() {
        let json = r#"{
            "_id": "a1",
            "name": "Lee Brandt",
            "email": "lee@example.com",
            "position": "Estimator"
        }"#;
        let app: CareerApplication =
            serde_json::from_str(json).expect("Failed to parse application");
        assert_eq!(app.status, ApplicationStatus::New);
        assert_eq!(app.message_display(), "-");
    }

    #[test]
    fn test_status_cycle_wraps() {
        let mut status = ApplicationStatus::New;
        for _ in 0..4 {
            status = status.next();
        }
        assert_eq!(status, ApplicationStatus::New);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ApplicationStatus::Reviewed).unwrap();
        assert_eq!(json, r#""reviewed""#);
    }
}
