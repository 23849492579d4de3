use serde::{Deserialize, Serialize};

/// Profile of the logged-in admin as reported by the auth service.
/// Opaque display data - no validation is performed on this side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

impl UserProfile {
    /// Short label for the title bar, falling back to the email address.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_profile() {
        let json = r#"{"name": "Dana Okafor", "email": "dana@example.com"}"#;
        let user: UserProfile = serde_json::from_str(json).expect("Failed to parse user profile");
        assert_eq!(user.name, "Dana Okafor");
        assert_eq!(user.email, "dana@example.com");
        assert_eq!(user.display_name(), "Dana Okafor");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = UserProfile {
            name: String::new(),
            email: "admin@example.com".to_string(),
        };
        assert_eq!(user.display_name(), "admin@example.com");
    }
}
