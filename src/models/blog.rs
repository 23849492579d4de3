use serde::{Deserialize, Serialize};

use crate::utils::{strip_html, truncate_string};

/// Maximum excerpt length shown in the posts list
const EXCERPT_DISPLAY_LENGTH: usize = 80;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

impl BlogPost {
    pub fn author_display(&self) -> &str {
        self.author.as_deref().unwrap_or("-")
    }

    pub fn status_label(&self) -> &'static str {
        if self.published {
            "published"
        } else {
            "draft"
        }
    }

    /// One-line summary for the list view. Uses the explicit excerpt when
    /// present, otherwise the stripped post body.
    pub fn summary(&self) -> String {
        let source = match self.excerpt {
            Some(ref e) if !e.is_empty() => e.clone(),
            _ => strip_html(&self.content),
        };
        truncate_string(source.trim(), EXCERPT_DISPLAY_LENGTH)
    }

    /// Post body with markup removed, for the detail pane.
    pub fn plain_content(&self) -> String {
        strip_html(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blog_post() {
        let json = r#"{
            "_id": "66b1f2c9e4a1d20012ab34cd",
            "title": "Topping Out at the Riverside Project",
            "slug": "topping-out-riverside",
            "content": "<p>Last week our crews placed the final beam.</p>",
            "excerpt": "The final beam is in place.",
            "author": "M. Reyes",
            "published": true,
            "createdAt": "2025-11-03T09:12:44.000Z"
        }"#;

        let post: BlogPost = serde_json::from_str(json).expect("Failed to parse blog post");
        assert_eq!(post.id, "66b1f2c9e4a1d20012ab34cd");
        assert_eq!(post.title, "Topping Out at the Riverside Project");
        assert!(post.published);
        assert_eq!(post.status_label(), "published");
        assert_eq!(post.summary(), "The final beam is in place.");
    }

    #[test]
    fn test_parse_minimal_post_defaults_to_draft() {
        // Drafts created through the admin form may have nothing but a title
        let json = r#"{"_id": "abc123", "title": "Untitled"}"#;
        let post: BlogPost = serde_json::from_str(json).expect("Failed to parse minimal post");
        assert!(!post.published);
        assert_eq!(post.status_label(), "draft");
        assert_eq!(post.author_display(), "-");
        assert_eq!(post.summary(), "");
    }

    #[test]
    fn test_summary_strips_markup_when_no_excerpt() {
        let post = BlogPost {
            id: "p1".to_string(),
            title: "t".to_string(),
            slug: None,
            content: "<p>Concrete <b>cures</b> slowly.</p>".to_string(),
            excerpt: None,
            author: None,
            published: false,
            created_at: None,
        };
        assert_eq!(post.summary(), "Concrete cures slowly.");
    }
}
