//! Database Models - structs representing store records (used by sqlx/serde).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Author record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
}

impl Author {
    /// Display name derived from first and last name, trimmed so a
    /// missing half doesn't leave stray whitespace.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Comment embedded in a blog post. Comments have no lifecycle of their
/// own; they live inside the post's `comments` JSONB column in insertion
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
}

/// Blog post row with its author reference resolved at read time.
/// The join is a LEFT JOIN: a dangling author reference yields empty
/// name parts instead of a query error.
#[derive(Debug, Clone, FromRow)]
pub struct ResolvedPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub created: DateTime<Utc>,
    pub comments: Json<Vec<Comment>>,
    pub author_first_name: Option<String>,
    pub author_last_name: Option<String>,
}

impl ResolvedPost {
    /// Derived `"{firstName} {lastName}"` display value.
    pub fn author_name(&self) -> String {
        format!(
            "{} {}",
            self.author_first_name.as_deref().unwrap_or(""),
            self.author_last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

/// Partial author update; only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct AuthorUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

/// Partial blog post update; only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(first: Option<&str>, last: Option<&str>) -> ResolvedPost {
        ResolvedPost {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "t".to_string(),
            content: None,
            created: Utc::now(),
            comments: Json(vec![]),
            author_first_name: first.map(String::from),
            author_last_name: last.map(String::from),
        }
    }

    #[test]
    fn test_author_name_joins_both_parts() {
        assert_eq!(
            resolved(Some("Ada"), Some("Lovelace")).author_name(),
            "Ada Lovelace"
        );
    }

    #[test]
    fn test_author_name_trims_missing_parts() {
        assert_eq!(resolved(Some("Ada"), None).author_name(), "Ada");
        assert_eq!(resolved(None, Some("Lovelace")).author_name(), "Lovelace");
        assert_eq!(resolved(None, None).author_name(), "");
        assert_eq!(resolved(Some(""), Some("")).author_name(), "");
    }

    #[test]
    fn test_display_name_trims() {
        let author = Author {
            id: Uuid::new_v4(),
            first_name: "".to_string(),
            last_name: "Lovelace".to_string(),
            user_name: "ada".to_string(),
        };
        assert_eq!(author.display_name(), "Lovelace");
    }

    #[test]
    fn test_comment_serde_shape() {
        let comment = Comment {
            id: Uuid::new_v4(),
            content: "nice post".to_string(),
        };
        let value = serde_json::to_value(&comment).unwrap();
        assert_eq!(value["content"], "nice post");
        let back: Comment = serde_json::from_value(value).unwrap();
        assert_eq!(back, comment);
    }
}
