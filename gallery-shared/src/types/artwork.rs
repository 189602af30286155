use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Identity;

/// One gallery submission with its vote tally.
///
/// Mirrors the remote document layout field for field. `title`, `author`,
/// and `image_url` are set at creation and immutable thereafter;
/// `vote_count` and `voters` are mutated only through the atomic vote
/// update. `created_at` is assigned by the store and can be absent if the
/// document is read before the server timestamp resolves, in which case the
/// artwork is treated as the most recent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artwork {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "voteCount")]
    pub vote_count: i64,
    pub voters: Vec<Identity>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Coarse event tag; equality-filterable. Observed values: unset, 1, 2.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub event_tag: Option<i64>,
}

impl Artwork {
    /// Returns true if `identity` has already voted for this artwork.
    pub fn has_voted(&self, identity: &Identity) -> bool {
        self.voters.contains(identity)
    }

    /// Case-insensitive substring match against the title or the author.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term) || self.author.to_lowercase().contains(&term)
    }
}

/// Payload for creating a new artwork document.
///
/// `vote_count`, `voters`, and `created_at` are not part of the payload: new
/// documents always start at zero votes with an empty voter set and a
/// server-assigned timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewArtwork {
    pub title: String,
    pub author: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub event_tag: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork() -> Artwork {
        Artwork {
            id: "a1".to_string(),
            title: "Sunset at the Pier".to_string(),
            author: "Rani".to_string(),
            image_url: "https://example.com/a1.png".to_string(),
            vote_count: 3,
            voters: vec![Identity::new("u1")],
            created_at: None,
            event_tag: Some(1),
        }
    }

    #[test]
    fn test_has_voted() {
        let artwork = artwork();
        assert!(artwork.has_voted(&Identity::new("u1")));
        assert!(!artwork.has_voted(&Identity::new("u2")));
    }

    #[test]
    fn test_matches_search_title_or_author_case_insensitive() {
        let artwork = artwork();
        assert!(artwork.matches_search("sunset"));
        assert!(artwork.matches_search("PIER"));
        assert!(artwork.matches_search("rani"));
        assert!(!artwork.matches_search("harbor"));
    }

    #[test]
    fn test_document_field_names() {
        let json = serde_json::to_value(artwork()).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("voteCount").is_some());
        assert_eq!(json.get("type").and_then(|v| v.as_i64()), Some(1));
        // Absent server timestamp is omitted, not serialized as null.
        assert!(json.get("createdAt").is_none());
    }
}
