//! Sort and filter modes for the gallery listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Artwork;

/// Sort/filter mode for the gallery listing.
///
/// The two event modes combine an equality filter on the artwork's event tag
/// with the default most-voted ordering; all other modes are pure orderings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Most-voted first. This is the default mode.
    #[default]
    Votes,
    /// Most recently created first.
    Newest,
    /// Oldest first.
    Oldest,
    /// Title, ascending lexicographic.
    Title,
    /// Only artworks tagged with event 1, most-voted first.
    Event1,
    /// Only artworks tagged with event 2, most-voted first.
    Event2,
}

impl SortMode {
    /// The equality filter this mode applies to the remote `type` field, if
    /// any.
    pub fn event_filter(&self) -> Option<i64> {
        match self {
            SortMode::Event1 => Some(1),
            SortMode::Event2 => Some(2),
            _ => None,
        }
    }

    /// Re-sorts an in-memory list under this mode's ordering.
    ///
    /// Event modes order by votes exactly like the default mode: their
    /// filter is applied remotely, never against the materialized list. An
    /// absent `created_at` sorts as the most recent timestamp.
    pub fn sort(&self, artworks: &mut [Artwork]) {
        match self {
            SortMode::Newest => {
                artworks.sort_by(|a, b| created_at_key(b).cmp(&created_at_key(a)))
            }
            SortMode::Oldest => {
                artworks.sort_by(|a, b| created_at_key(a).cmp(&created_at_key(b)))
            }
            SortMode::Title => artworks.sort_by(|a, b| a.title.cmp(&b.title)),
            SortMode::Votes | SortMode::Event1 | SortMode::Event2 => {
                artworks.sort_by(|a, b| b.vote_count.cmp(&a.vote_count))
            }
        }
    }
}

fn created_at_key(artwork: &Artwork) -> DateTime<Utc> {
    artwork.created_at.unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn artwork(id: &str, title: &str, votes: i64, created_secs: Option<i64>) -> Artwork {
        Artwork {
            id: id.to_string(),
            title: title.to_string(),
            author: "author".to_string(),
            image_url: format!("https://example.com/{id}.png"),
            vote_count: votes,
            voters: Vec::new(),
            created_at: created_secs.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            event_tag: None,
        }
    }

    fn ids(artworks: &[Artwork]) -> Vec<&str> {
        artworks.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&SortMode::Votes).unwrap(), "\"votes\"");
        assert_eq!(serde_json::to_string(&SortMode::Event1).unwrap(), "\"event1\"");
        let mode: SortMode = serde_json::from_str("\"oldest\"").unwrap();
        assert_eq!(mode, SortMode::Oldest);
    }

    #[test]
    fn test_event_filter() {
        assert_eq!(SortMode::Event1.event_filter(), Some(1));
        assert_eq!(SortMode::Event2.event_filter(), Some(2));
        assert_eq!(SortMode::Votes.event_filter(), None);
        assert_eq!(SortMode::Title.event_filter(), None);
    }

    #[test]
    fn test_votes_sorts_descending() {
        let mut list = vec![artwork("a", "A", 3, None), artwork("b", "B", 5, None)];
        SortMode::Votes.sort(&mut list);
        assert_eq!(ids(&list), vec!["b", "a"]);
    }

    #[test]
    fn test_title_sorts_ascending() {
        let mut list = vec![
            artwork("1", "Cerulean", 0, None),
            artwork("2", "Amber", 0, None),
            artwork("3", "Basalt", 0, None),
        ];
        SortMode::Title.sort(&mut list);
        let titles: Vec<&str> = list.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Amber", "Basalt", "Cerulean"]);
    }

    #[test]
    fn test_newest_treats_missing_timestamp_as_most_recent() {
        let mut list = vec![
            artwork("old", "Old", 0, Some(100)),
            artwork("pending", "Pending", 0, None),
            artwork("new", "New", 0, Some(200)),
        ];
        SortMode::Newest.sort(&mut list);
        assert_eq!(ids(&list), vec!["pending", "new", "old"]);

        SortMode::Oldest.sort(&mut list);
        assert_eq!(ids(&list), vec!["old", "new", "pending"]);
    }

    #[test]
    fn test_event_modes_sort_by_votes() {
        // The event filter is a remote concern; the local comparator ignores
        // the tag and timestamps entirely.
        let mut list = vec![
            artwork("low", "Low", 1, Some(999)),
            artwork("high", "High", 9, Some(1)),
        ];
        SortMode::Event1.sort(&mut list);
        assert_eq!(ids(&list), vec!["high", "low"]);
    }

    #[test]
    fn test_vote_then_resort_keeps_leader() {
        // [B:5, A:3], vote A -> 4: order is still [B, A].
        let mut list = vec![artwork("b", "B", 5, None), artwork("a", "A", 3, None)];
        list[1].vote_count += 1;
        SortMode::Votes.sort(&mut list);
        assert_eq!(ids(&list), vec!["b", "a"]);
    }
}
