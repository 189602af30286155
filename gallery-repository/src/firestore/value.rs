//! Mapping between Firestore's typed JSON values and the artwork types.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::errors::ArtworkRepositoryError;
use gallery_shared::{Artwork, Identity, NewArtwork};

/// Builds the typed `fields` map for a new artwork document.
///
/// New documents always start with a zero counter and an empty voter set.
/// `createdAt` is not part of the map: the commit applies it as a
/// server-time transform.
pub(super) fn new_artwork_fields(new_artwork: &NewArtwork) -> Value {
    let mut fields = serde_json::Map::new();
    fields.insert("title".to_string(), string_value(&new_artwork.title));
    fields.insert("author".to_string(), string_value(&new_artwork.author));
    fields.insert("imageUrl".to_string(), string_value(&new_artwork.image_url));
    fields.insert("voteCount".to_string(), integer_value(0));
    fields.insert("voters".to_string(), json!({ "arrayValue": {} }));
    if let Some(tag) = new_artwork.event_tag {
        fields.insert("type".to_string(), integer_value(tag));
    }
    Value::Object(fields)
}

pub(super) fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

/// Firestore encodes 64-bit integers as decimal strings.
pub(super) fn integer_value(i: i64) -> Value {
    json!({ "integerValue": i.to_string() })
}

/// Decodes one query-result document into an [`Artwork`].
///
/// `title`, `author`, and `imageUrl` are required; an absent counter reads
/// as zero and an absent voter array as empty.
pub(super) fn decode_document(document: &Value) -> Result<Artwork, ArtworkRepositoryError> {
    let name = document
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ArtworkRepositoryError::decode("document without a resource name"))?;
    let id = name.rsplit('/').next().unwrap_or(name).to_string();
    let fields = document.get("fields").cloned().unwrap_or_else(|| json!({}));

    Ok(Artwork {
        id,
        title: required_string(&fields, "title")?,
        author: required_string(&fields, "author")?,
        image_url: required_string(&fields, "imageUrl")?,
        vote_count: optional_integer(&fields, "voteCount").unwrap_or(0),
        voters: voters(&fields),
        created_at: optional_timestamp(&fields, "createdAt"),
        event_tag: optional_integer(&fields, "type"),
    })
}

pub(super) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn required_string(fields: &Value, path: &str) -> Result<String, ArtworkRepositoryError> {
    fields
        .pointer(&format!("/{path}/stringValue"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| ArtworkRepositoryError::decode(format!("missing string field `{path}`")))
}

fn optional_integer(fields: &Value, path: &str) -> Option<i64> {
    match fields.pointer(&format!("/{path}/integerValue"))? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

fn optional_timestamp(fields: &Value, path: &str) -> Option<DateTime<Utc>> {
    fields
        .pointer(&format!("/{path}/timestampValue"))
        .and_then(|v| v.as_str())
        .and_then(parse_timestamp)
}

fn voters(fields: &Value) -> Vec<Identity> {
    fields
        .pointer("/voters/arrayValue/values")
        .and_then(|v| v.as_array())
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.get("stringValue").and_then(|s| s.as_str()))
                .map(Identity::new)
                .collect()
        })
        .unwrap_or_default()
}
