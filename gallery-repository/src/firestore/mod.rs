//! Firestore provider implementation.
//!
//! This module provides the concrete implementation of `ArtworkRepository`
//! against the Firestore REST protocol, using `reqwest` for transport and
//! `serde_json` for the typed value mapping.

mod value;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::ArtworkRepositoryError;
use crate::interfaces::ArtworkRepository;
use crate::types::{ArtworkPage, OrderDirection, OrderField, PageQuery};
use gallery_shared::{Artwork, Identity, NewArtwork, PageCursor};

const BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Configuration for the Firestore-backed repository.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Google Cloud project id.
    pub project_id: String,
    /// Collection holding the artwork documents.
    pub collection: String,
    /// Bearer token attached to every request when the backend requires
    /// authenticated access.
    pub bearer_token: Option<String>,
}

impl FirestoreConfig {
    /// Create a new Firestore configuration.
    ///
    /// # Arguments
    ///
    /// * `project_id` - The Google Cloud project id
    /// * `collection` - The collection holding artwork documents
    pub fn new(project_id: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            collection: collection.into(),
            bearer_token: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

/// Firestore implementation of [`ArtworkRepository`].
///
/// # Remote schema
///
/// Documents live in a single collection with fields `title` (string),
/// `author` (string), `imageUrl` (string), `voteCount` (integer), `voters`
/// (array of strings), `createdAt` (timestamp), and `type` (integer,
/// optional).
///
/// The event listings combine an equality filter on `type` with an order on
/// `voteCount`; Firestore requires a pre-declared composite index for each
/// such combination (`type ASC, voteCount DESC`, one per queried tag value).
/// Single-field orderings use the automatic indexes.
pub struct FirestoreProvider {
    client: reqwest::Client,
    config: FirestoreConfig,
}

impl FirestoreProvider {
    /// Create a new provider for the configured project and collection.
    pub fn new(config: FirestoreConfig) -> Self {
        info!(
            project_id = %config.project_id,
            collection = %config.collection,
            "Created Firestore provider"
        );
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)", self.config.project_id)
    }

    /// Full resource name of one artwork document.
    fn document_name(&self, artwork_id: &str) -> String {
        format!(
            "{}/documents/{}/{}",
            self.database_path(),
            self.config.collection,
            artwork_id
        )
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}/documents:{}", BASE_URL, self.database_path(), method)
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value, ArtworkRepositoryError> {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ArtworkRepositoryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    fn event_tag_filter(tag: i64) -> Value {
        json!({
            "fieldFilter": {
                "field": { "fieldPath": "type" },
                "op": "EQUAL",
                "value": { "integerValue": tag.to_string() },
            }
        })
    }

    fn structured_query(&self, query: &PageQuery) -> Result<Value, ArtworkRepositoryError> {
        let mut structured = Map::new();
        structured.insert(
            "from".to_string(),
            json!([{ "collectionId": self.config.collection }]),
        );
        if let Some(tag) = query.event_tag {
            structured.insert("where".to_string(), Self::event_tag_filter(tag));
        }
        let direction = match query.direction {
            OrderDirection::Ascending => "ASCENDING",
            OrderDirection::Descending => "DESCENDING",
        };
        // The document name is an explicit tie-breaking order key so a page
        // cursor resolves to exactly one position.
        structured.insert(
            "orderBy".to_string(),
            json!([
                { "field": { "fieldPath": query.order_by.field_path() }, "direction": direction },
                { "field": { "fieldPath": "__name__" }, "direction": direction },
            ]),
        );
        if let Some(cursor) = &query.start_after {
            let token = CursorToken::decode(cursor)?;
            structured.insert(
                "startAt".to_string(),
                json!({
                    "values": [token.value, { "referenceValue": token.name }],
                    "before": false,
                }),
            );
        }
        structured.insert("limit".to_string(), json!(query.limit));
        Ok(Value::Object(structured))
    }
}

#[async_trait]
impl ArtworkRepository for FirestoreProvider {
    async fn fetch_page(&self, query: &PageQuery) -> Result<ArtworkPage, ArtworkRepositoryError> {
        let body = json!({ "structuredQuery": self.structured_query(query)? });
        debug!(limit = query.limit, "running page query");
        let response = self.post(&self.endpoint("runQuery"), &body).await?;

        let entries = response.as_array().ok_or_else(|| {
            ArtworkRepositoryError::decode("expected an array response from runQuery")
        })?;
        // Entries without a document carry only a read time; skip them.
        let documents: Vec<&Value> = entries.iter().filter_map(|e| e.get("document")).collect();

        let mut artworks = Vec::with_capacity(documents.len());
        for document in &documents {
            artworks.push(value::decode_document(document)?);
        }
        let next_cursor = match documents.last() {
            Some(document) => Some(CursorToken::from_document(document, query.order_by)?.encode()?),
            None => None,
        };

        debug!(returned = artworks.len(), "page query complete");
        Ok(ArtworkPage {
            artworks,
            next_cursor,
        })
    }

    async fn count(&self, event_tag: Option<i64>) -> Result<u64, ArtworkRepositoryError> {
        let mut structured = Map::new();
        structured.insert(
            "from".to_string(),
            json!([{ "collectionId": self.config.collection }]),
        );
        if let Some(tag) = event_tag {
            structured.insert("where".to_string(), Self::event_tag_filter(tag));
        }
        let body = json!({
            "structuredAggregationQuery": {
                "structuredQuery": Value::Object(structured),
                "aggregations": [{ "alias": "total", "count": {} }],
            }
        });

        let response = self
            .post(&self.endpoint("runAggregationQuery"), &body)
            .await?;
        response
            .as_array()
            .and_then(|entries| entries.first())
            .and_then(|entry| entry.pointer("/result/aggregateFields/total/integerValue"))
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| ArtworkRepositoryError::decode("missing aggregation count in response"))
    }

    async fn apply_vote(
        &self,
        artwork_id: &str,
        voter: &Identity,
    ) -> Result<(), ArtworkRepositoryError> {
        // One write, two field transforms: the union and the increment land
        // atomically or not at all.
        let body = json!({
            "writes": [{
                "transform": {
                    "document": self.document_name(artwork_id),
                    "fieldTransforms": [
                        {
                            "fieldPath": "voters",
                            "appendMissingElements": {
                                "values": [{ "stringValue": voter.as_str() }]
                            }
                        },
                        {
                            "fieldPath": "voteCount",
                            "increment": { "integerValue": "1" }
                        },
                    ],
                },
                "currentDocument": { "exists": true },
            }]
        });

        debug!(artwork_id, "committing vote transform");
        match self.post(&self.endpoint("commit"), &body).await {
            Ok(_) => Ok(()),
            Err(ArtworkRepositoryError::Rejected { status: 404, .. }) => {
                Err(ArtworkRepositoryError::NotFound(artwork_id.to_string()))
            }
            Err(error) => Err(error),
        }
    }

    async fn insert_artwork(
        &self,
        new_artwork: &NewArtwork,
    ) -> Result<Artwork, ArtworkRepositoryError> {
        // A client-generated id committed with a must-not-exist precondition:
        // the store still arbitrates uniqueness.
        let artwork_id = Uuid::new_v4().to_string();
        let body = json!({
            "writes": [{
                "update": {
                    "name": self.document_name(&artwork_id),
                    "fields": value::new_artwork_fields(new_artwork),
                },
                "updateTransforms": [
                    { "fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME" },
                ],
                "currentDocument": { "exists": false },
            }]
        });

        let response = self.post(&self.endpoint("commit"), &body).await?;
        // The commit reply carries the resolved server timestamp; when it is
        // absent the artwork reads as most recent until the next fetch.
        let created_at = response
            .pointer("/writeResults/0/transformResults/0/timestampValue")
            .and_then(|v| v.as_str())
            .and_then(value::parse_timestamp);

        info!(artwork_id = %artwork_id, "created artwork document");
        Ok(Artwork {
            id: artwork_id,
            title: new_artwork.title.clone(),
            author: new_artwork.author.clone(),
            image_url: new_artwork.image_url.clone(),
            vote_count: 0,
            voters: Vec::new(),
            created_at,
            event_tag: new_artwork.event_tag,
        })
    }
}

/// Page cursor payload for this backend: the last document's order-by value
/// plus its resource name, matching the two order keys of every query.
#[derive(Debug, Serialize, Deserialize)]
struct CursorToken {
    value: Value,
    name: String,
}

impl CursorToken {
    fn from_document(
        document: &Value,
        order_by: OrderField,
    ) -> Result<Self, ArtworkRepositoryError> {
        let name = document
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ArtworkRepositoryError::decode("document without a resource name"))?
            .to_string();
        let value = document
            .pointer(&format!("/fields/{}", order_by.field_path()))
            .cloned()
            .unwrap_or(Value::Null);
        Ok(Self { value, name })
    }

    fn encode(&self) -> Result<PageCursor, ArtworkRepositoryError> {
        let bytes =
            serde_json::to_vec(self).map_err(|e| ArtworkRepositoryError::decode(e.to_string()))?;
        Ok(PageCursor::new(URL_SAFE_NO_PAD.encode(bytes)))
    }

    fn decode(cursor: &PageCursor) -> Result<Self, ArtworkRepositoryError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(cursor.as_str())
            .map_err(|e| ArtworkRepositoryError::invalid_cursor(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| ArtworkRepositoryError::invalid_cursor(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> FirestoreProvider {
        FirestoreProvider::new(FirestoreConfig::new("demo", "artworks"))
    }

    fn page_query(event_tag: Option<i64>, start_after: Option<PageCursor>) -> PageQuery {
        PageQuery {
            event_tag,
            order_by: OrderField::VoteCount,
            direction: OrderDirection::Descending,
            start_after,
            limit: 8,
        }
    }

    #[test]
    fn test_structured_query_default_listing() {
        let structured = provider().structured_query(&page_query(None, None)).unwrap();

        assert!(structured.get("where").is_none());
        assert!(structured.get("startAt").is_none());
        assert_eq!(structured.get("limit"), Some(&json!(8)));
        assert_eq!(
            structured.pointer("/orderBy/0/field/fieldPath").and_then(|v| v.as_str()),
            Some("voteCount")
        );
        assert_eq!(
            structured.pointer("/orderBy/0/direction").and_then(|v| v.as_str()),
            Some("DESCENDING")
        );
        assert_eq!(
            structured.pointer("/orderBy/1/field/fieldPath").and_then(|v| v.as_str()),
            Some("__name__")
        );
    }

    #[test]
    fn test_structured_query_event_filter() {
        let structured = provider().structured_query(&page_query(Some(1), None)).unwrap();
        assert_eq!(
            structured
                .pointer("/where/fieldFilter/value/integerValue")
                .and_then(|v| v.as_str()),
            Some("1")
        );
    }

    #[test]
    fn test_structured_query_resumes_after_cursor() {
        let token = CursorToken {
            value: json!({ "integerValue": "5" }),
            name: "projects/demo/databases/(default)/documents/artworks/last".to_string(),
        };
        let cursor = token.encode().unwrap();
        let structured = provider()
            .structured_query(&page_query(None, Some(cursor)))
            .unwrap();

        assert_eq!(
            structured.pointer("/startAt/before"),
            Some(&json!(false))
        );
        assert_eq!(
            structured
                .pointer("/startAt/values/0/integerValue")
                .and_then(|v| v.as_str()),
            Some("5")
        );
        assert_eq!(
            structured
                .pointer("/startAt/values/1/referenceValue")
                .and_then(|v| v.as_str()),
            Some("projects/demo/databases/(default)/documents/artworks/last")
        );
    }

    #[test]
    fn test_garbage_cursor_is_rejected() {
        let result = provider().structured_query(&page_query(
            None,
            Some(PageCursor::new("not a cursor token")),
        ));
        assert!(matches!(
            result,
            Err(ArtworkRepositoryError::InvalidCursor(_))
        ));
    }
}
