use crate::transport::Transport;
use crate::{ClientError, Result};
use cloudant_core::{
    BulkResult, DatabaseInfo, DocumentRef, FindResult, Index, IndexInfo, IndexList, IndexResult,
    OkResponse, Options, Query, ViewOptions, ViewResult,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Handle bound to one named database
#[derive(Clone)]
pub struct Database {
    name: String,
    transport: Arc<Transport>,
}

#[derive(Serialize)]
struct BulkDocsRequest<'a, T> {
    docs: &'a [T],
}

#[derive(Serialize)]
struct KeysRequest<'a> {
    keys: &'a [Value],
}

#[derive(Deserialize)]
struct RevOnly {
    #[serde(rename = "_rev")]
    rev: String,
}

impl Database {
    pub(crate) fn new(name: String, transport: Arc<Transport>) -> Self {
        Self { name, transport }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start a request for a path below this database
    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let mut path = Vec::with_capacity(segments.len() + 1);
        path.push(self.name.as_str());
        path.extend_from_slice(segments);
        self.transport.request(method, &path)
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        self.transport.send(req).await
    }

    /// Database metadata (`GET /{db}`)
    #[tracing::instrument(skip(self), fields(db = %self.name))]
    pub async fn info(&self) -> Result<DatabaseInfo> {
        let req = self.request(Method::GET, &[])?;
        self.send(req).await
    }

    /// Store a new document. The server assigns an id unless the value
    /// carries `_id`; an existing id fails with `Conflict`.
    #[tracing::instrument(skip(self, value), fields(db = %self.name))]
    pub async fn create_document<T: Serialize + ?Sized>(&self, value: &T) -> Result<DocumentRef> {
        let body = to_object(value)?;
        let req = self.request(Method::POST, &[])?.json(&body);
        let doc: DocumentRef = self.send(req).await?;
        tracing::debug!(id = %doc.id, rev = %doc.rev, "Document created");
        Ok(doc)
    }

    /// Fetch a document into any deserializable shape
    #[tracing::instrument(skip(self), fields(db = %self.name))]
    pub async fn get_document<T: DeserializeOwned>(&self, id: &str, options: &Options) -> Result<T> {
        validate_doc_id(id)?;
        let req = self.request(Method::GET, &[id])?.query(options);
        self.send(req).await
    }

    /// Replace a document. `rev` must be the current revision; a stale one
    /// fails with `Conflict`. Returns the new revision.
    #[tracing::instrument(skip(self, value), fields(db = %self.name))]
    pub async fn update_document<T: Serialize + ?Sized>(
        &self,
        id: &str,
        rev: &str,
        value: &T,
    ) -> Result<String> {
        validate_doc_id(id)?;
        if rev.is_empty() {
            return Err(ClientError::Validation("revision is required".to_string()));
        }

        let mut body = to_object(value)?;
        body.insert("_id".to_string(), Value::String(id.to_string()));
        body.insert("_rev".to_string(), Value::String(rev.to_string()));

        let req = self.request(Method::PUT, &[id])?.json(&body);
        let doc: DocumentRef = self.send(req).await?;
        tracing::debug!(id = %doc.id, rev = %doc.rev, "Document updated");
        Ok(doc.rev)
    }

    /// Delete a document at revision `rev`. Returns the tombstone revision.
    #[tracing::instrument(skip(self), fields(db = %self.name))]
    pub async fn delete_document(&self, id: &str, rev: &str) -> Result<String> {
        validate_doc_id(id)?;
        if rev.is_empty() {
            return Err(ClientError::Validation("revision is required".to_string()));
        }

        let req = self
            .request(Method::DELETE, &[id])?
            .query(&[("rev", rev)]);
        let doc: DocumentRef = self.send(req).await?;
        tracing::debug!(id = %doc.id, rev = %doc.rev, "Document deleted");
        Ok(doc.rev)
    }

    /// Write many documents in one request. Per-document failures are
    /// reported in the returned entries, not as an error.
    #[tracing::instrument(skip(self, docs), fields(db = %self.name, count = docs.len()))]
    pub async fn bulk_docs<T: Serialize>(&self, docs: &[T]) -> Result<Vec<BulkResult>> {
        let req = self
            .request(Method::POST, &["_bulk_docs"])?
            .json(&BulkDocsRequest { docs });
        self.send(req).await
    }

    /// List documents by id (`_all_docs`)
    #[tracing::instrument(skip(self), fields(db = %self.name))]
    pub async fn all_docs(&self, options: &ViewOptions) -> Result<ViewResult> {
        self.query_view(&["_all_docs"], options).await
    }

    /// Create a Mango index; repeating an existing definition is a no-op
    /// that reports `result: "exists"`
    #[tracing::instrument(skip(self), fields(db = %self.name))]
    pub async fn set_index(&self, index: &Index) -> Result<IndexResult> {
        if index.index.fields.is_empty() {
            return Err(ClientError::Validation(
                "index needs at least one field".to_string(),
            ));
        }
        let req = self.request(Method::POST, &["_index"])?.json(index);
        let result: IndexResult = self.send(req).await?;
        tracing::debug!(name = %result.name, result = %result.result, "Index set");
        Ok(result)
    }

    #[tracing::instrument(skip(self), fields(db = %self.name))]
    pub async fn list_indexes(&self) -> Result<Vec<IndexInfo>> {
        let req = self.request(Method::GET, &["_index"])?;
        let list: IndexList = self.send(req).await?;
        Ok(list.indexes)
    }

    #[tracing::instrument(skip(self), fields(db = %self.name))]
    pub async fn delete_index(&self, ddoc: &str, name: &str) -> Result<()> {
        let ddoc = ddoc.strip_prefix("_design/").unwrap_or(ddoc);
        let req = self.request(Method::DELETE, &["_index", ddoc, "json", name])?;
        let _: OkResponse = self.send(req).await?;
        Ok(())
    }

    /// Run a Mango query and return the matching documents as JSON values.
    /// No match is an empty vec.
    pub async fn search_document(&self, query: &Query) -> Result<Vec<Value>> {
        Ok(self.find::<Value>(query).await?.docs)
    }

    /// Run a Mango query with typed results
    #[tracing::instrument(skip(self), fields(db = %self.name))]
    pub async fn find<T: DeserializeOwned>(&self, query: &Query) -> Result<FindResult<T>> {
        let req = self.request(Method::POST, &["_find"])?.json(query);
        let result: FindResult<T> = self.send(req).await?;
        if let Some(warning) = &result.warning {
            tracing::warn!("Query warning: {}", warning);
        }
        tracing::debug!(matched = result.docs.len(), "Query completed");
        Ok(result)
    }

    /// Store or replace the design document `_design/{name}`.
    ///
    /// `definition` is JSON text holding the views/indexes; it is sent as
    /// given apart from `_id`, and `_rev` when replacing.
    #[tracing::instrument(skip(self, definition), fields(db = %self.name))]
    pub async fn create_design_doc(&self, name: &str, definition: &str) -> Result<DocumentRef> {
        validate_doc_id(name)?;
        let mut body = match serde_json::from_str::<Value>(definition) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(ClientError::Validation(
                    "design document must be a JSON object".to_string(),
                ))
            }
            Err(e) => {
                return Err(ClientError::Validation(format!(
                    "invalid design document JSON: {}",
                    e
                )))
            }
        };
        body.insert("_id".to_string(), Value::String(format!("_design/{}", name)));

        if !body.contains_key("_rev") {
            if let Some(rev) = self.design_rev(name).await? {
                tracing::debug!(rev = %rev, "Replacing existing design document");
                body.insert("_rev".to_string(), Value::String(rev));
            }
        }

        let req = self.request(Method::PUT, &["_design", name])?.json(&body);
        let doc: DocumentRef = self.send(req).await?;
        tracing::info!(ddoc = %doc.id, rev = %doc.rev, "Design document stored");
        Ok(doc)
    }

    #[tracing::instrument(skip(self), fields(db = %self.name))]
    pub async fn delete_design_doc(&self, name: &str, rev: &str) -> Result<String> {
        validate_doc_id(name)?;
        if rev.is_empty() {
            return Err(ClientError::Validation("revision is required".to_string()));
        }

        let req = self
            .request(Method::DELETE, &["_design", name])?
            .query(&[("rev", rev)]);
        let doc: DocumentRef = self.send(req).await?;
        Ok(doc.rev)
    }

    async fn design_rev(&self, name: &str) -> Result<Option<String>> {
        let req = self.request(Method::GET, &["_design", name])?;
        match self.send::<RevOnly>(req).await {
            Ok(doc) => Ok(Some(doc.rev)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// GET a view-shaped resource, or POST when `keys` is set
    pub(crate) async fn query_view<K, V, D>(
        &self,
        segments: &[&str],
        options: &ViewOptions,
    ) -> Result<ViewResult<K, V, D>>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
        D: DeserializeOwned,
    {
        let pairs = options.query_pairs();
        let req = match &options.keys {
            Some(keys) => self
                .request(Method::POST, segments)?
                .query(&pairs)
                .json(&KeysRequest { keys }),
            None => self.request(Method::GET, segments)?.query(&pairs),
        };
        self.send(req).await
    }
}

/// Serialize a document body, which must be a JSON object
fn to_object<T: Serialize + ?Sized>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ClientError::Validation(format!(
            "document must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn validate_doc_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(ClientError::Validation("document id is required".to_string()));
    }
    Ok(())
}

const SYSTEM_DATABASES: [&str; 3] = ["_users", "_replicator", "_global_changes"];

/// CouchDB database names: a lowercase letter, then lowercase letters,
/// digits, or any of `_$()+-/`.
pub(crate) fn validate_db_name(name: &str) -> Result<()> {
    if SYSTEM_DATABASES.contains(&name) {
        return Ok(());
    }

    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_lowercase() => chars.all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || "_$()+-/".contains(c)
        }),
        _ => false,
    };

    if !valid {
        return Err(ClientError::Validation(format!(
            "invalid database name {:?}",
            name
        )));
    }
    Ok(())
}
