use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Plain `{"ok": true}` acknowledgement
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OkResponse {
    #[serde(default)]
    pub ok: bool,
}

/// Identifier and revision of a stored document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: String,
    pub rev: String,
}

/// ErrorBody is the JSON body CouchDB sends with every error status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub reason: String,
}

/// DatabaseInfo is returned by `GET /{db}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub db_name: String,
    #[serde(default)]
    pub doc_count: u64,
    #[serde(default)]
    pub doc_del_count: u64,
    #[serde(default)]
    pub update_seq: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<DatabaseSizes>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSizes {
    #[serde(default)]
    pub file: u64,
    #[serde(default)]
    pub external: u64,
    #[serde(default)]
    pub active: u64,
}

/// Read options for fetching a single document.
///
/// Every field maps to a query parameter of the same name. The default
/// sends none of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Options {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revs_info: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<bool>,
}

/// Index is a Mango (JSON) index specification posted to `/{db}/_index`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Index {
    pub index: IndexFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddoc: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub index_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IndexFields {
    pub fields: Vec<String>,
}

impl Index {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index: IndexFields {
                fields: fields.into_iter().map(Into::into).collect(),
            },
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_ddoc(mut self, ddoc: impl Into<String>) -> Self {
        self.ddoc = Some(ddoc.into());
        self
    }
}

/// Result of `POST /{db}/_index`: `result` is `"created"` or `"exists"`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResult {
    pub result: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexInfo {
    #[serde(default)]
    pub ddoc: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub index_type: String,
    #[serde(default)]
    pub def: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexList {
    #[serde(default)]
    pub total_rows: u64,
    pub indexes: Vec<IndexInfo>,
}

/// Query is a Mango query posted to `/{db}/_find`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Query {
    pub selector: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_index: Option<Value>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a selector clause for `field`
    pub fn with(mut self, field: impl Into<String>, criteria: impl Into<Value>) -> Self {
        self.selector.insert(field.into(), criteria.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// FindResult is the response of `/{db}/_find`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindResult<T> {
    pub docs: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Query parameters for views and `_all_docs`.
///
/// Keys are JSON-encoded on the wire. `keys` switches the request to a POST
/// with the keys in the body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewOptions {
    pub key: Option<Value>,
    pub keys: Option<Vec<Value>>,
    pub startkey: Option<Value>,
    pub endkey: Option<Value>,
    pub include_docs: Option<bool>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    pub descending: Option<bool>,
    pub reduce: Option<bool>,
    pub group: Option<bool>,
}

impl ViewOptions {
    /// Query-string pairs for everything except `keys`
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let json_params = [
            ("key", &self.key),
            ("startkey", &self.startkey),
            ("endkey", &self.endkey),
        ];
        for (name, value) in json_params {
            if let Some(value) = value {
                pairs.push((name, value.to_string()));
            }
        }
        let bool_params = [
            ("include_docs", self.include_docs),
            ("descending", self.descending),
            ("reduce", self.reduce),
            ("group", self.group),
        ];
        for (name, value) in bool_params {
            if let Some(value) = value {
                pairs.push((name, value.to_string()));
            }
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        pairs
    }
}

/// ViewResult is the response of a view or `_all_docs` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResult<K = Value, V = Value, D = Value> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    pub rows: Vec<ViewRow<K, V, D>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRow<K = Value, V = Value, D = Value> {
    /// Absent on reduced rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub key: K,
    pub value: V,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<D>,
}

/// SearchResult is the response of a design-document search index query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total number of matches, independent of the page size
    pub total_rows: u64,
    #[serde(default)]
    pub bookmark: String,
    #[serde(default)]
    pub rows: Vec<SearchRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRow {
    pub id: String,
    #[serde(default)]
    pub order: Vec<Value>,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Value>,
}

/// One entry of a `_bulk_docs` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub rev: Option<String>,
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl BulkResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.rev.is_some()
    }
}

/// DesignDefinition is the stored body of a `_design/<name>` document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignDefinition {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub views: BTreeMap<String, ViewDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indexes: BTreeMap<String, SearchIndexDefinition>,
    /// Members this type does not model (`options`, `validate_doc_update`, ...)
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// JavaScript source, or an object for `language: "query"` views.
    /// Absent on CommonJS library entries such as `views.lib`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndexDefinition {
    /// JavaScript source, or an object for `language: "query"` text indexes
    pub index: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<Value>,
}
