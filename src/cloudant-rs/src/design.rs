use crate::database::Database;
use crate::{ClientError, Result};
use cloudant_core::{DesignDefinition, SearchResult, ViewOptions, ViewResult};
use reqwest::Method;
use serde::de::DeserializeOwned;

/// Cloudant caps search pages at 200 rows
pub const MAX_SEARCH_LIMIT: u32 = 200;

/// Accessor for `_design/{name}` in whichever database is passed per call
#[derive(Debug, Clone)]
pub struct DesignDocument {
    name: String,
    definition: Option<DesignDefinition>,
}

#[derive(serde::Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    limit: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    bookmark: &'a str,
}

impl DesignDocument {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = match name.strip_prefix("_design/") {
            Some(stripped) => stripped.to_string(),
            None => name,
        };
        Self {
            name,
            definition: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> String {
        format!("_design/{}", self.name)
    }

    /// Definition loaded by the last successful [`get`](Self::get)
    pub fn definition(&self) -> Option<&DesignDefinition> {
        self.definition.as_ref()
    }

    /// Load the current definition from `db`
    #[tracing::instrument(skip(self, db), fields(db = %db.name(), ddoc = %self.name))]
    pub async fn get(&mut self, db: &Database) -> Result<()> {
        let req = db.request(Method::GET, &["_design", self.name.as_str()])?;
        let definition: DesignDefinition = db.send(req).await?;
        tracing::debug!(
            rev = ?definition.rev,
            views = definition.views.len(),
            indexes = definition.indexes.len(),
            "Design document loaded"
        );
        self.definition = Some(definition);
        Ok(())
    }

    /// Query a view with default options
    pub async fn view(&self, db: &Database, view: &str) -> Result<ViewResult> {
        self.view_with(db, view, &ViewOptions::default()).await
    }

    #[tracing::instrument(skip(self, db), fields(db = %db.name(), ddoc = %self.name))]
    pub async fn view_with<K, V, D>(
        &self,
        db: &Database,
        view: &str,
        options: &ViewOptions,
    ) -> Result<ViewResult<K, V, D>>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
        D: DeserializeOwned,
    {
        if view.is_empty() {
            return Err(ClientError::Validation("view name is required".to_string()));
        }
        db.query_view(&["_design", self.name.as_str(), "_view", view], options)
            .await
    }

    /// Query a search index with a Lucene query string.
    ///
    /// `limit` bounds the page size; pass the previous result's bookmark to
    /// fetch the next page, or an empty string for the first.
    #[tracing::instrument(skip(self, db), fields(db = %db.name(), ddoc = %self.name))]
    pub async fn search(
        &self,
        db: &Database,
        index: &str,
        query: &str,
        bookmark: &str,
        limit: u32,
    ) -> Result<SearchResult> {
        if query.is_empty() {
            return Err(ClientError::Validation("search query is required".to_string()));
        }
        if limit == 0 || limit > MAX_SEARCH_LIMIT {
            return Err(ClientError::Validation(format!(
                "search limit must be between 1 and {}",
                MAX_SEARCH_LIMIT
            )));
        }

        let params = SearchParams {
            q: query,
            limit,
            bookmark,
        };
        let req = db
            .request(Method::GET, &["_design", self.name.as_str(), "_search", index])?
            .query(&params);
        let result: SearchResult = db.send(req).await?;
        tracing::debug!(
            total_rows = result.total_rows,
            returned = result.rows.len(),
            "Search completed"
        );
        Ok(result)
    }
}
