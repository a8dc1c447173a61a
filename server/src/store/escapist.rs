//! Client for the document database service.
//!
//! The service stores opaque byte blobs per collection, each tagged with a
//! string map for lookup, and versions every document for optimistic
//! concurrency. The engine only ever talks to the `DocDbClient` trait so
//! tests can substitute an in-process fake.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GolfError, GolfResult};

/// A document about to be written: content plus lookup tags, no identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocEgg {
    pub bytes: String,
    pub tags: HashMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocIdAndVersion {
    pub id: String,
    pub version: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Doc {
    pub id: String,
    pub version: String,
    pub bytes: String,
    pub tags: HashMap<String, String>,
}

#[async_trait]
pub trait DocDbClient: Send + Sync {
    async fn insert_doc(&self, collection: &str, doc: DocEgg) -> GolfResult<DocIdAndVersion>;

    /// Replace a document. Fails FailedPrecondition when `current.version`
    /// is no longer the stored version.
    async fn update_doc(
        &self,
        collection: &str,
        current: DocIdAndVersion,
        doc: DocEgg,
    ) -> GolfResult<DocIdAndVersion>;

    async fn find_doc_by_id(&self, collection: &str, id: &str) -> GolfResult<Doc>;

    async fn find_doc_by_tags(
        &self,
        collection: &str,
        tags: &HashMap<String, String>,
    ) -> GolfResult<Doc>;
}

#[derive(Serialize)]
struct InsertDocRequest<'a> {
    collection: &'a str,
    doc: DocEgg,
}

#[derive(Serialize)]
struct UpdateDocRequest<'a> {
    collection: &'a str,
    id: &'a str,
    version: &'a str,
    doc: DocEgg,
}

#[derive(Serialize)]
struct FindDocRequest<'a> {
    collection: &'a str,
    tags: &'a HashMap<String, String>,
}

#[derive(Deserialize)]
struct DocResponse {
    doc: Doc,
}

/// HTTP transcoding of the document service API.
pub struct HttpDocDbClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpDocDbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(resp: reqwest::Response) -> GolfResult<reqwest::Response> {
        match resp.status() {
            s if s.is_success() => Ok(resp),
            reqwest::StatusCode::NOT_FOUND => Err(GolfError::not_found("not found")),
            reqwest::StatusCode::CONFLICT | reqwest::StatusCode::PRECONDITION_FAILED => {
                Err(GolfError::failed_precondition("version conflict"))
            }
            s => Err(GolfError::internal(format!(
                "document store returned {}",
                s
            ))),
        }
    }

    async fn post_json<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &T,
    ) -> GolfResult<R> {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| GolfError::internal(format!("document store unreachable: {e}")))?;
        let resp = Self::check(resp).await?;
        resp.json::<R>()
            .await
            .map_err(|e| GolfError::internal(format!("bad document store response: {e}")))
    }
}

#[async_trait]
impl DocDbClient for HttpDocDbClient {
    async fn insert_doc(&self, collection: &str, doc: DocEgg) -> GolfResult<DocIdAndVersion> {
        self.post_json("/v1/docs/insert", &InsertDocRequest { collection, doc })
            .await
    }

    async fn update_doc(
        &self,
        collection: &str,
        current: DocIdAndVersion,
        doc: DocEgg,
    ) -> GolfResult<DocIdAndVersion> {
        self.post_json(
            "/v1/docs/update",
            &UpdateDocRequest {
                collection,
                id: &current.id,
                version: &current.version,
                doc,
            },
        )
        .await
    }

    async fn find_doc_by_id(&self, collection: &str, id: &str) -> GolfResult<Doc> {
        let resp = self
            .http
            .get(self.url(&format!("/v1/docs/{collection}/{id}")))
            .send()
            .await
            .map_err(|e| GolfError::internal(format!("document store unreachable: {e}")))?;
        let resp = Self::check(resp).await?;
        let found: DocResponse = resp
            .json()
            .await
            .map_err(|e| GolfError::internal(format!("bad document store response: {e}")))?;
        Ok(found.doc)
    }

    async fn find_doc_by_tags(
        &self,
        collection: &str,
        tags: &HashMap<String, String>,
    ) -> GolfResult<Doc> {
        let found: DocResponse = self
            .post_json("/v1/docs/find", &FindDocRequest { collection, tags })
            .await?;
        Ok(found.doc)
    }
}
