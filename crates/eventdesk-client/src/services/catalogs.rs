//! Catalog administration.
//!
//! Every operation takes the catalog kind as it appears in URLs; anything
//! other than `addon`, `eventGroup`, `guestType` or `package` is refused
//! before a request is made.

use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest};
use crate::models::{CatalogData, CatalogElement, CatalogKind, Page, TableQuery};

#[derive(Clone)]
pub struct CatalogsService {
    api: ApiClient,
}

impl CatalogsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn create(&self, kind: &str, data: &CatalogData) -> ClientResult<CatalogElement> {
        let kind: CatalogKind = kind.parse()?;
        self.api
            .post_json(&format!("/api/catalogs/create/{}", kind), Some(data))
            .await
    }

    pub async fn table(&self, kind: &str, query: &TableQuery) -> ClientResult<Page<CatalogElement>> {
        let kind: CatalogKind = kind.parse()?;
        let request = ApiRequest::get(format!("/api/catalogs/table/{}", kind)).query(query)?;
        self.api.send_json(request).await
    }

    /// All entries of a catalog, for pickers.
    pub async fn select(&self, kind: &str) -> ClientResult<Vec<CatalogElement>> {
        let kind: CatalogKind = kind.parse()?;
        self.api
            .get_json(&format!("/api/catalogs/select/{}", kind))
            .await
    }

    pub async fn get(&self, kind: &str, id: i64) -> ClientResult<CatalogElement> {
        let kind: CatalogKind = kind.parse()?;
        self.api
            .get_json(&format!("/api/catalogs/select/{}/{}", kind, id))
            .await
    }

    /// `data.id` names the entry to update.
    pub async fn update(&self, kind: &str, data: &CatalogData) -> ClientResult<CatalogElement> {
        let kind: CatalogKind = kind.parse()?;
        self.api
            .put_json(&format!("/api/catalogs/update/{}", kind), Some(data))
            .await
    }

    pub async fn delete(&self, kind: &str, id: i64) -> ClientResult<String> {
        let kind: CatalogKind = kind.parse()?;
        let request = ApiRequest::delete(format!("/api/catalogs/delete/{}", kind)).param("id", id);
        self.api.send_text(request).await
    }
}
