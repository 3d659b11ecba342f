use super::navigation::FilterScope;
use super::query::{self, ListQuery};
use crate::shared::config::Config;
use async_trait::async_trait;
use contracts::domain::a001_category::{Category, CategoryDraft, CategoryId, CategoryPatch};
use contracts::shared::{CatalogError, Page};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

/// External category store. The core only ever talks to this trait; the
/// HTTP implementation below is the production one, tests plug in stubs.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(
        &self,
        scope: FilterScope,
        query: &ListQuery,
    ) -> Result<Page<Category>, CatalogError>;

    /// Full nested tree, optionally restricted to active categories.
    async fn tree(&self, only_active: bool) -> Result<Vec<Category>, CatalogError>;

    async fn get(&self, id: CategoryId) -> Result<Category, CatalogError>;

    async fn create(&self, draft: &CategoryDraft) -> Result<Category, CatalogError>;

    async fn update(
        &self,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category, CatalogError>;

    /// Fails with `Conflict` when the category still has children or
    /// referenced products (server-enforced).
    async fn delete(&self, id: CategoryId) -> Result<(), CatalogError>;
}

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// REST-backed repository. Normalizes every transport response into the
/// canonical contracts shapes right here, so callers never see raw
/// envelope variations.
pub struct HttpCategoryRepository {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCategoryRepository {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: HTTP_CLIENT.clone(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api.base_url.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn error_from(response: reqwest::Response) -> CatalogError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
        map_error(status, parsed)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CatalogError> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Fetch(format!("invalid response body: {e}")))
    }
}

// ----------------------------------------------------------------------------
// Transport envelopes
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
struct PaginationMeta {
    total: Option<u64>,
    current_page: Option<u32>,
    per_page: Option<u32>,
    last_page: Option<u32>,
}

/// Listing responses arrive either as `{data: [...], pagination: {...}}` or
/// `{items: [...], meta: {...}}` depending on the endpoint generation. Both
/// collapse into `Page` here and nowhere else.
#[derive(Debug, Deserialize, Default)]
struct ListEnvelope {
    #[serde(default)]
    data: Vec<Category>,
    #[serde(default)]
    items: Vec<Category>,
    pagination: Option<PaginationMeta>,
    meta: Option<PaginationMeta>,
}

impl ListEnvelope {
    fn into_page(self, requested: &ListQuery) -> Page<Category> {
        let items = if self.data.is_empty() {
            self.items
        } else {
            self.data
        };
        let meta = self.pagination.or(self.meta).unwrap_or_default();
        Page {
            total: meta.total.unwrap_or(items.len() as u64),
            current_page: meta.current_page.unwrap_or(requested.page),
            per_page: meta.per_page.unwrap_or(requested.per_page),
            last_page: meta.last_page.unwrap_or(1),
            items,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TreeEnvelope {
    Wrapped { data: Vec<Category> },
    Bare(Vec<Category>),
}

impl TreeEnvelope {
    fn into_tree(self) -> Vec<Category> {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(tree) => tree,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemEnvelope {
    Wrapped { data: Category },
    Bare(Category),
}

impl ItemEnvelope {
    fn into_category(self) -> Category {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(category) => category,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    /// Field errors keyed by field name, one or more messages each.
    #[serde(default)]
    errors: HashMap<String, Vec<String>>,
}

fn map_error(status: u16, body: ApiErrorBody) -> CatalogError {
    let message = if body.message.is_empty() {
        format!("HTTP {status}")
    } else {
        body.message.clone()
    };
    match status {
        422 => {
            // Attach to the first field the server named.
            let (field, field_message) = body
                .errors
                .iter()
                .next()
                .map(|(field, messages)| {
                    let msg = messages.first().cloned().unwrap_or_else(|| message.clone());
                    (field.clone(), msg)
                })
                .unwrap_or_else(|| ("general".to_string(), message.clone()));
            CatalogError::validation(field, field_message)
        }
        404 => CatalogError::NotFound(message),
        409 => CatalogError::Conflict(message),
        _ => CatalogError::Fetch(message),
    }
}

#[async_trait]
impl CategoryRepository for HttpCategoryRepository {
    async fn list(
        &self,
        scope: FilterScope,
        query: &ListQuery,
    ) -> Result<Page<Category>, CatalogError> {
        let params = query::to_query_params(scope, query);
        tracing::debug!(?params, "GET /categories");
        let response = self
            .client
            .get(self.url("categories"))
            .query(&params)
            .send()
            .await
            .map_err(|e| CatalogError::Fetch(e.to_string()))?;
        let envelope: ListEnvelope = Self::decode(response).await?;
        Ok(envelope.into_page(query))
    }

    async fn tree(&self, only_active: bool) -> Result<Vec<Category>, CatalogError> {
        let mut request = self.client.get(self.url("categories/tree"));
        if only_active {
            request = request.query(&[("only_active", "1")]);
        }
        tracing::debug!(only_active, "GET /categories/tree");
        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Fetch(e.to_string()))?;
        let envelope: TreeEnvelope = Self::decode(response).await?;
        Ok(envelope.into_tree())
    }

    async fn get(&self, id: CategoryId) -> Result<Category, CatalogError> {
        let response = self
            .client
            .get(self.url(&format!("categories/{id}")))
            .send()
            .await
            .map_err(|e| CatalogError::Fetch(e.to_string()))?;
        let envelope: ItemEnvelope = Self::decode(response).await?;
        Ok(envelope.into_category())
    }

    async fn create(&self, draft: &CategoryDraft) -> Result<Category, CatalogError> {
        tracing::info!(name = %draft.name, level = ?draft.level, "POST /categories");
        let response = self
            .client
            .post(self.url("categories"))
            .json(draft)
            .send()
            .await
            .map_err(|e| CatalogError::Fetch(e.to_string()))?;
        let envelope: ItemEnvelope = Self::decode(response).await?;
        Ok(envelope.into_category())
    }

    async fn update(
        &self,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category, CatalogError> {
        tracing::info!(%id, "PATCH /categories/{id}");
        let response = self
            .client
            .patch(self.url(&format!("categories/{id}")))
            .json(patch)
            .send()
            .await
            .map_err(|e| CatalogError::Fetch(e.to_string()))?;
        let envelope: ItemEnvelope = Self::decode(response).await?;
        Ok(envelope.into_category())
    }

    async fn delete(&self, id: CategoryId) -> Result<(), CatalogError> {
        tracing::info!(%id, "DELETE /categories/{id}");
        let response = self
            .client
            .delete(self.url(&format!("categories/{id}")))
            .send()
            .await
            .map_err(|e| CatalogError::Fetch(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_envelope_normalizes_both_known_shapes() {
        let requested = ListQuery::default();

        let envelope: ListEnvelope = serde_json::from_value(json!({
            "data": [{"id": 1, "name": "Electrónica", "level": 1}],
            "pagination": {"total": 25, "current_page": 2, "per_page": 10, "last_page": 3}
        }))
        .unwrap();
        let page = envelope.into_page(&requested);
        assert_eq!(page.total, 25);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.last_page, 3);

        let envelope: ListEnvelope = serde_json::from_value(json!({
            "items": [{"id": 1, "name": "Electrónica", "level": 1}],
            "meta": {"total": 1}
        }))
        .unwrap();
        let page = envelope.into_page(&requested);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 1);
        // Missing meta fields fall back to what was requested.
        assert_eq!(page.current_page, 1);
        assert_eq!(page.per_page, 10);
    }

    #[test]
    fn list_envelope_without_meta_counts_items() {
        let envelope: ListEnvelope = serde_json::from_value(json!({
            "data": [
                {"id": 1, "name": "A", "level": 1},
                {"id": 2, "name": "B", "level": 1}
            ]
        }))
        .unwrap();
        let page = envelope.into_page(&ListQuery::default());
        assert_eq!(page.total, 2);
        assert_eq!(page.last_page, 1);
    }

    #[test]
    fn tree_envelope_accepts_wrapped_and_bare() {
        let wrapped: TreeEnvelope = serde_json::from_value(json!({
            "data": [{"id": 1, "name": "A", "level": 1}]
        }))
        .unwrap();
        assert_eq!(wrapped.into_tree().len(), 1);

        let bare: TreeEnvelope =
            serde_json::from_value(json!([{"id": 1, "name": "A", "level": 1}])).unwrap();
        assert_eq!(bare.into_tree().len(), 1);
    }

    #[test]
    fn http_422_maps_to_validation_with_the_named_field() {
        let body: ApiErrorBody = serde_json::from_value(json!({
            "message": "The given data was invalid.",
            "errors": {"normal_margin_percentage": ["debe ser mayor o igual al mínimo"]}
        }))
        .unwrap();
        let err = map_error(422, body);
        assert_eq!(err.field(), Some("normal_margin_percentage"));
    }

    #[test]
    fn http_statuses_map_to_the_taxonomy() {
        assert!(matches!(
            map_error(404, ApiErrorBody::default()),
            CatalogError::NotFound(_)
        ));
        assert!(matches!(
            map_error(409, ApiErrorBody::default()),
            CatalogError::Conflict(_)
        ));
        assert!(matches!(
            map_error(500, ApiErrorBody::default()),
            CatalogError::Fetch(_)
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let repo = HttpCategoryRepository::new("http://localhost:8000/api/");
        assert_eq!(repo.url("categories"), "http://localhost:8000/api/categories");
    }
}
