use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::Serialize;

use crate::config::ApiConfig;
use crate::domain::model::{AggregateKind, CategoryDraft, ProductDraft, ShopDraft};
use crate::domain::ports::CatalogGateway;
use crate::utils::error::{AdminError, Result};

/// REST client for the shop back office API (`/api/v1/...`).
#[derive(Debug, Clone)]
pub struct HttpCatalogGateway {
    client: Client,
    base_url: String,
}

impl HttpCatalogGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        Self::new(base_url, Duration::from_secs(config.timeout_seconds))
    }

    pub fn collection_url(&self, aggregate: AggregateKind) -> String {
        let collection = match aggregate {
            AggregateKind::Shop => "shops",
            AggregateKind::Product => "products",
            AggregateKind::Category => "categories",
        };
        format!("{}/api/v1/{}", self.base_url, collection)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> Result<()> {
        tracing::debug!("{} {}", method, url);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        tracing::debug!("API response status: {}", response.status());
        Self::check(response).await
    }

    /// Maps a non-success response to `ActionRejected`, keeping the `message`
    /// field of the error body when the server sent one.
    async fn check(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
            });

        tracing::warn!(status = status.as_u16(), message = ?message, "request rejected");
        Err(AdminError::ActionRejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn create<B: Serialize + ?Sized>(&self, aggregate: AggregateKind, body: &B) -> Result<()> {
        self.send(Method::POST, self.collection_url(aggregate), Some(body))
            .await
    }

    async fn update<B: Serialize + ?Sized>(&self, aggregate: AggregateKind, body: &B) -> Result<()> {
        self.send(Method::PUT, self.collection_url(aggregate), Some(body))
            .await
    }

    async fn delete(&self, aggregate: AggregateKind, id: i64) -> Result<()> {
        let url = format!("{}/{}", self.collection_url(aggregate), id);
        self.send::<()>(Method::DELETE, url, None).await
    }
}

#[async_trait]
impl CatalogGateway for HttpCatalogGateway {
    async fn create_shop(&self, shop: &ShopDraft) -> Result<()> {
        self.create(AggregateKind::Shop, shop).await
    }

    async fn update_shop(&self, shop: &ShopDraft) -> Result<()> {
        self.update(AggregateKind::Shop, shop).await
    }

    async fn delete_shop(&self, id: i64) -> Result<()> {
        self.delete(AggregateKind::Shop, id).await
    }

    async fn create_product(&self, product: &ProductDraft) -> Result<()> {
        self.create(AggregateKind::Product, product).await
    }

    async fn update_product(&self, product: &ProductDraft) -> Result<()> {
        self.update(AggregateKind::Product, product).await
    }

    async fn delete_product(&self, id: i64) -> Result<()> {
        self.delete(AggregateKind::Product, id).await
    }

    async fn create_category(&self, category: &CategoryDraft) -> Result<()> {
        self.create(AggregateKind::Category, category).await
    }

    async fn update_category(&self, category: &CategoryDraft) -> Result<()> {
        self.update(AggregateKind::Category, category).await
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        self.delete(AggregateKind::Category, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_urls_ignore_trailing_slash() {
        let gateway =
            HttpCatalogGateway::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            gateway.collection_url(AggregateKind::Shop),
            "http://localhost:8080/api/v1/shops"
        );
        assert_eq!(
            gateway.collection_url(AggregateKind::Category),
            "http://localhost:8080/api/v1/categories"
        );
    }
}
