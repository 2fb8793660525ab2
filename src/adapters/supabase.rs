//! PostgREST client for the Supabase `restaurants` and `dishes` tables.

use crate::core::{NewDish, RestaurantId, TableStore};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const RESTAURANTS_TABLE: &str = "restaurants";
pub const DISHES_TABLE: &str = "dishes";

#[derive(Debug, Deserialize)]
struct IdRow {
    id: RestaurantId,
}

pub struct SupabaseStore {
    client: Client,
    base_url: Url,
    service_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: &str, service_key: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        crate::utils::validation::validate_url("supabase.url", base_url)?;

        // Url::join drops the last path segment unless it ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| EtlError::InvalidConfigValueError {
            field: "supabase.url".to_string(),
            value: normalized.clone(),
            reason: e.to_string(),
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            service_key: service_key.into(),
        })
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        self.base_url
            .join(&format!("rest/v1/{}", table))
            .map_err(|e| EtlError::ConfigError {
                message: format!("cannot build endpoint for table '{}': {}", table, e),
            })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(EtlError::RemoteStoreError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl TableStore for SupabaseStore {
    async fn find_restaurant_id(&self, name: &str) -> Result<Option<RestaurantId>> {
        let url = self.table_url(RESTAURANTS_TABLE)?;
        tracing::debug!("GET {} name=eq.{}", url, name);

        let response = self
            .authorized(self.client.get(url))
            .query(&[("select", "id".to_string()), ("name", format!("eq.{}", name))])
            .send()
            .await?;
        let rows: Vec<IdRow> = Self::check(response).await?.json().await?;

        Ok(rows.into_iter().next().map(|row| row.id))
    }

    async fn delete_dishes(&self, restaurant_id: &RestaurantId) -> Result<()> {
        let url = self.table_url(DISHES_TABLE)?;
        tracing::debug!("DELETE {} restaurant_id=eq.{}", url, restaurant_id);

        let response = self
            .authorized(self.client.delete(url))
            .query(&[("restaurant_id", format!("eq.{}", restaurant_id))])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn insert_dishes(&self, dishes: &[NewDish]) -> Result<()> {
        if dishes.is_empty() {
            return Ok(());
        }

        let url = self.table_url(DISHES_TABLE)?;
        tracing::debug!("POST {} ({} rows)", url, dishes.len());

        let response = self
            .authorized(self.client.post(url))
            .header("Prefer", "return=minimal")
            .json(dishes)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const KEY: &str = "service-role-key";

    fn store(server: &MockServer) -> SupabaseStore {
        SupabaseStore::new(&server.base_url(), KEY, Some(Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn test_find_restaurant_id() {
        let server = MockServer::start();
        let lookup = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/restaurants")
                .query_param("select", "id")
                .query_param("name", "eq.Zaytoon")
                .header("apikey", KEY)
                .header("Authorization", "Bearer service-role-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([{"id": 17}]));
        });

        let id = store(&server).find_restaurant_id("Zaytoon").await.unwrap();

        lookup.assert();
        assert_eq!(id, Some(RestaurantId(serde_json::json!(17))));
    }

    #[tokio::test]
    async fn test_find_restaurant_id_empty_result() {
        let server = MockServer::start();
        let lookup = server.mock(|when, then| {
            when.method(GET).path("/rest/v1/restaurants");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([]));
        });

        let id = store(&server).find_restaurant_id("Ghost").await.unwrap();

        lookup.assert();
        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn test_delete_dishes_filters_by_restaurant() {
        let server = MockServer::start();
        let delete = server.mock(|when, then| {
            when.method(DELETE)
                .path("/rest/v1/dishes")
                .query_param("restaurant_id", "eq.abc-123")
                .header("apikey", KEY);
            then.status(204);
        });

        let id = RestaurantId(serde_json::json!("abc-123"));
        store(&server).delete_dishes(&id).await.unwrap();

        delete.assert();
    }

    #[tokio::test]
    async fn test_insert_dishes_posts_json_array() {
        let server = MockServer::start();
        let insert = server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/dishes")
                .header("Prefer", "return=minimal")
                .json_body(serde_json::json!([
                    {"restaurant_id": 3, "name": "Gyoza", "category": "sides", "price": 6.5}
                ]));
            then.status(201);
        });

        let dishes = vec![NewDish {
            restaurant_id: RestaurantId(serde_json::json!(3)),
            name: "Gyoza".to_string(),
            category: "sides".to_string(),
            price: 6.5,
        }];
        store(&server).insert_dishes(&dishes).await.unwrap();

        insert.assert();
    }

    #[tokio::test]
    async fn test_insert_empty_batch_sends_nothing() {
        let server = MockServer::start();
        let insert = server.mock(|when, then| {
            when.method(POST).path("/rest/v1/dishes");
            then.status(201);
        });

        store(&server).insert_dishes(&[]).await.unwrap();

        assert_eq!(insert.hits(), 0);
    }

    #[tokio::test]
    async fn test_error_status_becomes_remote_store_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/restaurants");
            then.status(401).body("{\"message\":\"Invalid API key\"}");
        });

        let err = store(&server).find_restaurant_id("Zaytoon").await.unwrap_err();
        match err {
            EtlError::RemoteStoreError { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Invalid API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(SupabaseStore::new("not a url", KEY, None).is_err());
        assert!(SupabaseStore::new("ftp://example.com", KEY, None).is_err());
    }

    #[test]
    fn test_table_url_keeps_base_path() {
        let store = SupabaseStore::new("http://localhost:54321/proxy", KEY, None).unwrap();
        assert_eq!(
            store.table_url(DISHES_TABLE).unwrap().as_str(),
            "http://localhost:54321/proxy/rest/v1/dishes"
        );
    }
}
