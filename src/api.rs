//! HTTP client for the Agenda service
//!
//! Every request goes through one send path that attaches the bearer token,
//! maps transport failures onto the error taxonomy, and handles 401 by
//! purging the stored token so the view layer can send the user back to
//! login.

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

use crate::config::{self, Config};
use crate::models::{
    Category, CategoryRequest, Contact, ContactRequest, ErrorBody, Page, ServiceStatus, Stats,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const NOT_FOUND_MESSAGE: &str = "El recurso solicitado no fue encontrado.";

/// Failures surfaced by the service client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Error de conexión. Verifica tu conexión a internet.")]
    Network(#[source] reqwest::Error),

    #[error("La operación tardó demasiado. Intenta nuevamente.")]
    Timeout,

    #[error("No tienes permisos para realizar esta acción.")]
    Unauthorized,

    #[error("Acceso denegado.")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Error del servidor. Intenta nuevamente más tarde.")]
    Server { status: u16, message: String },

    #[error("Ocurrió un error inesperado.")]
    Unexpected(#[source] reqwest::Error),
}

/// Client for the remote contact/category/statistics boundary
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Mutex<Option<String>>,
    /// Where the token lives on disk; purged on 401
    config_path: PathBuf,
}

impl ApiClient {
    pub fn new(config: &Config, config_path: PathBuf) -> Result<Self> {
        let base_url = config.server.url.trim_end_matches('/').to_string();
        anyhow::ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            "Server URL must start with http:// or https://: {base_url}"
        );

        let http = reqwest::Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            token: Mutex::new(config.auth.token.clone()),
            config_path,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Drop the token both in memory and from the persisted config. Disk
    /// failures are logged, not propagated; the 401 still reaches the caller.
    fn purge_token(&self) {
        self.token.lock().unwrap().take();
        if let Err(error) = config::clear_token(&self.config_path) {
            tracing::warn!(%error, "failed to remove stored token");
        } else {
            tracing::info!("stored token removed after 401");
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let token = self.token.lock().unwrap().clone();
        let builder = match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let request = builder.build().map_err(ApiError::Network)?;
        tracing::debug!(method = %request.method(), url = %request.url(), "API request");

        let response = self.http.execute(request).await.map_err(|error| {
            if error.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Network(error)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => {
                self.purge_token();
                Err(ApiError::Unauthorized)
            }
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
            StatusCode::NOT_FOUND => {
                let message = error_message(response)
                    .await
                    .unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string());
                Err(ApiError::NotFound(message))
            }
            other => {
                let message = error_message(response).await.unwrap_or_default();
                tracing::warn!(status = other.as_u16(), %message, "service error");
                Err(ApiError::Server {
                    status: other.as_u16(),
                    message,
                })
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(builder).await?;
        response.json().await.map_err(ApiError::Unexpected)
    }

    // Contacts

    pub async fn list_contacts(&self, page: u32, size: u32) -> Result<Page<Contact>, ApiError> {
        let builder = self
            .http
            .get(self.url("/contactos"))
            .query(&[("page", page), ("size", size)]);
        self.fetch(builder).await
    }

    pub async fn get_contact(&self, id: i64) -> Result<Contact, ApiError> {
        self.fetch(self.http.get(self.url(&format!("/contactos/{id}"))))
            .await
    }

    pub async fn create_contact(&self, contact: &ContactRequest) -> Result<Contact, ApiError> {
        self.fetch(self.http.post(self.url("/contactos")).json(contact))
            .await
    }

    pub async fn update_contact(
        &self,
        id: i64,
        contact: &ContactRequest,
    ) -> Result<Contact, ApiError> {
        self.fetch(
            self.http
                .put(self.url(&format!("/contactos/{id}")))
                .json(contact),
        )
        .await
    }

    pub async fn delete_contact(&self, id: i64) -> Result<(), ApiError> {
        self.execute(self.http.delete(self.url(&format!("/contactos/{id}"))))
            .await?;
        Ok(())
    }

    pub async fn search_contacts(&self, term: &str) -> Result<Vec<Contact>, ApiError> {
        let builder = self
            .http
            .get(self.url("/contactos/buscar"))
            .query(&[("termino", term)]);
        self.fetch(builder).await
    }

    pub async fn contacts_by_category(&self, category_id: i64) -> Result<Vec<Contact>, ApiError> {
        self.fetch(
            self.http
                .get(self.url(&format!("/contactos/categoria/{category_id}"))),
        )
        .await
    }

    pub async fn favorites(&self) -> Result<Vec<Contact>, ApiError> {
        self.fetch(self.http.get(self.url("/contactos/favoritos")))
            .await
    }

    pub async fn set_favorite(&self, id: i64, favorito: bool) -> Result<Contact, ApiError> {
        self.fetch(
            self.http
                .patch(self.url(&format!("/contactos/{id}/favorito")))
                .json(&serde_json::json!({ "favorito": favorito })),
        )
        .await
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.fetch(self.http.get(self.url("/contactos/estadisticas")))
            .await
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.fetch(self.http.get(self.url("/categorias"))).await
    }

    pub async fn get_category(&self, id: i64) -> Result<Category, ApiError> {
        self.fetch(self.http.get(self.url(&format!("/categorias/{id}"))))
            .await
    }

    pub async fn create_category(&self, category: &CategoryRequest) -> Result<Category, ApiError> {
        self.fetch(self.http.post(self.url("/categorias")).json(category))
            .await
    }

    pub async fn update_category(
        &self,
        id: i64,
        category: &CategoryRequest,
    ) -> Result<Category, ApiError> {
        self.fetch(
            self.http
                .put(self.url(&format!("/categorias/{id}")))
                .json(category),
        )
        .await
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        self.execute(self.http.delete(self.url(&format!("/categorias/{id}"))))
            .await?;
        Ok(())
    }

    // Service

    pub async fn status(&self) -> Result<ServiceStatus, ApiError> {
        self.fetch(self.http.get(self.url("/v1/status"))).await
    }
}

async fn error_message(response: Response) -> Option<String> {
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .map(|body| body.message)
}
