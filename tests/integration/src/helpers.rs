//! Test server lifecycle and request helpers

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use feed_api::{create_app, create_app_state};
use feed_common::AppConfig;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const API_PREFIX: &str = "/api/v1";

/// A running feed API bound to an ephemeral local port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Absolute URL; paths starting with `/health` are left unprefixed
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("/health") {
            format!("{}{path}", self.base_url())
        } else {
            format!("{}{API_PREFIX}{path}", self.base_url())
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(bearer(self.client.get(self.url(path)), token)).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        send(bearer(self.client.post(self.url(path)), token).json(body)).await
    }

    pub async fn patch_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        send(bearer(self.client.patch(self.url(path)), token).json(body)).await
    }

    /// PUT without a body, the shape of a reaction press
    pub async fn put(&self, path: &str) -> Result<Response> {
        Ok(self.client.put(self.url(path)).send().await?)
    }

    pub async fn put_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(bearer(self.client.put(self.url(path)), token)).await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(bearer(self.client.delete(self.url(path)), token)).await
    }
}

fn bearer(request: RequestBuilder, token: &str) -> RequestBuilder {
    request.header("Authorization", format!("Bearer {token}"))
}

async fn send(request: RequestBuilder) -> Result<Response> {
    Ok(request.send().await?)
}

/// Environment config with the rate limiter opened up for test bursts
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
    config.rate_limit.requests_per_second = 1000;
    config.rate_limit.burst = 1000;
    Ok(config)
}

/// False (and a note on stderr) when Postgres or Redis is not configured
pub async fn check_test_env() -> bool {
    for var in ["DATABASE_URL", "REDIS_URL"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }
    true
}

/// Check the status, then decode the JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Check the status and the `error.code` of a failure body
pub async fn assert_error(
    response: Response,
    expected_status: StatusCode,
    expected_code: &str,
) -> Result<()> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    let code = body["error"]["code"].as_str().unwrap_or_default();
    if code != expected_code {
        anyhow::bail!("Expected error code {expected_code}, got {code}. Body: {body}");
    }
    Ok(())
}
