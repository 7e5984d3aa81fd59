#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{multipart, StatusCode};
use serde_json::{json, Value};

use doc_portal_api::app;
use doc_portal_api::config::AppConfig;
use doc_portal_api::database::Database;
use doc_portal_api::services::{EmailMessage, SimulatedMailer};
use doc_portal_api::state::AppState;

pub const PASSWORD: &str = "Password1!";

/// One isolated server per test: in-memory database, private upload dir, recording mailer
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub mailer: Arc<SimulatedMailer>,
    pub upload_dir: PathBuf,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(|_| {}).await
    }

    pub async fn start_with(customize: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let upload_dir = std::env::temp_dir().join(format!("doc-portal-test-{}", uuid::Uuid::new_v4()));

        let mut config = AppConfig::development();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;
        config.database.url = "sqlite::memory:".to_string();
        config.upload.root_dir = upload_dir.clone();
        customize(&mut config);

        let db = Database::connect(&config.database).await?;
        db.migrate().await?;
        tokio::fs::create_dir_all(&upload_dir).await?;

        let mailer = Arc::new(SimulatedMailer::new());
        let bind_addr = config.bind_addr();
        let state = AppState::new(config, db, mailer.clone());

        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind {}", bind_addr))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app::router(state)).await;
        });

        Ok(Self {
            base_url: format!("http://{}", bind_addr),
            client: reqwest::Client::new(),
            mailer,
            upload_dir,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register an account named after the email's local part; returns the `user` object
    pub async fn register(&self, email: &str, role: &str) -> Result<Value> {
        let last_name = email.split('@').next().unwrap_or(email);
        let res = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "email": email,
                "password": PASSWORD,
                "role": role,
                "last_name": last_name,
                "first_name": "Jean",
                "gdpr_accepted": true,
                "terms_accepted": true,
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register {} failed: {}", email, res.status());

        let body: Value = res.json().await?;
        Ok(body["data"]["user"].clone())
    }

    pub async fn login(&self, email: &str, role: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": PASSWORD, "role": role }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login {} failed: {}", email, res.status());

        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    /// Register then log in; returns (user id, token)
    pub async fn account(&self, email: &str, role: &str) -> Result<(i64, String)> {
        let user = self.register(email, role).await?;
        let id = user["id"].as_i64().context("user has no id")?;
        Ok((id, self.login(email, role).await?))
    }

    pub async fn upload(&self, token: &str, filename: &str, mime: &str, bytes: Vec<u8>) -> Result<reqwest::Response> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_string()).mime_str(mime)?;
        // Send file names verbatim rather than as RFC 5987 `filename*`
        let form = multipart::Form::new().percent_encode_noop().part("file", part);

        Ok(self
            .client
            .post(self.url("/api/docs/upload"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?)
    }

    /// Upload that must succeed; returns the stored `document` object
    pub async fn upload_ok(&self, token: &str, filename: &str) -> Result<Value> {
        let res = self.upload(token, filename, "application/octet-stream", b"%PDF-1.4 test".to_vec()).await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "upload {} failed: {}", filename, res.status());
        let body: Value = res.json().await?;
        Ok(body["data"]["document"].clone())
    }

    pub async fn get_json(&self, token: &str, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).bearer_auth(token).send().await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }

    pub async fn put_json(&self, token: &str, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self.client.put(self.url(path)).bearer_auth(token).json(&body).send().await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }

    /// Notifications are sent from a background task, so poll the outbox
    pub async fn wait_for_mail(&self, count: usize) -> Result<Vec<EmailMessage>> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let sent = self.mailer.sent();
            if sent.len() >= count {
                return Ok(sent);
            }
            if Instant::now() > deadline {
                anyhow::bail!("expected {} emails, saw {}", count, sent.len());
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Ids of the documents in a `documents` array
pub fn ids(documents: &Value) -> Vec<i64> {
    documents
        .as_array()
        .map(|docs| docs.iter().filter_map(|d| d["id"].as_i64()).collect())
        .unwrap_or_default()
}
