#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use lms_api_rust::database::{MemoryStore, SharedStore};
use lms_api_rust::types::Role;
use lms_api_rust::{app, AppState};

/// An in-process server on an ephemeral port backed by its own memory store
pub struct TestServer {
    pub base_url: String,
    pub store: SharedStore,
    pub client: reqwest::Client,
}

pub async fn spawn_server() -> Result<TestServer> {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let router = app(AppState::new(store.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        store,
        client: reqwest::Client::new(),
    })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register a student and return (token, user id)
    pub async fn register(&self, name: &str, email: &str) -> Result<(String, Uuid)> {
        let res = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": "secret123" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let body: Value = res.json().await?;
        let token = body["data"]["token"].as_str().context("missing token")?.to_string();
        let id = body["data"]["user"]["id"].as_str().context("missing user id")?.parse()?;
        Ok((token, id))
    }

    /// Register an account and raise it to `role` directly in the store
    pub async fn register_with_role(&self, name: &str, email: &str, role: Role) -> Result<String> {
        let (token, id) = self.register(name, email).await?;
        self.store
            .update_user_role(id, role)
            .await?
            .context("user vanished before promotion")?;
        Ok(token)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        let mut req = self.client.post(self.url(path)).json(&body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self.client.put(self.url(path)).bearer_auth(token).json(&body).send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.delete(self.url(path)).bearer_auth(token).send().await?;
        Ok((res.status(), res.json().await?))
    }

    /// Create a course through the admin API and return its id
    pub async fn create_course(&self, admin: &str, slug: &str, status: &str) -> Result<String> {
        let (status_code, body) = self
            .post(
                "/api/admin/courses",
                Some(admin),
                json!({
                    "title": format!("Course {}", slug),
                    "slug": slug,
                    "category": "program",
                    "description": "A course used in tests",
                    "shortDescription": "Test course",
                    "price": 49.5,
                    "status": status
                }),
            )
            .await?;
        anyhow::ensure!(status_code == StatusCode::CREATED, "create course failed: {} {}", status_code, body);
        Ok(body["data"]["id"].as_str().context("missing course id")?.to_string())
    }

    pub async fn create_module(&self, admin: &str, course_id: &str, title: &str, order: i32) -> Result<String> {
        let (status_code, body) = self
            .post(
                "/api/admin/modules",
                Some(admin),
                json!({ "title": title, "courseId": course_id, "order": order }),
            )
            .await?;
        anyhow::ensure!(status_code == StatusCode::CREATED, "create module failed: {} {}", status_code, body);
        Ok(body["data"]["id"].as_str().context("missing module id")?.to_string())
    }

    pub async fn create_video_lesson(&self, admin: &str, module_id: &str, title: &str) -> Result<String> {
        let (status_code, body) = self
            .post(
                "/api/admin/lessons",
                Some(admin),
                json!({
                    "title": title,
                    "moduleId": module_id,
                    "type": "video",
                    "videoUrl": "https://videos.example.com/intro"
                }),
            )
            .await?;
        anyhow::ensure!(status_code == StatusCode::CREATED, "create lesson failed: {} {}", status_code, body);
        Ok(body["data"]["id"].as_str().context("missing lesson id")?.to_string())
    }
}
