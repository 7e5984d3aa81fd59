mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{TestServer, PASSWORD};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_returns_user_without_password() -> Result<()> {
    let server = TestServer::start().await?;

    let user = server.register("Dupont@Example.com", "client").await?;
    assert_eq!(user["email"], "dupont@example.com");
    assert_eq!(user["role"], "client");
    assert!(user.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicates_and_weak_passwords() -> Result<()> {
    let server = TestServer::start().await?;
    server.register("dupont@example.com", "client").await?;

    let duplicate = server
        .client
        .post(server.url("/api/auth/register"))
        .json(&json!({
            "email": "DUPONT@example.com", "password": PASSWORD, "role": "professional",
            "last_name": "Dupont", "first_name": "Jean"
        }))
        .send()
        .await?;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let weak = server
        .client
        .post(server.url("/api/auth/register"))
        .json(&json!({
            "email": "weak@example.com", "password": "password", "role": "client",
            "last_name": "Weak", "first_name": "Jean"
        }))
        .send()
        .await?;
    assert_eq!(weak.status(), StatusCode::BAD_REQUEST);
    let body: Value = weak.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["password"].is_string());

    let bad_role = server
        .client
        .post(server.url("/api/auth/register"))
        .json(&json!({
            "email": "admin@example.com", "password": PASSWORD, "role": "admin",
            "last_name": "Admin", "first_name": "Jean"
        }))
        .send()
        .await?;
    assert_eq!(bad_role.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn login_returns_token_and_role() -> Result<()> {
    let server = TestServer::start().await?;
    server.register("pro@example.com", "professional").await?;

    let res = server
        .client
        .post(server.url("/api/auth/login"))
        .json(&json!({ "email": "pro@example.com", "password": PASSWORD, "userType": "professional" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], "professional");
    assert!(body["data"]["token"].as_str().is_some_and(|t| t.split('.').count() == 3));
    assert!(body["data"]["user"]["last_login_at"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_through_wrong_portal_is_role_mismatch() -> Result<()> {
    let server = TestServer::start().await?;
    server.register("client@example.com", "client").await?;

    let res = server
        .client
        .post(server.url("/api/auth/login"))
        .json(&json!({ "email": "client@example.com", "password": PASSWORD, "role": "professional" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "ROLE_MISMATCH");
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() -> Result<()> {
    let server = TestServer::start().await?;
    server.register("client@example.com", "client").await?;

    for (email, password) in [("client@example.com", "Wrong123!"), ("ghost@example.com", PASSWORD)] {
        let res = server
            .client
            .post(server.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password, "role": "client" }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await?;
        assert_eq!(body["message"], "Invalid credentials");
    }

    let missing_role = server
        .client
        .post(server.url("/api/auth/login"))
        .json(&json!({ "email": "client@example.com", "password": PASSWORD }))
        .send()
        .await?;
    assert_eq!(missing_role.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn profile_requires_token_and_updates_partially() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.account("client@example.com", "client").await?;
    server.register("other@example.com", "client").await?;

    let anonymous = server.client.get(server.url("/api/auth/profile")).send().await?;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let forged = server
        .client
        .get(server.url("/api/auth/profile"))
        .bearer_auth("not.a.jwt")
        .send()
        .await?;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);

    let (status, body) = server.get_json(&token, "/api/auth/profile").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "client@example.com");

    let (status, body) = server
        .put_json(&token, "/api/auth/profile", json!({ "company": "Boulangerie Dupont" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["company"], "Boulangerie Dupont");
    assert_eq!(body["data"]["user"]["first_name"], "Jean");

    let (status, _) = server
        .put_json(&token, "/api/auth/profile", json!({ "email": "other@example.com" }))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn change_password_then_login_with_new_one() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.account("client@example.com", "client").await?;

    let (status, _) = server
        .put_json(
            &token,
            "/api/auth/change-password",
            json!({ "current_password": "Nope1234!", "new_password": "Changed9?" }),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = server
        .put_json(
            &token,
            "/api/auth/change-password",
            json!({ "current_password": PASSWORD, "new_password": "Changed9?" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let res = server
        .client
        .post(server.url("/api/auth/login"))
        .json(&json!({ "email": "client@example.com", "password": "Changed9?", "role": "client" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn forgot_password_never_reveals_accounts() -> Result<()> {
    let server = TestServer::start().await?;
    server.register("client@example.com", "client").await?;

    let mut messages = vec![];
    for email in ["client@example.com", "ghost@example.com"] {
        let res = server
            .client
            .post(server.url("/api/auth/forgot-password"))
            .json(&json!({ "email": email }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await?;
        messages.push(body["data"]["message"].clone());
    }
    assert_eq!(messages[0], messages[1]);

    let invalid = server
        .client
        .post(server.url("/api/auth/forgot-password"))
        .json(&json!({ "email": "nope" }))
        .send()
        .await?;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn malformed_login_body_is_json_error() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/auth/login"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.headers()[reqwest::header::CONTENT_TYPE].to_str()?.starts_with("application/json"));

    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}
