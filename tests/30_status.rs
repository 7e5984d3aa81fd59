mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use common::TestServer;

/// Current status as seen through the professional listing
async fn status_of(server: &TestServer, pro_token: &str, id: i64) -> Result<Value> {
    let (_, all) = server.get_json(pro_token, "/api/docs/all").await?;
    let doc = all["data"]["documents"]
        .as_array()
        .and_then(|docs| docs.iter().find(|d| d["id"] == id).cloned())
        .unwrap_or(Value::Null);
    Ok(doc["status"].clone())
}

#[tokio::test]
async fn professional_changes_status_and_owner_is_notified() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, client) = server.account("dupont@example.com", "client").await?;
    let (_, pro) = server.account("expert@example.com", "professional").await?;
    let doc = server.upload_ok(&client, "bilan.pdf").await?;
    let id = doc["id"].as_i64().unwrap();

    let (status, body) = server
        .put_json(&pro, &format!("/api/docs/status/{}", id), json!({ "status": "validated" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["document_id"], id);
    assert_eq!(body["data"]["status"], "validated");

    let sent = server.wait_for_mail(1).await?;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "dupont@example.com");
    assert_eq!(sent[0].subject, "Your document \"bilan.pdf\" has been validated");

    assert_eq!(status_of(&server, &pro, id).await?, "validated");
    Ok(())
}

#[tokio::test]
async fn notification_can_be_skipped() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, client) = server.account("dupont@example.com", "client").await?;
    let (_, pro) = server.account("expert@example.com", "professional").await?;
    let id = server.upload_ok(&client, "bilan.pdf").await?["id"].as_i64().unwrap();

    let (status, _) = server
        .put_json(
            &pro,
            &format!("/api/docs/status/{}", id),
            json!({ "status": "urgent", "send_notification": false }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(server.mailer.sent().is_empty());
    assert_eq!(status_of(&server, &pro, id).await?, "urgent");
    Ok(())
}

#[tokio::test]
async fn invalid_status_is_rejected_and_nothing_changes() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, client) = server.account("dupont@example.com", "client").await?;
    let (_, pro) = server.account("expert@example.com", "professional").await?;
    let id = server.upload_ok(&client, "bilan.pdf").await?["id"].as_i64().unwrap();

    for body in [json!({ "status": "archived" }), json!({ "status": "VALIDATED" }), json!({})] {
        let (status, err) = server.put_json(&pro, &format!("/api/docs/status/{}", id), body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["field_errors"]["status"].is_string());
    }

    assert_eq!(status_of(&server, &pro, id).await?, "pending");
    assert!(server.mailer.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn clients_cannot_change_status() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, client) = server.account("dupont@example.com", "client").await?;
    let (_, pro) = server.account("expert@example.com", "professional").await?;
    let id = server.upload_ok(&client, "bilan.pdf").await?["id"].as_i64().unwrap();

    let (status, body) = server
        .put_json(&client, &format!("/api/docs/status/{}", id), json!({ "status": "validated" }))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    assert_eq!(status_of(&server, &pro, id).await?, "pending");
    Ok(())
}

#[tokio::test]
async fn unknown_document_is_404() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, pro) = server.account("expert@example.com", "professional").await?;

    let (status, body) = server
        .put_json(&pro, "/api/docs/status/9999", json!({ "status": "processing" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn malformed_status_requests_are_json_errors() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, client) = server.account("dupont@example.com", "client").await?;
    let (_, pro) = server.account("expert@example.com", "professional").await?;
    let id = server.upload_ok(&client, "bilan.pdf").await?["id"].as_i64().unwrap();

    let res = server
        .client
        .put(server.url(&format!("/api/docs/status/{}", id)))
        .bearer_auth(&pro)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{\"status\": ")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = server
        .put_json(&pro, "/api/docs/status/not-a-number", json!({ "status": "validated" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);

    assert_eq!(status_of(&server, &pro, id).await?, "pending");
    Ok(())
}
