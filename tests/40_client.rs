mod common;

use anyhow::Result;
use reqwest::StatusCode;

use todo_api::client::{ApiClient, ClientError, ProfileUpdate, SessionHandle};
use todo_api::validation::{NewTodo, TodoChanges};

#[tokio::test]
async fn client_round_trip() -> Result<()> {
    let server = common::spawn_server().await?;
    let session = SessionHandle::default();
    let client = ApiClient::new(&server.base_url, session.clone())?;

    let payload = client
        .register("Ada", "ada@example.com", common::PASSWORD, common::PASSWORD)
        .await?;
    assert!(session.is_authenticated());
    assert_eq!(session.token().as_deref(), Some(payload.token.as_str()));

    let mut new_todo = NewTodo::new("Write tests");
    new_todo.description = Some("for the client".into());
    let todo = client.create_todo(&new_todo).await?;
    assert_eq!(todo.title, "Write tests");
    assert!(!todo.completed);

    let toggled = client.toggle_todo(todo.id, true).await?;
    assert!(toggled.completed);
    assert_eq!(toggled.description.as_deref(), Some("for the client"));

    let changes = TodoChanges {
        description: Some(None),
        ..Default::default()
    };
    let updated = client.update_todo(todo.id, &changes).await?;
    assert_eq!(updated.description, None);
    assert!(updated.completed);

    assert_eq!(client.get_todos().await?.len(), 1);
    assert_eq!(client.get_todo(todo.id).await?, updated);

    client.delete_todo(todo.id).await?;
    let err = client.get_todo(todo.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    Ok(())
}

#[tokio::test]
async fn login_profile_and_logout_drive_the_session() -> Result<()> {
    let server = common::spawn_server().await?;
    server.register("Ada", "ada@example.com").await?;

    let session = SessionHandle::default();
    let client = ApiClient::new(&format!("{}/api", server.base_url), session.clone())?;

    client.login("ada@example.com", common::PASSWORD).await?;
    assert_eq!(session.user().map(|u| u.name), Some("Ada".to_string()));

    let update = ProfileUpdate {
        name: Some("Ada Lovelace".into()),
        ..Default::default()
    };
    client.update_profile(&update).await?;
    assert_eq!(session.user().map(|u| u.name), Some("Ada Lovelace".to_string()));
    assert_eq!(client.get_user().await?.name, "Ada Lovelace");

    let token = session.token().unwrap();
    client.logout().await;
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());

    // The server forgot the token too
    let res = server
        .client
        .get(server.url("/auth/user"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn server_messages_and_field_errors_come_through() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = ApiClient::new(&server.base_url, SessionHandle::default())?;

    // No token at all
    let err = client.get_todos().await.unwrap_err();
    assert!(err.is_unauthenticated());

    let err = client.login("ada@example.com", "whatever1").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.to_string(), "Invalid credentials");

    let err = client
        .register("Ada", "not-an-email", "short", "other")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    let fields = err.field_errors().unwrap();
    assert!(fields.contains_key("email"));
    assert!(fields.contains_key("password"));
    assert!(matches!(err, ClientError::Api { .. }));
    Ok(())
}

#[tokio::test]
async fn foreign_todo_is_forbidden_through_the_client() -> Result<()> {
    let server = common::spawn_server().await?;
    let (ada, _) = server.register("Ada", "ada@example.com").await?;
    let todo = server.create_todo(&ada, serde_json::json!({ "title": "Mine" })).await?;

    let grace = ApiClient::new(&server.base_url, SessionHandle::default())?;
    grace
        .register("Grace", "grace@example.com", common::PASSWORD, common::PASSWORD)
        .await?;

    let id = todo["id"].as_i64().unwrap();
    let err = grace.toggle_todo(id, true).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(err.to_string(), "Unauthorized");

    let err = grace.delete_todo(id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    Ok(())
}
