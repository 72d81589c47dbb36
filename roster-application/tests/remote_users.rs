#![cfg(feature = "http")]

use std::sync::Arc;

use anyhow::Result as AnyResult;
use axum::{Json, Router, routing::get};
use roster_application::ControllerState;
use roster_application::presets::users::{self, DirectoryUser};
use roster_domain::record::Record;
use roster_domain::source::HttpSource;
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn_users_server() -> AnyResult<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route(
        "/users",
        get(|| async {
            Json(json!([
                {
                    "id": 1,
                    "name": "Leanne Graham",
                    "email": "Sincere@april.biz",
                    "company": { "name": "Romaguera-Crona" }
                },
                {
                    "id": 2,
                    "name": "Ervin Howell",
                    "email": "Shanna@melissa.tv",
                    "company": { "name": "Deckow-Crist" }
                }
            ]))
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn local_source(url: String) -> AnyResult<Arc<HttpSource>> {
    let client = reqwest::Client::builder().no_proxy().build()?;
    Ok(Arc::new(HttpSource::with_client(client, url)))
}

#[tokio::test]
async fn loads_remote_directory_and_appends_generated_user() -> AnyResult<()> {
    let base = spawn_users_server().await?;
    let mut c = users::remote_with_source(local_source(format!("{base}/users"))?)?
        .start()
        .await;

    assert_eq!(c.state(), ControllerState::Idle);
    assert_eq!(c.len(), 2);
    let ervin = DirectoryUser::from_entity(c.get("2").unwrap())?;
    assert_eq!(ervin.last_name, "Howell");
    assert_eq!(ervin.department, "Deckow-Crist");

    c.stage_draft([
        ("firstName", "Clementine"),
        ("lastName", "Bauch"),
        ("email", "Nathan@yesenia.net"),
        ("department", "Romaguera-Jacobson"),
    ]);
    let outcome = c.commit()?;
    assert_eq!(outcome.id().as_str(), "3");
    assert_eq!(
        c.filter_options(),
        ["All", "Romaguera-Crona", "Deckow-Crist", "Romaguera-Jacobson"]
    );
    Ok(())
}

#[tokio::test]
async fn unreachable_directory_reports_user_facing_message() -> AnyResult<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let c = users::remote_with_source(local_source(format!("http://{addr}/users"))?)?
        .start()
        .await;
    assert!(c.is_empty());
    assert_eq!(c.state(), ControllerState::Error);
    assert_eq!(
        c.error_message().as_deref(),
        Some(users::LOAD_ERROR_MESSAGE)
    );
    Ok(())
}
