#![cfg(feature = "http")]

use std::sync::Arc;

use anyhow::Result as AnyResult;
use axum::{Json, Router, http::StatusCode, routing::get};
use roster_domain::error::DomainError;
use roster_domain::schema::{EntitySchema, FieldSpec};
use roster_domain::source::{DataSource, HttpSource, RecordTransform, SchemaTransform};
use roster_domain::value_object::{FieldKind, FieldValue};
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn_server(app: Router) -> AnyResult<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn local_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("client")
}

fn schema() -> Arc<EntitySchema> {
    Arc::new(
        EntitySchema::builder()
            .entity("sales_order")
            .id_field("orderId")
            .category_field("status")
            .fields(vec![
                FieldSpec::new("orderId", FieldKind::Text, true),
                FieldSpec::new("status", FieldKind::Text, true),
                FieldSpec::new("totalAmount", FieldKind::Number, false),
            ])
            .build()
            .expect("schema"),
    )
}

#[tokio::test]
async fn fetches_json_array_and_transforms_records() -> AnyResult<()> {
    let app = Router::new().route(
        "/orders",
        get(|| async {
            Json(json!([
                { "orderId": "SO001", "status": "Shipped", "totalAmount": 150.0 },
                { "orderId": "SO002", "status": "Pending", "totalAmount": 200.5 }
            ]))
        }),
    );
    let base = spawn_server(app).await?;
    let source = HttpSource::with_client(local_client(), format!("{base}/orders"));

    let records = source.fetch_initial_entities().await?;
    assert_eq!(records.len(), 2);

    let transform = SchemaTransform::new(schema());
    let entities = records
        .into_iter()
        .map(|r| transform.transform(r))
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(entities[1].id().as_str(), "SO002");
    assert_eq!(
        entities[1].field("totalAmount"),
        Some(&FieldValue::Number(200.5))
    );
    Ok(())
}

#[tokio::test]
async fn http_error_status_is_network_error() -> AnyResult<()> {
    let app = Router::new().route(
        "/orders",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn_server(app).await?;
    let source = HttpSource::with_client(local_client(), format!("{base}/orders"));

    let err = source.fetch_initial_entities().await.unwrap_err();
    assert!(err.is_network(), "unexpected error: {err}");
    Ok(())
}

#[tokio::test]
async fn non_array_body_is_network_error() -> AnyResult<()> {
    let app = Router::new().route(
        "/orders",
        get(|| async { Json(json!({ "orders": [] })) }),
    );
    let base = spawn_server(app).await?;
    let source = HttpSource::with_client(local_client(), format!("{base}/orders"));

    let err = source.fetch_initial_entities().await.unwrap_err();
    assert!(matches!(err, DomainError::Network { .. }));
    Ok(())
}

#[tokio::test]
async fn unreachable_host_is_network_error() -> AnyResult<()> {
    // 先占用端口再释放，确保连接被拒绝
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let source = HttpSource::with_client(local_client(), format!("http://{addr}/orders"));
    let err = source.fetch_initial_entities().await.unwrap_err();
    assert!(err.is_network());
    Ok(())
}
