use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use configs::{AppConfig, StoreBackend};

struct TestApp {
    base_url: String,
}

/// Serve the real startup path (file backend) on an ephemeral port.
async fn start_server(store_path: &str) -> anyhow::Result<TestApp> {
    let mut cfg = AppConfig::default();
    cfg.store.backend = StoreBackend::File;
    cfg.store.path = store_path.to_string();

    let app = server::startup::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_grants_survive_restart_with_file_backend() -> anyhow::Result<()> {
    let dir = format!("target/test-data/{}", Uuid::new_v4());
    let store_path = format!("{dir}/features.json");
    let c = reqwest::Client::new();

    let app = start_server(&store_path).await?;
    let res = c.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c
        .post(format!("{}/api/features", app.base_url))
        .json(&json!({"role": "sales", "feature": {"id": "dial", "name": "Dialer", "category": "Calling"}}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c
        .post(format!("{}/api/features/bulk-add", app.base_url))
        .json(&json!({"role": "sales", "featureIds": ["csv", "dial"]}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c
        .delete(format!("{}/api/features/bulk-remove", app.base_url))
        .json(&json!({"role": "ghost", "featureIds": ["x"]}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // second instance over the same file sees the same state
    let restarted = start_server(&store_path).await?;
    let roles = c
        .get(format!("{}/api/roles", restarted.base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(
        roles,
        json!([
            {"role": "sales", "features": [
                {"id": "dial", "name": "Dialer", "category": "Calling"},
                {"id": "csv", "name": "csv", "category": "Unknown"}
            ]},
            {"role": "ghost", "features": []}
        ])
    );

    let res = c.get(format!("{}/api/features/categories", restarted.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!(["Calling", "Unknown"]));

    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

#[tokio::test]
async fn e2e_missing_role_is_client_error() -> anyhow::Result<()> {
    let dir = format!("target/test-data/{}", Uuid::new_v4());
    let app = start_server(&format!("{dir}/features.json")).await?;
    let res = reqwest::get(format!("{}/api/features", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Missing role parameter"}));
    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}
