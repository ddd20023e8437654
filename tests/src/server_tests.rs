use crate::support::FakeBackend;
use galaxy::{handle_request, serve, DemoApp, EnvironmentSettings, RunnerConfiguration, Variant};
use hyper::{Body, Request, StatusCode};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::oneshot;

fn app(base_url: Option<String>) -> Arc<DemoApp> {
    Arc::new(DemoApp::new(
        RunnerConfiguration::new(Variant::Basic),
        EnvironmentSettings {
            base_url,
            ..Default::default()
        },
    ))
}

async fn get(app: &Arc<DemoApp>, path: &str) -> (StatusCode, String) {
    let request = Request::get(path).body(Body::empty()).unwrap();
    let response = handle_request(request, app.clone()).await.unwrap();
    let status = response.status();
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();

    (status, String::from_utf8_lossy(&body).into())
}

#[tokio::test]
async fn landing_page_links_to_the_test() {
    let (status, body) = get(&app(None), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"href="/databasetest""#));
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let (status, body) = get(&app(None), "/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn database_test_without_configuration_shows_the_error() {
    let (status, body) = get(&app(None), "/databasetest").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ERROR: The database service hasn&#39;t been configured"));
}

#[tokio::test]
async fn database_test_page_lists_every_step() {
    let backend = FakeBackend::start();
    let app = app(Some(backend.base_url("")));

    let (status, body) = get(&app, "/databasetest").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("1.1 Create a collection"));
    assert!(body.contains("   -  Create collection: {&quot;ok&quot;:1,&quot;n&quot;:1}"));
    assert!(body.contains("   -  Delete Table: {&quot;ok&quot;:1,&quot;n&quot;:24}"));
    assert_eq!(backend.requests().len(), 24);
}

#[tokio::test]
async fn serves_over_http_until_shutdown() {
    let backend = FakeBackend::start();
    let app = app(Some(backend.base_url("")));

    let addr: SocketAddr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let (shutdown, shutdown_signal) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(addr, app, async {
        let _ = shutdown_signal.await;
    }));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let mut landing = None;
    for _ in 0..50 {
        match client.get(format!("http://{}/", addr)).send().await {
            Ok(response) => {
                landing = Some(response);
                break;
            }
            Err(_) => tokio::time::sleep(std::time::Duration::from_millis(20)).await,
        }
    }
    let landing = landing.expect("server never came up");
    assert_eq!(landing.status(), reqwest::StatusCode::OK);

    let results = client
        .get(format!("http://{}/databasetest", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(results.status(), reqwest::StatusCode::OK);
    assert!(results.text().await.unwrap().contains("10 List all collections in a database"));

    let missing = client
        .get(format!("http://{}/missing", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    shutdown.send(()).unwrap();
    server.await.unwrap().unwrap();
}
