use crate::common::{TestApp, routes};

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["status"], "ok");
}

#[tokio::test]
async fn root_greets() {
    let app = TestApp::spawn().await;

    let res = app.get("/").await;

    assert_eq!(res.status, 200);
    assert!(res.text.contains("PawTrack"));
}

#[tokio::test]
async fn openapi_document_lists_resources() {
    let app = TestApp::spawn().await;

    let res = app.get("/api-docs/openapi.json").await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().expect("paths object");
    for path in ["/dogs", "/dogs/{id}", "/bathroom-logs/stats", "/feeding/{id}"] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = TestApp::spawn().await;

    let res = app.get("/cats").await;

    assert_eq!(res.status, 404);
}
