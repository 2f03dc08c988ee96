mod common;

use std::time::Duration;

use actix_web::{web, App, HttpServer};

use stroke_scan::client::PredictClient;
use stroke_scan::render::{Report, Tone};
use stroke_scan::routes::{self, AppState};
use stroke_scan::ClientError;

use common::{png, state};

/// Start the service on an ephemeral port and return its base URL.
fn spawn_server(state: AppState) -> (String, actix_web::dev::ServerHandle) {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_rt::spawn(server);

    (format!("http://{}", addr), handle)
}

#[actix_web::test]
async fn submit_round_trip_renders_report() {
    let (state, _uploads) = state(0.91, 1024 * 1024);
    let (url, handle) = spawn_server(state);

    let scratch = tempfile::tempdir().unwrap();
    let scan = scratch.path().join("head_ct.png");
    std::fs::write(&scan, png(20, 10)).unwrap();

    let client = PredictClient::new(url, Duration::from_secs(10)).unwrap();
    let response = client.submit(Some(&scan)).await.unwrap();
    let report = Report::from_response(&response);

    assert_eq!(report.preview_src, "/static/uploads/head_ct.png");
    assert_eq!(report.tone, Tone::Red);
    assert!(report.details.contains("Resolution: 20 × 10"));
    assert_eq!(report.diagnosis, "Stroke Detected\nConfidence: 91.00%");

    handle.stop(true).await;
}

#[actix_web::test]
async fn server_rejection_surfaces_as_error() {
    let (state, _uploads) = state(0.5, 1024 * 1024);
    let (url, handle) = spawn_server(state);

    let scratch = tempfile::tempdir().unwrap();
    let scan = scratch.path().join("broken.png");
    std::fs::write(&scan, b"not really a png").unwrap();

    let client = PredictClient::new(url, Duration::from_secs(10)).unwrap();
    let err = client.submit(Some(&scan)).await.unwrap_err();

    match err {
        ClientError::Server { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid image file");
        }
        other => panic!("unexpected error: {other}"),
    }

    handle.stop(true).await;
}
