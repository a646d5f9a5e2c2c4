use indexdash_client::prelude::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve exactly one canned response on a local port, handing back the request line.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // read the request head; none of the endpoints take a body
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&buf)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    (format!("http://{addr}"), handle)
}

// proxies from the environment must not intercept loopback traffic
fn client(base_url: &str) -> IndexClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    IndexClient::with_client(http, base_url).unwrap()
}

#[tokio::test]
async fn lists_indices() {
    let (url, server) = serve_once("200 OK", r#"{"indices": ["NIFTY 50", "NIFTY BANK"]}"#).await;

    let indices = client(&url).list_indices().await.unwrap();

    assert_eq!(indices, vec!["NIFTY 50".to_string(), "NIFTY BANK".to_string()]);
    assert_eq!(server.await.unwrap(), "GET /indices HTTP/1.1");
}

#[tokio::test]
async fn history_without_data_field_is_empty() {
    let (url, server) = serve_once("200 OK", r#"{"error": "index not loaded"}"#).await;

    let history = client(&url)
        .fetch_history("NIFTY50", None, None)
        .await
        .unwrap();

    assert!(history.is_empty());
    assert_eq!(
        server.await.unwrap(),
        "GET /history?index_name=NIFTY50 HTTP/1.1"
    );
}

#[tokio::test]
async fn history_server_error_propagates() {
    let (url, server) = serve_once("500 Internal Server Error", "{}").await;

    let err = client(&url)
        .fetch_history("NIFTY50", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Server { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    server.await.unwrap();
}

#[tokio::test]
async fn predictions_are_parsed() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"predictions": [{"index_date": "2024-01-03", "predicted_close": 103.0}]}"#,
    )
    .await;

    let predictions = client(&url)
        .fetch_predictions("NIFTY50", DEFAULT_FORECAST_DAYS)
        .await;

    assert_eq!(
        predictions,
        vec![PredictionRecord {
            index_date: "2024-01-03".to_string(),
            predicted_close: 103.0,
        }]
    );
    assert_eq!(
        server.await.unwrap(),
        "GET /predict?index_name=NIFTY50&days=7 HTTP/1.1"
    );
}

#[tokio::test]
async fn prediction_server_error_becomes_empty_forecast() {
    let (url, server) = serve_once("503 Service Unavailable", "{}").await;

    let api = client(&url);
    assert!(api.fetch_predictions("NIFTY50", 7).await.is_empty());
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_forecaster_becomes_empty_forecast() {
    // grab a free port, then close it so the connection is refused
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{addr}"));
    assert!(api.fetch_predictions("NIFTY50", 7).await.is_empty());

    let err = api.try_fetch_predictions("NIFTY50", 7).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn health_reports_ok() {
    let (url, server) = serve_once("200 OK", r#"{"status": "ok"}"#).await;

    assert!(client(&url).health().await.unwrap());
    assert_eq!(server.await.unwrap(), "GET /health HTTP/1.1");
}
