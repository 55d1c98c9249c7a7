//! Serve the router on an ephemeral port and scrape it over plain HTTP/1.1.

use std::sync::Arc;

use slurm_gpu_exporter::api::metrics::{InventoryCollector, QueueCollector, Registry};
use slurm_gpu_exporter::api::router;
use slurm_gpu_exporter::app_state::{AppState, FetchErrorPolicy};
use slurm_gpu_exporter::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.expect("write");

    let mut response = String::new();
    stream.read_to_string(&mut response).await.expect("read");
    response
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let mut registry = Registry::new();
    registry
        .register(InventoryCollector::new(|| -> Result<Vec<u8>> {
            Ok(b"node1 gpu:4 gpu:1\nnode2 gpu:2 gpu:0\n".to_vec())
        }))
        .unwrap();
    registry
        .register(QueueCollector::new(|| -> Result<Vec<u8>> {
            Ok(b"101 RUNNING gres/gpu=2\n102 PENDING gres/gpu=1\n".to_vec())
        }))
        .unwrap();
    let state = Arc::new(AppState::new(registry, FetchErrorPolicy::Respond));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    let response = get(addr, "/metrics").await;
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("text/plain; version=0.0.4"));
    assert!(response.contains("\nslurm_gpus_total 6\n"));
    assert!(response.contains("\nslurm_gres_gpu_pending 1\n"));

    let response = get(addr, "/").await;
    assert!(response.starts_with("HTTP/1.1 404"));

    server.abort();
}
