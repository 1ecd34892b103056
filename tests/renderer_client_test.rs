//! Renderer client classification tests
//!
//! Drives the health and render classification against real sockets:
//! a refused connection, a hung connection, and scripted HTTP responses
//! must land in three distinct classes.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use arc_assess::db::Assessment;
use arc_assess::renderer::{HealthStatus, RenderError, RendererClient};
use arc_assess::report::build_report_payload;

fn client_for(addr: SocketAddr) -> RendererClient {
    RendererClient::new(
        format!("http://{}", addr),
        Duration::from_millis(300),
        Duration::from_millis(500),
    )
}

fn empty_payload() -> arc_assess::report::ReportPayload {
    build_report_payload(
        None,
        &Assessment {
            likert: vec![],
            evidence: vec![],
            ikigai: vec![],
            choices: None,
        },
        None,
    )
}

/// Accept one connection, read the request, write a canned response.
async fn serve_once(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut sock, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            let _ = sock.write_all(response.as_bytes()).await;
            let _ = sock.shutdown().await;
        }
    });
    addr
}

/// Accept one connection and never answer.
async fn serve_hung() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((_sock, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(10)).await;
        }
    });
    addr
}

/// An address with nothing listening behind it.
async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[tokio::test]
async fn test_health_ok() {
    let addr = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
    assert_eq!(client_for(addr).health().await, HealthStatus::Ok);
}

#[tokio::test]
async fn test_health_http_error_is_distinct() {
    let addr = serve_once(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert_eq!(client_for(addr).health().await, HealthStatus::HttpError(500));
}

#[tokio::test]
async fn test_health_connection_refused_is_unreachable() {
    let addr = refused_addr().await;
    assert_eq!(client_for(addr).health().await, HealthStatus::Unreachable);
}

#[tokio::test]
async fn test_health_hung_connection_is_timeout() {
    let addr = serve_hung().await;
    assert_eq!(client_for(addr).health().await, HealthStatus::Timeout);
}

#[tokio::test]
async fn test_render_returns_body_bytes() {
    let addr = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\nContent-Length: 8\r\nConnection: close\r\n\r\n%PDF-1.7",
    )
    .await;
    let pdf = client_for(addr).render(&empty_payload()).await.unwrap();
    assert_eq!(pdf, b"%PDF-1.7");
}

#[tokio::test]
async fn test_render_non_2xx_is_http_error_with_body() {
    let addr = serve_once(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 13\r\nConnection: close\r\n\r\nRender failed",
    )
    .await;
    match client_for(addr).render(&empty_payload()).await {
        Err(RenderError::Http { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Render failed");
        }
        other => panic!("expected Http error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_render_refused_is_offline() {
    let addr = refused_addr().await;
    match client_for(addr).render(&empty_payload()).await {
        Err(RenderError::Offline(reason)) => assert!(!reason.is_empty()),
        other => panic!("expected Offline, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_render_hung_is_timeout() {
    let addr = serve_hung().await;
    match client_for(addr).render(&empty_payload()).await {
        Err(RenderError::Timeout) => {}
        other => panic!("expected Timeout, got {:?}", other.map(|_| ())),
    }
}
