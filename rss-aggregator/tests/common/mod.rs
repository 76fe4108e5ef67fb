//! Fixture HTTP server and feed documents shared by the collector tests.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Once;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

/// Serve fixed `(status, body)` pairs by path on a loopback port.
///
/// Returns the base URL, e.g. `http://127.0.0.1:40123`.
pub async fn serve(routes: Vec<(&'static str, u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes: HashMap<&'static str, (u16, String)> = routes
        .into_iter()
        .map(|(path, status, body)| (path, (status, body)))
        .collect();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let request = String::from_utf8_lossy(&request);
            let mut parts = request.split_whitespace();
            let method = parts.next().unwrap_or("GET").to_string();
            let path = parts.next().unwrap_or("/").to_string();
            let (status, body) = routes
                .get(path.as_str())
                .cloned()
                .unwrap_or((404, String::new()));

            let mut response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/rss+xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            if method != "HEAD" {
                response.push_str(&body);
            }
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", addr)
}

pub struct Item<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub description: &'a str,
    pub published: Option<DateTime<Utc>>,
}

pub fn rss(items: &[Item<'_>]) -> String {
    let body: String = items
        .iter()
        .map(|item| {
            let date = item
                .published
                .map(|d| format!("<pubDate>{}</pubDate>", d.to_rfc2822()))
                .unwrap_or_default();
            format!(
                "<item><title>{}</title><link>{}</link><guid>{}</guid><description>{}</description>{}</item>",
                item.title, item.link, item.link, item.description, date
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>Fixture</title><link>https://example.org/</link><description>Fixture feed</description>{}</channel></rss>"#,
        body
    )
}
