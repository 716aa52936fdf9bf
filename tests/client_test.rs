//! Tests for the shared Client and its cookie jar.

use cookiesource::client::Client;
use cookiesource::cookies::store::CookieStore;
use cookiesource::upstream::{AppContext, DataSource, DataSourceFactory, DataSpec, DelegateKind};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

/// Login sets cookies (one on a redirect hop), /echo returns the Cookie
/// header it received.
async fn spawn_server() -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    tokio::spawn(async move {
        loop {
            if let Ok((mut socket, _)) = listener.accept().await {
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    recorded.lock().unwrap().push(request.clone());

                    let response = if request.starts_with("GET /login") {
                        "HTTP/1.1 302 Found\r\nSet-Cookie: hop=1; Path=/\r\nLocation: /home\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string()
                    } else if request.starts_with("GET /home") {
                        "HTTP/1.1 200 OK\r\nSet-Cookie: sid=abc; Path=/; HttpOnly\r\nContent-Length: 4\r\nConnection: close\r\n\r\nhome".to_string()
                    } else {
                        let cookie = request
                            .lines()
                            .find_map(|l| {
                                l.strip_prefix("cookie: ")
                                    .or_else(|| l.strip_prefix("Cookie: "))
                            })
                            .unwrap_or("")
                            .to_string();
                        format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            cookie.len(),
                            cookie
                        )
                    };
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        }
    });

    (base_url, requests)
}

#[tokio::test]
async fn test_get_stores_cookies_across_redirects() {
    let (base, requests) = spawn_server().await;
    let client = Client::builder().user_agent("Player/1.0").build();

    let response = client.get(format!("{}/login", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.url().path(), "/home");
    assert_eq!(response.text().await.unwrap(), "home");

    assert_eq!(client.cookie_monster().total_cookie_count(), 2);
    let requests = requests.lock().unwrap();
    // The cookie set on the redirect went out on the next hop.
    assert!(requests[1].to_lowercase().contains("cookie: hop=1"));
}

#[tokio::test]
async fn test_get_sends_jar_cookies() {
    let (base, _requests) = spawn_server().await;
    let client = Client::new();
    client.get(format!("{}/login", base)).await.unwrap();

    let echoed = client
        .get(format!("{}/echo", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(echoed, "hop=1; sid=abc");
}

#[tokio::test]
async fn test_data_source_factory_uses_client_cookies() {
    let (base, _requests) = spawn_server().await;
    let client = Client::builder()
        .user_agent("Player/1.0")
        .read_timeout(Duration::from_secs(2))
        .build();
    client.get(format!("{}/login", base)).await.unwrap();

    let media = format!("{}/echo.m3u8", base);
    let factory = client
        .data_source_factory(&media, &AppContext::new("/app/assets"))
        .unwrap();
    assert_eq!(factory.delegate_kind(), DelegateKind::Http);

    let mut source = factory.create_data_source().unwrap();
    assert_eq!(
        source.as_http().unwrap().request_property("Cookie"),
        Some("hop=1; sid=abc; ")
    );

    source
        .open(&DataSpec::new(Url::parse(&media).unwrap()))
        .await
        .unwrap();
    let body = cookiesource::upstream::datasource::read_to_end(source.as_mut())
        .await
        .unwrap();
    assert_eq!(body, b"hop=1; sid=abc; ");
}

#[tokio::test]
async fn test_cookie_store_view_shares_jar() {
    let client = Client::new();
    let store = client.cookie_store();
    let url = Url::parse("https://example.com/").unwrap();

    assert!(store.load_for_request(&url).unwrap().is_empty());
    client
        .cookie_monster()
        .parse_and_save_cookie(&url, "sid=abc")
        .unwrap();
    assert_eq!(store.load_for_request(&url).unwrap().len(), 1);
}
