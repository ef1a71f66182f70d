use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

use webprobe::{
    FetchError, FindingKind, HttpClient, InfoType, PageFetcher, ScanConfig, ScanContext,
    ScanControl, ScanTarget,
};

struct Reply {
    status: &'static str,
    headers: Vec<String>,
    body: String,
}

impl Reply {
    fn html(body: impl Into<String>) -> Self {
        Self {
            status: "200 OK",
            headers: vec!["Content-Type: text/html".to_string()],
            body: body.into(),
        }
    }
}

type Handler = fn(&Url, &str) -> Reply;

async fn serve(handler: Handler) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(handle(stream, handler));
        }
    });

    addr
}

async fn handle(mut stream: TcpStream, handler: Handler) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let request = String::from_utf8_lossy(&buf).to_string();
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    let url = Url::parse(&format!("http://local{}", target)).unwrap();

    let reply = handler(&url, &request);
    let mut response = format!("HTTP/1.1 {}\r\n", reply.status);
    for header in &reply.headers {
        response.push_str(header);
        response.push_str("\r\n");
    }
    response.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.body.len(),
        reply.body
    ));
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn param(url: &Url, name: &str) -> String {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

fn vulnerable_site(url: &Url, _request: &str) -> Reply {
    match url.path() {
        "/" => Reply::html(
            r#"<html><body>
                <a href="/search?q=test">search</a>
                <a href="/product?id=1">product</a>
                <a href="/contact#team">contact</a>
                <a href="http://other.example/">elsewhere</a>
            </body></html>"#,
        ),
        "/search" => Reply::html(format!("<h1>Results for {}</h1>", param(url, "q"))),
        "/product" => {
            if param(url, "id").contains('\'') {
                Reply::html("Warning: mysql_fetch_array() expects parameter 1 to be resource")
            } else {
                Reply::html("<p>Widget</p>")
            }
        }
        "/contact" => Reply::html("Reach alice@example.com or bob@example.com"),
        _ => Reply {
            status: "404 Not Found",
            headers: Vec::new(),
            body: "missing".to_string(),
        },
    }
}

fn context_for(addr: SocketAddr, depth: usize) -> ScanContext {
    let target = ScanTarget::new(format!("http://{}/", addr), depth).unwrap();
    let config = ScanConfig::new(target).with_timeout(5).with_concurrency(4);
    ScanContext::new(&config).unwrap()
}

#[tokio::test]
async fn test_full_scan_against_local_site() {
    let addr = serve(vulnerable_site).await;
    let context = context_for(addr, 2);

    let report = context.run(false).await;

    let visited: Vec<String> = report.pages.iter().map(|p| p.normalized.clone()).collect();
    assert_eq!(
        visited,
        vec![
            format!("http://{}/", addr),
            format!("http://{}/search", addr),
            format!("http://{}/product", addr),
            format!("http://{}/contact", addr),
        ]
    );

    let count = |kind: FindingKind| report.findings.iter().filter(|f| f.kind == kind).count();
    assert_eq!(count(FindingKind::SqlInjection), 4);
    assert_eq!(count(FindingKind::Xss), 3);
    assert_eq!(count(FindingKind::SensitiveInfo), 2);

    assert!(report
        .findings
        .iter()
        .filter(|f| f.kind == FindingKind::Xss)
        .all(|f| f.parameter() == Some("q")));
    assert!(report
        .findings
        .iter()
        .filter(|f| f.kind == FindingKind::SensitiveInfo)
        .all(|f| f.info_type == Some(InfoType::Email)));
}

#[tokio::test]
async fn test_depth_zero_scans_seed_only() {
    let addr = serve(vulnerable_site).await;
    let context = context_for(addr, 0);

    let report = context.run(false).await;

    assert_eq!(report.pages.len(), 1);
    assert!(report.findings.is_empty());
}

fn cookie_site(url: &Url, request: &str) -> Reply {
    match url.path() {
        "/login" => Reply {
            status: "200 OK",
            headers: vec!["Set-Cookie: sid=s3cr3t; Path=/".to_string()],
            body: "ok".to_string(),
        },
        _ => {
            let cookie = request
                .lines()
                .find(|l| l.to_ascii_lowercase().starts_with("cookie:"))
                .unwrap_or("cookie: none")
                .to_string();
            Reply::html(cookie)
        }
    }
}

#[tokio::test]
async fn test_client_keeps_cookies_across_requests() {
    let addr = serve(cookie_site).await;
    let client = HttpClient::new(5, "webprobe-test").unwrap();
    let control = ScanControl::new();

    client
        .fetch(&format!("http://{}/login", addr), &control)
        .await
        .unwrap();
    let page = client
        .fetch(&format!("http://{}/whoami", addr), &control)
        .await
        .unwrap();

    assert_eq!(page.status, 200);
    assert!(page.body.contains("sid=s3cr3t"));
}

#[tokio::test]
async fn test_connection_refused_is_a_fetch_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new(2, "webprobe-test").unwrap();
    let result = client
        .fetch(&format!("http://{}/", addr), &ScanControl::new())
        .await;

    assert!(matches!(result, Err(FetchError::Request { .. })));
}

#[tokio::test]
async fn test_cancel_aborts_hung_request() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accepts and then never answers.
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let client = HttpClient::new(30, "webprobe-test").unwrap();
    let control = Arc::new(ScanControl::new());
    let canceller = Arc::clone(&control);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client.fetch(&format!("http://{}/", addr), &control),
    )
    .await
    .expect("cancel should end the request");

    assert!(matches!(result, Err(FetchError::Cancelled(_))));
}
