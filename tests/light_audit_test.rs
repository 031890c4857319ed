//! End-to-end audits against a throwaway local HTTP responder.
//!
//! Each test binds a listener on a random loopback port, serves canned
//! responses per path, and drives the engine through its public entry point.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use lantern_rs_auditor::core::knowledge_base;
use lantern_rs_auditor::core::models::{
    AuditStatus, CheckName, IndustryCategory, Severity, SiteType,
};
use lantern_rs_auditor::run_light_audit;
use lantern_rs_auditor::store::{MemoryStore, ReportStore};

enum Route {
    Respond(String),
    /// Accept the connection, then go quiet past the auxiliary timeout.
    Stall,
}

fn http_response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut response = format!("HTTP/1.1 {status}\r\n");
    for (name, value) in headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str(&format!(
        "content-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    ));
    response
}

fn ok(headers: &[(&str, &str)], body: &str) -> Route {
    Route::Respond(http_response("200 OK", headers, body))
}

fn not_found() -> String {
    http_response("404 Not Found", &[], "not here")
}

async fn serve(routes: Vec<(&'static str, Route)>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect(),
    );
    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let routes = Arc::clone(&routes);
            tokio::spawn(handle(socket, routes));
        }
    });
    addr
}

async fn handle(mut socket: TcpStream, routes: Arc<HashMap<String, Route>>) {
    let mut buf = vec![0u8; 4096];
    let n = socket.read(&mut buf).await.unwrap_or(0);
    if n == 0 {
        return;
    }
    let request = String::from_utf8_lossy(&buf[..n]).to_string();
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    match routes.get(&path) {
        Some(Route::Respond(payload)) => {
            let _ = socket.write_all(payload.as_bytes()).await;
        }
        Some(Route::Stall) => {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        None => {
            let _ = socket.write_all(not_found().as_bytes()).await;
        }
    }
    let _ = socket.shutdown().await;
}

fn catalogue_order() -> Vec<CheckName> {
    knowledge_base::catalogue().iter().map(|p| p.name).collect()
}

#[tokio::test]
async fn hardened_target_comes_back_clean_at_one_hundred() {
    let addr = serve(vec![
        (
            "/",
            ok(
                &[
                    ("content-security-policy", "default-src 'self'"),
                    ("strict-transport-security", "max-age=63072000"),
                    ("x-frame-options", "DENY"),
                    ("x-content-type-options", "nosniff"),
                    ("referrer-policy", "no-referrer"),
                ],
                "<html><body><h1>Welcome</h1></body></html>",
            ),
        ),
        (
            "/.well-known/security.txt",
            ok(&[], "Contact: mailto:security@example.com\n"),
        ),
        ("/robots.txt", ok(&[], "User-agent: *\nDisallow:\n")),
    ])
    .await;

    let store = MemoryStore::new();
    let report = run_light_audit(&format!("http://{addr}"), &store).await;

    assert_eq!(report.status, AuditStatus::Clean);
    assert_eq!(report.total_score, 100);
    assert_eq!(report.max_score, 100);
    assert_eq!(report.score_percentage, 100);
    assert_eq!(report.site_type, SiteType::Static);
    assert_eq!(report.industry_category, IndustryCategory::Marketing);
    let names: Vec<CheckName> = report.vulnerabilities.iter().map(|c| c.name).collect();
    assert_eq!(names, catalogue_order());
    assert!(report
        .vulnerabilities
        .iter()
        .all(|c| c.severity == Severity::Info));
}

#[tokio::test]
async fn bare_static_site_collects_partial_credit() {
    let addr = serve(vec![(
        "/",
        ok(&[], "<html><body><h1>Hello there</h1></body></html>"),
    )])
    .await;

    let store = MemoryStore::new();
    let report = run_light_audit(&format!("http://{addr}"), &store).await;

    assert_eq!(report.status, AuditStatus::Vulnerable);
    assert_eq!(report.site_type, SiteType::Static);
    let points: Vec<u32> = report.vulnerabilities.iter().map(|c| c.points).collect();
    // Static exemptions on the first two rules, full credit on the
    // informational rules, misses everywhere else.
    assert_eq!(points, vec![8, 8, 0, 0, 5, 5, 0, 10, 5, 3]);
    assert_eq!(report.total_score, 44);
    assert_eq!(report.score_percentage, 44);
}

#[tokio::test]
async fn fintech_target_missing_critical_headers_is_discounted() {
    let addr = serve(vec![(
        "/",
        ok(
            &[],
            "<html><body><p>Secure payment processing</p></body></html>",
        ),
    )])
    .await;

    let store = MemoryStore::new();
    let report = run_light_audit(&format!("http://{addr}"), &store).await;

    assert_eq!(report.industry_category, IndustryCategory::Fintech);
    // Undiscounted total is 44; floor(44 * 0.9) = 39. max_score stays 100.
    assert_eq!(report.total_score, 39);
    assert_eq!(report.max_score, 100);
    assert_eq!(report.score_percentage, 39);
}

#[tokio::test]
async fn robots_exposing_sensitive_paths_zeroes_the_check() {
    let addr = serve(vec![
        ("/", ok(&[], "<html><body><h1>Hi</h1></body></html>")),
        ("/robots.txt", ok(&[], "User-agent: *\nDisallow: /admin\n")),
    ])
    .await;

    let store = MemoryStore::new();
    let report = run_light_audit(&format!("http://{addr}"), &store).await;

    let robots = report.vulnerabilities.last().unwrap();
    assert_eq!(robots.name, CheckName::RobotsTxt);
    assert_eq!(robots.points, 0);
    assert_eq!(robots.severity, Severity::Warning);
    assert_eq!(report.status, AuditStatus::Vulnerable);
}

#[tokio::test]
async fn stalled_robots_probe_degrades_to_missing() {
    let addr = serve(vec![
        ("/", ok(&[], "<html><body><h1>Hi</h1></body></html>")),
        ("/robots.txt", Route::Stall),
    ])
    .await;

    let store = MemoryStore::new();
    let started = std::time::Instant::now();
    let report = run_light_audit(&format!("http://{addr}"), &store).await;

    // The 3 s auxiliary timeout fires and the check falls back to the
    // "no robots.txt" partial credit; the audit itself still completes.
    let robots = report.vulnerabilities.last().unwrap();
    assert_eq!(robots.name, CheckName::RobotsTxt);
    assert_eq!(robots.points, 3);
    assert_eq!(robots.severity, Severity::Info);
    assert_ne!(report.status, AuditStatus::Error);
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn malformed_input_yields_the_sentinel_error_report() {
    let store = MemoryStore::new();
    let report = run_light_audit("not a url!!", &store).await;

    assert_eq!(report.status, AuditStatus::Error);
    assert_eq!(report.vulnerabilities.len(), 1);
    assert_eq!(report.vulnerabilities[0].name, CheckName::ScanTimeout);
    assert_eq!(report.vulnerabilities[0].code, "[ERR-001] SCAN_TIMEOUT");
    assert_eq!((report.total_score, report.max_score), (0, 100));
    assert_eq!(report.score_percentage, 0);
    assert_eq!(report.site_type, SiteType::Unknown);
    assert_eq!(report.industry_category, IndustryCategory::Unknown);
    assert!(report.slug.starts_with("audit-"));
}

#[tokio::test]
async fn unreachable_target_yields_the_sentinel_error_report() {
    // Bind and immediately drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = MemoryStore::new();
    let report = run_light_audit(&format!("http://{addr}"), &store).await;

    assert_eq!(report.status, AuditStatus::Error);
    assert_eq!(report.vulnerabilities[0].name, CheckName::ScanTimeout);
    // The error report is persisted too, so the slug stays routable.
    let record = store.get_by_slug(&report.slug).unwrap().unwrap();
    assert_eq!(record.result.status, AuditStatus::Error);
    assert_eq!(record.target_url, format!("http://{addr}"));
}

#[tokio::test]
async fn successful_audit_is_persisted_under_its_slug() {
    let addr = serve(vec![(
        "/",
        ok(&[], "<html><body><h1>Hi</h1></body></html>"),
    )])
    .await;

    let store = MemoryStore::new();
    let target = format!("http://{addr}");
    let report = run_light_audit(&target, &store).await;

    let record = store.get_by_slug(&report.slug).unwrap().unwrap();
    assert_eq!(record.result, report);
    assert_eq!(record.target_url, target);
    // UUIDv4 text form.
    assert_eq!(record.id.len(), 36);
    assert!(report.slug.starts_with("127-0-0-1-"));
}
