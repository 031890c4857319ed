// src/core/scanner/mod.rs

pub mod checks;
pub mod classifier;
pub mod probe_client;

use std::time::Instant;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::{Position, Url};
use uuid::Uuid;

use crate::core::models::{AuditRecord, LightAuditResult};
use crate::core::slug::generate_slug;
use crate::store::{ReportStore, StoreError};
use self::checks::CheckContext;

/// Internal failure kinds. These stay distinct for logs only: every one of
/// them externalizes as the single sentinel error report, so callers never
/// learn (or depend on) which step gave out.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("target URL failed to parse: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("primary fetch failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("report could not be persisted: {0}")]
    Store(#[from] StoreError),
}

/// Prepends `https://` when the raw input carries no HTTP scheme.
pub fn normalize_url(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

/// Runs one complete light audit against `url` and persists the outcome.
///
/// This entry point never fails: malformed input, network trouble, and
/// internal faults all come back as a well-formed error report carrying the
/// `SCAN_TIMEOUT` sentinel. There are no retries; a failed or timed-out
/// primary fetch is final for the invocation.
pub async fn run_light_audit(url: &str, store: &dyn ReportStore) -> LightAuditResult {
    let started = Instant::now();
    let target = normalize_url(url);
    let slug = generate_slug(&target);
    info!(target = %target, slug = %slug, "Starting light audit.");

    match execute_audit(&target, &slug, started, store).await {
        Ok(report) => {
            info!(
                status = %report.status,
                score = report.total_score,
                duration_ms = report.scan_duration,
                "Light audit finished."
            );
            report
        }
        Err(e) => {
            warn!(target = %target, error = %e, "Light audit failed; emitting error report.");
            let report = LightAuditResult::error(slug, elapsed_ms(started));
            // Error reports are persisted too so the slug stays routable.
            // Best effort: a store that is itself broken cannot be helped.
            if let Err(store_err) = store.save(&build_record(&report, &target)) {
                error!(error = %store_err, "Failed to persist error report.");
            }
            report
        }
    }
}

/// The fallible pipeline behind [`run_light_audit`]: validate, probe,
/// classify, score, persist.
async fn execute_audit(
    target: &str,
    slug: &str,
    started: Instant,
    store: &dyn ReportStore,
) -> Result<LightAuditResult, AuditError> {
    let parsed = Url::parse(target)?;
    let client = probe_client::build_client()?;

    let page = probe_client::fetch_page(&client, target).await?;

    // scheme://host[:port], the root both well-known probes hang off.
    let base_url = parsed[..Position::BeforePath].to_string();
    let (security_txt, robots_txt) = tokio::join!(
        probe_client::check_security_txt(&client, &base_url),
        probe_client::check_robots_txt(&client, &base_url),
    );

    let site_type = classifier::detect_site_type(&page.body);
    let industry_category = classifier::detect_industry(target, &page.body);
    debug!(%site_type, %industry_category, "Classified target.");

    let ctx = CheckContext {
        headers: &page.headers,
        site_type,
        https: target.starts_with("https"),
        security_txt,
        robots_txt,
    };
    let card = checks::run_checks(&ctx);
    let total_score = checks::apply_industry_penalty(card.total_score, industry_category, &page.headers);
    let status = checks::derive_status(&card.checks);
    let score_percentage = checks::score_percentage(total_score, card.max_score);

    let report = LightAuditResult {
        status,
        slug: slug.to_string(),
        vulnerabilities: card.checks,
        scan_duration: elapsed_ms(started),
        site_type,
        industry_category,
        total_score,
        max_score: card.max_score,
        score_percentage,
    };

    store.save(&build_record(&report, target))?;
    Ok(report)
}

fn build_record(report: &LightAuditResult, target: &str) -> AuditRecord {
    AuditRecord {
        id: Uuid::new_v4().to_string(),
        target_url: target.to_string(),
        completed_at: Utc::now(),
        result: report.clone(),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
