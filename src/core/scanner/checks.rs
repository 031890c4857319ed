// src/core/scanner/checks.rs
//
// The ten catalogue rules. Each rule is a pure predicate over already
// fetched state that names its outcome; point values come exclusively from
// the knowledge-base weight table, so the scoring arithmetic lives in one
// evaluator below.

use std::collections::HashMap;

use tracing::debug;

use crate::core::knowledge_base;
use crate::core::models::{AuditStatus, CheckName, IndustryCategory, SecurityCheck, Severity, SiteType};
use crate::core::scanner::probe_client::{RobotsTxtProbe, SecurityTxtProbe};

/// Everything a rule may consult: normalized response headers, the
/// classification of the page, the request scheme, and both auxiliary
/// probe results.
pub struct CheckContext<'a> {
    pub headers: &'a HashMap<String, String>,
    pub site_type: SiteType,
    pub https: bool,
    pub security_txt: SecurityTxtProbe,
    pub robots_txt: RobotsTxtProbe,
}

impl CheckContext<'_> {
    fn has(&self, header: &str) -> bool {
        self.headers.contains_key(header)
    }
}

/// Which weight column a rule earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Pass,
    Partial,
    Fail,
}

/// A rule's judgment, before the weight table turns it into points.
struct Verdict {
    outcome: Outcome,
    severity: Severity,
    description: String,
}

impl Verdict {
    fn new(outcome: Outcome, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            outcome,
            severity,
            description: description.into(),
        }
    }
}

type CheckFn = fn(&CheckContext) -> Verdict;

/// The rules in execution order. Order is a report contract: the
/// vulnerabilities array lists findings exactly in this sequence.
static CHECK_SEQUENCE: &[(CheckName, CheckFn)] = &[
    (CheckName::XssProtection, xss_protection),
    (CheckName::Clickjacking, clickjacking),
    (CheckName::TransportSecurity, transport_security),
    (CheckName::MimeSniffing, mime_sniffing),
    (CheckName::ServerDisclosure, server_disclosure),
    (CheckName::FrameworkExposure, framework_exposure),
    (CheckName::ReferrerPolicy, referrer_policy),
    (CheckName::PermissionsPolicy, permissions_policy),
    (CheckName::SecurityTxt, security_txt),
    (CheckName::RobotsTxt, robots_txt),
];

fn xss_protection(ctx: &CheckContext) -> Verdict {
    if ctx.has("content-security-policy") {
        Verdict::new(Outcome::Pass, Severity::Info, "Content-Security-Policy header present")
    } else if ctx.has("x-xss-protection") {
        Verdict::new(
            Outcome::Partial,
            Severity::Info,
            "Legacy X-XSS-Protection present (CSP recommended)",
        )
    } else if ctx.site_type == SiteType::Static {
        Verdict::new(Outcome::Partial, Severity::Info, "No CSP (acceptable for static site)")
    } else {
        Verdict::new(Outcome::Fail, Severity::Warning, "No Content-Security-Policy header")
    }
}

fn clickjacking(ctx: &CheckContext) -> Verdict {
    let frame_ancestors = ctx
        .headers
        .get("content-security-policy")
        .is_some_and(|v| v.contains("frame-ancestors"));
    if ctx.has("x-frame-options") || frame_ancestors {
        Verdict::new(Outcome::Pass, Severity::Info, "Frame embedding protection enabled")
    } else if matches!(ctx.site_type, SiteType::Static | SiteType::Api) {
        Verdict::new(
            Outcome::Partial,
            Severity::Info,
            format!("No frame protection (acceptable for {} site)", ctx.site_type),
        )
    } else {
        Verdict::new(
            Outcome::Fail,
            Severity::Warning,
            "Missing X-Frame-Options or frame-ancestors",
        )
    }
}

fn transport_security(ctx: &CheckContext) -> Verdict {
    if ctx.has("strict-transport-security") {
        Verdict::new(Outcome::Pass, Severity::Info, "HSTS header enforces secure connections")
    } else if ctx.https {
        Verdict::new(Outcome::Partial, Severity::Warning, "HTTPS present but no HSTS header")
    } else {
        Verdict::new(Outcome::Fail, Severity::Warning, "No HTTPS detected")
    }
}

fn mime_sniffing(ctx: &CheckContext) -> Verdict {
    let nosniff = ctx
        .headers
        .get("x-content-type-options")
        .is_some_and(|v| v.contains("nosniff"));
    if nosniff {
        Verdict::new(Outcome::Pass, Severity::Info, "X-Content-Type-Options: nosniff enabled")
    } else {
        Verdict::new(
            Outcome::Fail,
            Severity::Warning,
            "MIME type sniffing protection not enabled",
        )
    }
}

// Informational: full credit either way, the description just records what
// the server volunteered.
fn server_disclosure(ctx: &CheckContext) -> Verdict {
    match ctx.headers.get("server") {
        None => Verdict::new(Outcome::Pass, Severity::Info, "Server banner not disclosed"),
        Some(value) => Verdict::new(
            Outcome::Pass,
            Severity::Info,
            format!("Server: {value} (informational)"),
        ),
    }
}

fn framework_exposure(ctx: &CheckContext) -> Verdict {
    match ctx.headers.get("x-powered-by") {
        None => Verdict::new(Outcome::Pass, Severity::Info, "No framework fingerprint in headers"),
        Some(value) => Verdict::new(
            Outcome::Pass,
            Severity::Info,
            format!("Framework: {value} (informational)"),
        ),
    }
}

fn referrer_policy(ctx: &CheckContext) -> Verdict {
    match ctx.headers.get("referrer-policy") {
        Some(value) => Verdict::new(Outcome::Pass, Severity::Info, format!("Referrer-Policy: {value}")),
        None => Verdict::new(Outcome::Fail, Severity::Warning, "No Referrer-Policy header"),
    }
}

fn permissions_policy(ctx: &CheckContext) -> Verdict {
    if ctx.has("permissions-policy") || ctx.has("feature-policy") {
        Verdict::new(Outcome::Pass, Severity::Info, "Permissions-Policy header present")
    } else {
        // Optional header: absence still earns full credit.
        Verdict::new(Outcome::Pass, Severity::Info, "No Permissions-Policy header (optional)")
    }
}

fn security_txt(ctx: &CheckContext) -> Verdict {
    if ctx.security_txt.exists {
        Verdict::new(Outcome::Pass, Severity::Info, "security.txt file present")
    } else {
        Verdict::new(Outcome::Partial, Severity::Info, "No security.txt file (recommended)")
    }
}

fn robots_txt(ctx: &CheckContext) -> Verdict {
    if ctx.robots_txt.exists && !ctx.robots_txt.exposes_sensitive {
        Verdict::new(Outcome::Pass, Severity::Info, "robots.txt present and clean")
    } else if ctx.robots_txt.exposes_sensitive {
        Verdict::new(
            Outcome::Fail,
            Severity::Warning,
            "robots.txt may expose sensitive paths",
        )
    } else {
        Verdict::new(Outcome::Partial, Severity::Info, "No robots.txt file")
    }
}

/// Findings plus running score, before the industry adjustment.
pub struct ScoreCard {
    pub checks: Vec<SecurityCheck>,
    pub total_score: u32,
    pub max_score: u32,
}

/// Runs every catalogue rule in sequence. Each rule contributes exactly one
/// finding and its maximum to the running max regardless of outcome.
pub fn run_checks(ctx: &CheckContext) -> ScoreCard {
    let mut checks = Vec::with_capacity(CHECK_SEQUENCE.len());
    let mut total_score = 0;
    let mut max_score = 0;

    for (name, rule) in CHECK_SEQUENCE {
        // Every sequenced check has a catalogue row; the alignment test below
        // keeps the two tables honest.
        let Some(weights) = knowledge_base::weights(*name) else {
            continue;
        };
        let verdict = rule(ctx);
        let points = match verdict.outcome {
            Outcome::Pass => weights.pass,
            Outcome::Partial => weights.partial,
            Outcome::Fail => weights.fail,
        };
        debug!(check = %name, outcome = ?verdict.outcome, points, "Check evaluated.");
        checks.push(SecurityCheck::new(
            *name,
            verdict.severity,
            verdict.description,
            points,
            weights.max,
        ));
        total_score += points;
        max_score += weights.max;
    }

    ScoreCard {
        checks,
        total_score,
        max_score,
    }
}

/// Fintech targets missing any of the three critical headers lose 10% of the
/// summed total (floored). Applied once, after summation; `max_score` is
/// deliberately left untouched.
pub fn apply_industry_penalty(
    total_score: u32,
    industry: IndustryCategory,
    headers: &HashMap<String, String>,
) -> u32 {
    if industry != IndustryCategory::Fintech {
        return total_score;
    }
    let critical_headers = headers.contains_key("content-security-policy")
        && headers.contains_key("strict-transport-security")
        && headers.contains_key("x-frame-options");
    if critical_headers {
        total_score
    } else {
        debug!("Fintech target missing critical headers; applying 0.9 multiplier.");
        total_score * 9 / 10
    }
}

/// Percentage of the evaluated maximum, rounded half away from zero.
pub fn score_percentage(total_score: u32, max_score: u32) -> u32 {
    if max_score == 0 {
        return 0;
    }
    ((total_score as f64 / max_score as f64) * 100.0).round() as u32
}

/// Vulnerable on any critical or warning finding, clean otherwise.
pub fn derive_status(checks: &[SecurityCheck]) -> AuditStatus {
    let flagged = checks
        .iter()
        .any(|c| matches!(c.severity, Severity::Critical | Severity::Warning));
    if flagged {
        AuditStatus::Vulnerable
    } else {
        AuditStatus::Clean
    }
}
