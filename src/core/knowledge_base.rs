//! Static, read-only catalogue of the scoring checks.
//!
//! Point values are data, not branching logic: every check carries one
//! `CheckWeights` row here and the evaluator in `scanner::checks` picks the
//! pass/partial/fail column for the outcome it observed. Keeping the table
//! in one place means the scoring arithmetic exists exactly once.

use crate::core::models::CheckName;

/// Point columns for one check: the maximum it contributes to the run, and
/// the credit granted for each outcome.
#[derive(Debug, Clone, Copy)]
pub struct CheckWeights {
    pub max: u32,
    pub pass: u32,
    pub partial: u32,
    pub fail: u32,
}

/// Everything fixed about a catalogue check: its identity, the CWE tag baked
/// into its finding code, its weights, and the summary shown when it passes
/// cleanly.
pub struct CheckProfile {
    pub name: CheckName,
    pub cwe: &'static str,
    pub weights: CheckWeights,
    pub clean_summary: &'static str,
}

/// Finding code attached to the sentinel emitted on failed runs.
pub const ERROR_SENTINEL_CODE: &str = "[ERR-001] SCAN_TIMEOUT";

/// CWE tag used for codes outside the catalogue. First-party checks must
/// never hit this.
const FALLBACK_CWE: &str = "CWE-000";

/// The catalogue, in check-execution order. The maxima sum to 100.
static CATALOGUE: &[CheckProfile] = &[
    CheckProfile {
        name: CheckName::XssProtection,
        cwe: "CWE-79",
        weights: CheckWeights { max: 15, pass: 15, partial: 8, fail: 0 },
        clean_summary: "Content-Security-Policy header present",
    },
    CheckProfile {
        name: CheckName::Clickjacking,
        cwe: "CWE-1021",
        weights: CheckWeights { max: 15, pass: 15, partial: 8, fail: 0 },
        clean_summary: "Frame embedding protection enabled",
    },
    CheckProfile {
        name: CheckName::TransportSecurity,
        cwe: "CWE-319",
        weights: CheckWeights { max: 15, pass: 15, partial: 8, fail: 0 },
        clean_summary: "HSTS header enforces secure connections",
    },
    CheckProfile {
        name: CheckName::MimeSniffing,
        cwe: "CWE-16",
        weights: CheckWeights { max: 10, pass: 10, partial: 5, fail: 0 },
        clean_summary: "X-Content-Type-Options: nosniff enabled",
    },
    CheckProfile {
        name: CheckName::ServerDisclosure,
        cwe: "CWE-200",
        weights: CheckWeights { max: 5, pass: 5, partial: 3, fail: 0 },
        clean_summary: "Server banner not disclosed",
    },
    CheckProfile {
        name: CheckName::FrameworkExposure,
        cwe: "CWE-200",
        weights: CheckWeights { max: 5, pass: 5, partial: 3, fail: 0 },
        clean_summary: "No framework fingerprint in headers",
    },
    CheckProfile {
        name: CheckName::ReferrerPolicy,
        cwe: "CWE-200",
        weights: CheckWeights { max: 10, pass: 10, partial: 5, fail: 0 },
        clean_summary: "Referrer-Policy: strict-origin-when-cross-origin",
    },
    CheckProfile {
        name: CheckName::PermissionsPolicy,
        cwe: "CWE-16",
        weights: CheckWeights { max: 10, pass: 10, partial: 5, fail: 0 },
        clean_summary: "Permissions-Policy header present",
    },
    CheckProfile {
        name: CheckName::SecurityTxt,
        cwe: "CWE-1059",
        weights: CheckWeights { max: 10, pass: 10, partial: 5, fail: 0 },
        clean_summary: "security.txt file present",
    },
    CheckProfile {
        name: CheckName::RobotsTxt,
        cwe: "CWE-538",
        weights: CheckWeights { max: 5, pass: 5, partial: 3, fail: 0 },
        clean_summary: "robots.txt present and clean",
    },
];

/// The full catalogue in execution order.
pub fn catalogue() -> &'static [CheckProfile] {
    CATALOGUE
}

/// Looks up the profile for a catalogue check.
pub fn profile(name: CheckName) -> Option<&'static CheckProfile> {
    CATALOGUE.iter().find(|p| p.name == name)
}

/// Scoring weights for a catalogue check. The sentinel has no weights; its
/// finding is built directly by the error-report constructor.
pub fn weights(name: CheckName) -> Option<CheckWeights> {
    profile(name).map(|p| p.weights)
}

/// CWE tag for a check code, with the documented placeholder fallback.
pub fn cwe_tag(name: CheckName) -> &'static str {
    profile(name).map(|p| p.cwe).unwrap_or(FALLBACK_CWE)
}
