// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::knowledge_base;

// --- Enumerations ---

/// Severity level attached to a single finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

/// Terminal outcome of one audit run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuditStatus {
    Clean,
    Vulnerable,
    Error,
}

/// Coarse classification of the fetched page.
///
/// `Api` and `Unknown` are valid report values the success-path classifier
/// never emits: `Api` only participates in the clickjacking exemption rule
/// and `Unknown` is reserved for error reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SiteType {
    Spa,
    Static,
    Dynamic,
    Api,
    Unknown,
}

/// Industry guess used to tighten scoring for the fintech case.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IndustryCategory {
    Fintech,
    Ecommerce,
    Saas,
    Marketing,
    Unknown,
}

/// Identifier of a catalogue check, plus the sentinel emitted on failed runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckName {
    XssProtection,
    Clickjacking,
    TransportSecurity,
    MimeSniffing,
    ServerDisclosure,
    FrameworkExposure,
    ReferrerPolicy,
    PermissionsPolicy,
    SecurityTxt,
    RobotsTxt,
    ScanTimeout,
}

// --- Findings ---

/// One scored finding. Immutable once created; exactly one per catalogue
/// check per run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityCheck {
    pub code: String,
    pub name: CheckName,
    pub severity: Severity,
    pub description: String,
    pub points: u32,
    pub max_points: u32,
}

impl SecurityCheck {
    /// Builds a finding, deriving the CWE-tagged code from the catalogue.
    pub fn new(
        name: CheckName,
        severity: Severity,
        description: impl Into<String>,
        points: u32,
        max_points: u32,
    ) -> Self {
        Self {
            code: format!("[{}] {}", knowledge_base::cwe_tag(name), name),
            name,
            severity,
            description: description.into(),
            points,
            max_points,
        }
    }
}

// --- Report ---

/// The full audit report handed back to the caller and persisted by slug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LightAuditResult {
    pub status: AuditStatus,
    pub slug: String,
    /// Ten entries in check-execution order on success, one sentinel on error.
    pub vulnerabilities: Vec<SecurityCheck>,
    /// Wall-clock milliseconds from engine entry to report assembly.
    pub scan_duration: u64,
    pub site_type: SiteType,
    pub industry_category: IndustryCategory,
    pub total_score: u32,
    pub max_score: u32,
    pub score_percentage: u32,
}

impl LightAuditResult {
    /// The single report shape for every failed run: one `SCAN_TIMEOUT`
    /// sentinel finding and a zero score against the nominal maximum.
    pub fn error(slug: String, scan_duration: u64) -> Self {
        Self {
            status: AuditStatus::Error,
            slug,
            vulnerabilities: vec![SecurityCheck {
                code: knowledge_base::ERROR_SENTINEL_CODE.to_string(),
                name: CheckName::ScanTimeout,
                severity: Severity::Info,
                description: "Target blocked the scanner or timed out.".to_string(),
                points: 0,
                max_points: 0,
            }],
            scan_duration,
            site_type: SiteType::Unknown,
            industry_category: IndustryCategory::Unknown,
            total_score: 0,
            max_score: 100,
            score_percentage: 0,
        }
    }

    /// A flawless report: every catalogue check at full pass credit.
    pub fn perfect(slug: String, scan_duration: u64) -> Self {
        let vulnerabilities: Vec<SecurityCheck> = knowledge_base::catalogue()
            .iter()
            .map(|profile| {
                SecurityCheck::new(
                    profile.name,
                    Severity::Info,
                    profile.clean_summary,
                    profile.weights.pass,
                    profile.weights.max,
                )
            })
            .collect();
        let max_score: u32 = vulnerabilities.iter().map(|c| c.max_points).sum();
        Self {
            status: AuditStatus::Clean,
            slug,
            vulnerabilities,
            scan_duration,
            site_type: SiteType::Spa,
            industry_category: IndustryCategory::Saas,
            total_score: max_score,
            max_score,
            score_percentage: 100,
        }
    }
}

// --- Persisted record ---

/// What the report store keeps: the report plus identity and provenance.
/// Re-running an audit for the same slug overwrites the prior record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: String,
    pub target_url: String,
    pub completed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: LightAuditResult,
}
