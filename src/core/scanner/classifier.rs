// src/core/scanner/classifier.rs

use tracing::debug;

use crate::core::models::{IndustryCategory, SiteType};

/// Markup signatures that betray a client-rendered single-page app.
const SPA_MARKERS: &[&str] = &["__next", "_nuxt", "ng-app", "data-reactroot"];

/// A page with neither forms nor scripts below this size is treated as a
/// plain static document.
const STATIC_SIZE_LIMIT: usize = 50_000;

// Industry keyword tables, checked in priority order. A hit anywhere in the
// lowercased URL or HTML counts, including inside scripts or comments.
const FINTECH_KEYWORDS: &[&str] = &[
    "payment", "bank", "finance", "invest", "crypto", "wallet", "stripe", "paypal",
];
const ECOMMERCE_KEYWORDS: &[&str] = &["shop", "cart", "checkout", "product", "store", "buy"];
const SAAS_KEYWORDS: &[&str] = &["dashboard", "login", "signup", "subscription", "pricing", "api"];

/// Guesses how the fetched page is built.
///
/// Never returns `Api` or `Unknown`: those stay reserved for the exemption
/// table and the error path respectively.
pub fn detect_site_type(html: &str) -> SiteType {
    let lower = html.to_lowercase();

    if SPA_MARKERS.iter().any(|m| lower.contains(m)) {
        return SiteType::Spa;
    }

    let has_form = lower.contains("<form");
    let has_script = lower.contains("<script");
    if !has_form && !has_script && html.len() < STATIC_SIZE_LIMIT {
        return SiteType::Static;
    }

    SiteType::Dynamic
}

/// Guesses the industry vertical from keyword membership in the URL and the
/// page body. First matching table wins; no match reads as marketing.
pub fn detect_industry(url: &str, html: &str) -> IndustryCategory {
    let url_lower = url.to_lowercase();
    let html_lower = html.to_lowercase();

    let tables = [
        (FINTECH_KEYWORDS, IndustryCategory::Fintech),
        (ECOMMERCE_KEYWORDS, IndustryCategory::Ecommerce),
        (SAAS_KEYWORDS, IndustryCategory::Saas),
    ];
    for (keywords, category) in tables {
        if keywords
            .iter()
            .any(|k| url_lower.contains(k) || html_lower.contains(k))
        {
            debug!(%category, "Industry keyword matched.");
            return category;
        }
    }

    IndustryCategory::Marketing
}
