//! Bypass evaluation
//!
//! A pull request may merge during a freeze when either rule holds:
//! - its title mentions "changelog"
//! - its URL is (or lies under) the freeze's designated changelog URL
//!
//! The rules are independent; neither replaces the other.

use crate::domain_models::ServiceMetadata;
use crate::page::Page;

/// Heading selectors tried in order when resolving the pull request title
pub const HEADING_SELECTORS: &[&str] = &[
    r#"[data-testid="pr-header-title"]"#,
    r#"[data-qa="pr-header-title"]"#,
    r#"h1[data-testid="pull-request-title"]"#,
    "h1",
];

const TITLE_KEYWORD: &str = "changelog";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExemptReason {
    ChangelogTitle,
    ChangelogUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassDecision {
    Exempt(ExemptReason),
    NotExempt,
    /// The page title is not rendered yet; ask again on the next mutation
    Undetermined,
}

/// Title rule: case-insensitive "changelog" anywhere in the title
pub fn title_rule(title: &str) -> bool {
    title.to_lowercase().contains(TITLE_KEYWORD)
}

/// URL rule: the location equals the changelog URL or is a sub-path of it
pub fn url_rule(location: &str, metadata: &ServiceMetadata) -> bool {
    let Some(changelog_url) = metadata.changelog_url.as_deref() else {
        return false;
    };
    let changelog_url = changelog_url.trim().to_lowercase();
    if changelog_url.is_empty() {
        return false;
    }
    location.trim().to_lowercase().starts_with(&changelog_url)
}

/// Decide whether the pull request at `location` titled `title` is exempt
///
/// The URL rule needs no rendered DOM, so it is applied even while the title
/// is still empty.
pub fn evaluate(title: &str, location: &str, metadata: &ServiceMetadata) -> BypassDecision {
    if url_rule(location, metadata) {
        return BypassDecision::Exempt(ExemptReason::ChangelogUrl);
    }
    if title.trim().is_empty() {
        return BypassDecision::Undetermined;
    }
    if title_rule(title) {
        return BypassDecision::Exempt(ExemptReason::ChangelogTitle);
    }
    BypassDecision::NotExempt
}

/// Resolves the pull request title from the page
#[derive(Debug, Clone)]
pub struct TitleResolver {
    selectors: Vec<String>,
    brand_tokens: Vec<String>,
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self::new(vec!["Bitbucket".to_string()])
    }
}

impl TitleResolver {
    pub fn new(brand_tokens: Vec<String>) -> Self {
        Self {
            selectors: HEADING_SELECTORS.iter().map(|s| s.to_string()).collect(),
            brand_tokens: brand_tokens
                .into_iter()
                .map(|t| t.to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// First non-empty heading text, else the document title unless it is
    /// the host site's own branding, else an empty string
    pub fn resolve<P: Page + ?Sized>(&self, page: &P) -> String {
        for selector in &self.selectors {
            if let Some(text) = page.query_text(selector) {
                let text = text.trim();
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }

        let title = page.document_title();
        let title = title.trim();
        let lowered = title.to_lowercase();
        if title.is_empty() || self.brand_tokens.iter().any(|t| lowered.contains(t)) {
            return String::new();
        }
        title.to_string()
    }
}
