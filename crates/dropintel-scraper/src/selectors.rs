//! CSS selectors for the Dropi portal's login and listing pages.
//!
//! Listing-page selectors are grouped into prioritized fallback chains:
//! the first pattern that matches wins. Update this file when the portal
//! changes its markup.

use std::sync::LazyLock;

use scraper::Selector;

use dropintel_core::SelectorProfileKind;

fn parse_group(patterns: &[&str]) -> Vec<Selector> {
    patterns
        .iter()
        .map(|p| Selector::parse(p).expect("selector pattern must be valid CSS"))
        .collect()
}

/// Selectors for the login form.
pub mod login {
    use super::{LazyLock, Selector};

    pub const EMAIL_INPUT_PATTERN: &str = "input[name=\"email\"]";
    pub const PASSWORD_INPUT_PATTERN: &str = "input[name=\"password\"]";
    pub const SUBMIT_BUTTON_PATTERN: &str = "button[type=\"submit\"]";

    pub static EMAIL_INPUT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(EMAIL_INPUT_PATTERN).expect("valid selector"));

    pub static PASSWORD_INPUT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(PASSWORD_INPUT_PATTERN).expect("valid selector"));

    pub static SUBMIT_BUTTON: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(SUBMIT_BUTTON_PATTERN).expect("valid selector"));

    /// Hidden inputs carried into the credential POST (CSRF tokens etc.).
    pub static HIDDEN_INPUT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("input[type=\"hidden\"]").expect("valid selector"));
}

/// An ordered selector set for locating product elements and their
/// sub-fields on the listing page.
///
/// Container patterns are scanned most-specific first; within a matched
/// container, each field group is probed in order and falls back to the
/// container element itself when nothing matches.
pub struct SelectorProfile {
    kind: SelectorProfileKind,
    pub(crate) containers: Vec<Selector>,
    pub(crate) name: Vec<Selector>,
    pub(crate) price: Vec<Selector>,
    pub(crate) image: Vec<Selector>,
    pub(crate) link: Vec<Selector>,
}

static MINIMAL: LazyLock<SelectorProfile> = LazyLock::new(|| SelectorProfile {
    kind: SelectorProfileKind::Minimal,
    containers: parse_group(&["[data-product-id]", ".product-card", ".product-item"]),
    name: parse_group(&[".product-name", ".name", "h3", "h4"]),
    price: parse_group(&[".price", ".product-price", ".cost"]),
    image: parse_group(&["img"]),
    link: parse_group(&["a"]),
});

static BROAD: LazyLock<SelectorProfile> = LazyLock::new(|| SelectorProfile {
    kind: SelectorProfileKind::Broad,
    containers: parse_group(&[
        "[data-product-id]",
        ".product-card",
        ".product-item",
        ".product",
        "li[class*=\"product\"]",
        "div[class*=\"product\"]",
        ".card",
        ".item",
        "article",
    ]),
    name: parse_group(&[
        ".product-name",
        ".name",
        ".title",
        "h2",
        "h3",
        "h4",
        "[class*=\"name\"]",
        "[class*=\"title\"]",
    ]),
    price: parse_group(&[
        ".price",
        ".product-price",
        ".cost",
        "[class*=\"price\"]",
        "[class*=\"cost\"]",
    ]),
    image: parse_group(&["img[src]", "img"]),
    link: parse_group(&["a[href]", "a"]),
});

impl SelectorProfile {
    /// Returns the shared profile instance for a configured kind.
    #[must_use]
    pub fn for_kind(kind: SelectorProfileKind) -> &'static SelectorProfile {
        match kind {
            SelectorProfileKind::Minimal => &MINIMAL,
            SelectorProfileKind::Broad => &BROAD,
        }
    }

    #[must_use]
    pub fn kind(&self) -> SelectorProfileKind {
        self.kind
    }

    /// The broad sweep dedups candidates and drops junk names; the
    /// minimal profile keeps every priced match.
    pub(crate) fn dedups_candidates(&self) -> bool {
        self.kind == SelectorProfileKind::Broad
    }
}
