//! Listing-page product extraction.
//!
//! Pure DOM scanning over already-fetched HTML: the session fetches the
//! page, this module turns it into [`Product`] records. Degenerate
//! matches (a container with none of the expected sub-elements) are
//! expected portal noise and resolve to field defaults rather than
//! errors.

use std::collections::HashSet;

use rand::Rng;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use dropintel_core::Product;

use crate::normalize::clean_price;
use crate::selectors::SelectorProfile;

/// Scans `html` with the profile's prioritized container selectors and
/// returns the surviving product records in discovery order.
///
/// Candidates whose cleaned price is 0 are dropped as extraction noise.
/// The broad profile additionally drops names of two characters or
/// fewer and dedups on `(name, cleaned price)` as candidates are
/// discovered — the earliest match under selector-priority order wins.
///
/// An empty result is a value, not an error; substituting fallback data
/// is the caller's policy.
pub fn extract_products<R: Rng>(
    html: &str,
    listing_url: &str,
    profile: &SelectorProfile,
    rng: &mut R,
) -> Vec<Product> {
    let doc = Html::parse_document(html);
    let base = Url::parse(listing_url).ok();

    // A node can match several container patterns; process it once,
    // under the most specific pattern that found it.
    let mut seen_nodes = HashSet::new();
    let mut seen_keys: HashSet<(String, u64)> = HashSet::new();
    let mut products = Vec::new();
    let mut discovered = 0usize;

    for selector in &profile.containers {
        for container in doc.select(selector) {
            if !seen_nodes.insert(container.id()) {
                continue;
            }
            discovered += 1;
            let n = discovered;

            let name = probe_text(container, &profile.name)
                .unwrap_or_else(|| format!("Dropi product {n}"));
            let price_text =
                probe_text(container, &profile.price).unwrap_or_else(|| "0".to_string());
            let price = clean_price(&price_text);
            let image_url = probe_attr(container, &profile.image, "src")
                .map_or_else(
                    || format!("https://via.placeholder.com/300?text=Dropi{n}"),
                    |src| resolve_url(base.as_ref(), &src),
                );
            let url = probe_attr(container, &profile.link, "href").map_or_else(
                || default_product_url(base.as_ref(), n),
                |href| resolve_url(base.as_ref(), &href),
            );

            let candidate = Product {
                id: format!("dropi_live_{n}"),
                name,
                price,
                image_url,
                url,
                description: "Product extracted from the Dropi catalog".to_string(),
                category: "Dropi".to_string(),
                stock: rng.random_range(1..21),
                brand: "Dropi".to_string(),
                rating: 4.0 + rng.random::<f64>(),
            };

            if candidate.price == 0 {
                tracing::debug!(
                    candidate = n,
                    name = %candidate.name,
                    "dropping unpriced candidate"
                );
                continue;
            }

            if profile.dedups_candidates() {
                if !candidate.is_analyzable() {
                    tracing::debug!(
                        candidate = n,
                        name = %candidate.name,
                        "dropping junk name"
                    );
                    continue;
                }
                if !seen_keys.insert((candidate.name.clone(), candidate.price)) {
                    continue;
                }
            }

            products.push(candidate);
        }
    }

    products
}

/// First non-empty text under any selector in the group, falling back to
/// the container's own text. Whitespace runs collapse to single spaces.
fn probe_text(container: ElementRef<'_>, group: &[Selector]) -> Option<String> {
    let element = probe_element(container, group).unwrap_or(container);
    let text = element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// First element in the group carrying `attr`, falling back to the
/// container itself (which, for plain `div` containers, yields `None`).
fn probe_attr(container: ElementRef<'_>, group: &[Selector], attr: &str) -> Option<String> {
    let element = probe_element(container, group).unwrap_or(container);
    element
        .value()
        .attr(attr)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn probe_element<'a>(container: ElementRef<'a>, group: &[Selector]) -> Option<ElementRef<'a>> {
    group.iter().find_map(|sel| container.select(sel).next())
}

/// Joins relative hrefs/srcs against the listing URL; unparseable values
/// pass through untouched.
fn resolve_url(base: Option<&Url>, raw: &str) -> String {
    match base {
        Some(base) => base
            .join(raw)
            .map_or_else(|_| raw.to_string(), |u| u.to_string()),
        None => raw.to_string(),
    }
}

fn default_product_url(base: Option<&Url>, n: usize) -> String {
    match base.and_then(|b| b.join(&format!("product/{n}")).ok()) {
        Some(url) => url.to_string(),
        None => format!("https://app.dropi.com.py/product/{n}"),
    }
}
