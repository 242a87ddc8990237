use serde::{Deserialize, Serialize};

/// Portal login credentials. Used once per run, never persisted.
///
/// Deliberately has no `Debug`/`Display` derive so the password cannot
/// leak through formatting.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Where a product record came from within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOrigin {
    /// Scraped from the live listing page.
    LiveScrape,
    /// Substituted from the fixed catalog after an empty extraction.
    FallbackCatalog,
    /// Loaded from the fixed catalog by the static data source.
    StaticCatalog,
}

impl ProductOrigin {
    /// Label stored in the dossier's `source` field.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProductOrigin::LiveScrape => "live_scrape",
            ProductOrigin::FallbackCatalog => "fallback_catalog",
            ProductOrigin::StaticCatalog => "static_catalog",
        }
    }
}

/// A product discovered during a run, either scraped from the portal's
/// listing page or taken from the fixed catalog.
///
/// Instances are created fresh each run and read once to produce a
/// dossier; they are never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Stable within a run: discovery-ordered for scraped products
    /// (`dropi_live_3`), fixed for catalog entries (`dropi_fallback_1`).
    pub id: String,
    pub name: String,
    /// Price in guaraníes after cleaning; always > 0 for products that
    /// survive extraction.
    pub price: u64,
    /// May be a placeholder URL when the listing markup carries no image.
    pub image_url: String,
    pub url: String,
    pub description: String,
    pub category: String,
    pub stock: u32,
    pub brand: String,
    /// Storefront rating in `[0, 5]`.
    pub rating: f64,
}

impl Product {
    /// Whether the record satisfies the inclusion invariants: a positive
    /// cleaned price and a display name longer than two characters.
    #[must_use]
    pub fn is_analyzable(&self) -> bool {
        self.price > 0 && self.name.trim().chars().count() > 2
    }
}
