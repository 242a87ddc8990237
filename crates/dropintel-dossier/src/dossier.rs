//! The per-product market-intelligence dossier.
//!
//! Two kinds of fields live here: derivations computed from the
//! product's price, and sampled filler metrics. The sampled values are
//! synthetic noise, not measurements — consumers must not treat them as
//! observed market data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the product's price sits in the catalog's price bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PricePosition {
    Low,
    Medium,
    High,
}

impl PricePosition {
    /// Band thresholds in guaraníes: below 500k is LOW, below 2M is
    /// MEDIUM, everything above is HIGH.
    #[must_use]
    pub fn for_price(price: u64) -> Self {
        if price < 500_000 {
            PricePosition::Low
        } else if price < 2_000_000 {
            PricePosition::Medium
        } else {
            PricePosition::High
        }
    }
}

/// The dossier's bottom-line call on the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    BuyNow,
    AnalyzeFurther,
}

impl RecommendedAction {
    #[must_use]
    pub fn for_price(price: u64) -> Self {
        if price < 1_000_000 {
            RecommendedAction::BuyNow
        } else {
            RecommendedAction::AnalyzeFurther
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub current_price: u64,
    pub price_position: PricePosition,
    pub demand_level: String,
    /// Sampled from `[0, 10)`.
    pub competition_score: f64,
    /// Sampled from `[0, 100)`.
    pub market_potential: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcingIntelligence {
    /// `floor(price × 0.4)`.
    pub estimated_cost: u64,
    pub suggested_margin: u32,
    /// Sampled integer from `[50, 250)`.
    pub roi_percentage: u32,
    pub supplier_risk: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacebookAds {
    /// Sampled integer from `[1, 16)`.
    pub active_advertisers: u32,
    /// Sampled integer from `[1_000_000, 6_000_000)`.
    pub ad_spend_estimate: u64,
    pub competition_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysis {
    /// Sampled integer from `[0, 100)`.
    pub google_trend_score: u32,
    /// Sampled integer from `[100, 1100)`.
    pub social_mentions: u32,
    /// Sampled from `[-1, 1)`, rounded to two decimal places.
    pub sentiment_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialIntelligence {
    pub facebook_ads: FacebookAds,
    pub trend_analysis: TrendAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    pub action: RecommendedAction,
    /// Sampled integer from `[70, 100)`.
    pub confidence: u32,
    pub risk_level: String,
    /// Sampled integer from `[30, 70)`.
    pub estimated_profit_margin: u32,
}

/// One product's full intelligence report, persisted as a JSON blob
/// keyed by `product_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dossier {
    pub product_id: String,
    pub product_name: String,
    /// Which data source the product came from (`live_scrape`,
    /// `fallback_catalog`, `static_catalog`).
    pub source: String,
    pub market_analysis: MarketAnalysis,
    pub sourcing_intelligence: SourcingIntelligence,
    pub social_intelligence: SocialIntelligence,
    pub recommendations: Recommendations,
    pub generated_at: DateTime<Utc>,
}
