//! Dossier generation: price-derived facts plus sampled filler metrics.

use chrono::Utc;
use rand::Rng;

use dropintel_core::{Product, ProductOrigin};

use crate::dossier::{
    Dossier, FacebookAds, MarketAnalysis, PricePosition, RecommendedAction, Recommendations,
    SocialIntelligence, SourcingIntelligence, TrendAnalysis,
};

/// Maps one product to its intelligence dossier.
///
/// Pure except for the injected generator: the derived fields depend
/// only on the product's price, while the filler metrics are sampled
/// fresh on every call (never reused across products). Seed the
/// generator to make sampling reproducible in tests.
pub fn generate_dossier<R: Rng>(product: &Product, origin: ProductOrigin, rng: &mut R) -> Dossier {
    let price = product.price;

    Dossier {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        source: origin.label().to_string(),
        market_analysis: MarketAnalysis {
            current_price: price,
            price_position: PricePosition::for_price(price),
            demand_level: "HIGH".to_string(),
            competition_score: rng.random_range(0.0..10.0),
            market_potential: rng.random_range(0.0..100.0),
        },
        sourcing_intelligence: SourcingIntelligence {
            // floor(price × 0.4), kept in integer arithmetic so large
            // prices do not lose precision through f64.
            estimated_cost: price * 2 / 5,
            suggested_margin: 60,
            roi_percentage: rng.random_range(50..250),
            supplier_risk: "LOW".to_string(),
        },
        social_intelligence: SocialIntelligence {
            facebook_ads: FacebookAds {
                active_advertisers: rng.random_range(1..16),
                ad_spend_estimate: rng.random_range(1_000_000..6_000_000),
                competition_level: "MEDIUM".to_string(),
            },
            trend_analysis: TrendAnalysis {
                google_trend_score: rng.random_range(0..100),
                social_mentions: rng.random_range(100..1_100),
                sentiment_score: round_2dp(rng.random_range(-1.0..1.0)),
            },
        },
        recommendations: Recommendations {
            action: RecommendedAction::for_price(price),
            confidence: rng.random_range(70..100),
            risk_level: "LOW".to_string(),
            estimated_profit_margin: rng.random_range(30..70),
        },
        generated_at: Utc::now(),
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
