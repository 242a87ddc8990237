pub mod dossier;
pub mod generate;

pub use dossier::{
    Dossier, FacebookAds, MarketAnalysis, PricePosition, RecommendedAction, Recommendations,
    SocialIntelligence, SourcingIntelligence, TrendAnalysis,
};
pub use generate::generate_dossier;
