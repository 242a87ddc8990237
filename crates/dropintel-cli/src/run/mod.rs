//! The intelligence run: authenticate → extract → analyze → report.
//!
//! State flows explicitly through the steps — a resolved [`RunPlan`],
//! the acquired product list, and [`AnalysisTotals`] — so nothing is
//! captured in shared mutable closures. Only configuration errors abort
//! the process; portal and persistence failures degrade to warnings and
//! the report is written regardless.

use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dropintel_core::{
    fallback_catalog, AppConfig, DataSource, Product, ProductOrigin, RunReport,
    SelectorProfileKind,
};
use dropintel_dossier::generate_dossier;
use dropintel_scraper::{extract_products, PortalError, PortalSession, SelectorProfile};
use dropintel_supabase::SupabaseClient;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ProfileArg {
    Minimal,
    Broad,
}

impl From<ProfileArg> for SelectorProfileKind {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Minimal => SelectorProfileKind::Minimal,
            ProfileArg::Broad => SelectorProfileKind::Broad,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SourceArg {
    Live,
    Static,
}

impl From<SourceArg> for DataSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Live => DataSource::Live,
            SourceArg::Static => DataSource::Static,
        }
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Selector profile to scan the listing with.
    #[arg(long, value_enum)]
    profile: Option<ProfileArg>,

    /// Where products come from.
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// Upper bound on products analyzed this run.
    #[arg(long)]
    max_products: Option<usize>,

    /// Where to write the run report JSON.
    #[arg(long)]
    results_path: Option<String>,
}

/// The run's resolved parameters: configuration with CLI overrides applied.
#[derive(Debug)]
struct RunPlan {
    profile: SelectorProfileKind,
    source: DataSource,
    max_products: usize,
    results_path: String,
}

fn resolve_plan(config: &AppConfig, args: &RunArgs) -> RunPlan {
    RunPlan {
        profile: args.profile.map_or(config.selector_profile, Into::into),
        source: args.source.map_or(config.data_source, Into::into),
        max_products: args.max_products.unwrap_or(config.max_products),
        results_path: args
            .results_path
            .clone()
            .unwrap_or_else(|| config.results_path.clone()),
    }
}

/// Totals from the analyze loop.
struct AnalysisTotals {
    analyzed: usize,
    successful: usize,
}

pub async fn execute(config: AppConfig, args: &RunArgs) -> anyhow::Result<()> {
    let plan = resolve_plan(&config, args);
    tracing::info!(
        profile = %plan.profile,
        source = %plan.source,
        max_products = plan.max_products,
        "starting intelligence run"
    );

    let mut rng = StdRng::from_os_rng();

    let (products, origin) = acquire_products(&config, &plan, &mut rng).await;
    let discovered = products.len();
    tracing::info!(discovered, "product discovery finished");

    let persister = build_persister(&config);
    let totals = analyze_products(
        &products,
        origin,
        plan.max_products,
        persister.as_ref(),
        &mut rng,
    )
    .await;

    let report = RunReport::new(discovered, totals.analyzed, totals.successful);
    let rate = format!("{:.1}%", report.success_rate);
    tracing::info!(
        discovered = report.discovered_count,
        analyzed = report.analyzed_count,
        successful = report.successful_count,
        success_rate = %rate,
        "intelligence run complete"
    );
    write_report(&plan.results_path, &report);

    Ok(())
}

/// Produces the run's product list and its origin.
///
/// Live scraping that finds nothing substitutes the fallback catalog; a
/// login or navigation failure instead aborts the scraping phase with an
/// empty list (no fallback — the portal was never successfully read).
async fn acquire_products(
    config: &AppConfig,
    plan: &RunPlan,
    rng: &mut StdRng,
) -> (Vec<Product>, ProductOrigin) {
    match plan.source {
        DataSource::Static => {
            tracing::info!("static data source selected; skipping the portal");
            (fallback_catalog(), ProductOrigin::StaticCatalog)
        }
        DataSource::Live => match scrape_with_retries(config, plan, rng).await {
            Ok(products) if products.is_empty() => {
                tracing::warn!("extraction found no products; substituting the fallback catalog");
                (fallback_catalog(), ProductOrigin::FallbackCatalog)
            }
            Ok(products) => (products, ProductOrigin::LiveScrape),
            Err(e) => {
                tracing::warn!(error = %e, "portal scraping failed; no products to analyze");
                (Vec::new(), ProductOrigin::LiveScrape)
            }
        },
    }
}

/// Re-runs the whole login-and-extract sequence on portal failure, up to
/// `max_retries` additional attempts with exponential backoff and
/// ±25 % jitter, capped at 60 s per wait.
async fn scrape_with_retries(
    config: &AppConfig,
    plan: &RunPlan,
    rng: &mut StdRng,
) -> Result<Vec<Product>, PortalError> {
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match scrape_live(config, plan, rng).await {
            Ok(products) => return Ok(products),
            Err(err) => {
                if attempt >= config.max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = config
                    .retry_backoff_base_ms
                    .saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rng.random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries = config.max_retries,
                    delay_ms,
                    error = %err,
                    "portal step failed — retrying the scrape"
                );
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

async fn scrape_live(
    config: &AppConfig,
    plan: &RunPlan,
    rng: &mut StdRng,
) -> Result<Vec<Product>, PortalError> {
    let session = PortalSession::new(config.request_timeout_secs, &config.user_agent)?;
    session.login(&config.login_url, &config.credentials).await?;
    let html = session.fetch_listing(&config.products_url).await?;
    let profile = SelectorProfile::for_kind(plan.profile);
    let products = extract_products(&html, &config.products_url, profile, rng);
    tracing::info!(count = products.len(), "extracted products from listing");
    Ok(products)
}

fn build_persister(config: &AppConfig) -> Option<SupabaseClient> {
    match (&config.supabase_url, &config.supabase_key) {
        (Some(url), Some(key)) => {
            match SupabaseClient::new(url, key, config.request_timeout_secs) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!(error = %e, "Supabase client unavailable; persistence disabled");
                    None
                }
            }
        }
        _ => {
            tracing::warn!("Supabase settings missing; persistence disabled");
            None
        }
    }
}

/// Analyzes the first `max_products` products in extraction order,
/// strictly sequentially. Each product's generate-and-save is isolated:
/// a failed upsert is logged and counted, never propagated.
async fn analyze_products(
    products: &[Product],
    origin: ProductOrigin,
    max_products: usize,
    persister: Option<&SupabaseClient>,
    rng: &mut StdRng,
) -> AnalysisTotals {
    let slice = &products[..products.len().min(max_products)];
    let mut successful = 0usize;

    for product in slice {
        tracing::info!(product = %product.name, "analyzing product");
        let dossier = generate_dossier(product, origin, rng);
        match persister {
            Some(client) => match client.upsert_dossier(&dossier).await {
                Ok(()) => {
                    successful += 1;
                    tracing::info!(product_id = %dossier.product_id, "dossier saved");
                }
                Err(e) => {
                    tracing::warn!(
                        product_id = %dossier.product_id,
                        error = %e,
                        "dossier not saved"
                    );
                }
            },
            None => {
                tracing::warn!(
                    product_id = %dossier.product_id,
                    "persistence disabled; dossier not saved"
                );
            }
        }
    }

    AnalysisTotals {
        analyzed: slice.len(),
        successful,
    }
}

/// Best-effort write of the run report artifact; failures are warnings,
/// the run has already succeeded.
fn write_report(path: &str, report: &RunReport) {
    let json = match serde_json::to_string_pretty(report) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize run report");
            return;
        }
    };
    match std::fs::write(path, json) {
        Ok(()) => tracing::info!(path = %path, "run report written"),
        Err(e) => tracing::warn!(path = %path, error = %e, "failed to write run report"),
    }
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
