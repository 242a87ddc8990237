use crate::products::Credentials;

/// Which selector set the extractor scans the listing page with.
///
/// `Minimal` is the narrow, most-specific-first set; `Broad` adds the
/// catch-all patterns used for bulk catalog sweeps and enables
/// as-discovered deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorProfileKind {
    Minimal,
    Broad,
}

impl SelectorProfileKind {
    /// Default product cap for this profile when `DROPINTEL_MAX_PRODUCTS`
    /// is not set: the narrow profile analyzes 2 products, the broad
    /// profile sweeps up to 50.
    #[must_use]
    pub fn default_max_products(self) -> usize {
        match self {
            SelectorProfileKind::Minimal => 2,
            SelectorProfileKind::Broad => 50,
        }
    }
}

impl std::fmt::Display for SelectorProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectorProfileKind::Minimal => write!(f, "minimal"),
            SelectorProfileKind::Broad => write!(f, "broad"),
        }
    }
}

/// Where the pipeline's products come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Log in to the portal and scrape the listing page.
    Live,
    /// Skip the portal entirely and analyze the fixed catalog.
    Static,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Live => write!(f, "live"),
            DataSource::Static => write!(f, "static"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    /// Supabase project URL; `None` disables persistence for the run.
    pub supabase_url: Option<String>,
    /// Supabase anon key; `None` disables persistence for the run.
    pub supabase_key: Option<String>,
    pub selector_profile: SelectorProfileKind,
    pub data_source: DataSource,
    /// Upper bound on products analyzed per run. Defaults to the
    /// selector profile's cap when unset in the environment.
    pub max_products: usize,
    pub login_url: String,
    pub products_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional whole-scrape attempts after the first portal failure.
    pub max_retries: u32,
    /// Base delay for exponential backoff between scrape attempts.
    pub retry_backoff_base_ms: u64,
    /// Where the end-of-run report JSON is written.
    pub results_path: String,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("username", &self.credentials.username)
            .field("password", &"[redacted]")
            .field("supabase_url", &self.supabase_url)
            .field(
                "supabase_key",
                &self.supabase_key.as_ref().map(|_| "[redacted]"),
            )
            .field("selector_profile", &self.selector_profile)
            .field("data_source", &self.data_source)
            .field("max_products", &self.max_products)
            .field("login_url", &self.login_url)
            .field("products_url", &self.products_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("results_path", &self.results_path)
            .field("log_level", &self.log_level)
            .finish()
    }
}
