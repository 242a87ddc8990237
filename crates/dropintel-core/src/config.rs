use crate::app_config::{AppConfig, DataSource, SelectorProfileKind};
use crate::products::Credentials;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // Portal credentials are the only hard requirement: the run must fail
    // before any I/O when they are absent.
    let username = require("DROPI_USERNAME")?;
    let password = require("DROPI_PASSWORD")?;

    // Missing Supabase settings downgrade persistence to "not saved"
    // outcomes instead of aborting the run.
    let supabase_url = lookup("SUPABASE_URL").ok();
    let supabase_key = lookup("SUPABASE_ANON_KEY").ok();

    let selector_profile = parse_selector_profile(&or_default("DROPINTEL_SELECTOR_PROFILE", "minimal"))?;
    let data_source = parse_data_source(&or_default("DROPINTEL_DATA_SOURCE", "live"))?;

    let max_products = match lookup("DROPINTEL_MAX_PRODUCTS") {
        Ok(raw) => raw
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "DROPINTEL_MAX_PRODUCTS".to_string(),
                reason: e.to_string(),
            })?,
        Err(_) => selector_profile.default_max_products(),
    };

    let login_url = or_default("DROPINTEL_LOGIN_URL", "https://app.dropi.com.py/auth/login");
    let products_url = or_default("DROPINTEL_PRODUCTS_URL", "https://app.dropi.com.py/products");
    let request_timeout_secs = parse_u64("DROPINTEL_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "DROPINTEL_USER_AGENT",
        "dropintel/0.1 (market-intelligence)",
    );
    let max_retries = parse_u32("DROPINTEL_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("DROPINTEL_RETRY_BACKOFF_BASE_MS", "1000")?;
    let results_path = or_default(
        "DROPINTEL_RESULTS_PATH",
        &default_results_path(data_source, selector_profile),
    );
    let log_level = or_default("DROPINTEL_LOG_LEVEL", "info");

    Ok(AppConfig {
        credentials: Credentials { username, password },
        supabase_url,
        supabase_key,
        selector_profile,
        data_source,
        max_products,
        login_url,
        products_url,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        results_path,
        log_level,
    })
}

/// The report file name encodes the variant, so runs with different
/// profiles do not clobber each other's artifacts.
fn default_results_path(source: DataSource, profile: SelectorProfileKind) -> String {
    match source {
        DataSource::Static => "dropintel_run_static.json".to_string(),
        DataSource::Live => format!("dropintel_run_{profile}.json"),
    }
}

fn parse_selector_profile(s: &str) -> Result<SelectorProfileKind, ConfigError> {
    match s {
        "minimal" => Ok(SelectorProfileKind::Minimal),
        "broad" => Ok(SelectorProfileKind::Broad),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DROPINTEL_SELECTOR_PROFILE".to_string(),
            reason: format!("expected \"minimal\" or \"broad\", got \"{other}\""),
        }),
    }
}

fn parse_data_source(s: &str) -> Result<DataSource, ConfigError> {
    match s {
        "live" => Ok(DataSource::Live),
        "static" => Ok(DataSource::Static),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DROPINTEL_DATA_SOURCE".to_string(),
            reason: format!("expected \"live\" or \"static\", got \"{other}\""),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid values.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("DROPI_USERNAME", "spy@example.com");
        m.insert("DROPI_PASSWORD", "hunter2");
        m
    }

    #[test]
    fn build_app_config_fails_without_username() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("DROPI_PASSWORD", "hunter2");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DROPI_USERNAME"),
            "expected MissingEnvVar(DROPI_USERNAME), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_without_password() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("DROPI_USERNAME", "spy@example.com");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DROPI_PASSWORD"),
            "expected MissingEnvVar(DROPI_PASSWORD), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_only_credentials() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.credentials.username, "spy@example.com");
        assert!(cfg.supabase_url.is_none());
        assert!(cfg.supabase_key.is_none());
        assert_eq!(cfg.selector_profile, SelectorProfileKind::Minimal);
        assert_eq!(cfg.data_source, DataSource::Live);
        assert_eq!(cfg.max_products, 2);
        assert_eq!(cfg.login_url, "https://app.dropi.com.py/auth/login");
        assert_eq!(cfg.products_url, "https://app.dropi.com.py/products");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.user_agent, "dropintel/0.1 (market-intelligence)");
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_backoff_base_ms, 1_000);
        assert_eq!(cfg.results_path, "dropintel_run_minimal.json");
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn max_retries_override_and_invalid() {
        let mut map = full_env();
        map.insert("DROPINTEL_MAX_RETRIES", "0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.max_retries, 0);

        map.insert("DROPINTEL_MAX_RETRIES", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DROPINTEL_MAX_RETRIES"),
            "expected InvalidEnvVar(DROPINTEL_MAX_RETRIES), got: {result:?}"
        );
    }

    #[test]
    fn broad_profile_raises_default_max_products() {
        let mut map = full_env();
        map.insert("DROPINTEL_SELECTOR_PROFILE", "broad");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.selector_profile, SelectorProfileKind::Broad);
        assert_eq!(cfg.max_products, 50);
        assert_eq!(cfg.results_path, "dropintel_run_broad.json");
    }

    #[test]
    fn explicit_max_products_overrides_profile_default() {
        let mut map = full_env();
        map.insert("DROPINTEL_SELECTOR_PROFILE", "broad");
        map.insert("DROPINTEL_MAX_PRODUCTS", "7");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.max_products, 7);
    }

    #[test]
    fn invalid_max_products_is_rejected() {
        let mut map = full_env();
        map.insert("DROPINTEL_MAX_PRODUCTS", "many");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DROPINTEL_MAX_PRODUCTS"),
            "expected InvalidEnvVar(DROPINTEL_MAX_PRODUCTS), got: {result:?}"
        );
    }

    #[test]
    fn invalid_selector_profile_is_rejected() {
        let mut map = full_env();
        map.insert("DROPINTEL_SELECTOR_PROFILE", "maximal");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DROPINTEL_SELECTOR_PROFILE"),
            "expected InvalidEnvVar(DROPINTEL_SELECTOR_PROFILE), got: {result:?}"
        );
    }

    #[test]
    fn invalid_data_source_is_rejected() {
        let mut map = full_env();
        map.insert("DROPINTEL_DATA_SOURCE", "replay");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DROPINTEL_DATA_SOURCE"),
            "expected InvalidEnvVar(DROPINTEL_DATA_SOURCE), got: {result:?}"
        );
    }

    #[test]
    fn static_source_gets_static_results_path() {
        let mut map = full_env();
        map.insert("DROPINTEL_DATA_SOURCE", "static");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.results_path, "dropintel_run_static.json");
    }

    #[test]
    fn explicit_results_path_wins() {
        let mut map = full_env();
        map.insert("DROPINTEL_RESULTS_PATH", "/tmp/out.json");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.results_path, "/tmp/out.json");
    }

    #[test]
    fn supabase_settings_are_picked_up_when_present() {
        let mut map = full_env();
        map.insert("SUPABASE_URL", "https://abc.supabase.co");
        map.insert("SUPABASE_ANON_KEY", "anon-key");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.supabase_url.as_deref(), Some("https://abc.supabase.co"));
        assert_eq!(cfg.supabase_key.as_deref(), Some("anon-key"));
    }

    #[test]
    fn request_timeout_override() {
        let mut map = full_env();
        map.insert("DROPINTEL_REQUEST_TIMEOUT_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 60);
    }

    #[test]
    fn request_timeout_invalid() {
        let mut map = full_env();
        map.insert("DROPINTEL_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DROPINTEL_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(DROPINTEL_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut map = full_env();
        map.insert("SUPABASE_ANON_KEY", "anon-key");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("hunter2"), "password leaked: {rendered}");
        assert!(!rendered.contains("anon-key"), "supabase key leaked: {rendered}");
        assert!(rendered.contains("[redacted]"));
    }
}
