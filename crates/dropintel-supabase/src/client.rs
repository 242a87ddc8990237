//! HTTP client for Supabase's PostgREST API.
//!
//! Only the `intelligence_dossiers` table is touched: one upsert per
//! dossier, keyed on `product_id`, replacing the stored row on conflict.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Serialize;

use dropintel_dossier::Dossier;

use crate::error::SupabaseError;

const DOSSIERS_TABLE: &str = "intelligence_dossiers";

/// Client for the Supabase PostgREST API.
///
/// Authenticates with the project's anon key via the `apikey` and
/// `Authorization: Bearer` headers. Point `base_url` at a mock server
/// in tests.
pub struct SupabaseClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

/// One row of the `intelligence_dossiers` table: unique `product_id`
/// key, the dossier as a JSON blob, and the write timestamp.
#[derive(Debug, Serialize)]
struct DossierRow<'a> {
    product_id: &'a str,
    dossier: &'a Dossier,
    created_at: DateTime<Utc>,
}

impl SupabaseClient {
    /// Creates a client for the given Supabase project URL and anon key.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SupabaseError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, SupabaseError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("dropintel/0.1 (market-intelligence)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so
        // joining writes below the project root rather than replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SupabaseError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_owned(),
        })
    }

    /// Upserts one dossier, keyed by `product_id`.
    ///
    /// On conflict the stored row is replaced (last write wins, no
    /// versioning), via PostgREST's `on_conflict` target and the
    /// `merge-duplicates` preference.
    ///
    /// # Errors
    ///
    /// - [`SupabaseError::UnexpectedStatus`] — PostgREST rejected the write.
    /// - [`SupabaseError::Http`] — network or TLS failure.
    pub async fn upsert_dossier(&self, dossier: &Dossier) -> Result<(), SupabaseError> {
        let mut url = self
            .base_url
            .join(&format!("rest/v1/{DOSSIERS_TABLE}"))
            .map_err(|e| SupabaseError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("on_conflict", "product_id");

        let row = DossierRow {
            product_id: &dossier.product_id,
            dossier,
            created_at: Utc::now(),
        };

        let response = self
            .client
            .post(url.clone())
            .header("apikey", &self.api_key)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&row)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SupabaseError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        tracing::debug!(product_id = %dossier.product_id, "dossier upserted");
        Ok(())
    }
}
