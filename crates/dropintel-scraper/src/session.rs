//! Authenticated portal session over HTTP.
//!
//! A cookie-holding `reqwest` client that submits the login form and
//! pulls down the listing page. Each request is bounded by the
//! configured timeout; there is no internal retry — retrying is the
//! orchestrator's call.

use std::time::Duration;

use reqwest::{Client, Url};
use scraper::{ElementRef, Html};

use dropintel_core::Credentials;

use crate::error::PortalError;
use crate::selectors::login;

/// HTTP session against the Dropi portal. Login state lives in the
/// client's cookie store, so the same session must perform both the
/// login and the listing fetch.
pub struct PortalSession {
    client: Client,
}

/// The login `<form>` as found on the page: resolved submit target plus
/// any hidden inputs that must accompany the credentials.
#[derive(Debug)]
struct LoginForm {
    action: String,
    hidden_fields: Vec<(String, String)>,
}

impl PortalSession {
    /// Creates a session with configured timeout and `User-Agent`, and
    /// an enabled cookie store.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, PortalError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }

    /// Logs in through the portal's email/password form.
    ///
    /// Fetches the login page, requires the email input, password input,
    /// and submit button to be present, then POSTs the credentials (plus
    /// the form's hidden inputs) to the form's resolved action.
    ///
    /// # Errors
    ///
    /// - [`PortalError::NavigationTimeout`] — page load or submit exceeded the timeout.
    /// - [`PortalError::ElementNotFound`] — the login form is missing an expected field.
    /// - [`PortalError::UnexpectedStatus`] — the portal rejected the submission.
    /// - [`PortalError::Http`] — other network or TLS failure.
    pub async fn login(
        &self,
        login_url: &str,
        credentials: &Credentials,
    ) -> Result<(), PortalError> {
        tracing::info!(url = %login_url, "logging in to portal");
        let page = self.get_text(login_url).await?;
        let form = parse_login_form(&page, login_url)?;

        let mut fields = form.hidden_fields;
        fields.push(("email".to_string(), credentials.username.clone()));
        fields.push(("password".to_string(), credentials.password.clone()));

        let response = self
            .client
            .post(&form.action)
            .form(&fields)
            .send()
            .await
            .map_err(|e| classify(e, &form.action))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::UnexpectedStatus {
                status: status.as_u16(),
                url: form.action,
            });
        }
        // Drain the post-submit body so the redirect chain settles before
        // the caller navigates on.
        response.text().await.map_err(|e| classify(e, &form.action))?;
        tracing::info!("login successful");
        Ok(())
    }

    /// Fetches the listing page and returns its HTML.
    ///
    /// # Errors
    ///
    /// - [`PortalError::NavigationTimeout`] — the page load exceeded the timeout.
    /// - [`PortalError::UnexpectedStatus`] — non-2xx response.
    /// - [`PortalError::Http`] — other network or TLS failure.
    pub async fn fetch_listing(&self, url: &str) -> Result<String, PortalError> {
        tracing::info!(url = %url, "fetching product listing");
        self.get_text(url).await
    }

    async fn get_text(&self, url: &str) -> Result<String, PortalError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(e, url))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        response.text().await.map_err(|e| classify(e, url))
    }
}

/// Timeouts are the bounded-wait failure; everything else stays an HTTP error.
fn classify(err: reqwest::Error, url: &str) -> PortalError {
    if err.is_timeout() {
        PortalError::NavigationTimeout {
            url: url.to_owned(),
        }
    } else {
        PortalError::Http(err)
    }
}

/// Locates the login form and its required fields in the fetched page.
///
/// A relative form action resolves against the login URL; a form without
/// an action (or no surrounding `<form>` at all) posts back to the login
/// URL with no hidden fields.
fn parse_login_form(html: &str, login_url: &str) -> Result<LoginForm, PortalError> {
    let doc = Html::parse_document(html);

    let email = require_element(&doc, &login::EMAIL_INPUT, login::EMAIL_INPUT_PATTERN)?;
    require_element(&doc, &login::PASSWORD_INPUT, login::PASSWORD_INPUT_PATTERN)?;
    require_element(&doc, &login::SUBMIT_BUTTON, login::SUBMIT_BUTTON_PATTERN)?;

    let form = email
        .ancestors()
        .find_map(|node| ElementRef::wrap(node).filter(|el| el.value().name() == "form"));

    let (action, hidden_fields) = match form {
        Some(form_el) => {
            let hidden = form_el
                .select(&login::HIDDEN_INPUT)
                .filter_map(|input| {
                    let value = input.value();
                    let name = value.attr("name")?;
                    Some((
                        name.to_string(),
                        value.attr("value").unwrap_or_default().to_string(),
                    ))
                })
                .collect();
            let action = form_el
                .value()
                .attr("action")
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_owned);
            (action, hidden)
        }
        None => (None, Vec::new()),
    };

    let action = match action {
        Some(raw) => Url::parse(login_url)
            .and_then(|base| base.join(&raw))
            .map_err(|e| PortalError::InvalidUrl {
                url: raw,
                reason: e.to_string(),
            })?
            .to_string(),
        None => login_url.to_string(),
    };

    Ok(LoginForm {
        action,
        hidden_fields,
    })
}

fn require_element<'a>(
    doc: &'a Html,
    selector: &scraper::Selector,
    pattern: &str,
) -> Result<ElementRef<'a>, PortalError> {
    doc.select(selector)
        .next()
        .ok_or_else(|| PortalError::ElementNotFound {
            selector: pattern.to_string(),
        })
}
