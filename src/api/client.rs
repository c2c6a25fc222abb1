use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use super::error::{ApiFault, RequestError};
use super::params::{Pager, ParamList};
use super::retry::{RetryConfig, RetryPolicy};
use crate::config::Profile;

/// Authenticated client for one account, with connection pooling.
///
/// A client is bound to a single partner (account) and carries the KS
/// obtained at construction; cross-account commands hold two clients.
pub struct PlatformClient {
    service_url: String,
    partner_id: i64,
    ks: String,
    http_client: reqwest::Client,
    retry: RetryPolicy,
}

fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .timeout(Duration::from_secs(120))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("mediactl/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to build HTTP client")
}

impl PlatformClient {
    /// Open an admin session for the given profile and return a ready
    /// client. The KS is obtained once and reused for every call.
    pub async fn connect(profile: &Profile) -> Result<Self> {
        Self::connect_with_retry(profile, RetryConfig::default()).await
    }

    pub async fn connect_with_retry(profile: &Profile, retry: RetryConfig) -> Result<Self> {
        let mut client = Self {
            service_url: profile.service_url.trim_end_matches('/').to_string(),
            partner_id: profile.partner_id,
            ks: String::new(),
            http_client: build_http_client(),
            retry: RetryPolicy::new(retry),
        };

        let params = ParamList::new()
            .set("secret", &profile.admin_secret)
            .set("userId", &profile.user_id)
            .set("type", super::SESSION_TYPE_ADMIN)
            .set("partnerId", profile.partner_id)
            .set("expiry", profile.session_expiry)
            .set("privileges", &profile.privileges);

        let response = client
            .dispatch("session", "start", params)
            .await
            .map_err(anyhow::Error::from)
            .with_context(|| {
                format!("session.start failed against {}", client.service_url)
            })?;

        client.ks = response
            .as_str()
            .context("session.start did not return a session token")?
            .to_string();

        debug!("Opened admin session for partner {}", profile.partner_id);
        Ok(client)
    }

    pub fn partner_id(&self) -> i64 {
        self.partner_id
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Shared HTTP client for plain-URL fetches (cheap clone).
    pub fn http_client(&self) -> reqwest::Client {
        self.http_client.clone()
    }

    /// Issue one `service.action` call with the session token attached.
    /// Transient failures are retried per the client's retry policy.
    pub async fn request(&self, service: &str, action: &str, params: ParamList) -> Result<Value> {
        let params = ParamList::new().set("ks", &self.ks).extend(params);
        match self.dispatch(service, action, params).await {
            Ok(value) => Ok(value),
            Err(RequestError::Fault(fault)) => Err(anyhow::Error::new(fault)),
            Err(other) => Err(anyhow::Error::new(other)),
        }
    }

    /// `request` plus deserialization into a typed object.
    pub async fn call<T: DeserializeOwned>(
        &self,
        service: &str,
        action: &str,
        params: ParamList,
    ) -> Result<T> {
        let value = self.request(service, action, params).await?;
        serde_json::from_value(value)
            .with_context(|| format!("unexpected response shape from {}.{}", service, action))
    }

    /// Paginate a list action until a page comes back short or empty.
    ///
    /// `cap` bounds the total number of objects fetched; reporting commands
    /// pass [`super::MAX_MATCHES`] and treat hitting it as an error upstream.
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        service: &str,
        action: &str,
        base: ParamList,
        page_size: u32,
        cap: Option<usize>,
    ) -> Result<Vec<T>> {
        let mut collected = Vec::new();
        let mut pager = Pager::with_page_size(page_size);

        loop {
            let params = base.clone().nest("pager", pager.to_params());
            let page: super::models::ListResponse<T> =
                self.call(service, action, params).await?;

            let page_len = page.objects.len();
            collected.extend(page.objects);

            if page_len < pager.page_size as usize || page_len == 0 {
                break;
            }
            if let Some(cap) = cap {
                if collected.len() >= cap {
                    break;
                }
            }
            pager.page_index += 1;
        }

        Ok(collected)
    }

    /// Raw round trip: POST the form, decode JSON, unwrap fault envelopes.
    async fn dispatch(
        &self,
        service: &str,
        action: &str,
        params: ParamList,
    ) -> Result<Value, RequestError> {
        let url = format!("{}/api_v3/", self.service_url);

        self.retry
            .execute(|| async {
                let mut form: Vec<(&str, String)> = vec![
                    ("service", service.to_string()),
                    ("action", action.to_string()),
                    // format=1 selects JSON responses
                    ("format", "1".to_string()),
                ];
                for (key, value) in params.entries() {
                    form.push((key.as_str(), value.clone()));
                }

                debug!("POST {} {}.{}", url, service, action);
                let response = self
                    .http_client
                    .post(&url)
                    .form(&form)
                    .send()
                    .await
                    .map_err(RequestError::Transport)?
                    .error_for_status()
                    .map_err(RequestError::Transport)?;

                let body: Value = response.json().await.map_err(RequestError::Decode)?;

                if let Some(fault) = ApiFault::from_response(&body) {
                    return Err(RequestError::Fault(fault));
                }
                Ok(body)
            })
            .await
    }
}

/// Pull a vendor fault back out of an `anyhow` chain, if the error was one.
pub fn as_fault(err: &anyhow::Error) -> Option<&ApiFault> {
    err.downcast_ref::<ApiFault>()
}
