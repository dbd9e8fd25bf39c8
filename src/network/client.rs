use crate::config::ProbeConfig;
use crate::network::cookies::{CookiePolicy, CookiePreset};
use crate::network::errors::ProbeError;
use crate::network::identity::IdentityProfile;
use crate::ops::telemetry;
use reqwest::cookie::Jar;
use reqwest::header::{COOKIE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use url::Url;

// * One logical GET: target URL plus the cookies to attach.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub url: String,
    pub cookies: Option<CookiePreset>,
}

impl ProbeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cookies: None,
        }
    }

    pub fn with_cookies(mut self, cookies: CookiePreset) -> Self {
        self.cookies = Some(cookies);
        self
    }
}

// * An intermediate 3xx response in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectHop {
    pub status_code: u16,
    // * Raw `Location` header value, unresolved
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    // * URL of the initial request; origin of `history[0]`
    pub requested_url: String,
    // * Redirect responses in the order received; empty if none
    pub history: Vec<RedirectHop>,
    pub final_status_code: u16,
    pub final_url: String,
}

impl ProbeResult {
    pub fn first_redirect(&self) -> Option<&RedirectHop> {
        self.history.first()
    }

    pub fn was_redirected(&self) -> bool {
        !self.history.is_empty()
    }
}

// * Issues GETs and records every hop of the redirect chain.
// * The underlying client never follows redirects itself (Policy::none);
// * the probe loop does, so intermediate responses stay observable.
pub struct RedirectProber {
    config: ProbeConfig,
    identity: IdentityProfile,
}

impl RedirectProber {
    pub fn new(config: ProbeConfig) -> Self {
        Self {
            config,
            identity: IdentityProfile::desktop(),
        }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    // * Resolves a site path (e.g. "/pubmed?term=cat") against the base URL.
    pub fn url_for(&self, path: &str) -> Result<Url, ProbeError> {
        Ok(self.config.base_url.join(path)?)
    }

    pub async fn probe_path(
        &self,
        path: &str,
        cookies: Option<&CookiePreset>,
    ) -> Result<ProbeResult, ProbeError> {
        let url = self.url_for(path)?;
        self.probe(url.as_str(), cookies).await
    }

    pub async fn probe_request(&self, request: &ProbeRequest) -> Result<ProbeResult, ProbeError> {
        self.probe(&request.url, request.cookies.as_ref()).await
    }

    // * Fetches `url`, following redirects up to `max_redirects`.
    pub async fn probe(
        &self,
        url: &str,
        cookies: Option<&CookiePreset>,
    ) -> Result<ProbeResult, ProbeError> {
        let started = Instant::now();
        let result = self.follow_chain(url, cookies).await;

        match &result {
            Ok(res) => {
                telemetry::record_probe_success(res.history.len());
                debug!(
                    url = url,
                    status = res.final_status_code,
                    hops = res.history.len(),
                    final_url = %res.final_url,
                    "Probe complete"
                );
            }
            Err(e) => {
                telemetry::record_probe_failure(e);
                debug!(url = url, error = %e, "Probe failed");
            }
        }
        telemetry::record_probe_duration(started.elapsed().as_secs_f64());

        result
    }

    async fn follow_chain(
        &self,
        url: &str,
        cookies: Option<&CookiePreset>,
    ) -> Result<ProbeResult, ProbeError> {
        let start = Url::parse(url)?;
        let requested_url = start.to_string();
        let client = self.build_client(&start, cookies)?;

        // * Only used under FirstRequestOnly
        let first_request_cookie = match self.config.cookie_policy {
            CookiePolicy::FirstRequestOnly => cookies
                .filter(|preset| !preset.is_empty())
                .map(CookiePreset::header_value),
            CookiePolicy::Jar => None,
        };

        let mut history: Vec<RedirectHop> = Vec::new();
        let mut current = start;

        loop {
            let mut request = client.get(current.clone());
            if history.is_empty() {
                if let Some(value) = &first_request_cookie {
                    request = request.header(COOKIE, value.as_str());
                }
            }

            let resp = request
                .send()
                .await
                .map_err(|e| ProbeError::from_send(e, current.as_str(), self.config.timeout))?;
            let status = resp.status();

            // * A 3xx without Location ends the chain like any other response.
            // * Raw UTF-8 is accepted the way reqwest's own redirect policy does.
            let location = match resp.headers().get(LOCATION) {
                Some(value) if status.is_redirection() => Some(
                    std::str::from_utf8(value.as_bytes())
                        .map(str::to_string)
                        .map_err(|_| {
                            ProbeError::InvalidLocation(
                                String::from_utf8_lossy(value.as_bytes()).into_owned(),
                            )
                        })?,
                ),
                _ => None,
            };

            let Some(location) = location else {
                return Ok(ProbeResult {
                    requested_url,
                    history,
                    final_status_code: status.as_u16(),
                    final_url: resp.url().to_string(),
                });
            };

            debug!(
                url = %current,
                status = status.as_u16(),
                location = %location,
                "Redirect hop"
            );

            if history.len() >= self.config.max_redirects {
                return Err(ProbeError::TooManyRedirects(self.config.max_redirects));
            }

            let next = current
                .join(&location)
                .map_err(|_| ProbeError::InvalidLocation(location.clone()))?;

            history.push(RedirectHop {
                status_code: status.as_u16(),
                location,
            });
            current = next;
        }
    }

    // * One client per probe: a fresh jar keeps probes independent.
    fn build_client(
        &self,
        start: &Url,
        cookies: Option<&CookiePreset>,
    ) -> Result<Client, ProbeError> {
        let mut builder = Client::builder()
            .redirect(Policy::none())
            .timeout(self.config.timeout)
            .default_headers(self.identity.headers());

        if self.config.cookie_policy == CookiePolicy::Jar {
            let jar = Arc::new(Jar::default());
            if let Some(preset) = cookies {
                for entry in preset.jar_entries() {
                    jar.add_cookie_str(&entry, start);
                }
            }
            builder = builder.cookie_provider(jar);
        }

        Ok(builder.build()?)
    }
}
