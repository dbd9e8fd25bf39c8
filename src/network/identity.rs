use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

// * IdentityProfile pins the client a probe presents as.
// * A desktop identity keeps server-side device detection on the standard
// * site, so only the test-control parameter can trigger mobile mode.
pub struct IdentityProfile {
    pub user_agent: String,
    pub accept: &'static str,
    pub accept_language: &'static str,
}

impl IdentityProfile {
    // * Desktop Chrome on Windows.
    pub fn desktop() -> Self {
        let full_version = "120.0.6099.109";

        Self {
            user_agent: format!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
                full_version
            ),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            accept_language: "en-US,en;q=0.9",
        }
    }

    // * Applies the profile to a mutable HeaderMap.
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) {
        if let Ok(ua) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, ua);
        }
        headers.insert(ACCEPT, HeaderValue::from_static(self.accept));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(self.accept_language));
    }

    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.apply_to_headers(&mut headers);
        headers
    }
}
