use crate::config::constants::MODE_COOKIE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CookieError {
    #[error("invalid cookie name {0:?}")]
    InvalidName(String),

    #[error("invalid value for cookie {name}: {value:?}")]
    InvalidValue { name: String, value: String },
}

// * Site rendering mode, as carried by the mode cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteMode {
    Mobile,
    Standard,
}

impl SiteMode {
    // * Wire value of the mode cookie / flag
    pub fn as_cookie_value(&self) -> &'static str {
        match self {
            SiteMode::Mobile => "mob",
            SiteMode::Standard => "std",
        }
    }

    pub fn from_cookie_value(value: &str) -> Option<Self> {
        match value {
            "mob" => Some(SiteMode::Mobile),
            "std" => Some(SiteMode::Standard),
            _ => None,
        }
    }
}

// * Explicit set of cookies attached to a probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookiePreset {
    pairs: Vec<(String, String)>,
}

impl CookiePreset {
    pub fn new() -> Self {
        Self::default()
    }

    // * Adds or replaces a cookie. Names must be RFC 6265 tokens and values
    // * cookie-octets, so nothing can smuggle extra pairs or attributes into
    // * the Cookie header or the jar seed.
    pub fn with(mut self, name: &str, value: &str) -> Result<Self, CookieError> {
        if name.is_empty() || !name.bytes().all(is_token_byte) {
            return Err(CookieError::InvalidName(name.to_string()));
        }
        if !value.bytes().all(is_cookie_octet) {
            return Err(CookieError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            });
        }

        match self.pairs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.pairs.push((name.to_string(), value.to_string())),
        }
        Ok(self)
    }

    pub fn for_mode(mode: SiteMode) -> Self {
        Self {
            pairs: vec![(MODE_COOKIE.to_string(), mode.as_cookie_value().to_string())],
        }
    }

    pub fn mobile() -> Self {
        Self::for_mode(SiteMode::Mobile)
    }

    pub fn standard() -> Self {
        Self::for_mode(SiteMode::Standard)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    // * Value for a `Cookie` request header: `a=1; b=2`
    pub fn header_value(&self) -> String {
        self.iter()
            .map(|(n, v)| format!("{}={}", n, v))
            .collect::<Vec<_>>()
            .join("; ")
    }

    // * `Set-Cookie` style strings for seeding a jar. Path=/ so a server
    // * Set-Cookie with the same name replaces the seeded value.
    pub fn jar_entries(&self) -> Vec<String> {
        self.iter()
            .map(|(n, v)| format!("{}={}; Path=/", n, v))
            .collect()
    }
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
}

// * %x21 / %x23-2B / %x2D-3A / %x3C-5B / %x5D-7E
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

// * How preset cookies travel along a redirect chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CookiePolicy {
    // * Per-probe jar seeded with the preset for the target host; server
    // * Set-Cookie updates it and every hop sends what matches its URL.
    #[default]
    Jar,
    // * Preset sent on the initial request only, nothing stored.
    FirstRequestOnly,
}

impl fmt::Display for CookiePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookiePolicy::Jar => write!(f, "jar"),
            CookiePolicy::FirstRequestOnly => write!(f, "first-request"),
        }
    }
}

impl FromStr for CookiePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jar" => Ok(CookiePolicy::Jar),
            "first-request" | "first_request" => Ok(CookiePolicy::FirstRequestOnly),
            other => Err(other.to_string()),
        }
    }
}
