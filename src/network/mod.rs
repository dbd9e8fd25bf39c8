pub mod client;
pub mod cookies;
pub mod errors;
pub mod identity;

pub use client::{ProbeRequest, ProbeResult, RedirectHop, RedirectProber};
pub use cookies::{CookieError, CookiePolicy, CookiePreset, SiteMode};
pub use errors::ProbeError;
