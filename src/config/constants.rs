// * Configuration Constants
// * Central location for defaults, thresholds and timeouts

// * Default target front end
pub const DEFAULT_BASE_URL: &str = "http://dev.ncbi.nlm.nih.gov/";

// * Query parameter that forces mobile detection server-side.
// * Only meaningful to tests; stripped before comparing redirect targets.
pub const TEST_CONTROL_PARAM: &str = "p$mobile";

// * Cookie carrying the explicit site mode preference
pub const MODE_COOKIE: &str = "ncbi_mmode";

// * Query flag that overrides the mode cookie (same name as the cookie)
pub const MODE_FLAG_PARAM: &str = "ncbi_mmode";

// * Per-request timeout in milliseconds
pub const REQUEST_TIMEOUT_MS: u64 = 10_000;

// * Maximum redirect hops followed before giving up
pub const MAX_REDIRECTS: usize = 10;

// * Status the front end answers a mode switch with
pub const MODE_SWITCH_STATUS: u16 = 303;
