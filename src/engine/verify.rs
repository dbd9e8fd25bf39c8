// * Redirect-chain assertions.
// * Every check returns a VerifyError describing expected vs. actual
// * instead of panicking, so the same checks serve tests and the suite runner.

use crate::config::constants::{MODE_SWITCH_STATUS, TEST_CONTROL_PARAM};
use crate::engine::normalization::{normalize_location, strip_host, NormalizedUrl, UrlError};
use crate::network::client::ProbeResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("missing redirect: expected a {expected} hop, got a direct {actual} response")]
    MissingRedirect { expected: u16, actual: u16 },

    #[error("unexpected status: expected {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },

    #[error("redirect target mismatch: expected {expected:?}, got {actual:?}")]
    LocationMismatch { expected: String, actual: String },

    #[error("final URL mismatch: expected {expected:?}, got {actual:?}")]
    FinalUrlMismatch { expected: String, actual: String },

    #[error("unexpected redirect: {hops} hop(s), first to {first:?}")]
    UnexpectedRedirect { hops: usize, first: String },

    #[error(transparent)]
    Url(#[from] UrlError),
}

// * What a case expects from the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expectation {
    // * First hop is a 303 whose normalized Location equals `location`
    SeeOther { location: String },
    // * Ends in 200 at the requested URL
    Served,
    // * 200 with no redirect at all
    Direct,
}

// * First hop must be a mode switch (303) to `expected`.
// * On the observed side the test-control parameter is ignored, and so is the
// * host when it is the probed host; query order is ignored on both sides.
pub fn verify_redirect(result: &ProbeResult, expected: &str) -> Result<(), VerifyError> {
    let hop = result
        .first_redirect()
        .ok_or(VerifyError::MissingRedirect {
            expected: MODE_SWITCH_STATUS,
            actual: result.final_status_code,
        })?;

    if hop.status_code != MODE_SWITCH_STATUS {
        return Err(VerifyError::UnexpectedStatus {
            expected: MODE_SWITCH_STATUS,
            actual: hop.status_code,
        });
    }

    let origin = Url::parse(&result.requested_url).map_err(|source| UrlError::Parse {
        input: result.requested_url.clone(),
        source,
    })?;
    let observed = normalize_location(&hop.location, TEST_CONTROL_PARAM, &origin)?;
    let wanted = NormalizedUrl::parse(expected)?.without_host();

    if observed != wanted {
        return Err(VerifyError::LocationMismatch {
            expected: wanted.to_string(),
            actual: observed.to_string(),
        });
    }

    Ok(())
}

// * Request must end in 200 at the very URL that was asked for.
pub fn verify_served(result: &ProbeResult, requested_path: &str) -> Result<(), VerifyError> {
    verify_status(result, 200)?;

    let actual = strip_host(&result.final_url)?;
    let same = NormalizedUrl::parse(&actual)? == NormalizedUrl::parse(requested_path)?;
    if !same {
        return Err(VerifyError::FinalUrlMismatch {
            expected: requested_path.to_string(),
            actual,
        });
    }

    Ok(())
}

// * Request must be answered with 200 without any redirect.
pub fn verify_direct(result: &ProbeResult) -> Result<(), VerifyError> {
    if result.was_redirected() {
        return Err(VerifyError::UnexpectedRedirect {
            hops: result.history.len(),
            first: result.history[0].location.clone(),
        });
    }
    verify_status(result, 200)
}

pub fn verify_status(result: &ProbeResult, expected: u16) -> Result<(), VerifyError> {
    if result.final_status_code != expected {
        return Err(VerifyError::UnexpectedStatus {
            expected,
            actual: result.final_status_code,
        });
    }
    Ok(())
}

pub fn verify(
    result: &ProbeResult,
    requested_path: &str,
    expectation: &Expectation,
) -> Result<(), VerifyError> {
    match expectation {
        Expectation::SeeOther { location } => verify_redirect(result, location),
        Expectation::Served => verify_served(result, requested_path),
        Expectation::Direct => verify_direct(result),
    }
}
