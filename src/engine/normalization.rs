use std::fmt;
use thiserror::Error;
use url::{form_urlencoded, Url};

// * Normalizes redirect targets so observed and expected URLs compare cleanly.
// *
// * Logic:
// * 1. Validate with the url crate (relative references against a placeholder base).
// * 2. Split the raw input into prefix, path, query and fragment.
// * 3. Decode the query into ordered (key, value) pairs.
// * 4. Drop the test-control parameter by exact key match (never by pattern).
// * 5. Re-encode the rest as application/x-www-form-urlencoded (space -> '+')
// *    and splice it back between the untouched path and fragment.

// * Placeholder base for relative references. Never leaves this module.
const RELATIVE_BASE: &str = "http://relative.invalid/";

#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Malformed URL {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },
}

// * Shape of the input reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefKind {
    Absolute,
    // * "//host/path"
    NetworkPath,
    // * "/path"
    PathAbsolute,
    // * "path"
    PathRelative,
}

struct ParsedRef {
    url: Url,
    kind: RefKind,
}

impl ParsedRef {
    fn parse(input: &str) -> Result<Self, UrlError> {
        let parse_err = |source| UrlError::Parse {
            input: input.to_string(),
            source,
        };

        match Url::parse(input) {
            Ok(url) => Ok(Self {
                url,
                kind: RefKind::Absolute,
            }),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(RELATIVE_BASE).map_err(parse_err)?;
                let url = base.join(input).map_err(parse_err)?;
                let kind = if input.starts_with("//") {
                    RefKind::NetworkPath
                } else if input.starts_with('/') {
                    RefKind::PathAbsolute
                } else {
                    RefKind::PathRelative
                };
                Ok(Self { url, kind })
            }
            Err(source) => Err(parse_err(source)),
        }
    }
}

// * The input split into its raw components, without any re-serialization.
// * Components are borrowed verbatim so only the replaced part ever changes.
struct RawParts<'a> {
    // * "scheme:" or "scheme://authority", empty for path references
    prefix: &'a str,
    path: &'a str,
    query: Option<&'a str>,
    // * Includes the leading '#'
    fragment: &'a str,
}

impl<'a> RawParts<'a> {
    fn split(input: &'a str) -> Self {
        let (rest, fragment) = match input.find('#') {
            Some(i) => input.split_at(i),
            None => (input, ""),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((before, q)) => (before, Some(q)),
            None => (rest, None),
        };

        let scheme_len = scheme_len(rest);
        let after_scheme = &rest[scheme_len..];
        let authority_len = match after_scheme.strip_prefix("//") {
            Some(auth) => 2 + auth.find('/').unwrap_or(auth.len()),
            None => 0,
        };
        let (prefix, path) = rest.split_at(scheme_len + authority_len);

        Self {
            prefix,
            path,
            query,
            fragment,
        }
    }
}

// * Length of "scheme:" at the start of `s`, 0 when there is none.
fn scheme_len(s: &str) -> usize {
    let Some(colon) = s.find(|c: char| matches!(c, ':' | '/' | '?' | '#')) else {
        return 0;
    };
    let scheme = &s[..colon];
    let valid = s[colon..].starts_with(':')
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if valid {
        colon + 1
    } else {
        0
    }
}

// * Removes every `param_name` pair from the query of `url`.
// * Only the query is rewritten; everything around it is kept byte-for-byte.
// * Returns the input untouched when the parameter is absent.
pub fn strip_param(url: &str, param_name: &str) -> Result<String, UrlError> {
    ParsedRef::parse(url)?;
    let parts = RawParts::split(url);

    let Some(query) = parts.query else {
        return Ok(url.to_string());
    };
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    if !pairs.iter().any(|(k, _)| k == param_name) {
        return Ok(url.to_string());
    }

    let kept = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().filter(|(k, _)| k != param_name))
        .finish();

    let mut out = String::with_capacity(url.len());
    out.push_str(parts.prefix);
    out.push_str(parts.path);
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept);
    }
    out.push_str(parts.fragment);
    Ok(out)
}

// * Drops scheme and authority, leaving path + query + fragment verbatim.
// * Never yields a protocol-relative "//..." string.
pub fn strip_host(url: &str) -> Result<String, UrlError> {
    ParsedRef::parse(url)?;
    let parts = RawParts::split(url);

    let mut out = collapse_leading_slashes(parts.path);
    if let Some(query) = parts.query {
        out.push('?');
        out.push_str(query);
    }
    out.push_str(parts.fragment);
    Ok(out)
}

fn collapse_leading_slashes(s: &str) -> String {
    if s.starts_with("//") {
        format!("/{}", s.trim_start_matches('/'))
    } else {
        s.to_string()
    }
}

// * Lowercased host plus port when non-default
fn authority(url: &Url) -> Option<String> {
    url.host_str().map(|h| match url.port() {
        Some(port) => format!("{}:{}", h, port),
        None => h.to_string(),
    })
}

// * Comparable URL: query kept as a sorted multiset of decoded pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    pub scheme: Option<String>,
    // * Host with port when non-default
    pub host: Option<String>,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub fragment: Option<String>,
}

impl NormalizedUrl {
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        let parsed = ParsedRef::parse(input)?;
        let url = &parsed.url;

        let (scheme, host) = match parsed.kind {
            RefKind::Absolute => (Some(url.scheme().to_string()), authority(url)),
            RefKind::NetworkPath => (None, authority(url)),
            RefKind::PathAbsolute | RefKind::PathRelative => (None, None),
        };

        let path = match parsed.kind {
            RefKind::PathRelative => url.path().trim_start_matches('/').to_string(),
            _ => url.path().to_string(),
        };

        let mut query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        query.sort();

        Ok(Self {
            scheme,
            host,
            path,
            query,
            fragment: url.fragment().map(str::to_string),
        })
    }

    pub fn without_param(mut self, param_name: &str) -> Self {
        self.query.retain(|(k, _)| k != param_name);
        self
    }

    pub fn without_host(mut self) -> Self {
        self.scheme = None;
        self.host = None;
        self.path = collapse_leading_slashes(&self.path);
        self
    }

    // * True for references without a host and for hosts equal to `origin`'s.
    pub fn is_same_site(&self, origin: &Url) -> bool {
        match &self.host {
            None => true,
            Some(host) => authority(origin).as_deref() == Some(host.as_str()),
        }
    }

    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{}:", scheme)?;
        }
        if let Some(host) = &self.host {
            write!(f, "//{}", host)?;
        }
        write!(f, "{}", self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query_string())?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

// * Observed `Location` -> comparable target: test parameter removed, and the
// * scheme/host removed only when they point back at `origin`. An off-site
// * target keeps its host so it can never equal a bare path.
pub fn normalize_location(
    location: &str,
    param_name: &str,
    origin: &Url,
) -> Result<NormalizedUrl, UrlError> {
    let normalized = NormalizedUrl::parse(location)?.without_param(param_name);
    if normalized.is_same_site(origin) {
        Ok(normalized.without_host())
    } else {
        Ok(normalized)
    }
}
