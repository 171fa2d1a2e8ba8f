//! Whole-string URL syntax validation.
//!
//! # Grammar Reference
//!
//! ```abnf
//! url       = [ scheme "://" ] authority path [ "?" query ] [ "#" fragment ]
//! authority = [ userinfo "@" ] host [ ":" port ]
//! host      = ipv4-address / "[" ipv6 "]" / domain
//! domain    = *( label "." ) label "." tld-label
//! port      = 1*5DIGIT
//! ```
//!
//! Unlike extraction, validation looks at one candidate string as a whole
//! and reports which component failed. It does not normalize anything.

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;

use regex::Regex;
use tracing::trace;

use crate::config::UrlValidationOptions;
use crate::error::{PatternError, UrlSyntaxError, UrlSyntaxErrorKind};
use crate::patterns::PatternSet;

/// The host of a validated authority.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Host {
    /// A domain name, as written (e.g., "example.com" or "例え.jp")
    Domain(String),
    /// An IPv4 address (e.g., "192.168.1.1")
    Ipv4(Ipv4Addr),
    /// The text between the brackets of an IPv6 literal (e.g., `::1`)
    Ipv6(String),
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(d) => write!(f, "{d}"),
            Self::Ipv4(ip) => write!(f, "{ip}"),
            Self::Ipv6(ip) => write!(f, "[{ip}]"),
        }
    }
}

/// A validated authority: optional userinfo, host and optional port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Authority {
    userinfo: Option<String>,
    host: Host,
    port: Option<u32>,
}

impl Authority {
    /// Returns the userinfo before the `@`, if any.
    #[must_use]
    pub fn userinfo(&self) -> Option<&str> {
        self.userinfo.as_deref()
    }

    /// Returns the host.
    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.host
    }

    /// Returns the port, if any.
    #[must_use]
    pub const fn port(&self) -> Option<u32> {
        self.port
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(userinfo) = &self.userinfo {
            write!(f, "{userinfo}@")?;
        }
        write!(f, "{}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

/// A URL whose every component matched its grammar.
///
/// # Examples
///
/// ```
/// use social_entities::{Host, UrlSyntaxValidator, UrlValidationOptions};
///
/// let validator = UrlSyntaxValidator::new().unwrap();
/// let url = validator
///     .validate("https://example.com:8443/a/b?x=1#top", UrlValidationOptions::default())
///     .unwrap();
/// assert_eq!(url.scheme(), Some("https"));
/// assert_eq!(url.authority().host(), &Host::Domain("example.com".to_string()));
/// assert_eq!(url.authority().port(), Some(8443));
/// assert_eq!(url.path(), "/a/b");
/// assert_eq!(url.query(), Some("x=1"));
/// assert_eq!(url.fragment(), Some("top"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidatedUrl {
    scheme: Option<String>,
    authority: Authority,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl ValidatedUrl {
    /// Returns the scheme, without `://`.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Returns the authority.
    #[must_use]
    pub const fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Returns the path; empty when the URL has none.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query, without `?`.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the fragment, without `#`.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}://")?;
        }
        write!(f, "{}{}", self.authority, self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

/// Validates whole URL strings against RFC 3986-style grammars.
#[derive(Debug, Clone)]
pub struct UrlSyntaxValidator {
    patterns: Arc<PatternSet>,
}

impl UrlSyntaxValidator {
    /// Creates a validator over the shared built-in pattern set.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` if the built-in pattern set cannot be built.
    pub fn new() -> Result<Self, PatternError> {
        Ok(Self::with_patterns(PatternSet::shared()?))
    }

    /// Creates a validator over an explicit pattern set.
    #[must_use]
    pub const fn with_patterns(patterns: Arc<PatternSet>) -> Self {
        Self { patterns }
    }

    /// Returns true if `url` validates under `options`.
    #[must_use]
    pub fn is_valid(&self, url: &str, options: UrlValidationOptions) -> bool {
        self.validate(url, options).is_ok()
    }

    /// Validates `url` and splits it into components.
    ///
    /// # Errors
    ///
    /// Returns `UrlSyntaxError` naming the first component that failed:
    /// - the input is empty
    /// - the input cannot be split into components
    /// - the scheme is missing or not `http`/`https` when one is required
    /// - the authority, path, query or fragment does not match its grammar
    pub fn validate(
        &self,
        url: &str,
        options: UrlValidationOptions,
    ) -> Result<ValidatedUrl, UrlSyntaxError> {
        if url.is_empty() {
            return Err(UrlSyntaxError::new(url, UrlSyntaxErrorKind::Empty));
        }
        let syntax = &self.patterns.url_syntax;
        let fail = |kind| {
            trace!(url, ?kind, "url failed validation");
            UrlSyntaxError::new(url, kind)
        };

        let caps = syntax
            .unencoded
            .captures(url)
            .ok_or_else(|| fail(UrlSyntaxErrorKind::Malformed))?;
        let scheme = caps.name("scheme").map(|m| m.as_str());
        let authority = caps.name("authority").map_or("", |m| m.as_str());
        let path = caps.name("path").map_or("", |m| m.as_str());
        let query = caps.name("query").map(|m| m.as_str());
        let fragment = caps.name("fragment").map(|m| m.as_str());

        let scheme_ok = match scheme {
            Some(s) => {
                syntax.scheme.is_match(s)
                    && (!options.require_protocol
                        || s.eq_ignore_ascii_case("http")
                        || s.eq_ignore_ascii_case("https"))
            }
            None => !options.require_protocol,
        };
        if !scheme_ok {
            return Err(fail(UrlSyntaxErrorKind::InvalidScheme {
                found: scheme.map(str::to_string),
            }));
        }

        let authority = self
            .authority(authority, options.unicode_domains)
            .ok_or_else(|| {
                fail(UrlSyntaxErrorKind::InvalidAuthority {
                    authority: authority.to_string(),
                })
            })?;

        if !syntax.path.is_match(path) {
            return Err(fail(UrlSyntaxErrorKind::InvalidPath {
                path: path.to_string(),
            }));
        }
        if let Some(q) = query.filter(|q| !syntax.query.is_match(q)) {
            return Err(fail(UrlSyntaxErrorKind::InvalidQuery {
                query: q.to_string(),
            }));
        }
        if let Some(f) = fragment.filter(|f| !syntax.fragment.is_match(f)) {
            return Err(fail(UrlSyntaxErrorKind::InvalidFragment {
                fragment: f.to_string(),
            }));
        }

        Ok(ValidatedUrl {
            scheme: scheme.map(str::to_string),
            authority,
            path: path.to_string(),
            query: query.map(str::to_string),
            fragment: fragment.map(str::to_string),
        })
    }

    /// Validates an authority on its own.
    ///
    /// # Errors
    ///
    /// Returns `UrlSyntaxError` with `InvalidAuthority` if the userinfo,
    /// host or port does not match its grammar.
    pub fn validate_authority(
        &self,
        authority: &str,
        unicode: bool,
    ) -> Result<Authority, UrlSyntaxError> {
        self.authority(authority, unicode).ok_or_else(|| {
            UrlSyntaxError::new(
                authority,
                UrlSyntaxErrorKind::InvalidAuthority {
                    authority: authority.to_string(),
                },
            )
        })
    }

    /// Validates an IP literal or ASCII domain.
    ///
    /// # Errors
    ///
    /// Returns `UrlSyntaxError` with `InvalidAuthority` if `host` does not
    /// match the host grammar.
    pub fn validate_host(&self, host: &str) -> Result<Host, UrlSyntaxError> {
        Self::host(&self.patterns.url_syntax.host, host)
    }

    /// Validates an IP literal or internationalized domain.
    ///
    /// # Errors
    ///
    /// Returns `UrlSyntaxError` with `InvalidAuthority` if `host` does not
    /// match the internationalized host grammar.
    pub fn validate_unicode_host(&self, host: &str) -> Result<Host, UrlSyntaxError> {
        Self::host(&self.patterns.url_syntax.unicode_host, host)
    }

    fn authority(&self, authority: &str, unicode: bool) -> Option<Authority> {
        let syntax = &self.patterns.url_syntax;
        let re = if unicode {
            &syntax.unicode_authority
        } else {
            &syntax.authority
        };
        let caps = re.captures(authority)?;
        let port = match caps.name("port") {
            Some(m) => Some(m.as_str().parse::<u32>().ok()?),
            None => None,
        };
        Some(Authority {
            userinfo: caps.name("userinfo").map(|m| m.as_str().to_string()),
            host: classify_host(caps.name("host")?.as_str()),
            port,
        })
    }

    fn host(re: &Regex, host: &str) -> Result<Host, UrlSyntaxError> {
        if re.is_match(host) {
            Ok(classify_host(host))
        } else {
            Err(UrlSyntaxError::new(
                host,
                UrlSyntaxErrorKind::InvalidAuthority {
                    authority: host.to_string(),
                },
            ))
        }
    }
}

/// Sorts a host that already matched the host grammar into its kind.
fn classify_host(host: &str) -> Host {
    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        return Host::Ipv6(inner.to_string());
    }
    host.parse::<Ipv4Addr>()
        .map_or_else(|_| Host::Domain(host.to_string()), Host::Ipv4)
}
