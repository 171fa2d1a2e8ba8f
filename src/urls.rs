//! URL scanning over free text.
//!
//! The head grammar finds the preceding character, optional protocol and
//! domain; the tail grammar then extends the match over port, path and
//! query. Each candidate goes through the protocol-less and host-length
//! filters before it becomes an entity. Scanning always resumes after the
//! whole candidate, whether it was kept or not.

use regex::Captures;
use tracing::trace;

use crate::constants::{ASSUMED_PROTOCOL, MAX_DNS_DOMAIN_LENGTH, MAX_DNS_LABEL_LENGTH, MAX_URL_LENGTH};
use crate::entity::{Entity, UrlFields};
use crate::patterns::PatternSet;
use crate::span::CodePointIndex;

/// A URL candidate located in the text, as byte offsets.
struct Candidate<'t> {
    before: &'t str,
    protocol: Option<&'t str>,
    start: usize,
    domain_start: usize,
    domain_end: usize,
    port: Option<&'t str>,
    path: Option<&'t str>,
    query: Option<&'t str>,
    end: usize,
}

pub(crate) struct UrlScanner<'p> {
    patterns: &'p PatternSet,
    include_protocol_less: bool,
}

impl<'p> UrlScanner<'p> {
    pub(crate) const fn new(patterns: &'p PatternSet, include_protocol_less: bool) -> Self {
        Self {
            patterns,
            include_protocol_less,
        }
    }

    pub(crate) fn scan(&self, text: &str) -> Vec<Entity> {
        let needle = if self.include_protocol_less { '.' } else { ':' };
        if !text.contains(needle) {
            return Vec::new();
        }

        let mut index = CodePointIndex::new(text);
        let mut urls = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let Some(caps) = self.patterns.url_head.captures_at(text, pos) else {
                break;
            };
            let Some(candidate) = self.candidate(text, &caps) else {
                break;
            };
            pos = candidate.end;

            let accepted = if candidate.protocol.is_some() {
                self.with_protocol(text, &candidate)
            } else {
                self.without_protocol(text, &candidate)
            };
            if let Some((end, fields)) = accepted {
                let span = index.span(candidate.start, end);
                urls.push(Entity::url(span, &text[candidate.start..end], fields));
            }
        }
        urls
    }

    fn candidate<'t>(&self, text: &'t str, caps: &Captures<'t>) -> Option<Candidate<'t>> {
        let before = caps.name("before")?.as_str();
        let protocol = caps.name("protocol");
        let domain = caps.name("domain").or_else(|| caps.name("bare_domain"))?;
        let domain_end = self
            .patterns
            .tld_followers
            .iter()
            .find_map(|&i| caps.get(i))
            .map_or(domain.end(), |follower| follower.start());

        let tail = self.patterns.url_tail.captures(&text[domain_end..]);
        let group = |name: &str| {
            tail.as_ref()
                .and_then(|t| t.name(name))
                .map(|m| &text[domain_end + m.start()..domain_end + m.end()])
        };
        let port = group("port");
        let path = group("path");
        let query = group("query");
        let tail_len = tail
            .as_ref()
            .and_then(|t| t.get(0))
            .map_or(0, |m| m.end());

        Some(Candidate {
            before,
            protocol: protocol.map(|m| m.as_str()),
            start: protocol.map_or(domain.start(), |m| m.start()),
            domain_start: domain.start(),
            domain_end,
            port,
            path,
            query,
            end: domain_end + tail_len,
        })
    }

    fn with_protocol(&self, text: &str, c: &Candidate<'_>) -> Option<(usize, UrlFields)> {
        let url = &text[c.start..c.end];
        let domain = &text[c.domain_start..c.domain_end];

        // t.co links keep only the slug.
        if let Some(tco) = self.patterns.tco_url.find(url) {
            let end = c.start + tco.end();
            if !is_valid_host_and_length(tco.as_str(), true, domain) {
                trace!(offset = c.start, "rejected t.co url: host or length");
                return None;
            }
            let fields = UrlFields {
                protocol: c.protocol.map(str::to_string),
                domain: domain.to_string(),
                port: None,
                path: Some(text[c.domain_end..end].to_string()),
                query: None,
            };
            return Some((end, fields));
        }

        if !is_valid_host_and_length(url, true, domain) {
            trace!(offset = c.start, "rejected url: host or length");
            return None;
        }
        Some((c.end, Self::fields(c, domain, true)))
    }

    fn without_protocol(&self, text: &str, c: &Candidate<'_>) -> Option<(usize, UrlFields)> {
        if !self.include_protocol_less {
            return None;
        }
        if self
            .patterns
            .invalid_protocol_less_preceding
            .is_match(c.before)
        {
            trace!(offset = c.start, "rejected protocol-less url: preceding character");
            return None;
        }

        let domain = &text[c.domain_start..c.domain_end];
        if !is_valid_host_and_length(&text[c.start..c.end], false, domain) {
            trace!(offset = c.start, "rejected protocol-less url: host or length");
            return None;
        }

        // Without a path, only the domain is kept.
        if c.path.is_some() {
            return Some((c.end, Self::fields(c, domain, true)));
        }
        if self.patterns.special_short_domain.is_match(domain)
            || !self.patterns.invalid_short_domain.is_match(domain)
        {
            return Some((c.domain_end, Self::fields(c, domain, false)));
        }
        trace!(offset = c.start, "rejected protocol-less url: bare country-code domain");
        None
    }

    fn fields(c: &Candidate<'_>, domain: &str, with_tail: bool) -> UrlFields {
        let tail = |part: Option<&str>| part.filter(|_| with_tail).map(str::to_string);
        UrlFields {
            protocol: c.protocol.map(str::to_string),
            domain: domain.to_string(),
            port: tail(c.port),
            path: tail(c.path),
            query: tail(c.query),
        }
    }
}

/// Checks the host's DNS limits and the URL's length once the host is in
/// its ASCII form.
///
/// `url` is the URL as written. A URL without protocol is measured as if
/// [`ASSUMED_PROTOCOL`] were prepended.
pub(crate) fn is_valid_host_and_length(url: &str, has_protocol: bool, host: &str) -> bool {
    let Some(ascii) = ascii_host(host) else {
        return false;
    };
    if ascii.is_empty() || ascii.len() > MAX_DNS_DOMAIN_LENGTH {
        return false;
    }
    if ascii
        .split('.')
        .any(|label| label.is_empty() || label.len() > MAX_DNS_LABEL_LENGTH)
    {
        return false;
    }

    let host_len = host.chars().count();
    let mut url_len = url.chars().count() + ascii.len().saturating_sub(host_len);
    if !has_protocol {
        url_len += ASSUMED_PROTOCOL.len();
    }
    url_len <= MAX_URL_LENGTH
}

/// Converts a host to its ASCII form, punycode-encoding unicode labels.
fn ascii_host(host: &str) -> Option<String> {
    match url::Host::parse(host) {
        Ok(url::Host::Domain(domain)) => Some(domain),
        Ok(url::Host::Ipv4(addr)) => Some(addr.to_string()),
        Ok(url::Host::Ipv6(_)) | Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str, include_protocol_less: bool) -> Vec<Entity> {
        let patterns = PatternSet::shared().unwrap();
        UrlScanner::new(&patterns, include_protocol_less).scan(text)
    }

    fn texts(entities: &[Entity]) -> Vec<&str> {
        entities.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn host_length_accepts_normal_host() {
        assert!(is_valid_host_and_length("http://example.com", true, "example.com"));
        assert!(is_valid_host_and_length("bücher.de", false, "bücher.de"));
    }

    #[test]
    fn host_length_rejects_long_label() {
        let host = format!("{}.com", "a".repeat(64));
        assert!(!is_valid_host_and_length(&host, false, &host));
        let host = format!("{}.com", "a".repeat(63));
        assert!(is_valid_host_and_length(&host, false, &host));
    }

    #[test]
    fn host_length_counts_assumed_protocol() {
        let path = "a".repeat(MAX_URL_LENGTH - "example.com/".len());
        let url = format!("example.com/{path}");
        assert_eq!(url.len(), MAX_URL_LENGTH);
        assert!(is_valid_host_and_length(&url, true, "example.com"));
        assert!(!is_valid_host_and_length(&url, false, "example.com"));
    }

    #[test]
    fn ascii_host_encodes_unicode() {
        assert_eq!(ascii_host("bücher.de").as_deref(), Some("xn--bcher-kva.de"));
        assert_eq!(ascii_host("MLB.tv").as_deref(), Some("mlb.tv"));
    }

    #[test]
    fn protocol_and_bare_urls() {
        let urls = scan("text: example.com http://foobar.example.com", true);
        assert_eq!(texts(&urls), ["example.com", "http://foobar.example.com"]);
        let urls = scan("text: example.com http://foobar.example.com", false);
        assert_eq!(texts(&urls), ["http://foobar.example.com"]);
    }

    #[test]
    fn fields_are_split() {
        let urls = scan("go to https://example.com:8080/a/b?x=1 now", true);
        let fields = urls[0].url_fields().unwrap();
        assert_eq!(fields.protocol.as_deref(), Some("https://"));
        assert_eq!(fields.domain, "example.com");
        assert_eq!(fields.port.as_deref(), Some("8080"));
        assert_eq!(fields.path.as_deref(), Some("/a/b"));
        assert_eq!(fields.query.as_deref(), Some("?x=1"));
    }

    #[test]
    fn bare_cctld_requires_path_or_special() {
        assert!(scan("visit example.jp today", true).is_empty());
        assert_eq!(texts(&scan("visit example.jp/a today", true)), ["example.jp/a"]);
        assert_eq!(texts(&scan("MLB.tv vine.co", true)), ["MLB.tv", "vine.co"]);
        assert_eq!(texts(&scan("see www.example.jp", true)), ["www.example.jp"]);
    }

    #[test]
    fn protocol_less_drops_port_without_path() {
        let urls = scan("example.com:8080 is up", true);
        assert_eq!(texts(&urls), ["example.com"]);
    }

    #[test]
    fn preceding_domain_character_rejects() {
        assert!(scan("foo-example.com", true).len() == 1);
        assert!(scan("_example.com", true).is_empty());
        assert!(scan("/example.com", true).is_empty());
    }

    #[test]
    fn tco_is_truncated() {
        let urls = scan("http://t.co/abcde/extra?x=1", true);
        assert_eq!(texts(&urls), ["http://t.co/abcde"]);
        assert_eq!(urls[0].url_fields().unwrap().path.as_deref(), Some("/abcde"));
    }

    #[test]
    fn unicode_domain_needs_protocol() {
        assert_eq!(texts(&scan("http://例え.テスト", true)).len(), 0);
        assert_eq!(texts(&scan("http://bücher.de", true)), ["http://bücher.de"]);
        assert_eq!(texts(&scan("http://τεστ.com", true)), ["http://τεστ.com"]);
        assert!(scan("τεστ.com", true).is_empty());
    }

    #[test]
    fn trailing_punctuation_is_excluded() {
        assert_eq!(
            texts(&scan("see http://example.com/foo.", true)),
            ["http://example.com/foo"]
        );
        assert_eq!(
            texts(&scan("(http://en.wikipedia.org/wiki/Primer_(film))", true)),
            ["http://en.wikipedia.org/wiki/Primer_(film)"]
        );
    }
}
