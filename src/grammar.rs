//! Pattern-string construction for every named grammar.
//!
//! Functions here are pure: they compose [`chars`](crate::chars) fragments
//! and [`TldRegistry`] alternations into pattern strings and never compile
//! anything. [`PatternSet`](crate::PatternSet) compiles them once.
//!
//! The target engine has no look-around. Where a grammar needs to assert
//! what follows a top-level domain, the asserted character is consumed
//! inside a capture group whose name starts with [`TLD_FOLLOWER_GROUP`];
//! the domain ends where that group starts. Assertions on the character
//! before a token are consumed the same way in a `before` group.
//!
//! All grammars are meant to be compiled case-insensitively.

use crate::chars::{AT_SIGNS, HASH_SIGNS, HASHTAG_SPECIAL, INVALID_CHARACTERS, LATIN_ACCENTS, WHITESPACE};
use crate::constants::{MAX_LIST_SLUG_LENGTH, MAX_SCREEN_NAME_LENGTH};
use crate::tld::{PUNYCODE_PATTERN, TldRegistry};

/// Name prefix of capture groups holding a consumed TLD follower.
pub const TLD_FOLLOWER_GROUP: &str = "tld_end";

/// A generic or country-code TLD must not be followed by one of these.
const TLD_FOLLOWER: &str = r"(?:[^0-9a-z@+\-]|$)";

/// A special short TLD must not be followed by one of these.
const SPECIAL_TLD_FOLLOWER: &str = "(?:[^0-9a-z@]|$)";

/// Which side of the optional protocol a domain grammar is matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainContext {
    /// Directly after `http://` or `https://`; unicode labels are allowed.
    AfterProtocol,
    /// No protocol; only ASCII and Latin-accented labels are allowed.
    Bare,
}

impl DomainContext {
    const fn tag(self) -> &'static str {
        match self {
            Self::AfterProtocol => "p",
            Self::Bare => "b",
        }
    }
}

/// Hands out unique follower group names within one pattern.
struct FollowerGroups {
    tag: &'static str,
    next: usize,
}

impl FollowerGroups {
    fn wrap(&mut self, body: &str) -> String {
        let name = format!("{TLD_FOLLOWER_GROUP}_{}{}", self.tag, self.next);
        self.next += 1;
        format!("(?P<{name}>{body})")
    }
}

fn domain_valid_chars() -> String {
    format!("0-9a-z{}", LATIN_ACCENTS.class_body())
}

/// A single subdomain label followed by a dot. Underscores are allowed mid-label.
#[must_use]
pub fn valid_subdomain() -> String {
    let c = domain_valid_chars();
    format!(r"(?:(?:[{c}][{c}\-_]*)?[{c}]\.)")
}

/// A single domain label followed by a dot.
#[must_use]
pub fn valid_domain_name() -> String {
    let c = domain_valid_chars();
    format!(r"(?:(?:[{c}][{c}\-]*)?[{c}]\.)")
}

/// Any code point that is not punctuation, a separator, a control or an invalid character.
#[must_use]
pub fn domain_valid_unicode_chars() -> String {
    format!(
        r"[^\p{{P}}\p{{Z}}\p{{C}}{}{}]",
        INVALID_CHARACTERS.class_body(),
        WHITESPACE.class_body()
    )
}

/// The domain grammar of a URL in free text.
///
/// Branches, in precedence order:
/// 1. subdomains, a label and a generic, country-code or punycode TLD
/// 2. a label (or, after a protocol, a unicode label) and a generic TLD
/// 3. a label and a punycode TLD
/// 4. a label and a special short TLD
/// 5. after a protocol only: a label or unicode label and a country-code TLD
/// 6. a label and a country-code TLD followed by `/`
#[must_use]
pub fn valid_domain(tlds: &TldRegistry, context: DomainContext) -> String {
    let mut followers = FollowerGroups {
        tag: context.tag(),
        next: 0,
    };
    let subdomain = valid_subdomain();
    let name = valid_domain_name();
    let unicode = domain_valid_unicode_chars();
    let gtld = tlds.generic_alternation();
    let cctld = tlds.country_code_alternation();
    let special = tlds.special_short_alternation();
    let after_protocol = context == DomainContext::AfterProtocol;

    let mut branches = Vec::with_capacity(6);

    let tld_follower = followers.wrap(TLD_FOLLOWER);
    branches.push(format!(
        "(?:{subdomain}+{name}(?:(?:{gtld}|{cctld}){tld_follower}|{PUNYCODE_PATTERN}))"
    ));

    let label = if after_protocol {
        format!(r"(?:{name}|{unicode}+\.)")
    } else {
        name.clone()
    };
    let tld_follower = followers.wrap(TLD_FOLLOWER);
    branches.push(format!("(?:{label}{gtld}{tld_follower})"));

    branches.push(format!("(?:{name}{PUNYCODE_PATTERN})"));

    let special_follower = followers.wrap(SPECIAL_TLD_FOLLOWER);
    branches.push(format!("(?:{name}{special}{special_follower})"));

    if after_protocol {
        let tld_follower = followers.wrap(TLD_FOLLOWER);
        branches.push(format!("(?:{label}{cctld}{tld_follower})"));
    }

    let slash = followers.wrap("/");
    branches.push(format!("(?:{name}{cctld}{slash})"));

    branches.join("|")
}

/// General characters allowed in a URL path.
fn url_path_chars() -> String {
    format!(
        r"[a-z\p{{Cyrillic}}0-9!\*;:=\+,\.\$/%\#\[\]\-_\~\&\|@{}]",
        LATIN_ACCENTS.class_body()
    )
}

/// Up to two levels of balanced parentheses inside a path.
fn url_balanced_parens() -> String {
    let g = url_path_chars();
    format!(r"(?:\((?:{g}+|(?:{g}*\({g}+\){g}*))\))")
}

/// One path run ending on a character that cannot be trailing punctuation.
#[must_use]
pub fn valid_url_path() -> String {
    let g = url_path_chars();
    let parens = url_balanced_parens();
    let ending = format!(
        r"(?:[a-z\p{{Cyrillic}}0-9=_\#/\+\-{}]|{parens})",
        LATIN_ACCENTS.class_body()
    );
    format!("(?:(?:{g}*(?:{parens}{g}*)*{ending})|(?:@{g}+/))")
}

/// Characters allowed in a URL query.
#[must_use]
pub fn valid_url_query_chars() -> &'static str {
    r"[a-z0-9!?\*'\(\);:\&=\+\$/%\#\[\]\-_\.,\~\|@]"
}

/// Characters a URL query may end on.
#[must_use]
pub fn valid_url_query_ending_chars() -> &'static str {
    r"[a-z0-9_\&=\#/\-]"
}

/// Characters allowed immediately before a URL.
#[must_use]
pub fn valid_url_preceding_chars() -> String {
    format!(
        r"(?:[^A-Z0-9_@\x{{ff20}}\$\#\x{{ff03}}{}]|^)",
        INVALID_CHARACTERS.class_body()
    )
}

/// The URL head: preceding character, optional protocol and domain.
///
/// Groups: `before`, `protocol`, and the domain in `domain` (after a
/// protocol) or `bare_domain` (without one).
#[must_use]
pub fn valid_url_head(tlds: &TldRegistry) -> String {
    format!(
        "(?P<before>{})(?:(?P<protocol>https?://)(?P<domain>{})|(?P<bare_domain>{}))",
        valid_url_preceding_chars(),
        valid_domain(tlds, DomainContext::AfterProtocol),
        valid_domain(tlds, DomainContext::Bare),
    )
}

/// The URL tail matched right after the domain: port, path and query.
///
/// Groups: `port`, `path`, `query`.
#[must_use]
pub fn valid_url_tail() -> String {
    format!(
        r"\A(?::(?P<port>[0-9]+))?(?P<path>/{}*)?(?P<query>\?{}*{})?",
        valid_url_path(),
        valid_url_query_chars(),
        valid_url_query_ending_chars()
    )
}

/// A t.co short link: only the path token after the domain is kept.
#[must_use]
pub fn valid_tco_url() -> &'static str {
    r"\Ahttps?://t\.co/[a-z0-9]+"
}

/// A whole domain that is one label and a country-code TLD.
#[must_use]
pub fn invalid_short_domain(tlds: &TldRegistry) -> String {
    format!(
        r"\A{}{}\z",
        valid_domain_name(),
        tlds.country_code_alternation()
    )
}

/// A whole domain that is one label and a special short TLD.
#[must_use]
pub fn valid_special_short_domain(tlds: &TldRegistry) -> String {
    format!(
        r"\A{}{}\z",
        valid_domain_name(),
        tlds.special_short_alternation()
    )
}

/// Text ending in a character that continues a domain.
#[must_use]
pub fn invalid_url_without_protocol_preceding_chars() -> &'static str {
    r"[\-_\./]\z"
}

fn screen_name() -> String {
    format!("[a-z0-9_]{{1,{MAX_SCREEN_NAME_LENGTH}}}")
}

/// A mention or list reference.
///
/// Groups: `before`, `at`, `screen_name`, `list` (with its leading slash).
#[must_use]
pub fn valid_mention_or_list() -> String {
    format!(
        r"(?P<before>[^a-zA-Z0-9_!\#\$%\&\*@\x{{ff20}}/]|^|(?:^|[^a-z0-9_\+\~\.\-])RT:?)(?P<at>[{AT_SIGNS}])(?P<screen_name>{})(?P<list>/[a-z][a-z0-9_\-]{{0,{}}})?",
        screen_name(),
        MAX_LIST_SLUG_LENGTH - 1
    )
}

/// A mention at the very start of the text, after optional whitespace.
///
/// Groups: `at`, `screen_name`.
#[must_use]
pub fn valid_reply() -> String {
    format!(
        r"\A(?:[{}])*(?P<at>[{AT_SIGNS}])(?P<screen_name>{})",
        WHITESPACE.class_body(),
        screen_name()
    )
}

/// Text after a mention that shows the mention was a false short match.
#[must_use]
pub fn end_mention() -> String {
    format!(
        r"\A(?:[{AT_SIGNS}]|[{}]|://)",
        LATIN_ACCENTS.class_body()
    )
}

/// A hashtag.
///
/// Groups: `before`, `hash`, `tag`. A tag whose first code point is an
/// emoji variation selector or a combining keycap is not a hashtag; the
/// extractor rejects those after matching.
#[must_use]
pub fn valid_hashtag() -> String {
    let special = HASHTAG_SPECIAL.class_body();
    let letters_numerals = format!(r"[\p{{L}}\p{{M}}\p{{Nd}}{special}]");
    format!(
        r"(?P<before>\A|\x{{fe0e}}|\x{{fe0f}}|[^\&\p{{L}}\p{{M}}\p{{Nd}}{special}])(?P<hash>[{HASH_SIGNS}])(?P<tag>{letters_numerals}*[\p{{L}}\p{{M}}]{letters_numerals}*)"
    )
}

/// Text after a hashtag that shows the hashtag was a false short match.
#[must_use]
pub fn end_hashtag() -> String {
    format!(r"\A(?:[{HASH_SIGNS}]|://)")
}

/// A cashtag.
///
/// Groups: `before`, `sign`, `symbol`. The extractor checks the character
/// after the symbol against [`cashtag_terminator`].
#[must_use]
pub fn valid_cashtag() -> String {
    format!(
        r"(?P<before>^|[{}])(?P<sign>\$)(?P<symbol>[a-z]{{1,6}}(?:[\._][a-z]{{1,2}})?)",
        WHITESPACE.class_body()
    )
}

/// What may follow a cashtag symbol: end of text, whitespace or punctuation.
#[must_use]
pub fn cashtag_terminator() -> &'static str {
    r"\A(?:\z|\s|[[:punct:]]|\p{P})"
}

/// Text after a cashtag that shows the cashtag was a false short match.
#[must_use]
pub fn end_cashtag() -> &'static str {
    r"\A(?:\$|://)"
}

// Whole-string URL validation grammars, after the RFC 3986 productions.

const VALIDATE_URL_UNRESERVED: &str = r"[a-z\p{Cyrillic}0-9\-\._\~]";
const VALIDATE_URL_PCT_ENCODED: &str = "(?:%[0-9a-f]{2})";
const VALIDATE_URL_SUB_DELIMS: &str = r"[!\$\&'\(\)\*\+,;=]";
const VALIDATE_URL_IPV6: &str = r"(?:\[[a-f0-9:\.]+\])";
const VALIDATE_URL_PORT: &str = "[0-9]{1,5}";

/// Splits a whole URL into scheme, authority, path, query and fragment.
///
/// Groups: `scheme`, `authority`, `path`, `query`, `fragment`.
#[must_use]
pub fn validate_url_unencoded() -> &'static str {
    r"\A(?:(?P<scheme>[^:/?\#]+)://)?(?P<authority>[^/?\#]*)(?P<path>[^?\#]*)(?:\?(?P<query>[^\#]*))?(?:\#(?P<fragment>.*))?\z"
}

/// A URI scheme.
#[must_use]
pub fn validate_url_scheme() -> &'static str {
    r"(?:[a-z][a-z0-9\+\-\.]*)"
}

/// A dotted-quad IPv4 literal without leading zeros.
#[must_use]
pub fn validate_url_ipv4() -> String {
    let octet = "(?:[0-9]|[1-9][0-9]|1[0-9]{2}|2[0-4][0-9]|25[0-5])";
    format!(r"(?:{octet}(?:\.{octet}){{3}})")
}

/// An IPv4 literal or a bracketed IPv6 literal.
#[must_use]
pub fn validate_url_ip() -> String {
    format!("(?:{}|{VALIDATE_URL_IPV6})", validate_url_ipv4())
}

/// An ASCII domain checked label by label.
#[must_use]
pub fn validate_url_domain() -> &'static str {
    r"(?:(?:(?:[a-z0-9](?:[a-z0-9_\-]*[a-z0-9])?)\.)*(?:(?:[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?)\.)(?:[a-z](?:[a-z0-9\-]*[a-z0-9])?))"
}

/// A domain whose labels may contain any non-ASCII code point.
#[must_use]
pub fn validate_url_unicode_domain() -> &'static str {
    concat!(
        r"(?:(?:(?:(?:[a-z0-9]|[^\x00-\x7f])(?:(?:[a-z0-9_\-]|[^\x00-\x7f])*(?:[a-z0-9]|[^\x00-\x7f]))?)\.)*",
        r"(?:(?:(?:[a-z0-9]|[^\x00-\x7f])(?:(?:[a-z0-9\-]|[^\x00-\x7f])*(?:[a-z0-9]|[^\x00-\x7f]))?)\.)",
        r"(?:(?:[a-z]|[^\x00-\x7f])(?:(?:[a-z0-9\-]|[^\x00-\x7f])*(?:[a-z0-9]|[^\x00-\x7f]))?))"
    )
}

/// An IP literal or ASCII domain.
#[must_use]
pub fn validate_url_host() -> String {
    format!("(?:{}|{})", validate_url_ip(), validate_url_domain())
}

/// An IP literal or internationalized domain.
#[must_use]
pub fn validate_url_unicode_host() -> String {
    format!("(?:{}|{})", validate_url_ip(), validate_url_unicode_domain())
}

/// Userinfo before the `@` of an authority.
#[must_use]
pub fn validate_url_userinfo() -> String {
    format!("(?:{VALIDATE_URL_UNRESERVED}|{VALIDATE_URL_PCT_ENCODED}|{VALIDATE_URL_SUB_DELIMS}|:)*")
}

/// An authority with an ASCII host.
///
/// Groups: `userinfo`, `host`, `port`.
#[must_use]
pub fn validate_url_authority() -> String {
    authority_with_host(&validate_url_host())
}

/// An authority with an internationalized host.
///
/// Groups: `userinfo`, `host`, `port`.
#[must_use]
pub fn validate_url_unicode_authority() -> String {
    authority_with_host(&validate_url_unicode_host())
}

fn authority_with_host(host: &str) -> String {
    format!(
        "(?:(?P<userinfo>{})@)?(?P<host>{host})(?::(?P<port>{VALIDATE_URL_PORT}))?",
        validate_url_userinfo()
    )
}

fn validate_url_pchar() -> String {
    format!(r"(?:{VALIDATE_URL_UNRESERVED}|{VALIDATE_URL_PCT_ENCODED}|{VALIDATE_URL_SUB_DELIMS}|[:\|@])")
}

/// A path of slash-separated segments; may be empty.
#[must_use]
pub fn validate_url_path() -> String {
    format!("(?:/{}*)*", validate_url_pchar())
}

/// A query string, without its leading `?`.
#[must_use]
pub fn validate_url_query() -> String {
    format!(r"(?:{}|/|\?)*", validate_url_pchar())
}

/// A fragment, without its leading `#`.
#[must_use]
pub fn validate_url_fragment() -> String {
    validate_url_query()
}
