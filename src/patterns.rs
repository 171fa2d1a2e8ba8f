//! Compiled grammars.
//!
//! A [`PatternSet`] compiles every grammar in [`grammar`](crate::grammar)
//! against one [`TldRegistry`]. Building it is pure, so it can be shared
//! freely once built; [`PatternSet::shared`] memoizes the one built from the
//! embedded registry for the life of the process.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::PatternError;
use crate::grammar;
use crate::tld::TldRegistry;

/// Compiled program size limit; the full TLD alternations exceed the default.
const REGEX_SIZE_LIMIT: usize = 1 << 26;

/// Lazy DFA cache size per search thread.
const DFA_SIZE_LIMIT: usize = 1 << 26;

static SHARED: OnceCell<Arc<PatternSet>> = OnceCell::new();

/// Every compiled grammar used by extraction and URL validation.
pub struct PatternSet {
    registry: TldRegistry,
    pub(crate) url_head: Regex,
    pub(crate) url_tail: Regex,
    pub(crate) tld_followers: Vec<usize>,
    pub(crate) tco_url: Regex,
    pub(crate) invalid_short_domain: Regex,
    pub(crate) special_short_domain: Regex,
    pub(crate) invalid_protocol_less_preceding: Regex,
    pub(crate) mention_or_list: Regex,
    pub(crate) reply: Regex,
    pub(crate) end_mention: Regex,
    pub(crate) hashtag: Regex,
    pub(crate) end_hashtag: Regex,
    pub(crate) cashtag: Regex,
    pub(crate) cashtag_terminator: Regex,
    pub(crate) end_cashtag: Regex,
    pub(crate) url_syntax: UrlSyntaxPatterns,
}

/// Grammars for whole-string URL validation.
pub(crate) struct UrlSyntaxPatterns {
    pub(crate) unencoded: Regex,
    pub(crate) scheme: Regex,
    pub(crate) authority: Regex,
    pub(crate) unicode_authority: Regex,
    pub(crate) host: Regex,
    pub(crate) unicode_host: Regex,
    pub(crate) path: Regex,
    pub(crate) query: Regex,
    pub(crate) fragment: Regex,
}

impl PatternSet {
    /// Compiles every grammar against `registry`.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::Compile` if a grammar fails to compile, which
    /// can only happen when the registry holds labels the pattern engine
    /// cannot accept.
    pub fn new(registry: &TldRegistry) -> Result<Self, PatternError> {
        let url_head = compile("url", &grammar::valid_url_head(registry))?;
        let tld_followers = url_head
            .capture_names()
            .enumerate()
            .filter_map(|(i, name)| {
                name.filter(|n| n.starts_with(grammar::TLD_FOLLOWER_GROUP))
                    .map(|_| i)
            })
            .collect();

        let set = Self {
            url_head,
            url_tail: compile("url tail", &grammar::valid_url_tail())?,
            tld_followers,
            tco_url: compile("t.co url", grammar::valid_tco_url())?,
            invalid_short_domain: compile(
                "invalid short domain",
                &grammar::invalid_short_domain(registry),
            )?,
            special_short_domain: compile(
                "special short domain",
                &grammar::valid_special_short_domain(registry),
            )?,
            invalid_protocol_less_preceding: compile(
                "protocol-less preceding",
                grammar::invalid_url_without_protocol_preceding_chars(),
            )?,
            mention_or_list: compile("mention", &grammar::valid_mention_or_list())?,
            reply: compile("reply", &grammar::valid_reply())?,
            end_mention: compile("end mention", &grammar::end_mention())?,
            hashtag: compile("hashtag", &grammar::valid_hashtag())?,
            end_hashtag: compile("end hashtag", &grammar::end_hashtag())?,
            cashtag: compile("cashtag", &grammar::valid_cashtag())?,
            cashtag_terminator: compile("cashtag terminator", grammar::cashtag_terminator())?,
            end_cashtag: compile("end cashtag", grammar::end_cashtag())?,
            url_syntax: UrlSyntaxPatterns::new()?,
            registry: registry.clone(),
        };

        debug!(
            generic = registry.generic_count(),
            country_code = registry.country_code_count(),
            "compiled pattern set"
        );
        Ok(set)
    }

    /// Returns the process-wide pattern set built from [`TldRegistry::builtin`].
    ///
    /// The first call builds the set; concurrent first callers wait for it
    /// and never observe a partial build. A failed build is not cached.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` if the built-in grammars fail to compile.
    pub fn shared() -> Result<Arc<Self>, PatternError> {
        SHARED
            .get_or_try_init(|| Self::new(TldRegistry::builtin()).map(Arc::new))
            .cloned()
    }

    /// Returns the registry the set was compiled against.
    #[must_use]
    pub const fn registry(&self) -> &TldRegistry {
        &self.registry
    }
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSet")
            .field("generic_tlds", &self.registry.generic_count())
            .field("country_code_tlds", &self.registry.country_code_count())
            .finish_non_exhaustive()
    }
}

impl UrlSyntaxPatterns {
    fn new() -> Result<Self, PatternError> {
        Ok(Self {
            unencoded: compile("validate url", grammar::validate_url_unencoded())?,
            scheme: compile_whole("validate scheme", grammar::validate_url_scheme())?,
            authority: compile_whole("validate authority", &grammar::validate_url_authority())?,
            unicode_authority: compile_whole(
                "validate unicode authority",
                &grammar::validate_url_unicode_authority(),
            )?,
            host: compile_whole("validate host", &grammar::validate_url_host())?,
            unicode_host: compile_whole(
                "validate unicode host",
                &grammar::validate_url_unicode_host(),
            )?,
            path: compile_whole("validate path", &grammar::validate_url_path())?,
            query: compile_whole("validate query", &grammar::validate_url_query())?,
            fragment: compile_whole("validate fragment", &grammar::validate_url_fragment())?,
        })
    }
}

fn compile(grammar: &'static str, pattern: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .dfa_size_limit(DFA_SIZE_LIMIT)
        .build()
        .map_err(|e| PatternError::compile(grammar, &e))
}

/// Compiles a grammar that must match the whole input.
fn compile_whole(grammar: &'static str, pattern: &str) -> Result<Regex, PatternError> {
    compile(grammar, &format!(r"\A(?:{pattern})\z"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_set_builds_once() {
        let a = PatternSet::shared().unwrap();
        let b = PatternSet::shared().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.tld_followers.len(), 9);
    }

    #[test]
    fn custom_registry_compiles() {
        let registry = TldRegistry::from_labels(["com"], ["co", "uk"], ["co"]).unwrap();
        let set = PatternSet::new(&registry).unwrap();
        assert!(set.url_head.is_match("see example.com"));
        assert!(!set.url_head.is_match("see example.org"));
    }

    #[test]
    fn concurrent_first_use_sees_one_set() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| PatternSet::shared().unwrap()))
            .collect();
        let sets: Vec<Arc<PatternSet>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(sets.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn validation_grammars_are_anchored() {
        let set = PatternSet::shared().unwrap();
        let host = &set.url_syntax.host;
        assert!(host.is_match("1.2.3.45"));
        assert!(host.is_match("example.com"));
        assert!(!host.is_match("a example.com"));
        assert!(!host.is_match("example.com/"));
    }

    #[test]
    fn debug_omits_regexes() {
        let set = PatternSet::shared().unwrap();
        let rendered = format!("{set:?}");
        assert!(rendered.starts_with("PatternSet"));
        assert!(rendered.contains("generic_tlds"));
    }
}
