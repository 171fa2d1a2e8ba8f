//! The extraction engine.
//!
//! Every scanner walks the text left to right with the same discipline as a
//! global match: a candidate rejected by its trailing validator still
//! consumes its text, and scanning resumes at its end.

use std::sync::Arc;

use tracing::trace;

use crate::chars::{self, COMBINING_KEYCAP, VARIATION_SELECTOR_EMOJI};
use crate::config::ExtractorConfig;
use crate::entity::{Entity, EntityKind};
use crate::error::PatternError;
use crate::patterns::PatternSet;
use crate::span::CodePointIndex;
use crate::urls::UrlScanner;

/// Extracts URLs, mentions, lists, hashtags and cashtags from text.
///
/// An extractor is cheap to clone and can be shared between threads; the
/// compiled grammars live behind an [`Arc`].
///
/// # Examples
///
/// ```
/// use social_entities::{EntityKind, Extractor};
///
/// let extractor = Extractor::new().unwrap();
/// let entities = extractor.extract_entities_with_indices(
///     "@jack see #rust and $RUST at https://rust-lang.org",
/// );
/// let kinds: Vec<EntityKind> = entities.iter().map(|e| e.kind).collect();
/// assert_eq!(
///     kinds,
///     [EntityKind::Mention, EntityKind::Hashtag, EntityKind::Cashtag, EntityKind::Url]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    patterns: Arc<PatternSet>,
    config: ExtractorConfig,
}

/// Everything [`Extractor::extract`] finds in one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extraction {
    /// URLs
    pub urls: Vec<Entity>,
    /// Mentions and list references
    pub mentions_or_lists: Vec<Entity>,
    /// The mention the text replies to
    pub reply_to: Option<Entity>,
    /// Hashtags not overlapping a URL
    pub hashtags: Vec<Entity>,
    /// Cashtags
    pub cashtags: Vec<Entity>,
    /// All of the above merged, ordered and without overlaps
    pub entities: Vec<Entity>,
}

impl Extractor {
    /// Creates an extractor over the shared built-in pattern set.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` if the built-in pattern set cannot be built.
    pub fn new() -> Result<Self, PatternError> {
        Ok(Self::with_patterns(PatternSet::shared()?))
    }

    /// Creates an extractor over an explicit pattern set.
    #[must_use]
    pub fn with_patterns(patterns: Arc<PatternSet>) -> Self {
        Self {
            patterns,
            config: ExtractorConfig::default(),
        }
    }

    /// Returns this extractor with `config` applied.
    #[must_use]
    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns this extractor with protocol-less URL extraction switched on or off.
    ///
    /// # Examples
    ///
    /// ```
    /// use social_entities::Extractor;
    ///
    /// let extractor = Extractor::new().unwrap().with_protocol_less_urls(false);
    /// assert_eq!(
    ///     extractor.extract_urls("text: example.com http://foobar.example.com"),
    ///     ["http://foobar.example.com"]
    /// );
    /// ```
    #[must_use]
    pub fn with_protocol_less_urls(mut self, include: bool) -> Self {
        self.config.include_protocol_less_urls = include;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Returns the pattern set in use.
    #[must_use]
    pub fn patterns(&self) -> &Arc<PatternSet> {
        &self.patterns
    }

    /// Extracts everything in one pass over each grammar.
    #[must_use]
    pub fn extract(&self, text: &str) -> Extraction {
        let urls = self.extract_urls_with_indices(text);
        let mentions_or_lists = self.extract_mentions_or_lists_with_indices(text);
        let reply_to = self.extract_reply_mention(text);
        let all_hashtags = self.extract_hashtags_with_indices_unchecked(text);
        let cashtags = self.extract_cashtags_with_indices(text);

        let mut merged = Vec::with_capacity(
            urls.len() + all_hashtags.len() + mentions_or_lists.len() + cashtags.len(),
        );
        merged.extend(urls.iter().cloned());
        merged.extend(all_hashtags);
        merged.extend(mentions_or_lists.iter().cloned());
        merged.extend(cashtags.iter().cloned());
        let entities = remove_overlapping(merged);

        let hashtags = entities
            .iter()
            .filter(|e| e.kind == EntityKind::Hashtag)
            .cloned()
            .collect();

        Extraction {
            urls,
            mentions_or_lists,
            reply_to,
            hashtags,
            cashtags,
            entities,
        }
    }

    /// Extracts all entities, ordered by start and without overlaps.
    ///
    /// When two entities overlap, the one starting first wins; on equal
    /// starts the longer one wins.
    #[must_use]
    pub fn extract_entities_with_indices(&self, text: &str) -> Vec<Entity> {
        let mut entities = self.extract_urls_with_indices(text);
        entities.extend(self.extract_hashtags_with_indices_unchecked(text));
        entities.extend(self.extract_mentions_or_lists_with_indices(text));
        entities.extend(self.extract_cashtags_with_indices(text));
        remove_overlapping(entities)
    }

    /// Extracts URLs as strings.
    #[must_use]
    pub fn extract_urls(&self, text: &str) -> Vec<String> {
        labels(self.extract_urls_with_indices(text))
    }

    /// Extracts URL entities.
    ///
    /// # Examples
    ///
    /// ```
    /// use social_entities::{Extractor, Span};
    ///
    /// let extractor = Extractor::new().unwrap();
    /// let urls = extractor.extract_urls_with_indices("MLB.tv vine.co");
    /// assert_eq!(urls[0].span, Span::new(0, 6));
    /// assert_eq!(urls[1].span, Span::new(7, 14));
    /// ```
    #[must_use]
    pub fn extract_urls_with_indices(&self, text: &str) -> Vec<Entity> {
        UrlScanner::new(&self.patterns, self.config.include_protocol_less_urls).scan(text)
    }

    /// Extracts mention and list entities.
    ///
    /// A mention followed by `/slug` is a [`EntityKind::List`] whose span
    /// covers the slug.
    #[must_use]
    pub fn extract_mentions_or_lists_with_indices(&self, text: &str) -> Vec<Entity> {
        if !text.chars().any(chars::is_at_sign) {
            return Vec::new();
        }

        let p = &self.patterns;
        let mut index = CodePointIndex::new(text);
        let mut out = Vec::new();
        let mut pos = 0;
        while let Some(caps) = p.mention_or_list.captures_at(text, pos) {
            let (Some(whole), Some(at), Some(screen_name)) =
                (caps.get(0), caps.name("at"), caps.name("screen_name"))
            else {
                break;
            };
            pos = whole.end();

            if p.end_mention.is_match(&text[whole.end()..]) {
                trace!(offset = at.start(), "rejected mention: continues as a longer token");
                continue;
            }

            let list = caps.name("list");
            let end = list.map_or(screen_name.end(), |m| m.end());
            out.push(Entity::mention(
                index.span(at.start(), end),
                &text[at.start()..end],
                screen_name.as_str(),
                list.map(|m| m.as_str().trim_start_matches('/')),
            ));
        }
        out
    }

    /// Extracts mentioned screen names, excluding list references.
    #[must_use]
    pub fn extract_mentioned_screen_names(&self, text: &str) -> Vec<String> {
        labels(self.extract_mentioned_screen_names_with_indices(text))
    }

    /// Extracts mention entities, excluding list references.
    #[must_use]
    pub fn extract_mentioned_screen_names_with_indices(&self, text: &str) -> Vec<Entity> {
        self.extract_mentions_or_lists_with_indices(text)
            .into_iter()
            .filter(|e| e.kind == EntityKind::Mention)
            .collect()
    }

    /// Extracts the screen name a text replies to.
    ///
    /// # Examples
    ///
    /// ```
    /// use social_entities::Extractor;
    ///
    /// let extractor = Extractor::new().unwrap();
    /// assert_eq!(extractor.extract_reply_screen_name(" @jack hi").as_deref(), Some("jack"));
    /// assert_eq!(extractor.extract_reply_screen_name("hi @jack"), None);
    /// ```
    #[must_use]
    pub fn extract_reply_screen_name(&self, text: &str) -> Option<String> {
        self.extract_reply_mention(text)
            .map(|e| e.label().to_string())
    }

    /// Extracts the mention at the very start of a text, after optional whitespace.
    #[must_use]
    pub fn extract_reply_mention(&self, text: &str) -> Option<Entity> {
        let p = &self.patterns;
        let caps = p.reply.captures(text)?;
        let (at, screen_name) = (caps.name("at")?, caps.name("screen_name")?);
        if p.end_mention.is_match(&text[screen_name.end()..]) {
            return None;
        }
        let span = CodePointIndex::new(text).span(at.start(), screen_name.end());
        Some(Entity::mention(
            span,
            &text[at.start()..screen_name.end()],
            screen_name.as_str(),
            None,
        ))
    }

    /// Extracts hashtags as strings, without the hash sign.
    #[must_use]
    pub fn extract_hashtags(&self, text: &str) -> Vec<String> {
        labels(self.extract_hashtags_with_indices(text))
    }

    /// Extracts hashtag entities, dropping any that overlap a URL.
    #[must_use]
    pub fn extract_hashtags_with_indices(&self, text: &str) -> Vec<Entity> {
        let tags = self.extract_hashtags_with_indices_unchecked(text);
        if tags.is_empty() {
            return tags;
        }
        let urls = self.extract_urls_with_indices(text);
        if urls.is_empty() {
            return tags;
        }

        let mut merged = tags;
        merged.extend(urls);
        remove_overlapping(merged)
            .into_iter()
            .filter(|e| e.kind == EntityKind::Hashtag)
            .collect()
    }

    /// Extracts hashtag entities without checking for overlapping URLs.
    #[must_use]
    pub fn extract_hashtags_with_indices_unchecked(&self, text: &str) -> Vec<Entity> {
        if !text.chars().any(chars::is_hash_sign) {
            return Vec::new();
        }

        let p = &self.patterns;
        let mut index = CodePointIndex::new(text);
        let mut out = Vec::new();
        let mut pos = 0;
        while let Some(caps) = p.hashtag.captures_at(text, pos) {
            let (Some(whole), Some(hash), Some(tag)) =
                (caps.get(0), caps.name("hash"), caps.name("tag"))
            else {
                break;
            };

            // A keycap or emoji presentation selector right after the sign is
            // an emoji, not a hashtag.
            if tag
                .as_str()
                .starts_with([VARIATION_SELECTOR_EMOJI, COMBINING_KEYCAP])
            {
                pos = next_char_boundary(text, whole.start());
                continue;
            }
            pos = whole.end();

            if p.end_hashtag.is_match(&text[whole.end()..]) {
                trace!(offset = hash.start(), "rejected hashtag: continues as a longer token");
                continue;
            }

            out.push(Entity::hashtag(
                index.span(hash.start(), tag.end()),
                &text[hash.start()..tag.end()],
                tag.as_str(),
            ));
        }
        out
    }

    /// Extracts cashtags as strings, without the dollar sign.
    #[must_use]
    pub fn extract_cashtags(&self, text: &str) -> Vec<String> {
        labels(self.extract_cashtags_with_indices(text))
    }

    /// Extracts cashtag entities.
    ///
    /// # Examples
    ///
    /// ```
    /// use social_entities::Extractor;
    ///
    /// let extractor = Extractor::new().unwrap();
    /// assert_eq!(extractor.extract_cashtags("$BRK.A and $AAPL."), ["BRK.A", "AAPL"]);
    /// assert!(extractor.extract_cashtags("$variable_name").is_empty());
    /// ```
    #[must_use]
    pub fn extract_cashtags_with_indices(&self, text: &str) -> Vec<Entity> {
        if !text.contains(chars::CASH_SIGN) {
            return Vec::new();
        }

        let p = &self.patterns;
        let mut index = CodePointIndex::new(text);
        let mut out = Vec::new();
        let mut pos = 0;
        while let Some(caps) = p.cashtag.captures_at(text, pos) {
            let (Some(whole), Some(sign), Some(symbol)) =
                (caps.get(0), caps.name("sign"), caps.name("symbol"))
            else {
                break;
            };

            let Some(end) = self.cashtag_end(text, symbol.start(), symbol.as_str()) else {
                pos = next_char_boundary(text, whole.start());
                continue;
            };
            pos = end;

            let terminator = p
                .cashtag_terminator
                .find(&text[end..])
                .map_or("", |m| m.as_str());
            if p.end_cashtag.is_match(terminator) {
                trace!(offset = sign.start(), "rejected cashtag: followed by another sign");
                continue;
            }

            out.push(Entity::cashtag(
                index.span(sign.start(), end),
                &text[sign.start()..end],
                &text[symbol.start()..end],
            ));
        }
        out
    }

    /// Returns where a cashtag symbol ends so that a terminator follows it.
    ///
    /// A symbol whose exchange suffix is not terminated falls back to its
    /// letters alone, which the `.` or `_` separator always terminates.
    fn cashtag_end(&self, text: &str, start: usize, symbol: &str) -> Option<usize> {
        let terminated = |end: usize| self.patterns.cashtag_terminator.is_match(&text[end..]);
        let end = start + symbol.len();
        if terminated(end) {
            return Some(end);
        }
        let separator = symbol.find(['.', '_'])?;
        Some(start + separator).filter(|&end| terminated(end))
    }
}

/// Sorts by start, longer first on ties, and drops anything starting
/// inside the previously kept entity.
fn remove_overlapping(mut entities: Vec<Entity>) -> Vec<Entity> {
    entities.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then_with(|| b.span.len().cmp(&a.span.len()))
    });
    let mut kept: Vec<Entity> = Vec::with_capacity(entities.len());
    for entity in entities {
        if kept
            .last()
            .is_some_and(|prev| entity.span.start < prev.span.end)
        {
            continue;
        }
        kept.push(entity);
    }
    kept
}

fn labels(entities: Vec<Entity>) -> Vec<String> {
    entities.into_iter().map(|e| e.label().to_string()).collect()
}

fn next_char_boundary(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(text.len(), |c| at + c.len_utf8())
}
