//! Property-based tests for the extraction grammars and the URL validator.
//!
//! Structured inputs are generated token by token so the expected entities
//! are known up front; unstructured inputs check that scanning stays total
//! and that every reported span points at the reported text.

use proptest::prelude::*;

use social_entities::{
    Entity, EntityKind, Extractor, Host, UrlSyntaxValidator, UrlValidationOptions,
    MAX_SCREEN_NAME_LENGTH,
};

/// Strategies for generating inputs.
mod strategies {
    use super::*;

    /// Lowercase letters
    const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

    /// Characters allowed in a screen name
    const SCREEN_NAME_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789_";

    /// Alphanumeric characters for DNS labels and path segments
    const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

    /// Generic TLDs with no shorter country-code prefix ambiguity
    const GENERIC: &[&str] = &["com", "org", "net", "info", "app"];

    fn string_of(chars: &'static [u8], len: std::ops::RangeInclusive<usize>) -> BoxedStrategy<String> {
        prop::collection::vec(prop::sample::select(chars.to_vec()), len)
            .prop_map(|bytes| bytes.into_iter().map(char::from).collect())
            .boxed()
    }

    /// A hashtag that starts with a letter.
    pub fn hashtag() -> impl Strategy<Value = String> {
        (string_of(LOWERCASE, 1..=1), string_of(SCREEN_NAME_CHARS, 0..=12))
            .prop_map(|(head, tail)| format!("#{head}{tail}"))
    }

    /// A mention of a screen name.
    pub fn mention() -> impl Strategy<Value = String> {
        string_of(SCREEN_NAME_CHARS, 1..=MAX_SCREEN_NAME_LENGTH).prop_map(|name| format!("@{name}"))
    }

    /// A cashtag with an optional exchange suffix.
    pub fn cashtag() -> impl Strategy<Value = String> {
        (
            string_of(LOWERCASE, 1..=6),
            prop::option::of((prop::sample::select(vec!['.', '_']), string_of(LOWERCASE, 1..=2))),
        )
            .prop_map(|(symbol, suffix)| match suffix {
                Some((sep, tail)) => format!("${symbol}{sep}{tail}"),
                None => format!("${symbol}"),
            })
    }

    /// A DNS label: alphanumeric with inner hyphens, never an IDNA `xn--` label.
    pub fn dns_label() -> impl Strategy<Value = String> {
        let inner = (
            string_of(b"abcdefghijklmnopqrstuvwxyz0123456789-", 0..=10),
            string_of(ALPHANUMERIC, 1..=1),
        );
        (string_of(ALPHANUMERIC, 1..=1), prop::option::of(inner))
            .prop_map(|(first, rest)| match rest {
                Some((middle, last)) => format!("{first}{middle}{last}"),
                None => first,
            })
            .prop_filter("punycode label", |label| !label.starts_with("xn--"))
    }

    /// A URL with an explicit protocol, a generic TLD and an optional path.
    pub fn url() -> impl Strategy<Value = String> {
        (
            prop::sample::select(vec!["http://", "https://"]),
            prop::collection::vec(dns_label(), 1..=3),
            prop::sample::select(GENERIC.to_vec()),
            prop::collection::vec(string_of(ALPHANUMERIC, 1..=8), 0..=3),
        )
            .prop_map(|(protocol, labels, tld, segments)| {
                let mut url = format!("{protocol}{}.{tld}", labels.join("."));
                for segment in segments {
                    url.push('/');
                    url.push_str(&segment);
                }
                url
            })
    }

    /// One entity token and its expected kind.
    pub fn token() -> impl Strategy<Value = (EntityKind, String)> {
        prop_oneof![
            hashtag().prop_map(|t| (EntityKind::Hashtag, t)),
            mention().prop_map(|t| (EntityKind::Mention, t)),
            cashtag().prop_map(|t| (EntityKind::Cashtag, t)),
            url().prop_map(|t| (EntityKind::Url, t)),
        ]
    }

    /// Plain words that never form an entity.
    pub fn filler() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["", "hello", "and", "日本語", "🤡", "ok", "é"])
            .prop_map(str::to_string)
    }

    /// Text fragments chosen to trip every grammar.
    pub fn noisy_text() -> impl Strategy<Value = String> {
        let fragments = vec![
            "a", "Z", "1", "_", "-", ".", "/", ":", "#", "@", "$", "＠", "＃", " ", "\u{3000}",
            "é", "日", "🤡", "\u{fe0f}", "\u{20e3}", "\u{202a}", "http://", "https://", "com",
            "co", "jp", "tv", "t.co/", "(", ")", "?", "=", "&", "!", "'", "RT", "xn--",
        ];
        prop::collection::vec(prop::sample::select(fragments), 0..=48)
            .prop_map(|parts| parts.concat())
    }

    /// A host for the validator: an IPv4 literal or an ASCII domain.
    pub fn host() -> impl Strategy<Value = String> {
        prop_oneof![
            any::<[u8; 4]>().prop_map(|[a, b, c, d]| format!("{a}.{b}.{c}.{d}")),
            (
                prop::collection::vec(dns_label(), 1..=3),
                string_of(LOWERCASE, 2..=6)
            )
                .prop_map(|(labels, tld)| format!("{}.{tld}", labels.join("."))),
        ]
    }

    /// A whole URL the validator must accept.
    pub fn valid_url() -> impl Strategy<Value = String> {
        (
            prop::sample::select(vec!["http", "https", "HTTP"]),
            host(),
            prop::option::of(0u32..=65535),
            prop::collection::vec(string_of(ALPHANUMERIC, 0..=8), 0..=3),
            prop::option::of(string_of(ALPHANUMERIC, 0..=8)),
            prop::option::of(string_of(ALPHANUMERIC, 0..=8)),
        )
            .prop_map(|(scheme, host, port, segments, query, fragment)| {
                let mut url = format!("{scheme}://{host}");
                if let Some(port) = port {
                    url.push_str(&format!(":{port}"));
                }
                for segment in segments {
                    url.push('/');
                    url.push_str(&segment);
                }
                if let Some(q) = query {
                    url.push_str(&format!("?k={q}"));
                }
                if let Some(f) = fragment {
                    url.push('#');
                    url.push_str(&f);
                }
                url
            })
    }
}

fn extractor() -> Extractor {
    Extractor::new().unwrap()
}

fn assert_spans_point_at_text(text: &str, entities: &[Entity]) -> Result<(), TestCaseError> {
    let length = text.chars().count();
    for entity in entities {
        prop_assert!(entity.span.start < entity.span.end, "empty span: {}", entity);
        prop_assert!(entity.span.end <= length, "span past end: {}", entity);
        prop_assert_eq!(entity.span.slice(text), Some(entity.text.as_str()));
    }
    Ok(())
}

mod structured_tests {
    use super::strategies::*;
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn generated_tokens_are_extracted_in_order(
            parts in prop::collection::vec((filler(), token()), 1..=6)
        ) {
            let mut text = String::new();
            let mut expected = Vec::new();
            for (filler, (kind, token)) in parts {
                if !filler.is_empty() {
                    text.push_str(&filler);
                    text.push(' ');
                }
                text.push_str(&token);
                text.push(' ');
                expected.push((kind, token));
            }

            let found: Vec<(EntityKind, String)> = extractor()
                .extract_entities_with_indices(&text)
                .into_iter()
                .map(|e| (e.kind, e.text))
                .collect();
            prop_assert_eq!(found, expected, "text: {:?}", text);
        }

        #[test]
        fn extraction_is_idempotent_on_entity_text(
            parts in prop::collection::vec((filler(), token()), 1..=4)
        ) {
            let text = parts
                .iter()
                .map(|(filler, (_, token))| format!("{filler} {token}"))
                .collect::<Vec<_>>()
                .join(" ");

            let e = extractor();
            for entity in e.extract_entities_with_indices(&text) {
                let again = e.extract_entities_with_indices(&entity.text);
                prop_assert_eq!(again.len(), 1, "re-extracting {:?}", entity.text);
                prop_assert_eq!(again[0].kind, entity.kind);
                prop_assert_eq!(&again[0].fields, &entity.fields);
            }
        }

        #[test]
        fn reply_is_the_leading_mention(name in mention(), rest in filler()) {
            let text = format!("  {name} {rest}");
            let reply = extractor().extract_reply_mention(&text);
            prop_assert_eq!(reply.map(|e| e.text), Some(name));
        }
    }
}

mod noisy_text_tests {
    use super::strategies::*;
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn every_scanner_reports_consistent_spans(text in noisy_text()) {
            let e = extractor();
            assert_spans_point_at_text(&text, &e.extract_urls_with_indices(&text))?;
            assert_spans_point_at_text(&text, &e.extract_mentions_or_lists_with_indices(&text))?;
            assert_spans_point_at_text(&text, &e.extract_hashtags_with_indices_unchecked(&text))?;
            assert_spans_point_at_text(&text, &e.extract_cashtags_with_indices(&text))?;
        }

        #[test]
        fn combined_entities_are_ordered_and_disjoint(text in noisy_text()) {
            let entities = extractor().extract_entities_with_indices(&text);
            assert_spans_point_at_text(&text, &entities)?;
            for pair in entities.windows(2) {
                prop_assert!(
                    pair[0].span.end <= pair[1].span.start,
                    "{} overlaps {}", pair[0], pair[1]
                );
            }
        }

        #[test]
        fn checked_hashtags_are_a_subset(text in noisy_text()) {
            let e = extractor();
            let unchecked = e.extract_hashtags_with_indices_unchecked(&text);
            for tag in e.extract_hashtags_with_indices(&text) {
                prop_assert!(unchecked.contains(&tag), "unexpected {}", tag);
            }
        }
    }
}

mod validator_tests {
    use super::strategies::*;
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn generated_urls_validate(url in valid_url()) {
            let validator = UrlSyntaxValidator::new().unwrap();
            let result = validator.validate(&url, UrlValidationOptions::default());
            prop_assert!(result.is_ok(), "rejected {}: {:?}", url, result.err());
        }

        #[test]
        fn generated_hosts_keep_their_kind(host in host()) {
            let validator = UrlSyntaxValidator::new().unwrap();
            let parsed = validator.validate_host(&host);
            prop_assert!(parsed.is_ok(), "rejected host {}", host);
            let is_ipv4 = matches!(parsed, Ok(Host::Ipv4(_)));
            prop_assert_eq!(is_ipv4, host.parse::<std::net::Ipv4Addr>().is_ok());
        }

        #[test]
        fn validation_never_panics(text in noisy_text()) {
            let validator = UrlSyntaxValidator::new().unwrap();
            let _ = validator.validate(&text, UrlValidationOptions::default());
            let _ = validator.validate(&text, UrlValidationOptions::default().unicode_domains(false));
        }
    }
}
