//! Entity extraction for short social-media text.
//!
//! This crate finds URLs, `@mentions`, `@owner/list` references, `#hashtags`
//! and `$cashtags` in free text and reports each one with its code-point
//! span and captured fields. It also validates whole URL strings against
//! RFC 3986-style grammars.
//!
//! # Overview
//!
//! The layers, bottom-up:
//!
//! - [`chars`]: named Unicode code-point sets used as grammar building blocks
//! - [`TldRegistry`]: generic, country-code and special short top-level domains
//! - [`grammar`]: pure pattern-string builders
//! - [`PatternSet`]: every grammar compiled once and shared
//! - [`Extractor`]: the scanners, trailing validators and overlap resolution
//! - [`UrlSyntaxValidator`]: whole-string URL decomposition
//!
//! # Quick Start
//!
//! ```rust
//! use social_entities::{EntityKind, Extractor};
//!
//! let extractor = Extractor::new().unwrap();
//!
//! let text = "@jack check #rustlang at https://www.rust-lang.org $MSFT";
//! for entity in extractor.extract_entities_with_indices(text) {
//!     println!("{entity}");
//! }
//!
//! assert_eq!(extractor.extract_mentioned_screen_names(text), ["jack"]);
//! assert_eq!(extractor.extract_hashtags(text), ["rustlang"]);
//! assert_eq!(extractor.extract_urls(text), ["https://www.rust-lang.org"]);
//! assert_eq!(extractor.extract_cashtags(text), ["MSFT"]);
//! ```
//!
//! # Indices
//!
//! Every [`Span`] counts Unicode code points, not bytes:
//!
//! ```rust
//! use social_entities::{Extractor, Span};
//!
//! let extractor = Extractor::new().unwrap();
//! let tags = extractor.extract_hashtags_with_indices("🤡 #clown");
//! assert_eq!(tags[0].span, Span::new(2, 8));
//! ```
//!
//! # URL Validation
//!
//! ```rust
//! use social_entities::{UrlSyntaxValidator, UrlValidationOptions};
//!
//! let validator = UrlSyntaxValidator::new().unwrap();
//! assert!(validator.is_valid("https://例え.jp/path", UrlValidationOptions::default()));
//! assert!(!validator.is_valid("ftp://example.com", UrlValidationOptions::default()));
//! ```
//!
//! # Limits
//!
//! | Limit | Value |
//! |-------|-------|
//! | URL length, host in ASCII form | 4096 chars |
//! | Domain | 253 chars |
//! | Domain label | 63 chars |
//! | Screen name | 20 chars |
//! | List slug | 25 chars |
//! | Cashtag symbol | 6 letters, plus `.` or `_` and up to 2 letters |

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod chars;
mod config;
mod constants;
mod entity;
mod error;
mod extractor;
pub mod grammar;
mod patterns;
pub mod prelude;
mod span;
mod tld;
mod tld_data;
mod url_syntax;
mod urls;

pub use config::{ExtractorConfig, UrlValidationOptions};
pub use constants::{
    ASSUMED_PROTOCOL, MAX_DNS_DOMAIN_LENGTH, MAX_DNS_LABEL_LENGTH, MAX_LIST_SLUG_LENGTH,
    MAX_SCREEN_NAME_LENGTH, MAX_URL_LENGTH,
};
pub use entity::{Entity, EntityFields, EntityKind, UrlFields};
pub use error::{PatternError, RegistryError, UrlSyntaxError, UrlSyntaxErrorKind};
pub use extractor::{Extraction, Extractor};
pub use patterns::PatternSet;
pub use span::Span;
pub use tld::{PUNYCODE_PATTERN, TldRegistry};
pub use url_syntax::{Authority, Host, UrlSyntaxValidator, ValidatedUrl};
