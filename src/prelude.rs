//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use social_entities::prelude::*;
//!
//! let extractor = Extractor::new().unwrap();
//! let entities: Vec<Entity> = extractor.extract_entities_with_indices("#rust");
//! assert_eq!(entities[0].kind, EntityKind::Hashtag);
//! ```
//!
//! The grammar builders and code-point sets stay in their own modules.

pub use crate::{
    // Extraction
    Entity, EntityFields, EntityKind, Extraction, Extractor, ExtractorConfig, Span, UrlFields,
    // Validation
    Authority, Host, UrlSyntaxValidator, UrlValidationOptions, ValidatedUrl,
    // Registry and patterns
    PatternSet, TldRegistry,
    // Errors
    PatternError, RegistryError, UrlSyntaxError, UrlSyntaxErrorKind,
    // Constants
    ASSUMED_PROTOCOL, MAX_DNS_DOMAIN_LENGTH, MAX_DNS_LABEL_LENGTH, MAX_LIST_SLUG_LENGTH,
    MAX_SCREEN_NAME_LENGTH, MAX_URL_LENGTH,
};
