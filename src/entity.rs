//! Extracted entities.

use std::fmt;

use crate::span::Span;

/// The classification of an extracted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntityKind {
    /// A URL, with or without protocol
    Url,
    /// An `@screen_name` mention
    Mention,
    /// An `@screen_name/list-slug` list reference
    List,
    /// A `#hashtag`
    Hashtag,
    /// A `$CASHTAG`
    Cashtag,
}

impl EntityKind {
    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Mention => "mention",
            Self::List => "list",
            Self::Hashtag => "hashtag",
            Self::Cashtag => "cashtag",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Captured parts of a URL entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UrlFields {
    /// `http://` or `https://` as written, if present
    pub protocol: Option<String>,
    /// The domain as written
    pub domain: String,
    /// Port digits, if present
    pub port: Option<String>,
    /// Path including its leading slash, if present
    pub path: Option<String>,
    /// Query including its leading `?`, if present
    pub query: Option<String>,
}

/// Kind-specific fields of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum EntityFields {
    /// Fields of a [`EntityKind::Url`]
    Url(UrlFields),
    /// Fields of a [`EntityKind::Mention`] or [`EntityKind::List`]
    Mention {
        /// Screen name without the at sign
        screen_name: String,
        /// List slug without its leading slash
        list_slug: Option<String>,
    },
    /// Fields of a [`EntityKind::Hashtag`]
    Hashtag {
        /// Tag without the hash sign
        tag: String,
    },
    /// Fields of a [`EntityKind::Cashtag`]
    Cashtag {
        /// Ticker symbol without the dollar sign
        symbol: String,
    },
}

/// An entity recognized in text.
///
/// `text` is exactly the slice of the input covered by `span`, sign
/// characters included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    /// Classification
    pub kind: EntityKind,
    /// Code-point span in the input
    pub span: Span,
    /// Raw text covered by the span
    pub text: String,
    /// Kind-specific fields
    pub fields: EntityFields,
}

impl Entity {
    pub(crate) fn url(span: Span, text: &str, fields: UrlFields) -> Self {
        Self {
            kind: EntityKind::Url,
            span,
            text: text.to_string(),
            fields: EntityFields::Url(fields),
        }
    }

    pub(crate) fn mention(span: Span, text: &str, screen_name: &str, list_slug: Option<&str>) -> Self {
        Self {
            kind: if list_slug.is_some() {
                EntityKind::List
            } else {
                EntityKind::Mention
            },
            span,
            text: text.to_string(),
            fields: EntityFields::Mention {
                screen_name: screen_name.to_string(),
                list_slug: list_slug.map(str::to_string),
            },
        }
    }

    pub(crate) fn hashtag(span: Span, text: &str, tag: &str) -> Self {
        Self {
            kind: EntityKind::Hashtag,
            span,
            text: text.to_string(),
            fields: EntityFields::Hashtag {
                tag: tag.to_string(),
            },
        }
    }

    pub(crate) fn cashtag(span: Span, text: &str, symbol: &str) -> Self {
        Self {
            kind: EntityKind::Cashtag,
            span,
            text: text.to_string(),
            fields: EntityFields::Cashtag {
                symbol: symbol.to_string(),
            },
        }
    }

    /// Returns the entity's label: the URL, screen name, tag or symbol.
    ///
    /// # Examples
    ///
    /// ```
    /// use social_entities::Extractor;
    ///
    /// let extractor = Extractor::new().unwrap();
    /// let tags = extractor.extract_hashtags_with_indices("loving #rustlang");
    /// assert_eq!(tags[0].label(), "rustlang");
    /// assert_eq!(tags[0].text, "#rustlang");
    /// ```
    #[must_use]
    pub fn label(&self) -> &str {
        match &self.fields {
            EntityFields::Url(_) => &self.text,
            EntityFields::Mention { screen_name, .. } => screen_name,
            EntityFields::Hashtag { tag } => tag,
            EntityFields::Cashtag { symbol } => symbol,
        }
    }

    /// Returns the URL fields, if this is a URL.
    #[must_use]
    pub const fn url_fields(&self) -> Option<&UrlFields> {
        match &self.fields {
            EntityFields::Url(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns the list slug, if this is a list reference.
    #[must_use]
    pub fn list_slug(&self) -> Option<&str> {
        match &self.fields {
            EntityFields::Mention { list_slug, .. } => list_slug.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' at {}", self.kind, self.text, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_slug_sets_kind() {
        let list = Entity::mention(Span::new(0, 13), "@jack/friends", "jack", Some("friends"));
        assert_eq!(list.kind, EntityKind::List);
        assert_eq!(list.label(), "jack");
        assert_eq!(list.list_slug(), Some("friends"));

        let mention = Entity::mention(Span::new(0, 5), "@jack", "jack", None);
        assert_eq!(mention.kind, EntityKind::Mention);
        assert_eq!(mention.list_slug(), None);
    }

    #[test]
    fn url_label_is_text() {
        let fields = UrlFields {
            protocol: None,
            domain: "example.com".to_string(),
            port: None,
            path: None,
            query: None,
        };
        let url = Entity::url(Span::new(0, 11), "example.com", fields);
        assert_eq!(url.label(), "example.com");
        assert_eq!(url.url_fields().map(|f| f.domain.as_str()), Some("example.com"));
    }

    #[test]
    fn display() {
        let tag = Entity::hashtag(Span::new(1, 5), "#tag", "tag");
        assert_eq!(tag.to_string(), "hashtag '#tag' at [1, 5)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip() {
        let cashtag = Entity::cashtag(Span::new(0, 5), "$TWTR", "TWTR");
        let json = serde_json::to_string(&cashtag).unwrap();
        assert!(json.contains("\"kind\":\"cashtag\""));
        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cashtag);
    }
}
