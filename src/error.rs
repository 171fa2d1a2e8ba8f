//! Error types for registry construction, grammar compilation and URL validation.
//!
//! Extraction itself never fails: malformed text simply yields fewer entities.

use std::fmt;

/// Errors raised while building a [`TldRegistry`](crate::TldRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// One of the label sets is empty
    EmptySet {
        /// Which set was empty
        set: &'static str,
    },
    /// A label is not usable as a top-level domain
    InvalidLabel {
        /// The offending label
        label: String,
        /// Reason for invalidity
        reason: &'static str,
    },
    /// A special short label is missing from the country-code set
    SpecialNotCountryCode {
        /// The offending label
        label: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySet { set } => write!(f, "{set} TLD set is empty"),
            Self::InvalidLabel { label, reason } => {
                write!(f, "invalid TLD label '{label}': {reason}")
            }
            Self::SpecialNotCountryCode { label } => write!(
                f,
                "special short TLD '{label}' is not a country-code TLD"
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Errors raised while compiling a [`PatternSet`](crate::PatternSet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The TLD registry could not be loaded
    Registry(RegistryError),
    /// A grammar failed to compile
    Compile {
        /// Name of the grammar
        grammar: &'static str,
        /// Compiler message
        message: String,
    },
}

impl PatternError {
    pub(crate) fn compile(grammar: &'static str, err: &regex::Error) -> Self {
        Self::Compile {
            grammar,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry(e) => write!(f, "TLD registry unavailable: {e}"),
            Self::Compile { grammar, message } => {
                write!(f, "failed to compile {grammar} grammar: {message}")
            }
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Registry(e) => Some(e),
            Self::Compile { .. } => None,
        }
    }
}

impl From<RegistryError> for PatternError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

/// Errors that can occur when validating a whole URL string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSyntaxError {
    /// The input that failed to validate
    pub input: String,
    /// The component that failed
    pub kind: UrlSyntaxErrorKind,
}

/// The URL component that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSyntaxErrorKind {
    /// Input is empty
    Empty,
    /// Input could not be split into scheme, authority, path, query and fragment
    Malformed,
    /// Scheme missing or not allowed
    InvalidScheme {
        /// The scheme that was found, if any
        found: Option<String>,
    },
    /// Authority (userinfo, host, port) is invalid
    InvalidAuthority {
        /// The rejected authority
        authority: String,
    },
    /// Path contains characters outside the path grammar
    InvalidPath {
        /// The rejected path
        path: String,
    },
    /// Query contains characters outside the query grammar
    InvalidQuery {
        /// The rejected query
        query: String,
    },
    /// Fragment contains characters outside the fragment grammar
    InvalidFragment {
        /// The rejected fragment
        fragment: String,
    },
}

impl UrlSyntaxError {
    pub(crate) fn new(input: &str, kind: UrlSyntaxErrorKind) -> Self {
        Self {
            input: input.to_string(),
            kind,
        }
    }
}

impl fmt::Display for UrlSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid URL '{}': ", self.input)?;
        match &self.kind {
            UrlSyntaxErrorKind::Empty => write!(f, "input is empty"),
            UrlSyntaxErrorKind::Malformed => {
                write!(f, "cannot be split into URL components")
            }
            UrlSyntaxErrorKind::InvalidScheme { found } => match found {
                Some(s) => write!(f, "scheme '{s}' is not allowed; expected http or https"),
                None => write!(f, "missing scheme; URL must start with 'http://' or 'https://'"),
            },
            UrlSyntaxErrorKind::InvalidAuthority { authority } => {
                write!(f, "invalid authority '{authority}'")
            }
            UrlSyntaxErrorKind::InvalidPath { path } => write!(f, "invalid path '{path}'"),
            UrlSyntaxErrorKind::InvalidQuery { query } => write!(f, "invalid query '{query}'"),
            UrlSyntaxErrorKind::InvalidFragment { fragment } => {
                write!(f, "invalid fragment '{fragment}'")
            }
        }
    }
}

impl std::error::Error for UrlSyntaxError {}
