//! Extractor and validator options.

/// Options for [`Extractor`](crate::Extractor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtractorConfig {
    /// Accept domains written without `http://` or `https://`.
    pub include_protocol_less_urls: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            include_protocol_less_urls: true,
        }
    }
}

/// Options for [`UrlSyntaxValidator`](crate::UrlSyntaxValidator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UrlValidationOptions {
    /// Accept hosts with non-ASCII labels.
    pub unicode_domains: bool,
    /// Require an `http` or `https` scheme.
    pub require_protocol: bool,
}

impl Default for UrlValidationOptions {
    fn default() -> Self {
        Self {
            unicode_domains: true,
            require_protocol: true,
        }
    }
}

impl UrlValidationOptions {
    /// Returns these options with `unicode_domains` set.
    #[must_use]
    pub const fn unicode_domains(mut self, allow: bool) -> Self {
        self.unicode_domains = allow;
        self
    }

    /// Returns these options with `require_protocol` set.
    #[must_use]
    pub const fn require_protocol(mut self, require: bool) -> Self {
        self.require_protocol = require;
        self
    }
}
