//! Top-level domain registry.
//!
//! The registry holds three label sets: generic TLDs, country-code TLDs and
//! the special short country-code TLDs that are trusted without a protocol.
//! Punycode labels are recognized by prefix rather than listed.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::error::RegistryError;
use crate::tld_data::{COUNTRY_CODE_TLDS, GENERIC_TLDS, SPECIAL_SHORT_TLDS};

/// Pattern matching a punycode-encoded label.
pub const PUNYCODE_PATTERN: &str = "(?:xn--[0-9a-z]+)";

const PUNYCODE_PREFIX: &str = "xn--";

static BUILTIN: Lazy<TldRegistry> = Lazy::new(|| TldRegistry {
    generic: GENERIC_TLDS.iter().map(|s| (*s).to_string()).collect(),
    country_code: COUNTRY_CODE_TLDS.iter().map(|s| (*s).to_string()).collect(),
    special_short: SPECIAL_SHORT_TLDS.iter().map(|s| (*s).to_string()).collect(),
});

/// An immutable set of known top-level domains.
///
/// # Examples
///
/// ```
/// use social_entities::TldRegistry;
///
/// let tlds = TldRegistry::builtin();
/// assert!(tlds.is_generic_tld("COM"));
/// assert!(tlds.is_country_code_tld("jp"));
/// assert!(tlds.is_special_short_tld("tv"));
/// assert!(TldRegistry::is_punycode("xn--p1ai"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TldRegistry {
    generic: HashSet<String>,
    country_code: HashSet<String>,
    special_short: HashSet<String>,
}

impl TldRegistry {
    /// Builds a registry from externally supplied label lists.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if:
    /// - Any of the three sets is empty
    /// - A label is empty or contains a dot or whitespace
    /// - A special short label is not also a country-code label
    pub fn from_labels<G, C, S>(
        generic: G,
        country_code: C,
        special_short: S,
    ) -> Result<Self, RegistryError>
    where
        G: IntoIterator,
        G::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let generic = Self::collect_labels(generic, "generic")?;
        let country_code = Self::collect_labels(country_code, "country-code")?;
        let special_short = Self::collect_labels(special_short, "special-short")?;

        if let Some(label) = special_short.iter().find(|l| !country_code.contains(*l)) {
            return Err(RegistryError::SpecialNotCountryCode {
                label: label.clone(),
            });
        }

        Ok(Self {
            generic,
            country_code,
            special_short,
        })
    }

    /// Returns the registry built from the embedded IANA-derived lists.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Returns true if `label` is a generic TLD.
    #[must_use]
    pub fn is_generic_tld(&self, label: &str) -> bool {
        self.generic.contains(&label.to_ascii_lowercase())
    }

    /// Returns true if `label` is a country-code TLD.
    #[must_use]
    pub fn is_country_code_tld(&self, label: &str) -> bool {
        self.country_code.contains(&label.to_ascii_lowercase())
    }

    /// Returns true if `label` is a country-code TLD usable without a protocol.
    #[must_use]
    pub fn is_special_short_tld(&self, label: &str) -> bool {
        self.special_short.contains(&label.to_ascii_lowercase())
    }

    /// Returns true if `label` is a punycode label (`xn--` followed by letters or digits).
    #[must_use]
    pub fn is_punycode(label: &str) -> bool {
        label.len() > PUNYCODE_PREFIX.len()
            && label.is_char_boundary(PUNYCODE_PREFIX.len())
            && label[..PUNYCODE_PREFIX.len()].eq_ignore_ascii_case(PUNYCODE_PREFIX)
            && label[PUNYCODE_PREFIX.len()..]
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
    }

    /// Returns the number of generic TLDs.
    #[must_use]
    pub fn generic_count(&self) -> usize {
        self.generic.len()
    }

    /// Returns the number of country-code TLDs.
    #[must_use]
    pub fn country_code_count(&self) -> usize {
        self.country_code.len()
    }

    /// Returns the generic TLDs as a non-capturing alternation.
    #[must_use]
    pub fn generic_alternation(&self) -> String {
        alternation(&self.generic)
    }

    /// Returns the country-code TLDs as a non-capturing alternation.
    #[must_use]
    pub fn country_code_alternation(&self) -> String {
        alternation(&self.country_code)
    }

    /// Returns the special short TLDs as a non-capturing alternation.
    #[must_use]
    pub fn special_short_alternation(&self) -> String {
        alternation(&self.special_short)
    }

    fn collect_labels<I>(labels: I, set: &'static str) -> Result<HashSet<String>, RegistryError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut out = HashSet::new();
        for label in labels {
            let label = label.as_ref();
            if label.is_empty() {
                return Err(RegistryError::InvalidLabel {
                    label: String::new(),
                    reason: "label is empty",
                });
            }
            if label.contains('.') {
                return Err(RegistryError::InvalidLabel {
                    label: label.to_string(),
                    reason: "label contains a dot",
                });
            }
            if label.chars().any(char::is_whitespace) {
                return Err(RegistryError::InvalidLabel {
                    label: label.to_string(),
                    reason: "label contains whitespace",
                });
            }
            out.insert(label.to_ascii_lowercase());
        }
        if out.is_empty() {
            return Err(RegistryError::EmptySet { set });
        }
        Ok(out)
    }
}

/// Longer labels sharing a prefix sort first in reverse lexicographic order.
fn alternation(labels: &HashSet<String>) -> String {
    let mut sorted: Vec<&str> = labels.iter().map(String::as_str).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let escaped: Vec<String> = sorted.into_iter().map(regex::escape).collect();
    format!("(?:{})", escaped.join("|"))
}
