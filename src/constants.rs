//! Constants for entity extraction and URL validation.

/// Maximum effective URL length in characters, after IDNA conversion of the host.
pub const MAX_URL_LENGTH: usize = 4096;

/// DNS label maximum length.
pub const MAX_DNS_LABEL_LENGTH: usize = 63;

/// DNS domain maximum length.
pub const MAX_DNS_DOMAIN_LENGTH: usize = 253;

/// Maximum screen name length in a mention.
pub const MAX_SCREEN_NAME_LENGTH: usize = 20;

/// Maximum list slug length, excluding the leading slash.
pub const MAX_LIST_SLUG_LENGTH: usize = 25;

/// Protocol counted towards the length of a URL written without one.
pub const ASSUMED_PROTOCOL: &str = "https://";
