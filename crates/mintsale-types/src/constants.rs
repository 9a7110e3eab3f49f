//! System-wide constants for the mintsale engine.

/// Default per-transaction limit for public minting.
pub const DEFAULT_MAX_MINTABLE_TOKENS: u32 = 20;

/// First token id handed out by an ownership registry.
pub const FIRST_TOKEN_ID: u64 = 1;

/// Suffix appended to `{base_token_uri}/{id}` when resolving a token URI.
pub const TOKEN_URI_SUFFIX: &str = ".json";

/// Separator between the base token URI and the token id.
pub const TOKEN_URI_SEPARATOR: &str = "/";

/// Domain separator for the event journal digest chain.
pub const JOURNAL_DOMAIN: &[u8] = b"mintsale:journal:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "mintsale";
