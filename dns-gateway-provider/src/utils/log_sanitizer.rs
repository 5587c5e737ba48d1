//! Keeps response bodies and credentials out of logs in full.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a secret left visible by [`mask_secret`].
const VISIBLE_PREFIX: usize = 4;

/// Truncate a string for safe logging.
///
/// Bodies over the limit are cut at a char boundary and suffixed with the
/// total byte length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= TRUNCATE_LIMIT)
        .last()
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}

/// Mask a credential for display, keeping only a short prefix.
///
/// Secrets of up to eight characters are masked completely.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= VISIBLE_PREFIX * 2 {
        return "*".repeat(count);
    }
    let prefix: String = secret.chars().take(VISIBLE_PREFIX).collect();
    format!("{prefix}{}", "*".repeat(count - VISIBLE_PREFIX))
}
