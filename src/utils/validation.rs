//! Centralized validation helpers.

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Validate that a string is a hex-encoded SHA-256 digest (64 hex characters).
///
/// # Examples
///
/// ```
/// use forecast_match::utils::validation::is_valid_digest;
///
/// assert!(is_valid_digest(
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// ));
/// assert!(!is_valid_digest("not-a-digest"));
/// ```
#[must_use]
pub fn is_valid_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Normalize a digest string to trimmed lowercase.
/// Returns None if the input is not a valid digest.
#[must_use]
pub fn normalize_digest(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if is_valid_digest(trimmed) {
        Some(trimmed.to_lowercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_is_valid_digest() {
        assert!(is_valid_digest(ABC));
        assert!(is_valid_digest(&ABC.to_uppercase()));
        assert!(!is_valid_digest(&ABC[..63]));
        assert!(!is_valid_digest(&format!("{ABC}0")));
        assert!(!is_valid_digest(&ABC.replace('b', "g")));
        assert!(!is_valid_digest(""));
    }

    #[test]
    fn test_normalize_digest() {
        assert_eq!(
            normalize_digest(&format!("  {}\n", ABC.to_uppercase())),
            Some(ABC.to_string())
        );
        assert_eq!(normalize_digest("xyz"), None);
    }
}
