use crate::error::SiteError;

pub const MAX_SEARCH_LENGTH: usize = 100;
pub const ZIP_LENGTH: usize = 5;
pub const ZIP_ERROR: &str = "Please enter a valid 5-digit ZIP code.";
pub const MISSING_SLUG_ERROR: &str = "Missing article slug";

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, SiteError> {
    if input.len() > max_len {
        return Err(SiteError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(SiteError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a search string: enforce length, strip control chars, trim.
pub fn validate_search(input: &str) -> Result<String, SiteError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Validate a route slug. Blank input and the literal `undefined` (any case)
/// are rejected; a client-side router sends the latter when it has no value.
pub fn validate_slug(input: &str) -> Result<String, SiteError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("undefined") {
        return Err(SiteError::InvalidInput(MISSING_SLUG_ERROR.to_string()));
    }
    Ok(trimmed.to_string())
}

/// What the ZIP field holds after each keystroke: digits only, at most five.
pub fn sanitize_zip(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(ZIP_LENGTH)
        .collect()
}

/// Validate a ZIP code for submission.
pub fn validate_zip(input: &str) -> Result<String, SiteError> {
    let zip = sanitize_zip(input);
    if zip.len() != ZIP_LENGTH {
        return Err(SiteError::InvalidInput(ZIP_ERROR.to_string()));
    }
    Ok(zip)
}

/// Quote page link for a ZIP code.
pub fn quotes_href(input: &str) -> Result<String, SiteError> {
    let zip = validate_zip(input)?;
    Ok(format!("/quotes?zip={}", zip))
}

/// Validate an HTML id / anchor: non-empty after trimming and free of whitespace.
pub fn validate_anchor_id(input: &str) -> Result<String, SiteError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SiteError::InvalidInput("id must not be empty".to_string()));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(SiteError::InvalidInput(format!(
            "invalid id '{}'. Ids cannot contain spaces",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_strips_control_chars() {
        assert_eq!(validate_search(" sr22\u{7}\n ").unwrap(), "sr22");
    }

    #[test]
    fn search_rejects_empty_and_long() {
        assert!(validate_search(" \t ").is_err());
        assert!(validate_search(&"a".repeat(MAX_SEARCH_LENGTH + 1)).is_err());
    }

    #[test]
    fn slug_rejects_blank_and_undefined() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("   ").is_err());
        assert!(validate_slug("undefined").is_err());
        assert!(validate_slug("Undefined").is_err());
        assert_eq!(validate_slug(" sr22-basics ").unwrap(), "sr22-basics");
    }

    #[test]
    fn slug_error_message() {
        let err = validate_slug("undefined").unwrap_err();
        match err {
            SiteError::InvalidInput(msg) => assert_eq!(msg, MISSING_SLUG_ERROR),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zip_keeps_five_digits() {
        assert_eq!(sanitize_zip("9a0-2 10x99"), "90210");
        assert_eq!(sanitize_zip("abc"), "");
    }

    #[test]
    fn short_zip_is_rejected() {
        let err = validate_zip("1234").unwrap_err();
        assert_eq!(err.to_string(), format!("Invalid input: {}", ZIP_ERROR));
    }

    #[test]
    fn valid_zip_builds_quotes_link() {
        assert_eq!(quotes_href(" 10001 ").unwrap(), "/quotes?zip=10001");
        assert!(quotes_href("1000").is_err());
    }

    #[test]
    fn anchor_ids() {
        assert_eq!(validate_anchor_id(" pricing ").unwrap(), "pricing");
        assert!(validate_anchor_id("two words").is_err());
        assert!(validate_anchor_id("  ").is_err());
    }
}
