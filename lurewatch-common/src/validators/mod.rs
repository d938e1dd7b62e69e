use lettre::Address;

/// RFC-compliant-enough validation via lettre's address parser, so anything
/// accepted here is also acceptable to the transport later.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 320 && email.parse::<Address>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_addresses() {
        assert!(is_valid_email("bob@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("bob"));
        assert!(!is_valid_email("bob@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("bob@example com"));
    }

    #[test]
    fn test_rejects_oversized_addresses() {
        let oversized = format!("{}@example.com", "a".repeat(320));
        assert!(!is_valid_email(&oversized));
    }
}
