use lurewatch_common::email::SenderCredentials;
use lurewatch_common::models::user_settings::UserSettings;
use lurewatch_common::validators;

/// Resolves the sender identity for a launch. Priority order:
///
/// 1. The user's stored credential record, when both address and secret are
///    present and usable.
/// 2. A sender address supplied in the launch request, paired with the
///    process-wide fallback secret.
///
/// Returns `None` when neither source yields a usable address; the caller
/// must fail the launch before creating any rows.
pub fn resolve(
    stored: Option<&UserSettings>,
    request_address: Option<&str>,
    fallback_secret: Option<&str>,
) -> Option<SenderCredentials> {
    if let Some(settings) = stored {
        if let (Some(address), Some(secret)) = (
            settings.sender_address.as_deref(),
            settings.sender_secret.as_deref(),
        ) {
            if !secret.is_empty() && validators::is_valid_email(address) {
                return Some(SenderCredentials {
                    address: String::from(address),
                    secret: String::from(secret),
                });
            }
        }
    }

    if let (Some(address), Some(secret)) = (request_address, fallback_secret) {
        if !secret.is_empty() && validators::is_valid_email(address) {
            return Some(SenderCredentials {
                address: String::from(address),
                secret: String::from(secret),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::SystemTime;
    use uuid::Uuid;

    fn settings_with(address: Option<&str>, secret: Option<&str>) -> UserSettings {
        UserSettings {
            user_id: Uuid::now_v7(),
            company_name: String::from("Initech"),
            default_template: String::from("SECURITY_ALERT"),
            sender_address: address.map(String::from),
            sender_secret: secret.map(String::from),
            updated_timestamp: SystemTime::now(),
        }
    }

    #[test]
    fn test_stored_record_beats_request_address() {
        let settings = settings_with(Some("stored@x.com"), Some("stored-secret"));

        let credentials = resolve(
            Some(&settings),
            Some("requested@y.com"),
            Some("fallback-secret"),
        )
        .unwrap();

        assert_eq!(credentials.address, "stored@x.com");
        assert_eq!(credentials.secret, "stored-secret");
    }

    #[test]
    fn test_request_address_pairs_with_fallback_secret() {
        let credentials =
            resolve(None, Some("requested@y.com"), Some("fallback-secret")).unwrap();

        assert_eq!(credentials.address, "requested@y.com");
        assert_eq!(credentials.secret, "fallback-secret");
    }

    #[test]
    fn test_incomplete_stored_record_falls_through() {
        let no_secret = settings_with(Some("stored@x.com"), None);

        let credentials = resolve(
            Some(&no_secret),
            Some("requested@y.com"),
            Some("fallback-secret"),
        )
        .unwrap();

        assert_eq!(credentials.address, "requested@y.com");

        let empty_secret = settings_with(Some("stored@x.com"), Some(""));

        assert!(resolve(Some(&empty_secret), None, None).is_none());
    }

    #[test]
    fn test_invalid_stored_address_falls_through() {
        let settings = settings_with(Some("not-an-address"), Some("stored-secret"));

        let credentials = resolve(
            Some(&settings),
            Some("requested@y.com"),
            Some("fallback-secret"),
        )
        .unwrap();

        assert_eq!(credentials.address, "requested@y.com");
    }

    #[test]
    fn test_no_usable_source_yields_none() {
        assert!(resolve(None, None, None).is_none());
        assert!(resolve(None, Some("requested@y.com"), None).is_none());
        assert!(resolve(None, None, Some("fallback-secret")).is_none());
        assert!(resolve(None, Some("not-an-address"), Some("fallback-secret")).is_none());
    }
}
