//! Maps raw transport/backend error text to user-facing guidance.
//!
//! The rules are a declarative ordered table rather than nested conditionals:
//! a message can match several patterns, so evaluation order is part of the
//! contract and the first matching rule wins.

/// Guidance when the AI provider host cannot be resolved or reached.
pub const MSG_ADDRESS_UNRESOLVED: &str =
    "AI service address could not be resolved; switch providers or check network/DNS in AI service settings.";

/// Guidance when the AI provider rejects the credentials.
pub const MSG_AUTH_FAILED: &str =
    "AI service authentication failed; check API Key/AK-SK in AI service settings.";

/// Guidance when no AI service configuration is enabled.
pub const MSG_NO_ACTIVE_CONFIG: &str =
    "No usable AI service configuration found; enable one in AI service settings.";

/// Fallback when the raw message is empty or absent.
pub const MSG_REQUEST_FAILED: &str = "request failed";

/// Ordered (patterns, message) table. Patterns are lowercase substrings
/// matched against the lowercased raw message.
const RULES: &[(&[&str], &str)] = &[
    (
        &["no such host", "dial tcp", "ark.cn-beijing.volces.com"],
        MSG_ADDRESS_UNRESOLVED,
    ),
    (
        &["authenticationerror", "unauthorized", "api key", "ak/sk"],
        MSG_AUTH_FAILED,
    ),
    (
        &["no active config found", "no image ai config found"],
        MSG_NO_ACTIVE_CONFIG,
    ),
];

/// Normalizes a raw error message into a user-presentable one.
///
/// Unmatched non-empty messages pass through verbatim; empty input yields
/// [`MSG_REQUEST_FAILED`].
pub fn normalize_error_message(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    for (patterns, message) in RULES {
        if patterns.iter().any(|pattern| lowered.contains(pattern)) {
            return (*message).to_owned();
        }
    }
    if raw.trim().is_empty() {
        MSG_REQUEST_FAILED.to_owned()
    } else {
        raw.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dns_failure_maps_to_address_guidance() {
        assert_eq!(
            normalize_error_message("dial tcp: no such host"),
            MSG_ADDRESS_UNRESOLVED
        );
    }

    #[test]
    fn provider_hostname_maps_to_address_guidance() {
        assert_eq!(
            normalize_error_message("Get https://ark.cn-beijing.volces.com: timeout"),
            MSG_ADDRESS_UNRESOLVED
        );
    }

    #[test]
    fn unauthorized_maps_to_auth_guidance() {
        assert_eq!(normalize_error_message("unauthorized"), MSG_AUTH_FAILED);
        assert_eq!(
            normalize_error_message("AuthenticationError: invalid API Key"),
            MSG_AUTH_FAILED
        );
    }

    #[test]
    fn missing_config_maps_to_config_guidance() {
        assert_eq!(
            normalize_error_message("No Active Config Found for image"),
            MSG_NO_ACTIVE_CONFIG
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            normalize_error_message("DIAL TCP 10.0.0.1:443 refused"),
            MSG_ADDRESS_UNRESOLVED
        );
    }

    #[test]
    fn address_rule_wins_over_auth_rule() {
        // "dial tcp" and "api key" both present; the address rule is first.
        assert_eq!(
            normalize_error_message("dial tcp failed while sending api key"),
            MSG_ADDRESS_UNRESOLVED
        );
    }

    #[test]
    fn unmatched_message_passes_through_verbatim() {
        assert_eq!(normalize_error_message("disk full"), "disk full");
    }

    #[test]
    fn empty_message_falls_back_to_generic() {
        assert_eq!(normalize_error_message(""), MSG_REQUEST_FAILED);
        assert_eq!(normalize_error_message("   "), MSG_REQUEST_FAILED);
    }
}
