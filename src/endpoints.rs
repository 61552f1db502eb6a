//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/accounts/{account_id}',
//! tests build concrete paths with `format_endpoint`.

/// The route for registering new users.
pub const USERS: &str = "/api/users";
/// The route for exchanging credentials for an auth token.
pub const SIGN_IN: &str = "/api/sign_in";
/// The route to access accounts.
pub const ACCOUNTS: &str = "/api/accounts";
/// The route to access a single account.
pub const ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route for revealing an encrypted account field.
pub const ACCOUNT_REVEAL: &str = "/api/accounts/reveal";
/// The route to access transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for emailing a spreadsheet report.
pub const REPORTS: &str = "/api/reports";

/// The regex pattern for path parameters.
#[cfg(test)]
const PARAMETER_PATTERN: &str = r"\{[a-z_]+\}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// This function assumes that an endpoint path will only have a single
/// parameter, and will only replace the first one.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let re =
        regex::Regex::new(PARAMETER_PATTERN).expect("parameter pattern should be valid regex");

    re.replace(endpoint_path, id.to_string()).to_string()
}

// These tests are here so that we know the routes will parse as URIs.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;
    use regex::Regex;

    use crate::endpoints;

    use super::{PARAMETER_PATTERN, format_endpoint};

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_pattern_is_valid_regex() {
        Regex::new(PARAMETER_PATTERN).unwrap();
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::SIGN_IN);
        assert_endpoint_is_valid_uri(endpoints::ACCOUNTS);
        assert_endpoint_is_valid_uri(endpoints::ACCOUNT);
        assert_endpoint_is_valid_uri(endpoints::ACCOUNT_REVEAL);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::REPORTS);
    }

    #[test]
    fn format_endpoint_produces_valid_uri() {
        let formatted_path = format_endpoint("/api/accounts/{account_id}", 42);

        assert_eq!(formatted_path, "/api/accounts/42");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
