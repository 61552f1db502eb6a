//! Defines the endpoint for fetching a single account by ID.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    AppState, Error,
    account::core::{AccountId, AccountResponse, get_account},
    auth::Claims,
};

/// A route handler for getting one of the authenticated user's accounts by
/// its ID.
///
/// Responds with 404 if the account does not exist or belongs to a different
/// user.
pub async fn get_account_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(account_id): Path<AccountId>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, claims.user_id(), &connection)?;

    Ok(Json(AccountResponse::from(&account)))
}

#[cfg(test)]
mod tests {
    use crate::{
        account::core::AccountResponse,
        endpoints::{self, format_endpoint},
        test_utils::{new_test_server_with_user, post_account, sign_up_and_sign_in},
    };

    #[tokio::test]
    async fn gets_own_account() {
        let (server, token) = new_test_server_with_user("alex@example.com").await;
        let account = post_account(&server, &token, "Savings").await;

        let response = server
            .get(&format_endpoint(endpoints::ACCOUNT, account.id))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<AccountResponse>(), account);
    }

    #[tokio::test]
    async fn get_fails_with_not_found_for_other_users_account() {
        let (server, token) = new_test_server_with_user("alex@example.com").await;
        let account = post_account(&server, &token, "Savings").await;
        let other_token = sign_up_and_sign_in(&server, "sam@example.com").await;

        let response = server
            .get(&format_endpoint(endpoints::ACCOUNT, account.id))
            .authorization_bearer(&other_token)
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn get_fails_with_not_found_for_missing_account() {
        let (server, token) = new_test_server_with_user("alex@example.com").await;

        let response = server
            .get(&format_endpoint(endpoints::ACCOUNT, 999))
            .authorization_bearer(&token)
            .await;

        response.assert_status_not_found();
    }
}
