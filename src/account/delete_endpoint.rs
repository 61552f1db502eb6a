//! Defines the endpoint for deleting an account.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    AppState, Error,
    account::core::{AccountId, delete_account},
    auth::Claims,
};

/// A route handler for deleting one of the authenticated user's accounts.
///
/// Deleting an account also deletes the transactions recorded against it.
/// Responds with 404 if the account does not exist or belongs to a different
/// user.
pub async fn delete_account_endpoint(
    State(state): State<AppState>,
    claims: Claims,
    Path(account_id): Path<AccountId>,
) -> Result<impl IntoResponse, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_account(account_id, claims.user_id(), &connection)?;

    Ok(Json(json!({ "message": "account deleted" })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{
            get_account_balance, new_test_server_with_user, post_account, sign_up_and_sign_in,
        },
        transaction::Transaction,
    };

    #[tokio::test]
    async fn deletes_account_and_its_transactions() {
        let (server, token) = new_test_server_with_user("alex@example.com").await;
        let account = post_account(&server, &token, "Savings").await;

        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "account_id": account.id,
                "kind": "income",
                "amount": 500.0,
                "date": "2026-01-15",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        server
            .delete(&format_endpoint(endpoints::ACCOUNT, account.id))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        server
            .get(&format_endpoint(endpoints::ACCOUNT, account.id))
            .authorization_bearer(&token)
            .await
            .assert_status_not_found();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await;
        assert!(response.json::<Vec<Transaction>>().is_empty());
    }

    #[tokio::test]
    async fn delete_reverses_transfer_legs_on_surviving_accounts() {
        let (server, token) = new_test_server_with_user("alex@example.com").await;
        let savings = post_account(&server, &token, "Savings").await;
        let spending = post_account(&server, &token, "Spending").await;

        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "account_id": savings.id,
                "kind": "income",
                "amount": 100.0,
                "date": "2026-01-10",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "account_id": savings.id,
                "kind": "transfer",
                "amount": 30.0,
                "transfer_account_id": spending.id,
                "date": "2026-01-15",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        assert_eq!(get_account_balance(&server, &token, spending.id).await, 30.0);

        server
            .delete(&format_endpoint(endpoints::ACCOUNT, savings.id))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        // The transfer row is gone, so its credit to Spending must be too.
        assert_eq!(get_account_balance(&server, &token, spending.id).await, 0.0);
    }

    #[tokio::test]
    async fn delete_fails_with_not_found_for_other_users_account() {
        let (server, token) = new_test_server_with_user("alex@example.com").await;
        let account = post_account(&server, &token, "Savings").await;
        let other_token = sign_up_and_sign_in(&server, "sam@example.com").await;

        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "account_id": account.id,
                "kind": "income",
                "amount": 500.0,
                "date": "2026-01-15",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        server
            .delete(&format_endpoint(endpoints::ACCOUNT, account.id))
            .authorization_bearer(&other_token)
            .await
            .assert_status_not_found();

        // The account and its history must be untouched.
        assert_eq!(get_account_balance(&server, &token, account.id).await, 500.0);
        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(transactions.len(), 1);
    }
}
