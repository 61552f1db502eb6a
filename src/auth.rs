//! Bearer token authentication.
//!
//! Sign-in exchanges an email and password for a JSON Web Token. Protected
//! route handlers take a [Claims] argument, which extracts and verifies the
//! bearer token before the handler body runs.

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts, State},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    user::{UserId, get_user_by_email},
};

// Adapted from https://github.com/tokio-rs/axum/blob/main/examples/jwt/src/main.rs

/// How long a token stays valid after sign-in.
const TOKEN_LIFETIME: Duration = Duration::hours(24);

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: i64,
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
}

impl Claims {
    /// The ID of the authenticated user.
    pub fn user_id(&self) -> UserId {
        UserId::new(self.sub)
    }
}

impl<S> FromRequestParts<S> for Claims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::Unauthorized)?;

        let state = AppState::from_ref(state);
        let token_data = decode_jwt(bearer.token(), &state.jwt_decoding_key)?;

        Ok(token_data.claims)
    }
}

/// The request body for sign-in.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Email entered during sign-in.
    pub email: String,
    /// Password entered during sign-in.
    pub password: String,
}

/// Handler for sign-in requests.
///
/// Responds with a bearer token for the user on success.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the email does not belong to a
/// registered user or the password is wrong. The two cases are
/// indistinguishable from the response.
pub async fn sign_in_endpoint(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<serde_json::Value>, Error> {
    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_email(&credentials.email, &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?
    };

    if !user.password_hash.verify(&credentials.password)? {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_jwt(user.id, &state.jwt_encoding_key)?;

    Ok(Json(json!({ "token": token })))
}

fn encode_jwt(user_id: UserId, encoding_key: &EncodingKey) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id.as_i64(),
        exp: (now + TOKEN_LIFETIME).unix_timestamp() as usize,
        iat: now.unix_timestamp() as usize,
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|_| Error::TokenCreation)
}

fn decode_jwt(token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, Error> {
    decode(token, decoding_key, &Validation::default()).map_err(|_| Error::Unauthorized)
}
