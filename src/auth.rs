use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::ApiError,
    models::Admin,
    repository::RepositoryState,
};

/// Claims
///
/// Represents the payload structure signed into every admin JSON Web Token (JWT).
/// These claims are signed with the server's shared secret and validated upon
/// every mutating request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): The UUID of the admin that logged in.
    pub sub: Uuid,
    /// The admin's email, carried so the identity is self-contained.
    pub email: String,
    /// Expiration Time (exp): Timestamp after which the JWT must not be accepted.
    pub exp: usize,
    /// Issued At (iat): Timestamp when the JWT was issued.
    pub iat: usize,
}

/// issue_token
///
/// Signs a bearer token for a successfully authenticated admin, embedding the
/// admin id and email with the configured expiry. There is no refresh or
/// revocation mechanism; a token stays valid until its `exp` claim passes.
pub fn issue_token(admin: &Admin, config: &AppConfig) -> Result<String, ApiError> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: admin.id,
        email: admin.email.clone(),
        iat: now,
        exp: now + (config.jwt_expiry_hours as usize) * 3600,
    };
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    let token = encode(&Header::default(), &claims, &key)?;
    Ok(token)
}

/// AuthUser Extractor Result
///
/// The resolved identity of an authenticated request: the admin id and email
/// decoded from the token. By contract the gate does NOT re-check that the
/// admin still exists in storage; the token is trusted until expiry.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a function
/// argument in any protected handler and as the guard inside `auth_middleware`.
/// This cleanly separates authentication (middleware/extractor) from business
/// logic (the handler).
///
/// The process:
/// 1. Dependency Resolution: Accessing Repository and AppConfig from the application state.
/// 2. Local Bypass: Allowing development-time access using the 'x-admin-id' header.
/// 3. Token Validation: Standard Bearer token extraction and JWT decoding.
///
/// Rejection: Returns StatusCode::UNAUTHORIZED (401) on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    // The repository is only consulted for the local development bypass.
    RepositoryState: FromRef<S>,
    // Allows the extractor to pull the AppConfig (for JWT secret and Env check).
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // 1. Dependency Resolution
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        // 2. Local Development Bypass Check
        // If the application is running in Env::Local, we allow authentication by
        // providing a known admin UUID in the 'x-admin-id' header. The id must
        // still map to a real admin row, so the bypass cannot fabricate identities.
        if config.env == Env::Local {
            if let Some(admin_id_header) = parts.headers.get("x-admin-id") {
                if let Ok(id_str) = admin_id_header.to_str() {
                    if let Ok(admin_id) = Uuid::parse_str(id_str) {
                        if let Ok(Some(admin)) = repo.get_admin(admin_id).await {
                            return Ok(AuthUser {
                                id: admin.id,
                                email: admin.email,
                            });
                        }
                    }
                }
            }
        }
        // If Env is Production, or if the bypass failed (e.g., header was bad or
        // admin not found), execution falls through to the standard JWT flow.

        // 3. Token Extraction
        // Attempt to retrieve the Authorization header and ensure it is prefixed with "Bearer ".
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?;

        // 4. JWT Decoding Setup
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::default();
        // Ensure expiration time validation is always active.
        validation.validate_exp = true;

        // 5. Decode and Validate the Token
        let token_data = match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(data) => data,
            Err(e) => {
                match e.kind() {
                    // Token expired: the most common failure for a valid-but-old token.
                    ErrorKind::ExpiredSignature => return Err(StatusCode::UNAUTHORIZED),
                    // Catch all other failure types (bad signature, malformed token, etc.).
                    _ => return Err(StatusCode::UNAUTHORIZED),
                }
            }
        };

        // Success: the decoded claims ARE the identity. No storage lookup here;
        // deleting an admin does not invalidate tokens already issued.
        Ok(AuthUser {
            id: token_data.claims.sub,
            email: token_data.claims.email,
        })
    }
}
