use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use scamguard_types::api::Claims;

use crate::error::ApiError;
use crate::state::AppState;

/// Extract and validate the bearer JWT, stashing [`Claims`] as a request
/// extension for handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims =
        claims_from_headers(req.headers(), &state.jwt_secret).ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Best-effort claims for routes that serve both visitors and signed-in
/// users. Invalid or absent tokens read as anonymous, never as an error.
pub fn claims_from_headers(headers: &HeaderMap, secret: &str) -> Option<Claims> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

/// Guard for the sweep trigger: the external scheduler authenticates with a
/// pre-shared secret instead of a user JWT.
pub async fn require_sweep_secret(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented != Some(state.sweep_secret.as_str()) {
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;

    fn token_for(secret: &str, exp: i64) -> String {
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: Some("ann@example.com".to_string()),
            exp: exp as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );
        headers
    }

    #[test]
    fn accepts_valid_bearer_token() {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
        let token = token_for("secret-1", exp);

        let claims = claims_from_headers(&bearer_headers(&token), "secret-1");
        assert!(claims.is_some());
        assert_eq!(claims.unwrap().email.as_deref(), Some("ann@example.com"));
    }

    #[test]
    fn rejects_wrong_secret_expired_and_malformed() {
        let future = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
        let past = (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp();

        let wrong_key = token_for("secret-1", future);
        assert!(claims_from_headers(&bearer_headers(&wrong_key), "secret-2").is_none());

        let expired = token_for("secret-1", past);
        assert!(claims_from_headers(&bearer_headers(&expired), "secret-1").is_none());

        assert!(claims_from_headers(&bearer_headers("not-a-jwt"), "secret-1").is_none());
        assert!(claims_from_headers(&HeaderMap::new(), "secret-1").is_none());

        let mut no_scheme = HeaderMap::new();
        no_scheme.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert!(claims_from_headers(&no_scheme, "secret-1").is_none());
    }
}
