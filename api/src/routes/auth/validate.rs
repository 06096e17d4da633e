use actix_web::HttpResponse;

use crate::dto::ValidateTokenResponse;
use crate::middleware::AuthContext;

/// Handler for GET /api/v1/auth/validate
///
/// The bearer middleware has already validated the access token; this
/// echoes what it found.
pub async fn validate_token(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(ValidateTokenResponse {
        valid: true,
        account_id: auth.account_id,
        roles: auth.roles,
        expires_at: auth.expires_at,
    })
}
