//! Maps domain errors to HTTP responses
//!
//! Every error body has the shape `{ "error": CODE, "message": text }`,
//! optionally with `details`.

use actix_web::{http::StatusCode, HttpResponse};
use validator::ValidationErrors;

use ks_core::errors::{AuthError, DomainError, SessionError, TokenError, ValidationError};
use ks_shared::{error_codes, ErrorResponse};

/// Status code and error code for a domain error
pub fn classify(error: &DomainError) -> (StatusCode, &'static str) {
    match error {
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
        DomainError::Auth(auth) => match auth {
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, error_codes::INVALID_CREDENTIALS)
            }
            AuthError::DuplicateAccount { .. } => {
                (StatusCode::CONFLICT, error_codes::DUPLICATE_ACCOUNT)
            }
            AuthError::Forbidden => (StatusCode::FORBIDDEN, error_codes::FORBIDDEN),
            AuthError::RegistrationDisabled => {
                (StatusCode::FORBIDDEN, error_codes::REGISTRATION_DISABLED)
            }
            AuthError::RegistrationRollbackFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        },
        DomainError::Token(token) => match token {
            TokenError::Expired => (StatusCode::UNAUTHORIZED, error_codes::TOKEN_EXPIRED),
            TokenError::SignatureInvalid => {
                (StatusCode::UNAUTHORIZED, error_codes::TOKEN_SIGNATURE_INVALID)
            }
            TokenError::Malformed | TokenError::UnexpectedType => {
                (StatusCode::UNAUTHORIZED, error_codes::TOKEN_MALFORMED)
            }
            TokenError::GenerationFailed
            | TokenError::KeyGenerationFailed
            | TokenError::KeyDecodeFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        },
        DomainError::Session(session) => match session {
            SessionError::NotFound => (StatusCode::UNAUTHORIZED, error_codes::SESSION_NOT_FOUND),
            SessionError::Expired => (StatusCode::UNAUTHORIZED, error_codes::SESSION_EXPIRED),
        },
        DomainError::StoreUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, error_codes::STORE_UNAVAILABLE)
        }
        DomainError::Internal { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
        }
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// Server-side failures are logged with their full message and answered
/// with a generic one; client errors echo the domain message.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let (status, code) = classify(&error);

    let mut body = if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
        let message = if status == StatusCode::SERVICE_UNAVAILABLE {
            "Service temporarily unavailable. Please try again later"
        } else {
            "An internal error occurred"
        };
        ErrorResponse::new(code, message)
    } else {
        tracing::debug!(error = %error, code, "Request rejected");
        ErrorResponse::new(code, error.to_string())
    };

    match &error {
        DomainError::Auth(AuthError::DuplicateAccount { field }) => {
            body = body.add_detail("field", field.as_str());
        }
        DomainError::Validation(ValidationError::RequiredField { field }) => {
            body = body.add_detail("field", field);
        }
        _ => {}
    }

    HttpResponse::build(status).json(body)
}

/// Turns request DTO validation failures into a 400 with per-field messages
pub fn handle_validation_errors(errors: ValidationErrors) -> HttpResponse {
    let mut body = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        body = body.add_detail(field.to_string(), messages);
    }

    HttpResponse::BadRequest().json(body)
}

/// 401 for requests that never reached a service (missing bearer token)
pub fn unauthorized(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::new(error_codes::UNAUTHORIZED, message))
}
