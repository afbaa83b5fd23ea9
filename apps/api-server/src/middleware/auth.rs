//! Authentication guard and extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};

use inkwell_core::ports::{TokenClaims, TokenService};

use crate::state::AppState;

/// Name of the cookie checked when no Authorization header is present.
/// Browser flows carry the JWT here instead of a header.
const SESSION_COOKIE: &str = "session";

const DEFAULT_LOGIN_PATH: &str = "/api/auth/login";

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
///
/// Extraction failure does not produce an error page: the response is a
/// `302 Found` pointing at the configured login path, matching the
/// redirect-to-login contract for every protected action.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub email: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Redirect issued when a protected action is hit without a valid session.
#[derive(Debug)]
pub struct LoginRedirect {
    login_path: String,
}

impl LoginRedirect {
    fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }
}

impl std::fmt::Display for LoginRedirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "redirecting unauthenticated request to {}", self.login_path)
    }
}

impl actix_web::ResponseError for LoginRedirect {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::FOUND
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::Found()
            .insert_header((header::LOCATION, self.login_path.clone()))
            .finish()
    }
}

/// Pull the JWT out of the Authorization header or the session cookie.
fn bearer_token(req: &HttpRequest) -> Option<String> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        if let Ok(auth_str) = value.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
        return None;
    }

    req.cookie(SESSION_COOKIE).map(|c| c.value().to_string())
}

impl FromRequest for Identity {
    type Error = LoginRedirect;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = match req.app_data::<actix_web::web::Data<AppState>>() {
            Some(state) => state,
            None => {
                tracing::error!("AppState not found in app data");
                return ready(Err(LoginRedirect::new(DEFAULT_LOGIN_PATH)));
            }
        };

        let token = match bearer_token(req) {
            Some(token) => token,
            None => return ready(Err(LoginRedirect::new(state.login_path.clone()))),
        };

        match state.tokens.validate_token(&token) {
            Ok(claims) => ready(Ok(Identity::from(claims))),
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                ready(Err(LoginRedirect::new(state.login_path.clone())))
            }
        }
    }
}
