//! Authentication middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

use super::common::{ApiError, ApiResponse};
use crate::application::UserService;
use crate::domain::{DomainError, User, UserRole};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    Rejected(String),
    Unavailable,
}

/// Authentication state: tokens are resolved through the user service
#[derive(Clone)]
pub struct AuthState {
    pub user_service: Arc<UserService>,
}

/// The caller, as loaded from the store for this request
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Fails with 403 unless the caller holds one of `roles`.
    pub fn require_role<T>(&self, roles: &[UserRole]) -> Result<(), ApiError<T>> {
        if roles.contains(&self.role) {
            return Ok(());
        }
        debug!(user_id = %self.user_id, role = %self.role, "Role check failed");
        Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Insufficient permissions")),
        ))
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Bearer-token authentication middleware.
///
/// Inserts [`AuthenticatedUser`] into the request extensions.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match auth_state.user_service.authenticate(token).await {
        Ok(user) => {
            request
                .extensions_mut()
                .insert(AuthenticatedUser::from(user));
            next.run(request).await
        }
        Err(DomainError::Unauthorized(reason)) => auth_error_response(AuthError::Rejected(reason)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve bearer token");
            auth_error_response(AuthError::Unavailable)
        }
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (
            StatusCode::UNAUTHORIZED,
            "Missing authentication token".to_string(),
        ),
        AuthError::InvalidToken => (
            StatusCode::UNAUTHORIZED,
            "Invalid authentication token".to_string(),
        ),
        AuthError::Rejected(reason) => (StatusCode::UNAUTHORIZED, reason),
        AuthError::Unavailable => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
    };

    let body = Json(json!({
        "success": false,
        "error": message
    }));

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    use crate::infrastructure::crypto::jwt::JwtConfig;
    use crate::infrastructure::InMemoryRepositoryProvider;

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.email
    }

    fn app(service: Arc<UserService>) -> Router {
        let state = AuthState {
            user_service: service,
        };
        Router::new()
            .route("/me", get(whoami))
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    fn service() -> Arc<UserService> {
        Arc::new(UserService::new(
            Arc::new(InMemoryRepositoryProvider::new()),
            JwtConfig::new("middleware-secret", 1),
        ))
    }

    async fn call(router: Router, auth: Option<&str>) -> Response {
        let mut req = Request::builder().uri("/me");
        if let Some(value) = auth {
            req = req.header(header::AUTHORIZATION, value);
        }
        router
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("Basic abc"), None);
        assert_eq!(extract_token("Bearer "), None);
    }

    #[tokio::test]
    async fn missing_header_is_401() {
        let resp = call(app(service()), None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_401() {
        let resp = call(app(service()), Some("Bearer not.a.jwt")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler() {
        let svc = service();
        let auth = svc.register("Ana", "ana@example.com", "secret1").await.unwrap();

        let resp = call(
            app(svc),
            Some(&format!("Bearer {}", auth.access_token)),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ana@example.com");
    }

    #[tokio::test]
    async fn deactivated_user_token_is_rejected() {
        let svc = service();
        let auth = svc.register("Ana", "ana@example.com", "secret1").await.unwrap();
        svc.toggle_status(&auth.user.id).await.unwrap();

        let resp = call(
            app(svc),
            Some(&format!("Bearer {}", auth.access_token)),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn require_role_rejects_other_roles() {
        let viewer = AuthenticatedUser {
            user_id: "u1".into(),
            email: "v@example.com".into(),
            name: "V".into(),
            role: UserRole::Viewer,
        };
        assert!(viewer.require_role::<()>(&[UserRole::Viewer]).is_ok());
        let (status, _) = viewer.require_role::<()>(&[UserRole::Admin]).unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
