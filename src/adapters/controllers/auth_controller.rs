use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, warn};

use crate::{
    adapters::{
        auth::{issue_token, AuthAccount},
        dto::auth_dto::{AuthResponse, LoginRequest, MeResponse, RegisterRequest},
        state::AppState,
    },
    application::{dto::account_dto::NewAccount, error::ApplicationError},
};

pub struct AuthController;

impl AuthController {
    /// POST /api/auth/register
    pub async fn register(
        State(app_state): State<AppState>,
        Json(body): Json<RegisterRequest>,
    ) -> Result<(StatusCode, Json<AuthResponse>), ApplicationError> {
        let email = body.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(ApplicationError::BadRequest(
                "A valid email is required".to_string(),
            ));
        }
        if body.password.len() < 6 {
            return Err(ApplicationError::BadRequest(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        let password_hash = bcrypt::hash(&body.password, bcrypt::DEFAULT_COST).map_err(|e| {
            ApplicationError::InternalError(format!("Failed to hash password: {}", e))
        })?;

        let account = app_state
            .account_repository
            .create(NewAccount {
                email,
                password_hash,
            })
            .await?;

        let token = issue_token(&account, &app_state.config.jwt_secret)?;

        info!(account_id = %account.id, "Account registered");

        Ok((
            StatusCode::CREATED,
            Json(AuthResponse {
                token,
                user: account.into(),
            }),
        ))
    }

    /// POST /api/auth/login
    pub async fn login(
        State(app_state): State<AppState>,
        Json(body): Json<LoginRequest>,
    ) -> Result<Json<AuthResponse>, ApplicationError> {
        let email = body.email.trim().to_lowercase();

        let account = app_state
            .account_repository
            .find_by_email(&email)
            .await?
            .ok_or(ApplicationError::Unauthorized)?;

        let password_ok = bcrypt::verify(&body.password, &account.password_hash).unwrap_or(false);
        if !password_ok {
            warn!(account_id = %account.id, "Failed login attempt");
            return Err(ApplicationError::Unauthorized);
        }

        if let Err(e) = app_state.account_repository.record_login(account.id).await {
            warn!("Failed to record login timestamp: {:?}", e);
        }

        let token = issue_token(&account, &app_state.config.jwt_secret)?;

        Ok(Json(AuthResponse {
            token,
            user: account.into(),
        }))
    }

    /// GET /api/auth/me
    pub async fn me(AuthAccount(account): AuthAccount) -> Json<MeResponse> {
        Json(MeResponse {
            user: account.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support::*;

    fn json_request(uri: &str, body: serde_json::Value) -> Request<axum::body::Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn register_login_me_flow() {
        let (state, _, _, _) = test_state();
        let app = crate::app(state);

        let registered = app
            .clone()
            .oneshot(json_request(
                "/api/auth/register",
                json!({"email": "User@Example.com", "password": "hunter22"}),
            ))
            .await
            .unwrap();
        assert_eq!(registered.status(), StatusCode::CREATED);
        let registered = body_json(registered).await;
        assert_eq!(registered["user"]["email"], "user@example.com");
        assert_eq!(registered["user"]["tier"], "free");
        assert!(registered["user"].get("passwordHash").is_none());

        let login = app
            .clone()
            .oneshot(json_request(
                "/api/auth/login",
                json!({"email": "user@example.com", "password": "hunter22"}),
            ))
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::OK);
        let token = body_json(login).await["token"].as_str().unwrap().to_string();

        let me = app
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(me.status(), StatusCode::OK);
        assert_eq!(body_json(me).await["user"]["email"], "user@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_registration_is_rejected() {
        let (state, _, _, _) = test_state();
        let app = crate::app(state);

        let first = app
            .clone()
            .oneshot(json_request(
                "/api/auth/register",
                json!({"email": "dup@example.com", "password": "hunter22"}),
            ))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .oneshot(json_request(
                "/api/auth/register",
                json!({"email": "dup@example.com", "password": "hunter22"}),
            ))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_unauthorized() {
        let (state, _, _, _) = test_state();
        let app = crate::app(state);

        app.clone()
            .oneshot(json_request(
                "/api/auth/register",
                json!({"email": "login@example.com", "password": "hunter22"}),
            ))
            .await
            .unwrap();

        let wrong_password = app
            .clone()
            .oneshot(json_request(
                "/api/auth/login",
                json!({"email": "login@example.com", "password": "hunter23"}),
            ))
            .await
            .unwrap();
        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

        let unknown = app
            .oneshot(json_request(
                "/api/auth/login",
                json!({"email": "nobody@example.com", "password": "hunter22"}),
            ))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn short_passwords_are_rejected() {
        let (state, _, _, _) = test_state();
        let app = crate::app(state);

        let response = app
            .oneshot(json_request(
                "/api/auth/register",
                json!({"email": "short@example.com", "password": "12345"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn me_requires_a_valid_token() {
        let (state, _, _, _) = test_state();
        let app = crate::app(state);

        let missing = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let garbage = app
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .header(header::AUTHORIZATION, "Bearer not-a-token")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    }
}
