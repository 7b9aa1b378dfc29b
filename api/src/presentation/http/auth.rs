use crate::application::use_cases::auth::login::{Login as LoginUc, LoginError, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterError, RegisterRequest as RegisterDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::users::user::User;
use crate::presentation::http::error::{ApiError, ErrorBody};
use crate::presentation::http::validation;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user: UserResponse,
    pub access_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub data: LoginData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/auth/register", tag = "Auth", request_body = RegisterRequest, responses(
    (status = 201, body = RegisterResponse),
    (status = 400, body = ErrorBody),
    (status = 409, body = ErrorBody)
))]
pub async fn register(
    State(ctx): State<AppContext>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(req) = body.map_err(|rej| ApiError::validation(rej.body_text()))?;
    let mut errors = Vec::new();
    validation::check_username(&req.username, &mut errors);
    if !validation::is_email(&req.email) {
        errors.push("email must be an email".into());
    }
    validation::check_password(&req.password, &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let dto = RegisterDto {
        username: req.username,
        email: req.email,
        password: req.password,
    };
    let user = uc.execute(&dto).await.map_err(|err| match err {
        RegisterError::Storage(e) => {
            tracing::error!(error = ?e, "register_failed");
            ApiError::internal()
        }
        conflict => ApiError::Conflict(conflict.to_string()),
    })?;
    tracing::info!(user_id = %user.id, "user_registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".into(),
            user: user.into(),
        }),
    ))
}

#[utoipa::path(post, path = "/auth/login", tag = "Auth", request_body = LoginRequest, responses(
    (status = 200, body = LoginResponse),
    (status = 400, body = ErrorBody),
    (status = 401, body = ErrorBody)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = body.map_err(|rej| ApiError::validation(rej.body_text()))?;
    let mut errors = Vec::new();
    if !validation::is_email(&req.email) {
        errors.push("email must be an email".into());
    }
    if req.password.is_empty() {
        errors.push("password should not be empty".into());
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        email: req.email,
        password: req.password,
    };
    let user = uc.execute(&dto).await.map_err(|err| match err {
        LoginError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
        LoginError::Storage(e) => {
            tracing::error!(error = ?e, "login_failed");
            ApiError::internal()
        }
    })?;

    let token = issue_token(&ctx.cfg, &user)?;
    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        data: LoginData {
            user: user.into(),
            access_token: token,
        },
    }))
}

#[utoipa::path(get, path = "/auth/me", tag = "Auth", security(("bearerAuth" = [])), responses(
    (status = 200, body = UserResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn me(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, ApiError>,
) -> Result<Json<UserResponse>, ApiError> {
    let sub = validate_bearer(&ctx.cfg, bearer?)?;
    let id = Uuid::parse_str(&sub).map_err(|_| unauthorized())?;
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    let user = uc
        .execute(id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "me_lookup_failed");
            ApiError::internal()
        })?
        .ok_or_else(unauthorized)?;
    Ok(Json(user.into()))
}

// --- Bearer extractor & JWT utils ---
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub struct Bearer(pub String);

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Invalid or expired token".into())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|auth| auth.strip_prefix("Bearer "))
            .map(|t| Bearer(t.trim().to_string()))
            .ok_or_else(unauthorized)
    }
}

pub(crate) fn issue_token(cfg: &Config, user: &User) -> Result<String, ApiError> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        exp: now + (cfg.jwt_expires_secs.max(0) as usize),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .map_err(|err| {
        tracing::error!(error = ?err, "jwt_encode_failed");
        ApiError::internal()
    })
}

pub(crate) fn validate_bearer(cfg: &Config, bearer: Bearer) -> Result<String, ApiError> {
    let data = jsonwebtoken::decode::<Claims>(
        &bearer.0,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| unauthorized())?;
    Ok(data.claims.sub)
}
