/*!
 * # Authentication and Authorization Module
 *
 * Identity services for the pharmacy API:
 *
 * - JWT access tokens carrying the caller's role claims
 * - Database-backed users and user-role associations
 * - Role middleware gating the entity routers
 * - Password reset via short-lived single-purpose signed tokens
 */

use async_trait::async_trait;
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Entity modules
pub mod user;
pub mod user_role;

// Feature modules
pub mod password;

/// Role names understood by the role middleware
pub mod roles {
    pub const SUPER_ADMIN: &str = "SuperAdmin";
    pub const ADMIN: &str = "Admin";
    pub const USER: &str = "User";
}

/// Purpose claim carried by password-reset tokens
const RESET_PURPOSE: &str = "password_reset";

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,             // Subject (user ID)
    pub name: Option<String>,    // User's full name
    pub email: Option<String>,   // User's email
    pub roles: Vec<String>,      // User's roles
    pub purpose: Option<String>, // Set for single-purpose tokens (password reset)
    pub jti: String,             // JWT ID (unique identifier for this token)
    pub iat: i64,                // Issued at time
    pub exp: i64,                // Expiration time
    pub nbf: i64,                // Not valid before time
    pub iss: String,             // Issuer
    pub aud: String,             // Audience
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub roles: Vec<String>,
    pub token_id: String,
}

impl AuthUser {
    /// Check if the user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(roles::ADMIN)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(roles::SUPER_ADMIN)
    }

    /// Parsed user id; tokens are minted from Uuid ids so this only fails
    /// for hand-crafted tokens
    pub fn user_uuid(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.user_id).map_err(|_| AuthError::InvalidToken)
    }
}

#[async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub access_token_expiration: Duration,
    pub reset_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        jwt_issuer: String,
        jwt_audience: String,
        access_token_expiration: Duration,
        reset_token_expiration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            access_token_expiration,
            reset_token_expiration,
        }
    }
}

/// Token blacklist entry
#[derive(Clone, Debug)]
struct BlacklistedToken {
    jti: String,
    expiry: DateTime<Utc>,
}

/// Authentication service that handles user accounts and token issuance
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
    blacklisted_tokens: Arc<RwLock<Vec<BlacklistedToken>>>,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self {
            config,
            db,
            blacklisted_tokens: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Look up a user by email
    pub async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<user::Model>, AuthError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }

    /// List all user accounts ordered by full name (dropdown data)
    pub async fn list_users(&self) -> Result<Vec<user::Model>, AuthError> {
        use sea_orm::QueryOrder;

        user::Entity::find()
            .order_by_asc(user::Column::FullName)
            .all(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }

    /// Create a user account with one initial role.
    ///
    /// Fails with `EmailTaken` when the email is already registered.
    pub async fn create_user(
        &self,
        full_name: &str,
        email: &str,
        plain_password: &str,
        role: &str,
    ) -> Result<user::Model, AuthError> {
        if self.find_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = password::hash_password(plain_password)
            .map_err(|e| AuthError::InternalError(e.to_string()))?;

        let now = Utc::now();
        let created = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(full_name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        self.add_to_role(created.id, role).await?;

        info!(user_id = %created.id, email = %created.email, role = %role, "User account created");

        Ok(created)
    }

    /// Grant a role to a user; no-op when already granted
    pub async fn add_to_role(&self, user_id: Uuid, role: &str) -> Result<(), AuthError> {
        let existing = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleName.eq(role))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        if existing.is_some() {
            return Ok(());
        }

        user_role::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            role_name: Set(role.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// Get the role names held by a user
    pub async fn get_user_roles(&self, user_id: Uuid) -> Result<Vec<String>, AuthError> {
        let rows = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .all(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.role_name).collect())
    }

    /// Check an email/password pair against the identity store
    pub async fn verify_credentials(
        &self,
        email: &str,
        plain_password: &str,
    ) -> Result<user::Model, AuthError> {
        let user = self
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.active {
            return Err(AuthError::InvalidCredentials);
        }

        let matches = password::verify_password(plain_password, &user.password_hash)
            .map_err(|e| AuthError::InternalError(e.to_string()))?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Replace a user's credential with a new password
    pub async fn set_password(&self, email: &str, new_password: &str) -> Result<(), AuthError> {
        let user = self
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let password_hash = password::hash_password(new_password)
            .map_err(|e| AuthError::InternalError(e.to_string()))?;

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Utc::now());
        active
            .update(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// Generate a JWT access token for a user
    pub async fn generate_token(&self, user: &user::Model) -> Result<TokenResponse, AuthError> {
        let now = Utc::now();
        let access_exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let roles = self.get_user_roles(user.id).await?;

        let claims = Claims {
            sub: user.id.to_string(),
            name: Some(user.full_name.clone()),
            email: Some(user.email.clone()),
            roles,
            purpose: None,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: access_exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
        })
    }

    /// Generate a short-lived single-purpose password-reset token
    pub async fn generate_reset_token(&self, user: &user::Model) -> Result<String, AuthError> {
        let now = Utc::now();
        let reset_exp = now
            + ChronoDuration::from_std(self.config.reset_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: user.id.to_string(),
            name: None,
            email: Some(user.email.clone()),
            roles: vec![],
            purpose: Some(RESET_PURPOSE.to_string()),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: reset_exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a JWT token and extract the claims
    pub async fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.config.jwt_audience.clone()]);
        validation.set_issuer(&[self.config.jwt_issuer.clone()]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        if self.is_token_blacklisted(&claims.jti).await {
            return Err(AuthError::RevokedToken);
        }

        Ok(claims)
    }

    /// Validate a password-reset token and burn it so it is single-use.
    /// Returns the email the token was issued for.
    pub async fn consume_reset_token(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.validate_token(token).await?;

        if claims.purpose.as_deref() != Some(RESET_PURPOSE) {
            return Err(AuthError::InvalidToken);
        }

        let email = claims.email.clone().ok_or(AuthError::InvalidToken)?;

        self.blacklist(claims.jti, claims.exp).await;

        Ok(email)
    }

    /// Revoke a token (add it to the blacklist)
    pub async fn revoke_token(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.validate_token(token).await?;
        self.blacklist(claims.jti, claims.exp).await;
        Ok(())
    }

    async fn blacklist(&self, jti: String, exp: i64) {
        let expiry = Utc::now() + ChronoDuration::seconds(exp - Utc::now().timestamp());
        let mut blacklist = self.blacklisted_tokens.write().await;
        blacklist.push(BlacklistedToken { jti, expiry });

        // Drop entries whose tokens have expired anyway
        let now = Utc::now();
        blacklist.retain(|t| t.expiry > now);
    }

    async fn is_token_blacklisted(&self, token_id: &str) -> bool {
        let blacklist = self.blacklisted_tokens.read().await;
        blacklist.iter().any(|t| t.jti == token_id)
    }
}

/// Token response returned by login/register
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token has been revoked")]
    RevokedToken,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Email address is already registered")]
    EmailTaken,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message): (StatusCode, &str, String) = match &self {
            Self::MissingAuth => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING",
                "Authentication required".to_string(),
            ),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_CREDENTIALS",
                "Invalid login credentials".to_string(),
            ),
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING_TOKEN",
                "No authentication token provided".to_string(),
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Invalid authentication token".to_string(),
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "AUTH_TOKEN_EXPIRED",
                "Token has expired".to_string(),
            ),
            Self::RevokedToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REVOKED_TOKEN",
                "Authentication token has been revoked".to_string(),
            ),
            Self::TokenCreation(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_TOKEN_CREATION_FAILED",
                msg.clone(),
            ),
            Self::UserNotFound => (
                StatusCode::NOT_FOUND,
                "AUTH_USER_NOT_FOUND",
                "User not found".to_string(),
            ),
            Self::EmailTaken => (
                StatusCode::CONFLICT,
                "AUTH_EMAIL_TAKEN",
                "Email address is already registered".to_string(),
            ),
            Self::ValidationFailed(msg) => (
                StatusCode::BAD_REQUEST,
                "AUTH_VALIDATION_FAILED",
                msg.clone(),
            ),
            Self::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                "AUTH_INSUFFICIENT_PERMISSIONS",
                "Insufficient permissions".to_string(),
            ),
            Self::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_DATABASE_ERROR",
                "Internal server error".to_string(),
            ),
            Self::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

/// Authentication middleware that extracts and validates bearer tokens
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let headers = request.headers().clone();

    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication service not available",
            )
                .into_response();
        }
    };

    match extract_auth_from_headers(&headers, &auth_service).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Role middleware: the caller must hold at least one of the
/// comma-separated roles
pub async fn roles_middleware(
    State(required_roles): State<String>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = match request.extensions().get::<AuthUser>() {
        Some(user) => user.clone(),
        None => return Err(AuthError::MissingAuth),
    };

    if !holds_any_role(&user, &required_roles) {
        warn!(user_id = %user.user_id, required = %required_roles, "Role check failed");
        return Err(AuthError::InsufficientPermissions);
    }

    Ok(next.run(request).await)
}

fn holds_any_role(user: &AuthUser, required_roles: &str) -> bool {
    required_roles
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .any(|role| user.has_role(role))
}

/// Extract authentication info from request headers
async fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, AuthError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_value) = auth_header.to_str() {
            if auth_value.starts_with("Bearer ") {
                let token = auth_value.trim_start_matches("Bearer ").trim();
                let claims = auth_service.validate_token(token).await?;

                // Single-purpose tokens cannot authenticate requests
                if claims.purpose.is_some() {
                    return Err(AuthError::InvalidToken);
                }

                return Ok(AuthUser {
                    user_id: claims.sub,
                    name: claims.name,
                    email: claims.email,
                    roles: claims.roles,
                    token_id: claims.jti,
                });
            }
        }
    }

    Err(AuthError::MissingAuth)
}

/// Type alias kept for handler signatures
pub type AuthenticatedUser = AuthUser;

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_roles(self, required_roles: &str) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_roles(self, required_roles: &str) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            required_roles.to_string(),
            roles_middleware,
        ))
        .with_auth()
    }
}

// ---------------------------------------------------------------------------
// Authentication routes
// ---------------------------------------------------------------------------

/// Login credentials
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// New account registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// First step of the password-reset flow
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyEmailRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

/// Reset token handed back by verify-email
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyEmailResponse {
    pub reset_token: String,
    pub expires_in: i64,
}

/// Second step of the password-reset flow
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    pub reset_token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_new_password: String,
}

/// Authentication routes
pub fn auth_routes() -> axum::Router<Arc<AuthService>> {
    axum::Router::new()
        .route("/login", axum::routing::post(login_handler))
        .route("/register", axum::routing::post(register_handler))
        .route("/logout", axum::routing::post(logout_handler))
        .route("/verify-email", axum::routing::post(verify_email_handler))
        .route(
            "/change-password",
            axum::routing::post(change_password_handler),
        )
        .layer(DefaultBodyLimit::max(1024 * 64)) // 64KB limit
}

/// Login handler
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(credentials): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    credentials
        .validate()
        .map_err(|e| AuthError::ValidationFailed(e.to_string()))?;

    let user = auth_service
        .verify_credentials(&credentials.email, &credentials.password)
        .await?;

    let token = auth_service.generate_token(&user).await?;

    Ok(Json(token))
}

/// Registration handler: creates the account, grants the User role and
/// signs the caller in
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created and signed in", body = TokenResponse),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationFailed(e.to_string()))?;

    let user = auth_service
        .create_user(&request.name, &request.email, &request.password, roles::USER)
        .await?;

    let token = auth_service.generate_token(&user).await?;

    Ok(Json(token))
}

/// Logout handler: revokes the presented bearer token
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("Bearer" = [])),
    tag = "Auth"
)]
pub async fn logout_handler(
    State(auth_service): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AuthError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_value) = auth_header.to_str() {
            if auth_value.starts_with("Bearer ") {
                let token = auth_value.trim_start_matches("Bearer ").trim();
                auth_service.revoke_token(token).await?;
                return Ok(Json(
                    serde_json::json!({ "message": "Successfully logged out" }),
                ));
            }
        }
    }

    Err(AuthError::MissingToken)
}

/// Verify-email handler: confirms the address exists and opens the reset
/// flow by issuing a short-lived reset token
#[utoipa::path(
    post,
    path = "/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Reset token issued", body = VerifyEmailResponse),
        (status = 404, description = "No account with this email")
    ),
    tag = "Auth"
)]
pub async fn verify_email_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<Json<VerifyEmailResponse>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationFailed(e.to_string()))?;

    let user = auth_service
        .find_user_by_email(&request.email)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let reset_token = auth_service.generate_reset_token(&user).await?;

    Ok(Json(VerifyEmailResponse {
        reset_token,
        expires_in: auth_service.config.reset_token_expiration.as_secs() as i64,
    }))
}

/// Change-password handler: completes the reset flow. Requires the reset
/// token issued by verify-email; the token is burned on use.
#[utoipa::path(
    post,
    path = "/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Missing, expired or already-used reset token")
    ),
    tag = "Auth"
)]
pub async fn change_password_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationFailed(e.to_string()))?;

    let email = auth_service
        .consume_reset_token(&request.reset_token)
        .await?;

    auth_service
        .set_password(&email, &request.new_password)
        .await?;

    info!(email = %email, "Password changed via reset flow");

    Ok(Json(serde_json::json!({
        "message": "Password changed successfully. Please login with your new password."
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_roles(role_names: Vec<&str>) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4().to_string(),
            name: Some("Test".into()),
            email: Some("test@example.com".into()),
            roles: role_names.into_iter().map(String::from).collect(),
            token_id: "jti".into(),
        }
    }

    #[test]
    fn role_list_matches_any() {
        let admin = user_with_roles(vec![roles::ADMIN]);
        assert!(holds_any_role(&admin, "Admin"));
        assert!(holds_any_role(&admin, "Admin,SuperAdmin"));
        assert!(holds_any_role(&admin, " SuperAdmin , Admin "));
        assert!(!holds_any_role(&admin, "SuperAdmin"));
    }

    #[test]
    fn super_admin_does_not_satisfy_admin_only_gate() {
        let super_admin = user_with_roles(vec![roles::SUPER_ADMIN]);
        assert!(!holds_any_role(&super_admin, "Admin"));
        assert!(holds_any_role(&super_admin, "Admin,SuperAdmin"));
    }

    #[test]
    fn empty_role_segments_are_ignored() {
        let user = user_with_roles(vec![roles::USER]);
        assert!(!holds_any_role(&user, ","));
        assert!(holds_any_role(&user, ",User,"));
    }
}
