//! Registration, login and session verification.

use crate::app::error::{ServiceError, ServiceResult};
use crate::crypto::jwt::{Claims, JwtKeys};
use crate::crypto::password::{hash_password, verify_password};
use crate::domain::model::User;
use crate::domain::validation::{self, ValidationError};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Blank fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

const INVALID_CREDENTIALS: &str = "invalid username or password";

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct AuthService {
    store: Arc<dyn Storage>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(store: Arc<dyn Storage>, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<User> {
        let username = request.username.trim().to_string();
        validation::username(&username)?;
        validation::password(&request.password)?;
        let email = non_blank(request.email);
        if let Some(email) = &email {
            validation::email(email)?;
        }
        let first_name = non_blank(request.first_name);
        let last_name = non_blank(request.last_name);
        for (field, value) in [("first_name", &first_name), ("last_name", &last_name)] {
            if let Some(v) = value {
                validation::max_length(field, v, 100)?;
            }
        }

        if self.store.user_by_username(&username).await?.is_some() {
            return Err(ServiceError::Conflict("username already taken".into()));
        }

        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        let mut user = User::new(username, password_hash);
        user.email = email;
        user.first_name = first_name;
        user.last_name = last_name;
        self.store.insert_user(&user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> ServiceResult<Session> {
        let unauthorized = || ServiceError::Unauthorized(INVALID_CREDENTIALS.into());

        let mut user = self
            .store
            .user_by_username(request.username.trim())
            .await?
            .ok_or_else(unauthorized)?;
        if !user.is_active {
            return Err(ServiceError::Unauthorized("account is disabled".into()));
        }

        let stored = user.password_hash.clone();
        let password = request.password;
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored)).await??;
        if !matches {
            tracing::debug!(username = %user.username, "Login rejected");
            return Err(unauthorized());
        }

        let now = Utc::now();
        self.store.touch_last_login(user.id, now).await?;
        user.last_login_at = Some(now);
        user.updated_at = now;

        let (token, expires_at) = self.keys.issue(user.id, &user.username)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(Session {
            token,
            expires_at,
            user,
        })
    }

    pub fn authenticate(&self, token: &str) -> ServiceResult<Claims> {
        self.keys.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            ServiceError::Unauthorized("invalid or expired token".into())
        })
    }

    pub async fn profile(&self, user_id: Uuid) -> ServiceResult<User> {
        self.store
            .user_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> ServiceResult<User> {
        let mut user = self.profile(user_id).await?;
        if let Some(email) = non_blank(request.email) {
            validation::email(&email)?;
            user.email = Some(email);
        }
        if let Some(first_name) = non_blank(request.first_name) {
            validation::max_length("first_name", &first_name, 100)?;
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = non_blank(request.last_name) {
            validation::max_length("last_name", &last_name, 100)?;
            user.last_name = Some(last_name);
        }
        if let Some(avatar) = non_blank(request.avatar) {
            validation::optional_url("avatar", Some(avatar.as_str()))?;
            user.avatar = Some(avatar);
        }
        user.updated_at = Utc::now();
        self.store.update_user(&user).await?;
        Ok(user)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        request: ChangePasswordRequest,
    ) -> ServiceResult<()> {
        let mut user = self.profile(user_id).await?;
        validation::password(&request.new_password).map_err(|e| {
            ValidationError::new("new_password", e.message)
        })?;

        let stored = user.password_hash.clone();
        let current = request.current_password;
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&current, &stored)).await??;
        if !matches {
            return Err(ServiceError::Unauthorized("current password is incorrect".into()));
        }

        let new_password = request.new_password;
        user.password_hash =
            tokio::task::spawn_blocking(move || hash_password(&new_password)).await??;
        user.updated_at = Utc::now();
        self.store.update_user(&user).await?;
        tracing::info!(user_id = %user.id, "Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryStore::new()),
            JwtKeys::new(b"unit-test-secret-0123", chrono::Duration::hours(1)),
        )
    }

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            password: "hunter2hunter2".into(),
            email: Some(format!("{username}@doge.example")),
            first_name: None,
            last_name: None,
        }
    }

    #[tokio::test]
    async fn register_then_login_issues_a_verifiable_token() {
        let auth = service();
        let user = auth.register(register_request("shiba")).await.unwrap();
        assert_ne!(user.password_hash, "hunter2hunter2");

        let session = auth
            .login(LoginRequest {
                username: "shiba".into(),
                password: "hunter2hunter2".into(),
            })
            .await
            .unwrap();
        assert!(session.user.last_login_at.is_some());
        let claims = auth.authenticate(&session.token).unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let auth = service();
        auth.register(register_request("shiba")).await.unwrap();
        let err = auth.register(register_request("shiba")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let auth = service();
        auth.register(register_request("shiba")).await.unwrap();
        let err = auth
            .login(LoginRequest {
                username: "shiba".into(),
                password: "wrong-password".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn change_password_requires_current_one() {
        let auth = service();
        let user = auth.register(register_request("shiba")).await.unwrap();
        let err = auth
            .change_password(
                user.id,
                ChangePasswordRequest {
                    current_password: "nope-nope".into(),
                    new_password: "brand-new-pass".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        auth.change_password(
            user.id,
            ChangePasswordRequest {
                current_password: "hunter2hunter2".into(),
                new_password: "brand-new-pass".into(),
            },
        )
        .await
        .unwrap();
        assert!(auth
            .login(LoginRequest {
                username: "shiba".into(),
                password: "brand-new-pass".into(),
            })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn invalid_registration_fields_are_rejected() {
        let auth = service();
        let mut bad = register_request("ab");
        assert!(matches!(
            auth.register(bad).await,
            Err(ServiceError::Validation(_))
        ));
        bad = register_request("valid_name");
        bad.password = "short".into();
        assert!(matches!(
            auth.register(bad).await,
            Err(ServiceError::Validation(_))
        ));
    }
}
