use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::User;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(thiserror::Error, Debug)]
pub enum LoginError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("failed to load user")]
    Storage(#[source] anyhow::Error),
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> Result<User, LoginError> {
        let row = self
            .repo
            .find_by_email(&req.email)
            .await
            .map_err(LoginError::Storage)?
            .ok_or(LoginError::InvalidCredentials)?;
        let hash = row.password_hash.clone().unwrap_or_default();
        let parsed = PasswordHash::new(&hash)
            .map_err(|e| LoginError::Storage(anyhow::anyhow!(e.to_string())))?;
        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed)
            .map_err(|_| LoginError::InvalidCredentials)?;
        Ok(row.without_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::testing::MemoryUserRepository;
    use crate::application::use_cases::auth::register::{Register, RegisterRequest};

    async fn registered() -> MemoryUserRepository {
        let repo = MemoryUserRepository::new();
        Register { repo: &repo }
            .execute(&RegisterRequest {
                username: "testuser".into(),
                email: "test@example.com".into(),
                password: "Secret123".into(),
            })
            .await
            .unwrap();
        repo
    }

    #[tokio::test]
    async fn accepts_correct_password() {
        let repo = registered().await;
        let user = Login { repo: &repo }
            .execute(&LoginRequest {
                email: "test@example.com".into(),
                password: "Secret123".into(),
            })
            .await
            .unwrap();
        assert_eq!(user.username, "testuser");
        assert!(user.password_hash.is_none());
    }

    #[tokio::test]
    async fn rejects_wrong_password_and_unknown_email() {
        let repo = registered().await;
        let uc = Login { repo: &repo };
        let wrong = uc
            .execute(&LoginRequest {
                email: "test@example.com".into(),
                password: "Secret124".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(wrong, LoginError::InvalidCredentials));

        let unknown = uc
            .execute(&LoginRequest {
                email: "nobody@example.com".into(),
                password: "Secret123".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(unknown, LoginError::InvalidCredentials));
    }
}
