use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::application::ports::user_repository::{CreateUserError, UserRepository};
use crate::domain::users::user::User;

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(thiserror::Error, Debug)]
pub enum RegisterError {
    #[error("User with email '{0}' already exists")]
    EmailTaken(String),
    #[error("User with username '{0}' already exists")]
    UsernameTaken(String),
    #[error("User with this email or username already exists")]
    Conflict,
    #[error("failed to register user")]
    Storage(#[source] anyhow::Error),
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> Result<User, RegisterError> {
        if self
            .repo
            .find_by_email(&req.email)
            .await
            .map_err(RegisterError::Storage)?
            .is_some()
        {
            return Err(RegisterError::EmailTaken(req.email.clone()));
        }
        if self
            .repo
            .find_by_username(&req.username)
            .await
            .map_err(RegisterError::Storage)?
            .is_some()
        {
            return Err(RegisterError::UsernameTaken(req.username.clone()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| RegisterError::Storage(anyhow::anyhow!(e.to_string())))?
            .to_string();

        // The unique indexes still catch a registration racing this one.
        match self
            .repo
            .create_user(&req.username, &req.email, &hash)
            .await
        {
            Ok(user) => Ok(user),
            Err(CreateUserError::Conflict) => Err(RegisterError::Conflict),
            Err(CreateUserError::Storage(e)) => Err(RegisterError::Storage(e)),
        }
    }
}
