use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Copy suitable for returning past the repository boundary.
    pub fn without_secret(self) -> Self {
        Self {
            password_hash: None,
            ..self
        }
    }
}
