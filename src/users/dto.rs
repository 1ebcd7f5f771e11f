use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::users::repo::User;

/// Create payload. Fields default to empty so an absent key and an empty
/// string validate identically, for JSON and form bodies alike.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub nama_lengkap: String,
    pub email: String,
    pub password: String,
}

/// Update payload; every field optional, empty means "leave unchanged".
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub nama_lengkap: String,
    pub email: String,
    pub password: String,
}

/// Public view of a user. The password hash has no field here.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub nama: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nama: user.nama,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
