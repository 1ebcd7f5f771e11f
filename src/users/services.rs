use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    error::ApiError,
    users::{
        dto::{CreateUserRequest, UpdateUserRequest},
        password,
        repo::User,
    },
    validation::{validate, FieldRules, Format},
};

const CREATE_RULES: &[FieldRules] = &[
    FieldRules {
        field: "nama_lengkap",
        required: true,
        min: Some(3),
        max: Some(100),
        format: None,
    },
    FieldRules {
        field: "email",
        required: true,
        min: None,
        max: None,
        format: Some(Format::Email),
    },
    FieldRules {
        field: "password",
        required: true,
        min: Some(6),
        max: None,
        format: None,
    },
];

const UPDATE_RULES: &[FieldRules] = &[
    FieldRules {
        field: "nama_lengkap",
        required: false,
        min: Some(3),
        max: Some(100),
        format: None,
    },
    FieldRules {
        field: "email",
        required: false,
        min: None,
        max: None,
        format: Some(Format::Email),
    },
    FieldRules {
        field: "password",
        required: false,
        min: Some(6),
        max: None,
        format: None,
    },
];

/// Rulesets the service is constructed with.
#[derive(Debug, Clone, Copy)]
pub struct UserRules {
    pub create: &'static [FieldRules],
    pub update: &'static [FieldRules],
}

impl Default for UserRules {
    fn default() -> Self {
        Self {
            create: CREATE_RULES,
            update: UPDATE_RULES,
        }
    }
}

/// Owns the user lifecycle: validation, the email uniqueness invariant,
/// hashing policy, and the row operations behind the five endpoints.
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
    rules: UserRules,
}

fn email_changes(current: &str, requested: &str) -> bool {
    !requested.is_empty() && requested != current
}

/// The unique index on users.email is the backstop for the advisory
/// pre-checks; a write losing that race surfaces as Conflict, not 500.
fn map_unique_violation(e: sqlx::Error, msg: &str) -> ApiError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return ApiError::Conflict(msg.to_string());
        }
    }
    ApiError::Database(e)
}

impl UserService {
    pub fn new(db: PgPool, rules: UserRules) -> Self {
        Self { db, rules }
    }

    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        Ok(User::list_all(&self.db).await?)
    }

    pub async fn get(&self, id: i64) -> Result<User, ApiError> {
        User::find_by_id(&self.db, id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }

    pub async fn create(&self, req: CreateUserRequest) -> Result<User, ApiError> {
        self.check(self.rules.create, &req.nama_lengkap, &req.email, &req.password)?;

        if User::find_by_email(&self.db, &req.email).await?.is_some() {
            warn!(email = %req.email, "email already registered");
            return Err(ApiError::Conflict("Email already registered".into()));
        }

        let hash = password::hash_password(&req.password)?;
        let user = User::insert(&self.db, &req.nama_lengkap, &req.email, &hash)
            .await
            .map_err(|e| map_unique_violation(e, "Email already registered"))?;

        info!(user_id = user.id, email = %user.email, "user created");
        Ok(user)
    }

    pub async fn update(&self, id: i64, req: UpdateUserRequest) -> Result<User, ApiError> {
        let mut user = User::find_by_id(&self.db, id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        self.check(self.rules.update, &req.nama_lengkap, &req.email, &req.password)?;

        if email_changes(&user.email, &req.email) {
            if User::find_by_email_excluding(&self.db, &req.email, id)
                .await?
                .is_some()
            {
                warn!(user_id = id, email = %req.email, "email already used by another user");
                return Err(ApiError::Conflict(
                    "Email already used by another user".into(),
                ));
            }
            user.email = req.email.clone();
        }
        if !req.nama_lengkap.is_empty() {
            user.nama = req.nama_lengkap.clone();
        }
        if !req.password.is_empty() {
            user.password_hash = password::hash_password(&req.password)?;
        }

        let user = user
            .save(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, "Email already used by another user"))?;

        info!(user_id = user.id, "user updated");
        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let rows = User::delete_by_id(&self.db, id).await?;
        if rows == 0 {
            return Err(ApiError::UserNotFound);
        }
        info!(user_id = id, "user deleted");
        Ok(())
    }

    fn check(
        &self,
        rules: &[FieldRules],
        nama_lengkap: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let errors = validate(
            rules,
            &[
                ("nama_lengkap", nama_lengkap),
                ("email", email),
                ("password", password),
            ],
        );
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_email_is_not_a_change() {
        assert!(!email_changes("alice@example.com", ""));
    }

    #[test]
    fn same_email_is_not_a_change() {
        assert!(!email_changes("alice@example.com", "alice@example.com"));
    }

    #[test]
    fn different_email_is_a_change() {
        assert!(email_changes("alice@example.com", "bob@example.com"));
    }

    #[test]
    fn default_rules_make_create_fields_required_and_update_fields_optional() {
        let rules = UserRules::default();
        assert!(rules.create.iter().all(|r| r.required));
        assert!(rules.update.iter().all(|r| !r.required));
    }

    #[test]
    fn create_and_update_share_the_per_field_bounds() {
        let rules = UserRules::default();
        for (c, u) in rules.create.iter().zip(rules.update.iter()) {
            assert_eq!(c.field, u.field);
            assert_eq!(c.min, u.min);
            assert_eq!(c.max, u.max);
            assert_eq!(c.format, u.format);
        }
    }

    #[test]
    fn non_unique_database_errors_stay_database_errors() {
        let mapped = map_unique_violation(sqlx::Error::PoolTimedOut, "Email already registered");
        assert!(matches!(mapped, ApiError::Database(_)));
    }
}
