use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::user::{User, UserRow, UserType};
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::document::{strip_non_digits, DocumentPolicy};
use crate::utils::{id::prefixed_id, time};

const USER_COLUMNS: &str =
    "id, email, password_hash, user_type, document, full_name, is_verified, created_at, updated_at";

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
    policy: DocumentPolicy,
    jwt_secret: String,
    jwt_ttl_hours: i64,
}

impl UserService {
    pub fn new(
        pool: SqlitePool,
        policy: DocumentPolicy,
        jwt_secret: String,
        jwt_ttl_hours: i64,
    ) -> Self {
        Self {
            pool,
            policy,
            jwt_secret,
            jwt_ttl_hours,
        }
    }

    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        user_type: UserType,
        document: &str,
        full_name: &str,
    ) -> Result<User> {
        let email = email.trim().to_lowercase();
        let document = strip_non_digits(document);

        let accepted = match user_type {
            UserType::Candidate => self.policy.accepts_cpf(&document),
            UserType::Company => self.policy.accepts_cnpj(&document),
        };
        if !accepted {
            let label = match user_type {
                UserType::Candidate => "CPF",
                UserType::Company => "CNPJ",
            };
            return Err(Error::BadRequest(format!("Invalid {}", label)));
        }

        if self.get_by_email(&email).await?.is_some() {
            return Err(Error::Conflict("Email already registered".to_string()));
        }
        if self.get_by_document(&document).await?.is_some() {
            return Err(Error::Conflict("CPF/CNPJ already registered".to_string()));
        }

        let now = time::now();
        let user = User {
            id: prefixed_id("user"),
            email,
            password_hash: hash_password(password)?,
            user_type,
            document,
            full_name: full_name.trim().to_string(),
            is_verified: false,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, user_type, document, full_name, is_verified, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.user_type.as_str())
        .bind(&user.document)
        .bind(&user.full_name)
        .bind(user.is_verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::Conflict("User already registered".to_string())
            }
            other => Error::from(other),
        })?;

        tracing::info!(user_id = %user.id, user_type = user.user_type.as_str(), "User registered");
        Ok(user)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let invalid = || Error::Unauthorized("Invalid email or password".to_string());
        let user = self.get_by_email(email).await?.ok_or_else(invalid)?;
        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Failed login attempt");
            return Err(invalid());
        }
        Ok(user)
    }

    /// Case-insensitive lookup.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    pub async fn get_by_document(&self, document: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE document = ?", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(strip_non_digits(document))
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    pub async fn get(&self, id: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    pub fn issue_token(&self, user: &User) -> Result<String> {
        let exp = time::hours_from_now(self.jwt_ttl_hours).timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            exp: exp.max(0) as usize,
            user_type: user.user_type,
            document: user.document.clone(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn dashboard_url(user_type: UserType) -> &'static str {
        user_type.dashboard_url()
    }
}
