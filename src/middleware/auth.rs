use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};
use crate::models::user::UserType;
use crate::utils::document::strip_non_digits;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub user_type: UserType,
    /// Normalized CPF or CNPJ of the account.
    pub document: String,
}

/// Identity of the caller, taken from a verified bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub user_type: UserType,
    pub document: String,
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            user_type: claims.user_type,
            document: claims.document,
        }
    }
}

impl Session {
    pub fn candidate_cpf(&self) -> Result<&str> {
        match self.user_type {
            UserType::Candidate => Ok(&self.document),
            UserType::Company => Err(Error::Forbidden(
                "Only candidates can do this".to_string(),
            )),
        }
    }

    pub fn company_cnpj(&self) -> Result<&str> {
        match self.user_type {
            UserType::Company => Ok(&self.document),
            UserType::Candidate => Err(Error::Forbidden(
                "Only companies can do this".to_string(),
            )),
        }
    }

    /// Writes to a candidate record are limited to its owner.
    pub fn ensure_candidate(&self, cpf: &str) -> Result<()> {
        if self.candidate_cpf()? != strip_non_digits(cpf) {
            return Err(Error::Forbidden(
                "Cannot modify another candidate".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ensure_company(&self, cnpj: &str) -> Result<()> {
        if self.company_cnpj()? != strip_non_digits(cnpj) {
            return Err(Error::Forbidden(
                "Cannot modify another company".to_string(),
            ));
        }
        Ok(())
    }

    /// Companies review applicants, so they may read any candidate record.
    pub fn ensure_can_read_candidate(&self, cpf: &str) -> Result<()> {
        match self.user_type {
            UserType::Company => Ok(()),
            UserType::Candidate => self.ensure_candidate(cpf),
        }
    }
}

pub fn decode_session(token: &str, secret: &str) -> Result<Session> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(Session::from(data.claims))
}

pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"missing_authorization"})),
        )
            .into_response();
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"bad_authorization"})),
        )
            .into_response();
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unsupported_scheme"})),
        )
            .into_response();
    };

    match decode_session(token, &state.config.jwt_secret) {
        Ok(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"invalid_token"})),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(user_type: UserType, document: &str) -> Session {
        Session {
            user_id: "user_1".into(),
            user_type,
            document: document.into(),
        }
    }

    #[test]
    fn candidate_owns_only_its_cpf() {
        let s = session(UserType::Candidate, "12345678901");
        assert!(s.ensure_candidate("123.456.789-01").is_ok());
        assert!(matches!(
            s.ensure_candidate("98765432100"),
            Err(Error::Forbidden(_))
        ));
        assert!(s.company_cnpj().is_err());
    }

    #[test]
    fn company_reads_any_candidate() {
        let s = session(UserType::Company, "11222333000181");
        assert!(s.ensure_can_read_candidate("12345678901").is_ok());
        assert!(s.ensure_candidate("12345678901").is_err());
        assert!(s.ensure_company("11.222.333/0001-81").is_ok());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(decode_session("not-a-jwt", "secret").is_err());
    }
}
