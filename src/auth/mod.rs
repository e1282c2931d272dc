//! Identity context resolved by the upstream authentication layer.
//!
//! Credential verification and token rotation live in the gateway; this
//! service only consumes the resolved principal. The gateway either
//! inserts a [`Principal`] into the request extensions or forwards it
//! via the `x-user-id` / `x-user-role` headers.

use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Principal {
    pub user_id: String,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: &str, role: Role) -> Self {
        Self {
            user_id: user_id.to_string(),
            role,
        }
    }
}

/// Extractor for the authenticated principal in handlers.
pub struct AuthenticatedUser(pub Principal);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(principal) = req.extensions().get::<Principal>().cloned() {
            return ready(Ok(AuthenticatedUser(principal)));
        }

        ready(principal_from_headers(req).map(AuthenticatedUser))
    }
}

fn principal_from_headers(req: &HttpRequest) -> Result<Principal, AppError> {
    let user_id = req
        .headers()
        .get("x-user-id")
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

    let role = req
        .headers()
        .get("x-user-role")
        .and_then(|h| h.to_str().ok())
        .and_then(Role::parse)
        .ok_or_else(|| AppError::Unauthorized("Missing or unknown role".to_string()))?;

    Ok(Principal::new(user_id, role))
}
