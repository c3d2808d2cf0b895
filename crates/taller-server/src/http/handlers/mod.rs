pub(crate) mod auth;
pub(crate) mod clients;
pub(crate) mod filters;
pub(crate) mod messages;
pub(crate) mod quotes;
pub(crate) mod vehicles;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use taller_app::app::Credentials;

use super::error::ApiError;

pub(crate) type Body<T> = Result<Json<T>, JsonRejection>;

pub(crate) fn body<T>(payload: Body<T>) -> Result<T, ApiError> {
    Ok(payload?.0)
}

pub(crate) fn ok() -> Json<Value> {
    Json(json!({"ok": true}))
}

/// `adminUser`/`adminPass` pair of admin-gated requests
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdminAuth {
    #[serde(default)]
    pub admin_user: Option<String>,
    #[serde(default)]
    pub admin_pass: Option<String>,
}

impl AdminAuth {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.admin_user.clone().unwrap_or_default(),
            self.admin_pass.clone().unwrap_or_default(),
        )
    }

    pub fn is_present(&self) -> bool {
        self.admin_user.as_deref().is_some_and(|u| !u.is_empty())
            && self.admin_pass.as_deref().is_some_and(|p| !p.is_empty())
    }
}
