use std::{fmt, sync::Arc};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{errors::AppError, AppState};

/// Secret used to authenticate against the content backend.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendCredential(Arc<str>);

impl BackendCredential {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BackendCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BackendCredential([REDACTED])")
    }
}

/// Rejects the request with a 500 when no credential is configured, otherwise
/// makes the credential available to the handler as an extension.
pub async fn require_backend_credential(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(credential) = state.credential.clone() else {
        return Err(AppError::missing_credential());
    };

    request.extensions_mut().insert(credential);
    Ok(next.run(request).await)
}
