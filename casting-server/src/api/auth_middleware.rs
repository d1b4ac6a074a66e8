use crate::errors::AuthRejection;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use casting_auth::Authorizer;
use std::sync::Arc;

/// The permission one route demands, with the authorizer that checks it
#[derive(Clone)]
pub(crate) struct RequiredPermission {
    authorizer: Arc<Authorizer>,
    permission: &'static str,
}

impl RequiredPermission {
    pub(crate) fn new(state: &AppState, permission: &'static str) -> Self {
        Self {
            authorizer: state.authorizer.clone(),
            permission,
        }
    }
}

/// Rejects the request unless its bearer token grants the route's permission.
///
/// On success the verified claims are stored in the request extensions for the handler.
pub(crate) async fn authorization_middleware(
    State(required): State<RequiredPermission>,
    mut request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    let claims = match required
        .authorizer
        .authorize(headers, required.permission)
        .await
    {
        Ok(claims) => claims,
        Err(e) => return AuthRejection(e).into_response(),
    };

    request.extensions_mut().insert(claims);
    next.run(request).await
}
