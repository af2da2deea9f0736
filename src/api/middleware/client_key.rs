//! Client identification for the creation throttle.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_governor::key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor};

use crate::application::services::ClientKey;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the caller's IP address and stores it as a [`ClientKey`] in the
/// request extensions.
///
/// # Key Extraction
///
/// - Behind a proxy: `X-Forwarded-For`, `X-Real-IP` or `Forwarded`, falling
///   back to the peer address
/// - Otherwise: the socket peer address only
///
/// The peer address comes from `ConnectInfo<SocketAddr>`, so the service must
/// be served with `into_make_service_with_connect_info`.
///
/// # Errors
///
/// Returns `500 Internal Server Error` if no address can be determined.
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = if st.behind_proxy {
        SmartIpKeyExtractor.extract(&req)
    } else {
        PeerIpKeyExtractor.extract(&req)
    }
    .map_err(|e| {
        tracing::warn!(error = ?e, "Could not determine client address");
        AppError::internal("Unable to determine client address")
    })?;

    req.extensions_mut().insert(ClientKey::from(ip));

    Ok(next.run(req).await)
}
