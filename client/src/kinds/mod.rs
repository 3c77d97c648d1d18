//! One module per toggle kind: endpoint path, request body, and response
//! normalization. Everything kind-specific about the wire format lives here;
//! the controller only ever sees `ToggleRequest` and `ToggleOutcome`.

pub mod follow;
pub mod post_favorite;
pub mod reaction;
pub mod restaurant_favorite;

use crate::api_result::ToggleOutcome;
use crate::store::ToggleEntry;
use crate::toggle::{ToggleKey, ToggleKind, ToggleState};
use crate::transport::{ToggleRequest, TransportError};

pub fn request_for(key: &ToggleKey, desired: ToggleState, entry: &ToggleEntry) -> ToggleRequest {
    match key.kind {
        ToggleKind::RestaurantFavorite => restaurant_favorite::request(key, entry),
        ToggleKind::PostFavorite => post_favorite::request(key),
        ToggleKind::Follow => follow::request(key),
        ToggleKind::Reaction => reaction::request(key, desired),
    }
}

/// Normalizes a raw 2xx body into the canonical outcome. `desired` is needed
/// for the reaction kind, whose endpoints do not echo the acting user's
/// reaction back.
pub fn parse_reply(
    kind: ToggleKind,
    desired: ToggleState,
    body: &str,
) -> Result<ToggleOutcome, TransportError> {
    match kind {
        ToggleKind::RestaurantFavorite => restaurant_favorite::parse(body),
        ToggleKind::PostFavorite => post_favorite::parse(body),
        ToggleKind::Follow => follow::parse(body),
        ToggleKind::Reaction => reaction::parse(desired, body),
    }
}

#[derive(Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Every endpoint wraps its payload in `{status, message?}`. A 2xx body whose
/// status is not `"success"` counts as a server rejection.
pub(crate) fn ensure_success(body: &str) -> Result<(), TransportError> {
    let Envelope { status, message } =
        serde_json::from_str(body).map_err(|err| TransportError::Malformed(err.to_string()))?;
    if status != "success" {
        return Err(TransportError::Rejected(message.unwrap_or(status)));
    }
    Ok(())
}

pub(crate) fn malformed(err: serde_json::Error) -> TransportError {
    TransportError::Malformed(err.to_string())
}
