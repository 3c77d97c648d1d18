use crate::api_result::ToggleOutcome;
use crate::toggle::{ToggleKey, ToggleState};
use crate::transport::{ToggleRequest, TransportError};

/// The server flips favorite state itself, so the request carries no body.
pub fn request(key: &ToggleKey) -> ToggleRequest {
    ToggleRequest {
        path: format!("/favorite/{}/", key.id),
        body: None,
    }
}

#[derive(Deserialize)]
struct Reply {
    is_favorite: bool,
    #[serde(default)]
    message: Option<String>,
}

pub fn parse(body: &str) -> Result<ToggleOutcome, TransportError> {
    super::ensure_success(body)?;
    let reply: Reply = serde_json::from_str(body).map_err(super::malformed)?;
    Ok(ToggleOutcome {
        state: if reply.is_favorite {
            ToggleState::On
        } else {
            ToggleState::Off
        },
        message: reply.message,
        ..ToggleOutcome::of_state(ToggleState::Off)
    })
}
