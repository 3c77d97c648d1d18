use crate::api_result::ToggleOutcome;
use crate::toggle::{ToggleKey, ToggleState};
use crate::transport::{ToggleRequest, TransportError};

pub fn request(key: &ToggleKey) -> ToggleRequest {
    ToggleRequest {
        path: format!("/follow/{}/", key.id),
        body: None,
    }
}

// The follow endpoint names its flag differently from the favorite ones;
// normalizing here keeps the controller free of field-name variants.
#[derive(Deserialize)]
struct Reply {
    is_following: bool,
    #[serde(default)]
    message: Option<String>,
}

pub fn parse(body: &str) -> Result<ToggleOutcome, TransportError> {
    super::ensure_success(body)?;
    let reply: Reply = serde_json::from_str(body).map_err(super::malformed)?;
    Ok(ToggleOutcome {
        state: if reply.is_following {
            ToggleState::On
        } else {
            ToggleState::Off
        },
        message: reply.message,
        ..ToggleOutcome::of_state(ToggleState::Off)
    })
}
