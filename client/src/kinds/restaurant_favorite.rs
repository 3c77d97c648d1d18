use crate::api_result::ToggleOutcome;
use crate::store::ToggleEntry;
use crate::toggle::{ToggleKey, ToggleState};
use crate::transport::{ToggleRequest, TransportError};

#[derive(Serialize)]
struct MinimalBody<'a> {
    restaurant_place_id: &'a str,
}

/// The endpoint keys favorites on the Google place id and denormalizes the
/// restaurant's display fields into the favorite row, so the body carries the
/// seeded `RestaurantInfo` when the page provided one and just the place id
/// otherwise. The server rejects a body without a restaurant name, so the
/// fallback surfaces as a normal rejection rollback.
pub fn request(key: &ToggleKey, entry: &ToggleEntry) -> ToggleRequest {
    let body = match &entry.restaurant {
        Some(info) => serde_urlencoded::to_string(info),
        None => serde_urlencoded::to_string(MinimalBody {
            restaurant_place_id: &key.id,
        }),
    }
    .expect("restaurant toggle body serializes");

    ToggleRequest {
        path: "/user/restaurant/favorite/".to_owned(),
        body: Some(body),
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
