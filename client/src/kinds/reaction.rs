use crate::api_result::ToggleOutcome;
use crate::toggle::{ReactionCounts, ToggleKey, ToggleState};
use crate::transport::{ToggleRequest, TransportError};

#[derive(Serialize)]
struct AddBody {
    reaction_type: &'static str,
}

/// Reactions use a pair of endpoints: picking a reaction posts to `add`
/// (which also replaces an existing one server-side), an explicit removal
/// posts to `remove`.
pub fn request(key: &ToggleKey, desired: ToggleState) -> ToggleRequest {
    match desired {
        ToggleState::Reacted(kind) => ToggleRequest {
            path: format!("/post/{}/reaction/add/", key.id),
            body: Some(
                serde_urlencoded::to_string(AddBody {
                    reaction_type: kind.as_str(),
                })
                .expect("reaction body serializes"),
            ),
        },
        _ => ToggleRequest {
            path: format!("/post/{}/reaction/remove/", key.id),
            body: None,
        },
    }
}

#[derive(Deserialize)]
struct Reply {
    reactions_count: ReactionCounts,
    total_reactions: u64,
    #[serde(default)]
    message: Option<String>,
}

/// The add/remove endpoints confirm the applied reaction implicitly (they
/// never echo the acting user's reaction), so the confirmed state is the
/// desired one; the tallies are the server's.
pub fn parse(desired: ToggleState, body: &str) -> Result<ToggleOutcome, TransportError> {
    super::ensure_success(body)?;
    let reply: Reply = serde_json::from_str(body).map_err(super::malformed)?;
    let state = match desired {
        ToggleState::Reacted(kind) => ToggleState::Reacted(kind),
        _ => ToggleState::NoReaction,
    };
    Ok(ToggleOutcome {
        state,
        reaction_counts: Some(reply.reactions_count),
        total_reactions: Some(reply.total_reactions),
        message: reply.message,
    })
}
