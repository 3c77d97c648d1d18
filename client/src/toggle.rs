use std::collections::BTreeMap;

/// The toggle features served by the platform. Each kind maps to its own
/// endpoint family, see `crate::kinds`.
#[derive(Hash, Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ToggleKind {
    RestaurantFavorite,
    PostFavorite,
    Follow,
    Reaction,
}

impl ToggleKind {
    pub fn as_attr(&self) -> &'static str {
        match self {
            ToggleKind::RestaurantFavorite => "restaurant_favorite",
            ToggleKind::PostFavorite => "post_favorite",
            ToggleKind::Follow => "follow",
            ToggleKind::Reaction => "reaction",
        }
    }

    pub fn from_attr(attr: &str) -> Option<ToggleKind> {
        match attr {
            "restaurant_favorite" => Some(ToggleKind::RestaurantFavorite),
            "post_favorite" => Some(ToggleKind::PostFavorite),
            "follow" => Some(ToggleKind::Follow),
            "reaction" => Some(ToggleKind::Reaction),
            _ => None,
        }
    }
}

#[derive(Hash, Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Love,
    Haha,
    Wow,
    Sad,
    Angry,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 6] = [
        ReactionKind::Like,
        ReactionKind::Love,
        ReactionKind::Haha,
        ReactionKind::Wow,
        ReactionKind::Sad,
        ReactionKind::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Love => "love",
            ReactionKind::Haha => "haha",
            ReactionKind::Wow => "wow",
            ReactionKind::Sad => "sad",
            ReactionKind::Angry => "angry",
        }
    }

    pub fn from_attr(attr: &str) -> Option<ReactionKind> {
        ReactionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == attr)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ReactionKind::Like => "👍",
            ReactionKind::Love => "❤️",
            ReactionKind::Haha => "😄",
            ReactionKind::Wow => "😲",
            ReactionKind::Sad => "😢",
            ReactionKind::Angry => "😠",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReactionKind::Like => "讚",
            ReactionKind::Love => "愛心",
            ReactionKind::Haha => "哈哈",
            ReactionKind::Wow => "哇",
            ReactionKind::Sad => "傷心",
            ReactionKind::Angry => "怒",
        }
    }
}

/// One renderable toggle state. Boolean kinds only ever hold `Off`/`On`;
/// the reaction kind only ever holds `NoReaction`/`Reacted(_)`.
#[derive(Hash, Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum ToggleState {
    Off,
    On,
    NoReaction,
    Reacted(ReactionKind),
}

impl ToggleState {
    /// The state a fresh entry starts in before any server confirmation.
    pub fn initial_for(kind: ToggleKind) -> ToggleState {
        match kind {
            ToggleKind::Reaction => ToggleState::NoReaction,
            _ => ToggleState::Off,
        }
    }

    /// Negation for boolean kinds. Reaction states have no negation and are
    /// returned unchanged; callers pick the desired reaction explicitly.
    pub fn flipped(&self) -> ToggleState {
        match self {
            ToggleState::Off => ToggleState::On,
            ToggleState::On => ToggleState::Off,
            other => *other,
        }
    }

    pub fn from_attr(kind: ToggleKind, attr: &str) -> Option<ToggleState> {
        match (kind, attr) {
            (ToggleKind::Reaction, "none") => Some(ToggleState::NoReaction),
            (ToggleKind::Reaction, other) => ReactionKind::from_attr(other).map(ToggleState::Reacted),
            (_, "on") => Some(ToggleState::On),
            (_, "off") => Some(ToggleState::Off),
            _ => None,
        }
    }
}

/// Identifies one logical toggle target. `id` is caller-supplied and must be
/// stable across repeated toggles of the same target.
#[derive(Hash, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct ToggleKey {
    pub kind: ToggleKind,
    pub id: String,
}

impl ToggleKey {
    pub fn new(kind: ToggleKind, id: impl Into<String>) -> Self {
        ToggleKey {
            kind,
            id: id.into(),
        }
    }
}

pub type ReactionCounts = BTreeMap<ReactionKind, u64>;

/// Denormalized restaurant fields the favorite-restaurant endpoint expects in
/// its request body. Field names follow the wire format; older payload shapes
/// (`photo`, `photo_url`, unprefixed keys) are accepted as aliases so callers
/// never have to special-case them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RestaurantInfo {
    #[serde(rename = "restaurant_name", alias = "name")]
    pub name: String,
    #[serde(rename = "restaurant_place_id", alias = "place_id")]
    pub place_id: String,
    #[serde(rename = "restaurant_address", alias = "address", default)]
    pub address: String,
    #[serde(
        rename = "restaurant_image_url",
        alias = "image_url",
        alias = "photo",
        alias = "photo_url",
        default
    )]
    pub image_url: String,
    #[serde(rename = "restaurant_rating", alias = "rating", default)]
    pub rating: Option<f64>,
    #[serde(rename = "restaurant_price_level", alias = "price_level", default)]
    pub price_level: Option<u32>,
    #[serde(rename = "restaurant_lat", alias = "lat", default)]
    pub lat: Option<f64>,
    #[serde(rename = "restaurant_lng", alias = "lng", default)]
    pub lng: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flipped_boolean_states() {
        assert_eq!(ToggleState::Off.flipped(), ToggleState::On);
        assert_eq!(ToggleState::On.flipped(), ToggleState::Off);
        assert_eq!(ToggleState::NoReaction.flipped(), ToggleState::NoReaction);
        assert_eq!(
            ToggleState::Reacted(ReactionKind::Love).flipped(),
            ToggleState::Reacted(ReactionKind::Love)
        );
    }

    #[test]
    fn attr_round_trip() {
        for kind in [
            ToggleKind::RestaurantFavorite,
            ToggleKind::PostFavorite,
            ToggleKind::Follow,
            ToggleKind::Reaction,
        ] {
            assert_eq!(ToggleKind::from_attr(kind.as_attr()), Some(kind));
        }
        assert_eq!(ToggleKind::from_attr("chat"), None);

        for reaction in ReactionKind::ALL {
            assert_eq!(ReactionKind::from_attr(reaction.as_str()), Some(reaction));
        }
    }

    #[test]
    fn state_from_attr() {
        assert_eq!(
            ToggleState::from_attr(ToggleKind::PostFavorite, "on"),
            Some(ToggleState::On)
        );
        assert_eq!(
            ToggleState::from_attr(ToggleKind::Reaction, "none"),
            Some(ToggleState::NoReaction)
        );
        assert_eq!(
            ToggleState::from_attr(ToggleKind::Reaction, "haha"),
            Some(ToggleState::Reacted(ReactionKind::Haha))
        );
        assert_eq!(ToggleState::from_attr(ToggleKind::Follow, "maybe"), None);
    }

    #[test]
    fn restaurant_info_accepts_legacy_field_names() {
        let legacy = r#"{"name":"鼎泰豐","place_id":"P99","photo":"http://img/1.jpg"}"#;
        let info: RestaurantInfo = serde_json::from_str(legacy).unwrap();
        assert_eq!(info.name, "鼎泰豐");
        assert_eq!(info.place_id, "P99");
        assert_eq!(info.image_url, "http://img/1.jpg");
        assert_eq!(info.rating, None);

        let wire = serde_json::to_string(&info).unwrap();
        assert!(wire.contains("restaurant_place_id"));
    }
}
