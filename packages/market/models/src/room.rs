//! Apartment-type keys.
//!
//! Snapshots key apartment metrics by free-form strings. The canonical
//! set is closed (`studio`, `1-room`, `2-room`, `3-room`, `4plus`) but two
//! legacy spellings (`Studio`, `4+-room`) still show up in older exports.
//! Every join or grouping must go through [`RoomKey::normalize`] so the
//! aliases land in the same bucket as their canonical form.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Rank assigned to keys outside the canonical set. They sort after
/// every known type.
pub const UNKNOWN_ROOM_RANK: u16 = 999;

/// Canonical apartment type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RoomType {
    /// Studio apartment.
    #[serde(rename = "studio", alias = "Studio")]
    #[strum(to_string = "studio", serialize = "Studio")]
    Studio,
    /// One-room apartment.
    #[serde(rename = "1-room")]
    #[strum(to_string = "1-room")]
    OneRoom,
    /// Two-room apartment.
    #[serde(rename = "2-room")]
    #[strum(to_string = "2-room")]
    TwoRoom,
    /// Three-room apartment.
    #[serde(rename = "3-room")]
    #[strum(to_string = "3-room")]
    ThreeRoom,
    /// Four rooms or more.
    #[serde(rename = "4plus", alias = "4+-room")]
    #[strum(to_string = "4plus", serialize = "4+-room")]
    FourPlus,
}

impl RoomType {
    /// Position in the canonical display order
    /// (`studio < 1-room < 2-room < 3-room < 4plus`).
    #[must_use]
    pub const fn rank(self) -> u16 {
        match self {
            Self::Studio => 0,
            Self::OneRoom => 1,
            Self::TwoRoom => 2,
            Self::ThreeRoom => 3,
            Self::FourPlus => 4,
        }
    }

    /// Short Russian label used in report headers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Studio => "Студия",
            Self::OneRoom => "1-к",
            Self::TwoRoom => "2-к",
            Self::ThreeRoom => "3-к",
            Self::FourPlus => "4+-к",
        }
    }

    /// Returns all variants in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Studio,
            Self::OneRoom,
            Self::TwoRoom,
            Self::ThreeRoom,
            Self::FourPlus,
        ]
    }
}

/// A normalized apartment-type key: either one of the canonical
/// [`RoomType`]s or an unrecognized key carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoomKey {
    /// A canonical apartment type.
    Known(RoomType),
    /// A key outside the canonical set.
    Other(String),
}

impl RoomKey {
    /// Normalizes a raw snapshot key, folding legacy aliases into their
    /// canonical type.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        RoomType::from_str(raw).map_or_else(|_| Self::Other(raw.to_string()), Self::Known)
    }

    /// Canonical rank; unrecognized keys get [`UNKNOWN_ROOM_RANK`].
    #[must_use]
    pub const fn rank(&self) -> u16 {
        match self {
            Self::Known(room) => room.rank(),
            Self::Other(_) => UNKNOWN_ROOM_RANK,
        }
    }

    /// Canonical key string (`studio`, `4plus`, or the raw unknown key).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(room) => room.as_ref(),
            Self::Other(raw) => raw,
        }
    }

    /// Display label (`Студия`, `1-к`, …); unknown keys display as-is.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Known(room) => room.label(),
            Self::Other(raw) => raw,
        }
    }

    /// Returns the canonical type, if this key is one.
    #[must_use]
    pub const fn room_type(&self) -> Option<RoomType> {
        match self {
            Self::Known(room) => Some(*room),
            Self::Other(_) => None,
        }
    }
}

impl From<RoomType> for RoomKey {
    fn from(room: RoomType) -> Self {
        Self::Known(room)
    }
}

impl From<String> for RoomKey {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

impl From<&str> for RoomKey {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

impl From<RoomKey> for String {
    fn from(key: RoomKey) -> Self {
        match key {
            RoomKey::Known(room) => room.to_string(),
            RoomKey::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for RoomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Ord for RoomKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.as_str().cmp(other.as_str()))
    }
}

impl PartialOrd for RoomKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Groups raw-keyed entries by normalized room key.
///
/// When an entry under a canonical key and one under its legacy alias
/// both appear (e.g. `studio` and `Studio`), the canonical entry wins.
pub fn merge_by_room<'a, T, I>(entries: I) -> BTreeMap<RoomKey, T>
where
    I: IntoIterator<Item = (&'a str, T)>,
{
    let mut by_key: BTreeMap<RoomKey, (bool, T)> = BTreeMap::new();

    for (raw, value) in entries {
        let key = RoomKey::normalize(raw);
        let canonical = key.as_str() == raw;
        let keep_existing = by_key
            .get(&key)
            .is_some_and(|(existing_canonical, _)| *existing_canonical || !canonical);
        if !keep_existing {
            by_key.insert(key, (canonical, value));
        }
    }

    by_key
        .into_iter()
        .map(|(key, (_, value))| (key, value))
        .collect()
}
