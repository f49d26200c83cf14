//! Room categories known to the graph encoder.

use serde::{Deserialize, Serialize};

/// Room category used for one-hot feature encoding.
///
/// The declaration order is the one-hot slot order the encoder weights
/// were trained against and must not be rearranged.
///
/// # Example
///
/// ```
/// use layout_types::RoomType;
///
/// assert_eq!(RoomType::from_label("kitchen"), RoomType::Kitchen);
/// assert_eq!(RoomType::from_label("garage"), RoomType::Other);
/// assert_eq!(RoomType::Kitchen.index(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    /// Living room.
    LivingRoom,
    /// Kitchen.
    Kitchen,
    /// Bedroom.
    Bedroom,
    /// Bathroom.
    Bathroom,
    /// Balcony.
    Balcony,
    /// Entrance hall.
    Entrance,
    /// Dining room.
    DiningRoom,
    /// Study or office.
    Study,
    /// Storage room.
    Storage,
    /// Anything else.
    #[default]
    Other,
}

impl RoomType {
    /// Number of categories, i.e. the one-hot width.
    pub const COUNT: usize = 10;

    /// All categories in one-hot slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::LivingRoom,
        Self::Kitchen,
        Self::Bedroom,
        Self::Bathroom,
        Self::Balcony,
        Self::Entrance,
        Self::DiningRoom,
        Self::Study,
        Self::Storage,
        Self::Other,
    ];

    /// Maps a free-form type label to a category.
    ///
    /// Labels outside the known set fall back to [`RoomType::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == label)
            .unwrap_or(Self::Other)
    }

    /// Returns the one-hot slot of this category.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::LivingRoom => 0,
            Self::Kitchen => 1,
            Self::Bedroom => 2,
            Self::Bathroom => 3,
            Self::Balcony => 4,
            Self::Entrance => 5,
            Self::DiningRoom => 6,
            Self::Study => 7,
            Self::Storage => 8,
            Self::Other => 9,
        }
    }

    /// Returns the wire label of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LivingRoom => "living_room",
            Self::Kitchen => "kitchen",
            Self::Bedroom => "bedroom",
            Self::Bathroom => "bathroom",
            Self::Balcony => "balcony",
            Self::Entrance => "entrance",
            Self::DiningRoom => "dining_room",
            Self::Study => "study",
            Self::Storage => "storage",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_order_matches_index() {
        for (slot, kind) in RoomType::ALL.iter().enumerate() {
            assert_eq!(kind.index(), slot);
        }
    }

    #[test]
    fn label_round_trip() {
        for kind in RoomType::ALL {
            assert_eq!(RoomType::from_label(kind.as_str()), kind);
        }
    }

    #[test]
    fn unknown_labels_become_other() {
        assert_eq!(RoomType::from_label("corridor"), RoomType::Other);
        assert_eq!(RoomType::from_label(""), RoomType::Other);
        assert_eq!(RoomType::from_label("Kitchen"), RoomType::Other);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&RoomType::DiningRoom).unwrap_or_default();
        assert_eq!(json, "\"dining_room\"");
    }
}
