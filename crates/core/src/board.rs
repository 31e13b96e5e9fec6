use crate::ConfigError;
use serde::{Deserialize, Serialize};

pub type SpaceId = usize;

/// Highest development level: four houses then a hotel (academy).
pub const MAX_LEVEL: u8 = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SpecialKind {
    Library,
    Canteen,
    Oratory,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SpaceKind {
    Start,
    Property,
    Station,
    Utility,
    Chance,
    Community,
    Tax,
    FreeParking,
    GoToJail,
    Jail,
    SpecialCorner(SpecialKind),
}

impl SpaceKind {
    pub fn is_acquirable(self) -> bool {
        matches!(self, Self::Property | Self::Station | Self::Utility)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Property => "property",
            Self::Station => "station",
            Self::Utility => "utility",
            Self::Chance => "chance",
            Self::Community => "community",
            Self::Tax => "tax",
            Self::FreeParking => "free_parking",
            Self::GoToJail => "go_to_jail",
            Self::Jail => "jail",
            Self::SpecialCorner(SpecialKind::Library) => "library",
            Self::SpecialCorner(SpecialKind::Canteen) => "canteen",
            Self::SpecialCorner(SpecialKind::Oratory) => "oratory",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardSpace {
    pub id: SpaceId,
    pub kind: SpaceKind,
    pub name: String,
    #[serde(default)]
    pub price: Option<i64>,
    /// Indexed by development level: 0 vacant, 1..=4 houses, 5 hotel.
    /// Stations index it by the number of stations the owner holds.
    #[serde(default)]
    pub rent: Vec<i64>,
    #[serde(default)]
    pub build_cost: Option<i64>,
    #[serde(default)]
    pub group: Option<String>,
    /// Tax owed on a `Tax` space, landing bonus on `Start`.
    #[serde(default)]
    pub amount: Option<i64>,
}

impl BoardSpace {
    /// Monopoly set tag. Stations and utilities without an explicit group
    /// form one set per kind.
    pub fn group_tag(&self) -> Option<&str> {
        match (self.group.as_deref(), self.kind) {
            (Some(group), _) => Some(group),
            (None, SpaceKind::Station) => Some("station"),
            (None, SpaceKind::Utility) => Some("utility"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Board {
    spaces: Vec<BoardSpace>,
}

impl Board {
    pub fn new(spaces: Vec<BoardSpace>) -> Result<Self, ConfigError> {
        let board = Self { spaces };
        board.validate()?;
        Ok(board)
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    pub fn spaces(&self) -> &[BoardSpace] {
        &self.spaces
    }

    pub fn space(&self, id: SpaceId) -> Option<&BoardSpace> {
        self.spaces.get(id)
    }

    pub fn jail_space(&self) -> Option<SpaceId> {
        self.spaces
            .iter()
            .find(|space| space.kind == SpaceKind::Jail)
            .map(|space| space.id)
    }

    pub fn group_members(&self, group: &str) -> Vec<SpaceId> {
        self.spaces
            .iter()
            .filter(|space| space.kind.is_acquirable() && space.group_tag() == Some(group))
            .map(|space| space.id)
            .collect()
    }

    pub fn count_of_kind(&self, kind: SpaceKind) -> usize {
        self.spaces.iter().filter(|space| space.kind == kind).count()
    }

    /// First space of `kind` strictly ahead of `from`, wrapping around.
    pub fn next_of_kind(&self, from: SpaceId, kind: SpaceKind) -> Option<SpaceId> {
        let len = self.spaces.len();
        (1..=len)
            .map(|step| (from + step) % len)
            .find(|&id| self.spaces[id].kind == kind)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(first) = self.spaces.first() else {
            return Err(ConfigError::EmptyBoard);
        };
        if first.kind != SpaceKind::Start {
            return Err(ConfigError::MissingStart);
        }
        if self.jail_space().is_none() {
            return Err(ConfigError::MissingJail);
        }
        for (index, space) in self.spaces.iter().enumerate() {
            if space.id != index {
                return Err(ConfigError::SpaceOrder {
                    index,
                    id: space.id,
                });
            }
            let bad = |reason: &str| ConfigError::InvalidSpace {
                id: space.id,
                reason: reason.to_string(),
            };
            if space.kind.is_acquirable() {
                match space.price {
                    Some(price) if price > 0 => {}
                    _ => return Err(bad("acquirable space needs a positive price")),
                }
            } else if space.price.is_some() {
                return Err(bad("only acquirable spaces carry a price"));
            }
            if space.kind == SpaceKind::Property {
                if space.group.is_none() {
                    return Err(bad("property needs a color group"));
                }
                if space.rent.is_empty() {
                    return Err(bad("property needs a rent table"));
                }
                if space.rent.len() > MAX_LEVEL as usize + 1 {
                    return Err(bad("rent table longer than the development levels"));
                }
                if space.build_cost.map_or(true, |cost| cost <= 0) {
                    return Err(bad("property needs a positive build cost"));
                }
            }
            if space.kind == SpaceKind::Tax && space.amount.map_or(true, |amount| amount < 0) {
                return Err(bad("tax space needs a non-negative amount"));
            }
        }
        Ok(())
    }
}
