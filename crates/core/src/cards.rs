use crate::{SpaceId, SpaceKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DeckId {
    Chance,
    Community,
}

impl DeckId {
    pub const ALL: [DeckId; 2] = [DeckId::Chance, DeckId::Community];

    pub fn for_space(kind: SpaceKind) -> Option<Self> {
        match kind {
            SpaceKind::Chance => Some(Self::Chance),
            SpaceKind::Community => Some(Self::Community),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Chance => "chance",
            Self::Community => "community",
        }
    }
}

/// One step of a card. A card's effects run in listed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CardEffect {
    GainOrLoseCash(i64),
    MoveRelative(i32),
    MoveAbsolute {
        target: SpaceId,
        #[serde(default = "award_default")]
        award_passing_bonus: bool,
    },
    MoveToNearestOfKind(SpaceKind),
    DrawFrom(DeckId),
    GrantRentShield,
    GrantFreeUpgradeCredit,
    GrantJailToken,
    /// Every other solvent player pays the drawer.
    ChargeAllOthers(i64),
    /// Every solvent player, drawer included, pays the bank.
    AllPayBank(i64),
    EnterJail,
    SkipNextTurn,
}

fn award_default() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effects: Vec<CardEffect>,
}
