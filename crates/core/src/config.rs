use crate::{Board, Card, CardEffect, DeckId, QuizQuestion, SpaceId, SpaceKind, MAX_LEVEL};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board has no spaces")]
    EmptyBoard,
    #[error("space 0 must be the start space")]
    MissingStart,
    #[error("board has no jail space")]
    MissingJail,
    #[error("space at index {index} has id {id}")]
    SpaceOrder { index: usize, id: SpaceId },
    #[error("space {id}: {reason}")]
    InvalidSpace { id: SpaceId, reason: String },
    #[error("{0:?} deck has no cards")]
    EmptyDeck(DeckId),
    #[error("{deck:?} card {id}: {reason}")]
    InvalidCard { deck: DeckId, id: u32, reason: String },
    #[error("quiz question {id}: {reason}")]
    InvalidQuestion { id: u32, reason: String },
    #[error("rule profile: {0}")]
    InvalidProfile(String),
    #[error("player roster: {0}")]
    InvalidRoster(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PropertyRent {
    /// Rent read straight from the space's table by development level.
    Table,
    /// Rent derived from the vacant rent: each house adds
    /// `house_step_percent`, the top level pays `top_level_percent`.
    Scaled {
        house_step_percent: i64,
        top_level_percent: i64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StationRent {
    /// Indexed by stations held; a missing entry charges `fallback`.
    Table { fallback: i64 },
    /// `base` doubled for every station held beyond the first.
    Doubling { base: i64 },
}

/// Dice-total multiplier indexed by utilities held. Holding every utility
/// always earns the last tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UtilityRent {
    pub tiers: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MonopolyBonus {
    /// Vacant land in a completed set charges twice the base rent.
    DoubleVacant,
    /// Any rent in a completed set is scaled by `percent` after lookup.
    Surcharge { percent: i64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BankruptcyPolicy {
    #[default]
    ReturnToBank,
    TransferToCreditor,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PurchaseGate {
    #[default]
    Immediate,
    Quiz,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpecialRules {
    pub library_cash: i64,
    pub canteen_cash: i64,
    pub oratory_reward: i64,
    pub oratory_penalty: i64,
    pub card_deck: DeckId,
}

impl Default for SpecialRules {
    fn default() -> Self {
        Self {
            library_cash: 50,
            canteen_cash: 100,
            oratory_reward: 50,
            oratory_penalty: 30,
            card_deck: DeckId::Community,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleProfile {
    pub name: String,
    pub starting_cash: i64,
    pub passing_bonus: i64,
    pub jail_fine: i64,
    #[serde(default = "default_three")]
    pub max_jail_attempts: u8,
    #[serde(default = "default_three")]
    pub doubles_to_jail: u8,
    #[serde(default = "default_min_players")]
    pub min_players: usize,
    #[serde(default = "default_max_players")]
    pub max_players: usize,
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
    #[serde(default = "default_mortgage_interest")]
    pub mortgage_interest_percent: i64,
    /// Doubles that break a player out of jail also earn the usual re-roll.
    #[serde(default)]
    pub jail_break_rolls_again: bool,
    pub property_rent: PropertyRent,
    pub station_rent: StationRent,
    pub utility_rent: UtilityRent,
    pub monopoly: MonopolyBonus,
    #[serde(default)]
    pub bankruptcy: BankruptcyPolicy,
    #[serde(default)]
    pub purchase_gate: PurchaseGate,
    #[serde(default)]
    pub special: SpecialRules,
}

fn default_three() -> u8 {
    3
}

fn default_min_players() -> usize {
    2
}

fn default_max_players() -> usize {
    4
}

fn default_log_capacity() -> usize {
    20
}

fn default_mortgage_interest() -> i64 {
    10
}

impl Default for RuleProfile {
    fn default() -> Self {
        Self {
            name: "classic".to_string(),
            starting_cash: 1500,
            passing_bonus: 200,
            jail_fine: 50,
            max_jail_attempts: default_three(),
            doubles_to_jail: default_three(),
            min_players: default_min_players(),
            max_players: default_max_players(),
            log_capacity: default_log_capacity(),
            mortgage_interest_percent: default_mortgage_interest(),
            jail_break_rolls_again: false,
            property_rent: PropertyRent::Table,
            station_rent: StationRent::Table { fallback: 25 },
            utility_rent: UtilityRent { tiers: vec![4, 10] },
            monopoly: MonopolyBonus::DoubleVacant,
            bankruptcy: BankruptcyPolicy::ReturnToBank,
            purchase_gate: PurchaseGate::Immediate,
            special: SpecialRules::default(),
        }
    }
}

impl RuleProfile {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bad = |reason: &str| Err(ConfigError::InvalidProfile(reason.to_string()));
        if self.min_players < 2 || self.min_players > self.max_players {
            return bad("player bounds must satisfy 2 <= min <= max");
        }
        if self.max_jail_attempts == 0 || self.doubles_to_jail == 0 {
            return bad("jail thresholds must be positive");
        }
        if self.log_capacity == 0 {
            return bad("log capacity must be positive");
        }
        if self.utility_rent.tiers.is_empty() {
            return bad("utility rent needs at least one tier");
        }
        if self.starting_cash < 0 || self.passing_bonus < 0 || self.jail_fine < 0 {
            return bad("cash amounts must be non-negative");
        }
        if let MonopolyBonus::Surcharge { percent } = self.monopoly {
            if percent < 100 {
                return bad("monopoly surcharge below 100 percent");
            }
        }
        Ok(())
    }
}

/// Everything a game is built from. Immutable once a game starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub profile: RuleProfile,
    pub board: Board,
    pub chance: Vec<Card>,
    pub community: Vec<Card>,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

impl GameConfig {
    pub fn cards(&self, deck: DeckId) -> &[Card] {
        match deck {
            DeckId::Chance => &self.chance,
            DeckId::Community => &self.community,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.profile.validate()?;
        self.board.validate()?;
        if self.profile.property_rent == PropertyRent::Table {
            for space in self.board.spaces() {
                if space.kind == SpaceKind::Property && space.rent.len() != MAX_LEVEL as usize + 1
                {
                    return Err(ConfigError::InvalidSpace {
                        id: space.id,
                        reason: "table rent needs one entry per development level".to_string(),
                    });
                }
            }
        }
        for deck in DeckId::ALL {
            self.validate_deck(deck)?;
        }
        for question in &self.questions {
            if question.options.is_empty() {
                return Err(ConfigError::InvalidQuestion {
                    id: question.id,
                    reason: "no options".to_string(),
                });
            }
            if question.correct_index >= question.options.len() {
                return Err(ConfigError::InvalidQuestion {
                    id: question.id,
                    reason: "correct index out of range".to_string(),
                });
            }
        }
        if self.profile.purchase_gate == PurchaseGate::Quiz && self.questions.is_empty() {
            tracing::warn!(
                profile = %self.profile.name,
                "quiz purchase gate without questions, purchases will be immediate"
            );
        }
        Ok(())
    }

    fn validate_deck(&self, deck: DeckId) -> Result<(), ConfigError> {
        let cards = self.cards(deck);
        if cards.is_empty() {
            return Err(ConfigError::EmptyDeck(deck));
        }
        let mut ids = HashSet::new();
        for card in cards {
            let bad = |reason: &str| ConfigError::InvalidCard {
                deck,
                id: card.id,
                reason: reason.to_string(),
            };
            if !ids.insert(card.id) {
                return Err(bad("duplicate card id"));
            }
            for effect in &card.effects {
                match effect {
                    CardEffect::MoveAbsolute { target, .. } if *target >= self.board.len() => {
                        return Err(bad("move target is off the board"));
                    }
                    CardEffect::MoveToNearestOfKind(kind) if self.board.count_of_kind(*kind) == 0 => {
                        return Err(bad("no space of the requested kind"));
                    }
                    CardEffect::ChargeAllOthers(amount) | CardEffect::AllPayBank(amount)
                        if *amount < 0 =>
                    {
                        return Err(bad("collective payments must be non-negative"));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
