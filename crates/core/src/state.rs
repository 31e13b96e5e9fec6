use crate::{
    CardEffect, ConfigError, DeckId, Deck, Decks, Event, EventBus, EventLog, GameConfig,
    RngState, SpaceId, SpecialKind, MAX_LEVEL,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use thiserror::Error;

pub type PlayerId = usize;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Setup,
    AwaitRoll,
    AwaitActionResolution,
    AwaitEndTurn,
    GameOver,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum JailState {
    #[default]
    Free,
    Jailed { failed_attempts: u8 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// May dip below zero only inside a transaction that ends in bankruptcy.
    pub cash: i64,
    pub position: SpaceId,
    pub jail: JailState,
    pub jail_tokens: u32,
    pub rent_shields: u32,
    pub upgrade_credits: u32,
    pub skip_turns: u32,
    pub owned: BTreeSet<SpaceId>,
    pub bankrupt: bool,
}

impl Player {
    fn new(id: PlayerId, name: String, cash: i64) -> Self {
        Self {
            id,
            name,
            cash,
            position: 0,
            jail: JailState::Free,
            jail_tokens: 0,
            rent_shields: 0,
            upgrade_credits: 0,
            skip_turns: 0,
            owned: BTreeSet::new(),
            bankrupt: false,
        }
    }

    pub fn is_jailed(&self) -> bool {
        matches!(self.jail, JailState::Jailed { .. })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PropertyOwnership {
    pub owner: Option<PlayerId>,
    pub level: u8,
    pub mortgaged: bool,
}

/// The single decision the current player owes before play continues.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PendingAction {
    AwaitPurchaseDecision { space: SpaceId },
    AwaitQuizAnswer { space: SpaceId, question: usize },
    AwaitRentPayment { space: SpaceId, owner: PlayerId, amount: i64 },
    AwaitTaxPayment { space: SpaceId, amount: i64 },
    AwaitCardEffectResolution { deck: DeckId },
    AwaitJailDecision,
    AwaitSpecialChoice { space: SpaceId, kind: SpecialKind },
}

impl PendingAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AwaitPurchaseDecision { .. } => "purchase decision",
            Self::AwaitQuizAnswer { .. } => "quiz answer",
            Self::AwaitRentPayment { .. } => "rent payment",
            Self::AwaitTaxPayment { .. } => "tax payment",
            Self::AwaitCardEffectResolution { .. } => "card draw",
            Self::AwaitJailDecision => "jail decision",
            Self::AwaitSpecialChoice { .. } => "special choice",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JailChoice {
    PayFine,
    UseToken,
    AttemptDoubles,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SpecialChoice {
    TakeCash,
    DrawCard,
    Perform { success: bool },
}

/// Card work still to run for the current player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EffectJob {
    Draw(DeckId),
    Apply(CardEffect),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creditor {
    Bank,
    Player(PlayerId),
}

/// A state that did not come out of this engine and cannot be played on.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("seat {index} holds player id {id}")]
    SeatOrder { index: usize, id: PlayerId },
    #[error("current player {0} is not seated")]
    CurrentOutOfRange(PlayerId),
    #[error("current player {0} is bankrupt")]
    CurrentBankrupt(PlayerId),
    #[error("winner {0} is not seated")]
    WinnerOutOfRange(PlayerId),
    #[error("player {player} stands on unknown space {space}")]
    OffBoard { player: PlayerId, space: SpaceId },
    #[error("ownership of space {space}: {reason}")]
    Ownership { space: SpaceId, reason: String },
    #[error("pending {pending} does not fit phase {phase:?}")]
    Pending { pending: String, phase: Phase },
    #[error("{deck:?} deck holds {found} cards, expected {expected}")]
    DeckSize {
        deck: DeckId,
        found: usize,
        expected: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub config: GameConfig,
    pub players: Vec<Player>,
    pub current: PlayerId,
    pub ownership: BTreeMap<SpaceId, PropertyOwnership>,
    pub decks: Decks,
    pub dice: Option<(u8, u8)>,
    pub consecutive_doubles: u8,
    /// Set by a doubles roll; the player rolls again once the landing settles.
    pub extra_roll: bool,
    pub phase: Phase,
    pub pending: Option<PendingAction>,
    pub effect_queue: VecDeque<EffectJob>,
    pub log: EventLog,
    pub rng: RngState,
    pub winner: Option<PlayerId>,
}

impl GameState {
    /// Validates the configuration, seats the named players and shuffles
    /// both decks. Blank names are dropped; the rest must fit the profile's
    /// player bounds.
    pub fn configure<S: AsRef<str>>(
        config: GameConfig,
        names: &[S],
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let profile = &config.profile;
        let names: Vec<String> = names
            .iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        if names.len() < profile.min_players || names.len() > profile.max_players {
            return Err(ConfigError::InvalidRoster(format!(
                "need {} to {} named players, got {}",
                profile.min_players,
                profile.max_players,
                names.len()
            )));
        }
        let players = names
            .into_iter()
            .enumerate()
            .map(|(id, name)| Player::new(id, name, profile.starting_cash))
            .collect();
        let ownership = config
            .board
            .spaces()
            .iter()
            .filter(|space| space.kind.is_acquirable())
            .map(|space| (space.id, PropertyOwnership::default()))
            .collect();
        let mut rng = RngState::from_seed(seed);
        let decks = Decks {
            chance: Deck::shuffled(DeckId::Chance, config.chance.clone(), &mut rng),
            community: Deck::shuffled(DeckId::Community, config.community.clone(), &mut rng),
        };
        let log = EventLog::with_capacity(profile.log_capacity);
        Ok(Self {
            config,
            players,
            current: 0,
            ownership,
            decks,
            dice: None,
            consecutive_doubles: 0,
            extra_roll: false,
            phase: Phase::Setup,
            pending: None,
            effect_queue: VecDeque::new(),
            log,
            rng,
            winner: None,
        })
    }

    /// Structural check for a state adopted from a save file or a peer.
    /// Anything that passes can be handed to every operation without
    /// indexing past a roster or board.
    pub fn validate(&self) -> Result<(), StateError> {
        self.config.validate()?;
        let profile = &self.config.profile;
        if self.players.len() < profile.min_players || self.players.len() > profile.max_players {
            return Err(ConfigError::InvalidRoster(format!(
                "need {} to {} seated players, got {}",
                profile.min_players,
                profile.max_players,
                self.players.len()
            ))
            .into());
        }
        let board_len = self.config.board.len();
        for (index, player) in self.players.iter().enumerate() {
            if player.id != index {
                return Err(StateError::SeatOrder { index, id: player.id });
            }
            if player.position >= board_len {
                return Err(StateError::OffBoard {
                    player: index,
                    space: player.position,
                });
            }
        }
        let Some(current) = self.players.get(self.current) else {
            return Err(StateError::CurrentOutOfRange(self.current));
        };
        if current.bankrupt && !self.is_over() {
            return Err(StateError::CurrentBankrupt(self.current));
        }
        if let Some(winner) = self.winner {
            if winner >= self.players.len() {
                return Err(StateError::WinnerOutOfRange(winner));
            }
        }
        self.validate_ownership()?;
        self.validate_pending()?;
        for deck in DeckId::ALL {
            let found = self.decks.get(deck).total();
            let expected = self.config.cards(deck).len();
            if found != expected {
                return Err(StateError::DeckSize {
                    deck,
                    found,
                    expected,
                });
            }
        }
        Ok(())
    }

    fn validate_ownership(&self) -> Result<(), StateError> {
        let bad = |space: SpaceId, reason: &str| {
            Err(StateError::Ownership {
                space,
                reason: reason.to_string(),
            })
        };
        let acquirable: BTreeSet<SpaceId> = self
            .config
            .board
            .spaces()
            .iter()
            .filter(|space| space.kind.is_acquirable())
            .map(|space| space.id)
            .collect();
        for space in &acquirable {
            if !self.ownership.contains_key(space) {
                return bad(*space, "acquirable space has no record");
            }
        }
        for (&space, record) in &self.ownership {
            if !acquirable.contains(&space) {
                return bad(space, "space cannot be owned");
            }
            if record.level > MAX_LEVEL {
                return bad(space, "development above the top level");
            }
            match record.owner {
                Some(owner) => match self.players.get(owner) {
                    Some(player) if player.owned.contains(&space) => {}
                    Some(_) => return bad(space, "owner does not list the space"),
                    None => return bad(space, "owner is not seated"),
                },
                None if record.level > 0 || record.mortgaged => {
                    return bad(space, "unowned space carries buildings or a mortgage");
                }
                None => {}
            }
        }
        for player in &self.players {
            for &space in &player.owned {
                if self.owner_of(space) != Some(player.id) {
                    return bad(space, "listed by a player who does not own it");
                }
            }
        }
        Ok(())
    }

    fn validate_pending(&self) -> Result<(), StateError> {
        let mismatch = || StateError::Pending {
            pending: self
                .pending
                .map(|pending| pending.label().to_string())
                .unwrap_or_else(|| "nothing".to_string()),
            phase: self.phase,
        };
        let Some(pending) = self.pending else {
            if self.phase == Phase::AwaitActionResolution {
                return Err(mismatch());
            }
            return Ok(());
        };
        if self.phase != Phase::AwaitActionResolution {
            return Err(mismatch());
        }
        let on_board = |space: SpaceId| self.config.board.space(space).is_some();
        let fits = match pending {
            PendingAction::AwaitPurchaseDecision { space } => self.ownership.contains_key(&space),
            PendingAction::AwaitQuizAnswer { space, question } => {
                self.ownership.contains_key(&space) && question < self.config.questions.len()
            }
            PendingAction::AwaitRentPayment {
                space,
                owner,
                amount,
            } => on_board(space) && owner < self.players.len() && amount >= 0,
            PendingAction::AwaitTaxPayment { space, amount } => on_board(space) && amount >= 0,
            PendingAction::AwaitSpecialChoice { space, .. } => on_board(space),
            PendingAction::AwaitCardEffectResolution { .. } => true,
            PendingAction::AwaitJailDecision => self.players[self.current].is_jailed(),
        };
        if fits {
            Ok(())
        } else {
            Err(mismatch())
        }
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn ownership_of(&self, space: SpaceId) -> Option<&PropertyOwnership> {
        self.ownership.get(&space)
    }

    pub fn owner_of(&self, space: SpaceId) -> Option<PlayerId> {
        self.ownership.get(&space).and_then(|own| own.owner)
    }

    /// Ownership records for every acquirable space sharing `space`'s set,
    /// `space` included.
    pub fn group_ownership(&self, space: SpaceId) -> Vec<PropertyOwnership> {
        let Some(group) = self
            .config
            .board
            .space(space)
            .and_then(|space| space.group_tag())
        else {
            return Vec::new();
        };
        self.config
            .board
            .group_members(group)
            .into_iter()
            .filter_map(|id| self.ownership.get(&id).copied())
            .collect()
    }

    pub fn solvent_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|player| !player.bankrupt)
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.and_then(|id| self.players.get(id))
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub(crate) fn name(&self, id: PlayerId) -> String {
        self.players
            .get(id)
            .map(|player| player.name.clone())
            .unwrap_or_default()
    }

    pub(crate) fn space_name(&self, id: SpaceId) -> String {
        self.config
            .board
            .space(id)
            .map(|space| space.name.clone())
            .unwrap_or_default()
    }

    pub(crate) fn emit(&mut self, events: &mut EventBus, event: Event) {
        tracing::debug!(%event, "game event");
        self.log.push(event.to_string());
        events.push(event);
    }

    pub(crate) fn set_pending(&mut self, action: PendingAction) {
        self.pending = Some(action);
        self.phase = Phase::AwaitActionResolution;
    }
}
