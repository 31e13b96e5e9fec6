use crate::{
    BankruptcyPolicy, ConfigError, Creditor, Event, EventBus, GameState, JailState,
    PendingAction, Phase, PlayerId, PropertyOwnership,
};
use thiserror::Error;

mod effects;
mod jail;
mod landing;
mod payments;
mod property;
mod roll;
mod special;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("invalid phase: {0:?}")]
    InvalidPhase(Phase),
    #[error("no pending {0}")]
    NotPending(&'static str),
    #[error("invalid dice {0:?}")]
    InvalidDice((u8, u8)),
    #[error("unknown space {0}")]
    UnknownSpace(usize),
    #[error("choice does not fit the pending action")]
    InvalidChoice,
    #[error("rule violation: {0}")]
    Rule(String),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ActionError {
    /// Rule violations leave a log line behind; everything else leaves the
    /// state untouched.
    pub fn is_rule_violation(&self) -> bool {
        matches!(self, Self::Rule(_))
    }
}

/// What a landing or card effect left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Nothing owed, play carries on.
    Continue,
    /// A pending action now waits on the player.
    Yield,
    /// The turn is over: jailed, bankrupt or the game ended.
    Stop,
}

impl GameState {
    pub fn start_game(&mut self, events: &mut EventBus) -> Result<(), ActionError> {
        if self.phase != Phase::Setup {
            return Err(ActionError::InvalidPhase(self.phase));
        }
        self.current = 0;
        self.phase = Phase::AwaitRoll;
        tracing::info!(players = self.players.len(), profile = %self.config.profile.name, "game started");
        self.emit(
            events,
            Event::GameStarted {
                players: self.players.len(),
            },
        );
        let player = self.name(self.current);
        self.emit(events, Event::TurnStarted { player });
        Ok(())
    }

    pub fn end_turn(&mut self, events: &mut EventBus) -> Result<(), ActionError> {
        if self.phase != Phase::AwaitEndTurn {
            return Err(ActionError::InvalidPhase(self.phase));
        }
        self.advance_turn(events);
        Ok(())
    }

    pub(crate) fn reject(&mut self, events: &mut EventBus, reason: impl Into<String>) -> ActionError {
        let reason = reason.into();
        let player = self.name(self.current);
        tracing::debug!(%player, %reason, "rule violation");
        self.emit(
            events,
            Event::Rejected {
                player,
                reason: reason.clone(),
            },
        );
        ActionError::Rule(reason)
    }

    /// Extracts the payload of the pending action `pick` accepts.
    pub(crate) fn pending_as<T>(
        &self,
        label: &'static str,
        pick: impl FnOnce(PendingAction) -> Option<T>,
    ) -> Result<T, ActionError> {
        if self.phase != Phase::AwaitActionResolution {
            return Err(ActionError::InvalidPhase(self.phase));
        }
        self.pending.and_then(pick).ok_or(ActionError::NotPending(label))
    }

    pub(crate) fn ensure_idle(&self) -> Result<(), ActionError> {
        match self.phase {
            Phase::AwaitRoll | Phase::AwaitEndTurn if self.pending.is_none() => Ok(()),
            phase => Err(ActionError::InvalidPhase(phase)),
        }
    }

    /// Hands the turn to the next solvent player, or ends the game when
    /// fewer than two remain.
    pub(crate) fn advance_turn(&mut self, events: &mut EventBus) {
        if self.solvent_players().count() <= 1 {
            self.finish_game(events);
            return;
        }
        let count = self.players.len();
        let next = (1..=count)
            .map(|step| (self.current + step) % count)
            .find(|&id| !self.players[id].bankrupt)
            .unwrap_or(self.current);
        self.current = next;
        self.consecutive_doubles = 0;
        self.extra_roll = false;
        self.effect_queue.clear();
        self.pending = None;
        self.phase = Phase::AwaitRoll;
        let player = self.name(next);
        self.emit(events, Event::TurnStarted { player });
        if self.players[next].is_jailed() {
            self.set_pending(PendingAction::AwaitJailDecision);
        }
    }

    /// Clears the resolved action, drains any queued card work, then either
    /// grants the doubles re-roll or waits for the end of the turn.
    pub(crate) fn settle(&mut self, events: &mut EventBus) -> Result<(), ActionError> {
        self.pending = None;
        if !self.effect_queue.is_empty() && self.run_effects(events)? != Flow::Continue {
            return Ok(());
        }
        if self.phase == Phase::GameOver {
            return Ok(());
        }
        let current = &self.players[self.current];
        let again = self.extra_roll && !current.bankrupt && !current.is_jailed();
        if again {
            self.phase = Phase::AwaitRoll;
            let player = self.name(self.current);
            self.emit(events, Event::ExtraRoll { player });
        } else {
            self.extra_roll = false;
            self.phase = Phase::AwaitEndTurn;
        }
        Ok(())
    }

    pub(crate) fn credit(&mut self, player: PlayerId, amount: i64) {
        self.players[player].cash += amount;
    }

    /// Moves `amount` from `payer` to `creditor`. Returns false when the
    /// payer could not cover it and went bankrupt instead.
    pub(crate) fn charge(
        &mut self,
        payer: PlayerId,
        amount: i64,
        creditor: Creditor,
        events: &mut EventBus,
    ) -> bool {
        if amount <= 0 {
            return true;
        }
        if self.players[payer].cash < amount {
            self.declare_bankruptcy(payer, creditor, events);
            return false;
        }
        self.players[payer].cash -= amount;
        if let Creditor::Player(receiver) = creditor {
            self.credit(receiver, amount);
        }
        true
    }

    pub(crate) fn declare_bankruptcy(
        &mut self,
        debtor: PlayerId,
        creditor: Creditor,
        events: &mut EventBus,
    ) {
        let remaining = self.players[debtor].cash.max(0);
        let owned = std::mem::take(&mut self.players[debtor].owned);
        let heir = match (self.config.profile.bankruptcy, creditor) {
            (BankruptcyPolicy::TransferToCreditor, Creditor::Player(heir)) => Some(heir),
            _ => None,
        };
        for space in owned {
            let Some(record) = self.ownership.get_mut(&space) else {
                continue;
            };
            match heir {
                Some(heir) => {
                    record.owner = Some(heir);
                    self.players[heir].owned.insert(space);
                }
                None => *record = PropertyOwnership::default(),
            }
        }
        if let Some(heir) = heir {
            self.credit(heir, remaining);
        }
        let debtor_state = &mut self.players[debtor];
        debtor_state.cash = 0;
        debtor_state.bankrupt = true;
        debtor_state.jail = JailState::Free;
        debtor_state.skip_turns = 0;
        let player = debtor_state.name.clone();
        let creditor_name = match creditor {
            Creditor::Player(id) => Some(self.name(id)),
            Creditor::Bank => None,
        };
        tracing::info!(%player, creditor = ?creditor_name, "player bankrupt");
        self.emit(
            events,
            Event::Bankrupt {
                player,
                creditor: creditor_name,
            },
        );
        if debtor == self.current || self.solvent_players().count() <= 1 {
            self.advance_turn(events);
        }
    }

    fn finish_game(&mut self, events: &mut EventBus) {
        self.phase = Phase::GameOver;
        self.pending = None;
        self.effect_queue.clear();
        self.extra_roll = false;
        let winner_id = self.solvent_players().next().map(|player| player.id);
        self.winner = winner_id;
        if let Some(id) = winner_id {
            self.current = id;
        }
        let winner = winner_id.map(|id| self.name(id));
        tracing::info!(winner = ?winner, "game over");
        self.emit(events, Event::GameOver { winner });
    }
}
