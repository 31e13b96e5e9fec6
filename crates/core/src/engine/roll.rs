use super::*;
use crate::Creditor;

impl GameState {
    /// Rolls two dice from the game's random source.
    pub fn roll_dice(&mut self, events: &mut EventBus) -> Result<(), ActionError> {
        self.ensure_can_roll()?;
        if self.consume_skipped_turn(events) {
            return Ok(());
        }
        let dice = (self.rng.roll_die(), self.rng.roll_die());
        self.apply_roll(dice, events)
    }

    /// Same as [`GameState::roll_dice`] with the dice supplied by the caller.
    pub fn roll_dice_with(
        &mut self,
        dice: (u8, u8),
        events: &mut EventBus,
    ) -> Result<(), ActionError> {
        if !(1..=6).contains(&dice.0) || !(1..=6).contains(&dice.1) {
            return Err(ActionError::InvalidDice(dice));
        }
        self.ensure_can_roll()?;
        if self.consume_skipped_turn(events) {
            return Ok(());
        }
        self.apply_roll(dice, events)
    }

    fn ensure_can_roll(&self) -> Result<(), ActionError> {
        match (self.phase, self.pending) {
            (Phase::AwaitRoll, None) => Ok(()),
            (Phase::AwaitActionResolution, Some(PendingAction::AwaitJailDecision)) => Ok(()),
            (Phase::AwaitActionResolution, Some(pending)) => {
                Err(ActionError::NotPending(pending.label()))
            }
            (phase, _) => Err(ActionError::InvalidPhase(phase)),
        }
    }

    fn consume_skipped_turn(&mut self, events: &mut EventBus) -> bool {
        let player = &mut self.players[self.current];
        if player.skip_turns == 0 {
            return false;
        }
        player.skip_turns -= 1;
        let remaining = player.skip_turns;
        let player = player.name.clone();
        self.pending = None;
        self.extra_roll = false;
        self.consecutive_doubles = 0;
        self.phase = Phase::AwaitEndTurn;
        self.emit(events, Event::TurnSkipped { player, remaining });
        true
    }

    fn apply_roll(&mut self, dice: (u8, u8), events: &mut EventBus) -> Result<(), ActionError> {
        let idx = self.current;
        let doubles = dice.0 == dice.1;
        let steps = i32::from(dice.0) + i32::from(dice.1);
        self.dice = Some(dice);
        self.pending = None;
        let player = self.name(idx);
        self.emit(
            events,
            Event::DiceRolled {
                player: player.clone(),
                dice,
            },
        );

        if let JailState::Jailed { failed_attempts } = self.players[idx].jail {
            self.consecutive_doubles = 0;
            self.extra_roll = doubles && self.config.profile.jail_break_rolls_again;
            if doubles {
                self.players[idx].jail = JailState::Free;
                self.emit(events, Event::JailBreak { player });
            } else {
                let attempts = failed_attempts.saturating_add(1);
                if attempts < self.config.profile.max_jail_attempts {
                    self.players[idx].jail = JailState::Jailed {
                        failed_attempts: attempts,
                    };
                    self.phase = Phase::AwaitEndTurn;
                    self.emit(events, Event::JailRollFailed { player, attempts });
                    return Ok(());
                }
                let fine = self.config.profile.jail_fine;
                self.players[idx].jail = JailState::Free;
                if !self.charge(idx, fine, Creditor::Bank, events) {
                    return Ok(());
                }
                self.emit(
                    events,
                    Event::JailFinePaid {
                        player,
                        fine,
                        forced: true,
                    },
                );
            }
        } else {
            self.consecutive_doubles = if doubles {
                self.consecutive_doubles + 1
            } else {
                0
            };
            if self.consecutive_doubles >= self.config.profile.doubles_to_jail {
                self.emit(events, Event::SpeedingToJail { player });
                self.send_to_jail(idx, events);
                return Ok(());
            }
            self.extra_roll = doubles;
        }

        match self.move_steps(idx, steps, events) {
            Flow::Continue => self.settle(events),
            Flow::Yield | Flow::Stop => Ok(()),
        }
    }
}
