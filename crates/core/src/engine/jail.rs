use super::*;
use crate::JailChoice;

impl GameState {
    /// Settles a jailed player's start of turn. Paying or using a token
    /// frees the player to roll normally; attempting doubles rolls at once.
    pub fn resolve_jail_decision(
        &mut self,
        choice: JailChoice,
        events: &mut EventBus,
    ) -> Result<(), ActionError> {
        self.pending_as("jail decision", |pending| match pending {
            PendingAction::AwaitJailDecision => Some(()),
            _ => None,
        })?;
        let idx = self.current;
        match choice {
            JailChoice::AttemptDoubles => return self.roll_dice(events),
            JailChoice::PayFine => {
                let fine = self.config.profile.jail_fine;
                if self.players[idx].cash < fine {
                    return Err(self.reject(events, format!("not enough cash to pay the ${fine} fine")));
                }
                self.players[idx].cash -= fine;
                self.players[idx].jail = JailState::Free;
                let player = self.name(idx);
                self.emit(
                    events,
                    Event::JailFinePaid {
                        player,
                        fine,
                        forced: false,
                    },
                );
            }
            JailChoice::UseToken => {
                if self.players[idx].jail_tokens == 0 {
                    return Err(self.reject(events, "you have no bail cards"));
                }
                self.players[idx].jail_tokens -= 1;
                self.players[idx].jail = JailState::Free;
                let player = self.name(idx);
                self.emit(events, Event::JailTokenUsed { player });
            }
        }
        self.pending = None;
        self.phase = Phase::AwaitRoll;
        Ok(())
    }
}
