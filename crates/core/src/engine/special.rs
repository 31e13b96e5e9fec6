use super::*;
use crate::{EffectJob, SpecialChoice, SpecialKind};

impl GameState {
    /// Library and canteen pay out or hand over a card; the oratory rewards
    /// or fines a performance.
    pub fn resolve_special_choice(
        &mut self,
        choice: SpecialChoice,
        events: &mut EventBus,
    ) -> Result<(), ActionError> {
        let kind = self.pending_as("special choice", |pending| match pending {
            PendingAction::AwaitSpecialChoice { kind, .. } => Some(kind),
            _ => None,
        })?;
        let rules = self.config.profile.special.clone();
        let idx = self.current;
        let player = self.name(idx);
        match (kind, choice) {
            (SpecialKind::Library | SpecialKind::Canteen, SpecialChoice::TakeCash) => {
                let amount = match kind {
                    SpecialKind::Library => rules.library_cash,
                    _ => rules.canteen_cash,
                };
                self.credit(idx, amount);
                self.emit(events, Event::CashChanged { player, amount });
            }
            (SpecialKind::Library | SpecialKind::Canteen, SpecialChoice::DrawCard) => {
                self.effect_queue.push_back(EffectJob::Draw(rules.card_deck));
            }
            (SpecialKind::Oratory, SpecialChoice::Perform { success: true }) => {
                let amount = rules.oratory_reward;
                self.credit(idx, amount);
                self.emit(events, Event::CashChanged { player, amount });
            }
            (SpecialKind::Oratory, SpecialChoice::Perform { success: false }) => {
                let amount = rules.oratory_penalty;
                if !self.charge(idx, amount, Creditor::Bank, events) {
                    return Ok(());
                }
                self.emit(
                    events,
                    Event::CashChanged {
                        player,
                        amount: -amount,
                    },
                );
            }
            _ => return Err(ActionError::InvalidChoice),
        }
        self.settle(events)
    }
}
