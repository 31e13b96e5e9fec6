use super::*;
use crate::{CardEffect, DeckId, EffectJob};

impl GameState {
    /// Draws from `deck` for the pending card space and runs the card.
    pub fn draw_card(&mut self, deck: DeckId, events: &mut EventBus) -> Result<(), ActionError> {
        let pending = self.pending_as("card draw", |pending| match pending {
            PendingAction::AwaitCardEffectResolution { deck } => Some(deck),
            _ => None,
        })?;
        if pending != deck {
            return Err(ActionError::InvalidChoice);
        }
        self.effect_queue.push_front(EffectJob::Draw(deck));
        self.settle(events)
    }

    /// Works through the effect queue until it empties or something needs
    /// the player. Nested draws (from a card or from landing on a card
    /// space mid-effect) queue behind the current card.
    pub(crate) fn run_effects(&mut self, events: &mut EventBus) -> Result<Flow, ActionError> {
        let player = self.current;
        while let Some(job) = self.effect_queue.pop_front() {
            let flow = match job {
                EffectJob::Draw(deck) => {
                    self.draw_into_queue(player, deck, events)?;
                    Flow::Continue
                }
                EffectJob::Apply(effect) => self.apply_effect(player, effect, events),
            };
            if self.phase == Phase::GameOver
                || self.current != player
                || self.players[player].bankrupt
            {
                return Ok(Flow::Stop);
            }
            match flow {
                Flow::Continue => {}
                Flow::Stop => return Ok(Flow::Stop),
                Flow::Yield => {
                    if let Some(PendingAction::AwaitCardEffectResolution { deck }) = self.pending {
                        self.pending = None;
                        self.effect_queue.push_back(EffectJob::Draw(deck));
                        continue;
                    }
                    return Ok(Flow::Yield);
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn draw_into_queue(
        &mut self,
        player: PlayerId,
        deck: DeckId,
        events: &mut EventBus,
    ) -> Result<(), ActionError> {
        let card = self.decks.get_mut(deck).draw(&mut self.rng)?;
        for effect in card.effects.iter().rev() {
            self.effect_queue.push_front(EffectJob::Apply(effect.clone()));
        }
        let player = self.name(player);
        self.emit(
            events,
            Event::CardDrawn {
                player,
                deck,
                title: card.title,
            },
        );
        Ok(())
    }

    pub(crate) fn apply_effect(
        &mut self,
        player: PlayerId,
        effect: CardEffect,
        events: &mut EventBus,
    ) -> Flow {
        let name = self.name(player);
        match effect {
            CardEffect::GainOrLoseCash(amount) if amount >= 0 => {
                self.credit(player, amount);
                self.emit(events, Event::CashChanged { player: name, amount });
                Flow::Continue
            }
            CardEffect::GainOrLoseCash(amount) => {
                if !self.charge(player, -amount, Creditor::Bank, events) {
                    return Flow::Stop;
                }
                self.emit(events, Event::CashChanged { player: name, amount });
                Flow::Continue
            }
            CardEffect::MoveRelative(steps) => self.move_steps(player, steps, events),
            CardEffect::MoveAbsolute {
                target,
                award_passing_bonus,
            } => self.move_to(player, target, award_passing_bonus, events),
            CardEffect::MoveToNearestOfKind(kind) => {
                let from = self.players[player].position;
                match self.config.board.next_of_kind(from, kind) {
                    Some(target) => self.move_to(player, target, true, events),
                    None => {
                        let kind = kind.label().to_string();
                        self.emit(events, Event::NoSpaceOfKind { player: name, kind });
                        Flow::Continue
                    }
                }
            }
            CardEffect::DrawFrom(deck) => {
                self.effect_queue.push_back(EffectJob::Draw(deck));
                Flow::Continue
            }
            CardEffect::GrantRentShield => {
                self.players[player].rent_shields += 1;
                self.emit(events, Event::RentShieldGranted { player: name });
                Flow::Continue
            }
            CardEffect::GrantFreeUpgradeCredit => {
                self.players[player].upgrade_credits += 1;
                self.emit(events, Event::UpgradeCreditGranted { player: name });
                Flow::Continue
            }
            CardEffect::GrantJailToken => {
                self.players[player].jail_tokens += 1;
                self.emit(events, Event::JailTokenGranted { player: name });
                Flow::Continue
            }
            CardEffect::ChargeAllOthers(amount) => {
                let others: Vec<PlayerId> = self
                    .solvent_players()
                    .map(|other| other.id)
                    .filter(|&other| other != player)
                    .collect();
                for other in others {
                    if self.phase == Phase::GameOver {
                        break;
                    }
                    if self.charge(other, amount, Creditor::Player(player), events) {
                        let from = self.name(other);
                        self.emit(
                            events,
                            Event::Transfer {
                                from,
                                to: name.clone(),
                                amount,
                            },
                        );
                    }
                }
                Flow::Continue
            }
            CardEffect::AllPayBank(amount) => {
                let payers: Vec<PlayerId> = self.solvent_players().map(|p| p.id).collect();
                for payer in payers {
                    if self.phase == Phase::GameOver {
                        break;
                    }
                    if self.charge(payer, amount, Creditor::Bank, events) {
                        let player = self.name(payer);
                        self.emit(
                            events,
                            Event::CashChanged {
                                player,
                                amount: -amount,
                            },
                        );
                    }
                }
                Flow::Continue
            }
            CardEffect::EnterJail => {
                self.send_to_jail(player, events);
                Flow::Stop
            }
            CardEffect::SkipNextTurn => {
                self.players[player].skip_turns += 1;
                self.emit(events, Event::TurnSkipQueued { player: name });
                Flow::Continue
            }
        }
    }
}
