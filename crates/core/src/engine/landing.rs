use super::*;
use crate::{rent, DeckId, SpaceId, SpaceKind};

impl GameState {
    /// Walks `steps` spaces (backwards when negative), paying the passing
    /// bonus for every forward lap, then resolves the landing.
    pub(crate) fn move_steps(
        &mut self,
        player: PlayerId,
        steps: i32,
        events: &mut EventBus,
    ) -> Flow {
        let len = self.config.board.len() as i64;
        let raw = self.players[player].position as i64 + i64::from(steps);
        if steps > 0 {
            for _ in 0..raw.div_euclid(len) {
                self.pay_passing_bonus(player, events);
            }
        }
        self.players[player].position = raw.rem_euclid(len) as SpaceId;
        self.land(player, events)
    }

    /// Teleports to `target`. A target at or behind the current position
    /// counts as passing start when `award` is set.
    pub(crate) fn move_to(
        &mut self,
        player: PlayerId,
        target: SpaceId,
        award: bool,
        events: &mut EventBus,
    ) -> Flow {
        if award && target <= self.players[player].position {
            self.pay_passing_bonus(player, events);
        }
        self.players[player].position = target;
        self.land(player, events)
    }

    fn pay_passing_bonus(&mut self, player: PlayerId, events: &mut EventBus) {
        let bonus = self.config.profile.passing_bonus;
        self.credit(player, bonus);
        let player = self.name(player);
        self.emit(events, Event::PassedStart { player, bonus });
    }

    pub(crate) fn send_to_jail(&mut self, player: PlayerId, events: &mut EventBus) {
        if let Some(jail) = self.config.board.jail_space() {
            self.players[player].position = jail;
        }
        self.players[player].jail = JailState::Jailed { failed_attempts: 0 };
        self.effect_queue.clear();
        self.pending = None;
        self.extra_roll = false;
        self.consecutive_doubles = 0;
        self.phase = Phase::AwaitEndTurn;
        let player = self.name(player);
        self.emit(events, Event::SentToJail { player });
    }

    /// Dispatches on the kind of space the player now stands on.
    pub(crate) fn land(&mut self, player: PlayerId, events: &mut EventBus) -> Flow {
        let position = self.players[player].position;
        let Some(space) = self.config.board.space(position).cloned() else {
            return Flow::Continue;
        };
        let name = self.name(player);
        self.emit(
            events,
            Event::Moved {
                player: name.clone(),
                space: space.name.clone(),
            },
        );
        match space.kind {
            SpaceKind::Property | SpaceKind::Station | SpaceKind::Utility => {
                self.land_on_acquirable(player, position, events)
            }
            SpaceKind::Tax => {
                let amount = space.amount.unwrap_or(0);
                if amount <= 0 {
                    return Flow::Continue;
                }
                self.set_pending(PendingAction::AwaitTaxPayment {
                    space: position,
                    amount,
                });
                self.emit(
                    events,
                    Event::TaxDue {
                        player: name,
                        space: space.name,
                        amount,
                    },
                );
                Flow::Yield
            }
            SpaceKind::Chance | SpaceKind::Community => {
                let deck = DeckId::for_space(space.kind).unwrap_or(DeckId::Chance);
                self.set_pending(PendingAction::AwaitCardEffectResolution { deck });
                Flow::Yield
            }
            SpaceKind::GoToJail => {
                self.send_to_jail(player, events);
                Flow::Stop
            }
            SpaceKind::SpecialCorner(kind) => {
                self.set_pending(PendingAction::AwaitSpecialChoice {
                    space: position,
                    kind,
                });
                self.emit(events, Event::SpecialReached { player: name, kind });
                Flow::Yield
            }
            SpaceKind::Start => {
                let amount = space.amount.unwrap_or(0);
                if amount > 0 {
                    self.credit(player, amount);
                    self.emit(events, Event::LandingBonus { player: name, amount });
                }
                Flow::Continue
            }
            SpaceKind::FreeParking | SpaceKind::Jail => Flow::Continue,
        }
    }

    fn land_on_acquirable(
        &mut self,
        player: PlayerId,
        position: SpaceId,
        events: &mut EventBus,
    ) -> Flow {
        let Some(record) = self.ownership.get(&position).copied() else {
            return Flow::Continue;
        };
        let name = self.name(player);
        let space_name = self.space_name(position);
        let Some(owner) = record.owner else {
            let Some(price) = self.config.board.space(position).and_then(|s| s.price) else {
                return Flow::Continue;
            };
            self.set_pending(PendingAction::AwaitPurchaseDecision { space: position });
            self.emit(
                events,
                Event::PurchaseOffered {
                    player: name,
                    space: space_name,
                    price,
                },
            );
            return Flow::Yield;
        };
        if owner == player || record.mortgaged {
            return Flow::Continue;
        }
        if self.players[player].rent_shields > 0 {
            self.players[player].rent_shields -= 1;
            self.emit(
                events,
                Event::RentShieldUsed {
                    player: name,
                    space: space_name,
                },
            );
            return Flow::Continue;
        }
        let dice_total = self
            .dice
            .map(|(a, b)| u32::from(a) + u32::from(b))
            .unwrap_or(7);
        let group = self.group_ownership(position);
        let amount = match self.config.board.space(position) {
            Some(space) => rent(&self.config.profile, space, &record, &group, dice_total),
            None => 0,
        };
        if amount <= 0 {
            return Flow::Continue;
        }
        self.set_pending(PendingAction::AwaitRentPayment {
            space: position,
            owner,
            amount,
        });
        let owner = self.name(owner);
        self.emit(
            events,
            Event::RentDue {
                player: name,
                owner,
                amount,
            },
        );
        Flow::Yield
    }
}
