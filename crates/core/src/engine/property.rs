use super::*;
use crate::{check_upgrade, PurchaseGate, SpaceId};

impl GameState {
    /// Buys (or passes on) the space the current player was offered. Under
    /// the quiz gate an accepted offer first asks a question.
    pub fn resolve_purchase(&mut self, accept: bool, events: &mut EventBus) -> Result<(), ActionError> {
        let space = self.pending_as("purchase decision", |pending| match pending {
            PendingAction::AwaitPurchaseDecision { space } => Some(space),
            _ => None,
        })?;
        if !accept {
            self.decline_purchase(space, events);
            return self.settle(events);
        }
        let price = self.price_of(space)?;
        if self.players[self.current].cash < price {
            let name = self.space_name(space);
            return Err(self.reject(events, format!("not enough cash to buy {name} for ${price}")));
        }
        let bank = self.config.questions.len();
        if self.config.profile.purchase_gate == PurchaseGate::Quiz && bank > 0 {
            let question = self.rng.index(bank);
            self.set_pending(PendingAction::AwaitQuizAnswer { space, question });
            let player = self.name(self.current);
            let question = self.config.questions[question].question.clone();
            self.emit(events, Event::QuizAsked { player, question });
            return Ok(());
        }
        self.complete_purchase(space, price, events);
        self.settle(events)
    }

    /// Answers the pending quiz question; a correct answer completes the
    /// purchase, a wrong one forfeits it.
    pub fn answer_quiz(&mut self, choice: usize, events: &mut EventBus) -> Result<(), ActionError> {
        let (space, question) = self.pending_as("quiz answer", |pending| match pending {
            PendingAction::AwaitQuizAnswer { space, question } => Some((space, question)),
            _ => None,
        })?;
        let question = self
            .config
            .questions
            .get(question)
            .ok_or(ActionError::InvalidChoice)?;
        if choice >= question.options.len() {
            return Err(ActionError::InvalidChoice);
        }
        let correct = question.is_correct(choice);
        let price = self.price_of(space)?;
        let player = self.name(self.current);
        self.emit(events, Event::QuizAnswered { player, correct });
        // Cash may have moved while the question was open.
        if correct && self.players[self.current].cash >= price {
            self.complete_purchase(space, price, events);
        } else {
            self.decline_purchase(space, events);
        }
        self.settle(events)
    }

    fn price_of(&self, space: SpaceId) -> Result<i64, ActionError> {
        self.config
            .board
            .space(space)
            .and_then(|space| space.price)
            .ok_or(ActionError::UnknownSpace(space))
    }

    fn complete_purchase(&mut self, space: SpaceId, price: i64, events: &mut EventBus) {
        let buyer = self.current;
        self.players[buyer].cash -= price;
        self.players[buyer].owned.insert(space);
        if let Some(record) = self.ownership.get_mut(&space) {
            record.owner = Some(buyer);
        }
        let player = self.name(buyer);
        let space = self.space_name(space);
        self.emit(
            events,
            Event::Purchased {
                player,
                space,
                price,
            },
        );
    }

    fn decline_purchase(&mut self, space: SpaceId, events: &mut EventBus) {
        let player = self.name(self.current);
        let space = self.space_name(space);
        self.emit(events, Event::PurchaseDeclined { player, space });
    }

    /// Builds one level on `space` at its build cost.
    pub fn upgrade_property(&mut self, space: SpaceId, events: &mut EventBus) -> Result<(), ActionError> {
        self.ensure_idle()?;
        self.check_buildable(space, events)?;
        let cost = self
            .config
            .board
            .space(space)
            .and_then(|space| space.build_cost)
            .unwrap_or(0);
        if self.players[self.current].cash < cost {
            let name = self.space_name(space);
            return Err(self.reject(events, format!("not enough cash to develop {name} for ${cost}")));
        }
        self.players[self.current].cash -= cost;
        self.raise_level(space, cost, events);
        Ok(())
    }

    /// Builds one level on `space` for free by spending an upgrade credit.
    pub fn apply_upgrade_credit(
        &mut self,
        space: SpaceId,
        events: &mut EventBus,
    ) -> Result<(), ActionError> {
        self.ensure_idle()?;
        if self.players[self.current].upgrade_credits == 0 {
            return Err(self.reject(events, "you have no free upgrade credits"));
        }
        self.check_buildable(space, events)?;
        self.players[self.current].upgrade_credits -= 1;
        self.raise_level(space, 0, events);
        Ok(())
    }

    fn check_buildable(&mut self, space: SpaceId, events: &mut EventBus) -> Result<(), ActionError> {
        let board_space = self
            .config
            .board
            .space(space)
            .ok_or(ActionError::UnknownSpace(space))?;
        let record = self.ownership.get(&space).copied().unwrap_or_default();
        let group = self.group_ownership(space);
        match check_upgrade(self.current, board_space, &record, &group) {
            Ok(()) => Ok(()),
            Err(rejection) => Err(self.reject(events, rejection.to_string())),
        }
    }

    fn raise_level(&mut self, space: SpaceId, cost: i64, events: &mut EventBus) {
        let Some(record) = self.ownership.get_mut(&space) else {
            return;
        };
        record.level += 1;
        let level = record.level;
        let player = self.name(self.current);
        let space = self.space_name(space);
        self.emit(
            events,
            Event::Upgraded {
                player,
                space,
                level,
                cost,
            },
        );
    }

    /// Mortgages an owned, undeveloped space for half its price.
    pub fn mortgage_property(&mut self, space: SpaceId, events: &mut EventBus) -> Result<(), ActionError> {
        self.ensure_can_manage()?;
        let price = self.owned_price(space, events)?;
        let name = self.space_name(space);
        if self.ownership.get(&space).is_some_and(|record| record.mortgaged) {
            return Err(self.reject(events, format!("{name} is already mortgaged")));
        }
        if self.group_ownership(space).iter().any(|record| record.level > 0) {
            return Err(self.reject(
                events,
                format!("{name} cannot be mortgaged while its group has buildings"),
            ));
        }
        let amount = price / 2;
        if let Some(record) = self.ownership.get_mut(&space) {
            record.mortgaged = true;
        }
        self.credit(self.current, amount);
        let player = self.name(self.current);
        self.emit(
            events,
            Event::Mortgaged {
                player,
                space: name,
                amount,
            },
        );
        Ok(())
    }

    /// Lifts a mortgage for the principal plus interest, rounded up.
    pub fn unmortgage_property(
        &mut self,
        space: SpaceId,
        events: &mut EventBus,
    ) -> Result<(), ActionError> {
        self.ensure_can_manage()?;
        let price = self.owned_price(space, events)?;
        let name = self.space_name(space);
        if !self.ownership.get(&space).is_some_and(|record| record.mortgaged) {
            return Err(self.reject(events, format!("{name} is not mortgaged")));
        }
        let principal = price / 2;
        let interest = (principal * self.config.profile.mortgage_interest_percent + 99) / 100;
        let amount = principal + interest;
        if self.players[self.current].cash < amount {
            return Err(self.reject(
                events,
                format!("not enough cash to lift the mortgage on {name} for ${amount}"),
            ));
        }
        self.players[self.current].cash -= amount;
        if let Some(record) = self.ownership.get_mut(&space) {
            record.mortgaged = false;
        }
        let player = self.name(self.current);
        self.emit(
            events,
            Event::Unmortgaged {
                player,
                space: name,
                amount,
            },
        );
        Ok(())
    }

    fn ensure_can_manage(&self) -> Result<(), ActionError> {
        match self.phase {
            Phase::AwaitRoll | Phase::AwaitEndTurn | Phase::AwaitActionResolution => Ok(()),
            phase => Err(ActionError::InvalidPhase(phase)),
        }
    }

    fn owned_price(&mut self, space: SpaceId, events: &mut EventBus) -> Result<i64, ActionError> {
        let board_space = self
            .config
            .board
            .space(space)
            .ok_or(ActionError::UnknownSpace(space))?;
        if !board_space.kind.is_acquirable() {
            return Err(ActionError::UnknownSpace(space));
        }
        let price = board_space.price.unwrap_or(0);
        if self.owner_of(space) != Some(self.current) {
            let name = self.space_name(space);
            return Err(self.reject(events, format!("you do not own {name}")));
        }
        Ok(price)
    }
}
