use super::*;

impl GameState {
    pub fn resolve_rent_payment(&mut self, events: &mut EventBus) -> Result<(), ActionError> {
        let (owner, amount) = self.pending_as("rent payment", |pending| match pending {
            PendingAction::AwaitRentPayment { owner, amount, .. } => Some((owner, amount)),
            _ => None,
        })?;
        let payer = self.current;
        if !self.charge(payer, amount, Creditor::Player(owner), events) {
            return Ok(());
        }
        let payer = self.name(payer);
        let owner = self.name(owner);
        self.emit(
            events,
            Event::RentPaid {
                payer,
                owner,
                amount,
            },
        );
        self.settle(events)
    }

    pub fn resolve_tax_payment(&mut self, events: &mut EventBus) -> Result<(), ActionError> {
        let (space, amount) = self.pending_as("tax payment", |pending| match pending {
            PendingAction::AwaitTaxPayment { space, amount } => Some((space, amount)),
            _ => None,
        })?;
        let payer = self.current;
        if !self.charge(payer, amount, Creditor::Bank, events) {
            return Ok(());
        }
        let player = self.name(payer);
        let space = self.space_name(space);
        self.emit(
            events,
            Event::TaxPaid {
                player,
                space,
                amount,
            },
        );
        self.settle(events)
    }
}
