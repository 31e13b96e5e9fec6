use crate::{
    ActionError, DeckId, Event, EventBus, GameState, JailChoice, SpaceId, SpecialChoice,
};
use serde::{Deserialize, Serialize};

/// Everything a front end can ask of the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    StartGame,
    RollDice,
    RollDiceWith { dice: (u8, u8) },
    ResolvePurchase { accept: bool },
    AnswerQuiz { choice: usize },
    ResolveRentPayment,
    ResolveTaxPayment,
    ResolveJailDecision { choice: JailChoice },
    DrawCard { deck: DeckId },
    ResolveSpecialChoice { choice: SpecialChoice },
    UpgradeProperty { space: SpaceId },
    ApplyUpgradeCredit { space: SpaceId },
    MortgageProperty { space: SpaceId },
    UnmortgageProperty { space: SpaceId },
    EndTurn,
}

impl Action {
    pub fn apply(self, state: &mut GameState, events: &mut EventBus) -> Result<(), ActionError> {
        match self {
            Self::StartGame => state.start_game(events),
            Self::RollDice => state.roll_dice(events),
            Self::RollDiceWith { dice } => state.roll_dice_with(dice, events),
            Self::ResolvePurchase { accept } => state.resolve_purchase(accept, events),
            Self::AnswerQuiz { choice } => state.answer_quiz(choice, events),
            Self::ResolveRentPayment => state.resolve_rent_payment(events),
            Self::ResolveTaxPayment => state.resolve_tax_payment(events),
            Self::ResolveJailDecision { choice } => state.resolve_jail_decision(choice, events),
            Self::DrawCard { deck } => state.draw_card(deck, events),
            Self::ResolveSpecialChoice { choice } => state.resolve_special_choice(choice, events),
            Self::UpgradeProperty { space } => state.upgrade_property(space, events),
            Self::ApplyUpgradeCredit { space } => state.apply_upgrade_credit(space, events),
            Self::MortgageProperty { space } => state.mortgage_property(space, events),
            Self::UnmortgageProperty { space } => state.unmortgage_property(space, events),
            Self::EndTurn => state.end_turn(events),
        }
    }
}

/// Owns the live game and collects the typed events each action produced.
#[derive(Debug)]
pub struct Session {
    state: GameState,
    events: EventBus,
}

impl Session {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            events: EventBus::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Swaps in a state from elsewhere (a save file or a remote peer).
    pub fn replace_state(&mut self, state: GameState) {
        self.state = state;
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Runs `action`. Illegal actions leave the game exactly as it was;
    /// rule violations keep their log line and are reported as errors.
    pub fn dispatch(&mut self, action: Action) -> Result<(), ActionError> {
        let backup = self.state.clone();
        let mut produced = EventBus::default();
        let result = action.apply(&mut self.state, &mut produced);
        match &result {
            Err(err) if !err.is_rule_violation() => {
                tracing::debug!(?action, %err, "ignored illegal action");
                self.state = backup;
            }
            _ => {
                for event in produced.drain() {
                    self.events.push(event);
                }
            }
        }
        result
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain().collect()
    }
}
