//! Value-in, value-out wrappers over the engine. Each call works on a copy:
//! an illegal call hands back the input unchanged, a rule violation hands
//! back the input plus the log line explaining the rejection.

use crate::{
    ActionError, ConfigError, DeckId, EventBus, GameConfig, GameState, JailChoice, SpaceId,
    SpecialChoice,
};

fn transition<F>(state: &GameState, apply: F) -> GameState
where
    F: FnOnce(&mut GameState, &mut EventBus) -> Result<(), ActionError>,
{
    let mut next = state.clone();
    let mut events = EventBus::default();
    match apply(&mut next, &mut events) {
        Ok(()) => next,
        Err(err) if err.is_rule_violation() => next,
        Err(err) => {
            tracing::debug!(%err, "ignored illegal action");
            state.clone()
        }
    }
}

pub fn configure<S: AsRef<str>>(
    config: GameConfig,
    names: &[S],
    seed: u64,
) -> Result<GameState, ConfigError> {
    GameState::configure(config, names, seed)
}

pub fn start_game(state: &GameState) -> GameState {
    transition(state, GameState::start_game)
}

pub fn roll_dice(state: &GameState) -> GameState {
    transition(state, GameState::roll_dice)
}

pub fn roll_dice_with(state: &GameState, dice: (u8, u8)) -> GameState {
    transition(state, |state, events| state.roll_dice_with(dice, events))
}

pub fn resolve_purchase(state: &GameState, accept: bool) -> GameState {
    transition(state, |state, events| state.resolve_purchase(accept, events))
}

pub fn answer_quiz(state: &GameState, choice: usize) -> GameState {
    transition(state, |state, events| state.answer_quiz(choice, events))
}

pub fn resolve_rent_payment(state: &GameState) -> GameState {
    transition(state, GameState::resolve_rent_payment)
}

pub fn resolve_tax_payment(state: &GameState) -> GameState {
    transition(state, GameState::resolve_tax_payment)
}

pub fn resolve_jail_decision(state: &GameState, choice: JailChoice) -> GameState {
    transition(state, |state, events| state.resolve_jail_decision(choice, events))
}

pub fn draw_card(state: &GameState, deck: DeckId) -> GameState {
    transition(state, |state, events| state.draw_card(deck, events))
}

pub fn resolve_special_choice(state: &GameState, choice: SpecialChoice) -> GameState {
    transition(state, |state, events| state.resolve_special_choice(choice, events))
}

pub fn upgrade_property(state: &GameState, space: SpaceId) -> GameState {
    transition(state, |state, events| state.upgrade_property(space, events))
}

pub fn apply_upgrade_credit(state: &GameState, space: SpaceId) -> GameState {
    transition(state, |state, events| state.apply_upgrade_credit(space, events))
}

pub fn mortgage_property(state: &GameState, space: SpaceId) -> GameState {
    transition(state, |state, events| state.mortgage_property(space, events))
}

pub fn unmortgage_property(state: &GameState, space: SpaceId) -> GameState {
    transition(state, |state, events| state.unmortgage_property(space, events))
}

pub fn end_turn(state: &GameState) -> GameState {
    transition(state, GameState::end_turn)
}
