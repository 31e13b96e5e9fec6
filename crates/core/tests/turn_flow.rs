mod common;

use common::*;
use tycoon_core::{
    ops, ConfigError, GameState, JailChoice, JailState, PendingAction, Phase, PurchaseGate,
};

fn jailed(mut state: GameState, attempts: u8) -> GameState {
    let current = state.current;
    state.players[current].position = state.config.board.jail_space().unwrap();
    state.players[current].jail = JailState::Jailed {
        failed_attempts: attempts,
    };
    state.pending = Some(PendingAction::AwaitJailDecision);
    state.phase = Phase::AwaitActionResolution;
    state
}

#[test]
fn opening_purchase_scenario() {
    let state = started(config(), 2);
    assert_eq!(state.current_player().cash, 1500);
    assert_eq!(state.current_player().position, 0);

    let state = ops::roll_dice_with(&state, (3, 4));
    assert_eq!(state.current_player().position, 7);
    assert_eq!(
        state.pending,
        Some(PendingAction::AwaitPurchaseDecision { space: 7 })
    );

    let state = ops::resolve_purchase(&state, true);
    assert_eq!(state.players[0].cash, 900);
    assert_eq!(state.owner_of(7), Some(0));
    assert!(state.players[0].owned.contains(&7));
    assert_eq!(state.phase, Phase::AwaitEndTurn);
    assert_eq!(state.pending, None);
}

#[test]
fn configure_trims_and_rejects_bad_rosters() {
    let state = ops::configure(config(), &["  Ann ", "", "   ", "Bo"], 1).unwrap();
    let names: Vec<&str> = state.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Bo"]);
    assert_eq!(state.phase, Phase::Setup);

    assert!(ops::configure(config(), &["Solo", " "], 1).is_err());

    let crowd = ["A", "B", "C", "D", "E"];
    let err = ops::configure(config(), &crowd, 1).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRoster(_)), "{err}");

    let state = ops::configure(config(), &["A", "B", "C", "D", " "], 1).unwrap();
    assert_eq!(state.players.len(), 4);
}

#[test]
fn doubles_grant_another_roll() {
    let state = started(config(), 2);
    let state = ops::roll_dice_with(&state, (4, 4));
    assert_eq!(state.current_player().position, 8);
    assert_eq!(state.phase, Phase::AwaitRoll);
    assert_eq!(state.current, 0);
    assert_eq!(state.consecutive_doubles, 1);
}

#[test]
fn third_double_goes_to_jail_instead_of_moving() {
    let state = started(config(), 2);
    let state = ops::roll_dice_with(&state, (4, 4));
    let state = ops::roll_dice_with(&state, (1, 1));
    assert_eq!(state.current_player().position, 10);
    let state = ops::resolve_purchase(&state, false);
    assert_eq!(state.phase, Phase::AwaitRoll);

    let state = ops::roll_dice_with(&state, (2, 2));
    let player = state.current_player();
    assert!(player.is_jailed());
    assert_eq!(player.position, 8);
    assert_eq!(state.phase, Phase::AwaitEndTurn);
    assert_eq!(state.consecutive_doubles, 0);
}

#[test]
fn go_to_jail_space_ends_turn_even_after_doubles() {
    let state = started(config(), 2);
    let state = ops::roll_dice_with(&state, (6, 6));
    assert!(state.players[0].is_jailed());
    assert_eq!(state.players[0].position, 8);
    assert_eq!(state.phase, Phase::AwaitEndTurn);
    assert!(!state.extra_roll);
}

#[test]
fn jailed_player_faces_a_decision_at_turn_start() {
    let state = started(config(), 2);
    let state = ops::roll_dice_with(&state, (6, 6));
    let state = ops::end_turn(&state);
    let state = ops::roll_dice_with(&state, (1, 2));
    let state = ops::resolve_purchase(&state, false);
    let state = ops::end_turn(&state);
    assert_eq!(state.current, 0);
    assert_eq!(state.pending, Some(PendingAction::AwaitJailDecision));
}

#[test]
fn jail_doubles_release_without_extra_roll() {
    let state = jailed(started(config(), 2), 0);
    let state = ops::roll_dice_with(&state, (1, 1));
    assert!(!state.players[0].is_jailed());
    assert_eq!(state.players[0].position, 10);
    let state = ops::resolve_purchase(&state, false);
    assert_eq!(state.phase, Phase::AwaitEndTurn);
}

#[test]
fn jail_doubles_reroll_when_the_profile_allows_it() {
    let mut config = config();
    config.profile.jail_break_rolls_again = true;
    let state = jailed(started(config, 2), 0);
    let state = ops::roll_dice_with(&state, (1, 1));
    assert!(!state.players[0].is_jailed());
    assert_eq!(state.players[0].position, 10);
    let state = ops::resolve_purchase(&state, false);
    assert_eq!(state.phase, Phase::AwaitRoll);
    assert_eq!(state.current, 0);
}

#[test]
fn failed_jail_roll_ends_turn() {
    let state = jailed(started(config(), 2), 0);
    let state = ops::roll_dice_with(&state, (1, 2));
    assert_eq!(
        state.players[0].jail,
        JailState::Jailed { failed_attempts: 1 }
    );
    assert_eq!(state.players[0].position, 8);
    assert_eq!(state.phase, Phase::AwaitEndTurn);
}

#[test]
fn third_failed_jail_roll_forces_fine_and_moves() {
    let state = jailed(started(config(), 2), 2);
    let state = ops::roll_dice_with(&state, (1, 2));
    let player = &state.players[0];
    assert!(!player.is_jailed());
    assert_eq!(player.cash, 1450);
    assert_eq!(player.position, 11);
    assert_eq!(state.phase, Phase::AwaitEndTurn);
}

#[test]
fn forced_fine_can_bankrupt() {
    let mut state = jailed(started(config(), 2), 2);
    state.players[0].cash = 30;
    let state = ops::roll_dice_with(&state, (1, 2));
    assert!(state.players[0].bankrupt);
    assert_eq!(state.phase, Phase::GameOver);
    assert_eq!(state.winner().map(|p| p.name.as_str()), Some("P2"));
}

#[test]
fn paying_the_fine_frees_the_player_to_roll() {
    let state = jailed(started(config(), 2), 0);
    let state = ops::resolve_jail_decision(&state, JailChoice::PayFine);
    assert!(!state.players[0].is_jailed());
    assert_eq!(state.players[0].cash, 1450);
    assert_eq!(state.phase, Phase::AwaitRoll);
    assert_eq!(state.pending, None);

    let state = ops::roll_dice_with(&state, (1, 2));
    assert_eq!(state.players[0].position, 11);
    assert_eq!(state.phase, Phase::AwaitEndTurn);
}

#[test]
fn fine_without_cash_is_rejected_with_a_log_line() {
    let mut state = jailed(started(config(), 2), 0);
    state.players[0].cash = 10;
    let next = ops::resolve_jail_decision(&state, JailChoice::PayFine);
    assert_eq!(next.players, state.players);
    assert_eq!(next.pending, Some(PendingAction::AwaitJailDecision));
    assert_eq!(next.log.len(), state.log.len() + 1);
    assert!(next.log.latest().unwrap().contains("not enough cash"));
}

#[test]
fn bail_card_releases_the_player() {
    let mut state = jailed(started(config(), 2), 1);
    let without = ops::resolve_jail_decision(&state, JailChoice::UseToken);
    assert!(without.players[0].is_jailed());

    state.players[0].jail_tokens = 1;
    let state = ops::resolve_jail_decision(&state, JailChoice::UseToken);
    assert!(!state.players[0].is_jailed());
    assert_eq!(state.players[0].jail_tokens, 0);
    assert_eq!(state.phase, Phase::AwaitRoll);
}

#[test]
fn illegal_calls_return_the_state_unchanged() {
    let state = started(config(), 2);
    assert_eq!(ops::end_turn(&state), state);
    assert_eq!(ops::resolve_rent_payment(&state), state);
    assert_eq!(ops::resolve_purchase(&state, true), state);
    assert_eq!(ops::roll_dice_with(&state, (0, 7)), state);
    assert_eq!(ops::start_game(&state), state);

    let pending = ops::roll_dice_with(&state, (3, 4));
    assert_eq!(ops::roll_dice(&pending), pending);
    assert_eq!(ops::end_turn(&pending), pending);
    assert_eq!(ops::resolve_tax_payment(&pending), pending);

    let done = ops::resolve_purchase(&pending, false);
    assert_eq!(ops::roll_dice(&done), done);
}

#[test]
fn seeded_rolls_are_reproducible() {
    let a = ops::roll_dice(&started(config(), 2));
    let b = ops::roll_dice(&started(config(), 2));
    assert_eq!(a.dice, b.dice);
    assert_eq!(a, b);
}

#[test]
fn passing_start_pays_the_bonus() {
    let mut state = started(config(), 2);
    state.players[0].position = 14;
    let state = ops::roll_dice_with(&state, (1, 2));
    assert_eq!(state.players[0].position, 1);
    assert_eq!(state.players[0].cash, 1700);
}

#[test]
fn skipped_turn_is_consumed_instead_of_moving() {
    let mut state = started(config(), 2);
    state.players[0].skip_turns = 1;
    let state = ops::roll_dice_with(&state, (3, 4));
    assert_eq!(state.players[0].position, 0);
    assert_eq!(state.players[0].skip_turns, 0);
    assert_eq!(state.phase, Phase::AwaitEndTurn);
    assert!(state.log.latest().unwrap().contains("sits out"));
}

#[test]
fn tax_is_paid_to_the_bank() {
    let state = started(config(), 2);
    let state = ops::roll_dice_with(&state, (1, 3));
    assert_eq!(
        state.pending,
        Some(PendingAction::AwaitTaxPayment {
            space: 4,
            amount: 200
        })
    );
    let state = ops::resolve_tax_payment(&state);
    assert_eq!(state.players[0].cash, 1300);
    assert_eq!(state.players[1].cash, 1500);
    assert_eq!(state.phase, Phase::AwaitEndTurn);
}

#[test]
fn unaffordable_purchase_stays_pending() {
    let mut state = started(config(), 2);
    state.players[0].cash = 100;
    let state = ops::roll_dice_with(&state, (3, 4));
    let next = ops::resolve_purchase(&state, true);
    assert_eq!(next.owner_of(7), None);
    assert_eq!(next.players[0].cash, 100);
    assert_eq!(next.pending, state.pending);
    assert!(next.log.latest().unwrap().contains("not enough cash"));

    let next = ops::resolve_purchase(&next, false);
    assert_eq!(next.phase, Phase::AwaitEndTurn);
}

#[test]
fn oratory_rewards_or_fines_a_performance() {
    let mut state = started(config(), 2);
    state.players[0].position = 11;
    let state = ops::roll_dice_with(&state, (1, 2));
    assert!(matches!(
        state.pending,
        Some(PendingAction::AwaitSpecialChoice { space: 14, .. })
    ));
    assert_eq!(
        ops::resolve_special_choice(&state, tycoon_core::SpecialChoice::TakeCash),
        state
    );

    let good = ops::resolve_special_choice(
        &state,
        tycoon_core::SpecialChoice::Perform { success: true },
    );
    assert_eq!(good.players[0].cash, 1550);
    assert_eq!(good.phase, Phase::AwaitEndTurn);

    let bad = ops::resolve_special_choice(
        &state,
        tycoon_core::SpecialChoice::Perform { success: false },
    );
    assert_eq!(bad.players[0].cash, 1470);
}

#[test]
fn library_can_hand_over_a_card() {
    let mut state = started(config(), 2);
    state.players[0].position = 10;
    let state = ops::roll_dice_with(&state, (2, 3));
    assert_eq!(state.players[0].position, 15);

    let cash = ops::resolve_special_choice(&state, tycoon_core::SpecialChoice::TakeCash);
    assert_eq!(cash.players[0].cash, 1550);

    let card = ops::resolve_special_choice(&state, tycoon_core::SpecialChoice::DrawCard);
    assert_eq!(card.players[0].cash, 1520);
    assert_eq!(card.decks.community.discard.len(), 1);
    assert_eq!(card.phase, Phase::AwaitEndTurn);
}

fn quiz_config(questions: usize) -> tycoon_core::GameConfig {
    let mut config = config();
    config.profile.purchase_gate = PurchaseGate::Quiz;
    config.questions = (0..questions as u32).map(|id| question(id, 2)).collect();
    config
}

#[test]
fn quiz_gate_buys_on_a_correct_answer() {
    let state = started(quiz_config(1), 2);
    let state = ops::roll_dice_with(&state, (3, 4));
    let state = ops::resolve_purchase(&state, true);
    assert_eq!(
        state.pending,
        Some(PendingAction::AwaitQuizAnswer {
            space: 7,
            question: 0
        })
    );
    assert_eq!(state.players[0].cash, 1500);

    let right = ops::answer_quiz(&state, 2);
    assert_eq!(right.owner_of(7), Some(0));
    assert_eq!(right.players[0].cash, 900);
    assert_eq!(right.phase, Phase::AwaitEndTurn);

    let wrong = ops::answer_quiz(&state, 0);
    assert_eq!(wrong.owner_of(7), None);
    assert_eq!(wrong.players[0].cash, 1500);
    assert_eq!(wrong.phase, Phase::AwaitEndTurn);

    assert_eq!(ops::answer_quiz(&state, 9), state);
}

#[test]
fn quiz_gate_without_questions_buys_immediately() {
    let state = started(quiz_config(0), 2);
    let state = ops::roll_dice_with(&state, (3, 4));
    let state = ops::resolve_purchase(&state, true);
    assert_eq!(state.owner_of(7), Some(0));
}
