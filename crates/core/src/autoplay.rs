//! A plain greedy player used by the CLI's auto mode and by long-running
//! invariant tests.

use crate::{
    can_upgrade, Action, GameState, JailChoice, PendingAction, Phase, SpaceId, SpecialChoice,
    SpecialKind,
};

/// Every action the current position accepts, in no particular order.
pub fn legal_actions(state: &GameState) -> Vec<Action> {
    let mut actions = Vec::new();
    match (state.phase, state.pending) {
        (Phase::Setup, _) => actions.push(Action::StartGame),
        (Phase::GameOver, _) => {}
        (Phase::AwaitRoll, None) => {
            actions.push(Action::RollDice);
            actions.extend(upgrades(state));
        }
        (Phase::AwaitEndTurn, None) => {
            actions.push(Action::EndTurn);
            actions.extend(upgrades(state));
        }
        (_, Some(pending)) => match pending {
            PendingAction::AwaitPurchaseDecision { .. } => {
                actions.push(Action::ResolvePurchase { accept: false });
                actions.push(Action::ResolvePurchase { accept: true });
            }
            PendingAction::AwaitQuizAnswer { question, .. } => {
                let options = state
                    .config
                    .questions
                    .get(question)
                    .map_or(0, |question| question.options.len());
                actions.extend((0..options).map(|choice| Action::AnswerQuiz { choice }));
            }
            PendingAction::AwaitRentPayment { .. } => actions.push(Action::ResolveRentPayment),
            PendingAction::AwaitTaxPayment { .. } => actions.push(Action::ResolveTaxPayment),
            PendingAction::AwaitCardEffectResolution { deck } => {
                actions.push(Action::DrawCard { deck })
            }
            PendingAction::AwaitJailDecision => {
                for choice in [
                    JailChoice::PayFine,
                    JailChoice::UseToken,
                    JailChoice::AttemptDoubles,
                ] {
                    actions.push(Action::ResolveJailDecision { choice });
                }
            }
            PendingAction::AwaitSpecialChoice { kind, .. } => match kind {
                SpecialKind::Library | SpecialKind::Canteen => {
                    for choice in [SpecialChoice::TakeCash, SpecialChoice::DrawCard] {
                        actions.push(Action::ResolveSpecialChoice { choice });
                    }
                }
                SpecialKind::Oratory => {
                    for success in [true, false] {
                        actions.push(Action::ResolveSpecialChoice {
                            choice: SpecialChoice::Perform { success },
                        });
                    }
                }
            },
        },
        (_, None) => {}
    }
    actions
}

fn upgrades(state: &GameState) -> impl Iterator<Item = Action> + '_ {
    buildable(state).map(|space| Action::UpgradeProperty { space })
}

fn buildable(state: &GameState) -> impl Iterator<Item = SpaceId> + '_ {
    let player = state.current;
    state.players[player].owned.iter().copied().filter(move |&space| {
        let (Some(board_space), Some(record)) =
            (state.config.board.space(space), state.ownership_of(space))
        else {
            return false;
        };
        can_upgrade(player, board_space, record, &state.group_ownership(space))
    })
}

/// Buys whatever it can afford while keeping a cushion, builds when rich,
/// and otherwise takes the cheapest way through every decision.
pub fn auto_action(state: &GameState) -> Option<Action> {
    let player = state.current_player();
    let cushion = state.config.profile.starting_cash / 5;
    match (state.phase, state.pending) {
        (Phase::Setup, _) => Some(Action::StartGame),
        (Phase::GameOver, _) => None,
        (Phase::AwaitRoll, None) => Some(Action::RollDice),
        (Phase::AwaitEndTurn, None) => {
            let upgrade = buildable(state).find(|&space| {
                let cost = state
                    .config
                    .board
                    .space(space)
                    .and_then(|space| space.build_cost)
                    .unwrap_or(0);
                player.cash - cost >= cushion
            });
            Some(match upgrade {
                Some(space) => Action::UpgradeProperty { space },
                None => Action::EndTurn,
            })
        }
        (_, Some(pending)) => Some(match pending {
            PendingAction::AwaitPurchaseDecision { space } => {
                let price = state
                    .config
                    .board
                    .space(space)
                    .and_then(|space| space.price)
                    .unwrap_or(i64::MAX);
                Action::ResolvePurchase {
                    accept: player.cash >= price && player.cash - price >= cushion,
                }
            }
            PendingAction::AwaitQuizAnswer { .. } => Action::AnswerQuiz { choice: 0 },
            PendingAction::AwaitRentPayment { .. } => Action::ResolveRentPayment,
            PendingAction::AwaitTaxPayment { .. } => Action::ResolveTaxPayment,
            PendingAction::AwaitCardEffectResolution { deck } => Action::DrawCard { deck },
            PendingAction::AwaitJailDecision => {
                let choice = if player.jail_tokens > 0 {
                    JailChoice::UseToken
                } else if player.cash - state.config.profile.jail_fine >= cushion {
                    JailChoice::PayFine
                } else {
                    JailChoice::AttemptDoubles
                };
                Action::ResolveJailDecision { choice }
            }
            PendingAction::AwaitSpecialChoice { kind, .. } => {
                let choice = match kind {
                    SpecialKind::Oratory => SpecialChoice::Perform {
                        success: player.cash % 2 == 0,
                    },
                    _ => SpecialChoice::TakeCash,
                };
                Action::ResolveSpecialChoice { choice }
            }
        }),
        (_, None) => None,
    }
}
