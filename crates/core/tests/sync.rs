mod common;

use common::*;
use std::time::{Duration, Instant};
use tycoon_core::sync::{Snapshot, SyncError, SyncPeer};
use tycoon_core::{ops, GameState, PendingAction, Phase, StateError};

#[test]
fn snapshot_survives_json_and_keeps_the_random_stream() {
    let state = ops::roll_dice(&started(config(), 3));
    let payload = Snapshot {
        sender: "host".to_string(),
        state: state.clone(),
    }
    .encode()
    .unwrap();
    let decoded = Snapshot::decode(&payload).unwrap();
    assert_eq!(decoded.state, state);

    let here = ops::roll_dice(&ops::resolve_purchase(&state, false));
    let there = ops::roll_dice(&ops::resolve_purchase(&decoded.state, false));
    assert_eq!(here, there);
}

#[test]
fn peers_ignore_their_own_echo() {
    let state = started(config(), 2);
    let mut host = SyncPeer::new("host");
    let payload = host.outgoing(&state).unwrap().unwrap();
    assert_eq!(host.incoming(&payload).unwrap(), None);
    assert!(host.outgoing(&state).unwrap().is_some());
}

#[test]
fn remote_snapshot_replaces_state_and_mutes_one_broadcast() {
    let mut host = SyncPeer::new("host");
    let mut guest = SyncPeer::new("guest");
    let state = ops::roll_dice_with(&started(config(), 2), (3, 4));

    let payload = host.outgoing(&state).unwrap().unwrap();
    let adopted: GameState = guest.incoming(&payload).unwrap().unwrap();
    assert_eq!(adopted, state);

    assert_eq!(guest.outgoing(&adopted).unwrap(), None);
    let next = ops::resolve_purchase(&adopted, true);
    assert!(guest.outgoing(&next).unwrap().is_some());
}

#[test]
fn garbage_payload_is_a_decode_error() {
    let mut guest = SyncPeer::new("guest");
    assert!(guest.incoming("{not json").is_err());
}

fn remote(state: &GameState) -> String {
    Snapshot {
        sender: "host".to_string(),
        state: state.clone(),
    }
    .encode()
    .unwrap()
}

fn rejection(state: &GameState) -> StateError {
    let mut guest = SyncPeer::new("guest");
    match guest.incoming(&remote(state)) {
        Err(SyncError::Invalid(err)) => err,
        other => panic!("expected a rejected snapshot, got {other:?}"),
    }
}

#[test]
fn snapshot_with_unseated_current_player_is_refused() {
    let mut state = started(config(), 2);
    state.current = 9;
    assert!(matches!(
        rejection(&state),
        StateError::CurrentOutOfRange(9)
    ));
}

#[test]
fn snapshot_with_split_ownership_is_refused() {
    let mut state = started(config(), 2);
    state.players[0].owned.insert(7);
    assert!(matches!(
        rejection(&state),
        StateError::Ownership { space: 7, .. }
    ));

    let mut state = started(config(), 2);
    state.ownership.remove(&7);
    assert!(matches!(
        rejection(&state),
        StateError::Ownership { space: 7, .. }
    ));
}

#[test]
fn snapshot_with_pending_outside_its_phase_is_refused() {
    let mut state = started(config(), 2);
    state.pending = Some(PendingAction::AwaitPurchaseDecision { space: 7 });
    assert_eq!(state.phase, Phase::AwaitRoll);
    assert!(matches!(rejection(&state), StateError::Pending { .. }));

    let mut state = started(config(), 2);
    state.pending = Some(PendingAction::AwaitRentPayment {
        space: 7,
        owner: 5,
        amount: 50,
    });
    state.phase = Phase::AwaitActionResolution;
    assert!(matches!(rejection(&state), StateError::Pending { .. }));
}

#[test]
fn refused_snapshot_does_not_mute_the_next_broadcast() {
    let mut state = started(config(), 2);
    state.current = 4;
    let mut guest = SyncPeer::new("guest");
    assert!(guest.incoming(&remote(&state)).is_err());
    assert!(guest.outgoing(&started(config(), 2)).unwrap().is_some());
}

#[test]
fn far_random_position_decodes_without_replay() {
    let state = started(config(), 2);
    let mut value = serde_json::to_value(Snapshot {
        sender: "host".to_string(),
        state,
    })
    .unwrap();
    value["state"]["rng"]["word_pos"] = serde_json::json!(1u64 << 62);
    let payload = value.to_string();

    let mut guest = SyncPeer::new("guest");
    let started_at = Instant::now();
    let adopted = guest.incoming(&payload).unwrap().unwrap();
    assert!(started_at.elapsed() < Duration::from_secs(1));
    assert_eq!(adopted.rng.word_pos(), 1 << 62);
    let rolled = ops::roll_dice(&adopted);
    assert!(rolled.dice.is_some());
}
