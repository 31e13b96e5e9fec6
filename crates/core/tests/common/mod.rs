#![allow(dead_code)]

use tycoon_core::{
    ops, Board, BoardSpace, Card, CardEffect, GameConfig, GameState, PlayerId, QuizQuestion,
    RuleProfile, SpaceId, SpaceKind, SpecialKind,
};

pub fn space(id: SpaceId, kind: SpaceKind, name: &str) -> BoardSpace {
    BoardSpace {
        id,
        kind,
        name: name.to_string(),
        price: None,
        rent: Vec::new(),
        build_cost: None,
        group: None,
        amount: None,
    }
}

pub fn property(id: SpaceId, name: &str, group: &str, price: i64, rent: [i64; 6]) -> BoardSpace {
    BoardSpace {
        price: Some(price),
        rent: rent.to_vec(),
        build_cost: Some(price / 2),
        group: Some(group.to_string()),
        ..space(id, SpaceKind::Property, name)
    }
}

fn station(id: SpaceId, name: &str) -> BoardSpace {
    BoardSpace {
        price: Some(200),
        rent: vec![25, 50, 100, 200],
        ..space(id, SpaceKind::Station, name)
    }
}

/// Sixteen spaces. Space 7 is the $600 lot used by the opening scenario.
pub fn board() -> Board {
    Board::new(vec![
        space(0, SpaceKind::Start, "Go"),
        property(1, "Old Street", "brown", 60, [2, 10, 30, 90, 160, 250]),
        space(2, SpaceKind::Community, "Community Chest"),
        property(3, "Mill Lane", "brown", 60, [4, 20, 60, 180, 320, 450]),
        BoardSpace {
            amount: Some(200),
            ..space(4, SpaceKind::Tax, "Income Tax")
        },
        station(5, "North Station"),
        space(6, SpaceKind::Chance, "Chance"),
        property(7, "Harbour View", "blue", 600, [50, 200, 600, 1400, 1700, 2000]),
        space(8, SpaceKind::Jail, "Jail"),
        property(9, "Peak Road", "blue", 600, [50, 200, 600, 1400, 1700, 2000]),
        BoardSpace {
            price: Some(150),
            ..space(10, SpaceKind::Utility, "Power Plant")
        },
        space(11, SpaceKind::FreeParking, "Free Parking"),
        space(12, SpaceKind::GoToJail, "Go To Jail"),
        station(13, "South Station"),
        space(14, SpaceKind::SpecialCorner(SpecialKind::Oratory), "Oratory"),
        space(15, SpaceKind::SpecialCorner(SpecialKind::Library), "Library"),
    ])
    .expect("test board is valid")
}

pub fn card(id: u32, title: &str, effects: Vec<CardEffect>) -> Card {
    Card {
        id,
        title: title.to_string(),
        description: String::new(),
        effects,
    }
}

pub fn cash_card(id: u32, amount: i64) -> Card {
    card(id, &format!("cash {amount}"), vec![CardEffect::GainOrLoseCash(amount)])
}

pub fn config_with(chance: Vec<Card>, community: Vec<Card>) -> GameConfig {
    GameConfig {
        profile: RuleProfile::default(),
        board: board(),
        chance,
        community,
        questions: Vec::new(),
    }
}

pub fn config() -> GameConfig {
    config_with(vec![cash_card(1, 10)], vec![cash_card(2, 20)])
}

pub fn question(id: u32, correct_index: usize) -> QuizQuestion {
    QuizQuestion {
        id,
        question: format!("question {id}"),
        options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        correct_index,
        category: String::new(),
    }
}

pub fn started(config: GameConfig, players: usize) -> GameState {
    let names: Vec<String> = (1..=players).map(|n| format!("P{n}")).collect();
    let state = ops::configure(config, &names, 7).expect("valid setup");
    ops::start_game(&state)
}

/// Hands `space` to `owner` without going through a purchase.
pub fn give(state: &mut GameState, owner: PlayerId, space: SpaceId) {
    if let Some(record) = state.ownership.get_mut(&space) {
        record.owner = Some(owner);
    }
    state.players[owner].owned.insert(space);
}
