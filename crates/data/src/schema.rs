use serde::{Deserialize, Serialize};

pub use tycoon_core::{BoardSpace, Card, GameConfig, QuizQuestion, RuleProfile};

/// `cards.json`: both decks of a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardsFile {
    pub chance: Vec<Card>,
    pub community: Vec<Card>,
}

/// `board.json`: spaces in movement order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardFile {
    pub spaces: Vec<BoardSpace>,
}
