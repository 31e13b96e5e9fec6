use crate::{Card, ConfigError, DeckId, RngState};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A closed deck: cards only ever move between the draw and discard piles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deck {
    pub id: DeckId,
    /// Front is the next card drawn.
    pub draw: VecDeque<Card>,
    pub discard: Vec<Card>,
}

impl Deck {
    pub fn shuffled(id: DeckId, cards: Vec<Card>, rng: &mut RngState) -> Self {
        let mut cards = cards;
        rng.shuffle(&mut cards);
        Self {
            id,
            draw: cards.into(),
            discard: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.draw.len() + self.discard.len()
    }

    /// Moves every discard back under a fresh shuffle.
    pub fn reshuffle_discard(&mut self, rng: &mut RngState) {
        if self.discard.is_empty() {
            return;
        }
        let mut cards: Vec<Card> = self.draw.drain(..).collect();
        cards.append(&mut self.discard);
        rng.shuffle(&mut cards);
        self.draw = cards.into();
    }

    /// Takes the front card and files it on the discard pile. An exhausted
    /// draw pile is refilled from the discards first.
    pub fn draw(&mut self, rng: &mut RngState) -> Result<Card, ConfigError> {
        if self.draw.is_empty() {
            self.reshuffle_discard(rng);
        }
        let card = self.draw.pop_front().ok_or(ConfigError::EmptyDeck(self.id))?;
        self.discard.push(card.clone());
        Ok(card)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Decks {
    pub chance: Deck,
    pub community: Deck,
}

impl Decks {
    pub fn get(&self, id: DeckId) -> &Deck {
        match id {
            DeckId::Chance => &self.chance,
            DeckId::Community => &self.community,
        }
    }

    pub fn get_mut(&mut self, id: DeckId) -> &mut Deck {
        match id {
            DeckId::Chance => &mut self.chance,
            DeckId::Community => &mut self.community,
        }
    }
}
