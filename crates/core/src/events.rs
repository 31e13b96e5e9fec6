use crate::{DeckId, SpecialKind};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    GameStarted { players: usize },
    TurnStarted { player: String },
    DiceRolled { player: String, dice: (u8, u8) },
    ExtraRoll { player: String },
    PassedStart { player: String, bonus: i64 },
    Moved { player: String, space: String },
    LandingBonus { player: String, amount: i64 },
    SpeedingToJail { player: String },
    SentToJail { player: String },
    JailRollFailed { player: String, attempts: u8 },
    JailBreak { player: String },
    JailFinePaid { player: String, fine: i64, forced: bool },
    JailTokenUsed { player: String },
    TurnSkipped { player: String, remaining: u32 },
    PurchaseOffered { player: String, space: String, price: i64 },
    Purchased { player: String, space: String, price: i64 },
    PurchaseDeclined { player: String, space: String },
    QuizAsked { player: String, question: String },
    QuizAnswered { player: String, correct: bool },
    RentDue { player: String, owner: String, amount: i64 },
    RentPaid { payer: String, owner: String, amount: i64 },
    RentShieldUsed { player: String, space: String },
    TaxDue { player: String, space: String, amount: i64 },
    TaxPaid { player: String, space: String, amount: i64 },
    CardDrawn { player: String, deck: DeckId, title: String },
    CashChanged { player: String, amount: i64 },
    Transfer { from: String, to: String, amount: i64 },
    RentShieldGranted { player: String },
    UpgradeCreditGranted { player: String },
    JailTokenGranted { player: String },
    TurnSkipQueued { player: String },
    NoSpaceOfKind { player: String, kind: String },
    SpecialReached { player: String, kind: SpecialKind },
    Upgraded { player: String, space: String, level: u8, cost: i64 },
    Mortgaged { player: String, space: String, amount: i64 },
    Unmortgaged { player: String, space: String, amount: i64 },
    Rejected { player: String, reason: String },
    Bankrupt { player: String, creditor: Option<String> },
    GameOver { winner: Option<String> },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameStarted { players } => write!(f, "Game started with {players} players"),
            Self::TurnStarted { player } => write!(f, "{player}'s turn"),
            Self::DiceRolled { player, dice } => {
                write!(f, "{player} rolled {} and {}", dice.0, dice.1)
            }
            Self::ExtraRoll { player } => write!(f, "{player} rolled doubles and goes again"),
            Self::PassedStart { player, bonus } => {
                write!(f, "{player} passed start and collected ${bonus}")
            }
            Self::Moved { player, space } => write!(f, "{player} landed on {space}"),
            Self::LandingBonus { player, amount } => {
                write!(f, "{player} landed exactly on start and collected ${amount}")
            }
            Self::SpeedingToJail { player } => {
                write!(f, "{player} rolled three doubles in a row and goes to jail")
            }
            Self::SentToJail { player } => write!(f, "{player} was sent to jail"),
            Self::JailRollFailed { player, attempts } => {
                write!(f, "{player} failed to roll doubles in jail (attempt {attempts})")
            }
            Self::JailBreak { player } => write!(f, "{player} rolled doubles and left jail"),
            Self::JailFinePaid {
                player,
                fine,
                forced,
            } => {
                if *forced {
                    write!(f, "{player} served the maximum term and paid the ${fine} fine")
                } else {
                    write!(f, "{player} paid the ${fine} fine and left jail")
                }
            }
            Self::JailTokenUsed { player } => write!(f, "{player} used a bail card"),
            Self::TurnSkipped { player, remaining } => {
                write!(f, "{player} sits out this turn ({remaining} left)")
            }
            Self::PurchaseOffered {
                player,
                space,
                price,
            } => write!(f, "{player} may buy {space} for ${price}"),
            Self::Purchased {
                player,
                space,
                price,
            } => write!(f, "{player} bought {space} for ${price}"),
            Self::PurchaseDeclined { player, space } => write!(f, "{player} did not buy {space}"),
            Self::QuizAsked { player, question } => write!(f, "{player} must answer: {question}"),
            Self::QuizAnswered { player, correct } => {
                if *correct {
                    write!(f, "{player} answered correctly")
                } else {
                    write!(f, "{player} answered incorrectly")
                }
            }
            Self::RentDue {
                player,
                owner,
                amount,
            } => write!(f, "{player} owes {owner} ${amount} rent"),
            Self::RentPaid {
                payer,
                owner,
                amount,
            } => write!(f, "{payer} paid {owner} ${amount} rent"),
            Self::RentShieldUsed { player, space } => {
                write!(f, "{player} used a rent shield on {space}")
            }
            Self::TaxDue {
                player,
                space,
                amount,
            } => write!(f, "{player} owes ${amount} for {space}"),
            Self::TaxPaid {
                player,
                space,
                amount,
            } => write!(f, "{player} paid ${amount} for {space}"),
            Self::CardDrawn {
                player,
                deck,
                title,
            } => write!(f, "{player} drew {} card: {title}", deck.label()),
            Self::CashChanged { player, amount } => {
                if *amount >= 0 {
                    write!(f, "{player} received ${amount}")
                } else {
                    write!(f, "{player} paid ${}", -amount)
                }
            }
            Self::Transfer { from, to, amount } => write!(f, "{from} paid {to} ${amount}"),
            Self::RentShieldGranted { player } => write!(f, "{player} gained a rent shield"),
            Self::UpgradeCreditGranted { player } => {
                write!(f, "{player} gained a free upgrade credit")
            }
            Self::JailTokenGranted { player } => write!(f, "{player} gained a bail card"),
            Self::TurnSkipQueued { player } => write!(f, "{player} will sit out a turn"),
            Self::NoSpaceOfKind { player, kind } => {
                write!(f, "{player} found no {kind} space to move to")
            }
            Self::SpecialReached { player, kind } => {
                write!(f, "{player} reached the {kind:?} and must choose")
            }
            Self::Upgraded {
                player,
                space,
                level,
                cost,
            } => write!(f, "{player} developed {space} to level {level} for ${cost}"),
            Self::Mortgaged {
                player,
                space,
                amount,
            } => write!(f, "{player} mortgaged {space} for ${amount}"),
            Self::Unmortgaged {
                player,
                space,
                amount,
            } => write!(f, "{player} lifted the mortgage on {space} for ${amount}"),
            Self::Rejected { player, reason } => write!(f, "{player}: {reason}"),
            Self::Bankrupt { player, creditor } => match creditor {
                Some(creditor) => write!(f, "{player} is bankrupt, owing {creditor}"),
                None => write!(f, "{player} is bankrupt"),
            },
            Self::GameOver { winner } => match winner {
                Some(winner) => write!(f, "Game over, {winner} wins"),
                None => write!(f, "Game over"),
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Player-facing history, newest first, capped at `capacity` lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventLog {
    capacity: usize,
    lines: VecDeque<String>,
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            lines: VecDeque::new(),
        }
    }

    pub fn push(&mut self, line: String) {
        self.lines.push_front(line);
        self.lines.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_newest_first_and_caps_length() {
        let mut log = EventLog::with_capacity(3);
        for i in 0..5 {
            log.push(format!("line {i}"));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(
            log.iter().collect::<Vec<_>>(),
            vec!["line 4", "line 3", "line 2"]
        );
    }

    #[test]
    fn negative_cash_change_reads_as_payment() {
        let event = Event::CashChanged {
            player: "Ann".to_string(),
            amount: -30,
        };
        assert_eq!(event.to_string(), "Ann paid $30");
    }
}
