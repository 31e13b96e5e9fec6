use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seeded random source. A snapshot keeps the seed and the word position
/// in the ChaCha stream, so restoring is a seek rather than a replay.
#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn word_pos(&self) -> u128 {
        self.rng.get_word_pos()
    }

    /// Uniform index in `0..bound`. `bound` of zero yields zero.
    pub fn index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }

    pub fn roll_die(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    fn restore(seed: u64, word_pos: u128) -> Self {
        let mut state = Self::from_seed(seed);
        state.rng.set_word_pos(word_pos);
        state
    }
}

/// Two sources are equal when they sit at the same point of the same stream.
impl PartialEq for RngState {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed && self.word_pos() == other.word_pos()
    }
}

impl Eq for RngState {}

#[derive(Serialize, Deserialize)]
struct RngRepr {
    seed: u64,
    word_pos: u128,
}

impl Serialize for RngState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RngRepr {
            seed: self.seed,
            word_pos: self.word_pos(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RngState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = RngRepr::deserialize(deserializer)?;
        Ok(Self::restore(repr.seed, repr.word_pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn dice_stay_in_range() {
        let mut rng = RngState::from_seed(11);
        for _ in 0..500 {
            let value = rng.roll_die();
            assert!((1..=6).contains(&value));
        }
    }

    #[test]
    fn restored_stream_continues_where_it_left_off() {
        let mut rng = RngState::from_seed(42);
        for _ in 0..17 {
            rng.roll_die();
        }
        let json = serde_json::to_string(&rng).expect("serialize");
        let mut restored: RngState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.seed(), 42);
        assert_eq!(restored, rng);
        for _ in 0..10 {
            assert_eq!(restored.roll_die(), rng.roll_die());
            assert_eq!(restored.index(52), rng.index(52));
        }
    }

    #[test]
    fn far_stream_position_restores_without_replay() {
        let json = r#"{"seed":7,"word_pos":1152921504606846976}"#;
        let started = Instant::now();
        let mut restored: RngState = serde_json::from_str(json).expect("deserialize");
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(restored.word_pos(), 1 << 60);
        assert!((1..=6).contains(&restored.roll_die()));
    }

    #[test]
    fn index_respects_bound() {
        let mut rng = RngState::from_seed(5);
        assert_eq!(rng.index(0), 0);
        for _ in 0..200 {
            assert!(rng.index(7) < 7);
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = RngState::from_seed(3);
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
