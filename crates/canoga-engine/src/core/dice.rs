use std::{collections::VecDeque, fmt::Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::InvalidDieValueError;

/// How many dice to roll. The rules only ever permit one or two, so an
/// invalid count is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiceCount {
    One,
    Two,
}

/// The outcome of a roll: one or two die faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    first: u8,
    second: Option<u8>,
}

impl DiceRoll {
    pub fn new(first: u8, second: Option<u8>) -> Result<Self, InvalidDieValueError> {
        for die in [Some(first), second].into_iter().flatten() {
            if !(1..=6).contains(&die) {
                return Err(InvalidDieValueError(die));
            }
        }
        Ok(Self { first, second })
    }

    #[must_use]
    pub fn first(&self) -> u8 {
        self.first
    }

    #[must_use]
    pub fn second(&self) -> Option<u8> {
        self.second
    }

    #[must_use]
    pub fn count(&self) -> DiceCount {
        if self.second.is_some() {
            DiceCount::Two
        } else {
            DiceCount::One
        }
    }

    #[must_use]
    pub fn total(&self) -> u8 {
        self.first + self.second.unwrap_or(0)
    }
}

/// Seed for deterministic dice.
///
/// A 128-bit seed initializing the dice RNG. Two `Dice` built from the same
/// seed produce the same roll sequence, enabling reproducible matches and
/// deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceSeed([u8; 16]);

impl Serialize for DiceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for DiceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Distribution<DiceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DiceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        DiceSeed(seed)
    }
}

impl From<u128> for DiceSeed {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

/// The dice collaborator: a seeded RNG fronted by a queue of manual rolls.
///
/// A queued roll whose die count matches the request is consumed before any
/// randomness; queue entries with a different arity are left in place for a
/// later request of the matching kind.
#[derive(Debug, Clone)]
pub struct Dice {
    rng: Pcg32,
    queue: VecDeque<DiceRoll>,
}

impl Default for Dice {
    fn default() -> Self {
        Self::new()
    }
}

impl Dice {
    /// Creates dice with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic rolls.
    #[must_use]
    pub fn with_seed(seed: DiceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            queue: VecDeque::new(),
        }
    }

    /// Queues a manual roll to be served ahead of random ones.
    pub fn enqueue(&mut self, roll: DiceRoll) {
        self.queue.push_back(roll);
    }

    /// The manual rolls still waiting to be consumed, front first.
    pub fn queued(&self) -> impl Iterator<Item = DiceRoll> + '_ {
        self.queue.iter().copied()
    }

    pub fn roll(&mut self, count: DiceCount) -> DiceRoll {
        if let Some(index) = self.queue.iter().position(|r| r.count() == count) {
            if let Some(roll) = self.queue.remove(index) {
                return roll;
            }
        }
        let first = self.rng.random_range(1..=6);
        let second = match count {
            DiceCount::One => None,
            DiceCount::Two => Some(self.rng.random_range(1..=6)),
        };
        DiceRoll { first, second }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll2(first: u8, second: u8) -> DiceRoll {
        DiceRoll::new(first, Some(second)).unwrap()
    }

    #[test]
    fn test_roll_values_are_validated() {
        assert!(DiceRoll::new(0, None).is_err());
        assert!(DiceRoll::new(7, None).is_err());
        assert!(DiceRoll::new(3, Some(0)).is_err());
        assert_eq!(roll2(3, 4).total(), 7);
        assert_eq!(DiceRoll::new(5, None).unwrap().total(), 5);
    }

    #[test]
    fn test_same_seed_produces_same_rolls() {
        let seed = DiceSeed::from(0x1234_5678_9abc_def0_u128);
        let mut a = Dice::with_seed(seed);
        let mut b = Dice::with_seed(seed);
        for _ in 0..50 {
            assert_eq!(a.roll(DiceCount::Two), b.roll(DiceCount::Two));
            assert_eq!(a.roll(DiceCount::One), b.roll(DiceCount::One));
        }
    }

    #[test]
    fn test_rolls_stay_in_range() {
        let mut dice = Dice::with_seed(DiceSeed::from(7));
        for _ in 0..200 {
            let roll = dice.roll(DiceCount::Two);
            assert!((1..=6).contains(&roll.first()));
            assert!((1..=6).contains(&roll.second().unwrap()));
            assert!((2..=12).contains(&roll.total()));
        }
    }

    #[test]
    fn test_queue_is_consumed_before_randomness() {
        let mut dice = Dice::with_seed(DiceSeed::from(1));
        dice.enqueue(roll2(3, 4));
        dice.enqueue(roll2(6, 6));
        assert_eq!(dice.roll(DiceCount::Two), roll2(3, 4));
        assert_eq!(dice.roll(DiceCount::Two), roll2(6, 6));
        assert_eq!(dice.queued().count(), 0);
    }

    #[test]
    fn test_queue_entry_must_match_requested_count() {
        let mut dice = Dice::with_seed(DiceSeed::from(2));
        dice.enqueue(roll2(2, 2));
        // A one-die request skips the queued two-die roll and leaves it queued.
        let single = dice.roll(DiceCount::One);
        assert!(single.second().is_none());
        assert_eq!(dice.queued().count(), 1);
        assert_eq!(dice.roll(DiceCount::Two), roll2(2, 2));
    }

    #[test]
    fn test_matching_entry_behind_mismatched_head_is_found() {
        let mut dice = Dice::with_seed(DiceSeed::from(3));
        dice.enqueue(roll2(5, 5));
        dice.enqueue(DiceRoll::new(4, None).unwrap());
        assert_eq!(dice.roll(DiceCount::One).total(), 4);
        assert_eq!(dice.roll(DiceCount::Two), roll2(5, 5));
    }

    #[test]
    fn test_seed_serialization_round_trip() {
        let seed = DiceSeed::from(0xfeed_beef_u128);
        let json = serde_json::to_string(&seed).unwrap();
        let back: DiceSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(seed, back);
    }
}
