use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies one of the two sides of a match.
///
/// The names are historical: either side may in fact be driven by a person
/// or by the move-selection policy. Behavioral differences live entirely in
/// whoever supplies the next move.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum PlayerId {
    Human,
    Computer,
}

impl PlayerId {
    pub const BOTH: [Self; 2] = [Self::Human, Self::Computer];

    /// Returns the other side.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Self::Human => Self::Computer,
            Self::Computer => Self::Human,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown player name: {_0}")]
pub struct ParsePlayerIdError(#[error(not(source))] pub String);

impl FromStr for PlayerId {
    type Err = ParsePlayerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "computer" => Ok(Self::Computer),
            _ => Err(ParsePlayerIdError(s.to_owned())),
        }
    }
}

/// A pair of values indexed by [`PlayerId`], one slot per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    human: T,
    computer: T,
}

impl<T> PlayerPair<T> {
    pub fn new(human: T, computer: T) -> Self {
        Self { human, computer }
    }

    #[must_use]
    pub fn get(&self, id: PlayerId) -> &T {
        match id {
            PlayerId::Human => &self.human,
            PlayerId::Computer => &self.computer,
        }
    }

    pub fn get_mut(&mut self, id: PlayerId) -> &mut T {
        match id {
            PlayerId::Human => &mut self.human,
            PlayerId::Computer => &mut self.computer,
        }
    }
}

impl<T> std::ops::Index<PlayerId> for PlayerPair<T> {
    type Output = T;

    fn index(&self, id: PlayerId) -> &T {
        self.get(id)
    }
}

impl<T> std::ops::IndexMut<PlayerId> for PlayerPair<T> {
    fn index_mut(&mut self, id: PlayerId) -> &mut T {
        self.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involutive() {
        for id in PlayerId::BOTH {
            assert_eq!(id.opponent().opponent(), id);
            assert_ne!(id.opponent(), id);
        }
    }

    #[test]
    fn test_parse_player_id() {
        assert_eq!("Human".parse::<PlayerId>().unwrap(), PlayerId::Human);
        assert_eq!("COMPUTER".parse::<PlayerId>().unwrap(), PlayerId::Computer);
        assert_eq!("computer".parse::<PlayerId>().unwrap(), PlayerId::Computer);
        assert!("nobody".parse::<PlayerId>().is_err());
    }

    #[test]
    fn test_pair_indexing() {
        let mut pair = PlayerPair::new(1, 2);
        assert_eq!(pair[PlayerId::Human], 1);
        assert_eq!(pair[PlayerId::Computer], 2);
        pair[PlayerId::Computer] += 10;
        assert_eq!(pair[PlayerId::Computer], 12);
    }
}
