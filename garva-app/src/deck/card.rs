use crate::domain::{Joke, VoteCounts};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channels stay at or below this so white text remains readable.
const MAX_CHANNEL: u8 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl CardColor {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.gen_range(0..=MAX_CHANNEL),
            g: rng.gen_range(0..=MAX_CHANNEL),
            b: rng.gen_range(0..=MAX_CHANNEL),
        }
    }
}

impl fmt::Display for CardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// One presentation of a joke in the deck. The key and color are fixed for the
/// card's lifetime; drawing the same joke again yields a different card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCard {
    pub joke: Joke,
    pub key: uuid::Uuid,
    pub color: CardColor,
}

impl DeckCard {
    pub fn new<R: Rng + ?Sized>(joke: Joke, rng: &mut R) -> Self {
        Self {
            joke,
            key: uuid::Builder::from_random_bytes(rng.gen()).into_uuid(),
            color: CardColor::random(rng),
        }
    }

    pub fn joke_id(&self) -> i32 {
        self.joke.id
    }

    pub fn counts(&self) -> VoteCounts {
        VoteCounts::new(self.joke.upvotes, self.joke.downvotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_colors_stay_dark_enough() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let color = CardColor::random(&mut rng);
            assert!(color.r <= MAX_CHANNEL && color.g <= MAX_CHANNEL && color.b <= MAX_CHANNEL);
        }
        assert_eq!(CardColor { r: 1, g: 20, b: 180 }.to_string(), "rgb(1, 20, 180)");
    }

    #[test]
    fn test_same_joke_gets_distinct_cards() {
        let mut rng = StdRng::seed_from_u64(1);
        let joke = Joke::new(1, "Knock knock");
        let first = DeckCard::new(joke.clone(), &mut rng);
        let second = DeckCard::new(joke, &mut rng);
        assert_eq!(first.joke_id(), second.joke_id());
        assert_ne!(first.key, second.key);
    }
}
