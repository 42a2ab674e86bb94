use super::card::DeckCard;
use super::pool::{draw, shuffle, Pool};
use crate::domain::{Joke, VoteCounts};
use garva_errors::AppError;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(&self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// Which cards exist around the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub has_previous: bool,
    pub has_next: bool,
}

/// The drawn cards and the cursor over them.
///
/// The timeline only ever grows, so swiping back shows the exact card that was
/// shown before. One card past the cursor is always kept drawn so the backdrop
/// has something to render.
#[derive(Debug, Clone)]
pub struct Deck {
    candidates: Vec<Joke>,
    timeline: Vec<DeckCard>,
    pool: Pool,
    position: usize,
    last_direction: Direction,
}

impl Deck {
    pub fn new<R: Rng + ?Sized>(candidates: Vec<Joke>, rng: &mut R) -> Result<Self, AppError> {
        if candidates.is_empty() {
            return Err(AppError::EmptyCatalog);
        }

        let shuffled = Pool::from(shuffle(&candidates, rng));
        let (first, pool) = draw(shuffled, &candidates, rng)?;
        let (second, pool) = draw(pool, &candidates, rng)?;

        Ok(Self {
            candidates,
            timeline: vec![first, second],
            pool,
            position: 0,
            last_direction: Direction::Forward,
        })
    }

    /// Draws until one card past the cursor exists. A second call without
    /// moving the cursor draws nothing.
    pub fn ensure_buffered<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        while self.timeline.len() < self.position + 2 {
            let pool = std::mem::take(&mut self.pool);
            let Ok((card, pool)) = draw(pool, &self.candidates, rng) else {
                break;
            };
            self.timeline.push(card);
            self.pool = pool;
        }
    }

    /// Moves the cursor one card forward. Returns false when there is no current card.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.current().is_none() {
            return false;
        }

        self.ensure_buffered(rng);
        self.position = (self.position + 1).min(self.timeline.len() - 1);
        self.last_direction = Direction::Forward;
        self.ensure_buffered(rng);
        true
    }

    /// Moves the cursor one card back. Returns false at the first card.
    pub fn retreat(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }

        self.position -= 1;
        self.last_direction = Direction::Backward;
        true
    }

    pub fn current(&self) -> Option<&DeckCard> {
        self.timeline.get(self.position)
    }

    pub fn next(&self) -> Option<&DeckCard> {
        self.timeline.get(self.position + 1)
    }

    pub fn previous(&self) -> Option<&DeckCard> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.timeline.get(index))
    }

    /// Card rendered behind the current one while the user drags.
    pub fn backdrop(&self, peek: Direction) -> Option<&DeckCard> {
        let preferred = match peek {
            Direction::Backward => self.previous(),
            Direction::Forward => self.next(),
        };
        preferred.or_else(|| self.next()).or_else(|| self.previous())
    }

    pub fn neighbors(&self) -> Neighbors {
        Neighbors {
            has_previous: self.previous().is_some(),
            has_next: self.next().is_some(),
        }
    }

    /// Overwrites the counters of this joke everywhere: drawn cards, the pool,
    /// and the candidates later reshuffles draw from.
    pub fn apply_counts(&mut self, joke_id: i32, counts: VoteCounts) {
        let jokes = self
            .timeline
            .iter_mut()
            .map(|card| &mut card.joke)
            .chain(self.pool.iter_mut())
            .chain(self.candidates.iter_mut());
        for joke in jokes.filter(|j| j.id == joke_id) {
            joke.upvotes = counts.upvotes;
            joke.downvotes = counts.downvotes;
        }
    }

    /// Counters currently shown for a joke, if it has been drawn.
    pub fn counts(&self, joke_id: i32) -> Option<VoteCounts> {
        self.timeline
            .iter()
            .find(|c| c.joke_id() == joke_id)
            .map(DeckCard::counts)
    }

    pub fn cards(&self) -> &[DeckCard] {
        &self.timeline
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn last_direction(&self) -> Direction {
        self.last_direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn jokes(ids: &[i32]) -> Vec<Joke> {
        ids.iter()
            .map(|&id| Joke::new(id, format!("joke {id}")).with_counts(5, 1))
            .collect()
    }

    fn ids(cards: &[DeckCard]) -> Vec<i32> {
        cards.iter().map(DeckCard::joke_id).collect()
    }

    #[test]
    fn test_empty_catalog() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(Deck::new(Vec::new(), &mut rng).unwrap_err(), AppError::EmptyCatalog);
    }

    #[test]
    fn test_new_deck_draws_two_cards() {
        let mut rng = StdRng::seed_from_u64(1);
        let deck = Deck::new(jokes(&[1, 2, 3]), &mut rng).unwrap();

        assert_eq!(deck.cards().len(), 2);
        assert_eq!(deck.position(), 0);
        assert_eq!(deck.pool().len(), 1);
        assert_eq!(deck.last_direction(), Direction::Forward);
        let drawn: HashSet<i32> = ids(deck.cards()).into_iter().collect();
        assert_eq!(drawn.len(), 2);
        assert!(!drawn.contains(&deck.pool()[0].id));
    }

    #[test]
    fn test_single_joke_catalog_repeats_it() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut deck = Deck::new(jokes(&[7]), &mut rng).unwrap();
        assert_eq!(ids(deck.cards()), vec![7, 7]);
        assert_ne!(deck.cards()[0].key, deck.cards()[1].key);

        assert!(deck.advance(&mut rng));
        assert_eq!(ids(deck.cards()), vec![7, 7, 7]);
    }

    #[test]
    fn test_advance_three_times_reshuffles_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut deck = Deck::new(jokes(&[1, 2, 3]), &mut rng).unwrap();

        for _ in 0..3 {
            assert!(deck.advance(&mut rng));
        }

        assert_eq!(deck.position(), 3);
        assert!(deck.cards().len() >= 5);

        let first_cycle: HashSet<i32> = ids(&deck.cards()[..3]).into_iter().collect();
        assert_eq!(first_cycle, HashSet::from([1, 2, 3]));

        // Cards 3 and 4 come from the second shuffle, whose last joke is still pooled.
        let second_cycle = ids(&deck.cards()[3..5]);
        assert_ne!(second_cycle[0], second_cycle[1]);
        assert_eq!(deck.pool().len(), 1);
        assert!(!second_cycle.contains(&deck.pool()[0].id));
    }

    #[test]
    fn test_buffer_invariant_holds_while_advancing() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut deck = Deck::new(jokes(&[1, 2, 3, 4, 5]), &mut rng).unwrap();

        for _ in 0..50 {
            deck.advance(&mut rng);
            assert!(deck.cards().len() >= deck.position() + 2);
            assert!(deck.next().is_some());
        }
    }

    #[test]
    fn test_ensure_buffered_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut deck = Deck::new(jokes(&[1, 2, 3]), &mut rng).unwrap();
        deck.advance(&mut rng);

        deck.ensure_buffered(&mut rng);
        let keys: Vec<_> = deck.cards().iter().map(|c| c.key).collect();
        let pool_len = deck.pool().len();

        deck.ensure_buffered(&mut rng);
        let again: Vec<_> = deck.cards().iter().map(|c| c.key).collect();
        assert_eq!(keys, again);
        assert_eq!(pool_len, deck.pool().len());
    }

    #[test]
    fn test_retreat_at_start_is_noop() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut deck = Deck::new(jokes(&[1, 2]), &mut rng).unwrap();

        assert!(!deck.retreat());
        assert_eq!(deck.position(), 0);
        assert_eq!(deck.last_direction(), Direction::Forward);
        assert!(deck.previous().is_none());
    }

    #[test]
    fn test_advance_then_retreat_returns_same_card() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut deck = Deck::new(jokes(&[1, 2, 3, 4]), &mut rng).unwrap();
        deck.advance(&mut rng);
        deck.advance(&mut rng);

        let position = deck.position();
        let key = deck.current().map(|c| c.key);
        let drawn = deck.cards().len();

        deck.advance(&mut rng);
        assert!(deck.retreat());

        assert_eq!(deck.position(), position);
        assert_eq!(deck.current().map(|c| c.key), key);
        assert_eq!(deck.last_direction(), Direction::Backward);
        assert!(deck.cards().len() >= drawn);
    }

    #[test]
    fn test_backdrop_follows_peek_direction() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut deck = Deck::new(jokes(&[1, 2, 3]), &mut rng).unwrap();

        // No previous card yet, so a backward peek falls back to the next one.
        assert_eq!(deck.backdrop(Direction::Backward).map(|c| c.key), deck.next().map(|c| c.key));

        deck.advance(&mut rng);
        assert_eq!(
            deck.backdrop(Direction::Backward).map(|c| c.key),
            deck.previous().map(|c| c.key)
        );
        assert_eq!(deck.backdrop(Direction::Forward).map(|c| c.key), deck.next().map(|c| c.key));
        assert_eq!(
            deck.neighbors(),
            Neighbors {
                has_previous: true,
                has_next: true
            }
        );
    }

    #[test]
    fn test_apply_counts_updates_every_copy() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut deck = Deck::new(jokes(&[42]), &mut rng).unwrap();
        deck.advance(&mut rng);

        deck.apply_counts(42, VoteCounts::new(9, 3));
        assert!(deck.cards().iter().all(|c| c.counts() == VoteCounts::new(9, 3)));
        assert_eq!(deck.counts(42), Some(VoteCounts::new(9, 3)));

        // Cards drawn after the update carry the new counts too.
        for _ in 0..3 {
            deck.advance(&mut rng);
        }
        assert!(deck.cards().iter().all(|c| c.counts() == VoteCounts::new(9, 3)));

        deck.apply_counts(1, VoteCounts::new(0, 0));
        assert!(deck.cards().iter().all(|c| c.counts() == VoteCounts::new(9, 3)));
    }
}
