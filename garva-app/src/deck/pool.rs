use super::card::DeckCard;
use crate::domain::Joke;
use garva_errors::AppError;
use rand::Rng;
use std::collections::VecDeque;

/// Jokes not yet drawn in the current shuffle cycle, head first.
pub type Pool = VecDeque<Joke>;

/// Fisher-Yates: walk from the last index down, swapping with a uniform index at or below it.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

/// Draws the next card, reseeding the pool from `candidates` once it runs dry.
pub fn draw<R: Rng + ?Sized>(
    pool: Pool,
    candidates: &[Joke],
    rng: &mut R,
) -> Result<(DeckCard, Pool), AppError> {
    if candidates.is_empty() {
        return Err(AppError::EmptyCatalog);
    }

    let mut pool = if pool.is_empty() {
        tracing::debug!("Reshuffling {} jokes into the pool", candidates.len());
        Pool::from(shuffle(candidates, rng))
    } else {
        pool
    };

    let joke = pool.pop_front().ok_or(AppError::EmptyCatalog)?;
    Ok((DeckCard::new(joke, rng), pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn jokes(ids: &[i32]) -> Vec<Joke> {
        ids.iter().map(|&id| Joke::new(id, format!("joke {id}"))).collect()
    }

    #[test]
    fn test_draw_fails_on_empty_catalog() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = draw(Pool::new(), &[], &mut rng);
        assert_eq!(result.unwrap_err(), AppError::EmptyCatalog);
    }

    #[test]
    fn test_draw_pops_head_of_pool() {
        let mut rng = StdRng::seed_from_u64(0);
        let candidates = jokes(&[1, 2, 3]);
        let pool = Pool::from(jokes(&[3, 1]));

        let (card, pool) = draw(pool, &candidates, &mut rng).unwrap();
        assert_eq!(card.joke_id(), 3);
        assert_eq!(pool.iter().map(|j| j.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_draw_reseeds_empty_pool_with_every_candidate() {
        let mut rng = StdRng::seed_from_u64(3);
        let candidates = jokes(&[1, 2, 3, 4]);

        let (card, pool) = draw(Pool::new(), &candidates, &mut rng).unwrap();
        let mut seen: Vec<i32> = pool.iter().map(|j| j.id).collect();
        seen.push(card.joke_id());
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_shuffle_keeps_every_item() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut shuffled = shuffle(&[5, 6, 7, 8, 9], &mut rng);
        shuffled.sort_unstable();
        assert_eq!(shuffled, vec![5, 6, 7, 8, 9]);
        assert!(shuffle::<i32, _>(&[], &mut rng).is_empty());
    }

    #[test]
    fn test_shuffle_is_uniform_over_permutations() {
        const TRIALS: usize = 60_000;
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();

        for _ in 0..TRIALS {
            *counts.entry(shuffle(&[0u8, 1, 2], &mut rng)).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        let expected = TRIALS as f64 / 6.0;
        let chi_square: f64 = counts
            .values()
            .map(|&observed| (observed as f64 - expected).powi(2) / expected)
            .sum();
        // 5 degrees of freedom, p = 0.001
        assert!(chi_square < 20.52, "chi-square {chi_square} suggests positional bias");
    }

    #[test]
    fn test_reseeded_draws_have_no_positional_bias() {
        const TRIALS: usize = 40_000;
        let mut rng = StdRng::seed_from_u64(99);
        let candidates = jokes(&[1, 2, 3, 4]);
        let mut first_draws: HashMap<i32, usize> = HashMap::new();

        for _ in 0..TRIALS {
            let (card, _) = draw(Pool::new(), &candidates, &mut rng).unwrap();
            *first_draws.entry(card.joke_id()).or_default() += 1;
        }

        let expected = TRIALS as f64 / 4.0;
        let chi_square: f64 = first_draws
            .values()
            .map(|&observed| (observed as f64 - expected).powi(2) / expected)
            .sum();
        // 3 degrees of freedom, p = 0.001
        assert!(chi_square < 16.27, "chi-square {chi_square} suggests positional bias");
    }
}
