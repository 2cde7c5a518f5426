#![forbid(unsafe_code)]

//! Sort orderings for the board.

use crate::film::Film;
use std::cmp::Ordering;

/// Active sort order. Held by the board presenter, not by a shared model;
/// resets to `Default` on major updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortType {
    /// Model order, no reordering.
    #[default]
    Default,
    /// Release date, newest first.
    Date,
    /// Rating, highest first.
    Rate,
}

impl SortType {
    /// Comparator for this order; `Default` compares everything equal so a
    /// stable sort leaves model order intact.
    pub fn compare(self, a: &Film, b: &Film) -> Ordering {
        match self {
            Self::Default => Ordering::Equal,
            Self::Date => b.release.cmp(&a.release),
            Self::Rate => b.rating.total_cmp(&a.rating),
        }
    }

    /// Sort a slice in place (stable).
    pub fn apply(self, films: &mut [Film]) {
        if self != Self::Default {
            films.sort_by(|a, b| self.compare(a, b));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::film::FilmId;
    use crate::mock;
    use proptest::prelude::*;

    fn films(seed: u64, count: u32) -> Vec<Film> {
        let mut rng = mock::SeededRng::new(seed);
        (0..count)
            .map(|n| mock::generate_film(&mut rng, FilmId(n)))
            .collect()
    }

    #[test]
    fn date_sorts_newest_first() {
        let mut films = films(8, 12);
        SortType::Date.apply(&mut films);
        assert!(films.windows(2).all(|pair| pair[0].release >= pair[1].release));
    }

    #[test]
    fn rate_sorts_highest_first() {
        let mut films = films(8, 12);
        SortType::Rate.apply(&mut films);
        assert!(films.windows(2).all(|pair| pair[0].rating >= pair[1].rating));
    }

    #[test]
    fn default_keeps_model_order() {
        let original = films(8, 12);
        let mut sorted = original.clone();
        SortType::Default.apply(&mut sorted);
        assert_eq!(sorted, original);
    }

    proptest! {
        /// Re-applying any sort to an already sorted list is a no-op.
        #[test]
        fn sorting_is_idempotent(seed in 0u64..5_000, count in 0u32..40) {
            for sort in [SortType::Default, SortType::Date, SortType::Rate] {
                let mut once = films(seed, count);
                sort.apply(&mut once);
                let mut twice = once.clone();
                sort.apply(&mut twice);
                prop_assert_eq!(&once, &twice);
            }
        }
    }
}
