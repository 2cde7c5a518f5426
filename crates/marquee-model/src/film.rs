#![forbid(unsafe_code)]

//! Film entity.

use bitflags::bitflags;
use chrono::NaiveDate;

/// Identity of a film for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilmId(pub u32);

bitflags! {
    /// The three independently toggleable membership flags of a film.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FilmFlags: u8 {
        const WATCHLIST = 1 << 0;
        const WATCHED   = 1 << 1;
        const FAVOURITE = 1 << 2;
    }
}

impl Default for FilmFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// A film as held by [`FilmsModel`](crate::FilmsModel).
///
/// Presenters read films and never write their fields directly; every write
/// funnels through the model so observers see a consistent sequence of
/// states.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Film {
    pub id: FilmId,
    pub title: String,
    pub original_title: String,
    pub poster: String,
    pub rating: f32,
    pub release: NaiveDate,
    pub runtime_minutes: u32,
    pub genres: Vec<String>,
    pub description: String,
    pub director: String,
    pub writers: Vec<String>,
    pub actors: Vec<String>,
    pub country: String,
    pub age_rating: u8,
    pub flags: FilmFlags,
    /// Denormalized comment count, kept in step by the comment mutation flow.
    pub comments_number: u32,
}

impl Film {
    pub fn in_watchlist(&self) -> bool {
        self.flags.contains(FilmFlags::WATCHLIST)
    }

    pub fn is_watched(&self) -> bool {
        self.flags.contains(FilmFlags::WATCHED)
    }

    pub fn is_favourite(&self) -> bool {
        self.flags.contains(FilmFlags::FAVOURITE)
    }

    /// Copy of this film with exactly one flag inverted.
    ///
    /// The other two flags keep their value; callers hand the copy to
    /// [`FilmsModel::update_film`](crate::FilmsModel::update_film).
    #[must_use]
    pub fn with_flag_toggled(&self, flag: FilmFlags) -> Self {
        let mut film = self.clone();
        film.flags.toggle(flag);
        film
    }

    /// Copy of this film with a different denormalized comment count.
    #[must_use]
    pub fn with_comments_number(&self, comments_number: u32) -> Self {
        let mut film = self.clone();
        film.comments_number = comments_number;
        film
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;

    fn sample() -> Film {
        let mut rng = mock::SeededRng::new(11);
        mock::generate_film(&mut rng, FilmId(1))
    }

    #[test]
    fn toggle_inverts_exactly_one_flag() {
        let film = sample();
        let toggled = film.with_flag_toggled(FilmFlags::WATCHED);

        assert_eq!(toggled.is_watched(), !film.is_watched());
        assert_eq!(toggled.in_watchlist(), film.in_watchlist());
        assert_eq!(toggled.is_favourite(), film.is_favourite());
    }

    #[test]
    fn toggle_round_trips() {
        let film = sample();
        let back = film
            .with_flag_toggled(FilmFlags::FAVOURITE)
            .with_flag_toggled(FilmFlags::FAVOURITE);
        assert_eq!(back, film);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let film = sample();
        let json = serde_json::to_string(&film).unwrap();
        let parsed: Film = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, film);
    }
}
