#![forbid(unsafe_code)]

//! Mock data factories.
//!
//! Pure given the RNG state: the same seed always produces the same board.
//! Used by the demo binary and by tests that need populated models.

use crate::comment::{Comment, CommentId, Emoji};
use crate::film::{Film, FilmFlags, FilmId};
use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::HashMap;

const TITLES: [&str; 7] = [
    "Made for Each Other",
    "Popeye the Sailor Meets Sindbad the Sailor",
    "Sagebrush Trail",
    "Santa Claus Conquers the Martians",
    "The Dance of Life",
    "The Great Flamarion",
    "The Man with the Golden Arm",
];

const POSTERS: [&str; 7] = [
    "made-for-each-other.png",
    "popeye-meets-sinbad.png",
    "sagebrush-trail.jpg",
    "santa-claus-conquers-the-martians.jpg",
    "the-dance-of-life.jpg",
    "the-great-flamarion.jpg",
    "the-man-with-the-golden-arm.jpg",
];

const GENRES: [&str; 6] = ["Drama", "Film-Noir", "Mystery", "Comedy", "Western", "Musical"];

const SENTENCES: [&str; 8] = [
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit.",
    "Cras aliquet varius magna, non porta ligula feugiat eget.",
    "Fusce tristique felis at fermentum pharetra.",
    "Aliquam id orci ut lectus varius viverra.",
    "Nullam nunc ex, convallis sed finibus eget, sollicitudin eget ante.",
    "Phasellus eros mauris, condimentum sed nibh vitae, sodales efficitur ipsum.",
    "Aliquam erat volutpat.",
    "In rutrum ac purus sit amet tempus.",
];

const PEOPLE: [&str; 8] = [
    "Anthony Mann",
    "Anne Wigton",
    "Heinz Herald",
    "Richard Weil",
    "Erich von Stroheim",
    "Mary Beth Hughes",
    "Dan Duryea",
    "Tim Macoveev",
];

const COUNTRIES: [&str; 5] = ["USA", "Italy", "France", "Germany", "Finland"];

const COMMENT_TEXTS: [&str; 4] = [
    "Interesting setting and a good cast",
    "Booooooooooring",
    "Very very old. Meh",
    "Almost two hours? Seriously?",
];

const AGE_RATINGS: [u8; 5] = [0, 6, 12, 16, 18];

/// Deterministic generator for mock data.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    pub fn next_range(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        min + (self.next_u64() % (max - min))
    }

    pub fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[self.next_range(0, options.len() as u64) as usize]
    }

    fn pick_several(&mut self, options: &[&str], min: u64, max: u64) -> Vec<String> {
        let count = self.next_range(min, max + 1) as usize;
        (0..count).map(|_| self.pick(options).to_owned()).collect()
    }
}

/// Build one film. `comments_number` starts at zero; [`generate_board`]
/// fills it in to match the generated comments.
pub fn generate_film(rng: &mut SeededRng, id: FilmId) -> Film {
    let pick = rng.next_range(0, TITLES.len() as u64) as usize;

    let mut flags = FilmFlags::empty();
    for flag in [FilmFlags::WATCHLIST, FilmFlags::WATCHED, FilmFlags::FAVOURITE] {
        if rng.next_bool() {
            flags.insert(flag);
        }
    }

    let year = rng.next_range(1920, 2000) as i32;
    let month = rng.next_range(1, 13) as u32;
    let day = rng.next_range(1, 29) as u32;

    Film {
        id,
        title: TITLES[pick].to_owned(),
        original_title: TITLES[pick].to_owned(),
        poster: format!("./images/posters/{}", POSTERS[pick]),
        rating: rng.next_range(10, 100) as f32 / 10.0,
        release: NaiveDate::from_ymd_opt(year, month, day).expect("generated date in range"),
        runtime_minutes: rng.next_range(45, 180) as u32,
        genres: rng.pick_several(&GENRES, 1, 3),
        description: rng.pick_several(&SENTENCES, 1, 5).join(" "),
        director: rng.pick(&PEOPLE).to_owned(),
        writers: rng.pick_several(&PEOPLE, 1, 3),
        actors: rng.pick_several(&PEOPLE, 2, 4),
        country: rng.pick(&COUNTRIES).to_owned(),
        age_rating: AGE_RATINGS[rng.next_range(0, AGE_RATINGS.len() as u64) as usize],
        flags,
        comments_number: 0,
    }
}

/// Build one comment for a film.
pub fn generate_comment(rng: &mut SeededRng, film_id: FilmId, id: CommentId) -> Comment {
    let emoji = Emoji::ALL[rng.next_range(0, Emoji::ALL.len() as u64) as usize];
    let year = 2021;
    let month = rng.next_range(1, 13) as u32;
    let day = rng.next_range(1, 29) as u32;
    let hour = rng.next_range(0, 24) as u32;
    let minute = rng.next_range(0, 60) as u32;

    Comment {
        id,
        film_id,
        text: rng.pick(&COMMENT_TEXTS).to_owned(),
        emoji,
        author: rng.pick(&PEOPLE).to_owned(),
        date: Utc
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .expect("generated timestamp in range"),
    }
}

/// Build a whole board: films with consistent denormalized comment counts,
/// plus the comment fixtures the comment service serves on load.
pub fn generate_board(
    rng: &mut SeededRng,
    film_count: u32,
) -> (Vec<Film>, HashMap<FilmId, Vec<Comment>>) {
    let mut films = Vec::with_capacity(film_count as usize);
    let mut fixtures = HashMap::new();
    let mut next_comment_id = 0u32;

    for n in 0..film_count {
        let film_id = FilmId(n);
        let mut film = generate_film(rng, film_id);

        let comment_count = rng.next_range(0, 6) as u32;
        let comments: Vec<Comment> = (0..comment_count)
            .map(|_| {
                let comment = generate_comment(rng, film_id, CommentId(next_comment_id));
                next_comment_id += 1;
                comment
            })
            .collect();

        film.comments_number = comments.len() as u32;
        films.push(film);
        fixtures.insert(film_id, comments);
    }

    (films, fixtures)
}
