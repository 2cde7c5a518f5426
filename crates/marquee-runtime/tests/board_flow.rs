#![forbid(unsafe_code)]

//! Board-level scenarios: pagination, filtering, sorting, patch routing.

use marquee_model::{
    CommentsModel, Film, FilmFlags, FilmId, FilmsModel, FilterModel, FilterType, SortType,
    UpdateType, mock,
};
use marquee_render::{Document, Position};
use marquee_runtime::{BoardPresenter, CommentService, PAGE_SIZE};
use marquee_view::{ControlType, View};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::Level;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

struct Rig {
    doc: Rc<Document>,
    films_model: Rc<FilmsModel>,
    filter_model: Rc<FilterModel>,
    board: Rc<BoardPresenter>,
}

fn rig_with_films(films: Vec<Film>) -> Rig {
    init_tracing();
    let doc = Document::new();
    let container = doc.create("<main class=\"main\">");
    doc.insert(doc.body(), container, Position::BeforeEnd);

    let films_model = FilmsModel::new(films);
    let comments_model = CommentsModel::new();
    let filter_model = FilterModel::new();
    let service = CommentService::with_latency(HashMap::new(), Duration::from_millis(300));
    let board = BoardPresenter::new(
        &doc,
        container,
        &films_model,
        &comments_model,
        &filter_model,
        &service,
        Instant::now(),
    );
    board.init();

    Rig {
        doc,
        films_model,
        filter_model,
        board,
    }
}

fn generated_films(count: u32, seed: u64) -> Vec<Film> {
    let mut rng = mock::SeededRng::new(seed);
    let (films, _) = mock::generate_board(&mut rng, count);
    films
}

#[test]
fn show_more_reveals_pages_until_exhausted() {
    let rig = rig_with_films(generated_films(25, 1));

    assert_eq!(rig.board.presenter_count(), 5);
    assert!(rig.board.is_show_more_rendered());

    rig.board.show_more_view().unwrap().click();
    assert_eq!(rig.board.presenter_count(), 10);
    assert!(rig.board.is_show_more_rendered());

    for _ in 0..3 {
        rig.board.show_more_view().unwrap().click();
    }
    assert_eq!(rig.board.presenter_count(), 25);
    assert!(!rig.board.is_show_more_rendered());
}

#[test]
fn rendered_count_never_exceeds_total() {
    let rig = rig_with_films(generated_films(13, 2));

    let mut seen = vec![rig.board.presenter_count()];
    while rig.board.is_show_more_rendered() {
        rig.board.show_more_view().unwrap().click();
        seen.push(rig.board.presenter_count());
    }

    assert!(seen.iter().all(|count| *count <= 13));
    assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(*seen.last().unwrap(), 13);
}

#[test]
fn empty_favourites_filter_shows_only_the_parameterized_empty_state() {
    let mut films = generated_films(10, 3);
    for film in &mut films {
        film.flags.remove(FilmFlags::FAVOURITE);
    }
    let rig = rig_with_films(films);

    rig.filter_model
        .set_filter(UpdateType::Major, FilterType::Favourites);

    assert_eq!(rig.board.presenter_count(), 0);
    assert_eq!(rig.board.empty_state_filter(), Some(FilterType::Favourites));
    assert!(rig.board.sort_view().is_none());
    assert!(!rig.board.is_show_more_rendered());
}

#[test]
fn every_rendered_card_satisfies_the_active_filter() {
    let rig = rig_with_films(generated_films(30, 4));
    rig.filter_model
        .set_filter(UpdateType::Major, FilterType::Watchlist);

    for film in rig.board.films() {
        assert!(film.in_watchlist());
    }
    for film in rig.board.films().iter().take(PAGE_SIZE) {
        assert!(rig.board.presenter(film.id).is_some());
    }
}

#[test]
fn double_toggle_round_trips_and_notifies_twice() {
    let rig = rig_with_films(generated_films(6, 5));
    let target = rig.board.films()[2].id;
    let original = rig.films_model.get(target).unwrap();

    let updates = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&updates);
    rig.films_model
        .add_observer(Rc::new(move |update, _film: &Film| {
            log.borrow_mut().push(update);
        }));

    for _ in 0..2 {
        rig.board
            .presenter(target)
            .unwrap()
            .card_view()
            .unwrap()
            .click_control(ControlType::Watched);
    }

    assert_eq!(rig.films_model.get(target).unwrap(), original);
    assert_eq!(*updates.borrow(), vec![UpdateType::Patch, UpdateType::Patch]);
}

#[test]
fn unfavouriting_under_the_favourites_filter_drops_the_card() {
    let mut films = generated_films(8, 6);
    for film in &mut films {
        film.flags.insert(FilmFlags::FAVOURITE);
    }
    let rig = rig_with_films(films);
    rig.filter_model
        .set_filter(UpdateType::Major, FilterType::Favourites);

    let target = rig.board.films()[0].id;
    rig.board
        .presenter(target)
        .unwrap()
        .card_view()
        .unwrap()
        .click_control(ControlType::Favourite);

    // Minor rebuild: the card is gone, pagination is preserved.
    assert!(rig.board.presenter(target).is_none());
    assert_eq!(rig.board.films().len(), 7);
    assert!(rig.board.presenter_count() <= PAGE_SIZE);
}

#[test]
fn date_sort_renders_newest_first() {
    let rig = rig_with_films(generated_films(12, 7));
    rig.board.sort_view().unwrap().click_sort(SortType::Date);

    let shown = rig.board.films();
    assert!(shown.windows(2).all(|pair| pair[0].release >= pair[1].release));
    assert_eq!(rig.board.current_sort(), SortType::Date);

    // Applying the same data again yields the same order.
    let again = rig.board.films();
    assert_eq!(shown, again);
}

proptest! {
    /// Whatever the catalog size, clicking "show more" until it disappears
    /// reveals exactly every film, page by page.
    #[test]
    fn pagination_eventually_covers_the_whole_catalog(count in 1u32..40, seed in 0u64..500) {
        let rig = rig_with_films(generated_films(count, seed));
        let total = count as usize;

        prop_assert_eq!(rig.board.presenter_count(), total.min(PAGE_SIZE));
        prop_assert_eq!(rig.board.is_show_more_rendered(), total > PAGE_SIZE);

        let mut clicks = 0usize;
        while rig.board.is_show_more_rendered() {
            rig.board.show_more_view().unwrap().click();
            clicks += 1;
            prop_assert!(rig.board.presenter_count() <= total);
        }

        prop_assert_eq!(rig.board.presenter_count(), total);
        prop_assert_eq!(clicks, total.saturating_sub(1) / PAGE_SIZE);
    }
}

#[test]
fn cards_track_the_derived_slice_exactly() {
    let rig = rig_with_films(generated_films(9, 8));
    rig.board.show_more_view().unwrap().click();

    let expected: Vec<FilmId> = rig.board.films().iter().map(|film| film.id).collect();
    assert_eq!(rig.board.presenter_count(), expected.len());
    for id in expected {
        assert!(rig.board.presenter(id).is_some());
    }

    // The list container's children are exactly the rendered cards, in
    // slice order.
    let card_nodes: Vec<_> = rig
        .board
        .films()
        .iter()
        .map(|film| {
            rig.board
                .presenter(film.id)
                .unwrap()
                .card_view()
                .unwrap()
                .node()
        })
        .collect();
    let container_children = rig.doc.children(
        rig.doc
            .parent(card_nodes[0])
            .expect("cards are mounted in the list container"),
    );
    assert_eq!(container_children, card_nodes);
}
