#![forbid(unsafe_code)]

//! Scripted walkthrough of the board.
//!
//! Wires mock data into the models, mounts a board, and drives a short
//! session: pagination, a popup with a lazy comment load, a saved comment
//! (with one scripted failure first), and a filter switch. The node tree is
//! dumped between steps; set `RUST_LOG=debug` for the presenter-level log.

use chrono::Utc;
use marquee::prelude::*;
use marquee::{Emoji, PAGE_SIZE, Position, SHAKE_DURATION, mock};
use std::time::{Duration, Instant};
use tracing::info;

const FILM_COUNT: u32 = 23;
const SEED: u64 = 42;
const LATENCY: Duration = Duration::from_millis(300);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut rng = mock::SeededRng::new(SEED);
    let (films, fixtures) = mock::generate_board(&mut rng, FILM_COUNT);
    info!(films = films.len(), "mock catalog generated");

    let doc = Document::new();
    let container = doc.create(r#"<main class="main"></main>"#);
    doc.insert(doc.body(), container, Position::BeforeEnd);

    let films_model = FilmsModel::new(films);
    let comments_model = CommentsModel::new();
    let filter_model = FilterModel::new();
    let service = CommentService::with_latency(fixtures, LATENCY);
    service.set_wall_clock(Utc::now());

    let start = Instant::now();
    let board = BoardPresenter::new(
        &doc,
        container,
        &films_model,
        &comments_model,
        &filter_model,
        &service,
        start,
    );
    board.init();

    info!(
        rendered = board.presenter_count(),
        page = PAGE_SIZE,
        "board mounted"
    );
    println!("--- initial board ---\n{}", doc.render_tree(doc.body()));

    // Reveal a second page.
    if let Some(show_more) = board.show_more_view() {
        show_more.click();
        info!(rendered = board.presenter_count(), "second page revealed");
    }

    // Open the first card's popup; the comment load resolves on the next
    // tick past the latency.
    let first = board.films()[0].id;
    let presenter = board.presenter(first).expect("first film is rendered");
    presenter.card_view().expect("card is built").click_open();
    board.tick(start + LATENCY);
    info!(
        film = first.0,
        comments = presenter
            .detail_view()
            .map(|detail| detail.comment_count())
            .unwrap_or(0),
        "popup open, comments loaded"
    );

    // One scripted failure: the save shakes and re-enables with the draft
    // intact, then the retry lands.
    service.fail_next(1);
    let detail = presenter.detail_view().expect("popup is open");
    detail.input_text("Interesting setting and a good cast");
    detail.choose_emoji(Emoji::Smile);
    detail.submit();
    let failed_at = start + LATENCY * 2;
    board.tick(failed_at);
    info!("save rejected, shaking");
    board.tick(failed_at + SHAKE_DURATION);

    let detail = board
        .presenter(first)
        .and_then(|presenter| presenter.detail_view())
        .expect("popup survived the abort");
    detail.submit();
    board.tick(failed_at + SHAKE_DURATION + LATENCY);
    info!(
        count = films_model.get(first).map(|film| film.comments_number),
        "comment saved on retry"
    );

    // Switch the menu-level filter: a structural reset.
    filter_model.set_filter(UpdateType::Major, FilterType::Watched);
    info!(
        rendered = board.presenter_count(),
        sort = ?board.current_sort(),
        "filtered to watched"
    );

    println!("--- watched films ---\n{}", doc.render_tree(doc.body()));
}
