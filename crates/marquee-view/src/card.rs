#![forbid(unsafe_code)]

//! Film card view.

use crate::ControlType;
use crate::component::View;
use crate::humanize::{format_release_year, format_runtime};
use marquee_model::Film;
use marquee_render::{Document, NodeId, escape_text};
use std::cell::RefCell;
use std::rc::Rc;

/// Card descriptions are clipped to this many characters plus an ellipsis.
const DESCRIPTION_PREVIEW_LIMIT: usize = 140;

const ACTIVE_CLASS: &str = "film-card__controls-item--active";

fn control_class(active: bool) -> &'static str {
    if active { ACTIVE_CLASS } else { "" }
}

fn preview(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_PREVIEW_LIMIT {
        return description.to_owned();
    }
    let clipped: String = description.chars().take(DESCRIPTION_PREVIEW_LIMIT - 1).collect();
    format!("{clipped}…")
}

/// Card markup. Pure function of the film.
pub fn film_card_markup(film: &Film) -> String {
    format!(
        r#"<article class="film-card">
  <a class="film-card__link">
    <h3 class="film-card__title">{title}</h3>
    <p class="film-card__rating">{rating:.1}</p>
    <p class="film-card__info">
      <span class="film-card__year">{year}</span>
      <span class="film-card__duration">{runtime}</span>
      <span class="film-card__genre">{genre}</span>
    </p>
    <img src="{poster}" alt="" class="film-card__poster">
    <p class="film-card__description">{description}</p>
    <span class="film-card__comments">{comments} comments</span>
  </a>
  <div class="film-card__controls">
    <button class="film-card__controls-item film-card__controls-item--add-to-watchlist {watchlist}" type="button">Add to watchlist</button>
    <button class="film-card__controls-item film-card__controls-item--mark-as-watched {watched}" type="button">Mark as watched</button>
    <button class="film-card__controls-item film-card__controls-item--favorite {favourite}" type="button">Mark as favorite</button>
  </div>
</article>"#,
        title = escape_text(&film.title),
        rating = film.rating,
        year = format_release_year(film.release),
        runtime = format_runtime(film.runtime_minutes),
        genre = film.genres.first().map(String::as_str).unwrap_or(""),
        poster = film.poster,
        description = escape_text(&preview(&film.description)),
        comments = film.comments_number,
        watchlist = control_class(film.in_watchlist()),
        watched = control_class(film.is_watched()),
        favourite = control_class(film.is_favourite()),
    )
}

/// One film card: markup node plus the open/toggle callbacks.
pub struct FilmCardView {
    node: NodeId,
    film: Film,
    on_open: RefCell<Option<Rc<dyn Fn()>>>,
    on_toggle: RefCell<Option<Rc<dyn Fn(ControlType)>>>,
}

impl FilmCardView {
    pub fn new(doc: &Rc<Document>, film: Film) -> Rc<Self> {
        let node = doc.create(film_card_markup(&film));
        Rc::new(Self {
            node,
            film,
            on_open: RefCell::new(None),
            on_toggle: RefCell::new(None),
        })
    }

    pub fn film(&self) -> &Film {
        &self.film
    }

    pub fn set_open_handler(&self, handler: Rc<dyn Fn()>) {
        *self.on_open.borrow_mut() = Some(handler);
    }

    pub fn set_toggle_handler(&self, handler: Rc<dyn Fn(ControlType)>) {
        *self.on_toggle.borrow_mut() = Some(handler);
    }

    /// Simulated click on the card body (opens the popup).
    pub fn click_open(&self) {
        let handler = self.on_open.borrow().clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    /// Simulated click on one of the three flag controls.
    pub fn click_control(&self, control: ControlType) {
        let handler = self.on_toggle.borrow().clone();
        if let Some(handler) = handler {
            handler(control);
        }
    }
}

impl View for FilmCardView {
    fn node(&self) -> NodeId {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_model::{FilmFlags, FilmId, mock};
    use std::cell::Cell;

    fn film() -> Film {
        let mut rng = mock::SeededRng::new(14);
        mock::generate_film(&mut rng, FilmId(0))
    }

    #[test]
    fn markup_marks_active_controls() {
        let mut film = film();
        film.flags = FilmFlags::WATCHED;
        let markup = film_card_markup(&film);

        let active = markup.matches(ACTIVE_CLASS).count();
        assert_eq!(active, 1);
        assert!(markup.contains(&format!("{} comments", film.comments_number)));
    }

    #[test]
    fn long_descriptions_are_clipped() {
        let mut film = film();
        film.description = "x".repeat(300);
        let markup = film_card_markup(&film);
        assert!(markup.contains('…'));
        assert!(!markup.contains(&"x".repeat(141)));
    }

    #[test]
    fn clicks_reach_handlers() {
        let doc = Document::new();
        let card = FilmCardView::new(&doc, film());
        let opened = Rc::new(Cell::new(false));
        let toggled = Rc::new(Cell::new(None));

        let flag = Rc::clone(&opened);
        card.set_open_handler(Rc::new(move || flag.set(true)));
        let slot = Rc::clone(&toggled);
        card.set_toggle_handler(Rc::new(move |control| slot.set(Some(control))));

        card.click_open();
        card.click_control(ControlType::Favourite);

        assert!(opened.get());
        assert_eq!(toggled.get(), Some(ControlType::Favourite));
    }
}
