#![forbid(unsafe_code)]

//! Detail popup view.
//!
//! The heaviest view in the system: film info, the comment list, and the
//! new-comment form with its optimistic disabled/saving/deleting states.
//! Re-rendering rewrites the node's markup in place, so scroll offset and
//! registered callbacks survive every refresh.
//!
//! The draft (text + chosen reaction) lives here while the popup is open.
//! It survives a failed save and is discarded only by [`DetailView::reset`]
//! (the Escape path) or a successful submit.

use crate::ControlType;
use crate::component::View;
use crate::humanize::{format_comment_date, format_release_detailed, format_runtime};
use marquee_model::{Comment, CommentDraft, CommentId, Emoji, Film};
use marquee_render::{Document, NodeId, escape_text};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Which element a failed action shakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShakeTarget {
    /// The whole new-comment block (failed add).
    NewCommentForm,
    /// One comment row (failed delete).
    CommentRow(CommentId),
}

/// A comment action raised by the popup.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentAction {
    Add(CommentDraft),
    Delete(CommentId),
}

/// Optimistic form state rendered into the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetailFormState {
    /// Every control in the form is disabled.
    pub disabled: bool,
    /// The new-comment block is labeled as saving.
    pub saving: bool,
    /// This comment row is labeled "Deleting…".
    pub deleting: Option<CommentId>,
}

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled { "disabled" } else { "" }
}

fn shake_class(shaking: bool) -> &'static str {
    if shaking { " shake" } else { "" }
}

/// One comment row. Pure function of its data and the form state.
pub fn comment_markup(
    comment: &Comment,
    form: &DetailFormState,
    shaking: Option<ShakeTarget>,
) -> String {
    let deleting = form.deleting == Some(comment.id);
    let row_shakes = shaking == Some(ShakeTarget::CommentRow(comment.id));
    format!(
        r#"<li class="film-details__comment{shake}" data-comment-id="{id}">
  <span class="film-details__comment-emoji">
    <img src="./images/emoji/{emoji}.png" width="55" height="55" alt="emoji-{emoji}">
  </span>
  <div>
    <p class="film-details__comment-text">{text}</p>
    <p class="film-details__comment-info">
      <span class="film-details__comment-author">{author}</span>
      <span class="film-details__comment-day">{day}</span>
      <button class="film-details__comment-delete" type="button" {disabled}>{label}</button>
    </p>
  </div>
</li>"#,
        shake = shake_class(row_shakes),
        id = comment.id.0,
        emoji = comment.emoji.as_str(),
        text = escape_text(&comment.text),
        author = escape_text(&comment.author),
        day = format_comment_date(comment.date),
        disabled = disabled_attr(form.disabled),
        label = if deleting { "Deleting…" } else { "Delete" },
    )
}

fn chosen_emoji_markup(draft: &CommentDraft) -> String {
    match draft.emoji {
        None => String::new(),
        Some(emoji) => format!(
            r#"<img src="./images/emoji/{name}.png" width="70" height="70" alt="emoji-{name}">"#,
            name = emoji.as_str()
        ),
    }
}

fn emoji_list_markup(draft: &CommentDraft, form: &DetailFormState) -> String {
    Emoji::ALL
        .iter()
        .map(|emoji| {
            let checked = if draft.emoji == Some(*emoji) { "checked" } else { "" };
            format!(
                r#"<input class="film-details__emoji-item visually-hidden" name="comment-emoji" type="radio" id="emoji-{name}" value="{name}" {checked} {disabled}>
<label class="film-details__emoji-label" for="emoji-{name}">
  <img src="./images/emoji/{name}.png" width="30" height="30" alt="emoji">
</label>"#,
                name = emoji.as_str(),
                checked = checked,
                disabled = disabled_attr(form.disabled),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full popup markup. Pure function of film, comments, draft, and form state.
pub fn detail_markup(
    film: &Film,
    comments: &[Comment],
    draft: &CommentDraft,
    form: &DetailFormState,
    shaking: Option<ShakeTarget>,
) -> String {
    let active = "film-details__control-button--active";
    let comment_rows: String = comments
        .iter()
        .map(|comment| comment_markup(comment, form, shaking))
        .collect::<Vec<_>>()
        .join("\n");
    let form_shakes = shaking == Some(ShakeTarget::NewCommentForm);

    format!(
        r#"<section class="film-details">
  <form class="film-details__inner" action="" method="get">
    <div class="film-details__top-container">
      <div class="film-details__close">
        <button class="film-details__close-btn" type="button">close</button>
      </div>
      <div class="film-details__info-wrap">
        <div class="film-details__poster">
          <img class="film-details__poster-img" src="{poster}" alt="">
          <p class="film-details__age">{age}+</p>
        </div>
        <div class="film-details__info">
          <h3 class="film-details__title">{title}</h3>
          <p class="film-details__title-original">Original: {original}</p>
          <p class="film-details__total-rating">{rating:.1}</p>
          <table class="film-details__table">
            <tr><td class="film-details__term">Director</td><td class="film-details__cell">{director}</td></tr>
            <tr><td class="film-details__term">Writers</td><td class="film-details__cell">{writers}</td></tr>
            <tr><td class="film-details__term">Actors</td><td class="film-details__cell">{actors}</td></tr>
            <tr><td class="film-details__term">Release Date</td><td class="film-details__cell">{release}</td></tr>
            <tr><td class="film-details__term">Runtime</td><td class="film-details__cell">{runtime}</td></tr>
            <tr><td class="film-details__term">Country</td><td class="film-details__cell">{country}</td></tr>
            <tr><td class="film-details__term">{genre_label}</td><td class="film-details__cell">{genres}</td></tr>
          </table>
          <p class="film-details__film-description">{description}</p>
        </div>
      </div>
      <section class="film-details__controls">
        <button type="button" class="film-details__control-button film-details__control-button--watchlist {watchlist}">Add to watchlist</button>
        <button type="button" class="film-details__control-button film-details__control-button--watched {watched}">Already watched</button>
        <button type="button" class="film-details__control-button film-details__control-button--favorite {favourite}">Add to favorites</button>
      </section>
    </div>
    <div class="film-details__bottom-container">
      <section class="film-details__comments-wrap">
        <h3 class="film-details__comments-title">Comments <span class="film-details__comments-count">{comment_count}</span></h3>
        <ul class="film-details__comments-list">
{comment_rows}
        </ul>
        <div class="film-details__new-comment{form_shake}">
          <div class="film-details__add-emoji-label">{chosen_emoji}</div>
          <label class="film-details__comment-label">
            <textarea class="film-details__comment-input" placeholder="Select reaction below and write comment here" name="comment" {disabled}>{draft_text}</textarea>
          </label>
          <div class="film-details__emoji-list">
{emoji_list}
          </div>
        </div>
      </section>
    </div>
  </form>
</section>"#,
        poster = film.poster,
        age = film.age_rating,
        title = escape_text(&film.title),
        original = escape_text(&film.original_title),
        rating = film.rating,
        director = escape_text(&film.director),
        writers = escape_text(&film.writers.join(", ")),
        actors = escape_text(&film.actors.join(", ")),
        release = format_release_detailed(film.release),
        runtime = format_runtime(film.runtime_minutes),
        country = escape_text(&film.country),
        genre_label = if film.genres.len() > 1 { "Genres" } else { "Genre" },
        genres = film.genres.join(", "),
        description = escape_text(&film.description),
        watchlist = if film.in_watchlist() { active } else { "" },
        watched = if film.is_watched() { active } else { "" },
        favourite = if film.is_favourite() { active } else { "" },
        comment_count = comments.len(),
        comment_rows = comment_rows,
        form_shake = shake_class(form_shakes),
        chosen_emoji = chosen_emoji_markup(draft),
        disabled = disabled_attr(form.disabled),
        draft_text = escape_text(&draft.text),
        emoji_list = emoji_list_markup(draft, form),
    )
}

/// The detail popup: film info, comments, and the new-comment form.
pub struct DetailView {
    doc: Rc<Document>,
    node: NodeId,
    film: RefCell<Film>,
    comments: RefCell<Vec<Comment>>,
    draft: RefCell<CommentDraft>,
    form: RefCell<DetailFormState>,
    shaking: RefCell<Option<ShakeTarget>>,
    scroll_top: Cell<u32>,
    on_close: RefCell<Option<Rc<dyn Fn()>>>,
    on_toggle: RefCell<Option<Rc<dyn Fn(ControlType)>>>,
    on_comment_action: RefCell<Option<Rc<dyn Fn(CommentAction)>>>,
}

impl DetailView {
    pub fn new(doc: &Rc<Document>, film: Film, comments: Vec<Comment>) -> Rc<Self> {
        let draft = CommentDraft::default();
        let form = DetailFormState::default();
        let node = doc.create(detail_markup(&film, &comments, &draft, &form, None));
        Rc::new(Self {
            doc: Rc::clone(doc),
            node,
            film: RefCell::new(film),
            comments: RefCell::new(comments),
            draft: RefCell::new(draft),
            form: RefCell::new(form),
            shaking: RefCell::new(None),
            scroll_top: Cell::new(0),
            on_close: RefCell::new(None),
            on_toggle: RefCell::new(None),
            on_comment_action: RefCell::new(None),
        })
    }

    fn rerender(&self) {
        let markup = detail_markup(
            &self.film.borrow(),
            &self.comments.borrow(),
            &self.draft.borrow(),
            &self.form.borrow(),
            *self.shaking.borrow(),
        );
        self.doc.set_markup(self.node, markup);
    }

    // --- Data refresh ------------------------------------------------------

    /// Rebind to updated film data (flag toggles while the popup is open).
    pub fn set_film(&self, film: Film) {
        *self.film.borrow_mut() = film;
        self.rerender();
    }

    /// Swap in the freshly loaded (or mutated) comment list.
    pub fn set_comments(&self, comments: Vec<Comment>) {
        *self.comments.borrow_mut() = comments;
        self.rerender();
    }

    pub fn comment_count(&self) -> usize {
        self.comments.borrow().len()
    }

    // --- Draft editing -----------------------------------------------------

    pub fn draft(&self) -> CommentDraft {
        self.draft.borrow().clone()
    }

    /// Typing into the textarea. Text-only updates skip the re-render, the
    /// same way live input does not rebuild the form around the caret.
    pub fn input_text(&self, text: &str) {
        self.draft.borrow_mut().text = text.to_owned();
    }

    /// Picking a reaction re-renders so the chosen emoji shows.
    pub fn choose_emoji(&self, emoji: Emoji) {
        self.draft.borrow_mut().emoji = Some(emoji);
        self.rerender();
    }

    /// Discard the draft and all transient form state, rebinding to `film`.
    /// This is the Escape path.
    pub fn reset(&self, film: Film) {
        *self.film.borrow_mut() = film;
        *self.draft.borrow_mut() = CommentDraft::default();
        *self.form.borrow_mut() = DetailFormState::default();
        *self.shaking.borrow_mut() = None;
        self.rerender();
    }

    /// Clear the draft without touching the rest of the form (successful
    /// save).
    pub fn clear_draft(&self) {
        *self.draft.borrow_mut() = CommentDraft::default();
        self.rerender();
    }

    // --- Optimistic form state ---------------------------------------------

    pub fn form_state(&self) -> DetailFormState {
        *self.form.borrow()
    }

    /// Disable the whole form and label the new-comment block as saving.
    pub fn set_saving(&self) {
        *self.form.borrow_mut() = DetailFormState {
            disabled: true,
            saving: true,
            deleting: None,
        };
        self.rerender();
    }

    /// Disable the form and mark one row "Deleting…".
    pub fn set_deleting(&self, comment_id: CommentId) {
        *self.form.borrow_mut() = DetailFormState {
            disabled: true,
            saving: false,
            deleting: Some(comment_id),
        };
        self.rerender();
    }

    /// Start the abort animation on the target element.
    pub fn begin_shake(&self, target: ShakeTarget) {
        *self.shaking.borrow_mut() = Some(target);
        self.rerender();
    }

    /// End the abort animation and return the form to enabled idle. The
    /// draft is left untouched.
    pub fn reset_form(&self) {
        *self.form.borrow_mut() = DetailFormState::default();
        *self.shaking.borrow_mut() = None;
        self.rerender();
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking.borrow().is_some()
    }

    // --- Scroll ------------------------------------------------------------

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top.get()
    }

    pub fn set_scroll_top(&self, offset: u32) {
        self.scroll_top.set(offset);
    }

    // --- Callbacks ---------------------------------------------------------

    pub fn set_close_handler(&self, handler: Rc<dyn Fn()>) {
        *self.on_close.borrow_mut() = Some(handler);
    }

    pub fn set_toggle_handler(&self, handler: Rc<dyn Fn(ControlType)>) {
        *self.on_toggle.borrow_mut() = Some(handler);
    }

    pub fn set_comment_action_handler(&self, handler: Rc<dyn Fn(CommentAction)>) {
        *self.on_comment_action.borrow_mut() = Some(handler);
    }

    // --- Simulated input ---------------------------------------------------

    /// Click on the close button.
    pub fn click_close(&self) {
        let handler = self.on_close.borrow().clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    /// Click on one of the three flag controls inside the popup.
    pub fn click_control(&self, control: ControlType) {
        let handler = self.on_toggle.borrow().clone();
        if let Some(handler) = handler {
            handler(control);
        }
    }

    /// Click on a comment row's delete button.
    ///
    /// Panics when the id is not in the rendered list — the delete button
    /// exists only on rendered rows, so this is a wiring breach, not a user
    /// condition.
    pub fn click_delete(&self, comment_id: CommentId) {
        let known = self
            .comments
            .borrow()
            .iter()
            .any(|comment| comment.id == comment_id);
        assert!(known, "delete clicked on a comment that is not rendered");

        let handler = self.on_comment_action.borrow().clone();
        if let Some(handler) = handler {
            handler(CommentAction::Delete(comment_id));
        }
    }

    /// Submit the draft (the Ctrl+Enter path). Incomplete drafts are
    /// ignored: the form needs both text and a chosen reaction.
    pub fn submit(&self) {
        let draft = self.draft.borrow().clone();
        if !draft.is_complete() {
            return;
        }
        let handler = self.on_comment_action.borrow().clone();
        if let Some(handler) = handler {
            handler(CommentAction::Add(draft));
        }
    }
}

impl View for DetailView {
    fn node(&self) -> NodeId {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_model::{FilmId, mock};

    fn fixture() -> (Rc<Document>, Rc<DetailView>, Vec<Comment>) {
        let mut rng = mock::SeededRng::new(31);
        let film = mock::generate_film(&mut rng, FilmId(0));
        let comments: Vec<Comment> = (0..3)
            .map(|n| mock::generate_comment(&mut rng, FilmId(0), CommentId(n)))
            .collect();
        let doc = Document::new();
        let view = DetailView::new(&doc, film, comments.clone());
        (doc, view, comments)
    }

    #[test]
    fn markup_counts_comments() {
        let (doc, view, comments) = fixture();
        let markup = doc.markup(view.node());
        assert!(markup.contains(&format!(
            r#"<span class="film-details__comments-count">{}</span>"#,
            comments.len()
        )));
    }

    #[test]
    fn saving_disables_the_form() {
        let (doc, view, _) = fixture();
        view.set_saving();
        let markup = doc.markup(view.node());
        assert!(markup.contains("<textarea"));
        assert!(markup.contains("disabled"));
        assert!(view.form_state().disabled);
    }

    #[test]
    fn deleting_labels_only_the_target_row() {
        let (doc, view, comments) = fixture();
        view.set_deleting(comments[1].id);
        let markup = doc.markup(view.node());
        assert_eq!(markup.matches("Deleting…").count(), 1);
    }

    #[test]
    fn shake_marks_the_new_comment_block() {
        let (doc, view, _) = fixture();
        view.begin_shake(ShakeTarget::NewCommentForm);
        assert!(doc.markup(view.node()).contains("film-details__new-comment shake"));

        view.reset_form();
        assert!(!doc.markup(view.node()).contains("shake"));
    }

    #[test]
    fn abort_keeps_the_draft() {
        let (_, view, _) = fixture();
        view.input_text("Almost two hours? Seriously?");
        view.choose_emoji(Emoji::Angry);
        view.set_saving();
        view.begin_shake(ShakeTarget::NewCommentForm);
        view.reset_form();

        let draft = view.draft();
        assert_eq!(draft.text, "Almost two hours? Seriously?");
        assert_eq!(draft.emoji, Some(Emoji::Angry));
        assert!(!view.form_state().disabled);
    }

    #[test]
    fn reset_discards_the_draft() {
        let (_, view, _) = fixture();
        view.input_text("typo city");
        view.choose_emoji(Emoji::Puke);
        let film = view.film.borrow().clone();
        view.reset(film);
        assert_eq!(view.draft(), CommentDraft::default());
    }

    #[test]
    fn incomplete_draft_does_not_submit() {
        let (_, view, _) = fixture();
        let submitted = Rc::new(std::cell::Cell::new(false));
        let flag = Rc::clone(&submitted);
        view.set_comment_action_handler(Rc::new(move |_| flag.set(true)));

        view.input_text("text but no emoji");
        view.submit();
        assert!(!submitted.get());

        view.choose_emoji(Emoji::Smile);
        view.submit();
        assert!(submitted.get());
    }

    #[test]
    #[should_panic(expected = "not rendered")]
    fn deleting_an_unrendered_comment_is_loud() {
        let (_, view, _) = fixture();
        view.click_delete(CommentId(999));
    }

    #[test]
    fn scroll_offset_is_remembered() {
        let (_, view, _) = fixture();
        view.set_scroll_top(420);
        view.set_saving();
        assert_eq!(view.scroll_top(), 420);
    }
}
