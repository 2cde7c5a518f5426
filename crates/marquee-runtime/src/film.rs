#![forbid(unsafe_code)]

//! Per-card presenter.
//!
//! One [`FilmPresenter`] runs one film card plus its detail popup. The card
//! is rebuilt and swapped in place on every [`init`](FilmPresenter::init);
//! the popup holds the process-wide [`PopupSlot`](crate::PopupSlot) while
//! open. Comment actions move the form through an explicit state machine:
//!
//! ```text
//! Idle ──add──▶ Saving ──ok──▶ Idle
//!   │             └──fail──▶ Aborting ──(600ms)──▶ Idle
//!   └──delete──▶ Deleting(id) ──ok──▶ Idle
//!                  └──fail──▶ Aborting ──(600ms)──▶ Idle
//! ```
//!
//! Any action arriving while the form is not `Idle` is rejected with
//! [`ModelError::InvalidTransition`]; the timed auto-recovery out of
//! `Aborting` is the only transition a failure takes.

use crate::ViewAction;
use crate::popup::{PopupRestore, PopupSlot};
use marquee_model::{CommentsModel, Film, FilmId, FilterModel, ModelError, UpdateType};
use marquee_render::{Document, KeyEvent, NodeId, Position};
use marquee_view::{
    CommentAction, ControlType, DetailView, FilmCardView, ShakeTarget, remove_view, render_view,
    replace_view,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Fixed duration of the abort shake animation.
pub const SHAKE_DURATION: Duration = Duration::from_millis(600);

/// New-comment / delete-comment form state, independent of whether the
/// popup is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    /// A save is in flight; the whole form is disabled.
    Saving,
    /// A delete is in flight for this comment; the form is disabled.
    Deleting(marquee_model::CommentId),
    /// A failure is being signaled; auto-recovers to `Idle` at `until`.
    Aborting { target: ShakeTarget, until: Instant },
}

/// Presenter for one film card and its popup.
pub struct FilmPresenter {
    doc: Rc<Document>,
    container: NodeId,
    comments_model: Rc<CommentsModel>,
    filter_model: Rc<FilterModel>,
    popup: Rc<PopupSlot>,
    dispatch: Rc<dyn Fn(ViewAction)>,
    mode_change: Rc<dyn Fn()>,
    film: RefCell<Film>,
    card: RefCell<Option<Rc<FilmCardView>>>,
    detail: RefCell<Option<Rc<DetailView>>>,
    form_state: Cell<FormState>,
}

impl FilmPresenter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        doc: &Rc<Document>,
        container: NodeId,
        comments_model: &Rc<CommentsModel>,
        filter_model: &Rc<FilterModel>,
        popup: &Rc<PopupSlot>,
        dispatch: Rc<dyn Fn(ViewAction)>,
        mode_change: Rc<dyn Fn()>,
        film: Film,
    ) -> Rc<Self> {
        Rc::new(Self {
            doc: Rc::clone(doc),
            container,
            comments_model: Rc::clone(comments_model),
            filter_model: Rc::clone(filter_model),
            popup: Rc::clone(popup),
            dispatch,
            mode_change,
            film: RefCell::new(film),
            card: RefCell::new(None),
            detail: RefCell::new(None),
            form_state: Cell::new(FormState::Idle),
        })
    }

    pub fn film(&self) -> Film {
        self.film.borrow().clone()
    }

    pub fn film_id(&self) -> FilmId {
        self.film.borrow().id
    }

    pub fn is_popup_open(&self) -> bool {
        self.detail.borrow().is_some()
    }

    pub fn form_state(&self) -> FormState {
        self.form_state.get()
    }

    pub fn card_view(&self) -> Option<Rc<FilmCardView>> {
        self.card.borrow().clone()
    }

    pub fn detail_view(&self) -> Option<Rc<DetailView>> {
        self.detail.borrow().clone()
    }

    /// Bind to (possibly updated) film data: build a fresh card and swap it
    /// in at the same position. An open popup rebinds without closing.
    pub fn init(self: &Rc<Self>, film: Film) {
        *self.film.borrow_mut() = film.clone();

        let card = FilmCardView::new(&self.doc, film.clone());
        let weak = Rc::downgrade(self);
        card.set_open_handler(Rc::new(move || {
            if let Some(presenter) = weak.upgrade() {
                presenter.handle_card_click();
            }
        }));
        let weak = Rc::downgrade(self);
        card.set_toggle_handler(Rc::new(move |control| {
            if let Some(presenter) = weak.upgrade() {
                presenter.handle_toggle(control);
            }
        }));

        let prev = self.card.borrow_mut().replace(Rc::clone(&card));
        match prev {
            None => render_view(&self.doc, self.container, card.as_ref(), Position::BeforeEnd),
            Some(prev) => {
                replace_view(&self.doc, card.as_ref(), prev.as_ref());
                remove_view(&self.doc, prev.as_ref());
            }
        }

        let detail = self.detail.borrow().clone();
        if let Some(detail) = detail {
            detail.set_film(film);
        }
    }

    /// Tear down this presenter's DOM. An open popup parks its restorable
    /// state in the slot first; the board decides whether to re-open it.
    pub fn destroy(&self) {
        let detail = self.detail.borrow().clone();
        if let Some(detail) = detail {
            self.popup.save_restore(PopupRestore {
                film_id: self.film_id(),
                scroll_top: detail.scroll_top(),
                draft: detail.draft(),
            });
            self.close_popup();
        }

        let card = self.card.borrow_mut().take();
        if let Some(card) = card {
            remove_view(&self.doc, card.as_ref());
        }
    }

    /// Mode-change request from the board: close our popup if open,
    /// discarding its draft.
    pub fn reset_view(&self) {
        if self.is_popup_open() {
            self.close_popup();
        }
    }

    fn handle_card_click(self: &Rc<Self>) {
        (self.mode_change)();
        self.show_popup(None);
    }

    /// Open (or re-open) the detail popup.
    ///
    /// Comments come from the cache when loaded; otherwise a load is
    /// dispatched and the popup renders with an empty list until the load
    /// lands. When a previous detail view exists its scroll offset carries
    /// over to the replacement.
    pub fn show_popup(self: &Rc<Self>, restore: Option<PopupRestore>) {
        let film = self.film.borrow().clone();
        let film_id = film.id;

        let comments = if self.comments_model.is_loaded(film_id) {
            self.comments_model.comments(film_id)
        } else {
            (self.dispatch)(ViewAction::LoadComments { film_id });
            Vec::new()
        };

        let detail = DetailView::new(&self.doc, film, comments);

        let weak = Rc::downgrade(self);
        detail.set_close_handler(Rc::new(move || {
            if let Some(presenter) = weak.upgrade() {
                presenter.close_popup();
            }
        }));
        let weak = Rc::downgrade(self);
        detail.set_toggle_handler(Rc::new(move |control| {
            if let Some(presenter) = weak.upgrade() {
                presenter.handle_toggle(control);
            }
        }));
        let weak = Rc::downgrade(self);
        detail.set_comment_action_handler(Rc::new(move |action| {
            if let Some(presenter) = weak.upgrade()
                && let Err(err) = presenter.begin_comment_action(action)
            {
                tracing::warn!(error = %err, "comment action rejected");
            }
        }));

        let prev = self.detail.borrow_mut().replace(Rc::clone(&detail));
        match prev {
            None => {
                render_view(&self.doc, self.doc.body(), detail.as_ref(), Position::BeforeEnd);
            }
            Some(prev) => {
                detail.set_scroll_top(prev.scroll_top());
                replace_view(&self.doc, detail.as_ref(), prev.as_ref());
                remove_view(&self.doc, prev.as_ref());
            }
        }

        if let Some(restore) = restore {
            detail.set_scroll_top(restore.scroll_top);
            if !restore.draft.text.is_empty() {
                detail.input_text(&restore.draft.text);
            }
            if let Some(emoji) = restore.draft.emoji {
                detail.choose_emoji(emoji);
            }
        }

        let weak = Rc::downgrade(self);
        let on_escape = Rc::new(move |event: &KeyEvent| {
            if event.is_escape()
                && let Some(presenter) = weak.upgrade()
            {
                presenter.handle_escape();
            }
        });
        let weak = Rc::downgrade(self);
        let on_submit = Rc::new(move |event: &KeyEvent| {
            if event.is_ctrl_enter()
                && let Some(presenter) = weak.upgrade()
            {
                let detail = presenter.detail.borrow().clone();
                if let Some(detail) = detail {
                    detail.submit();
                }
            }
        });
        self.popup.acquire(film_id, on_escape, on_submit);
    }

    /// Escape: discard the draft, then close.
    fn handle_escape(&self) {
        let film = self.film.borrow().clone();
        let detail = self.detail.borrow().clone();
        if let Some(detail) = detail {
            detail.reset(film);
        }
        self.close_popup();
    }

    /// Close the popup: release the slot (key handlers and overflow lock go
    /// with it), detach the detail node, drop the view.
    pub fn close_popup(&self) {
        self.popup.release(self.film_id());
        let detail = self.detail.borrow_mut().take();
        if let Some(detail) = detail {
            remove_view(&self.doc, detail.as_ref());
        }
        self.form_state.set(FormState::Idle);
    }

    fn handle_toggle(&self, control: ControlType) {
        // Escalate to Minor when the active filter tracks the toggled flag:
        // the film just entered or left the visible set.
        let update = if self.filter_model.filter().tracked_flag() == Some(control.flag()) {
            UpdateType::Minor
        } else {
            UpdateType::Patch
        };
        let film = { self.film.borrow().with_flag_toggled(control.flag()) };
        (self.dispatch)(ViewAction::UpdateFilm { update, film });
    }

    /// Start a comment mutation, entering the matching optimistic state.
    ///
    /// Rejected while the form is anywhere but `Idle` — one mutation per
    /// popup at a time, and the abort shake cannot be pre-empted.
    pub fn begin_comment_action(&self, action: CommentAction) -> Result<(), ModelError> {
        if self.form_state.get() != FormState::Idle {
            return Err(ModelError::InvalidTransition(
                "comment action while the form is busy",
            ));
        }
        let detail = self
            .detail
            .borrow()
            .clone()
            .ok_or(ModelError::InvalidTransition(
                "comment action without an open popup",
            ))?;
        let film_id = self.film_id();

        match action {
            CommentAction::Add(draft) => {
                self.form_state.set(FormState::Saving);
                detail.set_saving();
                (self.dispatch)(ViewAction::AddComment { film_id, draft });
            }
            CommentAction::Delete(comment_id) => {
                self.form_state.set(FormState::Deleting(comment_id));
                detail.set_deleting(comment_id);
                (self.dispatch)(ViewAction::DeleteComment {
                    film_id,
                    comment_id,
                });
            }
        }
        Ok(())
    }

    /// Mutation confirmed: back to idle. A confirmed save also clears the
    /// draft so it cannot leak into a restored popup.
    pub fn confirm_mutation(&self) {
        let was_saving = matches!(self.form_state.get(), FormState::Saving);
        self.form_state.set(FormState::Idle);
        let detail = self.detail.borrow().clone();
        if let Some(detail) = detail {
            if was_saving {
                detail.clear_draft();
            }
            detail.reset_form();
        }
    }

    /// Mutation failed: shake the element the in-flight state points at,
    /// then auto-recover on [`tick`](Self::tick). Stale failures (no
    /// in-flight state, popup gone) are dropped silently.
    pub fn abort_mutation(&self, now: Instant) {
        let target = match self.form_state.get() {
            FormState::Saving => ShakeTarget::NewCommentForm,
            FormState::Deleting(comment_id) => ShakeTarget::CommentRow(comment_id),
            _ => {
                tracing::debug!(film = self.film_id().0, "stale abort dropped");
                return;
            }
        };

        let Some(detail) = self.detail.borrow().clone() else {
            self.form_state.set(FormState::Idle);
            return;
        };
        self.form_state.set(FormState::Aborting {
            target,
            until: now + SHAKE_DURATION,
        });
        detail.begin_shake(target);
    }

    /// Advance the abort deadline; past it, the form re-enables with the
    /// draft intact.
    pub fn tick(&self, now: Instant) {
        if let FormState::Aborting { until, .. } = self.form_state.get()
            && now >= until
        {
            self.form_state.set(FormState::Idle);
            let detail = self.detail.borrow().clone();
            if let Some(detail) = detail {
                detail.reset_form();
            }
        }
    }

    /// The lazy comment load for this film landed in the model.
    pub fn handle_comments_loaded(&self) {
        let detail = self.detail.borrow().clone();
        if let Some(detail) = detail {
            let comments = self.comments_model.comments(self.film_id());
            detail.set_comments(comments);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_model::{CommentDraft, CommentId, Emoji, FilterType, mock};
    use marquee_view::View;
    use std::cell::RefCell as StdRefCell;

    struct Rig {
        doc: Rc<Document>,
        comments_model: Rc<CommentsModel>,
        filter_model: Rc<FilterModel>,
        popup: Rc<PopupSlot>,
        actions: Rc<StdRefCell<Vec<ViewAction>>>,
        mode_changes: Rc<Cell<u32>>,
        container: NodeId,
    }

    impl Rig {
        fn new() -> Self {
            let doc = Document::new();
            let container = doc.create("<div class=\"films-list__container\">");
            doc.insert(doc.body(), container, Position::BeforeEnd);
            Self {
                comments_model: CommentsModel::new(),
                filter_model: FilterModel::new(),
                popup: PopupSlot::new(&doc),
                actions: Rc::new(StdRefCell::new(Vec::new())),
                mode_changes: Rc::new(Cell::new(0)),
                doc,
                container,
            }
        }

        fn presenter(&self, film: Film) -> Rc<FilmPresenter> {
            let actions = Rc::clone(&self.actions);
            let mode_changes = Rc::clone(&self.mode_changes);
            let presenter = FilmPresenter::new(
                &self.doc,
                self.container,
                &self.comments_model,
                &self.filter_model,
                &self.popup,
                Rc::new(move |action| actions.borrow_mut().push(action)),
                Rc::new(move || mode_changes.set(mode_changes.get() + 1)),
                film.clone(),
            );
            presenter.init(film);
            presenter
        }
    }

    fn film(seed: u64) -> Film {
        let mut rng = mock::SeededRng::new(seed);
        mock::generate_film(&mut rng, FilmId(0))
    }

    #[test]
    fn reinit_swaps_the_card_in_place() {
        let rig = Rig::new();
        let presenter = rig.presenter(film(1));
        let marker = rig.doc.create("<p>marker");
        rig.doc.insert(rig.container, marker, Position::BeforeEnd);

        let first_card = presenter.card_view().unwrap();
        assert_eq!(rig.doc.child_index(first_card.node()), Some(0));

        presenter.init(film(1).with_flag_toggled(marquee_model::FilmFlags::WATCHED));
        let second_card = presenter.card_view().unwrap();

        assert_eq!(rig.doc.child_index(second_card.node()), Some(0));
        assert!(!rig.doc.is_attached(first_card.node()));
    }

    #[test]
    fn toggle_escalates_to_minor_only_under_the_matching_filter() {
        let rig = Rig::new();
        let presenter = rig.presenter(film(2));

        presenter.card_view().unwrap().click_control(ControlType::Favourite);
        rig.filter_model
            .set_filter(UpdateType::Major, FilterType::Favourites);
        presenter.card_view().unwrap().click_control(ControlType::Favourite);
        presenter.card_view().unwrap().click_control(ControlType::Watched);

        let updates: Vec<UpdateType> = rig
            .actions
            .borrow()
            .iter()
            .map(|action| match action {
                ViewAction::UpdateFilm { update, .. } => *update,
                other => panic!("unexpected action {other:?}"),
            })
            .collect();
        assert_eq!(
            updates,
            vec![UpdateType::Patch, UpdateType::Minor, UpdateType::Patch]
        );
    }

    #[test]
    fn card_click_coordinates_mode_then_opens() {
        let rig = Rig::new();
        rig.comments_model.set_comments(FilmId(0), Vec::new());
        let presenter = rig.presenter(film(3));

        presenter.card_view().unwrap().click_open();

        assert_eq!(rig.mode_changes.get(), 1);
        assert!(presenter.is_popup_open());
        assert_eq!(rig.doc.keydown_handler_count(), 2);
        assert!(rig.doc.has_class(rig.doc.body(), "hide-overflow"));
    }

    #[test]
    fn first_open_requests_a_load() {
        let rig = Rig::new();
        let presenter = rig.presenter(film(4));

        presenter.show_popup(None);
        assert!(matches!(
            rig.actions.borrow().as_slice(),
            [ViewAction::LoadComments { film_id: FilmId(0) }]
        ));
        assert_eq!(presenter.detail_view().unwrap().comment_count(), 0);

        let mut rng = mock::SeededRng::new(9);
        let comments = vec![mock::generate_comment(&mut rng, FilmId(0), CommentId(0))];
        rig.comments_model.set_comments(FilmId(0), comments);
        presenter.handle_comments_loaded();
        assert_eq!(presenter.detail_view().unwrap().comment_count(), 1);
    }

    #[test]
    fn escape_discards_the_draft_and_closes() {
        let rig = Rig::new();
        rig.comments_model.set_comments(FilmId(0), Vec::new());
        let presenter = rig.presenter(film(5));
        presenter.show_popup(None);

        let detail = presenter.detail_view().unwrap();
        detail.input_text("half-written thought");
        detail.choose_emoji(Emoji::Smile);

        rig.doc
            .dispatch_keydown(&KeyEvent::new(marquee_render::KeyCode::Escape));

        assert!(!presenter.is_popup_open());
        assert_eq!(rig.doc.keydown_handler_count(), 0);
        assert!(!rig.doc.has_class(rig.doc.body(), "hide-overflow"));
        assert_eq!(detail.draft(), CommentDraft::default());
    }

    #[test]
    fn busy_form_rejects_a_second_action() {
        let rig = Rig::new();
        rig.comments_model.set_comments(FilmId(0), Vec::new());
        let presenter = rig.presenter(film(6));
        presenter.show_popup(None);

        let draft = CommentDraft {
            text: "Interesting setting and a good cast".to_owned(),
            emoji: Some(Emoji::Smile),
        };
        presenter
            .begin_comment_action(CommentAction::Add(draft.clone()))
            .unwrap();

        let err = presenter
            .begin_comment_action(CommentAction::Add(draft))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidTransition(_)));
        assert_eq!(presenter.form_state(), FormState::Saving);
    }

    #[test]
    fn abort_shakes_then_recovers_on_tick() {
        let rig = Rig::new();
        rig.comments_model.set_comments(FilmId(0), Vec::new());
        let presenter = rig.presenter(film(7));
        presenter.show_popup(None);

        let detail = presenter.detail_view().unwrap();
        detail.input_text("Almost two hours? Seriously?");
        detail.choose_emoji(Emoji::Angry);
        presenter
            .begin_comment_action(CommentAction::Add(detail.draft()))
            .unwrap();

        let now = Instant::now();
        presenter.abort_mutation(now);
        assert!(matches!(presenter.form_state(), FormState::Aborting { .. }));
        assert!(detail.is_shaking());

        // A retry during the shake is rejected.
        let err = presenter
            .begin_comment_action(CommentAction::Add(detail.draft()))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidTransition(_)));

        presenter.tick(now + SHAKE_DURATION - Duration::from_millis(1));
        assert!(matches!(presenter.form_state(), FormState::Aborting { .. }));

        presenter.tick(now + SHAKE_DURATION);
        assert_eq!(presenter.form_state(), FormState::Idle);
        assert!(!detail.is_shaking());
        assert_eq!(detail.draft().text, "Almost two hours? Seriously?");
    }

    #[test]
    fn destroy_parks_popup_state_in_the_slot() {
        let rig = Rig::new();
        rig.comments_model.set_comments(FilmId(0), Vec::new());
        let presenter = rig.presenter(film(8));
        presenter.show_popup(None);

        let detail = presenter.detail_view().unwrap();
        detail.set_scroll_top(333);
        detail.input_text("keep me");
        presenter.destroy();

        let restore = rig.popup.take_restore().unwrap();
        assert_eq!(restore.film_id, FilmId(0));
        assert_eq!(restore.scroll_top, 333);
        assert_eq!(restore.draft.text, "keep me");
        assert_eq!(rig.doc.keydown_handler_count(), 0);
    }

    #[test]
    fn reopen_preserves_scroll_from_the_outgoing_view() {
        let rig = Rig::new();
        rig.comments_model.set_comments(FilmId(0), Vec::new());
        let presenter = rig.presenter(film(10));

        presenter.show_popup(None);
        presenter.detail_view().unwrap().set_scroll_top(250);
        presenter.show_popup(None);

        assert_eq!(presenter.detail_view().unwrap().scroll_top(), 250);
        assert_eq!(rig.doc.keydown_handler_count(), 2);
    }
}
