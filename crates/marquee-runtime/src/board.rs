#![forbid(unsafe_code)]

//! Board presenter.
//!
//! Owns the board shell, sort bar, list container, show-more control and
//! empty state, and reconciles them against the derived film slice. The
//! presenter map (film id → [`FilmPresenter`]) is the single source of
//! truth for what is on screen: it is fully drained before any rebuild.
//!
//! Update routing: `Patch` refreshes the one owning presenter in place,
//! `Minor` rebuilds keeping pagination/sort (and re-opens a surviving
//! popup), `Major` rebuilds with pagination and sort reset to defaults.

use crate::ViewAction;
use crate::film::FilmPresenter;
use crate::popup::PopupSlot;
use crate::service::{CommentService, ServiceError, ServiceRequest, ServiceResponse};
use marquee_model::{
    CommentsEvent, CommentsModel, Film, FilmId, FilmsModel, FilterModel, FilterType, SortType,
    UpdateType,
};
use marquee_render::{Document, NodeId, Position};
use marquee_view::{
    BoardView, EmptyBoardView, FilmContainerView, FilmListContainerView, ShowMoreView,
    SortBarView, View, remove_view, render_view,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

/// Films revealed per "show more" click, and on the first page.
pub const PAGE_SIZE: usize = 5;

/// Orchestrates the whole film board.
pub struct BoardPresenter {
    doc: Rc<Document>,
    container: NodeId,
    films_model: Rc<FilmsModel>,
    comments_model: Rc<CommentsModel>,
    filter_model: Rc<FilterModel>,
    service: Rc<CommentService>,
    popup: Rc<PopupSlot>,
    board_view: Rc<BoardView>,
    film_container: Rc<FilmContainerView>,
    list_container: Rc<FilmListContainerView>,
    sort_view: RefCell<Option<Rc<SortBarView>>>,
    empty_view: RefCell<Option<Rc<EmptyBoardView>>>,
    show_more_view: RefCell<Option<Rc<ShowMoreView>>>,
    presenters: RefCell<HashMap<FilmId, Rc<FilmPresenter>>>,
    rendered_count: Cell<usize>,
    sort_type: Cell<SortType>,
    clock: Cell<Instant>,
}

impl BoardPresenter {
    /// Wire a board over the shared models and comment service. Registers
    /// as an observer on all three models; call [`init`](Self::init) to
    /// mount and render.
    pub fn new(
        doc: &Rc<Document>,
        container: NodeId,
        films_model: &Rc<FilmsModel>,
        comments_model: &Rc<CommentsModel>,
        filter_model: &Rc<FilterModel>,
        service: &Rc<CommentService>,
        now: Instant,
    ) -> Rc<Self> {
        let board = Rc::new(Self {
            doc: Rc::clone(doc),
            container,
            films_model: Rc::clone(films_model),
            comments_model: Rc::clone(comments_model),
            filter_model: Rc::clone(filter_model),
            service: Rc::clone(service),
            popup: PopupSlot::new(doc),
            board_view: BoardView::new(doc),
            film_container: FilmContainerView::new(doc),
            list_container: FilmListContainerView::new(doc),
            sort_view: RefCell::new(None),
            empty_view: RefCell::new(None),
            show_more_view: RefCell::new(None),
            presenters: RefCell::new(HashMap::new()),
            rendered_count: Cell::new(PAGE_SIZE),
            sort_type: Cell::new(SortType::Default),
            clock: Cell::new(now),
        });

        let weak = Rc::downgrade(&board);
        films_model.add_observer(Rc::new(move |update, film: &Film| {
            if let Some(board) = weak.upgrade() {
                board.handle_films_event(update, film);
            }
        }));
        let weak = Rc::downgrade(&board);
        filter_model.add_observer(Rc::new(move |update, _filter: &FilterType| {
            if let Some(board) = weak.upgrade() {
                board.handle_filter_event(update);
            }
        }));
        let weak = Rc::downgrade(&board);
        comments_model.add_observer(Rc::new(move |_update, event: &CommentsEvent| {
            if let Some(board) = weak.upgrade() {
                board.handle_comments_event(event);
            }
        }));

        board
    }

    /// Mount the shells and render the first page.
    pub fn init(self: &Rc<Self>) {
        render_view(&self.doc, self.container, self.board_view.as_ref(), Position::BeforeEnd);
        render_view(
            &self.doc,
            self.board_view.node(),
            self.film_container.as_ref(),
            Position::BeforeEnd,
        );
        self.render_board();
    }

    /// The derived slice: filter predicate, then sort comparator. Fresh on
    /// every access.
    pub fn films(&self) -> Vec<Film> {
        let mut films = self.filter_model.filter().apply(self.films_model.films());
        self.sort_type.get().apply(&mut films);
        films
    }

    /// Advance time: resolve due comment requests, then run the presenters'
    /// abort deadlines.
    pub fn tick(&self, now: Instant) {
        self.clock.set(now);
        self.service.poll(now);
        let presenters: Vec<Rc<FilmPresenter>> =
            self.presenters.borrow().values().cloned().collect();
        for presenter in presenters {
            presenter.tick(now);
        }
    }

    // --- Introspection (embedder and tests) --------------------------------

    pub fn presenter_count(&self) -> usize {
        self.presenters.borrow().len()
    }

    pub fn presenter(&self, film_id: FilmId) -> Option<Rc<FilmPresenter>> {
        self.presenters.borrow().get(&film_id).cloned()
    }

    pub fn current_sort(&self) -> SortType {
        self.sort_type.get()
    }

    pub fn is_show_more_rendered(&self) -> bool {
        self.show_more_view.borrow().is_some()
    }

    /// The filter the empty state was rendered for, when shown.
    pub fn empty_state_filter(&self) -> Option<FilterType> {
        self.empty_view.borrow().as_ref().map(|view| view.filter())
    }

    /// The film whose popup currently holds the global slot.
    pub fn active_popup(&self) -> Option<FilmId> {
        self.popup.active()
    }

    pub fn show_more_view(&self) -> Option<Rc<ShowMoreView>> {
        self.show_more_view.borrow().clone()
    }

    pub fn sort_view(&self) -> Option<Rc<SortBarView>> {
        self.sort_view.borrow().clone()
    }

    // --- Model event routing ------------------------------------------------

    fn handle_films_event(self: &Rc<Self>, update: UpdateType, film: &Film) {
        match update {
            UpdateType::Patch => {
                let presenter = self.presenters.borrow().get(&film.id).cloned();
                if let Some(presenter) = presenter {
                    presenter.init(film.clone());
                }
            }
            UpdateType::Minor | UpdateType::Major => self.rebuild(update),
        }
    }

    fn handle_filter_event(self: &Rc<Self>, update: UpdateType) {
        match update {
            // A filter switch is structural; nothing to patch in place.
            UpdateType::Patch => {}
            UpdateType::Minor | UpdateType::Major => self.rebuild(update),
        }
    }

    fn rebuild(self: &Rc<Self>, update: UpdateType) {
        let full_reset = update == UpdateType::Major;
        self.clear_board(full_reset, full_reset);
        if full_reset {
            self.popup.clear_restore();
        }
        self.render_board();
    }

    fn handle_comments_event(&self, event: &CommentsEvent) {
        if let CommentsEvent::Loaded { film_id } = event {
            let presenter = self.presenters.borrow().get(film_id).cloned();
            if let Some(presenter) = presenter {
                presenter.handle_comments_loaded();
            }
        }
    }

    // --- View action routing ------------------------------------------------

    fn handle_view_action(self: &Rc<Self>, action: ViewAction) {
        match action {
            ViewAction::UpdateFilm { update, film } => {
                if let Err(err) = self.films_model.update_film(update, film) {
                    tracing::warn!(error = %err, "film update rejected");
                }
            }
            ViewAction::LoadComments { film_id } => {
                self.submit_request(ServiceRequest::Load { film_id });
            }
            ViewAction::AddComment { film_id, draft } => {
                self.submit_request(ServiceRequest::Add { film_id, draft });
            }
            ViewAction::DeleteComment {
                film_id,
                comment_id,
            } => {
                self.submit_request(ServiceRequest::Delete {
                    film_id,
                    comment_id,
                });
            }
        }
    }

    fn submit_request(self: &Rc<Self>, request: ServiceRequest) {
        let film_id = match &request {
            ServiceRequest::Load { film_id }
            | ServiceRequest::Add { film_id, .. }
            | ServiceRequest::Delete { film_id, .. } => *film_id,
        };
        let weak = Rc::downgrade(self);
        self.service.submit(
            self.clock.get(),
            request,
            Box::new(move |outcome| {
                if let Some(board) = weak.upgrade() {
                    board.handle_service_outcome(film_id, outcome);
                }
            }),
        );
    }

    /// Shared comment-mutation completion path.
    ///
    /// Successes land in the models regardless of whether the popup (or
    /// even the presenter) still exists — the request was fire-and-forget.
    /// The optimistic-state UI update is applied only when a current
    /// presenter is found, and dropped silently otherwise.
    fn handle_service_outcome(
        self: &Rc<Self>,
        film_id: FilmId,
        outcome: Result<ServiceResponse, ServiceError>,
    ) {
        match outcome {
            Ok(ServiceResponse::Loaded { film_id, comments }) => {
                self.comments_model.set_comments(film_id, comments);
            }
            Ok(ServiceResponse::Added { film_id, comment }) => {
                self.confirm_presenter(film_id);
                if let Err(err) =
                    self.comments_model
                        .add_comment(UpdateType::Minor, film_id, comment)
                {
                    tracing::warn!(error = %err, "saved comment could not land in the cache");
                }
                self.bump_comment_count(film_id);
            }
            Ok(ServiceResponse::Deleted {
                film_id,
                comment_id,
            }) => {
                self.confirm_presenter(film_id);
                if let Err(err) =
                    self.comments_model
                        .delete_comment(UpdateType::Minor, film_id, comment_id)
                {
                    tracing::warn!(error = %err, "deleted comment was already gone from the cache");
                }
                self.bump_comment_count(film_id);
            }
            Err(error) => {
                let presenter = self.presenters.borrow().get(&film_id).cloned();
                match presenter {
                    Some(presenter) => presenter.abort_mutation(self.clock.get()),
                    None => {
                        tracing::debug!(error = %error, film = film_id.0, "stale failure dropped");
                    }
                }
            }
        }
    }

    fn confirm_presenter(&self, film_id: FilmId) {
        let presenter = self.presenters.borrow().get(&film_id).cloned();
        match presenter {
            Some(presenter) => presenter.confirm_mutation(),
            None => tracing::debug!(film = film_id.0, "stale confirmation dropped"),
        }
    }

    /// Re-derive the denormalized count on the film card after a comment
    /// mutation. Triggers the `Minor` rebuild that refreshes the board.
    fn bump_comment_count(&self, film_id: FilmId) {
        let Some(film) = self.films_model.get(film_id) else {
            tracing::warn!(film = film_id.0, "comment count bump for an unknown film");
            return;
        };
        let count = self.comments_model.comments(film_id).len() as u32;
        if let Err(err) = self
            .films_model
            .update_film(UpdateType::Minor, film.with_comments_number(count))
        {
            tracing::warn!(error = %err, "comment count bump rejected");
        }
    }

    // --- Mode coordination ---------------------------------------------------

    /// A presenter is about to open its popup: every sibling resets first,
    /// so at most one popup is open board-wide.
    fn handle_mode_change(&self) {
        let presenters: Vec<Rc<FilmPresenter>> =
            self.presenters.borrow().values().cloned().collect();
        for presenter in presenters {
            presenter.reset_view();
        }
    }

    // --- Sort ----------------------------------------------------------------

    fn handle_sort_change(self: &Rc<Self>, sort: SortType) {
        if self.sort_type.get() == sort {
            return;
        }
        self.sort_type.set(sort);
        self.clear_board(true, false);
        self.render_board();
    }

    // --- Render / clear ------------------------------------------------------

    fn render_sort(self: &Rc<Self>) {
        let sort = SortBarView::new(&self.doc, self.sort_type.get());
        let weak = Rc::downgrade(self);
        sort.set_change_handler(Rc::new(move |sort_type| {
            if let Some(board) = weak.upgrade() {
                board.handle_sort_change(sort_type);
            }
        }));
        render_view(&self.doc, self.board_view.node(), sort.as_ref(), Position::BeforeBegin);
        *self.sort_view.borrow_mut() = Some(sort);
    }

    fn render_film(self: &Rc<Self>, film: Film) {
        let weak = Rc::downgrade(self);
        let dispatch = Rc::new(move |action| {
            if let Some(board) = weak.upgrade() {
                board.handle_view_action(action);
            }
        });
        let weak = Rc::downgrade(self);
        let mode_change = Rc::new(move || {
            if let Some(board) = weak.upgrade() {
                board.handle_mode_change();
            }
        });

        let presenter = FilmPresenter::new(
            &self.doc,
            self.list_container.node(),
            &self.comments_model,
            &self.filter_model,
            &self.popup,
            dispatch,
            mode_change,
            film.clone(),
        );
        presenter.init(film.clone());
        self.presenters.borrow_mut().insert(film.id, presenter);
    }

    fn render_show_more(self: &Rc<Self>) {
        let view = ShowMoreView::new(&self.doc);
        let weak = Rc::downgrade(self);
        view.set_click_handler(Rc::new(move || {
            if let Some(board) = weak.upgrade() {
                board.handle_show_more();
            }
        }));
        render_view(&self.doc, self.list_container.node(), view.as_ref(), Position::AfterEnd);
        *self.show_more_view.borrow_mut() = Some(view);
    }

    fn handle_show_more(self: &Rc<Self>) {
        let films = self.films();
        let film_count = films.len();
        let rendered = self.rendered_count.get();
        let new_rendered = film_count.min(rendered + PAGE_SIZE);

        for film in &films[rendered..new_rendered] {
            self.render_film(film.clone());
        }
        self.rendered_count.set(new_rendered);
        tracing::debug!(rendered = new_rendered, total = film_count, "page revealed");

        if new_rendered >= film_count {
            let view = self.show_more_view.borrow_mut().take();
            if let Some(view) = view {
                remove_view(&self.doc, view.as_ref());
            }
        }
    }

    /// Drain every presenter (each closes its popup and detaches its card),
    /// drop the controls, and reset or clamp pagination.
    fn clear_board(&self, reset_rendered_count: bool, reset_sort: bool) {
        let film_count = self.films().len();

        let drained: Vec<Rc<FilmPresenter>> = {
            let mut presenters = self.presenters.borrow_mut();
            let drained = presenters.values().cloned().collect();
            presenters.clear();
            drained
        };
        for presenter in drained {
            presenter.destroy();
        }

        let sort = self.sort_view.borrow_mut().take();
        if let Some(sort) = sort {
            remove_view(&self.doc, sort.as_ref());
        }
        let empty = self.empty_view.borrow_mut().take();
        if let Some(empty) = empty {
            remove_view(&self.doc, empty.as_ref());
        }
        let more = self.show_more_view.borrow_mut().take();
        if let Some(more) = more {
            remove_view(&self.doc, more.as_ref());
        }

        if reset_rendered_count {
            self.rendered_count.set(PAGE_SIZE);
        } else {
            self.rendered_count
                .set(self.rendered_count.get().min(film_count));
        }
        if reset_sort {
            self.sort_type.set(SortType::Default);
        }
    }

    fn render_board(self: &Rc<Self>) {
        let films = self.films();
        let film_count = films.len();

        if film_count == 0 {
            let empty = EmptyBoardView::new(&self.doc, self.filter_model.filter());
            render_view(
                &self.doc,
                self.film_container.node(),
                empty.as_ref(),
                Position::BeforeEnd,
            );
            *self.empty_view.borrow_mut() = Some(empty);
            tracing::debug!(filter = ?self.filter_model.filter(), "board is empty");
            self.maybe_restore_popup();
            return;
        }

        self.render_sort();
        render_view(
            &self.doc,
            self.film_container.node(),
            self.list_container.as_ref(),
            Position::BeforeEnd,
        );

        let visible = film_count.min(self.rendered_count.get());
        for film in films.iter().take(visible) {
            self.render_film(film.clone());
        }
        if film_count > self.rendered_count.get() {
            self.render_show_more();
        }

        self.maybe_restore_popup();
    }

    /// After a rebuild, re-open the popup whose state a destroyed presenter
    /// parked — if its film is still on the board. Otherwise the state is
    /// dropped with the film.
    fn maybe_restore_popup(self: &Rc<Self>) {
        let Some(restore) = self.popup.take_restore() else {
            return;
        };
        let presenter = self.presenters.borrow().get(&restore.film_id).cloned();
        match presenter {
            Some(presenter) => presenter.show_popup(Some(restore)),
            None => {
                tracing::debug!(film = restore.film_id.0, "popup state dropped with its film");
            }
        }
    }
}
