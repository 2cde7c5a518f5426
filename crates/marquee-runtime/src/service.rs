#![forbid(unsafe_code)]

//! Simulated comment backend.
//!
//! Load/add/delete requests queue here with a fixed simulated latency and
//! resolve when [`poll`](CommentService::poll) observes that their deadline
//! has passed. Outcomes are deterministic: loads always succeed, and
//! mutations fail exactly when a failure has been scripted with
//! [`fail_next`](CommentService::fail_next).
//!
//! The service is fire-and-forget: nothing cancels a queued request, and a
//! resolution finding no popup to update is the caller's problem to drop
//! silently.

use chrono::{DateTime, TimeZone, Utc};
use marquee_model::{Comment, CommentDraft, CommentId, FilmId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Simulated network latency applied to every request.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

/// Author stamped on comments saved through this service.
const SERVICE_AUTHOR: &str = "Tim Macoveev";

/// A queued request.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceRequest {
    Load { film_id: FilmId },
    Add { film_id: FilmId, draft: CommentDraft },
    Delete {
        film_id: FilmId,
        comment_id: CommentId,
    },
}

impl ServiceRequest {
    fn is_mutation(&self) -> bool {
        !matches!(self, Self::Load { .. })
    }
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResponse {
    Loaded {
        film_id: FilmId,
        comments: Vec<Comment>,
    },
    Added { film_id: FilmId, comment: Comment },
    Deleted {
        film_id: FilmId,
        comment_id: CommentId,
    },
}

/// Simulated backend failure. Only mutations fail; recovery is the abort
/// shake, never a propagated error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    Rejected,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected => write!(f, "the comment backend rejected the request"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Completion callback for a request.
pub type ServiceCallback = Box<dyn FnOnce(Result<ServiceResponse, ServiceError>)>;

struct PendingOp {
    request: ServiceRequest,
    ready_at: Instant,
    callback: ServiceCallback,
}

/// The queue plus the backend's own copy of the comments.
pub struct CommentService {
    latency: Duration,
    store: RefCell<HashMap<FilmId, Vec<Comment>>>,
    pending: RefCell<Vec<PendingOp>>,
    fail_budget: Cell<u32>,
    next_comment_id: Cell<u32>,
    wall_clock: Cell<DateTime<Utc>>,
}

impl CommentService {
    /// Service over the given comment fixtures, with the default latency.
    pub fn new(fixtures: HashMap<FilmId, Vec<Comment>>) -> Rc<Self> {
        Self::with_latency(fixtures, DEFAULT_LATENCY)
    }

    pub fn with_latency(fixtures: HashMap<FilmId, Vec<Comment>>, latency: Duration) -> Rc<Self> {
        let next_comment_id = fixtures
            .values()
            .flatten()
            .map(|comment| comment.id.0 + 1)
            .max()
            .unwrap_or(0);
        Rc::new(Self {
            latency,
            store: RefCell::new(fixtures),
            pending: RefCell::new(Vec::new()),
            fail_budget: Cell::new(0),
            next_comment_id: Cell::new(next_comment_id),
            wall_clock: Cell::new(
                Utc.with_ymd_and_hms(2022, 1, 1, 12, 0, 0)
                    .single()
                    .expect("fixed epoch"),
            ),
        })
    }

    /// Script the next `count` mutations to fail.
    pub fn fail_next(&self, count: u32) {
        self.fail_budget.set(self.fail_budget.get() + count);
    }

    /// Set the timestamp stamped on subsequently saved comments.
    pub fn set_wall_clock(&self, now: DateTime<Utc>) {
        self.wall_clock.set(now);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Queue a request; it resolves once `poll` sees `now + latency` pass.
    pub fn submit(&self, now: Instant, request: ServiceRequest, callback: ServiceCallback) {
        tracing::debug!(request = ?request, "comment request queued");
        self.pending.borrow_mut().push(PendingOp {
            request,
            ready_at: now + self.latency,
            callback,
        });
    }

    /// Resolve every due request, in submission order. Returns how many
    /// resolved. Callbacks run after the queue borrow is released, so they
    /// may submit follow-up requests.
    pub fn poll(&self, now: Instant) -> usize {
        let due: Vec<PendingOp> = {
            let mut pending = self.pending.borrow_mut();
            let mut due = Vec::new();
            let mut index = 0;
            while index < pending.len() {
                if pending[index].ready_at <= now {
                    due.push(pending.remove(index));
                } else {
                    index += 1;
                }
            }
            due
        };

        let resolved = due.len();
        for op in due {
            let outcome = self.resolve(op.request);
            (op.callback)(outcome);
        }
        resolved
    }

    fn resolve(&self, request: ServiceRequest) -> Result<ServiceResponse, ServiceError> {
        if request.is_mutation() && self.fail_budget.get() > 0 {
            self.fail_budget.set(self.fail_budget.get() - 1);
            tracing::debug!(request = ?request, "comment request rejected");
            return Err(ServiceError::Rejected);
        }

        match request {
            ServiceRequest::Load { film_id } => {
                let comments = self
                    .store
                    .borrow()
                    .get(&film_id)
                    .cloned()
                    .unwrap_or_default();
                Ok(ServiceResponse::Loaded { film_id, comments })
            }
            ServiceRequest::Add { film_id, draft } => {
                let id = CommentId(self.next_comment_id.get());
                self.next_comment_id.set(id.0 + 1);
                let comment = Comment {
                    id,
                    film_id,
                    text: draft.text,
                    emoji: draft.emoji.unwrap_or(marquee_model::Emoji::Smile),
                    author: SERVICE_AUTHOR.to_owned(),
                    date: self.wall_clock.get(),
                };
                self.store
                    .borrow_mut()
                    .entry(film_id)
                    .or_default()
                    .push(comment.clone());
                Ok(ServiceResponse::Added { film_id, comment })
            }
            ServiceRequest::Delete {
                film_id,
                comment_id,
            } => {
                if let Some(comments) = self.store.borrow_mut().get_mut(&film_id) {
                    comments.retain(|comment| comment.id != comment_id);
                }
                Ok(ServiceResponse::Deleted {
                    film_id,
                    comment_id,
                })
            }
        }
    }
}
