use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

use crate::error::DiscoveryError;
use crate::fallback::placeholder_movie;
use crate::models::Movie;
use crate::tmdb::DiscoveryApi;

/// The reveal flag only exists while idle, so a card can never be flipped
/// over a fetch in progress or an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle { movie: Movie, revealed: bool },
    Loading { previous: Movie },
    Error { message: String, previous: Movie },
}

impl SessionState {
    pub fn movie(&self) -> &Movie {
        match self {
            SessionState::Idle { movie, .. } => movie,
            SessionState::Loading { previous } => previous,
            SessionState::Error { previous, .. } => previous,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            SessionState::Idle { .. } => Status::Idle,
            SessionState::Loading { .. } => Status::Loading,
            SessionState::Error { .. } => Status::Error,
        }
    }

    pub fn revealed(&self) -> bool {
        matches!(self, SessionState::Idle { revealed: true, .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Loading,
    Error,
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Updated,
    Failed(DiscoveryError),
    /// Another refresh was already running; nothing was fetched.
    Ignored,
}

pub struct RecommendationSession {
    shared: Arc<Shared>,
}

struct Shared {
    discovery: Arc<dyn DiscoveryApi>,
    state: Mutex<SessionState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves into `Loading` unless a fetch is already running.
    fn begin_refresh(&self) -> bool {
        let mut state = self.lock();
        if let SessionState::Loading { .. } = *state {
            return false;
        }
        let previous = state.movie().clone();
        *state = SessionState::Loading { previous };
        true
    }

    fn commit(&self, result: Result<Movie, DiscoveryError>) -> RefreshOutcome {
        let mut state = self.lock();
        let previous = state.movie().clone();
        match result {
            Ok(movie) => {
                info!("Now showing '{}'", movie.title);
                *state = SessionState::Idle {
                    movie,
                    revealed: false,
                };
                RefreshOutcome::Updated
            }
            Err(err) => {
                warn!("Refresh failed, keeping '{}': {}", previous.title, err);
                *state = SessionState::Error {
                    message: err.to_string(),
                    previous,
                };
                RefreshOutcome::Failed(err)
            }
        }
    }
}

/// Lives inside the fetch task. If the task unwinds before committing, the
/// session leaves `Loading` with the previous movie instead of staying stuck.
struct LoadingGuard {
    shared: Arc<Shared>,
    armed: bool,
}

impl LoadingGuard {
    fn commit(mut self, result: Result<Movie, DiscoveryError>) -> RefreshOutcome {
        self.armed = false;
        self.shared.commit(result)
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if self.armed {
            self.shared.commit(Err(DiscoveryError::NetworkFailure(
                "refresh was interrupted".to_string(),
            )));
        }
    }
}

impl RecommendationSession {
    pub fn new(discovery: Arc<dyn DiscoveryApi>) -> Self {
        Self::with_movie(discovery, placeholder_movie())
    }

    pub fn with_movie(discovery: Arc<dyn DiscoveryApi>, movie: Movie) -> Self {
        Self {
            shared: Arc::new(Shared {
                discovery,
                state: Mutex::new(SessionState::Idle {
                    movie,
                    revealed: false,
                }),
            }),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.shared.lock().clone()
    }

    pub fn current_movie(&self) -> Movie {
        self.shared.lock().movie().clone()
    }

    pub fn status(&self) -> Status {
        self.shared.lock().status()
    }

    pub fn revealed(&self) -> bool {
        self.shared.lock().revealed()
    }

    pub fn error_message(&self) -> Option<String> {
        self.shared.lock().error_message().map(str::to_string)
    }

    /// Fetches a new recommendation and replaces the current movie with it.
    ///
    /// Only one refresh runs at a time: calling this while a fetch is in
    /// flight returns [`RefreshOutcome::Ignored`] without touching the network.
    /// On failure the previous movie stays on display under the error.
    ///
    /// The fetch runs on its own task, so dropping the returned future (a
    /// client hanging up mid-request) does not abort it; the result is still
    /// committed to the session.
    pub async fn refresh(&self) -> RefreshOutcome {
        if !self.shared.begin_refresh() {
            debug!("Refresh already in flight, ignoring");
            return RefreshOutcome::Ignored;
        }

        let guard = LoadingGuard {
            shared: Arc::clone(&self.shared),
            armed: true,
        };
        let task = tokio::spawn(async move {
            let result = guard.shared.discovery.fetch_random().await;
            guard.commit(result)
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("Refresh task died: {}", err);
                RefreshOutcome::Failed(DiscoveryError::NetworkFailure(
                    "refresh was interrupted".to_string(),
                ))
            }
        }
    }

    /// Flips the card. Returns the new reveal value, or `None` when the
    /// session is loading or showing an error.
    pub fn toggle_reveal(&self) -> Option<bool> {
        let mut state = self.shared.lock();
        match &mut *state {
            SessionState::Idle { revealed, .. } => {
                *revealed = !*revealed;
                Some(*revealed)
            }
            _ => None,
        }
    }
}
