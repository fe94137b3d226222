use serde::Serialize;

use crate::models::Movie;
use crate::providers::{summarize, WatchSummary};
use crate::rating::{quantize, render_stars, Star, STAR_SLOTS};
use crate::session::{SessionState, Status};

/// Everything the flip card needs, already decided. The presentation layer
/// renders this as-is.
#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub status: Status,
    pub revealed: bool,
    pub error: Option<String>,
    pub movie: MovieCard,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieCard {
    pub title: String,
    pub overview: String,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub score: f32,
    pub score_label: String,
    pub stars: [Star; STAR_SLOTS],
    pub star_glyphs: String,
    pub how_to_watch: WatchSummary,
}

impl CardView {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            status: state.status(),
            revealed: state.revealed(),
            error: state.error_message().map(str::to_string),
            movie: MovieCard::from_movie(state.movie()),
        }
    }
}

impl MovieCard {
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            poster_url: movie.poster_url(),
            release_date: movie.formatted_release_date(),
            score: movie.vote_average,
            score_label: movie.score_label(),
            stars: quantize(movie.vote_average),
            star_glyphs: render_stars(movie.vote_average),
            how_to_watch: summarize(movie.watch_providers.as_ref()),
        }
    }
}
