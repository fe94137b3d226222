//! Movie shown before the first fetch, so the card has something to render.
use crate::models::{Movie, Provider, WatchAvailability};
use chrono::NaiveDate;

pub fn placeholder_movie() -> Movie {
    Movie {
        id: 27205,
        title: "Inception".to_string(),
        overview: "Cobb, a skilled thief who commits corporate espionage by infiltrating the subconscious of his targets is offered a chance to regain his old life as payment for a task considered to be impossible: \"inception\", the implantation of another person's idea into a target's subconscious.".to_string(),
        poster_path: "/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg".to_string(),
        release_date: NaiveDate::from_ymd_opt(2010, 7, 15),
        vote_average: 8.4,
        watch_providers: Some(WatchAvailability {
            link: Some("https://www.themoviedb.org/movie/27205-inception/watch".to_string()),
            flatrate: vec![Provider::new("Netflix"), Provider::new("HBO Max")],
            rent: vec![Provider::new("Apple TV"), Provider::new("Amazon Video")],
            buy: vec![Provider::new("Google Play Movies"), Provider::new("YouTube")],
            ads: Vec::new(),
        }),
    }
}
