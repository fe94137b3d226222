use serde::Serialize;

pub const STAR_SLOTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Star {
    Full,
    Half,
    Empty,
}

impl Star {
    pub fn glyph(self) -> &'static str {
        match self {
            Star::Full => "★",
            Star::Half => "⯪",
            Star::Empty => "☆",
        }
    }
}

/// Maps a 0-10 score onto five star slots.
///
/// The score is halved onto a 0-5 scale. The integer part gives full stars and
/// a remainder of at least 0.5 adds one half star; the rest are empty. Output
/// is always exactly [`STAR_SLOTS`] long, even for out-of-range input.
pub fn quantize(score: f32) -> [Star; STAR_SLOTS] {
    let half_units = if score.is_nan() {
        0.0
    } else {
        (score / 2.0).clamp(0.0, STAR_SLOTS as f32)
    };
    let full = half_units.floor() as usize;
    let has_half = half_units - half_units.floor() >= 0.5;

    let mut stars = [Star::Empty; STAR_SLOTS];
    for slot in stars.iter_mut().take(full) {
        *slot = Star::Full;
    }
    if has_half && full < STAR_SLOTS {
        stars[full] = Star::Half;
    }
    stars
}

pub fn render_stars(score: f32) -> String {
    quantize(score).iter().map(|s| s.glyph()).collect()
}
