// Scoring — how strongly a text leans towards each stored theme.

pub mod matcher;

pub use matcher::{score, ScoreResult, ThemeScore};
