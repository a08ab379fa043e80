//! confquiz-report — Exporting and rendering finished quiz sessions.

pub mod results;
pub mod text;

pub use results::SessionResult;
