//! confquiz-client — Quiz service integrations.
//!
//! Implements the `QuizService` trait over HTTP, loads client
//! configuration, and provides an in-memory mock service for tests.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{load_config, load_config_from, ConfquizConfig};
pub use http::HttpQuizService;
pub use mock::MockQuizService;
