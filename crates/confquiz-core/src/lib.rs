//! confquiz-core — Quiz session lifecycle, answer records, and scoring.
//!
//! This crate defines the data model, the session state store and
//! controller, and the aggregation logic that the rest of confquiz builds
//! on. It performs no I/O; the external service is reached through the
//! [`traits::QuizService`] trait.

pub mod aggregate;
pub mod answer;
pub mod controller;
pub mod error;
pub mod model;
pub mod options;
pub mod store;
pub mod traits;

pub use controller::{ControllerState, SessionController, SessionOutcome};
pub use error::{ControllerError, ServiceError};
