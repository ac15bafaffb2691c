//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `order` - Order message formatting and the submission state machine
//! - `assist` - Shopping assistant texts and direct-contact escalation

pub mod assist;
pub mod order;

pub use assist::{AssistKind, AssistOutcome, AssistPanel, ContactButton};
pub use order::{OrderError, OrderForm, SubmissionPhase, SubmissionState};
