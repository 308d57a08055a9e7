//! User-facing console text.
//!
//! Every line the binary shows a user is a [`Message`] variant, so wording
//! lives in one place ([`display`]) and the output macros in [`macros`]
//! decide where it goes.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
