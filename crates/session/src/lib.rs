//! Foodshare session layer
//!
//! The state the browser pages keep between requests: who is signed in and
//! the background refresh that keeps that session alive, the donation board
//! with its optimistic claim update, and the donation submission flow. All of
//! it talks to the gateway through [`FoodshareApi`] and moves the user around
//! through a [`Navigator`].

#[macro_use]
extern crate tracing;

pub mod api;
pub mod board;
pub mod donate;
pub mod navigator;
pub mod scheduler;
pub mod session;

pub use api::FoodshareApi;
pub use board::{BoardState, DonationBoard};
pub use donate::{DonationSubmitter, SubmitState};
pub use navigator::{HistoryNavigator, Navigator};
pub use scheduler::ScheduledTask;
pub use session::{AuthSession, LoginOutcome, SessionState, SessionTimings};
