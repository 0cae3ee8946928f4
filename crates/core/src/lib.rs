//! Questline domain logic.
//!
//! Pure game rules (reward catalog, badge ladder, attempt state machine,
//! edit-lock) plus [`service::QuestService`], which runs them over any
//! [`store::QuestStore`]. No database or HTTP code lives here.

pub mod achievement;
pub mod attempt;
pub mod badge_ladder;
pub mod edit_lock;
pub mod error;
pub mod guess;
pub mod profile;
pub mod quest;
pub mod reward_catalog;
pub mod sequencer;
pub mod service;
pub mod store;
pub mod types;
