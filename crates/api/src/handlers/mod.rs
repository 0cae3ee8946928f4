pub mod attempt;
pub mod profile;
pub mod quest;
