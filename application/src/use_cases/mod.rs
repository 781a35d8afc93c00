//! Use cases (application services)

pub mod create_session;
pub mod register_participant;
pub mod results;
pub mod submit_vote;
pub mod transition_phase;
pub mod update_option_text;
