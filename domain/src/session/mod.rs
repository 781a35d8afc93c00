//! Session subdomain: the session entity, its phase machine, participants and votes

pub mod entities;
pub mod participant;
pub mod phase;
pub mod vote;
