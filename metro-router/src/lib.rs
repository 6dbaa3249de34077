//! Metro route planner.
//!
//! Answers "what are all the fastest ways from this station to that one?"
//! over a metro network whose travel times depend on the time of day.

pub mod domain;
pub mod logging;
pub mod planner;
pub mod timings;
pub mod topology;
pub mod web;
