//! Driven playback: the intro session, frame schedulers, and frame sinks.

pub mod intro;
pub mod scheduler;
pub mod sink;
