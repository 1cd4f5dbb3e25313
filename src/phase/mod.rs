//! Phase state machine driving the intro lifecycle.

pub mod controller;
