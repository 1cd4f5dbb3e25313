//! Easing functions, phase timing, and piecewise progress curves.

pub mod curve;
pub mod ease;
pub mod timer;
