//! Procedural scene state: eye proportions, dust particles, vein bed.

pub mod eye;
pub mod geometry;
pub mod particles;
pub mod veins;
