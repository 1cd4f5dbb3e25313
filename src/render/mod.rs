//! CPU rasterization: layer planning and the vello_cpu scene painter.

pub mod cpu;
pub mod frame;
pub mod layers;
