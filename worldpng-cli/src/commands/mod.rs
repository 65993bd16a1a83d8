pub mod distribution;
pub mod render;
