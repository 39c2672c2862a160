pub mod config;
pub mod frame;
pub mod renderer;
pub mod source;
pub mod surface;

pub mod app;
