pub mod config;
pub mod markup;
pub mod preview;
pub mod rng;
pub mod ui;
