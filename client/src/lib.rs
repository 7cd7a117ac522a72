mod app;
mod dom;
mod net;
mod render;
mod state;

pub use app::{clear_identity, run, set_identity};
