//! Ratatui front end: a product table, a status footer, and single-key
//! commands that hand work to the controller's background threads.

mod app;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
