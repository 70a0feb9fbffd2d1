pub mod app;
pub mod sketch_view;
pub mod toolbar;

pub use app::{App, AppProps};
