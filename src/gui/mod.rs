mod app;

pub use app::{looks_non_english, KokoroApp};
