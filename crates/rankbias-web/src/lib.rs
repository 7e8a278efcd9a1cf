mod server;

pub use server::{AppState, router};
