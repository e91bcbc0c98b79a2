// State management module
// Holds the store and clock handles shared across handlers

pub mod app_state;

pub use app_state::AppState;
