//! External service interactions
//!
//! - Fetching the customer list over HTTP
//! - Running fetches in the background and delivering their results

pub mod fetch_runner;
pub mod fetcher;

pub use fetch_runner::FetchRunner;
pub use fetcher::{EntryFetcher, HttpEntryFetcher, ENTRIES_PATH};
