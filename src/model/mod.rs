//! Model layer - centralized state management
//!
//! - `Entry` - A customer record as served by the API
//! - `EntryStore` - Fetched list, loading/error flags and search query
//! - `ModalStack` - Modal overlay management

pub mod entry;
pub mod modal;
pub mod store;

pub use entry::{Entry, EntryId};
pub use store::{DisplayState, EntryStore};
