//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod customers;
pub mod help_dialog;
pub mod layout;
pub mod quit_dialog;

pub use customers::{draw_customers_screen, CustomersComponent};
pub use help_dialog::HelpDialog;
pub use layout::{calculate_customers_layout, centered_popup};
pub use quit_dialog::QuitDialog;
