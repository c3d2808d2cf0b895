//! Domain services

pub mod credentials;
pub mod filters;
pub mod mailbox;
pub mod quote;
pub mod search;

pub use credentials::{hash_password, verify_password, PasswordFormat};
pub use filters::{attach_prices, select_filters};
pub use mailbox::{list_mailbox, unread_count};
pub use quote::build_quote;
pub use search::{count_by_surname, search_items};
