//! Domain model types

pub mod client;
pub mod filter;
pub mod message;
pub mod quote;
pub mod user;
pub mod vehicle;

pub use client::{Client, ClientChanges, ClientRecord};
pub use filter::{FilterApplication, FilterChoice, FilterKind, FilterOption, FilterSelection};
pub use message::{Mailbox, Message, MessageDraft, ReadFilter};
pub use quote::{PriceItem, Quote, QuoteLine, QuoteRequestLine};
pub use user::{User, UserChanges, UserSummary};
pub use vehicle::{NewVehicle, Vehicle, VehicleChanges};
