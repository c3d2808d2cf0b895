//! Persistence implementations
//!
//! Each repository owns one [`taller_store::Table`]; the table lock makes
//! every read-modify-write of a file atomic within the process.

mod file_client_repo;
mod file_message_repo;
mod file_user_repo;
mod file_vehicle_repo;

pub use file_client_repo::FileClientRepository;
pub use file_message_repo::FileMessageRepository;
pub use file_user_repo::FileUserRepository;
pub use file_vehicle_repo::FileVehicleRepository;
