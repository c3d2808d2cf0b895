//! Infrastructure layer: table files and spreadsheet exports

pub mod filter_catalog;
pub mod persistence;
pub mod price_list;
pub mod sheet;
pub mod tables;

pub use filter_catalog::{FileFilterCatalogRepository, FilterCatalogLayout};
pub use persistence::{
    FileClientRepository, FileMessageRepository, FileUserRepository, FileVehicleRepository,
};
pub use price_list::{FilePriceListRepository, PriceListLayout};
pub use sheet::SheetError;
