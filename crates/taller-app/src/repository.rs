//! Repository adapters for persistence layer

use std::sync::Arc;

use taller_infra::{
    FileClientRepository, FileFilterCatalogRepository, FileMessageRepository,
    FilePriceListRepository, FileUserRepository, FileVehicleRepository,
};
use taller_types::Result;

use crate::config::Config;

/// Open file-based user repository
pub fn open_user_repo(config: &Config) -> Result<FileUserRepository> {
    Ok(FileUserRepository::open(config.data_path(&config.files.users)?))
}

/// Open file-based client repository
pub fn open_client_repo(config: &Config) -> Result<FileClientRepository> {
    Ok(FileClientRepository::open(config.data_path(&config.files.clients)?))
}

/// Open file-based vehicle repository
pub fn open_vehicle_repo(config: &Config) -> Result<FileVehicleRepository> {
    Ok(FileVehicleRepository::open(config.data_path(&config.files.vehicles)?))
}

/// Open file-based message repository
pub fn open_message_repo(config: &Config) -> Result<FileMessageRepository> {
    Ok(FileMessageRepository::open(config.data_path(&config.files.messages)?))
}

/// Open the price list, if one is configured
pub fn open_price_list(config: &Config) -> Result<Option<FilePriceListRepository>> {
    let Some(path) = &config.price_list.path else {
        return Ok(None);
    };
    let path = config.data_path(path)?;
    Ok(Some(FilePriceListRepository::new(
        path,
        config.price_list.layout.clone(),
    )))
}

/// Open the vehicle to filter catalog, if one is configured
pub fn open_filter_catalog(config: &Config) -> Result<Option<FileFilterCatalogRepository>> {
    let Some(path) = &config.filter_catalog.path else {
        return Ok(None);
    };
    Ok(Some(FileFilterCatalogRepository::new(
        config.data_path(path)?,
        config.filter_catalog.layout.clone(),
    )))
}

/// Every repository of one data directory
///
/// One instance per process: each table lock lives in its repository.
pub struct Repositories {
    pub users: Arc<FileUserRepository>,
    pub clients: Arc<FileClientRepository>,
    pub vehicles: Arc<FileVehicleRepository>,
    pub messages: Arc<FileMessageRepository>,
    pub price_list: Option<Arc<FilePriceListRepository>>,
    pub filter_catalog: Option<Arc<FileFilterCatalogRepository>>,
}

impl Repositories {
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self {
            users: Arc::new(open_user_repo(config)?),
            clients: Arc::new(open_client_repo(config)?),
            vehicles: Arc::new(open_vehicle_repo(config)?),
            messages: Arc::new(open_message_repo(config)?),
            price_list: open_price_list(config)?.map(Arc::new),
            filter_catalog: open_filter_catalog(config)?.map(Arc::new),
        })
    }
}
