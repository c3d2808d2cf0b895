//! Use cases behind the HTTP endpoints

pub mod auth_service;
pub mod client_service;
pub mod message_service;
pub mod quote_service;
pub mod vehicle_service;

use std::sync::Arc;

pub use auth_service::{AccountUpdate, AuthService, Credentials, Registration};
pub use client_service::{ClientService, NewClient};
pub use message_service::MessageService;
pub use quote_service::QuoteService;
pub use vehicle_service::VehicleService;

use taller_domain::repository::{FilterCatalogRepository, PriceListRepository};

use crate::config::Config;
use crate::repository::Repositories;

/// All services of one running instance
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthService>,
    pub clients: Arc<ClientService>,
    pub vehicles: Arc<VehicleService>,
    pub messages: Arc<MessageService>,
    pub quotes: Arc<QuoteService>,
}

impl Services {
    pub fn new(config: &Config, repos: &Repositories) -> Self {
        let auth = Arc::new(AuthService::new(
            repos.users.clone(),
            config.registration_key.clone(),
        ));
        let price_list = repos
            .price_list
            .clone()
            .map(|p| p as Arc<dyn PriceListRepository>);
        let filter_catalog = repos
            .filter_catalog
            .clone()
            .map(|c| c as Arc<dyn FilterCatalogRepository>);

        Self {
            clients: Arc::new(ClientService::new(repos.clients.clone(), auth.clone())),
            vehicles: Arc::new(VehicleService::new(repos.vehicles.clone(), auth.clone())),
            messages: Arc::new(MessageService::new(
                repos.messages.clone(),
                repos.users.clone(),
                auth.clone(),
            )),
            quotes: Arc::new(
                QuoteService::new(
                    price_list,
                    config.price_list.oil_category.clone(),
                    config.price_list.accessories_category.clone(),
                )
                .with_filter_catalog(filter_catalog),
            ),
            auth,
        }
    }
}
