//! Price list queries, filter lookups and quotes

use std::sync::Arc;

use taller_domain::model::{FilterSelection, PriceItem, Quote, QuoteRequestLine};
use taller_domain::repository::{FilterCatalogRepository, PriceListRepository};
use taller_domain::service::filters::{engines, makes, models};
use taller_domain::service::{attach_prices, build_quote, search_items, select_filters};
use taller_types::{Error, Result};
use tracing::debug;

pub struct QuoteService {
    price_list: Option<Arc<dyn PriceListRepository>>,
    filter_catalog: Option<Arc<dyn FilterCatalogRepository>>,
    oil_category: String,
    accessories_category: String,
}

impl QuoteService {
    pub fn new(
        price_list: Option<Arc<dyn PriceListRepository>>,
        oil_category: String,
        accessories_category: String,
    ) -> Self {
        Self {
            price_list,
            filter_catalog: None,
            oil_category,
            accessories_category,
        }
    }

    pub fn with_filter_catalog(mut self, catalog: Option<Arc<dyn FilterCatalogRepository>>) -> Self {
        self.filter_catalog = catalog;
        self
    }

    fn filter_catalog(&self) -> Result<&dyn FilterCatalogRepository> {
        self.filter_catalog
            .as_deref()
            .ok_or_else(|| Error::not_found("Catálogo de filtros no configurado"))
    }

    fn price_list(&self) -> Result<&dyn PriceListRepository> {
        self.price_list
            .as_deref()
            .ok_or_else(|| Error::not_found("Lista de precios no configurada"))
    }

    pub fn lookup(&self, code: &str) -> Result<Option<PriceItem>> {
        if code.trim().is_empty() {
            return Err(Error::validation("Falta el código"));
        }
        self.price_list()?.find_by_code(code)
    }

    pub fn search(&self, query: &str, category: Option<&str>) -> Result<Vec<PriceItem>> {
        let items = self.price_list()?.find_all()?;
        Ok(search_items(&items, query, category).into_iter().cloned().collect())
    }

    pub fn oils(&self) -> Result<Vec<PriceItem>> {
        self.price_list()?.find_by_category(&self.oil_category)
    }

    pub fn accessories(&self) -> Result<Vec<PriceItem>> {
        self.price_list()?.find_by_category(&self.accessories_category)
    }

    pub fn catalog_makes(&self) -> Result<Vec<String>> {
        Ok(makes(&self.filter_catalog()?.find_all()?))
    }

    pub fn catalog_models(&self, make: Option<&str>) -> Result<Vec<String>> {
        Ok(models(&self.filter_catalog()?.find_all()?, non_empty(make)))
    }

    pub fn catalog_engines(&self, make: Option<&str>, model: Option<&str>) -> Result<Vec<String>> {
        let rows = self.filter_catalog()?.find_all()?;
        Ok(engines(&rows, non_empty(make), non_empty(model)))
    }

    /// Filters of a vehicle, each option priced when the price list has it
    pub fn filters_for(&self, make: &str, model: &str, engine: &str) -> Result<FilterSelection> {
        if [make, model, engine].iter().any(|v| v.trim().is_empty()) {
            return Err(Error::validation("Faltan marca, modelo o motor"));
        }
        let rows = self.filter_catalog()?.find_for_vehicle(make, model, engine)?;
        let mut selection = select_filters(&rows, make, model, engine)
            .ok_or_else(|| Error::not_found("Vehículo no encontrado en el catálogo"))?;

        match &self.price_list {
            Some(price_list) => attach_prices(&mut selection, &price_list.find_all()?),
            None => debug!("no price list, filter options left unpriced"),
        }
        Ok(selection)
    }

    pub fn quote(&self, lines: &[QuoteRequestLine]) -> Result<Quote> {
        if lines.is_empty() {
            return Err(Error::validation("El presupuesto no tiene items"));
        }
        let items = self.price_list()?.find_all()?;
        build_quote(&items, lines)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
