use serde::{Deserialize, Serialize};

use super::quote::PriceItem;

/// Marker the catalog uses for a missing code
pub const NO_CODE: &str = "#N/A";

/// One row of the vehicle to filter catalog
///
/// A vehicle (make, model, engine) has one row per filter element and
/// candidate part, with the part numbers of two filter brands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterApplication {
    #[serde(rename = "marca")]
    pub make: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "motor")]
    pub engine: String,
    #[serde(rename = "elemento")]
    pub element: String,
    #[serde(rename = "codigoMan")]
    pub man_code: String,
    #[serde(rename = "codigoWix")]
    pub wix_code: String,
    #[serde(rename = "combustible")]
    pub fuel: String,
}

impl FilterApplication {
    pub fn has_man_code(&self) -> bool {
        is_code(&self.man_code)
    }

    pub fn has_wix_code(&self) -> bool {
        is_code(&self.wix_code)
    }

    pub fn is_vehicle(&self, make: &str, model: &str, engine: &str) -> bool {
        same(&self.make, make) && same(&self.model, model) && same(&self.engine, engine)
    }
}

fn is_code(code: &str) -> bool {
    let code = code.trim();
    !code.is_empty() && code != NO_CODE
}

pub(crate) fn same(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Filter elements a quote asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Oil,
    Air,
    Fuel,
    Cabin,
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [FilterKind::Oil, FilterKind::Air, FilterKind::Fuel, FilterKind::Cabin];

    /// Value of the catalog's element column
    pub fn element(self) -> &'static str {
        match self {
            FilterKind::Oil => "Filtro de aceite",
            FilterKind::Air => "Filtro de aire",
            FilterKind::Fuel => "Filtro de combustible",
            FilterKind::Cabin => "Filtro de aire de cabina",
        }
    }
}

/// A candidate part with its price list article, when found
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOption {
    pub codigo_man: String,
    pub codigo_wix: String,
    pub articulo: Option<PriceItem>,
}

/// Preferred part for one element plus the alternatives
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterChoice {
    pub principal: Option<FilterOption>,
    pub extras: Vec<FilterOption>,
}

impl FilterChoice {
    pub fn options_mut(&mut self) -> impl Iterator<Item = &mut FilterOption> {
        self.principal.iter_mut().chain(self.extras.iter_mut())
    }
}

/// Filters of one vehicle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSelection {
    #[serde(rename = "tipoCombustible")]
    pub fuel: String,
    #[serde(rename = "aceite")]
    pub oil: FilterChoice,
    #[serde(rename = "aire")]
    pub air: FilterChoice,
    #[serde(rename = "combustible")]
    pub fuel_filter: FilterChoice,
    #[serde(rename = "habitaculo")]
    pub cabin: FilterChoice,
}

impl FilterSelection {
    pub fn choice_mut(&mut self, kind: FilterKind) -> &mut FilterChoice {
        match kind {
            FilterKind::Oil => &mut self.oil,
            FilterKind::Air => &mut self.air,
            FilterKind::Fuel => &mut self.fuel_filter,
            FilterKind::Cabin => &mut self.cabin,
        }
    }
}
