use serde::{Deserialize, Serialize};

/// One article of the price list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceItem {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precioUnidad")]
    pub unit_price: f64,
    #[serde(rename = "existencia")]
    pub stock: String,
    #[serde(rename = "categoria")]
    pub category: String,
}

/// A cart line as sent by the client
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequestLine {
    pub codigo: String,
    pub cantidad: f64,
}

/// A priced quote line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub codigo: String,
    pub descripcion: String,
    pub cantidad: f64,
    pub precio_unidad: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub lineas: Vec<QuoteLine>,
    pub total: f64,
}
