//! Quote arithmetic

use crate::model::{PriceItem, Quote, QuoteLine, QuoteRequestLine};
use taller_types::{Error, Result};

/// Price a cart against the price list
///
/// Lines with a zero quantity are skipped; a negative quantity or an unknown
/// code fails the whole quote.
pub fn build_quote(items: &[PriceItem], request: &[QuoteRequestLine]) -> Result<Quote> {
    let mut lineas = Vec::with_capacity(request.len());
    for line in request {
        if line.cantidad == 0.0 {
            continue;
        }
        if !line.cantidad.is_finite() || line.cantidad < 0.0 {
            return Err(Error::validation(format!(
                "Cantidad inválida para {}",
                line.codigo
            )));
        }
        let code = line.codigo.trim();
        let item = items
            .iter()
            .find(|i| i.code.eq_ignore_ascii_case(code))
            .ok_or_else(|| Error::not_found(format!("Código no encontrado: {code}")))?;
        lineas.push(QuoteLine {
            codigo: item.code.clone(),
            descripcion: item.description.clone(),
            cantidad: line.cantidad,
            precio_unidad: item.unit_price,
            total: round_cents(line.cantidad * item.unit_price),
        });
    }
    let total = round_cents(lineas.iter().map(|l| l.total).sum());
    Ok(Quote { lineas, total })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
