//! Filter selection from the vehicle catalog

use std::collections::{BTreeSet, HashSet};

use crate::model::filter::same;
use crate::model::{FilterApplication, FilterChoice, FilterKind, FilterOption, FilterSelection, PriceItem};

/// Distinct non-empty values, sorted
pub fn distinct_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Makes in the catalog
pub fn makes(rows: &[FilterApplication]) -> Vec<String> {
    distinct_values(rows.iter().map(|r| r.make.as_str()))
}

/// Models, optionally of one make
pub fn models(rows: &[FilterApplication], make: Option<&str>) -> Vec<String> {
    distinct_values(
        rows.iter()
            .filter(|r| make.map_or(true, |m| same(&r.make, m)))
            .map(|r| r.model.as_str()),
    )
}

/// Engines, optionally of one make and model
pub fn engines(rows: &[FilterApplication], make: Option<&str>, model: Option<&str>) -> Vec<String> {
    distinct_values(
        rows.iter()
            .filter(|r| make.map_or(true, |m| same(&r.make, m)))
            .filter(|r| model.map_or(true, |m| same(&r.model, m)))
            .map(|r| r.engine.as_str()),
    )
}

/// Candidates for one element
///
/// Rows without any code are skipped and repeated code pairs collapse. The
/// first row carrying both brands' codes is preferred, else the first left.
pub fn choose_filter(rows: &[&FilterApplication], kind: FilterKind) -> FilterChoice {
    let mut seen = HashSet::new();
    let candidates: Vec<&FilterApplication> = rows
        .iter()
        .copied()
        .filter(|r| same(&r.element, kind.element()))
        .filter(|r| r.has_man_code() || r.has_wix_code())
        .filter(|r| seen.insert((r.man_code.trim(), r.wix_code.trim())))
        .collect();

    if candidates.is_empty() {
        return FilterChoice::default();
    }
    let principal = candidates
        .iter()
        .position(|r| r.has_man_code() && r.has_wix_code())
        .unwrap_or(0);

    let option = |r: &FilterApplication| FilterOption {
        codigo_man: r.man_code.trim().to_string(),
        codigo_wix: r.wix_code.trim().to_string(),
        articulo: None,
    };
    FilterChoice {
        principal: Some(option(candidates[principal])),
        extras: candidates
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != principal)
            .map(|(_, r)| option(r))
            .collect(),
    }
}

/// Filters of a vehicle, `None` when the catalog does not list it
pub fn select_filters(
    rows: &[FilterApplication],
    make: &str,
    model: &str,
    engine: &str,
) -> Option<FilterSelection> {
    let vehicle: Vec<&FilterApplication> =
        rows.iter().filter(|r| r.is_vehicle(make, model, engine)).collect();
    let first = vehicle.first()?;

    let mut selection = FilterSelection {
        fuel: first.fuel.trim().to_string(),
        ..FilterSelection::default()
    };
    for kind in FilterKind::ALL {
        *selection.choice_mut(kind) = choose_filter(&vehicle, kind);
    }
    Some(selection)
}

/// Attach the price list article of every option, by Man code then Wix code
pub fn attach_prices(selection: &mut FilterSelection, items: &[PriceItem]) {
    let find = |code: &str| {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        items.iter().find(|i| i.code.trim().eq_ignore_ascii_case(code)).cloned()
    };
    for kind in FilterKind::ALL {
        for option in selection.choice_mut(kind).options_mut() {
            option.articulo = find(&option.codigo_man).or_else(|| find(&option.codigo_wix));
        }
    }
}
