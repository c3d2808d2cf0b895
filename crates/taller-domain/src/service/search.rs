//! Free-text matching helpers

use crate::model::{ClientRecord, PriceItem};

/// Items whose description contains every token of `query`
///
/// Empty query with a category lists the whole category.
pub fn search_items<'a>(
    items: &'a [PriceItem],
    query: &str,
    category: Option<&str>,
) -> Vec<&'a PriceItem> {
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    let category = category.map(str::trim).filter(|c| !c.is_empty());
    if tokens.is_empty() && category.is_none() {
        return Vec::new();
    }

    items
        .iter()
        .filter(|item| category.map_or(true, |c| item.category.trim().eq_ignore_ascii_case(c)))
        .filter(|item| {
            let haystack = format!("{} {}", item.code, item.description).to_lowercase();
            tokens.iter().all(|t| haystack.contains(t.as_str()))
        })
        .collect()
}

/// Clients whose last name token equals `surname`
pub fn count_by_surname(clients: &[ClientRecord], surname: &str) -> usize {
    let surname = surname.trim().to_lowercase();
    if surname.is_empty() {
        return 0;
    }
    clients
        .iter()
        .filter(|r| r.client.surname().map(str::to_lowercase).as_deref() == Some(surname.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Client;

    fn item(code: &str, description: &str, category: &str) -> PriceItem {
        PriceItem {
            code: code.into(),
            description: description.into(),
            unit_price: 1.0,
            stock: String::new(),
            category: category.into(),
        }
    }

    #[test]
    fn test_all_tokens_must_match() {
        let items = vec![
            item("A1", "Aceite Sintetico 5W30 4L", "aceites"),
            item("A2", "Aceite Mineral 20W50 4L", "aceites"),
            item("F1", "Filtro de aceite", "complementos"),
        ];
        let hits = search_items(&items, "aceite 5w30", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "A1");
        assert_eq!(search_items(&items, "aceite", Some("complementos")).len(), 1);
        assert_eq!(search_items(&items, "", Some("ACEITES")).len(), 2);
        assert!(search_items(&items, "  ", None).is_empty());
    }

    #[test]
    fn test_count_by_surname() {
        let rec = |id, name: &str| ClientRecord {
            id,
            client: Client {
                name: name.into(),
                email: "x@y".into(),
                phone: String::new(),
            },
        };
        let clients = vec![rec(1, "Ana Gomez"), rec(2, "Luis GOMEZ"), rec(3, "Gomez Pablo")];
        assert_eq!(count_by_surname(&clients, "gomez"), 2);
        assert_eq!(count_by_surname(&clients, ""), 0);
    }
}
