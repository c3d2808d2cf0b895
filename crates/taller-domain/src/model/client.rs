use serde::{Deserialize, Serialize};

use taller_types::{Error, Result};

/// Customer contact card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "NombreCliente")]
    pub name: String,
    #[serde(rename = "EmailCliente")]
    pub email: String,
    #[serde(rename = "Telefono")]
    pub phone: String,
}

impl Client {
    /// Last whitespace-separated token of the name
    pub fn surname(&self) -> Option<&str> {
        self.name.split_whitespace().last()
    }
}

/// A client together with its positional id (1-based data line)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: usize,
    #[serde(flatten)]
    pub client: Client,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ClientChanges {
    /// Apply onto `client`, rejecting a result without name or email
    pub fn apply(&self, client: &Client) -> Result<Client> {
        let pick = |new: &Option<String>, old: &str| {
            new.as_deref().map(str::trim).unwrap_or(old).to_string()
        };
        let updated = Client {
            name: pick(&self.name, &client.name),
            email: pick(&self.email, &client.email),
            phone: pick(&self.phone, &client.phone),
        };
        if updated.name.is_empty() || updated.email.is_empty() {
            return Err(Error::validation("Nombre y email son obligatorios"));
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> Client {
        Client {
            name: "Ana Gomez".into(),
            email: "ana@mail.com".into(),
            phone: "555".into(),
        }
    }

    #[test]
    fn test_surname() {
        assert_eq!(ana().surname(), Some("Gomez"));
    }

    #[test]
    fn test_changes_keep_missing_fields() {
        let changes = ClientChanges {
            phone: Some(" 777 ".into()),
            ..Default::default()
        };
        let updated = changes.apply(&ana()).unwrap();
        assert_eq!(updated.name, "Ana Gomez");
        assert_eq!(updated.phone, "777");
    }

    #[test]
    fn test_changes_reject_empty_email() {
        let changes = ClientChanges {
            email: Some("  ".into()),
            ..Default::default()
        };
        assert!(changes.apply(&ana()).is_err());
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = ClientRecord { id: 3, client: ana() };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["NombreCliente"], "Ana Gomez");
        assert_eq!(json["Telefono"], "555");
    }
}
