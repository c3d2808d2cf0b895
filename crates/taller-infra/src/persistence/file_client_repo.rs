//! Clients table (`clientes.csv`)
//!
//! A client has no stored key: its id is the 1-based position of its line
//! among the data lines, so removing a client renumbers the ones after it.

use std::path::PathBuf;

use taller_domain::model::{Client, ClientChanges, ClientRecord};
use taller_domain::repository::ClientRepository;
use taller_store::{Edit, Row, SchemaStatus, Table};
use taller_types::Error;

use crate::tables::CLIENTS;

pub struct FileClientRepository {
    table: Table,
}

impl FileClientRepository {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            table: Table::new(path, &CLIENTS),
        }
    }

    pub fn ensure_schema(&self) -> Result<SchemaStatus, Error> {
        Ok(self.table.ensure_schema()?)
    }
}

fn from_row(row: &Row) -> Client {
    Client {
        name: row.get(0).to_string(),
        email: row.get(1).to_string(),
        phone: row.get(2).to_string(),
    }
}

fn to_row(client: &Client) -> Row {
    Row::new(vec![
        client.name.clone(),
        client.email.clone(),
        client.phone.clone(),
    ])
}

/// Row index of a positional id, if in range
fn index_of(rows: &[Row], id: usize) -> Option<usize> {
    (1..=rows.len()).contains(&id).then(|| id - 1)
}

impl ClientRepository for FileClientRepository {
    fn find_all(&self) -> Result<Vec<ClientRecord>, Error> {
        Ok(self
            .table
            .load()?
            .iter()
            .enumerate()
            .map(|(idx, row)| ClientRecord {
                id: idx + 1,
                client: from_row(row),
            })
            .collect())
    }

    fn insert(&self, client: &Client) -> Result<usize, Error> {
        Ok(self
            .table
            .append(&[&client.name, &client.email, &client.phone])?)
    }

    fn update(&self, id: usize, changes: &ClientChanges) -> Result<Option<ClientRecord>, Error> {
        self.table.modify(|rows| {
            let Some(idx) = index_of(rows, id) else {
                return Ok(Edit::Unchanged(None));
            };
            let client = changes.apply(&from_row(&rows[idx]))?;
            rows[idx] = to_row(&client);
            Ok(Edit::Changed(Some(ClientRecord { id, client })))
        })
    }

    fn remove(&self, id: usize) -> Result<Option<Client>, Error> {
        self.table.modify(|rows| {
            Ok::<_, Error>(match index_of(rows, id) {
                Some(idx) => Edit::Changed(Some(from_row(&rows.remove(idx)))),
                None => Edit::Unchanged(None),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn client(name: &str, email: &str) -> Client {
        Client {
            name: name.into(),
            email: email.into(),
            phone: String::new(),
        }
    }

    #[test]
    fn test_create_then_list_assigns_line_id() {
        let dir = tempdir().unwrap();
        let repo = FileClientRepository::open(dir.path().join("clientes.csv"));
        assert_eq!(repo.insert(&client("Ana Gomez", "ana@mail.com")).unwrap(), 1);
        assert_eq!(repo.insert(&client("Luis Paz", "luis@mail.com")).unwrap(), 2);

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].id, 2);
        assert_eq!(all[1].client.name, "Luis Paz");
    }

    #[test]
    fn test_update_leaves_other_lines_byte_identical() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clientes.csv");
        let original = "NombreCliente,EmailCliente,Telefono\n\
                        Ana Gomez ,ana@mail.com,  555\n\
                        Luis Paz,luis@mail.com,777\n\
                        Juan Diaz\tjuan@mail.com\t999\n";
        fs::write(&path, original).unwrap();
        let repo = FileClientRepository::open(&path);

        let changes = ClientChanges {
            phone: Some("123".into()),
            ..Default::default()
        };
        let updated = repo.update(2, &changes).unwrap().unwrap();
        assert_eq!(updated.client.phone, "123");

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "Ana Gomez ,ana@mail.com,  555");
        assert_eq!(lines[2], "Luis Paz,luis@mail.com,123");
        assert_eq!(lines[3], "Juan Diaz\tjuan@mail.com\t999");
    }

    #[test]
    fn test_update_out_of_range() {
        let dir = tempdir().unwrap();
        let repo = FileClientRepository::open(dir.path().join("clientes.csv"));
        repo.insert(&client("Ana", "a@b")).unwrap();
        assert!(repo.update(0, &ClientChanges::default()).unwrap().is_none());
        assert!(repo.update(2, &ClientChanges::default()).unwrap().is_none());
    }

    #[test]
    fn test_search_by_name_is_case_insensitive() {
        let dir = tempdir().unwrap();
        let repo = FileClientRepository::open(dir.path().join("clientes.csv"));
        repo.insert(&client("Ana GOMEZ", "ana@mail.com")).unwrap();
        repo.insert(&client("Luis Paz", "luis@mail.com")).unwrap();
        repo.insert(&client("Marta Gomez", "marta@mail.com")).unwrap();

        let hits = repo.find_by_name("gOmEz").unwrap();
        let ids: Vec<usize> = hits.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(repo.find_by_email("luis@mail.com").unwrap()[0].id, 2);
    }

    #[test]
    fn test_remove_shifts_ids() {
        let dir = tempdir().unwrap();
        let repo = FileClientRepository::open(dir.path().join("clientes.csv"));
        repo.insert(&client("Ana", "a@x")).unwrap();
        repo.insert(&client("Luis", "l@x")).unwrap();

        let removed = repo.remove(1).unwrap().unwrap();
        assert_eq!(removed.name, "Ana");
        let all = repo.find_all().unwrap();
        assert_eq!(all[0].id, 1);
        assert_eq!(all[0].client.name, "Luis");
        assert!(repo.remove(5).unwrap().is_none());
    }
}
