//! Users table (`usuarios.csv`)

use std::path::PathBuf;

use taller_domain::model::User;
use taller_domain::repository::UserRepository;
use taller_store::{Edit, Row, SchemaStatus, Table};
use taller_types::{format_flag, parse_flag, Error};

use crate::tables::USERS;

pub struct FileUserRepository {
    table: Table,
}

impl FileUserRepository {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            table: Table::new(path, &USERS),
        }
    }

    pub fn ensure_schema(&self) -> Result<SchemaStatus, Error> {
        Ok(self.table.ensure_schema()?)
    }
}

fn from_row(row: &Row) -> Option<User> {
    let username = row.get(0);
    if username.is_empty() || row.len() < 2 {
        return None;
    }
    Some(User {
        username: username.to_string(),
        password: row.get(1).to_string(),
        suspended: parse_flag(row.get(2)),
        admin: parse_flag(row.get(3)),
    })
}

fn to_fields(user: &User) -> Vec<String> {
    vec![
        user.username.clone(),
        user.password.clone(),
        format_flag(user.suspended).to_string(),
        format_flag(user.admin).to_string(),
    ]
}

fn to_row(user: &User) -> Row {
    Row::new(to_fields(user))
}

fn position(rows: &[Row], username: &str) -> Option<usize> {
    rows.iter()
        .position(|row| from_row(row).is_some_and(|u| u.username == username))
}

impl UserRepository for FileUserRepository {
    fn find_all(&self) -> Result<Vec<User>, Error> {
        Ok(self.table.load()?.iter().filter_map(from_row).collect())
    }

    fn insert(&self, user: &User) -> Result<(), Error> {
        self.table.append_with(|rows| match position(rows, &user.username) {
            Some(_) => Err(Error::Conflict("Usuario ya existe".into())),
            None => Ok(to_fields(user)),
        })?;
        Ok(())
    }

    fn update(&self, user: &User) -> Result<bool, Error> {
        self.table.modify(|rows| {
            Ok::<_, Error>(match position(rows, &user.username) {
                Some(idx) => {
                    rows[idx] = to_row(user);
                    Edit::Changed(true)
                }
                None => Edit::Unchanged(false),
            })
        })
    }

    fn remove(&self, username: &str) -> Result<bool, Error> {
        self.table.modify(|rows| {
            Ok::<_, Error>(match position(rows, username) {
                Some(idx) => {
                    rows.remove(idx);
                    Edit::Changed(true)
                }
                None => Edit::Unchanged(false),
            })
        })
    }

    fn update_each(&self, edit: &mut dyn FnMut(&mut User) -> bool) -> Result<usize, Error> {
        self.table.modify(|rows| {
            let mut changed = 0;
            for row in rows.iter_mut() {
                let Some(mut user) = from_row(row) else {
                    continue;
                };
                if edit(&mut user) {
                    *row = to_row(&user);
                    changed += 1;
                }
            }
            Ok::<_, Error>(if changed > 0 {
                Edit::Changed(changed)
            } else {
                Edit::Unchanged(0)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_insert_and_find() {
        let dir = tempdir().unwrap();
        let repo = FileUserRepository::open(dir.path().join("usuarios.csv"));
        repo.insert(&User::new("ana", "hash")).unwrap();

        let found = repo.find_by_username("ana").unwrap().unwrap();
        assert_eq!(found.password, "hash");
        assert!(!found.admin);
        assert!(repo.find_by_username("ANA").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let dir = tempdir().unwrap();
        let repo = FileUserRepository::open(dir.path().join("usuarios.csv"));
        repo.insert(&User::new("ana", "a")).unwrap();
        let err = repo.insert(&User::new("ana", "b")).unwrap_err();
        assert_eq!(err.kind(), taller_types::ErrorKind::Conflict);
        assert_eq!(repo.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_reads_legacy_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("usuarios.csv");
        fs::write(&path, "username,password,suspended,admin\nana,x,si,1\nbeto,y\n,z\n").unwrap();
        let repo = FileUserRepository::open(&path);

        let users = repo.find_all().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users[0].suspended && users[0].admin);
        assert!(!users[1].suspended);
    }

    #[test]
    fn test_update_each_counts_changes() {
        let dir = tempdir().unwrap();
        let repo = FileUserRepository::open(dir.path().join("usuarios.csv"));
        repo.insert(&User::new("ana", "a")).unwrap();
        repo.insert(&User::new("beto", "b")).unwrap();

        let changed = repo
            .update_each(&mut |u| {
                if u.username == "beto" {
                    u.admin = true;
                    true
                } else {
                    false
                }
            })
            .unwrap();
        assert_eq!(changed, 1);
        assert!(repo.find_by_username("beto").unwrap().unwrap().admin);
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let repo = FileUserRepository::open(dir.path().join("usuarios.csv"));
        repo.insert(&User::new("ana", "a")).unwrap();
        assert!(repo.remove("ana").unwrap());
        assert!(!repo.remove("ana").unwrap());
    }
}
