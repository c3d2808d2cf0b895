//! Startup preparation of the data directory
//!
//! Runs before serving and from `taller migrate`:
//! 1. bring every table file to its current layout
//! 2. seed the bootstrap admin when there is no admin at all
//! 3. give the admin flag to the configured admin names if nobody has it
//! 4. rehash clear-text passwords

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use taller_domain::model::User;
use taller_domain::repository::UserRepository;
use taller_domain::service::{hash_password, PasswordFormat};
use taller_types::Result;

use crate::config::Config;
use crate::repository::Repositories;

#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub table: String,
    pub status: String,
}

/// What bootstrap did
#[derive(Debug, Clone, Default, Serialize)]
pub struct BootstrapReport {
    pub tables: Vec<TableReport>,
    pub seeded_admin: Option<String>,
    pub promoted: Vec<String>,
    pub rehashed: usize,
    /// Accounts whose password was hashed by another tool and cannot log in
    pub unverifiable: Vec<String>,
}

pub fn run(config: &Config, repos: &Repositories) -> Result<BootstrapReport> {
    let mut report = BootstrapReport::default();

    for (table, status) in [
        ("usuarios", repos.users.ensure_schema()?),
        ("clientes", repos.clients.ensure_schema()?),
        ("vehiculos", repos.vehicles.ensure_schema()?),
        ("mensajes", repos.messages.ensure_schema()?),
    ] {
        report.tables.push(TableReport {
            table: table.to_string(),
            status: status.to_string(),
        });
    }

    let users: &dyn UserRepository = &*repos.users;
    report.seeded_admin = seed_admin(config, users)?;
    report.promoted = promote_admins(config, users)?;
    let (rehashed, unverifiable) = rehash_passwords(users)?;
    report.rehashed = rehashed;
    report.unverifiable = unverifiable;

    info!(
        seeded = report.seeded_admin.is_some(),
        promoted = report.promoted.len(),
        rehashed = report.rehashed,
        "bootstrap finished"
    );
    Ok(report)
}

fn seed_admin(config: &Config, users: &dyn UserRepository) -> Result<Option<String>> {
    let Some(seed) = &config.bootstrap_admin else {
        return Ok(None);
    };
    let existing = users.find_all()?;
    let has_admin = existing
        .iter()
        .any(|u| u.admin || config.admin_usernames.contains(&u.username) || u.username == seed.username);
    if has_admin {
        return Ok(None);
    }

    let mut admin = User::new(seed.username.clone(), hash_password(&seed.password)?);
    admin.admin = true;
    users.insert(&admin)?;
    warn!(username = %seed.username, "seeded bootstrap admin account, change its password");
    Ok(Some(seed.username.clone()))
}

fn promote_admins(config: &Config, users: &dyn UserRepository) -> Result<Vec<String>> {
    if users.find_all()?.iter().any(|u| u.admin) {
        return Ok(Vec::new());
    }
    let mut promoted = Vec::new();
    users.update_each(&mut |user| {
        if config.admin_usernames.contains(&user.username) {
            user.admin = true;
            promoted.push(user.username.clone());
            true
        } else {
            false
        }
    })?;
    for name in &promoted {
        info!(username = %name, "granted admin flag");
    }
    Ok(promoted)
}

fn rehash_passwords(users: &dyn UserRepository) -> Result<(usize, Vec<String>)> {
    let mut hashes = HashMap::new();
    let mut unverifiable = Vec::new();
    for user in users.find_all()? {
        match PasswordFormat::detect(&user.password) {
            PasswordFormat::Argon2 => {}
            PasswordFormat::ForeignHash => {
                warn!(username = %user.username, "password hash cannot be verified, reset it");
                unverifiable.push(user.username);
            }
            PasswordFormat::Plaintext if user.password.is_empty() => {}
            PasswordFormat::Plaintext => {
                let hash = hash_password(&user.password)?;
                hashes.insert(user.username, (user.password, hash));
            }
        }
    }
    if hashes.is_empty() {
        return Ok((0, unverifiable));
    }

    // only rows whose password is still the clear text we hashed
    let rehashed = users.update_each(&mut |user| match hashes.get(&user.username) {
        Some((plain, hash)) if *plain == user.password => {
            user.password = hash.clone();
            true
        }
        _ => false,
    })?;
    info!(rehashed, "rehashed clear-text passwords");
    Ok((rehashed, unverifiable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use taller_domain::service::verify_password;
    use taller_store::SchemaStatus;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config, Repositories) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let repos = Repositories::open(&config).unwrap();
        (dir, config, repos)
    }

    #[test]
    fn test_fresh_directory_gets_files_and_admin() {
        let (dir, config, repos) = setup();
        let report = run(&config, &repos).unwrap();

        assert_eq!(report.tables.len(), 4);
        assert!(report
            .tables
            .iter()
            .all(|t| t.status == SchemaStatus::Created.to_string()));
        assert_eq!(report.seeded_admin.as_deref(), Some("admin"));
        let header = std::fs::read_to_string(dir.path().join("vehiculos.csv")).unwrap();
        assert_eq!(header, "Idauto,Patente,Marca,Modelo,Kilometraje,TipoAceite,Fecha\n");

        let admin = repos.users.find_by_username("admin").unwrap().unwrap();
        assert!(admin.admin);
        assert!(verify_password("Admin123", &admin.password));

        let again = run(&config, &repos).unwrap();
        assert!(again.seeded_admin.is_none());
        assert_eq!(again.rehashed, 0);
    }

    #[test]
    fn test_legacy_users_are_promoted_and_rehashed() {
        let (dir, config, repos) = setup();
        std::fs::write(
            dir.path().join("usuarios.csv"),
            "username,password\nAdmin,secreto\nana,clave\nbeto,$2b$10$abcdefghijklmnopqrstuv\n",
        )
        .unwrap();

        let report = run(&config, &repos).unwrap();
        assert!(report.seeded_admin.is_none());
        assert_eq!(report.promoted, vec!["Admin".to_string()]);
        assert_eq!(report.rehashed, 2);
        assert_eq!(report.unverifiable, vec!["beto".to_string()]);

        let ana = repos.users.find_by_username("ana").unwrap().unwrap();
        assert!(ana.password.starts_with("$argon2"));
        assert!(verify_password("clave", &ana.password));
        assert!(!ana.admin);
        assert!(repos.users.find_by_username("Admin").unwrap().unwrap().admin);
    }
}
