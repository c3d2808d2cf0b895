//! Client card use cases

use std::sync::Arc;

use tracing::info;

use taller_domain::model::{Client, ClientChanges, ClientRecord};
use taller_domain::repository::ClientRepository;
use taller_domain::service::count_by_surname;
use taller_types::{Error, Result};

use super::auth_service::{AuthService, Credentials};

/// Input of client creation
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

pub struct ClientService {
    clients: Arc<dyn ClientRepository>,
    auth: Arc<AuthService>,
}

impl ClientService {
    pub fn new(clients: Arc<dyn ClientRepository>, auth: Arc<AuthService>) -> Self {
        Self { clients, auth }
    }

    pub fn list(&self) -> Result<Vec<ClientRecord>> {
        self.clients.find_all()
    }

    /// Search by exact email or by name fragment; email wins when both are given
    pub fn search(&self, name: Option<&str>, email: Option<&str>) -> Result<Vec<ClientRecord>> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }
        match (present(name), present(email)) {
            (_, Some(email)) => self.clients.find_by_email(email),
            (Some(name), None) => self.clients.find_by_name(name),
            (None, None) => Ok(Vec::new()),
        }
    }

    pub fn count_by_surname(&self, surname: &str) -> Result<usize> {
        if surname.trim().is_empty() {
            return Ok(0);
        }
        Ok(count_by_surname(&self.clients.find_all()?, surname))
    }

    pub fn create(&self, input: &NewClient) -> Result<usize> {
        let name = input.name.trim();
        let email = input.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(Error::validation("Faltan datos obligatorios"));
        }
        let client = Client {
            name: name.to_string(),
            email: email.to_string(),
            phone: input.phone.as_deref().unwrap_or("").trim().to_string(),
        };
        let id = self.clients.insert(&client)?;
        info!(id, name = %client.name, email = %client.email, "client created");
        Ok(id)
    }

    pub fn update(&self, id: usize, changes: &ClientChanges) -> Result<ClientRecord> {
        let record = self
            .clients
            .update(id, changes)?
            .ok_or_else(|| Error::not_found("Cliente no encontrado"))?;
        info!(id, "client updated");
        Ok(record)
    }

    /// Admin-gated removal; later clients move up one id
    pub fn delete(&self, id: usize, admin: &Credentials) -> Result<Client> {
        let actor = self.auth.require_admin(admin)?;
        let removed = self
            .clients
            .remove(id)?
            .ok_or_else(|| Error::not_found("Cliente no encontrado"))?;
        info!(id, admin = %actor.username, name = %removed.name, "client deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taller_domain::model::User;
    use taller_domain::repository::UserRepository;
    use taller_domain::service::hash_password;
    use taller_infra::{FileClientRepository, FileUserRepository};
    use taller_types::ErrorKind;
    use tempfile::TempDir;

    fn service() -> (TempDir, ClientService) {
        let dir = tempfile::tempdir().unwrap();
        let users = Arc::new(FileUserRepository::open(dir.path().join("usuarios.csv")));
        let mut admin = User::new("admin", hash_password("Admin123").unwrap());
        admin.admin = true;
        users.insert(&admin).unwrap();

        let auth = Arc::new(AuthService::new(users, None));
        let clients = Arc::new(FileClientRepository::open(dir.path().join("clientes.csv")));
        (dir, ClientService::new(clients, auth))
    }

    fn new_client(name: &str, email: &str) -> NewClient {
        NewClient {
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }

    #[test]
    fn test_create_requires_name_and_email() {
        let (_dir, svc) = service();
        let err = svc.create(&new_client("Ana", " ")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(svc.create(&new_client("Ana", "ana@mail.com")).unwrap(), 1);
    }

    #[test]
    fn test_delete_without_admin_leaves_file_unchanged() {
        let (dir, svc) = service();
        svc.create(&new_client("Ana Gomez", "ana@mail.com")).unwrap();
        svc.create(&new_client("Luis Paz", "luis@mail.com")).unwrap();
        let path = dir.path().join("clientes.csv");
        let before = std::fs::read(&path).unwrap();

        let err = svc.delete(1, &Credentials::new("admin", "wrong")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let err = svc.delete(1, &Credentials::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(std::fs::read(&path).unwrap(), before);

        svc.delete(1, &Credentials::new("admin", "Admin123")).unwrap();
        assert_eq!(svc.list().unwrap().len(), 1);
    }

    #[test]
    fn test_search_precedence_and_empty_criteria() {
        let (_dir, svc) = service();
        svc.create(&new_client("Ana Gomez", "ana@mail.com")).unwrap();
        svc.create(&new_client("Luis Gomez", "luis@mail.com")).unwrap();

        assert_eq!(svc.search(Some("GOMEZ"), None).unwrap().len(), 2);
        let by_email = svc.search(Some("gomez"), Some("luis@mail.com")).unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].id, 2);
        assert!(svc.search(None, Some(" ")).unwrap().is_empty());
        assert_eq!(svc.count_by_surname("gomez").unwrap(), 2);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let (_dir, svc) = service();
        let err = svc.update(3, &ClientChanges::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
