//! Accounts: login, registration and the admin-gated user management

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use taller_domain::model::{User, UserChanges, UserSummary};
use taller_domain::repository::UserRepository;
use taller_domain::service::{hash_password, verify_password};
use taller_types::{Error, Result};

/// Username/password pair supplied with a request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

/// Self-service or admin-approved account creation
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub registration_key: Option<String>,
    pub admin: Option<Credentials>,
}

/// Admin edit of an account
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub password: Option<String>,
    pub suspended: Option<bool>,
    pub admin: Option<bool>,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    registration_key: Option<String>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, registration_key: Option<String>) -> Self {
        Self {
            users,
            registration_key: registration_key.filter(|k| !k.is_empty()),
        }
    }

    /// Check credentials and the suspension flag
    ///
    /// Unknown user and wrong password give the same answer.
    pub fn authenticate(&self, creds: &Credentials) -> Result<User> {
        if !creds.is_complete() {
            return Err(Error::unauthorized("Faltan credenciales"));
        }
        let user = self
            .users
            .find_by_username(creds.username.trim())?
            .filter(|u| verify_password(&creds.password, &u.password))
            .ok_or_else(|| Error::unauthorized("Usuario o contraseña incorrectos"))?;
        if user.suspended {
            return Err(Error::Forbidden("Cuenta suspendida".into()));
        }
        Ok(user)
    }

    pub fn login(&self, creds: &Credentials) -> Result<UserSummary> {
        if !creds.is_complete() {
            return Err(Error::validation("Faltan credenciales"));
        }
        match self.authenticate(creds) {
            Ok(user) => {
                info!(username = %user.username, "login");
                Ok(user.summary())
            }
            Err(e) => {
                warn!(username = %creds.username, error = %e, "login rejected");
                Err(e)
            }
        }
    }

    /// Credentials of a non-suspended account with the admin flag
    pub fn require_admin(&self, creds: &Credentials) -> Result<User> {
        let denied = || Error::unauthorized("Credenciales de administrador inválidas");
        if !creds.is_complete() {
            return Err(denied());
        }
        let user = self
            .users
            .find_by_username(creds.username.trim())?
            .filter(|u| u.admin && !u.suspended)
            .filter(|u| verify_password(&creds.password, &u.password))
            .ok_or_else(denied)?;
        Ok(user)
    }

    pub fn register(&self, req: &Registration) -> Result<()> {
        if req.username.trim().is_empty() || req.password.is_empty() {
            return Err(Error::validation("Faltan datos"));
        }

        let key_ok = match (&self.registration_key, &req.registration_key) {
            (Some(expected), Some(given)) => expected == given,
            _ => false,
        };
        if !key_ok {
            match &req.admin {
                Some(admin) if admin.is_complete() => {
                    self.require_admin(admin)?;
                }
                _ if self.registration_key.is_some() => {
                    return Err(Error::unauthorized("Clave de registro inválida"));
                }
                _ => {
                    return Err(Error::unauthorized(
                        "Se requieren credenciales de administrador para crear usuarios",
                    ));
                }
            }
        }

        self.create_user(req.username.trim(), &req.password, false)
    }

    /// Users as listed to any caller (messaging recipients)
    pub fn list_users(&self) -> Result<Vec<UserSummary>> {
        Ok(self.users.find_all()?.iter().map(User::summary).collect())
    }

    pub fn admin_list(&self, admin: &Credentials) -> Result<Vec<UserSummary>> {
        self.require_admin(admin)?;
        self.list_users()
    }

    pub fn admin_create(
        &self,
        admin: &Credentials,
        username: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<()> {
        let actor = self.require_admin(admin)?;
        if username.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("Faltan datos"));
        }
        self.create_user(username.trim(), password, is_admin)?;
        info!(admin = %actor.username, username = %username.trim(), "account created by admin");
        Ok(())
    }

    pub fn admin_update(
        &self,
        admin: &Credentials,
        username: &str,
        update: &AccountUpdate,
    ) -> Result<UserSummary> {
        let actor = self.require_admin(admin)?;
        if username.trim().is_empty() {
            return Err(Error::validation("Falta username"));
        }
        let mut user = self
            .users
            .find_by_username(username.trim())?
            .ok_or_else(|| Error::not_found("Usuario no encontrado"))?;

        let password_hash = match update.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        UserChanges {
            password_hash,
            suspended: update.suspended,
            admin: update.admin,
        }
        .apply(&mut user);

        if !self.users.update(&user)? {
            return Err(Error::not_found("Usuario no encontrado"));
        }
        info!(admin = %actor.username, username = %user.username, "account updated");
        Ok(user.summary())
    }

    pub fn admin_delete(&self, admin: &Credentials, username: &str) -> Result<()> {
        let actor = self.require_admin(admin)?;
        if username.trim().is_empty() {
            return Err(Error::validation("Falta username"));
        }
        if !self.users.remove(username.trim())? {
            return Err(Error::not_found("Usuario no encontrado"));
        }
        info!(admin = %actor.username, username = %username.trim(), "account deleted");
        Ok(())
    }

    fn create_user(&self, username: &str, password: &str, admin: bool) -> Result<()> {
        let mut user = User::new(username, hash_password(password)?);
        user.admin = admin;
        self.users.insert(&user)?;
        info!(username = %username, admin, "account created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taller_infra::FileUserRepository;
    use taller_types::ErrorKind;
    use tempfile::TempDir;

    fn service(key: Option<&str>) -> (TempDir, AuthService) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(FileUserRepository::open(dir.path().join("usuarios.csv")));
        let mut admin = User::new("admin", hash_password("Admin123").unwrap());
        admin.admin = true;
        repo.insert(&admin).unwrap();
        (dir, AuthService::new(repo, key.map(String::from)))
    }

    fn admin() -> Credentials {
        Credentials::new("admin", "Admin123")
    }

    fn registration(username: &str, admin: Option<Credentials>, key: Option<&str>) -> Registration {
        Registration {
            username: username.into(),
            password: "clave1".into(),
            registration_key: key.map(String::from),
            admin,
        }
    }

    #[test]
    fn test_login_ok_and_wrong_password() {
        let (_dir, auth) = service(None);
        let user = auth.login(&admin()).unwrap();
        assert!(user.admin);

        let err = auth.login(&Credentials::new("admin", "nope")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let err = auth.login(&Credentials::new("admin", "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_suspended_login_fails_with_correct_password() {
        let (_dir, auth) = service(None);
        auth.register(&registration("ana", Some(admin()), None)).unwrap();
        auth.admin_update(
            &admin(),
            "ana",
            &AccountUpdate {
                suspended: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        let err = auth.login(&Credentials::new("ana", "clave1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_register_duplicate_is_conflict() {
        let (_dir, auth) = service(None);
        auth.register(&registration("ana", Some(admin()), None)).unwrap();
        let err = auth
            .register(&registration("ana", Some(admin()), None))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_register_needs_key_or_admin() {
        let (_dir, auth) = service(Some("taller2024"));
        let err = auth.register(&registration("ana", None, None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let err = auth
            .register(&registration("ana", None, Some("otra")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        auth.register(&registration("ana", None, Some("taller2024"))).unwrap();
        auth.register(&registration("beto", Some(admin()), None)).unwrap();
        assert!(!auth.login(&Credentials::new("ana", "clave1")).unwrap().admin);
    }

    #[test]
    fn test_non_admin_cannot_manage_users() {
        let (_dir, auth) = service(None);
        auth.register(&registration("ana", Some(admin()), None)).unwrap();
        let ana = Credentials::new("ana", "clave1");
        assert_eq!(auth.admin_list(&ana).unwrap_err().kind(), ErrorKind::Unauthorized);
        assert_eq!(
            auth.admin_delete(&ana, "admin").unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn test_admin_update_password_and_delete() {
        let (_dir, auth) = service(None);
        auth.admin_create(&admin(), "ana", "vieja", false).unwrap();
        auth.admin_update(
            &admin(),
            "ana",
            &AccountUpdate {
                password: Some("nueva".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(auth.login(&Credentials::new("ana", "nueva")).is_ok());

        auth.admin_delete(&admin(), "ana").unwrap();
        let err = auth.admin_delete(&admin(), "ana").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
