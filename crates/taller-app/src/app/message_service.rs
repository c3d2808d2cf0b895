//! Internal messaging between users

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use taller_domain::model::{Mailbox, Message, MessageDraft, ReadFilter};
use taller_domain::repository::{MessageRepository, UserRepository};
use taller_domain::service::{list_mailbox, unread_count};
use taller_types::{Error, Result};

use super::auth_service::{AuthService, Credentials};

pub struct MessageService {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserRepository>,
    auth: Arc<AuthService>,
}

impl MessageService {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        users: Arc<dyn UserRepository>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self {
            messages,
            users,
            auth,
        }
    }

    pub fn send(
        &self,
        caller: &Credentials,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<Message> {
        let sender = self.auth.authenticate(caller)?;
        let (recipient, subject, body) = (recipient.trim(), subject.trim(), body.trim());
        if recipient.is_empty() || subject.is_empty() || body.is_empty() {
            return Err(Error::validation("Destinatario, asunto y mensaje son obligatorios"));
        }
        if self.users.find_by_username(recipient)?.is_none() {
            return Err(Error::not_found("Destinatario no encontrado"));
        }

        let draft = MessageDraft {
            remitente: sender.username,
            destinatario: recipient.to_string(),
            asunto: subject.to_string(),
            mensaje: body.to_string(),
        };
        let message = self.messages.insert(draft, Utc::now())?;
        info!(id = message.id, from = %message.remitente, to = %message.destinatario, "message sent");
        Ok(message)
    }

    /// Inbox listing with the unread count of the whole inbox
    pub fn inbox(
        &self,
        caller: &Credentials,
        text: Option<&str>,
        filter: ReadFilter,
    ) -> Result<(Vec<Message>, usize)> {
        let user = self.auth.authenticate(caller)?;
        let all = self.messages.find_all()?;
        let unread = unread_count(&all, &user.username);
        let listed = list_mailbox(all, &user.username, Mailbox::Inbox, text, filter);
        Ok((listed, unread))
    }

    pub fn sent(&self, caller: &Credentials, text: Option<&str>) -> Result<Vec<Message>> {
        let user = self.auth.authenticate(caller)?;
        let all = self.messages.find_all()?;
        Ok(list_mailbox(all, &user.username, Mailbox::Sent, text, ReadFilter::All))
    }

    /// Only the recipient can mark a message as read
    pub fn mark_read(&self, caller: &Credentials, id: u64) -> Result<Message> {
        let user = self.auth.authenticate(caller)?;
        self.messages
            .update(id, &mut |msg| {
                if msg.destinatario != user.username || msg.borrado_destinatario {
                    return Err(Error::not_found("Mensaje no encontrado"));
                }
                msg.leido = true;
                Ok(true)
            })?
            .ok_or_else(|| Error::not_found("Mensaje no encontrado"))
    }

    /// Hide the message for the caller; gone for good once both sides deleted it
    pub fn delete(&self, caller: &Credentials, id: u64) -> Result<()> {
        let user = self.auth.authenticate(caller)?;
        let msg = self
            .messages
            .update(id, &mut |msg| {
                if !msg.is_party(&user.username) {
                    return Err(Error::not_found("Mensaje no encontrado"));
                }
                msg.delete_for(&user.username);
                Ok(!msg.is_purgeable())
            })?
            .ok_or_else(|| Error::not_found("Mensaje no encontrado"))?;
        info!(id, username = %user.username, purged = msg.is_purgeable(), "message deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taller_domain::model::User;
    use taller_domain::service::hash_password;
    use taller_infra::{FileMessageRepository, FileUserRepository};
    use taller_types::ErrorKind;
    use tempfile::TempDir;

    fn service() -> (TempDir, MessageService) {
        let dir = tempfile::tempdir().unwrap();
        let users = Arc::new(FileUserRepository::open(dir.path().join("usuarios.csv")));
        for name in ["ana", "beto", "caro"] {
            users
                .insert(&User::new(name, hash_password("pw").unwrap()))
                .unwrap();
        }
        let auth = Arc::new(AuthService::new(users.clone(), None));
        let messages = Arc::new(FileMessageRepository::open(dir.path().join("mensajes.csv")));
        (dir, MessageService::new(messages, users, auth))
    }

    fn creds(name: &str) -> Credentials {
        Credentials::new(name, "pw")
    }

    #[test]
    fn test_send_checks_caller_and_recipient() {
        let (_dir, svc) = service();
        let err = svc
            .send(&Credentials::new("ana", "bad"), "beto", "Hola", "x")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let err = svc.send(&creds("ana"), "nadie", "Hola", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = svc.send(&creds("ana"), "beto", "", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let msg = svc.send(&creds("ana"), "beto", "Hola", "Turno").unwrap();
        assert_eq!(msg.remitente, "ana");
    }

    #[test]
    fn test_inbox_and_mark_read() {
        let (_dir, svc) = service();
        let msg = svc.send(&creds("ana"), "beto", "Hola", "Turno").unwrap();
        svc.send(&creds("caro"), "beto", "Repuesto", "Llego").unwrap();

        let (inbox, unread) = svc.inbox(&creds("beto"), None, ReadFilter::All).unwrap();
        assert_eq!((inbox.len(), unread), (2, 2));

        let err = svc.mark_read(&creds("ana"), msg.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        svc.mark_read(&creds("beto"), msg.id).unwrap();

        let (unread_only, unread) = svc
            .inbox(&creds("beto"), None, ReadFilter::Unread)
            .unwrap();
        assert_eq!((unread_only.len(), unread), (1, 1));
        assert_eq!(unread_only[0].remitente, "caro");
    }

    #[test]
    fn test_delete_both_sides() {
        let (_dir, svc) = service();
        let msg = svc.send(&creds("ana"), "beto", "Hola", "Turno").unwrap();

        let err = svc.delete(&creds("caro"), msg.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        svc.delete(&creds("beto"), msg.id).unwrap();
        assert!(svc.inbox(&creds("beto"), None, ReadFilter::All).unwrap().0.is_empty());
        assert_eq!(svc.sent(&creds("ana"), None).unwrap().len(), 1);

        svc.delete(&creds("ana"), msg.id).unwrap();
        assert!(svc.sent(&creds("ana"), None).unwrap().is_empty());
        let err = svc.delete(&creds("ana"), msg.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
