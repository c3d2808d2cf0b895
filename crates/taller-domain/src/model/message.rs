use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Internal message between two users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: u64,
    pub remitente: String,
    pub destinatario: String,
    pub asunto: String,
    pub mensaje: String,
    pub fecha: DateTime<Utc>,
    pub leido: bool,
    pub borrado_remitente: bool,
    pub borrado_destinatario: bool,
}

impl Message {
    pub fn is_party(&self, username: &str) -> bool {
        self.remitente == username || self.destinatario == username
    }

    /// Mark the message deleted on every side `username` belongs to
    pub fn delete_for(&mut self, username: &str) {
        if self.remitente == username {
            self.borrado_remitente = true;
        }
        if self.destinatario == username {
            self.borrado_destinatario = true;
        }
    }

    /// Both parties deleted it; the row can go
    pub fn is_purgeable(&self) -> bool {
        self.borrado_remitente && self.borrado_destinatario
    }

    /// Case-insensitive free-text match over the visible fields
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.remitente, &self.destinatario, &self.asunto, &self.mensaje]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// A message before it gets an id and a timestamp
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub remitente: String,
    pub destinatario: String,
    pub asunto: String,
    pub mensaje: String,
}

impl MessageDraft {
    pub fn into_message(self, id: u64, fecha: DateTime<Utc>) -> Message {
        Message {
            id,
            remitente: self.remitente,
            destinatario: self.destinatario,
            asunto: self.asunto,
            mensaje: self.mensaje,
            fecha,
            leido: false,
            borrado_remitente: false,
            borrado_destinatario: false,
        }
    }
}

/// Which side of the conversation a listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mailbox {
    Inbox,
    Sent,
}

/// Read-state filter of the inbox
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadFilter {
    #[default]
    #[serde(rename = "todos")]
    All,
    #[serde(rename = "no-leidos")]
    Unread,
    #[serde(rename = "leidos")]
    Read,
}

impl ReadFilter {
    pub fn accepts(self, message: &Message) -> bool {
        match self {
            ReadFilter::All => true,
            ReadFilter::Unread => !message.leido,
            ReadFilter::Read => message.leido,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(from: &str, to: &str) -> Message {
        MessageDraft {
            remitente: from.into(),
            destinatario: to.into(),
            asunto: "Turno".into(),
            mensaje: "Cambio de aceite el lunes".into(),
        }
        .into_message(1, Utc::now())
    }

    #[test]
    fn test_delete_both_sides_purges() {
        let mut msg = draft("ana", "beto");
        msg.delete_for("ana");
        assert!(msg.borrado_remitente);
        assert!(!msg.is_purgeable());
        msg.delete_for("beto");
        assert!(msg.is_purgeable());
    }

    #[test]
    fn test_note_to_self_purges_at_once() {
        let mut msg = draft("ana", "ana");
        msg.delete_for("ana");
        assert!(msg.is_purgeable());
    }

    #[test]
    fn test_text_filter() {
        let msg = draft("ana", "beto");
        assert!(msg.matches_text("ACEITE"));
        assert!(msg.matches_text(""));
        assert!(!msg.matches_text("frenos"));
    }

    #[test]
    fn test_read_filter_wire_names() {
        let f: ReadFilter = serde_json::from_str("\"no-leidos\"").unwrap();
        assert_eq!(f, ReadFilter::Unread);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(draft("ana", "beto")).unwrap();
        assert_eq!(json["borradoRemitente"], false);
        assert_eq!(json["leido"], false);
    }
}
