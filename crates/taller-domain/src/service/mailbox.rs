//! Inbox and sent-box listings

use crate::model::{Mailbox, Message, ReadFilter};

/// Messages of `username` in `mailbox`, newest first
///
/// The read filter only applies to the inbox; the sender's copy has no read
/// state of its own.
pub fn list_mailbox(
    messages: Vec<Message>,
    username: &str,
    mailbox: Mailbox,
    text: Option<&str>,
    filter: ReadFilter,
) -> Vec<Message> {
    let mut out: Vec<Message> = messages
        .into_iter()
        .filter(|m| match mailbox {
            Mailbox::Inbox => {
                m.destinatario == username && !m.borrado_destinatario && filter.accepts(m)
            }
            Mailbox::Sent => m.remitente == username && !m.borrado_remitente,
        })
        .filter(|m| text.map_or(true, |t| m.matches_text(t)))
        .collect();
    out.sort_by(|a, b| b.fecha.cmp(&a.fecha).then(b.id.cmp(&a.id)));
    out
}

/// Unread messages still visible in the inbox of `username`
pub fn unread_count(messages: &[Message], username: &str) -> usize {
    messages
        .iter()
        .filter(|m| m.destinatario == username && !m.borrado_destinatario && !m.leido)
        .count()
}
