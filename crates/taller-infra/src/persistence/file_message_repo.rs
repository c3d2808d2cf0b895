//! Messages table (`mensajes.csv`)

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};

use taller_domain::model::{Message, MessageDraft};
use taller_domain::repository::MessageRepository;
use taller_store::{Edit, Row, SchemaStatus, Table};
use taller_types::{format_flag, parse_flag, Error};

use crate::tables::MESSAGES;

pub struct FileMessageRepository {
    table: Table,
}

impl FileMessageRepository {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            table: Table::new(path, &MESSAGES),
        }
    }

    pub fn ensure_schema(&self) -> Result<SchemaStatus, Error> {
        Ok(self.table.ensure_schema()?)
    }
}

fn from_row(row: &Row) -> Option<Message> {
    let id = row.get(0).parse().ok()?;
    let fecha = DateTime::parse_from_rfc3339(row.get(5))
        .ok()?
        .with_timezone(&Utc);
    Some(Message {
        id,
        remitente: row.get(1).to_string(),
        destinatario: row.get(2).to_string(),
        asunto: row.get(3).to_string(),
        mensaje: row.get(4).to_string(),
        fecha,
        leido: parse_flag(row.get(6)),
        borrado_remitente: parse_flag(row.get(7)),
        borrado_destinatario: parse_flag(row.get(8)),
    })
}

fn to_fields(msg: &Message) -> Vec<String> {
    vec![
        msg.id.to_string(),
        msg.remitente.clone(),
        msg.destinatario.clone(),
        msg.asunto.clone(),
        msg.mensaje.clone(),
        msg.fecha.to_rfc3339_opts(SecondsFormat::Millis, true),
        format_flag(msg.leido).to_string(),
        format_flag(msg.borrado_remitente).to_string(),
        format_flag(msg.borrado_destinatario).to_string(),
    ]
}

impl MessageRepository for FileMessageRepository {
    fn find_all(&self) -> Result<Vec<Message>, Error> {
        Ok(self.table.load()?.iter().filter_map(from_row).collect())
    }

    fn insert(&self, draft: MessageDraft, sent_at: DateTime<Utc>) -> Result<Message, Error> {
        let mut stored = None;
        self.table.append_with(|rows| {
            let id = rows
                .iter()
                .filter_map(|row| row.get(0).parse::<u64>().ok())
                .max()
                .map_or(1, |max| max + 1);
            let msg = draft.into_message(id, sent_at);
            let fields = to_fields(&msg);
            stored = Some(msg);
            Ok::<_, Error>(fields)
        })?;
        stored.ok_or_else(|| Error::Task("message was not stored".into()))
    }

    fn update(
        &self,
        id: u64,
        edit: &mut dyn FnMut(&mut Message) -> Result<bool, Error>,
    ) -> Result<Option<Message>, Error> {
        self.table.modify(|rows| {
            let found = rows
                .iter()
                .enumerate()
                .find_map(|(idx, row)| from_row(row).filter(|m| m.id == id).map(|m| (idx, m)));
            let Some((idx, original)) = found else {
                return Ok(Edit::Unchanged(None));
            };

            let mut msg = original.clone();
            if !edit(&mut msg)? {
                rows.remove(idx);
                return Ok(Edit::Changed(Some(msg)));
            }
            if msg == original {
                return Ok(Edit::Unchanged(Some(msg)));
            }
            rows[idx] = Row::new(to_fields(&msg));
            Ok(Edit::Changed(Some(msg)))
        })
    }
}
