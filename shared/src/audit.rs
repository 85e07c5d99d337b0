use bytes::{Buf, BytesMut};
use log::debug;
use std::fmt;
use std::io::{Error, ErrorKind};
use std::str;
use tokio_util::codec::{Decoder, Encoder};

use crate::vehicle::Category;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Action {
    Entry,
    Exit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Entry => f.write_str("Entry"),
            Action::Exit => f.write_str("Exit"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AuditEvent {
    pub action: Action,
    pub ticket_id: u64,
    pub category: Category,
    pub license_plate: String,
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidData, msg.into())
}

fn parse_line(line: &str) -> Result<AuditEvent, Error> {
    let (action, rest) = line
        .split_once(": Ticket ID ")
        .ok_or_else(|| invalid(format!("missing ticket in audit line: {}", line)))?;
    let action = match action {
        "Entry" => Action::Entry,
        "Exit" => Action::Exit,
        other => return Err(invalid(format!("unknown audit action: {}", other))),
    };

    let (ticket, rest) = rest
        .split_once(", ")
        .ok_or_else(|| invalid(format!("missing vehicle in audit line: {}", line)))?;
    let ticket_id: u64 = ticket
        .parse()
        .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

    let (category, plate) = rest
        .split_once(" with license plate ")
        .ok_or_else(|| invalid(format!("missing plate in audit line: {}", line)))?;
    let category: Category = category
        .parse()
        .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

    Ok(AuditEvent {
        action,
        ticket_id,
        category,
        license_plate: plate.to_string(),
    })
}

/// Reads back `Entry: Ticket ID 3, Car with license plate CAR123` lines.
pub struct AuditDecoder {}

impl Decoder for AuditDecoder {
    type Item = AuditEvent;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(end) = src.iter().position(|b| *b == b'\n') else {
            return Ok(None);
        };

        let line = match str::from_utf8(&src[..end]) {
            Ok(s) => s.trim_end_matches('\r').to_string(),
            Err(e) => return Err(Error::new(ErrorKind::InvalidData, e)),
        };
        src.advance(end + 1);
        debug!("audit line: {}", line);

        parse_line(&line).map(Some)
    }
}

pub struct AuditEncoder {}

impl Encoder<AuditEvent> for AuditEncoder {
    type Error = Error;

    fn encode(&mut self, item: AuditEvent, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = format!(
            "{}: Ticket ID {}, {} with license plate {}\n",
            item.action, item.ticket_id, item.category, item.license_plate
        );
        dst.reserve(line.len());
        dst.extend_from_slice(line.as_bytes());
        Ok(())
    }
}
