//! Framing of messages on the wire.
//!
//! A message is `##` + kind (u16 BE) + payload length (u32 BE) + protobuf payload.
//! Over UDP and USB it is split in 64 bytes reports, each starting with `?`:
//! the first report carries the header, the last one is zero padded.
//! The HTTP bridge instead exchanges the hex of the message without the `##` marker.

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::{
    consts::{MAX_MESSAGE_SIZE, REPORT_SIZE},
    messages::MessageType,
    DeviceMessage, Error, Result,
};

const REPORT_MARKER: u8 = b'?';
const HEADER_MARKER: &[u8; 2] = b"##";

/// Size of kind and length
const HEADER_LEN: usize = 6;

/// A message as it travels on the wire, with its protobuf payload still encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub kind: u16,
    pub payload: Vec<u8>,
}

impl RawMessage {
    pub fn encode<M: DeviceMessage>(message: &M) -> Self {
        RawMessage {
            kind: M::KIND as u16,
            payload: message.encode_to_vec(),
        }
    }

    /// Decode the payload as `M`, failing if the wire kind is a different message
    pub fn decode<M: DeviceMessage>(&self) -> Result<M> {
        if self.kind != M::KIND as u16 {
            return Err(Error::UnexpectedMessage {
                expected: M::KIND.to_string(),
                got: self.name(),
            });
        }
        Ok(M::decode(&self.payload[..])?)
    }

    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::try_from(self.kind).ok()
    }

    pub fn name(&self) -> String {
        MessageType::name(self.kind)
    }

    fn header(&self) -> Result<Vec<u8>> {
        let len = checked_len(self.payload.len())?;
        let mut header = Vec::with_capacity(HEADER_LEN + self.payload.len());
        header.write_u16::<BigEndian>(self.kind)?;
        header.write_u32::<BigEndian>(len)?;
        Ok(header)
    }
}

fn checked_len(len: usize) -> Result<u32> {
    match u32::try_from(len) {
        Ok(len) if len as usize <= MAX_MESSAGE_SIZE => Ok(len),
        _ => Err(Error::Wire(format!(
            "message of {len} bytes exceeds the maximum of {MAX_MESSAGE_SIZE}"
        ))),
    }
}

/// Split a message in reports ready to be written to the device
pub fn encode_reports(message: &RawMessage) -> Result<Vec<[u8; REPORT_SIZE]>> {
    let mut data = HEADER_MARKER.to_vec();
    data.extend(message.header()?);
    data.extend(&message.payload);

    Ok(data
        .chunks(REPORT_SIZE - 1)
        .map(|chunk| {
            let mut report = [0u8; REPORT_SIZE];
            report[0] = REPORT_MARKER;
            report[1..=chunk.len()].copy_from_slice(chunk);
            report
        })
        .collect())
}

/// Accumulates reports read from the device until a whole message is available
#[derive(Debug, Default)]
pub struct ReportReader {
    kind: Option<u16>,
    expected: usize,
    payload: Vec<u8>,
}

impl ReportReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the next report, returns the message once complete
    pub fn push(&mut self, report: &[u8]) -> Result<Option<RawMessage>> {
        let data = match report.split_first() {
            Some((&REPORT_MARKER, data)) => data,
            _ => return Err(Error::Wire("report does not start with '?'".to_string())),
        };

        let data = match self.kind {
            Some(_) => data,
            None => {
                if data.len() < HEADER_MARKER.len() + HEADER_LEN
                    || &data[..HEADER_MARKER.len()] != HEADER_MARKER
                {
                    return Err(Error::Wire("first report is missing the header".to_string()));
                }
                let mut cursor = Cursor::new(&data[HEADER_MARKER.len()..]);
                let kind = cursor.read_u16::<BigEndian>()?;
                let len = cursor.read_u32::<BigEndian>()? as usize;
                checked_len(len)?;
                self.kind = Some(kind);
                self.expected = len;
                self.payload = Vec::with_capacity(self.expected);
                &data[HEADER_MARKER.len() + HEADER_LEN..]
            }
        };

        let missing = self.expected - self.payload.len();
        self.payload
            .extend_from_slice(&data[..missing.min(data.len())]);

        match self.kind {
            Some(kind) if self.payload.len() == self.expected => {
                let payload = std::mem::take(&mut self.payload);
                self.kind = None;
                self.expected = 0;
                Ok(Some(RawMessage { kind, payload }))
            }
            _ => Ok(None),
        }
    }
}

/// Hex body of a bridge `call`
pub fn encode_bridge(message: &RawMessage) -> Result<String> {
    let mut data = message.header()?;
    data.extend(&message.payload);
    Ok(hex::encode(data))
}

/// Parse the hex body returned by a bridge `call`
pub fn decode_bridge(body: &str) -> Result<RawMessage> {
    let data = hex::decode(body.trim())?;
    if data.len() < HEADER_LEN {
        return Err(Error::Wire(format!(
            "bridge response too short: {} bytes",
            data.len()
        )));
    }
    let mut cursor = Cursor::new(&data[..HEADER_LEN]);
    let kind = cursor.read_u16::<BigEndian>()?;
    let len = cursor.read_u32::<BigEndian>()? as usize;
    let payload = &data[HEADER_LEN..];
    if payload.len() != len {
        return Err(Error::Wire(format!(
            "bridge response declares {len} bytes but carries {}",
            payload.len()
        )));
    }
    Ok(RawMessage {
        kind,
        payload: payload.to_vec(),
    })
}
