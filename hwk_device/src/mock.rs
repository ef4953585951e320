#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::io;

use crate::{DeviceMessage, Error, RawMessage, Result, Transport};

#[derive(Debug)]
enum Reply {
    Message(RawMessage),
    Disconnect,
}

/// An in-memory device for testing: records every message sent and replays the scripted replies in order.
///
/// When the replies are exhausted the exchange fails as if the device was unplugged.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: VecDeque<Reply>,
    sent: Vec<RawMessage>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply
    pub fn reply<M: DeviceMessage>(self, message: M) -> Self {
        self.reply_raw(RawMessage::encode(&message))
    }

    pub fn reply_raw(mut self, message: RawMessage) -> Self {
        self.replies.push_back(Reply::Message(message));
        self
    }

    /// Queue a transport failure
    pub fn disconnect(mut self) -> Self {
        self.replies.push_back(Reply::Disconnect);
        self
    }

    pub fn sent(&self) -> &[RawMessage] {
        &self.sent
    }

    /// Decode the `index`-th sent message, panics if it's not an `M`
    pub fn sent_as<M: DeviceMessage>(&self, index: usize) -> M {
        self.sent[index].decode().unwrap()
    }
}

impl Transport for MockTransport {
    fn exchange(&mut self, message: &RawMessage) -> Result<RawMessage> {
        self.sent.push(message.clone());
        match self.replies.pop_front() {
            Some(Reply::Message(m)) => Ok(m),
            Some(Reply::Disconnect) => Err(Error::IoError(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "device disconnected",
            ))),
            None => Err(Error::IoError(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no reply scripted",
            ))),
        }
    }
}
