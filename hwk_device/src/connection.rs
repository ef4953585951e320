use std::{
    io::ErrorKind,
    net::{SocketAddr, UdpSocket},
};

use serde::Deserialize;

use crate::{
    consts::{BRIDGE_ORIGIN, PING_TIMEOUT, REPORT_SIZE, TIMEOUT},
    wire::{decode_bridge, encode_bridge, encode_reports, RawMessage, ReportReader},
    Error, Result,
};

/// Communication layer between the client and the device.
///
/// A single exchange writes one message and reads the next message sent by the device.
pub trait Transport {
    fn exchange(&mut self, message: &RawMessage) -> Result<RawMessage>;
}

/// The transports selectable at runtime
#[derive(Debug)]
pub enum Connection {
    Udp(UdpTransport),
    Bridge(BridgeTransport),
}

impl Transport for Connection {
    fn exchange(&mut self, message: &RawMessage) -> Result<RawMessage> {
        match self {
            Connection::Udp(t) => t.exchange(message),
            Connection::Bridge(t) => t.exchange(message),
        }
    }
}

impl From<UdpTransport> for Connection {
    fn from(transport: UdpTransport) -> Self {
        Connection::Udp(transport)
    }
}

impl From<BridgeTransport> for Connection {
    fn from(transport: BridgeTransport) -> Self {
        Connection::Bridge(transport)
    }
}

/// Transport to communicate with the emulator, one datagram per report.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    addr: SocketAddr,
}

impl UdpTransport {
    /// Connect to the emulator listening at `addr`, checking it answers the liveness probe
    pub fn connect(addr: SocketAddr) -> Result<Self> {
        let bind: SocketAddr = if addr.is_ipv4() {
            ([127, 0, 0, 1], 0).into()
        } else {
            (std::net::Ipv6Addr::LOCALHOST, 0).into()
        };
        let socket = UdpSocket::bind(bind)?;
        socket.connect(addr)?;
        let transport = Self { socket, addr };
        if !transport.ping()? {
            return Err(Error::EmulatorNotResponding(addr));
        }
        transport.socket.set_read_timeout(Some(TIMEOUT))?;
        tracing::info!("connected to emulator at {addr}");
        Ok(transport)
    }

    /// The emulator answers `PONGPONG` to `PINGPING`
    fn ping(&self) -> Result<bool> {
        self.socket.set_read_timeout(Some(PING_TIMEOUT))?;
        self.socket.send(b"PINGPING")?;
        let mut buf = [0u8; REPORT_SIZE];
        match self.socket.recv(&mut buf) {
            Ok(len) => Ok(&buf[..len] == b"PONGPONG"),
            Err(e) if is_timeout(&e) || e.kind() == ErrorKind::ConnectionRefused => {
                tracing::debug!("ping to {} failed: {e}", self.addr);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn is_timeout(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

impl Transport for UdpTransport {
    fn exchange(&mut self, message: &RawMessage) -> Result<RawMessage> {
        for report in encode_reports(message)? {
            self.socket.send(&report)?;
        }

        let mut reader = ReportReader::new();
        let mut buf = [0u8; REPORT_SIZE];
        loop {
            match self.socket.recv(&mut buf) {
                Ok(len) => {
                    if let Some(message) = reader.push(&buf[..len])? {
                        return Ok(message);
                    }
                }
                Err(e) => {
                    if e.kind() != ErrorKind::Interrupted {
                        return Err(Error::IoError(e));
                    }
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct BridgeDevice {
    path: String,
    session: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BridgeSession {
    session: String,
}

/// Transport to a physical device through the local HTTP bridge.
///
/// The session acquired on connect is released on drop.
#[derive(Debug)]
pub struct BridgeTransport {
    client: reqwest::blocking::Client,
    url: String,
    session: String,
}

impl BridgeTransport {
    /// Acquire the first device listed by the bridge at `url`
    pub fn connect(url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .no_proxy()
            .build()?;
        let url = url.trim_end_matches('/').to_string();

        let body = post(&client, &format!("{url}/enumerate"), None)?;
        let devices: Vec<BridgeDevice> = serde_json::from_slice(&body)?;
        tracing::debug!("bridge devices: {devices:?}");
        let device = devices.into_iter().next().ok_or(Error::NoDevice)?;

        let previous = device.session.as_deref().unwrap_or("null");
        let body = post(
            &client,
            &format!("{url}/acquire/{}/{previous}", device.path),
            None,
        )?;
        let BridgeSession { session } = serde_json::from_slice(&body)?;
        tracing::info!("acquired device {} with session {session}", device.path);

        Ok(Self {
            client,
            url,
            session,
        })
    }
}

fn post(client: &reqwest::blocking::Client, url: &str, body: Option<String>) -> Result<Vec<u8>> {
    tracing::debug!("POSTING to {url}");
    let mut request = client.post(url).header(reqwest::header::ORIGIN, BRIDGE_ORIGIN);
    if let Some(body) = body {
        request = request.body(body);
    }
    let resp = request.send()?;
    let status_code = resp.status().as_u16();
    if status_code != 200 {
        return Err(Error::HttpStatus(url.to_string(), status_code));
    }
    Ok(resp.bytes()?.to_vec())
}

impl Transport for BridgeTransport {
    fn exchange(&mut self, message: &RawMessage) -> Result<RawMessage> {
        let url = format!("{}/call/{}", self.url, self.session);
        let body = post(&self.client, &url, Some(encode_bridge(message)?))?;
        let body = String::from_utf8_lossy(&body);
        decode_bridge(&body)
    }
}

impl Drop for BridgeTransport {
    fn drop(&mut self) {
        let url = format!("{}/release/{}", self.url, self.session);
        if let Err(e) = post(&self.client, &url, None) {
            tracing::warn!("cannot release session {}: {e}", self.session);
        }
    }
}
