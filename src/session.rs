use std::net::SocketAddrV4;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace};
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::time::timeout;

use crate::address::resolve;
use crate::charset::CharsetDetector;
use crate::config::SessionConfig;
use crate::error::SampQueryError;
use crate::info::ServerInfo;
use crate::packet::{Opcode, RequestPacket, ResponsePacket};
use crate::players::{self, Player};
use crate::rules::{self, RuleSet};

/// One UDP socket talking to one SA-MP server.
///
/// Construction fails unless the server answers a mirror packet, so a
/// session always points at a server that was alive when it was opened.
/// The socket is released on [QuerySession::close], on drop, or when a
/// [SessionCloser] fires.
///
/// Example usage:
/// ```no_run
/// # async fn run() -> Result<(), sampquery::error::SampQueryError> {
/// use sampquery::session::QuerySession;
///
/// let mut session = QuerySession::connect("127.0.0.1", 7777).await?;
/// let info = session.server_info().await?;
/// println!("{} ({}/{})", info.hostname, info.players, info.max_players);
/// # Ok(())
/// # }
/// ```
pub struct QuerySession {
    socket: Option<UdpSocket>,
    address: SocketAddrV4,
    timeout_dur: Duration,
    detector: Arc<dyn CharsetDetector>,
    buffer: Vec<u8>,
    closer: SessionCloser,
    closed: watch::Receiver<bool>,
}

/// Closes a [QuerySession] from another task or thread.
///
/// An operation in flight on the session fails with [SampQueryError::Closed]
/// instead of waiting for its timeout.
#[derive(Debug, Clone)]
pub struct SessionCloser {
    tx: Arc<watch::Sender<bool>>,
}

impl SessionCloser {
    pub fn close(&self) {
        // the session holds a receiver for as long as it lives, so this only fails once it's gone
        let _ = self.tx.send(true);
    }
}

impl QuerySession {
    /// Open a session with the default [SessionConfig].
    pub async fn connect(host: &str, port: u16) -> Result<Self, SampQueryError> {
        Self::connect_with(host, port, SessionConfig::default()).await
    }

    /// Resolve `host`, open a socket and check that the server answers.
    pub async fn connect_with(host: &str, port: u16, config: SessionConfig) -> Result<Self, SampQueryError> {
        let address: SocketAddrV4 = resolve(host, port).await?;

        let sock: UdpSocket = UdpSocket::bind(config.bind_address)
            .await
            .map_err(SampQueryError::FailedPortBind)?;

        timeout(config.timeout, sock.connect(address))
            .await?
            .map_err(SampQueryError::UnreachableHost)?;

        let (tx, closed) = watch::channel(false);
        let mut session = QuerySession {
            socket: Some(sock),
            address,
            timeout_dur: config.timeout,
            detector: config.detector,
            buffer: vec![0u8; config.recv_buffer_size],
            closer: SessionCloser { tx: Arc::new(tx) },
            closed,
        };

        // `session` is dropped on the error path, taking the socket with it
        if let Err(err) = session.send_recv(Opcode::Mirror).await {
            debug!("no reply from {address} to connection probe: {err}");
            return Err(SampQueryError::ConnectionFailed(address));
        }

        debug!("opened query session to {address}");
        Ok(session)
    }

    /// The resolved server address.
    pub fn address(&self) -> SocketAddrV4 {
        self.address
    }

    pub fn is_closed(&self) -> bool {
        self.socket.is_none() || *self.closed.borrow()
    }

    /// A handle that can close this session from elsewhere.
    pub fn closer(&self) -> SessionCloser {
        self.closer.clone()
    }

    /// Release the socket. Calling this more than once does nothing.
    pub fn close(&mut self) {
        self.closer.close();
        if self.socket.take().is_some() {
            debug!("closed query session to {}", self.address);
        }
    }

    /// Password flag, player counts, hostname, game mode and language.
    pub async fn server_info(&mut self) -> Result<ServerInfo, SampQueryError> {
        let packet = self.send_recv(Opcode::Info).await?;
        ServerInfo::parse(&packet, self.detector.as_ref())
    }

    /// All rules the server reports.
    pub async fn server_rules(&mut self) -> Result<RuleSet, SampQueryError> {
        let packet = self.send_recv(Opcode::Rules).await?;
        rules::parse(&packet)
    }

    /// Names and scores of connected players, in server order.
    ///
    /// The receive buffer is sized for about 100 players; asking servers with
    /// more than that may come back truncated.
    pub async fn player_list(&mut self) -> Result<Vec<Player>, SampQueryError> {
        let packet = self.send_recv(Opcode::Players).await?;
        players::parse(&packet)
    }

    /// Round trip of a mirror packet.
    ///
    /// If the server never answers this is roughly the timeout; use
    /// [QuerySession::try_ping] to tell the two apart. Only fails with
    /// [SampQueryError::Closed], a closed session has nothing to measure.
    pub async fn ping(&mut self) -> Result<Duration, SampQueryError> {
        let started = Instant::now();
        match self.send_recv(Opcode::Mirror).await {
            Err(SampQueryError::Closed) => return Err(SampQueryError::Closed),
            Err(err) => debug!("ping to {} got no reply: {err}", self.address),
            Ok(_) => {}
        }
        Ok(started.elapsed())
    }

    /// Like [QuerySession::ping], but fails if no reply arrives.
    pub async fn try_ping(&mut self) -> Result<Duration, SampQueryError> {
        let started = Instant::now();
        self.send_recv(Opcode::Mirror).await?;
        Ok(started.elapsed())
    }

    async fn send_recv(&mut self, opcode: Opcode) -> Result<ResponsePacket, SampQueryError> {
        if *self.closed.borrow() {
            self.socket = None;
        }
        let sock: &UdpSocket = self.socket.as_ref().ok_or(SampQueryError::Closed)?;
        let packet = RequestPacket::new(self.address, opcode);

        let result = tokio::select! {
            result = exchange(sock, &packet, &mut self.buffer, self.timeout_dur) => result,
            _ = wait_closed(&mut self.closed) => Err(SampQueryError::Closed),
        };

        if let Err(SampQueryError::Closed) = result {
            self.socket = None;
            debug!("query session to {} closed mid-query", self.address);
        }
        result
    }
}

async fn exchange(
    sock: &UdpSocket,
    packet: &RequestPacket,
    buf: &mut [u8],
    timeout_dur: Duration,
) -> Result<ResponsePacket, SampQueryError> {
    // sending
    timeout(timeout_dur, sock.send(&packet.pack()))
        .await?
        .map_err(SampQueryError::SendError)?;

    // receiving, skipping anything that isn't the reply to this request
    timeout(timeout_dur, recv_reply(sock, packet.opcode(), buf)).await?
}

async fn recv_reply(sock: &UdpSocket, opcode: Opcode, buf: &mut [u8]) -> Result<ResponsePacket, SampQueryError> {
    loop {
        let len: usize = sock.recv(buf).await.map_err(SampQueryError::ReceiveError)?;
        match ResponsePacket::unpack(&buf[..len]) {
            Ok(packet) if packet.opcode() == opcode => return Ok(packet),
            Ok(packet) => debug!("discarding stray {:?} reply while waiting for {opcode:?}", packet.opcode()),
            Err(err) => trace!("discarding unparseable datagram ({len} bytes): {err}"),
        }
    }
}

async fn wait_closed(closed: &mut watch::Receiver<bool>) {
    loop {
        if *closed.borrow_and_update() {
            return;
        }
        if closed.changed().await.is_err() {
            // no closer left, nothing can close us anymore
            std::future::pending::<()>().await;
        }
    }
}
