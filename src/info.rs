use crate::charset::{self, CharsetDetector};
use crate::error::SampQueryError;
use crate::packet::ResponsePacket;
use crate::parse::{get_long_bytes, get_u16, get_u8};

/// Server information as obtained by [crate::session::QuerySession::server_info].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    /// Is the server password protected?
    pub passworded: bool,
    /// Current players
    pub players: u16,
    /// Max players
    pub max_players: u16,
    /// Server hostname
    pub hostname: String,
    /// Name of the running game mode
    pub game_mode: String,
    /// Language the server advertises
    pub language: String,
}

impl ServerInfo {
    /// Parse an `i` [ResponsePacket] into its corresponding [ServerInfo].
    ///
    /// The three strings are decoded with whatever `detector` guesses from the
    /// whole datagram, or UTF-8 if it guesses nothing.
    pub fn parse(packet: &ResponsePacket, detector: &dyn CharsetDetector) -> Result<ServerInfo, SampQueryError> {
        let data: &[u8] = packet.body();
        let mut offset: usize = 0;

        let passworded = get_u8(data, &mut offset)? != 0;
        let players = get_u16(data, &mut offset)?;
        let max_players = get_u16(data, &mut offset)?;

        let encoding = detector.detect(packet.raw());
        let hostname = charset::decode(get_long_bytes(data, &mut offset)?, encoding);
        let game_mode = charset::decode(get_long_bytes(data, &mut offset)?, encoding);
        let language = charset::decode(get_long_bytes(data, &mut offset)?, encoding);

        Ok(ServerInfo {
            passworded,
            players,
            max_players,
            hostname,
            game_mode,
            language,
        })
    }
}
