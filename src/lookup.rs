use std::net::SocketAddrV4;
use std::time::Duration;

use log::{debug, warn};

use crate::config::SessionConfig;
use crate::error::SampQueryError;
use crate::info::ServerInfo;
use crate::players::Player;
use crate::rules::{self, RuleSet};
use crate::session::QuerySession;

/// Servers reporting more players than this don't get their player list queried.
pub const PLAYER_LIST_LIMIT: u16 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerList {
    /// The server answered; may be empty.
    Listed(Vec<Player>),
    /// Not queried, the server reported more than [PLAYER_LIST_LIMIT] players.
    TooMany,
    /// Queried, but the server did not answer.
    Unavailable,
}

/// Everything a server browser shows for one server.
#[derive(Debug, Clone)]
pub struct ServerSnapshot {
    pub address: SocketAddrV4,
    pub info: ServerInfo,
    /// The `weburl` rule
    pub website: String,
    /// The `version` rule
    pub version: String,
    /// The `lagcomp` rule
    pub lag_comp: String,
    /// The `mapname` rule
    pub map: String,
    /// All rules, including the ones above.
    pub rules: RuleSet,
    pub ping: Duration,
    pub players: PlayerList,
}

impl ServerSnapshot {
    /// Run info, rules, ping and (if small enough) player list queries on `session`.
    ///
    /// Fails if either the info or the rules query fails. Closing the session
    /// through its [crate::session::SessionCloser] cancels the lookup at any
    /// step with [SampQueryError::Closed].
    pub async fn collect(session: &mut QuerySession) -> Result<ServerSnapshot, SampQueryError> {
        let info = session.server_info().await?;
        let rules = session.server_rules().await?;
        let ping = session.ping().await?;

        let players = if info.players > PLAYER_LIST_LIMIT {
            debug!("{} reports {} players, skipping player list", session.address(), info.players);
            PlayerList::TooMany
        } else {
            match session.player_list().await {
                Ok(players) => PlayerList::Listed(players),
                Err(SampQueryError::Closed) => return Err(SampQueryError::Closed),
                Err(err) => {
                    warn!("player list query to {} failed: {err}", session.address());
                    PlayerList::Unavailable
                }
            }
        };

        Ok(ServerSnapshot {
            address: session.address(),
            website: rule(&rules, rules::WEB_URL),
            version: rule(&rules, rules::VERSION),
            lag_comp: rule(&rules, rules::LAG_COMP),
            map: rule(&rules, rules::MAP_NAME),
            info,
            rules,
            ping,
            players,
        })
    }
}

fn rule(rules: &RuleSet, name: &str) -> String {
    rules.get(name).cloned().unwrap_or_default()
}

/// Open a session to `host:port`, collect a [ServerSnapshot] and close it again.
pub async fn lookup(host: &str, port: u16, config: SessionConfig) -> Result<ServerSnapshot, SampQueryError> {
    let mut session = QuerySession::connect_with(host, port, config).await?;
    let snapshot = ServerSnapshot::collect(&mut session).await;
    session.close();
    snapshot
}
