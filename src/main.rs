use std::time::Duration;

use argh::FromArgs;
use env_logger::Env;
use log::error;

use sampquery::address::split_host_port;
use sampquery::config::SessionConfig;
use sampquery::error::SampQueryError;
use sampquery::lookup::{lookup, PlayerList, ServerSnapshot};

/// Query a SA-MP server for its info, rules, ping and players.
#[derive(FromArgs)]
struct Args {
    /// server address as `host[:port]`, the port defaults to 7777
    #[argh(positional)]
    target: String,

    /// receive timeout in milliseconds (default 2000)
    #[argh(option, short = 't')]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), SampQueryError> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args: Args = argh::from_env();
    let target = args.target;

    let mut config = SessionConfig::default();
    if let Some(ms) = args.timeout {
        config = config.with_timeout(Duration::from_millis(ms));
    }

    let (host, port) = split_host_port(&target)?;
    match lookup(&host, port, config).await {
        Ok(snapshot) => {
            print_snapshot(&snapshot);
            Ok(())
        }
        Err(err) => {
            error!("{target} is offline: {err}");
            Err(err)
        }
    }
}

fn print_snapshot(snapshot: &ServerSnapshot) {
    let info = &snapshot.info;
    println!("{}", info.hostname);
    println!("  address:    {}", snapshot.address);
    println!("  players:    {}/{}", info.players, info.max_players);
    println!("  mode:       {}", info.game_mode);
    println!("  language:   {}", info.language);
    println!("  passworded: {}", info.passworded);
    println!("  map:        {}", snapshot.map);
    println!("  version:    {}", snapshot.version);
    println!("  lagcomp:    {}", snapshot.lag_comp);
    println!("  website:    {}", snapshot.website);
    println!("  ping:       {} ms", snapshot.ping.as_millis());

    match &snapshot.players {
        PlayerList::Listed(players) => {
            for player in players {
                println!("    {:<24} {}", player.name, player.score);
            }
        }
        PlayerList::TooMany => println!("  (too many players to list)"),
        PlayerList::Unavailable => println!("  (player list unavailable)"),
    }
}
