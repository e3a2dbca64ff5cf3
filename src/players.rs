use crate::error::SampQueryError;
use crate::packet::ResponsePacket;
use crate::parse::{get_i32, get_short_bytes, get_u16, lossy_string};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub score: i32,
}

/// Parse a `c` [ResponsePacket] into players, in the order the server sent them.
pub fn parse(packet: &ResponsePacket) -> Result<Vec<Player>, SampQueryError> {
    let data: &[u8] = packet.body();
    let mut offset: usize = 0;

    let count = get_u16(data, &mut offset)?;
    let mut players: Vec<Player> = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name = lossy_string(get_short_bytes(data, &mut offset)?);
        let score = get_i32(data, &mut offset)?;
        players.push(Player { name, score });
    }

    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{reply, Opcode};

    fn players_body(players: &[(&str, i32)]) -> Vec<u8> {
        let mut body = (players.len() as u16).to_le_bytes().to_vec();
        for (name, score) in players {
            body.push(name.len() as u8);
            body.extend_from_slice(name.as_bytes());
            body.extend_from_slice(&score.to_le_bytes());
        }
        body
    }

    #[test]
    fn zero_players_is_an_empty_list() {
        let players = parse(&reply(Opcode::Players, &players_body(&[]))).unwrap();
        assert!(players.is_empty());
    }

    #[test]
    fn keeps_order_and_negative_scores() {
        let body = players_body(&[("Alice", 120), ("Bob", -5)]);
        let players = parse(&reply(Opcode::Players, &body)).unwrap();
        assert_eq!(
            players,
            vec![
                Player { name: "Alice".to_owned(), score: 120 },
                Player { name: "Bob".to_owned(), score: -5 },
            ]
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let body = players_body(&[("Bob", 1), ("Bob", 1)]);
        assert_eq!(parse(&reply(Opcode::Players, &body)).unwrap().len(), 2);
    }

    #[test]
    fn missing_score_is_malformed() {
        let mut body = players_body(&[("Alice", 120)]);
        body.truncate(body.len() - 1);
        assert!(parse(&reply(Opcode::Players, &body)).unwrap_err().is_malformed());
    }
}
