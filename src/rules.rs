use std::collections::HashMap;

use crate::error::SampQueryError;
use crate::packet::ResponsePacket;
use crate::parse::{get_short_bytes, get_u16, lossy_string};

/// Rule name to rule value.
pub type RuleSet = HashMap<String, String>;

pub const WEB_URL: &str = "weburl";
pub const VERSION: &str = "version";
pub const LAG_COMP: &str = "lagcomp";
pub const MAP_NAME: &str = "mapname";

/// Parse an `r` [ResponsePacket]: a rule count followed by that many
/// name/value pairs, each prefixed by a single length byte.
pub fn parse(packet: &ResponsePacket) -> Result<RuleSet, SampQueryError> {
    let data: &[u8] = packet.body();
    let mut offset: usize = 0;

    let count = get_u16(data, &mut offset)?;
    let mut rules = RuleSet::with_capacity(count as usize);
    for _ in 0..count {
        let name = lossy_string(get_short_bytes(data, &mut offset)?);
        let value = lossy_string(get_short_bytes(data, &mut offset)?);
        rules.insert(name, value);
    }

    Ok(rules)
}
