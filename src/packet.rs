use std::net::{Ipv4Addr, SocketAddrV4};

use crate::error::SampQueryError;

/// Every request and reply starts with these four bytes.
pub const MAGIC: &[u8; 4] = b"SAMP";

/// Magic, address, port and opcode.
pub const HEADER_LEN: usize = 11;

/// Large enough for at least 100 players' worth of data.
pub const RECV_BUFFER_SIZE: usize = 14000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// `i`: password flag, player counts, hostname, game mode, language.
    Info,
    /// `r`: the server's rule set.
    Rules,
    /// `c`: player names and scores.
    Players,
    /// `p`: the server echoes four random bytes back.
    /// Used as the liveness probe and for ping measurement.
    Mirror,
}

impl TryFrom<u8> for Opcode {
    type Error = SampQueryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            b'i' => Ok(Opcode::Info),
            b'r' => Ok(Opcode::Rules),
            b'c' => Ok(Opcode::Players),
            b'p' => Ok(Opcode::Mirror),
            n => Err(SampQueryError::UnknownOpcode(n)),
        }
    }
}

impl Opcode {
    pub fn to_byte(&self) -> u8 {
        match self {
            Opcode::Info => b'i',
            Opcode::Rules => b'r',
            Opcode::Players => b'c',
            Opcode::Mirror => b'p',
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct RequestPacket {
    address: SocketAddrV4,
    opcode: Opcode,
    mirror: Option<[u8; 4]>,
}

impl RequestPacket {
    /// Mirror requests get four random bytes for the server to echo.
    pub fn new(address: SocketAddrV4, opcode: Opcode) -> Self {
        let mirror = match opcode {
            Opcode::Mirror => Some(rand::random::<[u8; 4]>()),
            _ => None,
        };
        RequestPacket { address, opcode, mirror }
    }

    /// Serializes a request packet into an array of bytes.
    pub fn pack(&self) -> Vec<u8> {
        // magic, raw address octets, port (low byte first), opcode (and mirror bytes)
        let mut payload: Vec<u8> = Vec::with_capacity(HEADER_LEN + 4);
        payload.extend_from_slice(MAGIC);
        payload.extend_from_slice(&self.address.ip().octets());
        payload.extend_from_slice(&self.address.port().to_le_bytes());
        payload.push(self.opcode.to_byte());
        if let Some(m) = &self.mirror {
            payload.extend_from_slice(m);
        }

        payload
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn mirror(&self) -> Option<&[u8; 4]> {
        self.mirror.as_ref()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ResponsePacket {
    address: SocketAddrV4,
    opcode: Opcode,
    raw: Vec<u8>,
}

impl ResponsePacket {
    const MAGIC_END: usize = 4;
    const ADDRESS_END: usize = 8;
    const OPCODE_OFFSET: usize = 10;

    /// Splits an incoming datagram into its header and payload.
    pub fn unpack(incoming: &[u8]) -> Result<Self, SampQueryError> {
        if incoming.len() < HEADER_LEN {
            return Err(SampQueryError::TruncatedHeader(HEADER_LEN));
        }
        if &incoming[..Self::MAGIC_END] != MAGIC {
            return Err(SampQueryError::BadMagic);
        }

        let octets: [u8; 4] = [incoming[4], incoming[5], incoming[6], incoming[7]];
        let port = u16::from_le_bytes([incoming[Self::ADDRESS_END], incoming[Self::ADDRESS_END + 1]]);
        let opcode = Opcode::try_from(incoming[Self::OPCODE_OFFSET])?;

        Ok(ResponsePacket {
            address: SocketAddrV4::new(Ipv4Addr::from(octets), port),
            opcode,
            raw: incoming.to_vec(),
        })
    }

    /// The address the server echoed back in the header.
    pub fn address(&self) -> &SocketAddrV4 {
        &self.address
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The whole datagram, header included.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The operation-specific payload after the header.
    pub fn body(&self) -> &[u8] {
        &self.raw[HEADER_LEN..]
    }
}

/// Builds a reply datagram the way a server would. Shared by the parser tests.
#[cfg(test)]
pub(crate) fn reply(opcode: Opcode, body: &[u8]) -> ResponsePacket {
    let address = SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 7777);
    let mut raw = RequestPacket { address, opcode, mirror: None }.pack();
    raw.extend_from_slice(body);
    ResponsePacket::unpack(&raw).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed(port: u16, opcode: Opcode) -> Vec<u8> {
        RequestPacket::new(SocketAddrV4::new(Ipv4Addr::new(192, 168, 200, 1), port), opcode).pack()
    }

    #[test]
    fn info_request_layout() {
        assert_eq!(packed(7777, Opcode::Info), b"SAMP\xc0\xa8\xc8\x01\x61\x1ei".to_vec());
    }

    #[test]
    fn port_zero_splits_into_zero_bytes() {
        let bytes = packed(0, Opcode::Rules);
        assert_eq!(&bytes[8..11], &[0x00, 0x00, b'r']);
    }

    #[test]
    fn port_max_splits_without_sign_extension() {
        let bytes = packed(65535, Opcode::Players);
        assert_eq!(&bytes[8..11], &[0xff, 0xff, b'c']);
        assert_eq!(bytes.len(), HEADER_LEN);
    }

    #[test]
    fn mirror_request_carries_four_extra_bytes() {
        let request = RequestPacket::new(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 7777), Opcode::Mirror);
        let bytes = request.pack();
        assert_eq!(bytes.len(), HEADER_LEN + 4);
        assert_eq!(bytes[10], b'p');
        assert_eq!(&bytes[11..], request.mirror().unwrap());
    }

    #[test]
    fn unpack_reads_header() {
        let packet = reply(Opcode::Info, &[1, 2, 3]);
        assert_eq!(packet.opcode(), Opcode::Info);
        assert_eq!(packet.address(), &SocketAddrV4::new(Ipv4Addr::LOCALHOST, 7777));
        assert_eq!(packet.body(), &[1u8, 2, 3]);
    }

    #[test]
    fn unpack_rejects_bad_replies() {
        assert!(matches!(ResponsePacket::unpack(b"SAMP"), Err(SampQueryError::TruncatedHeader(_))));
        assert!(matches!(ResponsePacket::unpack(b"XAMP\x7f\0\0\x01\x61\x1ei"), Err(SampQueryError::BadMagic)));
        assert!(matches!(
            ResponsePacket::unpack(b"SAMP\x7f\0\0\x01\x61\x1ez"),
            Err(SampQueryError::UnknownOpcode(b'z'))
        ));
    }
}
