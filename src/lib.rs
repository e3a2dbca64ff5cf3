//! Pure Rust async implementation of the [SA-MP Query Mechanism](http://wiki.sa-mp.com/wiki/Query_Mechanism)
pub mod address;
pub mod charset;
pub mod config;
pub mod error;
pub mod info;
pub mod lookup;
pub mod packet;
mod parse;
pub mod players;
pub mod rules;
pub mod session;
