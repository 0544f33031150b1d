//! The authentication bypass whitelist, stored as canonical `addr/prefix`
//! entries.

// used to parse the address part of a subnet
use std::net::IpAddr;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

lazy_static! {
    // newlines and commas both separate whitelist entries
    static ref DELIMITER: Regex = Regex::new(r"\n|,").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    address: IpAddr,
    prefix: u8,
}

impl Subnet {
    pub fn new(address: IpAddr, prefix: u8) -> Option<Self> {
        (prefix <= max_prefix(&address)).then_some(Self { address, prefix })
    }
    pub fn address(&self) -> IpAddr {
        self.address
    }
    pub fn prefix(&self) -> u8 {
        self.prefix
    }
}

fn max_prefix(address: &IpAddr) -> u8 {
    match address {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

impl FromStr for Subnet {
    type Err = String;
    /// Accepts `address/prefix` or a bare address, which becomes a single
    /// host subnet.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (address, prefix) = match s.split_once('/') {
            Some((address, prefix)) => (address, Some(prefix)),
            None => (s, None),
        };
        let address = IpAddr::from_str(address.trim()).map_err(|e| format!("{}: {}", s, e))?;
        let prefix = match prefix {
            Some(p) => p.trim().parse::<u8>().map_err(|e| format!("{}: {}", s, e))?,
            None => max_prefix(&address),
        };
        Subnet::new(address, prefix).ok_or_else(|| format!("{}: prefix out of range", s))
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}

/// Splits whitelist text on newlines and commas and keeps the entries that
/// parse as subnets, in their original order.
pub fn parse_whitelist(text: &str) -> Vec<Subnet> {
    DELIMITER
        .split(text)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<Subnet>() {
            Ok(subnet) => Some(subnet),
            Err(e) => {
                warn!(entry = token, error = %e, "ignoring invalid whitelist entry");
                None
            }
        })
        .collect()
}

/// Canonical string form of every valid whitelist entry.
pub fn canonical_whitelist(text: &str) -> Vec<String> {
    parse_whitelist(text).iter().map(Subnet::to_string).collect()
}
