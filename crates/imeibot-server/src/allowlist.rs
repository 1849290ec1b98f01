//! Source-address check for the Telegram webhook.

use std::{
  net::{IpAddr, Ipv4Addr},
  str::FromStr,
};

use axum::http::HeaderMap;
use serde::Deserialize;

/// An IPv4 network in CIDR notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Ipv4Net {
  addr:   Ipv4Addr,
  prefix: u8,
}

impl Ipv4Net {
  pub const fn new(addr: Ipv4Addr, prefix: u8) -> Self { Self { addr, prefix } }

  fn mask(&self) -> u32 {
    match self.prefix {
      0 => 0,
      p => u32::MAX << (32 - u32::from(p.min(32))),
    }
  }

  pub fn contains(&self, ip: Ipv4Addr) -> bool {
    let mask = self.mask();
    u32::from(ip) & mask == u32::from(self.addr) & mask
  }
}

impl FromStr for Ipv4Net {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (addr, prefix) = s.split_once('/').ok_or_else(|| format!("missing prefix: {s}"))?;
    let addr = addr.parse().map_err(|_| format!("bad address: {s}"))?;
    let prefix: u8 = prefix.parse().map_err(|_| format!("bad prefix: {s}"))?;
    if prefix > 32 {
      return Err(format!("prefix out of range: {s}"));
    }
    Ok(Self { addr, prefix })
  }
}

impl TryFrom<String> for Ipv4Net {
  type Error = String;

  fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

/// Ranges Telegram delivers webhooks from.
pub const TELEGRAM_NETWORKS: [Ipv4Net; 2] = [
  Ipv4Net::new(Ipv4Addr::new(149, 154, 160, 0), 20),
  Ipv4Net::new(Ipv4Addr::new(91, 108, 4, 0), 22),
];

/// IPv4 view of `ip`; v4-mapped IPv6 addresses count as IPv4.
fn as_v4(ip: IpAddr) -> Option<Ipv4Addr> {
  match ip {
    IpAddr::V4(v4) => Some(v4),
    IpAddr::V6(v6) => v6.to_ipv4_mapped(),
  }
}

pub fn is_telegram(ip: IpAddr) -> bool {
  as_v4(ip).is_some_and(|ip| TELEGRAM_NETWORKS.iter().any(|net| net.contains(ip)))
}

fn is_trusted(ip: IpAddr, trusted: &[Ipv4Net]) -> bool {
  as_v4(ip).is_some_and(|ip| trusted.iter().any(|net| net.contains(ip)))
}

/// Address of the original client.
///
/// A known peer outside `trusted` is the client itself and its forwarding
/// headers are ignored. Otherwise `X-Real-IP` wins, then the first
/// `X-Forwarded-For` hop, then the peer.
pub fn client_ip(
  headers: &HeaderMap,
  peer: Option<IpAddr>,
  trusted: &[Ipv4Net],
) -> Option<IpAddr> {
  if let Some(peer) = peer.filter(|p| !is_trusted(*p, trusted)) {
    return Some(peer);
  }

  let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

  if let Some(ip) = header("x-real-ip").and_then(|v| v.trim().parse().ok()) {
    return Some(ip);
  }
  if let Some(ip) = header("x-forwarded-for")
    .and_then(|v| v.split(',').next())
    .and_then(|v| v.trim().parse().ok())
  {
    return Some(ip);
  }
  peer
}
