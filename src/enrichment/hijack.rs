//! DNS hijack heuristic.
//!
//! Flags answers that look tampered with: private address leakage, a
//! contradictory NXDOMAIN carrying answers, or an abnormally low TTL.

use std::net::{IpAddr, Ipv4Addr};

use hickory_proto::op::ResponseCode;

/// TTLs strictly between zero and this value are treated as suspicious.
const SUSPICIOUS_TTL_CEILING: u32 = 10;

/// Returns true when the answer row for `ip` matches any hijack rule.
///
/// Rules are checked in order and the first match wins:
/// 1. `ip` is in a private or non-routable IPv4 block, IPv4-mapped IPv6
///    addresses included
/// 2. `response_code` is NXDOMAIN but the answer section is non-empty
/// 3. `ttl` is in the open range `(0, 10)`
pub fn is_suspected(ip: IpAddr, response_code: ResponseCode, answer_count: usize, ttl: u32) -> bool {
    let v4 = match ip {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    };
    if v4.is_some_and(is_private_ipv4) {
        return true;
    }

    if response_code == ResponseCode::NXDomain && answer_count > 0 {
        return true;
    }

    ttl > 0 && ttl < SUSPICIOUS_TTL_CEILING
}

fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    let o = ip.octets();
    // This-network 0.0.0.0/8
    if o[0] == 0 {
        return true;
    }
    // Private 10.0.0.0/8
    if o[0] == 10 {
        return true;
    }
    // Loopback 127.0.0.0/8
    if o[0] == 127 {
        return true;
    }
    // Link-local 169.254.0.0/16
    if o[0] == 169 && o[1] == 254 {
        return true;
    }
    // Private 172.16.0.0/12
    if o[0] == 172 && (16..=31).contains(&o[1]) {
        return true;
    }
    // Private 192.168.0.0/16
    if o[0] == 192 && o[1] == 168 {
        return true;
    }
    // Shared address space 100.64.0.0/10
    o[0] == 100 && (64..=127).contains(&o[1])
}
