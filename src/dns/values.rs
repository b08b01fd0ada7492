//! Answer row value extraction.
//!
//! Turns a parsed answer record into the textual value stored on a
//! `ResolvedRecord`, and tells the resolver whether the row is a terminal
//! address or a referral that needs expanding.

use std::net::IpAddr;

use hickory_proto::rr::rdata::caa::Value;
use hickory_proto::rr::rdata::CAA;
use hickory_proto::rr::{RData, Record};

/// What an answer row carries, as far as the resolver is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValue {
    /// A/AAAA: terminal address, enriched before it is stored
    Address(IpAddr),
    /// CNAME/MX/NS: `value` is stored, `target` is resolved one level deeper
    Referral { value: String, target: String },
    /// Everything else: stored as-is
    Text(String),
}

impl RowValue {
    /// The string stored in `ResolvedRecord::value`.
    pub fn display_value(&self) -> String {
        match self {
            RowValue::Address(ip) => ip.to_string(),
            RowValue::Referral { value, .. } => value.clone(),
            RowValue::Text(text) => text.clone(),
        }
    }
}

/// Extracts the value of one answer row.
///
/// | Type      | Value                          |
/// |-----------|--------------------------------|
/// | A/AAAA    | textual IP address             |
/// | CNAME, NS | target name                    |
/// | MX        | `<exchange> (priority <n>)`    |
/// | TXT       | space-joined text chunks       |
/// | SOA       | `<primary-ns> <mailbox>`       |
/// | CAA       | `<flag> <tag> <value>`         |
/// | other     | raw record text                |
pub fn extract_row_value(record: &Record) -> RowValue {
    let Some(data) = record.data() else {
        return RowValue::Text(record.to_string());
    };

    match data {
        RData::A(a) => RowValue::Address(IpAddr::V4(a.0)),
        RData::AAAA(aaaa) => RowValue::Address(IpAddr::V6(aaaa.0)),
        RData::CNAME(cname) => {
            let target = cname.0.to_utf8();
            RowValue::Referral {
                value: target.clone(),
                target,
            }
        }
        RData::NS(ns) => {
            let target = ns.0.to_utf8();
            RowValue::Referral {
                value: target.clone(),
                target,
            }
        }
        RData::MX(mx) => {
            let target = mx.exchange().to_utf8();
            RowValue::Referral {
                value: format!("{} (priority {})", target, mx.preference()),
                target,
            }
        }
        RData::TXT(txt) => RowValue::Text(
            txt.iter()
                .map(|bytes| String::from_utf8_lossy(bytes).to_string())
                .collect::<Vec<String>>()
                .join(" "),
        ),
        RData::SOA(soa) => {
            RowValue::Text(format!("{} {}", soa.mname().to_utf8(), soa.rname().to_utf8()))
        }
        RData::CAA(caa) => RowValue::Text(format_caa(caa)),
        other => RowValue::Text(other.to_string()),
    }
}

/// `<flag> <tag> <value>` with the value unquoted.
fn format_caa(caa: &CAA) -> String {
    let flag = if caa.issuer_critical() { 128 } else { 0 };
    let value = match caa.value() {
        Value::Issuer(name, key_values) => {
            let mut value = name.as_ref().map(|name| name.to_utf8()).unwrap_or_default();
            for key_value in key_values {
                value.push_str(&format!("; {key_value}"));
            }
            value
        }
        Value::Url(url) => url.to_string(),
        Value::Unknown(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    };
    format!("{} {} {}", flag, caa.tag().as_str(), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::rr::rdata::caa::KeyValue;
    use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX, NS, SOA, TXT};
    use hickory_proto::rr::{Name, RecordType};
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::str::FromStr;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    fn record(rdata: RData) -> Record {
        Record::from_rdata(name("example.com."), 300, rdata)
    }

    #[test]
    fn test_a_and_aaaa_are_addresses() {
        let v4 = extract_row_value(&record(RData::A(A(Ipv4Addr::new(93, 184, 216, 34)))));
        assert_eq!(v4, RowValue::Address("93.184.216.34".parse().unwrap()));
        assert_eq!(v4.display_value(), "93.184.216.34");

        let v6 = extract_row_value(&record(RData::AAAA(AAAA(Ipv6Addr::LOCALHOST))));
        assert_eq!(v6.display_value(), "::1");
    }

    #[test]
    fn test_cname_is_referral() {
        let value = extract_row_value(&record(RData::CNAME(CNAME(name("edge.example.net.")))));
        assert_eq!(
            value,
            RowValue::Referral {
                value: "edge.example.net.".to_string(),
                target: "edge.example.net.".to_string(),
            }
        );
    }

    #[test]
    fn test_ns_is_referral() {
        let value = extract_row_value(&record(RData::NS(NS(name("ns1.example.com.")))));
        assert_eq!(value.display_value(), "ns1.example.com.");
        assert!(matches!(value, RowValue::Referral { .. }));
    }

    #[test]
    fn test_mx_value_includes_priority() {
        let value = extract_row_value(&record(RData::MX(MX::new(10, name("mail.example.com.")))));
        match value {
            RowValue::Referral { value, target } => {
                assert_eq!(value, "mail.example.com. (priority 10)");
                assert_eq!(target, "mail.example.com.");
            }
            other => panic!("expected referral, got {other:?}"),
        }
    }

    #[test]
    fn test_txt_chunks_are_space_joined() {
        let txt = TXT::new(vec!["v=spf1".to_string(), "-all".to_string()]);
        let value = extract_row_value(&record(RData::TXT(txt)));
        assert_eq!(value, RowValue::Text("v=spf1 -all".to_string()));
    }

    #[test]
    fn test_soa_value() {
        let soa = SOA::new(
            name("ns1.example.com."),
            name("hostmaster.example.com."),
            2024010101,
            7200,
            3600,
            1209600,
            300,
        );
        let value = extract_row_value(&record(RData::SOA(soa)));
        assert_eq!(
            value.display_value(),
            "ns1.example.com. hostmaster.example.com."
        );
    }

    #[test]
    fn test_caa_value() {
        let caa = CAA::new_issue(false, Some(name("letsencrypt.org")), vec![]);
        let value = extract_row_value(&record(RData::CAA(caa))).display_value();
        assert_eq!(value, "0 issue letsencrypt.org");
    }

    #[test]
    fn test_caa_critical_wildcard_with_parameters() {
        let caa = CAA::new_issuewild(
            true,
            Some(name("ca.example.net")),
            vec![KeyValue::new("account", "230123")],
        );
        let value = extract_row_value(&record(RData::CAA(caa))).display_value();
        assert_eq!(value, "128 issuewild ca.example.net; account=230123");
    }

    #[test]
    fn test_record_without_data_uses_raw_text() {
        let empty = Record::with(name("example.com."), RecordType::RRSIG, 60);
        assert!(matches!(extract_row_value(&empty), RowValue::Text(_)));
    }
}
