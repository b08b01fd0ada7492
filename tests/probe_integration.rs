//! End-to-end probes against stub collaborators.

mod helpers;

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use hickory_proto::op::ResponseCode;
use hickory_proto::rr::RecordType;

use dns_probe::enrichment::ProviderType;
use dns_probe::error_handling::{ErrorType, InfoType};

use helpers::{a_record, cname_record, prober, CountingGeo, StubDns, TrackingReverse};

fn reverse() -> Arc<TrackingReverse> {
    Arc::new(TrackingReverse::new(Duration::from_millis(1)))
}

#[tokio::test]
async fn test_single_address_domain() {
    let dns = Arc::new(StubDns::default().answer(
        "example.com",
        RecordType::A,
        vec![a_record("example.com", Ipv4Addr::new(93, 184, 216, 34), 3600)],
    ));
    let (prober, _) = prober(dns, Arc::new(CountingGeo::new("Example Hosting LLC")), reverse());

    let result = prober.probe("example.com").await;

    let a = &result.by_type["A"];
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].value, "93.184.216.34");
    assert_eq!(a[0].provider_type, Some(ProviderType::Origin));
    assert!(!a[0].hijack_suspected);
    assert_eq!(a[0].country, "United States");
    assert_eq!(a[0].city, "Norwell");
    assert_eq!(a[0].asn, "AS15133 (Example Hosting LLC)");
    assert_eq!(
        a[0].reverse_ptr,
        "93-184-216-34.example.net.,93-184-216-34.alias.example.net."
    );
    assert_eq!(result.stats.min_ttl, 3600);
    assert_eq!(result.stats.max_ttl, 3600);
    assert_eq!(result.stats.answers, 1);
    assert!(result.has_records());
    // Every other type answered with no records
    assert_eq!(result.by_type.len(), 8);
    assert_eq!(result.record_count(), 1);
}

#[tokio::test]
async fn test_nxdomain_with_answers_flags_every_address() {
    let dns = Arc::new(StubDns::default().answer_with_code(
        "hijacked.test",
        RecordType::A,
        vec![
            a_record("hijacked.test", Ipv4Addr::new(93, 184, 216, 34), 3600),
            a_record("hijacked.test", Ipv4Addr::new(93, 184, 216, 35), 3600),
        ],
        ResponseCode::NXDomain,
    ));
    let (prober, stats) = prober(dns, Arc::new(CountingGeo::new("Example ISP")), reverse());

    let result = prober.probe("hijacked.test").await;

    let a = &result.by_type["A"];
    assert_eq!(a.len(), 2);
    assert!(a.iter().all(|record| record.hijack_suspected));
    assert_eq!(stats.get_info_count(InfoType::HijackSuspected), 2);
}

#[tokio::test]
async fn test_failing_type_does_not_abort_others() {
    let dns = Arc::new(
        StubDns::default()
            .fail("example.com", RecordType::MX)
            .fail("example.com", RecordType::TXT)
            .answer(
                "example.com",
                RecordType::A,
                vec![a_record("example.com", Ipv4Addr::new(93, 184, 216, 34), 300)],
            ),
    );
    let (prober, stats) = prober(dns, Arc::new(CountingGeo::new("Example ISP")), reverse());

    let result = prober.probe("example.com").await;

    assert!(!result.by_type.contains_key("MX"));
    assert!(!result.by_type.contains_key("TXT"));
    assert_eq!(result.by_type.len(), 6);
    assert_eq!(result.by_type["A"].len(), 1);
    assert_eq!(stats.get_error_count(ErrorType::DnsQueryTimeout), 2);
}

#[tokio::test]
async fn test_cname_chain_never_exceeds_depth_bound() {
    let dns = Arc::new(
        StubDns::default()
            .answer("www.test", RecordType::CNAME, vec![cname_record("www.test", "h1.test", 60)])
            .answer("h1.test", RecordType::A, vec![cname_record("h1.test", "h2.test", 60)])
            .answer("h2.test", RecordType::A, vec![cname_record("h2.test", "h3.test", 60)])
            .answer("h3.test", RecordType::A, vec![cname_record("h3.test", "h4.test", 60)])
            .answer(
                "h4.test",
                RecordType::A,
                vec![a_record("h4.test", Ipv4Addr::new(93, 184, 216, 34), 60)],
            ),
    );
    let (prober, stats) = prober(
        Arc::clone(&dns) as Arc<dyn dns_probe::dns::DnsQuery>,
        Arc::new(CountingGeo::new("Example ISP")),
        reverse(),
    );

    let result = prober.probe("www.test").await;

    let cname = &result.by_type["CNAME"];
    assert_eq!(cname.len(), 1);
    // Root row plus two levels of expansion
    assert_eq!(cname[0].tree_depth(), 3);
    let queried = dns.queried();
    assert!(!queried.iter().any(|(name, _)| name == "h3.test"));
    assert!(!queried.iter().any(|(name, _)| name == "h4.test"));
    assert!(stats.get_info_count(InfoType::DepthLimitReached) > 0);
}

#[tokio::test]
async fn test_rows_grouped_by_their_own_type() {
    let dns = Arc::new(StubDns::default().answer(
        "www.example.com",
        RecordType::A,
        vec![
            cname_record("www.example.com", "edge.example.net", 300),
            a_record("www.example.com", Ipv4Addr::new(93, 184, 216, 34), 300),
        ],
    ));
    let (prober, _) = prober(dns, Arc::new(CountingGeo::new("Example ISP")), reverse());

    let result = prober.probe("www.example.com").await;

    let a = &result.by_type["A"];
    assert_eq!(a.len(), 1);
    assert!(a.iter().all(|record| record.record_type == "A"));
    assert_eq!(a[0].value, "93.184.216.34");

    let cname = &result.by_type["CNAME"];
    assert_eq!(cname.len(), 1);
    assert_eq!(cname[0].value, "edge.example.net.");
    assert_eq!(result.by_type.len(), 8);
    assert_eq!(result.stats.answers, 2);
}

#[tokio::test]
async fn test_cdn_detected_from_domain_name() {
    let dns = Arc::new(StubDns::default().answer(
        "static.akamaized.example",
        RecordType::A,
        vec![a_record(
            "static.akamaized.example",
            Ipv4Addr::new(23, 10, 0, 1),
            120,
        )],
    ));
    let (prober, _) = prober(dns, Arc::new(CountingGeo::new("Example ISP")), reverse());

    let result = prober.probe("static.akamaized.example").await;

    assert_eq!(
        result.by_type["A"][0].provider_type,
        Some(ProviderType::Cdn)
    );
}

#[tokio::test]
async fn test_probe_result_serializes_records_by_type() {
    let dns = Arc::new(StubDns::default().answer(
        "example.com",
        RecordType::A,
        vec![a_record("example.com", Ipv4Addr::new(93, 184, 216, 34), 3600)],
    ));
    let (prober, _) = prober(dns, Arc::new(CountingGeo::new("Example Hosting LLC")), reverse());

    let result = prober.probe("example.com").await;
    let value = serde_json::to_value(&result).unwrap();

    let a = &value["by_type"]["A"][0];
    assert_eq!(a["type"], "A");
    assert_eq!(a["provider_type"], "Origin");
    assert_eq!(a["hijack_suspected"], false);
    assert!(value["by_type"]["TXT"].as_array().unwrap().is_empty());
    assert_eq!(value["stats"]["max_ttl"], 3600);
}
