//! Human-readable record tree.

use crate::probe::ProbeResult;
use crate::resolver::ResolvedRecord;
use crate::utils::duration_to_ms_f64;

/// Renders a probe result as an indented tree, children nested under the
/// CNAME/MX/NS row they were expanded from.
///
/// ```text
/// example.com
///   A (1)
///     - A 93.184.216.34 ttl=3600 [AS15133 (Edgecast Inc.) | United States/Norwell | Origin] 1.204ms
///   stats: ttl 3600/3600.0/3600 latency 1.204/1.204/1.204ms total 1.204ms
/// ```
pub fn render_tree(domain: &str, result: &ProbeResult) -> String {
    let mut out = format!("{domain}\n");

    for (type_name, records) in &result.by_type {
        out.push_str(&format!("  {} ({})\n", type_name, records.len()));
        for record in records {
            render_record(&mut out, record, 2);
        }
    }

    let stats = &result.stats;
    out.push_str(&format!(
        "  stats: ttl {}/{:.1}/{} latency {:.3}/{:.3}/{:.3}ms total {:.3}ms\n",
        stats.min_ttl,
        stats.avg_ttl,
        stats.max_ttl,
        duration_to_ms_f64(stats.min_latency),
        duration_to_ms_f64(stats.avg_latency),
        duration_to_ms_f64(stats.max_latency),
        duration_to_ms_f64(stats.total_latency),
    ));
    out
}

fn render_record(out: &mut String, record: &ResolvedRecord, indent: usize) {
    let mut line = format!(
        "{}- {} {} ttl={}",
        "  ".repeat(indent),
        record.record_type,
        record.value,
        record.ttl
    );
    if record.dnssec {
        line.push_str(" dnssec");
    }
    if let Some(provider_type) = record.provider_type {
        line.push_str(&format!(
            " [{} | {}/{} | {}]",
            record.asn, record.country, record.city, provider_type
        ));
        if record.isp != record.asn && !record.isp.is_empty() {
            line.push_str(&format!(" isp={}", record.isp));
        }
        if !record.reverse_ptr.is_empty() {
            line.push_str(&format!(" ptr={}", record.reverse_ptr));
        }
    }
    if record.hijack_suspected {
        line.push_str(" HIJACK?");
    }
    line.push_str(&format!(" {:.3}ms\n", duration_to_ms_f64(record.query_duration)));
    out.push_str(&line);

    for child in &record.children {
        render_record(out, child, indent + 1);
    }
}
