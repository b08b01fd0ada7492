//! Record types probed for every domain.

use hickory_proto::rr::RecordType;

/// A `(type code, name)` pair from the probe table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordTypeSpec {
    pub record_type: RecordType,
    pub name: &'static str,
}

/// Every record type queried per domain, one concurrent task each.
pub const RECORD_TYPES: [RecordTypeSpec; 8] = [
    RecordTypeSpec {
        record_type: RecordType::A,
        name: "A",
    },
    RecordTypeSpec {
        record_type: RecordType::AAAA,
        name: "AAAA",
    },
    RecordTypeSpec {
        record_type: RecordType::MX,
        name: "MX",
    },
    RecordTypeSpec {
        record_type: RecordType::NS,
        name: "NS",
    },
    RecordTypeSpec {
        record_type: RecordType::TXT,
        name: "TXT",
    },
    RecordTypeSpec {
        record_type: RecordType::CNAME,
        name: "CNAME",
    },
    RecordTypeSpec {
        record_type: RecordType::SOA,
        name: "SOA",
    },
    RecordTypeSpec {
        record_type: RecordType::CAA,
        name: "CAA",
    },
];
