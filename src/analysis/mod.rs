/// Analysis layer: everything computed from a filtered subset.
///
/// ```text
///   Subset ──► aggregate ──► insight
///      │           │            │
///      └───────────┴──► report ◄┘   SegmentReport (metrics, charts, insights)
/// ```

pub mod aggregate;
pub mod insight;
pub mod report;
