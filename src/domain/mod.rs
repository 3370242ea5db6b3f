//! Domain types: tabs, filters, snapshots and record references

pub mod filters;
pub mod record;
pub mod snapshot;
pub mod tab;

pub use filters::{FilterField, FilterPolicy, FilterState};
pub use record::{ListView, RecordKind, RecordRef};
pub use snapshot::{
    DailyCount, DashboardSnapshot, Kpis, StatusCount, SummaryRecord, TabSnapshot, TaskSummary,
};
pub use tab::{Bucket, Tab};
