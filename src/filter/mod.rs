//! Compilation of caller filter options into a store query plus a
//! post-filter, and the refinement step that applies the post-filter.

mod builder;
mod options;
mod refine;

pub use builder::{ACCESSIBILITY_FEATURE, CompiledQuery, SUMMARY_PROJECTION, build, build_by_id, build_summary};
pub use options::{
    ELEVATOR_ABSENT_MARKER, ElevatorFilter, FilterOptions, FilterOptionsSerde, StateFilter,
    UNCLASSIFIED_SENTINEL,
};
pub use refine::{PostFilter, refine};
