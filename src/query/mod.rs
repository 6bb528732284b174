// Submodules for separation of concerns
mod eval;
mod exec;
mod translate;
mod types;

// Public API re-exports
pub use eval::{
    CompiledFilter, as_f64, bson_eq, compare_bracketed, eval_filter, get_path, project_fields, resolve_path,
};
pub use exec::{apply_update, run_query};
pub use types::{CmpOp, Filter, QueryExpression, UpdateDoc, UpdateReport};
