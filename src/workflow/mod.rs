pub mod import_flow;
pub mod row_ctx;

pub use import_flow::{ImportFlow, ImportReport, RowOutcome};
pub use row_ctx::RowCtx;
