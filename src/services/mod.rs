pub mod admin_mutation;
pub mod answer_renderer;
pub mod auth;
pub mod catalog_query;
pub mod csv_importer;
pub mod import_log;
pub mod search;

pub use admin_mutation::{AdminService, SubmitOutcome};
pub use answer_renderer::{render_answer, AnswerBlock};
pub use auth::AuthService;
pub use catalog_query::CatalogQuery;
pub use csv_importer::{parse_csv, plan_import, CsvDialect, CsvRow, ImportPlan, RowWarning};
pub use import_log::ImportLogWriter;
pub use search::filter_questions;
