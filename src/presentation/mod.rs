//! 展示层（Presentation Layer）
//!
//! 把查询结果渲染成终端文本，不访问后端，不持有状态。
//! 所有函数返回 `String`，由调用方决定输出位置。

pub mod admin_table;
pub mod category_grid;
pub mod import_report;
pub mod question_card;
pub mod share_link;
pub mod styles;

pub use admin_table::render_admin_table;
pub use category_grid::render_category_grid;
pub use import_report::render_import_report;
pub use question_card::{render_question_card, render_question_list, EMPTY_LIST_MESSAGE};
pub use share_link::{parse_site_url, search_query, share_link};
