pub mod category;
pub mod draft;
pub mod loaders;
pub mod question;
pub mod session;

pub use category::{Category, CategoryLookup, CategoryWithCount};
pub use draft::QuestionDraft;
pub use loaders::{load_csv_file, load_text_file};
pub use question::{Difficulty, NewQuestion, Question, QuestionRecord};
pub use session::{AuthContext, Session};
