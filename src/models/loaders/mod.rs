pub mod csv_loader;

pub use csv_loader::{load_csv_file, load_text_file};
