pub mod console;
pub mod writer_csv;
pub mod writer_jsonl;

pub use console::{render_breaches, render_report, render_username_header};
pub use writer_csv::write_csv;
pub use writer_jsonl::{read_jsonl, write_jsonl};
