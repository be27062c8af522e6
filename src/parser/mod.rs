pub mod export_table;

pub use export_table::{parse_export_line, parse_exports, ExportList, TABLE_HEADER};
