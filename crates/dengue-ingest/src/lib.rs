pub mod columns;
pub mod dates;
pub mod discovery;
pub mod error;
pub mod frame;
pub mod polars_utils;
pub mod reader;

pub use dates::parse_case_date;
pub use discovery::{YearFile, find_year_files, resolve_year_file};
pub use error::{IngestError, Result};
pub use frame::CaseFrame;
pub use polars_utils::{
    any_to_f64, any_to_i64, any_to_string, filter_rows, format_numeric, has_column,
    numeric_column_i64, parse_f64, parse_i64, string_column,
};
pub use reader::read_case_frame;
