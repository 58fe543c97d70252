//! Result projection module
//!
//! Maps raw response pages to the item sequence a caller sees: the
//! documented result collection, the whole response, one named field, or a
//! JSONPath expression.

mod extract;
mod types;

pub use extract::{extract_path, extract_string, extract_with_jsonpath};
pub use types::Projection;
