pub mod datetime;
pub mod document_parser;
pub mod document_serializer;
pub mod history_parser;
pub mod history_serializer;
pub mod marker_parser;
pub mod marker_serializer;

pub use datetime::{to_date_only, to_time_only};
pub use document_parser::{extract_metadata, extract_title, split_document, strip_header};
pub use document_serializer::build_document;
pub use history_parser::split_history;
pub use history_serializer::reconstruct_history;
pub use marker_parser::{decode, decode_reference_list, decode_value, find_all};
pub use marker_serializer::{encode, encode_field, encode_reference_list, encode_token};
