mod error;
mod parse;

pub use error::{FormatError, FrontMatterError, ValidationError};
pub use parse::{changeset_id_from_path, parse_changeset};
