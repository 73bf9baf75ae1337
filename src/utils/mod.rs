pub mod constants;
pub mod path_utils;
pub mod properties;
pub mod url_utils;

pub use constants::*;
pub use path_utils::{
    ensure_leading_slash, ensure_trailing_slash, file_name, get_base_path, insert_suffix,
    normalize_separators, parent_dir, path_to_slash, split_extension,
};
pub use properties::parse_properties;
pub use url_utils::{get_absolute_uri, is_external, is_passthrough, strip_query_and_fragment};
