pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::clean_text;
pub use url_utils::{Coordinates, map_url_for, parse_coordinates, search_url};
