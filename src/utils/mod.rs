pub mod path;

pub use path::{normalize_input_paths, normalize_user_input_path};
