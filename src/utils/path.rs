//! Normalization of user-supplied paths.

use std::path::PathBuf;

/// Normalize a user-provided local path string into a PathBuf.
///
/// - Trims leading/trailing whitespace
/// - Strips surrounding single or double quotes if present
/// - Expands a leading '~' to the home directory when possible
pub fn normalize_user_input_path(input: &str) -> PathBuf {
    let unquoted = strip_matching_quotes(input.trim());

    if let Some(rest) = unquoted.strip_prefix('~') {
        // "~" or "~/sub/path"; "~user" is left alone
        if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') {
            if let Some(mut home) = dirs::home_dir() {
                let rest = rest.trim_start_matches(['/', '\\']);
                if !rest.is_empty() {
                    home.push(rest);
                }
                return home;
            }
        }
    }

    PathBuf::from(unquoted)
}

/// Normalizes every input and drops the ones that end up empty
pub fn normalize_input_paths<S: AsRef<str>>(inputs: &[S]) -> Vec<PathBuf> {
    inputs
        .iter()
        .map(|input| normalize_user_input_path(input.as_ref()))
        .filter(|path| !path.as_os_str().is_empty())
        .collect()
}

fn strip_matching_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
