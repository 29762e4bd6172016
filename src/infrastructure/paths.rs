//! Path helpers for locating the data directory and expanding user paths.

use std::path::PathBuf;

/// Directory name under the platform data directory.
const APP_DIR: &str = "filter-sheet";

/// Returns the data directory used for persisted filters and traces.
///
/// Resolves to `$XDG_DATA_HOME/filter-sheet` when set, otherwise
/// `~/.local/share/filter-sheet`. Falls back to a relative `.filter-sheet`
/// directory when no home directory is known.
///
/// # Examples
///
/// ```
/// use filter_sheet::infrastructure::get_data_dir;
///
/// let storage_file = get_data_dir().join("filters.json");
/// assert!(storage_file.ends_with("filters.json"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|value| !value.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }

    home_dir().map_or_else(
        || PathBuf::from(format!(".{APP_DIR}")),
        |home| home.join(".local").join("share").join(APP_DIR),
    )
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a tilde, or with no known home directory, are returned as-is.
///
/// # Examples
///
/// ```
/// use filter_sheet::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = home_dir() else {
        return path.to_string();
    };

    if path == "~" {
        home.to_string_lossy().into_owned()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest).to_string_lossy().into_owned()
    } else {
        path.to_string()
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
