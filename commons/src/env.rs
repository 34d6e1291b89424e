use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".bridge-pacer";
const CONFIG_FILE: &str = "config.env";

/// Loads process environment from dotenv files.
///
/// A `.env` in the working directory wins; `~/.bridge-pacer/config.env`
/// fills in anything still unset.
pub fn load_env() {
    let _ = dotenv::dotenv();

    if let Some(defaults) = home_dir().map(|h| h.join(CONFIG_DIR).join(CONFIG_FILE)) {
        let _ = dotenv::from_filename(defaults);
    }
}

pub fn load_env_from_paths(local_env: &Path, default_config: &Path) {
    let _ = dotenv::from_filename(local_env);
    let _ = dotenv::from_filename(default_config);
}

pub fn config_dir() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(CONFIG_DIR),
        None => PathBuf::from(CONFIG_DIR),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
