use std::path::PathBuf;

const APP_DIR: &str = "audiotour";

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(temp_dir)
        .join(APP_DIR)
}

pub fn data_dir() -> PathBuf {
    // ~/.local/share/audiotour on Linux/macOS, %APPDATA% equivalent on Windows.
    dirs::data_dir().unwrap_or_else(temp_dir).join(APP_DIR)
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(APP_DIR)
}
