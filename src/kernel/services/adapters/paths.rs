//! 应用目录管理
//!
//! 漫游配置（随用户迁移）与本地数据（日志）分开存放：
//! - macOS: ~/Library/Application Support/csvpad/{settings.json,logs}
//! - Linux: ~/.config/csvpad/settings.json, ~/.local/share/csvpad/logs
//! - Windows: %APPDATA%\csvpad\settings.json, %LOCALAPPDATA%\csvpad\logs

use std::path::PathBuf;

const APP_NAME: &str = "csvpad";
const SETTINGS_FILE: &str = "settings.json";
const LOG_DIR: &str = "logs";

/// 漫游配置目录
fn get_roaming_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join("Library/Application Support")
                .join(APP_NAME)
        })
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            Some(PathBuf::from(xdg).join(APP_NAME))
        } else {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".config").join(APP_NAME))
        }
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_NAME))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

/// 本地数据目录（不漫游）
fn get_local_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        get_roaming_dir()
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            Some(PathBuf::from(xdg).join(APP_NAME))
        } else {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".local/share").join(APP_NAME))
        }
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("LOCALAPPDATA")
            .ok()
            .map(|local| PathBuf::from(local).join(APP_NAME))
            .or_else(get_roaming_dir)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

pub fn get_settings_path() -> Option<PathBuf> {
    get_roaming_dir().map(|dir| dir.join(SETTINGS_FILE))
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_local_data_dir().map(|dir| dir.join(LOG_DIR))
}

/// 确保日志目录存在
pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let dir = get_log_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine log directory",
        )
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/paths.rs"]
mod tests;
