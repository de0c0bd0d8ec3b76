//! 漫游配置：键名、默认值与读取契约

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// 自动保存间隔，以毫秒存储
pub const AUTO_SAVE_INTERVAL: &str = "AutoSaveInterval";
pub const AUTO_SAVE_INTERVAL_DEFAULT: Duration = Duration::from_secs(5);

pub const AUTO_SAVE_EDITOR: &str = "AutoSaveEditor";
pub const AUTO_SAVE_EDITOR_DEFAULT: bool = false;

pub trait ConfigurationService: Send + Sync {
    fn roaming_value(&self, key: &str) -> Option<Value>;

    fn set_roaming_value(&self, key: &str, value: Value);
}

pub trait ConfigurationExt: ConfigurationService {
    /// 键不存在或值类型不符时都返回 `default`
    fn get_roaming_value<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.roaming_value(key) {
            Some(value) => match serde_json::from_value(value) {
                Ok(v) => v,
                Err(e) => {
                    tracing::debug!(key, error = %e, "roaming value has unexpected type, using default");
                    default
                }
            },
            None => default,
        }
    }

    fn auto_save_interval(&self) -> Duration {
        let default_ms = AUTO_SAVE_INTERVAL_DEFAULT.as_millis() as u64;
        Duration::from_millis(self.get_roaming_value(AUTO_SAVE_INTERVAL, default_ms))
    }

    fn auto_save_enabled(&self) -> bool {
        self.get_roaming_value(AUTO_SAVE_EDITOR, AUTO_SAVE_EDITOR_DEFAULT)
    }
}

impl<C: ConfigurationService + ?Sized> ConfigurationExt for C {}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/config.rs"]
mod tests;
