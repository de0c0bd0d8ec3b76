//! 配置服务：漫游配置的 JSON 存储
//!
//! 文件缺失或内容损坏时回退为空配置（即全部使用默认值），运行时可修改并写回。

use crate::kernel::services::ports::ConfigurationService;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::paths::get_settings_path;

pub struct ConfigService {
    values: RwLock<Map<String, Value>>,
    path: Option<PathBuf>,
}

impl ConfigService {
    /// 不落盘的配置，`save` 为空操作
    pub fn in_memory() -> Self {
        Self {
            values: RwLock::new(Map::new()),
            path: None,
        }
    }

    pub fn load_default() -> Self {
        match get_settings_path() {
            Some(path) => Self::load(path),
            None => {
                tracing::warn!("cannot determine settings directory, using in-memory settings");
                Self::in_memory()
            }
        }
    }

    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_settings(&path).unwrap_or_default();
        Self {
            values: RwLock::new(values),
            path: Some(path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&*self.values.read())?;
        std::fs::write(path, content)
    }
}

fn read_settings(path: &Path) -> Option<Map<String, Value>> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read settings");
            return None;
        }
    };
    match serde_json::from_str::<Value>(&data) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "settings root is not an object, ignoring");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed settings, ignoring");
            None
        }
    }
}

impl ConfigurationService for ConfigService {
    fn roaming_value(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn set_roaming_value(&self, key: &str, value: Value) {
        self.values.write().insert(key.to_string(), value);
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/config.rs"]
mod tests;
