use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Service not found: {0}")]
    NotFound(String),
    #[error("Service already registered: {0}")]
    AlreadyRegistered(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ServiceKey {
    type_id: TypeId,
    tag: Option<String>,
}

impl ServiceKey {
    fn of<T: ?Sized + 'static>(tag: Option<&str>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            tag: tag.map(str::to_owned),
        }
    }
}

fn describe<T: ?Sized>(tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("{} [{}]", std::any::type_name::<T>(), tag),
        None => std::any::type_name::<T>().to_string(),
    }
}

/// 服务定位器：按 (类型, 可选 tag) 注册与解析共享实例
///
/// `T` 可以是 trait object（如 `dyn CsvTextEditorInstance`），
/// 内部以 `Arc<T>` 的形式存放在 `Box<dyn Any>` 中，解析时直接 downcast。
#[derive(Clone, Default)]
pub struct ServiceLocator {
    entries: Arc<RwLock<FxHashMap<ServiceKey, Box<dyn Any + Send + Sync>>>>,
}

impl ServiceLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_instance<T>(&self, tag: Option<&str>, instance: Arc<T>) -> Result<()>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = ServiceKey::of::<T>(tag);
        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            return Err(ServiceError::AlreadyRegistered(describe::<T>(tag)));
        }
        entries.insert(key, Box::new(instance));
        Ok(())
    }

    pub fn is_type_registered<T>(&self, tag: Option<&str>) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.entries.read().contains_key(&ServiceKey::of::<T>(tag))
    }

    pub fn resolve<T>(&self, tag: Option<&str>) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.entries
            .read()
            .get(&ServiceKey::of::<T>(tag))
            .and_then(|entry| entry.downcast_ref::<Arc<T>>())
            .cloned()
    }

    pub fn require<T>(&self, tag: Option<&str>) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve::<T>(tag)
            .ok_or_else(|| ServiceError::NotFound(describe::<T>(tag)))
    }

    pub fn remove<T>(&self, tag: Option<&str>) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.entries
            .write()
            .remove(&ServiceKey::of::<T>(tag))
            .and_then(|entry| entry.downcast::<Arc<T>>().ok())
            .map(|boxed| *boxed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/service.rs"]
mod tests;
