use crate::models::{Project, SaveChangesReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChangesChoice {
    Save,
    Discard,
    Cancel,
}

/// 询问用户如何处理未保存的修改（保存 / 丢弃 / 取消）
pub trait SaveChangesPrompt: Send + Sync {
    fn ask(&self, project: &Project, reason: SaveChangesReason) -> SaveChangesChoice;
}

pub trait SaveProjectChangesService: Send + Sync {
    /// 返回 `true` 表示可以继续执行 `reason` 对应的操作
    fn ensure_changes_saved(&self, project: &Project, reason: SaveChangesReason) -> bool;
}
