use ropey::Rope;
use std::sync::mpsc::Sender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    TextChanged { version: u64 },
}

/// 保存时使用的文本快照
#[derive(Debug, Clone)]
pub struct TextSnapshot {
    pub rope: Rope,
    pub version: u64,
}

/// 某个项目对应的 CSV 文本编辑实例
pub trait CsvTextEditorInstance: Send + Sync {
    fn is_dirty(&self) -> bool;

    fn subscribe_text_changed(&self, tx: Sender<EditorEvent>) -> SubscriptionId;

    /// `id` 未订阅时返回 `false`
    fn unsubscribe_text_changed(&self, id: SubscriptionId) -> bool;

    fn subscriber_count(&self) -> usize;

    fn snapshot(&self) -> TextSnapshot;

    /// 取得 `version` 之后又有编辑时，编辑器仍为脏
    fn mark_saved(&self, version: u64);
}
