//! CSV 文本编辑实例
//!
//! 以 Rope 保存文本，脏状态由版本号判断：每次编辑 `version += 1`，
//! 保存完成时记录 `saved_version`，两者不等即为脏。

use crate::kernel::services::ports::{
    CsvTextEditorInstance, EditorEvent, SubscriptionId, TextSnapshot,
};
use crate::models::format_row;
use parking_lot::Mutex;
use ropey::Rope;
use std::ops::Range;
use std::sync::mpsc::Sender;

struct EditorInner {
    rope: Rope,
    version: u64,
    saved_version: u64,
    subscribers: Vec<(SubscriptionId, Sender<EditorEvent>)>,
    next_subscription: u64,
}

impl EditorInner {
    fn bump_and_notify(&mut self) {
        self.version += 1;
        let event = EditorEvent::TextChanged {
            version: self.version,
        };
        // 接收端已释放的订阅直接清理
        self.subscribers.retain(|(_, tx)| tx.send(event).is_ok());
    }
}

pub struct CsvTextEditor {
    inner: Mutex<EditorInner>,
}

impl CsvTextEditor {
    pub fn new() -> Self {
        Self::from_text("")
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            inner: Mutex::new(EditorInner {
                rope: Rope::from_str(text),
                version: 0,
                saved_version: 0,
                subscribers: Vec::new(),
                next_subscription: 0,
            }),
        }
    }

    pub fn text(&self) -> String {
        self.inner.lock().rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.inner.lock().rope.len_chars()
    }

    pub fn version(&self) -> u64 {
        self.inner.lock().version
    }

    /// 在字符偏移处插入，越界时追加到末尾
    pub fn insert(&self, char_idx: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let mut inner = self.inner.lock();
        let idx = char_idx.min(inner.rope.len_chars());
        inner.rope.insert(idx, text);
        inner.bump_and_notify();
    }

    /// 删除字符区间，区间会被裁剪到文本范围内
    pub fn remove(&self, range: Range<usize>) {
        let mut inner = self.inner.lock();
        let len = inner.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return;
        }
        inner.rope.remove(start..end);
        inner.bump_and_notify();
    }

    pub fn set_text(&self, text: &str) {
        let mut inner = self.inner.lock();
        inner.rope = Rope::from_str(text);
        inner.bump_and_notify();
    }

    /// 追加一行 CSV；末尾没有换行时先补一个
    pub fn append_row<S: AsRef<str>>(&self, fields: &[S]) {
        let mut inner = self.inner.lock();
        let mut line = String::new();
        let len = inner.rope.len_chars();
        if len > 0 && inner.rope.char(len - 1) != '\n' {
            line.push('\n');
        }
        line.push_str(&format_row(fields));
        line.push('\n');
        inner.rope.insert(len, &line);
        inner.bump_and_notify();
    }
}

impl Default for CsvTextEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvTextEditorInstance for CsvTextEditor {
    fn is_dirty(&self) -> bool {
        let inner = self.inner.lock();
        inner.version != inner.saved_version
    }

    fn subscribe_text_changed(&self, tx: Sender<EditorEvent>) -> SubscriptionId {
        let mut inner = self.inner.lock();
        inner.next_subscription += 1;
        let id = SubscriptionId(inner.next_subscription);
        inner.subscribers.push((id, tx));
        id
    }

    fn unsubscribe_text_changed(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sub, _)| *sub != id);
        inner.subscribers.len() != before
    }

    fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    fn snapshot(&self) -> TextSnapshot {
        let inner = self.inner.lock();
        TextSnapshot {
            rope: inner.rope.clone(),
            version: inner.version,
        }
    }

    fn mark_saved(&self, version: u64) {
        let mut inner = self.inner.lock();
        if version > inner.version {
            tracing::debug!(version, current = inner.version, "ignoring save mark from the future");
            return;
        }
        // 较早发起的保存晚到时不能回退保存点
        inner.saved_version = inner.saved_version.max(version);
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/csv_editor.rs"]
mod tests;
