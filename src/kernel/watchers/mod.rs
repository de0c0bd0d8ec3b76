//! 项目观察者：宿主线程上按顺序收到项目生命周期回调

mod auto_save_timer;
mod is_dirty;

pub use auto_save_timer::AutoSaveTimer;
pub use is_dirty::IsDirtyProjectWatcher;

use crate::models::{Project, ProjectCancelEvent};
use std::time::Instant;

/// 所有回调默认为空操作，实现方只覆盖关心的事件
pub trait ProjectWatcher {
    fn name(&self) -> &'static str;

    fn on_activated(&mut self, _old: Option<&Project>, _new: Option<&Project>) {}

    fn on_saved(&mut self, _project: &Project) {}

    /// 置 `event.cancel` 可阻止关闭
    fn on_closing(&mut self, _event: &mut ProjectCancelEvent) {}

    fn on_closed(&mut self, _project: &Project) {}

    fn on_tick(&mut self, _now: Instant) {}
}
