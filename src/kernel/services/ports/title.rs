pub trait MainWindowTitleService: Send + Sync {
    /// 按当前项目状态重新计算标题
    fn update_title(&self);

    fn title(&self) -> String;
}
