use std::future::Future;
use std::pin::Pin;

pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// 后台任务执行器：提交即返回，不等待结果
pub trait AsyncExecutor: Send + Sync {
    fn spawn(&self, task: BoxFuture);
}

pub trait AsyncExecutorExt: AsyncExecutor {
    fn spawn_future<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn(Box::pin(task));
    }
}

impl<E: AsyncExecutor + ?Sized> AsyncExecutorExt for E {}
