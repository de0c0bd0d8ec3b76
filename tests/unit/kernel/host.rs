use super::*;
use crate::core::ServiceLocator;
use crate::kernel::services::adapters::AsyncRuntime;
use crate::kernel::services::ports::{AsyncExecutor, BoxFuture};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

struct NoopExecutor;

impl AsyncExecutor for NoopExecutor {
    fn spawn(&self, _task: BoxFuture) {}
}

type Log = Arc<Mutex<Vec<String>>>;

struct RecordingWatcher {
    name: &'static str,
    log: Log,
    cancel_closing: bool,
}

impl RecordingWatcher {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            cancel_closing: false,
        }
    }

    fn record(&self, entry: String) {
        self.log.lock().push(format!("{}:{}", self.name, entry));
    }
}

fn short(project: Option<&Project>) -> String {
    project
        .and_then(|p| p.location().file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "-".to_string())
}

impl ProjectWatcher for RecordingWatcher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_activated(&mut self, old: Option<&Project>, new: Option<&Project>) {
        self.record(format!("activated {}->{}", short(old), short(new)));
    }

    fn on_saved(&mut self, project: &Project) {
        self.record(format!("saved {}", short(Some(project))));
    }

    fn on_closing(&mut self, event: &mut ProjectCancelEvent) {
        self.record(format!("closing canceled={}", event.cancel));
        if self.cancel_closing {
            event.cancel = true;
        }
    }

    fn on_closed(&mut self, project: &Project) {
        self.record(format!("closed {}", short(Some(project))));
    }

    fn on_tick(&mut self, _now: Instant) {
        self.record("tick".to_string());
    }
}

fn host_with(executor: Arc<dyn AsyncExecutor>) -> ProjectHost {
    let (projects, rx) = ProjectManager::new(ServiceLocator::new(), executor);
    ProjectHost::new(projects, rx)
}

fn entries(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.lock())
}

#[test]
fn activation_is_dispatched_only_on_change() {
    let log = Log::default();
    let mut host = host_with(Arc::new(NoopExecutor));
    host.add_watcher(RecordingWatcher::new("w", &log));
    host.projects().load_from_text("/p/a.csv", "").unwrap();
    host.projects().load_from_text("/p/b.csv", "").unwrap();

    host.activate(Some(Path::new("/p/a.csv"))).unwrap();
    host.activate(Some(Path::new("/p/a.csv"))).unwrap();
    host.activate(Some(Path::new("/p/b.csv"))).unwrap();
    host.activate(None).unwrap();

    assert_eq!(
        entries(&log),
        vec![
            "w:activated -->a.csv",
            "w:activated a.csv->b.csv",
            "w:activated b.csv->-",
        ]
    );
}

#[test]
fn activating_unknown_project_fails_without_dispatch() {
    let log = Log::default();
    let mut host = host_with(Arc::new(NoopExecutor));
    host.add_watcher(RecordingWatcher::new("w", &log));

    let err = host.activate(Some(Path::new("/p/none.csv"))).unwrap_err();
    assert!(matches!(err, ProjectError::NotLoaded(_)));
    assert!(entries(&log).is_empty());
}

#[test]
fn canceled_close_keeps_project_open() {
    let log = Log::default();
    let mut host = host_with(Arc::new(NoopExecutor));
    let mut first = RecordingWatcher::new("first", &log);
    first.cancel_closing = true;
    host.add_watcher(first);
    host.add_watcher(RecordingWatcher::new("second", &log));
    assert_eq!(host.watcher_names(), vec!["first", "second"]);

    host.projects().load_from_text("/p/a.csv", "").unwrap();
    host.activate(Some(Path::new("/p/a.csv"))).unwrap();
    entries(&log);

    assert!(!host.close("/p/a.csv").unwrap());
    assert_eq!(
        entries(&log),
        vec!["first:closing canceled=false", "second:closing canceled=true"]
    );
    assert!(host.projects().project(Path::new("/p/a.csv")).is_some());
    assert!(host.projects().active_project().is_some());
}

#[test]
fn close_deactivates_then_removes() {
    let log = Log::default();
    let mut host = host_with(Arc::new(NoopExecutor));
    host.add_watcher(RecordingWatcher::new("w", &log));
    host.projects().load_from_text("/p/a.csv", "").unwrap();
    host.activate(Some(Path::new("/p/a.csv"))).unwrap();
    entries(&log);

    assert!(host.close("/p/a.csv").unwrap());
    assert_eq!(
        entries(&log),
        vec![
            "w:closing canceled=false",
            "w:activated a.csv->-",
            "w:closed a.csv",
        ]
    );
    assert!(host.projects().projects().is_empty());
    assert!(host.close("/p/a.csv").is_err());
}

#[test]
fn poll_dispatches_saved_then_ticks() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.csv");
    let log = Log::default();
    let mut host = host_with(Arc::new(NoopExecutor));
    host.add_watcher(RecordingWatcher::new("w", &log));
    host.projects().load_from_text(&path, "x\n").unwrap();
    host.projects().save_now(&path).unwrap();

    assert!(host.poll(Instant::now()));
    assert_eq!(entries(&log), vec!["w:saved a.csv", "w:tick"]);

    assert!(!host.poll(Instant::now()));
    assert_eq!(entries(&log), vec!["w:tick"]);
}

#[test]
fn save_result_for_closed_project_is_ignored() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.csv");
    let log = Log::default();
    let mut host = host_with(Arc::new(NoopExecutor));
    host.add_watcher(RecordingWatcher::new("w", &log));
    host.projects().load_from_text(&path, "").unwrap();
    host.projects().save_now(&path).unwrap();
    assert!(host.close(&path).unwrap());
    entries(&log);

    assert!(!host.poll(Instant::now()));
    assert_eq!(entries(&log), vec!["w:tick"]);
}

#[test]
fn sync_write_completion_keeps_background_save_in_flight() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.csv");
    let log = Log::default();
    let mut host = host_with(Arc::new(NoopExecutor));
    host.add_watcher(RecordingWatcher::new("w", &log));
    host.projects().load_from_text(&path, "x\n").unwrap();

    host.projects().save_now(&path).unwrap();
    // NoopExecutor 丢弃任务，后台保存一直处于进行中
    host.save(&path).unwrap();

    assert!(host.poll(Instant::now()));
    assert_eq!(entries(&log), vec!["w:saved a.csv", "w:tick"]);
    assert!(host.projects().is_saving(&path));
    assert!(matches!(
        host.save(&path),
        Err(ProjectError::SaveInProgress(_))
    ));
}

fn poll_until(host: &mut ProjectHost, mut done: impl FnMut(&ProjectHost) -> bool) {
    for _ in 0..500 {
        host.poll(Instant::now());
        if done(host) {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("condition not reached");
}

#[test]
fn failed_background_save_is_logged_not_dispatched() {
    let dir = tempdir().unwrap();
    let path: PathBuf = dir.path().join("missing").join("a.csv");
    let log = Log::default();
    let runtime = Arc::new(AsyncRuntime::new().unwrap());
    let mut host = host_with(runtime);
    host.add_watcher(RecordingWatcher::new("w", &log));
    host.projects().load_from_text(&path, "x").unwrap();

    host.save(&path).unwrap();
    assert!(host.projects().is_saving(&path));
    poll_until(&mut host, |h| !h.projects().is_saving(&path));

    assert!(entries(&log).iter().all(|e| e == "w:tick"));
}
