//! csvpad: 无界面运行的 CSV 项目编辑器
//!
//! 打开（或新建）一个 CSV 文件，把标准输入的每一行（字段以 Tab 分隔）追加为一行 CSV，
//! 由脏状态观察者负责同步标题与自动保存，输入结束时走关闭确认流程。

mod logging;

use csvpad::core::ServiceLocator;
use csvpad::kernel::services::adapters::{
    AsyncRuntime, ConfigService, CsvTextEditor, FixedChoicePrompt, PromptingSaveChangesService,
    WindowTitleService,
};
use csvpad::kernel::services::ports::{MainWindowTitleService, SaveChangesChoice};
use csvpad::kernel::{IsDirtyProjectWatcher, ProjectError, ProjectHost, ProjectManager};
use csvpad::models::location_tag;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(50);
const SAVE_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

const USAGE: &str = "usage: csvpad <file.csv> [--on-close save|discard|cancel]";

struct Args {
    path: PathBuf,
    on_close: SaveChangesChoice,
}

fn parse_choice(value: &str) -> Option<SaveChangesChoice> {
    match value.to_ascii_lowercase().as_str() {
        "save" => Some(SaveChangesChoice::Save),
        "discard" => Some(SaveChangesChoice::Discard),
        "cancel" => Some(SaveChangesChoice::Cancel),
        _ => None,
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut path = None;
    let mut on_close = SaveChangesChoice::Save;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(USAGE.to_string()),
            "--on-close" => {
                let value = args.next().ok_or_else(|| USAGE.to_string())?;
                on_close = parse_choice(&value)
                    .ok_or_else(|| format!("unknown --on-close value: {value}\n{USAGE}"))?;
            }
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument: {arg}\n{USAGE}")),
        }
    }
    let path = path.ok_or_else(|| USAGE.to_string())?;
    Ok(Args { path, on_close })
}

fn to_io(e: ProjectError) -> io::Error {
    io::Error::other(e)
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn open_project(host: &mut ProjectHost, path: &Path) -> Result<(), ProjectError> {
    match host.load(path) {
        Ok(_) => Ok(()),
        Err(ProjectError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "file does not exist, starting a new project");
            host.projects().load_from_text(path, "").map(|_| ())
        }
        Err(e) => Err(e),
    }
}

fn main() -> io::Result<()> {
    let args = parse_args(std::env::args().skip(1))
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    let _logging = logging::init();

    let runtime = Arc::new(AsyncRuntime::new()?);
    let locator = ServiceLocator::new();
    let (projects, rx) = ProjectManager::new(locator.clone(), runtime);
    let config = Arc::new(ConfigService::load_default());
    let title = Arc::new(WindowTitleService::new(projects.clone()));
    let save_changes = Arc::new(PromptingSaveChangesService::new(
        projects.clone(),
        Arc::new(FixedChoicePrompt(args.on_close)),
    ));

    let mut host = ProjectHost::new(projects.clone(), rx);
    host.add_watcher(IsDirtyProjectWatcher::new(
        projects.clone(),
        locator.clone(),
        title.clone(),
        save_changes,
        config,
    ));

    open_project(&mut host, &args.path).map_err(to_io)?;
    host.activate(Some(&args.path)).map_err(to_io)?;
    title.update_title();

    let editor = locator
        .resolve::<CsvTextEditor>(Some(&location_tag(&args.path)))
        .ok_or_else(|| io::Error::other("editor instance missing"))?;

    let mut titles = title.subscribe();
    eprintln!("{}", title.title());

    let lines = spawn_stdin_reader();
    loop {
        match lines.recv_timeout(TICK) {
            Ok(line) => {
                let fields: Vec<&str> = line.split('\t').collect();
                editor.append_row(&fields);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        host.poll(Instant::now());
        if titles.has_changed().unwrap_or(false) {
            eprintln!("{}", *titles.borrow_and_update());
        }
    }

    // 等待进行中的自动保存结束，再进入关闭流程
    let deadline = Instant::now() + SAVE_DRAIN_TIMEOUT;
    host.poll(Instant::now());
    while projects.is_saving(&args.path) && Instant::now() < deadline {
        std::thread::sleep(TICK);
        host.poll(Instant::now());
    }

    if host.close(&args.path).map_err(to_io)? {
        tracing::info!(path = %args.path.display(), "closed");
        Ok(())
    } else {
        Err(io::Error::other(format!(
            "close canceled: unsaved changes in {} were kept",
            args.path.display()
        )))
    }
}
