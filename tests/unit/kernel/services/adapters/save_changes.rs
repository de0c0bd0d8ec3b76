use super::*;
use crate::core::ServiceLocator;
use crate::kernel::services::adapters::CsvTextEditor;
use crate::kernel::services::ports::{AsyncExecutor, BoxFuture, CsvTextEditorInstance};
use crate::models::location_tag;
use parking_lot::Mutex;
use tempfile::tempdir;

struct NoopExecutor;

impl AsyncExecutor for NoopExecutor {
    fn spawn(&self, _task: BoxFuture) {}
}

#[derive(Default)]
struct RecordingPrompt {
    answer: Mutex<Option<SaveChangesChoice>>,
    asked: Mutex<Vec<SaveChangesReason>>,
}

impl RecordingPrompt {
    fn answering(choice: SaveChangesChoice) -> Arc<Self> {
        Arc::new(Self {
            answer: Mutex::new(Some(choice)),
            asked: Mutex::new(Vec::new()),
        })
    }
}

impl SaveChangesPrompt for RecordingPrompt {
    fn ask(&self, _project: &Project, reason: SaveChangesReason) -> SaveChangesChoice {
        self.asked.lock().push(reason);
        self.answer.lock().unwrap_or(SaveChangesChoice::Cancel)
    }
}

fn dirty_project(dir: &std::path::Path) -> (ProjectManager, Project, Arc<CsvTextEditor>) {
    let (projects, _rx) = ProjectManager::new(ServiceLocator::new(), Arc::new(NoopExecutor));
    let path = dir.join("p.csv");
    projects.load_from_text(&path, "").unwrap();
    let editor = projects
        .locator()
        .resolve::<CsvTextEditor>(Some(&location_tag(&path)))
        .unwrap();
    editor.append_row(&["a"]);
    projects.set_is_dirty(&path, true);
    let project = projects.project(&path).unwrap();
    (projects, project, editor)
}

#[test]
fn clean_project_is_safe_without_asking() {
    let dir = tempdir().unwrap();
    let (projects, project, _editor) = dirty_project(dir.path());
    projects.set_is_dirty(project.location(), false);

    let prompt = RecordingPrompt::answering(SaveChangesChoice::Cancel);
    let service = PromptingSaveChangesService::new(projects, prompt.clone());

    assert!(service.ensure_changes_saved(&project, SaveChangesReason::Closing));
    assert!(prompt.asked.lock().is_empty());
}

#[test]
fn save_choice_writes_file() {
    let dir = tempdir().unwrap();
    let (projects, project, editor) = dirty_project(dir.path());
    let prompt = RecordingPrompt::answering(SaveChangesChoice::Save);
    let service = PromptingSaveChangesService::new(projects, prompt.clone());

    assert!(service.ensure_changes_saved(&project, SaveChangesReason::Closing));
    assert_eq!(*prompt.asked.lock(), vec![SaveChangesReason::Closing]);
    assert_eq!(std::fs::read_to_string(project.location()).unwrap(), "a\n");
    assert!(!editor.is_dirty());
}

#[test]
fn save_failure_is_not_safe() {
    let dir = tempdir().unwrap();
    let (projects, _project, _editor) = dirty_project(dir.path());
    let missing = dir.path().join("missing").join("q.csv");
    projects.load_from_text(&missing, "").unwrap();
    projects.set_is_dirty(&missing, true);
    let project = projects.project(&missing).unwrap();

    let service = PromptingSaveChangesService::new(
        projects,
        Arc::new(FixedChoicePrompt(SaveChangesChoice::Save)),
    );
    assert!(!service.ensure_changes_saved(&project, SaveChangesReason::Closing));
}

#[test]
fn discard_is_safe_and_cancel_is_not() {
    let dir = tempdir().unwrap();
    let (projects, project, editor) = dirty_project(dir.path());

    let discard = PromptingSaveChangesService::new(
        projects.clone(),
        Arc::new(FixedChoicePrompt(SaveChangesChoice::Discard)),
    );
    assert!(discard.ensure_changes_saved(&project, SaveChangesReason::Closing));
    assert!(editor.is_dirty());
    assert!(!project.location().exists());

    let cancel = PromptingSaveChangesService::new(
        projects,
        Arc::new(FixedChoicePrompt(SaveChangesChoice::Cancel)),
    );
    assert!(!cancel.ensure_changes_saved(&project, SaveChangesReason::Closing));
}
