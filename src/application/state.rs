//! Terminal session state for the application form.
//!
//! `App` owns the session's [`FormStateStore`] together with the cursor and
//! mode state of the terminal UI, and runs submissions on a background
//! thread so the form stays editable while a request is outstanding.

use super::store::{
    ApiReply, FieldInput, FormStateStore, IntakeApi, SubmissionOutcome, SubmissionState,
    SubmitStart, SUCCESS_MESSAGE,
};
use crate::domain::{FieldId, FieldKind, SubmissionError};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use strum::IntoEnumIterator;
use tracing::{debug, error};

/// Represents the current mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Navigation mode - arrow keys move between fields
    Normal,
    /// Text editing mode - keystrokes go into the selected text field
    Editing,
    /// Help screen is displayed
    Help,
}

type SubmissionResult = Result<ApiReply, SubmissionError>;

/// Main application state containing the form store and UI state.
pub struct App {
    /// The form session being edited
    pub store: FormStateStore,
    /// Currently selected field
    pub selected: FieldId,
    /// Highlighted option within a choice field
    pub option_cursor: usize,
    /// Current application mode
    pub mode: AppMode,
    /// Cursor position (in characters) within the edited text
    pub cursor_position: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    api: Arc<dyn IntakeApi + Send + Sync>,
    pending: Option<Receiver<SubmissionResult>>,
}

impl App {
    /// Creates the session around an explicitly constructed store.
    pub fn new(store: FormStateStore, api: Arc<dyn IntakeApi + Send + Sync>) -> Self {
        let mut app = Self {
            store,
            selected: FieldId::FullName,
            option_cursor: 0,
            mode: AppMode::Normal,
            cursor_position: 0,
            help_scroll: 0,
            status_message: None,
            api,
            pending: None,
        };
        app.sync_option_cursor();
        app
    }

    /// Moves the selection to the previous field.
    pub fn select_previous(&mut self) {
        let index = self.selected as usize;
        if index > 0 {
            self.select(index - 1);
        }
    }

    /// Moves the selection to the next field.
    pub fn select_next(&mut self) {
        self.select(self.selected as usize + 1);
    }

    fn select(&mut self, index: usize) {
        if let Some(field) = FieldId::iter().nth(index) {
            self.selected = field;
            self.sync_option_cursor();
        }
    }

    /// Points the option cursor at the current choice of a single-choice
    /// field, or at the first option otherwise.
    fn sync_option_cursor(&mut self) {
        self.option_cursor = match self.selected.kind() {
            FieldKind::SingleChoice(options) => {
                let current = self.store.record().text(self.selected);
                options.iter().position(|option| *option == current).unwrap_or(0)
            }
            _ => 0,
        };
    }

    /// Switches to editing mode if the selected field takes free text.
    pub fn start_editing(&mut self) {
        if matches!(self.selected.kind(), FieldKind::Text { .. }) {
            self.mode = AppMode::Editing;
            self.cursor_position = self.store.record().text(self.selected).chars().count();
        }
    }

    /// Leaves editing mode. Text edits are applied as they are typed.
    pub fn finish_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.cursor_position = 0;
    }

    /// Inserts text at the cursor of the field being edited.
    pub fn insert_text(&mut self, input: &str) {
        let mut text = self.store.record().text(self.selected).to_string();
        let at = self.cursor_position.min(text.chars().count());
        let inserted: String = input.chars().filter(|c| !c.is_control()).collect();
        text.insert_str(byte_offset(&text, at), &inserted);

        self.set_text(text);
        let len = self.store.record().text(self.selected).chars().count();
        self.cursor_position = (at + inserted.chars().count()).min(len);
    }

    /// Deletes the character before the cursor.
    pub fn delete_char(&mut self) {
        let mut text = self.store.record().text(self.selected).to_string();
        let len = text.chars().count();
        if self.cursor_position == 0 || self.cursor_position > len {
            self.cursor_position = self.cursor_position.min(len);
            return;
        }
        self.cursor_position -= 1;
        text.remove(byte_offset(&text, self.cursor_position));
        self.set_text(text);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let len = self.store.record().text(self.selected).chars().count();
        if self.cursor_position < len {
            self.cursor_position += 1;
        }
    }

    fn set_text(&mut self, text: String) {
        self.apply(FieldInput::Text(text));
    }

    /// Steps through the options of the selected field.
    ///
    /// Single-choice fields change their value; multi-choice fields only
    /// move the option cursor.
    pub fn cycle_option(&mut self, forward: bool) {
        let kind = self.selected.kind();
        let options = kind.options();
        if options.is_empty() {
            return;
        }

        let current = match kind {
            FieldKind::SingleChoice(_) => {
                let value = self.store.record().text(self.selected);
                options.iter().position(|option| *option == value)
            }
            _ => Some(self.option_cursor),
        };
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };
        self.option_cursor = next;

        if let FieldKind::SingleChoice(_) = kind {
            self.apply(FieldInput::Choice(options[next].to_string()));
        }
    }

    /// Toggles the highlighted option of a multi-choice field or flips a
    /// declaration checkbox.
    pub fn toggle_selected(&mut self) {
        match self.selected.kind() {
            FieldKind::MultiChoice(options) => {
                let Some(option) = options.get(self.option_cursor) else {
                    return;
                };
                let on = !self
                    .store
                    .record()
                    .selections(self.selected)
                    .iter()
                    .any(|item| item == *option);
                self.apply(FieldInput::Toggle {
                    option: option.to_string(),
                    on,
                });
            }
            FieldKind::Boolean => {
                let checked = self.store.record().flag(self.selected);
                self.apply(FieldInput::Flag(!checked));
            }
            FieldKind::Text { .. } | FieldKind::SingleChoice(_) => {}
        }
    }

    /// Clears the selected single-choice or text field.
    pub fn clear_selected(&mut self) {
        match self.selected.kind() {
            FieldKind::SingleChoice(_) => self.apply(FieldInput::Choice(String::new())),
            FieldKind::Text { .. } => self.set_text(String::new()),
            FieldKind::MultiChoice(_) | FieldKind::Boolean => {}
        }
    }

    fn apply(&mut self, input: FieldInput) {
        if let Err(err) = self.store.update_field(self.selected, input) {
            error!(error = %err, "field update rejected");
            self.status_message = Some(err.to_string());
        }
    }

    /// Validates and, if the form is valid, sends it on a worker thread.
    ///
    /// On validation failure the selection jumps to the first field with
    /// an error.
    pub fn submit(&mut self) {
        self.status_message = None;
        match self.store.begin_submit() {
            SubmitStart::AlreadyInFlight => {}
            SubmitStart::Invalid => {
                let first = self.store.errors().iter().next().map(|(field, _)| field);
                if let Some(field) = first {
                    self.selected = field;
                    self.sync_option_cursor();
                }
            }
            SubmitStart::Ready(snapshot) => {
                let (tx, rx) = mpsc::channel();
                let api = Arc::clone(&self.api);
                thread::spawn(move || {
                    let result = api.submit_application(&snapshot);
                    // receiver is gone only if the app already quit
                    let _ = tx.send(result);
                });
                self.pending = Some(rx);
            }
        }
    }

    /// Applies the worker's result once it has arrived.
    pub fn poll_submission(&mut self) -> Option<SubmissionOutcome> {
        let rx = self.pending.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(SubmissionError::Transport(
                "submission worker stopped without a reply".to_string(),
            )),
        };
        self.pending = None;
        Some(self.finish_submission(result))
    }

    fn finish_submission(&mut self, result: SubmissionResult) -> SubmissionOutcome {
        let outcome = self.store.complete_submit(result);
        debug!(outcome = ?outcome, "submission finished");
        if let SubmissionOutcome::Accepted { .. } = outcome {
            self.selected = FieldId::FullName;
            self.mode = AppMode::Normal;
            self.sync_option_cursor();
        }
        outcome
    }

    /// Banner text describing the submission state, if any.
    pub fn submission_banner(&self) -> Option<String> {
        match self.store.submission() {
            SubmissionState::Idle => None,
            SubmissionState::InFlight => Some("Submitting...".to_string()),
            SubmissionState::Succeeded { application_id: Some(id) } => {
                Some(format!("{} Your application ID: {}", SUCCESS_MESSAGE, id))
            }
            SubmissionState::Succeeded { application_id: None } => Some(SUCCESS_MESSAGE.to_string()),
            SubmissionState::Failed { message } => Some(message.clone()),
        }
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::NETWORK_ERROR_MESSAGE;
    use crate::domain::{ApplicantRecord, REQUIRED_MESSAGE, SCHEMA};

    struct StubApi(SubmissionResult);

    impl IntakeApi for StubApi {
        fn submit_application(&self, _record: &ApplicantRecord) -> SubmissionResult {
            self.0.clone()
        }
    }

    fn app_with(reply: SubmissionResult) -> App {
        App::new(FormStateStore::new(), Arc::new(StubApi(reply)))
    }

    fn accepting_app() -> App {
        app_with(Ok(ApiReply::Accepted { application_id: Some("APP123".to_string()) }))
    }

    fn fill(app: &mut App) {
        for spec in SCHEMA.iter() {
            app.selected = spec.id;
            app.sync_option_cursor();
            match spec.kind {
                FieldKind::Text { .. } => {
                    app.start_editing();
                    app.insert_text("x");
                    app.finish_editing();
                }
                FieldKind::SingleChoice(_) => app.cycle_option(true),
                FieldKind::MultiChoice(_) | FieldKind::Boolean => app.toggle_selected(),
            }
        }
        app.selected = FieldId::Email;
        app.clear_selected();
        app.start_editing();
        app.insert_text("ada@example.com");
        app.finish_editing();
    }

    fn wait(app: &mut App) -> SubmissionOutcome {
        let rx = app.pending.take().expect("no submission pending");
        let result = rx.recv().expect("worker dropped the channel");
        app.finish_submission(result)
    }

    #[test]
    fn test_app_new() {
        let app = accepting_app();
        assert_eq!(app.selected, FieldId::FullName);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.is_none());
        assert!(app.submission_banner().is_none());
        assert!(app.pending.is_none());
    }

    #[test]
    fn test_navigation_bounds() {
        let mut app = accepting_app();
        app.select_previous();
        assert_eq!(app.selected, FieldId::FullName);

        app.select_next();
        assert_eq!(app.selected, FieldId::Email);

        for _ in 0..100 {
            app.select_next();
        }
        assert_eq!(app.selected, FieldId::Declaration2);
    }

    #[test]
    fn test_editing_inserts_at_cursor() {
        let mut app = accepting_app();
        app.start_editing();
        assert_eq!(app.mode, AppMode::Editing);

        app.insert_text("Ada");
        app.move_cursor_left();
        app.move_cursor_left();
        app.insert_text("ñ");
        assert_eq!(app.store.record().text(FieldId::FullName), "Añda");
        assert_eq!(app.cursor_position, 2);

        app.delete_char();
        assert_eq!(app.store.record().text(FieldId::FullName), "Ada");
        assert_eq!(app.cursor_position, 1);

        app.finish_editing();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_editing_only_for_text_fields() {
        let mut app = accepting_app();
        app.selected = FieldId::YearOfStudy;
        app.start_editing();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_paste_respects_limit() {
        let mut app = accepting_app();
        app.selected = FieldId::AdditionalInfo;
        app.start_editing();
        app.insert_text(&"a".repeat(350));
        assert_eq!(app.store.record().text(FieldId::AdditionalInfo).len(), 300);
        assert_eq!(app.cursor_position, 300);
    }

    #[test]
    fn test_cycle_single_choice() {
        let mut app = accepting_app();
        app.selected = FieldId::SkillLevel;

        app.cycle_option(true);
        assert_eq!(app.store.record().text(FieldId::SkillLevel), "Beginner");
        app.cycle_option(false);
        assert_eq!(app.store.record().text(FieldId::SkillLevel), "Advanced");
        app.cycle_option(true);
        assert_eq!(app.store.record().text(FieldId::SkillLevel), "Beginner");

        app.clear_selected();
        assert_eq!(app.store.record().text(FieldId::SkillLevel), "");
    }

    #[test]
    fn test_toggle_multi_choice_and_declaration() {
        let mut app = accepting_app();
        app.selected = FieldId::HardwareExperience;
        app.cycle_option(true);
        app.toggle_selected();
        assert_eq!(
            app.store.record().selections(FieldId::HardwareExperience),
            ["Raspberry Pi".to_string()]
        );
        app.toggle_selected();
        assert!(app.store.record().selections(FieldId::HardwareExperience).is_empty());

        app.selected = FieldId::Declaration1;
        app.toggle_selected();
        assert!(app.store.record().flag(FieldId::Declaration1));
    }

    #[test]
    fn test_invalid_submit_jumps_to_first_error() {
        let mut app = accepting_app();
        app.selected = FieldId::HearAbout;
        app.option_cursor = 3;
        app.submit();

        assert!(app.pending.is_none());
        assert_eq!(app.selected, FieldId::FullName);
        assert_eq!(app.option_cursor, 0);
        assert_eq!(
            app.submission_banner().as_deref(),
            Some("Please fix the errors in the form")
        );
    }

    #[test]
    fn test_background_submit_success() {
        let mut app = accepting_app();
        fill(&mut app);
        app.selected = FieldId::Declaration2;

        app.submit();
        assert!(app.store.is_submitting());
        assert_eq!(app.submission_banner().as_deref(), Some("Submitting..."));

        let outcome = wait(&mut app);
        assert_eq!(outcome, SubmissionOutcome::Accepted { application_id: Some("APP123".to_string()) });
        assert_eq!(app.store.record(), &ApplicantRecord::default());
        assert_eq!(app.selected, FieldId::FullName);
        assert_eq!(
            app.submission_banner().as_deref(),
            Some("Application submitted successfully! Your application ID: APP123")
        );
    }

    #[test]
    fn test_background_submit_rejection() {
        let mut app = app_with(Ok(ApiReply::Rejected {
            status: 400,
            message: Some("missing".to_string()),
            missing_fields: vec!["phone".to_string()],
        }));
        fill(&mut app);

        app.submit();
        wait(&mut app);

        assert_eq!(app.store.errors().get(FieldId::Phone), Some(REQUIRED_MESSAGE));
        assert_eq!(app.store.record().text(FieldId::Phone), "x");
        assert_eq!(app.submission_banner().as_deref(), Some("missing"));
    }

    #[test]
    fn test_poll_submission_applies_result() {
        let mut app = app_with(Err(SubmissionError::Transport("refused".to_string())));
        fill(&mut app);
        app.submit();

        let mut outcome = None;
        for _ in 0..500 {
            outcome = app.poll_submission();
            if outcome.is_some() {
                break;
            }
            thread::sleep(std::time::Duration::from_millis(10));
        }

        assert_eq!(
            outcome,
            Some(SubmissionOutcome::TransportFailure { message: NETWORK_ERROR_MESSAGE.to_string() })
        );
        assert!(app.pending.is_none());
        assert!(app.poll_submission().is_none());
    }
}
