//! Form state store: the single owner of the applicant record, the error
//! map and the submission lifecycle.
//!
//! All mutations go through [`FormStateStore`]. Field edits clear the
//! field's error immediately; validation only runs again on the next
//! submit attempt.

use crate::domain::{
    validate_record, ApplicantRecord, DomainError, DomainResult, ErrorMap, FieldId, FieldKind,
    FieldValue, Section, SubmissionError,
};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

/// Status message when local validation blocks a submission.
pub const FIX_ERRORS_MESSAGE: &str = "Please fix the errors in the form";
/// Status message shown after a successful submission.
pub const SUCCESS_MESSAGE: &str = "Application submitted successfully!";
/// Fallback when the server rejects without saying why.
pub const REJECTED_MESSAGE: &str = "Failed to submit application";
/// Status message for any transport or response-parsing failure.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection and try again.";

/// Raw input for a field update, tagged with the input shape it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Replacement text for a free-text field.
    Text(String),
    /// Selected option of a single-choice field; empty clears the selection.
    Choice(String),
    /// Checkbox in a multi-choice group switched on or off.
    Toggle { option: String, on: bool },
    /// Declaration checkbox state.
    Flag(bool),
}

impl FieldInput {
    fn name(&self) -> &'static str {
        match self {
            FieldInput::Text(_) => "text",
            FieldInput::Choice(_) => "single choice",
            FieldInput::Toggle { .. } => "multi choice toggle",
            FieldInput::Flag(_) => "boolean",
        }
    }
}

/// Where the latest submit attempt stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded { application_id: Option<String> },
    Failed { message: String },
}

/// Reply from the Application Intake API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiReply {
    /// 2xx response.
    Accepted { application_id: Option<String> },
    /// Any other status, with the server's explanation.
    Rejected {
        status: u16,
        message: Option<String>,
        missing_fields: Vec<String>,
    },
}

/// The remote service that stores submitted applications.
pub trait IntakeApi {
    fn submit_application(&self, record: &ApplicantRecord) -> Result<ApiReply, SubmissionError>;
}

/// Result of starting a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStart {
    /// Validation passed and the store is now in flight; send this snapshot.
    Ready(ApplicantRecord),
    /// Validation failed; nothing may be sent.
    Invalid,
    /// A submission is already outstanding.
    AlreadyInFlight,
}

/// What a finished submit attempt amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Ignored,
    Invalid(ErrorMap),
    Accepted { application_id: Option<String> },
    Rejected { message: String },
    TransportFailure { message: String },
}

/// Completion counts for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionProgress {
    pub section: Section,
    pub filled: usize,
    pub required: usize,
}

/// Single source of truth for one form session.
///
/// # Examples
///
/// ```
/// use intake::application::{FieldInput, FormStateStore};
/// use intake::domain::FieldId;
///
/// let mut store = FormStateStore::new();
/// store.update_field(FieldId::FullName, FieldInput::Text("Ada".into())).unwrap();
/// assert_eq!(store.record().text(FieldId::FullName), "Ada");
///
/// let errors = store.validate();
/// assert!(!errors.contains(FieldId::FullName));
/// assert!(errors.contains(FieldId::Email));
/// ```
#[derive(Debug, Default)]
pub struct FormStateStore {
    record: ApplicantRecord,
    errors: ErrorMap,
    submission: SubmissionState,
}

impl FormStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> &ApplicantRecord {
        &self.record
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn is_submitting(&self) -> bool {
        self.submission == SubmissionState::InFlight
    }

    /// Applies one user edit to a field.
    ///
    /// Text is truncated to the field's character limit. Multi-choice
    /// toggles are idempotent in both directions. Any existing error for
    /// the field is dropped, whether or not the new value is valid.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidFieldKind`] if the input shape does not
    /// match the field, or [`DomainError::InvalidOption`] for a value outside
    /// the field's option set. Nothing changes on error.
    pub fn update_field(&mut self, field: FieldId, input: FieldInput) -> DomainResult<()> {
        let kind = field.kind();
        let value = self.record.get_mut(field);

        match (kind, input, value) {
            (FieldKind::Text { max_len }, FieldInput::Text(mut text), FieldValue::Text(current)) => {
                let cut = max_len.and_then(|limit| text.char_indices().nth(limit).map(|(i, _)| i));
                if let Some(cut) = cut {
                    text.truncate(cut);
                }
                *current = text;
            }
            (FieldKind::SingleChoice(options), FieldInput::Choice(choice), FieldValue::Text(current)) => {
                if !choice.is_empty() && !options.contains(&choice.as_str()) {
                    return Err(DomainError::InvalidOption { field, value: choice });
                }
                *current = choice;
            }
            (FieldKind::MultiChoice(options), FieldInput::Toggle { option, on }, FieldValue::Multi(selected)) => {
                if !options.contains(&option.as_str()) {
                    return Err(DomainError::InvalidOption { field, value: option });
                }
                let present = selected.iter().any(|item| *item == option);
                if on && !present {
                    selected.push(option);
                } else if !on {
                    selected.retain(|item| *item != option);
                }
            }
            (FieldKind::Boolean, FieldInput::Flag(checked), FieldValue::Flag(current)) => {
                *current = checked;
            }
            (kind, input, _) => {
                return Err(DomainError::InvalidFieldKind {
                    field,
                    expected: kind.name(),
                    got: input.name(),
                });
            }
        }

        if self.errors.remove(field) {
            debug!(field = %field, "cleared field error on edit");
        }
        Ok(())
    }

    /// Same as [`update_field`](Self::update_field), addressing the field by
    /// its wire name.
    pub fn update_field_by_name(&mut self, name: &str, input: FieldInput) -> DomainResult<()> {
        let field = FieldId::from_name(name).ok_or_else(|| DomainError::UnknownField(name.to_string()))?;
        self.update_field(field, input)
    }

    /// Runs every validation rule, replaces the error map and returns it.
    pub fn validate(&mut self) -> ErrorMap {
        self.errors = validate_record(&self.record);
        self.errors.clone()
    }

    /// Starts a submission attempt.
    ///
    /// Ignored while another submission is in flight. On validation failure
    /// the state becomes `Failed` and nothing is sent; otherwise the state
    /// becomes `InFlight` and a snapshot of the record is returned for the
    /// caller to send.
    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.is_submitting() {
            warn!("submit ignored: a submission is already in flight");
            return SubmitStart::AlreadyInFlight;
        }

        let errors = self.validate();
        if !errors.is_empty() {
            info!(errors = errors.len(), "submit blocked by validation");
            self.submission = SubmissionState::Failed {
                message: FIX_ERRORS_MESSAGE.to_string(),
            };
            return SubmitStart::Invalid;
        }

        info!("submitting application");
        self.submission = SubmissionState::InFlight;
        SubmitStart::Ready(self.record.clone())
    }

    /// Applies the API result of the submission started by
    /// [`begin_submit`](Self::begin_submit).
    ///
    /// Ignored unless a submission is in flight.
    pub fn complete_submit(&mut self, result: Result<ApiReply, SubmissionError>) -> SubmissionOutcome {
        if !self.is_submitting() {
            warn!("submission result arrived with nothing in flight; ignoring");
            return SubmissionOutcome::Ignored;
        }

        match result {
            Ok(ApiReply::Accepted { application_id }) => {
                info!(application_id = ?application_id, "application accepted");
                self.record.reset();
                self.errors.clear();
                self.submission = SubmissionState::Succeeded {
                    application_id: application_id.clone(),
                };
                SubmissionOutcome::Accepted { application_id }
            }
            Ok(ApiReply::Rejected { status, message, missing_fields }) => {
                let message = message.unwrap_or_else(|| REJECTED_MESSAGE.to_string());
                info!(status, %message, missing = missing_fields.len(), "application rejected");

                let known = missing_fields.iter().filter_map(|name| {
                    let field = FieldId::from_name(name);
                    if field.is_none() {
                        warn!(field = %name, "server reported an unknown missing field");
                    }
                    field
                });
                self.errors.merge_missing(known);

                self.submission = SubmissionState::Failed { message: message.clone() };
                SubmissionOutcome::Rejected { message }
            }
            Err(err) => {
                warn!(error = %err, "application submission failed");
                self.submission = SubmissionState::Failed {
                    message: NETWORK_ERROR_MESSAGE.to_string(),
                };
                SubmissionOutcome::TransportFailure {
                    message: NETWORK_ERROR_MESSAGE.to_string(),
                }
            }
        }
    }

    /// Validates and, if valid, submits synchronously through `api`.
    pub fn submit(&mut self, api: &dyn IntakeApi) -> SubmissionOutcome {
        match self.begin_submit() {
            SubmitStart::AlreadyInFlight => SubmissionOutcome::Ignored,
            SubmitStart::Invalid => SubmissionOutcome::Invalid(self.errors.clone()),
            SubmitStart::Ready(snapshot) => {
                let result = api.submit_application(&snapshot);
                self.complete_submit(result)
            }
        }
    }

    /// Required-field completion per section, in display order.
    pub fn summary(&self) -> Vec<SectionProgress> {
        Section::iter()
            .map(|section| {
                let required: Vec<FieldId> = section
                    .fields()
                    .filter(|field| field.spec().requirement.is_required())
                    .collect();
                let filled = required
                    .iter()
                    .filter(|field| !self.record.get(**field).is_empty())
                    .count();
                SectionProgress {
                    section,
                    filled,
                    required: required.len(),
                }
            })
            .collect()
    }
}
