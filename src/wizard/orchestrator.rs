use tracing::{debug, info, warn};

use crate::api::{ListingBackend, SubmissionReceipt};
use crate::config::WizardSettings;
use crate::domain::{ListingDraft, ListingMode};
use crate::errors::{ListingError, Result};
use crate::wizard::media::{EnqueueOutcome, ImageFile, MediaUploader, UploadSummary};
use crate::wizard::step::{StepView, WizardStep};
use crate::wizard::submission::{self, ListingPayload};
use crate::wizard::validation::{validate_step, FieldId, ValidationContext, ValidationReport};

/// Result of asking the wizard to move forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepTransition {
    Advanced { from: WizardStep, to: WizardStep },
    /// The step's validator failed; the wizard did not move.
    Blocked(ValidationReport),
    /// The last step validated; the draft can be submitted.
    ReadyToSubmit,
}

type StepListener = Box<dyn FnMut(WizardStep) + Send>;

/// Owns the draft and the current step of one listing-editing session.
pub struct ListingWizard {
    current: WizardStep,
    draft: ListingDraft,
    mode: ListingMode,
    settings: WizardSettings,
    uploader: MediaUploader,
    last_report: Option<ValidationReport>,
    submission_error: Option<String>,
    listeners: Vec<StepListener>,
}

impl ListingWizard {
    pub fn new(settings: WizardSettings) -> Self {
        Self::build(ListingDraft::new(), ListingMode::Create, settings)
    }

    pub fn for_update(
        id: impl Into<String>,
        mut draft: ListingDraft,
        settings: WizardSettings,
    ) -> Self {
        let id = id.into();
        draft.id = Some(id.clone());
        Self::build(draft, ListingMode::Update { id }, settings)
    }

    /// Update-mode wizard hydrated from a fetched record.
    pub fn from_record(
        id: impl Into<String>,
        record: ListingPayload,
        settings: WizardSettings,
    ) -> Self {
        let id = id.into();
        let draft = submission::hydrate(id.clone(), record);
        Self::for_update(id, draft, settings)
    }

    fn build(draft: ListingDraft, mode: ListingMode, settings: WizardSettings) -> Self {
        let uploader = MediaUploader::new(settings.max_images);
        Self {
            current: WizardStep::FIRST,
            draft,
            mode,
            settings,
            uploader,
            last_report: None,
            submission_error: None,
            listeners: Vec::new(),
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    /// Screen for the current step; `None` at step 2 when the property type
    /// does not name a known branch.
    pub fn view(&self) -> Option<StepView> {
        StepView::resolve(self.current, self.draft.property_kind())
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ListingDraft {
        &mut self.draft
    }

    /// Applies `edit` to the draft.
    pub fn update(&mut self, edit: impl FnOnce(&mut ListingDraft)) {
        edit(&mut self.draft);
    }

    pub fn mode(&self) -> &ListingMode {
        &self.mode
    }

    pub fn settings(&self) -> &WizardSettings {
        &self.settings
    }

    pub fn uploader(&self) -> &MediaUploader {
        &self.uploader
    }

    pub fn uploader_mut(&mut self) -> &mut MediaUploader {
        &mut self.uploader
    }

    /// Errors from the latest blocked advance, cleared once a step passes.
    pub fn last_report(&self) -> Option<&ValidationReport> {
        self.last_report.as_ref()
    }

    pub fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    /// Registers a callback run after every step change.
    pub fn on_step_change(&mut self, listener: impl FnMut(WizardStep) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Runs the current step's validator without moving.
    pub fn validate_current(&self) -> ValidationReport {
        match self.view() {
            Some(view) => {
                let context =
                    ValidationContext::new(&self.settings).with_uploads(self.uploader.slots());
                validate_step(view, &self.draft, context)
            }
            None => {
                let mut report = ValidationReport::new();
                report.push(
                    FieldId::PropertyType,
                    format!(
                        "Unknown property type `{}`; go back and pick one",
                        self.draft.property_type.en.trim()
                    ),
                );
                report
            }
        }
    }

    pub fn advance(&mut self) -> StepTransition {
        let report = self.validate_current();
        if !report.is_valid() {
            debug!(
                step = self.current.number(),
                errors = report.errors.len(),
                "step blocked"
            );
            self.last_report = Some(report.clone());
            return StepTransition::Blocked(report);
        }
        self.last_report = None;
        match self.current.next() {
            Some(next) => {
                let from = self.current;
                self.set_step(next);
                StepTransition::Advanced { from, to: next }
            }
            None => StepTransition::ReadyToSubmit,
        }
    }

    /// Moves one step back without validating anything.
    pub fn back(&mut self) -> bool {
        match self.current.previous() {
            Some(previous) => {
                self.last_report = None;
                self.set_step(previous);
                true
            }
            None => false,
        }
    }

    /// Jumps back to an earlier (or the current) step.
    pub fn go_to(&mut self, step: WizardStep) -> Result<()> {
        if step > self.current {
            return Err(ListingError::InvalidInput(format!(
                "cannot skip ahead to step {} from step {}",
                step.number(),
                self.current.number()
            )));
        }
        if step != self.current {
            self.last_report = None;
            self.set_step(step);
        }
        Ok(())
    }

    fn set_step(&mut self, step: WizardStep) {
        debug!(
            from = self.current.number(),
            to = step.number(),
            "step changed"
        );
        self.current = step;
        for listener in &mut self.listeners {
            listener(step);
        }
    }

    pub fn enqueue_images(&mut self, files: Vec<ImageFile>) -> EnqueueOutcome {
        self.uploader.enqueue(&self.draft, files)
    }

    pub fn upload_images(&mut self, backend: &dyn ListingBackend) -> UploadSummary {
        self.uploader.upload_all(backend, &mut self.draft)
    }

    /// Payload the final step would send, without sending it.
    pub fn payload(&self) -> Result<ListingPayload> {
        submission::assemble(&self.draft, self.settings.current_year)
    }

    /// Sends the draft from the final step. On success the session is reset
    /// to an empty create-mode draft; on failure the wizard stays on the final
    /// step with the server message kept for display.
    pub fn submit(&mut self, backend: &dyn ListingBackend) -> Result<SubmissionReceipt> {
        if self.current != WizardStep::LAST {
            return Err(ListingError::WrongStep {
                current: self.current.number(),
                expected: WizardStep::LAST.number(),
            });
        }
        let report = self.validate_current();
        if !report.is_valid() {
            let message = report.errors.join("; ");
            self.last_report = Some(report);
            return Err(ListingError::InvalidInput(message));
        }

        let payload = self.payload()?;
        let result = match &self.mode {
            ListingMode::Create => backend.create_listing(&payload),
            ListingMode::Update { id } => backend.update_listing(id, &payload),
        };
        match result {
            Ok(receipt) => {
                info!(id = %receipt.id, "listing submitted");
                self.draft = ListingDraft::new();
                self.mode = ListingMode::Create;
                self.uploader = MediaUploader::new(self.settings.max_images);
                self.submission_error = None;
                self.last_report = None;
                self.set_step(WizardStep::FIRST);
                Ok(receipt)
            }
            Err(err) => {
                warn!(error = %err, "listing submission failed");
                self.submission_error = Some(err.user_message().to_string());
                Err(err.into())
            }
        }
    }
}
