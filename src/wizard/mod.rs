//! Listing-creation wizard: six steps over one shared draft.
//!
//! [`ListingWizard`] holds the step index and the draft, asks the active
//! step's validator before moving forward, and sends the assembled payload
//! from the last step.

pub mod media;
pub mod orchestrator;
pub mod step;
pub mod submission;
pub mod validation;

pub use media::{EnqueueOutcome, ImageFile, MediaSlot, MediaUploader, UploadState, UploadSummary};
pub use orchestrator::{ListingWizard, StepTransition};
pub use step::{StepView, WizardStep};
pub use submission::{assemble, hydrate, ListingPayload};
pub use validation::{validate_step, FieldId, ValidationContext, ValidationReport};
