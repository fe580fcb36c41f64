//! Eager image upload for the media step.
//!
//! Files are uploaded as soon as they are picked rather than at submission.
//! Every picked file gets a slot before any upload starts; uploads then run in
//! parallel and each one writes only to its own slot.

use std::fmt;
use std::thread;

use tracing::{info, warn};
use uuid::Uuid;

use crate::api::ListingBackend;
use crate::domain::ListingDraft;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Pending,
    Uploaded { url: String },
    Failed { message: String },
}

/// A picked image file and its upload progress.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaSlot {
    pub id: Uuid,
    pub file_name: String,
    pub state: UploadState,
    bytes: Vec<u8>,
}

impl fmt::Debug for MediaSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSlot")
            .field("id", &self.id)
            .field("file_name", &self.file_name)
            .field("state", &self.state)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl MediaSlot {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            state: UploadState::Pending,
            bytes,
        }
    }
}

/// Image picked by the user, not yet uploaded.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnqueueOutcome {
    pub accepted: Vec<Uuid>,
    /// Files turned away because the image ceiling was reached.
    pub rejected: Vec<String>,
    pub max_images: usize,
}

impl EnqueueOutcome {
    pub fn rejection_message(&self) -> Option<String> {
        if self.rejected.is_empty() {
            None
        } else {
            Some(format!(
                "No more than {} images are allowed; skipped {}",
                self.max_images,
                self.rejected.join(", ")
            ))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct MediaUploader {
    slots: Vec<MediaSlot>,
    max_images: usize,
}

impl MediaUploader {
    pub fn new(max_images: usize) -> Self {
        Self {
            slots: Vec::new(),
            max_images,
        }
    }

    pub fn slots(&self) -> &[MediaSlot] {
        &self.slots
    }

    pub fn has_pending(&self) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.state == UploadState::Pending)
    }

    /// Assigns slots to `files` while room remains under the ceiling. Images
    /// already on the draft and slots still in flight or failed count
    /// against it.
    pub fn enqueue(&mut self, draft: &ListingDraft, files: Vec<ImageFile>) -> EnqueueOutcome {
        let mut outcome = EnqueueOutcome {
            max_images: self.max_images,
            ..EnqueueOutcome::default()
        };
        let mut occupied = draft.media.images.len() + self.slots.len();
        for file in files {
            if occupied >= self.max_images {
                outcome.rejected.push(file.file_name);
                continue;
            }
            let slot = MediaSlot::new(file.file_name, file.bytes);
            outcome.accepted.push(slot.id);
            self.slots.push(slot);
            occupied += 1;
        }
        if !outcome.rejected.is_empty() {
            warn!(
                rejected = outcome.rejected.len(),
                max = self.max_images,
                "image ceiling reached"
            );
        }
        outcome
    }

    /// Uploads every pending slot concurrently, then appends the resulting
    /// URLs to the draft in slot order. Failed slots stay for retry.
    pub fn upload_all(
        &mut self,
        backend: &dyn ListingBackend,
        draft: &mut ListingDraft,
    ) -> UploadSummary {
        let pending = self
            .slots
            .iter()
            .filter(|slot| slot.state == UploadState::Pending)
            .count();
        if pending == 0 {
            return UploadSummary::default();
        }
        info!(count = pending, "uploading images");

        thread::scope(|scope| {
            for slot in self
                .slots
                .iter_mut()
                .filter(|slot| slot.state == UploadState::Pending)
            {
                scope.spawn(move || {
                    slot.state = match backend.upload_image(&slot.file_name, &slot.bytes) {
                        Ok(url) => UploadState::Uploaded { url },
                        Err(err) => {
                            warn!(file = %slot.file_name, error = %err, "image upload failed");
                            UploadState::Failed {
                                message: err.user_message().to_string(),
                            }
                        }
                    };
                });
            }
        });

        let mut summary = UploadSummary::default();
        for slot in &mut self.slots {
            match &slot.state {
                UploadState::Uploaded { url } => {
                    if draft.media.images.len() < self.max_images {
                        draft.media.images.push(url.clone());
                        summary.uploaded += 1;
                    } else {
                        slot.state = UploadState::Failed {
                            message: format!("No more than {} images are allowed", self.max_images),
                        };
                        summary.failed += 1;
                    }
                }
                UploadState::Failed { .. } => summary.failed += 1,
                UploadState::Pending => {}
            }
        }
        self.slots
            .retain(|slot| !matches!(slot.state, UploadState::Uploaded { .. }));
        summary
    }

    /// Marks a failed slot pending again; the next `upload_all` retries it.
    pub fn retry(&mut self, id: Uuid) -> bool {
        match self.slots.iter_mut().find(|slot| slot.id == id) {
            Some(slot) if matches!(slot.state, UploadState::Failed { .. }) => {
                slot.state = UploadState::Pending;
                true
            }
            _ => false,
        }
    }

    pub fn discard(&mut self, id: Uuid) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id != id);
        self.slots.len() != before
    }
}
