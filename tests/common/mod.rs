#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use listing_core::{
    api::{ApiResult, ContactMessage, ListingBackend, OptionCatalog, SubmissionReceipt},
    cli::{DocumentUpload, StepAction, StepInteraction},
    config::WizardSettings,
    domain::{FlagInput, ListingDraft, PropertyKind},
    errors::{ApiError, Result},
    localized::{LocalizedMap, LocalizedText},
    map::Coordinates,
    wizard::{ImageFile, ListingPayload, StepView, ValidationReport, WizardStep},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory usable as `LISTING_CORE_HOME`.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn settings() -> WizardSettings {
    WizardSettings::default().with_current_year(2026)
}

pub fn text(en: &str, ru: &str) -> LocalizedText {
    LocalizedText::new(en, ru)
}

pub fn map(en: &str, ru: &str) -> LocalizedMap {
    LocalizedMap::from(&text(en, ru))
}

pub fn images(count: usize) -> Vec<ImageFile> {
    (0..count)
        .map(|index| {
            let name = format!("photo-{index}.jpg");
            ImageFile::new(name, vec![index as u8; 16])
        })
        .collect()
}

fn fill_shared(draft: &mut ListingDraft) {
    draft.listing_type = text("Sale", "Продажа");
    draft.title = text("Sea view flat", "Квартира с видом на море");
    draft.description = text(
        "Two bedrooms near the marina",
        "Две спальни у марины",
    );
    draft.set_price("USD", 250_000.0);
    draft.set_price("TRY", 8_000_000.0);
    draft.set_dues("USD", 120.0);

    let address = &mut draft.address;
    address.country = text("Turkey", "Турция");
    address.state = text("Antalya", "Анталья");
    address.city = text("Alanya", "Аланья");
    address.street = text("Ataturk Blvd", "бульвар Ататюрка");
    address.building_number = " 12 ".into();
    address.postal_code = "07400".into();
    address.coordinates = Coordinates::new(36.5444, 31.9954);

    draft.selection.features = vec!["pool".into(), "parking".into()];
    draft.selection.set_distance("beach", 0.3);
    draft.media.images = (1..=3)
        .map(|index| format!("https://cdn.test/existing-{index}.jpg"))
        .collect();
}

/// Residential draft that passes every step.
pub fn residential_draft() -> ListingDraft {
    let mut draft = ListingDraft::new();
    fill_shared(&mut draft);
    draft.set_property_kind(PropertyKind::Residential, "Жилая");
    draft.housing_category = text("Apartment", "Квартира");

    let details = &mut draft.residential;
    details.gross_area = 120.0;
    details.net_area = 95.0;
    details.room_count = 3;
    details.bathroom_count = 2;
    details.balcony_count = 1;
    details.floor_count = 5;
    details.floor_number = Some(3);
    details.build_year = 2015;
    details.kitchen_type = text("Open", "Открытая");
    details.heating_type = text("Central", "Центральное");
    details.usage_status = map("Empty", "Пустая");
    details.deed_status = map("Freehold", "Собственность");
    details.furnished = FlagInput::Bool(true);
    details.exchangeable = FlagInput::Text("false".into());
    draft
}

pub fn commercial_draft() -> ListingDraft {
    let mut draft = ListingDraft::new();
    fill_shared(&mut draft);
    draft.set_property_kind(PropertyKind::Commercial, "Коммерческая");
    draft.housing_category = text("Office", "Офис");

    let details = &mut draft.commercial;
    details.gross_area = 300.0;
    details.net_area = 250.0;
    details.room_count = 6;
    details.building_age = 10;
    details.heating_type = text("Central", "Центральное");
    details.usage_status = map("Tenant", "Арендатор");
    details.deed_status = map("Freehold", "Собственность");
    details.exchangeable = FlagInput::Bool(true);
    draft
}

pub fn land_draft() -> ListingDraft {
    let mut draft = ListingDraft::new();
    fill_shared(&mut draft);
    draft.set_property_kind(PropertyKind::Land, "Участок");

    let details = &mut draft.land;
    details.area = 1500.0;
    details.block_number = " 112 ".into();
    details.parcel_number = "7".into();
    details.zoning_status = map("Residential zone", "Жилая зона");
    details.deed_status = map("Freehold", "Собственность");
    details.exchangeable = FlagInput::Bool(false);
    draft
}

#[derive(Default)]
pub struct MockState {
    pub created: Vec<ListingPayload>,
    pub updated: Vec<(String, ListingPayload)>,
    pub uploaded_images: Vec<String>,
    pub uploaded_files: Vec<String>,
    pub messages: Vec<(String, ContactMessage)>,
    pub records: HashMap<String, ListingPayload>,
    pub catalog: OptionCatalog,
    pub submit_error: Option<ApiError>,
    pub failing_files: HashSet<String>,
}

/// In-memory backend recording every call.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_submit(status: u16, message: &str) -> Self {
        let backend = Self::new();
        backend.state().submit_error = Some(ApiError::Status {
            status,
            message: message.to_string(),
        });
        backend
    }

    pub fn fail_upload_of(&self, file_name: &str) {
        self.state().failing_files.insert(file_name.to_string());
    }

    pub fn allow_upload_of(&self, file_name: &str) {
        self.state().failing_files.remove(file_name);
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("lock mock backend")
    }

    fn store(&self, file_name: &str) -> ApiResult<String> {
        if self.state().failing_files.contains(file_name) {
            return Err(ApiError::Status {
                status: 503,
                message: "Storage unavailable".into(),
            });
        }
        Ok(format!("https://cdn.test/{file_name}"))
    }
}

impl ListingBackend for MockBackend {
    fn create_listing(&self, payload: &ListingPayload) -> ApiResult<SubmissionReceipt> {
        let mut state = self.state();
        if let Some(err) = state.submit_error.clone() {
            return Err(err);
        }
        state.created.push(payload.clone());
        Ok(SubmissionReceipt {
            id: format!("listing-{}", state.created.len()),
        })
    }

    fn update_listing(&self, id: &str, payload: &ListingPayload) -> ApiResult<SubmissionReceipt> {
        let mut state = self.state();
        if let Some(err) = state.submit_error.clone() {
            return Err(err);
        }
        state.updated.push((id.to_string(), payload.clone()));
        Ok(SubmissionReceipt { id: id.to_string() })
    }

    fn fetch_listing(&self, id: &str) -> ApiResult<ListingPayload> {
        self.state()
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "Listing not found".into(),
            })
    }

    fn upload_image(&self, file_name: &str, _bytes: &[u8]) -> ApiResult<String> {
        let url = self.store(file_name)?;
        self.state().uploaded_images.push(file_name.to_string());
        Ok(url)
    }

    fn upload_file(&self, file_name: &str, _bytes: &[u8]) -> ApiResult<String> {
        let url = self.store(file_name)?;
        self.state().uploaded_files.push(file_name.to_string());
        Ok(url)
    }

    fn fetch_options(&self) -> ApiResult<OptionCatalog> {
        Ok(self.state().catalog.clone())
    }

    fn send_message(&self, listing_id: &str, message: &ContactMessage) -> ApiResult<()> {
        self.state()
            .messages
            .push((listing_id.to_string(), message.clone()));
        Ok(())
    }
}

/// Interaction that replays a fixed list of actions and leaves the draft as
/// prepared by the test.
#[derive(Default)]
pub struct ScriptedInteraction {
    pub actions: VecDeque<StepAction>,
    pub image_batches: VecDeque<Vec<ImageFile>>,
    pub documents: Vec<DocumentUpload>,
    pub entered: Vec<WizardStep>,
    pub edited: Vec<StepView>,
    pub reports: Vec<ValidationReport>,
    pub notices: Vec<String>,
}

impl ScriptedInteraction {
    pub fn new(actions: impl IntoIterator<Item = StepAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl StepInteraction for ScriptedInteraction {
    fn enter_step(&mut self, step: WizardStep) {
        self.entered.push(step);
    }

    fn edit(
        &mut self,
        view: StepView,
        _draft: &mut ListingDraft,
        _settings: &WizardSettings,
    ) -> Result<()> {
        self.edited.push(view);
        Ok(())
    }

    fn pick_images(&mut self) -> Result<Vec<ImageFile>> {
        Ok(self.image_batches.pop_front().unwrap_or_default())
    }

    fn pick_documents(&mut self) -> Result<Vec<DocumentUpload>> {
        Ok(std::mem::take(&mut self.documents))
    }

    fn choose_action(&mut self, _step: WizardStep) -> Result<StepAction> {
        Ok(self.actions.pop_front().unwrap_or(StepAction::Cancel))
    }

    fn show_report(&mut self, report: &ValidationReport) {
        self.reports.push(report.clone());
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
