//! Step-by-step terminal driver for [`ListingWizard`].
//!
//! [`run_wizard`] owns the loop; a [`StepInteraction`] supplies the answers.
//! The terminal implementation prompts with `dialoguer`, tests plug in a
//! scripted one.

use std::fmt::Display;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use crossterm::{cursor, execute, terminal};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use tracing::{debug, warn};

use crate::address::format_address;
use crate::api::{CatalogOption, ListingBackend, OptionCatalog, SubmissionReceipt};
use crate::cli::formatter::Formatter;
use crate::config::WizardSettings;
use crate::currency::{display_price, CurrencyCode};
use crate::domain::{FlagInput, ListingDraft, PropertyKind};
use crate::errors::Result;
use crate::localized::{Language, LocalizedMap, LocalizedText};
use crate::map::Coordinates;
use crate::wizard::{
    ImageFile, ListingWizard, StepTransition, StepView, UploadState, ValidationReport, WizardStep,
};

/// What the user wants after editing a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Next,
    Back,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    Submitted(SubmissionReceipt),
    Cancelled,
}

/// Document picked at the review step, before it is uploaded.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub name: LocalizedText,
    pub file: ImageFile,
}

/// Source of user input for one wizard session.
pub trait StepInteraction {
    /// Called each time the loop lands on a step, including re-entries after
    /// a blocked advance.
    fn enter_step(&mut self, step: WizardStep);

    /// Edits the fields shown on `view`.
    fn edit(
        &mut self,
        view: StepView,
        draft: &mut ListingDraft,
        settings: &WizardSettings,
    ) -> Result<()>;

    fn pick_images(&mut self) -> Result<Vec<ImageFile>>;

    fn pick_documents(&mut self) -> Result<Vec<DocumentUpload>>;

    fn choose_action(&mut self, step: WizardStep) -> Result<StepAction>;

    fn show_report(&mut self, report: &ValidationReport);

    fn notify(&mut self, message: &str);
}

/// Runs the wizard until the listing is submitted or the user cancels.
///
/// A failed submission keeps the wizard on the review step with its draft
/// intact; the user may retry or go back.
pub fn run_wizard(
    wizard: &mut ListingWizard,
    backend: &dyn ListingBackend,
    interaction: &mut dyn StepInteraction,
) -> Result<WizardOutcome> {
    loop {
        let step = wizard.current_step();
        interaction.enter_step(step);

        match wizard.view() {
            Some(StepView::Media) => collect_media(wizard, backend, interaction)?,
            Some(StepView::Review) => {
                collect_documents(wizard, backend, interaction)?;
                let settings = wizard.settings().clone();
                interaction.edit(StepView::Review, wizard.draft_mut(), &settings)?;
            }
            Some(view) => {
                let settings = wizard.settings().clone();
                interaction.edit(view, wizard.draft_mut(), &settings)?;
            }
            None => interaction.notify("Unknown property type; go back and pick one"),
        }

        match interaction.choose_action(step)? {
            StepAction::Cancel => return Ok(WizardOutcome::Cancelled),
            StepAction::Back => {
                if !wizard.back() {
                    interaction.notify("Already on the first step");
                }
            }
            StepAction::Next => match wizard.advance() {
                StepTransition::Advanced { .. } => {}
                StepTransition::Blocked(report) => interaction.show_report(&report),
                StepTransition::ReadyToSubmit => match wizard.submit(backend) {
                    Ok(receipt) => return Ok(WizardOutcome::Submitted(receipt)),
                    Err(err) => {
                        let message = wizard
                            .submission_error()
                            .map(str::to_string)
                            .unwrap_or_else(|| err.to_string());
                        interaction.notify(&message);
                    }
                },
            },
        }
    }
}

fn collect_media(
    wizard: &mut ListingWizard,
    backend: &dyn ListingBackend,
    interaction: &mut dyn StepInteraction,
) -> Result<()> {
    let failed: Vec<_> = wizard
        .uploader()
        .slots()
        .iter()
        .filter(|slot| matches!(slot.state, UploadState::Failed { .. }))
        .map(|slot| slot.id)
        .collect();
    for id in failed {
        wizard.uploader_mut().retry(id);
    }

    let files = interaction.pick_images()?;
    if !files.is_empty() {
        let outcome = wizard.enqueue_images(files);
        if let Some(message) = outcome.rejection_message() {
            interaction.notify(&message);
        }
    }
    if wizard.uploader().has_pending() {
        let summary = wizard.upload_images(backend);
        debug!(
            uploaded = summary.uploaded,
            failed = summary.failed,
            "media step uploads"
        );
        if summary.failed > 0 {
            interaction.notify(&format!(
                "{} image(s) failed to upload; they are retried next time you open this step",
                summary.failed
            ));
        }
    }

    let settings = wizard.settings().clone();
    interaction.edit(StepView::Media, wizard.draft_mut(), &settings)
}

fn collect_documents(
    wizard: &mut ListingWizard,
    backend: &dyn ListingBackend,
    interaction: &mut dyn StepInteraction,
) -> Result<()> {
    for document in interaction.pick_documents()? {
        match backend.upload_file(&document.file.file_name, &document.file.bytes) {
            Ok(url) => wizard.draft_mut().add_document(document.name, url),
            Err(err) => {
                warn!(file = %document.file.file_name, error = %err, "document upload failed");
                interaction.notify(&format!(
                    "Upload of `{}` failed: {}",
                    document.file.file_name,
                    err.user_message()
                ));
            }
        }
    }
    Ok(())
}

/// Terminal prompts built on `dialoguer`.
pub struct TerminalInteraction {
    theme: ColorfulTheme,
    formatter: Formatter,
    language: Language,
    currency: CurrencyCode,
    catalog: Option<OptionCatalog>,
    last_step: Option<WizardStep>,
}

impl TerminalInteraction {
    /// `language` picks localized labels, `currency` the price shown on review.
    pub fn new(language: Language, currency: CurrencyCode) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            formatter: Formatter::new(),
            language,
            currency,
            catalog: None,
            last_step: None,
        }
    }

    /// Offers catalog options as selection lists instead of free text.
    pub fn with_catalog(mut self, catalog: OptionCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    fn clear_screen(&self) {
        let mut stdout = io::stdout();
        if let Err(err) = execute!(
            stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        ) {
            debug!(error = %err, "could not clear terminal");
        }
        let _ = stdout.flush();
    }

    fn text(&self, prompt: &str, current: &str) -> Result<String> {
        let value = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()?;
        Ok(value.trim().to_string())
    }

    fn localized(
        &self,
        label: &str,
        value: &mut LocalizedText,
        languages: &[Language],
    ) -> Result<()> {
        for language in languages {
            let prompt = format!("{} ({})", label, language.label());
            let answer = self.text(&prompt, value.get(*language))?;
            value.set(*language, answer);
        }
        Ok(())
    }

    fn localized_map(
        &self,
        label: &str,
        value: &mut LocalizedMap,
        languages: &[Language],
    ) -> Result<()> {
        for language in languages {
            let prompt = format!("{} ({})", label, language.label());
            let current = value.get(*language).unwrap_or_default().to_string();
            let answer = self.text(&prompt, &current)?;
            if !answer.is_empty() {
                value.insert(*language, answer);
            }
        }
        Ok(())
    }

    /// Empty input keeps `current`.
    fn parsed<T>(&self, prompt: &str, current: Option<T>) -> Result<Option<T>>
    where
        T: FromStr + Display + Clone,
    {
        let initial = current.as_ref().map(ToString::to_string).unwrap_or_default();
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                let trimmed = input.trim();
                if trimmed.is_empty() || trimmed.parse::<T>().is_ok() {
                    Ok(())
                } else {
                    Err(format!("`{}` is not a valid value", trimmed))
                }
            })
            .interact_text()?;
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            return Ok(current);
        }
        Ok(trimmed.parse::<T>().ok().or(current))
    }

    /// Counts keep the unset sentinel while left empty.
    fn count(&self, prompt: &str, current: i32) -> Result<i32> {
        let shown = (current >= 0).then_some(current);
        Ok(self.parsed(prompt, shown)?.unwrap_or(current))
    }

    fn amount(&self, prompt: &str, current: f64) -> Result<f64> {
        let shown = (current > 0.0).then_some(current);
        Ok(self.parsed(prompt, shown)?.unwrap_or(current))
    }

    fn flag(&self, prompt: &str, current: &FlagInput) -> Result<FlagInput> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(current.coerce().unwrap_or(false))
            .interact()?;
        Ok(FlagInput::Bool(answer))
    }

    fn pick_option(
        &self,
        prompt: &str,
        options: &[CatalogOption],
        current: &LocalizedText,
    ) -> Result<LocalizedText> {
        let labels = OptionCatalog::labels(options, self.language);
        let default = options
            .iter()
            .position(|option| option.name.en == current.en)
            .unwrap_or(0);
        let index = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&labels)
            .default(default)
            .interact()?;
        Ok(options[index].name.clone())
    }

    fn pick_ids(
        &self,
        prompt: &str,
        options: &[CatalogOption],
        current: &[String],
    ) -> Result<Vec<String>> {
        if options.is_empty() {
            let prompt = format!("{} (comma-separated ids)", prompt);
            let answer = self.text(&prompt, &current.join(", "))?;
            return Ok(split_list(&answer));
        }
        let labels = OptionCatalog::labels(options, self.language);
        let checked: Vec<bool> = options
            .iter()
            .map(|option| current.contains(&option.id))
            .collect();
        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&labels)
            .defaults(&checked)
            .interact()?;
        let ids: Vec<String> = picked
            .into_iter()
            .map(|index| options[index].id.clone())
            .collect();
        Ok(ids)
    }

    fn edit_basics(&self, draft: &mut ListingDraft, settings: &WizardSettings) -> Result<()> {
        let languages = &settings.languages;
        match self.catalog.as_ref() {
            Some(catalog) if !catalog.listing_types.is_empty() => {
                draft.listing_type =
                    self.pick_option("Listing type", &catalog.listing_types, &draft.listing_type)?;
            }
            _ => self.localized("Listing type", &mut draft.listing_type, languages)?,
        }

        match self.catalog.as_ref() {
            Some(catalog) if !catalog.property_types.is_empty() => {
                draft.property_type = self.pick_option(
                    "Property type",
                    &catalog.property_types,
                    &draft.property_type,
                )?;
            }
            _ => {
                let labels: Vec<&str> = PropertyKind::ALL.iter().map(|kind| kind.label()).collect();
                let current = draft.property_kind();
                let default = PropertyKind::ALL
                    .iter()
                    .position(|kind| Some(*kind) == current)
                    .unwrap_or(0);
                let index = Select::with_theme(&self.theme)
                    .with_prompt("Property type")
                    .items(&labels)
                    .default(default)
                    .interact()?;
                let secondary = self.text("Property type (Russian)", &draft.property_type.ru)?;
                draft.set_property_kind(PropertyKind::ALL[index], secondary);
            }
        }

        if draft.property_kind() != Some(PropertyKind::Land) {
            match self.catalog.as_ref() {
                Some(catalog) if !catalog.housing_categories.is_empty() => {
                    draft.housing_category = self.pick_option(
                        "Housing category",
                        &catalog.housing_categories,
                        &draft.housing_category,
                    )?;
                }
                _ => self.localized("Housing category", &mut draft.housing_category, languages)?,
            }
        }

        self.localized("Title", &mut draft.title, languages)?;
        self.localized("Description", &mut draft.description, languages)
    }

    fn edit_residential(&self, draft: &mut ListingDraft, settings: &WizardSettings) -> Result<()> {
        let languages = &settings.languages;
        let details = &mut draft.residential;
        details.gross_area = self.amount("Gross area (m²)", details.gross_area)?;
        details.net_area = self.amount("Net area (m²)", details.net_area)?;
        details.room_count = self.count("Rooms", details.room_count)?;
        details.bathroom_count = self.count("Bathrooms", details.bathroom_count)?;
        details.balcony_count = self.count("Balconies", details.balcony_count)?;
        details.floor_count = self.count("Floors in building", details.floor_count)?;
        details.floor_number = self.parsed("Floor number", details.floor_number)?;
        details.build_year = self.count("Build year", details.build_year)?;
        self.localized("Kitchen type", &mut details.kitchen_type, languages)?;
        self.localized("Heating type", &mut details.heating_type, languages)?;
        self.localized("Source", &mut details.source, languages)?;
        self.localized_map("Usage status", &mut details.usage_status, languages)?;
        self.localized_map("Deed status", &mut details.deed_status, languages)?;
        details.furnished = self.flag("Furnished?", &details.furnished)?;
        details.exchangeable = self.flag("Open to exchange?", &details.exchangeable)?;
        Ok(())
    }

    fn edit_commercial(&self, draft: &mut ListingDraft, settings: &WizardSettings) -> Result<()> {
        let languages = &settings.languages;
        let details = &mut draft.commercial;
        details.gross_area = self.amount("Gross area (m²)", details.gross_area)?;
        details.net_area = self.amount("Net area (m²)", details.net_area)?;
        details.room_count = self.count("Rooms", details.room_count)?;
        details.building_age = self.count("Building age", details.building_age)?;
        self.localized("Heating type", &mut details.heating_type, languages)?;
        self.localized_map("Usage status", &mut details.usage_status, languages)?;
        self.localized_map("Deed status", &mut details.deed_status, languages)?;
        details.exchangeable = self.flag("Open to exchange?", &details.exchangeable)?;
        Ok(())
    }

    fn edit_land(&self, draft: &mut ListingDraft, settings: &WizardSettings) -> Result<()> {
        let languages = &settings.languages;
        let details = &mut draft.land;
        details.area = self.amount("Area (m²)", details.area)?;
        details.block_number = self.text("Block number", &details.block_number)?;
        details.parcel_number = self.text("Parcel number", &details.parcel_number)?;
        details.sheet_number = self.text("Sheet number", &details.sheet_number)?;
        self.localized_map("Zoning status", &mut details.zoning_status, languages)?;
        self.localized_map("Deed status", &mut details.deed_status, languages)?;
        self.localized_map("General features", &mut details.general_features, languages)?;
        details.exchangeable = self.flag("Open to exchange?", &details.exchangeable)?;
        Ok(())
    }

    fn edit_location(&self, draft: &mut ListingDraft, settings: &WizardSettings) -> Result<()> {
        let languages = &settings.languages;
        for currency in &settings.currencies {
            let current = draft.pricing.price.amount(currency).unwrap_or(0.0);
            let amount = self.amount(&format!("Price ({})", currency), current)?;
            if amount != current {
                draft.set_price(currency.clone(), amount);
            }
        }
        for currency in &settings.currencies {
            let current = draft.pricing.dues.amount(currency);
            let prompt = format!("Monthly dues ({}, optional)", currency);
            if let Some(amount) = self.parsed(&prompt, current)? {
                draft.set_dues(currency.clone(), amount);
            }
        }

        let address = &mut draft.address;
        self.localized("Country", &mut address.country, languages)?;
        self.localized("State", &mut address.state, languages)?;
        self.localized("City", &mut address.city, languages)?;
        self.localized("Neighborhood", &mut address.neighborhood, languages)?;
        self.localized("Street", &mut address.street, languages)?;
        address.building_number = self.text("Building number", &address.building_number)?;
        address.apartment_number = self.text("Apartment number", &address.apartment_number)?;
        address.postal_code = self.text("Postal code", &address.postal_code)?;

        let shown = (!address.coordinates.is_unset()).then_some(address.coordinates);
        let latitude = self.parsed("Latitude", shown.map(|c| c.latitude))?;
        let longitude = self.parsed("Longitude", shown.map(|c| c.longitude))?;
        if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
            address.coordinates = Coordinates::new(latitude, longitude);
        }
        Ok(())
    }

    fn edit_features(&self, draft: &mut ListingDraft) -> Result<()> {
        let empty = OptionCatalog::default();
        let catalog = self.catalog.as_ref().unwrap_or(&empty);
        let selection = &mut draft.selection;
        selection.features = self.pick_ids("Features", &catalog.features, &selection.features)?;
        selection.infrastructures = self.pick_ids(
            "Infrastructure",
            &catalog.infrastructures,
            &selection.infrastructures,
        )?;
        selection.views = self.pick_ids("Views", &catalog.views, &selection.views)?;

        if catalog.distance_types.is_empty() {
            let current = selection
                .distances
                .iter()
                .map(|entry| format!("{}={}", entry.type_id, entry.distance))
                .collect::<Vec<_>>()
                .join(", ");
            let answer = self.text("Distances (type=km, comma-separated)", &current)?;
            selection.distances.clear();
            for pair in split_list(&answer) {
                match pair.split_once('=') {
                    Some((type_id, distance)) => match distance.trim().parse::<f64>() {
                        Ok(distance) => selection.set_distance(type_id.trim(), distance),
                        Err(_) => self.formatter.print_warning(format!("Skipping `{}`", pair)),
                    },
                    None => self.formatter.print_warning(format!("Skipping `{}`", pair)),
                }
            }
        } else {
            for option in &catalog.distance_types {
                let current = selection
                    .distances
                    .iter()
                    .find(|entry| entry.type_id == option.id)
                    .map(|entry| entry.distance);
                let prompt = format!(
                    "Distance to {} (km, optional)",
                    option.name.get_or_fallback(self.language)
                );
                if let Some(distance) = self.parsed(&prompt, current)? {
                    selection.set_distance(&option.id, distance);
                }
            }
        }
        Ok(())
    }

    fn edit_media(&self, draft: &mut ListingDraft) -> Result<()> {
        if !draft.media.images.is_empty() {
            let removed = MultiSelect::with_theme(&self.theme)
                .with_prompt("Images to remove")
                .items(&draft.media.images)
                .interact()?;
            let urls: Vec<String> = removed
                .into_iter()
                .map(|index| draft.media.images[index].clone())
                .collect();
            for url in urls {
                draft.remove_image(&url);
            }
        }
        let current = draft.media.video_url.clone().unwrap_or_default();
        let video = self.text("Video link (optional)", &current)?;
        draft.media.video_url = (!video.is_empty()).then_some(video);
        Ok(())
    }

    fn show_review(&self, draft: &ListingDraft) {
        for line in review_summary(draft, self.language, &self.currency) {
            self.formatter.print_info(line);
        }
    }
}

impl StepInteraction for TerminalInteraction {
    fn enter_step(&mut self, step: WizardStep) {
        if self.last_step != Some(step) {
            self.clear_screen();
            self.last_step = Some(step);
        }
        self.formatter.print_header(step);
    }

    fn edit(
        &mut self,
        view: StepView,
        draft: &mut ListingDraft,
        settings: &WizardSettings,
    ) -> Result<()> {
        match view {
            StepView::Basics => self.edit_basics(draft, settings),
            StepView::ResidentialDetails => self.edit_residential(draft, settings),
            StepView::CommercialDetails => self.edit_commercial(draft, settings),
            StepView::LandDetails => self.edit_land(draft, settings),
            StepView::Location => self.edit_location(draft, settings),
            StepView::Features => self.edit_features(draft),
            StepView::Media => self.edit_media(draft),
            StepView::Review => {
                self.show_review(draft);
                Ok(())
            }
        }
    }

    fn pick_images(&mut self) -> Result<Vec<ImageFile>> {
        let prompt = "Image files to add (comma-separated paths, empty to skip)";
        let answer = self.text(prompt, "")?;
        let mut files = Vec::new();
        for path in split_list(&answer) {
            match read_file(Path::new(&path)) {
                Ok(file) => files.push(file),
                Err(err) => self.formatter.print_error(format!("{}: {}", path, err)),
            }
        }
        Ok(files)
    }

    fn pick_documents(&mut self) -> Result<Vec<DocumentUpload>> {
        let mut documents = Vec::new();
        while Confirm::with_theme(&self.theme)
            .with_prompt("Attach a document?")
            .default(false)
            .interact()?
        {
            let path = self.text("Document file", "")?;
            let file = match read_file(Path::new(&path)) {
                Ok(file) => file,
                Err(err) => {
                    self.formatter.print_error(format!("{}: {}", path, err));
                    continue;
                }
            };
            let mut name = LocalizedText::default();
            self.localized("Document name", &mut name, &Language::ALL)?;
            documents.push(DocumentUpload { name, file });
        }
        Ok(documents)
    }

    fn choose_action(&mut self, step: WizardStep) -> Result<StepAction> {
        let forward = if step == WizardStep::LAST { "Submit" } else { "Next" };
        let items = [forward, "Back", "Cancel"];
        let index = Select::with_theme(&self.theme)
            .items(&items)
            .default(0)
            .interact()?;
        Ok(match index {
            0 => StepAction::Next,
            1 => StepAction::Back,
            _ => StepAction::Cancel,
        })
    }

    fn show_report(&mut self, report: &ValidationReport) {
        self.formatter.print_report(report);
    }

    fn notify(&mut self, message: &str) {
        self.formatter.print_warning(message);
    }
}

fn read_file(path: &Path) -> io::Result<ImageFile> {
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ImageFile::new(file_name, bytes))
}

/// Summary lines shown before publishing, priced in `currency`.
pub fn review_summary(
    draft: &ListingDraft,
    language: Language,
    currency: &CurrencyCode,
) -> Vec<String> {
    let title = draft.title.get_or_fallback(language);
    let kind = draft.property_type.get_or_fallback(language);
    let price = display_price(&draft.pricing.price, currency);
    let address = format_address(&draft.address.display_parts(), language);
    vec![
        format!("Title:     {}", title),
        format!("Type:      {}", kind),
        format!("Price:     {}", price),
        format!("Address:   {}", address),
        format!("Images:    {}", draft.media.images.len()),
        format!("Documents: {}", draft.documents.len()),
    ]
}

fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
