//! Subcommands of the `listing_wizard` binary.

use std::env;
use std::fs;
use std::path::Path;

use strsim::levenshtein;
use tracing::{info, warn};

use crate::api::{HttpBackend, ListingBackend};
use crate::cli::formatter::Formatter;
use crate::cli::interaction::{run_wizard, TerminalInteraction, WizardOutcome};
use crate::config::{PreferencesManager, WizardSettings};
use crate::currency::{display_price, CurrencyCode};
use crate::domain::{ListingDraft, PropertyKind};
use crate::errors::{ListingError, Result};
use crate::utils::build_info;
use crate::wizard::{
    assemble, validate_step, FieldId, ListingWizard, StepView, ValidationContext,
    ValidationReport, WizardStep,
};

pub const COMMANDS: [&str; 7] = [
    "new", "validate", "payload", "price", "prefs", "wizard", "version",
];

const API_URL_ENV: &str = "LISTING_API_URL";

/// Exit status for a command that ran but found problems (bad usage,
/// invalid draft).
pub const EXIT_INVALID: i32 = 1;

/// Runs one command line (without the program name) and returns the exit
/// status.
pub fn run(args: &[String]) -> Result<i32> {
    let Some((command, rest)) = args.split_first() else {
        print_usage();
        return Ok(EXIT_INVALID);
    };

    match command.as_str() {
        "new" => new_draft(rest),
        "validate" => validate(rest),
        "payload" => payload(rest),
        "price" => price(rest),
        "prefs" => prefs(rest),
        "wizard" => wizard(rest),
        "version" => {
            println!("{}", build_info::current());
            Ok(0)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(0)
        }
        other => {
            print_usage();
            if let Some(best) = suggest_command(other) {
                eprintln!("Did you mean `{}`?", best);
            }
            Ok(EXIT_INVALID)
        }
    }
}

/// Closest known command within three edits.
pub fn suggest_command(input: &str) -> Option<&'static str> {
    let mut suggestions: Vec<_> = COMMANDS
        .iter()
        .map(|name| (levenshtein(name, input), *name))
        .collect();
    suggestions.sort_by_key(|(distance, _)| *distance);
    suggestions
        .first()
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, name)| *name)
}

pub fn print_usage() {
    eprintln!(
        "Usage: listing_wizard <command>\n\
         Commands:\n  \
         new [residential|commercial|land]\n  \
         validate <draft.json> [step]\n  \
         payload <draft.json>\n  \
         price <draft.json> [currency]\n  \
         prefs [currency|language <value>]\n  \
         wizard [--api URL] [--update ID]\n  \
         version"
    );
}

pub fn load_draft(path: &Path) -> Result<ListingDraft> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Validates `draft` for one step, or for every step in order when `only`
/// is `None`.
pub fn validate_draft(
    draft: &ListingDraft,
    settings: &WizardSettings,
    only: Option<WizardStep>,
) -> Vec<(WizardStep, ValidationReport)> {
    let steps: Vec<WizardStep> = match only {
        Some(step) => vec![step],
        None => WizardStep::ALL.to_vec(),
    };
    steps
        .into_iter()
        .map(|step| {
            let ctx = ValidationContext::new(settings);
            let report = match StepView::resolve(step, draft.property_kind()) {
                Some(view) => validate_step(view, draft, ctx),
                None => {
                    let mut report = ValidationReport::new();
                    report.push(
                        FieldId::PropertyType,
                        format!("Unknown property type `{}`", draft.property_type.en.trim()),
                    );
                    report
                }
            };
            (step, report)
        })
        .collect()
}

fn new_draft(args: &[String]) -> Result<i32> {
    let mut draft = ListingDraft::new();
    if let Some(label) = args.first() {
        let Some(kind) = PropertyKind::from_label(label) else {
            eprintln!(
                "Unknown property type `{}`; expected one of: {}",
                label,
                PropertyKind::ALL.map(|kind| kind.label()).join(", ")
            );
            return Ok(EXIT_INVALID);
        };
        draft.set_property_kind(kind, "");
    }
    println!("{}", serde_json::to_string_pretty(&draft)?);
    Ok(0)
}

fn validate(args: &[String]) -> Result<i32> {
    let Some(path) = args.first() else {
        print_usage();
        return Ok(EXIT_INVALID);
    };
    let only = match args.get(1) {
        Some(raw) => match raw.parse::<u8>().ok().and_then(WizardStep::from_number) {
            Some(step) => Some(step),
            None => {
                eprintln!(
                    "Step must be a number from 1 to {}",
                    WizardStep::LAST.number()
                );
                return Ok(EXIT_INVALID);
            }
        },
        None => None,
    };

    let draft = load_draft(Path::new(path))?;
    let settings = WizardSettings::default();
    let formatter = Formatter::new();
    let mut valid = true;
    for (step, report) in validate_draft(&draft, &settings, only) {
        if report.is_valid() {
            formatter.print_success(format!("{}: ok", step));
        } else {
            valid = false;
            formatter.print_warning(format!("{}: {} problem(s)", step, report.errors.len()));
            formatter.print_report(&report);
        }
    }
    Ok(if valid { 0 } else { EXIT_INVALID })
}

fn payload(args: &[String]) -> Result<i32> {
    let Some(path) = args.first() else {
        print_usage();
        return Ok(EXIT_INVALID);
    };
    let draft = load_draft(Path::new(path))?;
    let settings = WizardSettings::default();
    let payload = assemble(&draft, settings.current_year)?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(0)
}

fn price(args: &[String]) -> Result<i32> {
    let Some(path) = args.first() else {
        print_usage();
        return Ok(EXIT_INVALID);
    };
    let draft = load_draft(Path::new(path))?;
    let currency = match args.get(1) {
        Some(code) => CurrencyCode::new(code.as_str()),
        None => PreferencesManager::new()?.load()?.selected_currency,
    };
    println!("{}", display_price(&draft.pricing.price, &currency));
    Ok(0)
}

fn prefs(args: &[String]) -> Result<i32> {
    let manager = PreferencesManager::new()?;
    let prefs = match (args.first().map(String::as_str), args.get(1)) {
        (None, _) => manager.load()?,
        (Some("currency"), Some(value)) => manager.set_currency(value)?,
        (Some("language"), Some(value)) => manager.set_language(value)?,
        _ => {
            print_usage();
            return Ok(EXIT_INVALID);
        }
    };
    println!("{}", serde_json::to_string_pretty(&prefs)?);
    Ok(0)
}

fn wizard(args: &[String]) -> Result<i32> {
    let mut api_url = None;
    let mut update_id = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--api" => api_url = iter.next().cloned(),
            "--update" => update_id = iter.next().cloned(),
            other => {
                eprintln!("Unknown wizard option `{}`", other);
                print_usage();
                return Ok(EXIT_INVALID);
            }
        }
    }

    let manager = PreferencesManager::new()?;
    let prefs = manager.load()?;
    let base_url = api_url
        .or_else(|| env::var(API_URL_ENV).ok())
        .or(prefs.api_base_url)
        .ok_or_else(|| {
            ListingError::InvalidInput(format!(
                "no API address; pass --api URL or set {}",
                API_URL_ENV
            ))
        })?;
    let backend = HttpBackend::new(base_url)?;

    let settings = WizardSettings::default();
    let mut wizard = match update_id {
        Some(id) => {
            let record = backend.fetch_listing(&id)?;
            ListingWizard::from_record(id, record, settings)
        }
        None => ListingWizard::new(settings),
    };

    let mut interaction =
        TerminalInteraction::new(prefs.selected_language, prefs.selected_currency);
    match backend.fetch_options() {
        Ok(catalog) => interaction = interaction.with_catalog(catalog),
        Err(err) => warn!(error = %err, "option lists unavailable; falling back to free text"),
    }

    let formatter = Formatter::new();
    match run_wizard(&mut wizard, &backend, &mut interaction)? {
        WizardOutcome::Submitted(receipt) => {
            info!(id = %receipt.id, "listing submitted");
            formatter.print_success(format!("Listing saved with id {}", receipt.id));
        }
        WizardOutcome::Cancelled => formatter.print_info("Wizard cancelled; nothing was saved"),
    }
    Ok(0)
}
