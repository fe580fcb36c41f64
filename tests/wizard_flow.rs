mod common;

use std::sync::{Arc, Mutex};

use common::{
    commercial_draft, land_draft, residential_draft, settings, MockBackend, ScriptedInteraction,
};
use listing_core::{
    cli::{run_wizard, StepAction, WizardOutcome},
    domain::{ListingDraft, ListingMode, UNSET_COUNT},
    errors::ListingError,
    wizard::{
        assemble, validate_step, FieldId, ListingWizard, StepTransition, StepView,
        ValidationContext, WizardStep,
    },
};
use serde_json::json;

fn wizard_with(draft: ListingDraft) -> ListingWizard {
    let mut wizard = ListingWizard::new(settings());
    *wizard.draft_mut() = draft;
    wizard
}

fn advance_to(wizard: &mut ListingWizard, target: WizardStep) {
    while wizard.current_step() < target {
        match wizard.advance() {
            StepTransition::Advanced { .. } => {}
            other => panic!("could not reach {target}: {other:?}"),
        }
    }
}

#[test]
fn complete_residential_draft_walks_all_six_steps() {
    let mut wizard = wizard_with(residential_draft());
    let mut visited = vec![wizard.current_step().number()];
    while let StepTransition::Advanced { to, .. } = wizard.advance() {
        visited.push(to.number());
    }
    assert_eq!(visited, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(wizard.current_step(), WizardStep::Review);
    assert_eq!(wizard.advance(), StepTransition::ReadyToSubmit);
}

#[test]
fn unset_room_count_blocks_details_step() {
    let mut draft = residential_draft();
    draft.residential.room_count = UNSET_COUNT;
    let mut wizard = wizard_with(draft);
    advance_to(&mut wizard, WizardStep::Details);

    match wizard.advance() {
        StepTransition::Blocked(report) => {
            assert!(report.has_field(FieldId::RoomCount));
            assert!(report.errors.iter().any(|e| e == "Room count is required"));
        }
        other => panic!("expected a blocked step, got {other:?}"),
    }
    assert_eq!(wizard.current_step(), WizardStep::Details);
    assert!(wizard.last_report().is_some());
}

#[test]
fn back_then_forward_keeps_step_and_draft() {
    let mut wizard = wizard_with(commercial_draft());
    advance_to(&mut wizard, WizardStep::Location);
    let before = wizard.draft().clone();

    assert!(wizard.back());
    assert_eq!(wizard.current_step(), WizardStep::Details);
    assert_eq!(
        wizard.advance(),
        StepTransition::Advanced {
            from: WizardStep::Details,
            to: WizardStep::Location
        }
    );
    assert_eq!(wizard.draft(), &before);
}

#[test]
fn blocked_step_blocks_again_after_back_and_forward() {
    let mut draft = residential_draft();
    draft.residential.room_count = UNSET_COUNT;
    let mut wizard = wizard_with(draft);
    advance_to(&mut wizard, WizardStep::Details);
    let before = wizard.draft().clone();

    let first = wizard.advance();
    assert!(matches!(first, StepTransition::Blocked(_)));
    assert!(wizard.back());
    assert_eq!(wizard.current_step(), WizardStep::Basics);
    advance_to(&mut wizard, WizardStep::Details);

    assert_eq!(wizard.advance(), first);
    assert_eq!(wizard.current_step(), WizardStep::Details);
    assert_eq!(wizard.draft(), &before);
}

#[test]
fn validators_return_the_same_report_on_repeat() {
    let settings = settings();
    for draft in [ListingDraft::new(), residential_draft(), land_draft()] {
        for view in StepView::ALL {
            let first = validate_step(view, &draft, ValidationContext::new(&settings));
            let second = validate_step(view, &draft, ValidationContext::new(&settings));
            assert_eq!(first, second, "{view:?} changed between runs");
        }
    }
}

#[test]
fn duplicate_currencies_in_loaded_draft_keep_one_price() {
    let mut value = serde_json::to_value(residential_draft()).unwrap();
    value["pricing"]["price"] = json!([
        { "amount": 0.0, "currency": "USD" },
        { "amount": 8_000_000.0, "currency": "TRY" },
        { "amount": 250_000.0, "currency": "usd" }
    ]);
    let draft: ListingDraft = serde_json::from_value(value).unwrap();
    assert_eq!(draft.pricing.price.len(), 2);

    let settings = settings();
    let report = validate_step(
        StepView::Location,
        &draft,
        ValidationContext::new(&settings),
    );
    assert!(report.is_valid(), "{:?}", report.errors);

    let payload = serde_json::to_value(assemble(&draft, 2026).unwrap()).unwrap();
    assert_eq!(payload["price"].as_array().map(Vec::len), Some(2));
}

#[test]
fn back_on_first_step_is_a_no_op() {
    let mut wizard = ListingWizard::new(settings());
    assert!(!wizard.back());
    assert_eq!(wizard.current_step(), WizardStep::Basics);
}

#[test]
fn back_skips_validation() {
    let mut wizard = wizard_with(residential_draft());
    advance_to(&mut wizard, WizardStep::Location);
    wizard.update(|draft| draft.title.en.clear());
    assert!(wizard.back());
    assert!(wizard.back());
    assert_eq!(wizard.current_step(), WizardStep::Basics);
}

#[test]
fn go_to_only_moves_backwards() {
    let mut wizard = wizard_with(land_draft());
    advance_to(&mut wizard, WizardStep::Features);
    assert!(matches!(
        wizard.go_to(WizardStep::Review),
        Err(ListingError::InvalidInput(_))
    ));
    wizard.go_to(WizardStep::Basics).unwrap();
    assert_eq!(wizard.current_step(), WizardStep::Basics);
}

#[test]
fn details_view_follows_property_type() {
    let mut wizard = wizard_with(land_draft());
    advance_to(&mut wizard, WizardStep::Details);
    assert_eq!(wizard.view(), Some(StepView::LandDetails));

    wizard.go_to(WizardStep::Basics).unwrap();
    wizard.update(|draft| draft.property_type.en = "Castle".into());
    assert!(matches!(wizard.advance(), StepTransition::Blocked(_)));
}

#[test]
fn step_listeners_see_every_change() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut wizard = wizard_with(residential_draft());
    wizard.on_step_change(move |step| sink.lock().unwrap().push(step.number()));

    advance_to(&mut wizard, WizardStep::Location);
    wizard.back();
    assert_eq!(*seen.lock().unwrap(), vec![2, 3, 2]);
}

#[test]
fn submit_outside_last_step_is_rejected() {
    let backend = MockBackend::new();
    let mut wizard = wizard_with(residential_draft());
    let err = wizard.submit(&backend).unwrap_err();
    assert!(matches!(
        err,
        ListingError::WrongStep {
            current: 1,
            expected: 6
        }
    ));
    assert!(backend.state().created.is_empty());
}

#[test]
fn successful_submit_resets_to_empty_create_draft() {
    let backend = MockBackend::new();
    let mut wizard = wizard_with(residential_draft());
    advance_to(&mut wizard, WizardStep::Review);

    let receipt = wizard.submit(&backend).unwrap();
    assert_eq!(receipt.id, "listing-1");
    assert_eq!(wizard.current_step(), WizardStep::Basics);
    assert_eq!(wizard.draft(), &ListingDraft::new());
    assert_eq!(wizard.mode(), &ListingMode::Create);

    let state = backend.state();
    assert_eq!(state.created.len(), 1);
    assert_eq!(state.created[0].title.en, "Sea view flat");
}

#[test]
fn failed_submit_stays_on_review_with_message() {
    let backend = MockBackend::failing_submit(400, "Title already used");
    let mut wizard = wizard_with(residential_draft());
    advance_to(&mut wizard, WizardStep::Review);
    let before = wizard.draft().clone();

    let err = wizard.submit(&backend).unwrap_err();
    assert!(matches!(err, ListingError::Api(_)));
    assert_eq!(wizard.current_step(), WizardStep::Review);
    assert_eq!(wizard.submission_error(), Some("Title already used"));
    assert_eq!(wizard.draft(), &before);
}

#[test]
fn update_mode_sends_patch_with_listing_id() {
    let backend = MockBackend::new();
    let mut wizard = ListingWizard::for_update("abc123", commercial_draft(), settings());
    advance_to(&mut wizard, WizardStep::Review);

    let receipt = wizard.submit(&backend).unwrap();
    assert_eq!(receipt.id, "abc123");
    let state = backend.state();
    assert!(state.created.is_empty());
    assert_eq!(state.updated.len(), 1);
    assert_eq!(state.updated[0].0, "abc123");
    assert!(state.updated[0].1.commercial.is_some());
}

#[test]
fn fetched_record_hydrates_update_wizard() {
    let record = assemble(&land_draft(), 2026).unwrap();
    let wizard = ListingWizard::from_record("land-9", record, settings());

    assert_eq!(wizard.mode().listing_id(), Some("land-9"));
    assert_eq!(wizard.current_step(), WizardStep::Basics);
    let draft = wizard.draft();
    assert_eq!(draft.id.as_deref(), Some("land-9"));
    assert_eq!(draft.land.block_number, "112");
    assert_eq!(draft.land.exchangeable.coerce(), Some(false));
    assert_eq!(draft.media.images.len(), 3);
}

#[test]
fn scripted_session_submits_from_review() {
    let backend = MockBackend::new();
    let mut wizard = wizard_with(residential_draft());
    let mut interaction = ScriptedInteraction::new(vec![StepAction::Next; 6]);

    let outcome = run_wizard(&mut wizard, &backend, &mut interaction).unwrap();
    assert_eq!(
        outcome,
        WizardOutcome::Submitted(listing_core::api::SubmissionReceipt {
            id: "listing-1".into()
        })
    );
    let entered: Vec<u8> = interaction.entered.iter().map(|step| step.number()).collect();
    assert_eq!(entered, vec![1, 2, 3, 4, 5, 6]);
    assert!(interaction.reports.is_empty());
}

#[test]
fn scripted_session_reports_blocked_step_and_failed_submit() {
    let backend = MockBackend::failing_submit(500, "Server is busy");
    let mut draft = residential_draft();
    draft.residential.build_year = 1700;
    let mut wizard = wizard_with(draft);
    let mut interaction = ScriptedInteraction::new(vec![StepAction::Next, StepAction::Next]);

    let outcome = run_wizard(&mut wizard, &backend, &mut interaction).unwrap();
    assert_eq!(outcome, WizardOutcome::Cancelled);
    assert_eq!(interaction.reports.len(), 1);
    assert_eq!(
        interaction.reports[0].errors,
        vec!["Build year must be between 1800 and 2026".to_string()]
    );

    wizard.update(|draft| draft.residential.build_year = 1999);
    let mut interaction = ScriptedInteraction::new(vec![StepAction::Next; 5]);
    let outcome = run_wizard(&mut wizard, &backend, &mut interaction).unwrap();
    assert_eq!(outcome, WizardOutcome::Cancelled);
    assert_eq!(interaction.notices, vec!["Server is busy".to_string()]);
    assert_eq!(wizard.current_step(), WizardStep::Review);
}
