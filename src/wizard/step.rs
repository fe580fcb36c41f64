use std::fmt;

use crate::domain::PropertyKind;

/// The six wizard steps, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Basics,
    Details,
    Location,
    Features,
    Media,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Basics,
        WizardStep::Details,
        WizardStep::Location,
        WizardStep::Features,
        WizardStep::Media,
        WizardStep::Review,
    ];

    pub const FIRST: WizardStep = WizardStep::Basics;
    pub const LAST: WizardStep = WizardStep::Review;

    pub fn number(self) -> u8 {
        match self {
            WizardStep::Basics => 1,
            WizardStep::Details => 2,
            WizardStep::Location => 3,
            WizardStep::Features => 4,
            WizardStep::Media => 5,
            WizardStep::Review => 6,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number().checked_sub(1)?)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Basics => "Listing basics",
            WizardStep::Details => "Property details",
            WizardStep::Location => "Price and location",
            WizardStep::Features => "Features and surroundings",
            WizardStep::Media => "Photos and video",
            WizardStep::Review => "Documents and publish",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step {} of {}: {}",
            self.number(),
            Self::LAST.number(),
            self.title()
        )
    }
}

/// Concrete screen shown for a step; step 2 splits by property branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepView {
    Basics,
    ResidentialDetails,
    CommercialDetails,
    LandDetails,
    Location,
    Features,
    Media,
    Review,
}

impl StepView {
    pub const ALL: [StepView; 8] = [
        StepView::Basics,
        StepView::ResidentialDetails,
        StepView::CommercialDetails,
        StepView::LandDetails,
        StepView::Location,
        StepView::Features,
        StepView::Media,
        StepView::Review,
    ];

    /// `None` only for step 2 without a recognised property branch.
    pub fn resolve(step: WizardStep, kind: Option<PropertyKind>) -> Option<Self> {
        let view = match step {
            WizardStep::Basics => StepView::Basics,
            WizardStep::Details => match kind? {
                PropertyKind::Residential => StepView::ResidentialDetails,
                PropertyKind::Commercial => StepView::CommercialDetails,
                PropertyKind::Land => StepView::LandDetails,
            },
            WizardStep::Location => StepView::Location,
            WizardStep::Features => StepView::Features,
            WizardStep::Media => StepView::Media,
            WizardStep::Review => StepView::Review,
        };
        Some(view)
    }

    pub fn step(self) -> WizardStep {
        match self {
            StepView::Basics => WizardStep::Basics,
            StepView::ResidentialDetails | StepView::CommercialDetails | StepView::LandDetails => {
                WizardStep::Details
            }
            StepView::Location => WizardStep::Location,
            StepView::Features => WizardStep::Features,
            StepView::Media => WizardStep::Media,
            StepView::Review => WizardStep::Review,
        }
    }
}
