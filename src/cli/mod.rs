//! Terminal front end: subcommands, the interactive wizard driver and
//! colored output.

pub mod commands;
pub mod formatter;
pub mod interaction;

pub use commands::run;
pub use formatter::Formatter;
pub use interaction::{
    run_wizard, DocumentUpload, StepAction, StepInteraction, TerminalInteraction, WizardOutcome,
};
