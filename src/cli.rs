//! CLI argument parsing for the inspection workflow.
//!
//! The CLI is intentionally thin: every command maps onto one operation of
//! the workflow core, so the same logic can be exercised without a terminal.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::schema::StepStatus;
use crate::transition::Transition;

/// Root CLI entrypoint for the inspection workflow client.
#[derive(Parser, Debug)]
#[command(
    name = "plantcheck",
    version,
    about = "Workflow client for plant inspection checklists",
    after_help = "Examples:\n  plantcheck show --inspection 12\n  plantcheck transition --inspection 12 begin\n  plantcheck step status --inspection 12 --step 7 --status failed\n  plantcheck step comment --inspection 12 --step 7 --text \"Dichtung undicht\"\n  plantcheck step photo --inspection 12 --step 7 --file leck.jpg\n  plantcheck report --inspection 12 --out bericht.html",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level workflow commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Show(ShowArgs),
    Transition(TransitionArgs),
    Step(StepArgs),
    Report(ReportArgs),
    Login(LoginArgs),
}

/// Show command inputs for one inspection detail view.
#[derive(Parser, Debug)]
#[command(about = "Load and print an inspection with its steps")]
pub struct ShowArgs {
    /// Id of the inspection to load
    #[arg(long, value_name = "ID")]
    pub inspection: u64,

    /// Base URL of the inspection service
    #[arg(long, value_name = "URL")]
    pub service_url: Option<String>,
}

/// Transition command inputs for a lifecycle action.
#[derive(Parser, Debug)]
#[command(about = "Apply a lifecycle transition to an inspection")]
pub struct TransitionArgs {
    /// Id of the inspection to transition
    #[arg(long, value_name = "ID")]
    pub inspection: u64,

    /// Lifecycle action to apply
    #[arg(value_enum)]
    pub action: TransitionArg,

    /// Base URL of the inspection service
    #[arg(long, value_name = "URL")]
    pub service_url: Option<String>,
}

/// Lifecycle actions selectable on the command line.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum TransitionArg {
    Begin,
    Cancel,
    Finish,
    Reset,
    Reopen,
}

impl From<TransitionArg> for Transition {
    fn from(arg: TransitionArg) -> Self {
        match arg {
            TransitionArg::Begin => Transition::Begin,
            TransitionArg::Cancel => Transition::Cancel,
            TransitionArg::Finish => Transition::Finish,
            TransitionArg::Reset => Transition::Reset,
            TransitionArg::Reopen => Transition::Reopen,
        }
    }
}

/// Step command group.
#[derive(Parser, Debug)]
#[command(about = "Edit one step of an inspection in progress")]
pub struct StepArgs {
    #[command(subcommand)]
    pub command: StepCommand,
}

/// Step-level mutations.
#[derive(Subcommand, Debug)]
pub enum StepCommand {
    Status(StepStatusArgs),
    Comment(StepCommentArgs),
    Photo(StepPhotoArgs),
}

/// Inputs for setting a step result.
#[derive(Parser, Debug)]
#[command(about = "Set the result status of one step")]
pub struct StepStatusArgs {
    /// Id of the parent inspection
    #[arg(long, value_name = "ID")]
    pub inspection: u64,

    /// Id of the step to update
    #[arg(long, value_name = "ID")]
    pub step: u64,

    /// New result status
    #[arg(long, value_enum)]
    pub status: StepStatusArg,

    /// Base URL of the inspection service
    #[arg(long, value_name = "URL")]
    pub service_url: Option<String>,
}

/// Step results selectable on the command line.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StepStatusArg {
    Passed,
    Failed,
    Na,
}

impl From<StepStatusArg> for StepStatus {
    fn from(arg: StepStatusArg) -> Self {
        match arg {
            StepStatusArg::Passed => StepStatus::Passed,
            StepStatusArg::Failed => StepStatus::Failed,
            StepStatusArg::Na => StepStatus::NotApplicable,
        }
    }
}

/// Inputs for buffering and saving a step comment.
#[derive(Parser, Debug)]
#[command(about = "Save a comment on one step")]
pub struct StepCommentArgs {
    /// Id of the parent inspection
    #[arg(long, value_name = "ID")]
    pub inspection: u64,

    /// Id of the step to comment on
    #[arg(long, value_name = "ID")]
    pub step: u64,

    /// Replacement comment text
    #[arg(long, value_name = "TEXT")]
    pub text: String,

    /// Base URL of the inspection service
    #[arg(long, value_name = "URL")]
    pub service_url: Option<String>,
}

/// Inputs for attaching a photo to a step.
#[derive(Parser, Debug)]
#[command(about = "Upload a photo and attach it to one step")]
pub struct StepPhotoArgs {
    /// Id of the parent inspection
    #[arg(long, value_name = "ID")]
    pub inspection: u64,

    /// Id of the step to attach the photo to
    #[arg(long, value_name = "ID")]
    pub step: u64,

    /// Photo file to upload
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Base URL of the inspection service
    #[arg(long, value_name = "URL")]
    pub service_url: Option<String>,
}

/// Inputs for rendering the printable report.
#[derive(Parser, Debug)]
#[command(about = "Render the report of a completed inspection")]
pub struct ReportArgs {
    /// Id of the inspection to report on
    #[arg(long, value_name = "ID")]
    pub inspection: u64,

    /// Output path; the report is printed to stdout when omitted
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Rendering target
    #[arg(long, value_enum, default_value = "html")]
    pub format: ReportFormat,

    /// Base URL of the inspection service
    #[arg(long, value_name = "URL")]
    pub service_url: Option<String>,
}

/// Available report rendering targets.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ReportFormat {
    Html,
    Text,
}

/// Inputs for validating credentials against the service.
#[derive(Parser, Debug)]
#[command(about = "Validate credentials and print the identity")]
pub struct LoginArgs {
    /// Username to authenticate as; the password is read from stdin
    #[arg(long, value_name = "NAME")]
    pub username: String,

    /// Base URL of the inspection service
    #[arg(long, value_name = "URL")]
    pub service_url: Option<String>,
}
