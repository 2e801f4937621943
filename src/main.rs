use anyhow::Result;
use clap::Parser;

use plantcheck::cli::{Command, RootArgs, StepCommand};
use plantcheck::workflow;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Show(args) => workflow::run_show(args),
        Command::Transition(args) => workflow::run_transition(args),
        Command::Step(args) => match args.command {
            StepCommand::Status(args) => workflow::run_step_status(args),
            StepCommand::Comment(args) => workflow::run_step_comment(args),
            StepCommand::Photo(args) => workflow::run_step_photo(args),
        },
        Command::Report(args) => workflow::run_report(args),
        Command::Login(args) => workflow::run_login(args),
    }
}
