use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use git_stamp::cli::{self, OutputFormat, StampWorkflowArgs};
use git_stamp::{telemetry, ui};

#[derive(clap::Parser)]
#[command(
    name = "git-stamp",
    version,
    about = "Calculate a semantic version from git history"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Calculate the version of this branch instead of HEAD")]
    branch: Option<String>,

    #[arg(short, long, help = "Path to the repository (default: current directory)")]
    path: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json, help = "Output format")]
    output: OutputFormat,

    #[arg(long, help = "Print only the value of this variable")]
    show_variable: Option<String>,

    #[arg(short, long, help = "Show how the version was reached")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_logging(args.verbose);

    let workflow_args = StampWorkflowArgs {
        config_path: args.config,
        branch: args.branch,
        repository_path: args.path,
    };

    if args.verbose {
        let target = workflow_args.branch.as_deref().unwrap_or("HEAD");
        ui::display_status(&format!("Calculating version for {}", target));
    }

    let result = match cli::run_stamp_workflow(&workflow_args) {
        Ok(result) => result,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    if args.verbose {
        let base = &result.next_version.base;
        ui::display_base_version(&base.base_version, &base.configuration.branch.name);
        ui::display_excluded(&base.excluded);
        ui::display_success(&format!("Version {}", result.variables.full_sem_ver));
    }

    let rendered = cli::render_output(&result.variables, args.output, args.show_variable.as_deref())?;
    println!("{}", rendered);
    Ok(())
}
