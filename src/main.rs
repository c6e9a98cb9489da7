use std::path::PathBuf;
use std::process;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use git_release::cli::{self, BumpArgs, MergeMode};
use git_release::config;
use git_release::editor::ShellEditor;
use git_release::git::{Git2Repository, Repository};
use git_release::github::GhCli;
use git_release::ui;

#[derive(Parser)]
#[command(
    name = "git-release",
    version,
    about = "Version bumps, changelogs and merges driven by conventional commits"
)]
struct Args {
    #[arg(long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, global = true, default_value = ".", help = "Repository to operate on")]
    repo: PathBuf,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the next version and write the version file and changelog
    Bump {
        #[arg(short, long, help = "Print the next version without writing files")]
        dry_run: bool,
    },
    /// Merge the current branch into the base branch
    Merge(MergeArgs),
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct MergeArgs {
    #[arg(long, help = "Squash-merge the pull request with an edited message")]
    squash: bool,

    #[arg(long, help = "Fast-forward the base branch locally")]
    fast_forward: bool,
}

impl MergeArgs {
    fn mode(&self) -> MergeMode {
        if self.squash {
            MergeMode::Squash
        } else {
            MergeMode::FastForward
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&e.to_string());
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let repo = Git2Repository::open(&args.repo)?;
    let workdir = repo.workdir()?;
    let config = config::load_config(args.config.as_deref(), &workdir)?;

    match args.command {
        Command::Bump { dry_run } => {
            let outcome = cli::run_bump(
                &repo,
                &config,
                &BumpArgs { dry_run },
                Utc::now().date_naive(),
            )?;

            for warning in &outcome.warnings {
                ui::display_boundary_warning(warning);
            }
            ui::display_release_summary(
                &outcome.history,
                &outcome.previous,
                &outcome.version,
                outcome.bump,
            );
            for path in &outcome.written {
                ui::display_success(&format!("Wrote {}", path.display()));
            }

            println!("{}", outcome.version);
        }
        Command::Merge(merge) => {
            let editor = ShellEditor::from_config(config.merge.editor.as_deref());
            let host = GhCli::new(&workdir);

            ui::display_status(&format!("Merging into '{}'...", config.merge.base));
            let outcome = cli::run_merge(&repo, &editor, &host, &config, merge.mode())?;

            ui::display_success(&format!(
                "Merged {} commit(s) from '{}' into '{}'",
                outcome.commits, outcome.branch, outcome.base
            ));
            if outcome.pushed {
                ui::display_success(&format!(
                    "Pushed '{}' to '{}'",
                    outcome.base, config.merge.remote
                ));
            }
        }
    }

    Ok(())
}
