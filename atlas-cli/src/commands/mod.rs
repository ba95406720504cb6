pub mod add;
pub mod coverage;
pub mod dep;
pub mod graph;
pub mod init;
pub mod insight;
pub mod list;
pub mod map;
pub mod session;
pub mod show;
pub mod status;
pub mod update;
pub mod validate;

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Context;
use atlas_core::config::AtlasConfig;
use atlas_core::error::AtlasError;
use atlas_core::survey::Survey;
use clap::Subcommand;
use tracing::{debug, warn};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the survey document for this repository
    Init(init::InitArgs),
    /// Show coverage, progress and stopping gates
    Status(status::StatusArgs),
    /// Register a new system
    Add(add::AddArgs),
    /// Map key files to a system
    Map(map::MapArgs),
    /// Update a system's description and rescore it
    Update(update::UpdateArgs),
    /// Record an insight about a system
    Insight(insight::InsightArgs),
    /// Record a dependency between two systems
    Dep(dep::DepArgs),
    /// Begin a survey session
    SessionStart,
    /// Close the current session and record what it found
    SessionEnd,
    /// Check the survey for gaps and inconsistencies
    Validate,
    /// Break coverage down by directory
    Coverage(coverage::CoverageArgs),
    /// List systems by completeness
    List,
    /// Print one system as JSON
    Show(show::ShowArgs),
    /// Export the dependency graph as Mermaid
    Graph,
}

pub fn run(cmd: Command, root: &Path) -> anyhow::Result<()> {
    match cmd {
        Command::Init(args) => init::run(args, root),
        Command::Status(args) => status::run(&args, root),
        Command::Add(args) => add::run(&args, root),
        Command::Map(args) => map::run(&args, root),
        Command::Update(args) => update::run(&args, root),
        Command::Insight(args) => insight::run(&args, root),
        Command::Dep(args) => dep::run(&args, root),
        Command::SessionStart => session::start(root),
        Command::SessionEnd => session::end(root),
        Command::Validate => validate::run(root),
        Command::Coverage(args) => coverage::run(&args, root),
        Command::List => list::run(root),
        Command::Show(args) => show::run(&args, root),
        Command::Graph => graph::run(root),
    }
}

/// Load `atlas.toml` for `root`.
pub(crate) fn load_config(root: &Path) -> anyhow::Result<AtlasConfig> {
    AtlasConfig::load(root)
        .map_err(AtlasError::from)
        .with_context(|| format!("Cannot load config in {}", root.display()))
}

/// Open an initialized survey, surfacing a notice when the backup was used.
pub(crate) fn open_survey(root: &Path) -> anyhow::Result<Survey> {
    let config = load_config(root)?;
    let survey = Survey::open(root, &config)
        .with_context(|| format!("Cannot open survey in {}", root.display()))?;
    if survey.restored_from_backup() {
        warn!(root = %root.display(), "Survey opened from backup");
        eprintln!("Warning: state document was corrupted; restored from backup");
    }
    debug!(
        root = %root.display(),
        systems = survey.state().systems.len(),
        "Opened survey"
    );
    Ok(survey)
}

/// Ask a yes/no question on stdin. EOF or anything but `y`/`yes` is no.
pub(crate) fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} (y/N): ");
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read from stdin")?;
    let answer = answer.trim().to_ascii_lowercase();
    debug!(question, answer = %answer, "Prompt answered");
    Ok(answer == "y" || answer == "yes")
}
