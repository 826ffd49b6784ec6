use anyhow::Result;
use clap::{Parser, Subcommand};
use cvs::areas::repository::Repository;
use cvs::artifacts::branch::revision::Revision;
use cvs::artifacts::core::PagerWriter;
use is_terminal::IsTerminal;
use minus::Pager;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cvs",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small file-based version control system",
    long_about = "This is a single-user version control system, written in Rust. \
    It stores line-level deltas per commit and moves the working directory \
    forward and backward through history, across branches.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short = 'C',
        long,
        global = true,
        help = "The path to the repository (defaults to the current directory)"
    )]
    path: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in an empty directory."
    )]
    Init,
    #[command(
        name = "add",
        about = "Stage changes of the working tree",
        long_about = "This command stages added, deleted and changed files. \
        When paths are given, only additions and changes under them are staged."
    )]
    Add {
        #[arg(index = 1, help = "Paths to stage")]
        files: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit from the staged changes",
        long_about = "This command creates a new commit on top of HEAD from everything staged with add."
    )]
    Commit {
        #[arg(short, long, help = "A unique tag for the commit")]
        tag: Option<String>,
        #[arg(short, long, help = "A comment stored in the event log")]
        comment: Option<String>,
    },
    #[command(
        name = "reset",
        about = "Move HEAD back to an ancestor, dropping what followed",
        long_about = "This command moves HEAD back to a tagged ancestor or a number of steps back \
        and cuts the current branch there."
    )]
    Reset {
        #[arg(short, long, help = "The tag of the commit to reset to")]
        tag: Option<String>,
        #[arg(short = 'n', long, help = "How many commits to step back")]
        steps: Option<usize>,
    },
    #[command(
        name = "switch",
        about = "Move HEAD to another commit, keeping history",
        long_about = "This command moves HEAD to a tagged commit on any branch, or a number of steps \
        backward (-N) or forward (+N) along the current branch."
    )]
    Switch {
        #[arg(short, long, help = "The tag of the commit to switch to")]
        tag: Option<String>,
        #[arg(
            index = 1,
            allow_hyphen_values = true,
            help = "Steps to move: -N goes back, +N or N goes forward"
        )]
        steps: Option<String>,
    },
    #[command(
        name = "branch",
        about = "List branches or create a new one at HEAD",
        long_about = "Without a name this command lists branches and marks the current one. \
        With a name it forks a new branch from HEAD."
    )]
    Branch {
        #[arg(index = 1, help = "The name of the branch to create")]
        name: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Move HEAD to the tip of a branch",
        long_about = "This command moves HEAD to the recorded tip of a branch."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch to check out")]
        branch: String,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status,
    #[command(name = "log", about = "Show the event log")]
    Log,
    #[command(name = "clearlog", about = "Clear the event log")]
    ClearLog,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        eprintln!("{:#}", error);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let path = match cli.path {
        Some(path) => path,
        None => std::env::current_dir()?.to_string_lossy().to_string(),
    };

    let use_pager = matches!(cli.command, Commands::Log)
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_PAGER").is_none();
    let pager = Pager::new();
    let writer: Box<dyn std::io::Write> = match use_pager {
        true => Box::new(PagerWriter::new(pager.clone())),
        false => Box::new(std::io::stdout()),
    };

    let repository = Repository::new(&path, writer)?;

    match cli.command {
        Commands::Init => repository.init()?,
        Commands::Add { files } => repository.add(&files)?,
        Commands::Commit { tag, comment } => {
            repository.commit(tag.as_deref(), comment.as_deref())?
        }
        Commands::Reset { tag, steps } => {
            repository.reset(&Revision::from_args(tag, steps, None)?)?
        }
        Commands::Switch { tag, steps } => {
            let revision = match (tag, steps) {
                (Some(tag), _) => Revision::Tag(tag),
                (None, Some(steps)) => Revision::parse_steps(&steps)?,
                (None, None) => Revision::from_args(None, None, None)?,
            };
            repository.switch(&revision)?
        }
        Commands::Branch { name } => repository.branch(name.as_deref())?,
        Commands::Checkout { branch } => repository.checkout(&branch)?,
        Commands::Status => repository.status()?,
        Commands::Log => repository.log()?,
        Commands::ClearLog => repository.clear_log()?,
    }

    if use_pager {
        minus::page_all(pager)?;
    }

    Ok(())
}
