use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use poet::ExportType;

use poet_cli::{
    ExportCommand,
    commands::{run_export, run_init, run_inspect, run_languages, run_projects},
    logging::init_logging,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log debug details of the export
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the projects the API token can access.
    Projects,

    /// List the languages of a project with their completion.
    Languages {
        /// Project ID (defaults to `projectID` from poet.json)
        #[arg(short, long)]
        project: Option<u64>,

        /// Only show languages at or above this completion percentage
        #[arg(long)]
        min_percent: Option<f64>,
    },

    /// Select a project and its languages and save them to poet.json.
    Init {
        /// Project ID
        #[arg(short, long)]
        project: u64,

        /// Export languages at or above this completion percentage
        #[arg(long, default_value_t = 0.0)]
        min_percent: f64,
    },

    /// Export translations into `<output>/<locale>.lproj` folders.
    Export {
        /// Project ID (defaults to `projectID` from poet.json)
        #[arg(short, long)]
        project: Option<u64>,

        /// Language code to export; repeat for several (defaults to `languages` from poet.json)
        #[arg(short, long = "lang")]
        languages: Vec<String>,

        /// Output folder (defaults to `outputFolder` from poet.json, or ./POEditor)
        #[arg(short, long)]
        output: Option<String>,

        /// Read `<lang>.json` exports from this folder instead of calling POEditor
        #[arg(long)]
        from_dir: Option<String>,

        /// Write the term itself for untranslated terms
        #[arg(long)]
        fallback_to_term: bool,

        /// Base name for contexts without file extension (they are skipped otherwise)
        #[arg(long)]
        default_name: Option<String>,

        /// Export languages in parallel
        #[arg(long)]
        parallel: bool,

        /// Download this file type as-is (e.g. po, xliff, apple_strings) into `<output>/<locale>.<type>`
        #[arg(long)]
        format: Option<ExportType>,
    },

    /// Print the entries of a .strings file.
    Inspect {
        /// The .strings file to read
        file: String,
    },

    /// Generate shell completions.
    Completions {
        /// The shell to generate completions for
        shell: Shell,
    },
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot determine working directory: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args.commands, dir) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(commands: Commands, dir: PathBuf) -> Result<(), String> {
    match commands {
        Commands::Projects => run_projects(&dir),
        Commands::Languages {
            project,
            min_percent,
        } => run_languages(&dir, project, min_percent),
        Commands::Init {
            project,
            min_percent,
        } => run_init(&dir, project, min_percent),
        Commands::Export {
            project,
            languages,
            output,
            from_dir,
            fallback_to_term,
            default_name,
            parallel,
            format,
        } => run_export(
            &dir,
            ExportCommand {
                project,
                languages,
                output,
                from_dir,
                fallback_to_term,
                default_name,
                parallel,
                format,
            },
        ),
        Commands::Inspect { file } => run_inspect(&dir, &file),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Args::command(), "poet", &mut std::io::stdout());
            Ok(())
        }
    }
}
