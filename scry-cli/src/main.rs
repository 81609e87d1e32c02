use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Parser as ClapParser;
use scry_session::{find_config, split_cells, Session, SessionConfig, SessionError};
use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::timings::Timings;

mod timings;

pub mod error {
    use thiserror::Error;
    #[derive(Error, Debug)]
    pub enum ScryError {
        #[error(transparent)]
        Io(#[from] std::io::Error),
        #[error(transparent)]
        Session(#[from] scry_session::SessionError),
    }
}

#[derive(ClapParser)]
#[command(version = "0.1.0", author = "scry contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapParser)]
enum Commands {
    #[command(about = "Report the names one cell stores and reads unbound, as JSON")]
    Inspect {
        #[arg(help = "Path to the cell source")]
        path: PathBuf,
        #[arg(short = 'm', long, help = "Print the timings table")]
        time: bool,
    },
    #[command(about = "Print the compiled unit graph of one cell to stdout")]
    Units {
        #[arg(help = "Path to the cell source")]
        path: PathBuf,
    },
    #[command(about = "Run a percent-format script cell by cell")]
    Session {
        #[arg(help = "Path to the script; cells are separated by `# %%` lines")]
        path: PathBuf,
        #[arg(short = 'm', long, help = "Print the timings table")]
        time: bool,
    },
    #[command(about = "Run a percent-format script and print only the final variable list")]
    Vars {
        #[arg(help = "Path to the script; cells are separated by `# %%` lines")]
        path: PathBuf,
    },
}

fn main() -> Result<(), error::ScryError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { path, time } => {
            let mut timings = Timings::default();
            timings.start("load cell");
            let source = fs::read_to_string(&path)?;
            timings.end("load cell");

            let mut session = new_session(&path)?;
            timings.start("inspect cell");
            match session.inspect(&source) {
                Ok(report) => println!("{}", report.to_json()),
                Err(err) => report_session_error(err)?,
            }
            timings.end("inspect cell");

            if time {
                println!("{}", timings.render());
            }
        },
        Commands::Units { path } => {
            let source = fs::read_to_string(&path)?;
            let mut session = new_session(&path)?;
            match session.dump_units(&source) {
                Ok(dump) => println!("{dump}"),
                Err(err) => report_session_error(err)?,
            }
        },
        Commands::Session { path, time } => {
            let mut timings = Timings::default();
            timings.start("load script");
            let source = fs::read_to_string(&path)?;
            let cells = split_cells(&source);
            timings.end("load script");

            let mut session = new_session(&path)?;
            for (index, cell) in cells.iter().enumerate() {
                print_bold(&format!("# cell {index}"))?;
                timings.start("run cell");
                match session.run_cell(cell) {
                    Ok(report) => println!("{}", report.to_json()),
                    Err(err) => report_session_error(err)?,
                }
                timings.end("run cell");
            }
            print_bold("# session variables")?;
            println!("{}", session.variables_json());

            if time {
                println!("{}", timings.render());
            }
        },
        Commands::Vars { path } => {
            let source = fs::read_to_string(&path)?;
            let cells = split_cells(&source);
            let mut session = new_session(&path)?;
            for cell in &cells {
                if let Err(err) = session.run_cell(cell) {
                    report_session_error(err)?;
                }
            }
            println!("{}", session.variables_json());
        },
    }
    Ok(())
}

fn new_session(path: &Path) -> Result<Session, SessionError> {
    let mut config = SessionConfig::default();
    if let Some(file_config) = find_config(path.parent().map(Path::to_path_buf))? {
        config = config.with_file_config(file_config);
    }
    Ok(Session::new(config))
}

// a cell that fails to compile is printed and swallowed; anything else
// aborts the command
fn report_session_error(err: SessionError) -> Result<(), SessionError> {
    match err {
        SessionError::Compile { diagnostics } => {
            for diagnostic in diagnostics {
                eprintln!("{diagnostic}");
            }
            Ok(())
        },
        other => Err(other),
    }
}

fn print_bold(message: &str) -> Result<(), std::io::Error> {
    let mut stdout = StandardStream::stdout(ColorChoice::Always);
    stdout.set_color(ColorSpec::new().set_bold(true))?;
    println!("{message}");
    stdout.set_color(ColorSpec::new().set_bold(false))?;
    Ok(())
}
