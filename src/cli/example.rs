//! Code related to the example scenarios and the CLI commands for interacting with them.
use super::{RunOpts, handle_run_command};
use crate::output::get_output_dir;
use crate::settings::Settings;
use anyhow::{Context, Result, bail, ensure};
use clap::Subcommand;
use include_dir::{Dir, DirEntry, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The directory containing the example scenarios.
static EXAMPLES_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/demos");

/// The name of the scenario file in each example
const SCENARIO_FILE_NAME: &str = "scenario.toml";

/// The available subcommands for managing example scenarios.
#[derive(Subcommand)]
pub enum ExampleSubcommands {
    /// List available examples.
    List,
    /// Provide information about the specified example.
    Info {
        /// The name of the example.
        name: String,
    },
    /// Extract an example scenario to a new directory.
    Extract {
        /// The name of the example to extract.
        name: String,
        /// The destination folder for the example.
        new_path: Option<PathBuf>,
    },
    /// Run an example.
    Run {
        /// The name of the example to run.
        name: String,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
}

impl ExampleSubcommands {
    /// Execute the supplied example subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => handle_example_list_command(),
            Self::Info { name } => handle_example_info_command(&name)?,
            Self::Extract {
                name,
                new_path: dest,
            } => handle_example_extract_command(&name, dest.as_deref())?,
            Self::Run { name, opts } => handle_example_run_command(&name, &opts, None)?,
        }

        Ok(())
    }
}

/// The names of the available examples
pub fn example_names() -> impl Iterator<Item = &'static str> {
    EXAMPLES_DIR
        .dirs()
        .filter_map(|dir| dir.path().file_name()?.to_str())
}

/// Handle the `example list` command.
fn handle_example_list_command() {
    for name in example_names() {
        println!("{name}");
    }
}

/// Handle the `example info` command.
fn handle_example_info_command(name: &str) -> Result<()> {
    let path: PathBuf = [name, "README.txt"].iter().collect();
    let readme = EXAMPLES_DIR
        .get_file(path)
        .context("Example not found.")?
        .contents_utf8()
        .context("README.txt is not UTF-8 encoded")?;

    println!("{readme}");

    Ok(())
}

/// Handle the `example extract` command
fn handle_example_extract_command(name: &str, dest: Option<&Path>) -> Result<()> {
    let dest = dest.unwrap_or(Path::new(name));
    extract_example(name, dest)
}

/// Extract the specified example to a new directory
fn extract_example(name: &str, new_path: &Path) -> Result<()> {
    // Find the subdirectory in EXAMPLES_DIR whose name matches `name`.
    let sub_dir = EXAMPLES_DIR.get_dir(name).context("Example not found.")?;

    ensure!(
        !new_path.exists(),
        "Destination directory {} already exists",
        new_path.display()
    );

    // Copy the contents of the subdirectory to the destination
    fs::create_dir_all(new_path)?;
    for entry in sub_dir.entries() {
        let DirEntry::File(file) = entry else {
            bail!("Subdirectories in examples not supported");
        };
        let file_name = file
            .path()
            .file_name()
            .context("Example file has no name")?;
        fs::write(new_path.join(file_name), file.contents())?;
    }

    Ok(())
}

/// Handle the `example run` command.
///
/// Unless an output directory is given, results are written to a folder named after the example.
pub fn handle_example_run_command(
    name: &str,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let example_path = temp_dir.path().join(name);
    extract_example(name, &example_path)?;

    let output_dir = match &opts.output_dir {
        Some(path) => path.clone(),
        None => get_output_dir(Path::new(name))?,
    };
    let opts = RunOpts {
        output_dir: Some(output_dir),
        overwrite: opts.overwrite,
    };
    handle_run_command(&example_path.join(SCENARIO_FILE_NAME), &opts, settings)
}
