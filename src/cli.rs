//! The command line interface for the calculator.
use crate::calculator::calculate;
use crate::input::load_scenario;
use crate::log;
use crate::output::{
    create_output_directory, format_report, format_sweep, format_vehicles, get_output_dir,
    write_results, write_sweep,
};
use crate::scenario::Scenario;
use crate::settings::Settings;
use crate::sweep::{SweepParameter, sweep};
use crate::vehicle::builtin_vehicle_profiles;
use ::log::{info, warn};
use anyhow::{Context, Result, bail};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the calculator.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for commands which write results to disk
#[derive(Args)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Calculate the carbon ROI of a scenario.
    Run {
        /// Path to the scenario file.
        scenario_file: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Validate a scenario file without calculating it.
    Validate {
        /// Path to the scenario file.
        scenario_file: PathBuf,
    },
    /// Recalculate a saturation scenario over a range of values for one parameter.
    Sweep {
        /// Path to the scenario file.
        scenario_file: PathBuf,
        /// The parameter to vary.
        parameter: SweepParameter,
        /// Comma-separated values for the parameter (defaults to a preset list).
        #[arg(long, value_delimiter = ',')]
        values: Option<Vec<f64>>,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// List the available vehicle types.
    Vehicles,
    /// Manage example scenarios.
    Example {
        /// The available subcommands for managing example scenarios.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run {
                scenario_file,
                opts,
            } => handle_run_command(&scenario_file, &opts, None),
            Self::Validate { scenario_file } => handle_validate_command(&scenario_file, None),
            Self::Sweep {
                scenario_file,
                parameter,
                values,
                opts,
            } => handle_sweep_command(&scenario_file, parameter, values.as_deref(), &opts, None),
            Self::Vehicles => {
                handle_vehicles_command();
                Ok(())
            }
            Self::Example { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ carbon-roi --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help in markdown format
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Initialise the program logger, unless this has already been done
fn init_logger(settings: &Settings, log_file_path: Option<&Path>) -> Result<()> {
    if log::is_logger_initialised() {
        return Ok(());
    }

    log::init(&settings.log_level, log_file_path).context("Failed to initialise logging.")
}

/// Create the output folder for a scenario and start logging to it.
///
/// # Returns
///
/// The path to the output folder
fn prepare_output_dir(
    scenario_path: &Path,
    opts: &RunOpts,
    settings: &Settings,
) -> Result<PathBuf> {
    let output_path = match &opts.output_dir {
        Some(path) => path.clone(),
        None => get_output_dir(scenario_path)?,
    };

    // Overwriting can be enabled in settings or on the command line
    let allow_overwrite = opts.overwrite || settings.overwrite;
    let overwrite = create_output_directory(&output_path, allow_overwrite).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_path.display()
        )
    })?;

    init_logger(settings, Some(&output_path))?;
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    Ok(output_path)
}

/// Handle the `run` command.
pub fn handle_run_command(
    scenario_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let output_path = prepare_output_dir(scenario_path, opts, &settings)?;

    let scenario = load_scenario(scenario_path).context("Failed to load scenario.")?;
    info!("Loaded scenario from {}", scenario_path.display());

    let result = calculate(&scenario, &builtin_vehicle_profiles())
        .context("Failed to calculate scenario.")?;
    write_results(&output_path, &result)?;
    println!("{}", format_report(&result, settings.decimal_places));
    info!("Calculation complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(scenario_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // We won't save log files when running the validate command
    init_logger(&settings, None)?;

    // Some checks (e.g. the vehicle type) only happen during calculation, so do a dry run
    let scenario = load_scenario(scenario_path).context("Failed to validate scenario.")?;
    calculate(&scenario, &builtin_vehicle_profiles()).context("Failed to validate scenario.")?;
    info!("Scenario validation successful!");

    Ok(())
}

/// Handle the `sweep` command.
///
/// If `values` is not provided, the preset options for `parameter` are used.
pub fn handle_sweep_command(
    scenario_path: &Path,
    parameter: SweepParameter,
    values: Option<&[f64]>,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let Scenario::Saturation(scenario) =
        load_scenario(scenario_path).context("Failed to load scenario.")?
    else {
        bail!("Parameter sweeps are only supported for the saturation formula set");
    };

    let output_path = prepare_output_dir(scenario_path, opts, &settings)?;
    let values = values.unwrap_or_else(|| parameter.options());
    let points = sweep(&scenario, parameter, values, &builtin_vehicle_profiles())
        .context("Failed to calculate sweep.")?;
    write_sweep(&output_path, parameter, &points)?;
    print!("{}", format_sweep(parameter, &points, settings.decimal_places));
    info!("Sweep complete!");

    Ok(())
}

/// Handle the `vehicles` command.
pub fn handle_vehicles_command() {
    print!("{}", format_vehicles(&builtin_vehicle_profiles()));
}
