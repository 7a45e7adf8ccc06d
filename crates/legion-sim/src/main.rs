//! legion-sim - run motion scripts against the Legion motion core without
//! hardware.

#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use legion_engine::EngineError;
use legion_geometry::{JointId, LegId, RobotConfig, Site};
use legion_kinematics::{Kinematics, KinematicsError};
use legion_sim::report::{print_error_human, print_error_json, print_json};
use legion_sim::{RunOptions, SimError, parse_script, realtime_engine, run_script, simulated_engine};
use legion_tracing::TracingError;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[command(name = "legion-sim")]
#[command(about = "Drive the quadruped motion core headless and report what it did")]
#[command(version)]
#[command(long_about = "
legion-sim runs the same controller the robot runs, with the twelve joint
outputs captured in memory instead of sent to servos.

Script tokens take the form kind[:steps][@speed][=amount], for example
forward:3, turn-left:2@1.5 or head-up=10.
Use --json for machine-readable output.
")]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Robot configuration file (.yaml, .yml or .json)
    #[arg(short, long, global = true, env = "LEGION_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a command script and report the final pose
    Run {
        /// Commands to run in order
        #[arg(required = true)]
        script: Vec<String>,

        /// Pace ticks with the wall clock instead of a virtual clock
        #[arg(long)]
        realtime: bool,

        /// Longest any one command may run, in ticks
        #[arg(long, default_value_t = 20_000)]
        max_ticks: u64,

        /// Ticks to keep running after the script ends
        #[arg(long, default_value_t = 0)]
        idle: u64,
    },

    /// Solve joint angles for one foot site
    #[command(allow_negative_numbers = true)]
    Solve {
        /// Leg to solve for
        #[arg(long, value_enum)]
        leg: LegArg,

        /// Site x in millimetres
        x: f32,

        /// Site y in millimetres
        y: f32,

        /// Site z in millimetres
        z: f32,
    },

    /// Print the effective configuration
    Config {
        /// Only validate; print nothing on success
        #[arg(long)]
        check: bool,

        /// Output format when not using --json
        #[arg(long, value_enum, default_value_t = ConfigFormat::Yaml)]
        format: ConfigFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LegArg {
    /// Front left
    Fl,
    /// Front right
    Fr,
    /// Rear left
    Rl,
    /// Rear right
    Rr,
}

impl From<LegArg> for LegId {
    fn from(leg: LegArg) -> Self {
        match leg {
            LegArg::Fl => LegId::FrontLeft,
            LegArg::Fr => LegId::FrontRight,
            LegArg::Rl => LegId::RearLeft,
            LegArg::Rr => LegId::RearRight,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ConfigFormat {
    Yaml,
    Json,
}

#[derive(Debug, Serialize)]
struct SolveReport {
    leg: LegId,
    requested: Site,
    solved: Site,
    workspace_clamped: bool,
    requested_distance: f32,
    clamped_distance: f32,
    angles: [f32; 3],
    unclamped_angles: [f32; 3],
    clamped_joints: Vec<JointId>,
}

/// Exit code for a logging setup failure the run cannot continue past.
fn logging_exit_code(error: &TracingError) -> Option<u8> {
    (!error.is_recoverable()).then_some(2)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = legion_tracing::init_logging(cli.verbose) {
        match logging_exit_code(&e) {
            Some(code) => {
                eprintln!("error: {e}");
                return ExitCode::from(code);
            }
            None => eprintln!("warning: logging disabled: {e}"),
        }
    }

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code(&e);
            if cli.json {
                print_error_json(&e, code);
            } else {
                print_error_human(&e);
            }
            ExitCode::from(code)
        }
    }
}

/// 3 for configuration problems, 4 for bad input, 1 for anything else.
fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(e) = error.downcast_ref::<SimError>() {
        return e.exit_code();
    }
    if error.downcast_ref::<EngineError>().is_some() {
        return 3;
    }
    if error.downcast_ref::<KinematicsError>().is_some() {
        return 4;
    }
    1
}

fn execute_command(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;
    match &cli.command {
        Commands::Run {
            script,
            realtime,
            max_ticks,
            idle,
        } => {
            let options = RunOptions {
                max_ticks_per_command: *max_ticks,
                idle_ticks: *idle,
            };
            run(config, script, *realtime, &options, cli.json)
        }
        Commands::Solve { leg, x, y, z } => solve(&config, (*leg).into(), Site::new(*x, *y, *z), cli.json),
        Commands::Config { check, format } => show_config(&config, *check, *format, cli.json),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RobotConfig, SimError> {
    match path {
        Some(path) => Ok(RobotConfig::load(path)?),
        None => {
            debug!("no configuration file given, using defaults");
            let config = RobotConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

fn run(config: RobotConfig, script: &[String], realtime: bool, options: &RunOptions, json: bool) -> Result<()> {
    let commands = parse_script(script)?;
    let report = if realtime {
        let mut engine = realtime_engine(config)?;
        run_script(&mut engine, &commands, options)
    } else {
        let mut engine = simulated_engine(config)?;
        run_script(&mut engine, &commands, options)
    };

    if report.commands.iter().any(|c| c.timed_out) {
        warn!("at least one command hit the tick limit");
    }
    if json {
        print_json(&report)?;
    } else {
        println!("{report}");
    }
    Ok(())
}

fn solve(config: &RobotConfig, leg: LegId, site: Site, json: bool) -> Result<()> {
    let kinematics = Kinematics::new(config.geometry.clone());
    let solution = kinematics.solve(site, leg)?;
    let report = SolveReport {
        leg,
        requested: site,
        solved: kinematics.to_site(solution.angles, leg),
        workspace_clamped: solution.workspace.clamped,
        requested_distance: solution.workspace.requested_distance,
        clamped_distance: solution.workspace.clamped_distance,
        angles: [solution.angles.hip, solution.angles.thigh, solution.angles.knee],
        unclamped_angles: [solution.raw.hip, solution.raw.thigh, solution.raw.knee],
        clamped_joints: solution.clamped_joints().collect(),
    };

    if json {
        print_json(&report)?;
        return Ok(());
    }
    let [hip, thigh, knee] = report.angles;
    println!("{}: hip {hip:.2}, thigh {thigh:.2}, knee {knee:.2}", leg.as_str());
    if report.workspace_clamped {
        println!(
            "  site pulled in from {:.2} mm to {:.2} mm",
            report.requested_distance, report.clamped_distance
        );
    }
    for joint in &report.clamped_joints {
        println!(
            "  {} clamped from {:.2} deg",
            joint.as_str(),
            solution.raw.get(*joint)
        );
    }
    let s = report.solved;
    println!("  reaches ({:.2}, {:.2}, {:.2})", s.x, s.y, s.z);
    Ok(())
}

fn show_config(config: &RobotConfig, check: bool, format: ConfigFormat, json: bool) -> Result<()> {
    if check {
        if json {
            print_json(&serde_json::json!({ "valid": true }))?;
        }
        return Ok(());
    }
    if json {
        print_json(config)?;
        return Ok(());
    }
    match format {
        ConfigFormat::Yaml => print!("{}", serde_yaml::to_string(config)?),
        ConfigFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_parse_run_with_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["legion-sim", "run", "forward:2", "sit"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Run {
                script,
                realtime,
                max_ticks,
                idle,
            } => {
                assert_eq!(script, vec!["forward:2".to_string(), "sit".to_string()]);
                assert!(!realtime);
                assert_eq!((max_ticks, idle), (20_000, 0));
            }
            other => return Err(format!("unexpected command {other:?}").into()),
        }
        Ok(())
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["legion-sim", "run", "wave", "--json", "-vv", "--idle", "600"])?;
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Run { idle: 600, .. }));
        Ok(())
    }

    #[test]
    fn test_parse_solve_accepts_negative_coordinates() -> TestResult {
        let cli = Cli::try_parse_from(["legion-sim", "solve", "--leg", "rr", "62", "62", "-50"])?;
        match cli.command {
            Commands::Solve { leg, z, .. } => {
                assert_eq!(LegId::from(leg), LegId::RearRight);
                assert!((z + 50.0).abs() < 1e-6);
            }
            other => return Err(format!("unexpected command {other:?}").into()),
        }
        Ok(())
    }

    #[test]
    fn test_run_requires_a_script() {
        assert!(Cli::try_parse_from(["legion-sim", "run"]).is_err());
    }

    #[test]
    fn test_exit_codes_follow_error_kind() {
        let script = anyhow::Error::from(SimError::script("x:y", "bad"));
        assert_eq!(exit_code(&script), 4);

        let config = anyhow::Error::from(SimError::Config(legion_errors::ConfigError::UnsupportedFormat(
            "toml".to_string(),
        )));
        assert_eq!(exit_code(&config), 3);

        let kinematics = anyhow::Error::from(KinematicsError::NonFiniteSite { leg: LegId::FrontLeft });
        assert_eq!(exit_code(&kinematics), 4);

        assert_eq!(exit_code(&anyhow::anyhow!("other")), 1);
    }

    #[test]
    fn test_malformed_log_filter_stops_the_run() {
        let filter = TracingError::InvalidFilter("legion=loud".to_string());
        assert_eq!(logging_exit_code(&filter), Some(2));
        assert_eq!(logging_exit_code(&TracingError::init_failed("already set")), None);
    }
}
