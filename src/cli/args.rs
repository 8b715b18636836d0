use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::config::{ColorSetting, ExerciseDefaults};
use crate::error::BreatheError;
use crate::exercise::{find_pattern, parse_seconds, ExerciseConfig, PhaseDurations};

#[derive(Parser)]
#[command(name = "breathe")]
#[command(about = "Guided breathing exercises in the terminal")]
#[command(long_about = "breathe - guided breathing in the terminal

Runs a repeating inhale / hold / exhale / hold cycle for a set time,
with an animated circle and optional audio cues.

QUICK START:
  breathe start                     Five minutes of box breathing
  breathe start -p 4-7-8 -t 10m     Ten minutes of 4-7-8
  breathe start --inhale 5 --exhale 7 --hold-inhale 0 --hold-exhale 0
  breathe plan -t 2m                Preview the phase timeline

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.breathe/config.yaml
    #[arg(long, global = true, env = "BREATHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// When to use colors
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorSetting>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a guided breathing exercise
    ///
    /// Opens a full-screen view with a breathing circle, the phase and
    /// time left. Keys: space/p pause, r restart, q/Esc exit.
    ///
    /// # Examples
    ///
    ///   breathe start
    ///   breathe start --pattern relax --total 10m
    ///   breathe start --speed 1.5 --no-audio
    #[command(alias = "s")]
    Start(StartArgs),

    /// Preview the phase timeline of an exercise without running it
    ///
    /// # Examples
    ///
    ///   breathe plan --total 1m
    ///   breathe plan --pattern 4-7-8 --output json
    Plan(ExerciseArgs),

    /// List built-in breathing patterns
    Patterns,

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   breathe completions zsh > ~/.zsh/completions/_breathe
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Settings describing one exercise. Unset flags fall back to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ExerciseArgs {
    /// Total time (e.g. 5m, 90s, 1h; bare numbers are minutes)
    #[arg(short, long)]
    pub total: Option<String>,

    /// Built-in pattern to use (see `breathe patterns`)
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Inhale seconds
    #[arg(long)]
    pub inhale: Option<u32>,

    /// Hold-after-inhale seconds
    #[arg(long)]
    pub hold_inhale: Option<u32>,

    /// Exhale seconds
    #[arg(long)]
    pub exhale: Option<u32>,

    /// Hold-after-exhale seconds
    #[arg(long)]
    pub hold_exhale: Option<u32>,

    /// Speed multiplier; 2 halves every phase
    #[arg(long)]
    pub speed: Option<f64>,
}

impl ExerciseArgs {
    /// Combine flags with config defaults into a validated configuration.
    ///
    /// A pattern on the command line replaces the configured durations;
    /// individual phase flags then override single phases.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::InvalidConfig` for an unparsable total, an
    /// unknown pattern or out-of-range values.
    pub fn resolve(&self, defaults: &ExerciseDefaults) -> Result<ExerciseConfig, BreatheError> {
        let total_seconds = match &self.total {
            Some(total) => parse_seconds(total)
                .ok_or_else(|| BreatheError::InvalidConfig(format!("invalid total time: {total}")))?,
            None => defaults.total_minutes.saturating_mul(60),
        };

        let base = match &self.pattern {
            Some(id) => {
                find_pattern(id)
                    .ok_or_else(|| BreatheError::InvalidConfig(format!("unknown pattern: {id}")))?
                    .durations
            }
            None => defaults.durations()?,
        };

        let durations = PhaseDurations::new(
            self.inhale.unwrap_or(base.inhale),
            self.hold_inhale.unwrap_or(base.hold_inhale),
            self.exhale.unwrap_or(base.exhale),
            self.hold_exhale.unwrap_or(base.hold_exhale),
        );

        ExerciseConfig::new(total_seconds, durations, self.speed.unwrap_or(defaults.speed))
    }
}

#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    #[command(flatten)]
    pub exercise: ExerciseArgs,

    /// Run without audio cues
    #[arg(long)]
    pub no_audio: bool,

    /// Animation frames per second
    #[arg(long)]
    pub fps: Option<u32>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_start_flags() {
        let cli = Cli::parse_from([
            "breathe", "start", "-t", "2m", "--inhale", "6", "--speed", "1.5", "--no-audio",
        ]);
        let Commands::Start(args) = cli.command else {
            panic!("expected start");
        };
        assert!(args.no_audio);
        assert_eq!(args.exercise.total.as_deref(), Some("2m"));
        assert_eq!(args.exercise.inhale, Some(6));
    }

    #[test]
    fn test_resolve_defaults() {
        let config = ExerciseArgs::default()
            .resolve(&ExerciseDefaults::default())
            .unwrap();
        assert_eq!(config.total_seconds, 300);
        assert_eq!(config.durations, PhaseDurations::new(4, 4, 4, 4));
    }

    #[test]
    fn test_resolve_pattern_with_override() {
        let args = ExerciseArgs {
            total: Some("90s".to_string()),
            pattern: Some("4-7-8".to_string()),
            hold_exhale: Some(2),
            speed: Some(2.0),
            ..ExerciseArgs::default()
        };
        let config = args.resolve(&ExerciseDefaults::default()).unwrap();
        assert_eq!(config.total_seconds, 90);
        assert_eq!(config.durations, PhaseDurations::new(4, 7, 8, 2));
        assert!((config.speed - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resolve_rejects_bad_input() {
        let defaults = ExerciseDefaults::default();
        let bad_total = ExerciseArgs {
            total: Some("soon".to_string()),
            ..ExerciseArgs::default()
        };
        assert!(matches!(
            bad_total.resolve(&defaults),
            Err(BreatheError::InvalidConfig(_))
        ));

        let bad_speed = ExerciseArgs {
            speed: Some(0.0),
            ..ExerciseArgs::default()
        };
        assert!(matches!(
            bad_speed.resolve(&defaults),
            Err(BreatheError::InvalidConfig(_))
        ));

        for total in ["10000000000000000", "3000000000000000h", "4294967295s", "25h"] {
            let huge_total = ExerciseArgs {
                total: Some(total.to_string()),
                ..ExerciseArgs::default()
            };
            assert!(
                matches!(huge_total.resolve(&defaults), Err(BreatheError::InvalidConfig(_))),
                "{total} should be rejected"
            );
        }

        let bad_pattern = ExerciseArgs {
            pattern: Some("square".to_string()),
            ..ExerciseArgs::default()
        };
        assert!(matches!(
            bad_pattern.resolve(&defaults),
            Err(BreatheError::InvalidConfig(_))
        ));
    }
}
