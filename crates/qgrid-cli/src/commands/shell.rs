//! Interactive shell over a single training session
//!
//! Each line is one command. The session lives until the shell exits, so
//! repeated `train` calls keep building on the same Q-table.

use anyhow::{bail, Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use qgrid_core::Hyperparameters;
use qgrid_rl::TrainingSession;

use crate::config::{Config, DisplayConfig};
use crate::render;

#[derive(Args, Debug, Default)]
pub struct ShellArgs {
    /// Seed for a reproducible session
    #[arg(long)]
    pub seed: Option<u64>,
}

/// A parsed shell line
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    /// Train for the given number of episodes, or the configured default
    Train(Option<usize>),
    Reset,
    Show,
    Set(Param, f64),
    Params,
    History,
    Json,
    Help,
    Quit,
}

/// Hyperparameter adjustable with `set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Alpha,
    Gamma,
    Epsilon,
    Episodes,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            bail!("empty command");
        };

        let cmd = match head.to_ascii_lowercase().as_str() {
            "train" | "t" => match parts.next() {
                Some(n) => {
                    let n: usize = n.parse().with_context(|| format!("not an episode count: {n}"))?;
                    ShellCommand::Train(Some(n))
                }
                None => ShellCommand::Train(None),
            },
            "reset" | "r" => ShellCommand::Reset,
            "show" | "s" => ShellCommand::Show,
            "set" => {
                let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
                    bail!("usage: set <alpha|gamma|epsilon|episodes> <value>");
                };
                let param = match name {
                    "alpha" | "learning_rate" => Param::Alpha,
                    "gamma" | "discount" => Param::Gamma,
                    "epsilon" => Param::Epsilon,
                    "episodes" => Param::Episodes,
                    other => bail!("unknown parameter: {other}"),
                };
                let value: f64 = value.parse().with_context(|| format!("not a number: {value}"))?;
                ShellCommand::Set(param, value)
            }
            "params" | "p" => ShellCommand::Params,
            "history" | "h" => ShellCommand::History,
            "json" => ShellCommand::Json,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => bail!("unknown command: {other}"),
        };

        if parts.next().is_some() {
            bail!("too many arguments for {head}");
        }
        Ok(cmd)
    }
}

/// Session plus the parameters the next `train` will use
pub struct Shell {
    session: TrainingSession,
    params: Hyperparameters,
    display: DisplayConfig,
}

impl Shell {
    pub fn new(session: TrainingSession, params: Hyperparameters, display: DisplayConfig) -> Self {
        Self {
            session,
            params,
            display,
        }
    }

    pub fn session(&self) -> &TrainingSession {
        &self.session
    }

    pub fn params(&self) -> &Hyperparameters {
        &self.params
    }

    /// Execute one command and return the text to print
    pub fn execute(&mut self, cmd: ShellCommand) -> Result<String> {
        let output = match cmd {
            ShellCommand::Train(episodes) => {
                let episodes = episodes.unwrap_or(self.params.episodes);
                let params = self.params.with_episodes(episodes);
                params.validate()?;
                self.session.train_with(&params);
                format!(
                    "Trained {episodes} episodes (total {})\n",
                    self.session.episodes_run()
                )
            }
            ShellCommand::Reset => {
                self.session.reset();
                "Agent reset\n".to_string()
            }
            ShellCommand::Show => render::session_report(&self.session, &self.display),
            ShellCommand::Set(param, value) => {
                let mut next = self.params;
                match param {
                    Param::Alpha => next.learning_rate = value,
                    Param::Gamma => next.discount = value,
                    Param::Epsilon => next.epsilon = value,
                    Param::Episodes => {
                        if value.fract() != 0.0 || value < 1.0 {
                            bail!("episodes must be a positive integer");
                        }
                        next.episodes = value as usize;
                    }
                }
                next.validate()?;
                self.params = next;
                self.describe_params()
            }
            ShellCommand::Params => self.describe_params(),
            ShellCommand::History => {
                render::learning_progress(self.session.rewards_history(), self.display.moving_average_window)
            }
            ShellCommand::Json => serde_json::to_string_pretty(&self.session.snapshot())? + "\n",
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => String::new(),
        };
        Ok(output)
    }

    fn describe_params(&self) -> String {
        format!(
            "alpha={} gamma={} epsilon={} episodes={}\n",
            self.params.learning_rate, self.params.discount, self.params.epsilon, self.params.episodes
        )
    }
}

const HELP: &str = "\
Commands:
  train [n]        run n episodes (default: configured episodes)
  reset            forget everything learned
  show             heatmap, policy and learning progress
  set <p> <value>  change alpha, gamma, epsilon or episodes
  params           show current parameters
  history          reward summary
  json             session snapshot as JSON
  quit             leave the shell
";

pub async fn run(args: ShellArgs, mut config: Config) -> Result<()> {
    if args.seed.is_some() {
        config.training.seed = args.seed;
    }
    let params = config.training.params();
    params.validate().context("Invalid training parameters")?;

    let session = super::new_session(&config.training);
    println!("qgrid shell (session {}). Type 'help' for commands.", session.id());
    let mut shell = Shell::new(session, params, config.display);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match ShellCommand::parse(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(cmd) => match shell.execute(cmd) {
                Ok(output) => print!("{output}"),
                Err(e) => println!("error: {e:#}"),
            },
            Err(e) => {
                warn!("Ignoring input {:?}: {}", line, e);
                println!("error: {e}");
            }
        }
    }

    Ok(())
}
