//! Command handlers, one module per command group.

pub mod config_cmd;
pub mod control;
pub mod scores;
pub mod status;
pub mod util;
pub mod watch;

use fieldlink_core::{
    Alliance, AutoWinnerChoice, Command as CoreCommand, ControllerConfig, FieldSafeMode,
    ForceMode,
};

use crate::cli::{
    AllianceArg, Command, FieldSafeArg, ForceArg, GlobalOpts, MatchCommand, WinnerArg,
};
use crate::error::CliError;

/// Route a controller-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    config: ControllerConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(config, global).await,
        Command::Watch(args) => watch::handle(args, config, global).await,
        Command::Scores(args) => scores::handle(args, config, global).await,

        Command::Match(args) => {
            let command = match args.command {
                MatchCommand::Start => CoreCommand::StartMatch,
                MatchCommand::Pause => CoreCommand::PauseMatch,
                MatchCommand::Resume => CoreCommand::ResumeMatch,
                MatchCommand::Stop => CoreCommand::StopMatch,
            };
            control::handle(command, config, global).await
        }
        Command::ResetCount => {
            if !util::confirm("Reset the controller's ball count to zero?", global.yes)? {
                return Ok(());
            }
            control::handle(CoreCommand::ResetCount, config, global).await
        }
        Command::AutoWinner { winner } => {
            let winner = match winner {
                WinnerArg::Red => AutoWinnerChoice::Red,
                WinnerArg::Blue => AutoWinnerChoice::Blue,
                WinnerArg::Tie => AutoWinnerChoice::Tie,
            };
            control::handle(CoreCommand::SetAutoWinner(winner), config, global).await
        }
        Command::HubSide { alliance } => {
            let alliance = match alliance {
                AllianceArg::Red => Alliance::Red,
                AllianceArg::Blue => Alliance::Blue,
            };
            control::handle(CoreCommand::SetHubSide(alliance), config, global).await
        }
        Command::Force { mode } => {
            let mode = match mode {
                ForceArg::Active => Some(ForceMode::ForceActive),
                ForceArg::Inactive => Some(ForceMode::ForceInactive),
                ForceArg::Off => None,
            };
            control::handle(CoreCommand::Force(mode), config, global).await
        }
        Command::FieldSafe { mode } => {
            let mode = match mode {
                FieldSafeArg::Green => Some(FieldSafeMode::Green),
                FieldSafeArg::Purple => Some(FieldSafeMode::Purple),
                FieldSafeArg::Off => None,
            };
            control::handle(CoreCommand::FieldSafe(mode), config, global).await
        }
        Command::Motor { percent } => {
            let command = CoreCommand::SetMotor {
                percent: f64::from(percent) / 100.0,
            };
            control::handle(command, config, global).await
        }
        Command::Estop => control::handle(CoreCommand::EmergencyStop, config, global).await,
        Command::Ping => control::handle(CoreCommand::Ping, config, global).await,

        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before connecting".into(),
        )),
    }
}
