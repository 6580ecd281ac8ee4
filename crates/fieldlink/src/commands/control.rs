//! Fire-and-forget operator commands.

use fieldlink_core::{
    AutoWinnerChoice, Command, ControllerConfig, FieldController, FieldSafeMode, ForceMode,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::util;

/// Send one command and wait until it has been written to the socket.
///
/// The controller never acknowledges commands directly; `status` or
/// `watch` shows their effect.
pub async fn handle(
    command: Command,
    config: ControllerConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    command.validate()?;

    let bar = util::spinner(global, "Sending to controller");
    let result = FieldController::oneshot(config, move |c| async move { c.execute(command) }).await;
    util::finish_spinner(bar);
    result?;

    if !global.quiet {
        eprintln!("{}", describe(command));
    }
    Ok(())
}

fn describe(command: Command) -> String {
    match command {
        Command::StartMatch => "Match start sent".into(),
        Command::PauseMatch => "Match pause sent".into(),
        Command::ResumeMatch => "Match resume sent".into(),
        Command::StopMatch => "Match stop sent".into(),
        Command::ResetCount => "Ball count reset sent".into(),
        Command::SetAutoWinner(winner) => {
            let winner = match winner {
                AutoWinnerChoice::Red => "red",
                AutoWinnerChoice::Blue => "blue",
                AutoWinnerChoice::Tie => "tie",
            };
            format!("Auto winner set to {winner}")
        }
        Command::SetHubSide(alliance) => format!("Hub side set to {alliance}"),
        Command::Force(Some(ForceMode::ForceActive)) => "Hubs forced active".into(),
        Command::Force(Some(ForceMode::ForceInactive)) => "Hubs forced inactive".into(),
        Command::Force(None) => "Hub override cleared".into(),
        Command::FieldSafe(Some(FieldSafeMode::Green)) => "Field-safe green sent".into(),
        Command::FieldSafe(Some(FieldSafeMode::Purple)) => "Post-match purple sent".into(),
        Command::FieldSafe(None) => "Field-safe override cleared".into(),
        Command::SetMotor { percent } => format!("Motor set to {:.0}%", percent * 100.0),
        Command::EmergencyStop => "Motor stop sent".into(),
        Command::Ping => "Ping sent".into(),
    }
}
