use crate::{db::sessions::Sessions, libs::messages::Message, msg_info, msg_success};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub fn cmd(args: ResetArgs) -> Result<()> {
    let mut sessions = Sessions::new()?;
    let count = sessions.count()?;
    if count == 0 {
        msg_info!(Message::NoRecords);
        return Ok(());
    }

    let confirmed = args.yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmReset(count).to_string())
            .default(false)
            .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    sessions.clear_all()?;
    msg_success!(Message::ResetCompleted);

    Ok(())
}
