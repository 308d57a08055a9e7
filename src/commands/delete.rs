use crate::{
    db::sessions::Sessions,
    libs::{
        messages::Message,
        session::{format_timestamp, parse_timestamp},
    },
    msg_bail_anyhow, msg_error, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Completion time of the session, as shown by `log`
    timestamp: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub fn cmd(args: DeleteArgs) -> Result<()> {
    let Some(timestamp) = parse_timestamp(&args.timestamp) else {
        msg_bail_anyhow!(Message::InvalidTimestamp(args.timestamp));
    };
    let label = format_timestamp(timestamp);
    let mut sessions = Sessions::new()?;

    if sessions.get(timestamp)?.is_none() {
        msg_error!(Message::RecordNotFound(label));
        return Ok(());
    }

    let confirmed = args.yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteRecord(label.clone()).to_string())
            .default(false)
            .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    if sessions.delete(timestamp)? {
        msg_success!(Message::RecordDeleted(label));
    } else {
        msg_error!(Message::RecordNotFound(label));
    }

    Ok(())
}
