use crate::{
    db::sessions::Sessions,
    libs::{
        messages::Message,
        session::{format_timestamp, parse_timestamp},
    },
    msg_bail_anyhow, msg_error, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Completion time of the session, as shown by `log`
    timestamp: String,

    /// New task label; prompts when omitted. An empty label clears the task
    #[arg(short, long)]
    task: Option<String>,
}

pub fn cmd(args: EditArgs) -> Result<()> {
    let Some(timestamp) = parse_timestamp(&args.timestamp) else {
        msg_bail_anyhow!(Message::InvalidTimestamp(args.timestamp));
    };
    let mut sessions = Sessions::new()?;
    let Some(record) = sessions.get(timestamp)? else {
        msg_error!(Message::RecordNotFound(format_timestamp(timestamp)));
        return Ok(());
    };

    let task = match args.task {
        Some(task) => task,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptTask.to_string())
            .with_initial_text(record.task.unwrap_or_default())
            .allow_empty(true)
            .interact_text()?,
    };

    if sessions.update_task(timestamp, Some(task.as_str()))? {
        msg_success!(Message::RecordUpdated(format_timestamp(timestamp)));
    } else {
        msg_error!(Message::RecordNotFound(format_timestamp(timestamp)));
    }

    Ok(())
}
