use crate::{
    db::sessions::Sessions,
    libs::{messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

const DEFAULT_LOG_DAYS: u32 = 7;

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Number of trailing days to list
    #[arg(short, long, default_value_t = DEFAULT_LOG_DAYS)]
    days: u32,
}

pub fn cmd(args: LogArgs) -> Result<()> {
    let sessions = Sessions::new()?;
    let (spans, has_more) = sessions.recent_records(args.days);

    if spans.is_empty() {
        msg_info!(Message::NoRecords);
    } else {
        msg_print!(Message::RecordsHeader(args.days), true);
        View::records(&spans)?;
    }
    if has_more {
        msg_info!(Message::OlderRecordsExist);
    }

    Ok(())
}
