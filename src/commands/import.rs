use crate::{
    db::sessions::Sessions,
    libs::{export::import_csv, messages::Message},
    msg_bail_anyhow, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file with `Timestamp,Duration (min),Task,Status` columns
    file: PathBuf,
}

pub fn cmd(args: ImportArgs) -> Result<()> {
    if !args.file.exists() {
        msg_bail_anyhow!(Message::FileNotFound(args.file.display().to_string()));
    }
    let mut sessions = Sessions::new()?;
    let report = import_csv(&mut sessions, &args.file)?;

    msg_success!(Message::ImportCompleted(report.imported, report.duplicates, report.malformed));
    Ok(())
}
