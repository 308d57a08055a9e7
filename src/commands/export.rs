use crate::{
    db::sessions::Sessions,
    libs::{export::Exporter, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output file; defaults to `focus_sessions_<date>.csv` in the current directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    let sessions = Sessions::new()?;
    let exporter = Exporter::new(args.output);
    let rows = exporter.export(&sessions)?;

    msg_success!(Message::ExportCompleted(rows, exporter.output_path().display().to_string()));
    Ok(())
}
