use crate::{
    libs::{config::Settings, messages::Message, view::View},
    msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Print the current settings instead of editing them
    #[arg(short, long)]
    show: bool,
}

pub fn cmd(args: ConfigArgs) -> Result<()> {
    let current = Settings::read()?;

    if args.show {
        msg_print!(Message::ConfigCurrent, true);
        View::settings(&current)?;
        return Ok(());
    }

    let settings = Settings::init(&current)?;
    settings.save()?;
    msg_success!(Message::ConfigSaved);

    Ok(())
}
