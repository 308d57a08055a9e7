use crate::{
    db::{
        db::{Db, DB_FILE_NAME},
        migrations::{get_db_version, needs_migration, MigrationManager},
        sessions::Sessions,
    },
    libs::{data_storage::DataStorage, legacy::LegacyMigration, messages::Message},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    command: MigrateCommand,
}

#[derive(Debug, Subcommand)]
enum MigrateCommand {
    /// Move the old text log into the database and back it up
    Legacy {
        /// Log file to import; defaults to the one in the data directory
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show current database version
    Status,
    /// Show migration history
    History,
}

pub fn cmd(args: MigrateArgs) -> Result<()> {
    let storage = DataStorage::new();

    match args.command {
        MigrateCommand::Legacy { file } => {
            let mut migration = match file {
                Some(path) => LegacyMigration::new(path),
                None => LegacyMigration::in_storage(&storage)?,
            };
            let mut sessions = Sessions::in_storage(&storage)?;

            match migration.run(&mut sessions)? {
                Some(outcome) => msg_success!(Message::LegacyMigrated(
                    outcome.report.imported,
                    outcome.report.duplicates,
                    outcome.report.malformed,
                    outcome.backup.display().to_string()
                )),
                None => msg_info!(Message::LegacyNotFound(migration.source().display().to_string())),
            }
        }
        MigrateCommand::Status => {
            let conn = Db::open_without_migrations(&storage.get_path(DB_FILE_NAME)?)?;
            let version = get_db_version(&conn)?;

            msg_print!(Message::DatabaseVersion(version));
            if needs_migration(&conn)? {
                msg_info!(Message::DatabaseNeedsUpdate);
            } else {
                msg_info!(Message::DatabaseUpToDate);
            }
        }
        MigrateCommand::History => {
            let conn = Db::open_without_migrations(&storage.get_path(DB_FILE_NAME)?)?;
            let history = MigrationManager::new().get_migration_history(&conn)?;

            msg_print!(Message::MigrationHistory, true);
            for (version, name, applied_at) in history {
                println!("  v{}: {} (applied: {})", version, name, applied_at);
            }
        }
    }

    Ok(())
}
