use std::path::PathBuf;

use colored::Colorize;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::reporter::DB_FILE;
use crate::settings::{save_settings, shellexpand_path, Settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let settings = match data_dir {
        Some(dir) => Settings {
            data_dir: shellexpand_path(&dir),
        },
        None => Settings::default(),
    };

    let dir = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&dir)?;

    let conn = get_connection(&dir.join(DB_FILE))?;
    init_db(&conn)?;
    save_settings(&settings)?;

    println!("{} {}", "Initialized data directory:".green(), dir.display());
    println!("Import a statement with `extrato import <file>`.");
    Ok(())
}
