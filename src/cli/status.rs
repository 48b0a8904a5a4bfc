use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::reporter::DB_FILE;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join(DB_FILE);

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let conn = get_connection(&db_path)?;
        let transactions: i64 =
            conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        let imports: i64 = conn.query_row("SELECT count(*) FROM imports", [], |r| r.get(0))?;
        let failed: i64 =
            conn.query_row("SELECT count(*) FROM failed_imports", [], |r| r.get(0))?;

        println!();
        println!("Transactions:    {transactions}");
        println!("Imports:         {imports}");
        println!("Failed imports:  {failed}");
    } else {
        println!();
        println!("Database not found. Run `extrato init` to set up.");
    }

    Ok(())
}
