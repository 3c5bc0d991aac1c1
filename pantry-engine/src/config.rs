/// Engine configuration
///
/// # Environment variables
///
/// Every field can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | PANTRY_WORK_DIR | ./pantry-data | Directory holding the database file |
/// | PANTRY_DB_FILE | pantry.redb | Database file name |
/// | PANTRY_ORDER_WINDOW_MINUTES | 30 | Minimum minutes between order submissions per student |
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the database file
    pub work_dir: String,
    /// Database file name inside `work_dir`
    pub db_file: String,
    /// Submission rate limit: a student may place at most one order per
    /// window, regardless of its contents
    pub order_window_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("PANTRY_WORK_DIR").unwrap_or_else(|_| "./pantry-data".into()),
            db_file: std::env::var("PANTRY_DB_FILE").unwrap_or_else(|_| "pantry.redb".into()),
            order_window_minutes: std::env::var("PANTRY_ORDER_WINDOW_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Full path of the database file.
    pub fn db_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join(&self.db_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: "./pantry-data".into(),
            db_file: "pantry.redb".into(),
            order_window_minutes: 30,
        }
    }
}
