use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use taab::codec::FileFormat;
use taab::editor::FormUpdate;
use taab::model::{Category, SchemaVariant};

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "taab", bin_name = "taab", version = get_version())]
#[command(about = "Log scanned cards and export them as CSV or JSON", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Column layout to use for this run (overrides config)
    #[arg(short, long, global = true, value_parser = parse_schema)]
    pub schema: Option<SchemaVariant>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl From<ExportFormat> for FileFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Csv => FileFormat::Csv,
            ExportFormat::Json => FileFormat::Json,
        }
    }
}

/// Form values shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct FormArgs {
    /// General, "General Branded", Student or "Student ID"
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub institution: Option<String>,

    #[arg(long)]
    pub student_id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    /// Attach an image file
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,
}

impl FormArgs {
    pub fn to_update(&self) -> FormUpdate {
        FormUpdate {
            category: self.category,
            company: self.company.clone(),
            institution: self.institution.clone(),
            student_id: self.student_id.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log a new card
    #[command(alias = "a", display_order = 1)]
    Add {
        /// Card ID typed by hand (at least 4 characters)
        #[arg(long, conflicts_with = "scan")]
        card: Option<String>,

        /// Read the card ID from a reader that types into stdin
        #[arg(long)]
        scan: bool,

        #[command(flatten)]
        form: FormArgs,
    },

    /// List entries
    #[command(alias = "ls", display_order = 2)]
    List,

    /// Search entries (case-insensitive, any field)
    #[command(display_order = 3)]
    Search {
        /// Search words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Change an entry
    #[command(alias = "e", display_order = 10)]
    Edit {
        /// Index of the entry (as shown by list)
        index: String,

        #[command(flatten)]
        form: FormArgs,

        /// Remove the attached image
        #[arg(long, conflicts_with = "image")]
        clear_image: bool,
    },

    /// Delete one or more entries
    #[command(alias = "rm", display_order = 11)]
    Delete {
        /// Indexes of the entries (e.g. 1 3 5-7)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Append entries from a CSV or JSON file
    #[command(display_order = 20)]
    Import {
        path: PathBuf,

        /// Split CSV on bare commas, ignoring quotes
        #[arg(long)]
        legacy: bool,
    },

    /// Write all entries to a timestamped file
    #[command(display_order = 21)]
    Export {
        #[arg(long, short, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Include attached images
        #[arg(long)]
        include_images: bool,

        /// Directory to write into (defaults to config export_dir, then cwd)
        #[arg(long, short, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },

    /// Delete every entry and the saved data
    #[command(display_order = 22)]
    Clear {
        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show which form fields apply to each category
    #[command(display_order = 30)]
    Fields {
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
    },

    /// Get or set configuration
    #[command(display_order = 31)]
    Config {
        /// Configuration key (schema, include_images, storage_key, export_dir)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse()
}

fn parse_schema(s: &str) -> Result<SchemaVariant, String> {
    s.parse()
}
