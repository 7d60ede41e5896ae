/// Layer and column name constants shared across the stages.
/// Derived gold column names are fixed; source column names come from the catalog config.

// Layer names (used in CLI, logs and metrics labels)
pub const BRONZE_LAYER: &str = "bronze";
pub const SILVER_LAYER: &str = "silver";
pub const GOLD_LAYER: &str = "gold";

// Derived gold columns
pub const IDENTIFIER_COLUMN: &str = "identifier";
pub const CLASS_COLUMN: &str = "class";
pub const SUBCLASS_COLUMN: &str = "subclass";
pub const LUMINOSITY_CLASS_COLUMN: &str = "luminosity_class";

// Default gold source columns
pub const DEFAULT_DATE_COLUMN: &str = "date";
pub const DEFAULT_IDENTIFIER_SOURCE: &str = "lamost";
pub const DEFAULT_CLASSIFICATION_COLUMN: &str = "full_class";
pub const DEFAULT_KEY_SEPARATOR: &str = "_";

// Default file locations when a catalog config omits `[paths]`
pub const DEFAULT_BRONZE_PATH: &str = "data/bronze/starB.csv";
pub const DEFAULT_SILVER_PATH: &str = "data/silver/starS.csv";
pub const DEFAULT_GOLD_PATH: &str = "data/gold/starG.csv";

pub const DEFAULT_TAP_URL: &str = "https://tapvizier.cds.unistra.fr/TAPVizieR/tap";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

