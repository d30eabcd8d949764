use std::env;
use std::path::PathBuf;

/// Symbols tracked when `SYMBOLS` is unset: BANKNIFTY and its heaviest components
pub const DEFAULT_SYMBOLS: [&str; 8] = [
    "BANKNIFTY",
    "ICICIBANK",
    "HDFCBANK",
    "SBIN",
    "AXISBANK",
    "KOTAKBANK",
    "PNB",
    "BANKBARODA",
];

/// Which backend persists tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Csv,
    Sheets,
}

impl StoreBackend {
    /// Parse from an env value
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(StoreBackend::Csv),
            "sheets" => Ok(StoreBackend::Sheets),
            _ => Err(format!("Invalid STORE_BACKEND: {}. Must be one of: csv, sheets", s)),
        }
    }
}

/// What to do when a table's first row differs from the expected columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMismatchPolicy {
    /// Clear the whole table and write the expected header
    #[default]
    ClearAndOverwrite,
    /// Fail without touching the table
    Reject,
}

impl HeaderMismatchPolicy {
    /// Parse from an env value
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "clear" => Ok(HeaderMismatchPolicy::ClearAndOverwrite),
            "reject" => Ok(HeaderMismatchPolicy::Reject),
            _ => Err(format!(
                "Invalid HEADER_MISMATCH_POLICY: {}. Must be one of: clear, reject",
                s
            )),
        }
    }
}

/// Remote spreadsheet configuration
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub api_base: String,
    pub spreadsheet_id: String,
    pub access_token: String,
    pub timeout_secs: u64,
}

impl SheetsConfig {
    /// Create sheets config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let spreadsheet_id = env::var("SHEETS_SPREADSHEET_ID")
            .map_err(|_| "SHEETS_SPREADSHEET_ID environment variable is required")?;

        let access_token = env::var("SHEETS_ACCESS_TOKEN")
            .map_err(|_| "SHEETS_ACCESS_TOKEN environment variable is required")?;

        let api_base = env::var("SHEETS_API_BASE")
            .unwrap_or_else(|_| "https://sheets.googleapis.com/v4".to_string());

        let timeout_secs = env::var("SHEETS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        if timeout_secs == 0 {
            return Err("SHEETS_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            api_base,
            spreadsheet_id,
            access_token,
            timeout_secs,
        })
    }
}

/// Table store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub dir: PathBuf,
    pub sheets: Option<SheetsConfig>,
    pub mismatch_policy: HeaderMismatchPolicy,
}

impl StoreConfig {
    /// Create store config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let backend = env::var("STORE_BACKEND")
            .map(|s| StoreBackend::from_str(&s))
            .unwrap_or(Ok(StoreBackend::Csv))?;

        let dir = PathBuf::from(env::var("STORE_DIR").unwrap_or_else(|_| "./data".to_string()));

        let sheets = match backend {
            StoreBackend::Sheets => Some(SheetsConfig::from_env()?),
            StoreBackend::Csv => None,
        };

        let mismatch_policy = env::var("HEADER_MISMATCH_POLICY")
            .map(|s| HeaderMismatchPolicy::from_str(&s))
            .unwrap_or(Ok(HeaderMismatchPolicy::default()))?;

        Ok(Self {
            backend,
            dir,
            sheets,
            mismatch_policy,
        })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Csv,
            dir: PathBuf::from("./data"),
            sheets: None,
            mismatch_policy: HeaderMismatchPolicy::ClearAndOverwrite,
        }
    }
}

/// Thresholds for the secondary delta annotations, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    /// `|oi change %|` above this is tagged as an OI spike
    pub oi_spike_threshold_pct: f64,
    /// Spread in percentage points between opposing price and OI moves
    /// above which a divergence is tagged
    pub price_divergence_threshold_pct: f64,
}

impl ClassifierConfig {
    /// Create classifier config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let oi_spike_threshold_pct = parse_pct_env("OI_SPIKE_THRESHOLD_PCT")?
            .unwrap_or(defaults.oi_spike_threshold_pct);

        let price_divergence_threshold_pct = parse_pct_env("PRICE_DIVERGENCE_THRESHOLD_PCT")?
            .unwrap_or(defaults.price_divergence_threshold_pct);

        Ok(Self {
            oi_spike_threshold_pct,
            price_divergence_threshold_pct,
        })
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            oi_spike_threshold_pct: 20.0,
            price_divergence_threshold_pct: 10.0,
        }
    }
}

fn parse_pct_env(key: &str) -> Result<Option<f64>, String> {
    match env::var(key) {
        Err(_) => Ok(None),
        Ok(raw) => {
            let value = raw
                .parse::<f64>()
                .map_err(|_| format!("{} must be a number, got {}", key, raw))?;
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number", key));
            }
            Ok(Some(value))
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub classifier: ClassifierConfig,
    pub symbols: Vec<String>,
    pub log_level: String,
    pub log_json: bool,
    pub skip_non_trading_days: bool,
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let store = StoreConfig::from_env()?;
        let classifier = ClassifierConfig::from_env()?;

        let symbols = env::var("SYMBOLS")
            .map(|s| parse_symbols(&s))
            .unwrap_or_else(|_| DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect());

        if symbols.is_empty() {
            return Err("SYMBOLS must name at least one symbol".to_string());
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let skip_non_trading_days = env::var("SKIP_NON_TRADING_DAYS")
            .ok()
            .and_then(|s| s.parse::<bool>().ok())
            .unwrap_or(true);

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        // Validate log format
        let log_json = match log_format.to_lowercase().as_str() {
            "text" => false,
            "json" => true,
            other => {
                return Err(format!(
                    "Invalid LOG_FORMAT: {}. Must be one of: text, json",
                    other
                ))
            }
        };

        Ok(Self {
            store,
            classifier,
            symbols,
            log_level: log_level.to_lowercase(),
            log_json,
            skip_non_trading_days,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            classifier: ClassifierConfig::default(),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            log_level: "info".to_string(),
            log_json: false,
            skip_non_trading_days: true,
        }
    }
}

/// Split a comma-separated symbol list, trimming and upper-casing entries
pub fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
