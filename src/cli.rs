use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Futures open-interest tracker: classify OI/price moves and log them to tables.
#[derive(Parser, Debug)]
#[command(name = "oi-tracker", version, about)]
pub struct Cli {
    /// Run even when today is not a trading day
    #[arg(long, global = true)]
    pub force: bool,

    /// Comma-separated symbols, overriding SYMBOLS
    #[arg(long, global = true)]
    pub symbols: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ensure every table has the expected header row
    Init,

    /// Classify start vs end readings per symbol into EOD_Summary
    EodSummary {
        /// Observations CSV (symbol,timestamp,expiry,open_interest,price)
        #[arg(long, short = 'i')]
        input: PathBuf,
    },

    /// Append the latest reading per symbol to OI_DailyLog
    OiLog {
        /// Observations CSV
        #[arg(long, short = 'i')]
        input: PathBuf,
    },

    /// Near vs far contract OI per symbol into Rollover
    Rollover {
        /// Observations CSV
        #[arg(long, short = 'i')]
        input: PathBuf,
    },

    /// Delivery proxy for contracts expiring on a date into Rollover_Analysis
    ExpiryDelivery {
        /// Observations CSV
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expiry: NaiveDate,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expiry_delivery() {
        let cli = Cli::try_parse_from([
            "oi-tracker",
            "expiry-delivery",
            "--input",
            "obs.csv",
            "--expiry",
            "2024-06-27",
        ])
        .unwrap();

        match cli.command {
            Command::ExpiryDelivery { input, expiry } => {
                assert_eq!(input, PathBuf::from("obs.csv"));
                assert_eq!(expiry, NaiveDate::from_ymd_opt(2024, 6, 27).unwrap());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["oi-tracker", "init", "--force", "--symbols", "SBIN,PNB"]).unwrap();
        assert!(cli.force);
        assert_eq!(cli.symbols.as_deref(), Some("SBIN,PNB"));
        assert!(matches!(cli.command, Command::Init));
    }
}
