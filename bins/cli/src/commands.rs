//! Subcommands and their handlers.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use tally_core::ledger::{ExpenseFilter, ExpenseUpdate, FilterWindow, LedgerStore, NewExpense};
use tally_shared::AppConfig;
use tally_shared::AppError;
use tally_shared::types::{CurrencyCode, ExpenseId, PageRequest};

/// Command-line arguments.
#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Personal expense ledger with live currency normalization"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Date and category bounds shared by listing commands.
#[derive(clap::Args, Debug, Default)]
pub struct FilterArgs {
    /// Preset window: this-month, last-7-days or all
    #[arg(short, long, value_parser = parse_window, conflicts_with_all = ["from", "to"])]
    window: Option<FilterWindow>,
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Category, matched case-insensitively
    #[arg(short, long)]
    category: Option<String>,
}

impl FilterArgs {
    fn into_filter(self, today: NaiveDate) -> ExpenseFilter {
        let mut filter = match self.window {
            Some(window) => window.to_filter(today),
            None => ExpenseFilter {
                start_date: self.from,
                end_date: self.to,
                category: None,
            },
        };
        filter.category = self.category;
        filter
    }
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// List currencies available for entry
    Currencies,

    /// Show exchange rates against a base currency
    Rates {
        /// Base currency
        #[arg(default_value = "USD", value_parser = parse_code)]
        base: CurrencyCode,
        /// Historical date (YYYY-MM-DD); latest if omitted
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Convert an amount between currencies
    Convert {
        /// Amount to convert
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
        /// Source currency
        #[arg(value_parser = parse_code)]
        from: CurrencyCode,
        /// Target currency
        #[arg(default_value = "USD", value_parser = parse_code)]
        to: CurrencyCode,
    },

    /// Record a new expense
    Add {
        /// Category name
        category: String,
        /// Amount in the original currency
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
        /// Currency code
        #[arg(value_parser = parse_code)]
        currency: CurrencyCode,
        /// Transaction date (YYYY-MM-DD); today if omitted
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Merchant name
        #[arg(short, long)]
        merchant: Option<String>,
        /// Receipt reference
        #[arg(short, long)]
        receipt: Option<String>,
    },

    /// List expenses, one page at a time
    List {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Items per page; configured page size if omitted
        #[arg(long)]
        per_page: Option<u32>,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Change fields of an existing expense
    Update {
        /// Expense ID
        id: ExpenseId,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New amount
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<Decimal>,
        /// New currency code
        #[arg(long, value_parser = parse_code)]
        currency: Option<CurrencyCode>,
        /// New transaction date
        #[arg(long)]
        date: Option<NaiveDate>,
        /// New merchant
        #[arg(long, conflicts_with = "clear_merchant")]
        merchant: Option<String>,
        /// Remove the merchant
        #[arg(long)]
        clear_merchant: bool,
        /// New receipt reference
        #[arg(long, conflicts_with = "clear_receipt")]
        receipt: Option<String>,
        /// Remove the receipt reference
        #[arg(long)]
        clear_receipt: bool,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: ExpenseId,
    },

    /// Show totals and per-category sums
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

fn parse_window(name: &str) -> Result<FilterWindow, String> {
    FilterWindow::from_name(name)
        .ok_or_else(|| format!("unknown window '{name}' (expected this-month, last-7-days or all)"))
}

fn parse_code(code: &str) -> Result<CurrencyCode, String> {
    let code = code.trim();
    if code.is_empty() {
        return Err("currency code cannot be empty".to_string());
    }
    Ok(CurrencyCode::new(code.to_ascii_uppercase()))
}

/// Maps a set/clear flag pair onto a two-level update.
fn optional_change(value: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear { Some(None) } else { value.map(Some) }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Runs one subcommand against the ledger.
pub async fn execute(
    command: Command,
    ledger: &LedgerStore,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let converter = ledger.converter();

    match command {
        Command::Currencies => {
            let codes = converter.list_supported_currencies().await;
            for code in codes {
                println!("{code}");
            }
        }
        Command::Rates { base, date } => {
            let mut rates: Vec<_> = converter.get_rates(date, &base).await.into_iter().collect();
            rates.sort_by(|a, b| a.0.cmp(&b.0));
            for (code, rate) in rates {
                println!("{code}\t{rate}");
            }
        }
        Command::Convert { amount, from, to } => {
            let converted = converter
                .convert(amount, &from, &to)
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            println!("{converted} {to}");
        }
        Command::Add {
            category,
            amount,
            currency,
            date,
            merchant,
            receipt,
        } => {
            let input = NewExpense {
                category,
                amount,
                currency,
                date: date.unwrap_or(today),
                merchant,
                receipt,
            };
            let expense = ledger.create(input).await.map_err(AppError::from)?;
            print_json(&expense)?;
        }
        Command::List {
            page,
            per_page,
            filter,
        } => {
            let request = PageRequest::new(page, per_page.unwrap_or(config.ledger.page_size));
            let response = ledger
                .list_page(request, &filter.into_filter(today))
                .await
                .map_err(AppError::from)?;
            print_json(&response)?;
        }
        Command::Update {
            id,
            category,
            amount,
            currency,
            date,
            merchant,
            clear_merchant,
            receipt,
            clear_receipt,
        } => {
            let changes = ExpenseUpdate {
                category,
                amount,
                currency,
                date,
                merchant: optional_change(merchant, clear_merchant),
                receipt: optional_change(receipt, clear_receipt),
            };
            let expense = ledger.update(id, changes).await.map_err(AppError::from)?;
            print_json(&expense)?;
        }
        Command::Delete { id } => {
            ledger.delete(id).await.map_err(AppError::from)?;
            println!("Deleted {id}");
        }
        Command::Summary { filter } => {
            let summary = ledger
                .summarize(&filter.into_filter(today))
                .await
                .map_err(AppError::from)?;
            print_json(&summary)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_parses_decimal_and_uppercases_code() {
        let cli = Cli::try_parse_from([
            "tally", "add", "Groceries", "20.50", "eur", "-d", "2024-01-06",
        ])
        .unwrap();
        match cli.command {
            Command::Add {
                amount,
                currency,
                date,
                ..
            } => {
                assert_eq!(amount, Decimal::new(2050, 2));
                assert_eq!(currency.as_str(), "EUR");
                assert_eq!(date, Some(self::date(2024, 1, 6)));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_window_conflicts_with_explicit_range() {
        let result = Cli::try_parse_from([
            "tally", "summary", "--window", "all", "--from", "2024-01-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_args_resolution() {
        let args = FilterArgs {
            window: Some(FilterWindow::ThisMonth),
            category: Some("food".into()),
            ..FilterArgs::default()
        };
        let filter = args.into_filter(date(2024, 3, 20));
        assert_eq!(filter.start_date, Some(date(2024, 3, 1)));
        assert_eq!(filter.end_date, Some(date(2024, 3, 20)));
        assert_eq!(filter.category.as_deref(), Some("food"));

        let open = FilterArgs::default().into_filter(date(2024, 3, 20));
        assert!(open.is_empty());
    }

    #[test]
    fn test_negative_amount_is_accepted() {
        let cli = Cli::try_parse_from(["tally", "add", "Refund", "-12.5", "USD"]).unwrap();
        assert!(matches!(cli.command, Command::Add { amount, .. } if amount == Decimal::new(-125, 1)));
    }

    #[test]
    fn test_update_clear_flag_clears_merchant() {
        let cli = Cli::try_parse_from([
            "tally",
            "update",
            "0190b3a4-7c1e-7cc0-9a52-3f4e5d6c7b8a",
            "--clear-merchant",
        ])
        .unwrap();
        match cli.command {
            Command::Update {
                merchant,
                clear_merchant,
                ..
            } => assert_eq!(optional_change(merchant, clear_merchant), Some(None)),
            _ => panic!("expected update"),
        }
        assert_eq!(optional_change(Some("Cafe".into()), false), Some(Some("Cafe".into())));
        assert_eq!(optional_change(None, false), None);
    }

    #[test]
    fn test_unknown_window_is_rejected() {
        assert!(parse_window("fortnight").is_err());
    }
}
