use std::{
    error::Error,
    io,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::{Parser, Subcommand, ValueEnum};
use time::{Date, Month, OffsetDateTime, Time, UtcOffset, macros::format_description};

use expense_tracker::{
    CategoryId, Config,
    auth::{AuthState, AuthViewModel, SQLiteAuthService},
    category::{Category, category_icon},
    clock::{Clock, SystemClock},
    currency::{format_amount, format_currency},
    dashboard::{HomeState, HomeViewModel, TimeFrame},
    datetime::{format_time, local_date_time, to_millis},
    setup_logging,
    stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore, create_stores},
    transaction::{Transaction, TransactionType, group_by_day, parse_amount},
};

/// Record income and expenses, and see where the money goes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    config: Config,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new transaction.
    Add {
        /// What the transaction was for.
        #[arg(long)]
        title: String,
        /// How much was spent or earned.
        #[arg(long)]
        amount: String,
        /// The name of the category, e.g. "Food".
        #[arg(long)]
        category: String,
        /// Whether money was spent or earned.
        #[arg(long = "type", value_enum, default_value_t = TypeArg::Expense)]
        kind: TypeArg,
        /// Tax paid as part of the transaction.
        #[arg(long, default_value_t = 0.0)]
        tax: f64,
        /// The day the transaction happened (YYYY-MM-DD). Defaults to now.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// List the transactions of a month, grouped by day.
    List {
        /// Only show transactions whose title or category contains this text.
        #[arg(long)]
        search: Option<String>,
        /// Only show transactions in this category.
        #[arg(long)]
        category: Option<String>,
        /// Only show income or expenses.
        #[arg(long = "type", value_enum)]
        kind: Option<TypeArg>,
        /// Only show transactions from this day onwards (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date, requires = "to")]
        from: Option<Date>,
        /// Only show transactions up to and including this day (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date, requires = "from")]
        to: Option<Date>,
        /// The month of the current year to show (1-12). Defaults to the current month.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
        month: Option<u8>,
    },
    /// Show spending for this month's transactions over a span of time.
    Chart {
        /// The span of time to chart.
        #[arg(long, value_enum, default_value_t = TimeFrameArg::Month)]
        time_frame: TimeFrameArg,
    },
    /// List the categories.
    Categories {
        /// Only show favorite categories.
        #[arg(long)]
        favorites: bool,
    },
    /// Mark a category as a favorite, or unmark it if it already is one.
    Favorite {
        /// The ID of the category.
        id: CategoryId,
    },
    /// Register a new account.
    SignUp {
        /// The email address to sign in with.
        #[arg(long)]
        email: String,
    },
    /// Check the password of an account.
    SignIn {
        /// The email address the account was registered with.
        #[arg(long)]
        email: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TypeArg {
    Income,
    Expense,
}

impl From<TypeArg> for TransactionType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Income => TransactionType::Income,
            TypeArg::Expense => TransactionType::Expense,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TimeFrameArg {
    Today,
    Week,
    Month,
    Year,
}

impl From<TimeFrameArg> for TimeFrame {
    fn from(value: TimeFrameArg) -> Self {
        match value {
            TimeFrameArg::Today => TimeFrame::Today,
            TimeFrameArg::Week => TimeFrame::Week,
            TimeFrameArg::Month => TimeFrame::Month,
            TimeFrameArg::Year => TimeFrame::Year,
        }
    }
}

type SQLiteHomeViewModel = HomeViewModel<SQLiteTransactionStore, SQLiteCategoryStore, SystemClock>;

const MISSING_FIELDS: &str = "The transaction is missing a title, amount or category.";

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging(args.config.log_file.as_deref())?;

    let offset = args.config.local_offset()?;
    let connection = Arc::new(Mutex::new(args.config.open_database()?));
    let clock = SystemClock::new(offset);

    match args.command {
        Command::SignUp { email } => {
            let Some(password) = prompt_new_password()? else {
                return Ok(());
            };
            let auth = AuthViewModel::new(SQLiteAuthService::new(connection));
            report_auth_state(auth.sign_up(&email, &password), &email);
        }
        Command::SignIn { email } => {
            let password = rpassword::prompt_password("Password: ")?;
            let auth = AuthViewModel::new(SQLiteAuthService::new(connection));
            report_auth_state(auth.sign_in(&email, &password), &email);
        }
        command => {
            let (transaction_store, category_store) = create_stores(connection);
            let mut home = HomeViewModel::new(transaction_store, category_store, clock);
            exit_on_error(&home.state());

            run_home_command(command, &mut home, clock.now(), args.json)?;
        }
    }

    Ok(())
}

fn run_home_command(
    command: Command,
    home: &mut SQLiteHomeViewModel,
    now: OffsetDateTime,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Add {
            title,
            amount,
            category,
            kind,
            tax,
            date,
        } => {
            let Some(amount) = parse_amount(&amount) else {
                print_error("The amount cannot be blank.");
                exit(1);
            };
            let occurred_at = match date {
                Some(date) => to_millis(date.with_time(now.time()).assume_offset(now.offset())),
                None => to_millis(now),
            };
            let builder = Transaction::build(&title, amount, &category, kind.into(), occurred_at);

            match home.add_transaction(builder.tax(tax)) {
                Some(transaction) if json => {
                    println!("{}", serde_json::to_string_pretty(&transaction)?);
                }
                Some(transaction) => {
                    println!(
                        "Added #{} {} {}",
                        transaction.id,
                        transaction.title,
                        format_amount(&transaction)
                    );
                }
                None => {
                    let state = home.state();
                    exit_on_error(&state);
                    print_error(state.date_error.as_deref().unwrap_or(MISSING_FIELDS));
                    exit(1);
                }
            }
        }
        Command::List {
            search,
            category,
            kind,
            from,
            to,
            month,
        } => {
            if let Some(month) = month {
                home.select_month(Month::try_from(month)?);
            }
            if let Some(search) = search {
                home.set_search_query(&search);
            }
            home.set_selected_category(category.as_deref());
            home.set_selected_type(kind.map(TransactionType::from));
            if let (Some(from), Some(to)) = (from, to) {
                let start = from.midnight().assume_offset(now.offset());
                let end = to
                    .with_time(Time::MIDNIGHT)
                    .assume_offset(now.offset())
                    .saturating_add(time::Duration::days(1))
                    .saturating_sub(time::Duration::milliseconds(1));
                home.set_date_range(to_millis(start), to_millis(end));
            }

            let state = home.state();
            exit_on_error(&state);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&state.filtered_transactions)?
                );
            } else {
                print_transactions(&state, now);
            }
        }
        Command::Chart { time_frame } => {
            home.update_time_frame(time_frame.into());

            let state = home.state();
            exit_on_error(&state);

            if json {
                println!("{}", serde_json::to_string_pretty(&state.spending_data)?);
            } else {
                print_chart(&state);
            }
        }
        Command::Categories { favorites } => {
            let state = home.state();
            let categories = if favorites {
                &state.favorite_categories
            } else {
                &state.categories
            };

            if json {
                println!("{}", serde_json::to_string_pretty(categories)?);
            } else {
                categories.iter().for_each(print_category);
            }
        }
        Command::Favorite { id } => {
            home.toggle_category_favorite(id);

            let state = home.state();
            exit_on_error(&state);

            match state.categories.iter().find(|category| category.id == id) {
                Some(category) => print_category(category),
                None => {
                    print_error(format!("There is no category with the ID {id}."));
                    exit(1);
                }
            }
        }
        Command::SignUp { .. } | Command::SignIn { .. } => {}
    }

    Ok(())
}

fn print_transactions(state: &HomeState, now: OffsetDateTime) {
    let offset = now.offset();

    for group in group_by_day(&state.filtered_transactions, now) {
        println!("{}", group.label);

        for transaction in group.transactions {
            println!(
                "  #{:<4} {:<24} {:<14} {:>14}  {}",
                transaction.id,
                transaction.title,
                transaction.category,
                format_amount(transaction),
                local_time_label(transaction, offset),
            );
        }
    }

    println!();
    println!("Income:   {}", format_currency(state.total_income));
    println!("Expenses: {}", format_currency(state.total_expenses));
    println!("Balance:  {}", format_currency(state.total_balance));
}

fn local_time_label(transaction: &Transaction, offset: UtcOffset) -> String {
    local_date_time(transaction.occurred_at, offset)
        .map(format_time)
        .unwrap_or_default()
}

fn print_chart(state: &HomeState) {
    let max = state
        .spending_data
        .iter()
        .map(|point| point.value)
        .fold(0.0, f64::max);

    for point in &state.spending_data {
        let width = if max > 0.0 {
            (point.value / max * 40.0).round() as usize
        } else {
            0
        };

        println!(
            "{:>9} {:<40} {}",
            point.label,
            "#".repeat(width),
            format_currency(point.value)
        );
    }
}

fn print_category(category: &Category) {
    println!(
        "#{:<4} {}{} ({})",
        category.id,
        category.name,
        if category.is_favorite { " *" } else { "" },
        category_icon(category.name.as_ref()),
    );
}

fn report_auth_state(state: AuthState, email: &str) {
    match state {
        AuthState::Authenticated(user_id) => println!("Signed in as {email} (user {user_id})"),
        AuthState::Error(message) => {
            print_error(message);
            exit(1);
        }
        AuthState::Loading | AuthState::Unauthenticated => {}
    }
}

fn exit_on_error(state: &HomeState) {
    if let Some(error) = &state.error {
        print_error(error);
        exit(1);
    }
}

fn prompt_new_password() -> Result<Option<String>, io::Error> {
    loop {
        let first_password = match rpassword::prompt_password("Enter a password: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(error) => return Err(error),
        };

        let second_password = rpassword::prompt_password("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        return Ok(Some(first_password));
    }
}

fn parse_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
