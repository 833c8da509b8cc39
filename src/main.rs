use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use studio_admin::config::Config;
use studio_admin::forms::{
    open_form, submit, AddLocationForm, ClassTeacherForm, EditAccountSubscriptionForm,
    EditPaymentBatchCategoryForm, EditSubscriptionGroupForm, FormValues, Navigator, Notifier, RecordForm,
    SubmissionError,
};
use studio_admin::graphql::{GraphQLApi, HttpGraphQLClient};
use studio_admin::listing::class_teachers::{class_teachers_query, TeacherRow};
use studio_admin::listing::classpasses::{classpasses_query, describe};
use studio_admin::listing::invoices::{delete_invoice, invoices_query, write_csv, InvoiceFilter, InvoiceRow};
use studio_admin::listing::{ListScreen, ListState};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "studio_admin=info");
    }

    init_logging(matches!(cli.command, Commands::Tui));

    let config = Config::from_env()?.with_overrides(cli.api_url.as_deref(), cli.token.as_deref());
    config.validate()?;

    let api: Arc<dyn GraphQLApi> = Arc::new(HttpGraphQLClient::new(&config)?);
    handle_command(cli.command, api, &config).await
}

/// Log to stderr and `studio-admin.log`; the TUI logs to the file only
fn init_logging(tui: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let file_appender = tracing_appender::rolling::never(".", "studio-admin.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::from_default_env());

    let stderr_layer = (!tui).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
}

async fn handle_command(command: Commands, api: Arc<dyn GraphQLApi>, config: &Config) -> Result<()> {
    match command {
        Commands::Invoices { status, all, csv } => {
            let filter = match status {
                Some(status) => InvoiceFilter::status(Commands::parse_status(&status)?),
                None => InvoiceFilter::default(),
            };
            info!("Listing invoices (status: {})", filter.label());

            let mut screen = ListScreen::new(api, invoices_query(filter, config.page_size));
            if all {
                screen.fetch_all().await?;
            } else {
                screen.fetch_first().await?;
            }

            match screen.state() {
                ListState::Populated(acc) => {
                    println!(
                        "{:<10} {:<14} {:<24} {:<21} {:<11} {:<11} {:>12} {:>12}",
                        "Status", "Number", "Relation", "Summary", "Sent", "Due", "Total", "Balance"
                    );
                    println!("{}", "-".repeat(122));
                    for invoice in acc.nodes() {
                        let row = InvoiceRow::from(invoice);
                        println!(
                            "{:<10} {:<14} {:<24} {:<21} {:<11} {:<11} {:>12} {:>12}",
                            row.status,
                            row.invoice_number,
                            row.relation,
                            row.summary,
                            row.date_sent,
                            row.date_due,
                            row.total,
                            row.balance
                        );
                    }
                    println!();
                    println!("Total: {} invoices", acc.len());
                    if acc.can_load_more() {
                        println!("More invoices available; pass --all to fetch every page");
                    }

                    if let Some(path) = csv {
                        let file = File::create(&path)
                            .with_context(|| format!("Cannot create CSV file: {}", path.display()))?;
                        let count = write_csv(file, acc.nodes())?;
                        info!("Exported {} invoices to {}", count, path.display());
                    }
                }
                _ => println!("No invoices found"),
            }
        }

        Commands::DeleteInvoice { id } => {
            delete_invoice(api.as_ref(), &id).await?;
            println!("Invoice deleted");
        }

        Commands::ClassTeachers { class, all } => {
            let mut screen = ListScreen::new(api, class_teachers_query(&class, config.page_size));
            if all {
                screen.fetch_all().await?;
            } else {
                screen.fetch_first().await?;
            }

            match screen.state() {
                ListState::Populated(acc) => {
                    println!("{:<30} {:<30} {:<11} {:<11}", "Teacher", "Second teacher", "Start", "End");
                    println!("{}", "-".repeat(85));
                    for teacher in acc.nodes() {
                        let row = TeacherRow::from(teacher);
                        println!(
                            "{:<30} {:<30} {:<11} {:<11}",
                            row.teacher, row.teacher2, row.date_start, row.date_end
                        );
                    }
                    if acc.can_load_more() {
                        println!("More teachers available; pass --all to fetch every page");
                    }
                }
                _ => println!("No teachers assigned to this class"),
            }
        }

        Commands::Classpasses => {
            let mut screen = ListScreen::new(api, classpasses_query(config.page_size));
            screen.fetch_all().await?;
            match screen.state() {
                ListState::Populated(acc) => {
                    for pass in acc.nodes() {
                        println!("{}", describe(pass));
                    }
                }
                _ => println!("No classpasses found"),
            }
        }

        Commands::AddLocation { set } => {
            run_form(api, &AddLocationForm, Commands::parse_assignments(&set)?).await?;
        }

        Commands::EditPaymentBatchCategory { id, set } => {
            let form = EditPaymentBatchCategoryForm::new(id);
            run_form(api, &form, Commands::parse_assignments(&set)?).await?;
        }

        Commands::EditSubscriptionGroup { id, set } => {
            let form = EditSubscriptionGroupForm::new(id);
            run_form(api, &form, Commands::parse_assignments(&set)?).await?;
        }

        Commands::EditAccountSubscription { account, id, set } => {
            let form = EditAccountSubscriptionForm::new(account, id);
            run_form(api, &form, Commands::parse_assignments(&set)?).await?;
        }

        Commands::AddClassTeacher { class, set } => {
            let form = ClassTeacherForm::add(class);
            run_form(api, &form, Commands::parse_assignments(&set)?).await?;
        }

        Commands::EditClassTeacher { class, id, set } => {
            let form = ClassTeacherForm::edit(class, id);
            run_form(api, &form, Commands::parse_assignments(&set)?).await?;
        }

        Commands::Tui => {
            info!("Launching TUI interface");
            match studio_admin::admin_tui::run(config.clone(), api).await {
                Ok(()) => info!("TUI exited successfully"),
                Err(e) => {
                    error!("TUI failed: {}", e);
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}

/// Load the form's starting values, apply overrides and submit once
async fn run_form(api: Arc<dyn GraphQLApi>, form: &dyn RecordForm, overrides: FormValues) -> Result<()> {
    info!("{}", form.title());
    let mut values = open_form(api.as_ref(), form)
        .await
        .context("Failed to load record")?;
    values.merge(overrides);

    let mut notifier = ConsoleNotifier;
    let mut navigator = LoggingNavigator;
    match submit(api.as_ref(), form, &values, &mut notifier, &mut navigator).await {
        Ok(submitted) => {
            println!("{}", serde_json::to_string_pretty(&submitted.payload)?);
            Ok(())
        }
        Err(SubmissionError::Invalid(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field, message);
            }
            Err(anyhow::anyhow!("{} field(s) failed validation", errors.len()))
        }
        Err(e) => Err(e.into()),
    }
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_success(&mut self, message: &str) {
        info!("{}", message);
        println!("{}", message);
    }

    fn notify_failure(&mut self, message: &str) {
        error!("{}", message);
        eprintln!("{}", message);
    }
}

struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate_to(&mut self, path: &str) {
        info!("Return to {}", path);
    }
}
