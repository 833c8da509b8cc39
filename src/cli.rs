use std::path::PathBuf;

use clap::{Parser, Subcommand};
use studio_admin::forms::FormValues;
use studio_admin::models::InvoiceStatus;

#[derive(Parser)]
#[command(name = "studio-admin")]
#[command(about = "Terminal administration client for a studio management GraphQL backend")]
#[command(version)]
pub struct Cli {
    /// GraphQL endpoint (overrides STUDIO_ADMIN_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// JWT token (overrides STUDIO_ADMIN_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List finance invoices
    Invoices {
        /// Only invoices with this status (draft, sent, paid, cancelled, overdue)
        #[arg(short, long)]
        status: Option<String>,

        /// Follow every page instead of stopping after the first
        #[arg(long)]
        all: bool,

        /// Write the listed invoices to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Delete a finance invoice
    DeleteInvoice {
        /// Invoice id
        id: String,
    },

    /// List teachers assigned to a class
    ClassTeachers {
        /// Schedule item (class) id
        #[arg(short, long)]
        class: String,

        /// Follow every page instead of stopping after the first
        #[arg(long)]
        all: bool,
    },

    /// List classpasses offered in the shop
    Classpasses,

    /// Add a school location
    AddLocation {
        /// Field values as NAME=VALUE
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },

    /// Edit a finance payment batch category
    EditPaymentBatchCategory {
        /// Category id
        id: String,

        /// Field values as NAME=VALUE
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },

    /// Edit an organization subscription group
    EditSubscriptionGroup {
        /// Group id
        id: String,

        /// Field values as NAME=VALUE
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },

    /// Edit a subscription held by an account
    EditAccountSubscription {
        /// Account id
        #[arg(short, long)]
        account: String,

        /// Account subscription id
        id: String,

        /// Field values as NAME=VALUE
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },

    /// Assign a teacher to a class
    AddClassTeacher {
        /// Schedule item (class) id
        #[arg(short, long)]
        class: String,

        /// Field values as NAME=VALUE
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },

    /// Edit a teacher assignment of a class
    EditClassTeacher {
        /// Schedule item (class) id
        #[arg(short, long)]
        class: String,

        /// Assignment id
        id: String,

        /// Field values as NAME=VALUE
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },

    /// Launch the interactive terminal UI
    Tui,
}

impl Commands {
    pub fn parse_status(status: &str) -> Result<InvoiceStatus, anyhow::Error> {
        InvoiceStatus::parse(status).ok_or_else(|| {
            anyhow::anyhow!(
                "Unsupported invoice status: {}. Supported statuses: draft, sent, paid, cancelled, overdue",
                status
            )
        })
    }

    pub fn parse_assignments(assignments: &[String]) -> Result<FormValues, anyhow::Error> {
        let mut values = FormValues::new();
        for assignment in assignments {
            let (name, value) = assignment
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("Expected NAME=VALUE, got '{}'", assignment))?;
            values.set(name.trim(), value);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignments() {
        let values = Commands::parse_assignments(&[
            "name=Main studio".to_string(),
            "note=a=b".to_string(),
        ])
        .unwrap();
        assert_eq!(values.get("name"), "Main studio");
        assert_eq!(values.get("note"), "a=b");
        assert!(Commands::parse_assignments(&["name".to_string()]).is_err());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(Commands::parse_status("overdue").unwrap(), InvoiceStatus::Overdue);
        assert!(Commands::parse_status("lost").is_err());
    }

    #[test]
    fn test_cli_parses_global_overrides() {
        let cli = Cli::try_parse_from([
            "studio-admin",
            "invoices",
            "--status",
            "paid",
            "--token",
            "abc",
        ])
        .unwrap();
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert!(matches!(cli.command, Commands::Invoices { all: false, .. }));
    }
}
