//! Quote Commands

use anyhow::Result;
use clap::Subcommand;
use quotes_common::{Quote, QuoteDraft, QuoteId};
use serde::Serialize;

use crate::client::QuotesClient;
use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand, Debug)]
pub enum QuoteCommands {
    /// List all quotes
    List,

    /// Show a single quote
    Show {
        /// Quote ID
        id: u64,
    },

    /// Add a new quote
    Add {
        /// Quote text
        #[arg(short, long)]
        text: String,

        /// Quote author
        #[arg(short, long)]
        author: String,
    },

    /// Edit an existing quote; omitted fields keep their current value
    Edit {
        /// Quote ID
        id: u64,

        #[arg(short, long)]
        text: Option<String>,

        #[arg(short, long)]
        author: Option<String>,
    },

    /// Delete a quote
    Delete {
        /// Quote ID
        id: u64,
    },
}

/// Quote display wrapper for serialization
#[derive(Serialize)]
pub struct QuoteDisplay {
    pub id: u64,
    pub text: String,
    pub author: String,
    pub updated: String,
}

impl From<Quote> for QuoteDisplay {
    fn from(q: Quote) -> Self {
        let updated = chrono::DateTime::from_timestamp(q.updated_at, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        Self {
            id: q.id.0,
            text: q.text,
            author: q.author,
            updated,
        }
    }
}

impl TableDisplay for QuoteDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Text", "Author", "Updated"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.text.clone(),
            self.author.clone(),
            self.updated.clone(),
        ]
    }
}

/// Merge optional edits over the current fields
pub fn merge_edit(current: &Quote, text: Option<String>, author: Option<String>) -> QuoteDraft {
    QuoteDraft {
        text: text.unwrap_or_else(|| current.text.clone()),
        author: author.unwrap_or_else(|| current.author.clone()),
    }
}

pub async fn execute(
    cmd: QuoteCommands,
    client: &QuotesClient,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        QuoteCommands::List => {
            let quotes: Vec<QuoteDisplay> =
                client.list().await?.into_iter().map(Into::into).collect();
            print_list(&quotes, format);
        }
        QuoteCommands::Show { id } => {
            let quote = client.get(QuoteId(id)).await?;
            print_item(&QuoteDisplay::from(quote), format);
        }
        QuoteCommands::Add { text, author } => {
            let quote = client.create(&QuoteDraft::new(text, author)).await?;
            if format == OutputFormat::Table {
                print_success(&format!("Added quote {}: {}", quote.id, quote));
            } else {
                print_item(&QuoteDisplay::from(quote), format);
            }
        }
        QuoteCommands::Edit { id, text, author } => {
            let current = client.get(QuoteId(id)).await?;
            let draft = merge_edit(&current, text, author);
            let quote = client.replace(QuoteId(id), &draft).await?;
            if format == OutputFormat::Table {
                print_success(&format!("Updated quote {}: {}", quote.id, quote));
            } else {
                print_item(&QuoteDisplay::from(quote), format);
            }
        }
        QuoteCommands::Delete { id } => {
            client.delete(QuoteId(id)).await?;
            print_success(&format!("Deleted quote {}", id));
        }
    }

    Ok(())
}
