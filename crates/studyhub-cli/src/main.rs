//! studyhub CLI
//!
//! Command-line interface for browsing and editing studies and assays

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use serde::Serialize;
use studyhub_api::requests::{CreateAssayRequest, CreateStudyRequest};
use studyhub_client::{HttpClient, ListBuilder};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studyhub")]
#[command(about = "Client for the studyhub study and assay API", long_about = None)]
struct Cli {
    /// Base URL of the studyhub daemon
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check daemon health
    Health,
    /// Work with studies
    #[command(subcommand)]
    Studies(StudyCommand),
    /// Work with assays
    #[command(subcommand)]
    Assays(AssayCommand),
}

#[derive(Subcommand)]
enum StudyCommand {
    /// List one page of studies
    List(PageArgs),
    /// Show a study and its assays
    Get { id: i64 },
    /// Create a study
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    /// Delete a study and its assays
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum AssayCommand {
    /// List one page of assays
    List(PageArgs),
    /// Show an assay
    Get { id: i64 },
    /// Create an assay under a study
    Create {
        #[arg(long)]
        measurement_type: String,
        #[arg(long)]
        study: i64,
    },
    /// Delete an assay
    Delete { id: i64 },
}

#[derive(Args)]
struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, conflicts_with = "last")]
    page: Option<u64>,
    /// Fetch the last page
    #[arg(long)]
    last: bool,
    /// Items per page
    #[arg(long)]
    page_size: Option<u64>,
}

impl PageArgs {
    fn apply<T: serde::de::DeserializeOwned>(&self, mut builder: ListBuilder<T>) -> ListBuilder<T> {
        if let Some(page) = self.page {
            builder = builder.page(page);
        }
        if self.last {
            builder = builder.last_page();
        }
        if let Some(page_size) = self.page_size {
            builder = builder.page_size(page_size);
        }
        builder
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = HttpClient::new(&cli.url)?;
    debug!(url = %cli.url, "using studyhub daemon");

    match cli.command {
        Commands::Health => print_json(&client.health().await?)?,
        Commands::Studies(command) => match command {
            StudyCommand::List(args) => {
                print_json(&args.apply(client.list_studies()).send().await?)?;
            }
            StudyCommand::Get { id } => print_json(&client.get_study(id).await?)?,
            StudyCommand::Create { title, description } => {
                let request = CreateStudyRequest { title, description };
                print_json(&client.create_study(&request).await?)?;
            }
            StudyCommand::Delete { id } => {
                client.delete_study(id).await?;
                eprintln!("deleted study {id}");
            }
        },
        Commands::Assays(command) => match command {
            AssayCommand::List(args) => {
                print_json(&args.apply(client.list_assays()).send().await?)?;
            }
            AssayCommand::Get { id } => print_json(&client.get_assay(id).await?)?,
            AssayCommand::Create {
                measurement_type,
                study,
            } => {
                let request = CreateAssayRequest {
                    measurement_type,
                    study,
                };
                print_json(&client.create_assay(&request).await?)?;
            }
            AssayCommand::Delete { id } => {
                client.delete_assay(id).await?;
                eprintln!("deleted assay {id}");
            }
        },
    }

    Ok(())
}
