use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sniff-scan", version, about = "Scan content with the fake-content detectors")]
pub struct Cli {
    /// Print the backend payload alongside the normalized result.
    #[arg(long, global = true)]
    pub raw: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fact-check a news query or statement.
    News(NewsArgs),
    /// Analyze an online store, or a single product listing with --name.
    Ecommerce(EcommerceArgs),
    /// Check a job offer against the posting company's details.
    Job(JobArgs),
    /// Detect whether an image is AI-generated.
    Image(ImageArgs),
    /// Normalize a saved backend payload without contacting any detector.
    Normalize(NormalizeArgs),
    /// Manage the stored login session.
    #[command(subcommand)]
    Session(SessionCommand),
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct NewsArgs {
    #[arg(long)]
    pub query: Option<String>,
    #[arg(long)]
    pub statement: Option<String>,
}

#[derive(Debug, Args)]
pub struct EcommerceArgs {
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct JobArgs {
    /// Company name.
    #[arg(long, required_unless_present = "file")]
    pub name: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub salary: Option<String>,
    #[arg(long)]
    pub linkedin: Option<String>,
    /// Full company info as a JSON file; other flags override its fields.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ImageArgs {
    pub path: PathBuf,
    /// Overrides the type guessed from the file extension.
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// image, news, ecommerce or job_posting.
    pub detector: String,
    /// JSON payload file, or `-` for stdin.
    pub file: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    Show,
    Logout,
}
