//! formcheck - entry point
//!
//! Extracts checkbox answers from a referral requirements PDF form and prints
//! the report to stdout. Logs go to stderr.

use anyhow::Context;
use clap::Parser;
use formcheck::extract::extract_answers;
use formcheck::pdf::FormDocument;
use formcheck::template::FormTemplate;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "formcheck")]
#[command(about = "Extract checkbox answers from a referral requirements PDF form", long_about = None)]
struct Args {
    /// Path to the PDF form
    pdf: PathBuf,

    /// Template JSON overriding the built-in referral requirements layout
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Password for protected documents
    #[arg(long)]
    password: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formcheck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let template = match &args.template {
        Some(path) => FormTemplate::from_json_file(path)
            .with_context(|| format!("failed to load template {}", path.display()))?,
        None => FormTemplate::default(),
    };

    let document = FormDocument::open(&args.pdf, args.password.as_deref())?;
    let report = extract_answers(&document, &template)?;

    println!("{}", report);

    Ok(())
}
