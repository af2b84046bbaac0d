use anyhow::Context;
use clap::Parser;
use creator_match::core::outreach::{
    brand_host, confidence_label, first_name, format_outreach, initials, price_text,
};
use creator_match::utils::error::ErrorKind;
use creator_match::utils::{logger, validation::Validate};
use creator_match::{CliConfig, MatchOutcome, TracingStageObserver};
use std::sync::Arc;
use url::Url;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = cli.load_match_config().context("Failed to load configuration")?;
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(e.kind()));
    }

    let orchestrator = config
        .orchestrator()
        .context("Failed to set up HTTP clients")?
        .with_observer(Arc::new(TracingStageObserver));

    let session = orchestrator.run(&cli.website).await;
    let mut outcome = session.outcome().clone();

    if let Some(label) = &cli.category {
        match session.refine(label) {
            Ok(refined) => outcome = refined,
            Err(e) => {
                eprintln!("❌ {}", e);
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(exit_code(e.kind()));
            }
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome, session.website());
    }

    if let MatchOutcome::Failed(failure) = &outcome {
        std::process::exit(exit_code(failure.kind));
    }
    Ok(())
}

fn print_outcome(outcome: &MatchOutcome, website: Option<&Url>) {
    match outcome {
        MatchOutcome::Matched(m) => {
            let host = website.map(brand_host).unwrap_or_default();

            println!("[{}] {}", initials(&m.creator.name), m.creator.name);
            println!("Category: {}", m.category);
            println!("Match ({})", confidence_label(m.confidence));
            println!("Price: {}", price_text(m.creator.price));
            if let Some(photo) = &m.creator.photo_url {
                println!("Photo: {}", photo);
            }
            println!();
            println!(
                "{}",
                format_outreach(&host, m.category, first_name(&m.creator.name))
            );
        }
        MatchOutcome::NoCreatorForCategory { category, .. } => {
            println!("No creators found for {}", category);
            println!("Add creators in that category to the sheet, or pick another one.");
        }
        MatchOutcome::Failed(failure) => {
            eprintln!("❌ We couldn’t complete the match");
            eprintln!("{}", failure.message);
        }
    }

    if let Some(fallback) = outcome.fallback() {
        eprintln!(
            "💡 Re-run with --category <one of: {}> (suggested: {})",
            join_labels(&fallback.options),
            fallback.preselected
        );
    }
}

fn join_labels(categories: &[creator_match::Category]) -> String {
    categories
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::InvalidUrl | ErrorKind::UnknownCategory | ErrorKind::Config => 2,
        ErrorKind::RosterUnavailable | ErrorKind::RosterEmpty => 3,
        ErrorKind::ClassificationFailed => 4,
        ErrorKind::Internal => 1,
    }
}
