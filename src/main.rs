use anyhow::Context;
use clap::Parser;
use shop_admin_core::config::cli::{CliConfig, Command};
use shop_admin_core::core::schedule::validate_schedule;
use shop_admin_core::domain::ports::{BusyFlag, CatalogGateway};
use shop_admin_core::utils::error::ErrorSeverity;
use shop_admin_core::utils::{logger, validation::Validate};
use shop_admin_core::{
    AdminConfig, AdminError, AggregateKind, HttpCatalogGateway, LogNavigator, MutationIntent,
    MutationKind, MutationOutcome, MutationPipeline, NotificationCenter, ShopDraft, ShopEditor,
};
use std::sync::atomic::AtomicBool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match &cli.config {
        Some(path) => AdminConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => AdminConfig::default(),
    };
    if let Some(api_url) = &cli.api_url {
        config.api.base_url = Some(api_url.clone());
    }

    if cli.json_logs || config.logging.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose || config.logging.verbose);
    }
    tracing::info!("Starting shop-admin");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let result = match &cli.command {
        Command::Check { file } => check(file),
        Command::Submit { file } => submit(&config, file).await,
        Command::Delete { kind, id } => delete(&config, (*kind).into(), *id).await,
    };

    if let Err(e) = result {
        exit_with(&e);
    }
    Ok(())
}

fn exit_with(e: &AdminError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 3,
        ErrorSeverity::Critical => 4,
    };
    std::process::exit(exit_code);
}

fn load_draft(file: &str) -> Result<ShopDraft, AdminError> {
    let content = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&content)?)
}

fn check(file: &str) -> Result<(), AdminError> {
    let draft = load_draft(file)?;
    let report = validate_schedule(draft.opening_hours.windows());
    println!(
        "📋 {} window(s): valid={}, conflict_detected={}",
        draft.opening_hours.len(),
        report.valid,
        report.conflict_detected
    );
    report.into_result()?;
    println!("✅ Opening hours are consistent");
    Ok(())
}

fn pipeline_for(
    config: &AdminConfig,
) -> Result<(MutationPipeline<NotificationCenter, LogNavigator>, HttpCatalogGateway), AdminError> {
    let gateway = HttpCatalogGateway::from_config(&config.api)?;
    let center = NotificationCenter::new(config.notifications.auto_dismiss());
    let pipeline = MutationPipeline::new(center, LogNavigator::new())
        .with_fallback_message(config.notifications.fallback_error_message.clone());
    Ok((pipeline, gateway))
}

/// Prints the success notification the pipeline left behind. A failure was
/// already notified and is handed back so `main` maps it to an exit code.
fn report(outcome: MutationOutcome, center: &NotificationCenter) -> Result<(), AdminError> {
    outcome.into_result()?;
    println!("✅ {}", center.current().message);
    Ok(())
}

async fn submit(config: &AdminConfig, file: &str) -> Result<(), AdminError> {
    let (pipeline, gateway) = pipeline_for(config)?;
    let busy = AtomicBool::new(false);
    let editor = ShopEditor::edit(load_draft(file)?, pipeline.notifier().clone());

    let outcome = editor
        .submit(&pipeline, &gateway, Some(&busy as &dyn BusyFlag))
        .await?;
    if let Some(destination) = pipeline.navigator().last_destination() {
        tracing::debug!("last route: {}", destination);
    }
    report(outcome, pipeline.notifier())
}

async fn delete(config: &AdminConfig, kind: AggregateKind, id: i64) -> Result<(), AdminError> {
    let (pipeline, gateway) = pipeline_for(config)?;
    let busy = AtomicBool::new(false);

    let (message, destination) = match kind {
        AggregateKind::Shop => ("Shop deleted successfully", "/"),
        AggregateKind::Product => ("Product deleted successfully", "/product"),
        AggregateKind::Category => ("Category deleted successfully", "/category"),
    };
    let intent = MutationIntent::new(message, destination)
        .labelled(kind, MutationKind::Delete)
        .with_busy(&busy);

    let outcome = match kind {
        AggregateKind::Shop => pipeline.run(gateway.delete_shop(id), intent).await,
        AggregateKind::Product => pipeline.run(gateway.delete_product(id), intent).await,
        AggregateKind::Category => pipeline.run(gateway.delete_category(id), intent).await,
    };
    report(outcome, pipeline.notifier())
}
