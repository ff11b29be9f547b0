use clap::Parser;
use degree_classes::utils::error::ErrorSeverity;
use degree_classes::utils::{logger, validation::Validate};
use degree_classes::{render, CatalogConfig, CliConfig, SchedulePage, ScheduleError, ScheduleSelector};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting degree-classes CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match run(&config) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!(
                "❌ Could not build the class schedule: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn run(config: &CliConfig) -> Result<String, ScheduleError> {
    // 驗證參數
    config.validate()?;

    tracing::info!("📁 Loading catalog from: {}", config.catalog);
    let catalog_config = CatalogConfig::from_file(&config.catalog)?;
    catalog_config.validate()?;
    tracing::info!(
        "✅ Catalog loaded: {} degrees, {} terms, {} classes",
        catalog_config.degrees.len(),
        catalog_config.terms.len(),
        catalog_config.classes.len()
    );

    let degree = catalog_config.degree(&config.degree)?;
    let mut catalog = catalog_config.into_catalog();
    if let Some(today) = config.today {
        catalog = catalog.with_reference_date(today);
    }

    let viewer = config.viewer()?;
    match &viewer {
        Some(v) => tracing::info!("👤 Viewer {} with roles {:?}", v.username, v.roles()),
        None => tracing::info!("👤 Anonymous viewer"),
    }

    let selector = ScheduleSelector::new(catalog);
    let page = SchedulePage::assemble(
        &selector,
        &degree,
        &config.request_segments(),
        viewer.as_ref(),
    )?;

    for entry in page.classes_by_curricular_year_and_semesters.iter() {
        tracing::info!(
            "📅 {} ({}): {} classes",
            entry.term.name,
            entry.term.state.as_str(),
            entry.class_count()
        );
    }

    render(&page, config.format)
}
