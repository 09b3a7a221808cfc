use anyhow::Context;
use clap::Parser;
use hall_digest::config::load_users;
use hall_digest::utils::error::ErrorSeverity;
use hall_digest::utils::{logger, validation::Validate};
use hall_digest::{
    CliConfig, DigestConfig, DigestEngine, DigestError, FileCheckpointStore, HttpMenuFetcher,
    RunOutcome, SmtpMailer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置 (日誌位置也在配置中，所以要先讀)
    let config = match DigestConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(cli.debug, &config.log_path())
        .with_context(|| format!("cannot open log file {}", config.log_path().display()))?;

    tracing::info!("🚀 Starting hall-digest");
    if cli.debug {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        fail(&e);
    }

    match run(&cli, &config).await {
        Ok(outcome) => report(&outcome),
        Err(e) => fail(&e),
    }

    Ok(())
}

async fn run(cli: &CliConfig, config: &DigestConfig) -> hall_digest::Result<RunOutcome> {
    let users = load_users(config.users_path())?;
    tracing::info!("👥 {} user(s) configured", users.len());

    let store = FileCheckpointStore::new(config.checkpoint_path());
    let source = HttpMenuFetcher::new(config.site.cookie.clone(), config.http_timeout())?;
    let mailer = SmtpMailer::new(&config.smtp_settings())?;
    let settings = config.run_settings(cli.run_mode(), cli.dry_run)?;

    if settings.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be sent or saved");
    }

    let engine = DigestEngine::new(store, source, mailer, settings);
    engine.run(&users, chrono::Local::now().date_naive()).await
}

fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Delivered { week, reports } => {
            let delivered = reports.iter().filter(|r| r.is_delivered()).count();
            tracing::info!(
                "✅ Week of {}: {}/{} digest(s) delivered",
                week.date(),
                delivered,
                reports.len()
            );
            if !reports.is_empty() && delivered == 0 {
                eprintln!("❌ No digest could be delivered; the week will be retried");
                std::process::exit(2);
            }
        }
        RunOutcome::Previewed { week, digests } => {
            tracing::info!("✅ Week of {}: {} digest(s) rendered", week.date(), digests.len());
        }
        RunOutcome::Skipped { week } => {
            tracing::info!("⏭️ Week of {} skipped", week.date());
        }
        RunOutcome::NotPublished { week } => {
            tracing::info!("⏳ Menu for the week of {} not published yet", week.date());
        }
    }
}

fn fail(e: &DigestError) -> ! {
    tracing::error!(
        "❌ hall-digest failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
