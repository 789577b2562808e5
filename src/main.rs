use clap::Parser;
use std::sync::Arc;
use tenant_finder::config::{Command, InsertArgs, Overrides, SearchArgs};
use tenant_finder::utils::{logger, validation::Validate};
use tenant_finder::{
    CliConfig, ConsoleNotifier, FinderError, InsertForm, InsertService, LocalStorage,
    ReqwestTransport, SearchService, Settings, TerminalProgress,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    let settings = match Settings::load(cli.config.as_deref(), Overrides::from(&cli)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    logger::init_cli_logger(settings.verbose, settings.log_format);
    tracing::info!("Starting tenant-finder against {}", settings.base_url);
    tracing::debug!("Resolved settings: {:?}", settings);

    // 驗證配置
    if let Err(e) = settings.validate() {
        fail(&e);
    }

    let result = match cli.command {
        Command::Search(args) => run_search(&settings, args).await,
        Command::Insert(args) => run_insert(&settings, args).await,
    };

    if let Err(e) = result {
        fail(&e);
    }
}

fn fail(e: &FinderError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // request failures were already shown as notifications
    if !e.is_request_failure() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
    }
    std::process::exit(e.exit_code());
}

async fn run_search(settings: &Settings, args: SearchArgs) -> tenant_finder::Result<()> {
    let transport = ReqwestTransport::from_config(settings)?;
    let mut service = SearchService::new(transport, ConsoleNotifier::new());

    service.search(args.mode, &args.query).await?;
    println!("{}", service.render());

    if !args.export && !args.data_uri {
        return Ok(());
    }
    if !service.export_enabled() {
        tracing::warn!("Nothing to export: the search returned no results");
        return Ok(());
    }

    let filename = settings.export_filename_for(args.format);
    if args.export {
        let storage = LocalStorage::from_config(settings);
        let location = service.export(&storage, args.format, filename).await?;
        eprintln!("📁 Results saved to: {}", location);
    }
    if args.data_uri {
        let export = service.prepare_export(args.format, filename)?;
        println!("{}", export.data_uri());
    }
    Ok(())
}

async fn run_insert(settings: &Settings, args: InsertArgs) -> tenant_finder::Result<()> {
    let transport = ReqwestTransport::from_config(settings)?;
    let service = InsertService::new(
        transport,
        ConsoleNotifier::new(),
        Arc::new(TerminalProgress::new()),
    );

    let mut form = InsertForm {
        name: args.name,
        address: args.address,
        file: args.file,
    };

    let report = service.submit(&mut form).await;
    if report.is_empty() {
        return Err(FinderError::ValidationError {
            message: "Nothing to insert: give --name and --address, or --file".to_string(),
        });
    }

    report.into_result()
}
