use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use kyc_qa::config::AppConfig;
use kyc_qa::error::AppError;
use kyc_qa::extraction::gemini::GeminiClient;
use kyc_qa::extraction::EncodedImage;
use kyc_qa::review::controller::ReviewController;
use kyc_qa::review::domain::{KycField, KycRecord, SessionContext};
use kyc_qa::review::service::{ReviewService, ReviewSnapshot};
use kyc_qa::review::sheet::{self, SheetKind};
use kyc_qa::review::ticket::TicketDraft;
use kyc_qa::server::{router, AppState};
use kyc_qa::telemetry;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "KYC QA Console",
    about = "Turn KYC review screenshots and ID card photos into standardized sheet rows and support tickets",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Extract a KYC record from one review screenshot
    Extract(ExtractArgs),
    /// Extract the fields of an ID card photo and verify age/expiry
    IdScan(IdScanArgs),
    /// Derive the three sheet rows from explicit field values, no extraction
    Rows(RowsArgs),
    /// Render a Telegram support ticket
    Ticket(TicketArgs),
    /// Extract a batch of review screenshots and append rows to a TSV sheet
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Path to the review screenshot
    image: PathBuf,
    /// Auditor to seed the session with (defaults to the first taxonomy entry)
    #[arg(long)]
    auditor: Option<String>,
}

#[derive(Args, Debug)]
struct IdScanArgs {
    /// Path to the ID card photo
    image: PathBuf,
}

#[derive(Args, Debug)]
struct RowsArgs {
    /// Display date, MM-DD-YY (defaults to today)
    #[arg(long)]
    date: Option<String>,
    /// Auditor identifier
    #[arg(long)]
    auditor: Option<String>,
    /// Member ID
    #[arg(long)]
    member_id: Option<String>,
    /// Normalized remark label
    #[arg(long)]
    remark: Option<String>,
}

#[derive(Args, Debug)]
struct TicketArgs {
    #[arg(long, default_value = "")]
    member_id: String,
    #[arg(long, default_value = "")]
    name: String,
    /// Reason, usually one of the canonical remark labels
    #[arg(long)]
    reason: Option<String>,
    /// Reviewer handle to tag; repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Review screenshots to process, in order
    images: Vec<PathBuf>,
    /// Sheet file to append rows to
    #[arg(long)]
    out: PathBuf,
    /// Which sheet the rows are for
    #[arg(long, value_enum, default_value = "failed-kyc")]
    sheet: SheetKind,
    /// Auditor to seed the session with
    #[arg(long)]
    auditor: Option<String>,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => {
            // The extraction client is blocking, so the runtime only exists
            // for the server surface.
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_server(args))
        }
        Command::Extract(args) => run_extract(args),
        Command::IdScan(args) => run_id_scan(args),
        Command::Rows(args) => run_rows(args),
        Command::Ticket(args) => run_ticket(args),
        Command::Batch(args) => run_batch(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let extractor = Arc::new(GeminiClient::from_config(&config.extraction)?);
    let review = Arc::new(ReviewService::new(extractor, SessionContext::default()));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        review,
    };

    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "kyc qa console ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn session_from(auditor: Option<String>) -> SessionContext {
    match auditor {
        Some(auditor) => SessionContext::new(auditor),
        None => SessionContext::default(),
    }
}

fn load_image(path: &Path) -> Result<EncodedImage, AppError> {
    let bytes = std::fs::read(path)?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(EncodedImage::from_bytes(&bytes, mime_type))
}

fn build_service(auditor: Option<String>) -> Result<ReviewService<GeminiClient>, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry).ok();
    let extractor = Arc::new(GeminiClient::from_config(&config.extraction)?);
    Ok(ReviewService::new(extractor, session_from(auditor)))
}

fn print_snapshot(snapshot: &ReviewSnapshot) {
    match serde_json::to_string_pretty(snapshot) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => warn!(error = %err, "failed to render snapshot"),
    }
    println!();
    print_rows(&snapshot.record);
}

fn print_rows(record: &KycRecord) {
    println!("KYC FAILED:           {}", record.failed_kyc_row);
    println!("UNDERAGE/NDRP:        {}", record.account_status_row);
    println!("MANUAL FREEZE:        {}", record.manual_freeze_row);
}

fn run_extract(args: ExtractArgs) -> Result<(), AppError> {
    let service = build_service(args.auditor)?;
    let image = load_image(&args.image)?;
    let snapshot = service.process_kyc_image(&image);
    print_snapshot(&snapshot);

    if let Some(error) = &snapshot.error {
        eprintln!("extraction failed: {error}");
        std::process::exit(1);
    }
    Ok(())
}

fn run_id_scan(args: IdScanArgs) -> Result<(), AppError> {
    let service = build_service(None)?;
    let image = load_image(&args.image)?;
    let record = service.process_id_card(&image)?;

    println!("{}", serde_json::to_string_pretty(&record).unwrap_or_default());
    if record.is_expired == Some(true) {
        println!("ID IS EXPIRED");
    }
    if record.is_underage == Some(true) {
        println!("HOLDER IS UNDER 21 YEARS OLD");
    }
    if record.is_expired == Some(false) && record.is_underage == Some(false) {
        println!("ID is valid and holder is of age.");
    }
    Ok(())
}

fn run_rows(args: RowsArgs) -> Result<(), AppError> {
    let mut controller = ReviewController::new(
        session_from(args.auditor.clone()),
        Local::now().date_naive(),
    );
    if let Some(date) = &args.date {
        controller.edit_field(KycField::Date, date);
    }
    if let Some(member_id) = &args.member_id {
        controller.edit_field(KycField::MemberId, member_id);
    }
    if let Some(remark) = &args.remark {
        controller.edit_field(KycField::RemarkNormalized, remark);
    }
    print_rows(controller.record());
    Ok(())
}

fn run_ticket(args: TicketArgs) -> Result<(), AppError> {
    let mut draft = TicketDraft {
        member_id: args.member_id,
        name: args.name,
        ..TicketDraft::default()
    };
    if let Some(reason) = args.reason {
        draft.reason = reason;
    }
    for tag in args.tags {
        draft.toggle_tag(&tag);
    }
    println!("{}", draft.render());
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let service = build_service(args.auditor)?;
    let mut records = Vec::new();

    for path in &args.images {
        let image = load_image(path)?;
        let snapshot = service.process_kyc_image(&image);
        match snapshot.error {
            Some(error) => {
                warn!(image = %path.display(), %error, "skipping image");
                eprintln!("skipping {}: {error}", path.display());
            }
            None => {
                print_rows(&snapshot.record);
                records.push(snapshot.record);
            }
        }
    }

    sheet::append_records(&args.out, args.sheet, &records)?;
    info!(
        rows = records.len(),
        out = %args.out.display(),
        "batch extraction appended"
    );
    Ok(())
}
