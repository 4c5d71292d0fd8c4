use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "daybreak", version)]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the job once and exit with its outcome.
    Once(JobArgs),
    /// Run the job every day at the send time.
    Daemon(DaemonArgs),
    /// Render a card from a local image without any network access.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct JobArgs {
    /// Photo provider API key.
    #[arg(long, env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    unsplash_access_key: String,

    /// Bot token.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    telegram_bot_token: String,

    /// Recipient chat id.
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    telegram_chat_id: String,

    /// Directory for the run's temporary files.
    #[arg(long, env = "DAYBREAK_WORK_DIR", default_value = ".")]
    work_dir: PathBuf,

    #[command(flatten)]
    card: CardArgs,

    /// Outbound request timeout in seconds.
    #[arg(long, env = "DAYBREAK_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    http_timeout_secs: u64,

    /// Quote provider base URL.
    #[arg(long, env = "DAYBREAK_QUOTE_URL", default_value = daybreak::ZENQUOTES_URL)]
    quote_url: String,

    /// Photo provider base URL.
    #[arg(long, env = "DAYBREAK_PHOTO_URL", default_value = daybreak::UNSPLASH_URL)]
    photo_url: String,

    /// Bot API base URL.
    #[arg(long, env = "DAYBREAK_TELEGRAM_URL", default_value = daybreak::TELEGRAM_URL)]
    telegram_url: String,
}

#[derive(Args, Debug)]
struct DaemonArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Local time of day to send, `HH:MM`.
    #[arg(long, env = "DAYBREAK_SEND_TIME", default_value = "07:30")]
    send_time: String,

    /// Run once immediately before waiting for the first trigger.
    #[arg(long)]
    run_now: bool,
}

#[derive(Args, Debug)]
struct CardArgs {
    /// Font file tried before the platform fonts.
    #[arg(long, env = "DAYBREAK_FONT")]
    font: Option<PathBuf>,

    /// Card title.
    #[arg(long, env = "DAYBREAK_TITLE", default_value = daybreak::DEFAULT_TITLE)]
    title: String,

    /// Text color as `#RRGGBB` or `#RRGGBBAA`.
    #[arg(long, default_value = "#ffffff")]
    color: String,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Background image.
    #[arg(long)]
    image: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Quote text.
    #[arg(long, default_value = "Stay positive and happy.")]
    quote: String,

    /// Quote author.
    #[arg(long, default_value = "A well-wisher")]
    author: String,

    #[command(flatten)]
    card: CardArgs,

    /// Print the layout plan as JSON on stdout.
    #[arg(long)]
    dump_plan: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match cli.cmd {
        Command::Once(args) => cmd_once(args),
        Command::Daemon(args) => cmd_daemon(args),
        Command::Render(args) => cmd_render(args).map(|()| ExitCode::SUCCESS),
    }
}

fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn settings_for(job: JobArgs, send_time: Option<String>) -> anyhow::Result<daybreak::Settings> {
    let mut settings = daybreak::Settings {
        unsplash_access_key: job.unsplash_access_key,
        telegram_bot_token: job.telegram_bot_token,
        telegram_chat_id: job.telegram_chat_id,
        work_dir: job.work_dir,
        font: job.card.font,
        http_timeout: Duration::from_secs(job.http_timeout_secs),
        quote_url: job.quote_url,
        photo_url: job.photo_url,
        telegram_url: job.telegram_url,
        title: job.card.title,
        text_color: daybreak::Rgba8::parse_hex(&job.card.color)?,
        ..daybreak::Settings::default()
    };
    if let Some(send_time) = send_time {
        settings.send_time = send_time;
    }
    settings.validate()?;
    Ok(settings)
}

fn cmd_once(args: JobArgs) -> anyhow::Result<ExitCode> {
    let settings = settings_for(args, None)?;
    let orchestrator = settings.orchestrator()?;
    let report = orchestrator.run(&settings.run_paths());
    let exit_code = report.outcome.exit_code();
    if !report.outcome.is_success() {
        tracing::error!(
            state = %report.final_state(),
            outcome = ?report.outcome,
            exit_code,
            "run did not deliver the card"
        );
    }
    Ok(ExitCode::from(exit_code))
}

fn cmd_daemon(args: DaemonArgs) -> anyhow::Result<ExitCode> {
    let settings = settings_for(args.job, Some(args.send_time))?;
    let trigger = settings.trigger()?;
    let orchestrator = settings.orchestrator()?;
    let paths = settings.run_paths();

    tracing::info!(%trigger, work_dir = %settings.work_dir.display(), "daemon started");
    daybreak::run_daily(trigger, args.run_now, || {
        let report = orchestrator.run(&paths);
        tracing::info!(
            state = %report.final_state(),
            success = report.outcome.is_success(),
            "scheduled run finished"
        );
    })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let canvas = daybreak::load_canvas(&args.image)?;
    let settings = daybreak::Settings {
        font: args.card.font,
        text_color: daybreak::Rgba8::parse_hex(&args.card.color)?,
        ..daybreak::Settings::default()
    };
    let text = daybreak::CardText {
        title: &args.card.title,
        quote: &args.quote,
        author: &args.author,
    };

    let size = daybreak::CanvasSize::new(canvas.width(), canvas.height());
    let (plan, mut shaper) = settings.card().plan(size, &text)?;
    if args.dump_plan {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }

    let rendered = daybreak::compose(&canvas, &plan, &mut shaper, settings.text_color)?;
    let png = daybreak::encode_png(&rendered)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png).with_context(|| format!("write png '{}'", args.out.display()))?;

    tracing::info!(out = %args.out.display(), "card written");
    Ok(())
}
