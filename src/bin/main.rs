use clap::Parser;
use rust_decimal::Decimal;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use voice_currency_converter::{
    config::Settings,
    models::ConversionRequest,
    narration::{display_line, utterance_for},
    orchestrator::ConversionOrchestrator,
    rates::HttpRateProvider,
    speech::{ConsoleSynthesizer, LineRecognizer, SilentSynthesizer, SpeechSynthesizer},
    state::{NotificationLevel, SessionState, VoiceSession},
};

/// VoiceCurrency — talk (or type) and convert.
///
/// Pass a phrase such as "convert 100 dollars to euros", use --amount/--from/--to
/// for manual entry, or pass nothing to read one line from stdin.
#[derive(Parser, Debug)]
#[command(name = "voice-currency", version, about)]
struct CliArgs {
    /// Phrase to convert.
    phrase: Vec<String>,

    /// Manual entry: amount to convert.
    #[arg(long, requires = "from", conflicts_with = "phrase")]
    amount: Option<Decimal>,

    /// Manual entry: source currency code.
    #[arg(long, requires = "to")]
    from: Option<String>,

    /// Manual entry: target currency code.
    #[arg(long, requires = "amount")]
    to: Option<String>,

    /// Override RATES_API_BASE_URL.
    #[arg(long = "rates-url")]
    rates_url: Option<String>,

    /// Do not speak the result.
    #[arg(short, long)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Conversion failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> voice_currency_converter::Result<ExitCode> {
    let mut settings = Settings::from_env()?;
    if let Some(url) = args.rates_url.as_deref() {
        settings.rates_api = settings.rates_api.with_base_url(url);
    }

    let provider = HttpRateProvider::new(settings.rates_api)?;
    let orchestrator = Arc::new(ConversionOrchestrator::new(Arc::new(provider)));

    let synthesizer: Arc<dyn SpeechSynthesizer> = if args.quiet {
        Arc::new(SilentSynthesizer)
    } else {
        Arc::new(ConsoleSynthesizer)
    };

    // Manual entry bypasses the phrase parser
    if let (Some(amount), Some(from), Some(to)) = (args.amount, &args.from, &args.to) {
        let request = ConversionRequest::manual(amount, from, to)?;
        let result = orchestrator.convert_request(&request).await?;
        println!("{}", display_line(&result));
        synthesizer.speak(&utterance_for(&result));
        return Ok(ExitCode::SUCCESS);
    }

    if !args.phrase.is_empty() {
        let text = args.phrase.join(" ");
        info!(%text, "Converting phrase");
        let result = orchestrator.parse_and_convert(&text).await?;
        println!("{}", display_line(&result));
        synthesizer.speak(&utterance_for(&result));
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!("🎙️ Say something like 'Convert 100 dollars to euros':");
    let session = VoiceSession::new(Arc::new(LineRecognizer::stdin()), orchestrator, synthesizer);
    let mut state = SessionState::new();

    let notification = session.run(&mut state).await?;

    if !state.transcript.is_empty() {
        println!("You said: \"{}\"", state.transcript);
    }
    if let Some(result) = state.conversion_result.as_ref() {
        println!("{}", display_line(result));
    }
    eprintln!("{}", notification.message);

    match notification.level {
        NotificationLevel::Error => Ok(ExitCode::FAILURE),
        _ => Ok(ExitCode::SUCCESS),
    }
}
