use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transcribe_client::logging::UploadLogFormatter;
use transcribe_client::{Config, TranscribeClient, CONFIRMATION_MESSAGE};

struct CliArgs {
    file: PathBuf,
    email: Option<String>,
    model_name: Option<String>,
    service_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transcribe_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().event_format(UploadLogFormatter::new()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args = match parse_args(env::args().skip(1))? {
        Some(args) => args,
        None => return Ok(()),
    };

    let config = Config::load()?;

    let service_url = args.service_url.unwrap_or(config.service_url.clone());
    let model_name = args.model_name.unwrap_or(config.model_name.clone());
    let email = match args.email.or(config.email.clone()) {
        Some(email) => email,
        None => {
            let hint = Config::config_path()
                .map(|path| format!(" or set \"email\" in {}", path.display()))
                .unwrap_or_default();
            bail!("no email address given; pass --email{}", hint);
        }
    };

    let config = Config {
        service_url,
        ..config
    };
    let client = TranscribeClient::new(&config)?;

    debug!("Submitting {} to {}", args.file.display(), config.service_url);
    let receipt = client.submit_file(&args.file, &email, &model_name).await?;
    debug!("Service accepted {}", receipt.file_name);

    println!("{}", CONFIRMATION_MESSAGE);
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<CliArgs>> {
    let mut file = None;
    let mut email = None;
    let mut model_name = None;
    let mut service_url = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "--email" => {
                email = Some(required_value(&mut args, "--email")?);
            }
            "--model" => {
                model_name = Some(required_value(&mut args, "--model")?);
            }
            "--service" => {
                service_url = Some(required_value(&mut args, "--service")?);
            }
            flag if flag.starts_with('-') => {
                bail!("unknown flag '{}'; see --help", flag);
            }
            _ => {
                if file.is_some() {
                    bail!("only one file can be uploaded per invocation");
                }
                file = Some(PathBuf::from(arg));
            }
        }
    }

    let Some(file) = file else {
        print_usage();
        bail!("no input file given");
    };

    Ok(Some(CliArgs {
        file,
        email,
        model_name,
        service_url,
    }))
}

fn required_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    match args.next() {
        Some(value) if !value.starts_with('-') => Ok(value),
        _ => bail!("flag '{}' requires a value", flag),
    }
}

fn print_usage() {
    println!("Usage: transcribe-client <FILE> [OPTIONS]");
    println!();
    println!("Uploads an audio or video file to the transcription service.");
    println!("The transcribed text is mailed to the given address.");
    println!();
    println!("Options:");
    println!("  --email <ADDR>    address to mail the transcription to");
    println!("  --model <NAME>    whisper model the service should run");
    println!("  --service <URL>   base URL of the transcription service");
    println!("  -h, --help        show this help");
}
