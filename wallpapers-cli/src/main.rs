use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use wallpapers_core::{
    decode_encoded_payload, normalize_path, MemoryWallpaperService, Platform, WallpaperError, WallpaperModule,
};

#[derive(Parser)]
#[command(name = "wallpapers", version, about = "Set the device wallpaper from a base64 payload or an image file")]
struct Cli {
    /// Log decode and apply steps
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Run as on Android against an in-memory wallpaper instead of the real platform gate
    #[arg(long, global = true)]
    simulate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Set the wallpaper from base64 image data ("-" reads stdin)
    Base64 { data: String },
    /// Set the wallpaper from a local image file (file:// URLs accepted)
    Path { path: String },
    /// Report whether wallpaper setting is supported here
    Supported,
    /// Decode a payload and print its format and size without applying it
    #[command(group(ArgGroup::new("source").required(true).args(["base64", "path"])))]
    Inspect {
        #[arg(long)]
        base64: Option<String>,
        #[arg(long)]
        path: Option<String>,
    },
}

fn read_data(data: String) -> Result<String> {
    if data != "-" {
        return Ok(data);
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read base64 data from stdin")?;
    Ok(buf)
}

fn report(module: &WallpaperModule<MemoryWallpaperService>, result: Result<&'static str, WallpaperError>) -> Result<ExitCode> {
    match result {
        Ok(message) => {
            println!("{}", message);
            if let Some(current) = module.applier().service().current_wallpaper() {
                println!("Current wallpaper: {}x{}", current.width(), current.height());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let payload = serde_json::to_string(&err.payload()).context("Failed to encode error payload")?;
            eprintln!("{}", payload);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn inspect(base64: Option<String>, path: Option<String>) -> Result<ExitCode> {
    let bytes = match (base64, path) {
        (Some(data), _) => match decode_encoded_payload(&read_data(data)?) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("{}", err);
                return Ok(ExitCode::FAILURE);
            }
        },
        (None, Some(path)) => {
            let path = Path::new(normalize_path(&path));
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        (None, None) => anyhow::bail!("Either --base64 or --path is required"),
    };

    println!("{}", describe_image(&bytes)?);
    Ok(ExitCode::SUCCESS)
}

fn describe_image(bytes: &[u8]) -> Result<String> {
    let format = image::guess_format(bytes).context("Unrecognized image format")?;
    let img = image::load_from_memory_with_format(bytes, format).context("Failed to decode image")?;
    Ok(format!("{:?} {}x{} ({} bytes)", format, img.width(), img.height(), bytes.len()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::from_default_env().filter_level(level).init();

    let platform = if cli.simulate { Platform::Android } else { Platform::current() };
    let module = WallpaperModule::with_platform(MemoryWallpaperService::new(), platform);
    log::debug!("Running on {:?}", module.platform());

    match cli.command {
        Command::Base64 { data } => {
            let data = read_data(data)?;
            let result = module.set_wallpaper_from_encoded_image(data).await;
            report(&module, result)
        }
        Command::Path { path } => {
            let result = module.set_wallpaper_from_path(path).await;
            report(&module, result)
        }
        Command::Supported => {
            println!("{}", module.is_supported().await);
            Ok(ExitCode::SUCCESS)
        }
        Command::Inspect { base64, path } => inspect(base64, path),
    }
}
