//! voucher-cli - render hotel confirmation vouchers from the command line

use anyhow::{bail, Context as _, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use voucher::extract::{parse_hotel_details, request_from_extraction};
use voucher::{
    BrandPreset, ImageSlot, VoucherConfig, VoucherImages, VoucherOutput, VoucherRenderer,
    VoucherRequest,
};

#[derive(Parser)]
#[command(
    name = "voucher-cli",
    version,
    about = "Render hotel confirmation vouchers as PDF",
    after_help = "EXAMPLES:\n  \
                  voucher-cli render --request booking.json -o voucher.pdf\n  \
                  voucher-cli render --request booking.json --brand fly-goldfinch \\\n    \
                  --image-exterior hotel.jpg --logo logo.png -o voucher.pdf\n  \
                  voucher-cli extract --input llm.txt\n  \
                  voucher-cli extract --input llm.txt --render -o voucher.pdf"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a voucher from a JSON booking request
    Render(RenderArgs),

    /// Normalize raw extraction output, optionally rendering it
    Extract(ExtractArgs),
}

/// Brand, layout and image inputs shared by every render
#[derive(Args)]
struct StyleArgs {
    /// Voucher config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Brand preset, replacing the config's brand
    #[arg(long)]
    brand: Option<String>,

    #[arg(long)]
    image_exterior: Option<PathBuf>,

    #[arg(long)]
    image_lobby: Option<PathBuf>,

    #[arg(long)]
    image_room: Option<PathBuf>,

    /// Logo image; defaults to the brand's logo path
    #[arg(long)]
    logo: Option<PathBuf>,
}

#[derive(Args)]
struct RenderArgs {
    /// Booking request JSON
    #[arg(long)]
    request: PathBuf,

    #[command(flatten)]
    style: StyleArgs,

    /// Output PDF path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct ExtractArgs {
    /// Raw model output containing the booking JSON
    #[arg(long)]
    input: PathBuf,

    /// Raw model output with hotel address, phone and times
    #[arg(long)]
    details: Option<PathBuf>,

    /// Render the normalized request instead of printing it
    #[arg(long, requires = "output")]
    render: bool,

    #[command(flatten)]
    style: StyleArgs,

    /// Output PDF path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Render(args) => render(args),
        Commands::Extract(args) => extract(args),
    }
}

fn render(args: RenderArgs) -> Result<()> {
    let json = read_text(&args.request)?;
    let request: VoucherRequest = serde_json::from_str(&json)
        .with_context(|| format!("Invalid booking request {}", args.request.display()))?;

    let config = load_config(&args.style)?;
    let images = load_images(&args.style, &config)?;
    let output = VoucherRenderer::new(&config, &images).render(&request)?;
    write_output(&output, &args.output)
}

fn extract(args: ExtractArgs) -> Result<()> {
    let raw = read_text(&args.input)?;
    let config = load_config(&args.style)?;
    let images = load_images(&args.style, &config)?;
    let renderer = VoucherRenderer::new(&config, &images);

    let (mut request, mut warnings) = request_from_extraction(&raw, renderer.today());
    if let Some(path) = &args.details {
        let details = parse_hotel_details(&read_text(path)?)
            .with_context(|| format!("Invalid hotel details {}", path.display()))?;
        details.apply_to(&mut request.hotel);
    }

    if !args.render {
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let Some(path) = &args.output else {
        bail!("--render needs an output path");
    };
    let mut output = renderer.render(&request)?;
    warnings.append(&mut output.warnings);
    output.warnings = warnings;
    write_output(&output, path)
}

fn load_config(style: &StyleArgs) -> Result<VoucherConfig> {
    let mut config = match &style.config {
        Some(path) => VoucherConfig::from_json(&read_text(path)?)
            .with_context(|| format!("Invalid config {}", path.display()))?,
        None => VoucherConfig::default(),
    };
    if let Some(name) = &style.brand {
        let preset: BrandPreset = name.parse()?;
        config = config.with_brand(preset.brand());
    }
    Ok(config)
}

fn load_images(style: &StyleArgs, config: &VoucherConfig) -> Result<VoucherImages> {
    let logo = style
        .logo
        .clone()
        .or_else(|| config.brand.logo.as_ref().map(PathBuf::from));

    let mut images = VoucherImages::default();
    for (slot, path) in [
        (ImageSlot::Exterior, &style.image_exterior),
        (ImageSlot::Lobby, &style.image_lobby),
        (ImageSlot::Room, &style.image_room),
        (ImageSlot::Logo, &logo),
    ] {
        if let Some(path) = path {
            let data = fs::read(path)
                .with_context(|| format!("Failed to read {slot} image {}", path.display()))?;
            images.set(slot, Some(data));
        }
    }
    Ok(images)
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_output(output: &VoucherOutput, path: &Path) -> Result<()> {
    fs::write(path, &output.pdf)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(
        path = %path.display(),
        pages = output.pages,
        warnings = output.warnings.len(),
        "voucher written"
    );
    Ok(())
}
