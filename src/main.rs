//! # qrlogo CLI
//!
//! Command-line interface for generating QR codes with a logo.
//!
//! ## Usage
//!
//! ```bash
//! # Generate qrcode-<millis>.png in the current directory
//! qrlogo generate https://example.com --logo logo.png
//!
//! # Bigger logo, higher error correction, custom output directory
//! qrlogo generate https://example.com --logo logo.png \
//!     --logo-width 80 --logo-height 80 --ec-level H --out-dir out/
//!
//! # Serve the browser form
//! qrlogo serve --listen 0.0.0.0:8080
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use qrcode::EcLevel;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use qrlogo::{
    QrLogoError, QrStyle, export,
    form::{FormState, LogoAxis},
    render,
    server::{self, ServerConfig},
};

/// qrlogo - QR code generator with logo overlay
#[derive(Parser, Debug)]
#[command(name = "qrlogo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// QR error correction level.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum EcLevelArg {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

impl From<EcLevelArg> for EcLevel {
    fn from(level: EcLevelArg) -> Self {
        match level {
            EcLevelArg::L => EcLevel::L,
            EcLevelArg::M => EcLevel::M,
            EcLevelArg::Q => EcLevel::Q,
            EcLevelArg::H => EcLevel::H,
        }
    }
}

/// Rendering options shared by both commands.
#[derive(clap::Args, Debug)]
struct StyleArgs {
    /// Error correction level
    #[arg(long, value_enum, ignore_case = true, default_value_t = EcLevelArg::M)]
    ec_level: EcLevelArg,

    /// Quiet zone around the code, in pixels
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(0..=1000))]
    quiet_zone: u32,

    /// Module color as #rrggbb
    #[arg(long, default_value = "#000000")]
    dark: String,

    /// Background color as #rrggbb
    #[arg(long, default_value = "#ffffff")]
    light: String,

    /// Logo opacity (0.0 to 1.0)
    #[arg(long, default_value = "1.0")]
    logo_opacity: f32,

    /// Paint modules under the logo with the background color
    #[arg(long)]
    clear_behind_logo: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a QR code PNG
    Generate {
        /// Text or URL to encode
        text: String,

        /// Logo image (PNG or JPEG, under 1 MiB)
        #[arg(long, value_name = "FILE")]
        logo: Option<PathBuf>,

        /// Logo width slider value (stored as value * 1.2)
        #[arg(long)]
        logo_width: Option<f64>,

        /// Logo height slider value (stored as value * 1.2)
        #[arg(long)]
        logo_height: Option<f64>,

        /// Directory to write qrcode-<millis>.png into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Serve the QR generator form over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// Minutes an idle session is kept (at most a week)
        #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..=10_080))]
        session_minutes: u64,

        #[command(flatten)]
        style: StyleArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), QrLogoError> {
    let runtime = tokio::runtime::Runtime::new()?;

    match command {
        Commands::Generate {
            text,
            logo,
            logo_width,
            logo_height,
            out_dir,
            style,
        } => {
            let style = style.to_style()?;
            let mut form = FormState::new();
            form.set_text(text);

            if let Some(path) = logo {
                runtime.block_on(form.select_file_from_path(&path))?;
            }
            if let Some(raw) = logo_width {
                form.set_logo_scale(LogoAxis::Width, raw);
            }
            if let Some(raw) = logo_height {
                form.set_logo_scale(LogoAxis::Height, raw);
            }

            // Generation clears the decode error, so grab it first.
            if let Some(e) = form.file_error() {
                eprintln!("Warning: {} Generating without the logo.", e);
            }
            if let Err(e) = form.validate_and_render() {
                return Err(QrLogoError::InvalidInput(e.to_string()));
            }

            let download = export::download(&form, &style, chrono::Utc::now())?;
            let path = download.save_into(&out_dir)?;
            println!("Saved to {}", path.display());
        }
        Commands::Serve {
            listen,
            session_minutes,
            style,
        } => {
            let session_expiration = session_minutes
                .checked_mul(60)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    QrLogoError::InvalidInput(format!("--session-minutes {} is too large", session_minutes))
                })?;
            let config = ServerConfig {
                listen_addr: listen,
                session_expiration,
                style: style.to_style()?,
            };
            runtime.block_on(server::serve(config))?;
        }
    }

    Ok(())
}

impl StyleArgs {
    fn to_style(&self) -> Result<QrStyle, QrLogoError> {
        let color = |s: &str| {
            render::parse_color(s)
                .ok_or_else(|| QrLogoError::InvalidInput(format!("invalid color '{}'", s)))
        };

        Ok(QrStyle {
            quiet_zone: self.quiet_zone,
            ec_level: self.ec_level.into(),
            dark: color(&self.dark)?,
            light: color(&self.light)?,
            logo_opacity: self.logo_opacity,
            clear_behind_logo: self.clear_behind_logo,
        })
    }
}
