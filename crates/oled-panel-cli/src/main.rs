//! OLED Panel Control Tool
//!
//! CLI for drawing on an SSD1306 panel over I2C, or into a PNG preview.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use oled_panel_gfx::{Font, Graphics, Justify};
use oled_panel_hw::{ByteChannel, Display, Geometry, MockChannel, PixelBuffer, Ssd1306};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum CliJustify {
    /// Flush left, top
    #[default]
    Left,
    /// Centered in the panel
    Center,
    /// Flush right
    Right,
}

impl From<CliJustify> for Justify {
    fn from(justify: CliJustify) -> Self {
        match justify {
            CliJustify::Left => Justify::Left,
            CliJustify::Center => Justify::Center,
            CliJustify::Right => Justify::Right,
        }
    }
}

#[derive(Parser)]
#[command(name = "oledpanelctl")]
#[command(about = "Draw on SSD1306 OLED panels")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Font asset (JSON), overrides the configured font
    #[arg(long)]
    font: Option<PathBuf>,

    /// Render into a PNG file instead of the panel
    #[arg(long)]
    preview: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn every pixel off
    Clear,
    /// Turn every pixel on
    Fill,
    /// Blank the panel and release the bus
    Off,
    /// Set a single pixel
    Pixel {
        x: i32,
        y: i32,
        /// Turn the pixel off instead of on
        #[arg(long)]
        off: bool,
    },
    /// Draw a line between two points
    Line { x0: i32, y0: i32, x1: i32, y1: i32 },
    /// Draw a rectangle between two opposite corners
    Rect {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        /// Fill the rectangle
        #[arg(long)]
        fill: bool,
    },
    /// Draw a circle
    Circle {
        cx: i32,
        cy: i32,
        radius: i32,
        /// Fill the circle
        #[arg(long)]
        fill: bool,
    },
    /// Draw a line of text (requires a font)
    Text {
        text: String,
        /// Cursor x position
        #[arg(long, default_value = "0")]
        x: i32,
        /// Baseline y position
        #[arg(long, default_value = "0")]
        y: i32,
        /// Position the text inside the panel instead of at --x/--y
        #[arg(long, value_enum)]
        justify: Option<CliJustify>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load_or_default(&cli.config).context("Failed to load configuration")?;
    let geometry = config.panel.geometry()?;

    let font = match cli.font.clone().or_else(|| config.font.clone().map(PathBuf::from)) {
        Some(path) => Some(load_font(&path)?),
        None => None,
    };

    if let Some(output) = &cli.preview {
        let mut panel = build_panel::<MockChannel>(&config, geometry);
        panel.open(MockChannel::new())?;
        run(&mut panel, font.as_ref(), &cli.command)?;
        write_png(output, panel.buffer())?;
        println!("Preview saved to: {}", output.display());
        return Ok(());
    }

    open_and_run(&config, geometry, font.as_ref(), &cli.command)
}

#[cfg(target_os = "linux")]
fn open_and_run(
    config: &Config,
    geometry: Geometry,
    font: Option<&Font>,
    command: &Commands,
) -> Result<()> {
    use oled_panel_hw::I2cChannel;

    let channel = I2cChannel::open(config.channel.bus, config.channel.address)
        .context("Failed to open I2C channel")?;
    let mut panel = build_panel::<I2cChannel>(config, geometry);
    panel.open(channel).context("Failed to initialize panel")?;
    run(&mut panel, font, command)
}

#[cfg(not(target_os = "linux"))]
fn open_and_run(
    _config: &Config,
    _geometry: Geometry,
    _font: Option<&Font>,
    _command: &Commands,
) -> Result<()> {
    anyhow::bail!("I2C output is only supported on Linux; use --preview")
}

fn build_panel<C: ByteChannel>(config: &Config, geometry: Geometry) -> Ssd1306<C> {
    match &config.panel.init_sequence {
        Some(payload) => Ssd1306::with_init_sequence(geometry, payload.clone()),
        None => Ssd1306::new(geometry),
    }
}

fn load_font(path: &Path) -> Result<Font> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read font {}", path.display()))?;
    let font: Font = serde_json::from_str(&content).context("Failed to parse font")?;
    info!(
        "Loaded font {} ({} glyphs)",
        path.display(),
        font.glyphs.len()
    );
    Ok(font)
}

fn run<D: Display>(display: &mut D, font: Option<&Font>, command: &Commands) -> Result<()> {
    let (width, height) = (display.width(), display.height());
    let mut gfx = Graphics::new(display);
    if let Some(font) = font {
        gfx.set_font(font);
    }

    match command {
        Commands::Clear => gfx.clear(),
        Commands::Fill => gfx.fill(true),
        Commands::Off => {
            gfx.destroy()?;
            return Ok(());
        }
        Commands::Pixel { x, y, off } => gfx.set_pixel(*x, *y, !off),
        Commands::Line { x0, y0, x1, y1 } => gfx.draw_line(*x0, *y0, *x1, *y1, true),
        Commands::Rect {
            x0,
            y0,
            x1,
            y1,
            fill,
        } => gfx.draw_rect(*x0, *y0, *x1, *y1, true, *fill),
        Commands::Circle {
            cx,
            cy,
            radius,
            fill,
        } => gfx.draw_circle(*cx, *cy, *radius, true, *fill),
        Commands::Text {
            text,
            x,
            y,
            justify,
        } => {
            let (x, y) = match justify {
                Some(justify) => {
                    let bounds = gfx.string_bounds(text)?;
                    let pos = gfx.justification_pos(&bounds, (*justify).into(), width, height);
                    // Horizontal offset comes back in `y`, baseline in `x`.
                    (pos.y, pos.x)
                }
                None => (*x, *y),
            };
            gfx.write_string(text, x, y, true)?;
        }
    }

    gfx.flush().context("Failed to update panel")
}

fn write_png(path: &Path, buffer: &PixelBuffer) -> Result<()> {
    let geometry = buffer.geometry();
    let file = std::fs::File::create(path).context("Failed to create preview file")?;
    let mut encoder = png::Encoder::new(
        std::io::BufWriter::new(file),
        geometry.width(),
        geometry.height(),
    );
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&buffer.to_luma8())?;
    Ok(())
}
