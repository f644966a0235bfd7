use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "lightlab")]
#[command(about = "A 2D optical ray tracing sandbox")]
pub struct Args {
    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Field width in world units
    #[arg(long, default_value = "1400", help = "Field width in world units")]
    pub width: u32,

    /// Field height in world units
    #[arg(long, default_value = "900", help = "Field height in world units")]
    pub height: u32,

    /// Laser wavelength in nanometers
    #[arg(short = 'w', long, default_value = "650", help = "Laser wavelength in nanometers")]
    pub wavelength: f64,

    /// Emit a white-light sweep (ten rays over 400-700 nm) instead of a single wavelength
    #[arg(long, help = "Emit a white-light sweep (ten rays over 400-700 nm) instead of a single wavelength")]
    pub white: bool,

    /// Number of beams
    #[arg(short = 'b', long, default_value = "1", help = "Number of beams")]
    pub beam_count: u32,

    /// Angular spread between beams in degrees (0 emits parallel beams)
    #[arg(long, default_value = "0", help = "Angular spread between beams in degrees (0 emits parallel beams)")]
    pub spread: f64,

    /// Laser angle in degrees
    #[arg(short = 'a', long, default_value = "0", help = "Laser angle in degrees")]
    pub angle: f64,

    /// Ambient medium (vacuum, air, water, glass, flint, diamond, acrylic, oil)
    #[arg(long, default_value = "air", help = "Ambient medium (vacuum, air, water, glass, flint, diamond, acrylic, oil)")]
    pub env: String,

    /// Start with an empty field instead of the default prism/block/lens setup
    #[arg(long, help = "Start with an empty field instead of the default prism/block/lens setup")]
    pub empty: bool,

    /// Output file path for the rendered frame
    #[arg(short, long, default_value = "lightlab.png", help = "Output file path for the rendered frame")]
    pub output: String,
}
