use anyhow::{Context, Result};
use clap::Args;
use geoipmap::MapGeometry;
use tracing_subscriber::EnvFilter;

/// Map geometry flags shared by every command that projects
#[derive(Args, Debug, Clone)]
pub struct GeometryArgs {
    /// Width in pixels of the map image
    #[arg(short = 'W', long, default_value_t = 2058)]
    pub width: u32,

    /// Height in pixels of the map image
    #[arg(short = 'H', long, default_value_t = 1746)]
    pub height: u32,

    /// Degrees most to the left in the image
    #[arg(short = 'l', long, default_value_t = -180.0, allow_negative_numbers = true)]
    pub left: f64,

    /// Degrees most to the right in the image
    #[arg(short = 'r', long, default_value_t = 180.0, allow_negative_numbers = true)]
    pub right: f64,

    /// Degrees most to the bottom in the image
    #[arg(short = 'b', long, default_value_t = -82.0, allow_negative_numbers = true)]
    pub bottom: f64,
}

impl GeometryArgs {
    /// Validate into a library geometry
    pub fn to_geometry(&self) -> Result<MapGeometry> {
        MapGeometry::builder(self.width, self.height)
            .west_deg(self.left)
            .east_deg(self.right)
            .south_deg(self.bottom)
            .build()
            .context("Invalid map geometry")
    }
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins over the verbosity count when set.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("geoipmap={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_geometry_args_validate() {
        let args = GeometryArgs {
            width: 0,
            height: 1746,
            left: -180.0,
            right: 180.0,
            bottom: -82.0,
        };
        assert!(args.to_geometry().is_err());

        let args = GeometryArgs { width: 2058, ..args };
        let geometry = args.to_geometry().unwrap();
        assert_eq!(geometry.south_deg(), -82.0);
    }
}
