use std::path::PathBuf;
use std::time::Duration;

use brushmap::{ClientConfig, LayerName, MapQuery, ENDPOINT_ENV};

/// Mission-planner map layer sync
#[derive(clap::Parser, Debug)]
#[command(name = "brushmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// GraphQL endpoint, defaults to $BRUSHMAP_API_URL or http://localhost:8000/graphql
    #[arg(long, env = ENDPOINT_ENV, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Client settings from the environment, overridden by command-line flags.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.api_url {
            config = config.with_endpoint(url.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Download layers for a location/job into GeoJSON files
    Fetch(FetchArgs),

    /// Upload edited GeoJSON layer files for a location/job
    Save(SaveArgs),

    /// Run server-side tessellation and write the resulting cells
    Tessellate(TessellateArgs),

    /// Run server-side depot placement and write the resulting depots
    Depots(DepotsArgs),
}

#[derive(clap::Args, Debug)]
pub struct JobArgs {
    /// Location identifier
    pub location: String,

    /// Job identifier
    pub job: String,
}

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Layers to request, defaults to every known layer
    #[arg(short, long, value_delimiter = ',')]
    pub layers: Vec<String>,

    /// Output directory, defaults to "."
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Overwrite existing layer files
    #[arg(long)]
    pub force: bool,
}

impl FetchArgs {
    pub fn query(&self) -> MapQuery {
        MapQuery::new(&self.job.location, &self.job.job, layer_names(&self.layers))
    }
}

#[derive(clap::Args, Debug)]
pub struct SaveArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Directory of `<layer>.geojson` files
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub input: PathBuf,

    /// Layers to save, defaults to every file found in the input directory
    #[arg(short, long, value_delimiter = ',')]
    pub layers: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct TessellateArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Target cell area in acres
    #[arg(long, default_value_t = 0.5)]
    pub target_area: f64,

    /// Maximum relaxation iterations
    #[arg(long, default_value_t = 15)]
    pub max_iterations: u32,

    /// Output file, defaults to "./voronoi_cells.geojson"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Overwrite the output file
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct DepotsArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Depot coverage radius in meters
    #[arg(long, default_value_t = 225.0)]
    pub depot_radius: f64,

    /// Candidate points per cell
    #[arg(long, default_value_t = 4)]
    pub grid_density: u32,

    /// Output file, defaults to "./depot_points.geojson"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Overwrite the output file
    #[arg(long)]
    pub force: bool,
}

/// Parse user-supplied layer names; an empty list means every known layer.
pub fn layer_names(raw: &[String]) -> Vec<LayerName> {
    if raw.is_empty() {
        return LayerName::KNOWN.to_vec();
    }
    raw.iter().map(|s| LayerName::parse(s.trim())).collect()
}
