use std::path::PathBuf;

use anyhow::{Context, Result};
use brushmap::{GraphqlClient, MapSync, MapView, SurfaceLog};
use tracing::info;

use crate::io::{layer_path, write_file};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::FetchArgs) -> Result<()> {
    let out_dir: PathBuf = args.output.clone().unwrap_or(".".into());
    let client = GraphqlClient::new(&cli.client_config())?;

    let mut view = MapView::new(SurfaceLog::default());
    let mut sync = MapSync::new(args.query());
    let report = sync.fetch(&mut view, &client)
        .with_context(|| format!("fetch layers from {}", client.endpoint()))?;

    for name in &report.skipped {
        eprintln!("[fetch] skipped layer {name}");
    }
    for (name, count) in &report.applied {
        let collection = view.registry().export_layer(name)
            .with_context(|| format!("layer {name} disappeared after apply"))?;
        let path = layer_path(&out_dir, name.as_str());
        write_file(&path, &collection.to_geojson_string()?, args.force)?;
        info!(layer = %name, features = count, path = %path.display(), "layer written");
        println!("{name}: {count} features -> {}", path.display());
    }
    Ok(())
}
