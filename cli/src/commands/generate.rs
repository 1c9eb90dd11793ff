use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use brushmap::{
    ApplyOutcome, DepotParams, GraphqlClient, LayerName, MapQuery, MapSync, MapView, SurfaceLog,
    TessellationParams,
};

use crate::cli::{Cli, DepotsArgs, JobArgs, TessellateArgs};
use crate::io::{layer_path, write_file};

pub fn tessellate(cli: &Cli, args: &TessellateArgs) -> Result<()> {
    let params = TessellationParams { target_area_acres: args.target_area, max_iterations: args.max_iterations };
    let (mut view, mut sync, client) = setup(cli, &args.job)?;

    eprintln!("[tessellate] target area {} acres, {} iterations", params.target_area_acres, params.max_iterations);
    let outcome = sync.generate_tessellation(&mut view, &client, &params)?;
    write_layer(&view, LayerName::VoronoiCells, outcome, args.output.as_deref(), args.force)
}

pub fn depots(cli: &Cli, args: &DepotsArgs) -> Result<()> {
    let params = DepotParams { depot_radius: args.depot_radius, grid_density: args.grid_density };
    let (mut view, mut sync, client) = setup(cli, &args.job)?;

    eprintln!("[depots] radius {}m, grid density {}", params.depot_radius, params.grid_density);
    let outcome = sync.generate_depots(&mut view, &client, &params)?;
    write_layer(&view, LayerName::DepotPoints, outcome, args.output.as_deref(), args.force)
}

fn setup(cli: &Cli, job: &JobArgs) -> Result<(MapView<SurfaceLog>, MapSync, GraphqlClient)> {
    let client = GraphqlClient::new(&cli.client_config())?;
    let sync = MapSync::new(MapQuery::new(&job.location, &job.job, Vec::new()));
    Ok((MapView::new(SurfaceLog::default()), sync, client))
}

fn write_layer(
    view: &MapView<SurfaceLog>,
    name: LayerName,
    outcome: ApplyOutcome,
    output: Option<&Path>,
    force: bool,
) -> Result<()> {
    let ApplyOutcome::Replaced { count } = outcome else {
        bail!("server returned a layer this client does not know");
    };
    let path: PathBuf = output.map(Path::to_path_buf).unwrap_or_else(|| layer_path(Path::new("."), name.as_str()));
    let collection = view.registry().export_layer(&name)
        .with_context(|| format!("no {name} layer after generation"))?;
    write_file(&path, &collection.to_geojson_string()?, force)?;
    println!("{name}: {count} features -> {}", path.display());
    Ok(())
}
