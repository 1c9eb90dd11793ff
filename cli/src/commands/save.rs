use anyhow::{bail, Result};
use brushmap::{GraphqlClient, LayerName, LogAlert, MapSync, MapView, SaveStatus, SurfaceLog};
use tracing::warn;

use crate::cli::layer_names;
use crate::io::read_layer_files;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::SaveArgs) -> Result<()> {
    let mut view = MapView::new(SurfaceLog::default());
    let mut found = Vec::new();

    for (stem, contents) in read_layer_files(&args.input)? {
        let name = LayerName::parse(&stem);
        if !name.is_known() {
            view.register(name.clone());
        }
        if let Err(err) = view.apply(&name, &contents) {
            warn!(layer = %name, "unreadable layer file skipped: {err:#}");
            continue;
        }
        found.push(name);
    }

    let layers = if args.layers.is_empty() { found } else { layer_names(&args.layers) };
    let client = GraphqlClient::new(&cli.client_config())?;
    let mut sync = MapSync::new(brushmap::MapQuery::new(&args.job.location, &args.job.job, layers.clone()));

    let status = sync.save(&view, &client, &LogAlert, &args.job.location, &args.job.job, &layers);
    let message = status.message().unwrap_or_default();
    match status {
        SaveStatus::PartialFailure(_) | SaveStatus::Failed(_) => bail!(message),
        _ => println!("{message}"),
    }
    Ok(())
}
