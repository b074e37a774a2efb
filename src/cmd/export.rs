use appraiser::diagram::VehicleDiagram;
use appraiser::error::AppraisalResult;
use appraiser::inventory::Inventory;
use clap::Args;
use std::fs::File;
use std::io;

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Inventory JSON file.
    pub inventory: String,

    /// CSV destination; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<String>,
}

pub fn run(args: &ExportArgs, diagram: VehicleDiagram) -> AppraisalResult<()> {
    let mut inventory = Inventory::load_from_file(&args.inventory)?;
    inventory.migrate_all(&diagram);

    match &args.output {
        Some(path) => inventory.export_csv(File::create(path)?),
        None => inventory.export_csv(io::stdout().lock()),
    }
}
