use crate::reports::{self, AuditRow};
use appraiser::config::Config;
use appraiser::diagram::VehicleDiagram;
use appraiser::error::AppraisalResult;
use appraiser::inventory::Inventory;
use appraiser::scorer::Scorer;
use chrono::{NaiveDate, Utc};
use clap::Args;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    #[command(flatten)]
    pub config: Config,

    /// Inventory JSON file.
    pub inventory: String,

    /// Re-score as of this date (YYYY-MM-DD); today when omitted.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Write migrated records back to the inventory file.
    #[arg(long, default_value_t = false)]
    pub write: bool,
}

pub fn run(args: &AuditArgs, config: Config, diagram: VehicleDiagram) -> AppraisalResult<()> {
    let mut inventory = Inventory::load_from_file(&args.inventory)?;
    let migrated = inventory.migrate_all(&diagram);

    let scorer = Scorer::new(config.reference.clone())?;
    let today = args.date.unwrap_or_else(|| Utc::now().date_naive());

    let rows: Vec<AuditRow> = inventory
        .records()
        .iter()
        .map(|r| {
            let fresh = r.rescore(&scorer, today);
            if fresh.is_none() {
                warn!("Record '{}' has no interior rank; not re-scored", r.id);
            }
            AuditRow {
                id: r.id.clone(),
                model: r.evaluation.vehicle_spec.model_name.clone(),
                stored: r.evaluation.overall_grade,
                recomputed: fresh.as_ref().map(|e| e.grade),
                max_grade: fresh.as_ref().map(|e| e.max_grade),
                defects: r.part_defects.total_defect_count(),
            }
        })
        .collect();

    reports::print_audit(&rows);
    println!(
        "{} records, {} migrated, {} drifted",
        rows.len(),
        migrated,
        rows.iter().filter(|r| r.drifted()).count()
    );

    if args.write && migrated > 0 {
        inventory.save_to_file(&args.inventory)?;
    }
    Ok(())
}
