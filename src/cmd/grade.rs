use crate::reports;
use appraiser::catalog::{parse_code, parse_level};
use appraiser::config::Config;
use appraiser::diagram::VehicleDiagram;
use appraiser::error::{AppraisalError, AppraisalResult};
use appraiser::inventory::{Inventory, InventoryRecord};
use appraiser::record::{AppraisalBuilder, EvaluationInput, VehicleSpec};
use appraiser::registry::{Defect, DefectRegistry};
use appraiser::scorer::{InteriorRank, Scorer};
use chrono::{NaiveDate, Utc};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug, Clone)]
pub struct GradeArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(long)]
    pub mileage: u32,

    #[arg(long)]
    pub year: i32,

    #[arg(long, default_value = "A")]
    pub interior: InteriorRank,

    #[arg(long, default_value_t = false)]
    pub repair_history: bool,

    #[arg(long, default_value_t = false)]
    pub exterior_replacement: bool,

    #[arg(long, default_value = "")]
    pub model: String,

    /// `part:code[:level]`, e.g. `hood:A:2`, `windshield:G:crack`, `trunk:XX`.
    #[arg(short, long = "defect")]
    pub defects: Vec<String>,

    /// Evaluation date (YYYY-MM-DD); today when omitted.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Print the record as JSON instead of tables.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Append the result to this inventory file (created if missing).
    #[arg(long)]
    pub save: Option<String>,
}

/// Splits `part:code[:level]` into a part id and a defect.
pub fn parse_defect_arg(s: &str) -> AppraisalResult<(String, Defect)> {
    let mut parts = s.split(':').map(str::trim);
    let (Some(part), Some(code)) = (parts.next(), parts.next()) else {
        return Err(AppraisalError::Config(format!(
            "defect '{}' must look like part:code[:level]",
            s
        )));
    };
    if part.is_empty() {
        return Err(AppraisalError::Config(format!("defect '{}' has no part", s)));
    }

    let code = parse_code(code)?;
    let level = match parts.next() {
        Some(l) if !l.is_empty() => Some(parse_level(l)?),
        _ => code.tap_level(),
    };
    if !code.accepts(level) {
        return Err(AppraisalError::UnknownSeverityLevel(format!(
            "{} does not take level {}",
            code,
            level.map_or("none", |l| l.label())
        )));
    }
    Ok((part.to_string(), Defect::new(code, level)))
}

pub fn run(args: &GradeArgs, config: Config, diagram: VehicleDiagram) -> AppraisalResult<()> {
    let mut registry = DefectRegistry::new(config.registry.part_capacity);
    for raw in &args.defects {
        let (part_id, defect) = parse_defect_arg(raw)?;
        registry.add_defect(&part_id, &diagram.label_for(&part_id), defect)?;
    }

    let input = EvaluationInput::builder()
        .vehicle_spec(VehicleSpec {
            model_name: args.model.clone(),
            year: args.year,
            mileage_km: args.mileage,
            ..Default::default()
        })
        .interior_rank(args.interior)
        .has_repair_history(args.repair_history)
        .has_exterior_replacement(args.exterior_replacement)
        .build();

    let now = match args.date {
        Some(d) => d.and_hms_opt(12, 0, 0).map_or_else(Utc::now, |t| t.and_utc()),
        None => Utc::now(),
    };
    let builder = AppraisalBuilder::new(Scorer::new(config.reference.clone())?);
    let record = builder.build(&input, &registry, now);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        reports::print_evaluation(&record);
        reports::print_defects(&record.defects);
    }

    if let Some(path) = &args.save {
        let mut inventory = if Path::new(path).exists() {
            Inventory::load_from_file(path)?
        } else {
            Inventory::new()
        };
        inventory.upsert(InventoryRecord::from_record(&record));
        inventory.save_to_file(path)?;
    }
    Ok(())
}
