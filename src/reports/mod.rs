use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use appraiser::record::AppraisalRecord;
use appraiser::registry::DefectRegistry;
use appraiser::scorer::AppraisalGrade;

pub struct AuditRow {
    pub id: String,
    pub model: String,
    pub stored: Option<AppraisalGrade>,
    pub recomputed: Option<AppraisalGrade>,
    pub max_grade: Option<AppraisalGrade>,
    pub defects: usize,
}

impl AuditRow {
    pub fn drifted(&self) -> bool {
        matches!((self.stored, self.recomputed), (Some(a), Some(b)) if a != b)
    }
}

fn grade_cell(grade: Option<AppraisalGrade>) -> Cell {
    match grade {
        Some(AppraisalGrade::R) => Cell::new("R").fg(Color::Red),
        Some(g) => Cell::new(g.to_string()),
        None => Cell::new("-"),
    }
}

pub fn print_evaluation(record: &AppraisalRecord) {
    let b = &record.breakdown;
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Vehicle").add_attribute(Attribute::Bold),
        Cell::new("Km"),
        Cell::new("Months"),
        Cell::new("Int"),
        Cell::new("Max"),
        Cell::new("Deduct").fg(Color::Red),
        Cell::new("Grade").add_attribute(Attribute::Bold),
        Cell::new("Ref").fg(Color::Cyan),
    ]);

    for i in 1..=7 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    let name = if record.vehicle_spec.model_name.is_empty() {
        record.vehicle_spec.year.to_string()
    } else {
        format!(
            "{} {}",
            record.vehicle_spec.model_name, record.vehicle_spec.year
        )
    };
    table.add_row(vec![
        Cell::new(name).add_attribute(Attribute::Bold),
        Cell::new(record.vehicle_spec.mileage_km),
        Cell::new(b.elapsed_months),
        Cell::new(record.interior_rank),
        grade_cell(Some(record.max_grade)),
        Cell::new(format!("{:.1}", b.deduction)).fg(Color::Red),
        grade_cell(Some(record.computed_grade)).add_attribute(Attribute::Bold),
        Cell::new(record.reference_score).fg(Color::Cyan),
    ]);
    println!("\n{}", table);
}

pub fn print_defects(registry: &DefectRegistry) {
    if registry.is_empty() {
        println!("No defects recorded.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Part").add_attribute(Attribute::Bold),
        Cell::new("Defects"),
        Cell::new("Points"),
    ]);
    if let Some(col) = table.column_mut(2) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    for entry in registry.entries() {
        let codes: Vec<String> = entry.defects.iter().map(|d| d.notation()).collect();
        let points: f32 = entry.defects.iter().map(|d| d.weighted_cost()).sum();
        table.add_row(vec![
            Cell::new(&entry.part_label),
            Cell::new(codes.join(" ")),
            Cell::new(format!("{:.2}", points)),
        ]);
    }
    println!("{}", table);
}

pub fn print_audit(rows: &[AuditRow]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Id").add_attribute(Attribute::Bold),
        Cell::new("Model"),
        Cell::new("Defects"),
        Cell::new("Stored"),
        Cell::new("Max"),
        Cell::new("Now").add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);

    for r in rows {
        let flag = if r.drifted() {
            Cell::new("DRIFT").fg(Color::Yellow)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            Cell::new(&r.id),
            Cell::new(&r.model),
            Cell::new(r.defects).set_alignment(CellAlignment::Right),
            grade_cell(r.stored),
            grade_cell(r.max_grade),
            grade_cell(r.recomputed),
            flag,
        ]);
    }
    println!("\n{}", table);
}
