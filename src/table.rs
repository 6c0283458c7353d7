use std::collections::BTreeMap;

use neji::search::format_ratio;
use neji::{ApproximationRecord, BestFitTable};

const HEADER: &str = "degree         ratio           cents         error";

fn format_row(record: &ApproximationRecord) -> String {
    format!(
        "{:>6}  {:>12}  {:>14.6}  {:>+12.6}",
        record.degree,
        format_ratio(&record.ratio),
        record.cents,
        record.error
    )
}

/// One column-aligned line per selected degree.
pub fn format_table(table: &BestFitTable) -> String {
    let mut ret = String::new();
    ret.push_str(HEADER);
    ret.push('\n');

    for record in table.records() {
        ret.push_str(&format_row(record));
        ret.push('\n');
    }

    ret
}

/// Every evaluated candidate, numbered in evaluation order.
pub fn format_all(all: &BTreeMap<usize, Vec<ApproximationRecord>>) -> String {
    let mut ret = String::new();
    ret.push_str(&format!("{:>8}  {}\n", "#", HEADER));

    for (i, record) in all.values().flatten().enumerate() {
        ret.push_str(&format!("{:>8}  {}\n", i, format_row(record)));
    }

    ret
}
