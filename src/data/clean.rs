use std::collections::HashSet;

use super::model::{CellValue, Dataset};

/// What a cleaning pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanReport {
    pub duplicates_removed: usize,
    pub values_filled: usize,
}

/// Drop exact duplicate rows (first occurrence wins, order preserved), then
/// fill gaps in numeric columns with the column mean of the deduplicated
/// rows.
///
/// Integer columns never hold gaps (a gap makes the column float at
/// ingestion), so filling never changes a column's kind.  Non-numeric gaps
/// are left as they are.  A numeric column without any value has no mean and
/// stays empty.
///
/// Deduplication runs before filling, so a filled row can come out equal to
/// an earlier one; a second pass then removes it.  Otherwise a second pass
/// changes nothing.
pub fn clean(dataset: &Dataset) -> (Dataset, CleanReport) {
    let mut seen: HashSet<&Vec<CellValue>> = HashSet::with_capacity(dataset.len());
    let mut rows: Vec<Vec<CellValue>> = dataset
        .rows
        .iter()
        .filter(|row| seen.insert(*row))
        .cloned()
        .collect();

    let mut report = CleanReport {
        duplicates_removed: dataset.len() - rows.len(),
        values_filled: 0,
    };

    for idx in dataset.numeric_indices() {
        let (sum, n) = rows
            .iter()
            .filter_map(|r| r[idx].as_f64())
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if n == 0 {
            continue;
        }
        let mean = sum / n as f64;

        let mut filled = 0;
        for row in rows.iter_mut().filter(|r| r[idx].is_null()) {
            row[idx] = CellValue::Float(mean);
            filled += 1;
        }
        report.values_filled += filled;
    }

    let cleaned = Dataset {
        columns: dataset.columns.clone(),
        rows,
    };
    (cleaned, report)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::loader::load_csv_reader;

    fn load(text: &str) -> Dataset {
        load_csv_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn four_row_scenario() {
        // One duplicate row and one gap.
        let ds = load("a,b\n1,10\n1,10\n2,\n3,30\n");
        let (cleaned, report) = clean(&ds);

        assert_eq!(cleaned.len(), 3);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.values_filled, 1);
        // Mean of the remaining b values: (10 + 30) / 2.
        assert_eq!(cleaned.rows[1][1], CellValue::Float(20.0));
        assert_eq!(cleaned.rows[0][0], CellValue::Integer(1));
    }

    #[test]
    fn mean_is_taken_after_deduplication() {
        // With the duplicate the mean would be (10+10+10+40)/4 = 17.5.
        let ds = load("k,v\nx,10\nx,10\nx,10\ny,40\nz,\n");
        let (cleaned, _) = clean(&ds);
        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned.rows[2][1], CellValue::Float(25.0));
    }

    #[test]
    fn text_gaps_are_untouched() {
        let ds = load("label,v\n,1\nb,\nb,3\n");
        let (cleaned, _) = clean(&ds);
        assert!(cleaned.rows[0][0].is_null());
        assert_eq!(cleaned.rows[1][1], CellValue::Float(2.0));
    }

    #[test]
    fn all_null_numeric_column_stays_null() {
        let ds = load("a,empty\n1,\n2,\n");
        let (cleaned, report) = clean(&ds);
        assert_eq!(report.values_filled, 0);
        assert!(cleaned.rows.iter().all(|r| r[1].is_null()));
    }

    #[test]
    fn second_pass_removes_rows_that_filling_made_equal() {
        // b's mean is 2, so the gap fills to (1, 2.0), a copy of row one.
        let ds = load("a,b\n1,2\n1,\n3,2\n");
        let (once, first) = clean(&ds);
        assert_eq!(first, CleanReport { duplicates_removed: 0, values_filled: 1 });
        assert_eq!(once.rows[0], once.rows[1]);

        let (twice, second) = clean(&once);
        assert_eq!(second, CleanReport { duplicates_removed: 1, values_filled: 0 });
        assert_eq!(twice.len(), 2);
    }

    #[test]
    fn nan_spellings_do_not_poison_the_mean() {
        let ds = load("a\n1\n-nan\n3\nNAN\n");
        let (cleaned, report) = clean(&ds);
        assert_eq!(report.values_filled, 2);
        let values: Vec<CellValue> = cleaned.column_cells(0).cloned().collect();
        assert_eq!(
            values,
            vec![
                CellValue::Float(1.0),
                CellValue::Float(2.0),
                CellValue::Float(3.0),
                CellValue::Float(2.0),
            ]
        );
        assert!(cleaned.numeric_values(0).iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn signed_zero_rows_are_duplicates() {
        let ds = load("a,k\n0.0,x\n-0.0,x\n");
        let (cleaned, report) = clean(&ds);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let ds = load("g,x,y\na,1,\nb,2,5\na,1,\nc,,7\nb,2,5\n,4,1\n");
        let (once, _) = clean(&ds);
        let (twice, report) = clean(&once);
        assert_eq!(once, twice);
        assert_eq!(report, CleanReport::default());
    }

    #[test]
    fn distinct_rows_and_text_values_survive() {
        let ds = load("name,score\nann,1\nbob,\ncid,3\nann,1\n,4\n");
        let distinct_rows: HashSet<&Vec<CellValue>> = ds.rows.iter().collect();
        let text_values = |d: &Dataset| -> BTreeSet<CellValue> {
            d.column_cells(0).filter(|c| !c.is_null()).cloned().collect()
        };

        let (cleaned, _) = clean(&ds);
        assert_eq!(cleaned.len(), distinct_rows.len());
        assert_eq!(text_values(&cleaned), text_values(&ds));
    }
}
