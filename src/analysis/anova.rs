//! One-way ANOVA across the groups of a chosen column.

use std::collections::BTreeMap;

use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::data::model::{CellValue, Dataset};
use crate::error::{AnalysisError, AnalysisResult};

/// Size and mean of one group's pooled sample.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub label: String,
    pub n: usize,
    pub mean: f64,
}

/// Outcome of the last ANOVA run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnovaResult {
    pub group_column: String,
    pub groups: Vec<GroupSummary>,
    pub f_value: f64,
    pub p_value: f64,
}

/// Split rows by the distinct non-null values of column `group_idx` (sorted)
/// and pool, row by row, every numeric cell of each group into one sample.
///
/// All numeric columns share the sample, the grouping column included when
/// it is numeric itself.  Gaps are skipped.
pub fn pooled_samples(dataset: &Dataset, group_idx: usize) -> BTreeMap<&CellValue, Vec<f64>> {
    let numeric = dataset.numeric_indices();
    let mut groups: BTreeMap<&CellValue, Vec<f64>> = BTreeMap::new();

    for row in &dataset.rows {
        let key = &row[group_idx];
        if key.is_null() {
            continue;
        }
        let sample = groups.entry(key).or_default();
        sample.extend(numeric.iter().filter_map(|&i| row[i].as_f64()));
    }
    groups
}

/// Run the F-test grouping by `group`.
pub fn one_way(dataset: &Dataset, group: &str) -> AnalysisResult<AnovaResult> {
    let group_idx = dataset
        .column_index(group)
        .ok_or_else(|| AnalysisError::ColumnNotFound(group.to_string()))?;

    let groups = pooled_samples(dataset, group_idx);
    if groups.len() < 2 {
        return Err(AnalysisError::TooFewGroups(groups.len()));
    }
    if let Some((key, _)) = groups.iter().find(|(_, s)| s.is_empty()) {
        return Err(AnalysisError::EmptyGroup(key.to_string()));
    }

    let samples: Vec<&[f64]> = groups.values().map(Vec::as_slice).collect();
    let (f_value, p_value) = f_oneway(&samples)?;

    let summaries = groups
        .iter()
        .map(|(key, sample)| GroupSummary {
            label: key.to_string(),
            n: sample.len(),
            mean: sample.iter().sum::<f64>() / sample.len() as f64,
        })
        .collect();

    Ok(AnovaResult {
        group_column: group.to_string(),
        groups: summaries,
        f_value,
        p_value,
    })
}

/// Classic one-way F-test.  Returns `(F, p)`.
///
/// Every sample must be non-empty.  When all within-group variation is zero
/// but the means differ, `F` is infinite and `p` is zero.
pub fn f_oneway(samples: &[&[f64]]) -> AnalysisResult<(f64, f64)> {
    let k = samples.len();
    if k < 2 {
        return Err(AnalysisError::TooFewGroups(k));
    }
    let n_total: usize = samples.iter().map(|s| s.len()).sum();
    if n_total <= k {
        return Err(AnalysisError::InsufficientData {
            rows: n_total,
            needed: k + 1,
        });
    }

    let grand_mean = samples.iter().flat_map(|s| s.iter()).sum::<f64>() / n_total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for s in samples {
        let mean = s.iter().sum::<f64>() / s.len() as f64;
        ss_between += s.len() as f64 * (mean - grand_mean).powi(2);
        ss_within += s.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    }

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;

    if ss_within == 0.0 {
        if ss_between == 0.0 {
            return Err(AnalysisError::DegenerateInput);
        }
        return Ok((f64::INFINITY, 0.0));
    }

    let f = (ss_between / df_between) / (ss_within / df_within);
    let dist = FisherSnedecor::new(df_between, df_within)
        .map_err(|e| AnalysisError::Numerical(e.to_string()))?;
    Ok((f, dist.sf(f)))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, Normal};

    use super::*;
    use crate::data::loader::load_csv_reader;

    fn draw(rng: &mut StdRng, mean: f64, n: usize) -> Vec<f64> {
        let normal = Normal::new(mean, 1.0).unwrap();
        (0..n).map(|_| normal.sample(rng)).collect()
    }

    #[test]
    fn known_f_value() {
        let (f, p) = f_oneway(&[&[1.0, 2.0, 3.0][..], &[4.0, 5.0, 6.0][..]]).unwrap();
        assert!((f - 13.5).abs() < 1e-12);
        // Equivalent to a two-sided t-test with t = sqrt(13.5), 4 df.
        assert!(p > 0.015 && p < 0.03, "p = {p}");
    }

    #[test]
    fn identical_distributions_rarely_reject() {
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 200;
        let not_small = (0..trials)
            .filter(|_| {
                let a = draw(&mut rng, 0.0, 30);
                let b = draw(&mut rng, 0.0, 30);
                let c = draw(&mut rng, 0.0, 30);
                let (_, p) = f_oneway(&[a.as_slice(), b.as_slice(), c.as_slice()]).unwrap();
                p > 0.05
            })
            .count();
        assert!(not_small >= 170, "only {not_small}/{trials} draws had p > 0.05");
    }

    #[test]
    fn separated_means_reject() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let a = draw(&mut rng, 0.0, 20);
            let b = draw(&mut rng, 10.0, 20);
            let (f, p) = f_oneway(&[a.as_slice(), b.as_slice()]).unwrap();
            assert!(f > 10.0);
            assert!(p < 0.01);
        }
    }

    #[test]
    fn groups_by_text_column() {
        let ds = load_csv_reader("team,score\nred,1\nblue,10\nred,2\nblue,11\nred,3\nblue,12\n".as_bytes())
            .unwrap();
        let result = one_way(&ds, "team").unwrap();
        assert_eq!(result.group_column, "team");
        // Groups come out sorted.
        let labels: Vec<&str> = result.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["blue", "red"]);
        assert_eq!(result.groups[0].mean, 11.0);
        assert!(result.p_value < 0.01);
    }

    #[test]
    fn pooled_sample_flattens_numeric_columns_row_by_row() {
        // Values of different numeric columns end up in one sample per group.
        // This mirrors the dashboard's established behaviour rather than a
        // per-column test.
        let ds = load_csv_reader("g,a,b\nx,1,10\nx,2,20\ny,3,30\n".as_bytes()).unwrap();
        let groups = pooled_samples(&ds, 0);
        let x = groups.get(&CellValue::Text("x".into())).unwrap();
        assert_eq!(x, &vec![1.0, 10.0, 2.0, 20.0]);
    }

    #[test]
    fn numeric_grouping_column_joins_its_own_sample() {
        let ds = load_csv_reader("g,v\n1,5\n1,6\n2,7\n".as_bytes()).unwrap();
        let groups = pooled_samples(&ds, 0);
        assert_eq!(groups.get(&CellValue::Integer(1)).unwrap(), &vec![1.0, 5.0, 1.0, 6.0]);
    }

    #[test]
    fn null_keys_are_dropped() {
        let ds = load_csv_reader("g,v\na,1\n,2\nb,3\n".as_bytes()).unwrap();
        let groups = pooled_samples(&ds, 0);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn failure_modes() {
        let single = load_csv_reader("g,v\na,1\na,2\n".as_bytes()).unwrap();
        assert!(matches!(one_way(&single, "g"), Err(AnalysisError::TooFewGroups(1))));

        let empty = load_csv_reader("g,label\na,x\nb,y\n".as_bytes()).unwrap();
        assert!(matches!(one_way(&empty, "g"), Err(AnalysisError::EmptyGroup(_))));

        let singletons = load_csv_reader("g,v\na,1\nb,2\n".as_bytes()).unwrap();
        assert!(matches!(
            one_way(&singletons, "g"),
            Err(AnalysisError::InsufficientData { .. })
        ));

        let constant = load_csv_reader("g,v\na,1\na,1\nb,1\nb,1\n".as_bytes()).unwrap();
        assert!(matches!(one_way(&constant, "g"), Err(AnalysisError::DegenerateInput)));
    }

    #[test]
    fn zero_within_variance_gives_infinite_f() {
        let (f, p) = f_oneway(&[&[1.0, 1.0][..], &[2.0, 2.0][..]]).unwrap();
        assert!(f.is_infinite());
        assert_eq!(p, 0.0);
    }
}
