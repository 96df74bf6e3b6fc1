//! Ordinary least squares of one target against every other numeric column.

use nalgebra::{DMatrix, DVector};

use crate::data::model::Dataset;
use crate::error::{AnalysisError, AnalysisResult};

/// In-sample fit quality of the last regression.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionResult {
    pub target: String,
    pub features: Vec<String>,
    pub r_squared: f64,
    pub n_observations: usize,
}

/// Fit `target ~ intercept + all other numeric columns` and report R².
///
/// # Errors
/// * `NotNumeric` / `ColumnNotFound` for a bad target
/// * `NoFeatures` when the target is the only numeric column
/// * `InsufficientData` for fewer than two rows
/// * `MissingValues` when target or a feature still has gaps
pub fn fit(dataset: &Dataset, target: &str) -> AnalysisResult<RegressionResult> {
    let target_idx = dataset
        .column_index(target)
        .ok_or_else(|| AnalysisError::ColumnNotFound(target.to_string()))?;
    if !dataset.columns[target_idx].kind.is_numeric() {
        return Err(AnalysisError::NotNumeric(target.to_string()));
    }

    let feature_idx: Vec<usize> = dataset
        .numeric_indices()
        .into_iter()
        .filter(|&i| i != target_idx)
        .collect();
    if feature_idx.is_empty() {
        return Err(AnalysisError::NoFeatures {
            target: target.to_string(),
        });
    }
    if dataset.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            rows: dataset.len(),
            needed: 2,
        });
    }

    let y = complete_column(dataset, target_idx)?;
    let x = feature_idx
        .iter()
        .map(|&i| complete_column(dataset, i))
        .collect::<AnalysisResult<Vec<_>>>()?;

    Ok(RegressionResult {
        target: target.to_string(),
        features: feature_idx
            .iter()
            .map(|&i| dataset.columns[i].name.clone())
            .collect(),
        r_squared: ols_r_squared(&y, &x)?,
        n_observations: y.len(),
    })
}

fn complete_column(dataset: &Dataset, idx: usize) -> AnalysisResult<Vec<f64>> {
    dataset
        .numeric_values(idx)
        .into_iter()
        .map(|v| v.filter(|f| f.is_finite()))
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| AnalysisError::MissingValues(dataset.columns[idx].name.clone()))
}

/// R² of an OLS fit with intercept.
///
/// `x` is column-major: one `Vec` per feature, each as long as `y`.  The
/// intercept is handled by centring; the centred system is solved through
/// the SVD so collinear features still produce the minimum-norm solution.
pub fn ols_r_squared(y: &[f64], x: &[Vec<f64>]) -> AnalysisResult<f64> {
    let n = y.len();
    let p = x.len();

    let mean = |v: &[f64]| v.iter().sum::<f64>() / n as f64;
    let x_means: Vec<f64> = x.iter().map(|col| mean(col.as_slice())).collect();
    let y_mean = mean(y);

    let xc = DMatrix::from_fn(n, p, |i, j| x[j][i] - x_means[j]);
    let yc = DVector::from_fn(n, |i, _| y[i] - y_mean);

    let svd = xc.clone().svd(true, true);
    let max_sv = svd.singular_values.max();
    let eps = max_sv * n.max(p) as f64 * f64::EPSILON;
    let beta = svd
        .solve(&yc, eps)
        .map_err(|e| AnalysisError::Numerical(e.to_string()))?;

    let residuals = &yc - &xc * &beta;
    let ss_res = residuals.norm_squared();
    let ss_tot = yc.norm_squared();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_reader;

    fn load(text: &str) -> Dataset {
        load_csv_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn perfect_linear_relationship() {
        let ds = load("x,y\n1,2\n2,4\n3,6\n4,8\n5,10\n");
        let result = fit(&ds, "y").unwrap();
        assert!((result.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(result.features, vec!["x"]);
        assert_eq!(result.n_observations, 5);
    }

    #[test]
    fn intercept_is_fitted() {
        // y = 3 - 0.5x exactly; without an intercept R² would fall short.
        let ds = load("y,x\n2.5,1\n2,2\n1.5,3\n1,4\n");
        let result = fit(&ds, "y").unwrap();
        assert!((result.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn noisy_fit_matches_closed_form() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![1.0, 3.0, 2.0, 5.0, 4.0];
        // r = 0.8 for this sample, so R² = 0.64
        let r2 = ols_r_squared(&y, &[x]).unwrap();
        assert!((r2 - 0.64).abs() < 1e-9);
    }

    #[test]
    fn collinear_features_still_fit() {
        let ds = load("a,b,y\n1,2,3\n2,4,5\n3,6,8\n4,8,9\n");
        let result = fit(&ds, "y").unwrap();
        assert_eq!(result.features, vec!["a", "b"]);
        assert!(result.r_squared > 0.9 && result.r_squared <= 1.0 + 1e-12);
    }

    #[test]
    fn text_columns_are_not_features() {
        let ds = load("label,x,y\nq,1,2\nr,2,4\ns,3,7\n");
        let result = fit(&ds, "y").unwrap();
        assert_eq!(result.features, vec!["x"]);
    }

    #[test]
    fn validation_errors() {
        let only_target = load("y,label\n1,a\n2,b\n");
        assert!(matches!(fit(&only_target, "y"), Err(AnalysisError::NoFeatures { .. })));
        assert!(matches!(fit(&only_target, "label"), Err(AnalysisError::NotNumeric(_))));

        let one_row = load("x,y\n1,2\n");
        assert!(matches!(
            fit(&one_row, "y"),
            Err(AnalysisError::InsufficientData { rows: 1, .. })
        ));

        let gaps = load("x,y\n1,2\n,4\n3,6\n");
        assert!(matches!(fit(&gaps, "y"), Err(AnalysisError::MissingValues(c)) if c == "x"));
    }

    #[test]
    fn constant_target_is_a_perfect_fit() {
        let r2 = ols_r_squared(&[4.0, 4.0, 4.0], &[vec![1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(r2, 1.0);
    }
}
