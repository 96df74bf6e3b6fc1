/// Analysis layer: read-only computations over a [`Dataset`].
///
/// ```text
///   Dataset ──┬── describe   → DescriptiveStats   (shown, exported)
///             ├── histogram  → Histogram          (session chart)
///             ├── regression → RegressionResult   (session result)
///             └── anova      → AnovaResult        (session result)
/// ```
///
/// [`Dataset`]: crate::data::model::Dataset

pub mod anova;
pub mod describe;
pub mod histogram;
pub mod regression;
