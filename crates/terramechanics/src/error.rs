use thiserror::Error;

/// Construction-time and configuration failures.
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("unknown soil preset: {0}")]
    UnknownPreset(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// In-loop numerical breakdown. Never fatal: the caller substitutes a
/// fallback (zero stress, zero integral, or the current best estimate).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum NumericDegeneracy {
    #[error("negative sinkage base {base} at angle {angle} rad")]
    NegativeSinkageBase { angle: f64, base: f64 },

    #[error("rear arc span {span} rad is not positive")]
    CollapsedRearArc { span: f64 },

    #[error("contact arc of width {width} rad yields zero integration steps")]
    ZeroStepCount { width: f64 },

    #[error("contact arc of width {width} rad needs {steps} steps, limit is {limit}")]
    StepCountExceeded { width: f64, steps: usize, limit: usize },

    #[error("line search bracket collapsed ({lower}, {inner}, {upper})")]
    ZeroBracketWidth { lower: f64, inner: f64, upper: f64 },

    #[error("interpolating parabola has no vertex (curvature {curvature})")]
    FlatParabola { curvature: f64 },

    #[error("vertical load does not respond to the entry angle over ({lower}, {upper}), residual {residual} N")]
    FlatObjective { lower: f64, upper: f64, residual: f64 },
}
