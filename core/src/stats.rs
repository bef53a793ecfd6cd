//! Small numeric building blocks shared by the aggregators.
//!
//! Missing observations are skipped by every accumulator, so an
//! accumulator that saw only missing values reports `None`.

/// `numerator / denominator`, or `None` when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || denominator.is_nan() || numerator.is_nan() {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Bound a value from above. `None` passes through.
pub fn clip_upper(value: Option<f64>, cap: f64) -> Option<f64> {
    value.map(|v| v.min(cap))
}

/// Sum that skips missing values. An all-missing sum is 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum {
    total: f64,
}

impl Sum {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| !v.is_nan()) {
            self.total += v;
        }
    }

    pub fn value(&self) -> f64 {
        self.total
    }
}

/// Arithmetic mean that skips missing values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean {
    total: f64,
    count: u64,
}

impl Mean {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| !v.is_nan()) {
            self.total += v;
            self.count += 1;
        }
    }

    pub fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}

/// Minimum, maximum and mean over one stream of observations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extremes {
    min:  Option<f64>,
    max:  Option<f64>,
    mean: Mean,
}

impl Extremes {
    pub fn push(&mut self, value: Option<f64>) {
        let Some(v) = value.filter(|v| !v.is_nan()) else {
            return;
        };
        self.min = Some(self.min.map_or(v, |m| m.min(v)));
        self.max = Some(self.max.map_or(v, |m| m.max(v)));
        self.mean.push(Some(v));
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn mean(&self) -> Option<f64> {
        self.mean.value()
    }
}
