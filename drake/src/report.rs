use rand::Rng;

use drv::{DRV, DRVError, RandVar};

use crate::ModelError;
use crate::serialization::ModelDescription;

/// Sampled draws binned into equal-width bins, each bin holding the fraction of draws that fell in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    lower_bound: f64,
    width: f64,
    probs: Vec<f64>,
}

impl Histogram {
    /// Bins span `[min, max]` of the samples; the last bin is closed on the right.
    /// Returns `None` when there are no samples or no bins.
    pub fn from_samples(samples: &[f64], bins: usize) -> Option<Self> {
        if samples.is_empty() || bins == 0 {
            return None;
        }
        let lb = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let ub = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let width = (ub - lb) / bins as f64;
        let mut counts = vec![0usize; bins];
        for x in samples {
            let i = if width > 0.0 {
                (((x - lb) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[i] += 1;
        }
        let trials = samples.len() as f64;
        Some(Self {
            lower_bound: lb,
            width,
            probs: counts.into_iter().map(|c| c as f64 / trials).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// `(bin start, bin end, probability)` for each bin.
    pub fn bins(&self) -> Vec<(f64, f64, f64)> {
        self.probs.iter().enumerate().map(|(i, p)| {
            let start = self.lower_bound + i as f64 * self.width;
            (start, start + self.width, *p)
        }).collect()
    }

    pub fn print(&self) {
        println!("bin\tprobability");
        for (start, end, p) in self.bins() {
            println!("[{:.3}, {:.3}):\t{}", start, end, round_to(p, 8));
        }
    }
}

fn round_to(x: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    // adding zero turns -0 into 0
    (x * scale).round() / scale + 0.0
}

/// One line per outcome, `outcome : probability`, in ascending outcome order.
/// Outcomes are rounded to integers and probabilities to 8 places; with
/// `cumulative` the running total is appended in parentheses.
pub fn format_table(rv: &DRV, cumulative: bool) -> String {
    let mut result = String::new();
    for ((k, p), (_, total)) in rv.outcomes().zip(rv.cumulative()) {
        result += &format!("{} : {}", round_to(k, 0), round_to(p, 8));
        if cumulative {
            result += &format!("\t({})", round_to(total, 8));
        }
        result.push('\n');
    }
    result
}

#[derive(Debug, Clone)]
pub struct ModelReport {
    name: String,
    num_factors: usize,
    expected_value: f64,
    std_dev: f64,
    result: DRV,
    histogram: Option<Histogram>,
}

impl ModelReport {
    pub fn evaluate(model: &ModelDescription) -> Result<Self, ModelError> {
        let result = model.evaluate()?;
        Ok(Self {
            name: String::from(model.get_name()),
            num_factors: model.get_factors().len(),
            expected_value: result.expected_value()?,
            std_dev: result.std_dev()?,
            result,
            histogram: None,
        })
    }

    /// Draws `trials` samples of the result and bins them.
    pub fn with_samples<R: Rng>(mut self, rng: &mut R, trials: usize, bins: usize) -> Result<Self, DRVError> {
        let samples = self.result.sample_n(rng, trials)?;
        self.histogram = Histogram::from_samples(&samples, bins);
        Ok(self)
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_expected_value(&self) -> f64 {
        self.expected_value
    }

    pub fn get_std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn get_result(&self) -> &DRV {
        &self.result
    }

    pub fn get_histogram(&self) -> Option<&Histogram> {
        self.histogram.as_ref()
    }

    pub fn describe(&self) {
        println!("Model: {} ({} factors)", self.name, self.num_factors);
        println!("Distinct outcomes: {}", self.result.len());
        println!("Expected value: {}", self.expected_value);
        println!("Standard deviation: {}", self.std_dev);
        if let Some(histogram) = &self.histogram {
            println!();
            histogram.print();
        }
    }

    pub fn print_table(&self, cumulative: bool) {
        print!("{}", format_table(&self.result, cumulative));
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use drv::{create_rng, DRV};

    use crate::report::{format_table, Histogram, ModelReport};
    use crate::serialization::{DistDescription, ModelDescription};

    #[test]
    fn test_histogram() {
        let samples = [0.0, 1.0, 1.5, 2.0, 3.9, 4.0];
        let hist = Histogram::from_samples(&samples, 4).unwrap();
        assert_eq!(4, hist.len());
        assert!(!hist.is_empty());
        let bins = hist.bins();
        assert_eq!((0.0, 1.0), (bins[0].0, bins[0].1));
        assert_eq!((3.0, 4.0), (bins[3].0, bins[3].1));
        let probs: Vec<f64> = bins.iter().map(|b| b.2).collect();
        assert_eq!(vec![1.0 / 6.0, 2.0 / 6.0, 1.0 / 6.0, 2.0 / 6.0], probs);

        let same = Histogram::from_samples(&[2.0, 2.0], 3).unwrap();
        assert_eq!(vec![1.0, 0.0, 0.0], same.bins().iter().map(|b| b.2).collect::<Vec<f64>>());

        assert_eq!(None, Histogram::from_samples(&[], 3));
        assert_eq!(None, Histogram::from_samples(&[1.0], 0));
    }

    #[test]
    fn test_format_table() {
        let rv = DRV::from_pairs([(2.6, 0.25), (-0.2, 0.5), (1000.0, 0.25)]).unwrap();
        assert_eq!("0 : 0.5\n3 : 0.25\n1000 : 0.25\n", format_table(&rv, false));
        assert_eq!("0 : 0.5\t(0.5)\n3 : 0.25\t(0.75)\n1000 : 0.25\t(1)\n", format_table(&rv, true));

        let third = DRV::from_pairs([(1.0, 1.0 / 3.0), (2.0, 2.0 / 3.0)]).unwrap();
        assert_eq!("1 : 0.33333333\n2 : 0.66666667\n", format_table(&third, false));
    }

    #[test]
    fn test_report() {
        let report = ModelReport::evaluate(&ModelDescription::reference()).unwrap();
        assert_eq!("drake", report.get_name());
        assert_relative_eq!(9710.870652, report.get_expected_value(), max_relative = 1e-9);
        assert_relative_eq!(23913.253467931, report.get_std_dev(), max_relative = 1e-9);
        assert!(report.get_histogram().is_none());

        let mut rng = create_rng(2024);
        let report = report.with_samples(&mut rng, 100, 20).unwrap();
        let hist = report.get_histogram().unwrap();
        assert_eq!(20, hist.len());
        assert_abs_diff_eq!(1.0, hist.bins().iter().map(|b| b.2).sum::<f64>(), epsilon = 1e-12);
        for (start, _, p) in hist.bins() {
            if p > 0.0 {
                assert!(start >= 0.0);
            }
        }
    }

    #[test]
    fn test_report_zero_trials() {
        let model = ModelDescription::new("coin")
            .with_factor("coin", DistDescription::Table { pairs: vec![(0.0, 0.5), (1.0, 0.5)] });
        let report = ModelReport::evaluate(&model).unwrap()
            .with_samples(&mut create_rng(5), 0, 10)
            .unwrap();
        assert!(report.get_histogram().is_none());
        assert_eq!(0.5, report.get_expected_value());
        assert_eq!(0.5, report.get_std_dev());
    }
}
