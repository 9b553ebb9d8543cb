use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use drv::{DRV, DRVError, RandVar};

use crate::ModelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DistDescription {
    Constant {
        value: f64,
    },
    Table {
        pairs: Vec<(f64, f64)>,
    },
    Uniform {
        min: f64,
        max: f64,
        bins: usize,
    },
    Normal {
        mean: f64,
        stdev: f64,
        bins: usize,
    },
}

impl DistDescription {
    pub fn to_drv(&self) -> Result<DRV, DRVError> {
        match self {
            DistDescription::Constant { value } => DRV::new_constant(*value),
            DistDescription::Table { pairs } => DRV::from_pairs(pairs.iter().copied()),
            DistDescription::Uniform { min, max, bins } => DRV::new_uniform(*min, *max, *bins),
            DistDescription::Normal { mean, stdev, bins } => DRV::new_normal(*mean, *stdev, *bins),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorDescription {
    name: String,
    dist: DistDescription,
}

impl FactorDescription {
    pub fn new(name: &str, dist: DistDescription) -> Self {
        Self {
            name: String::from(name),
            dist,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_dist(&self) -> &DistDescription {
        &self.dist
    }

    pub fn to_drv(&self) -> Result<DRV, ModelError> {
        self.dist.to_drv().map_err(|source| ModelError::Factor {
            name: self.name.clone(),
            source,
        })
    }
}

/// A model whose value is the product of independent factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    name: String,
    factors: Vec<FactorDescription>,
}

impl ModelDescription {
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            factors: Vec::new(),
        }
    }

    pub fn with_factor(mut self, name: &str, dist: DistDescription) -> Self {
        self.factors.push(FactorDescription::new(name, dist));
        self
    }

    /// The Drake equation with a uniform star formation rate and speculative tables for the rest.
    pub fn reference() -> Self {
        ModelDescription::new("drake")
            // stars formed per year
            .with_factor("R*", DistDescription::Uniform { min: 1.5, max: 3.0, bins: 20 })
            // every star is assumed to have planets
            .with_factor("f_p", DistDescription::Constant { value: 1.0 })
            .with_factor("n_e", DistDescription::Table {
                pairs: vec![(1.0, 0.2), (2.0, 0.2), (3.0, 0.1), (4.0, 0.3), (5.0, 0.2)],
            })
            .with_factor("f_l", DistDescription::Table {
                pairs: vec![(0.1, 0.6), (0.2, 0.4)],
            })
            .with_factor("f_i", DistDescription::Table {
                pairs: vec![(0.1, 0.4), (0.2, 0.4), (0.3, 0.2)],
            })
            .with_factor("f_c", DistDescription::Table {
                pairs: vec![(0.1, 0.2), (0.2, 0.3), (0.3, 0.4), (0.4, 0.1)],
            })
            // years a civilization keeps signalling
            .with_factor("L", DistDescription::Table {
                pairs: vec![(1000.0, 0.1), (10000.0, 0.4), (100000.0, 0.3), (1000000.0, 0.2)],
            })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let file = fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_factors(&self) -> &Vec<FactorDescription> {
        &self.factors
    }

    pub fn build_factors(&self) -> Result<Vec<DRV>, ModelError> {
        self.factors.iter().map(|f| f.to_drv()).collect()
    }

    /// Multiplies every factor together, left to right.
    pub fn evaluate(&self) -> Result<DRV, ModelError> {
        if self.factors.is_empty() {
            return Err(ModelError::NoFactors(self.name.clone()));
        }
        let factors = self.build_factors()?;
        let result = DRV::product(&factors)?;
        info!(model = %self.name, factors = factors.len(), outcomes = result.len(), "evaluated model");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use drv::{DRVError, RandVar};

    use crate::ModelError;
    use crate::serialization::{DistDescription, ModelDescription};

    #[test]
    fn json_test() {
        let model = ModelDescription::reference();
        let model_json = serde_json::to_string_pretty(&model).unwrap();
        let model_copy: ModelDescription = serde_json::from_str(&model_json).unwrap();
        assert_eq!(model, model_copy);
    }

    #[test]
    fn test_reference_file() {
        let model: ModelDescription = serde_json::from_str(include_str!("../models/reference.json")).unwrap();
        assert_eq!(ModelDescription::reference(), model);
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "name": "tiny",
            "factors": [
                {"name": "a", "dist": {"Table": {"pairs": [[1, 0.5], [2, 0.5]]}}},
                {"name": "b", "dist": {"Constant": {"value": 10}}}
            ]
        }"#;
        let model: ModelDescription = serde_json::from_str(json).unwrap();
        assert_eq!("tiny", model.get_name());
        assert_eq!(2, model.get_factors().len());
        assert_eq!("b", model.get_factors()[1].get_name());
        assert_eq!(&DistDescription::Constant { value: 10.0 }, model.get_factors()[1].get_dist());
        let rv = model.evaluate().unwrap();
        assert_eq!(0.5, rv.pdf(10.0));
        assert_eq!(0.5, rv.pdf(20.0));
    }

    #[test]
    fn test_evaluate_reference() {
        let rv = ModelDescription::reference().evaluate().unwrap();
        assert_relative_eq!(9710.870652, rv.expected_value().unwrap(), max_relative = 1e-9);
        assert_relative_eq!(23913.253467931, rv.std_dev().unwrap(), max_relative = 1e-9);
    }

    #[test]
    fn test_errors() {
        let empty = ModelDescription::new("empty");
        assert!(matches!(empty.evaluate(), Err(ModelError::NoFactors(_))));

        let bad = ModelDescription::new("bad")
            .with_factor("ok", DistDescription::Constant { value: 1.0 })
            .with_factor("broken", DistDescription::Normal { mean: 0.0, stdev: -1.0, bins: 10 });
        match bad.evaluate() {
            Err(ModelError::Factor { name, source: DRVError::InvalidParameters(_) }) => assert_eq!("broken", name),
            other => panic!("unexpected result: {:?}", other),
        }

        let zero_times_max = ModelDescription::new("zero")
            .with_factor("zero", DistDescription::Constant { value: 0.0 })
            .with_factor("big", DistDescription::Constant { value: f64::MAX });
        // 0 * MAX is fine, only non-finite products fail
        assert!(zero_times_max.evaluate().is_ok());

        let overflow = ModelDescription::new("overflow")
            .with_factor("a", DistDescription::Constant { value: f64::MAX })
            .with_factor("b", DistDescription::Constant { value: 2.0 });
        assert!(matches!(overflow.evaluate(), Err(ModelError::Evaluation(DRVError::NonFiniteOutcome { .. }))));

        assert!(matches!(ModelDescription::from_file("no/such/model.json"), Err(ModelError::Io(_))));
    }
}
