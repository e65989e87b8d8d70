#![deny(unsafe_code)]

//! Feed-forward network exported from the training notebook.
//!
//! Each layer stores its kernel as `inputs x units` (the layout Keras uses for
//! `Dense`), so `out[j] = activation(bias[j] + sum_i x[i] * weights[i][j])`.

use churn_model::{ChurnError, Classifier};
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => sigmoid(x),
            Activation::Tanh => x.tanh(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Activation::Linear => "linear",
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
        }
    }
}

/// Numerically stable logistic function.
fn sigmoid(x: f64) -> f64 {
    let clamped = x.clamp(-500.0, 500.0);
    if clamped >= 0.0 {
        1.0 / (1.0 + (-clamped).exp())
    } else {
        let e = clamped.exp();
        e / (1.0 + e)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    pub fn inputs(&self) -> usize {
        self.weights.len()
    }

    pub fn units(&self) -> usize {
        self.bias.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut out = self.bias.clone();
        for (x, row) in input.iter().zip(&self.weights) {
            for (acc, w) in out.iter_mut().zip(row) {
                *acc += x * w;
            }
        }
        for value in &mut out {
            *value = self.activation.apply(*value);
        }
        out
    }
}

/// A binary classifier: stacked dense layers ending in a single unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseNetwork {
    input_dim: usize,
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    pub fn new(input_dim: usize, layers: Vec<DenseLayer>) -> Result<Self, ArtifactError> {
        let network = Self { input_dim, layers };
        network
            .check()
            .map_err(|message| ArtifactError::invalid("classifier", message))?;
        Ok(network)
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        if self.input_dim == 0 {
            return Err("input_dim must be positive".to_string());
        }
        if self.layers.is_empty() {
            return Err("network has no layers".to_string());
        }
        let mut width = self.input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.inputs() != width {
                return Err(format!(
                    "layer {idx} expects {} inputs but receives {width}",
                    layer.inputs()
                ));
            }
            if layer.units() == 0 {
                return Err(format!("layer {idx} has no units"));
            }
            if let Some(row) = layer.weights.iter().find(|row| row.len() != layer.units()) {
                return Err(format!(
                    "layer {idx} has a weight row of width {} but {} biases",
                    row.len(),
                    layer.units()
                ));
            }
            let finite = layer.bias.iter().all(|b| b.is_finite())
                && layer.weights.iter().flatten().all(|w| w.is_finite());
            if !finite {
                return Err(format!("layer {idx} contains non-finite parameters"));
            }
            width = layer.units();
        }
        if width != 1 {
            return Err(format!("final layer must have 1 unit, found {width}"));
        }
        Ok(())
    }
}

impl Classifier for DenseNetwork {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn predict(&self, scaled: &[f64]) -> churn_model::Result<f64> {
        if scaled.len() != self.input_dim {
            return Err(ChurnError::prediction_failure(format!(
                "classifier expects {} inputs, got {}",
                self.input_dim,
                scaled.len()
            )));
        }
        let mut activations = scaled.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }
        activations
            .first()
            .copied()
            .ok_or_else(|| ChurnError::prediction_failure("classifier produced no output"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logistic(weights: &[f64], bias: f64) -> DenseNetwork {
        DenseNetwork::new(
            weights.len(),
            vec![DenseLayer {
                weights: weights.iter().map(|w| vec![*w]).collect(),
                bias: vec![bias],
                activation: Activation::Sigmoid,
            }],
        )
        .unwrap()
    }

    #[test]
    fn zero_logit_is_one_half() {
        let net = logistic(&[0.0, 0.0], 0.0);
        assert_eq!(net.predict(&[3.0, -7.0]).unwrap(), 0.5);
    }

    #[test]
    fn hidden_relu_layer_feeds_output() {
        let net = DenseNetwork::new(
            2,
            vec![
                DenseLayer {
                    weights: vec![vec![1.0, -1.0], vec![1.0, -1.0]],
                    bias: vec![0.0, 0.0],
                    activation: Activation::Relu,
                },
                DenseLayer {
                    weights: vec![vec![1.0], vec![1.0]],
                    bias: vec![0.0],
                    activation: Activation::Linear,
                },
            ],
        )
        .unwrap();
        // relu(2) + relu(-2)
        assert_eq!(net.predict(&[1.0, 1.0]).unwrap(), 2.0);
    }

    #[test]
    fn sigmoid_saturates_without_overflow() {
        assert_eq!(sigmoid(1e6), 1.0);
        let low = sigmoid(-1e6);
        assert!(low >= 0.0 && low < 1e-200);
    }

    #[test]
    fn wrong_input_width_is_prediction_failure() {
        let net = logistic(&[1.0, 1.0], 0.0);
        let err = net.predict(&[1.0]).unwrap_err();
        assert!(matches!(err, ChurnError::PredictionFailure { .. }));
    }

    #[test]
    fn mismatched_layer_shapes_are_rejected() {
        let err = DenseNetwork::new(
            3,
            vec![DenseLayer {
                weights: vec![vec![1.0], vec![1.0]],
                bias: vec![0.0],
                activation: Activation::Sigmoid,
            }],
        )
        .unwrap_err();
        assert!(err.to_string().contains("expects 2 inputs but receives 3"));
    }

    #[test]
    fn multi_unit_output_is_rejected() {
        let err = DenseNetwork::new(
            1,
            vec![DenseLayer {
                weights: vec![vec![1.0, 1.0]],
                bias: vec![0.0, 0.0],
                activation: Activation::Sigmoid,
            }],
        )
        .unwrap_err();
        assert!(err.to_string().contains("final layer must have 1 unit"));
    }
}
