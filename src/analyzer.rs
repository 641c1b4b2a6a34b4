//! Gradient-family analyzers and the model checks they impose.
//!
//! An analyzer only supports graphs whose layers pass its checks. Checks
//! with [`CheckSeverity::Exception`] reject the graph; warnings are logged
//! and reported back.

use std::fmt;

use crate::config::ReachabilityConfig;
use crate::errors::GraphError;
use crate::graph::{ComputationGraph, Node};
use crate::layers::{ActivationKind, LayerKind};
use crate::networks;

/// Gradient-based attribution methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyzerKind {
    Gradient,
    /// Gradient with respect to a baseline input.
    BaselineGradient,
    Deconvnet,
    GuidedBackprop,
    IntegratedGradients,
    SmoothGrad,
}

/// How a failed check is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckSeverity {
    Exception,
    Warning,
}

/// A per-layer condition an analyzer places on the graph.
#[derive(Debug, Clone, Copy)]
pub struct ModelCheck {
    pub description: &'static str,
    pub severity: CheckSeverity,
    violated_by: fn(&Node) -> bool,
}

impl ModelCheck {
    /// Returns the nodes that fail the check, in arena order.
    pub fn violations<'g>(&self, graph: &'g ComputationGraph) -> Vec<&'g Node> {
        graph.nodes().filter(|n| (self.violated_by)(n)).collect()
    }
}

const NO_SOFTMAX: ModelCheck = ModelCheck {
    description: "softmax activation present",
    severity: CheckSeverity::Exception,
    violated_by: |node| node.is_activation(Some(ActivationKind::Softmax)),
};

const CONVNET_ONLY: ModelCheck = ModelCheck {
    description: "layer outside convolutional networks",
    severity: CheckSeverity::Warning,
    violated_by: |node| !node.is_convnet_layer(),
};

const RELU_ONLY: ModelCheck = ModelCheck {
    description: "only defined for ReLU activations",
    severity: CheckSeverity::Exception,
    violated_by: |node| !node.only_pass_through_activation(),
};

impl AnalyzerKind {
    pub const ALL: [AnalyzerKind; 6] = [
        AnalyzerKind::Gradient,
        AnalyzerKind::BaselineGradient,
        AnalyzerKind::Deconvnet,
        AnalyzerKind::GuidedBackprop,
        AnalyzerKind::IntegratedGradients,
        AnalyzerKind::SmoothGrad,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnalyzerKind::Gradient => "gradient",
            AnalyzerKind::BaselineGradient => "gradient.baseline",
            AnalyzerKind::Deconvnet => "deconvnet",
            AnalyzerKind::GuidedBackprop => "guided_backprop",
            AnalyzerKind::IntegratedGradients => "integrated_gradients",
            AnalyzerKind::SmoothGrad => "smoothgrad",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Returns the checks a graph must pass for this analyzer.
    pub fn model_checks(&self) -> Vec<ModelCheck> {
        match self {
            AnalyzerKind::Deconvnet | AnalyzerKind::GuidedBackprop => {
                vec![NO_SOFTMAX, CONVNET_ONLY, RELU_ONLY]
            }
            _ => vec![NO_SOFTMAX, CONVNET_ONLY],
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A warning-level check that found offending layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckWarning {
    pub check: &'static str,
    pub nodes: Vec<String>,
}

/// Runs the analyzer's checks against the graph.
///
/// Returns the first failed exception check as [`GraphError::ModelCheck`];
/// otherwise returns the failed warning checks.
pub fn check_model(
    graph: &ComputationGraph,
    analyzer: AnalyzerKind,
) -> Result<Vec<CheckWarning>, GraphError> {
    let mut warnings = Vec::new();

    for check in analyzer.model_checks() {
        let offending: Vec<String> = check
            .violations(graph)
            .iter()
            .map(|n| n.name().to_string())
            .collect();
        if offending.is_empty() {
            continue;
        }
        match check.severity {
            CheckSeverity::Exception => {
                return Err(GraphError::ModelCheck {
                    analyzer: analyzer.name().to_string(),
                    check: check.description.to_string(),
                    nodes: offending,
                });
            }
            CheckSeverity::Warning => {
                log::warn!(
                    "{}: {} at layers {:?}",
                    analyzer,
                    check.description,
                    offending
                );
                warnings.push(CheckWarning {
                    check: check.description,
                    nodes: offending,
                });
            }
        }
    }

    Ok(warnings)
}

/// Outcome of dry-running an analyzer on one fixture.
#[derive(Debug, Clone)]
pub struct DryRun {
    pub network: &'static str,
    pub kinds: Vec<LayerKind>,
    pub input_reachable: usize,
    pub warnings: Vec<CheckWarning>,
}

/// Dry-runs an analyzer on every fixture matching `patterns`.
///
/// Each fixture has its output softmax stripped, every node classified and
/// walked, and the analyzer's checks evaluated.
pub fn dry_run(analyzer: AnalyzerKind, patterns: &str) -> Result<Vec<DryRun>, GraphError> {
    let config = ReachabilityConfig::default();
    let mut runs = Vec::new();

    for (network, graph) in networks::select(patterns)? {
        let graph = graph.without_softmax();
        let kinds = graph
            .nodes()
            .map(|n| graph.classify(n.id()))
            .collect::<Result<Vec<_>, _>>()?;
        let input_reachable = graph.input_reachable_nodes(&config)?.len();
        let warnings = check_model(&graph, analyzer)?;

        log::info!(
            "{} on {}: {} layers, {} input reachable, {} warning(s)",
            analyzer,
            network,
            kinds.len(),
            input_reachable,
            warnings.len()
        );
        runs.push(DryRun {
            network,
            kinds,
            input_reachable,
            warnings,
        });
    }

    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_names_roundtrip() {
        for analyzer in AnalyzerKind::ALL {
            assert_eq!(AnalyzerKind::from_name(analyzer.name()), Some(analyzer));
        }
        assert_eq!(AnalyzerKind::from_name("lrp.z"), None);
    }

    #[test]
    fn test_relu_check_only_for_deconvnet_family() {
        for analyzer in AnalyzerKind::ALL {
            let has_relu_check = analyzer
                .model_checks()
                .iter()
                .any(|c| c.description == RELU_ONLY.description);
            let expected = matches!(
                analyzer,
                AnalyzerKind::Deconvnet | AnalyzerKind::GuidedBackprop
            );
            assert_eq!(has_relu_check, expected, "{}", analyzer);
        }
    }

    #[test]
    fn test_softmax_rejected() {
        let graph = networks::build("mnist.log_reg").unwrap();
        match check_model(&graph, AnalyzerKind::Gradient) {
            Err(GraphError::ModelCheck { check, nodes, .. }) => {
                assert_eq!(check, NO_SOFTMAX.description);
                assert_eq!(nodes, vec!["output".to_string()]);
            }
            other => panic!("expected softmax rejection, got {:?}", other),
        }
        let stripped = graph.without_softmax();
        assert!(check_model(&stripped, AnalyzerKind::Gradient).unwrap().is_empty());
    }

    #[test]
    fn test_tanh_rejected_by_guided_backprop() {
        let graph = networks::build("trivia.tanh_mlp").unwrap();
        assert!(check_model(&graph, AnalyzerKind::SmoothGrad).is_ok());
        let err = check_model(&graph, AnalyzerKind::GuidedBackprop).unwrap_err();
        match err {
            GraphError::ModelCheck { analyzer, nodes, .. } => {
                assert_eq!(analyzer, "guided_backprop");
                assert_eq!(nodes, vec!["hidden".to_string()]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_nested_network_warns() {
        let graph = networks::build("trivia.nested").unwrap();
        let warnings = check_model(&graph, AnalyzerKind::Deconvnet).unwrap();
        assert_eq!(
            warnings,
            vec![CheckWarning {
                check: CONVNET_ONLY.description,
                nodes: vec!["inner_model".to_string()],
            }]
        );
    }

    #[test]
    fn test_dry_run_counts() {
        let runs = dry_run(AnalyzerKind::Gradient, "mnist.log_reg").unwrap();
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.network, "mnist.log_reg");
        assert_eq!(run.kinds.len(), 3);
        // input, flatten, and the dense layer behind the flatten
        assert_eq!(run.input_reachable, 3);
        assert!(run.warnings.is_empty());
    }
}
