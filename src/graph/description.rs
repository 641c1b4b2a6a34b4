//! Building graphs from model descriptions.
//!
//! A model adapter describes each layer by name, class, inbound layer names,
//! kernel presence and activation. [`GraphDescription`] is the JSON form of
//! such a description.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::GraphError;
use crate::layers::{ActivationKind, LayerKind};

use super::builder::GraphBuilder;
use super::core::ComputationGraph;
use super::node::LayerSpec;

/// One layer as reported by a model description.
#[derive(Debug, Clone, PartialEq)]
pub struct DescribedLayer<'a> {
    pub name: &'a str,
    pub kind: LayerKind,
    /// Names of the producing layers, in consumption order.
    pub producers: Vec<&'a str>,
    pub has_kernel: bool,
    pub activation: Option<ActivationKind>,
}

/// Source of layer descriptions a graph can be built from.
pub trait ModelDescription {
    /// Enumerates all layers, in any order.
    fn layers(&self) -> Vec<DescribedLayer<'_>>;
}

/// Serialized description of a single layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescription {
    pub name: String,
    /// Framework class name, e.g. `"Conv2D"` or `"Flatten"`.
    pub class_name: String,
    #[serde(default)]
    pub inbound: Vec<String>,
    #[serde(default)]
    pub has_kernel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<ActivationKind>,
}

/// Serialized description of a whole model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDescription {
    pub layers: Vec<LayerDescription>,
}

impl GraphDescription {
    /// Parses a description from JSON.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the description to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ModelDescription for GraphDescription {
    fn layers(&self) -> Vec<DescribedLayer<'_>> {
        self.layers
            .iter()
            .map(|layer| DescribedLayer {
                name: &layer.name,
                kind: LayerKind::from_class_name(&layer.class_name, layer.activation),
                producers: layer.inbound.iter().map(String::as_str).collect(),
                has_kernel: layer.has_kernel,
                activation: layer.activation,
            })
            .collect()
    }
}

impl ComputationGraph {
    /// Builds a graph from a model description.
    ///
    /// Layer names must be unique and every inbound name must refer to a
    /// described layer.
    pub fn from_description<D: ModelDescription + ?Sized>(
        description: &D,
    ) -> Result<ComputationGraph, GraphError> {
        let layers = description.layers();
        let mut builder = GraphBuilder::new();
        let mut ids = HashMap::with_capacity(layers.len());

        for layer in &layers {
            let spec = LayerSpec {
                name: layer.name.to_string(),
                kind: layer.kind,
                has_kernel: layer.has_kernel,
                activation: layer.activation,
            };
            let id = builder.add(spec);
            if ids.insert(layer.name, id).is_some() {
                return Err(GraphError::Description {
                    message: format!("duplicate layer name '{}'", layer.name),
                });
            }
        }

        for layer in &layers {
            let consumer = ids[layer.name];
            for producer in &layer.producers {
                let Some(&producer_id) = ids.get(producer) else {
                    return Err(GraphError::Description {
                        message: format!(
                            "layer '{}' reads from unknown layer '{}'",
                            layer.name, producer
                        ),
                    });
                };
                builder.connect(consumer, producer_id);
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IntegrityError;
    use crate::layers::{ConvKind, PassThroughKind, PoolingKind};

    const CNN_JSON: &str = r#"{
        "layers": [
            {"name": "dense_out", "class_name": "Dense", "inbound": ["flatten"],
             "has_kernel": true, "activation": "softmax"},
            {"name": "input", "class_name": "InputLayer"},
            {"name": "conv", "class_name": "Conv2D", "inbound": ["input"],
             "has_kernel": true, "activation": "relu"},
            {"name": "pool", "class_name": "MaxPooling2D", "inbound": ["conv"]},
            {"name": "flatten", "class_name": "Flatten", "inbound": ["pool"]}
        ]
    }"#;

    #[test]
    fn test_graph_from_json() {
        let description = GraphDescription::from_json(CNN_JSON).unwrap();
        let graph = ComputationGraph::from_description(&description).unwrap();
        assert_eq!(graph.len(), 5);

        let conv = graph.find("conv").unwrap();
        let flatten = graph.find("flatten").unwrap();
        let out = graph.find("dense_out").unwrap();
        assert_eq!(
            graph.classify(conv).unwrap(),
            LayerKind::Convolutional(ConvKind::Conv2D)
        );
        assert_eq!(
            graph.classify(flatten).unwrap(),
            LayerKind::PassThrough(PassThroughKind::Flatten)
        );
        assert_eq!(
            graph.classify(graph.find("pool").unwrap()).unwrap(),
            LayerKind::Pooling(PoolingKind::Max)
        );
        assert!(graph.node(conv).unwrap().has_kernel());
        assert!(graph.is_input_reachable(conv, true).unwrap());
        assert!(!graph.is_input_reachable(out, true).unwrap());
        assert_eq!(graph.outputs(), vec![out]);
    }

    #[test]
    fn test_json_roundtrip_preserves_description() {
        let description = GraphDescription::from_json(CNN_JSON).unwrap();
        let json = description.to_json().unwrap();
        assert!(!json.contains("\"activation\": null"));
        assert_eq!(GraphDescription::from_json(&json).unwrap(), description);
    }

    #[test]
    fn test_unknown_inbound_name() {
        let json = r#"{"layers": [{"name": "d", "class_name": "Dense", "inbound": ["ghost"]}]}"#;
        let description = GraphDescription::from_json(json).unwrap();
        let err = ComputationGraph::from_description(&description).unwrap_err();
        assert!(matches!(err, GraphError::Description { .. }));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_duplicate_layer_name() {
        let json = r#"{"layers": [
            {"name": "x", "class_name": "InputLayer"},
            {"name": "x", "class_name": "Dense", "inbound": ["x"]}
        ]}"#;
        let description = GraphDescription::from_json(json).unwrap();
        let err = ComputationGraph::from_description(&description).unwrap_err();
        assert!(matches!(err, GraphError::Description { .. }));
    }

    #[test]
    fn test_cyclic_description_rejected() {
        let json = r#"{"layers": [
            {"name": "x", "class_name": "InputLayer"},
            {"name": "a", "class_name": "Dense", "inbound": ["x", "b"]},
            {"name": "b", "class_name": "Dense", "inbound": ["a"]}
        ]}"#;
        let description = GraphDescription::from_json(json).unwrap();
        let err = ComputationGraph::from_description(&description).unwrap_err();
        assert!(matches!(
            err,
            GraphError::Integrity(IntegrityError::Cycle { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = GraphDescription::from_json("{\"layers\": 3}").unwrap_err();
        assert!(matches!(err, GraphError::Serialization(_)));
    }

    struct Chain(Vec<(&'static str, LayerKind)>);

    impl ModelDescription for Chain {
        fn layers(&self) -> Vec<DescribedLayer<'_>> {
            self.0
                .iter()
                .enumerate()
                .map(|(i, (name, kind))| DescribedLayer {
                    name,
                    kind: *kind,
                    producers: if i == 0 { vec![] } else { vec![self.0[i - 1].0] },
                    has_kernel: false,
                    activation: None,
                })
                .collect()
        }
    }

    #[test]
    fn test_custom_description_adapter() {
        let chain = Chain(vec![
            ("x", LayerKind::Input),
            ("r", LayerKind::PassThrough(PassThroughKind::Reshape)),
            ("d", LayerKind::Dense),
        ]);
        let graph = ComputationGraph::from_description(&chain).unwrap();
        let d = graph.find("d").unwrap();
        assert!(graph.is_input_reachable(d, true).unwrap());
    }
}
