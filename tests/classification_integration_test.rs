//! Integration tests driving graph classification through the public API.

use std::thread;

use attrgraph::analyzer::{AnalyzerKind, check_model, dry_run};
use attrgraph::graph::{ComputationGraph, GraphBuilder, GraphDescription, LayerSpec};
use attrgraph::layers::{
    ActivationKind, ConvKind, LayerKind, MergeKind, PassThroughKind, PoolingKind,
};
use attrgraph::networks;
use attrgraph::{GraphError, IntegrityError, ReachabilityConfig};

#[test]
fn test_every_input_is_reachable() {
    for (name, graph) in networks::select("*").unwrap() {
        for input in graph.inputs() {
            assert!(
                graph.is_input_reachable(input, true).unwrap(),
                "input of {} not reachable",
                name
            );
            assert!(graph.is_input_reachable(input, false).unwrap());
        }
    }
}

#[test]
fn test_orphan_layers_are_not_reachable() {
    let mut builder = GraphBuilder::new();
    let orphans = [
        builder.add(LayerSpec::dense("dense", ActivationKind::Relu)),
        builder.add(LayerSpec::pass_through("flatten", PassThroughKind::Flatten)),
        builder.add(LayerSpec::pooling("pool", PoolingKind::Average)),
    ];
    let graph = builder.build().unwrap();
    for orphan in orphans {
        assert!(!graph.is_input_reachable(orphan, true).unwrap());
        assert!(!graph.is_input_reachable(orphan, false).unwrap());
    }
}

#[test]
fn test_reachability_is_idempotent() {
    let graph = networks::build("mnist.cnn_3convb_3dense").unwrap();
    for node in graph.nodes() {
        let first = graph.is_input_reachable(node.id(), true).unwrap();
        let second = graph.is_input_reachable(node.id(), true).unwrap();
        assert_eq!(first, second, "{}", node.name());
    }
}

#[test]
fn test_flatten_transparency() {
    let mut builder = GraphBuilder::new();
    let a = builder.add_layer(LayerSpec::input("a"), &[]);
    let b = builder.add_layer(
        LayerSpec::pass_through("b", PassThroughKind::Flatten),
        &[a],
    );
    let c = builder.add_layer(LayerSpec::dense("c", ActivationKind::Relu), &[b]);
    let graph = builder.build().unwrap();

    assert!(graph.is_input_reachable(c, true).unwrap());
    assert!(!graph.is_input_reachable(c, false).unwrap());
}

#[test]
fn test_mixed_fan_in_is_not_reachable() {
    let mut builder = GraphBuilder::new();
    let x = builder.add_layer(LayerSpec::input("x"), &[]);
    let b1 = builder.add_layer(LayerSpec::input("b1"), &[]);
    let b2 = builder.add_layer(
        LayerSpec::conv("b2", ConvKind::Conv2D, ActivationKind::Relu),
        &[x],
    );
    let c = builder.add_layer(LayerSpec::merge("c", MergeKind::Concatenate), &[b1, b2]);
    let graph = builder.build().unwrap();
    assert!(!graph.is_input_reachable(c, true).unwrap());
}

#[test]
fn test_long_pass_through_chains() {
    let kinds = [
        PassThroughKind::Reshape,
        PassThroughKind::Permute,
        PassThroughKind::Flatten,
    ];
    for length in 1..=12 {
        let mut builder = GraphBuilder::new();
        let mut previous = builder.add_layer(LayerSpec::input("x"), &[]);
        for i in 0..length {
            previous = builder.add_layer(
                LayerSpec::pass_through(format!("pt_{}", i), kinds[i % kinds.len()]),
                &[previous],
            );
        }
        let dense = builder.add_layer(LayerSpec::dense("d", ActivationKind::Relu), &[previous]);
        let graph = builder.build().unwrap();
        assert!(
            graph.is_input_reachable(dense, true).unwrap(),
            "chain of {}",
            length
        );
        assert!(!graph.is_input_reachable(dense, false).unwrap());
    }
}

#[test]
fn test_cycle_rejected_before_traversal() {
    let mut builder = GraphBuilder::new();
    let x = builder.add_layer(LayerSpec::input("x"), &[]);
    let a = builder.add(LayerSpec::pass_through("a", PassThroughKind::Reshape));
    let b = builder.add(LayerSpec::pass_through("b", PassThroughKind::Permute));
    builder.connect(a, x);
    builder.connect(a, b);
    builder.connect(b, a);

    let err = builder.build().unwrap_err();
    assert!(err.is_integrity());
    assert!(matches!(
        err,
        GraphError::Integrity(IntegrityError::Cycle { .. })
    ));
}

#[test]
fn test_layer_index_always_unsupported() {
    let graph = networks::build("imagenet.vgg_block").unwrap();
    let other = networks::build("trivia.dot").unwrap();
    let ids = graph.nodes().map(|n| n.id()).chain(other.inputs());
    for id in ids {
        let err = graph.layer_index_of(id).unwrap_err();
        assert!(matches!(err, GraphError::Unsupported { .. }));
        assert!(err.to_string().contains("layer_index_of"));
    }
}

#[test]
fn test_vgg_block_classification() {
    let graph = networks::build("imagenet.vgg_block").unwrap();
    let node = |name: &str| graph.node(graph.find(name).unwrap()).unwrap();

    assert!(node("block1_conv1").is_convolutional());
    assert!(node("block1_conv1").has_kernel());
    assert!(node("block1_pool").is_max_pooling());
    assert!(node("global_pool").is_average_pooling());
    assert!(!node("global_pool").has_kernel());
    assert!(node("fc1").is_dense());
    assert!(node("predictions").is_activation(Some(ActivationKind::Softmax)));
    assert!(!node("predictions").only_pass_through_activation());
    assert!(graph.nodes().all(|n| n.is_convnet_layer()));

    let config = ReachabilityConfig::default();
    let reachable: Vec<&str> = graph
        .input_reachable_nodes(&config)
        .unwrap()
        .into_iter()
        .map(|id| graph.node(id).unwrap().name())
        .collect();
    assert_eq!(reachable, vec!["input", "block1_conv1"]);
}

#[test]
fn test_fast_gradient_family_dry_run() {
    // Every analyzer accepts the ReLU fixtures once the softmax is gone.
    for analyzer in AnalyzerKind::ALL {
        let runs = dry_run(analyzer, "trivia.dot:trivia.skip_connection:mnist.log_reg").unwrap();
        assert_eq!(runs.len(), 3, "{}", analyzer);
        for run in runs {
            assert!(run.warnings.is_empty(), "{} on {}", analyzer, run.network);
            assert!(run.input_reachable >= 2, "{} on {}", analyzer, run.network);
        }
    }
}

#[test]
fn test_precommit_mnist_dry_run() {
    for analyzer in AnalyzerKind::ALL {
        let runs = dry_run(analyzer, "mnist.*").unwrap();
        assert_eq!(runs.len(), 5);
        let cnn = runs
            .iter()
            .find(|r| r.network == "mnist.cnn_2convb_2dense")
            .unwrap();
        assert_eq!(
            cnn.kinds.first(),
            Some(&LayerKind::Input),
            "{}",
            analyzer
        );
        // input and the first convolution
        assert_eq!(cnn.input_reachable, 2);
    }
}

#[test]
fn test_imagenet_dry_run() {
    for analyzer in AnalyzerKind::ALL {
        let runs = dry_run(analyzer, "imagenet.*").unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(
            runs[0].kinds.last(),
            Some(&LayerKind::Activation(ActivationKind::Linear))
        );
    }
}

#[test]
fn test_deconvnet_family_rejects_tanh() {
    for analyzer in AnalyzerKind::ALL {
        let result = dry_run(analyzer, "trivia.tanh_mlp");
        let relu_only = matches!(
            analyzer,
            AnalyzerKind::Deconvnet | AnalyzerKind::GuidedBackprop
        );
        assert_eq!(result.is_err(), relu_only, "{}", analyzer);
    }
}

#[test]
fn test_graph_from_json_description() {
    let json = r#"{
        "layers": [
            {"name": "image", "class_name": "InputLayer"},
            {"name": "conv", "class_name": "Conv2D", "inbound": ["image"],
             "has_kernel": true, "activation": "relu"},
            {"name": "bn", "class_name": "BatchNormalization", "inbound": ["conv"]},
            {"name": "act", "class_name": "Activation", "inbound": ["bn"], "activation": "elu"},
            {"name": "gap", "class_name": "GlobalAveragePooling2D", "inbound": ["act"]},
            {"name": "reshape", "class_name": "Reshape", "inbound": ["image"]},
            {"name": "merge", "class_name": "Concatenate", "inbound": ["gap", "reshape"]},
            {"name": "head", "class_name": "Dense", "inbound": ["merge"],
             "has_kernel": true, "activation": "softmax"}
        ]
    }"#;
    let description = GraphDescription::from_json(json).unwrap();
    let graph = ComputationGraph::from_description(&description).unwrap();
    let id = |name: &str| graph.find(name).unwrap();

    assert_eq!(
        graph.classify(id("act")).unwrap(),
        LayerKind::Activation(ActivationKind::Elu)
    );
    assert!(graph.node(id("bn")).unwrap().is_batch_normalization());
    assert!(graph.node(id("bn")).unwrap().is_activation_search_safe());
    assert!(graph.node(id("merge")).unwrap().is_merge());
    assert!(graph.is_input_reachable(id("conv"), true).unwrap());
    assert!(graph.is_input_reachable(id("reshape"), true).unwrap());
    assert!(!graph.is_input_reachable(id("merge"), true).unwrap());
    assert_eq!(graph.outputs(), vec![id("head")]);

    let err = check_model(&graph, AnalyzerKind::Deconvnet).unwrap_err();
    assert!(matches!(err, GraphError::ModelCheck { .. }));
    // Stripping the softmax still leaves the ELU activation.
    let stripped = graph.without_softmax();
    match check_model(&stripped, AnalyzerKind::Deconvnet) {
        Err(GraphError::ModelCheck { nodes, .. }) => assert_eq!(nodes, vec!["act".to_string()]),
        other => panic!("expected ELU rejection, got {:?}", other),
    }
    assert!(check_model(&stripped, AnalyzerKind::IntegratedGradients).is_ok());
}

#[test]
fn test_parallel_queries_agree() {
    let graph = networks::build("mnist.cnn_3convb_3dense").unwrap();
    let expected: Vec<bool> = graph
        .nodes()
        .map(|n| graph.is_input_reachable(n.id(), true).unwrap())
        .collect();

    let graph = &graph;
    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    graph
                        .nodes()
                        .map(|n| graph.is_input_reachable(n.id(), true).unwrap())
                        .collect::<Vec<bool>>()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
