//! Named fixture topologies for exercising analyzers.
//!
//! Fixtures are selected with `:`-separated glob patterns, e.g.
//! `"trivia.*:mnist.log_reg"`.

use globset::{Glob, GlobSetBuilder};

use crate::errors::GraphError;
use crate::graph::{ComputationGraph, GraphBuilder, LayerSpec, NodeId};
use crate::layers::{
    ActivationKind, ConvKind, LayerKind, MergeKind, PassThroughKind, PoolingKind,
    RegularizationKind,
};

type Fixture = (&'static str, fn() -> Result<ComputationGraph, GraphError>);

const FIXTURES: &[Fixture] = &[
    ("trivia.dot", trivia_dot),
    ("trivia.skip_connection", trivia_skip_connection),
    ("trivia.tanh_mlp", trivia_tanh_mlp),
    ("trivia.nested", trivia_nested),
    ("mnist.log_reg", mnist_log_reg),
    ("mnist.mlp_2dense", mnist_mlp_2dense),
    ("mnist.mlp_3dense", mnist_mlp_3dense),
    ("mnist.cnn_2convb_2dense", mnist_cnn_2convb_2dense),
    ("mnist.cnn_3convb_3dense", mnist_cnn_3convb_3dense),
    ("imagenet.vgg_block", imagenet_vgg_block),
];

/// Returns the names of all fixtures.
pub fn names() -> Vec<&'static str> {
    FIXTURES.iter().map(|(name, _)| *name).collect()
}

/// Builds the fixture with the given name.
pub fn build(name: &str) -> Result<ComputationGraph, GraphError> {
    let Some((_, make)) = FIXTURES.iter().find(|(fixture, _)| *fixture == name) else {
        return Err(GraphError::Description {
            message: format!("unknown fixture '{}'", name),
        });
    };
    make()
}

/// Builds every fixture matching one of the `:`-separated glob patterns.
pub fn select(patterns: &str) -> Result<Vec<(&'static str, ComputationGraph)>, GraphError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns.split(':').filter(|p| !p.is_empty()) {
        builder.add(Glob::new(pattern)?);
    }
    let globs = builder.build()?;

    let mut selected = Vec::new();
    for (name, make) in FIXTURES.iter().filter(|(name, _)| globs.is_match(name)) {
        selected.push((*name, make()?));
    }
    log::debug!("Pattern '{}' selected {} fixture(s)", patterns, selected.len());
    Ok(selected)
}

/// Appends `layers` one after another, starting from `from`.
fn chain(builder: &mut GraphBuilder, from: NodeId, layers: Vec<LayerSpec>) -> NodeId {
    layers
        .into_iter()
        .fold(from, |previous, spec| builder.add_layer(spec, &[previous]))
}

fn dropout(name: String) -> LayerSpec {
    LayerSpec::new(name, LayerKind::Regularization(RegularizationKind::Dropout))
}

fn trivia_dot() -> Result<ComputationGraph, GraphError> {
    let mut builder = GraphBuilder::new();
    let x = builder.add_layer(LayerSpec::input("input"), &[]);
    builder.add_layer(LayerSpec::dense("dot", ActivationKind::Linear), &[x]);
    builder.build()
}

fn trivia_skip_connection() -> Result<ComputationGraph, GraphError> {
    let mut builder = GraphBuilder::new();
    let x = builder.add_layer(LayerSpec::input("input"), &[]);
    let a = builder.add_layer(LayerSpec::dense("dense_a", ActivationKind::Relu), &[x]);
    let b = builder.add_layer(LayerSpec::dense("dense_b", ActivationKind::Relu), &[a]);
    let skip = builder.add_layer(LayerSpec::merge("skip", MergeKind::Add), &[a, b]);
    builder.add_layer(LayerSpec::dense("output", ActivationKind::Linear), &[skip]);
    builder.build()
}

fn trivia_tanh_mlp() -> Result<ComputationGraph, GraphError> {
    let mut builder = GraphBuilder::new();
    let x = builder.add_layer(LayerSpec::input("input"), &[]);
    chain(
        &mut builder,
        x,
        vec![
            LayerSpec::dense("hidden", ActivationKind::Tanh),
            LayerSpec::dense("output", ActivationKind::Linear),
        ],
    );
    builder.build()
}

fn trivia_nested() -> Result<ComputationGraph, GraphError> {
    let mut builder = GraphBuilder::new();
    let x = builder.add_layer(LayerSpec::input("input"), &[]);
    chain(
        &mut builder,
        x,
        vec![
            LayerSpec::new("inner_model", LayerKind::Network).with_kernel(),
            LayerSpec::dense("output", ActivationKind::Linear),
        ],
    );
    builder.build()
}

fn mnist_log_reg() -> Result<ComputationGraph, GraphError> {
    let mut builder = GraphBuilder::new();
    let x = builder.add_layer(LayerSpec::input("input"), &[]);
    chain(
        &mut builder,
        x,
        vec![
            LayerSpec::pass_through("flatten", PassThroughKind::Flatten),
            LayerSpec::dense("output", ActivationKind::Softmax),
        ],
    );
    builder.build()
}

fn mnist_mlp(dense_layers: usize) -> Result<ComputationGraph, GraphError> {
    let mut builder = GraphBuilder::new();
    let x = builder.add_layer(LayerSpec::input("input"), &[]);
    let mut layers = vec![LayerSpec::pass_through("flatten", PassThroughKind::Flatten)];
    for i in 1..dense_layers {
        layers.push(LayerSpec::dense(format!("dense_{}", i), ActivationKind::Relu));
        layers.push(dropout(format!("dropout_{}", i)));
    }
    layers.push(LayerSpec::dense("output", ActivationKind::Softmax));
    chain(&mut builder, x, layers);
    builder.build()
}

fn mnist_mlp_2dense() -> Result<ComputationGraph, GraphError> {
    mnist_mlp(2)
}

fn mnist_mlp_3dense() -> Result<ComputationGraph, GraphError> {
    mnist_mlp(3)
}

fn mnist_cnn(conv_blocks: usize, dense_layers: usize) -> Result<ComputationGraph, GraphError> {
    let mut builder = GraphBuilder::new();
    let x = builder.add_layer(LayerSpec::input("input"), &[]);
    let mut layers = Vec::new();
    for block in 1..=conv_blocks {
        for conv in 1..=2 {
            layers.push(LayerSpec::conv(
                format!("block{}_conv{}", block, conv),
                ConvKind::Conv2D,
                ActivationKind::Relu,
            ));
        }
        layers.push(LayerSpec::pooling(
            format!("block{}_pool", block),
            PoolingKind::Max,
        ));
    }
    layers.push(LayerSpec::pass_through("flatten", PassThroughKind::Flatten));
    for i in 1..dense_layers {
        layers.push(LayerSpec::dense(format!("dense_{}", i), ActivationKind::Relu));
        layers.push(dropout(format!("dropout_{}", i)));
    }
    layers.push(LayerSpec::dense("output", ActivationKind::Softmax));
    chain(&mut builder, x, layers);
    builder.build()
}

fn mnist_cnn_2convb_2dense() -> Result<ComputationGraph, GraphError> {
    mnist_cnn(2, 2)
}

fn mnist_cnn_3convb_3dense() -> Result<ComputationGraph, GraphError> {
    mnist_cnn(3, 3)
}

fn imagenet_vgg_block() -> Result<ComputationGraph, GraphError> {
    let mut builder = GraphBuilder::new();
    let x = builder.add_layer(LayerSpec::input("input"), &[]);
    let conv1 = builder.add_layer(
        LayerSpec::conv("block1_conv1", ConvKind::Conv2D, ActivationKind::Relu),
        &[x],
    );
    let conv2 = builder.add_layer(
        LayerSpec::conv("block1_conv2", ConvKind::Conv2D, ActivationKind::Relu),
        &[conv1],
    );
    let pool = builder.add_layer(LayerSpec::pooling("block1_pool", PoolingKind::Max), &[conv2]);
    let gap = builder.add_layer(
        LayerSpec::pooling("global_pool", PoolingKind::GlobalAverage),
        &[pool],
    );
    let fc = builder.add_layer(LayerSpec::dense("fc1", ActivationKind::Relu), &[gap]);
    let logits = builder.add_layer(LayerSpec::dense("logits", ActivationKind::Linear), &[fc]);
    builder.add_layer(
        LayerSpec::activation("predictions", ActivationKind::Softmax),
        &[logits],
    );
    builder.build()
}
