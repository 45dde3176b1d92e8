use filtr8::{
    graph::{
        param::{ParamError, ParamKind},
        EdgeKind, GraphError, NamingConvention, NodeKind, OutputTarget, SignalGraph,
    },
    synth::VoiceFactory,
};

fn graph() -> SignalGraph {
    SignalGraph::new(OutputTarget::new(48_000.0, 2))
}

#[test]
fn delay_feedback_loop_is_accepted_at_construction() {
    let mut g = graph();
    let delay = g.create_node("createDelayNode").unwrap();
    let feedback = g.create_node("createGainNode").unwrap();

    g.connect(delay.id, feedback.id).unwrap();
    assert!(matches!(
        g.connect(feedback.id, delay.id),
        Err(GraphError::CycleDetected { .. })
    ));
    g.connect_feedback(feedback.id, delay.id).unwrap();

    assert!(g
        .edges()
        .iter()
        .any(|e| e.kind == EdgeKind::Feedback && e.from == feedback.id && e.to == delay.id));
}

#[test]
fn self_loop_through_feedback_edge_is_allowed() {
    let mut g = graph();
    let delay = g.create_node("createDelayNode").unwrap();
    g.connect_feedback(delay.id, delay.id).unwrap();
}

#[test]
fn echo_decays_when_feedback_gain_is_below_one() {
    let mut g = graph();
    let input = g.create_node("createGainNode").unwrap();
    let delay = g.create_node("createDelayNode").unwrap();
    let feedback = g.create_node("createGainNode").unwrap();
    let dest = g.destination().id;

    g.connect(input.id, delay.id).unwrap();
    g.connect(delay.id, dest).unwrap();
    g.connect(delay.id, feedback.id).unwrap();
    g.connect_feedback(feedback.id, delay.id).unwrap();

    delay.bind_parameter("delayTime").unwrap().set(&mut g, 0.01).unwrap();
    feedback.bind_parameter("gain").unwrap().set(&mut g, 0.5).unwrap();

    // let the parameter glides settle before any signal arrives
    let mut warmup = vec![0.0; 2_400];
    g.render_block(&mut warmup);

    let mut voices = VoiceFactory::new(48_000.0);
    voices.connect(input.id);
    let mut voice = voices.make_voice().unwrap();
    voice.set_frequency(1_000.0);
    let now = g.time_ms();
    voice.start(now).unwrap();
    voice.stop(now + 5.0).unwrap();
    g.launch(voice).unwrap();

    let mut out = vec![0.0; 48_000];
    g.render_block(&mut out);

    let peak = |s: &[f32]| s.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let early = peak(&out[..4_800]);
    let late = peak(&out[43_200..]);
    assert!(out.iter().all(|s| s.is_finite()));
    assert!(early > 0.1, "echo never sounded: {early}");
    assert!(late < early * 0.01, "echo did not decay: early {early}, late {late}");
}

#[test]
fn continuous_binding_sets_the_value_slot() {
    let mut g = graph();
    let filter = g.create_node("createBiquadFilter").unwrap();
    let frequency = filter.bind_parameter("frequency").unwrap();
    assert_eq!(frequency.kind(), ParamKind::Continuous);

    frequency.set(&mut g, 1_234.0).unwrap();
    match g.param_slot(filter.id, "frequency").unwrap() {
        filtr8::graph::param::ParamSlot::Continuous(param) => assert_eq!(param.value(), 1_234.0),
        filtr8::graph::param::ParamSlot::Discrete(_) => panic!("frequency should be continuous"),
    }
}

#[test]
fn continuous_binding_rejects_values_past_nyquist() {
    let mut g = graph();
    let filter = g.create_node("createBiquadFilter").unwrap();
    let frequency = filter.bind_parameter("frequency").unwrap();
    frequency.set(&mut g, 1_234.0).unwrap();

    assert!(matches!(
        frequency.set(&mut g, 30_000.0),
        Err(ParamError::OutOfRange { max, .. }) if max == 24_000.0
    ));
    frequency.set(&mut g, 24_000.0).unwrap();
    match g.param_slot(filter.id, "frequency").unwrap() {
        filtr8::graph::param::ParamSlot::Continuous(param) => assert_eq!(param.value(), 24_000.0),
        filtr8::graph::param::ParamSlot::Discrete(_) => panic!("frequency should be continuous"),
    }
}

#[test]
fn discrete_binding_maps_index_to_filter_name() {
    let mut g = graph();
    let filter = g.create_node("createBiquadFilter").unwrap();
    let kind = filter.bind_parameter("type").unwrap();

    kind.set(&mut g, 3.0).unwrap();
    match g.param_slot(filter.id, "type").unwrap() {
        filtr8::graph::param::ParamSlot::Discrete(attr) => assert_eq!(attr.variant(), "lowshelf"),
        filtr8::graph::param::ParamSlot::Continuous(_) => panic!("type should be discrete"),
    }

    assert!(matches!(
        kind.set(&mut g, 7.0),
        Err(ParamError::IndexOutOfRange { .. })
    ));
    match g.param_slot(filter.id, "type").unwrap() {
        filtr8::graph::param::ParamSlot::Discrete(attr) => assert_eq!(attr.variant(), "lowshelf"),
        filtr8::graph::param::ParamSlot::Continuous(_) => panic!("type should be discrete"),
    }
}

#[test]
fn suffixed_backend_builds_the_same_kinds() {
    let mut g = SignalGraph::new(
        OutputTarget::new(44_100.0, 2).with_naming(NamingConvention::Suffixed),
    );
    let gain = g.create_node("createGainNode").unwrap();
    let filter = g.create_node("createBiquadFilter").unwrap();
    assert_eq!(gain.kind, NodeKind::Gain);
    assert_eq!(filter.kind, NodeKind::BiquadFilter);
    assert!(matches!(
        g.create_node("createGain"),
        Err(GraphError::UnknownNodeKind(_))
    ));
}
