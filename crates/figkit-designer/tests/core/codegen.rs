use figkit_core::ElementId;
use figkit_designer::history::codegen::{parse_block, render_verified, Statement};
use figkit_designer::{ArgValue, PropertyPath};
use proptest::prelude::*;

fn text_chars() -> impl Strategy<Value = String> {
    let chars = vec!['a', 'Z', '0', ' ', ',', '.', '(', ')', '[', ']', '#', '\\', '"', '\'', '\n', '\t', '\r', 'µ'];
    prop::collection::vec(prop::sample::select(chars), 0..16).prop_map(|c| c.into_iter().collect())
}

fn number() -> impl Strategy<Value = f64> {
    prop_oneof![
        prop::num::f64::NORMAL,
        prop::num::f64::SUBNORMAL,
        prop::num::f64::ZERO,
        -1.0f64..1.0,
    ]
}

fn arg() -> impl Strategy<Value = ArgValue> {
    prop_oneof![
        number().prop_map(ArgValue::Number),
        text_chars().prop_map(ArgValue::Str),
        any::<bool>().prop_map(ArgValue::Bool),
        prop::collection::vec(number(), 0..5).prop_map(ArgValue::List),
        prop::collection::vec(number(), 0..3).prop_map(ArgValue::Tuple),
    ]
}

fn target() -> impl Strategy<Value = ElementId> {
    (1u32..4, 0usize..3, 0usize..3).prop_flat_map(|(figure, axes, index)| {
        let fig = ElementId::figure(figure);
        let ax = fig.axes(axes);
        prop::sample::select(vec![fig.clone(), fig.text(index), ax.clone(), ax.text(index), ax.legend(), ax.image(index)])
    })
}

fn statement() -> impl Strategy<Value = Statement> {
    (
        target(),
        prop::sample::select(PropertyPath::ALL.to_vec()),
        prop::collection::vec(arg(), 0..4),
    )
        .prop_map(|(target, property, args)| Statement { target, property, args })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rendered_block_parses_back(statements in prop::collection::vec(statement(), 0..6)) {
        let lines = render_verified(&statements).unwrap();
        prop_assert_eq!(lines.len(), statements.len());
        let parsed = parse_block(&lines.join("\n"), 1).unwrap();
        prop_assert_eq!(parsed, statements);
    }
}
