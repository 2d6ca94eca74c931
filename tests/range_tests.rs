//! Integration tests for effective particle ranges

use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use xmlschema_structures::namespaces::QName;
use xmlschema_structures::validators::{
    ComplexTypeBuilder, DerivationMethod, ElementId, ModelType, Occurs, Particle,
    ParticleRangeEngine, SchemaComponents, XsdAnyElement, XsdElement, XsdGroup,
};

fn element(schema: &mut SchemaComponents, name: &str) -> ElementId {
    let any = schema.any_type();
    schema
        .add_element(XsdElement::local(QName::local(name), any))
        .unwrap()
}

#[test]
fn test_sequence_of_two_required_elements() {
    let mut schema = SchemaComponents::new();
    let a = element(&mut schema, "a");
    let b = element(&mut schema, "b");
    let seq = schema
        .add_group(
            XsdGroup::sequence()
                .with_element(a, Occurs::once())
                .with_element(b, Occurs::once()),
        )
        .unwrap();

    let engine = ParticleRangeEngine::new(Arc::new(schema));
    let particle = Particle::group(seq, Occurs::once());
    assert_eq!(engine.effective_range(&particle), Occurs::new(2, Some(2)));
    assert!(!engine.is_emptiable(&particle));
}

#[test]
fn test_choice_of_element_and_repeated_group() {
    let mut schema = SchemaComponents::new();
    let a = element(&mut schema, "a");
    let b = element(&mut schema, "b");
    let inner = schema
        .add_group(XsdGroup::sequence().with_element(b, Occurs::once()))
        .unwrap();
    let choice = schema
        .add_group(
            XsdGroup::choice()
                .with_element(a, Occurs::once())
                .with_group(inner, Occurs::zero_or_more()),
        )
        .unwrap();

    let engine = ParticleRangeEngine::new(Arc::new(schema));
    let particle = Particle::group(choice, Occurs::once());
    assert_eq!(engine.min_effective_range(&particle), 0);
    assert_eq!(engine.max_effective_range(&particle), None);
    assert!(engine.is_emptiable(&particle));
    assert!(!engine.is_empty(&particle));
}

#[test]
fn test_repeated_empty_sequence_stays_empty() {
    let mut schema = SchemaComponents::new();
    let empty = schema.add_group(XsdGroup::sequence()).unwrap();

    let engine = ParticleRangeEngine::new(Arc::new(schema));
    for occurs in [Occurs::new(5, Some(5)), Occurs::zero_or_more(), Occurs::one_or_more()] {
        let particle = Particle::group(empty, occurs);
        assert_eq!(engine.effective_range(&particle), Occurs::empty(), "{}", occurs);
        assert!(engine.is_empty(&particle));
    }
}

#[test]
fn test_nested_groups_and_wildcards() {
    let mut schema = SchemaComponents::new();
    let a = element(&mut schema, "a");
    let b = element(&mut schema, "b");
    // (a | b{2-3})
    let choice = schema
        .add_group(
            XsdGroup::choice()
                .with_element(a, Occurs::once())
                .with_element(b, Occurs::new(2, Some(3))),
        )
        .unwrap();
    // ((a|b{2-3}){2}, (WC[##any]){0-1})
    let mut seq = XsdGroup::sequence().with_group(choice, Occurs::new(2, Some(2)));
    seq.add_any(XsdAnyElement::any(), Occurs::optional());
    let seq = schema.add_group(seq).unwrap();

    let engine = ParticleRangeEngine::new(Arc::new(schema));
    assert_eq!(engine.group_range(choice), Occurs::new(1, Some(3)));
    assert_eq!(engine.group_range(seq), Occurs::new(2, Some(7)));
    assert_eq!(
        engine.effective_range(&Particle::group(seq, Occurs::new(0, Some(2)))),
        Occurs::new(0, Some(14))
    );
}

#[test]
fn test_complex_type_content_range() {
    let mut schema = SchemaComponents::new();
    let any = schema.any_type();
    let item = element(&mut schema, "item");
    let items = schema
        .add_group(XsdGroup::sequence().with_element(item, Occurs::new(1, Some(10))))
        .unwrap();
    let list_t = schema
        .add_complex_type(
            ComplexTypeBuilder::new()
                .name(QName::local("ItemList"))
                .base(any, DerivationMethod::Restriction)
                .content(Particle::group(items, Occurs::once()))
                .build(),
        )
        .unwrap();

    let schema = Arc::new(schema);
    let engine = ParticleRangeEngine::new(Arc::clone(&schema));
    let content = schema
        .get_type(list_t)
        .and_then(|t| t.as_complex())
        .and_then(|t| t.content.as_ref())
        .unwrap();
    assert_eq!(engine.effective_range(content), Occurs::new(1, Some(10)));
}

#[test]
fn test_particle_descriptions() {
    let mut schema = SchemaComponents::new();
    let a = element(&mut schema, "a");
    let b = element(&mut schema, "b");
    let c = element(&mut schema, "c");
    let choice = schema
        .add_group(
            XsdGroup::choice()
                .with_element(b, Occurs::once())
                .with_element(c, Occurs::new(2, Some(2))),
        )
        .unwrap();
    let seq = schema
        .add_group(
            XsdGroup::sequence()
                .with_element(a, Occurs::zero_or_more())
                .with_group(choice, Occurs::new(1, Some(3))),
        )
        .unwrap();
    let all = schema
        .add_group(XsdGroup::all().with_element(a, Occurs::optional()))
        .unwrap();

    let seq_particle = Particle::group(seq, Occurs::optional());
    assert_eq!(
        seq_particle.describe(&schema).to_string(),
        "(a{0-UNBOUNDED},(b|c{2}){1-3}){0-1}"
    );
    let all_particle = Particle::group(all, Occurs::once());
    assert_eq!(all_particle.describe(&schema).to_string(), "all(a{0-1})");
    assert_eq!(Particle::empty().describe(&schema).to_string(), "EMPTY");
}

#[test]
fn test_groups_from_model_tags() {
    let mut schema = SchemaComponents::new();
    let a = element(&mut schema, "a");
    let b = element(&mut schema, "b");

    let mut ranges = Vec::new();
    for tag in ["sequence", "choice", "all"] {
        let model = ModelType::from_tag(tag).unwrap();
        let group = schema
            .add_group(
                XsdGroup::new(model)
                    .with_element(a, Occurs::new(1, Some(2)))
                    .with_element(b, Occurs::new(3, Some(4))),
            )
            .unwrap();
        ranges.push(group);
    }

    let engine = ParticleRangeEngine::new(Arc::new(schema));
    let ranges: Vec<_> = ranges.into_iter().map(|g| engine.group_range(g)).collect();
    assert_eq!(
        ranges,
        vec![
            Occurs::new(4, Some(6)),
            Occurs::new(1, Some(4)),
            Occurs::new(4, Some(6)),
        ]
    );
}

/// A content model tree used to generate random particles
#[derive(Debug, Clone)]
enum Node {
    Leaf(Occurs),
    Group(ModelType, Occurs, Vec<Node>),
}

fn occurs_strategy() -> impl Strategy<Value = Occurs> {
    (0u32..3, prop::option::of(0u32..3)).prop_map(|(min, span)| Occurs::new(min, span.map(|s| min + s)))
}

fn model_strategy() -> impl Strategy<Value = ModelType> {
    prop_oneof![
        Just(ModelType::Sequence),
        Just(ModelType::Choice),
        Just(ModelType::All),
    ]
}

fn node_strategy() -> impl Strategy<Value = Node> {
    occurs_strategy()
        .prop_map(Node::Leaf)
        .prop_recursive(4, 32, 5, |inner| {
            (model_strategy(), occurs_strategy(), prop::collection::vec(inner, 0..5))
                .prop_map(|(model, occurs, children)| Node::Group(model, occurs, children))
        })
}

/// Add the tree to the arena and return the particle for its root
fn build(schema: &mut SchemaComponents, node: &Node) -> Particle {
    match node {
        Node::Leaf(occurs) => {
            let id = element(schema, "e");
            Particle::element(id, *occurs)
        }
        Node::Group(model, occurs, children) => {
            let mut group = XsdGroup::new(*model);
            for child in children {
                let particle = build(schema, child);
                group.add_particle(particle);
            }
            let id = schema.add_group(group).unwrap();
            Particle::group(id, *occurs)
        }
    }
}

/// Independent range computation over the generated tree
fn expected(node: &Node) -> (u64, Option<u64>) {
    match node {
        Node::Leaf(occurs) => (occurs.min.into(), occurs.max.map(u64::from)),
        Node::Group(model, occurs, children) => {
            let ranges: Vec<_> = children.iter().map(expected).collect();
            let (min, max) = match model {
                ModelType::Choice if ranges.is_empty() => (0, Some(0)),
                ModelType::Choice => (
                    ranges.iter().map(|r| r.0).min().unwrap_or(0),
                    ranges
                        .iter()
                        .try_fold(0, |acc, r| r.1.map(|m| acc.max(m))),
                ),
                ModelType::Sequence | ModelType::All => (
                    ranges.iter().map(|r| r.0).sum::<u64>(),
                    ranges.iter().try_fold(0, |acc, r| r.1.map(|m| acc + m)),
                ),
            };
            let outer_min = u64::from(occurs.min);
            let scaled_max = match (max, occurs.max) {
                (None, _) => None,
                (Some(0), _) => Some(0),
                (Some(_), None) => None,
                (Some(m), Some(o)) => Some(m * u64::from(o)),
            };
            (min * outer_min, scaled_max)
        }
    }
}

proptest! {
    #[test]
    fn prop_effective_range_is_well_formed(tree in node_strategy()) {
        let mut schema = SchemaComponents::new();
        let particle = build(&mut schema, &tree);
        let engine = ParticleRangeEngine::new(Arc::new(schema));

        let range = engine.effective_range(&particle);
        prop_assert!(range.is_well_formed(), "{}", range);
        prop_assert_eq!(engine.is_emptiable(&particle), range.min == 0);
        if engine.is_empty(&particle) {
            prop_assert_eq!(range, Occurs::empty());
        }

        let (min, max) = expected(&tree);
        prop_assert_eq!(u64::from(range.min), min);
        prop_assert_eq!(range.max.map(u64::from), max);
    }
}
