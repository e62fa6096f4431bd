use ad_tree::{ArgTree, Array, Shape};
use proptest::prelude::*;

/// Nested trees of real scalars, complex scalars and 1-d arrays.
pub(crate) fn arb_tree() -> impl Strategy<Value = ArgTree> {
    let scalar = prop_oneof![
        (-3.0f64..3.0).prop_map(ArgTree::real),
        (-3.0f64..3.0, -3.0f64..3.0).prop_map(|(re, im)| ArgTree::complex(re, im)),
    ];
    let array = proptest::collection::vec(-3.0f64..3.0, 0..5).prop_map(|data| {
        let shape = Shape::new(vec![data.len()]);
        ArgTree::Array(Array::from_real(data, shape).unwrap())
    });
    let leaf = prop_oneof![3 => scalar, 1 => array];

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(ArgTree::Tuple),
            proptest::collection::vec(inner.clone(), 0..4).prop_map(ArgTree::List),
            proptest::collection::btree_map("[a-d]", inner, 0..3).prop_map(ArgTree::Map),
        ]
    })
}
