use super::types::{Parameters, Specifier, Type};

use proptest::prelude::*;

#[test]
fn error_equals_error() {
    assert_eq!(Type::Error, Type::Error);
    assert_ne!(Type::Error, Type::INT);
}

#[test]
fn declarator_predicates() {
    assert!(Type::Error.is_error());
    assert!(Type::INT.is_scalar());
    assert!(Type::Array(Specifier::Char, 0, 4).is_array());
    assert!(Type::Function(Specifier::Int, 0, Parameters::default()).is_function());
    assert!(!Type::Error.is_predicate());
    assert!(!Type::Function(Specifier::Int, 0, Parameters::default()).is_predicate());
}

#[test]
fn function_equality_is_structural() {
    let params = Parameters {
        variadic: false,
        types: vec![Type::INT, Type::Scalar(Specifier::Char, 1)],
    };
    let f1 = Type::Function(Specifier::Int, 0, params.clone());
    let f2 = Type::Function(Specifier::Int, 0, params.clone());
    assert_eq!(f1, f2);

    let variadic = Parameters {
        variadic: true,
        types: params.types.clone(),
    };
    let f3 = Type::Function(Specifier::Int, 0, variadic);
    assert_ne!(f1, f3);

    let shorter = Parameters {
        variadic: false,
        types: vec![Type::INT],
    };
    let f4 = Type::Function(Specifier::Int, 0, shorter);
    assert_ne!(f1, f4);
}

#[test]
fn sizes() {
    assert_eq!(1, Type::Scalar(Specifier::Char, 0).size());
    assert_eq!(4, Type::INT.size());
    assert_eq!(8, Type::DOUBLE.size());
    assert_eq!(4, Type::Scalar(Specifier::Double, 1).size());
    assert_eq!(4, Type::Scalar(Specifier::Char, 2).size());
    assert_eq!(40, Type::Array(Specifier::Int, 0, 10).size());
    assert_eq!(7, Type::Array(Specifier::Char, 0, 7).size());
    assert_eq!(24, Type::Array(Specifier::Double, 0, 3).size());
    assert_eq!(20, Type::Array(Specifier::Double, 1, 5).size());
}

#[test]
fn promotion() {
    let c = Type::Scalar(Specifier::Char, 0);
    assert_eq!(Type::INT, c.promote());
    assert_eq!(
        Type::Scalar(Specifier::Int, 1),
        Type::Array(Specifier::Int, 0, 10).promote()
    );
    assert_eq!(
        Type::Scalar(Specifier::Char, 2),
        Type::Array(Specifier::Char, 1, 4).promote()
    );
    assert_eq!(Type::DOUBLE, Type::DOUBLE.promote());
    assert_eq!(Type::Scalar(Specifier::Char, 1), Type::Scalar(Specifier::Char, 1).promote());
}

#[test]
fn compatibility() {
    assert!(Type::INT.is_compatible_with(&Type::DOUBLE));
    assert!(Type::Scalar(Specifier::Char, 0).promote().is_compatible_with(&Type::INT));
    assert!(Type::Scalar(Specifier::Int, 1)
        .is_compatible_with(&Type::Array(Specifier::Int, 0, 3).promote()));
    assert!(!Type::Scalar(Specifier::Int, 1).is_compatible_with(&Type::Scalar(Specifier::Char, 1)));
    assert!(!Type::Error.is_compatible_with(&Type::Error));
}

fn arb_specifier() -> impl Strategy<Value = Specifier> {
    prop_oneof![
        Just(Specifier::Char),
        Just(Specifier::Int),
        Just(Specifier::Double),
    ]
}

fn arb_scalar() -> impl Strategy<Value = Type> {
    (arb_specifier(), 0u32..3).prop_map(|(specifier, indirection)| Type::Scalar(specifier, indirection))
}

fn arb_type() -> impl Strategy<Value = Type> {
    let array = (arb_specifier(), 0u32..3, 1u32..8)
        .prop_map(|(specifier, indirection, length)| Type::Array(specifier, indirection, length));
    let function = (
        arb_specifier(),
        0u32..2,
        prop::collection::vec(arb_scalar(), 0..3),
        any::<bool>(),
    )
        .prop_map(|(specifier, indirection, types, variadic)| {
            Type::Function(specifier, indirection, Parameters { variadic, types })
        });

    prop_oneof![Just(Type::Error), arb_scalar(), array, function]
}

proptest! {
    #[test]
    fn promote_is_idempotent(t in arb_type()) {
        prop_assert_eq!(t.promote().promote(), t.promote());
    }

    #[test]
    fn numeric_implies_predicate(t in arb_type()) {
        if t.is_numeric() {
            prop_assert!(t.is_predicate());
        }
    }

    #[test]
    fn pointer_promotes_to_pointer(t in arb_type()) {
        if t.is_pointer() {
            prop_assert!(t.promote().is_pointer());
        }
    }

    #[test]
    fn equality_is_reflexive(t in arb_type()) {
        prop_assert_eq!(t.clone(), t);
    }

    #[test]
    fn compatibility_is_symmetric(a in arb_type(), b in arb_type()) {
        prop_assert_eq!(a.is_compatible_with(&b), b.is_compatible_with(&a));
    }

    #[test]
    fn numeric_types_are_word_sized_or_more(t in arb_type()) {
        if t.is_numeric() {
            prop_assert!(t.size() >= 4);
        }
    }
}
