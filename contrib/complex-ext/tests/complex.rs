//! End-to-end tests: the complex extension discovered and loaded through
//! the host's registries, then exercised the way the engine would.

use std::cmp::Ordering;

use chertdb::extensions::builtin::register_builtin_types;
use chertdb::extensions::loader::load_all_extensions;
use chertdb::extensions::registry::{
    AggregateRegistry, FunctionRegistry, OperatorClassRegistry, OperatorRegistry, TypeRegistry,
};
use chertdb::extensions::{
    OperatorClass, BTREE_STRATEGY_EQUAL, BTREE_STRATEGY_GREATER, BTREE_STRATEGY_LESS,
};
use chertdb::{DataType, Error, ExtensionConfig, Value};
use complex_ext::{complex_data_type, complex_value, Complex, COMPLEX_OID};

struct Host {
    types: TypeRegistry,
    operators: OperatorRegistry,
    functions: FunctionRegistry,
    aggregates: AggregateRegistry,
    classes: OperatorClassRegistry,
}

fn load_host(config: &ExtensionConfig) -> Host {
    let mut host = Host {
        types: TypeRegistry::new(),
        operators: OperatorRegistry::new(),
        functions: FunctionRegistry::new(),
        aggregates: AggregateRegistry::new(),
        classes: OperatorClassRegistry::new(),
    };
    register_builtin_types(&mut host.types);
    load_all_extensions(
        &mut host.types,
        &mut host.operators,
        &mut host.functions,
        &mut host.aggregates,
        &mut host.classes,
        config.enabled_filter(),
    )
    .expect("extension loading failed");
    host
}

fn assert_complex(value: &Value, re: f64, im: f64) {
    match value {
        Value::Extension { type_oid, data } => {
            assert_eq!(*type_oid, COMPLEX_OID);
            let c = data.downcast_ref::<Complex>().expect("not a complex");
            assert_eq!(c.re.to_bits(), re.to_bits());
            assert_eq!(c.im.to_bits(), im.to_bits());
        }
        other => panic!("expected a complex value, got {:?}", other),
    }
}

#[test]
fn complex_type_is_discovered() {
    let host = load_host(&ExtensionConfig::all());
    let ty = host.types.get_by_name("complex").expect("type not loaded");
    assert_eq!(ty.type_oid(), COMPLEX_OID);
    assert_eq!(ty.fixed_len(), Some(16));
    assert_eq!(ty.alignment(), 8);
}

#[test]
fn disabled_extensions_are_skipped() {
    let host = load_host(&ExtensionConfig::only(&["vector"]));
    assert!(host.types.get_by_name("complex").is_none());
    assert!(host.aggregates.get("complex_sum").is_none());
}

#[test]
fn text_codec_round_trips_through_registry() {
    let host = load_host(&ExtensionConfig::all());
    let ty = host.types.get_by_oid(COMPLEX_OID).unwrap();

    let v = ty.parse("(1.0,2.5)").unwrap();
    assert_complex(&v, 1.0, 2.5);
    let text = ty.format(&v).unwrap();
    let again = ty.parse(&text).unwrap();
    assert_complex(&again, 1.0, 2.5);

    assert!(matches!(ty.parse("1.0, 2.5)"), Err(Error::Format(_))));
}

#[test]
fn wire_codec_round_trips_through_registry() {
    let host = load_host(&ExtensionConfig::all());
    let ty = host.types.get_by_oid(COMPLEX_OID).unwrap();

    let v = ty.parse("(-7.25,0.5)").unwrap();
    let wire = ty.send(&v).unwrap();
    assert_eq!(wire.len(), 16);
    assert_complex(&ty.receive(&wire).unwrap(), -7.25, 0.5);

    assert!(matches!(ty.receive(&wire[..10]), Err(Error::Format(_))));
}

#[test]
fn addition_dispatches_and_short_circuits_nulls() {
    let host = load_host(&ExtensionConfig::all());
    let complex = complex_data_type();

    let sum = host
        .operators
        .invoke(
            "+",
            &complex,
            &complex,
            &complex_value(Complex::new(1.0, 2.5)),
            &complex_value(Complex::new(4.2, 3.55)),
        )
        .unwrap();
    assert_complex(&sum, 5.2, 6.05);

    // strict operator: null argument means null result, no invocation
    let null_sum = host
        .operators
        .invoke(
            "+",
            &complex,
            &complex,
            &Value::Null,
            &complex_value(Complex::new(1.0, 1.0)),
        )
        .unwrap();
    assert!(null_sum.is_null());
}

#[test]
fn comparisons_follow_magnitude() {
    let host = load_host(&ExtensionConfig::all());
    let complex = complex_data_type();
    let big = complex_value(Complex::new(56.0, -22.5));
    let small = complex_value(Complex::new(-43.2, -0.07));

    let gt = host
        .operators
        .invoke(">", &complex, &complex, &big, &small)
        .unwrap();
    assert_eq!(gt.as_bool(), Some(true));

    // equal magnitude, bitwise distinct
    let a = complex_value(Complex::new(3.0, 4.0));
    let b = complex_value(Complex::new(5.0, 0.0));
    let eq = host
        .operators
        .invoke("=", &complex, &complex, &a, &b)
        .unwrap();
    assert_eq!(eq.as_bool(), Some(true));
}

#[test]
fn operator_metadata_reaches_the_planner() {
    let host = load_host(&ExtensionConfig::all());
    let complex = complex_data_type();

    let lt = host.operators.find("<", &complex, &complex).unwrap();
    assert_eq!(lt.commutator(), Some(">"));
    assert_eq!(lt.negator(), Some(">="));
    assert_eq!(lt.restrict_estimator(), Some("scalarltsel"));
    assert!(lt.flags().strict);

    assert!(host.operators.find("<", &DataType::Int, &complex).is_none());
}

#[test]
fn magnitude_function_dispatches() {
    let host = load_host(&ExtensionConfig::all());

    let mag = host
        .functions
        .invoke("magnitude", &[complex_value(Complex::new(3.0, 4.0))])
        .unwrap();
    assert_eq!(mag.as_f64(), Some(5.0));

    // strict function skipped on null input
    let null_mag = host.functions.invoke("magnitude", &[Value::Null]).unwrap();
    assert!(null_mag.is_null());
}

#[test]
fn sum_aggregate_folds_a_group() {
    let host = load_host(&ExtensionConfig::all());
    let mut acc = host
        .aggregates
        .accumulator("complex_sum", &host.types)
        .unwrap();

    let inputs = [
        complex_value(Complex::new(1.0, 2.0)),
        Value::Null, // skipped: strict transition
        complex_value(Complex::new(3.0, 4.0)),
        complex_value(Complex::new(5.0, 6.0)),
    ];
    for input in &inputs {
        acc.update(input).unwrap();
    }
    assert_complex(&acc.finish(), 9.0, 12.0);
}

#[test]
fn empty_group_returns_initial_state() {
    let host = load_host(&ExtensionConfig::all());
    let acc = host
        .aggregates
        .accumulator("complex_sum", &host.types)
        .unwrap();
    assert_complex(&acc.finish(), 0.0, 0.0);
}

#[test]
fn operator_class_is_registered_and_consistent() {
    let host = load_host(&ExtensionConfig::all());
    let class = host.classes.get("complex_abs_ops").expect("class missing");
    assert_eq!(class.index_method, "btree");
    assert_eq!(class.key_type, COMPLEX_OID);

    assert_eq!(
        host.classes
            .strategy_operator("complex_abs_ops", BTREE_STRATEGY_LESS),
        Some("<")
    );
    assert_eq!(
        host.classes
            .strategy_operator("complex_abs_ops", BTREE_STRATEGY_EQUAL),
        Some("=")
    );
    assert_eq!(
        host.classes
            .strategy_operator("complex_abs_ops", BTREE_STRATEGY_GREATER),
        Some(">")
    );

    // the support comparator agrees with the strategy operators
    let complex = complex_data_type();
    let values = [
        Complex::new(0.0, 0.0),
        Complex::new(3.0, 4.0),
        Complex::new(5.0, 0.0),
        Complex::new(56.0, -22.5),
        Complex::new(-43.2, -0.07),
    ];
    for a in values {
        for b in values {
            let ord = (class.compare)(&complex_value(a), &complex_value(b)).unwrap();
            let lt = host
                .operators
                .invoke("<", &complex, &complex, &complex_value(a), &complex_value(b))
                .unwrap();
            assert_eq!(lt.as_bool(), Some(ord == Ordering::Less));
            let ge = host
                .operators
                .invoke(">=", &complex, &complex, &complex_value(a), &complex_value(b))
                .unwrap();
            assert_eq!(ge.as_bool(), Some(ord != Ordering::Less));
        }
    }
}

#[test]
fn incomplete_operator_class_is_rejected() {
    let host = load_host(&ExtensionConfig::all());
    let mut classes = OperatorClassRegistry::new();

    let mut class = OperatorClass {
        name: "complex_partial_ops".to_string(),
        index_method: "btree".to_string(),
        key_type: COMPLEX_OID,
        strategies: vec![(BTREE_STRATEGY_LESS, "<".to_string())],
        compare: |_, _| Ok(Ordering::Equal),
    };
    assert!(matches!(
        classes.register(class, &host.types, &host.operators),
        Err(Error::Registration(_))
    ));

    // full strategy set but one operator never registered
    class = OperatorClass {
        name: "complex_bogus_ops".to_string(),
        index_method: "btree".to_string(),
        key_type: COMPLEX_OID,
        strategies: vec![
            (1, "<".to_string()),
            (2, "<=".to_string()),
            (3, "=".to_string()),
            (4, ">=".to_string()),
            (5, "~>".to_string()),
        ],
        compare: |_, _| Ok(Ordering::Equal),
    };
    assert!(matches!(
        classes.register(class, &host.types, &host.operators),
        Err(Error::Registration(_))
    ));
}
