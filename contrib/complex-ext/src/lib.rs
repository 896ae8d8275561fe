//! Complex number type extension for Chert
//!
//! Implements the full extension surface for one scalar type:
//! - TypeExtension: text and wire codecs for `(re,im)` values
//! - OperatorExtension: `+` and the five magnitude-order comparisons
//! - FunctionExtension: magnitude() scalar function
//! - AggregateExtension: complex_sum fold
//! - Operator class: complex_abs_ops, binding the comparisons and the
//!   three-way comparator to the btree access method
//!
//! Auto-registers with Chert via inventory pattern (no cfg attributes needed)

use std::cmp::Ordering;
use std::ops::Add;
use std::sync::Arc;

use chertdb::error::{Error, Result};
use chertdb::extensions::loader::ExtensionLoader;
use chertdb::extensions::registry::{
    AggregateRegistry, FunctionRegistry, OperatorClassRegistry, OperatorRegistry, TypeRegistry,
};
use chertdb::extensions::{
    AggregateExtension, FunctionExtension, OperatorClass, OperatorExtension, TypeCategory,
    TypeExtension, BTREE_STRATEGY_EQUAL, BTREE_STRATEGY_GREATER, BTREE_STRATEGY_GREATER_EQUAL,
    BTREE_STRATEGY_LESS, BTREE_STRATEGY_LESS_EQUAL,
};
use chertdb::types::{DataType, Value};

/// First OID Postgres hands to user-defined objects
pub const COMPLEX_OID: u32 = 16384;

/// Wire encoding: two 8-byte big-endian float64 fields, real part first
pub const COMPLEX_WIRE_LEN: usize = 16;

/// Complex number: two IEEE-754 doubles, real part first.
///
/// The stored form is exactly this struct: 16 bytes, 8-byte aligned, no
/// optional fields. Values are immutable; every operation builds a new one.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

const _: () = assert!(std::mem::size_of::<Complex>() == COMPLEX_WIRE_LEN);
const _: () = assert!(std::mem::align_of::<Complex>() == 8);

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    /// Distance from the origin; the sort key for every comparison below
    pub fn magnitude(&self) -> f64 {
        (self.re * self.re + self.im * self.im).sqrt()
    }

    /// Total order by magnitude. Values of equal magnitude compare equal
    /// even when they differ bitwise -- there is no phase tie-break, and a
    /// btree built over this order relies on that. `total_cmp` keeps the
    /// order total when a component is non-finite: values whose magnitude
    /// is NaN sort together above every finite and infinite magnitude.
    pub fn magnitude_cmp(&self, other: &Complex) -> Ordering {
        self.magnitude().total_cmp(&other.magnitude())
    }
}

impl Add for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Complex {
        Complex {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

/// Wrap a complex in the host's extension value representation
pub fn complex_value(c: Complex) -> Value {
    Value::Extension {
        type_oid: COMPLEX_OID,
        data: Arc::new(c),
    }
}

/// Unwrap a host value, rejecting anything that is not a complex
pub fn as_complex(value: &Value) -> Result<Complex> {
    if let Value::Extension { data, .. } = value {
        if let Some(c) = data.downcast_ref::<Complex>() {
            return Ok(*c);
        }
    }
    Err(Error::InvalidOperation(
        "expected a complex value".to_string(),
    ))
}

/// DataType tag for complex columns and expressions
pub fn complex_data_type() -> DataType {
    DataType::Extension {
        type_oid: COMPLEX_OID,
        type_name: "complex".to_string(),
    }
}

fn is_complex(ty: &DataType) -> bool {
    matches!(
        ty,
        DataType::Extension {
            type_oid: COMPLEX_OID,
            ..
        }
    )
}

fn bad_complex_text(text: &str) -> Error {
    Error::Format(format!(
        "invalid input syntax for type complex: \"{}\"",
        text
    ))
}

/// Parse the external text form `( re , im )`. Whitespace around the
/// parentheses, the comma and the numerals is tolerated; each numeral must
/// be a finite float64.
fn parse_complex(text: &str) -> Result<Complex> {
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| bad_complex_text(text))?;
    let (re, im) = inner.split_once(',').ok_or_else(|| bad_complex_text(text))?;
    Ok(Complex {
        re: parse_part(re).ok_or_else(|| bad_complex_text(text))?,
        im: parse_part(im).ok_or_else(|| bad_complex_text(text))?,
    })
}

fn parse_part(part: &str) -> Option<f64> {
    let n: f64 = part.trim().parse().ok()?;
    n.is_finite().then_some(n)
}

/// Render the external text form. Rust float formatting emits the shortest
/// decimal that round-trips, so parse(format(v)) is bit-identical for
/// every finite v.
fn format_complex(c: &Complex) -> String {
    format!("({},{})", c.re, c.im)
}

/// Decode the portable wire form. Fails when fewer than 16 bytes remain
/// in the buffer; trailing bytes beyond the value are left to the caller.
fn receive_complex(buf: &[u8]) -> Result<Complex> {
    if buf.len() < COMPLEX_WIRE_LEN {
        return Err(Error::Format(format!(
            "complex wire data requires {} bytes, got {}",
            COMPLEX_WIRE_LEN,
            buf.len()
        )));
    }
    let re = f64::from_be_bytes([
        buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
    ]);
    let im = f64::from_be_bytes([
        buf[8], buf[9], buf[10], buf[11], buf[12], buf[13], buf[14], buf[15],
    ]);
    Ok(Complex { re, im })
}

/// Encode the portable wire form, the exact inverse of `receive_complex`
fn send_complex(c: &Complex) -> Vec<u8> {
    let mut buf = Vec::with_capacity(COMPLEX_WIRE_LEN);
    buf.extend_from_slice(&c.re.to_be_bytes());
    buf.extend_from_slice(&c.im.to_be_bytes());
    buf
}

/// Complex type registration: 16 bytes fixed, double-word aligned
pub struct ComplexType;

impl TypeExtension for ComplexType {
    fn type_oid(&self) -> u32 {
        COMPLEX_OID
    }

    fn type_name(&self) -> &str {
        "complex"
    }

    fn type_category(&self) -> TypeCategory {
        TypeCategory::Numeric
    }

    fn fixed_len(&self) -> Option<usize> {
        Some(COMPLEX_WIRE_LEN)
    }

    fn alignment(&self) -> usize {
        8
    }

    fn parse(&self, text: &str) -> Result<Value> {
        parse_complex(text).map(complex_value)
    }

    fn format(&self, value: &Value) -> Result<String> {
        Ok(format_complex(&as_complex(value)?))
    }

    fn receive(&self, buf: &[u8]) -> Result<Value> {
        receive_complex(buf).map(complex_value)
    }

    fn send(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(send_complex(&as_complex(value)?))
    }

    fn to_pgwire_type(&self) -> pgwire::api::Type {
        // No pgwire type for complex - report as UNKNOWN
        pgwire::api::Type::UNKNOWN
    }
}

/// Addition operator: complex + complex -> complex
pub struct AddOperator;

impl OperatorExtension for AddOperator {
    fn operator_symbol(&self) -> &str {
        "+"
    }

    fn commutator(&self) -> Option<&str> {
        Some("+")
    }

    fn can_handle(&self, left: &DataType, right: &DataType) -> bool {
        is_complex(left) && is_complex(right)
    }

    fn execute(&self, left: &Value, right: &Value) -> Result<Value> {
        Ok(complex_value(as_complex(left)? + as_complex(right)?))
    }

    fn return_type(&self, left: &DataType, right: &DataType) -> DataType {
        if self.can_handle(left, right) {
            complex_data_type()
        } else {
            DataType::Null
        }
    }
}

/// One row of operator facts for a magnitude comparison. Commutator,
/// negator and estimator names are planner metadata; `accept` turns the
/// comparator's sign into the operator's boolean result.
struct CmpSpec {
    symbol: &'static str,
    strategy: u16,
    commutator: &'static str,
    negator: &'static str,
    restrict: &'static str,
    join: &'static str,
    accept: fn(Ordering) -> bool,
}

/// The five comparisons, in btree strategy order
static CMP_OPS: [CmpSpec; 5] = [
    CmpSpec {
        symbol: "<",
        strategy: BTREE_STRATEGY_LESS,
        commutator: ">",
        negator: ">=",
        restrict: "scalarltsel",
        join: "scalarltjoinsel",
        accept: Ordering::is_lt,
    },
    CmpSpec {
        symbol: "<=",
        strategy: BTREE_STRATEGY_LESS_EQUAL,
        commutator: ">=",
        negator: ">",
        restrict: "scalarlesel",
        join: "scalarlejoinsel",
        accept: Ordering::is_le,
    },
    CmpSpec {
        symbol: "=",
        strategy: BTREE_STRATEGY_EQUAL,
        commutator: "=",
        negator: "<>",
        restrict: "eqsel",
        join: "eqjoinsel",
        accept: Ordering::is_eq,
    },
    CmpSpec {
        symbol: ">=",
        strategy: BTREE_STRATEGY_GREATER_EQUAL,
        commutator: "<=",
        negator: "<",
        restrict: "scalargesel",
        join: "scalargejoinsel",
        accept: Ordering::is_ge,
    },
    CmpSpec {
        symbol: ">",
        strategy: BTREE_STRATEGY_GREATER,
        commutator: "<",
        negator: "<=",
        restrict: "scalargtsel",
        join: "scalargtjoinsel",
        accept: Ordering::is_gt,
    },
];

/// Magnitude comparison operator: complex <op> complex -> bool.
///
/// All five share one comparator, so each operator's boolean result always
/// agrees with the comparator's sign -- the consistency a btree range scan
/// depends on.
pub struct MagnitudeCmpOperator {
    spec: &'static CmpSpec,
}

impl OperatorExtension for MagnitudeCmpOperator {
    fn operator_symbol(&self) -> &str {
        self.spec.symbol
    }

    fn commutator(&self) -> Option<&str> {
        Some(self.spec.commutator)
    }

    fn negator(&self) -> Option<&str> {
        Some(self.spec.negator)
    }

    fn restrict_estimator(&self) -> Option<&str> {
        Some(self.spec.restrict)
    }

    fn join_estimator(&self) -> Option<&str> {
        Some(self.spec.join)
    }

    fn can_handle(&self, left: &DataType, right: &DataType) -> bool {
        is_complex(left) && is_complex(right)
    }

    fn execute(&self, left: &Value, right: &Value) -> Result<Value> {
        let ord = as_complex(left)?.magnitude_cmp(&as_complex(right)?);
        Ok(Value::Bool((self.spec.accept)(ord)))
    }

    fn return_type(&self, left: &DataType, right: &DataType) -> DataType {
        if self.can_handle(left, right) {
            DataType::Bool
        } else {
            DataType::Null
        }
    }
}

/// Magnitude function: magnitude(complex) -> float
pub struct MagnitudeFunc;

impl FunctionExtension for MagnitudeFunc {
    fn name(&self) -> &str {
        "magnitude"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        if args.len() != 1 {
            return Err(Error::InvalidOperation(format!(
                "magnitude() expects 1 argument, got {}",
                args.len()
            )));
        }
        Ok(Value::Float(as_complex(&args[0])?.magnitude()))
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        if arg_types.len() == 1 && is_complex(&arg_types[0]) {
            Ok(DataType::Float)
        } else {
            Err(Error::InvalidOperation(
                "magnitude() expects a complex argument".to_string(),
            ))
        }
    }
}

/// Sum aggregate: fold complex inputs with `+` starting from (0,0).
///
/// Addition commutes and associates up to float rounding, so reordering
/// the inputs can change the result only by rounding.
pub struct ComplexSum;

impl AggregateExtension for ComplexSum {
    fn name(&self) -> &str {
        "complex_sum"
    }

    fn input_type(&self) -> u32 {
        COMPLEX_OID
    }

    fn state_type(&self) -> u32 {
        COMPLEX_OID
    }

    fn initial_state(&self) -> &str {
        "(0,0)"
    }

    fn transition(&self, state: Value, input: &Value) -> Result<Value> {
        Ok(complex_value(as_complex(&state)? + as_complex(input)?))
    }
}

/// Btree support function: three-way magnitude comparison
fn complex_cmp(left: &Value, right: &Value) -> Result<Ordering> {
    Ok(as_complex(left)?.magnitude_cmp(&as_complex(right)?))
}

/// Operator class binding the magnitude comparisons to the btree method
pub fn complex_abs_ops() -> OperatorClass {
    OperatorClass {
        name: "complex_abs_ops".to_string(),
        index_method: "btree".to_string(),
        key_type: COMPLEX_OID,
        strategies: CMP_OPS
            .iter()
            .map(|spec| (spec.strategy, spec.symbol.to_string()))
            .collect(),
        compare: complex_cmp,
    }
}

// ============================================================================
// Auto-discovery registration via inventory pattern
// ============================================================================

/// Complex extension loader - self-registers with Chert
#[derive(Default)]
pub struct ComplexExtLoader;

impl ComplexExtLoader {
    /// Const singleton instance for inventory registration
    pub const INSTANCE: Self = ComplexExtLoader;
}

impl ExtensionLoader for ComplexExtLoader {
    fn name(&self) -> &str {
        "complex"
    }

    fn load_types(&self, registry: &mut TypeRegistry) {
        registry.register(Box::new(ComplexType));
    }

    fn load_operators(&self, registry: &mut OperatorRegistry) {
        registry.register(Box::new(AddOperator));
        for spec in &CMP_OPS {
            registry.register(Box::new(MagnitudeCmpOperator { spec }));
        }
    }

    fn load_functions(&self, registry: &mut FunctionRegistry) {
        registry.register(Box::new(MagnitudeFunc));
    }

    fn load_aggregates(&self, registry: &mut AggregateRegistry) {
        registry.register(Box::new(ComplexSum));
    }

    fn load_operator_classes(
        &self,
        registry: &mut OperatorClassRegistry,
        types: &TypeRegistry,
        operators: &OperatorRegistry,
    ) -> Result<()> {
        registry.register(complex_abs_ops(), types, operators)
    }
}

// Auto-register this extension via inventory
// Uses a static reference that can be constructed at compile time
inventory::submit! {
    &ComplexExtLoader::INSTANCE as &'static dyn ExtensionLoader
}
