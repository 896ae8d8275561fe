pub mod builtin;
pub mod loader;
pub mod registry;

use std::cmp::Ordering;

use crate::error::Result;
use crate::types::{DataType, Value};

/// Type categories for operator coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Numeric,
    String,
    Boolean,
    Temporal,
    Array,
    Composite,
    Extension,
}

/// Planner-visible volatility class of a registered function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Volatility {
    /// Same arguments always produce the same result; safe to fold at plan time
    Immutable,
    /// Constant within a single statement
    Stable,
    Volatile,
}

/// Registration metadata for every callable an extension exposes.
///
/// The dispatcher consults these flags, the callable never branches on
/// them: a strict callable is not invoked when any argument is null, the
/// caller substitutes a null result instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionFlags {
    pub volatility: Volatility,
    pub strict: bool,
}

impl FunctionFlags {
    pub const fn strict_immutable() -> Self {
        FunctionFlags {
            volatility: Volatility::Immutable,
            strict: true,
        }
    }
}

/// Extension trait for custom data types
///
/// One implementation is the complete registration record for a type: its
/// identity, its storage geometry, and the four codec functions the host
/// calls to move values across its boundary (text in/out, wire in/out).
pub trait TypeExtension: Send + Sync {
    /// PostgreSQL-compatible type OID
    fn type_oid(&self) -> u32;

    /// Type name (e.g., "complex", "vector")
    fn type_name(&self) -> &str;

    /// Category for type coercion
    fn type_category(&self) -> TypeCategory;

    /// Internal length in bytes, or None for variable-length types
    fn fixed_len(&self) -> Option<usize>;

    /// Required alignment of the stored representation
    fn alignment(&self) -> usize;

    /// DataType tag the host's expression layer uses for this type's values
    fn data_type(&self) -> DataType {
        DataType::Extension {
            type_oid: self.type_oid(),
            type_name: self.type_name().to_string(),
        }
    }

    /// Metadata covering all four codec functions. Codecs are strict: the
    /// host never hands them a null, so they do not check for one.
    fn codec_flags(&self) -> FunctionFlags {
        FunctionFlags::strict_immutable()
    }

    /// Parse the external text form into a value
    fn parse(&self, text: &str) -> Result<Value>;

    /// Render a value in its external text form
    fn format(&self, value: &Value) -> Result<String>;

    /// Decode the portable wire form. The buffer may carry trailing bytes
    /// beyond this value's encoding; a short buffer is a format error.
    fn receive(&self, buf: &[u8]) -> Result<Value>;

    /// Encode the portable wire form, the exact inverse of `receive`
    fn send(&self, value: &Value) -> Result<Vec<u8>>;

    /// Convert to PostgreSQL type for protocol
    fn to_pgwire_type(&self) -> pgwire::api::Type;
}

/// Extension trait for custom operators
///
/// Commutator, negator and estimator entries are identifying metadata for
/// the host's planner; the extension declares the facts and implements
/// none of the planning logic.
pub trait OperatorExtension: Send + Sync {
    /// Operator symbol (e.g., "+", "<", "<->")
    fn operator_symbol(&self) -> &str;

    /// Strictness/volatility of the implementing function
    fn flags(&self) -> FunctionFlags {
        FunctionFlags::strict_immutable()
    }

    /// Symbol of the operator obtained by swapping operand order
    fn commutator(&self) -> Option<&str> {
        None
    }

    /// Symbol of the operator whose result is the logical complement
    fn negator(&self) -> Option<&str> {
        None
    }

    /// Name of the planner's restriction selectivity estimator
    fn restrict_estimator(&self) -> Option<&str> {
        None
    }

    /// Name of the planner's join selectivity estimator
    fn join_estimator(&self) -> Option<&str> {
        None
    }

    /// Check if this operator can handle these types
    fn can_handle(&self, left_type: &DataType, right_type: &DataType) -> bool;

    /// Execute the operator. A strict operator never sees a null argument;
    /// the dispatcher short-circuits first.
    fn execute(&self, left: &Value, right: &Value) -> Result<Value>;

    /// Return type given input types
    fn return_type(&self, left_type: &DataType, right_type: &DataType) -> DataType;
}

/// Extension trait for scalar functions
pub trait FunctionExtension: Send + Sync {
    /// Function name
    fn name(&self) -> &str;

    /// Strictness/volatility of the function
    fn flags(&self) -> FunctionFlags {
        FunctionFlags::strict_immutable()
    }

    /// Execute the function
    fn execute(&self, args: &[Value]) -> Result<Value>;

    /// Return type given argument types
    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType>;
}

/// Extension trait for aggregates
///
/// An implementation is a registration record: input and state types, the
/// initial state written as a text literal parsed through the state type's
/// own input codec, and the per-row transition. The host folds inputs via
/// `registry::Accumulator`; there is no separate finalizer, the running
/// state is the result.
pub trait AggregateExtension: Send + Sync {
    /// Aggregate name (e.g., "complex_sum")
    fn name(&self) -> &str;

    /// OID of the input type
    fn input_type(&self) -> u32;

    /// OID of the transition state type
    fn state_type(&self) -> u32;

    /// Initial state, written in the state type's text form
    fn initial_state(&self) -> &str;

    /// Strictness/volatility of the transition function. A strict
    /// transition never sees null inputs; the accumulator skips them.
    fn transition_flags(&self) -> FunctionFlags {
        FunctionFlags::strict_immutable()
    }

    /// Fold one input into the running state
    fn transition(&self, state: Value, input: &Value) -> Result<Value>;
}

/// Three-way comparator registered as an operator class support function.
/// Its sign must agree with the class's boolean operators for every pair
/// of values; an index built over an inconsistent pair silently returns
/// wrong rows.
pub type CompareFn = fn(&Value, &Value) -> Result<Ordering>;

/// B-tree strategy numbers: which comparison role an operator fills
pub const BTREE_STRATEGY_LESS: u16 = 1;
pub const BTREE_STRATEGY_LESS_EQUAL: u16 = 2;
pub const BTREE_STRATEGY_EQUAL: u16 = 3;
pub const BTREE_STRATEGY_GREATER_EQUAL: u16 = 4;
pub const BTREE_STRATEGY_GREATER: u16 = 5;

/// Every strategy an ordered access method requires
pub const BTREE_STRATEGIES: [u16; 5] = [
    BTREE_STRATEGY_LESS,
    BTREE_STRATEGY_LESS_EQUAL,
    BTREE_STRATEGY_EQUAL,
    BTREE_STRATEGY_GREATER_EQUAL,
    BTREE_STRATEGY_GREATER,
];

/// Operator class: binds a type's comparison operators and comparator to
/// an index access method.
///
/// Declarative only -- the access method itself lives in the host. The
/// strategy table is a fixed association list; `OperatorClassRegistry`
/// validates it against the operator registry at registration time.
pub struct OperatorClass {
    /// Class name (e.g., "complex_abs_ops")
    pub name: String,
    /// Access method this class serves (e.g., "btree")
    pub index_method: String,
    /// OID of the indexed key type
    pub key_type: u32,
    /// strategy number -> operator symbol
    pub strategies: Vec<(u16, String)>,
    /// Three-way comparator support function
    pub compare: CompareFn,
}
