use std::collections::HashMap;

use super::{
    AggregateExtension, FunctionExtension, OperatorClass, OperatorExtension, TypeExtension,
    BTREE_STRATEGIES,
};
use crate::error::{Error, Result};
use crate::types::{DataType, Value};

/// Registry for type extensions
pub struct TypeRegistry {
    types: HashMap<u32, Box<dyn TypeExtension>>,
    names: HashMap<String, u32>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry {
            types: HashMap::new(),
            names: HashMap::new(),
        }
    }

    pub fn register(&mut self, ext: Box<dyn TypeExtension>) {
        let oid = ext.type_oid();
        let name = ext.type_name().to_string();
        self.types.insert(oid, ext);
        self.names.insert(name, oid);
    }

    pub fn get_by_oid(&self, oid: u32) -> Option<&dyn TypeExtension> {
        self.types.get(&oid).map(|b| &**b)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&dyn TypeExtension> {
        self.names
            .get(name)
            .and_then(|oid| self.types.get(oid))
            .map(|b| &**b)
    }
}

/// Registry for operator extensions
pub struct OperatorRegistry {
    operators: Vec<Box<dyn OperatorExtension>>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        OperatorRegistry {
            operators: Vec::new(),
        }
    }

    pub fn register(&mut self, ext: Box<dyn OperatorExtension>) {
        self.operators.push(ext);
    }

    pub fn find(
        &self,
        symbol: &str,
        left: &DataType,
        right: &DataType,
    ) -> Option<&dyn OperatorExtension> {
        self.operators
            .iter()
            .find(|op| op.operator_symbol() == symbol && op.can_handle(left, right))
            .map(|b| &**b)
    }

    /// Dispatch an operator call through its registration metadata. A
    /// strict operator never sees a null argument: the null result is
    /// substituted here without invoking the implementation.
    pub fn invoke(
        &self,
        symbol: &str,
        left_type: &DataType,
        right_type: &DataType,
        left: &Value,
        right: &Value,
    ) -> Result<Value> {
        let op = self.find(symbol, left_type, right_type).ok_or_else(|| {
            Error::InvalidOperation(format!(
                "No operator {} for {:?} and {:?}",
                symbol, left_type, right_type
            ))
        })?;
        if op.flags().strict && (left.is_null() || right.is_null()) {
            return Ok(Value::Null);
        }
        op.execute(left, right)
    }
}

/// Registry for function extensions
pub struct FunctionRegistry {
    functions: HashMap<String, Box<dyn FunctionExtension>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        FunctionRegistry {
            functions: HashMap::new(),
        }
    }

    pub fn register(&mut self, ext: Box<dyn FunctionExtension>) {
        self.functions.insert(ext.name().to_string(), ext);
    }

    pub fn get(&self, name: &str) -> Option<&dyn FunctionExtension> {
        self.functions.get(name).map(|b| &**b)
    }

    /// Dispatch a function call through its registration metadata,
    /// substituting a null result for strict functions with null arguments
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value> {
        let func = self
            .get(name)
            .ok_or_else(|| Error::InvalidOperation(format!("Function not found: {}", name)))?;
        if func.flags().strict && args.iter().any(Value::is_null) {
            return Ok(Value::Null);
        }
        func.execute(args)
    }
}

/// Registry for aggregate extensions
pub struct AggregateRegistry {
    aggregates: HashMap<String, Box<dyn AggregateExtension>>,
}

impl AggregateRegistry {
    pub fn new() -> Self {
        AggregateRegistry {
            aggregates: HashMap::new(),
        }
    }

    pub fn register(&mut self, ext: Box<dyn AggregateExtension>) {
        self.aggregates.insert(ext.name().to_string(), ext);
    }

    pub fn get(&self, name: &str) -> Option<&dyn AggregateExtension> {
        self.aggregates.get(name).map(|b| &**b)
    }

    /// Start a fold for the named aggregate. The initial state is
    /// materialized by parsing the registered literal through the state
    /// type's input codec.
    pub fn accumulator<'a>(&'a self, name: &str, types: &TypeRegistry) -> Result<Accumulator<'a>> {
        let agg = self
            .get(name)
            .ok_or_else(|| Error::InvalidOperation(format!("Aggregate not found: {}", name)))?;
        let state_type = types.get_by_oid(agg.state_type()).ok_or_else(|| {
            Error::InvalidOperation(format!(
                "Aggregate {} has unregistered state type {}",
                name,
                agg.state_type()
            ))
        })?;
        let state = state_type.parse(agg.initial_state())?;
        Ok(Accumulator { agg, state })
    }
}

/// Host-side driver for one aggregate group: folds inputs into the running
/// state and hands that state back unchanged as the final result
pub struct Accumulator<'a> {
    agg: &'a dyn AggregateExtension,
    state: Value,
}

impl Accumulator<'_> {
    /// Fold one input row. Null inputs are skipped when the transition
    /// function is strict.
    pub fn update(&mut self, input: &Value) -> Result<()> {
        if self.agg.transition_flags().strict && input.is_null() {
            return Ok(());
        }
        let state = std::mem::replace(&mut self.state, Value::Null);
        self.state = self.agg.transition(state, input)?;
        Ok(())
    }

    pub fn finish(self) -> Value {
        self.state
    }
}

/// Registry for operator classes
pub struct OperatorClassRegistry {
    classes: HashMap<String, OperatorClass>,
}

impl OperatorClassRegistry {
    pub fn new() -> Self {
        OperatorClassRegistry {
            classes: HashMap::new(),
        }
    }

    /// Validate and register an operator class.
    ///
    /// The key type must be registered, every strategy entry must resolve
    /// to an operator over the key type, and for the btree method the
    /// table must name each of the five comparison strategies exactly once.
    pub fn register(
        &mut self,
        class: OperatorClass,
        types: &TypeRegistry,
        operators: &OperatorRegistry,
    ) -> Result<()> {
        let key_ext = types.get_by_oid(class.key_type).ok_or_else(|| {
            Error::Registration(format!(
                "operator class {}: key type {} is not registered",
                class.name, class.key_type
            ))
        })?;
        let key = key_ext.data_type();

        if class.index_method == "btree" {
            for strategy in BTREE_STRATEGIES {
                match class
                    .strategies
                    .iter()
                    .filter(|(number, _)| *number == strategy)
                    .count()
                {
                    1 => {}
                    0 => {
                        return Err(Error::Registration(format!(
                            "operator class {}: missing btree strategy {}",
                            class.name, strategy
                        )));
                    }
                    _ => {
                        return Err(Error::Registration(format!(
                            "operator class {}: duplicate btree strategy {}",
                            class.name, strategy
                        )));
                    }
                }
            }
            if class.strategies.len() != BTREE_STRATEGIES.len() {
                return Err(Error::Registration(format!(
                    "operator class {}: unknown btree strategy number",
                    class.name
                )));
            }
        }

        for (strategy, symbol) in &class.strategies {
            if operators.find(symbol, &key, &key).is_none() {
                return Err(Error::Registration(format!(
                    "operator class {}: strategy {} names unregistered operator {}",
                    class.name, strategy, symbol
                )));
            }
        }

        self.classes.insert(class.name.clone(), class);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&OperatorClass> {
        self.classes.get(name)
    }

    /// Operator symbol registered for a strategy number
    pub fn strategy_operator(&self, class: &str, strategy: u16) -> Option<&str> {
        self.classes
            .get(class)?
            .strategies
            .iter()
            .find(|(number, _)| *number == strategy)
            .map(|(_, symbol)| symbol.as_str())
    }
}
