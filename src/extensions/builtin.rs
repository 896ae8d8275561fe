use pgwire::api::Type;

use super::{TypeCategory, TypeExtension};
use crate::error::{Error, Result};
use crate::types::{DataType, Value};

/// Built-in Int type extension
pub struct IntType;

impl TypeExtension for IntType {
    fn type_oid(&self) -> u32 {
        20 // PostgreSQL INT8 OID
    }

    fn type_name(&self) -> &str {
        "int"
    }

    fn type_category(&self) -> TypeCategory {
        TypeCategory::Numeric
    }

    fn fixed_len(&self) -> Option<usize> {
        Some(8)
    }

    fn alignment(&self) -> usize {
        8
    }

    fn data_type(&self) -> DataType {
        DataType::Int
    }

    fn parse(&self, text: &str) -> Result<Value> {
        text.trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| Error::Format(format!("invalid input syntax for type int: \"{}\"", text)))
    }

    fn format(&self, value: &Value) -> Result<String> {
        match value {
            Value::Int(n) => Ok(n.to_string()),
            _ => Err(Error::InvalidOperation("expected an int value".to_string())),
        }
    }

    fn receive(&self, buf: &[u8]) -> Result<Value> {
        if buf.len() < 8 {
            return Err(Error::Format(format!(
                "int wire data requires 8 bytes, got {}",
                buf.len()
            )));
        }
        let arr = [
            buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
        ];
        Ok(Value::Int(i64::from_be_bytes(arr)))
    }

    fn send(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::Int(n) => Ok(n.to_be_bytes().to_vec()),
            _ => Err(Error::InvalidOperation("expected an int value".to_string())),
        }
    }

    fn to_pgwire_type(&self) -> Type {
        Type::INT8
    }
}

/// Built-in Float type extension
pub struct FloatType;

impl TypeExtension for FloatType {
    fn type_oid(&self) -> u32 {
        701 // PostgreSQL FLOAT8 OID
    }

    fn type_name(&self) -> &str {
        "float"
    }

    fn type_category(&self) -> TypeCategory {
        TypeCategory::Numeric
    }

    fn fixed_len(&self) -> Option<usize> {
        Some(8)
    }

    fn alignment(&self) -> usize {
        8
    }

    fn data_type(&self) -> DataType {
        DataType::Float
    }

    fn parse(&self, text: &str) -> Result<Value> {
        text.trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| Error::Format(format!("invalid input syntax for type float: \"{}\"", text)))
    }

    fn format(&self, value: &Value) -> Result<String> {
        match value {
            Value::Float(f) => Ok(f.to_string()),
            _ => Err(Error::InvalidOperation("expected a float value".to_string())),
        }
    }

    fn receive(&self, buf: &[u8]) -> Result<Value> {
        if buf.len() < 8 {
            return Err(Error::Format(format!(
                "float wire data requires 8 bytes, got {}",
                buf.len()
            )));
        }
        let arr = [
            buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
        ];
        Ok(Value::Float(f64::from_be_bytes(arr)))
    }

    fn send(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::Float(f) => Ok(f.to_be_bytes().to_vec()),
            _ => Err(Error::InvalidOperation("expected a float value".to_string())),
        }
    }

    fn to_pgwire_type(&self) -> Type {
        Type::FLOAT8
    }
}

/// Built-in String type extension
pub struct StringType;

impl TypeExtension for StringType {
    fn type_oid(&self) -> u32 {
        1043 // PostgreSQL VARCHAR OID
    }

    fn type_name(&self) -> &str {
        "string"
    }

    fn type_category(&self) -> TypeCategory {
        TypeCategory::String
    }

    fn fixed_len(&self) -> Option<usize> {
        None
    }

    fn alignment(&self) -> usize {
        1
    }

    fn data_type(&self) -> DataType {
        DataType::String
    }

    fn parse(&self, text: &str) -> Result<Value> {
        Ok(Value::String(text.to_string()))
    }

    fn format(&self, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            _ => Err(Error::InvalidOperation(
                "expected a string value".to_string(),
            )),
        }
    }

    fn receive(&self, buf: &[u8]) -> Result<Value> {
        let s = String::from_utf8(buf.to_vec())
            .map_err(|_| Error::Format("invalid UTF-8 in string wire data".to_string()))?;
        Ok(Value::String(s))
    }

    fn send(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::String(s) => Ok(s.as_bytes().to_vec()),
            _ => Err(Error::InvalidOperation(
                "expected a string value".to_string(),
            )),
        }
    }

    fn to_pgwire_type(&self) -> Type {
        Type::VARCHAR
    }
}

/// Built-in Bool type extension
pub struct BoolType;

impl TypeExtension for BoolType {
    fn type_oid(&self) -> u32 {
        16 // PostgreSQL BOOL OID
    }

    fn type_name(&self) -> &str {
        "bool"
    }

    fn type_category(&self) -> TypeCategory {
        TypeCategory::Boolean
    }

    fn fixed_len(&self) -> Option<usize> {
        Some(1)
    }

    fn alignment(&self) -> usize {
        1
    }

    fn data_type(&self) -> DataType {
        DataType::Bool
    }

    fn parse(&self, text: &str) -> Result<Value> {
        let t = text.trim();
        if t.eq_ignore_ascii_case("t") || t.eq_ignore_ascii_case("true") {
            Ok(Value::Bool(true))
        } else if t.eq_ignore_ascii_case("f") || t.eq_ignore_ascii_case("false") {
            Ok(Value::Bool(false))
        } else {
            Err(Error::Format(format!(
                "invalid input syntax for type bool: \"{}\"",
                text
            )))
        }
    }

    fn format(&self, value: &Value) -> Result<String> {
        match value {
            Value::Bool(b) => Ok(if *b { "t" } else { "f" }.to_string()),
            _ => Err(Error::InvalidOperation("expected a bool value".to_string())),
        }
    }

    fn receive(&self, buf: &[u8]) -> Result<Value> {
        if buf.is_empty() {
            return Err(Error::Format(
                "bool wire data requires 1 byte, got 0".to_string(),
            ));
        }
        Ok(Value::Bool(buf[0] != 0))
    }

    fn send(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::Bool(b) => Ok(vec![if *b { 1 } else { 0 }]),
            _ => Err(Error::InvalidOperation("expected a bool value".to_string())),
        }
    }

    fn to_pgwire_type(&self) -> Type {
        Type::BOOL
    }
}

/// Register all built-in type extensions
pub fn register_builtin_types(registry: &mut super::registry::TypeRegistry) {
    registry.register(Box::new(IntType));
    registry.register(Box::new(FloatType));
    registry.register(Box::new(StringType));
    registry.register(Box::new(BoolType));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_text_round_trip() {
        let ty = IntType;
        let v = ty.parse(" -42 ").unwrap();
        assert_eq!(v.as_i64(), Some(-42));
        assert_eq!(ty.format(&v).unwrap(), "-42");
        assert!(ty.parse("4.5").is_err());
    }

    #[test]
    fn float_wire_round_trip() {
        let ty = FloatType;
        let v = Value::Float(-2.5);
        let wire = ty.send(&v).unwrap();
        assert_eq!(wire.len(), 8);
        assert_eq!(ty.receive(&wire).unwrap().as_f64(), Some(-2.5));
        assert!(matches!(ty.receive(&wire[..4]), Err(Error::Format(_))));
    }

    #[test]
    fn bool_text_forms() {
        let ty = BoolType;
        assert_eq!(ty.parse("t").unwrap().as_bool(), Some(true));
        assert_eq!(ty.parse("FALSE").unwrap().as_bool(), Some(false));
        assert!(ty.parse("maybe").is_err());
        assert_eq!(ty.format(&Value::Bool(true)).unwrap(), "t");
    }

    #[test]
    fn string_wire_rejects_bad_utf8() {
        let ty = StringType;
        assert!(matches!(
            ty.receive(&[0xff, 0xfe]),
            Err(Error::Format(_))
        ));
    }
}
