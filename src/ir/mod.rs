//! Normalized program representation consumed by the analyzer.
//!
//! A front end lowers source text into this shape: every call carries its
//! fully qualified callee symbol, its argument values and a source position.
//! The analyzer only reads it; nothing here is mutated after loading.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use loader::{discover_ir_files, load_program, parse_program, IrFormat};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Label of the document the program was loaded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub functions: Vec<Function>,
}

impl Program {
    pub fn new(functions: Vec<Function>) -> Self {
        Self {
            source: None,
            functions,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.functions.iter().map(|f| f.calls().count()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    pub fn new(name: impl Into<String>, blocks: Vec<BasicBlock>) -> Self {
        Self {
            name: name.into(),
            blocks,
        }
    }

    /// Call instructions in block order, then instruction order.
    pub fn calls(&self) -> impl Iterator<Item = &CallInst> {
        self.blocks
            .iter()
            .flat_map(|block| &block.instructions)
            .filter_map(Instruction::as_call)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicBlock {
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

impl BasicBlock {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instruction {
    Call(CallInst),
    Other {
        #[serde(default)]
        opcode: Option<String>,
    },
}

impl Instruction {
    pub fn as_call(&self) -> Option<&CallInst> {
        match self {
            Instruction::Call(call) => Some(call),
            Instruction::Other { .. } => None,
        }
    }
}

impl From<CallInst> for Instruction {
    fn from(call: CallInst) -> Self {
        Instruction::Call(call)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallInst {
    pub callee: String,
    #[serde(default)]
    pub args: Vec<ArgValue>,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl CallInst {
    pub fn new(callee: impl Into<String>, args: Vec<ArgValue>, position: Position) -> Self {
        Self {
            callee: callee.into(),
            args,
            position,
            result: None,
        }
    }

    pub fn with_result(mut self, binding: impl Into<String>) -> Self {
        self.result = Some(binding.into());
        self
    }

    pub fn arg(&self, index: usize) -> Option<&ArgValue> {
        self.args.get(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.file.is_empty() && self.line > 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// An argument as the front end saw it.
///
/// `Wrapped` models interface boxing and must be unwrapped before the inner
/// value can be inspected. `CallResult` keeps the producing callee so that
/// well-known producers can be recognized by identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArgValue {
    Constant { value: Literal },
    Wrapped { inner: Box<ArgValue> },
    CallResult { callee: String },
    Unresolved {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
    },
}

impl ArgValue {
    pub fn int(value: i64) -> Self {
        Self::Constant {
            value: Literal::Int(value),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Constant {
            value: Literal::Str(value.into()),
        }
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Self::Constant {
            value: Literal::Bytes(value.into()),
        }
    }

    pub fn nil() -> Self {
        Self::Constant {
            value: Literal::Nil,
        }
    }

    pub fn wrapped(inner: ArgValue) -> Self {
        Self::Wrapped {
            inner: Box::new(inner),
        }
    }

    pub fn call_result(callee: impl Into<String>) -> Self {
        Self::CallResult {
            callee: callee.into(),
        }
    }

    pub fn unresolved() -> Self {
        Self::Unresolved { origin: None }
    }

    pub fn unresolved_from(origin: impl Into<String>) -> Self {
        Self::Unresolved {
            origin: Some(origin.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
    /// Untyped nil.
    Nil,
}

impl Literal {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Literal::Nil)
    }

    /// Length of the literal when it denotes a byte sequence.
    pub fn byte_len(&self) -> Option<usize> {
        match self {
            Literal::Bytes(bytes) => Some(bytes.len()),
            Literal::Str(s) => Some(s.len()),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(value) => write!(f, "{value}"),
            Literal::Str(s) => write!(f, "{s:?}"),
            Literal::Bytes(bytes) => write!(f, "[{} bytes]", bytes.len()),
            Literal::Nil => write!(f, "nil"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display() {
        let pos = Position::new("main.go", 12, 20);
        assert_eq!(pos.to_string(), "main.go:12:20");
    }

    #[test]
    fn test_position_validity() {
        assert!(Position::new("main.go", 1, 1).is_valid());
        assert!(!Position::new("", 1, 1).is_valid());
        assert!(!Position::new("main.go", 0, 1).is_valid());
    }

    #[test]
    fn test_deserialize_call_instruction() {
        let json = r#"{
            "kind": "call",
            "callee": "crypto/rsa.GenerateKey",
            "args": [
                {"kind": "call_result", "callee": "crypto/rand.Reader"},
                {"kind": "constant", "value": {"type": "int", "value": 2048}}
            ],
            "position": {"file": "main.go", "line": 11, "column": 22},
            "result": "t0"
        }"#;

        let inst: Instruction = serde_json::from_str(json).unwrap();
        let call = inst.as_call().unwrap();
        assert_eq!(call.callee, "crypto/rsa.GenerateKey");
        assert_eq!(call.args[1], ArgValue::int(2048));
        assert_eq!(call.result.as_deref(), Some("t0"));
    }

    #[test]
    fn test_deserialize_other_instruction() {
        let json = r#"{"kind": "other", "opcode": "store"}"#;
        let inst: Instruction = serde_json::from_str(json).unwrap();
        assert!(inst.as_call().is_none());
    }

    #[test]
    fn test_deserialize_nested_values() {
        let json = r#"{"kind": "wrapped", "inner": {"kind": "constant", "value": {"type": "nil"}}}"#;
        let value: ArgValue = serde_json::from_str(json).unwrap();
        assert_eq!(value, ArgValue::wrapped(ArgValue::nil()));

        let json = r#"{"kind": "constant", "value": {"type": "bytes", "value": [255]}}"#;
        let value: ArgValue = serde_json::from_str(json).unwrap();
        assert_eq!(value, ArgValue::bytes(vec![0xff]));
    }

    #[test]
    fn test_literal_byte_len() {
        assert_eq!(Literal::Bytes(vec![1, 2, 3]).byte_len(), Some(3));
        assert_eq!(Literal::Str("1234".to_string()).byte_len(), Some(4));
        assert_eq!(Literal::Int(4).byte_len(), None);
        assert_eq!(Literal::Nil.byte_len(), None);
    }

    #[test]
    fn test_function_calls_skip_other_instructions() {
        let call = CallInst::new("fmt.Println", vec![], Position::new("main.go", 3, 2));
        let function = Function::new(
            "main",
            vec![
                BasicBlock::new(vec![Instruction::Other { opcode: None }]),
                BasicBlock::new(vec![call.clone().into()]),
            ],
        );

        let calls: Vec<_> = function.calls().collect();
        assert_eq!(calls, vec![&call]);
        assert_eq!(Program::new(vec![function]).call_count(), 1);
    }
}
