// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::operators::OpFcn;
use crate::path::Path;
use crate::value::Value;
use crate::Rc;

/// A compiled match-mode query.
///
/// Compilation is independent of any document; the tree is immutable and
/// may be evaluated against many documents.
#[derive(Debug, Clone)]
pub struct Query {
    pub(crate) filter: Filter,
}

/// A compiled expression-mode tree, as found under `$expr`.
#[derive(Debug, Clone)]
pub struct Expression {
    pub(crate) node: ExprNode,
}

#[derive(Debug, Clone)]
pub(crate) enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Nor(Vec<Filter>),
    Not(Box<Filter>),
    Field(Path, FieldPred),
    Expr(ExprNode),
}

/// A predicate applied to the value resolved at a field path.
#[derive(Debug, Clone)]
pub(crate) enum FieldPred {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Exists(bool),
    Type(Vec<TypeTag>),
    Size(usize),
    All(Vec<Value>),
    Mod(i64, i64),
    Matches(Rc<str>),
    Not(Box<FieldPred>),
    // Implicit AND of the operators inside one subdocument,
    // e.g. { $gt: 3, $lt: 9 }.
    AllOf(Vec<FieldPred>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeTag {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl TypeTag {
    pub(crate) fn parse(name: &str) -> Option<TypeTag> {
        Some(match name {
            "null" => TypeTag::Null,
            "bool" | "boolean" => TypeTag::Bool,
            "number" => TypeTag::Number,
            "string" => TypeTag::String,
            "array" => TypeTag::Array,
            "object" => TypeTag::Object,
            _ => return None,
        })
    }

    pub(crate) fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (TypeTag::Null, Value::Null)
                | (TypeTag::Bool, Value::Bool(_))
                | (TypeTag::Number, Value::Number(_))
                | (TypeTag::String, Value::String(_))
                | (TypeTag::Array, Value::Array(_))
                | (TypeTag::Object, Value::Object(_))
        )
    }
}

#[derive(Debug, Clone)]
pub(crate) enum ExprNode {
    Literal(Value),
    FieldRef(Path),
    // Composite literals evaluate their members as expressions.
    ArrayLit(Vec<ExprNode>),
    ObjectLit(Vec<(String, ExprNode)>),
    // A registry operator; arguments are evaluated eagerly.
    Op {
        name: &'static str,
        fcn: OpFcn,
        args: Vec<ExprNode>,
    },
    // Lazy operators with their own evaluation rules.
    And(Vec<ExprNode>),
    Or(Vec<ExprNode>),
    IfNull(Box<ExprNode>, Box<ExprNode>),
    Cond {
        cond: Box<ExprNode>,
        then: Box<ExprNode>,
        otherwise: Box<ExprNode>,
    },
    Switch {
        branches: Vec<(ExprNode, ExprNode)>,
        default: Option<Box<ExprNode>>,
    },
}
