//! Abstract syntax tree for gthunk modules.
//!
//! A [`Module`] is an ordered list of top-level [`LetBinding`]s. Expressions
//! are immutable value trees; equality and hashing are structural.
//! Children are shared through `Rc`, so cloning a node never copies its
//! subtrees.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde::Serialize;

use crate::parser::{reducer, Reducer};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Binary operator tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Subtract => "-",
            BinOp::Multiply => "*",
            BinOp::Divide => "/",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum Expr {
    /// A real-number literal.
    Real(f64),
    /// A reference to a name in scope.
    Ref(String),
    /// Application of a callee to a single argument.
    Call {
        callee: Rc<Expr>,
        argument: Rc<Expr>,
    },
    /// A function literal: `(param) -> bindings... body`.
    FnDef {
        param: String,
        bindings: Vec<LetBinding>,
        body: Rc<Expr>,
    },
    BinaryOp {
        op: BinOp,
        lhs: Rc<Expr>,
        rhs: Rc<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LetBinding {
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Module {
    pub declarations: Vec<LetBinding>,
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl Expr {
    pub fn real(value: f64) -> Self {
        Expr::Real(value)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Expr::Ref(name.into())
    }

    pub fn call(callee: Expr, argument: Expr) -> Self {
        Expr::Call {
            callee: Rc::new(callee),
            argument: Rc::new(argument),
        }
    }

    pub fn function(param: impl Into<String>, bindings: Vec<LetBinding>, body: Expr) -> Self {
        Expr::FnDef {
            param: param.into(),
            bindings,
            body: Rc::new(body),
        }
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::BinaryOp {
            op,
            lhs: Rc::new(lhs),
            rhs: Rc::new(rhs),
        }
    }
}

/// A reducer building `op` nodes, for use with precedence levels.
pub fn binary(op: BinOp) -> Reducer<Expr> {
    reducer(move |lhs: Expr, rhs: Expr| Expr::binary(op, lhs, rhs))
}

impl LetBinding {
    pub fn new(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Module {
    pub fn new(declarations: Vec<LetBinding>) -> Self {
        Self { declarations }
    }

    pub fn binding(&self, name: &str) -> Option<&LetBinding> {
        self.declarations.iter().find(|binding| binding.name == name)
    }
}

// ============================================================================
// EQUALITY AND HASHING
// ============================================================================

// Reals compare by bit pattern so that `Eq` and `Hash` agree.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        use Expr::*;
        match (self, other) {
            (Real(a), Real(b)) => a.to_bits() == b.to_bits(),
            (Ref(a), Ref(b)) => a == b,
            (
                Call {
                    callee: c1,
                    argument: a1,
                },
                Call {
                    callee: c2,
                    argument: a2,
                },
            ) => c1 == c2 && a1 == a2,
            (
                FnDef {
                    param: p1,
                    bindings: l1,
                    body: b1,
                },
                FnDef {
                    param: p2,
                    bindings: l2,
                    body: b2,
                },
            ) => p1 == p2 && l1 == l2 && b1 == b2,
            (
                BinaryOp {
                    op: o1,
                    lhs: l1,
                    rhs: r1,
                },
                BinaryOp {
                    op: o2,
                    lhs: l2,
                    rhs: r2,
                },
            ) => o1 == o2 && l1 == l2 && r1 == r2,
            _ => false,
        }
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Expr::Real(value) => value.to_bits().hash(state),
            Expr::Ref(name) => name.hash(state),
            Expr::Call { callee, argument } => {
                callee.hash(state);
                argument.hash(state);
            }
            Expr::FnDef {
                param,
                bindings,
                body,
            } => {
                param.hash(state);
                bindings.hash(state);
                body.hash(state);
            }
            Expr::BinaryOp { op, lhs, rhs } => {
                op.hash(state);
                lhs.hash(state);
                rhs.hash(state);
            }
        }
    }
}

// ============================================================================
// S-EXPRESSION RENDERING
// ============================================================================

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Real(value) => write!(f, "{value}"),
            Expr::Ref(name) => f.write_str(name),
            Expr::Call { callee, argument } => write!(f, "({callee} {argument})"),
            Expr::FnDef {
                param,
                bindings,
                body,
            } => {
                write!(f, "(fn {param} (")?;
                for (i, binding) in bindings.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{binding}")?;
                }
                write!(f, ") {body})")
            }
            Expr::BinaryOp { op, lhs, rhs } => write!(f, "({} {lhs} {rhs})", op.symbol()),
        }
    }
}

impl fmt::Display for LetBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(let {} {})", self.name, self.value)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, binding) in self.declarations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{binding}")?;
        }
        Ok(())
    }
}
