//! Verilog IR.

use std::fmt;

use itertools::Itertools;

use crate::utils::indent;

const INDENT: usize = 4;

/// Module.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Module {
    /// Module name.
    pub name: String,

    /// Parameters with their default values.
    pub params: Vec<(String, usize)>,

    /// Port declarations.
    pub port_decls: Vec<PortDeclaration>,

    /// Module items.
    pub module_items: Vec<ModuleItem>,
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = if self.params.is_empty() {
            String::new()
        } else {
            let mut params = self.params.iter().map(|(name, value)| format!("parameter {} = {}", name, value));
            format!(" #(\n{}\n)", indent(params.join(",\n"), INDENT))
        };

        write!(
            f,
            "`timescale 1ns / 1ps\n\nmodule {}{}\n(\n{}\n);\n\n{}\n\nendmodule",
            self.name,
            params,
            indent(self.port_decls.iter().join(",\n"), INDENT),
            self.module_items.iter().join("\n\n")
        )
    }
}

/// Module item.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ModuleItem {
    /// Declarations.
    Declarations(Vec<Declaration>),

    /// Continuous assignments.
    ContinuousAssigns(Vec<ContinuousAssign>),

    /// Always construct.
    AlwaysConstruct(String, Vec<Statement>),

    /// Comment followed by module items.
    Commented(String, Vec<ModuleItem>),
}

impl fmt::Display for ModuleItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleItem::Declarations(decls) => write!(f, "{}", decls.iter().join("\n")),
            ModuleItem::ContinuousAssigns(conts) => write!(f, "{}", conts.iter().join("\n")),
            ModuleItem::AlwaysConstruct(event, stmts) => {
                write!(f, "{} begin\n{}\nend", event, indent(stmts.iter().join("\n"), INDENT))
            }
            ModuleItem::Commented(comment, items) => write!(f, "// {}\n{}", comment, items.iter().join("\n\n")),
        }
    }
}

/// Bit width of a net, port or register.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Width {
    /// Constant width.
    Const(usize),

    /// Width given by a module parameter.
    Param(String),
}

impl Width {
    /// Range prefix of a declaration, e.g. `[DATA_WIDTH-1:0] `. Empty for single bits.
    fn range(&self) -> String {
        match self {
            Width::Const(1) => String::new(),
            Width::Const(width) => format!("[{}-1:0] ", width),
            Width::Param(param) => format!("[{}-1:0] ", param),
        }
    }
}

/// Port declaration.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PortDeclaration {
    /// Input declaration.
    Input(Width, String),

    /// Output declaration.
    Output(Width, String),
}

impl fmt::Display for PortDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(width, ident) => write!(f, "input wire {}{}", width.range(), ident),
            Self::Output(width, ident) => write!(f, "output wire {}{}", width.range(), ident),
        }
    }
}

impl PortDeclaration {
    /// Creates new input port declaration.
    pub fn input(width: Width, ident: &str) -> Self { Self::Input(width, ident.to_string()) }

    /// Creates new output port declaration.
    pub fn output(width: Width, ident: &str) -> Self { Self::Output(width, ident.to_string()) }
}

/// Declaration.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Declaration {
    /// Net declaration.
    Net(Width, String),

    /// Reg declaration.
    Reg(Width, String),
}

impl Declaration {
    /// Net declaration.
    #[inline]
    pub fn net(width: Width, ident: &str) -> Self { Declaration::Net(width, ident.to_string()) }

    /// Reg declaration.
    #[inline]
    pub fn reg(width: Width, ident: &str) -> Self { Declaration::Reg(width, ident.to_string()) }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Net(width, ident) => write!(f, "wire {}{};", width.range(), ident),
            Self::Reg(width, ident) => write!(f, "reg {}{};", width.range(), ident),
        }
    }
}

/// Continuous assign.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ContinuousAssign(pub Expression, pub Expression);

impl ContinuousAssign {
    /// Creates new continuous assign.
    pub fn new(lvalue: Expression, expr: Expression) -> Self { Self(lvalue, expr) }
}

impl fmt::Display for ContinuousAssign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "assign {} = {};", self.0, self.1) }
}

/// Statement.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Statement {
    /// Nonblocking assignment.
    NonblockingAssignment(Expression, Expression),

    /// Conditional statement.
    Conditional(Expression, Vec<Statement>, Vec<Statement>),
}

impl Statement {
    /// Nonblocking assignment.
    #[inline]
    pub fn nonblocking_assignment(lvalue: Expression, expr: Expression) -> Self {
        assert!(lvalue.is_identifier(), "lvalue should be an identifier");
        Statement::NonblockingAssignment(lvalue, expr)
    }

    /// Conditional statement.
    #[inline]
    pub fn conditional(cond: Expression, then_stmt: Vec<Statement>, else_stmt: Vec<Statement>) -> Self {
        Statement::Conditional(cond, then_stmt, else_stmt)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonblockingAssignment(lvalue, expr) => write!(f, "{} <= {};", lvalue, expr),
            Self::Conditional(cond, then_stmt, else_stmt) => {
                write!(f, "if ({}) begin\n{}\nend", cond, indent(then_stmt.iter().join("\n"), INDENT))?;
                match else_stmt.as_slice() {
                    [] => Ok(()),
                    // `else if` chains stay flat.
                    [nested @ Self::Conditional(..)] => write!(f, " else {}", nested),
                    _ => write!(f, " else begin\n{}\nend", indent(else_stmt.iter().join("\n"), INDENT)),
                }
            }
        }
    }
}

/// Unary operator.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum UnaryOp {
    /// Logical negation.
    Negation,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negation => write!(f, "!"),
        }
    }
}

/// Binary operator.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum BinaryOp {
    /// Bitwise and.
    And,

    /// Bitwise or.
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "&"),
            Self::Or => write!(f, "|"),
        }
    }
}

/// Expression.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Expression {
    /// Number literal.
    Number(String),

    /// Identifier.
    Identifier(String),

    /// Unary expression.
    Unary(UnaryOp, Box<Expression>),

    /// Binary expression.
    Binary(Box<Expression>, BinaryOp, Box<Expression>),

    /// Parenthesized expression.
    Paren(Box<Expression>),
}

impl Expression {
    /// Number literal.
    pub fn number(num: String) -> Self { Self::Number(num) }

    /// Single-bit literal.
    pub fn bit(value: bool) -> Self { Self::Number(format!("1'b{}", u8::from(value))) }

    /// Identifier.
    pub fn ident(ident: &str) -> Self { Self::Identifier(ident.to_string()) }

    /// Returns `true` if the expression is primary.
    pub fn is_primary(&self) -> bool { matches!(self, Self::Number(_) | Self::Identifier(_) | Self::Paren(_)) }

    /// Returns `true` if the expression is identifier.
    pub fn is_identifier(&self) -> bool { matches!(self, Self::Identifier(_)) }

    /// Converts into primary.
    #[must_use]
    pub fn into_primary(self) -> Self {
        if self.is_primary() {
            self
        } else {
            Self::Paren(Box::new(self))
        }
    }

    /// Unary operation.
    pub fn unary(op: UnaryOp, expr: Self) -> Self { Self::Unary(op, Box::new(expr.into_primary())) }

    /// Binary operation. Non-primary operands are parenthesized.
    pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Self {
        Self::Binary(Box::new(lhs.into_primary()), op, Box::new(rhs.into_primary()))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(num) => write!(f, "{}", num),
            Self::Identifier(ident) => write!(f, "{}", ident),
            Self::Unary(op, expr) => write!(f, "{}{}", op, expr),
            Self::Binary(lhs, op, rhs) => write!(f, "{} {} {}", lhs, op, rhs),
            Self::Paren(expr) => write!(f, "({})", expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_decls_print_ranges() {
        assert_eq!(PortDeclaration::input(Width::Const(1), "clk").to_string(), "input wire clk");
        assert_eq!(PortDeclaration::output(Width::Const(8), "q").to_string(), "output wire [8-1:0] q");
        assert_eq!(
            PortDeclaration::input(Width::Param("DATA_WIDTH".to_string()), "d").to_string(),
            "input wire [DATA_WIDTH-1:0] d"
        );
    }

    #[test]
    fn binary_parenthesizes_operands() {
        let expr = Expression::binary(
            BinaryOp::Or,
            Expression::unary(UnaryOp::Negation, Expression::ident("a")),
            Expression::binary(BinaryOp::And, Expression::ident("b"), Expression::ident("c")),
        );
        assert_eq!(expr.to_string(), "(!a) | (b & c)");
    }

    #[test]
    fn else_if_chain_stays_flat() {
        let stmt = Statement::conditional(
            Expression::ident("a"),
            vec![Statement::nonblocking_assignment(Expression::ident("q"), Expression::bit(true))],
            vec![Statement::conditional(
                Expression::ident("b"),
                vec![Statement::nonblocking_assignment(Expression::ident("q"), Expression::bit(false))],
                vec![],
            )],
        );
        assert_eq!(stmt.to_string(), "if (a) begin\n    q <= 1'b1;\nend else if (b) begin\n    q <= 1'b0;\nend");
    }

    #[test]
    fn number_literals_are_primary() {
        let literal = Expression::number(crate::Bits::from_u64(8, 0x2a).to_string());
        assert!(literal.is_primary());
        let masked = Expression::binary(BinaryOp::And, literal, Expression::ident("m"));
        let assign = ContinuousAssign::new(Expression::ident("q"), masked);
        assert_eq!(assign.to_string(), "assign q = 8'h2a & m;");
    }

    #[test]
    #[should_panic(expected = "lvalue should be an identifier")]
    fn nonblocking_assignment_needs_identifier() {
        let _ = Statement::nonblocking_assignment(Expression::bit(true), Expression::bit(false));
    }
}
