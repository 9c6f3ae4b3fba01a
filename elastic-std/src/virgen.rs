//! Verilog lowering of the handshake register.

use elastic::vir::*;

use crate::register::HandshakeRegister;

const DATA_WIDTH: &str = "DATA_WIDTH";

fn ident(name: &str) -> Expression { Expression::ident(name) }

fn and(lhs: Expression, rhs: Expression) -> Expression { Expression::binary(BinaryOp::And, lhs, rhs) }

fn or(lhs: Expression, rhs: Expression) -> Expression { Expression::binary(BinaryOp::Or, lhs, rhs) }

fn not(expr: Expression) -> Expression { Expression::unary(UnaryOp::Negation, expr) }

fn assign(lvalue: &str, expr: Expression) -> ContinuousAssign { ContinuousAssign::new(ident(lvalue), expr) }

fn nonblocking(lvalue: &str, expr: Expression) -> Statement { Statement::nonblocking_assignment(ident(lvalue), expr) }

impl HandshakeRegister {
    /// Lowers the register to a Verilog module named `name`.
    ///
    /// The module has an active-high asynchronous reset `rst` and a `DATA_WIDTH` parameter defaulting to the
    /// configured width. `data_q` is not reset and keeps its last value while the slot is empty.
    pub fn gen_vir(&self, name: &str) -> Module {
        let data_width = Width::Param(DATA_WIDTH.to_string());

        let port_decls = vec![
            PortDeclaration::input(Width::Const(1), "clk"),
            PortDeclaration::input(Width::Const(1), "rst"),
            PortDeclaration::input(Width::Const(1), "in_valid"),
            PortDeclaration::input(data_width.clone(), "in_data"),
            PortDeclaration::output(Width::Const(1), "in_ready"),
            PortDeclaration::output(Width::Const(1), "out_valid"),
            PortDeclaration::output(data_width.clone(), "out_data"),
            PortDeclaration::input(Width::Const(1), "out_ready"),
        ];

        let registers = ModuleItem::Commented("registers".to_string(), vec![ModuleItem::Declarations(vec![
            Declaration::reg(Width::Const(1), "valid_q"),
            Declaration::reg(data_width, "data_q"),
        ])]);

        let fires = ModuleItem::Commented("handshakes".to_string(), vec![
            ModuleItem::Declarations(vec![
                Declaration::net(Width::Const(1), "in_fire"),
                Declaration::net(Width::Const(1), "out_fire"),
            ]),
            ModuleItem::ContinuousAssigns(vec![
                assign("out_fire", and(ident("valid_q"), ident("out_ready"))),
                assign("in_ready", or(not(ident("valid_q")), ident("out_fire"))),
                assign("in_fire", and(ident("in_valid"), ident("in_ready"))),
            ]),
        ]);

        let outputs = ModuleItem::Commented("outputs".to_string(), vec![ModuleItem::ContinuousAssigns(vec![
            assign("out_valid", ident("valid_q")),
            assign("out_data", ident("data_q")),
        ])]);

        let transition = Statement::conditional(
            ident("rst"),
            vec![nonblocking("valid_q", Expression::bit(false))],
            vec![Statement::conditional(
                ident("in_fire"),
                vec![nonblocking("valid_q", Expression::bit(true)), nonblocking("data_q", ident("in_data"))],
                vec![Statement::conditional(
                    ident("out_fire"),
                    vec![nonblocking("valid_q", Expression::bit(false))],
                    vec![],
                )],
            )],
        );

        Module {
            name: name.to_string(),
            params: vec![(DATA_WIDTH.to_string(), self.data_width())],
            port_decls,
            module_items: vec![
                registers,
                fires,
                outputs,
                ModuleItem::AlwaysConstruct("always @(posedge clk or posedge rst)".to_string(), vec![transition]),
            ],
        }
    }
}
