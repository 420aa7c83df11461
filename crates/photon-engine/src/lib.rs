//! Component F: the semantic engine (spec §4.F) -- walks the parsed
//! [`photon_parser::Block`] forest to build the annotated [`photon_ir::Ir`],
//! resolving names through a [`photon_scope::ScopeManager`], inferring
//! types bidirectionally, and processing module imports (component G)
//! along the way. Ground-truthed throughout on `baseTranspiler.py`'s
//! `BaseTranspiler`.

mod assign;
mod call;
mod class;
mod control;
mod dotaccess;
mod func;
mod module;
mod recovery;
mod vars;

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod expr;

pub use config::EngineConfig;
pub use engine::{Engine, LoadChain, ModuleCache};

#[cfg(test)]
mod tests {
    use super::*;
    use photon_ir::Ir;

    fn run(source: &str) -> Engine {
        let blocks = photon_parser::drive(photon_parser::StaticLines::new(source), "t.w", false).unwrap();
        let mut engine = Engine::new(EngineConfig::default(), "t.w");
        engine.run(&blocks).unwrap();
        engine
    }

    #[test]
    fn assigns_a_plain_name() {
        let engine = run("x = 1\n");
        assert_eq!(engine.sequence.len(), 1);
        assert!(matches!(engine.arena.get(engine.sequence[0]), Ir::Assign { .. }));
    }

    #[test]
    fn precedence_nests_multiplication_inside_addition() {
        // a + b * c must structurally equal a + (b * c), not (a + b) * c (P4).
        let engine = run("x = a + b * c\n");
        let Ir::Assign { value, .. } = engine.arena.get(engine.sequence[0]) else { panic!("expected assign") };
        let Ir::Expr { args, ops, .. } = engine.arena.get(*value) else { panic!("expected expr") };
        assert_eq!(ops, &["+".to_string()]);
        let Ir::Expr { ops: inner_ops, .. } = engine.arena.get(args[1]) else { panic!("rhs should be the product") };
        assert_eq!(inner_ops, &["*".to_string()]);
    }

    #[test]
    fn a_class_instantiation_infers_a_class_typed_value() {
        let engine = run("class Point:\n    def new(x):\n        self.x = x\n\np = Point(1)\n");
        let Ir::Assign { value, .. } = engine.arena.get(engine.sequence[1]) else { panic!("expected assign") };
        assert!(engine.arena.get(*value).ty().is_class);
    }

    #[test]
    fn unresolved_name_does_not_abort_the_program() {
        // processVar never hard-errors; referencing an undeclared name
        // just yields an unknown-typed Var instead of a SyntaxError/NameNotFound.
        let engine = run("y = never_declared\n");
        assert_eq!(engine.sequence.len(), 1);
    }

    #[test]
    fn a_function_returning_a_num_infers_a_numeric_binding() {
        let engine = run("def one():\n    return 1\n\nx = one()\n");
        let Ir::Function { name, .. } = engine.arena.get(engine.sequence[0]) else { panic!("expected function") };
        assert_eq!(engine.arena.get(*name).ty().type_name, "int");
    }

    #[test]
    fn a_function_with_int_and_float_returns_folds_to_float() {
        let source = "def pick(flag):\n    if flag:\n        return 1\n    else:\n        return 2.5\n\nx = pick(1)\n";
        let engine = run(source);
        let Ir::Function { name, .. } = engine.arena.get(engine.sequence[0]) else { panic!("expected function") };
        assert_eq!(engine.arena.get(*name).ty().type_name, "float");
    }

    #[test]
    fn a_method_call_lifts_the_receiver_as_the_first_argument() {
        let source = "class Point:\n    def new(x):\n        self.x = x\n    def getX():\n        return self.x\n\np = Point(1)\nv = p.getX()\n";
        let engine = run(source);
        let Ir::Assign { value, .. } = engine.arena.get(engine.sequence[2]) else { panic!("expected assign") };
        let Ir::Call { args, .. } = engine.arena.get(*value) else { panic!("expected call") };
        assert_eq!(args.len(), 1);
        assert!(engine.arena.get(args[0]).ty().is_class);
    }
}
