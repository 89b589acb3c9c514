// Tests for code generation

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rxc_common::SourceLocation;

    use crate::ast::{
        Block, ConstDecl, EnumDecl, Expr, ExprKind, FieldDecl, FunctionDecl, ImplDecl, ImplItem, Item,
        Param, SelfParam, Stmt, StructDecl, Symbol, SymbolKind, Type,
    };
    use crate::codegen::{CodegenError, ErrorKind, IrGenerator};
    use crate::const_eval::LiteralEvaluator;
    use crate::ir::{IrType, Module};

    fn decl(name: &str, params: &[&Symbol], return_type: Type, body: Option<Block>) -> FunctionDecl {
        FunctionDecl {
            name: name.to_string(),
            self_param: None,
            params: params
                .iter()
                .map(|symbol| Param {
                    symbol: (*symbol).clone(),
                    ty: symbol.ty.clone(),
                })
                .collect(),
            return_type,
            body,
            location: SourceLocation::dummy(),
        }
    }

    fn function(name: &str, params: &[&Symbol], return_type: Type, body: Block) -> Item {
        Item::Function(decl(name, params, return_type, Some(body)))
    }

    fn structure(name: &str, fields: &[(&str, Type)]) -> Item {
        Item::Struct(StructDecl {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(name, ty)| FieldDecl {
                    name: name.to_string(),
                    ty: ty.clone(),
                })
                .collect(),
            location: SourceLocation::dummy(),
        })
    }

    fn generate(items: Vec<Item>) -> Result<Module, CodegenError> {
        IrGenerator::new("test", &LiteralEvaluator).generate(&items)
    }

    fn lower(items: Vec<Item>) -> Module {
        generate(items).unwrap()
    }

    fn function_text(module: &Module, name: &str) -> String {
        module.get_function(name).unwrap().to_string()
    }

    fn call_of(id: u32, name: &str, ret: Type) -> Expr {
        let callee = Symbol::new(
            id,
            name,
            SymbolKind::Function,
            Type::Function {
                params: vec![],
                ret: Box::new(ret.clone()),
            },
        );
        Expr::new(
            ExprKind::Call {
                callee: Box::new(Expr::path(&callee)),
                args: vec![],
            },
            ret,
        )
    }

    fn never(kind: ExprKind) -> Expr {
        Expr::new(kind, Type::Never)
    }

    fn field(base: Expr, name: &str, ty: Type) -> Expr {
        Expr::new(
            ExprKind::Field {
                base: Box::new(base),
                field: name.to_string(),
            },
            ty,
        )
    }

    fn counter_impl(methods: Vec<FunctionDecl>) -> Item {
        Item::Impl(ImplDecl {
            target: "Counter".to_string(),
            items: methods.into_iter().map(ImplItem::Function).collect(),
            location: SourceLocation::dummy(),
        })
    }

    fn counter_literal(n: i64) -> Expr {
        Expr::new(
            ExprKind::StructLit {
                name: "Counter".to_string(),
                fields: vec![("n".to_string(), Expr::int(n))],
            },
            Type::Struct("Counter".to_string()),
        )
    }

    #[test]
    fn test_method_receives_address_of_receiver() {
        let this = Symbol::param(10, "self", Type::reference(Type::SelfType));
        let mut get = decl(
            "get",
            &[],
            Type::I32,
            Some(Block::of(field(Expr::path(&this), "n", Type::I32))),
        );
        get.self_param = Some(SelfParam {
            symbol: this.clone(),
            explicit_type: None,
        });

        let c = Symbol::local(0, "c", Type::Struct("Counter".to_string()));
        let call = Expr::new(
            ExprKind::MethodCall {
                receiver: Box::new(Expr::path(&c)),
                method: "get".to_string(),
                args: vec![],
            },
            Type::I32,
        );
        let main = Block::new(vec![Stmt::let_binding(&c, Some(counter_literal(3)))], Some(call));

        let module = lower(vec![
            structure("Counter", &[("n", Type::I32)]),
            counter_impl(vec![get]),
            function("main", &[], Type::I32, main),
        ]);

        let names: Vec<&str> = module.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Counter::get", "main"]);

        let expected = "\
define i32 @Counter::get(%Counter* %self.0) {
entry:
    %self.addr.1 = alloca %Counter*
    store %Counter* %self.0, %Counter** %self.addr.1
    %t2 = load %Counter*, %Counter** %self.addr.1
    %t3 = getelementptr %Counter, %Counter* %t2, i32 0, i32 0
    %t4 = load i32, i32* %t3
    ret i32 %t4
}
";
        assert_eq!(function_text(&module, "Counter::get"), expected);
        assert!(function_text(&module, "main").contains("%t4 = call i32 @Counter::get(%Counter* %c.addr.0)"));
    }

    #[test]
    fn test_method_with_value_self_loads_receiver() {
        let this = Symbol::param(10, "self", Type::SelfType);
        let mut value = decl(
            "value",
            &[],
            Type::I32,
            Some(Block::of(field(Expr::path(&this), "n", Type::I32))),
        );
        value.self_param = Some(SelfParam {
            symbol: this.clone(),
            explicit_type: Some(Type::SelfType),
        });

        let c = Symbol::local(0, "c", Type::Struct("Counter".to_string()));
        let call = Expr::new(
            ExprKind::MethodCall {
                receiver: Box::new(Expr::path(&c)),
                method: "value".to_string(),
                args: vec![],
            },
            Type::I32,
        );
        let main = Block::new(vec![Stmt::let_binding(&c, Some(counter_literal(4)))], Some(call));

        let module = lower(vec![
            structure("Counter", &[("n", Type::I32)]),
            counter_impl(vec![value]),
            function("main", &[], Type::I32, main),
        ]);

        assert!(function_text(&module, "Counter::value").starts_with("define i32 @Counter::value(%Counter %self.0)"));
        let main = function_text(&module, "main");
        assert!(main.contains("%t4 = load %Counter, %Counter* %c.addr.0"));
        assert!(main.contains("call i32 @Counter::value(%Counter %t4)"));
    }

    #[test]
    fn test_constants_fold_and_inline() {
        let limit = Symbol::new(1, "LIMIT", SymbolKind::Constant, Type::I32);
        let double = Symbol::new(2, "DOUBLE", SymbolKind::Constant, Type::I32);
        let ten_times_two = Expr::new(
            ExprKind::Arith {
                op: crate::ast::ArithOp::Mul,
                lhs: Box::new(Expr::int(10)),
                rhs: Box::new(Expr::int(2)),
            },
            Type::I32,
        );
        let limit_times_two = Expr::new(
            ExprKind::Arith {
                op: crate::ast::ArithOp::Mul,
                lhs: Box::new(Expr::path(&limit)),
                rhs: Box::new(Expr::int(2)),
            },
            Type::I32,
        );

        let module = lower(vec![
            // Used before its declaration
            function("get", &[], Type::I32, Block::of(Expr::path(&double))),
            Item::Const(ConstDecl {
                symbol: limit.clone(),
                ty: Type::I32,
                value: ten_times_two,
            }),
            Item::Const(ConstDecl {
                symbol: double.clone(),
                ty: Type::I32,
                value: limit_times_two,
            }),
        ]);

        assert!(function_text(&module, "get").contains("ret i32 40"));
        assert!(module.globals.is_empty());
    }

    #[test]
    fn test_unfoldable_constant_is_reported_on_use() {
        let x = Symbol::local(0, "x", Type::I32);
        let broken = Symbol::new(1, "BROKEN", SymbolKind::Constant, Type::I32);
        let err = generate(vec![
            Item::Const(ConstDecl {
                symbol: broken.clone(),
                ty: Type::I32,
                value: Expr::path(&x),
            }),
            function("get", &[], Type::I32, Block::of(Expr::path(&broken))),
        ])
        .unwrap_err();

        assert!(matches!(err, CodegenError::ConstantNotFound { ref name, .. } if name == "BROKEN"));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_enum_variants_lower_to_discriminants() {
        let color = Type::Enum("Color".to_string());
        let blue = Symbol::new(3, "Blue", SymbolKind::EnumVariantConstructor, color.clone()).with_owner("Color");
        let module = lower(vec![
            Item::Enum(EnumDecl {
                name: "Color".to_string(),
                variants: vec!["Red".to_string(), "Green".to_string(), "Blue".to_string()],
                location: SourceLocation::dummy(),
            }),
            function("favorite", &[], color, Block::of(Expr::path(&blue))),
        ]);

        assert!(module.to_string().contains("; enum Color { Red = 0, Green = 1, Blue = 2 }"));
        assert!(function_text(&module, "favorite").contains("ret i32 2"));
    }

    #[test]
    fn test_unknown_variant() {
        let color = Type::Enum("Color".to_string());
        let pink = Symbol::new(3, "Pink", SymbolKind::EnumVariantConstructor, color.clone()).with_owner("Color");
        let err = generate(vec![
            Item::Enum(EnumDecl {
                name: "Color".to_string(),
                variants: vec!["Red".to_string()],
                location: SourceLocation::dummy(),
            }),
            function("favorite", &[], color, Block::of(Expr::path(&pink))),
        ])
        .unwrap_err();

        assert!(matches!(err, CodegenError::UnknownVariant { ref variant, .. } if variant == "Pink"));
    }

    #[test]
    fn test_nested_function_follows_enclosing_function() {
        let inner_symbol = Symbol::new(
            20,
            "inner",
            SymbolKind::Function,
            Type::Function {
                params: vec![],
                ret: Box::new(Type::I32),
            },
        );
        let call = Expr::new(
            ExprKind::Call {
                callee: Box::new(Expr::path(&inner_symbol)),
                args: vec![],
            },
            Type::I32,
        );
        let body = Block::new(
            vec![Stmt::Item(function("inner", &[], Type::I32, Block::of(Expr::int(1))))],
            Some(call),
        );
        let module = lower(vec![function("outer", &[], Type::I32, body)]);

        let names: Vec<&str> = module.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner"]);
        assert!(function_text(&module, "outer").contains("%t0 = call i32 @inner()"));
    }

    #[test]
    fn test_block_local_struct_is_restored() {
        let shadow = Symbol::local(0, "s", Type::Struct("S".to_string()));
        let literal = Expr::new(
            ExprKind::StructLit {
                name: "S".to_string(),
                fields: vec![("a".to_string(), Expr::int(1)), ("b".to_string(), Expr::int(2))],
            },
            Type::Struct("S".to_string()),
        );
        let body = Block::new(
            vec![
                Stmt::Item(structure("S", &[("a", Type::I32), ("b", Type::I32)])),
                Stmt::let_binding(&shadow, Some(literal)),
            ],
            None,
        );
        let module = lower(vec![
            structure("S", &[("a", Type::I32)]),
            function("local", &[], Type::Unit, body),
        ]);

        assert_eq!(module.get_struct("S").unwrap().fields.len(), 1);
        assert!(module.to_string().contains("%S = type { i32 }\n%S.1 = type { i32, i32 }"));
        let text = function_text(&module, "local");
        assert!(text.contains("alloca %S.1"));
        assert!(text.contains("store i32 2, i32* %t3"));
    }

    #[test]
    fn test_block_local_struct_definition_is_emitted() {
        let s = Symbol::local(0, "s", Type::Struct("Inner".to_string()));
        let literal = Expr::new(
            ExprKind::StructLit {
                name: "Inner".to_string(),
                fields: vec![("x".to_string(), Expr::int(1))],
            },
            s.ty.clone(),
        );
        let body = Block::new(
            vec![
                Stmt::Item(structure("Inner", &[("x", Type::I32)])),
                Stmt::let_binding(&s, Some(literal)),
            ],
            None,
        );
        let module = lower(vec![function("t", &[], Type::Unit, body)]);

        assert!(module.get_struct("Inner").is_none());
        assert!(module.to_string().contains("%Inner = type { i32 }"));
        assert!(function_text(&module, "t").contains("%s.addr.0 = alloca %Inner"));
    }

    #[test]
    fn test_unit_binding_has_no_slot() {
        let v = Symbol::local(0, "v", Type::Unit);
        let init = Expr::block(
            Block::new(vec![Stmt::Expr(call_of(9, "foo", Type::I32))], None),
            Type::Unit,
        );
        let body = Block::new(
            vec![Stmt::let_binding(&v, Some(init)), Stmt::Expr(Expr::path(&v))],
            None,
        );
        let module = lower(vec![
            function("foo", &[], Type::I32, Block::of(Expr::int(7))),
            function("run", &[], Type::Unit, body),
        ]);

        let text = function_text(&module, "run");
        assert!(text.contains("%t0 = call i32 @foo()"));
        assert!(!text.contains("alloca"));
        assert!(!text.contains("void*"));
        assert!(text.contains("ret void"));
    }

    #[test]
    fn test_compound_assign_with_diverging_value() {
        let x = Symbol::local(0, "x", Type::I32);
        let bump = Expr::unit(ExprKind::CompoundAssign {
            op: crate::ast::ArithOp::Add,
            target: Box::new(Expr::path(&x)),
            value: Box::new(never(ExprKind::Return(None))),
        });
        let body = Block::new(vec![Stmt::let_binding(&x, Some(Expr::int(0))), Stmt::Expr(bump)], None);
        let module = lower(vec![function("bail", &[], Type::Unit, body)]);

        let text = function_text(&module, "bail");
        assert!(!text.contains("add i32"));
        assert_eq!(text.matches("ret void").count(), 1);
        assert!(text.trim_end().ends_with("ret void\n}"));
    }

    #[test]
    fn test_item_after_return_is_still_lowered() {
        let body = Block::new(
            vec![
                Stmt::Expr(never(ExprKind::Return(Some(Box::new(call_of(20, "inner", Type::I32)))))),
                Stmt::Item(function("inner", &[], Type::I32, Block::of(Expr::int(1)))),
            ],
            None,
        );
        let module = lower(vec![function("outer", &[], Type::I32, body)]);

        let names: Vec<&str> = module.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner"]);
        assert!(function_text(&module, "outer").contains("ret i32 %t0"));
        assert!(function_text(&module, "inner").contains("ret i32 1"));
    }

    #[test]
    fn test_string_literal_becomes_global() {
        let text = Expr::new(
            ExprKind::Literal(crate::ast::Literal::Str("hi".to_string())),
            Type::reference(Type::Str),
        );
        let module = lower(vec![function("greeting", &[], Type::reference(Type::Str), Block::of(text))]);

        let global = module.get_global(".str.0").unwrap();
        assert_eq!(global.var_type, IrType::array_of(IrType::I8, 3));
        assert!(module.to_string().contains("@.str.0 = constant [3 x i8] c\"hi\\00\""));
    }

    #[test]
    fn test_array_literal_and_index() {
        let a = Symbol::local(0, "a", Type::array(Type::I32, 3));
        let list = Expr::new(ExprKind::ArrayList(vec![Expr::int(1), Expr::int(2), Expr::int(3)]), a.ty.clone());
        let index = Expr::new(
            ExprKind::Index {
                base: Box::new(Expr::path(&a)),
                index: Box::new(Expr::int(1)),
            },
            Type::I32,
        );
        let body = Block::new(vec![Stmt::let_binding(&a, Some(list))], Some(index));
        let text = function_text(&lower(vec![function("second", &[], Type::I32, body)]), "second");

        assert!(text.contains("%array.1 = alloca [3 x i32]"));
        assert!(text.contains("%t4 = getelementptr [3 x i32], [3 x i32]* %array.1, i32 0, i32 2"));
        assert!(text.contains("store i32 3, i32* %t4"));
        assert!(text.contains("%t6 = getelementptr [3 x i32], [3 x i32]* %a.addr.0, i32 0, i32 1"));
        assert!(text.contains("%t7 = load i32, i32* %t6"));
    }

    #[test]
    fn test_array_repeat_stores_each_element() {
        let zeros = Symbol::local(0, "zeros", Type::array(Type::I32, 4));
        let repeat = Expr::new(
            ExprKind::ArrayRepeat {
                element: Box::new(Expr::int(0)),
                count: 4,
            },
            zeros.ty.clone(),
        );
        let body = Block::new(vec![Stmt::let_binding(&zeros, Some(repeat))], None);
        let text = function_text(&lower(vec![function("clear", &[], Type::Unit, body)]), "clear");

        assert_eq!(text.matches("store i32 0,").count(), 4);
    }

    #[test]
    fn test_bool_to_int_cast_zero_extends() {
        let b = Symbol::param(0, "b", Type::Bool);
        let cast = Expr::new(
            ExprKind::Cast {
                operand: Box::new(Expr::path(&b)),
                target: Type::I32,
            },
            Type::I32,
        );
        let text = function_text(&lower(vec![function("to_int", &[&b], Type::I32, Block::of(cast))]), "to_int");

        assert!(text.contains("%t3 = zext i1 %t2 to i32"));
    }

    #[test]
    fn test_struct_cast_is_unsupported() {
        let c = Symbol::param(0, "c", Type::Struct("Counter".to_string()));
        let cast = Expr::new(
            ExprKind::Cast {
                operand: Box::new(Expr::path(&c)),
                target: Type::I32,
            },
            Type::I32,
        );
        let err = generate(vec![
            structure("Counter", &[("n", Type::I32)]),
            function("bad", &[&c], Type::I32, Block::of(cast)),
        ])
        .unwrap_err();

        assert!(matches!(err, CodegenError::UnsupportedCast { .. }));
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_borrow_and_deref() {
        let x = Symbol::param(0, "x", Type::I32);
        let r = Symbol::local(1, "r", Type::mut_reference(Type::I32));
        let borrow = Expr::new(
            ExprKind::Borrow {
                inner: Box::new(Expr::path(&x)),
                mutable: true,
                double: false,
            },
            r.ty.clone(),
        );
        let write = Expr::unit(ExprKind::Assign {
            target: Box::new(Expr::new(ExprKind::Deref(Box::new(Expr::path(&r))), Type::I32)),
            value: Box::new(Expr::int(5)),
        });
        let read = Expr::new(ExprKind::Deref(Box::new(Expr::path(&r))), Type::I32);
        let body = Block::new(vec![Stmt::let_binding(&r, Some(borrow)), Stmt::Expr(write)], Some(read));
        let text = function_text(&lower(vec![function("poke", &[&x], Type::I32, body)]), "poke");

        let expected = "\
define i32 @poke(i32 %x.0) {
entry:
    %x.addr.1 = alloca i32
    store i32 %x.0, i32* %x.addr.1
    %r.addr.2 = alloca i32*
    store i32* %x.addr.1, i32** %r.addr.2
    %t3 = load i32*, i32** %r.addr.2
    store i32 5, i32* %t3
    %t4 = load i32*, i32** %r.addr.2
    %t5 = load i32, i32* %t4
    ret i32 %t5
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_negation() {
        let n = Symbol::param(0, "n", Type::I32);
        let b = Symbol::param(1, "b", Type::Bool);
        let neg = Expr::new(
            ExprKind::Negate {
                operand: Box::new(Expr::path(&n)),
                logical: false,
            },
            Type::I32,
        );
        let not = Expr::new(
            ExprKind::Negate {
                operand: Box::new(Expr::path(&b)),
                logical: true,
            },
            Type::Bool,
        );
        let module = lower(vec![
            function("neg", &[&n], Type::I32, Block::of(neg)),
            function("not", &[&n, &b], Type::Bool, Block::of(not)),
        ]);

        assert!(function_text(&module, "neg").contains("%t3 = sub i32 0, %t2"));
        assert!(function_text(&module, "not").contains("%t5 = xor i1 %t4, true"));
    }

    #[test]
    fn test_bodyless_function_is_declared() {
        let a = Symbol::param(0, "a", Type::I32);
        let module = lower(vec![Item::Function(decl("ext", &[&a], Type::I32, None))]);

        let ext = module.get_function("ext").unwrap();
        assert!(ext.is_declaration());
        assert_eq!(ext.to_string(), "declare i32 @ext(i32 %a.0)\n");
    }

    #[test]
    fn test_missing_return_value_defaults_to_zero() {
        let body = Block::new(vec![Stmt::Expr(Expr::unit(ExprKind::Block(Block::empty())))], None);
        let text = function_text(&lower(vec![function("zero", &[], Type::I32, body)]), "zero");

        assert!(text.contains("ret i32 0"));
    }

    #[test]
    fn test_assignment_to_rvalue_is_rejected() {
        let assign = Expr::unit(ExprKind::Assign {
            target: Box::new(Expr::int(1)),
            value: Box::new(Expr::int(2)),
        });
        let err = generate(vec![function(
            "bad",
            &[],
            Type::Unit,
            Block::new(vec![Stmt::Expr(assign)], None),
        )])
        .unwrap_err();

        assert!(matches!(err, CodegenError::InvalidLvalue { .. }));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_self_type_outside_impl() {
        let err = generate(vec![function("lost", &[], Type::SelfType, Block::empty())]).unwrap_err();
        assert!(matches!(err, CodegenError::SelfOutsideImpl { .. }));
        assert_eq!(err.kind(), ErrorKind::InternalContract);
    }

    #[test]
    fn test_impl_for_unknown_type() {
        let err = generate(vec![Item::Impl(ImplDecl {
            target: "Ghost".to_string(),
            items: vec![],
            location: SourceLocation::dummy(),
        })])
        .unwrap_err();
        assert!(matches!(err, CodegenError::UnknownImplTarget { ref name, .. } if name == "Ghost"));
    }

    #[test]
    fn test_call_of_undeclared_function() {
        let missing = Symbol::new(
            9,
            "missing",
            SymbolKind::Function,
            Type::Function {
                params: vec![],
                ret: Box::new(Type::I32),
            },
        );
        let err = generate(vec![function("caller", &[], Type::I32, Block::of(Expr::path(&missing)))]).unwrap_err();
        assert!(matches!(err, CodegenError::UndefinedFunction { .. }));
    }
}
