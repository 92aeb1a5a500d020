#[cfg(test)]
mod parser_tests {
    use tinyc::ast::{Expr, StmtKind};
    use tinyc::ast_printer::AstPrinter;
    use tinyc::error::FrontError;
    use tinyc::{check_source, parse_source};
    use tinyc::parser::Parser;
    use tinyc::token::{CallKind, Operator};

    fn render(source: &str) -> String {
        let program = parse_source(source)
            .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e));
        AstPrinter::print_block(&program)
    }

    fn syntax_error(source: &str) -> FrontError {
        match parse_source(source) {
            Ok(program) => panic!(
                "expected syntax error for {:?}, got {}",
                source,
                AstPrinter::print_block(&program)
            ),
            Err(e) => {
                assert!(
                    matches!(e, FrontError::Syntax { .. }),
                    "expected syntax error for {:?}, got {}",
                    source,
                    e
                );
                e
            }
        }
    }

    // ── precedence and associativity ───────────────────────────────────

    #[test]
    fn test_binary_operator() {
        assert_eq!(render("x+y"), "OP(STR(x), +, STR(y))");
    }

    #[test]
    fn test_higher_priority_binds_tighter() {
        assert_eq!(render("x+y*z"), "OP(STR(x), +, OP(STR(y), *, STR(z)))");
        assert_eq!(render("x*y+z"), "OP(OP(STR(x), *, STR(y)), +, STR(z))");
        assert_eq!(
            render("a || b && c"),
            "OP(STR(a), ||, OP(STR(b), &&, STR(c)))"
        );
        assert_eq!(
            render("a == b < c"),
            "OP(STR(a), ==, OP(STR(b), <, STR(c)))"
        );
        assert_eq!(
            render("a << 1 + 2"),
            "OP(STR(a), <<, OP(NUM(1), +, NUM(2)))"
        );
        assert_eq!(
            render("a & b ^ c | d"),
            "OP(OP(OP(STR(a), &, STR(b)), ^, STR(c)), |, STR(d))"
        );
    }

    #[test]
    fn test_equal_priority_is_left_associative() {
        assert_eq!(render("a-b-c"), "OP(OP(STR(a), -, STR(b)), -, STR(c))");
        assert_eq!(render("a/b%c"), "OP(OP(STR(a), /, STR(b)), %, STR(c))");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(render("a=b=c"), "OP(STR(a), =, OP(STR(b), =, STR(c)))");
        assert_eq!(
            render("a = b += c"),
            "OP(STR(a), =, OP(STR(b), +=, STR(c)))"
        );
        assert_eq!(
            render("a += b * 2"),
            "OP(STR(a), +=, OP(STR(b), *, NUM(2)))"
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(render("(x+y)*z"), "OP(OP(STR(x), +, STR(y)), *, STR(z))");
    }

    #[test]
    fn test_assign_node_is_distinct_from_binary() {
        let program = parse_source("a = b + 1;").unwrap();

        match &program[0].kind {
            StmtKind::Expr(Expr::Assign { op, right, .. }) => {
                assert_eq!(*op, Operator::Assign);
                assert!(matches!(**right, Expr::Binary { op: Operator::Add, .. }));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_expression_directly() {
        let mut parser = Parser::from_source("a - b - c").unwrap();
        let expr = parser.parse_expression(0).unwrap();

        assert_eq!(AstPrinter::print(&expr), "OP(OP(STR(a), -, STR(b)), -, STR(c))");
    }

    // ── atoms ──────────────────────────────────────────────────────────

    #[test]
    fn test_prefix_and_suffix_unary() {
        assert_eq!(render("++x;"), "UNARY(NULL, ++, STR(x))");
        assert_eq!(render("x++;"), "UNARY(STR(x), ++, NULL)");
        assert_eq!(render("!x + 1;"), "OP(UNARY(NULL, !, STR(x)), +, NUM(1))");
        assert_eq!(render("-a[1];"), "UNARY(NULL, -, ARR(STR(a), NUM(1)))");
        assert_eq!(render("~--x;"), "UNARY(NULL, ~, UNARY(NULL, --, STR(x)))");

        let program = parse_source("++x; x++;").unwrap();
        assert!(matches!(
            &program[0].kind,
            StmtKind::Expr(Expr::Unary { prefix: true, op: Operator::Inc, .. })
        ));
        assert!(matches!(
            &program[1].kind,
            StmtKind::Expr(Expr::Unary { prefix: false, op: Operator::Inc, .. })
        ));
        assert_eq!(AstPrinter::print_stmt(&program[0]), "UNARY(NULL, ++, STR(x))");
        assert_eq!(AstPrinter::print_stmt(&program[1]), "UNARY(STR(x), ++, NULL)");
    }

    #[test]
    fn test_subscript_chain_nests_outward() {
        assert_eq!(
            render("a[1][i+1];"),
            "ARR(ARR(STR(a), NUM(1)), OP(STR(i), +, NUM(1)))"
        );
        assert_eq!(
            render("a[0] = b[1];"),
            "OP(ARR(STR(a), NUM(0)), =, ARR(STR(b), NUM(1)))"
        );
    }

    #[test]
    fn test_string_literal_desugars_to_character_codes() {
        let program = parse_source("\"ab\";").unwrap();

        assert_eq!(
            program[0].kind,
            StmtKind::Expr(Expr::ArrayLiteral(vec![Expr::Number(97), Expr::Number(98)]))
        );
        assert_eq!(render("\"ab\";"), "{NUM(97), NUM(98)}");
    }

    #[test]
    fn test_array_literals() {
        assert_eq!(render("{1, {2, 3}};"), "{NUM(1), {NUM(2), NUM(3)}}");
        assert_eq!(render("{};"), "{}");
    }

    #[test]
    fn test_calls() {
        assert_eq!(render("print(x);"), "CALL(print, STR(x))");
        assert_eq!(render("x = input();"), "OP(STR(x), =, CALL(input, NULL))");
        assert_eq!(render("break;"), "CALL(break, NULL)");

        let program = parse_source("print(1);").unwrap();
        assert!(matches!(
            &program[0].kind,
            StmtKind::Expr(Expr::Call { key: CallKind::Print, arg: Some(_) })
        ));
    }

    #[test]
    fn test_true_false_and_chars_are_numbers() {
        assert_eq!(render("x = true + 'a';"), "OP(STR(x), =, OP(NUM(1), +, NUM(97)))");
    }

    // ── statements ─────────────────────────────────────────────────────

    #[test]
    fn test_declarations() {
        assert_eq!(render("var x = 3;"), "VAR(STR(x), NUM(3));");
        assert_eq!(render("val y;"), "VAL(STR(y), NULL);");
        assert_eq!(
            render("var a[3][] = {{1}};"),
            "VAR(ARR(ARR(STR(a), NUM(3)), NULL), {{NUM(1)}});"
        );
        assert_eq!(render("var s[] = \"hi\";"), "VAR(ARR(STR(s), NULL), {NUM(104), NUM(105)});");
    }

    #[test]
    fn test_statements_are_space_joined() {
        assert_eq!(
            render("var x; x = 1;"),
            "VAR(STR(x), NULL); OP(STR(x), =, NUM(1))"
        );
        assert_eq!(render(";"), ";");
        assert_eq!(render(""), "NULL");
    }

    #[test]
    fn test_while_loop() {
        assert_eq!(
            render("while(x<10) x=x+1;"),
            "LOOP(OP(STR(x), <, NUM(10)), OP(STR(x), =, OP(STR(x), +, NUM(1))));"
        );
        assert_eq!(render("while(x);"), "LOOP(STR(x), NULL);");
        assert_eq!(
            render("while (x) { x--; print(x); }"),
            "LOOP(STR(x), UNARY(STR(x), --, NULL) CALL(print, STR(x)));"
        );
    }

    #[test]
    fn test_if_else_chain() {
        assert_eq!(render("if (a) { b; }"), "IF(STR(a), STR(b));");
        assert_eq!(
            render("if (a) { b; } else if (c) { d; } else { e; }"),
            "IF(STR(a), STR(b), IF(STR(c), STR(d), STR(e)););"
        );
        assert_eq!(render("if (a) {} else {}"), "IF(STR(a), NULL, NULL);");
    }

    #[test]
    fn test_for_desugars_to_init_and_loop() {
        assert_eq!(
            render("for (var i = 0; i < 3; i++) { print(i); }"),
            "VAR(STR(i), NUM(0)); LOOP(OP(STR(i), <, NUM(3)), CALL(print, STR(i)) UNARY(STR(i), ++, NULL));"
        );

        // empty body: the update alone is the body
        assert_eq!(
            render("for (i = 0; i < 3; i++);"),
            "OP(STR(i), =, NUM(0)) LOOP(OP(STR(i), <, NUM(3)), UNARY(STR(i), ++, NULL));"
        );

        // no update: body untouched
        let program = parse_source("for (i = 0; i; ) { i = 0; }").unwrap();
        assert_eq!(program.len(), 2);
        match &program[1].kind {
            StmtKind::Loop { body, .. } => assert_eq!(body.len(), 1),
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_statement_positions() {
        let program = parse_source("var x;\n\n  x = 1;").unwrap();

        assert_eq!(program[0].pos.line, 1);
        assert_eq!(program[1].pos.line, 3);
        assert_eq!(program[1].pos.column, 3);
    }

    #[test]
    fn test_rendering_is_stable() {
        let source = "var a[2] = {1, 2}; for (var i = 0; i < 2; i += 1) { if (a[i] > 1) { print(a[i]); } else { a[i] = -a[i]; } }";

        let first = render(source);
        let second = render(source);
        let program = parse_source(source).unwrap();

        assert_eq!(first, second);
        assert_eq!(AstPrinter::print_block(&program), first);
        assert_eq!(parse_source(source).unwrap(), program);
    }

    // ── syntax errors ──────────────────────────────────────────────────

    #[test]
    fn test_assignment_target_must_be_assignable() {
        syntax_error("1 = x;");
        syntax_error("a + b = c;");
        syntax_error("(a) + 1 = 2;");
    }

    #[test]
    fn test_unary_operand_rules() {
        syntax_error("1++;");
        syntax_error("++1;");
        syntax_error("-5;");

        match syntax_error("*x;") {
            FrontError::Syntax { message, origin, .. } => {
                assert_eq!(origin, "parse_prefix");
                assert!(message.contains("not a unary operator"), "got: {}", message);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_empty_subscript_only_in_declarations() {
        syntax_error("x[];");
        assert_eq!(render("var x[];"), "VAR(ARR(STR(x), NULL), NULL);");
    }

    #[test]
    fn test_malformed_for_initializer() {
        syntax_error("for (1; x; x++) {}");
        syntax_error("for (; x; x++) {}");
        syntax_error("for (x = 0; ; x++) {}");
    }

    #[test]
    fn test_block_and_delimiter_errors() {
        syntax_error("if (x) y;");
        syntax_error("if (x) {} else y;");
        syntax_error("while x {}");
        syntax_error("(x;");
        syntax_error("{1, 2;");
        syntax_error("x = ;");
        syntax_error("print();");
        syntax_error("input(1);");
        syntax_error("x y;");
        syntax_error("}");
        syntax_error("if (x) { y;");
    }

    #[test]
    fn test_declaration_errors() {
        syntax_error("var = 3;");
        syntax_error("var 1;");
        syntax_error("var x = ;");
        // literal deeper than the declared name
        syntax_error("var x = {1};");
        syntax_error("var a[] = {{1}};");
        syntax_error("var s = \"text\";");
    }

    #[test]
    fn test_keyword_in_expression_position() {
        match syntax_error("x = else;") {
            FrontError::Syntax { origin, .. } => assert_eq!(origin, "parse_call"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_error_names_position_and_function() {
        let err = syntax_error("var x;\nx = (1;");
        let text = err.to_string();

        assert!(text.contains("line 2"), "got: {}", text);
        assert!(text.contains("parse_atom"), "got: {}", text);
    }

    #[test]
    fn test_lexical_errors_surface_through_parser() {
        let err = parse_source("var x = $;").unwrap_err();

        assert!(matches!(err, FrontError::Lex { .. }));
        assert_eq!(err.exit_code(), 65);
    }

    // ── nesting bound ──────────────────────────────────────────────────

    #[test]
    fn test_nesting_limit_is_configurable() {
        let mut shallow = Parser::from_source("(((x)));").unwrap().with_max_depth(3);
        assert!(matches!(shallow.parse(), Err(FrontError::Syntax { .. })));

        let mut roomy = Parser::from_source("(((x)));").unwrap().with_max_depth(16);
        assert!(roomy.parse().is_ok());
    }

    #[test]
    fn test_deep_input_is_rejected_not_overflowing() {
        let deep = format!("{}x{};", "(".repeat(100_000), ")".repeat(100_000));
        syntax_error(&deep);

        let long_chain = format!("x{};", "+x".repeat(10_000));
        syntax_error(&long_chain);

        let blocks = format!("{}{}", "while (x) {".repeat(10_000), "}".repeat(10_000));
        let mut parser = Parser::from_source(&blocks).unwrap().with_max_depth(64);
        assert!(matches!(parser.parse(), Err(FrontError::Syntax { .. })));
    }

    #[test]
    fn test_moderate_chains_are_fine() {
        let chain = format!("x{};", "+x".repeat(100));
        assert!(parse_source(&chain).is_ok());
    }

    #[test]
    fn test_flat_chains_do_not_count_as_nesting() {
        let source = format!("var x = 0; x = x{};", " + 1".repeat(300));
        let program = check_source(&source)
            .unwrap_or_else(|e| panic!("flat chain was rejected: {}", e));
        assert_eq!(program.len(), 2);

        let mut shallow = Parser::from_source(&format!("x{};", "+x".repeat(20)))
            .unwrap()
            .with_max_depth(4);
        assert!(shallow.parse().is_ok());
    }

    #[test]
    fn test_chain_limit_is_configurable() {
        let source = format!("x{};", "+x".repeat(11));

        let mut tight = Parser::from_source(&source).unwrap().with_max_chain(10);
        match tight.parse() {
            Err(FrontError::Syntax { message, origin, .. }) => {
                assert_eq!(origin, "parse_expression");
                assert!(message.contains("limit of 10"), "got: {}", message);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }

        let mut exact = Parser::from_source(&source).unwrap().with_max_chain(11);
        assert!(exact.parse().is_ok());
    }
}
