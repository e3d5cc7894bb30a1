//! Rewrites a syntax tree into q source text.
//!
//! Every node kind maps to exactly one rule. Binary and comparison operands are
//! always parenthesized, statement bodies join with `; ` and module-level
//! statements join with newlines.

use tracing::trace;

use crate::ast::{Expression, FunctionDef, Module, Parameter, Statement};
use crate::error::{Result, TranslateError};
use crate::options::Options;

pub mod tables;

use self::tables::{augmented_operator, binary_operator, builtin_name, comparison_operator};

const BODY_SEPARATOR: &str = "; ";
const MODULE_SEPARATOR: &str = "\n";

#[derive(Debug, Clone, Default)]
pub struct Translator {
    options: Options,
}

impl Translator {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn translate_module(&self, module: &Module) -> Result<String> {
        let mut fragments = Vec::with_capacity(module.body.len());
        for statement in &module.body {
            let fragment = self.statement(statement, 0)?;
            trace!(kind = statement.kind(), fragment = %fragment, "rendered top-level statement");
            fragments.push(fragment);
        }
        Ok(fragments.join(MODULE_SEPARATOR))
    }

    pub fn translate_statement(&self, statement: &Statement) -> Result<String> {
        self.statement(statement, 0)
    }

    pub fn translate_expression(&self, expr: &Expression) -> Result<String> {
        self.expression(expr, 0)
    }

    fn enter(&self, depth: usize) -> Result<usize> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            return Err(TranslateError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        Ok(depth)
    }

    fn statement(&self, statement: &Statement, depth: usize) -> Result<String> {
        let depth = self.enter(depth)?;
        match statement {
            Statement::FunctionDef(function) => self.function_def(function, depth),
            Statement::Assign { targets, value } => {
                let [target] = targets.as_slice() else {
                    return Err(structural("Assign", "only a single assignment target allowed"));
                };
                let target = self.expression(target, depth)?;
                let value = self.expression(value, depth)?;
                Ok(format!("{target}: {value}"))
            }
            Statement::AugAssign { target, op, value } => {
                let Expression::Name(target) = target else {
                    return Err(structural("AugAssign", "target must be a name"));
                };
                let token = augmented_operator(*op).ok_or_else(|| {
                    TranslateError::UnsupportedOperator {
                        operator: format!("{}=", op.symbol()),
                        table: "augmented assignment",
                    }
                })?;
                let value = self.expression(value, depth)?;
                Ok(format!("{target} {token} ({value})"))
            }
            Statement::If {
                condition,
                then_body,
                else_body,
            } => {
                if else_body.is_empty() {
                    return Err(structural("If", "else clause must not be empty"));
                }
                let condition = self.expression(condition, depth)?;
                let then_body = self.body(then_body, depth)?;
                let else_body = self.body(else_body, depth)?;
                Ok(format!("$[{condition}; {then_body}; {else_body}]"))
            }
            Statement::For {
                target,
                iterable,
                body,
            } => {
                let Expression::Name(target) = target else {
                    return Err(structural("For", "target must be a name"));
                };
                let body = self.body(body, depth)?;
                let iterable = self.expression(iterable, depth)?;
                Ok(format!("{{[{target}] {body}}} each {iterable}"))
            }
            Statement::While { condition, body } => {
                let condition = self.expression(condition, depth)?;
                let body = self.body(body, depth)?;
                Ok(format!("while[{condition}; {body}]"))
            }
            Statement::Assert { condition, message } => {
                let message = match message {
                    None => "",
                    Some(Expression::String(text)) => text.as_str(),
                    Some(_) => {
                        return Err(structural("Assert", "message must be a string literal"));
                    }
                };
                let condition = self.expression(condition, depth)?;
                Ok(format!("if[not[{condition}]; '`{message}]"))
            }
            Statement::Import { module, names } => {
                let mut path = module.clone();
                for name in names {
                    if name.alias.is_some() {
                        return Err(structural("Import", "Cannot rewrite aliased imports"));
                    }
                    path.push(name.name.clone());
                }
                Ok(format!("\\l .{}", path.join(".")))
            }
            Statement::Return(Some(value)) => self.expression(value, depth),
            Statement::Return(None) => Err(structural("Return", "a return value is required")),
            Statement::Expr(expr) => self.expression(expr, depth),
            Statement::Pass | Statement::Break | Statement::Continue => {
                Err(TranslateError::UnsupportedNodeKind {
                    kind: statement.kind(),
                })
            }
        }
    }

    fn body(&self, statements: &[Statement], depth: usize) -> Result<String> {
        let fragments = statements
            .iter()
            .map(|statement| self.statement(statement, depth))
            .collect::<Result<Vec<_>>>()?;
        Ok(fragments.join(BODY_SEPARATOR))
    }

    fn function_def(&self, function: &FunctionDef, depth: usize) -> Result<String> {
        let body = self.body(&function.body, depth)?;
        Ok(format!(
            "{}: {}",
            function.name,
            lambda_block(&function.params, &body)
        ))
    }

    fn expression(&self, expr: &Expression, depth: usize) -> Result<String> {
        let depth = self.enter(depth)?;
        match expr {
            Expression::Number(lexeme) => Ok(lexeme.clone()),
            // Content is emitted verbatim; embedded quotes are not escaped.
            Expression::String(text) => Ok(format!("\"{text}\"")),
            Expression::Name(name) => Ok(name.clone()),
            Expression::BinaryOp { left, op, right } => {
                let token = binary_operator(*op, self.options.power).ok_or_else(|| {
                    TranslateError::UnsupportedOperator {
                        operator: op.symbol().to_string(),
                        table: "binary",
                    }
                })?;
                let left = self.expression(left, depth)?;
                let right = self.expression(right, depth)?;
                Ok(format!("({left}) {token} ({right})"))
            }
            Expression::Compare {
                left,
                ops,
                comparators,
            } => {
                let ([op], [right]) = (ops.as_slice(), comparators.as_slice()) else {
                    return Err(structural("Compare", "chained comparisons are not supported"));
                };
                let token = comparison_operator(*op).ok_or_else(|| {
                    TranslateError::UnsupportedOperator {
                        operator: op.symbol().to_string(),
                        table: "comparison",
                    }
                })?;
                let left = self.expression(left, depth)?;
                let right = self.expression(right, depth)?;
                Ok(format!("({left}) {token} ({right})"))
            }
            Expression::Call { callee, args } => {
                let callee = self.expression(callee, depth)?;
                let args = self.fragments(args, depth)?.join(BODY_SEPARATOR);
                Ok(format!("{}[{args}]", builtin_name(&callee)))
            }
            Expression::List(items) => Ok(sequence(self.fragments(items, depth)?)),
            Expression::Dict(entries) => {
                let keys = self.fragments(entries.iter().map(|(key, _)| key), depth)?;
                let values = self.fragments(entries.iter().map(|(_, value)| value), depth)?;
                Ok(format!("{}!{}", sequence(keys), sequence(values)))
            }
            Expression::Lambda { params, body } => {
                let body = self.expression(body, depth)?;
                Ok(lambda_block(params, &body))
            }
            Expression::Constant(_)
            | Expression::Tuple(_)
            | Expression::Unary { .. }
            | Expression::BoolOp { .. }
            | Expression::Attribute { .. }
            | Expression::Subscript { .. } => {
                Err(TranslateError::UnsupportedNodeKind { kind: expr.kind() })
            }
        }
    }

    fn fragments<'e>(
        &self,
        items: impl IntoIterator<Item = &'e Expression>,
        depth: usize,
    ) -> Result<Vec<String>> {
        items
            .into_iter()
            .map(|item| self.expression(item, depth))
            .collect()
    }
}

/// `()`, `(,:[x])` or `(x; y; ...)`. A lone parenthesized value would read as
/// a scalar, so single items are enlisted explicitly.
fn sequence(fragments: Vec<String>) -> String {
    match fragments.as_slice() {
        [item] => format!("(,:[{item}])"),
        _ => format!("({})", fragments.join(BODY_SEPARATOR)),
    }
}

/// `{[p1; p2] body}`
fn lambda_block(params: &[Parameter], body: &str) -> String {
    let params = params
        .iter()
        .map(|param| param.name.as_str())
        .collect::<Vec<_>>()
        .join(BODY_SEPARATOR);
    format!("{{[{params}] {body}}}")
}

fn structural(statement: &'static str, reason: &'static str) -> TranslateError {
    TranslateError::StructuralViolation { statement, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, CompareOperator, ImportAlias};
    use crate::options::PowerToken;
    use crate::parser::{parse_expression, parse_module};
    use indoc::indoc;

    fn module(source: &str) -> Result<String> {
        let module = parse_module(source).expect("parse failed");
        Translator::default().translate_module(&module)
    }

    fn expression(source: &str) -> Result<String> {
        let expr = parse_expression(source).expect("parse failed");
        Translator::default().translate_expression(&expr)
    }

    fn name(id: &str) -> Expression {
        Expression::Name(id.to_string())
    }

    #[test]
    fn nested_arithmetic_is_fully_parenthesized() {
        let source = indoc! {"
            def f(a, b, c):
                return a + b * c - 1
        "};
        assert_eq!(
            module(source).expect("translate"),
            "f: {[a; b; c] ((a) + ((b) * (c))) - (1)}"
        );
    }

    #[test]
    fn parenthesizes_operands_regardless_of_their_shape() {
        let operands = ["x", "1.5", "\"s\"", "g[x]", "(a) * (b)"];
        let sources = ["x", "1.5", "'s'", "g(x)", "a * b"];
        for (left_src, left_out) in sources.iter().zip(operands) {
            for (right_src, right_out) in sources.iter().zip(operands) {
                let rendered = expression(&format!("({left_src}) - ({right_src})"))
                    .expect("translate");
                assert_eq!(rendered, format!("({left_out}) - ({right_out})"));
            }
        }
    }

    #[test]
    fn conditional_with_else() {
        let source = indoc! {"
            def k(x):
                if x == 1:
                    return x + 1
                else:
                    return x * 2
        "};
        assert_eq!(
            module(source).expect("translate"),
            "k: {[x] $[(x) = (1); (x) + (1); (x) * (2)]}"
        );
    }

    #[test]
    fn conditional_without_else_is_rejected() {
        let source = indoc! {"
            def k(x):
                if x == 1:
                    return x
        "};
        assert_eq!(
            module(source),
            Err(TranslateError::StructuralViolation {
                statement: "If",
                reason: "else clause must not be empty",
            })
        );
    }

    #[test]
    fn elif_without_final_else_is_rejected() {
        let source = indoc! {"
            if a:
                x = 1
            elif b:
                x = 2
        "};
        assert!(matches!(
            module(source),
            Err(TranslateError::StructuralViolation { statement: "If", .. })
        ));
    }

    #[test]
    fn for_loop_becomes_each_combinator() {
        let source = indoc! {"
            def mylooper(n):
                s = 0.0
                for i in range(n):
                    s = s + 1
                return s
        "};
        let rendered = module(source).expect("translate");
        assert_eq!(rendered, "mylooper: {[n] s: 0.0; {[i] s: (s) + (1)} each til[n]; s}");
        assert!(!rendered.contains("for["));
    }

    #[test]
    fn for_loop_requires_name_target() {
        let source = "for i, j in pairs:\n    x = i\n";
        assert_eq!(
            module(source),
            Err(TranslateError::StructuralViolation {
                statement: "For",
                reason: "target must be a name",
            })
        );
    }

    #[test]
    fn while_loop_keeps_imperative_form() {
        let source = indoc! {"
            def mywhile(n):
                s = 0.0
                i = 0
                while i < n:
                    s = s + i
                    i = i + 1
                return s
        "};
        assert_eq!(
            module(source).expect("translate"),
            "mywhile: {[n] s: 0.0; i: 0; while[(i) < (n); s: (s) + (i); i: (i) + (1)]; s}"
        );
    }

    #[test]
    fn builtins_are_substituted_in_calls() {
        assert_eq!(expression("map(f, x)").expect("translate"), "each[f; x]");
        assert_eq!(expression("xrange(3)").expect("translate"), "til[3]");
        assert_eq!(expression("g()").expect("translate"), "g[]");
        assert_eq!(expression("g(range)").expect("translate"), "g[range]");
    }

    #[test]
    fn power_token_follows_options() {
        let expr = parse_expression("x ** 2 + 1").expect("parse failed");
        assert_eq!(
            Translator::default()
                .translate_expression(&expr)
                .expect("translate"),
            "((x) xpow (2)) + (1)"
        );
        let translator = Translator::new(Options {
            power: PowerToken::Xexp,
            ..Options::default()
        });
        assert_eq!(
            translator.translate_expression(&expr).expect("translate"),
            "((x) xexp (2)) + (1)"
        );
    }

    #[test]
    fn list_rendering_by_length() {
        assert_eq!(expression("[]").expect("translate"), "()");
        assert_eq!(expression("[x]").expect("translate"), "(,:[x])");
        assert_eq!(expression("[1, 'a', 2, []]").expect("translate"), "(1; \"a\"; 2; ())");
    }

    #[test]
    fn mapping_pairs_keys_with_values() {
        assert_eq!(
            expression("{'a': 1, 'b': 2}").expect("translate"),
            "(\"a\"; \"b\")!(1; 2)"
        );
        assert_eq!(expression("{}").expect("translate"), "()!()");
        assert_eq!(expression("{'a': [1]}").expect("translate"), "(,:[\"a\"])!(,:[(,:[1])])");
    }

    #[test]
    fn numbers_render_as_q_reads_them() {
        assert_eq!(module("x = 1_000\n").expect("translate"), "x: 1000");
        assert_eq!(expression("0x1F + 0b11").expect("translate"), "(31) + (3)");
        assert_eq!(expression("[0.0, 1e-05, -2]").expect("translate"), "(0.0; 1e-05; -2)");
    }

    #[test]
    fn strings_are_not_escaped() {
        assert_eq!(expression(r#"'say "hi"'"#).expect("translate"), r#""say "hi"""#);
    }

    #[test]
    fn augmented_assignment_uses_in_place_token() {
        assert_eq!(module("s += 1\n").expect("translate"), "s +: (1)");
        assert_eq!(module("s -= a * b\n").expect("translate"), "s -: ((a) * (b))");
        assert_eq!(
            module("s //= 2\n"),
            Err(TranslateError::UnsupportedOperator {
                operator: "//=".to_string(),
                table: "augmented assignment",
            })
        );
        assert!(matches!(
            module("a[0] += 1\n"),
            Err(TranslateError::StructuralViolation { statement: "AugAssign", .. })
        ));
    }

    #[test]
    fn assignment_requires_single_target() {
        assert_eq!(module("x = (a) + (1)\n").expect("translate"), "x: (a) + (1)");
        assert_eq!(
            module("a = b = 1\n"),
            Err(TranslateError::StructuralViolation {
                statement: "Assign",
                reason: "only a single assignment target allowed",
            })
        );
    }

    #[test]
    fn assert_becomes_conditional_signal() {
        let source = indoc! {"
            def check(x):
                assert x > 0
                assert x < 10, 'toolarge'
                return x
        "};
        assert_eq!(
            module(source).expect("translate"),
            "check: {[x] if[not[(x) > (0)]; '`]; if[not[(x) < (10)]; '`toolarge]; x}"
        );
        assert!(matches!(
            module("assert x, y\n"),
            Err(TranslateError::StructuralViolation { statement: "Assert", .. })
        ));
    }

    #[test]
    fn imports_become_load_directives() {
        let source = indoc! {"
            from lib.stats import mean, median
            import numpy
        "};
        assert_eq!(
            module(source).expect("translate"),
            "\\l .lib.stats.mean.median\n\\l .numpy"
        );
        assert_eq!(
            module("from lib import mean as m\n"),
            Err(TranslateError::StructuralViolation {
                statement: "Import",
                reason: "Cannot rewrite aliased imports",
            })
        );
    }

    #[test]
    fn aliased_import_fails_even_after_plain_names() {
        let statement = Statement::Import {
            module: vec!["m".to_string()],
            names: vec![
                ImportAlias {
                    name: "a".to_string(),
                    alias: None,
                },
                ImportAlias {
                    name: "b".to_string(),
                    alias: Some("c".to_string()),
                },
            ],
        };
        assert!(
            Translator::default()
                .translate_statement(&statement)
                .is_err()
        );
    }

    #[test]
    fn lambda_renders_anonymous_block() {
        assert_eq!(
            expression("lambda x, y: x * y").expect("translate"),
            "{[x; y] (x) * (y)}"
        );
        assert_eq!(
            expression("map(lambda v: v + 1, xs)").expect("translate"),
            "each[{[v] (v) + (1)}; xs]"
        );
    }

    #[test]
    fn nested_function_definition() {
        let source = indoc! {"
            def outer(x):
                def inner(y):
                    return y
                return inner(x)
        "};
        assert_eq!(
            module(source).expect("translate"),
            "outer: {[x] inner: {[y] y}; inner[x]}"
        );
    }

    #[test]
    fn module_joins_top_level_with_newlines() {
        let source = indoc! {"
            def g(a, b):
                return a * b
            x = g(1, 2)
            x
        "};
        assert_eq!(
            module(source).expect("translate"),
            "g: {[a; b] (a) * (b)}\nx: g[1; 2]\nx"
        );
    }

    #[test]
    fn chained_comparison_is_rejected() {
        assert_eq!(
            expression("a < b < c"),
            Err(TranslateError::StructuralViolation {
                statement: "Compare",
                reason: "chained comparisons are not supported",
            })
        );
    }

    #[test]
    fn operators_without_entries_are_rejected() {
        assert_eq!(
            expression("a % b"),
            Err(TranslateError::UnsupportedOperator {
                operator: "%".to_string(),
                table: "binary",
            })
        );
        assert_eq!(
            expression("a in b"),
            Err(TranslateError::UnsupportedOperator {
                operator: "in".to_string(),
                table: "comparison",
            })
        );
    }

    #[test]
    fn unsupported_node_kinds_are_named() {
        let cases = [
            ("True", "Constant"),
            ("(a, b)", "Tuple"),
            ("-x", "UnaryOp"),
            ("a and b", "BoolOp"),
            ("np.sum(x)", "Attribute"),
            ("x[0]", "Subscript"),
        ];
        for (source, kind) in cases {
            assert_eq!(
                expression(source),
                Err(TranslateError::UnsupportedNodeKind { kind }),
                "{source}"
            );
        }
        assert_eq!(
            module("while x:\n    pass\n"),
            Err(TranslateError::UnsupportedNodeKind { kind: "Pass" })
        );
    }

    #[test]
    fn bare_return_is_rejected() {
        assert!(matches!(
            module("def f():\n    return\n"),
            Err(TranslateError::StructuralViolation { statement: "Return", .. })
        ));
    }

    #[test]
    fn depth_guard_stops_deep_trees() {
        let mut expr = name("x");
        for _ in 0..40 {
            expr = Expression::BinaryOp {
                left: Box::new(expr),
                op: BinaryOperator::Add,
                right: Box::new(Expression::Number("1".to_string())),
            };
        }
        let shallow = Translator::new(Options {
            max_depth: 16,
            ..Options::default()
        });
        assert_eq!(
            shallow.translate_expression(&expr),
            Err(TranslateError::DepthExceeded { limit: 16 })
        );
        assert!(Translator::default().translate_expression(&expr).is_ok());

        let source = format!("x = {}\n", vec!["1"; 300].join(" + "));
        assert_eq!(
            module(&source),
            Err(TranslateError::DepthExceeded {
                limit: Options::DEFAULT_MAX_DEPTH,
            })
        );
    }

    #[test]
    fn translation_is_deterministic() {
        let expr = Expression::Compare {
            left: Box::new(name("a")),
            ops: vec![CompareOperator::NotEq],
            comparators: vec![Expression::Dict(vec![(
                Expression::String("k".to_string()),
                name("v"),
            )])],
        };
        let translator = Translator::default();
        let first = translator.translate_expression(&expr).expect("translate");
        let second = translator.translate_expression(&expr).expect("translate");
        assert_eq!(first, second);
        assert_eq!(first, "(a) <> ((,:[\"k\"])!(,:[v]))");
    }
}
