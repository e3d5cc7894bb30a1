use std::fmt;

use tracing::debug;

use crate::ast::{Expression, Module};
use crate::error::{Result, TranslateError};
use crate::literal::Literal;
use crate::parser;
use crate::reflect::Reflect;
use crate::translator::Translator;

/// Anything the translator can be pointed at.
#[derive(Clone, Copy)]
pub enum Input<'a> {
    Source(&'a str),
    Tree(&'a Module),
    Expression(&'a Expression),
    /// Only lists and mappings are translatable values.
    Literal(&'a Literal),
    Callable(&'a dyn Reflect),
}

impl Input<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Source(_) => "source",
            Self::Tree(_) => "tree",
            Self::Expression(_) => "expression",
            Self::Literal(_) => "literal",
            Self::Callable(_) => "callable",
        }
    }
}

impl fmt::Debug for Input<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(source) => f.debug_tuple("Source").field(source).finish(),
            Self::Tree(module) => f.debug_tuple("Tree").field(module).finish(),
            Self::Expression(expr) => f.debug_tuple("Expression").field(expr).finish(),
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Callable(callable) => f.debug_tuple("Callable").field(&callable.name()).finish(),
        }
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(source: &'a str) -> Self {
        Self::Source(source)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(source: &'a String) -> Self {
        Self::Source(source)
    }
}

impl<'a> From<&'a Module> for Input<'a> {
    fn from(module: &'a Module) -> Self {
        Self::Tree(module)
    }
}

impl<'a> From<&'a Expression> for Input<'a> {
    fn from(expr: &'a Expression) -> Self {
        Self::Expression(expr)
    }
}

impl<'a> From<&'a Literal> for Input<'a> {
    fn from(value: &'a Literal) -> Self {
        Self::Literal(value)
    }
}

impl Translator {
    /// Normalizes `input` to a syntax tree and renders it.
    pub fn translate<'a>(&self, input: impl Into<Input<'a>>) -> Result<String> {
        let input = input.into();
        debug!(kind = input.kind(), options = ?self.options(), "translating");
        match input {
            Input::Source(source) => {
                let module = parser::parse_module(source)?;
                self.translate_module(&module)
            }
            Input::Tree(module) => self.translate_module(module),
            Input::Expression(expr) => self.translate_expression(expr),
            Input::Literal(value @ (Literal::List(_) | Literal::Mapping(_))) => {
                let expr = parser::parse_expression(&value.to_source())?;
                self.translate_expression(&expr)
            }
            Input::Literal(value) => Err(TranslateError::InputKind {
                kind: value.type_name(),
            }),
            Input::Callable(callable) => {
                let source = callable.source()?;
                debug!(name = callable.name(), "retrieved callable source");
                self.translate(source.as_str())
            }
        }
    }
}

/// Translates with default [`Options`](crate::Options).
pub fn translate<'a>(input: impl Into<Input<'a>>) -> Result<String> {
    Translator::default().translate(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{DefinitionLookup, SourceUnavailable};
    use indoc::indoc;

    const FUNCTIONS: &str = indoc! {"
        def f(a, b, c):
            return a + b * c - 1


        def mapper(x):  # -> f each x
            return map(f, x)


        def powfunc(x):
            return x ** 2 + 1
    "};

    #[test]
    fn translates_source_text() {
        assert_eq!(
            translate("def g(a, b):\n    return a * b\n").expect("translate"),
            "g: {[a; b] (a) * (b)}"
        );
    }

    #[test]
    fn translates_callables_through_reflection() {
        let f = DefinitionLookup::new(FUNCTIONS, "f");
        assert_eq!(
            translate(Input::Callable(&f)).expect("translate"),
            "f: {[a; b; c] ((a) + ((b) * (c))) - (1)}"
        );
        let mapper = DefinitionLookup::new(FUNCTIONS, "mapper");
        assert_eq!(
            translate(Input::Callable(&mapper)).expect("translate"),
            "mapper: {[x] each[f; x]}"
        );
        let powfunc = DefinitionLookup::new(FUNCTIONS, "powfunc");
        assert_eq!(
            translate(Input::Callable(&powfunc)).expect("translate"),
            "powfunc: {[x] ((x) xpow (2)) + (1)}"
        );
    }

    #[test]
    fn callables_with_wrapped_headers_and_docstrings_translate_whole() {
        let source = indoc! {r#"
            def f(a,
            b):
                return a + b


            def g(x):
                """Doc
            more doc
                """
                return x
        "#};
        let f = DefinitionLookup::new(source, "f");
        assert_eq!(
            translate(Input::Callable(&f)).expect("translate"),
            "f: {[a; b] (a) + (b)}"
        );
        let g = DefinitionLookup::new(source, "g");
        assert_eq!(
            translate(Input::Callable(&g)).expect("translate"),
            "g: {[x] \"Doc\nmore doc\n    \"; x}"
        );
    }

    #[test]
    fn missing_callable_source_is_reported() {
        let missing = DefinitionLookup::new(FUNCTIONS, "nothere");
        assert_eq!(
            translate(Input::Callable(&missing)),
            Err(TranslateError::SourceUnavailable(SourceUnavailable {
                name: "nothere".to_string(),
                reason: "no top-level definition found".to_string(),
            }))
        );
    }

    #[test]
    fn translates_literal_mapping_and_list() {
        let mapping = Literal::Mapping(vec![("a".into(), 1.into()), ("b".into(), 2.into())]);
        assert_eq!(translate(&mapping).expect("translate"), "(\"a\"; \"b\")!(1; 2)");

        let list = Literal::List(vec![
            1.into(),
            "a".into(),
            2.into(),
            Literal::List(Vec::new()),
        ]);
        assert_eq!(translate(&list).expect("translate"), "(1; \"a\"; 2; ())");
    }

    #[test]
    fn mapping_sequences_have_matching_cardinality() {
        let entries = (0..5)
            .map(|index: i64| (Literal::Str(format!("k{index}")), Literal::Int(index * 10)))
            .collect::<Vec<_>>();
        let rendered = translate(&Literal::Mapping(entries)).expect("translate");
        let (keys, values) = rendered.split_once('!').expect("pairing operator");
        assert_eq!(keys, "(\"k0\"; \"k1\"; \"k2\"; \"k3\"; \"k4\")");
        assert_eq!(values, "(0; 10; 20; 30; 40)");
    }

    #[test]
    fn scalar_literals_are_rejected() {
        assert_eq!(
            translate(&Literal::Int(3)),
            Err(TranslateError::InputKind { kind: "int" })
        );
        assert_eq!(
            translate(&Literal::Str("x".to_string())),
            Err(TranslateError::InputKind { kind: "str" })
        );
    }

    #[test]
    fn literal_with_constants_reports_node_kind() {
        let list = Literal::List(vec![Literal::Bool(true)]);
        assert_eq!(
            translate(&list),
            Err(TranslateError::UnsupportedNodeKind { kind: "Constant" })
        );
    }

    #[test]
    fn translates_pre_parsed_trees() {
        let module = parser::parse_module("x = 1\ny = x\n").expect("parse failed");
        assert_eq!(translate(&module).expect("translate"), "x: 1\ny: x");
        let expr = Expression::List(vec![Expression::Number("1".to_string())]);
        assert_eq!(translate(&expr).expect("translate"), "(,:[1])");
    }

    #[test]
    fn syntax_errors_surface_as_parse_errors() {
        assert!(matches!(
            translate("def f(:)\n"),
            Err(TranslateError::Parse(_))
        ));
    }
}
