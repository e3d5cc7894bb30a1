use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use req::{DefinitionLookup, Input, Literal, Options, TranslateError, Translator};
use test_support::{Case, CaseClass, InputMode, load_cases, normalize_output};

fn translator_for(case: &Case) -> Result<Translator> {
    let options = match case.options_yaml()? {
        Some(yaml) => {
            Options::from_yaml(&yaml).with_context(|| format!("Options of {}", case.name))?
        }
        None => Options::default(),
    };
    Ok(Translator::new(options))
}

fn translate_case(case: &Case) -> Result<Result<String, TranslateError>> {
    let translator = translator_for(case)?;
    let program = case.program()?;
    let result = match (case.spec.input, &case.spec.function) {
        (InputMode::Data, _) => {
            let document: serde_yaml::Value = serde_yaml::from_str(&program)
                .with_context(|| format!("Parsing data of {}", case.name))?;
            Literal::try_from(document).and_then(|value| translator.translate(&value))
        }
        (InputMode::Source, Some(name)) => {
            let lookup = DefinitionLookup::new(&program, name);
            translator.translate(Input::Callable(&lookup))
        }
        (InputMode::Source, None) => translator.translate(program.as_str()),
    };
    Ok(result)
}

fn expected_error(case: &Case) -> Result<&str> {
    case.spec
        .expected
        .error_contains
        .as_deref()
        .with_context(|| format!("Missing error_contains in {}", case.name))
}

fn check_case(case: &Case) -> Result<()> {
    let result = translate_case(case)?;
    match case.spec.class {
        CaseClass::Translated => {
            let output_file = case
                .spec
                .expected
                .output_file
                .as_deref()
                .with_context(|| format!("Missing output_file in {}", case.name))?;
            let expected = case.read_text(output_file)?;
            let output = result.with_context(|| format!("Translating {}", case.name))?;
            assert_eq!(
                normalize_output(&output),
                normalize_output(&expected),
                "Output mismatch for {}",
                case.name
            );
        }
        CaseClass::FrontendError | CaseClass::TranslationError => {
            let expected_error = expected_error(case)?;
            let error = match result {
                Ok(output) => bail!("Expected failure in {}, got '{output}'", case.name),
                Err(error) => error,
            };
            let is_frontend = matches!(error, TranslateError::Parse(_));
            ensure!(
                is_frontend == (case.spec.class == CaseClass::FrontendError),
                "Case {} failed in the wrong phase: {error}",
                case.name
            );
            let actual = error.to_string();
            ensure!(
                actual.contains(expected_error),
                "Expected error containing '{expected_error}' in {}, got '{actual}'",
                case.name
            );
        }
    }
    Ok(())
}

#[test]
fn translates_fixture_cases() -> Result<()> {
    for case in load_cases(Path::new("tests/cases"))? {
        check_case(&case)?;
    }
    Ok(())
}

#[test]
fn translation_is_deterministic_across_runs() -> Result<()> {
    for case in load_cases(Path::new("tests/cases"))? {
        if case.spec.class != CaseClass::Translated {
            continue;
        }
        let first = translate_case(&case)?;
        let second = translate_case(&case)?;
        assert_eq!(first, second, "Non-deterministic output for {}", case.name);
    }
    Ok(())
}
