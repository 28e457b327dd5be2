//! Driver generation: wrapping submitted source in a per-language harness
//! program.
//!
//! Every generator emits one complete, self-contained program that defines
//! the submission, walks the embedded test cases in order, times each call,
//! records per-case failures without aborting the batch, and prints exactly
//! one JSON array of verdict records as the final line of standard output.
//! Anything the submission prints lands on earlier lines and is skipped by
//! the report parser.

mod cpp;
mod java;
mod javascript;
mod python;
mod typescript;

use crate::language::Language;
use crate::model::TestCase;

pub use typescript::strip_types;

// Replacement targets carry a prefix no plausible submission contains, so a
// case string or entry point spelling a target word never gets rewritten.

/// The replacement target for the submitted source code.
const USER_CODE_TARGET: &str = "__VIRTUOSO_USER_CODE__";

/// The replacement target for problem-supplied setup definitions.
const SETUP_CODE_TARGET: &str = "__VIRTUOSO_SETUP_CODE__";

/// The replacement target for the embedded test case list.
const TEST_CASES_TARGET: &str = "__VIRTUOSO_TEST_CASES__";

/// The replacement target for the resolved entry-point name.
const ENTRY_POINT_TARGET: &str = "__VIRTUOSO_ENTRY_POINT__";

/// A submission plus everything a generator needs to wrap it.
pub struct DriverRequest<'a> {
    pub user_code: &'a str,
    pub setup_code: Option<&'a str>,
    pub entry_point: &'a str,
    pub test_cases: &'a [TestCase],
}

/// Produces the complete driver program for one target language.
pub trait DriverGenerator: Send + Sync {
    fn generate(&self, request: &DriverRequest<'_>) -> String;
}

/// Returns the generator for the given language.
pub fn generator_for(language: Language) -> &'static dyn DriverGenerator {
    match language {
        Language::Javascript => &javascript::JavaScript,
        Language::Typescript => &typescript::TypeScript,
        Language::Python => &python::Python,
        Language::Java => &java::Java,
        Language::Cpp => &cpp::Cpp,
    }
}

/// Serializes the test case list to the JSON text embedded in drivers.
fn cases_json(test_cases: &[TestCase]) -> String {
    serde_json::to_string(test_cases).expect("test cases are plain JSON data")
}

/// Produces a quoted, escaped string literal valid in JavaScript, Python,
/// Java and C++ source alike. JSON escapes are a subset of all four.
fn string_literal(text: &str) -> String {
    serde_json::to_string(text).expect("strings always serialize")
}

#[cfg(test)]
mod generator_for {
    use super::*;
    use serde_json::json;

    fn request<'a>(cases: &'a [TestCase]) -> DriverRequest<'a> {
        DriverRequest {
            user_code: "function add(a, b) { return a + b; }",
            setup_code: None,
            entry_point: "add",
            test_cases: cases,
        }
    }

    #[test]
    fn every_language_produces_a_driver_containing_the_entry_point() {
        let cases = vec![TestCase {
            input: json!([2, 3]),
            expected: json!(5),
        }];

        for language in [Language::Javascript, Language::Typescript, Language::Python, Language::Java] {
            let driver = generator_for(language).generate(&request(&cases));
            assert!(
                driver.contains("add"),
                "{language} driver lost the entry point"
            );
            assert!(!driver.contains(USER_CODE_TARGET), "{language} left a target");
            assert!(!driver.contains(TEST_CASES_TARGET), "{language} left a target");
        }
    }

    #[test]
    fn string_literal_escapes_embedded_quotes() {
        assert_eq!(string_literal("say \"hi\""), r#""say \"hi\"""#);
        assert_eq!(string_literal("line\nbreak"), r#""line\nbreak""#);
    }
}
