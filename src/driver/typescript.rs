//! Contains the driver generation for TypeScript submissions.
//!
//! TypeScript lowers onto the JavaScript driver through a best-effort textual
//! strip of type syntax. This is not a compiler: annotations are removed by
//! pattern over the common problem-bank subset (annotated parameters and
//! declarations, return types, interfaces, enums, type aliases, casts,
//! non-null assertions). Constructs outside that subset, such as decorators,
//! namespaces or deeply nested generics, pass through untouched and surface
//! as run-time errors in the verdicts.

use super::{javascript::JavaScript, DriverGenerator, DriverRequest};
use lazy_static::lazy_static;
use regex::Regex;

/// One type expression: a primitive or capitalized name, one level of
/// generics, array suffixes, and union tails of the same shape.
const TYPE_ATOM: &str = r"(?:number|string|boolean|any|void|unknown|never|null|undefined|object|bigint|symbol|[A-Z][\w$]*)(?:<[^<>]*(?:<[^<>]*>[^<>]*)*>)?(?:\[\])*";

lazy_static! {
    /// `import` and `import type` lines; drivers run standalone.
    static ref IMPORT_LINE: Regex =
        Regex::new(r"(?m)^\s*import\s[^\n]*$").expect("import pattern is valid");
    /// `declare` ambient lines.
    static ref DECLARE_LINE: Regex =
        Regex::new(r"(?m)^\s*declare\s[^\n]*$").expect("declare pattern is valid");
    /// `interface X { .. }` and `enum X { .. }` heads; the body is walked
    /// by brace counting.
    static ref BRACED_DECLARATION: Regex =
        Regex::new(r"\b(?:export\s+)?(?:interface|enum)\s+[A-Za-z_$][\w$]*")
            .expect("braced declaration pattern is valid");
    /// `type X =` heads; the alias body is walked to its terminating `;`.
    static ref ALIAS_DECLARATION: Regex =
        Regex::new(r"\b(?:export\s+)?type\s+[A-Za-z_$][\w$]*\s*=")
            .expect("alias declaration pattern is valid");
    /// Generic parameter lists on function declarations.
    static ref FUNCTION_GENERICS: Regex =
        Regex::new(r"(function\s+[A-Za-z_$][\w$]*)\s*<[^(>]*>")
            .expect("function generics pattern is valid");
    /// A return type between a parameter list and the body or arrow.
    static ref RETURN_TYPE: Regex =
        Regex::new(r"\)\s*:\s*[\w$ .<>\[\],|&]*?\s*(\{|=>)")
            .expect("return type pattern is valid");
    /// Annotated `let`/`const`/`var` declarations.
    static ref DECLARATION_TYPE: Regex = Regex::new(&format!(
        r"\b(let|const|var)(\s+[A-Za-z_$][\w$]*)\s*:\s*{TYPE_ATOM}(?:\s*\|\s*{TYPE_ATOM})*(\s*[=;,)])"
    ))
    .expect("declaration type pattern is valid");
    /// Annotated (and optional) parameters inside a parameter list.
    static ref PARAMETER_TYPE: Regex = Regex::new(&format!(
        r"([(,]\s*(?:\.\.\.)?[A-Za-z_$][\w$]*)(?:\s*\?)?\s*:\s*{TYPE_ATOM}(?:\s*\|\s*{TYPE_ATOM})*"
    ))
    .expect("parameter type pattern is valid");
    /// `expr as Type` casts.
    static ref AS_CAST: Regex = Regex::new(&format!(
        r"\s+as\s+(?:const\b|{TYPE_ATOM}(?:\s*\|\s*{TYPE_ATOM})*)"
    ))
    .expect("as cast pattern is valid");
    /// Postfix non-null assertions; `!=` comparisons keep their bang.
    static ref NON_NULL: Regex =
        Regex::new(r"([\w$\)\]])!([.\)\],;\s])").expect("non-null pattern is valid");
    /// `implements A, B<C>` clauses on class declarations.
    static ref IMPLEMENTS_CLAUSE: Regex = Regex::new(&format!(
        r"\s+implements\s+{TYPE_ATOM}(?:\s*,\s*{TYPE_ATOM})*"
    ))
    .expect("implements pattern is valid");
    /// Member access modifiers at line heads.
    static ref ACCESS_MODIFIER: Regex =
        Regex::new(r"(?m)^(\s*)(?:public|private|protected|readonly)\s+")
            .expect("access modifier pattern is valid");
    /// `export` and `export default` prefixes.
    static ref EXPORT_PREFIX: Regex =
        Regex::new(r"\bexport\s+default\s+|\bexport\s+").expect("export pattern is valid");
}

/// Lowers TypeScript source to runnable JavaScript by stripping type syntax.
pub fn strip_types(source: &str) -> String {
    let mut lowered = source.to_string();

    lowered = IMPORT_LINE.replace_all(&lowered, "").into_owned();
    lowered = DECLARE_LINE.replace_all(&lowered, "").into_owned();
    remove_braced_declarations(&mut lowered);
    remove_alias_declarations(&mut lowered);
    lowered = FUNCTION_GENERICS.replace_all(&lowered, "$1").into_owned();
    lowered = RETURN_TYPE.replace_all(&lowered, ") $1").into_owned();
    lowered = DECLARATION_TYPE.replace_all(&lowered, "$1$2$3").into_owned();
    lowered = PARAMETER_TYPE.replace_all(&lowered, "$1").into_owned();
    lowered = AS_CAST.replace_all(&lowered, "").into_owned();
    lowered = NON_NULL.replace_all(&lowered, "$1$2").into_owned();
    lowered = IMPLEMENTS_CLAUSE.replace_all(&lowered, "").into_owned();
    lowered = ACCESS_MODIFIER.replace_all(&lowered, "$1").into_owned();
    lowered = EXPORT_PREFIX.replace_all(&lowered, "").into_owned();

    lowered
}

/// Removes `interface` and `enum` declarations including their brace-balanced
/// bodies. Braces inside string literals will miscount; that is an accepted
/// limit of the textual subset.
fn remove_braced_declarations(source: &mut String) {
    while let Some(head) = BRACED_DECLARATION.find(source) {
        let Some(open) = source[head.end()..].find('{') else {
            return;
        };
        let open = head.end() + open;

        let mut depth = 0usize;
        let mut close = None;
        for (index, ch) in source[open..].char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + index);
                        break;
                    }
                }
                _ => {}
            }
        }

        match close {
            Some(close) => source.replace_range(head.start()..=close, ""),
            None => return,
        }
    }
}

/// Removes `type X = ..;` aliases, walking nesting so a `;` inside an object
/// or tuple type does not end the alias early.
fn remove_alias_declarations(source: &mut String) {
    while let Some(head) = ALIAS_DECLARATION.find(source) {
        let mut depth = 0usize;
        let mut terminator = None;
        for (index, ch) in source[head.end()..].char_indices() {
            match ch {
                '{' | '[' | '(' | '<' => depth += 1,
                '}' | ']' | ')' | '>' => depth = depth.saturating_sub(1),
                ';' | '\n' if depth == 0 => {
                    terminator = Some(head.end() + index);
                    break;
                }
                _ => {}
            }
        }
        match terminator {
            Some(end) => source.replace_range(head.start()..=end, ""),
            None => source.truncate(head.start()),
        }
    }
}

/// The driver generator for TypeScript: strip types, then reuse the
/// JavaScript driver unchanged.
pub struct TypeScript;

impl DriverGenerator for TypeScript {
    fn generate(&self, request: &DriverRequest<'_>) -> String {
        let user_code = strip_types(request.user_code);
        let setup_code = request.setup_code.map(strip_types);

        JavaScript.generate(&DriverRequest {
            user_code: &user_code,
            setup_code: setup_code.as_deref(),
            entry_point: request.entry_point,
            test_cases: request.test_cases,
        })
    }
}


#[cfg(test)]
mod generate {
    use super::*;
    use crate::model::TestCase;
    use serde_json::json;

    #[test]
    fn lowers_then_wraps_with_the_javascript_driver() {
        let cases = vec![TestCase {
            input: json!([2, 3]),
            expected: json!(5),
        }];
        let driver = TypeScript.generate(&DriverRequest {
            user_code: "function add(a: number, b: number): number {\n    return a + b;\n}",
            setup_code: None,
            entry_point: "add",
            test_cases: &cases,
        });

        assert!(driver.contains("function add(a, b) {"));
        assert!(!driver.contains(": number"));
        assert!(driver.contains("console.log(JSON.stringify(__results));"));
    }
}
