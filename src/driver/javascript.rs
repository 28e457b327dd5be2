//! Contains the driver generation for the JavaScript programming language.

use super::{
    cases_json, DriverGenerator, DriverRequest, ENTRY_POINT_TARGET, SETUP_CODE_TARGET,
    TEST_CASES_TARGET, USER_CODE_TARGET,
};

/// The base driver for JavaScript submissions.
///
/// An array input spreads into positional arguments; everything else is the
/// sole argument. Comparison happens on `JSON.stringify` text, with the
/// `undefined` result of stringifying `undefined` mapped to `"null"` so every
/// record field stays a string.
const JS_BASE_DRIVER: &str = r#""use strict";

__VIRTUOSO_SETUP_CODE__

__VIRTUOSO_USER_CODE__

const __cases = __VIRTUOSO_TEST_CASES__;
const __results = [];
for (const __case of __cases) {
    const __args = Array.isArray(__case.input) ? __case.input : [__case.input];
    const __expectedJson = JSON.stringify(__case.expected) ?? "null";
    const __record = {
        passed: false,
        input: JSON.stringify(__case.input) ?? "null",
        expected: __expectedJson,
        actual: null,
        runtime: null,
        error: null,
    };
    try {
        const __start = performance.now();
        const __actual = __VIRTUOSO_ENTRY_POINT__(...__args);
        const __elapsed = performance.now() - __start;
        const __actualJson = JSON.stringify(__actual) ?? "null";
        __record.actual = __actualJson;
        __record.runtime = __elapsed.toFixed(2);
        __record.passed = __actualJson === __expectedJson;
    } catch (__error) {
        __record.error = __error instanceof Error ? __error.message : String(__error);
    }
    __results.push(__record);
}
console.log(JSON.stringify(__results));
"#;

pub struct JavaScript;

impl DriverGenerator for JavaScript {
    fn generate(&self, request: &DriverRequest<'_>) -> String {
        JS_BASE_DRIVER
            .replace(ENTRY_POINT_TARGET, request.entry_point)
            .replace(TEST_CASES_TARGET, &cases_json(request.test_cases))
            .replace(SETUP_CODE_TARGET, request.setup_code.unwrap_or(""))
            .replace(USER_CODE_TARGET, request.user_code)
    }
}
