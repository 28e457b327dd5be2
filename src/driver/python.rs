//! Contains the driver generation for the Python programming language.

use super::{
    cases_json, string_literal, DriverGenerator, DriverRequest, ENTRY_POINT_TARGET,
    SETUP_CODE_TARGET, TEST_CASES_TARGET, USER_CODE_TARGET,
};

/// The base driver for Python submissions.
///
/// The case list is embedded as a JSON string and decoded with `json.loads`,
/// which sidesteps the `true`/`True` and `null`/`None` literal mismatch.
/// Comparison uses compact separators so the canonical text matches what the
/// JavaScript driver produces for the same value.
const PY_BASE_DRIVER: &str = r#"import json as __json
import time as __time

__VIRTUOSO_SETUP_CODE__

__VIRTUOSO_USER_CODE__

__cases = __json.loads(__VIRTUOSO_TEST_CASES__)
__results = []
for __case in __cases:
    __args = __case["input"] if isinstance(__case["input"], list) else [__case["input"]]
    __expected_json = __json.dumps(__case["expected"], separators=(",", ":"))
    __record = {
        "passed": False,
        "input": __json.dumps(__case["input"], separators=(",", ":")),
        "expected": __expected_json,
        "actual": None,
        "runtime": None,
        "error": None,
    }
    try:
        __start = __time.perf_counter()
        __actual = __VIRTUOSO_ENTRY_POINT__(*__args)
        __elapsed = (__time.perf_counter() - __start) * 1000.0
        try:
            __actual_json = __json.dumps(__actual, separators=(",", ":"))
        except TypeError:
            __actual_json = __json.dumps(str(__actual))
        __record["actual"] = __actual_json
        __record["runtime"] = "%.2f" % __elapsed
        __record["passed"] = __actual_json == __expected_json
    except Exception as __error:
        __record["error"] = str(__error) or __error.__class__.__name__
    __results.append(__record)

print(__json.dumps(__results, separators=(",", ":")))
"#;

pub struct Python;

impl DriverGenerator for Python {
    fn generate(&self, request: &DriverRequest<'_>) -> String {
        PY_BASE_DRIVER
            .replace(ENTRY_POINT_TARGET, request.entry_point)
            .replace(TEST_CASES_TARGET, &string_literal(&cases_json(request.test_cases)))
            .replace(SETUP_CODE_TARGET, request.setup_code.unwrap_or(""))
            .replace(USER_CODE_TARGET, request.user_code)
    }
}
