//! Testkit: conformance adapter runner.
//!
//! Runs the shared conformance vectors (`tests/conformance/vectors.json`)
//! against anything that implements [`CbuiAdapter`]. Each adapter method maps
//! to one vector category; unimplemented methods skip.
//!
//! ## Usage
//!
//! 1. Implement `CbuiAdapter`
//! 2. Call `load_vectors()` to parse vectors.json
//! 3. Call `run_vectors()` to execute all vectors
//! 4. Inspect the `TestReport` for pass/fail + diffs
//!
//! Only compiled with the `testkit` cargo feature:
//!
//! ```toml
//! [dev-dependencies]
//! cbuicore = { version = "1", features = ["testkit"] }
//! ```
//!
//! ## Vector Format
//!
//! Parameter sets are ordered arrays of `[key, value]` pairs so that
//! insertion order (which the final URL depends on) survives JSON.
//!
//! ```json
//! { "id": "v2_001",
//!   "input": { "params": [["b", "2"], ["a", "1"]],
//!              "http_method": "GET", "host": "example.com", "request_path": "/" },
//!   "expected": { "string_to_sign": "GET\nexample.com\n/\na=1&b=2" } }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cbuicore::testkit::{load_vectors, run_vectors, AdapterResult, CbuiAdapter};
//!
//! struct EncodeOnly;
//! impl CbuiAdapter for EncodeOnly {
//!     fn percent_encode(&self, input: &str) -> AdapterResult {
//!         AdapterResult::ok(cbuicore::cbui_percent_encode(input))
//!     }
//! }
//!
//! let data = br#"{ "schema_version": 1, "percent_encoding": [
//!     { "id": "pe_001", "input": { "value": "a b" }, "expected": { "encoded": "a%20b" } }
//! ] }"#;
//! let vectors = load_vectors(data).unwrap();
//! let report = run_vectors(&vectors, &EncodeOnly);
//! assert!(report.all_passed(), "Failures: {:?}", report.failures());
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::endpoint::SignatureContext;
use crate::params::ParameterSet;

// ── Vector Types ─────────────────────────────────────────────────────

/// Top-level vectors file.
#[derive(Debug, Deserialize)]
pub struct VectorFile {
    /// Schema version
    pub schema_version: u32,
    /// Protocol version these vectors are locked to
    #[serde(default)]
    pub protocol_version: String,
    /// All vector categories
    #[serde(flatten)]
    pub categories: BTreeMap<String, serde_json::Value>,
}

/// A single conformance vector.
#[derive(Debug, Clone, Deserialize)]
pub struct Vector {
    /// Unique vector ID (e.g., "v2_001")
    pub id: String,
    /// Category (e.g., "string_to_sign_v2"); filled from the file section
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Input data (varies by category)
    #[serde(default)]
    pub input: serde_json::Value,
    /// Expected output (varies by category)
    #[serde(default)]
    pub expected: serde_json::Value,
}

// ── Adapter Interface ────────────────────────────────────────────────

/// Result from an adapter operation.
#[derive(Debug, Clone)]
pub struct AdapterResult {
    /// Successful output (encoded string, signature, URL, etc.)
    pub output: Option<String>,
    pub ok: bool,
    /// Error code if failed (e.g., "CBUI_MISSING_PARAMETER")
    pub error_code: Option<String>,
}

impl AdapterResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            ok: true,
            error_code: None,
        }
    }

    pub fn ok_bool(val: bool) -> Self {
        Self::ok(val.to_string())
    }

    pub fn error(code: impl Into<String>) -> Self {
        Self {
            output: None,
            ok: false,
            error_code: Some(code.into()),
        }
    }

    /// Skipped (adapter doesn't support this operation).
    pub fn skip() -> Self {
        Self {
            output: None,
            ok: true,
            error_code: None,
        }
    }

    fn is_skip(&self) -> bool {
        self.output.is_none() && self.ok && self.error_code.is_none()
    }
}

/// One method per vector category. Return `AdapterResult::skip()` for
/// categories not implemented.
pub trait CbuiAdapter {
    /// RFC 3986 encoding: raw value → encoded
    fn percent_encode(&self, input: &str) -> AdapterResult { let _ = input; AdapterResult::skip() }
    /// V1 string-to-sign: params → concatenation
    fn string_to_sign_v1(&self, params: &ParameterSet) -> AdapterResult { let _ = params; AdapterResult::skip() }
    /// V2 string-to-sign: (params, context) → four-line string
    fn string_to_sign_v2(&self, params: &ParameterSet, context: &SignatureContext) -> AdapterResult { let _ = (params, context); AdapterResult::skip() }
    /// Signing: full inputs → base64 signature
    fn sign(&self, input: &SignInput<'_>) -> AdapterResult { let _ = input; AdapterResult::skip() }
    /// Endpoint derivation: endpoint → host header
    fn host_header(&self, endpoint: &str) -> AdapterResult { let _ = endpoint; AdapterResult::skip() }
    /// URL building: (endpoint, params, secret) → signed URL
    fn build_url(&self, endpoint: &str, params: &ParameterSet, secret_key: &str) -> AdapterResult { let _ = (endpoint, params, secret_key); AdapterResult::skip() }
    /// Timing-safe comparison: (a, b) → bool
    fn timing_safe_equal(&self, a: &str, b: &str) -> AdapterResult { let _ = (a, b); AdapterResult::skip() }
    /// Error behavior: trigger → error code
    fn trigger_error(&self, input: &serde_json::Value) -> AdapterResult { let _ = input; AdapterResult::skip() }
}

/// Inputs of a `signature` vector.
#[derive(Debug, Clone)]
pub struct SignInput<'a> {
    pub params: &'a ParameterSet,
    /// `"1"` or `"2"`
    pub version: &'a str,
    /// `"HmacSHA1"` or `"HmacSHA256"`
    pub method: &'a str,
    pub context: &'a SignatureContext,
    pub secret_key: &'a str,
}

// ── Loading ──────────────────────────────────────────────────────────

const METADATA_KEYS: &[&str] = &["schema_version", "protocol_version", "generated_from", "description"];

/// Load vectors from raw JSON bytes (e.g., `include_bytes!`).
///
/// Malformed vectors are reported, never dropped.
pub fn load_vectors(data: &[u8]) -> Result<Vec<Vector>, String> {
    let file: VectorFile =
        serde_json::from_slice(data).map_err(|e| format!("Failed to parse vectors JSON: {}", e))?;

    let mut all_vectors = Vec::new();

    for (key, val) in &file.categories {
        if METADATA_KEYS.contains(&key.as_str()) {
            continue;
        }

        let Some(arr) = val.as_array() else {
            return Err(format!("Category '{}' is not an array", key));
        };

        for item in arr {
            let mut vec = serde_json::from_value::<Vector>(item.clone())
                .map_err(|e| format!("Failed to parse vector in category '{}': {}", key, e))?;
            if vec.category.is_empty() {
                vec.category = key.clone();
            }
            all_vectors.push(vec);
        }
    }

    Ok(all_vectors)
}

/// Load vectors from a file path.
pub fn load_vectors_from_file(path: &str) -> Result<Vec<Vector>, String> {
    let data = std::fs::read(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    load_vectors(&data)
}

/// Decode an ordered `[[key, value], ...]` array into a [`ParameterSet`].
///
/// Anything that is not a two-string pair is ignored.
pub fn params_from_json(value: &serde_json::Value) -> ParameterSet {
    value
        .as_array()
        .map(|pairs| {
            pairs
                .iter()
                .filter_map(|pair| match pair.as_array().map(Vec::as_slice) {
                    Some([k, v]) => Some((k.as_str()?.to_string(), v.as_str()?.to_string())),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

// ── Running ──────────────────────────────────────────────────────────

/// Result of running a single vector.
#[derive(Debug, Clone)]
pub struct VectorResult {
    pub id: String,
    pub category: String,
    pub passed: bool,
    pub skipped: bool,
    pub expected: String,
    pub actual: String,
    /// Diff message if failed
    pub diff: Option<String>,
}

/// Report from running all vectors.
#[derive(Debug)]
pub struct TestReport {
    pub results: Vec<VectorResult>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl TestReport {
    /// Whether all non-skipped vectors passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> Vec<&VectorResult> {
        self.results.iter().filter(|r| !r.passed && !r.skipped).collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "{}/{} passed, {} failed, {} skipped",
            self.passed, self.total, self.failed, self.skipped
        )
    }
}

/// Run all vectors against an adapter.
///
/// Dispatches each vector to the adapter method for its category, compares
/// outputs, and collects results into a `TestReport`.
pub fn run_vectors(vectors: &[Vector], adapter: &dyn CbuiAdapter) -> TestReport {
    let mut results = Vec::with_capacity(vectors.len());
    let mut passed = 0;
    let mut failed = 0;
    let mut skipped = 0;

    for vec in vectors {
        let result = run_single_vector(vec, adapter);
        if result.skipped {
            skipped += 1;
        } else if result.passed {
            passed += 1;
        } else {
            failed += 1;
        }
        results.push(result);
    }

    TestReport {
        total: vectors.len(),
        passed,
        failed,
        skipped,
        results,
    }
}

fn input_str<'a>(vec: &'a Vector, key: &str) -> &'a str {
    vec.input.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn expected_str(vec: &Vector, key: &str) -> String {
    vec.expected.get(key).and_then(|v| v.as_str()).unwrap_or("").to_string()
}

fn context_from(vec: &Vector) -> SignatureContext {
    SignatureContext::new(
        input_str(vec, "http_method"),
        input_str(vec, "host"),
        input_str(vec, "request_path"),
    )
}

fn run_single_vector(vec: &Vector, adapter: &dyn CbuiAdapter) -> VectorResult {
    let category = vec.category.as_str();

    let (adapter_result, expected) = match category {
        "percent_encoding" => (adapter.percent_encode(input_str(vec, "value")), expected_str(vec, "encoded")),
        "string_to_sign_v1" => {
            let params = params_from_json(&vec.input["params"]);
            (adapter.string_to_sign_v1(&params), expected_str(vec, "string_to_sign"))
        }
        "string_to_sign_v2" => {
            let params = params_from_json(&vec.input["params"]);
            let context = context_from(vec);
            (adapter.string_to_sign_v2(&params, &context), expected_str(vec, "string_to_sign"))
        }
        "signature" => {
            let params = params_from_json(&vec.input["params"]);
            let context = context_from(vec);
            let input = SignInput {
                params: &params,
                version: input_str(vec, "version"),
                method: input_str(vec, "method"),
                context: &context,
                secret_key: input_str(vec, "secret_key"),
            };
            (adapter.sign(&input), expected_str(vec, "signature"))
        }
        "host_header" => (adapter.host_header(input_str(vec, "endpoint")), expected_str(vec, "host_header")),
        "build_url" => {
            let params = params_from_json(&vec.input["params"]);
            (
                adapter.build_url(input_str(vec, "endpoint"), &params, input_str(vec, "secret_key")),
                expected_str(vec, "url"),
            )
        }
        "timing_safe_comparison" => {
            let expected = vec.expected.get("equal")
                .and_then(|v| v.as_bool())
                .map(|b| b.to_string())
                .unwrap_or_default();
            (adapter.timing_safe_equal(input_str(vec, "a"), input_str(vec, "b")), expected)
        }
        "error_behavior" => {
            let expected_code = expected_str(vec, "error_code");
            let result = adapter.trigger_error(&vec.input);
            let is_skip = result.is_skip();
            let actual = if result.ok {
                "ok".to_string()
            } else {
                result.error_code.clone().unwrap_or_default()
            };
            let passed = !is_skip && !result.ok && actual == expected_code;
            return VectorResult {
                id: vec.id.clone(),
                category: vec.category.clone(),
                passed,
                skipped: is_skip,
                diff: if passed || is_skip {
                    None
                } else {
                    Some(format!("expected error {}, got {}", expected_code, actual))
                },
                expected: expected_code,
                actual,
            };
        }
        _ => {
            return VectorResult {
                id: vec.id.clone(),
                category: vec.category.clone(),
                passed: false,
                skipped: true,
                expected: String::new(),
                actual: String::new(),
                diff: Some(format!("Unknown category: {}", category)),
            };
        }
    };

    if adapter_result.is_skip() {
        return VectorResult {
            id: vec.id.clone(),
            category: vec.category.clone(),
            passed: false,
            skipped: true,
            expected,
            actual: String::new(),
            diff: None,
        };
    }

    let actual = match (adapter_result.output, adapter_result.error_code) {
        (Some(output), _) => output,
        (None, code) => format!("error:{}", code.unwrap_or_default()),
    };
    let pass = actual == expected;

    VectorResult {
        id: vec.id.clone(),
        category: vec.category.clone(),
        passed: pass,
        skipped: false,
        diff: if pass {
            None
        } else {
            Some(format!("expected: {}\n  actual: {}", expected, actual))
        },
        expected,
        actual,
    }
}
