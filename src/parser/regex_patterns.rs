// Process-wide static regex pattern management
use super::regex_error::RegexError;
use regex::Regex;
use std::sync::OnceLock;

/// Lazily compiled, read-only set of named regex patterns.
///
/// Every pattern is compiled on first access and shared for the lifetime of
/// the process.
pub struct StaticRegexSet {
    patterns: &'static [(&'static str, &'static str)], // (pattern, name)
    compiled: OnceLock<Result<Vec<Regex>, RegexError>>,
}

impl StaticRegexSet {
    pub const fn new(patterns: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            patterns,
            compiled: OnceLock::new(),
        }
    }

    fn compiled(&self) -> Result<&Vec<Regex>, RegexError> {
        let compiled = self.compiled.get_or_init(|| {
            let mut regexes = Vec::with_capacity(self.patterns.len());

            for (pattern, name) in self.patterns {
                match Regex::new(pattern) {
                    Ok(regex) => regexes.push(regex),
                    Err(e) => {
                        return Err(RegexError::CompilationFailed {
                            pattern: (*pattern).to_string(),
                            name: (*name).to_string(),
                            source: e,
                        });
                    }
                }
            }

            Ok(regexes)
        });

        compiled.as_ref().map_err(Clone::clone)
    }

    pub fn get_by_name(&self, name: &str) -> Result<&Regex, RegexError> {
        let index = self
            .patterns
            .iter()
            .position(|(_, pattern_name)| *pattern_name == name)
            .ok_or_else(|| RegexError::PatternNotFound {
                name: name.to_string(),
            })?;

        let regexes = self.compiled()?;
        regexes.get(index).ok_or_else(|| RegexError::PatternNotFound {
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|(_, name)| *name).collect()
    }
}

/// Pattern names registered in [`PATTERNS`].
pub mod pattern_name {
    pub const SERVICE_GROUP: &str = "service_group";
    pub const LAMBDA_START: &str = "lambda_start";
    pub const LAMBDA_END: &str = "lambda_end";
    pub const LAMBDA_REPORT: &str = "lambda_report";
}

// START RequestId: b3be449c-8bd7-11e7-bb30-4f271af95c46 Version: $LATEST
// END RequestId: b3be449c-8bd7-11e7-bb30-4f271af95c46
// REPORT RequestId: b3be449c-8bd7-11e7-bb30-4f271af95c46 Duration: 0.47 ms
//   Billed Duration: 100 ms Memory Size: 128 MB Max Memory Used: 20 MB
/// All patterns used by the resolver and the matchers.
pub static PATTERNS: StaticRegexSet = StaticRegexSet::new(&[
    (
        r"^/aws/(?P<service>lambda|apigateway|rds|eks)/(?P<group>.*)",
        pattern_name::SERVICE_GROUP,
    ),
    (
        r"START RequestId:\s+(?P<request_id>\S+)\s+Version: (?P<version>\S+)",
        pattern_name::LAMBDA_START,
    ),
    (
        r"END RequestId:\s+(?P<request_id>\S+)",
        pattern_name::LAMBDA_END,
    ),
    (
        r"REPORT RequestId:\s+(?P<request_id>\S+)\s+Duration: (?P<duration_ms>\S+) ms\s+Billed Duration: (?P<duration_billed_ms>\S+) ms\s+Memory Size: (?P<memory_size_mb>\S+) MB\s+Max Memory Used: (?P<memory_size_max_mb>\S+) MB",
        pattern_name::LAMBDA_REPORT,
    ),
]);
