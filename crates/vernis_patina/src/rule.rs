//! Rule identity.

/// Name reported as `ruleId`.
pub const RULE_NAME: &str = "react/no-inline-props";

/// Stable numeric code attached to every finding.
pub const RULE_CODE: u32 = 420000;

/// Tag identifying this tool as the source of a finding.
pub const RULE_SOURCE: &str = "vernis";
