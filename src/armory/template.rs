//! # Command Builder
//!
//! Turns a tool's command template plus user-supplied parameter values into a
//! ready-to-run shell command string.
//!
//! Templates contain two placeholder forms for a parameter `p`:
//! - `{p}` — substituted with the bare value
//! - `{p_flag}` — substituted with a `--p value` (or `--p`) spelling
//!
//! A template is parsed **once** into a sequence of literal and placeholder
//! segments; rendering walks the segments and never re-scans its own output,
//! so a value that happens to contain `{...}` cannot be substituted twice.
//!
//! Rendering is a pure function: same template + same values = same command.

use std::collections::HashSet;

use crate::error::{ArmoryError, Result};
use crate::model::ParameterValues;

/// Parameters whose values are single-quoted when rendered through a flag
/// placeholder. These carry freeform payloads (POST bodies, cookie headers)
/// that routinely contain `&` and `=`.
const QUOTED_PARAMS: &[&str] = &["data", "cookie"];

/// Patterns flagged by [`hazard_scan`]. Matches are reported, not blocked;
/// see DESIGN.md for the rationale.
const HAZARD_PATTERNS: &[&str] = &[
    ";", "&&", "||", "|", "$(", "`", ">>", ">", "<", "rm -rf", "dd if=", "mkfs", "sudo ", "su ",
];

pub fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "yes" | "1")
}

pub fn is_falsy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "false" | "no" | "0")
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder { param: String, flag: bool },
}

/// A parsed command template, ready to render against parameter values.
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    segments: Vec<Segment>,
    /// Parameters that have a `{p_flag}` placeholder somewhere in the
    /// template. A truthy value for such a parameter renders only through
    /// the flag form.
    flagged: HashSet<String>,
}

impl CommandTemplate {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(ArmoryError::CommandBuild(
                "command template is empty".to_string(),
            ));
        }

        let mut segments = Vec::new();
        let mut flagged = HashSet::new();
        let mut literal = String::new();
        let mut chars = raw.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            if c != '{' {
                literal.push(c);
                continue;
            }

            // Placeholder names are identifier-shaped; anything else,
            // including an unterminated brace, stays literal text.
            let rest = &raw[idx + 1..];
            match rest.find('}') {
                Some(end)
                    if !rest[..end].is_empty()
                        && rest[..end]
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || c == '_') =>
                {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    let name = &rest[..end];
                    let (param, flag) = match name.strip_suffix("_flag") {
                        Some(base) if !base.is_empty() => (base.to_string(), true),
                        _ => (name.to_string(), false),
                    };
                    if flag {
                        flagged.insert(param.clone());
                    }
                    segments.push(Segment::Placeholder { param, flag });
                    // Skip past the placeholder body and closing brace.
                    for _ in 0..=end {
                        chars.next();
                    }
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments, flagged })
    }

    /// Render the template against the given values.
    ///
    /// Values are matched against truthy/falsy tokens regardless of the
    /// parameter's declared kind; placeholders for absent or empty values
    /// are erased. The result has whitespace collapsed and trimmed, and
    /// contains no residual `{...}` placeholders.
    pub fn render(&self, values: &ParameterValues) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { param, flag } => {
                    let value = values.get(param.as_str()).map(|v| v.trim());
                    if let Some(rendered) = render_placeholder(
                        param,
                        *flag,
                        self.flagged.contains(param),
                        value,
                    ) {
                        out.push_str(&rendered);
                    }
                }
            }
        }
        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Parameter names referenced by the template, flag forms included.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder { param, .. } => Some(param.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

fn render_placeholder(
    param: &str,
    is_flag_form: bool,
    has_flag_form: bool,
    value: Option<&str>,
) -> Option<String> {
    let value = value.filter(|v| !v.is_empty())?;

    if is_truthy(value) {
        // The flag form wins; a bare placeholder only renders the flag when
        // the template has no flag form for this parameter.
        if is_flag_form || !has_flag_form {
            return Some(flag_token(param));
        }
        return None;
    }
    if is_falsy(value) {
        return None;
    }

    if is_flag_form {
        Some(flag_with_value(param, value))
    } else {
        Some(value.to_string())
    }
}

fn flag_token(param: &str) -> String {
    format!("--{}", param.replace('_', "-"))
}

fn flag_with_value(param: &str, value: &str) -> String {
    if QUOTED_PARAMS.contains(&param) {
        format!("--{} '{}'", param, value)
    } else if param == "technique" {
        format!("--technique {}", value)
    } else {
        format!("--{} {}", param.replace('_', "-"), value)
    }
}

/// Scan a rendered command for shell metacharacters and known-dangerous
/// fragments. Returns the matched patterns; the caller decides what to do
/// with them (today: log a warning and proceed).
pub fn hazard_scan(command: &str) -> Vec<&'static str> {
    let mut hits = Vec::new();
    for pattern in HAZARD_PATTERNS {
        if command.contains(pattern) && !hits.contains(pattern) {
            // ">" is a prefix of ">>"; report the longest match only.
            if *pattern == ">" && command.contains(">>") {
                continue;
            }
            hits.push(pattern);
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> ParameterValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn renders_nmap_example() {
        let tmpl = CommandTemplate::parse("nmap {scan_type} -p {ports} {timing} {target}").unwrap();
        let rendered = tmpl.render(&values(&[
            ("scan_type", "-sS"),
            ("ports", "1-1000"),
            ("timing", "-T4"),
            ("target", "10.0.0.1"),
        ]));
        assert_eq!(rendered, "nmap -sS -p 1-1000 -T4 10.0.0.1");
    }

    #[test]
    fn renders_sqlmap_example_with_dangling_flags_removed() {
        let tmpl = CommandTemplate::parse(
            "sqlmap -u {target} {data_flag} {cookie_flag} {technique_flag} {batch_flag}",
        )
        .unwrap();
        let rendered = tmpl.render(&values(&[
            ("target", "http://x/a.php?id=1"),
            ("batch", "true"),
        ]));
        assert_eq!(rendered, "sqlmap -u http://x/a.php?id=1 --batch");
    }

    #[test]
    fn empty_values_leave_no_residual_placeholders() {
        let templates = [
            "gobuster {mode} -u {target} -w {wordlist} -x {extensions} -t {threads}",
            "sqlmap -u {target} {data_flag} {cookie_flag} {technique_flag} {batch_flag}",
            "nikto -h {host} -p {port} {ssl_flag}",
            "r2 {analyze_flag} {file}",
        ];
        for raw in templates {
            let tmpl = CommandTemplate::parse(raw).unwrap();
            let rendered = tmpl.render(&ParameterValues::new());
            assert!(!rendered.contains('{'), "residual in: {}", rendered);
            assert!(!rendered.contains('}'), "residual in: {}", rendered);
        }
    }

    #[test]
    fn truthy_tokens_render_identically() {
        let tmpl = CommandTemplate::parse("nikto -h {host} {ssl_flag}").unwrap();
        let expected = tmpl.render(&values(&[("host", "target.com"), ("ssl", "true")]));
        for token in ["TRUE", "Yes", "yes", "1"] {
            let rendered = tmpl.render(&values(&[("host", "target.com"), ("ssl", token)]));
            assert_eq!(rendered, expected, "token {}", token);
        }
        assert_eq!(expected, "nikto -h target.com --ssl");
    }

    #[test]
    fn falsy_tokens_erase_the_flag() {
        let tmpl = CommandTemplate::parse("nikto -h {host} {ssl_flag}").unwrap();
        for token in ["false", "FALSE", "No", "0"] {
            let rendered = tmpl.render(&values(&[("host", "target.com"), ("ssl", token)]));
            assert_eq!(rendered, "nikto -h target.com", "token {}", token);
        }
    }

    #[test]
    fn truthy_on_bare_placeholder_without_flag_form() {
        let tmpl = CommandTemplate::parse("r2 {analyze} {file}").unwrap();
        let rendered = tmpl.render(&values(&[("analyze", "true"), ("file", "a.out")]));
        assert_eq!(rendered, "r2 --analyze a.out");
    }

    #[test]
    fn underscores_become_dashes_in_flag_tokens() {
        let tmpl = CommandTemplate::parse("tool {follow_redirects_flag}").unwrap();
        let rendered = tmpl.render(&values(&[("follow_redirects", "yes")]));
        assert_eq!(rendered, "tool --follow-redirects");
    }

    #[test]
    fn quoted_params_are_single_quoted() {
        let tmpl = CommandTemplate::parse("sqlmap -u {target} {data_flag} {cookie_flag}").unwrap();
        let rendered = tmpl.render(&values(&[
            ("target", "http://x/a.php"),
            ("data", "user=admin&pass=admin"),
            ("cookie", "PHPSESSID=abc"),
        ]));
        assert_eq!(
            rendered,
            "sqlmap -u http://x/a.php --data 'user=admin&pass=admin' --cookie 'PHPSESSID=abc'"
        );
    }

    #[test]
    fn technique_keeps_its_bespoke_spelling() {
        let tmpl = CommandTemplate::parse("sqlmap -u {target} {technique_flag}").unwrap();
        let rendered = tmpl.render(&values(&[("target", "http://x"), ("technique", "BEU")]));
        assert_eq!(rendered, "sqlmap -u http://x --technique BEU");
    }

    #[test]
    fn flag_form_with_plain_value_uses_dashed_flag() {
        let tmpl = CommandTemplate::parse("john {format_flag} {hashfile}").unwrap();
        let rendered = tmpl.render(&values(&[("format", "md5"), ("hashfile", "hashes.txt")]));
        assert_eq!(rendered, "john --format md5 hashes.txt");
    }

    #[test]
    fn rendering_is_idempotent() {
        let tmpl = CommandTemplate::parse("nmap {scan_type} -p {ports} {target}").unwrap();
        let vals = values(&[("scan_type", "-sV"), ("ports", "80,443"), ("target", "x")]);
        let first = tmpl.render(&vals);
        let second = tmpl.render(&vals);
        assert_eq!(first, second);
    }

    #[test]
    fn value_containing_braces_is_not_resubstituted() {
        let tmpl = CommandTemplate::parse("echo {msg} {other}").unwrap();
        let rendered = tmpl.render(&values(&[("msg", "{other}"), ("other", "x")]));
        assert_eq!(rendered, "{other} x");
    }

    #[test]
    fn unterminated_brace_stays_literal() {
        let tmpl = CommandTemplate::parse("awk {print $1").unwrap();
        let rendered = tmpl.render(&ParameterValues::new());
        assert_eq!(rendered, "awk {print $1");
    }

    #[test]
    fn empty_template_is_an_error() {
        assert!(CommandTemplate::parse("").is_err());
        assert!(CommandTemplate::parse("   ").is_err());
    }

    #[test]
    fn params_lists_placeholder_names() {
        let tmpl = CommandTemplate::parse("sqlmap -u {target} {batch_flag}").unwrap();
        let params: Vec<_> = tmpl.params().collect();
        assert_eq!(params, vec!["target", "batch"]);
    }

    #[test]
    fn hazard_scan_reports_metacharacters() {
        let hits = hazard_scan("nmap 10.0.0.1; rm -rf /");
        assert!(hits.contains(&";"));
        assert!(hits.contains(&"rm -rf"));

        assert!(hazard_scan("nmap -sS -p 1-1000 10.0.0.1").is_empty());
    }

    #[test]
    fn hazard_scan_prefers_longest_redirection() {
        let hits = hazard_scan("tool >> out.txt");
        assert!(hits.contains(&">>"));
        assert!(!hits.contains(&">"));
    }
}
