//! Route pattern compilation.
//!
//! Turns `{variable}` placeholders in path and host patterns into named
//! capture groups of a `regex` pattern. Trailing path variables that have a
//! default value become optional, so `/hello/{name}` with a default for
//! `name` matches both `/hello` and `/hello/joe`.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::route::RouteError;
use crate::value::Value;

/// Placeholder syntax inside a pattern.
static VARIABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("invalid variable regex"));

/// Characters that may separate a variable from the preceding text.
const SEPARATORS: &str = "/,;.:-_~+*=@|";

/// Longest accepted variable name.
const VARIABLE_MAX_LENGTH: usize = 32;

#[derive(Debug)]
enum Token {
    Text(String),
    Variable {
        prefix: String,
        regex: String,
        name: String,
    },
}

/// Pattern compiled into a matcher.
#[derive(Debug, Clone)]
struct CompiledPattern {
    regex: String,
    matcher: Regex,
    variables: Vec<String>,
}

/// A route compiled into `regex` matchers.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    static_prefix: String,
    path: CompiledPattern,
    host: Option<CompiledPattern>,
}

impl CompiledRoute {
    /// Leading literal part of the path, up to the first variable.
    #[must_use]
    pub fn static_prefix(&self) -> &str {
        &self.static_prefix
    }

    /// Path pattern source.
    #[must_use]
    pub fn path_regex(&self) -> &str {
        &self.path.regex
    }

    /// Host pattern source, when the route is bound to a host.
    #[must_use]
    pub fn host_regex(&self) -> Option<&str> {
        self.host.as_ref().map(|host| host.regex.as_str())
    }

    /// Variable names of the path, in pattern order.
    #[must_use]
    pub fn path_variables(&self) -> &[String] {
        &self.path.variables
    }

    /// Variable names of the host, in pattern order.
    #[must_use]
    pub fn host_variables(&self) -> &[String] {
        self.host
            .as_ref()
            .map(|host| host.variables.as_slice())
            .unwrap_or_default()
    }

    /// Match a request path, returning the captured variables.
    ///
    /// Optional variables that were not present in `path` are omitted.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Vec<(String, String)>> {
        let captures = self.path.matcher.captures(path)?;
        Some(
            self.path
                .variables
                .iter()
                .filter_map(|name| {
                    captures
                        .name(name)
                        .map(|m| (name.clone(), m.as_str().to_owned()))
                })
                .collect(),
        )
    }

    /// Whether `host` is accepted. Routes without a host accept any host.
    #[must_use]
    pub fn matches_host(&self, host: &str) -> bool {
        self.host
            .as_ref()
            .is_none_or(|pattern| pattern.matcher.is_match(host))
    }
}

/// Compiles route patterns using the route's requirements and defaults.
pub struct RouteCompiler<'a> {
    requirements: &'a [(String, String)],
    defaults: &'a [(String, Value)],
}

impl<'a> RouteCompiler<'a> {
    /// Create a compiler over a route's requirements and defaults.
    #[must_use]
    pub fn new(requirements: &'a [(String, String)], defaults: &'a [(String, Value)]) -> Self {
        Self {
            requirements,
            defaults,
        }
    }

    /// Compile a path pattern and an optional host pattern.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate or malformed variable names, or when a
    /// requirement does not produce a valid regex.
    pub fn compile(&self, path: &str, host: Option<&str>) -> Result<CompiledRoute, RouteError> {
        let path_tokens = self.tokenize(path, '/')?;
        let static_prefix = match path_tokens.first() {
            Some(Token::Text(text)) => text.clone(),
            _ => String::new(),
        };
        let path = self.build(path, &path_tokens, false)?;

        let host = match host {
            Some(host) if !host.is_empty() => {
                let host_tokens = self.tokenize(host, '.')?;
                Some(self.build(host, &host_tokens, true)?)
            }
            _ => None,
        };

        Ok(CompiledRoute {
            static_prefix,
            path,
            host,
        })
    }

    fn requirement(&self, name: &str) -> Option<&str> {
        self.requirements
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, pattern)| pattern.as_str())
    }

    fn has_default(&self, name: &str) -> bool {
        self.defaults.iter().any(|(key, _)| key == name)
    }

    fn tokenize(&self, pattern: &str, default_separator: char) -> Result<Vec<Token>, RouteError> {
        let mut tokens = Vec::new();
        let mut names: Vec<String> = Vec::new();
        let mut pos = 0;

        for captures in VARIABLE_PATTERN.captures_iter(pattern) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let name = name.as_str();
            check_variable_name(name, pattern, &names)?;

            let preceding = &pattern[pos..whole.start()];
            pos = whole.end();

            let separator = preceding.chars().last().filter(|c| SEPARATORS.contains(*c));
            let prefix = match separator {
                Some(c) => {
                    let text = &preceding[..preceding.len() - c.len_utf8()];
                    if !text.is_empty() {
                        tokens.push(Token::Text(text.to_owned()));
                    }
                    c.to_string()
                }
                None => {
                    if !preceding.is_empty() {
                        tokens.push(Token::Text(preceding.to_owned()));
                    }
                    String::new()
                }
            };

            let regex = match self.requirement(name) {
                Some(requirement) => requirement.to_owned(),
                None => default_requirement(&pattern[pos..], default_separator),
            };

            tokens.push(Token::Variable {
                prefix,
                regex,
                name: name.to_owned(),
            });
            names.push(name.to_owned());
        }

        if pos < pattern.len() {
            tokens.push(Token::Text(pattern[pos..].to_owned()));
        }

        Ok(tokens)
    }

    fn build(
        &self,
        pattern: &str,
        tokens: &[Token],
        is_host: bool,
    ) -> Result<CompiledPattern, RouteError> {
        // Hosts have no optional parts.
        let first_optional = if is_host {
            usize::MAX
        } else {
            self.first_optional(tokens)
        };

        let mut source = String::from(if is_host { "(?i)^" } else { "^" });
        for (index, token) in tokens.iter().enumerate() {
            match token {
                Token::Text(text) => source.push_str(&regex::escape(text)),
                Token::Variable {
                    prefix,
                    regex: requirement,
                    name,
                } => {
                    let prefix = regex::escape(prefix);
                    if index == 0 && first_optional == 0 {
                        write!(source, "{prefix}(?P<{name}>{requirement})?").unwrap();
                        continue;
                    }
                    if index >= first_optional {
                        source.push_str("(?:");
                    }
                    write!(source, "{prefix}(?P<{name}>{requirement})").unwrap();
                    if index >= first_optional && index == tokens.len() - 1 {
                        let open = tokens.len() - first_optional - usize::from(first_optional == 0);
                        source.push_str(&")?".repeat(open));
                    }
                }
            }
        }
        source.push('$');

        let matcher = Regex::new(&source).map_err(|source| RouteError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        let variables = tokens
            .iter()
            .filter_map(|token| match token {
                Token::Variable { name, .. } => Some(name.clone()),
                Token::Text(_) => None,
            })
            .collect();

        Ok(CompiledPattern {
            regex: source,
            matcher,
            variables,
        })
    }

    /// Index of the first token of the trailing run of defaulted variables.
    fn first_optional(&self, tokens: &[Token]) -> usize {
        let mut first_optional = usize::MAX;
        for (index, token) in tokens.iter().enumerate().rev() {
            match token {
                Token::Variable { name, .. } if self.has_default(name) => first_optional = index,
                _ => break,
            }
        }
        first_optional
    }
}

fn check_variable_name(name: &str, pattern: &str, seen: &[String]) -> Result<(), RouteError> {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(RouteError::InvalidVariableName {
            name: name.to_owned(),
            pattern: pattern.to_owned(),
        });
    }
    if name.len() > VARIABLE_MAX_LENGTH {
        return Err(RouteError::VariableNameTooLong {
            name: name.to_owned(),
            pattern: pattern.to_owned(),
            max: VARIABLE_MAX_LENGTH,
        });
    }
    if seen.iter().any(|existing| existing == name) {
        return Err(RouteError::DuplicateVariable {
            name: name.to_owned(),
            pattern: pattern.to_owned(),
        });
    }
    Ok(())
}

/// Requirement for a variable without a custom one: anything up to the next
/// separator.
fn default_requirement(following: &str, default_separator: char) -> String {
    let following = VARIABLE_PATTERN.replace_all(following, "");
    let default = regex::escape(&default_separator.to_string());
    match following
        .chars()
        .next()
        .filter(|c| *c != default_separator && SEPARATORS.contains(*c))
    {
        Some(next) => format!("[^{default}{}]+", regex::escape(&next.to_string())),
        None => format!("[^{default}]+"),
    }
}
