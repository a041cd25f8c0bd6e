//! Compilation options
//!
//! [`Options`] carries the syntax flags applied to every fragment and the
//! resource limits handed to the regular-expression engine.

/// Default nesting limit for fragment syntax trees
pub const DEFAULT_NEST_LIMIT: u32 = 250;

/// Default size limit for the compiled program (10 MB)
pub const DEFAULT_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Default size limit for the lazy DFA cache (2 MB)
pub const DEFAULT_DFA_SIZE_LIMIT: usize = 2 * (1 << 20);

/// Options controlling how a schema is compiled
///
/// Use [`Options::default()`] for the engine's defaults, or chain the
/// `with_*` methods.
///
/// # Example
///
/// ```rust
/// use restructure::Options;
///
/// let options = Options::new()
///     .with_case_insensitive(true)
///     .with_multi_line(true);
/// assert!(options.case_insensitive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Options {
    /// Match letters regardless of case (`i` flag)
    pub case_insensitive: bool,

    /// `^` and `$` match at line boundaries (`m` flag)
    pub multi_line: bool,

    /// `.` also matches `\n` (`s` flag)
    pub dot_matches_new_line: bool,

    /// Swap the meaning of greedy and lazy repetition (`U` flag)
    pub swap_greed: bool,

    /// Ignore whitespace and allow `#` comments in fragments (`x` flag)
    pub ignore_whitespace: bool,

    /// Enable Unicode-aware classes and case folding
    pub unicode: bool,

    /// Interpret `\0NNN` as octal escapes
    pub octal: bool,

    /// Maximum nesting depth of a fragment's syntax tree
    pub nest_limit: u32,

    /// Approximate size limit of the compiled program, in bytes
    pub size_limit: usize,

    /// Approximate size limit of the lazy DFA cache, in bytes
    pub dfa_size_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            swap_greed: false,
            ignore_whitespace: false,
            unicode: true,
            octal: false,
            nest_limit: DEFAULT_NEST_LIMIT,
            size_limit: DEFAULT_SIZE_LIMIT,
            dfa_size_limit: DEFAULT_DFA_SIZE_LIMIT,
        }
    }
}

impl Options {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set case-insensitive matching
    pub fn with_case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// Set multi-line anchors
    pub fn with_multi_line(mut self, yes: bool) -> Self {
        self.multi_line = yes;
        self
    }

    /// Let `.` match newlines
    pub fn with_dot_matches_new_line(mut self, yes: bool) -> Self {
        self.dot_matches_new_line = yes;
        self
    }

    /// Swap greedy and lazy repetition
    pub fn with_swap_greed(mut self, yes: bool) -> Self {
        self.swap_greed = yes;
        self
    }

    /// Ignore whitespace in fragments
    pub fn with_ignore_whitespace(mut self, yes: bool) -> Self {
        self.ignore_whitespace = yes;
        self
    }

    /// Toggle Unicode mode
    pub fn with_unicode(mut self, yes: bool) -> Self {
        self.unicode = yes;
        self
    }

    /// Toggle octal escapes
    pub fn with_octal(mut self, yes: bool) -> Self {
        self.octal = yes;
        self
    }

    /// Set the fragment nesting limit
    pub fn with_nest_limit(mut self, limit: u32) -> Self {
        self.nest_limit = limit;
        self
    }

    /// Set the compiled program size limit
    pub fn with_size_limit(mut self, bytes: usize) -> Self {
        self.size_limit = bytes;
        self
    }

    /// Set the lazy DFA cache size limit
    pub fn with_dfa_size_limit(mut self, bytes: usize) -> Self {
        self.dfa_size_limit = bytes;
        self
    }

    /// Build a fragment syntax parser configured with these options
    pub(crate) fn ast_parser(&self) -> regex_syntax::ast::parse::Parser {
        regex_syntax::ast::parse::ParserBuilder::new()
            .ignore_whitespace(self.ignore_whitespace)
            .nest_limit(self.nest_limit)
            .octal(self.octal)
            .build()
    }

    /// Build a full (AST + translation) parser configured with these options
    pub(crate) fn hir_parser(&self) -> regex_syntax::Parser {
        regex_syntax::ParserBuilder::new()
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .swap_greed(self.swap_greed)
            .ignore_whitespace(self.ignore_whitespace)
            .unicode(self.unicode)
            .octal(self.octal)
            .nest_limit(self.nest_limit)
            .build()
    }

    /// Build an engine regex from rendered pattern text
    pub(crate) fn build_regex(&self, pattern: &str) -> Result<regex::Regex, regex::Error> {
        regex::RegexBuilder::new(pattern)
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .swap_greed(self.swap_greed)
            .ignore_whitespace(self.ignore_whitespace)
            .unicode(self.unicode)
            .octal(self.octal)
            .nest_limit(self.nest_limit)
            .size_limit(self.size_limit)
            .dfa_size_limit(self.dfa_size_limit)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let options = Options::default();
        assert!(!options.case_insensitive);
        assert!(options.unicode);
        assert_eq!(options.nest_limit, DEFAULT_NEST_LIMIT);
        assert_eq!(options.size_limit, DEFAULT_SIZE_LIMIT);
    }

    #[test]
    fn test_options_builder() {
        let options = Options::new()
            .with_case_insensitive(true)
            .with_dot_matches_new_line(true)
            .with_size_limit(1024);

        assert!(options.case_insensitive);
        assert!(options.dot_matches_new_line);
        assert_eq!(options.size_limit, 1024);
        assert_ne!(options, Options::default());
    }

    #[test]
    fn test_build_regex_honors_flags() {
        let re = Options::new()
            .with_case_insensitive(true)
            .build_regex("abc")
            .unwrap();
        assert!(re.is_match("ABC"));
    }
}
