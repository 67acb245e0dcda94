/// Nesting depth allowed by [`ParserOptions::default`]; deep enough for real
/// documents and shallow enough for a 2 MiB thread stack.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Configuration options for the grammar engine.
///
/// # Examples
///
/// ```rust
/// use rdpjson::{ParserOptions, parse_str};
///
/// let strict = ParserOptions {
///     reject_trailing_commas: true,
///     ..Default::default()
/// };
/// assert!(parse_str("[1,]", ParserOptions::default()).is_ok());
/// assert!(parse_str("[1,]", strict).is_err());
/// ```
///
/// # Default
///
/// Trailing commas are accepted and nesting is capped at
/// [`DEFAULT_MAX_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Whether to reject a comma directly before `}` or `]`.
    ///
    /// The grammar's tail productions (`PairsTail ::= "," Pairs | φ`, and the
    /// same for elements) accept a dangling comma because `Pairs` and
    /// `Elements` may match nothing. With this enabled, a comma must be
    /// followed by another pair or element.
    ///
    /// ```json
    /// {"a": 1,}
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub reject_trailing_commas: bool,

    /// Maximum nesting depth of objects and arrays.
    ///
    /// Each level of nesting costs a few stack frames in the engine. `None`
    /// removes the bound, leaving the caller's stack as the only limit.
    ///
    /// # Default
    ///
    /// `Some(DEFAULT_MAX_DEPTH)`
    pub max_depth: Option<usize>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            reject_trailing_commas: false,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}
