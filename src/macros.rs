//! Utility macros for the front end.
//!
//! This module defines helper macros used by the expression parser:
//!
//! - `prec_row!` - Builds one row of the precedence table
//!
//! These macros keep the table in `parser::psa` readable as a grid.

/// Builds one `[Action; 18]` precedence-table row from action symbols.
///
/// Symbols: `<` shift, `>` reduce, `=` bracket match, `_` error (blank cell).
///
/// # Example
///
/// ```ignore
/// let row = prec_row![< > > < < < _ > > > > > > < > < _ >];
/// ```
#[macro_export]
macro_rules! prec_row {
    (@action <) => {
        $crate::parser::psa::Action::Shift
    };
    (@action >) => {
        $crate::parser::psa::Action::Reduce
    };
    (@action =) => {
        $crate::parser::psa::Action::Equal
    };
    (@action _) => {
        $crate::parser::psa::Action::Blank
    };
    ($($symbol:tt)*) => {
        [$($crate::prec_row!(@action $symbol)),*]
    };
}
