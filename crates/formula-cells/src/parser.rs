//! Cell-definition parsing.
//!
//! A definition is either an integer literal (`"42"`, `"-7"`, `"+3"`) or an additive formula
//! over other cells (`"=A1+A2+B7"`). Whitespace around the whole definition and around each
//! operand is ignored; empty operands (`"=A1++A2"`) are dropped.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The parsed shape of a cell definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Literal(i64),
    /// Operand names in formula order. Duplicates are kept (`=A+A` is `2 * A`).
    Formula(Vec<String>),
}

impl CellKind {
    #[must_use]
    pub fn is_formula(&self) -> bool {
        matches!(self, Self::Formula(_))
    }

    /// Operands of a formula; empty for literals.
    #[must_use]
    pub fn operands(&self) -> &[String] {
        match self {
            Self::Literal(_) => &[],
            Self::Formula(ops) => ops,
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Formula(ops) => {
                f.write_str("=")?;
                for (idx, op) in ops.iter().enumerate() {
                    if idx > 0 {
                        f.write_str("+")?;
                    }
                    f.write_str(op)?;
                }
                Ok(())
            }
        }
    }
}

/// Returns `true` if `name` can be used as a cell name.
///
/// Names are non-empty, contain no whitespace, `=` or `+`, and are not themselves integer
/// literals (so `"=1+A"` is rejected rather than silently creating a cell called `1`).
#[must_use]
pub fn is_valid_cell_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c == '=' || c == '+')
        && name.parse::<i64>().is_err()
}

/// Parse a definition string, allowing at most `max_operands` operands in a formula.
pub fn parse_definition(input: &str, max_operands: usize) -> Result<CellKind, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }

    let Some(body) = input.strip_prefix('=') else {
        return input
            .parse::<i64>()
            .map(CellKind::Literal)
            .map_err(|_| ParseError::InvalidLiteral(input.to_string()));
    };

    let mut operands = Vec::new();
    for token in body.split('+').map(str::trim).filter(|t| !t.is_empty()) {
        if !is_valid_cell_name(token) {
            return Err(ParseError::InvalidOperand(token.to_string()));
        }
        operands.push(token.to_string());
    }

    if operands.is_empty() {
        return Err(ParseError::EmptyFormula);
    }
    if operands.len() > max_operands {
        return Err(ParseError::TooManyOperands {
            count: operands.len(),
            max: max_operands,
        });
    }
    Ok(CellKind::Formula(operands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MAX: usize = 255;

    fn formula(ops: &[&str]) -> CellKind {
        CellKind::Formula(ops.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn parses_signed_literals() {
        assert_eq!(parse_definition("123", MAX), Ok(CellKind::Literal(123)));
        assert_eq!(parse_definition("-7", MAX), Ok(CellKind::Literal(-7)));
        assert_eq!(parse_definition("+3", MAX), Ok(CellKind::Literal(3)));
        assert_eq!(parse_definition("  42 ", MAX), Ok(CellKind::Literal(42)));
    }

    #[test]
    fn parses_formula_preserving_order_and_duplicates() {
        assert_eq!(
            parse_definition("=B2+A1+B2", MAX),
            Ok(formula(&["B2", "A1", "B2"]))
        );
    }

    #[test]
    fn trims_operands_and_drops_empty_tokens() {
        assert_eq!(
            parse_definition("= A1 ++ A2 +", MAX),
            Ok(formula(&["A1", "A2"]))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_definition("", MAX), Err(ParseError::Empty));
        assert_eq!(parse_definition("   ", MAX), Err(ParseError::Empty));
        assert_eq!(
            parse_definition("12abc", MAX),
            Err(ParseError::InvalidLiteral("12abc".to_string()))
        );
        assert_eq!(
            parse_definition("A1+A2", MAX),
            Err(ParseError::InvalidLiteral("A1+A2".to_string()))
        );
        assert_eq!(parse_definition("=", MAX), Err(ParseError::EmptyFormula));
        assert_eq!(parse_definition("=+ +", MAX), Err(ParseError::EmptyFormula));
    }

    #[test]
    fn rejects_bad_operands() {
        assert_eq!(
            parse_definition("=A1+5", MAX),
            Err(ParseError::InvalidOperand("5".to_string()))
        );
        assert_eq!(
            parse_definition("=A 1", MAX),
            Err(ParseError::InvalidOperand("A 1".to_string()))
        );
        assert_eq!(
            parse_definition("=A1+=B1", MAX),
            Err(ParseError::InvalidOperand("=B1".to_string()))
        );
    }

    #[test]
    fn enforces_operand_limit() {
        assert_eq!(
            parse_definition("=A+B+C", 2),
            Err(ParseError::TooManyOperands { count: 3, max: 2 })
        );
        assert!(parse_definition("=A+B", 2).is_ok());
    }

    #[test]
    fn display_round_trips() {
        for text in ["17", "-4", "=A1", "=A1+B2+A1"] {
            let kind = parse_definition(text, MAX).unwrap();
            assert_eq!(kind.to_string(), text);
            assert_eq!(parse_definition(&kind.to_string(), MAX), Ok(kind));
        }
    }

    #[test]
    fn cell_names() {
        assert!(is_valid_cell_name("A1"));
        assert!(is_valid_cell_name("total_2024"));
        assert!(!is_valid_cell_name(""));
        assert!(!is_valid_cell_name("A 1"));
        assert!(!is_valid_cell_name("A+B"));
        assert!(!is_valid_cell_name("=A"));
        assert!(!is_valid_cell_name("-12"));
    }
}
