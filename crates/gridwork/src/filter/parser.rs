//! Range-filter expression parser.
//!
//! Grammar, loosely:
//!
//! ```text
//! expression := clause (';' clause)*          OR
//! clause     := member (',' member)*          AND
//! member     := word* operator word* number word*
//!             | word* number word* operator word*
//! operator   := '>=' | '<=' | '>' | '<'
//! number     := [+-]? digit+ ('.' digit+)?
//! ```
//!
//! Words (`value`, `x`, ...) are placeholders and carry no meaning; they only
//! let users write `value > 5` or `5 < value`. Whether the number sits left or
//! right of the operator decides which bound the member constrains.

use std::iter::Peekable;
use std::str::CharIndices;
use std::str::FromStr;

use gridwork_core::{ParseError, ParseErrorKind};

use super::band::{NumericFilterBand, NumericFilterMask};

const OR_SEPARATOR: char = ';';
const AND_SEPARATOR: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Operator(Comparison),
    Number(f64),
    Word,
}

#[derive(Debug, Clone, Copy)]
struct Lexeme {
    token: Token,
    offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Side {
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bound {
    value: f64,
    strict: bool,
}

/// Parses a range-filter expression such as `>=0,<9;>100` into a mask.
///
/// Blank input yields [`NumericFilterMask::open`]. Any malformed member fails
/// with a [`ParseError`] whose message is `Invalid input`.
///
/// # Example
///
/// ```
/// use gridwork::filter::parse_filter;
///
/// let mask = parse_filter(">=0,<9;>100").unwrap();
/// assert_eq!(mask.bands.len(), 2);
/// assert!(mask.matches(0.0));
/// assert!(!mask.matches(50.0));
/// assert!(parse_filter("<").is_err());
/// ```
pub fn parse_filter(text: &str) -> Result<NumericFilterMask, ParseError> {
    if text.trim().is_empty() {
        return Ok(NumericFilterMask::open());
    }

    split_with_offsets(text, OR_SEPARATOR)
        .map(|(offset, clause)| parse_clause(clause, offset))
        .collect::<Result<Vec<_>, _>>()
        .map(NumericFilterMask::new)
}

impl FromStr for NumericFilterMask {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_filter(s)
    }
}

fn split_with_offsets(text: &str, separator: char) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split(separator).map(move |part| {
        let start = offset;
        offset += part.len() + separator.len_utf8();
        (start, part)
    })
}

fn parse_clause(clause: &str, base: usize) -> Result<NumericFilterBand, ParseError> {
    let mut lower: Option<Bound> = None;
    let mut upper: Option<Bound> = None;

    for (offset, member) in split_with_offsets(clause, AND_SEPARATOR) {
        let (side, bound) = parse_member(member, base + offset)?;
        match side {
            Side::Lower => lower = Some(tighter_lower(lower, bound)),
            Side::Upper => upper = Some(tighter_upper(upper, bound)),
        }
    }

    let mut band = NumericFilterBand::open();
    if let Some(bound) = lower {
        band = band.with_lower(bound.value, bound.strict);
    }
    if let Some(bound) = upper {
        band = band.with_upper(bound.value, bound.strict);
    }
    Ok(band)
}

/// Larger lower bound wins; at equal values the strict one is tighter.
fn tighter_lower(current: Option<Bound>, candidate: Bound) -> Bound {
    match current {
        Some(current)
            if current.value > candidate.value
                || (current.value == candidate.value && current.strict) =>
        {
            current
        }
        _ => candidate,
    }
}

/// Smaller upper bound wins; at equal values the strict one is tighter.
fn tighter_upper(current: Option<Bound>, candidate: Bound) -> Bound {
    match current {
        Some(current)
            if current.value < candidate.value
                || (current.value == candidate.value && current.strict) =>
        {
            current
        }
        _ => candidate,
    }
}

fn parse_member(member: &str, base: usize) -> Result<(Side, Bound), ParseError> {
    let lexemes = tokenize(member, base)?;

    let mut operators = lexemes.iter().filter_map(|lexeme| match lexeme.token {
        Token::Operator(op) => Some((op, lexeme.offset)),
        _ => None,
    });
    let mut operands = lexemes.iter().filter_map(|lexeme| match lexeme.token {
        Token::Number(value) => Some((value, lexeme.offset)),
        _ => None,
    });

    let Some((comparison, operator_offset)) = operators.next() else {
        return Err(ParseError::new(ParseErrorKind::MissingOperator, base));
    };
    let Some((value, operand_offset)) = operands.next() else {
        return Err(ParseError::new(ParseErrorKind::MissingOperand, base));
    };
    if let Some((_, offset)) = operators.next() {
        return Err(ParseError::new(ParseErrorKind::MultipleOperators, offset));
    }
    if let Some((_, offset)) = operands.next() {
        return Err(ParseError::new(ParseErrorKind::MultipleOperands, offset));
    }

    // `5 < x` reads as `x > 5`.
    let operand_first = operand_offset < operator_offset;
    let (side, strict) = match (comparison, operand_first) {
        (Comparison::Greater, false) | (Comparison::Less, true) => (Side::Lower, true),
        (Comparison::GreaterOrEqual, false) | (Comparison::LessOrEqual, true) => {
            (Side::Lower, false)
        }
        (Comparison::Less, false) | (Comparison::Greater, true) => (Side::Upper, true),
        (Comparison::LessOrEqual, false) | (Comparison::GreaterOrEqual, true) => {
            (Side::Upper, false)
        }
    };

    Ok((side, Bound { value, strict }))
}

fn tokenize(member: &str, base: usize) -> Result<Vec<Lexeme>, ParseError> {
    let mut lexemes = Vec::new();
    let mut chars = member.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '>' | '<' => {
                chars.next();
                let or_equal = chars.next_if(|&(_, next)| next == '=').is_some();
                Token::Operator(match (c, or_equal) {
                    ('>', true) => Comparison::GreaterOrEqual,
                    ('>', false) => Comparison::Greater,
                    (_, true) => Comparison::LessOrEqual,
                    (_, false) => Comparison::Less,
                })
            }
            '+' | '-' | '0'..='9' => Token::Number(scan_number(member, &mut chars, base)?),
            c if c.is_alphabetic() || c == '_' => {
                while chars
                    .next_if(|&(_, next)| next.is_alphanumeric() || next == '_')
                    .is_some()
                {}
                Token::Word
            }
            other => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedCharacter(other),
                    base + offset,
                ));
            }
        };
        lexemes.push(Lexeme {
            token,
            offset: base + offset,
        });
    }

    Ok(lexemes)
}

fn scan_number(
    member: &str,
    chars: &mut Peekable<CharIndices<'_>>,
    base: usize,
) -> Result<f64, ParseError> {
    let Some((start, first)) = chars.next() else {
        return Err(ParseError::new(ParseErrorKind::MissingOperand, base));
    };
    let unexpected = |c: char, at: usize| {
        Err(ParseError::new(ParseErrorKind::UnexpectedCharacter(c), base + at))
    };

    let mut end = start + first.len_utf8();
    let mut digits = usize::from(first.is_ascii_digit());
    while let Some((at, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
        end = at + c.len_utf8();
        digits += 1;
    }
    if digits == 0 {
        // A sign with no digits after it.
        return unexpected(first, start);
    }

    if let Some((dot, _)) = chars.next_if(|&(_, c)| c == '.') {
        let mut fraction = 0;
        while let Some((at, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
            end = at + c.len_utf8();
            fraction += 1;
        }
        if fraction == 0 {
            return unexpected('.', dot);
        }
    }

    member[start..end]
        .parse::<f64>()
        .or_else(|_| unexpected(first, start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> NumericFilterBand {
        let mask = parse_filter(text).unwrap();
        assert_eq!(mask.bands.len(), 1, "{text}");
        mask.bands[0]
    }

    fn error_kind(text: &str) -> ParseErrorKind {
        parse_filter(text).unwrap_err().kind()
    }

    #[test]
    fn test_single_strict_expression() {
        assert_eq!(
            parse_filter("<9").unwrap(),
            NumericFilterMask::new(vec![NumericFilterBand {
                lower: None,
                upper: Some(9.0),
                strict_lower: true,
                strict_upper: true,
            }])
        );
    }

    #[test]
    fn test_single_inclusive_expression() {
        assert_eq!(
            parse_filter(">=0").unwrap(),
            NumericFilterMask::new(vec![NumericFilterBand {
                lower: Some(0.0),
                upper: None,
                strict_lower: false,
                strict_upper: true,
            }])
        );
    }

    #[test]
    fn test_and_combines_into_one_band() {
        assert_eq!(
            parse_filter(">=0,<9").unwrap(),
            NumericFilterMask::new(vec![NumericFilterBand {
                lower: Some(0.0),
                upper: Some(9.0),
                strict_lower: false,
                strict_upper: true,
            }])
        );
    }

    #[test]
    fn test_or_produces_separate_bands() {
        assert_eq!(
            parse_filter(">=0;<9").unwrap(),
            NumericFilterMask::new(vec![
                NumericFilterBand::open().with_lower(0.0, false),
                NumericFilterBand::open().with_upper(9.0, true),
            ])
        );
    }

    #[test]
    fn test_blank_input_is_open_mask() {
        assert_eq!(parse_filter("").unwrap(), NumericFilterMask::open());
        assert_eq!(parse_filter("  \t").unwrap(), NumericFilterMask::open());
    }

    #[test]
    fn test_operator_without_operand_is_invalid() {
        let err = parse_filter("<").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input");
        assert_eq!(err.kind(), ParseErrorKind::MissingOperand);
    }

    #[test]
    fn test_operand_without_operator_is_invalid() {
        assert_eq!(error_kind("5"), ParseErrorKind::MissingOperator);
        assert_eq!(error_kind("value"), ParseErrorKind::MissingOperator);
    }

    #[test]
    fn test_empty_clause_is_invalid() {
        let err = parse_filter(">5;").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::MissingOperator);
        assert_eq!(err.offset(), 3);
        assert_eq!(error_kind(">5,,<9"), ParseErrorKind::MissingOperator);
    }

    #[test]
    fn test_ambiguous_members_are_invalid() {
        assert_eq!(error_kind("<5>3"), ParseErrorKind::MultipleOperators);
        assert_eq!(error_kind("< 5 6"), ParseErrorKind::MultipleOperands);
        assert_eq!(error_kind("5-3<"), ParseErrorKind::MultipleOperands);
    }

    #[test]
    fn test_unexpected_characters_are_invalid() {
        assert_eq!(error_kind("<#5"), ParseErrorKind::UnexpectedCharacter('#'));
        assert_eq!(error_kind("> =1"), ParseErrorKind::UnexpectedCharacter('='));
        assert_eq!(error_kind(">5."), ParseErrorKind::UnexpectedCharacter('.'));
        assert_eq!(error_kind("> -"), ParseErrorKind::UnexpectedCharacter('-'));
        let err = parse_filter(">1;<#5").unwrap_err();
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn test_operand_position_selects_bound() {
        assert_eq!(single("value > 5"), NumericFilterBand::open().with_lower(5.0, true));
        assert_eq!(single("5 < value"), NumericFilterBand::open().with_lower(5.0, true));
        assert_eq!(single("5 > value"), NumericFilterBand::open().with_upper(5.0, true));
        assert_eq!(single("5 >= x"), NumericFilterBand::open().with_upper(5.0, false));
        assert_eq!(single("5 <= x"), NumericFilterBand::open().with_lower(5.0, false));
    }

    #[test]
    fn test_signed_and_decimal_operands() {
        assert_eq!(single("> -2.5"), NumericFilterBand::open().with_lower(-2.5, true));
        assert_eq!(single("x>-5"), NumericFilterBand::open().with_lower(-5.0, true));
        assert_eq!(single("<=+10.25"), NumericFilterBand::open().with_upper(10.25, false));
    }

    #[test]
    fn test_operand_resembling_operator_prefix() {
        // The operand's leading sign must not be mistaken for part of an operator.
        assert_eq!(single(">=-1"), NumericFilterBand::open().with_lower(-1.0, false));
        assert_eq!(single("-1<=x"), NumericFilterBand::open().with_lower(-1.0, false));
    }

    #[test]
    fn test_same_side_keeps_tightest_bound() {
        assert_eq!(single(">1,>5"), NumericFilterBand::open().with_lower(5.0, true));
        assert_eq!(single(">5,>1"), NumericFilterBand::open().with_lower(5.0, true));
        assert_eq!(single("<10,<3"), NumericFilterBand::open().with_upper(3.0, true));
        assert_eq!(single("<=3,<10"), NumericFilterBand::open().with_upper(3.0, false));
    }

    // Strictness follows whichever bound is kept on that side; a `>=` elsewhere
    // in the clause never loosens it, so `>=1,>5` stays strict at 5.
    #[test]
    fn test_equal_bounds_prefer_strict() {
        assert_eq!(single(">=1,>5"), NumericFilterBand::open().with_lower(5.0, true));
        assert_eq!(single(">=5,>5"), NumericFilterBand::open().with_lower(5.0, true));
        assert_eq!(single(">5,>=5"), NumericFilterBand::open().with_lower(5.0, true));
        assert_eq!(single("<10,<=10"), NumericFilterBand::open().with_upper(10.0, true));
    }

    #[test]
    fn test_mask_from_str() {
        let mask: NumericFilterMask = ">0,<=100".parse().unwrap();
        assert!(mask.matches(100.0));
        assert!(!mask.matches(0.0));
        assert!("<>".parse::<NumericFilterMask>().is_err());
    }
}
