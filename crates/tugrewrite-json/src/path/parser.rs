// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Path expression grammar.
//!
//! ```text
//! <path>       := "$"? ".." <target> <step>*        ancestor scan
//!               | "$" <step>*                        rooted
//!               | "." | <name>? <step>*              relative to the cursor
//! <step>       := ".." <target> | "." <dot-target> | <bracket>
//! <target>     := <dot-target> | <bracket>
//! <dot-target> := "*" | <name>
//! <bracket>    := "[" ( "*" | "?(" <filter> ")" | <int>? ":" <int>?
//!                     | <int> ("," <int>)* | <quoted> ("," <quoted>)* ) "]"
//! <filter>     := <and> ("||" <and>)*
//! <and>        := <pred> ("&&" <pred>)*
//! <pred>       := "(" <filter> ")" | <operand> (("==" | "!=") <literal> | "=~" <regex>)?
//! <operand>    := ("@" | "$") <step>*
//! <regex>      := "/" pattern "/" flags | <quoted>
//! ```

use regex::{Regex, RegexBuilder};
use winnow::ascii::{dec_int, float, multispace0};
use winnow::combinator::{alt, cut_err, delimited, eof, opt, preceded, repeat, separated};
use winnow::error::{ErrMode, ParserError};
use winnow::prelude::*;
use winnow::token::{any, none_of, take_while};
use winnow::ModalResult;

use super::ast::{Anchor, CompareOp, FilterExpr, Operand, PathExpr, Step};
use super::PathError;
use crate::tree::LiteralValue;

/// Parse a path expression.
pub(crate) fn parse_path(input: &str) -> Result<PathExpr, PathError> {
    let expression = input.trim();
    if expression.is_empty() {
        return Err(PathError::InvalidExpression {
            input: input.to_string(),
            message: "empty expression".to_string(),
        });
    }

    path_expr.parse(expression).map_err(|error| {
        let regex_error = error
            .inner()
            .cause()
            .and_then(|cause| cause.downcast_ref::<regex::Error>());
        match regex_error {
            Some(regex_error) => PathError::InvalidRegex {
                input: input.to_string(),
                message: regex_error.to_string(),
            },
            None => PathError::InvalidExpression {
                input: input.to_string(),
                message: error.to_string(),
            },
        }
    })
}

// ============================================================================
// Parser implementation using winnow
// ============================================================================

fn path_expr(input: &mut &str) -> ModalResult<PathExpr> {
    let rooted = opt('$').parse_next(input)?.is_some();

    if opt("..").parse_next(input)?.is_some() {
        let mut steps = vec![target(input)?];
        steps.extend(steps0(input)?);
        return Ok(PathExpr {
            anchor: Anchor::AncestorScan,
            steps,
        });
    }

    if rooted {
        return Ok(PathExpr {
            anchor: Anchor::Root,
            steps: steps0(input)?,
        });
    }

    // A bare "." is the cursor's own value.
    if opt(('.', eof)).parse_next(input)?.is_some() {
        return Ok(PathExpr {
            anchor: Anchor::Current,
            steps: Vec::new(),
        });
    }

    let mut steps = Vec::new();
    if let Some(first) = opt(name).parse_next(input)? {
        steps.push(Step::Property(vec![first]));
    }
    steps.extend(steps0(input)?);
    Ok(PathExpr {
        anchor: Anchor::Current,
        steps,
    })
}

fn steps0(input: &mut &str) -> ModalResult<Vec<Step>> {
    let groups: Vec<Vec<Step>> = repeat(0.., step).parse_next(input)?;
    Ok(groups.into_iter().flatten().collect())
}

/// One step; a non-leading `..` expands to [`Step::Descend`] plus its target.
fn step(input: &mut &str) -> ModalResult<Vec<Step>> {
    alt((
        preceded("..", target).map(|target| vec![Step::Descend, target]),
        preceded('.', dot_target).map(|step| vec![step]),
        bracket.map(|step| vec![step]),
    ))
    .parse_next(input)
}

fn target(input: &mut &str) -> ModalResult<Step> {
    alt((dot_target, bracket)).parse_next(input)
}

fn dot_target(input: &mut &str) -> ModalResult<Step> {
    alt((
        '*'.value(Step::Wildcard),
        name.map(|name| Step::Property(vec![name])),
    ))
    .parse_next(input)
}

fn bracket(input: &mut &str) -> ModalResult<Step> {
    delimited(('[', multispace0), bracket_body, (multispace0, ']')).parse_next(input)
}

fn bracket_body(input: &mut &str) -> ModalResult<Step> {
    alt((
        '*'.value(Step::Wildcard),
        delimited(
            ('?', multispace0, '(', multispace0),
            filter_expr,
            (multispace0, ')'),
        )
        .map(Step::Filter),
        slice,
        separated(1.., integer, (multispace0, ',', multispace0)).map(Step::Index),
        separated(1.., quoted, (multispace0, ',', multispace0)).map(Step::Property),
    ))
    .parse_next(input)
}

fn slice(input: &mut &str) -> ModalResult<Step> {
    let start = opt(integer).parse_next(input)?;
    let _ = (multispace0, ':', multispace0).parse_next(input)?;
    let end = opt(integer).parse_next(input)?;
    Ok(Step::Slice { start, end })
}

fn name(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '$')
    })
    .map(str::to_string)
    .parse_next(input)
}

fn integer(input: &mut &str) -> ModalResult<i64> {
    dec_int.parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<f64> {
    float.parse_next(input)
}

fn quoted(input: &mut &str) -> ModalResult<String> {
    alt((quoted_with('\''), quoted_with('"'))).parse_next(input)
}

/// A string in `quote`; a backslash escapes the next character.
fn quoted_with(quote: char) -> impl FnMut(&mut &str) -> ModalResult<String> {
    move |input: &mut &str| {
        delimited(
            quote,
            repeat(0.., alt((preceded('\\', any), none_of([quote, '\\'])))),
            quote,
        )
        .parse_next(input)
    }
}

// ============================================================================
// Filters
// ============================================================================

fn filter_expr(input: &mut &str) -> ModalResult<FilterExpr> {
    let first = and_expr(input)?;
    let rest: Vec<FilterExpr> =
        repeat(0.., preceded((multispace0, "||", multispace0), and_expr)).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |left, right| {
        FilterExpr::Or(Box::new(left), Box::new(right))
    }))
}

fn and_expr(input: &mut &str) -> ModalResult<FilterExpr> {
    let first = predicate(input)?;
    let rest: Vec<FilterExpr> =
        repeat(0.., preceded((multispace0, "&&", multispace0), predicate)).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |left, right| {
        FilterExpr::And(Box::new(left), Box::new(right))
    }))
}

fn predicate(input: &mut &str) -> ModalResult<FilterExpr> {
    alt((
        delimited(('(', multispace0), filter_expr, (multispace0, ')')),
        comparison,
    ))
    .parse_next(input)
}

fn comparison(input: &mut &str) -> ModalResult<FilterExpr> {
    let left = operand(input)?;
    let _ = multispace0.parse_next(input)?;

    if opt("=~").parse_next(input)?.is_some() {
        let _ = multispace0.parse_next(input)?;
        let regex = cut_err(regex_literal).parse_next(input)?;
        return Ok(FilterExpr::Matches { left, regex });
    }

    let op = opt(alt(("==".value(CompareOp::Eq), "!=".value(CompareOp::Ne)))).parse_next(input)?;
    match op {
        Some(op) => {
            let _ = multispace0.parse_next(input)?;
            let right = literal(input)?;
            Ok(FilterExpr::Compare { left, op, right })
        }
        None => Ok(FilterExpr::Exists(left)),
    }
}

fn operand(input: &mut &str) -> ModalResult<Operand> {
    alt((
        preceded('@', steps0).map(Operand::Current),
        preceded('$', steps0).map(Operand::Root),
    ))
    .parse_next(input)
}

fn literal(input: &mut &str) -> ModalResult<LiteralValue> {
    alt((
        quoted.map(LiteralValue::String),
        "true".value(LiteralValue::Bool(true)),
        "false".value(LiteralValue::Bool(false)),
        "null".value(LiteralValue::Null),
        number.map(LiteralValue::Number),
    ))
    .parse_next(input)
}

fn regex_literal(input: &mut &str) -> ModalResult<Regex> {
    alt((
        (regex_body, take_while(0.., |c: char| c.is_ascii_alphabetic()))
            .map(|(pattern, flags): (String, &str)| (pattern, flags.to_string())),
        quoted.map(|pattern| (pattern, String::new())),
    ))
    .try_map(|(pattern, flags)| compile_regex(&pattern, &flags))
    .parse_next(input)
}

/// `/pattern/`; `\/` stands for a literal slash.
fn regex_body(input: &mut &str) -> ModalResult<String> {
    let text: &str = input;
    let Some(body) = text.strip_prefix('/') else {
        return Err(ErrMode::from_input(input));
    };
    let mut pattern = String::new();
    let mut chars = body.char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '/' => {
                *input = &body[offset + 1..];
                return Ok(pattern);
            }
            '\\' => match chars.next() {
                Some((_, '/')) => pattern.push('/'),
                Some((_, escaped)) => {
                    pattern.push('\\');
                    pattern.push(escaped);
                }
                None => break,
            },
            c => pattern.push(c),
        }
    }
    Err(ErrMode::from_input(input))
}

/// Compile a pattern that must match the whole string. Flags: `i`, `m`, `s`.
fn compile_regex(pattern: &str, flags: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
}
