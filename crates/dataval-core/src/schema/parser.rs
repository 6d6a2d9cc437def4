//! Leaf expression parser
//!
//! Recursive descent over the leaf grammar:
//!
//! ```text
//! leaf := alts ('@' call)*
//! alts := name? ('|' name?)*
//! call := name ('(' arg (',' arg)* ')')?
//! arg  := any characters except ',' '(' ')'
//! ```
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

use super::ast::{LeafSpec, TransformCall};
use super::error::ParseError;
use crate::registry::NULL_TYPE;
use std::iter::Peekable;
use std::str::CharIndices;

/// Parse a complete leaf expression such as `"int|null@num_range(0,10)"`
pub fn parse_leaf(input: &str) -> Result<LeafSpec, ParseError> {
    LeafParser::new(input).parse()
}

/// Parse a single transform invocation such as `"str_range(1,32)"`
pub fn parse_transform_call(input: &str) -> Result<TransformCall, ParseError> {
    let mut parser = LeafParser::new(input);
    let call = parser.parse_call()?;
    match parser.peek() {
        None => Ok(call),
        Some(found) => Err(ParseError::TrailingCharacters {
            segment: input.to_string(),
            position: parser.position(),
            found,
        }),
    }
}

/// Leaf expression parser
pub struct LeafParser<'a> {
    /// Input string being parsed
    input: &'a str,
    /// Character iterator with byte offsets
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> LeafParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Parse the whole input into a [`LeafSpec`]
    pub fn parse(self) -> Result<LeafSpec, ParseError> {
        match self.parse_partial() {
            (leaf, None) => Ok(leaf),
            (_, Some(err)) => Err(err),
        }
    }

    /// Parse as far as possible, stopping at the first malformed transform
    ///
    /// The alternatives are always complete; `transforms` holds the calls
    /// before the error.
    pub fn parse_partial(mut self) -> (LeafSpec, Option<ParseError>) {
        let (alternatives, nullable) = self.parse_alternatives();
        let mut leaf = LeafSpec {
            alternatives,
            nullable,
            transforms: Vec::new(),
        };

        while self.eat('@') {
            match self.parse_call() {
                Ok(call) => leaf.transforms.push(call),
                Err(err) => return (leaf, Some(err)),
            }
        }

        (leaf, None)
    }

    /// Parse `name|name|...` up to the first `@`
    fn parse_alternatives(&mut self) -> (Vec<String>, bool) {
        let mut names: Vec<String> = Vec::new();
        let mut nullable = false;

        loop {
            let name = self.take_while(|c| c != '|' && c != '@').trim();
            if name == NULL_TYPE {
                nullable = true;
            } else if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }

            if !self.eat('|') {
                break;
            }
        }

        (names, nullable)
    }

    /// Parse one `name(args)` invocation
    fn parse_call(&mut self) -> Result<TransformCall, ParseError> {
        let start = self.position();
        let name = self.take_while(|c| !matches!(c, '(' | ')' | '@')).trim();
        let mut args = Vec::new();

        match self.peek() {
            Some(')') => {
                return Err(ParseError::UnexpectedCloseParen {
                    segment: self.segment_from(start),
                    position: self.position(),
                });
            }
            Some('(') => {
                args = self.parse_arguments(start)?;
                match self.peek() {
                    None | Some('@') => {}
                    Some(found) => {
                        return Err(ParseError::TrailingCharacters {
                            segment: self.segment_from(start),
                            position: self.position(),
                            found,
                        });
                    }
                }
            }
            _ => {}
        }

        if name.is_empty() {
            return Err(ParseError::MissingName {
                segment: self.segment_from(start),
                position: start,
            });
        }

        Ok(TransformCall {
            name: name.to_string(),
            args,
            raw: self.input[start..self.position()].to_string(),
        })
    }

    /// Parse `(arg,arg,...)`; the opening parenthesis is the next character
    fn parse_arguments(&mut self, call_start: usize) -> Result<Vec<String>, ParseError> {
        let open = self.position();
        self.chars.next(); // consume '('

        let mut args = Vec::new();
        let mut current = String::new();
        loop {
            match self.chars.next() {
                Some((_, ')')) => {
                    args.push(current);
                    return Ok(args);
                }
                Some((_, ',')) => args.push(std::mem::take(&mut current)),
                Some((position, '(')) => {
                    return Err(ParseError::NestedParenthesis {
                        segment: self.segment_from(call_start),
                        position,
                    });
                }
                Some((_, c)) => current.push(c),
                None => {
                    return Err(ParseError::UnterminatedArguments {
                        segment: self.segment_from(call_start),
                        position: open,
                    });
                }
            }
        }
    }

    /// Text of the expression starting at `start`, up to the next `@`
    fn segment_from(&self, start: usize) -> String {
        let rest = &self.input[start..];
        rest.find('@').map_or(rest, |end| &rest[..end]).to_string()
    }

    fn position(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(index, _)| *index)
            .unwrap_or(self.input.len())
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, predicate: F) -> &'a str {
        let input = self.input;
        let start = self.position();
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.chars.next();
        }
        &input[start..self.position()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_type() {
        let spec = parse_leaf("int").unwrap();
        assert_eq!(spec.alternatives, vec!["int"]);
        assert!(!spec.nullable);
        assert!(spec.transforms.is_empty());
    }

    #[test]
    fn test_alternatives_are_deduplicated_and_null_extracted() {
        let spec = parse_leaf("int|null|string|int|").unwrap();
        assert_eq!(spec.alternatives, vec!["int", "string"]);
        assert!(spec.nullable);
    }

    #[test]
    fn test_names_are_trimmed() {
        let spec = parse_leaf(" int | null ").unwrap();
        assert_eq!(spec.alternatives, vec!["int"]);
        assert!(spec.nullable);
    }

    #[test]
    fn test_transform_chain() {
        let spec = parse_leaf("string@str_lower@str_range(1,32)").unwrap();
        assert_eq!(spec.alternatives, vec!["string"]);
        assert_eq!(spec.transforms.len(), 2);
        assert_eq!(spec.transforms[0].name, "str_lower");
        assert!(spec.transforms[0].args.is_empty());
        assert_eq!(spec.transforms[1].name, "str_range");
        assert_eq!(spec.transforms[1].args, vec!["1", "32"]);
        assert_eq!(spec.transforms[1].raw, "str_range(1,32)");
    }

    #[test]
    fn test_blank_and_empty_arguments_are_kept_raw() {
        let call = parse_transform_call("num_range(,10)").unwrap();
        assert_eq!(call.args, vec!["", "10"]);
        let call = parse_transform_call("num_range()").unwrap();
        assert_eq!(call.args, vec![""]);
        let call = parse_transform_call("num_range( 1 , null)").unwrap();
        assert_eq!(call.args, vec![" 1 ", " null"]);
    }

    #[test]
    fn test_empty_type_list_parses() {
        let spec = parse_leaf("@str_lower").unwrap();
        assert!(spec.alternatives.is_empty());
        assert!(!spec.nullable);
        assert_eq!(spec.transforms.len(), 1);
    }

    #[test]
    fn test_missing_transform_name() {
        let err = parse_leaf("int@").unwrap_err();
        assert!(matches!(err, ParseError::MissingName { position: 4, .. }));
        let err = parse_leaf("int@(1)").unwrap_err();
        assert!(matches!(err, ParseError::MissingName { .. }));
    }

    #[test]
    fn test_unterminated_arguments() {
        let err = parse_leaf("int@num_range(1,2").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnterminatedArguments {
                segment: "num_range(1,2".to_string(),
                position: 13,
            }
        );
        assert!(err.to_string().starts_with("Invalid transform expression; num_range(1,2"));
    }

    #[test]
    fn test_nested_and_stray_parentheses() {
        assert!(matches!(
            parse_leaf("int@f(g(1))").unwrap_err(),
            ParseError::NestedParenthesis { position: 7, .. }
        ));
        assert!(matches!(
            parse_leaf("string@str_lower)").unwrap_err(),
            ParseError::UnexpectedCloseParen { .. }
        ));
    }

    #[test]
    fn test_trailing_characters_after_arguments() {
        let err = parse_leaf("int@num_range(1,2)x").unwrap_err();
        assert!(matches!(err, ParseError::TrailingCharacters { found: 'x', .. }));
        assert_eq!(err.segment(), "num_range(1,2)x");
    }

    #[test]
    fn test_standalone_call_rejects_chaining() {
        let err = parse_transform_call("str_lower@str_upper").unwrap_err();
        assert!(matches!(err, ParseError::TrailingCharacters { found: '@', .. }));
    }

    #[test]
    fn test_partial_parse_keeps_alternatives_and_leading_calls() {
        let (leaf, err) = LeafParser::new("int|bogus@str_lower@num_range(1").parse_partial();
        assert_eq!(leaf.alternatives, vec!["int", "bogus"]);
        assert_eq!(leaf.transforms.len(), 1);
        assert_eq!(leaf.transforms[0].name, "str_lower");
        assert!(matches!(err, Some(ParseError::UnterminatedArguments { .. })));
    }
}
