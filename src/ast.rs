//! Syntax tree for parsed patterns.

use std::fmt;

/// One node of the pattern syntax tree.
///
/// The tree is finite, owns its children exclusively, and is immutable
/// after parsing; the only rewrite is [`Ast::optimize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// A single literal character.
    Char(char),
    /// `.`: any one character from the wildcard alphabet.
    Wildcard,
    /// Matches the empty string only. This is what an empty pattern, an
    /// empty group and an empty alternation branch parse to.
    Empty,
    /// Left followed by right.
    Concat(Box<Ast>, Box<Ast>),
    /// Ordered alternation, always two or more branches after parsing.
    Alt(Vec<Ast>),
    /// Zero or more repetitions.
    Star(Box<Ast>),
    /// One or more repetitions.
    Plus(Box<Ast>),
    /// Zero or one occurrence.
    Maybe(Box<Ast>),
}

impl Ast {
    /// Flattens directly nested alternations: `Alt[Alt[a, b], c]` becomes
    /// `Alt[a, b, c]`. Children are optimized first, so alternation chains
    /// collapse all the way; every other node recurses without structural
    /// change. Idempotent.
    pub fn optimize(self) -> Ast {
        match self {
            Ast::Alt(branches) => {
                let mut flat = Vec::with_capacity(branches.len());
                for branch in branches {
                    match branch.optimize() {
                        Ast::Alt(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                Ast::Alt(flat)
            }
            Ast::Concat(left, right) => {
                Ast::Concat(Box::new(left.optimize()), Box::new(right.optimize()))
            }
            Ast::Star(sub) => Ast::Star(Box::new(sub.optimize())),
            Ast::Plus(sub) => Ast::Plus(Box::new(sub.optimize())),
            Ast::Maybe(sub) => Ast::Maybe(Box::new(sub.optimize())),
            leaf => leaf,
        }
    }

    /// True for nodes a postfix quantifier may apply to without grouping.
    fn is_atom(&self) -> bool {
        matches!(self, Ast::Char(_) | Ast::Wildcard)
    }
}

/// Writes `c`, escaped if it collides with an operator.
fn write_literal(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    if matches!(c, '(' | ')' | '|' | '*' | '+' | '?' | '.' | '\\' | '[' | ']') {
        write!(f, "\\{}", c)
    } else {
        write!(f, "{}", c)
    }
}

/// Writes `ast` wrapped in a group unless it is a bare atom.
fn write_quantified(f: &mut fmt::Formatter<'_>, ast: &Ast, op: char) -> fmt::Result {
    if ast.is_atom() {
        write!(f, "{}{}", ast, op)
    } else {
        write!(f, "({}){}", ast, op)
    }
}

impl fmt::Display for Ast {
    /// Renders the tree back to pattern text. The output reparses to a tree
    /// accepting the same language (structure may differ, e.g. a rendered
    /// `Empty` concatenand simply vanishes).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Char(c) => write_literal(f, *c),
            Ast::Wildcard => write!(f, "."),
            Ast::Empty => Ok(()),
            Ast::Concat(left, right) => {
                for side in [left, right] {
                    match side.as_ref() {
                        alt @ Ast::Alt(_) => write!(f, "({})", alt)?,
                        other => write!(f, "{}", other)?,
                    }
                }
                Ok(())
            }
            Ast::Alt(branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}", branch)?;
                }
                Ok(())
            }
            Ast::Star(sub) => write_quantified(f, sub, '*'),
            Ast::Plus(sub) => write_quantified(f, sub, '+'),
            Ast::Maybe(sub) => write_quantified(f, sub, '?'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(left: Ast, right: Ast) -> Ast {
        Ast::Concat(Box::new(left), Box::new(right))
    }

    #[test]
    fn test_optimize_flattens_nested_alt() {
        let ast = Ast::Alt(vec![
            Ast::Alt(vec![Ast::Char('a'), Ast::Char('b')]),
            Ast::Char('c'),
        ]);
        let optimized = ast.optimize();
        assert_eq!(
            optimized,
            Ast::Alt(vec![Ast::Char('a'), Ast::Char('b'), Ast::Char('c')])
        );
    }

    #[test]
    fn test_optimize_flattens_deep_chains() {
        let ast = Ast::Alt(vec![
            Ast::Alt(vec![
                Ast::Alt(vec![Ast::Char('a'), Ast::Char('b')]),
                Ast::Char('c'),
            ]),
            Ast::Char('d'),
        ]);
        let optimized = ast.optimize();
        assert_eq!(
            optimized,
            Ast::Alt(vec![
                Ast::Char('a'),
                Ast::Char('b'),
                Ast::Char('c'),
                Ast::Char('d')
            ])
        );
    }

    #[test]
    fn test_optimize_recurses_through_other_nodes() {
        let nested = Ast::Alt(vec![Ast::Alt(vec![Ast::Char('a'), Ast::Char('b')]), Ast::Char('c')]);
        let ast = Ast::Star(Box::new(concat(nested, Ast::Char('d'))));
        let expected = Ast::Star(Box::new(concat(
            Ast::Alt(vec![Ast::Char('a'), Ast::Char('b'), Ast::Char('c')]),
            Ast::Char('d'),
        )));
        assert_eq!(ast.optimize(), expected);
    }

    #[test]
    fn test_optimize_idempotent() {
        let ast = Ast::Alt(vec![
            Ast::Alt(vec![Ast::Char('a'), Ast::Char('b')]),
            Ast::Maybe(Box::new(Ast::Char('c'))),
        ]);
        let once = ast.optimize();
        let twice = once.clone().optimize();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_display_escapes_operators() {
        assert_eq!(Ast::Char('|').to_string(), "\\|");
        assert_eq!(Ast::Char('\\').to_string(), "\\\\");
        assert_eq!(Ast::Char('a').to_string(), "a");
    }

    #[test]
    fn test_display_precedence() {
        let alt = Ast::Alt(vec![Ast::Char('a'), Ast::Char('b')]);
        assert_eq!(concat(alt.clone(), Ast::Char('c')).to_string(), "(a|b)c");
        assert_eq!(Ast::Star(Box::new(alt)).to_string(), "(a|b)*");
        assert_eq!(Ast::Star(Box::new(Ast::Char('a'))).to_string(), "a*");
        assert_eq!(
            Ast::Star(Box::new(Ast::Maybe(Box::new(Ast::Char('a'))))).to_string(),
            "(a?)*"
        );
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(Ast::Empty.to_string(), "");
        assert_eq!(Ast::Star(Box::new(Ast::Empty)).to_string(), "()*");
    }
}
