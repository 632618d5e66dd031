use itertools::Itertools;
use nom::{Parser, error::ParseError};

use crate::{Error, Result, automaton::Letter};

pub mod canonical;
pub mod compile;

/// A regular expression over symbol tokens.
///
/// The grammar: whitespace-separated symbol tokens, juxtaposition for
/// sequencing, `|` for alternation, postfix `?`/`+`/`*`, parentheses for
/// grouping. `(a b)* | c+` denotes the union of `(ab)*` and `cc*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Regex<L: Letter> {
    Symbol(L),
    Sequence(Vec<Regex<L>>),
    Alternative(Vec<Regex<L>>),
    Star(Box<Regex<L>>),
    Plus(Box<Regex<L>>),
    Question(Box<Regex<L>>),
}

impl<L: Letter> Regex<L> {
    /// The sorted distinct set of symbols occurring in the expression.
    pub fn alphabet(&self) -> Vec<L> {
        let mut symbols = vec![];
        self.collect_symbols(&mut symbols);
        symbols.into_iter().sorted().dedup().collect()
    }

    fn collect_symbols(&self, out: &mut Vec<L>) {
        match self {
            Regex::Symbol(s) => out.push(s.clone()),
            Regex::Sequence(parts) | Regex::Alternative(parts) => {
                for part in parts {
                    part.collect_symbols(out);
                }
            }
            Regex::Star(inner) | Regex::Plus(inner) | Regex::Question(inner) => {
                inner.collect_symbols(out);
            }
        }
    }
}

impl Regex<String> {
    pub fn parse(input: &str) -> Result<Regex<String>> {
        match nom::combinator::all_consuming(nom::sequence::delimited(
            opt_whitespace,
            alternative::<nom::error::Error<&str>>,
            opt_whitespace,
        ))
        .parse(input)
        {
            Ok((_, regex)) => Ok(regex),
            Err(e) => Err(Error::Parse {
                line: 1,
                message: e.to_string(),
            }),
        }
    }
}

fn opt_whitespace<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, &'a str, E> {
    nom::character::complete::multispace0(input)
}

fn symbol<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, &'a str, E> {
    nom::bytes::complete::take_while1(|c: char| !c.is_whitespace() && !"()|?+*".contains(c))(input)
}

fn atom<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, Regex<String>, E> {
    nom::branch::alt((
        nom::sequence::delimited(
            nom::character::complete::char('('),
            nom::sequence::delimited(opt_whitespace, alternative, opt_whitespace),
            nom::character::complete::char(')'),
        ),
        nom::combinator::map(symbol, |s| Regex::Symbol(s.to_string())),
    ))
    .parse(input)
}

// an atom with any number of postfix operators, applied left to right
fn postfix<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, Regex<String>, E> {
    let (input, base) = atom(input)?;
    let (input, operators) =
        nom::multi::many0(nom::character::complete::one_of("?+*")).parse(input)?;

    let regex = operators.into_iter().fold(base, |inner, op| match op {
        '?' => Regex::Question(Box::new(inner)),
        '+' => Regex::Plus(Box::new(inner)),
        _ => Regex::Star(Box::new(inner)),
    });

    Ok((input, regex))
}

fn sequence<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, Regex<String>, E> {
    let (input, first) = postfix(input)?;
    let (input, mut rest) =
        nom::multi::many0(nom::sequence::preceded(opt_whitespace, postfix)).parse(input)?;

    if rest.is_empty() {
        return Ok((input, first));
    }

    rest.insert(0, first);
    Ok((input, Regex::Sequence(rest)))
}

fn alternative<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> nom::IResult<&'a str, Regex<String>, E> {
    let (input, mut branches) = nom::multi::separated_list1(
        nom::sequence::delimited(
            opt_whitespace,
            nom::character::complete::char('|'),
            opt_whitespace,
        ),
        sequence,
    )
    .parse(input)?;

    if branches.len() == 1 {
        return Ok((input, branches.pop().unwrap()));
    }

    Ok((input, Regex::Alternative(branches)))
}
