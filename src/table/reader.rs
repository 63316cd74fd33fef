//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::ir::*;
use crate::memory::{AddressSpace, OperationCategory};
use crate::table::{Builtin, BuiltinTable, Family, TableError};
use smallvec::SmallVec;

/// A single token of a `.bif` line.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Token<'a> {
    /// A word, e.g. `ConvertFToU`, `uchar4` or `atomic-rmw`
    Ident(&'a str),
    /// A decimal integer, e.g. `16`
    Int(&'a str),
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `*`
    Star,
    /// `(`
    ParenOpen,
    /// `)`
    ParenClose,
    /// `[`
    SquareOpen,
    /// `]`
    SquareClose,
    /// `...`
    Variadic,
    /// Anything else
    Unknown(&'a str),
}

/// A token and where it came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TokPair<'a> {
    /// The raw token data
    pub tok: Token<'a>,
    /// The line in the original source that the token is located at
    pub line: u32,
    /// The column in the original source that the token is located at
    pub col: u32,
    /// The total length of the token
    pub len: u32,
}

impl<'a> TokPair<'a> {
    fn error(&self, message: impl Into<String>) -> TableError {
        TableError::new(message, self.line, self.col, self.len)
    }
}

/// Splits one line into tokens. Everything after a `;` is a comment.
pub fn lex_line(source: &str, line: u32) -> Vec<TokPair<'_>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::default();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let ch = bytes[i] as char;

        i += 1;

        let tok = match ch {
            ';' => break,
            c if c.is_ascii_whitespace() => continue,
            ':' => Token::Colon,
            ',' => Token::Comma,
            '*' => Token::Star,
            '(' => Token::ParenOpen,
            ')' => Token::ParenClose,
            '[' => Token::SquareOpen,
            ']' => Token::SquareClose,
            '.' => {
                if source[i..].starts_with("..") {
                    i += 2;

                    Token::Variadic
                } else {
                    Token::Unknown(&source[start..i])
                }
            }
            c if c.is_ascii_digit() => {
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }

                Token::Int(&source[start..i])
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'-') {
                    i += 1;
                }

                Token::Ident(&source[start..i])
            }
            _ => {
                // keep multi-byte characters whole so the slice stays valid
                while i < bytes.len() && !source.is_char_boundary(i) {
                    i += 1;
                }

                Token::Unknown(&source[start..i])
            }
        };

        tokens.push(TokPair {
            tok,
            line,
            col: (start + 1) as u32,
            len: (i - start) as u32,
        });
    }

    tokens
}

/// Reads a `.bif` table, expanding any `family` lines in place.
///
/// ```
/// # use spirv_bif::table::*;
/// let table = parse_table("
///     ConvertFToU sat rte tagged : uchar (half)
///     AtomicIAdd leading atomic-rmw : int (global int*, int, int, int)
///     ocl degrees : float (float)
/// ").unwrap();
///
/// let symbols: Vec<_> = table.rows().iter().map(Builtin::symbol).collect();
/// assert_eq!(symbols, [
///     "ConvertFToU_Sat_RTE_i8_f16_sat_rte_Ruchar",
///     "AtomicIAdd_i32_p1i32_i32_i32_i32",
///     "degrees_f32",
/// ]);
/// ```
pub fn parse_table(source: &str) -> Result<BuiltinTable, TableError> {
    let mut table = BuiltinTable::new();

    for (i, line) in source.lines().enumerate() {
        let tokens = lex_line(line, (i + 1) as u32);

        if tokens.is_empty() {
            continue;
        }

        let mut parser = LineParser {
            tokens: &tokens,
            pos: 0,
            line: (i + 1) as u32,
            end_col: (line.len() + 1) as u32,
        };

        match parser.parse_line()? {
            Line::Row(row) => {
                log::trace!("read row `{}`", row.symbol());

                table.push(row);
            }
            Line::Family(family) => table.push_family(family),
        }
    }

    Ok(table)
}

enum Line {
    Row(Builtin),
    Family(Family),
}

#[derive(Default)]
struct Modifiers {
    saturate: bool,
    rounding: Option<RoundingMode>,
    ret_mangling: Option<ReturnMangling>,
    ocl: bool,
    category: Option<OperationCategory>,
}

struct LineParser<'t, 'a> {
    tokens: &'t [TokPair<'a>],
    pos: usize,
    line: u32,
    end_col: u32,
}

impl<'t, 'a> LineParser<'t, 'a> {
    fn peek(&self) -> Option<TokPair<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Result<TokPair<'a>, TableError> {
        match self.peek() {
            Some(tok) => {
                self.pos += 1;

                Ok(tok)
            }
            None => Err(TableError::new("unexpected end of line", self.line, self.end_col, 1)),
        }
    }

    fn expect(&mut self, expected: Token<'static>, what: &str) -> Result<TokPair<'a>, TableError> {
        let tok = self.next()?;

        if tok.tok == expected {
            Ok(tok)
        } else {
            Err(tok.error(format!("expected {what}")))
        }
    }

    fn eat(&mut self, expected: Token<'static>) -> bool {
        match self.peek() {
            Some(tok) if tok.tok == expected => {
                self.pos += 1;

                true
            }
            _ => false,
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<(&'a str, TokPair<'a>), TableError> {
        let tok = self.next()?;

        match tok.tok {
            Token::Ident(s) => Ok((s, tok)),
            _ => Err(tok.error(format!("expected {what}"))),
        }
    }

    fn expect_end(&mut self) -> Result<(), TableError> {
        match self.peek() {
            Some(tok) => Err(tok.error("expected end of line")),
            None => Ok(()),
        }
    }

    fn parse_line(&mut self) -> Result<Line, TableError> {
        if let Some(TokPair {
            tok: Token::Ident("family"),
            ..
        }) = self.peek()
        {
            self.pos += 1;

            let (name, tok) = self.expect_ident("a family name")?;
            let family = name.parse::<Family>().map_err(|e| tok.error(e))?;

            self.expect_end()?;

            return Ok(Line::Family(family));
        }

        let mut modifiers = Modifiers::default();
        let mut name = None;

        loop {
            let tok = self.next()?;

            match tok.tok {
                Token::Colon => break,
                Token::Ident(word) => {
                    if self.apply_modifier(&mut modifiers, word, tok)? {
                        continue;
                    }

                    if name.is_some() {
                        return Err(tok.error(format!("unknown modifier `{word}`")));
                    }

                    name = Some(word);
                }
                _ => return Err(tok.error("expected a builtin name, a modifier or `:`")),
            }
        }

        let name = match name {
            Some(name) => name,
            None => {
                let colon = self.tokens[self.pos - 1];

                return Err(colon.error("expected a builtin name before `:`"));
            }
        };

        let ret_tok = self.peek();
        let ret = self.parse_type()?;

        self.expect(Token::ParenOpen, "`(`")?;

        let mut params: SmallVec<[Type; 4]> = SmallVec::default();

        if !self.eat(Token::ParenClose) {
            loop {
                let start = self.peek();
                let param = self.parse_type()?;

                if param.is_void() {
                    if let Some(start) = start {
                        return Err(start.error("parameters cannot be `void`"));
                    }
                }

                params.push(param);

                if self.eat(Token::ParenClose) {
                    break;
                }

                self.expect(Token::Comma, "`,` or `)`")?;
            }
        }

        self.expect_end()?;

        let ret_mangling = modifiers.ret_mangling.unwrap_or(ReturnMangling::Inferred);

        if ret_mangling == ReturnMangling::Tagged && !(ret.is_int_like() || ret.is_float_like()) {
            if let Some(tok) = ret_tok {
                return Err(tok.error(format!("a tagged result must be numeric, `{ret}` is not")));
            }
        }

        let builder = if modifiers.ocl {
            SigBuilder::ocl(name)
        } else {
            SigBuilder::new(name)
        };

        let sig = builder
            .ret(ret)
            .params(&params)
            .saturate(modifiers.saturate)
            .rounding(modifiers.rounding)
            .ret_mangling(ret_mangling)
            .build();

        Ok(Line::Row(match modifiers.category {
            Some(category) => Builtin::synchronizing(sig, category),
            None => Builtin::new(sig),
        }))
    }

    // returns whether `word` was a modifier
    fn apply_modifier(&self, modifiers: &mut Modifiers, word: &str, tok: TokPair<'a>) -> Result<bool, TableError> {
        if word == "sat" {
            if modifiers.saturate {
                return Err(tok.error("`sat` given twice"));
            }

            modifiers.saturate = true;
        } else if word == "ocl" {
            if modifiers.ocl {
                return Err(tok.error("`ocl` given twice"));
            }

            modifiers.ocl = true;
        } else if let Ok(rounding) = word.parse::<RoundingMode>() {
            if modifiers.rounding.replace(rounding).is_some() {
                return Err(tok.error("only one rounding mode may be given"));
            }
        } else if let Ok(mangling) = word.parse::<ReturnMangling>() {
            if modifiers.ret_mangling.replace(mangling).is_some() {
                return Err(tok.error("only one result mangling may be given"));
            }
        } else if let Ok(category) = word.parse::<OperationCategory>() {
            if modifiers.category.replace(category).is_some() {
                return Err(tok.error("only one operation category may be given"));
            }
        } else {
            return Ok(false);
        }

        Ok(true)
    }

    fn parse_type(&mut self) -> Result<Type, TableError> {
        let mut spaces: SmallVec<[(AddressSpace, TokPair<'a>); 2]> = SmallVec::default();

        while let Some(tok) = self.peek() {
            match tok.tok {
                Token::Ident(word) if word != "fn" => match word.parse::<AddressSpace>() {
                    Ok(space) => {
                        self.pos += 1;
                        spaces.push((space, tok));
                    }
                    Err(_) => break,
                },
                _ => break,
            }
        }

        let (word, tok) = self.expect_ident("a type")?;

        let mut ty = if word == "fn" {
            let space = match spaces.pop() {
                Some((space, _)) => space,
                None => return Err(tok.error("function pointers need an address space")),
            };

            self.parse_function_ptr(space)?
        } else {
            parse_named_type(word).map_err(|e| tok.error(e))?
        };

        loop {
            match self.peek().map(|t| t.tok) {
                Some(Token::Star) => {
                    let star = self.next()?;

                    // the innermost pointer takes the space written closest to the base type
                    let space = match spaces.pop() {
                        Some((space, _)) => space,
                        None => return Err(star.error("pointers need an address space")),
                    };

                    ty = Type::ptr(space, ty);
                }
                Some(Token::SquareOpen) => {
                    self.pos += 1;

                    let len_tok = self.next()?;
                    let length = match len_tok.tok {
                        Token::Int(digits) => digits
                            .parse::<u32>()
                            .map_err(|_| len_tok.error("array length is too large"))?,
                        _ => return Err(len_tok.error("expected an array length")),
                    };

                    if ty.is_void() {
                        return Err(len_tok.error("arrays of `void` are not allowed"));
                    }

                    self.expect(Token::SquareClose, "`]`")?;

                    ty = Type::array(ty, length);
                }
                _ => break,
            }
        }

        if let Some((space, tok)) = spaces.first() {
            return Err(tok.error(format!("address space `{space}` does not apply to a pointer")));
        }

        Ok(ty)
    }

    // parses `<ret>(<params>)` after `fn`
    fn parse_function_ptr(&mut self, space: AddressSpace) -> Result<Type, TableError> {
        let ret = self.parse_type()?;
        let mut params: SmallVec<[Type; 4]> = SmallVec::default();
        let mut variadic = false;

        self.expect(Token::ParenOpen, "`(`")?;

        if !self.eat(Token::ParenClose) {
            loop {
                if self.eat(Token::Variadic) {
                    variadic = true;
                    self.expect(Token::ParenClose, "`)` after `...`")?;

                    break;
                }

                params.push(self.parse_type()?);

                if self.eat(Token::ParenClose) {
                    break;
                }

                self.expect(Token::Comma, "`,` or `)`")?;
            }
        }

        Ok(Type::function_ptr(space, ret, &params, variadic))
    }
}

fn parse_scalar(name: &str) -> Option<Scalar> {
    let scalar = match name {
        "void" => Scalar::Void,
        "bool" => Scalar::Bool,
        "char" => Scalar::Int(Int::char()),
        "uchar" => Scalar::Int(Int::uchar()),
        "short" => Scalar::Int(Int::short()),
        "ushort" => Scalar::Int(Int::ushort()),
        "int" => Scalar::Int(Int::int()),
        "uint" => Scalar::Int(Int::uint()),
        "long" => Scalar::Int(Int::long()),
        "ulong" => Scalar::Int(Int::ulong()),
        "half" => Scalar::Float(Float::half()),
        "float" => Scalar::Float(Float::float()),
        "double" => Scalar::Float(Float::double()),
        _ => return None,
    };

    Some(scalar)
}

fn parse_opaque(name: &str) -> Option<Opaque> {
    let opaque = match name {
        "image_t" => Opaque::Image,
        "sampler_t" => Opaque::Sampler,
        "event_t" => Opaque::Event,
        "clk_event_t" => Opaque::ClkEvent,
        "queue_t" => Opaque::Queue,
        "reserve_id_t" => Opaque::ReserveId,
        "pipe_t" => Opaque::Pipe,
        "named_barrier_t" => Opaque::NamedBarrier,
        _ => return name.strip_prefix("opaque_")?.parse::<u32>().ok().map(Opaque::Struct),
    };

    Some(opaque)
}

// scalars, `<scalar><lanes>` vectors and opaque handles
fn parse_named_type(word: &str) -> Result<Type, String> {
    if let Some(opaque) = parse_opaque(word) {
        return Ok(Type::opaque(opaque));
    }

    let digits = word.len() - word.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (base, lanes) = word.split_at(word.len() - digits);

    let scalar = parse_scalar(base).ok_or_else(|| format!("unknown type `{word}`"))?;

    if lanes.is_empty() {
        return Ok(Type::Scalar(scalar));
    }

    if scalar.is_void() {
        return Err("vectors of `void` are not allowed".into());
    }

    lanes
        .parse::<u32>()
        .ok()
        .and_then(|n| Vector::new(scalar, n))
        .map(Type::Vector)
        .ok_or_else(|| format!("`{lanes}` is not a legal lane count, the lane counts are 2, 3, 4, 8 and 16"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(source: &str) -> Builtin {
        let table = parse_table(source).unwrap();

        assert_eq!(table.len(), 1);

        table.rows()[0].clone()
    }

    fn err(source: &str) -> TableError {
        parse_table(source).unwrap_err()
    }

    #[test]
    fn lexes_with_columns() {
        let tokens = lex_line("  Foo : int4 (global int*) ; comment", 3);
        let kinds: Vec<_> = tokens.iter().map(|t| t.tok).collect();

        assert_eq!(
            kinds,
            [
                Token::Ident("Foo"),
                Token::Colon,
                Token::Ident("int4"),
                Token::ParenOpen,
                Token::Ident("global"),
                Token::Ident("int"),
                Token::Star,
                Token::ParenClose,
            ]
        );

        assert_eq!((tokens[0].line, tokens[0].col, tokens[0].len), (3, 3, 3));
        assert_eq!((tokens[2].col, tokens[2].len), (9, 4));
    }

    #[test]
    fn conversion_rows() {
        let r = row("SConvert sat tagged : int4 (char4)");

        assert_eq!(r.symbol(), "SConvert_Sat_v4i32_v4i8_sat_Rint4");
        assert_eq!(r.category(), None);

        let r = row("ConvertFToU tagged : uchar (half) ; the simplest one");
        assert_eq!(r.symbol(), "ConvertFToU_i8_f16_Ruchar");
    }

    #[test]
    fn modifiers_can_come_first() {
        let r = row("ocl fclamp : double2 (double2, double2, double2)");

        assert_eq!(r.signature().namespace(), Namespace::OpenCL);
        assert_eq!(r.symbol(), "fclamp_v2f64_v2f64_v2f64");

        let r = row("rtz tagged ConvertSToF : float (long)");
        assert_eq!(r.symbol(), "ConvertSToF_RTZ_f32_i64_rtz_Rfloat");
    }

    #[test]
    fn nested_types() {
        let r = row("Foo : void (generic local uint4**, float[8], global int*[2], private fn void(int, ...), sampler_t)");
        let params = r.signature().params();

        assert_eq!(
            params[0],
            Type::ptr(AddressSpace::Generic, Type::ptr(AddressSpace::Local, Type::uint_vec(4)))
        );
        assert_eq!(params[1], Type::array(Type::float(), 8));
        assert_eq!(params[2], Type::array(Type::ptr(AddressSpace::Global, Type::int()), 2));
        assert_eq!(
            params[3],
            Type::function_ptr(AddressSpace::Private, Type::void(), &[Type::int()], true)
        );
        assert_eq!(params[4], Type::opaque(Opaque::Sampler));
        assert_eq!(r.symbol(), "Foo_p4p3v4i32_a8f32_a2p1i32_fp0vi32x_i64");
    }

    #[test]
    fn displayed_types_read_back() {
        let types = [
            Type::ptr(AddressSpace::Generic, Type::ptr(AddressSpace::Global, Type::int())),
            Type::array(Type::half_vec(16), 3),
            Type::function_ptr(
                AddressSpace::Global,
                Type::float(),
                &[Type::ptr(AddressSpace::Local, Type::char())],
                false,
            ),
            Type::opaque(Opaque::Struct(12)),
        ];

        for ty in types {
            let r = row(&format!("Foo : {ty} ()"));

            assert_eq!(r.signature().return_ty(), &ty);
        }
    }

    #[test]
    fn families_expand_in_place() {
        let table = parse_table("Foo : void ()\nfamily barriers\nBar : void ()").unwrap();
        let barriers = Family::Barriers.expand();

        assert_eq!(table.len(), barriers.len() + 2);
        assert_eq!(table.rows()[1], barriers[0]);
        assert_eq!(table.rows().last().map(Builtin::symbol), Some("Bar".to_string()));
    }

    #[test]
    fn comments_and_blank_lines() {
        let table = parse_table("; header\n\n   \nFoo : void () ; trailing\n").unwrap();

        assert_eq!(table.len(), 1);
    }

    #[test]
    fn errors_point_at_the_problem() {
        let e = err("Foo : int5 (int)");
        assert_eq!((e.line(), e.col(), e.len()), (1, 7, 4));

        let e = err("\nFoo : int (widget)");
        assert_eq!((e.line(), e.col()), (2, 12));
        assert_eq!(e.message(), "unknown type `widget`");

        let e = err("Foo rte rtz : int (int)");
        assert_eq!(e.col(), 9);

        let e = err("Foo Bar : int (int)");
        assert_eq!(e.message(), "unknown modifier `Bar`");

        let e = err("Foo : int (int");
        assert_eq!((e.col(), e.message()), (15, "unexpected end of line"));

        let e = err("Foo : int* ()");
        assert_eq!(e.message(), "pointers need an address space");

        let e = err("Foo : global int ()");
        assert_eq!(e.col(), 7);

        let e = err("Foo tagged : global int* (int)");
        assert_eq!(e.col(), 14);

        let e = err("Foo : void (void)");
        assert_eq!(e.col(), 13);

        let e = err("family everything");
        assert_eq!(e.col(), 8);

        let e = err("sat : int (int)");
        assert_eq!(e.message(), "expected a builtin name before `:`");
    }
}
