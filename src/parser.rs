//! Textual parser (`spec.md` §4.D / §6.1) for temporal values:
//!
//! ```text
//! Temporal := ("SRID=" int ";")? ( Instant | Set | Seq | SeqSet )
//! Set      := "{" Instant ("," Instant)* "}"
//! Seq      := ("[" | "(") Instant ("," Instant)* ("]" | ")")
//! SeqSet   := "{" Seq ("," Seq)* "}"
//! Instant  := Literal "@" Timestamp
//! Literal  := POINT | INT | FLOAT | TEXT
//! POINT    := "POINT(" NUM NUM [NUM] ")"
//! TEXT     := "'" ... "'"    (doubled quote is an escaped quote)
//! ```
//!
//! A small hand-rolled recursive-descent reader over the raw `&str`
//! rather than a tokenizer + grammar crate — the grammar above has four
//! productions and one terminal per base type, not enough surface to
//! justify pulling in `MaxRishoj-sql-parse`'s span-tracking lexer
//! machinery. Only the `Literal` production varies across base value
//! types ([`TextCodec`]); everything else (delimiters, `@`, the `SRID=`
//! prefix) is shared by every `parse_temporal_*`/`emit_temporal_*` pair.
//! `emit` is the exact inverse, used by `Display` impls and round-trip
//! tests.

use chronogeo_types::point::GeomPoint;

use crate::error::{ChronoError, Result};
use crate::temporal::instant::Instant;
use crate::temporal::instant_set::InstantSet;
use crate::temporal::sequence::{Interpolation, Sequence};
use crate::temporal::sequence_set::SequenceSet;
use crate::temporal::Temporal;
use crate::time::Timestamp;
use crate::value::BaseValue;

struct Reader<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn skip_ws(&mut self) {
        while self.rest().starts_with(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn expect_char(&mut self, c: char) -> Result<()> {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(ChronoError::InvalidTextRepresentation(format!(
                "expected '{c}' at position {}, found {:?}",
                self.pos,
                self.rest().chars().next()
            )))
        }
    }

    fn try_expect_char(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if pred(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        &self.s[start..self.pos]
    }

    fn parse_number(&mut self) -> Result<f64> {
        self.skip_ws();
        let text = self.take_while(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+' || c == 'e' || c == 'E');
        text.parse::<f64>()
            .map_err(|_| ChronoError::InvalidTextRepresentation(format!("expected a number, found {text:?}")))
    }

    fn parse_int_literal(&mut self) -> Result<i64> {
        self.skip_ws();
        let text = self.take_while(|c| c.is_ascii_digit() || c == '-' || c == '+');
        text.parse::<i64>()
            .map_err(|_| ChronoError::InvalidTextRepresentation(format!("expected an integer, found {text:?}")))
    }

    /// `'single-quoted text'`, with `''` an escaped literal quote.
    fn parse_text_literal(&mut self) -> Result<String> {
        self.expect_char('\'')?;
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(ChronoError::InvalidTextRepresentation("unterminated text literal".into())),
                Some('\'') => {
                    self.pos += 1;
                    if self.peek() == Some('\'') {
                        out.push('\'');
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    out.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        Ok(out)
    }

    fn parse_srid_prefix(&mut self) -> Result<Option<i32>> {
        self.skip_ws();
        if self.rest().starts_with("SRID=") {
            self.pos += "SRID=".len();
            let digits = self.take_while(|c| c.is_ascii_digit() || c == '-');
            let srid: i32 = digits
                .parse()
                .map_err(|_| ChronoError::InvalidTextRepresentation("malformed SRID prefix".into()))?;
            self.expect_char(';')?;
            Ok(Some(srid))
        } else {
            Ok(None)
        }
    }

    /// `POINT(x y)` or `POINT(x y z)`.
    fn parse_point(&mut self, srid: i32) -> Result<GeomPoint> {
        self.skip_ws();
        if !self.rest().starts_with("POINT") {
            return Err(ChronoError::InvalidTextRepresentation("expected POINT".into()));
        }
        self.pos += "POINT".len();
        self.expect_char('(')?;
        let x = self.parse_number()?;
        let y = self.parse_number()?;
        self.skip_ws();
        let z = if self.peek().is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+') {
            Some(self.parse_number()?)
        } else {
            None
        };
        self.expect_char(')')?;
        Ok(match z {
            Some(z) => GeomPoint::new_3d(x, y, z, srid),
            None => GeomPoint::new_2d(x, y, srid),
        })
    }

    /// Reads up to the next structural delimiter and hands the slice to
    /// [`Timestamp::parse`].
    fn parse_timestamp(&mut self) -> Result<Timestamp> {
        self.skip_ws();
        let text = self.take_while(|c| !matches!(c, ',' | ']' | ')' | '}'));
        Timestamp::parse(text.trim())
    }
}

/// The one grammar production that differs between `Temporal<GeomPoint>`
/// (`POINT(x y [z])`) and the scalar base types (bare int/float literals,
/// single-quoted text). Every other production — set/sequence delimiters,
/// `@`, the `SRID=` prefix — is shared and lives in the free functions
/// below, generic over any `V: TextCodec`.
trait TextCodec: BaseValue + Sized {
    fn parse_literal(r: &mut Reader, srid: i32) -> Result<Self>;
    fn emit_literal(&self) -> String;
}

impl TextCodec for GeomPoint {
    fn parse_literal(r: &mut Reader, srid: i32) -> Result<Self> {
        r.parse_point(srid)
    }

    fn emit_literal(&self) -> String {
        emit_point(self)
    }
}

impl TextCodec for i64 {
    fn parse_literal(r: &mut Reader, _srid: i32) -> Result<Self> {
        r.parse_int_literal()
    }

    fn emit_literal(&self) -> String {
        self.to_string()
    }
}

impl TextCodec for f64 {
    fn parse_literal(r: &mut Reader, _srid: i32) -> Result<Self> {
        r.parse_number()
    }

    fn emit_literal(&self) -> String {
        self.to_string()
    }
}

impl TextCodec for String {
    fn parse_literal(r: &mut Reader, _srid: i32) -> Result<Self> {
        r.parse_text_literal()
    }

    fn emit_literal(&self) -> String {
        format!("'{}'", self.replace('\'', "''"))
    }
}

fn parse_instant<V: TextCodec>(r: &mut Reader, srid: i32) -> Result<Instant<V>> {
    let value = V::parse_literal(r, srid)?;
    r.expect_char('@')?;
    let t = r.parse_timestamp()?;
    Ok(Instant::new(value, t))
}

fn parse_instant_list<V: TextCodec>(r: &mut Reader, srid: i32, close: char) -> Result<Vec<Instant<V>>> {
    let mut out = vec![parse_instant::<V>(r, srid)?];
    while r.try_expect_char(',') {
        out.push(parse_instant::<V>(r, srid)?);
    }
    r.expect_char(close)?;
    Ok(out)
}

fn parse_sequence<V: TextCodec>(r: &mut Reader, srid: i32) -> Result<Sequence<V>> {
    let lower_inc = if r.try_expect_char('[') {
        true
    } else {
        r.expect_char('(')?;
        false
    };
    let mut instants = vec![parse_instant::<V>(r, srid)?];
    let mut upper_inc = false;
    loop {
        if r.try_expect_char(']') {
            upper_inc = true;
            break;
        }
        if r.try_expect_char(')') {
            upper_inc = false;
            break;
        }
        r.expect_char(',')?;
        instants.push(parse_instant::<V>(r, srid)?);
    }
    let interp = if V::CONTINUOUS { Interpolation::Linear } else { Interpolation::Step };
    Ok(Sequence::new(instants, lower_inc, upper_inc, interp)?)
}

/// Parses the textual grammar into a `Temporal<V>`. If an `SRID=` prefix
/// is present, every point parsed is assigned that SRID (scalar base
/// types ignore it — the grammar carries no per-point SRID of its own).
fn parse_temporal<V: TextCodec>(input: &str) -> Result<Temporal<V>> {
    let mut r = Reader::new(input);
    let srid = r.parse_srid_prefix()?.unwrap_or(0);
    r.skip_ws();

    match r.peek() {
        Some('{') => {
            r.pos += 1;
            r.skip_ws();
            match r.peek() {
                Some('[') | Some('(') => {
                    let mut sequences = vec![parse_sequence::<V>(&mut r, srid)?];
                    while r.try_expect_char(',') {
                        sequences.push(parse_sequence::<V>(&mut r, srid)?);
                    }
                    r.expect_char('}')?;
                    Ok(Temporal::SequenceSet(SequenceSet::new(sequences)?))
                }
                _ => {
                    let instants = parse_instant_list::<V>(&mut r, srid, '}')?;
                    Ok(Temporal::InstantSet(InstantSet::new(instants)?))
                }
            }
        }
        Some('[') | Some('(') => Ok(Temporal::Sequence(parse_sequence::<V>(&mut r, srid)?)),
        Some(_) => Ok(Temporal::Instant(parse_instant::<V>(&mut r, srid)?)),
        None => Err(ChronoError::InvalidTextRepresentation("empty input".into())),
    }
}

fn emit_point(p: &GeomPoint) -> String {
    match p.z() {
        Some(z) => format!("POINT({} {} {})", p.x(), p.y(), z),
        None => format!("POINT({} {})", p.x(), p.y()),
    }
}

fn emit_instant<V: TextCodec>(i: &Instant<V>) -> String {
    format!("{}@{}", i.value().emit_literal(), i.timestamp())
}

fn emit_sequence<V: TextCodec>(s: &Sequence<V>) -> String {
    let open = if s.lower_inc() { '[' } else { '(' };
    let close = if s.upper_inc() { ']' } else { ')' };
    let body = s.instants().iter().map(emit_instant).collect::<Vec<_>>().join(",");
    format!("{open}{body}{close}")
}

/// The exact inverse of `parse_temporal`, omitting the `SRID=` prefix
/// (callers that need it write it themselves, since SRID isn't tracked
/// on `Temporal` itself).
fn emit_temporal<V: TextCodec>(t: &Temporal<V>) -> String {
    match t {
        Temporal::Instant(i) => emit_instant(i),
        Temporal::InstantSet(s) => {
            let body = s.instants().iter().map(emit_instant).collect::<Vec<_>>().join(",");
            format!("{{{body}}}")
        }
        Temporal::Sequence(s) => emit_sequence(s),
        Temporal::SequenceSet(s) => {
            let body = s.sequences().iter().map(emit_sequence).collect::<Vec<_>>().join(",");
            format!("{{{body}}}")
        }
    }
}

pub fn parse_temporal_point(input: &str) -> Result<Temporal<GeomPoint>> {
    parse_temporal::<GeomPoint>(input)
}

pub fn emit_temporal_point(t: &Temporal<GeomPoint>) -> String {
    emit_temporal(t)
}

pub fn parse_temporal_int(input: &str) -> Result<Temporal<i64>> {
    parse_temporal::<i64>(input)
}

pub fn emit_temporal_int(t: &Temporal<i64>) -> String {
    emit_temporal(t)
}

pub fn parse_temporal_float(input: &str) -> Result<Temporal<f64>> {
    parse_temporal::<f64>(input)
}

pub fn emit_temporal_float(t: &Temporal<f64>) -> String {
    emit_temporal(t)
}

pub fn parse_temporal_text(input: &str) -> Result<Temporal<String>> {
    parse_temporal::<String>(input)
}

pub fn emit_temporal_text(t: &Temporal<String>) -> String {
    emit_temporal(t)
}
