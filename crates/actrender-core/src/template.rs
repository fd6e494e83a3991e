//! Label templates and the arguments that fill them.
//!
//! A label is written from one of two templates, one per output dialect. A
//! template is plain text with up to two `{}` placeholders:
//!
//! - `{}`: the argument as-is,
//! - `{:N}`: right-aligned to width `N`,
//! - `{:0N}`: zero-padded to width `N` (integer arguments only),
//! - `{{` / `}}`: literal braces.
//!
//! Misuse (a placeholder with no arguments, a third placeholder, zero padding
//! on text) is a bug in the calling activity and panics with the template text.

use std::io::{self, Write};

use crate::dialect::Dialect;

/// Pair of optional label templates, one per output dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DualText<'a> {
    pub tabular: Option<&'a str>,
    pub delimited: Option<&'a str>,
}

impl<'a> DualText<'a> {
    /// Templates for both dialects.
    pub const fn new(tabular: &'a str, delimited: &'a str) -> Self {
        Self {
            tabular: Some(tabular),
            delimited: Some(delimited),
        }
    }

    /// Tabular label only; delimited output gets no label for this field.
    pub const fn tabular(text: &'a str) -> Self {
        Self {
            tabular: Some(text),
            delimited: None,
        }
    }

    /// Delimited label only.
    pub const fn delimited(text: &'a str) -> Self {
        Self {
            tabular: None,
            delimited: Some(text),
        }
    }

    /// No label in either dialect: the value is glued to the previous field.
    pub const fn none() -> Self {
        Self {
            tabular: None,
            delimited: None,
        }
    }

    /// The template belonging to `dialect`, if any.
    pub fn select(&self, dialect: Dialect) -> Option<&'a str> {
        match dialect {
            Dialect::Tabular => self.tabular,
            Dialect::Delimited => self.delimited,
        }
    }
}

impl<'a> From<&'a str> for DualText<'a> {
    fn from(tabular: &'a str) -> Self {
        Self::tabular(tabular)
    }
}

/// Arguments for the two placeholder slots of a template.
///
/// The variant must suit the placeholders of *both* templates of the field
/// it is used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateArgs<'a> {
    Ints(u64, u64),
    Text(&'a str, &'a str),
}

impl<'a> TemplateArgs<'a> {
    /// A single integer argument (second slot unused).
    pub const fn int(value: u64) -> Self {
        Self::Ints(value, 0)
    }

    /// A single text argument (second slot unused).
    pub const fn text(value: &'a str) -> Self {
        Self::Text(value, "")
    }

    fn slot(&self, index: usize) -> Arg<'a> {
        match (*self, index) {
            (Self::Ints(a, _), 0) => Arg::Int(a),
            (Self::Ints(_, b), _) => Arg::Int(b),
            (Self::Text(a, _), 0) => Arg::Text(a),
            (Self::Text(_, b), _) => Arg::Text(b),
        }
    }
}

#[derive(Clone, Copy)]
enum Arg<'a> {
    Int(u64),
    Text(&'a str),
}

#[derive(Clone, Copy)]
struct Pad {
    width: usize,
    zero: bool,
}

fn parse_pad(template: &str, spec: &str) -> Pad {
    let Some(spec) = spec.strip_prefix(':') else {
        if spec.is_empty() {
            return Pad {
                width: 0,
                zero: false,
            };
        }
        panic!("invalid placeholder {{{spec}}} in template {template:?}");
    };
    let zero = spec.len() > 1 && spec.starts_with('0');
    let digits = if zero { &spec[1..] } else { spec };
    match digits.parse::<usize>() {
        Ok(width) => Pad { width, zero },
        Err(_) => panic!("invalid placeholder width {spec:?} in template {template:?}"),
    }
}

fn write_arg<W: Write>(out: &mut W, template: &str, arg: Arg<'_>, pad: Pad) -> io::Result<()> {
    let width = pad.width;
    match arg {
        Arg::Int(v) if pad.zero => write!(out, "{v:0width$}"),
        Arg::Int(v) => write!(out, "{v:>width$}"),
        Arg::Text(_) if pad.zero => {
            panic!("zero-padded placeholder in template {template:?} requires integer arguments")
        }
        Arg::Text(s) => write!(out, "{s:>width$}"),
    }
}

/// Write `template` to `out`, filling placeholders from `args`.
pub(crate) fn write_template<W: Write>(
    out: &mut W,
    template: &str,
    args: Option<&TemplateArgs<'_>>,
) -> io::Result<()> {
    let bytes = template.as_bytes();
    let mut literal_start = 0;
    let mut slot = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                out.write_all(&bytes[literal_start..=i])?;
                i += 2;
                literal_start = i;
            }
            b'{' => {
                out.write_all(&bytes[literal_start..i])?;
                let Some(close) = template[i..].find('}') else {
                    panic!("unterminated placeholder in template {template:?}");
                };
                let pad = parse_pad(template, &template[i + 1..i + close]);
                let Some(args) = args else {
                    panic!("template {template:?} has a placeholder but no arguments were supplied");
                };
                if slot >= 2 {
                    panic!("template {template:?} has more than two placeholders");
                }
                write_arg(out, template, args.slot(slot), pad)?;
                slot += 1;
                i += close + 1;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                out.write_all(&bytes[literal_start..=i])?;
                i += 2;
                literal_start = i;
            }
            b'}' => panic!("unmatched '}}' in template {template:?}"),
            _ => i += 1,
        }
    }
    out.write_all(&bytes[literal_start..])
}
