//! The field renderer shared by both output dialects.
//!
//! Every metric of every activity goes through [`FieldRenderer::render`],
//! which writes one separator-led label (optional) and one separator-led
//! value, deciding where lines start and end:
//!
//! ```text
//! [prefix] [<sep> label] <sep> value [\n]
//! ```
//!
//! The prefix is written only at the start of a line in vertical layout.
//! A line ends after a field flagged [`RenderFlags::NEWLINE`], and after
//! *every* field in the tabular dialect.

use std::io::{self, Write};
use std::ops::{BitOr, BitOrAssign};

use crate::dialect::{Dialect, Layout};
use crate::template::{DualText, TemplateArgs, write_template};

/// Placeholder for the integer slot of a rate field.
pub const NO_VALUE: u64 = 0;
/// Placeholder for the rate slot of an integer field.
pub const NO_RATE: f64 = 0.0;

/// Per-call rendering flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderFlags(u8);

impl RenderFlags {
    pub const NONE: Self = Self(0);
    /// Format the integer value instead of the two-decimal rate.
    pub const USE_INT: Self = Self(1);
    /// This field ends the current logical line.
    pub const NEWLINE: Self = Self(1 << 1);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for RenderFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for RenderFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// One metric to render: label templates, optional arguments and a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field<'a> {
    pub text: DualText<'a>,
    pub args: Option<TemplateArgs<'a>>,
    pub flags: RenderFlags,
    pub int_value: u64,
    pub rate_value: f64,
}

impl<'a> Field<'a> {
    /// A rate field, printed with two decimals.
    pub fn rate(text: impl Into<DualText<'a>>, value: f64) -> Self {
        Self {
            text: text.into(),
            args: None,
            flags: RenderFlags::NONE,
            int_value: NO_VALUE,
            rate_value: value,
        }
    }

    /// An integer field, printed in plain decimal.
    pub fn int(text: impl Into<DualText<'a>>, value: u64) -> Self {
        Self {
            text: text.into(),
            args: None,
            flags: RenderFlags::USE_INT,
            int_value: value,
            rate_value: NO_RATE,
        }
    }

    /// Attach placeholder arguments.
    pub fn args(mut self, args: TemplateArgs<'a>) -> Self {
        self.args = Some(args);
        self
    }

    /// Add flags (typically the activity's end-of-line flag).
    pub fn flags(mut self, flags: RenderFlags) -> Self {
        self.flags |= flags;
        self
    }
}

/// Stateful field writer for one report pass.
///
/// Owns the line state ("does the next field start a new line?") together
/// with the dialect and layout, which stay fixed for the renderer's lifetime.
pub struct FieldRenderer<W: Write> {
    out: W,
    dialect: Dialect,
    layout: Layout,
    newline: bool,
    /// A horizontal record line has been started and not yet terminated.
    open_line: bool,
}

impl<W: Write> FieldRenderer<W> {
    pub fn new(out: W, dialect: Dialect, layout: Layout) -> Self {
        Self {
            out,
            dialect,
            layout,
            newline: true,
            open_line: false,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Whether the next rendered field starts a new line.
    pub fn at_line_start(&self) -> bool {
        self.newline
    }

    /// Forget any partially written line: the next field starts a new one.
    pub fn reset_line(&mut self) {
        self.newline = true;
    }

    /// Flag an activity passes on the last metric of an entity.
    pub fn line_end(&self) -> RenderFlags {
        match self.layout {
            Layout::Vertical => RenderFlags::NEWLINE,
            Layout::Horizontal => RenderFlags::NONE,
        }
    }

    /// Render one field.
    pub fn render(&mut self, prefix: &str, field: &Field<'_>) -> io::Result<()> {
        if self.newline && self.layout == Layout::Vertical {
            self.out.write_all(prefix.as_bytes())?;
        }

        self.newline =
            field.flags.contains(RenderFlags::NEWLINE) || self.dialect.always_terminates();

        let sep = self.dialect.separator();
        if let Some(template) = field.text.select(self.dialect) {
            self.out.write_all(sep.as_bytes())?;
            write_template(&mut self.out, template, field.args.as_ref())?;
        }

        if field.flags.contains(RenderFlags::USE_INT) {
            write!(self.out, "{sep}{}", field.int_value)?;
        } else {
            write!(self.out, "{sep}{:.2}", field.rate_value)?;
        }

        if self.newline {
            self.out.write_all(b"\n")?;
        }
        self.open_line = !self.newline;
        Ok(())
    }

    /// Start a record (one sample). Horizontal lines get their prefix here,
    /// since [`render`](Self::render) never writes it in that layout.
    pub fn begin_record(&mut self, prefix: &str) -> io::Result<()> {
        self.newline = true;
        if self.layout == Layout::Horizontal {
            self.out.write_all(prefix.as_bytes())?;
            self.open_line = true;
        }
        Ok(())
    }

    /// Finish a record, closing a horizontal line that is still open.
    pub fn end_record(&mut self) -> io::Result<()> {
        if self.layout == Layout::Horizontal && self.open_line {
            self.out.write_all(b"\n")?;
        }
        self.newline = true;
        self.open_line = false;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(dialect: Dialect, layout: Layout) -> FieldRenderer<Vec<u8>> {
        FieldRenderer::new(Vec::new(), dialect, layout)
    }

    fn output(r: FieldRenderer<Vec<u8>>) -> String {
        String::from_utf8(r.into_inner()).unwrap()
    }

    #[test]
    fn tabular_field_with_prefix() {
        let mut r = renderer(Dialect::Tabular, Layout::Vertical);
        r.render("host\t600\tT", &Field::rate("-\tproc/s", 1.5)).unwrap();
        assert_eq!(output(r), "host\t600\tT\t-\tproc/s\t1.50\n");
    }

    #[test]
    fn tabular_terminates_every_field() {
        let mut r = renderer(Dialect::Tabular, Layout::Vertical);
        r.render("P", &Field::rate("-\ta", 1.0)).unwrap();
        r.render("P", &Field::rate("-\tb", 2.0)).unwrap();
        assert_eq!(output(r), "P\t-\ta\t1.00\nP\t-\tb\t2.00\n");
    }

    #[test]
    fn delimited_fields_glue_until_newline_flag() {
        let mut r = renderer(Dialect::Delimited, Layout::Vertical);
        let text = DualText::new("cpu{}\t%user", "{}");
        r.render("h;600;T", &Field::rate(text, 12.0).args(TemplateArgs::int(0)))
            .unwrap();
        r.render("h;600;T", &Field::rate("cpu{}\t%nice", 0.0).args(TemplateArgs::int(0)))
            .unwrap();
        r.render(
            "h;600;T",
            &Field::rate("cpu{}\t%idle", 88.0)
                .args(TemplateArgs::int(0))
                .flags(RenderFlags::NEWLINE),
        )
        .unwrap();
        assert_eq!(output(r), "h;600;T;0;12.00;0.00;88.00\n");
    }

    #[test]
    fn integer_flag_prints_plain_decimal() {
        let mut r = renderer(Dialect::Tabular, Layout::Vertical);
        r.render("", &Field::int("-\tkbmemfree", 1_048_576)).unwrap();
        assert_eq!(output(r), "\t-\tkbmemfree\t1048576\n");
    }

    #[test]
    fn rate_rounds_exact_binary_value() {
        let mut r = renderer(Dialect::Delimited, Layout::Vertical);
        r.render("", &Field::rate(DualText::none(), 12.345)).unwrap();
        r.render("", &Field::rate(DualText::none(), 2.675)).unwrap();
        r.render("", &Field::rate(DualText::none(), 0.0)).unwrap();
        r.render("", &Field::rate(DualText::none(), 100.0)).unwrap();
        assert_eq!(output(r), ";12.34;2.67;0.00;100.00");
    }

    #[test]
    fn vertical_single_newline_at_end() {
        let mut r = renderer(Dialect::Delimited, Layout::Vertical);
        for i in 0..5 {
            let flags = if i == 4 {
                RenderFlags::NEWLINE
            } else {
                RenderFlags::NONE
            };
            r.render("p", &Field::rate(DualText::none(), f64::from(i)).flags(flags))
                .unwrap();
        }
        let out = output(r);
        assert_eq!(out.matches('\n').count(), 1);
        assert!(out.ends_with('\n'));
        assert_eq!(out, "p;0.00;1.00;2.00;3.00;4.00\n");
    }

    #[test]
    fn horizontal_never_writes_prefix_from_render() {
        let mut r = renderer(Dialect::Delimited, Layout::Horizontal);
        assert_eq!(r.line_end(), RenderFlags::NONE);
        r.render("p", &Field::rate(DualText::delimited("-1"), 1.0)).unwrap();
        r.render("p", &Field::rate(DualText::none(), 2.0)).unwrap();
        assert!(!r.at_line_start());
        assert_eq!(output(r), ";-1;1.00;2.00");
    }

    #[test]
    fn horizontal_record_wraps_with_prefix_and_newline() {
        let mut r = renderer(Dialect::Delimited, Layout::Horizontal);
        r.begin_record("h;600;T").unwrap();
        r.render("h;600;T", &Field::rate(DualText::delimited("-1"), 5.0)).unwrap();
        r.render("h;600;T", &Field::int(DualText::none(), 7)).unwrap();
        r.end_record().unwrap();
        assert_eq!(output(r), "h;600;T;-1;5.00;7\n");
    }

    #[test]
    fn end_record_after_terminated_line_adds_nothing() {
        let mut r = renderer(Dialect::Delimited, Layout::Horizontal);
        r.begin_record("p").unwrap();
        r.render("p", &Field::rate(DualText::none(), 1.0).flags(RenderFlags::NEWLINE))
            .unwrap();
        r.end_record().unwrap();
        assert_eq!(output(r), "p;1.00\n");
    }

    #[test]
    fn empty_horizontal_record_is_still_a_line() {
        let mut r = renderer(Dialect::Delimited, Layout::Horizontal);
        r.begin_record("p").unwrap();
        r.end_record().unwrap();
        assert_eq!(output(r), "p\n");
    }

    #[test]
    fn horizontal_tabular_still_terminates() {
        let mut r = renderer(Dialect::Tabular, Layout::Horizontal);
        r.render("p", &Field::rate("-\ta", 1.0)).unwrap();
        r.render("p", &Field::rate("-\tb", 2.0)).unwrap();
        assert_eq!(output(r), "\t-\ta\t1.00\n\t-\tb\t2.00\n");
    }

    #[test]
    fn reset_line_restarts_prefix() {
        let mut r = renderer(Dialect::Delimited, Layout::Vertical);
        r.render("p", &Field::rate(DualText::none(), 1.0)).unwrap();
        assert!(!r.at_line_start());
        r.reset_line();
        assert!(r.at_line_start());
        r.render("q", &Field::rate(DualText::none(), 2.0).flags(RenderFlags::NEWLINE))
            .unwrap();
        assert_eq!(output(r), "p;1.00q;2.00\n");
    }

    #[test]
    fn flags_combine() {
        let f = RenderFlags::USE_INT | RenderFlags::NEWLINE;
        assert!(f.contains(RenderFlags::USE_INT));
        assert!(f.contains(RenderFlags::NEWLINE));
        assert!(RenderFlags::NONE.is_empty());
        let field = Field::int("-\tx", 1).flags(RenderFlags::NEWLINE);
        assert_eq!(field.flags, f);
        assert_eq!(field.rate_value, NO_RATE);
    }
}
