//! Output dialects and line layouts.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Textual output dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Human-oriented, tab-separated, one metric per line.
    #[default]
    Tabular,
    /// Machine-oriented, semicolon-separated, may pack an entity on one line.
    Delimited,
}

impl Dialect {
    /// Field separator written before every label and value.
    pub const fn separator(self) -> &'static str {
        match self {
            Self::Tabular => "\t",
            Self::Delimited => ";",
        }
    }

    /// Whether every field ends its line regardless of the caller's flags.
    pub const fn always_terminates(self) -> bool {
        matches!(self, Self::Tabular)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tabular => write!(f, "tabular"),
            Self::Delimited => write!(f, "delimited"),
        }
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tabular" | "ppc" | "tab" => Ok(Self::Tabular),
            "delimited" | "db" | "csv" => Ok(Self::Delimited),
            other => Err(Error::InvalidConfig(format!("unknown output format '{other}'"))),
        }
    }
}

/// How an entity's metrics are laid out across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One metric per line, each line led by the record prefix.
    #[default]
    Vertical,
    /// All metrics of a record on one line.
    Horizontal,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertical => write!(f, "vertical"),
            Self::Horizontal => write!(f, "horizontal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators() {
        assert_eq!(Dialect::Tabular.separator(), "\t");
        assert_eq!(Dialect::Delimited.separator(), ";");
    }

    #[test]
    fn only_tabular_always_terminates() {
        assert!(Dialect::Tabular.always_terminates());
        assert!(!Dialect::Delimited.always_terminates());
    }

    #[test]
    fn parse_dialect_aliases() {
        assert_eq!("tabular".parse::<Dialect>().unwrap(), Dialect::Tabular);
        assert_eq!("ppc".parse::<Dialect>().unwrap(), Dialect::Tabular);
        assert_eq!("db".parse::<Dialect>().unwrap(), Dialect::Delimited);
        assert!("xml".parse::<Dialect>().is_err());
    }
}
