//! Argument and group specifications.
//!
//! [`ArgSpec`] is the builder-side description of one argument: flag names
//! or positional name plus the per-argument options the engine recognizes
//! (kind, value type, default, allowed values, required, help, value display
//! name, destination override). The node translates it into a `clap::Arg`
//! and records a [`DestSpec`] so dispatch can lift the parsed value back out
//! with the right type.

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction};

/// How an argument consumes the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Presence flag, `--verbose`.
    Flag,
    /// Occurrence counter, `-vvv`.
    Count,
    /// Single value.
    Value,
    /// Repeated value, collected in order.
    Values,
}

/// Target type for value conversion, applied through clap's value parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    #[default]
    Str,
    Int,
    Float,
    Bool,
    Path,
}

/// Extraction recipe recorded per argument: enough to pull the typed value
/// out of the engine's matches at dispatch time.
#[derive(Debug, Clone)]
pub(crate) struct DestSpec {
    pub(crate) dest: String,
    pub(crate) kind: ArgKind,
    pub(crate) vtype: ValueType,
}

/// Declarative description of one argument.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    name: String,
    positional: bool,
    short: Option<char>,
    kind: ArgKind,
    vtype: ValueType,
    required: bool,
    default: Option<String>,
    choices: Vec<String>,
    help: Option<String>,
    value_name: Option<String>,
    dest: Option<String>,
}

impl ArgSpec {
    fn new(name: &str, positional: bool, kind: ArgKind) -> Self {
        Self {
            name: name.to_string(),
            positional,
            short: None,
            kind,
            vtype: ValueType::Str,
            required: false,
            default: None,
            choices: Vec::new(),
            help: None,
            value_name: None,
            dest: None,
        }
    }

    /// An option taking one value: `--name <VALUE>`.
    pub fn option(long: &str) -> Self {
        Self::new(long, false, ArgKind::Value)
    }

    /// A positional argument.
    pub fn positional(name: &str) -> Self {
        Self::new(name, true, ArgKind::Value)
    }

    /// A presence flag: `--verbose`.
    pub fn flag(long: &str) -> Self {
        Self::new(long, false, ArgKind::Flag)
    }

    /// An occurrence counter: `-v -v -v`.
    pub fn counted(long: &str) -> Self {
        Self::new(long, false, ArgKind::Count)
    }

    /// Add a one-letter alias.
    pub fn short(mut self, c: char) -> Self {
        self.short = Some(c);
        self
    }

    /// Collect repeated occurrences into a list (`nargs`-style).
    pub fn many(mut self) -> Self {
        self.kind = ArgKind::Values;
        self
    }

    /// Convert values to the given type before delivery.
    pub fn value_type(mut self, vtype: ValueType) -> Self {
        self.vtype = vtype;
        self
    }

    pub fn required(mut self, yes: bool) -> Self {
        self.required = yes;
        self
    }

    /// Default applied when the argument is not supplied. The text runs
    /// through the same value conversion as user input.
    pub fn default_value(mut self, value: &str) -> Self {
        self.default = Some(value.to_string());
        self
    }

    /// Restrict values to a fixed set. Choices imply string values.
    pub fn choices<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = items.into_iter().map(Into::into).collect();
        self.vtype = ValueType::Str;
        self
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help = Some(text.to_string());
        self
    }

    /// Display name used in usage text (`metavar`).
    pub fn value_name(mut self, name: &str) -> Self {
        self.value_name = Some(name.to_string());
        self
    }

    /// Override the destination name values are delivered under.
    pub fn dest(mut self, dest: &str) -> Self {
        self.dest = Some(dest.to_string());
        self
    }

    /// Destination name: explicit override, else the flag/positional name
    /// with dashes folded to underscores.
    pub(crate) fn dest_name(&self) -> String {
        match &self.dest {
            Some(dest) => dest.clone(),
            None => self.name.replace('-', "_"),
        }
    }

    /// Effective value type: choices always deliver strings, whatever order
    /// `choices` and `value_type` were called in.
    fn effective_vtype(&self) -> ValueType {
        if self.choices.is_empty() {
            self.vtype
        } else {
            ValueType::Str
        }
    }

    pub(crate) fn dest_spec(&self) -> DestSpec {
        DestSpec {
            dest: self.dest_name(),
            kind: self.kind,
            vtype: self.effective_vtype(),
        }
    }

    /// Translate into a `clap::Arg`, attaching group memberships for the
    /// target group and all of its ancestors.
    pub(crate) fn build(&self, groups: &[String]) -> Arg {
        let mut arg = Arg::new(self.dest_name());
        if !self.positional {
            arg = arg.long(self.name.clone());
        }
        if let Some(c) = self.short {
            arg = arg.short(c);
        }
        arg = match self.kind {
            ArgKind::Flag => arg.action(ArgAction::SetTrue),
            ArgKind::Count => arg.action(ArgAction::Count),
            ArgKind::Value => arg.action(ArgAction::Set),
            ArgKind::Values => {
                // Positional lists are greedy; repeated options accumulate
                // one value per occurrence.
                if self.positional {
                    arg.action(ArgAction::Set).num_args(1..)
                } else {
                    arg.action(ArgAction::Append)
                }
            }
        };
        if matches!(self.kind, ArgKind::Value | ArgKind::Values) {
            arg = if self.choices.is_empty() {
                match self.vtype {
                    ValueType::Str => arg.value_parser(clap::value_parser!(String)),
                    ValueType::Int => arg.value_parser(clap::value_parser!(i64)),
                    ValueType::Float => arg.value_parser(clap::value_parser!(f64)),
                    ValueType::Bool => arg.value_parser(clap::value_parser!(bool)),
                    ValueType::Path => arg.value_parser(clap::value_parser!(std::path::PathBuf)),
                }
            } else {
                arg.value_parser(PossibleValuesParser::new(self.choices.clone()))
            };
        }
        if self.required {
            arg = arg.required(true);
        }
        if let Some(default) = &self.default {
            arg = arg.default_value(default.clone());
        }
        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }
        if let Some(value_name) = &self.value_name {
            arg = arg.value_name(value_name.clone());
        }
        if !groups.is_empty() {
            arg = arg.groups(groups.to_vec());
        }
        arg
    }
}

/// Declarative description of an argument group.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    pub(crate) name: String,
    pub(crate) parent: Option<String>,
    pub(crate) mutually_exclusive: bool,
    pub(crate) required: bool,
}

impl GroupSpec {
    /// An ordinary group: members may be combined freely.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            mutually_exclusive: false,
            required: false,
        }
    }

    /// A mutually-exclusive group: at most one member may be supplied.
    pub fn mutually_exclusive(name: &str) -> Self {
        Self {
            mutually_exclusive: true,
            ..Self::new(name)
        }
    }

    /// Nest under an existing group; members join the parent group too.
    pub fn under(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    /// Require that at least one member is supplied.
    pub fn required(mut self, yes: bool) -> Self {
        self.required = yes;
        self
    }
}
