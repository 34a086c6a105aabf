//! Call-time dispatch: parse tokens, walk to the selected leaf, invoke.
//!
//! Parsing produces the engine's matches; the resolver walks the selected
//! subcommand chain, merging each level's destinations into one flat
//! namespace (a deeper level wins on a shared name, matching the flat
//! namespace of the classic engines). Dispatch always terminates at the
//! deepest selected node; a parent handler never runs once a child was
//! selected.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::ArgMatches;
use tracing::{debug, trace};

use crate::arg::{ArgKind, DestSpec, ValueType};
use crate::error::DispatchError;
use crate::node::CommandNode;
use crate::value::{ArgValue, Scalar, ValueMap};

impl<I, O> CommandNode<I, O> {
    /// Parse `tokens` and dispatch, without a bound instance.
    ///
    /// Tokens are arguments only; do not include the process name.
    pub fn try_run_from<A, V>(&self, tokens: A) -> Result<O, DispatchError>
    where
        A: IntoIterator<Item = V>,
        V: Into<OsString> + Clone,
    {
        self.try_run_with(None, tokens)
    }

    /// Parse `tokens` and dispatch with an optionally bound instance.
    pub fn try_run_with<A, V>(&self, instance: Option<&I>, tokens: A) -> Result<O, DispatchError>
    where
        A: IntoIterator<Item = V>,
        V: Into<OsString> + Clone,
    {
        let matches = self.assemble().try_get_matches_from(tokens)?;
        self.resolve(instance, &matches)
    }

    /// Parse the process arguments and dispatch.
    ///
    /// Usage errors (and `--help`/`--version`) follow the engine's exit
    /// path; configuration errors come back as `Err`.
    pub fn run(&self) -> Result<O, DispatchError> {
        self.run_with(None)
    }

    pub(crate) fn run_with(&self, instance: Option<&I>) -> Result<O, DispatchError> {
        match self.try_run_with(instance, std::env::args_os().skip(1)) {
            Err(DispatchError::Usage(err)) => err.exit(),
            other => other,
        }
    }

    fn resolve(&self, instance: Option<&I>, matches: &ArgMatches) -> Result<O, DispatchError> {
        let mut values = ValueMap::new();
        let mut node = self;
        let mut current = matches;
        extract(current, &node.dests, &mut values);
        while let Some((name, sub)) = current.subcommand() {
            // The engine only reports names that were registered.
            let Some(child) = node.children.get(name) else {
                break;
            };
            debug!(command = name, "dispatching to subcommand");
            node = child;
            current = sub;
            extract(current, &node.dests, &mut values);
        }
        debug!(handler = node.handler.name(), "invoking handler");
        node.handler.invoke(instance, &values)
    }
}

/// Lift one node's destinations out of the engine's matches.
fn extract(matches: &ArgMatches, dests: &[DestSpec], values: &mut ValueMap) {
    for spec in dests {
        let value = match spec.kind {
            ArgKind::Flag => ArgValue::Flag(matches.get_flag(&spec.dest)),
            ArgKind::Count => ArgValue::Count(matches.get_count(&spec.dest)),
            ArgKind::Value => match one_scalar(matches, spec) {
                Some(scalar) => ArgValue::One(scalar),
                None => ArgValue::Absent,
            },
            ArgKind::Values => match many_scalars(matches, spec) {
                Some(items) => ArgValue::Many(items),
                None => ArgValue::Absent,
            },
        };
        trace!(dest = %spec.dest, ?value, "extracted argument");
        values.insert(spec.dest.clone(), value);
    }
}

fn one_scalar(matches: &ArgMatches, spec: &DestSpec) -> Option<Scalar> {
    match spec.vtype {
        ValueType::Str => matches
            .get_one::<String>(&spec.dest)
            .map(|s| Scalar::Str(s.clone())),
        ValueType::Int => matches.get_one::<i64>(&spec.dest).map(|n| Scalar::Int(*n)),
        ValueType::Float => matches
            .get_one::<f64>(&spec.dest)
            .map(|x| Scalar::Float(*x)),
        ValueType::Bool => matches
            .get_one::<bool>(&spec.dest)
            .map(|b| Scalar::Bool(*b)),
        ValueType::Path => matches
            .get_one::<PathBuf>(&spec.dest)
            .map(|p| Scalar::Path(p.clone())),
    }
}

fn many_scalars(matches: &ArgMatches, spec: &DestSpec) -> Option<Vec<Scalar>> {
    match spec.vtype {
        ValueType::Str => matches
            .get_many::<String>(&spec.dest)
            .map(|vals| vals.map(|s| Scalar::Str(s.clone())).collect()),
        ValueType::Int => matches
            .get_many::<i64>(&spec.dest)
            .map(|vals| vals.map(|n| Scalar::Int(*n)).collect()),
        ValueType::Float => matches
            .get_many::<f64>(&spec.dest)
            .map(|vals| vals.map(|x| Scalar::Float(*x)).collect()),
        ValueType::Bool => matches
            .get_many::<bool>(&spec.dest)
            .map(|vals| vals.map(|b| Scalar::Bool(*b)).collect()),
        ValueType::Path => matches
            .get_many::<PathBuf>(&spec.dest)
            .map(|vals| vals.map(|p| Scalar::Path(p.clone())).collect()),
    }
}
