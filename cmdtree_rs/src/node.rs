//! Command nodes and the registration-time tree builder.
//!
//! A [`CommandNode`] wraps one configured `clap::Command`, a registry of
//! named argument groups local to the node, an optional subcommand selector,
//! and exactly one handler. Registration methods mutate the node in place
//! and hand it back for chaining; `subcommand` hands back the new child so
//! grandchildren can be attached the same way.

use indexmap::IndexMap;

use crate::arg::{ArgSpec, DestSpec, GroupSpec};
use crate::error::BuildError;
use crate::handler::Handler;

/// Node-level engine configuration.
///
/// `prog` defaults to the handler's name and `description` to the handler's
/// summary, mirroring the identifier/docstring fallbacks of decorator-style
/// registration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Program or command name override.
    pub prog: Option<String>,
    /// Usage line override; by default the engine generates one.
    pub usage: Option<String>,
    /// Description shown in help.
    pub description: Option<String>,
    /// Text following the argument descriptions.
    pub epilog: Option<String>,
    /// Version string; enables `--version`.
    pub version: Option<String>,
    /// Suppress the automatic `-h/--help` flag.
    pub disable_help_flag: bool,
    /// Accept unambiguous long-flag abbreviations.
    pub infer_long_args: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            prog: None,
            usage: None,
            description: None,
            epilog: None,
            version: None,
            disable_help_flag: false,
            // Abbreviation matching is on by default, as in the classic
            // argument-parsing engines this builder orchestrates.
            infer_long_args: true,
        }
    }
}

/// Subcommand selector configuration.
#[derive(Debug, Clone, Default)]
pub struct SelectorConfig {
    /// Selecting a child is mandatory; without one the parse fails instead
    /// of falling through to the node's own handler.
    pub required: bool,
    /// Display name for the subcommand slot in usage text.
    pub value_name: Option<String>,
    /// Help heading the subcommand list appears under.
    pub help_heading: Option<String>,
    /// Accept unambiguous subcommand-name prefixes.
    pub infer: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct GroupEntry {
    pub(crate) parent: Option<String>,
}

/// One level of a command tree.
///
/// `I` is the receiver type for method handlers (`()` for trees of free
/// functions), `O` the handler output type.
#[derive(Debug)]
pub struct CommandNode<I = (), O = ()> {
    pub(crate) engine: clap::Command,
    pub(crate) groups: IndexMap<String, GroupEntry>,
    pub(crate) selector: Option<SelectorConfig>,
    pub(crate) children: IndexMap<String, CommandNode<I, O>>,
    pub(crate) dests: Vec<DestSpec>,
    pub(crate) handler: Handler<I, O>,
}

impl<I, O> CommandNode<I, O> {
    /// Construct the root of a command tree.
    ///
    /// Token sequences passed to the dispatch methods are arguments only;
    /// the process name is not expected as the first token.
    pub fn root(config: NodeConfig, handler: Handler<I, O>) -> Self {
        let name = config
            .prog
            .clone()
            .unwrap_or_else(|| handler.name().to_string());
        let engine = build_engine(name, &config, handler.summary_text()).no_binary_name(true);
        Self {
            engine,
            groups: IndexMap::new(),
            selector: None,
            children: IndexMap::new(),
            dests: Vec::new(),
            handler,
        }
    }

    fn new_child(name: String, config: NodeConfig, handler: Handler<I, O>) -> Self {
        let engine = build_engine(name, &config, handler.summary_text());
        Self {
            engine,
            groups: IndexMap::new(),
            selector: None,
            children: IndexMap::new(),
            dests: Vec::new(),
            handler,
        }
    }

    /// The node's command name.
    pub fn name(&self) -> &str {
        self.engine.get_name()
    }

    /// The node's handler.
    pub fn handler(&self) -> &Handler<I, O> {
        &self.handler
    }

    fn with_engine(&mut self, f: impl FnOnce(clap::Command) -> clap::Command) {
        let engine = std::mem::replace(&mut self.engine, clap::Command::new(""));
        self.engine = f(engine);
    }

    /// Attach an argument directly to the node.
    pub fn arg(&mut self, spec: ArgSpec) -> Result<&mut Self, BuildError> {
        self.attach_arg(spec, None)
    }

    /// Attach an argument to a named group registered earlier.
    pub fn arg_in(&mut self, group: &str, spec: ArgSpec) -> Result<&mut Self, BuildError> {
        self.attach_arg(spec, Some(group))
    }

    fn attach_arg(&mut self, spec: ArgSpec, group: Option<&str>) -> Result<&mut Self, BuildError> {
        let dest = spec.dest_name();
        if self.dests.iter().any(|d| d.dest == dest) {
            return Err(BuildError::DuplicateArgument {
                command: self.name().to_string(),
                dest,
            });
        }
        let chain = match group {
            None => Vec::new(),
            Some(group) => self.group_chain(group)?,
        };
        let arg = spec.build(&chain);
        self.dests.push(spec.dest_spec());
        self.with_engine(|engine| engine.arg(arg));
        Ok(self)
    }

    /// Register an argument group (plain or mutually exclusive), optionally
    /// nested under an existing group.
    pub fn group(&mut self, spec: GroupSpec) -> Result<&mut Self, BuildError> {
        if self.groups.contains_key(&spec.name) {
            return Err(BuildError::DuplicateGroup {
                command: self.name().to_string(),
                group: spec.name,
            });
        }
        if let Some(parent) = &spec.parent {
            if !self.groups.contains_key(parent) {
                return Err(BuildError::UnknownGroup {
                    command: self.name().to_string(),
                    group: parent.clone(),
                });
            }
        }
        let group = clap::ArgGroup::new(spec.name.clone())
            .multiple(!spec.mutually_exclusive)
            .required(spec.required);
        self.with_engine(|engine| engine.group(group));
        self.groups
            .insert(spec.name, GroupEntry { parent: spec.parent });
        Ok(self)
    }

    /// The group and all of its ancestors, innermost first.
    fn group_chain(&self, group: &str) -> Result<Vec<String>, BuildError> {
        if !self.groups.contains_key(group) {
            return Err(BuildError::UnknownGroup {
                command: self.name().to_string(),
                group: group.to_string(),
            });
        }
        let mut chain = vec![group.to_string()];
        let mut current = group;
        while let Some(parent) = self.groups.get(current).and_then(|e| e.parent.as_deref()) {
            chain.push(parent.to_string());
            current = parent;
        }
        Ok(chain)
    }

    /// Declare that this node takes subcommands. Must be called before the
    /// first `subcommand`; calling it twice is an error.
    pub fn subcommands(&mut self, config: SelectorConfig) -> Result<&mut Self, BuildError> {
        if self.selector.is_some() {
            return Err(BuildError::AlreadyHasChildren {
                command: self.name().to_string(),
            });
        }
        let required = config.required;
        let value_name = config.value_name.clone();
        let help_heading = config.help_heading.clone();
        let infer = config.infer;
        self.with_engine(|mut engine| {
            engine = engine.subcommand_required(required);
            if let Some(value_name) = value_name {
                engine = engine.subcommand_value_name(value_name);
            }
            if let Some(heading) = help_heading {
                engine = engine.subcommand_help_heading(heading);
            }
            if infer {
                engine = engine.infer_subcommands(true);
            }
            engine
        });
        self.selector = Some(config);
        Ok(self)
    }

    /// Attach a child command and hand it back for further registration.
    ///
    /// `name` defaults to the handler's name, the description to the
    /// handler's summary.
    pub fn subcommand(
        &mut self,
        name: Option<&str>,
        config: NodeConfig,
        handler: Handler<I, O>,
    ) -> Result<&mut CommandNode<I, O>, BuildError> {
        if self.selector.is_none() {
            return Err(BuildError::NoChildSelector {
                command: self.name().to_string(),
            });
        }
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| handler.name().to_string());
        if self.children.contains_key(&name) {
            return Err(BuildError::DuplicateCommand {
                command: self.name().to_string(),
                child: name,
            });
        }
        let child = CommandNode::new_child(name.clone(), config, handler);
        Ok(self.children.entry(name).or_insert(child))
    }

    /// Re-open a child registered earlier.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut CommandNode<I, O>> {
        self.children.get_mut(name)
    }

    /// Immutable access to a child, mostly useful in tests.
    pub fn child(&self, name: &str) -> Option<&CommandNode<I, O>> {
        self.children.get(name)
    }

    /// Clone the engine tree into one parse-ready `clap::Command`.
    pub(crate) fn assemble(&self) -> clap::Command {
        let mut cmd = self.engine.clone();
        for child in self.children.values() {
            cmd = cmd.subcommand(child.assemble());
        }
        cmd
    }
}

fn build_engine(name: String, config: &NodeConfig, summary: Option<&str>) -> clap::Command {
    let mut cmd = clap::Command::new(name);
    let about = config
        .description
        .clone()
        .or_else(|| summary.map(str::to_string));
    if let Some(about) = about {
        cmd = cmd.about(about);
    }
    if let Some(usage) = &config.usage {
        cmd = cmd.override_usage(usage.clone());
    }
    if let Some(epilog) = &config.epilog {
        cmd = cmd.after_help(epilog.clone());
    }
    if let Some(version) = &config.version {
        cmd = cmd.version(version.clone());
    }
    if config.disable_help_flag {
        cmd = cmd.disable_help_flag(true);
    }
    if config.infer_long_args {
        cmd = cmd.infer_long_args(true);
    }
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::{ArgSpec, GroupSpec};

    fn noop_root() -> CommandNode<(), ()> {
        CommandNode::root(NodeConfig::default(), Handler::new("tool", &[], |_| ()))
    }

    #[test]
    fn root_name_defaults_to_handler_name() {
        assert_eq!(noop_root().name(), "tool");
        let named = CommandNode::<(), ()>::root(
            NodeConfig {
                prog: Some("other".into()),
                ..NodeConfig::default()
            },
            Handler::new("tool", &[], |_| ()),
        );
        assert_eq!(named.name(), "other");
    }

    #[test]
    fn duplicate_group_is_rejected() {
        let mut root = noop_root();
        root.group(GroupSpec::new("output")).unwrap();
        let err = root.group(GroupSpec::new("output")).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateGroup { .. }));
    }

    #[test]
    fn arg_in_unknown_group_is_rejected() {
        let mut root = noop_root();
        let err = root
            .arg_in("missing", ArgSpec::flag("verbose"))
            .unwrap_err();
        assert!(matches!(err, BuildError::UnknownGroup { ref group, .. } if group == "missing"));
    }

    #[test]
    fn nested_group_requires_known_parent() {
        let mut root = noop_root();
        let err = root
            .group(GroupSpec::new("inner").under("outer"))
            .unwrap_err();
        assert!(matches!(err, BuildError::UnknownGroup { ref group, .. } if group == "outer"));

        root.group(GroupSpec::new("outer")).unwrap();
        root.group(GroupSpec::mutually_exclusive("inner").under("outer"))
            .unwrap();
        assert_eq!(
            root.group_chain("inner").unwrap(),
            vec!["inner".to_string(), "outer".to_string()]
        );
    }

    #[test]
    fn duplicate_destination_is_rejected() {
        let mut root = noop_root();
        root.arg(ArgSpec::option("out")).unwrap();
        let err = root.arg(ArgSpec::positional("o").dest("out")).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateArgument { ref dest, .. } if dest == "out"));
    }

    #[test]
    fn subcommand_requires_selector() {
        let mut root = noop_root();
        let err = root
            .subcommand(None, NodeConfig::default(), Handler::new("sub", &[], |_| ()))
            .unwrap_err();
        assert!(matches!(err, BuildError::NoChildSelector { .. }));
    }

    #[test]
    fn selector_declared_twice_is_rejected() {
        let mut root = noop_root();
        root.subcommands(SelectorConfig::default()).unwrap();
        let err = root.subcommands(SelectorConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::AlreadyHasChildren { .. }));
    }

    #[test]
    fn duplicate_child_name_is_rejected() {
        let mut root = noop_root();
        root.subcommands(SelectorConfig::default()).unwrap();
        root.subcommand(None, NodeConfig::default(), Handler::new("sub", &[], |_| ()))
            .unwrap();
        let err = root
            .subcommand(None, NodeConfig::default(), Handler::new("sub", &[], |_| ()))
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateCommand { ref child, .. } if child == "sub"));
    }

    #[test]
    fn child_name_defaults_to_handler_name() {
        let mut root = noop_root();
        root.subcommands(SelectorConfig::default()).unwrap();
        root.subcommand(None, NodeConfig::default(), Handler::new("scan", &[], |_| ()))
            .unwrap();
        assert_eq!(root.child("scan").map(|c| c.name()), Some("scan"));
        assert!(root.child_mut("scan").is_some());
    }
}
