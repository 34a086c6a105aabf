//! # cmdtree
//!
//! **Declarative command-tree builder** - assemble a root command plus
//! nested subcommands, attach arguments and argument groups to each node,
//! and let dispatch resolve parsed input to the right handler with parsed
//! values delivered as a named-parameter mapping.
//!
//! Argument parsing itself - flag syntax, abbreviation, validation, help
//! text - is `clap`'s job (builder API); this crate only orchestrates it.
//!
//! ## Features
//!
//! - **Tree builder** - registration methods that mutate a node in place and
//!   return it for chaining
//! - **Leaf dispatch** - once a subcommand is selected, only the leaf
//!   handler runs; values merge along the selected chain into one namespace
//! - **Typed values** - string, integer, float, bool, path, lists, flags,
//!   and counters, with explicit `Absent` for unsupplied arguments
//! - **Instance binding** - bind a tree to a receiver so method handlers get
//!   it as their first argument, exactly once, enforced by the types
//!
//! ## Quick Start
//!
//! ```rust
//! use cmdtree::{ArgSpec, CommandNode, Handler, NodeConfig, SelectorConfig};
//!
//! let mut cli = CommandNode::<(), String>::root(
//!     NodeConfig::default(),
//!     Handler::new("cli", &[], |_| String::new()),
//! );
//! cli.subcommands(SelectorConfig::default()).unwrap();
//! cli.subcommand(
//!     None,
//!     NodeConfig::default(),
//!     Handler::new("subcommand", &["hello"], |vals| {
//!         format!("hello {}", vals.str_of("hello").unwrap_or("?"))
//!     }),
//! )
//! .unwrap()
//! .arg(ArgSpec::option("hello"))
//! .unwrap();
//!
//! let out = cli.try_run_from(["subcommand", "--hello", "world"]).unwrap();
//! assert_eq!(out, "hello world");
//! ```
//!
//! Registration mistakes (duplicate groups, children without a selector,
//! parameter-name mismatches) surface as typed errors; malformed command
//! lines follow clap's usage-error path unchanged.

/// Argument and group specifications ([`ArgSpec`], [`GroupSpec`]).
pub mod arg;

/// Instance binding ([`Bound`]).
pub mod bind;

/// Dispatch resolver: token parsing and leaf invocation.
pub mod dispatch;

/// Build-time and dispatch-time error types.
pub mod error;

/// Handler callables and declared parameter lists.
pub mod handler;

/// Command nodes and the tree builder.
pub mod node;

/// Parsed value mapping delivered to handlers.
pub mod value;

pub use arg::{ArgKind, ArgSpec, GroupSpec, ValueType};
pub use bind::Bound;
pub use error::{BuildError, DispatchError};
pub use handler::Handler;
pub use node::{CommandNode, NodeConfig, SelectorConfig};
pub use value::{ArgValue, Scalar, ValueMap};

/// A command tree of free-function handlers.
pub type CommandTree<O = ()> = CommandNode<(), O>;
