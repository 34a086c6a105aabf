//! Error types for tree registration and dispatch.
//!
//! Registration mistakes ([`BuildError`]) are programmer errors and surface
//! synchronously from the builder methods. Dispatch-time failures
//! ([`DispatchError`]) split into usage errors owned by clap and
//! configuration errors exposed by the first dispatch that hits them.

use thiserror::Error;

/// Registration-time configuration error.
///
/// Every variant represents a programmer mistake in the build phase and
/// should fail loudly before any command line is ever parsed.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The named argument group was never registered on this node.
    #[error("unknown argument group `{group}` on command `{command}`")]
    UnknownGroup { command: String, group: String },

    /// An argument group with this name already exists on this node.
    #[error("argument group `{group}` already registered on command `{command}`")]
    DuplicateGroup { command: String, group: String },

    /// `subcommands()` was called twice on the same node.
    #[error("command `{command}` already has a subcommand selector")]
    AlreadyHasChildren { command: String },

    /// A child was attached before `subcommands()` declared the selector.
    #[error("command `{command}` does not accept subcommands; call subcommands() first")]
    NoChildSelector { command: String },

    /// Two arguments on the same node share a destination name.
    #[error("duplicate argument destination `{dest}` on command `{command}`")]
    DuplicateArgument { command: String, dest: String },

    /// Two children under the same selector share a name.
    #[error("duplicate subcommand `{child}` under command `{command}`")]
    DuplicateCommand { command: String, child: String },
}

/// Call-time dispatch error.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Malformed input: unknown flag, missing required argument, invalid
    /// value, unknown subcommand. Also carries the help/version short
    /// circuits. Owned entirely by the engine; `run()` forwards it to
    /// [`clap::Error::exit`].
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// The parsed mapping carries a destination the handler never declared.
    #[error("handler `{handler}` does not declare parameter `{dest}`")]
    UnexpectedArgument { handler: String, dest: String },

    /// The handler declares a parameter no argument produces.
    #[error("no value for parameter `{param}` of handler `{handler}`")]
    MissingParameter { handler: String, param: String },

    /// A method handler was dispatched without a bound instance.
    #[error("handler `{handler}` is a method but no instance was bound")]
    UnboundMethod { handler: String },
}

impl DispatchError {
    /// True when the error came from the engine's usage machinery rather
    /// than a configuration mistake.
    pub fn is_usage(&self) -> bool {
        matches!(self, DispatchError::Usage(_))
    }
}
