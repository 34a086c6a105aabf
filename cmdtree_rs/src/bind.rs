//! Instance binding for method handlers.
//!
//! [`CommandNode::bind`] pairs a tree with a receiver instance. The pair is
//! a plain borrow: the node's handler is never rewritten, so the same tree
//! serves any number of instances independently, and binding the same
//! instance twice is free. `Bound` offers no further `bind`, which makes
//! double-application of a receiver unrepresentable.

use std::ffi::OsString;

use crate::error::DispatchError;
use crate::node::CommandNode;

/// A command tree bound to a receiver instance.
pub struct Bound<'a, I, O> {
    node: &'a CommandNode<I, O>,
    instance: &'a I,
}

impl<I, O> CommandNode<I, O> {
    /// Bind the tree to a receiver. Method handlers dispatched through the
    /// result receive `instance`; free handlers ignore it.
    pub fn bind<'a>(&'a self, instance: &'a I) -> Bound<'a, I, O> {
        Bound {
            node: self,
            instance,
        }
    }
}

impl<I, O> Bound<'_, I, O> {
    /// The underlying, unbound node.
    pub fn node(&self) -> &CommandNode<I, O> {
        self.node
    }

    /// Parse `tokens` and dispatch with the bound instance.
    pub fn try_run_from<A, V>(&self, tokens: A) -> Result<O, DispatchError>
    where
        A: IntoIterator<Item = V>,
        V: Into<OsString> + Clone,
    {
        self.node.try_run_with(Some(self.instance), tokens)
    }

    /// Parse the process arguments and dispatch with the bound instance.
    pub fn run(&self) -> Result<O, DispatchError> {
        self.node.run_with(Some(self.instance))
    }
}

impl<I, O> Clone for Bound<'_, I, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, O> Copy for Bound<'_, I, O> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use crate::node::NodeConfig;

    struct Counter {
        id: u32,
    }

    fn tree() -> CommandNode<Counter, u32> {
        CommandNode::root(
            NodeConfig::default(),
            Handler::method("whoami", &[], |counter: &Counter, _| counter.id),
        )
    }

    #[test]
    fn two_instances_bind_independently() {
        let tree = tree();
        let a = Counter { id: 1 };
        let b = Counter { id: 2 };
        let bound_a = tree.bind(&a);
        let bound_b = tree.bind(&b);
        assert_eq!(bound_a.try_run_from::<_, &str>([]).unwrap(), 1);
        assert_eq!(bound_b.try_run_from::<_, &str>([]).unwrap(), 2);
        // order does not matter; the original tree is untouched
        assert_eq!(bound_a.try_run_from::<_, &str>([]).unwrap(), 1);
    }

    #[test]
    fn rebinding_the_same_instance_is_free() {
        let tree = tree();
        let a = Counter { id: 9 };
        for _ in 0..3 {
            let bound = tree.bind(&a);
            assert_eq!(bound.try_run_from::<_, &str>([]).unwrap(), 9);
        }
    }

    #[test]
    fn unbound_method_dispatch_fails() {
        let tree = tree();
        let err = tree.try_run_from::<_, &str>([]).unwrap_err();
        assert!(matches!(err, DispatchError::UnboundMethod { .. }));
    }
}
