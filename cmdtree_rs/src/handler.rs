//! Handler callables and their declared parameter lists.
//!
//! A handler carries its own name (the default subcommand name, standing in
//! for the original function identifier) and an optional summary (the
//! default description). It declares the parameter names it expects; the
//! resolver verifies the parsed mapping against that list before invoking.

use std::fmt;

use crate::error::DispatchError;
use crate::value::ValueMap;

enum HandlerKind<I, O> {
    /// Plain function; dispatches with or without a bound instance.
    Free(Box<dyn Fn(&ValueMap) -> O>),
    /// Method; requires an instance bound at dispatch time.
    Method(Box<dyn Fn(&I, &ValueMap) -> O>),
}

/// The callable invoked when a node is the terminus of dispatch.
pub struct Handler<I, O> {
    name: String,
    summary: Option<String>,
    params: Vec<String>,
    kind: HandlerKind<I, O>,
}

impl<I, O> Handler<I, O> {
    /// A free-function handler declaring the given parameter names.
    pub fn new<F>(name: &str, params: &[&str], f: F) -> Self
    where
        F: Fn(&ValueMap) -> O + 'static,
    {
        Self {
            name: name.to_string(),
            summary: None,
            params: params.iter().map(|p| p.to_string()).collect(),
            kind: HandlerKind::Free(Box::new(f)),
        }
    }

    /// A method handler: receives the bound instance as its receiver.
    pub fn method<F>(name: &str, params: &[&str], f: F) -> Self
    where
        F: Fn(&I, &ValueMap) -> O + 'static,
    {
        Self {
            name: name.to_string(),
            summary: None,
            params: params.iter().map(|p| p.to_string()).collect(),
            kind: HandlerKind::Method(Box::new(f)),
        }
    }

    /// One-line description; used as the default command description.
    pub fn summary(mut self, text: &str) -> Self {
        self.summary = Some(text.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn summary_text(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub(crate) fn params(&self) -> &[String] {
        &self.params
    }

    pub(crate) fn is_method(&self) -> bool {
        matches!(self.kind, HandlerKind::Method(_))
    }

    /// Verify the mapping against the declared parameters, then call.
    ///
    /// The mapping must cover the declared names exactly: an extra entry or
    /// a missing one is a configuration error, not a usage error.
    pub(crate) fn invoke(
        &self,
        instance: Option<&I>,
        values: &ValueMap,
    ) -> Result<O, DispatchError> {
        for dest in values.keys() {
            if !self.params.iter().any(|p| p == dest) {
                return Err(DispatchError::UnexpectedArgument {
                    handler: self.name.clone(),
                    dest: dest.to_string(),
                });
            }
        }
        for param in &self.params {
            if !values.contains(param) {
                return Err(DispatchError::MissingParameter {
                    handler: self.name.clone(),
                    param: param.clone(),
                });
            }
        }
        match &self.kind {
            HandlerKind::Free(f) => Ok(f(values)),
            HandlerKind::Method(f) => match instance {
                Some(instance) => Ok(f(instance, values)),
                None => Err(DispatchError::UnboundMethod {
                    handler: self.name.clone(),
                }),
            },
        }
    }
}

impl<I, O> fmt::Debug for Handler<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("method", &self.is_method())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ArgValue, Scalar};

    #[test]
    fn free_handler_receives_values() {
        let handler: Handler<(), String> =
            Handler::new("greet", &["name"], |vals| {
                format!("hello {}", vals.str_of("name").unwrap_or("?"))
            });
        let mut vals = ValueMap::new();
        vals.insert("name", ArgValue::One(Scalar::Str("world".into())));
        assert_eq!(handler.invoke(None, &vals).unwrap(), "hello world");
    }

    #[test]
    fn extra_entry_is_unexpected_argument() {
        let handler: Handler<(), ()> = Handler::new("noop", &[], |_| ());
        let mut vals = ValueMap::new();
        vals.insert("stray", ArgValue::Absent);
        let err = handler.invoke(None, &vals).unwrap_err();
        assert!(matches!(err, DispatchError::UnexpectedArgument { .. }));
    }

    #[test]
    fn missing_entry_is_missing_parameter() {
        let handler: Handler<(), ()> = Handler::new("greet", &["name"], |_| ());
        let err = handler.invoke(None, &ValueMap::new()).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::MissingParameter { ref param, .. } if param == "name"
        ));
    }

    #[test]
    fn method_without_instance_fails() {
        let handler: Handler<u32, u32> = Handler::method("status", &[], |n, _| *n);
        let err = handler.invoke(None, &ValueMap::new()).unwrap_err();
        assert!(matches!(err, DispatchError::UnboundMethod { .. }));
        assert_eq!(handler.invoke(Some(&7), &ValueMap::new()).unwrap(), 7);
    }
}
