//! The evaluator.
//!
//! `EvalContext` owns a host and the active container. Evaluation walks the
//! arena recursively; each step is a boxed future so the recursion has a
//! nameable type, and every poll runs under `ensure_sufficient_stack`.

mod eval;
mod place;
mod scope_guard;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use scvd_ir::{ExprArena, ExprId};
use scvd_parse::ParseResult;
use scvd_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::errors::{EvalError, EvalResult, MissingIntrinsic};
use crate::host::EvalHost;
use crate::{ContainerRef, Value};

pub(crate) use eval::is_colon_path;
pub use scope_guard::ScopedContainer;

/// Evaluation state: the host and the container whose keys shadow globals.
pub struct EvalContext<H> {
    host: H,
    container: Option<ContainerRef>,
}

impl<H> EvalContext<H> {
    pub fn new(host: H) -> Self {
        EvalContext {
            host,
            container: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn container(&self) -> Option<ContainerRef> {
        self.container
    }

    pub fn set_container(&mut self, container: Option<ContainerRef>) {
        self.container = container;
    }
}

impl<H: EvalHost> EvalContext<H> {
    /// Evaluate the root of a parse result in the current container.
    pub async fn evaluate(&mut self, result: &ParseResult) -> EvalResult {
        self.eval(&result.arena, result.root).await
    }

    /// Evaluate with `container` active for the duration of the call.
    ///
    /// Any failure other than a missing intrinsic becomes `Ok(None)`.
    pub async fn evaluate_parse_result(
        &mut self,
        result: &ParseResult,
        container: Option<ContainerRef>,
    ) -> Result<Option<Value>, MissingIntrinsic> {
        let mut scoped = self.scoped(container);
        match scoped.evaluate(result).await {
            Ok(value) => {
                debug!(text = %result.text, %value, "evaluated");
                Ok(Some(value))
            }
            Err(EvalError::Missing(missing)) => Err(missing),
            Err(err) => {
                debug!(text = %result.text, error = %err, "could not evaluate");
                Ok(None)
            }
        }
    }

    pub(crate) fn eval<'s>(&'s mut self, arena: &'s ExprArena, id: ExprId) -> Guarded<'s> {
        Guarded(Box::pin(self.eval_node(arena, id)))
    }
}

/// A boxed evaluation step, polled with stack headroom.
pub(crate) struct Guarded<'s>(Pin<Box<dyn Future<Output = EvalResult> + 's>>);

impl Future for Guarded<'_> {
    type Output = EvalResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<EvalResult> {
        ensure_sufficient_stack(|| self.0.as_mut().poll(cx))
    }
}
