//! Method tracing: a body closure is called exactly once with symbolic
//! parameters, and everything it binds becomes the method's context.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace as trace_event};

use super::{Context, OpDef, effects::check_ordering, resolve::resolve_context};
use crate::diagnostics::{CompileResult, DUPLICATE_NAME, Diagnostic};
use crate::object::{Manifest, This};
use crate::scalar::{Expr, MethodKind, validate_name};

/// Name of the key parameter of GET, PUT and DELETE methods.
pub const KEY: &str = "key";

/// Name of the value parameter of PUT methods.
pub const VALUE: &str = "value";

pub type GetBody = dyn Fn(&mut Context, &This, Expr) -> CompileResult<Expr> + Send + Sync;
pub type PutBody = dyn Fn(&mut Context, &This, Expr, Expr) -> CompileResult<Expr> + Send + Sync;
pub type PostBody = dyn Fn(&mut Context, &This, &Params) -> CompileResult<Expr> + Send + Sync;

#[derive(Clone)]
enum MethodBody {
    Get(Arc<GetBody>),
    Put(Arc<PutBody>),
    Post(Arc<PostBody>),
    Delete(Arc<GetBody>),
}

/// The declared parameters of a POST method, as references.
#[derive(Debug, Clone)]
pub struct Params {
    names: Vec<String>,
}

impl Params {
    /// A reference to the parameter `name`.
    ///
    /// An undeclared name still yields a reference; the resolution pass reports it.
    pub fn get(&self, name: &str) -> Expr {
        Expr::id(name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// A method kind, its parameter names and the closure that builds its body.
#[derive(Clone)]
pub struct MethodStub {
    params: Vec<String>,
    body: MethodBody,
}

impl MethodStub {
    pub fn get<F>(body: F) -> Self
    where
        F: Fn(&mut Context, &This, Expr) -> CompileResult<Expr> + Send + Sync + 'static,
    {
        Self {
            params: vec![KEY.to_string()],
            body: MethodBody::Get(Arc::new(body)),
        }
    }

    pub fn put<F>(body: F) -> Self
    where
        F: Fn(&mut Context, &This, Expr, Expr) -> CompileResult<Expr> + Send + Sync + 'static,
    {
        Self {
            params: vec![KEY.to_string(), VALUE.to_string()],
            body: MethodBody::Put(Arc::new(body)),
        }
    }

    pub fn post<F>(params: &[&str], body: F) -> Self
    where
        F: Fn(&mut Context, &This, &Params) -> CompileResult<Expr> + Send + Sync + 'static,
    {
        Self {
            params: params.iter().map(|p| p.to_string()).collect(),
            body: MethodBody::Post(Arc::new(body)),
        }
    }

    pub fn delete<F>(body: F) -> Self
    where
        F: Fn(&mut Context, &This, Expr) -> CompileResult<Expr> + Send + Sync + 'static,
    {
        Self {
            params: vec![KEY.to_string()],
            body: MethodBody::Delete(Arc::new(body)),
        }
    }

    pub fn kind(&self) -> MethodKind {
        match self.body {
            MethodBody::Get(_) => MethodKind::Get,
            MethodBody::Put(_) => MethodKind::Put,
            MethodBody::Post(_) => MethodKind::Post,
            MethodBody::Delete(_) => MethodKind::Delete,
        }
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Debug for MethodStub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodStub")
            .field("kind", &self.kind())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Call the body of `stub` once and capture what it binds, ending with `_return`.
pub fn trace(stub: &MethodStub, name: &str, this: &This) -> CompileResult<Context> {
    debug!(method = name, kind = %stub.kind(), "tracing method");

    for (i, param) in stub.params.iter().enumerate() {
        validate_name(param)?;
        if stub.params[..i].contains(param) {
            return Err(Box::new(
                Diagnostic::make_error(&DUPLICATE_NAME, &[param.as_str()])
                    .with_reference(param.as_str()),
            ));
        }
    }

    let mut context = Context::new();
    let result = match &stub.body {
        MethodBody::Get(body) | MethodBody::Delete(body) => {
            body(&mut context, this, Expr::id(KEY))?
        }
        MethodBody::Put(body) => body(&mut context, this, Expr::id(KEY), Expr::id(VALUE))?,
        MethodBody::Post(body) => {
            let params = Params {
                names: stub.params.clone(),
            };
            body(&mut context, this, &params)?
        }
    };

    context.set_return(result);
    context.name_anonymous();
    trace_event!(method = name, entries = context.len(), "traced method");

    Ok(context)
}

/// Trace, resolve and order-check one method of the class described by `manifest`.
pub fn compile_method(
    stub: &MethodStub,
    name: &str,
    this: &This,
    manifest: &Manifest,
) -> CompileResult<OpDef> {
    let context = trace(stub, name, this)?;
    resolve_context(&context, stub.params(), Some(manifest))?;
    check_ordering(&context, Some(this.link()))?;

    Ok(OpDef::new(stub.kind(), stub.params.clone(), context))
}
