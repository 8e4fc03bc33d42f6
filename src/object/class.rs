use std::fmt;
use std::sync::Arc;

use super::{ClusterHandle, Fields, This};
use crate::diagnostics::CompileResult;
use crate::graph::{Context, MethodStub, Params};
use crate::scalar::{Expr, Link};

pub type ConfigureFn = dyn Fn(&mut Fields) -> CompileResult<()> + Send + Sync;

#[derive(Clone)]
struct MethodEntry {
    name: String,
    stub: MethodStub,
    inherited: bool,
}

/// A cluster class: an addressable set of fields and methods compiled to one
/// JSON object keyed by its link.
///
/// ```
/// use opgraph::object::{Chain, ClassDef};
/// use opgraph::scalar::{Expr, ValueType};
///
/// let class = ClassDef::new("/app/counter")
///     .unwrap()
///     .configure(|fields| fields.set("count", Chain::sync(Expr::init(ValueType::UInt, 0u64))))
///     .get_method("current", |_cx, this, _key| Ok(this.chain("count").subject()));
///
/// let graph = opgraph::object::compile_class(&class).unwrap();
/// assert_eq!(graph.members().len(), 2);
/// ```
#[derive(Clone)]
pub struct ClassDef {
    link: Link,
    configure: Vec<Arc<ConfigureFn>>,
    methods: Vec<MethodEntry>,
}

impl ClassDef {
    pub fn new(link: &str) -> CompileResult<Self> {
        Link::parse(link).map(Self::at)
    }

    pub fn at(link: Link) -> Self {
        Self {
            link,
            configure: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// A subclass of `base` served at `link`.
    ///
    /// The subclass keeps the base's fields and methods. Registering a method
    /// with an inherited name overrides it.
    pub fn extend(base: &ClassDef, link: &str) -> CompileResult<Self> {
        let mut class = Self::new(link)?;
        class.configure = base.configure.clone();
        class.methods = base
            .methods
            .iter()
            .map(|entry| MethodEntry {
                inherited: true,
                ..entry.clone()
            })
            .collect();

        Ok(class)
    }

    /// Add a closure that declares fields. It is traced once per compilation.
    pub fn configure<F>(mut self, configure: F) -> Self
    where
        F: Fn(&mut Fields) -> CompileResult<()> + Send + Sync + 'static,
    {
        self.configure.push(Arc::new(configure));
        self
    }

    pub fn method(mut self, name: &str, stub: MethodStub) -> Self {
        let inherited = self
            .methods
            .iter_mut()
            .find(|entry| entry.inherited && entry.name == name);

        match inherited {
            Some(entry) => {
                entry.stub = stub;
                entry.inherited = false;
            }
            None => self.methods.push(MethodEntry {
                name: name.to_string(),
                stub,
                inherited: false,
            }),
        }

        self
    }

    pub fn get_method<F>(self, name: &str, body: F) -> Self
    where
        F: Fn(&mut Context, &This, Expr) -> CompileResult<Expr> + Send + Sync + 'static,
    {
        self.method(name, MethodStub::get(body))
    }

    pub fn put_method<F>(self, name: &str, body: F) -> Self
    where
        F: Fn(&mut Context, &This, Expr, Expr) -> CompileResult<Expr> + Send + Sync + 'static,
    {
        self.method(name, MethodStub::put(body))
    }

    pub fn post_method<F>(self, name: &str, params: &[&str], body: F) -> Self
    where
        F: Fn(&mut Context, &This, &Params) -> CompileResult<Expr> + Send + Sync + 'static,
    {
        self.method(name, MethodStub::post(params, body))
    }

    pub fn delete_method<F>(self, name: &str, body: F) -> Self
    where
        F: Fn(&mut Context, &This, Expr) -> CompileResult<Expr> + Send + Sync + 'static,
    {
        self.method(name, MethodStub::delete(body))
    }

    pub fn link(&self) -> &Link {
        &self.link
    }

    pub fn methods(&self) -> impl Iterator<Item = (&str, &MethodStub)> {
        self.methods
            .iter()
            .map(|entry| (entry.name.as_str(), &entry.stub))
    }

    pub(crate) fn configurators(&self) -> &[Arc<ConfigureFn>] {
        &self.configure
    }

    /// A handle for calling this class's methods from another cluster.
    pub fn handle(&self) -> CompileResult<ClusterHandle> {
        self.methods()
            .try_fold(ClusterHandle::new(self.link.clone()), |handle, (name, stub)| {
                handle.with_method(name, stub.kind())
            })
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("link", &self.link)
            .field("configure", &self.configure.len())
            .field("methods", &self.methods().map(|(name, _)| name).collect::<Vec<_>>())
            .finish()
    }
}
