//! Bundled cluster definitions, compiled by the `opgraph` binary and used as
//! end-to-end fixtures by the tests and benchmarks.

use crate::collection::{Bound, Column, TableRef, TableSchema};
use crate::diagnostics::CompileResult;
use crate::graph::{Context, Params};
use crate::object::{Chain, ClassDef, ClusterHandle, Fields, This};
use crate::scalar::{ErrorValue, Expr, Link, MethodKind, Value, ValueType};

pub const DEFAULT_HOST: &str = "http://127.0.0.1:8702";

const DEFAULT_PORT: u16 = 8702;

/// A versioned counter: `rev` only moves forward.
pub fn example_cluster() -> CompileResult<ClassDef> {
    let class = ClassDef::new("/app/example")?
        .configure(|fields| fields.set("rev", Chain::sync(Expr::init(ValueType::Number, 0))))
        .get_method("current", |_cx, this, _key| Ok(this.chain("rev").subject()))
        .get_method("history", |_cx, this, _key| Ok(this.chain("rev").history()))
        .post_method("bump", &["version"], |_cx, this, params| {
            let version = params.get("version");
            Ok(Expr::if_then_else(
                version.gt(this.get("current", Value::None)),
                this.chain("rev").set(&version),
                ErrorValue::bad_request("Version too old"),
            ))
        });

    Ok(class)
}

/// Two clusters on neighbouring ports of `host` that keep their weights summing to 20.
///
/// Each side records its own weight first and only then tells the other side.
pub fn balance_clusters(host: &Link) -> CompileResult<(ClassDef, ClassDef)> {
    let port = host.port().unwrap_or(DEFAULT_PORT);
    let left_link = balance_link(&host.with_port(port), "left");
    let right_link = balance_link(&host.with_port(port.wrapping_add(1)), "right");

    let base = ClassDef::new("/app/balance")?
        .configure(|fields| fields.set("weight", Chain::sync(Expr::init(ValueType::UInt, 10u64))));

    let left_handle = ClusterHandle::new(left_link.clone()).with_method("weigh", MethodKind::Post)?;
    let right_handle = ClusterHandle::new(right_link.clone()).with_method("weigh", MethodKind::Post)?;

    let left = ClassDef::extend(&base, &left_link.to_string())?.post_method(
        "weigh",
        &["weight"],
        move |cx, this, params| weigh(cx, this, params, &right_handle),
    );

    let right = ClassDef::extend(&base, &right_link.to_string())?.post_method(
        "weigh",
        &["weight"],
        move |cx, this, params| weigh(cx, this, params, &left_handle),
    );

    Ok((left, right))
}

fn balance_link(host: &Link, side: &str) -> Link {
    host.append("app").append("balance").append(side)
}

fn weigh(
    cx: &mut Context,
    this: &This,
    params: &Params,
    other: &ClusterHandle,
) -> CompileResult<Expr> {
    let weight = params.get("weight");
    let total = cx.define("total", Expr::init(ValueType::Number, 20))?;

    let update = cx.define(
        "update",
        Expr::after(
            [this.chain("weight").set(&weight)],
            other.post("weigh", [("weight", &total - &weight)]),
        ),
    )?;

    Ok(Expr::if_then_else(
        this.member("weight").equals(&weight),
        Expr::none(),
        update,
    ))
}

/// Page views keyed by page name, with an index on the view count.
pub fn views_schema() -> CompileResult<TableSchema> {
    TableSchema::new(
        vec![Column::new("name", ValueType::String).with_max_size(512)],
        vec![Column::new("views", ValueType::UInt)],
        vec![("views", vec!["views", "name"])],
    )
}

/// A cluster persisting one table in a block chain.
pub fn table_cluster(host: &Link) -> CompileResult<ClassDef> {
    let schema = views_schema()?;
    let link = host.append("test").append("table");

    let class = ClassDef::at(link)
        .configure({
            let schema = schema.clone();
            move |fields: &mut Fields| fields.set("table", Chain::block(schema.create()))
        })
        .get_method("count", {
            let schema = schema.clone();
            move |_cx: &mut Context, this: &This, _key: Expr| Ok(this.table("table", &schema).count())
        })
        .get_method("popular", move |cx, this, _key| {
            let table = this.table("table", &schema);
            let popular = table.where_(vec![("views", Bound::range(100u64, Value::None))]);
            cx.define("popular", popular)
        });

    Ok(class)
}

/// A standalone transaction: create a table, insert `rows` and select a view range.
pub fn table_transaction(rows: &[(&str, u64)]) -> CompileResult<Context> {
    let schema = views_schema()?;
    let mut cx = Context::new();

    let table = TableRef::bind(&mut cx, "table", &schema)?;
    let inserts = rows
        .iter()
        .map(|(name, views)| table.insert(vec![Expr::from(*name)], vec![Expr::from(*views)]));
    let inserts = cx.define("inserts", Expr::tuple(inserts))?;

    cx.define(
        "result",
        Expr::after([inserts], table.where_(vec![("views", Bound::range(10u64, 20u64))])),
    )?;

    Ok(cx)
}
