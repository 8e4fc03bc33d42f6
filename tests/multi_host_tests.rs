mod common;

use opgraph::demo;
use opgraph::object::{Chain, ClassDef, ClusterHandle};
use opgraph::scalar::{Expr, Link, MethodKind, Value, ValueType};

fn ledger() -> ClusterHandle {
    ClusterHandle::parse("http://10.0.0.2:8702/app/ledger")
        .and_then(|ledger| ledger.with_method("record", MethodKind::Post))
        .and_then(|ledger| ledger.with_method("balance", MethodKind::Get))
        .unwrap()
}

fn account() -> ClassDef {
    ClassDef::new("http://10.0.0.1:8702/app/account")
        .unwrap()
        .configure(|fields| fields.set("balance", Chain::sync(Expr::init(ValueType::Number, 0))))
}

#[test]
fn balance_clusters_follow_the_host() {
    let host = Link::parse("http://10.0.0.7:9000").unwrap();
    let (left, right) = demo::balance_clusters(&host).unwrap();

    let left = common::compile_json(&left);
    let right = common::compile_json(&right);

    let left_weigh = &left["http://10.0.0.7:9000/app/balance/left"]["weigh"];
    let right_weigh = &right["http://10.0.0.7:9001/app/balance/right"]["weigh"];

    assert!(left_weigh.to_string().contains("http://10.0.0.7:9001/app/balance/right/weigh"));
    assert!(right_weigh.to_string().contains("http://10.0.0.7:9000/app/balance/left/weigh"));
}

#[test]
fn host_without_port_uses_the_default_port() {
    let host = Link::parse("http://cluster.local").unwrap();
    let (left, right) = demo::balance_clusters(&host).unwrap();

    assert_eq!(left.link().to_string(), "http://cluster.local:8702/app/balance/left");
    assert_eq!(right.link().to_string(), "http://cluster.local:8703/app/balance/right");
}

#[test]
fn remote_write_racing_a_local_mutation_is_rejected() {
    let ledger = ledger();
    let class = account().post_method("deposit", &["amount"], move |cx, this, params| {
        let amount = params.get("amount");
        cx.define("credit", this.chain("balance").set(&amount))?;
        Ok(ledger.post("record", [("amount", amount)]))
    });

    assert_eq!(
        common::compile_errors(&class),
        vec![("deposit".to_string(), "E018".to_string())]
    );
}

#[test]
fn remote_write_after_a_local_mutation_compiles() {
    let ledger = ledger();
    let class = account().post_method("deposit", &["amount"], move |cx, this, params| {
        let amount = params.get("amount");
        let credit = cx.define("credit", this.chain("balance").set(&amount))?;
        Ok(Expr::after([credit], ledger.post("record", [("amount", amount)])))
    });

    let json = common::compile_json(&class);
    let deposit = &json["http://10.0.0.1:8702/app/account"]["deposit"]["/state/scalar/op"];
    assert_eq!(
        deposit[1][1]["/state/scalar/ref/after"][1],
        serde_json::json!({"http://10.0.0.2:8702/app/ledger/record": {"amount": {"$amount": []}}})
    );
}

#[test]
fn remote_reads_need_no_ordering() {
    let ledger = ledger();
    let class = account().post_method("sync", &[], move |cx, this, _params| {
        let remote = cx.define("remote", ledger.get("balance", Value::None))?;
        Ok(this.chain("balance").set(remote))
    });

    common::compile_json(&class);
}

#[test]
fn undeclared_remote_methods_are_rejected() {
    let ledger = ledger();
    let class = account()
        .get_method("audit", {
            let ledger = ledger.clone();
            move |_cx: &mut opgraph::graph::Context, _this: &opgraph::object::This, key: Expr| {
                Ok(ledger.get("audit", key))
            }
        })
        .post_method("peek", &[], move |_cx, _this, _params| {
            Ok(ledger.post("balance", Vec::<(&str, Expr)>::new()))
        });

    assert_eq!(
        common::compile_errors(&class),
        vec![
            ("audit".to_string(), "E019".to_string()),
            ("peek".to_string(), "E019".to_string()),
        ]
    );
}
