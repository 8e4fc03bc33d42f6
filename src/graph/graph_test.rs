use serde_json::json;

use crate::graph::{
    Context, MethodStub, OpDef, check_ordering, compile_method, resolve_context, resolve_standalone,
    trace,
};
use crate::object::{Manifest, MemberKind, This};
use crate::scalar::{ErrorValue, Expr, Link, MethodKind, Value, ValueType};

fn class_link() -> Link {
    Link::parse("http://127.0.0.1:8702/app/balance/left").unwrap()
}

fn remote_weigh() -> Expr {
    Link::parse("http://127.0.0.1:8703/app/balance/right/weigh")
        .map(Expr::from)
        .unwrap()
        .post([("weight", Expr::from(5))])
}

fn manifest() -> Manifest {
    let mut manifest = Manifest::new("/app/example");
    manifest.insert("rev", MemberKind::Field);
    manifest.insert("current", MemberKind::Method(MethodKind::Get));
    manifest.insert("bump", MemberKind::Method(MethodKind::Post));
    manifest
}

fn error_code(cx: &Context) -> String {
    let err = cx.compile().unwrap_err();
    err.code().unwrap_or_default().to_string()
}

#[test]
fn define_returns_a_reference() {
    let mut cx = Context::new();
    let a = cx.define("a", Expr::init(ValueType::Number, 1)).unwrap();
    cx.define("b", &a + 2).unwrap();

    assert_eq!(cx.names().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(
        cx.compile().unwrap(),
        json!([
            ["a", {"/state/scalar/value/number": [1]}],
            ["b", {"$a/add": [2]}]
        ])
    );
}

#[test]
fn define_rejects_duplicate_and_reserved_names() {
    let mut cx = Context::new();
    cx.define("a", 1).unwrap();

    assert_eq!(cx.define("a", 2).unwrap_err().code(), Some("E001"));
    assert_eq!(cx.define("_return", 2).unwrap_err().code(), Some("E011"));
    assert_eq!(cx.define("self", 2).unwrap_err().code(), Some("E011"));
    assert_eq!(cx.define("2x", 2).unwrap_err().code(), Some("E010"));
    assert_eq!(cx.len(), 1);
}

#[test]
fn forward_reference_is_rejected() {
    let mut cx = Context::new();
    cx.define("a", Expr::id("b")).unwrap();
    cx.define("b", 1).unwrap();

    let err = cx.compile().unwrap_err();
    assert_eq!(err.code(), Some("E003"));
    assert_eq!(err.reference(), Some("$b"));
}

#[test]
fn self_reference_is_a_cycle() {
    let mut cx = Context::new();
    cx.define("a", &Expr::id("a") + 1).unwrap();

    assert_eq!(error_code(&cx), "E004");
}

#[test]
fn unresolved_reference_suggests_a_bound_name() {
    let mut cx = Context::new();
    cx.define("total", 20).unwrap();
    cx.define("half", &Expr::id("totl") / 2).unwrap();

    let err = cx.compile().unwrap_err();
    assert_eq!(err.code(), Some("E002"));
    assert_eq!(err.reference(), Some("$totl/div"));
    assert!(err.hints().iter().any(|hint| hint == "Did you mean `total`?"));
}

#[test]
fn nested_block_sees_enclosing_names() {
    let mut cx = Context::new();
    let x = cx.define("x", 1).unwrap();

    let mut inner = Context::new();
    let w = inner.define("w", &x + 1).unwrap();
    cx.define("y", inner.finish(w)).unwrap();

    assert_eq!(
        cx.compile().unwrap(),
        json!([
            ["x", 1],
            ["y", [["w", {"$x/add": [1]}], ["_return", {"$w": []}]]]
        ])
    );
}

#[test]
fn nested_block_may_not_shadow() {
    let mut cx = Context::new();
    cx.define("x", 1).unwrap();

    let mut inner = Context::new();
    inner.define("x", 2).unwrap();
    cx.define("y", inner.finish(Expr::id("x"))).unwrap();
    assert_eq!(error_code(&cx), "E005");

    // a name the outer context binds later is shadowed too
    let mut cx = Context::new();
    let mut inner = Context::new();
    inner.define("z", 2).unwrap();
    cx.define("y", inner.finish(Expr::none())).unwrap();
    cx.define("z", 3).unwrap();
    assert_eq!(error_code(&cx), "E005");
}

#[test]
fn inner_names_do_not_leak() {
    let mut cx = Context::new();
    let mut inner = Context::new();
    inner.define("w", 1).unwrap();
    cx.define("y", inner.finish(Expr::none())).unwrap();
    cx.define("z", Expr::id("w")).unwrap();

    assert_eq!(error_code(&cx), "E002");
}

#[test]
fn self_outside_a_class_is_rejected() {
    let mut cx = Context::new();
    cx.define("rev", Expr::This(vec!["rev".to_string()])).unwrap();

    let err = cx.compile().unwrap_err();
    assert_eq!(err.code(), Some("E006"));
    assert_eq!(err.reference(), Some("$self/rev"));
}

#[test]
fn self_members_are_checked_against_the_manifest() {
    let this = This::new(Link::parse("/app/example").unwrap());
    let manifest = manifest();

    let mut cx = Context::new();
    cx.define("v", this.get("curent", Value::None)).unwrap();
    let err = resolve_context(&cx, &[], Some(&manifest)).unwrap_err();
    assert_eq!(err.code(), Some("E007"));
    assert!(err.hints().iter().any(|hint| hint == "Did you mean `current`?"));

    let mut cx = Context::new();
    cx.define("v", this.post("current", Vec::<(&str, Expr)>::new())).unwrap();
    let err = resolve_context(&cx, &[], Some(&manifest)).unwrap_err();
    assert_eq!(err.code(), Some("E008"));
    assert_eq!(
        err.message(),
        Some("`current` is a GET method but is called with POST.")
    );

    let mut cx = Context::new();
    cx.define("v", this.chain("rev").subject()).unwrap();
    cx.define("w", this.get("current", Value::None)).unwrap();
    assert!(resolve_context(&cx, &[], Some(&manifest)).is_ok());
}

#[test]
fn parameters_may_not_be_rebound() {
    let mut cx = Context::new();
    cx.define("key", 1).unwrap();

    let err = resolve_context(&cx, &["key".to_string()], None).unwrap_err();
    assert_eq!(err.code(), Some("E001"));
}

#[test]
fn unaddressable_subject_surfaces_at_resolution() {
    let mut cx = Context::new();
    cx.define("a", Expr::tuple([Expr::from(1)]).get(0)).unwrap();

    let err = cx.compile().unwrap_err();
    assert_eq!(err.code(), Some("E009"));
    assert!(err.message().unwrap_or_default().contains("GET"));
}

#[test]
fn trace_keeps_assignment_order_and_ends_with_return() {
    let this = This::new(Link::parse("/app/math").unwrap());
    let stub = MethodStub::post(&["a", "b"], |cx, _this, params| {
        let sum = cx.define("sum", params.get("a") + params.get("b"))?;
        let twice = cx.define("twice", &sum * 2)?;
        cx.define("checked", Expr::if_then_else(twice.lt(100), twice, ErrorValue::bad_request("too big")))
    });

    let cx = trace(&stub, "add", &this).unwrap();
    assert_eq!(
        cx.names().collect::<Vec<_>>(),
        vec!["sum", "twice", "checked", "_return"]
    );
    assert_eq!(
        serde_json::to_value(&cx).unwrap()[2],
        json!(["checked", {"/state/scalar/ref/if": [
            {"$twice/lt": [100]},
            {"$twice": []},
            {"/error/bad_request": "too big"}
        ]}])
    );
}

#[test]
fn trace_rejects_duplicate_parameters() {
    let this = This::new(Link::parse("/app/math").unwrap());
    let stub = MethodStub::post(&["a", "a"], |_cx, _this, params| Ok(params.get("a")));

    assert_eq!(trace(&stub, "add", &this).unwrap_err().code(), Some("E001"));
}

#[test]
fn op_def_forms() {
    let this = This::new(Link::parse("/app/example").unwrap());
    let manifest = manifest();
    let compile = |stub: MethodStub| -> OpDef {
        compile_method(&stub, "m", &this, &manifest).unwrap()
    };

    let get = compile(MethodStub::get(|_cx, _this, key| Ok(key)));
    assert_eq!(
        serde_json::to_value(&get).unwrap(),
        json!({"/state/scalar/op/get": ["key", [["_return", {"$key": []}]]]})
    );

    let put = compile(MethodStub::put(|_cx, _this, _key, value| Ok(value)));
    assert_eq!(
        serde_json::to_value(&put).unwrap(),
        json!({"/state/scalar/op/put": ["key", "value", [["_return", {"$value": []}]]]})
    );

    let post = compile(MethodStub::post(&["version"], |_cx, _this, _params| Ok(Expr::none())));
    assert_eq!(post.params(), &["version".to_string()]);
    assert_eq!(
        serde_json::to_value(&post).unwrap(),
        json!({"/state/scalar/op": [["_return", null]]})
    );

    let delete = compile(MethodStub::delete(|_cx, this, key| Ok(this.member("rev").delete(key))));
    assert_eq!(delete.kind(), MethodKind::Delete);
    assert_eq!(
        serde_json::to_value(&delete).unwrap(),
        json!({"/state/scalar/op/delete": ["key", [
            ["_return", {"/state/scalar/ref/op/delete": ["$self/rev", {"$key": []}]}]
        ]]})
    );
}

#[test]
fn unordered_remote_call_is_rejected() {
    let this = This::new(class_link());

    let mut cx = Context::new();
    cx.define("local", this.chain("weight").set(5)).unwrap();
    cx.define("remote", remote_weigh()).unwrap();

    let err = check_ordering(&cx, Some(this.link())).unwrap_err();
    assert_eq!(err.code(), Some("E018"));
    assert_eq!(
        err.reference(),
        Some("http://127.0.0.1:8703/app/balance/right/weigh")
    );
}

#[test]
fn remote_call_after_local_mutation_is_ordered() {
    let this = This::new(class_link());

    let mut cx = Context::new();
    cx.define("update", Expr::after([this.chain("weight").set(5)], remote_weigh()))
        .unwrap();
    assert!(check_ordering(&cx, Some(this.link())).is_ok());

    // the prerequisite may be a reference to a mutating entry
    let mut cx = Context::new();
    let local = cx.define("local", this.chain("weight").set(5)).unwrap();
    cx.define("update", Expr::after([local], remote_weigh())).unwrap();
    assert!(check_ordering(&cx, Some(this.link())).is_ok());
}

#[test]
fn remote_call_through_a_bound_link_is_tracked() {
    let this = This::new(class_link());
    let other = Link::parse("http://127.0.0.1:8703/app/balance/right").unwrap();

    let mut cx = Context::new();
    let other = cx.define("other", other).unwrap();
    cx.define("remote", other.attr("weigh").post([("weight", Expr::from(5))]))
        .unwrap();
    cx.define("local", this.chain("weight").set(5)).unwrap();

    assert_eq!(
        check_ordering(&cx, Some(this.link())).unwrap_err().code(),
        Some("E018")
    );
}

#[test]
fn reads_and_local_calls_need_no_ordering() {
    let this = This::new(class_link());

    let mut cx = Context::new();
    cx.define("local", this.chain("weight").set(5)).unwrap();
    cx.define(
        "read",
        Link::parse("http://127.0.0.1:8703/app/balance/right/weight")
            .map(Expr::from)
            .unwrap()
            .get(Value::None),
    )
    .unwrap();
    cx.define(
        "own",
        Expr::from(class_link().append("weigh")).post([("weight", Expr::from(1))]),
    )
    .unwrap();
    assert!(check_ordering(&cx, Some(this.link())).is_ok());

    // a remote write with no local mutation is fine on its own
    let mut cx = Context::new();
    cx.define("remote", remote_weigh()).unwrap();
    assert!(check_ordering(&cx, Some(this.link())).is_ok());
}

#[test]
fn map_keys_cannot_masquerade_as_references() {
    let mut cx = Context::new();
    cx.define("m", Expr::map([("$self", Expr::from(1))])).unwrap();
    let err = cx.compile().unwrap_err();
    assert_eq!(err.code(), Some("E010"));
    assert_eq!(err.reference(), Some("$self"));

    let mut cx = Context::new();
    cx.define("m", Expr::map([("/state/scalar/op", Expr::from(1))])).unwrap();
    assert_eq!(error_code(&cx), "E010");

    let mut cx = Context::new();
    cx.define("m", Expr::map([("count", Expr::from(1)), ("max-size", Expr::from(2))])).unwrap();
    assert_eq!(
        cx.compile().unwrap(),
        json!([["m", {"count": 1, "max-size": 2}]])
    );
}

#[test]
fn non_finite_literals_are_rejected() {
    let mut cx = Context::new();
    cx.define("x", Expr::from(f64::NAN)).unwrap();
    let err = cx.compile().unwrap_err();
    assert_eq!(err.code(), Some("E022"));
    assert_eq!(err.reference(), Some("NaN"));

    let mut cx = Context::new();
    let base = cx.define("base", 1).unwrap();
    cx.define("y", &base * Value::Tuple(vec![1.0.into(), f64::NEG_INFINITY.into()])).unwrap();
    assert_eq!(error_code(&cx), "E022");

    let mut cx = Context::new();
    cx.define("z", 0.25).unwrap();
    assert_eq!(cx.compile().unwrap(), json!([["z", 0.25]]));
}

#[test]
fn chained_ops_name_their_intermediates() {
    let this = This::new(Link::parse("/app/math").unwrap());
    let manifest = Manifest::new("/app/math");
    let stub = MethodStub::post(&["a", "b", "c"], |_cx, _this, params| {
        Ok((params.get("a") + params.get("b")) + params.get("c"))
    });

    let def = compile_method(&stub, "sum", &this, &manifest).unwrap();
    assert_eq!(
        serde_json::to_value(&def).unwrap(),
        json!({"/state/scalar/op": [
            ["_anon_0", {"$a/add": [{"$b": []}]}],
            ["_return", {"$_anon_0/add": [{"$c": []}]}]
        ]})
    );

    let again = compile_method(&stub, "sum", &this, &manifest).unwrap();
    assert_eq!(
        serde_json::to_string(&def).unwrap(),
        serde_json::to_string(&again).unwrap()
    );
}

#[test]
fn nested_intermediates_are_named_innermost_first() {
    let this = This::new(Link::parse("/app/math").unwrap());
    let stub = MethodStub::post(&["a", "b"], |cx, _this, params| {
        let scaled = cx.define("scaled", (params.get("a") - params.get("b")).abs() * 2)?;
        Ok((&scaled + 1).abs())
    });

    let cx = trace(&stub, "distance", &this).unwrap();
    assert_eq!(
        serde_json::to_value(&cx).unwrap(),
        json!([
            ["_anon_0", {"$a/sub": [{"$b": []}]}],
            ["_anon_1", {"$_anon_0/abs": [null]}],
            ["scaled", {"$_anon_1/mul": [2]}],
            ["_anon_2", {"$scaled/add": [1]}],
            ["_return", {"$_anon_2/abs": [null]}]
        ])
    );
    assert!(resolve_context(&cx, &["a".to_string(), "b".to_string()], None).is_ok());
}

#[test]
fn intermediates_in_a_branch_stay_in_the_branch() {
    let mut cx = Context::new();
    let a = cx.define("a", 5).unwrap();
    cx.define(
        "checked",
        Expr::if_then_else(a.gt(0), (&a + 1).abs(), ErrorValue::bad_request("negative")),
    )
    .unwrap();

    assert_eq!(
        cx.compile().unwrap(),
        json!([
            ["a", 5],
            ["checked", {"/state/scalar/ref/if": [
                {"$a/gt": [0]},
                [["_anon_0", {"$a/add": [1]}], ["_return", {"$_anon_0/abs": [null]}]],
                {"/error/bad_request": "negative"}
            ]}]
        ])
    );
    assert_eq!(cx.names().collect::<Vec<_>>(), vec!["a", "checked"]);
}

#[test]
fn generated_names_are_reserved() {
    let mut cx = Context::new();
    let err = cx.define("_anon_0", 1).unwrap_err();
    assert_eq!(err.code(), Some("E011"));
}

#[test]
fn unnamed_subjects_outside_a_context_are_rejected() {
    let initial = Expr::init(ValueType::Number, 1) + 1;
    let err = resolve_standalone(&initial, None).unwrap_err();
    assert_eq!(err.code(), Some("E009"));
    assert_eq!(err.reference(), Some("$<anonymous>/add"));
    assert!(serde_json::to_value(&initial).is_err());
}
