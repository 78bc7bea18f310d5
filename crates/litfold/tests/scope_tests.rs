use litfold::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};

fn num(text: &str) -> Json {
    json!({"kind": "FirstLiteralToken", "text": text})
}

fn string(text: &str) -> Json {
    json!({"kind": "StringLiteral", "text": text})
}

fn ident(name: &str) -> Json {
    json!({"kind": "Identifier", "escapedText": name})
}

fn access(expression: Json, name: &str) -> Json {
    json!({"kind": "PropertyAccessExpression", "expression": expression, "name": ident(name)})
}

fn call(callee: Json, arguments: Vec<Json>) -> Json {
    json!({"kind": "CallExpression", "expression": callee, "arguments": arguments})
}

fn this() -> Json {
    json!({"kind": "ThisKeyword"})
}

fn resolve(node: &Json, scopes: &SymbolTable) -> std::result::Result<Value, EvalError> {
    Evaluator::new(KindTable::default()).resolve(node, scopes)
}

// ═══════════════════════════════════════════════════════════════════════
// Scope Resolution
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_scope_member_lookup() {
    let scopes = SymbolTable::new().with(DeclarationGroup::new("Foo").with_node("bar", num("5")));
    assert_eq!(resolve(&access(ident("Foo"), "bar"), &scopes).unwrap(), Value::Int(5));
}

#[test]
fn test_scope_member_initializer_is_resolved_recursively() {
    let foo = DeclarationGroup::new("Foo")
        .with_node("base", num("440"))
        .with_node(
            "double",
            json!({
                "kind": "BinaryExpression",
                "left": access(ident("Foo"), "base"),
                "operatorToken": {"kind": "AsteriskToken"},
                "right": num("2")
            }),
        );
    let scopes = SymbolTable::new().with(foo);
    assert_eq!(resolve(&access(ident("Foo"), "double"), &scopes).unwrap(), Value::Int(880));
}

#[test]
fn test_this_refers_to_enclosing_scope() {
    let class = DeclarationGroup::new("Config").with_node("rate", num("44100"));
    let scopes = SymbolTable::new().with_self(class);
    assert_eq!(resolve(&access(this(), "rate"), &scopes).unwrap(), Value::Int(44100));
}

#[test]
fn test_enum_members_reduce_to_names() {
    let effect = DeclarationGroup::new("EffectType")
        .with_node("reverb", ident("reverb"))
        .with_node("chorus", ident("chorus"));
    let scopes = SymbolTable::new().with(effect);
    assert_eq!(
        resolve(&access(ident("EffectType"), "chorus"), &scopes).unwrap(),
        Value::string("chorus")
    );
}

#[test]
fn test_self_reference_is_depth_limited() {
    let class = DeclarationGroup::new("Loop")
        .with_node("a", access(this(), "b"))
        .with_node("b", access(this(), "a"));
    let scopes = SymbolTable::new().with_self(class);

    let evaluator = Evaluator::new(KindTable::default()).with_max_depth(32);
    assert_eq!(
        evaluator.resolve(&access(this(), "a"), &scopes).unwrap_err(),
        EvalError::DepthExceeded { limit: 32 }
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Calls
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_to_name_map_call() {
    let records = json!({
        "kind": "ArrayLiteralExpression",
        "elements": [
            {"kind": "ObjectLiteralExpression", "properties": [
                {"kind": "PropertyAssignment", "name": ident("name"), "initializer": string("sine")},
                {"kind": "PropertyAssignment", "name": ident("expression"), "initializer": num("0.88")}
            ]},
            {"kind": "ObjectLiteralExpression", "properties": [
                {"kind": "PropertyAssignment", "name": ident("name"), "initializer": string("square")},
                {"kind": "PropertyAssignment", "name": ident("expression"), "initializer": num("0.5")}
            ]}
        ]
    });
    let node = call(ident("toNameMap"), vec![records]);

    let value = resolve(&node, &SymbolTable::new()).unwrap();
    assert_eq!(
        value.to_json().unwrap(),
        json!({"sine": {"expression": 0.88}, "square": {"expression": 0.5}})
    );
}

#[test]
fn test_math_calls() {
    let scopes = SymbolTable::new().with(DeclarationGroup::math());

    let pow = call(access(ident("Math"), "pow"), vec![num("2"), num("10")]);
    assert_eq!(resolve(&pow, &scopes).unwrap(), Value::Int(1024));

    let round = call(access(ident("Math"), "round"), vec![num("2.5")]);
    assert_eq!(resolve(&round, &scopes).unwrap(), Value::Int(3));

    let max = call(access(ident("Math"), "max"), vec![num("1"), num("7"), num("3")]);
    assert_eq!(resolve(&max, &scopes).unwrap(), Value::Int(7));
}

#[test]
fn test_custom_builtin_registry() {
    let builtins = Builtins::new().with(NativeFn::new("twice", 1, |args| {
        Ok(Value::number(args[0].as_f64().unwrap_or(0.0) * 2.0))
    }));
    let evaluator = Evaluator::with_builtins(KindTable::default(), builtins);

    let node = call(ident("twice"), vec![num("21")]);
    assert_eq!(evaluator.resolve(&node, &SymbolTable::new()).unwrap(), Value::Int(42));

    let missing = call(ident("toNameMap"), vec![]);
    assert!(matches!(
        evaluator.resolve(&missing, &SymbolTable::new()),
        Err(EvalError::NotCallable { .. })
    ));
}

#[test]
fn test_array_map_with_formula() {
    // [1, 2, 4].map(x => 12 * Math.log2(x))
    let formula = json!({
        "kind": "ArrowFunction",
        "parameters": [{"kind": "Parameter", "name": ident("x")}],
        "body": {
            "kind": "BinaryExpression",
            "left": num("12"),
            "operatorToken": {"kind": "AsteriskToken"},
            "right": call(access(ident("Math"), "log2"), vec![ident("x")])
        }
    });
    let items = json!({"kind": "ArrayLiteralExpression", "elements": [num("1"), num("2"), num("4")]});
    let node = call(access(items, "map"), vec![formula]);

    assert_eq!(
        resolve(&node, &SymbolTable::new()).unwrap(),
        Value::array(vec![Value::Int(0), Value::Int(12), Value::Int(24)])
    );
}

#[test]
fn test_element_access() {
    let scopes = SymbolTable::new().with_self(
        DeclarationGroup::new("Config")
            .with_node("ratios", json!({"kind": "ArrayLiteralExpression", "elements": [num("1"), num("1.5")]})),
    );
    let node = json!({
        "kind": "ElementAccessExpression",
        "expression": access(this(), "ratios"),
        "argumentExpression": num("1")
    });
    assert_eq!(resolve(&node, &scopes).unwrap(), Value::Float(1.5));
}

#[test]
fn test_native_scope_member() {
    let scopes = SymbolTable::new().with(DeclarationGroup::new("Consts").with_native("rate", 48000i64));
    assert_eq!(resolve(&access(ident("Consts"), "rate"), &scopes).unwrap(), Value::Int(48000));
}

#[test]
fn test_bare_json_initializers_are_data() {
    let scopes = SymbolTable::new().with(
        DeclarationGroup::new("Data").with_node("table", json!([1, 2.5, "x", null, true])),
    );
    assert_eq!(
        resolve(&access(ident("Data"), "table"), &scopes).unwrap(),
        Value::array(vec![
            Value::Int(1),
            Value::Float(2.5),
            Value::string("x"),
            Value::Null,
            Value::Bool(true)
        ])
    );
}
