#![expect(missing_docs)]

mod common;

use crate::common::{CARD, HERO, render_errors, render_strings, render_tokens};

#[test]
fn snapshot_operation() {
    insta::assert_snapshot!(render_tokens(HERO), @r#"
    0 DefQuery "query"
    0 OperationName "Hero"
    0 VarList
    0 VarName "episode"
    0 VarTypeName "Episode"
    0 EnumVal "JEDI"
    0 VarName "withFriends"
    0 VarTypeName "Boolean"
    0 VarTypeNotNull
    0 VarListEnd
    1 Set
    1 Field "hero"
    1 ArgList
    1 ArgName "episode"
    1 VarRef "episode"
    1 ArgListEnd
    2 Set
    2 Field "name"
    2 Field "friends"
    2 DirectiveName "include"
    2 ArgList
    2 ArgName "if"
    2 VarRef "withFriends"
    2 ArgListEnd
    3 Set
    3 FragInline "Droid"
    4 Set
    4 Field "primaryFunction"
    3 SetEnd
    2 SetEnd
    1 SetEnd
    0 SetEnd
    "#);
}

#[test]
fn snapshot_fragment_with_values() {
    insta::assert_snapshot!(render_tokens(CARD), @r#"
    0 DefFragment "fragment"
    0 FragName "Card"
    0 FragTypeCond "Product"
    0 DirectiveName "cached"
    0 ArgList
    0 ArgName "ttl"
    0 Int "60"
    0 ArgListEnd
    1 Set
    1 Field "id"
    1 FieldAlias "price"
    1 Field "cost"
    1 ArgList
    1 ArgName "currency"
    1 EnumVal "USD"
    1 ArgName "round"
    1 Float "2.50e0"
    1 ArgListEnd
    1 Field "tags"
    1 ArgList
    1 ArgName "first"
    1 Int "3"
    1 ArgName "filter"
    1 Obj
    1 ObjField "kind"
    1 Arr
    1 Str "a"
    1 StrBlock "b"
    1 ArrEnd
    1 ObjField "active"
    1 True "true"
    1 ObjField "note"
    1 Null "null"
    1 ObjEnd
    1 ArgListEnd
    1 NamedSpread "Meta"
    0 SetEnd
    "#);
}

#[test]
fn snapshot_partial_output_before_error() {
    insta::assert_snapshot!(render_tokens("{ a(x: [1, 2 }"), @r#"
    0 DefQuery
    1 Set
    1 Field "a"
    1 ArgList
    1 ArgName "x"
    1 Arr
    1 Int "1"
    1 Int "2"
    error: error at index 13 (}): unexpected token; expected value or end of array
    "#);
}

#[test]
fn snapshot_errors() {
    insta::assert_snapshot!(render_errors(&[
        "",
        "{ a",
        "{ a(x: 01) }",
        "{ a(x: nul:l) }",
        "query ($a: [Int) { a }",
        "fragment F { a }",
        "{ a } { b }",
    ]), @r#"
    "" => error at index 0: unexpected end of file; expected definition
    "{ a" => error at index 3: unexpected end of file; expected alias, argument list, selection set or end of selection set
    "{ a(x: 01) }" => error at index 8 (1): invalid number value
    "{ a(x: nul:l) }" => error at index 10 (:): invalid value
    "query ($a: [Int) { a }" => error at index 15 ()): invalid type; expected variable type
    "fragment F { a }" => error at index 11 ({): unexpected token; expected keyword on
    "{ a } { b }" => ok
    "#);
}

#[test]
fn snapshot_interpreted_strings() {
    let input = "{ f(a: \"tab\\there \\u00e9 \\uD83D\\uDE00\", b: \"\"\"\n    first\n      second\n    third\n  \"\"\") }";
    insta::assert_snapshot!(render_strings(input), @r#"
    Str => "tab\there é 😀"
    StrBlock => "first\n  second\nthird"
    "#);
}
