//! Integration tests for style documents and the cascade

use diagram_resolver::stylesheet::{StyleValue, BASE_STYLE};
use diagram_resolver::{resolve, StyleDocument, Stylesheet};

const BASE: &str = r##"
type = "style"

[node.object.common]
draw = "black"

[node.object.tikz]
shape = "rectangle"
"##;

const CUSTOM: &str = r##"
type = "style"
name = "custom"

[node.object.tikz]
shape = "circle"
fill = "#00AA00"
"##;

fn text(value: &str) -> StyleValue {
    StyleValue::Text(value.to_string())
}

#[test]
fn test_requested_style_overrides_base() {
    let sheet = Stylesheet::from_documents([
        StyleDocument::from_str(BASE).expect("Should parse"),
        StyleDocument::from_str(CUSTOM).expect("Should parse"),
    ]);

    assert_eq!(sheet.cascade("custom", "node", "object")["shape"], text("circle"));
    assert_eq!(sheet.cascade("unknown", "node", "object")["shape"], text("rectangle"));
    assert_eq!(sheet.cascade(BASE_STYLE, "node", "object")["shape"], text("rectangle"));
}

#[test]
fn test_document_order_matters() {
    let override_base = "type = \"style\"\n[node.object.tikz]\nshape = \"ellipse\"\n";
    let sheet = Stylesheet::from_documents(
        [BASE, override_base]
            .into_iter()
            .map(|doc| StyleDocument::from_str(doc).expect("Should parse")),
    );
    assert_eq!(sheet.cascade("base", "node", "object")["shape"], text("ellipse"));
    assert_eq!(sheet.cascade("base", "node", "object")["draw"], text("black"));
}

#[test]
fn test_element_styles_through_pipeline() {
    let records = r##"
[[element]]
name = "a"
x = 0
y = 0
style = "custom"
attributes = "shape=star, dashed, draw=#00aa00"

[element.properties]
"label.color" = "#123"

[[element]]
name = "b"
x = 5
y = 0
attributes = "fill=#00aa00"
"##;

    let diagram = resolve(records, &[BASE, CUSTOM]).expect("Should resolve");

    let a = &diagram.get("a").unwrap().style;
    assert_eq!(a.attribute("object", "shape"), Some(&text("circle")));
    assert_eq!(a.attribute("object", "dashed"), Some(&StyleValue::Flag(true)));
    assert_eq!(a.attribute("object", "fill"), Some(&text("color1")));
    assert_eq!(a.attribute("object", "draw"), Some(&text("color1")));
    assert_eq!(a.attribute("label", "color"), Some(&text("color2")));

    let b = &diagram.get("b").unwrap().style;
    assert_eq!(b.attribute("object", "fill"), Some(&text("color1")));
    assert_eq!(b.attribute("object", "shape"), Some(&text("rectangle")));

    assert_eq!(
        diagram.colors.iter().collect::<Vec<_>>(),
        vec![("color1", "#00aa00"), ("color2", "#123")]
    );
}

#[test]
fn test_malformed_attributes_are_not_fatal() {
    let records = r#"
[[element]]
name = "a"
attributes = "=oops, thick, label={unclosed"
"#;

    let diagram = resolve(records, &[]).expect("Should resolve");
    let object = diagram.get("a").unwrap().style.object().unwrap();
    assert_eq!(object.len(), 1);
    assert_eq!(object["thick"], StyleValue::Flag(true));
}

#[test]
fn test_resolution_does_not_touch_stylesheet() {
    let sheet = Stylesheet::from_documents([
        StyleDocument::from_str(BASE).unwrap(),
        StyleDocument::from_str(CUSTOM).unwrap(),
    ]);
    let before = sheet.clone();
    for _ in 0..3 {
        let _ = sheet.cascade("custom", "node", "object");
        let _ = sheet.layers("custom", "node", "object");
    }
    assert_eq!(sheet, before);
}
