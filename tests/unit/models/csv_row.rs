use super::*;

#[test]
fn test_plain_fields_are_joined() {
    assert_eq!(format_row(&["a", "b", "c"]), "a,b,c");
}

#[test]
fn test_fields_with_delimiter_are_quoted() {
    assert_eq!(format_row(&["x,y", "z"]), "\"x,y\",z");
}

#[test]
fn test_quotes_are_doubled() {
    assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");
}

#[test]
fn test_newlines_and_edge_spaces_are_quoted() {
    assert_eq!(quote_field("a\nb"), "\"a\nb\"");
    assert_eq!(quote_field(" padded"), "\" padded\"");
    assert_eq!(quote_field("in side"), "in side");
}

#[test]
fn test_empty_row() {
    let empty: [&str; 0] = [];
    assert_eq!(format_row(&empty), "");
    assert_eq!(format_row(&["", ""]), ",");
}
