//! CSV 行格式化（RFC 4180 引号规则）

const DELIMITER: char = ',';

fn needs_quotes(field: &str) -> bool {
    field
        .chars()
        .any(|c| c == DELIMITER || c == '"' || c == '\n' || c == '\r')
        || field.starts_with(' ')
        || field.ends_with(' ')
}

pub fn quote_field(field: &str) -> String {
    if !needs_quotes(field) {
        return field.to_string();
    }
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    for c in field.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// 拼出一行（不含换行符）
pub fn format_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        line.push_str(&quote_field(field.as_ref()));
    }
    line
}

#[cfg(test)]
#[path = "../../tests/unit/models/csv_row.rs"]
mod tests;
