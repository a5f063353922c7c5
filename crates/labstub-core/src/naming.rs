//! Identifier conventions for generated code and display ordering.

use std::cmp::Ordering;

use heck::{ToSnakeCase, ToUpperCamelCase};

pub fn snake_case(text: &str) -> String {
    text.to_snake_case()
}

pub fn pascal_case(text: &str) -> String {
    text.to_upper_camel_case()
}

/// Generated argument name for a remote parameter display name.
pub fn argument_name(display_name: &str) -> String {
    format!("arg_{}", snake_case(display_name))
}

/// Generated function name for a remote assistant display name.
pub fn assistant_function_name(display_name: &str) -> String {
    format!("assistant_{}", snake_case(display_name))
}

/// Class that groups a lab's assistants in call snippets: `Lab 7` -> `Lab7Assistants`.
pub fn lab_class_name(lab_name: &str) -> String {
    format!("{}Assistants", pascal_case(lab_name))
}

#[derive(PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(text: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut digits: Option<bool> = None;
    for (i, c) in text.char_indices() {
        let is_digit = c.is_ascii_digit();
        match digits {
            Some(d) if d != is_digit => {
                out.push(chunk(&text[start..i], d));
                start = i;
            }
            _ => {}
        }
        digits = Some(is_digit);
    }
    if let Some(d) = digits {
        out.push(chunk(&text[start..], d));
    }
    out
}

fn chunk(text: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Digits(text)
    } else {
        Chunk::Text(text)
    }
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Numeric-aware, case-insensitive ordering: `Lab 2` sorts before `Lab 10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);
    for (l, r) in left.iter().zip(right.iter()) {
        let ord = match (l, r) {
            (Chunk::Digits(x), Chunk::Digits(y)) => compare_digits(x, y),
            (Chunk::Text(x), Chunk::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("Alpha"), "alpha");
        assert_eq!(snake_case("Plate Reader"), "plate_reader");
        assert_eq!(snake_case("wellCount"), "well_count");
        assert_eq!(snake_case("--Dispense-Volume--"), "dispense_volume");
    }

    #[test]
    fn test_generated_names() {
        assert_eq!(argument_name("Target Volume"), "arg_target_volume");
        assert_eq!(assistant_function_name("Plate Reader"), "assistant_plate_reader");
        assert_eq!(lab_class_name("demo lab"), "DemoLabAssistants");
    }

    #[test]
    fn test_natural_cmp_orders_numbers() {
        let mut labels = vec!["Lab 10", "lab 2", "Lab 1", "Alpha"];
        labels.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(labels, vec!["Alpha", "Lab 1", "lab 2", "Lab 10"]);
    }

    #[test]
    fn test_natural_cmp_prefix_and_equal() {
        assert_eq!(natural_cmp("Lab", "Lab 1"), Ordering::Less);
        assert_eq!(natural_cmp("x", "x"), Ordering::Equal);
        assert_eq!(natural_cmp("a007", "a7"), Ordering::Less);
    }
}
