//! Compatibility table between Python annotations and remote type tags.

use crate::models::TypeInfo;

pub const STRING: &str = "STRING";
pub const EQUIPMENT_REF: &str = "EQUIPMENT_REF";
pub const INT: &str = "INT";
pub const FLOAT: &str = "FLOAT";
pub const BOOLEAN: &str = "BOOLEAN";
pub const ARRAY: &str = "ARRAY";

/// Primitive pairs only. Remote tags are compared case-sensitively.
pub fn compare_simple_types(local: &str, remote: &str) -> bool {
    match local.trim() {
        "str" => remote == STRING || remote == EQUIPMENT_REF,
        "int" => remote == INT,
        "float" => remote == FLOAT,
        "bool" => remote == BOOLEAN,
        _ => false,
    }
}

/// Whether a local annotation may stand in for the remote parameter type.
///
/// A local spelling containing `List` only matches `ARRAY`, and then the
/// text between the first `[` and first `]` is compared against the single
/// declared sub-type. One level only: `List[List[int]]` never matches.
pub fn compatible(local: &str, remote: &TypeInfo) -> bool {
    if local.contains("List") {
        if remote.type_ != ARRAY {
            return false;
        }
        let Some(element) = list_element(local) else {
            return false;
        };
        return remote
            .sub_types
            .first()
            .map(|sub| compare_simple_types(element, &sub.type_))
            .unwrap_or(false);
    }
    compare_simple_types(local, &remote.type_)
}

fn list_element(local: &str) -> Option<&str> {
    let start = local.find('[')?;
    let end = local.find(']')?;
    if end <= start {
        return None;
    }
    Some(&local[start + 1..end])
}

/// Python spelling for a remote tag; tags outside the table become `Any`.
pub fn python_type_for_tag(tag: &str) -> &'static str {
    match tag {
        STRING | EQUIPMENT_REF => "str",
        INT => "int",
        FLOAT => "float",
        BOOLEAN => "bool",
        _ => "Any",
    }
}

/// Python annotation for a remote parameter, `List[...]` for arrays.
pub fn python_type_for(info: &TypeInfo) -> String {
    if info.type_ == ARRAY {
        let element = info
            .sub_types
            .first()
            .map(|sub| python_type_for_tag(&sub.type_))
            .unwrap_or("Any");
        return format!("List[{element}]");
    }
    python_type_for_tag(&info.type_).to_string()
}
