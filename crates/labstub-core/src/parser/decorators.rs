//! Decorator reading for `decorated_definition` nodes.

use tree_sitter::Node;

use super::source::node_text;

/// Decorators the extractor understands. Anything else is `Unrecognized`
/// and the decorated definition is skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecoratorKind {
    Action,
    SubstrateAction,
    Assistant,
    Parameter,
    Dataclass,
    Workflow,
    Unrecognized,
}

impl DecoratorKind {
    /// Exact, case-sensitive match on the dotted decorator name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "action" => DecoratorKind::Action,
            "substrate_action" => DecoratorKind::SubstrateAction,
            "assistant" => DecoratorKind::Assistant,
            "parameter" => DecoratorKind::Parameter,
            "dataclass" => DecoratorKind::Dataclass,
            "workflow" => DecoratorKind::Workflow,
            _ => DecoratorKind::Unrecognized,
        }
    }

    pub fn is_action(self) -> bool {
        matches!(self, DecoratorKind::Action | DecoratorKind::SubstrateAction)
    }
}

/// One argument of a decorator call, positional or keyword.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoratorArg {
    pub keyword: Option<String>,
    /// Raw source text of the value expression, quotes included.
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decorator {
    pub name: String,
    pub kind: DecoratorKind,
    pub args: Vec<DecoratorArg>,
}

impl Decorator {
    /// Value of the argument at `index`, counting positional and keyword
    /// arguments alike, with quotes stripped.
    pub fn argument(&self, index: usize) -> Option<String> {
        self.args.get(index).map(|arg| clean_quotes(&arg.value))
    }

    /// Value of the keyword argument `key`, quotes left intact.
    pub fn keyword(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|arg| arg.keyword.as_deref() == Some(key))
            .map(|arg| arg.value.as_str())
    }
}

/// Remove every `'` and `"` from literal text.
pub fn clean_quotes(text: &str) -> String {
    text.chars().filter(|c| *c != '\'' && *c != '"').collect()
}

/// Read all decorators of a `decorated_definition`, outermost first.
pub fn read_decorators(node: Node<'_>, source: &str) -> Vec<Decorator> {
    let mut decorators = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "decorator" {
            continue;
        }
        if let Some(decorator) = read_decorator(child, source) {
            decorators.push(decorator);
        }
    }
    decorators
}

fn read_decorator(node: Node<'_>, source: &str) -> Option<Decorator> {
    let expression = node.named_child(0)?;
    let (name, args) = match expression.kind() {
        "call" => {
            let function = expression.child_by_field_name("function")?;
            let args = expression
                .child_by_field_name("arguments")
                .map(|list| read_arguments(list, source))
                .unwrap_or_default();
            (node_text(function, source).to_string(), args)
        }
        _ => (node_text(expression, source).to_string(), Vec::new()),
    };
    // Dotted names may be split across lines inside parentheses.
    let name: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    Some(Decorator {
        kind: DecoratorKind::from_name(&name),
        name,
        args,
    })
}

fn read_arguments(list: Node<'_>, source: &str) -> Vec<DecoratorArg> {
    let mut args = Vec::new();
    let mut cursor = list.walk();
    for argument in list.named_children(&mut cursor) {
        match argument.kind() {
            "comment" => {}
            "keyword_argument" => {
                let keyword = argument
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source).to_string());
                let value = argument
                    .child_by_field_name("value")
                    .map(|n| node_text(n, source).to_string())
                    .unwrap_or_default();
                args.push(DecoratorArg { keyword, value });
            }
            _ => args.push(DecoratorArg {
                keyword: None,
                value: node_text(argument, source).to_string(),
            }),
        }
    }
    args
}
