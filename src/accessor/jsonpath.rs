use crate::error::AccessorError;
use serde_json::Value as JsonValue;

/// One step of a parsed JSONPath expression.
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Child(String),
    Index(usize),
    Wildcard,
    /// `..name` or `..*`
    Descendant(Option<String>),
}

/// The subset of JSONPath the property system relies on: `$`, `.name`,
/// `['name']`, `[0]`, `[*]`, `.*` and `..name`.
///
/// Queries produce JSON pointers so that callers can both read
/// ([`JsonValue::pointer`]) and write ([`JsonValue::pointer_mut`]) matches.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    pub fn parse(path: &str) -> Result<Self, AccessorError> {
        let err = |message: &str| AccessorError::InvalidJsonPath {
            path: path.to_string(),
            message: message.to_string(),
        };

        let rest = path.strip_prefix('$').ok_or_else(|| err("must start with '$'"))?;
        let chars: Vec<char> = rest.chars().collect();
        let mut segments = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '.' => {
                    let descendant = chars.get(i + 1) == Some(&'.');
                    i += if descendant { 2 } else { 1 };
                    let start = i;
                    while i < chars.len() && chars[i] != '.' && chars[i] != '[' {
                        i += 1;
                    }
                    let name: String = chars[start..i].iter().collect();
                    if name.is_empty() && !(descendant && chars.get(i) == Some(&'[')) {
                        return Err(err("empty member name"));
                    }
                    let segment = match (descendant, name.as_str()) {
                        (true, "*") | (true, "") => Segment::Descendant(None),
                        (true, _) => Segment::Descendant(Some(name)),
                        (false, "*") => Segment::Wildcard,
                        (false, _) => Segment::Child(name),
                    };
                    segments.push(segment);
                }
                '[' => {
                    let close = chars[i..]
                        .iter()
                        .position(|c| *c == ']')
                        .map(|p| p + i)
                        .ok_or_else(|| err("unterminated '['"))?;
                    let inner: String = chars[i + 1..close].iter().collect();
                    let inner = inner.trim();
                    let segment = if inner == "*" {
                        Segment::Wildcard
                    } else if let Some(name) = unquote(inner) {
                        Segment::Child(name.to_string())
                    } else {
                        Segment::Index(
                            inner
                                .parse()
                                .map_err(|_| err("bracket must hold an index, '*' or a quoted name"))?,
                        )
                    };
                    // `..[...]` applies the bracket to every descendant.
                    if let Some(Segment::Descendant(None)) = segments.last() {
                        if let Segment::Child(name) = &segment {
                            segments.pop();
                            segments.push(Segment::Descendant(Some(name.clone())));
                            i = close + 1;
                            continue;
                        }
                    }
                    segments.push(segment);
                    i = close + 1;
                }
                other => return Err(err(&format!("unexpected character '{}'", other))),
            }
        }

        Ok(Self { segments })
    }

    /// JSON pointers of every match, in document order.
    pub fn pointers(&self, root: &JsonValue) -> Vec<String> {
        let mut current = vec![(String::new(), root)];

        for segment in &self.segments {
            let mut next = Vec::new();
            for (pointer, value) in current {
                match segment {
                    Segment::Child(name) => {
                        if let Some(child) = value.get(name.as_str()) {
                            next.push((join(&pointer, name), child));
                        }
                    }
                    Segment::Index(index) => {
                        if let Some(child) = value.as_array().and_then(|a| a.get(*index)) {
                            next.push((join(&pointer, &index.to_string()), child));
                        }
                    }
                    Segment::Wildcard => push_children(&pointer, value, &mut next),
                    Segment::Descendant(name) => {
                        let mut all = Vec::new();
                        collect_descendants(pointer, value, &mut all);
                        for (p, v) in all {
                            match name {
                                Some(name) => {
                                    if let Some(child) = v.get(name.as_str()) {
                                        next.push((join(&p, name), child));
                                    }
                                }
                                None => push_children(&p, v, &mut next),
                            }
                        }
                    }
                }
            }
            current = next;
        }

        current.into_iter().map(|(pointer, _)| pointer).collect()
    }

    /// Every matching value, in document order.
    pub fn query<'a>(&self, root: &'a JsonValue) -> Vec<&'a JsonValue> {
        self.pointers(root)
            .iter()
            .filter_map(|p| root.pointer(p))
            .collect()
    }
}

fn unquote(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'\'' || bytes[0] == b'"')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}

fn join(pointer: &str, token: &str) -> String {
    format!("{}/{}", pointer, token.replace('~', "~0").replace('/', "~1"))
}

fn push_children<'a>(pointer: &str, value: &'a JsonValue, out: &mut Vec<(String, &'a JsonValue)>) {
    match value {
        JsonValue::Object(map) => {
            for (key, child) in map {
                out.push((join(pointer, key), child));
            }
        }
        JsonValue::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                out.push((join(pointer, &index.to_string()), child));
            }
        }
        _ => {}
    }
}

fn collect_descendants<'a>(pointer: String, value: &'a JsonValue, out: &mut Vec<(String, &'a JsonValue)>) {
    let mut children = Vec::new();
    push_children(&pointer, value, &mut children);
    out.push((pointer, value));
    for (p, child) in children {
        collect_descendants(p, child, out);
    }
}
