//! Annotation schemas and the registry that resolves marker names to them.
//!
//! A marker is a source comment of the form
//! `+docgenerator:pod:scenario="basic",successStates={Pending,Running}`.
//! The registry maps the marker name (`docgenerator:pod`) to a [`SchemaShape`]
//! that lists which argument keys exist and whether each carries text or a
//! list of text. Decoding is structural only; what the values mean is up to
//! the record type built from them.

use crate::error::{DocgenError, Result};
use crate::types::{Flag, ScenarioRecord};
use std::collections::BTreeMap;

/// Marker name for pod scenario annotations.
pub const POD_SCENARIO_SCHEMA: &str = "docgenerator:pod";

/// Kind of value a schema field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single text value.
    Text,
    /// An ordered list of text values. A single value is accepted as a
    /// one-element list.
    TextList,
}

/// One named field of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Argument key as written in the marker.
    pub name: &'static str,
    /// Accepted value kind.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// A single-value field.
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    /// A list field.
    pub const fn list(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::TextList,
        }
    }
}

/// The set of fields a marker may carry. All fields are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaShape {
    fields: Vec<FieldSpec>,
}

impl SchemaShape {
    /// Creates a shape from its field list.
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Shape of a pod scenario marker.
    pub fn pod_scenario() -> Self {
        Self::new(vec![
            FieldSpec::text("scenario"),
            FieldSpec::list("successStates"),
            FieldSpec::list("failedStates"),
            FieldSpec::text("failureReason"),
            FieldSpec::text("hasInitContainer"),
            FieldSpec::text("hasVolume"),
        ])
    }

    /// Looks up a field by key.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Decodes marker argument text against this shape.
    ///
    /// `location` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the arguments are syntactically malformed, name a
    /// key the shape doesn't have, repeat a key, or pass a list to a text
    /// field.
    pub fn decode(&self, schema: &str, arguments: &str, location: &str) -> Result<RawAnnotation> {
        let decode_err = |reason: String| DocgenError::Decode {
            location: location.to_string(),
            reason,
        };

        let mut fields = BTreeMap::new();
        for (key, value) in parse_arguments(arguments).map_err(decode_err)? {
            let spec = self
                .field(&key)
                .ok_or_else(|| decode_err(format!("unknown field `{}` for {}", key, schema)))?;

            let value = match (spec.kind, value) {
                (FieldKind::Text, RawValue::List(_)) => {
                    return Err(decode_err(format!("field `{}` expects a single value", key)));
                }
                (FieldKind::TextList, RawValue::Text(text)) => RawValue::List(vec![text]),
                (_, value) => value,
            };

            if fields.insert(key.clone(), value).is_some() {
                return Err(decode_err(format!("field `{}` given more than once", key)));
            }
        }

        Ok(RawAnnotation {
            schema: schema.to_string(),
            fields,
        })
    }
}

/// Proof that a schema was registered; carries the registered name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationHandle {
    name: String,
}

impl RegistrationHandle {
    /// The registered marker name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A marker body resolved against the registry.
#[derive(Debug, Clone, Copy)]
pub struct MarkerMatch<'r, 'a> {
    /// Registered marker name.
    pub name: &'r str,
    /// Shape registered under that name.
    pub shape: &'r SchemaShape,
    /// Argument text following `name:` (empty if none).
    pub arguments: &'a str,
}

/// Registry of annotation schemas keyed by marker name.
///
/// Built once before a run and shared by reference afterwards; nothing
/// mutates it while markers are being collected.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, SchemaShape>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the pod scenario schema.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(POD_SCENARIO_SCHEMA, SchemaShape::pod_scenario())?;
        Ok(registry)
    }

    /// Registers a shape under a marker name.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSchema` if the name is already registered.
    pub fn register(&mut self, name: &str, shape: SchemaShape) -> Result<RegistrationHandle> {
        if self.schemas.contains_key(name) {
            return Err(DocgenError::DuplicateSchema(name.to_string()));
        }
        self.schemas.insert(name.to_string(), shape);
        Ok(RegistrationHandle {
            name: name.to_string(),
        })
    }

    /// Returns the shape registered under `name`.
    pub fn get(&self, name: &str) -> Option<&SchemaShape> {
        self.schemas.get(name)
    }

    /// Returns the shape registered under `name`, or `UnknownSchema`.
    pub fn require(&self, name: &str) -> Result<&SchemaShape> {
        self.get(name)
            .ok_or_else(|| DocgenError::UnknownSchema(name.to_string()))
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Resolves a marker body (the text after `+`) to a registered schema.
    ///
    /// The body must be the name alone or the name followed by `:`. When
    /// several registered names match, the longest wins.
    pub fn match_marker<'r, 'a>(&'r self, body: &'a str) -> Option<MarkerMatch<'r, 'a>> {
        self.schemas
            .iter()
            .filter_map(|(name, shape)| {
                let rest = body.strip_prefix(name.as_str())?;
                let arguments = if rest.is_empty() {
                    rest
                } else {
                    rest.strip_prefix(':')?
                };
                Some(MarkerMatch {
                    name: name.as_str(),
                    shape,
                    arguments,
                })
            })
            .max_by_key(|m| m.name.len())
    }
}

/// Decoded but untyped marker value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// A single value.
    Text(String),
    /// A list of values.
    List(Vec<String>),
}

/// Marker arguments checked against a shape, keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnnotation {
    /// Marker name the annotation was decoded for.
    pub schema: String,
    /// Field values present in the marker.
    pub fields: BTreeMap<String, RawValue>,
}

impl RawAnnotation {
    /// Returns a text field, if present.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(RawValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Returns a list field, or an empty list if absent.
    pub fn list(&self, name: &str) -> Vec<String> {
        match self.fields.get(name) {
            Some(RawValue::List(items)) => items.clone(),
            Some(RawValue::Text(text)) => vec![text.clone()],
            None => Vec::new(),
        }
    }
}

impl ScenarioRecord {
    /// Builds a record from an annotation decoded with
    /// [`SchemaShape::pod_scenario`].
    pub fn from_annotation(raw: &RawAnnotation) -> Self {
        let flag = |name: &str| raw.text(name).map(Flag::from_text).unwrap_or_default();

        Self {
            scenario: raw.text("scenario").unwrap_or_default().to_string(),
            success_states: raw.list("successStates"),
            failed_states: raw.list("failedStates"),
            failure_reason: raw.text("failureReason").unwrap_or_default().to_string(),
            has_init_container: flag("hasInitContainer"),
            has_volume: flag("hasVolume"),
        }
    }
}

/// Splits marker argument text into `key=value` pairs.
///
/// Values are quoted strings (`\"` and `\\` escapes), bare tokens, `{a,b}`
/// lists or `a;b` lists. Whitespace around keys and bare values is trimmed.
pub fn parse_arguments(input: &str) -> std::result::Result<Vec<(String, RawValue)>, String> {
    let mut scanner = ArgScanner::new(input);
    let mut pairs = Vec::new();

    scanner.skip_whitespace();
    if scanner.at_end() {
        return Ok(pairs);
    }

    loop {
        let key = scanner.take_key()?;
        let value = scanner.take_value()?;
        pairs.push((key, value));

        scanner.skip_whitespace();
        match scanner.next() {
            None => break,
            Some(',') => continue,
            Some(c) => return Err(format!("unexpected `{}` at offset {}", c, scanner.pos - 1)),
        }
    }

    Ok(pairs)
}

/// Character cursor over marker arguments.
struct ArgScanner {
    chars: Vec<char>,
    pos: usize,
}

impl ArgScanner {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn take_key(&mut self) -> std::result::Result<String, String> {
        let start = self.pos;
        let mut key = String::new();
        loop {
            match self.next() {
                Some('=') => break,
                Some(',') | None => {
                    return Err(format!("expected `key=value` at offset {}", start));
                }
                Some(c) => key.push(c),
            }
        }

        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(format!("empty key at offset {}", start));
        }
        Ok(key)
    }

    fn take_value(&mut self) -> std::result::Result<RawValue, String> {
        self.skip_whitespace();

        if self.peek() == Some('{') {
            self.pos += 1;
            return self.take_braced_list().map(RawValue::List);
        }

        let mut items = vec![self.take_item(&[',', ';'])?];
        while self.peek() == Some(';') {
            self.pos += 1;
            items.push(self.take_item(&[',', ';'])?);
        }

        if items.len() == 1 {
            Ok(RawValue::Text(items.remove(0)))
        } else {
            Ok(RawValue::List(items))
        }
    }

    fn take_braced_list(&mut self) -> std::result::Result<Vec<String>, String> {
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(items);
        }

        loop {
            items.push(self.take_item(&[',', '}'])?);
            match self.next() {
                Some(',') => continue,
                Some('}') => return Ok(items),
                _ => return Err("unterminated list, expected `}`".to_string()),
            }
        }
    }

    /// Reads one quoted or bare item, stopping before any of `stops`.
    fn take_item(&mut self, stops: &[char]) -> std::result::Result<String, String> {
        self.skip_whitespace();

        if self.peek() == Some('"') {
            let item = self.take_quoted()?;
            self.skip_whitespace();
            return Ok(item);
        }

        let mut item = String::new();
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                break;
            }
            item.push(c);
            self.pos += 1;
        }
        Ok(item.trim_end().to_string())
    }

    fn take_quoted(&mut self) -> std::result::Result<String, String> {
        let start = self.pos;
        self.pos += 1;

        let mut text = String::new();
        loop {
            match self.next() {
                Some('"') => return Ok(text),
                Some('\\') => match self.next() {
                    Some(c) => text.push(c),
                    None => break,
                },
                Some(c) => text.push(c),
                None => break,
            }
        }
        Err(format!("unterminated string starting at offset {}", start))
    }
}
