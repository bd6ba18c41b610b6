//! SDMX XML codec.
//! Documents have the shape
//! `<Models><Model name=".."><Field name="..">text</Field></Model></Models>`:
//! - A `Field` holds either scalar text, a single nested `Model`, or a
//!   `Models` list.
//! - An empty `Field` is a null value.
//! - Stored models carry their document id in a `documentId` attribute.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::{Document, Node};
use std::io::Cursor;
use thiserror::Error;

pub const MODELS: &str = "Models";
pub const MODEL: &str = "Model";
pub const FIELD: &str = "Field";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::Error),
    #[error("I/O error while writing XML: {0}")]
    Io(#[from] std::io::Error),
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("<{element}> element is missing its 'name' attribute")]
    MissingName { element: &'static str },
    #[error("expected a <Models> or <Model> root element, found <{0}>")]
    UnexpectedRoot(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelElement {
    pub name: String,
    pub document_id: Option<String>,
    pub fields: Vec<FieldElement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldElement {
    pub name: String,
    pub content: FieldContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldContent {
    Text(Option<String>),
    Model(ModelElement),
    Models(Vec<ModelElement>),
}

impl ModelElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document_id: None,
            fields: Vec::new(),
        }
    }

    pub fn with_document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }

    pub fn with_text(mut self, field: &str, text: Option<&str>) -> Self {
        self.push_text(field, text.map(str::to_string));
        self
    }

    pub fn with_field(mut self, field: FieldElement) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push_text(&mut self, field: &str, text: Option<String>) {
        self.fields.push(FieldElement {
            name: field.to_string(),
            content: FieldContent::Text(text),
        });
    }

    /// First field with the given name.
    pub fn field(&self, name: &str) -> Option<&FieldElement> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldElement> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Text of a scalar field; `None` when absent, null or not scalar.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.field(name).map(|f| &f.content) {
            Some(FieldContent::Text(Some(text))) => Some(text),
            _ => None,
        }
    }
}

/// Parse an SDMX document into its top-level model elements.
///
/// The root may be a `<Models>` list or a single `<Model>`. Namespaces are
/// ignored; only local names are matched.
pub fn parse_models(input: &str) -> Result<Vec<ModelElement>, FormatError> {
    let doc = Document::parse(input)?;
    let root = doc.root_element();
    match root.tag_name().name() {
        MODELS => child_elements(root, MODEL).map(parse_model).collect(),
        MODEL => Ok(vec![parse_model(root)?]),
        other => Err(FormatError::UnexpectedRoot(other.to_string())),
    }
}

fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

fn parse_model(node: Node) -> Result<ModelElement, FormatError> {
    let name = node
        .attribute("name")
        .ok_or(FormatError::MissingName { element: MODEL })?;
    let mut model = ModelElement::new(name);
    model.document_id = node.attribute("documentId").map(str::to_string);

    for field in child_elements(node, FIELD) {
        model.fields.push(parse_field(field)?);
    }
    Ok(model)
}

fn parse_field(node: Node) -> Result<FieldElement, FormatError> {
    let name = node
        .attribute("name")
        .ok_or(FormatError::MissingName { element: FIELD })?
        .to_string();

    // A nested list wins over a nested model, which wins over text.
    let content = if let Some(list) = child_elements(node, MODELS).next() {
        FieldContent::Models(
            child_elements(list, MODEL)
                .map(parse_model)
                .collect::<Result<_, _>>()?,
        )
    } else if let Some(model) = child_elements(node, MODEL).next() {
        FieldContent::Model(parse_model(model)?)
    } else {
        let text: String = node
            .children()
            .filter(|c| c.is_text())
            .filter_map(|c| c.text())
            .collect();
        // Text is kept verbatim, like SDMJ strings; only an empty field is null.
        FieldContent::Text((!text.is_empty()).then_some(text))
    };

    Ok(FieldElement { name, content })
}

/// Serialize model elements as an indented `<Models>` document.
pub fn write_models(models: &[ModelElement]) -> Result<String, FormatError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    write_list(&mut writer, models)?;
    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}

fn write_list(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    models: &[ModelElement],
) -> Result<(), FormatError> {
    if models.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(MODELS)))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(MODELS)))?;
    for model in models {
        write_model(writer, model)?;
    }
    writer.write_event(Event::End(BytesEnd::new(MODELS)))?;
    Ok(())
}

fn write_model(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    model: &ModelElement,
) -> Result<(), FormatError> {
    let mut start = BytesStart::new(MODEL);
    start.push_attribute(("name", model.name.as_str()));
    if let Some(id) = &model.document_id {
        start.push_attribute(("documentId", id.as_str()));
    }

    if model.fields.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for field in &model.fields {
        write_field(writer, field)?;
    }
    writer.write_event(Event::End(BytesEnd::new(MODEL)))?;
    Ok(())
}

fn write_field(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    field: &FieldElement,
) -> Result<(), FormatError> {
    let mut start = BytesStart::new(FIELD);
    start.push_attribute(("name", field.name.as_str()));

    match &field.content {
        FieldContent::Text(None) => {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        FieldContent::Text(Some(text)) => {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        FieldContent::Model(model) => {
            writer.write_event(Event::Start(start))?;
            write_model(writer, model)?;
        }
        FieldContent::Models(models) => {
            writer.write_event(Event::Start(start))?;
            write_list(writer, models)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(FIELD)))?;
    Ok(())
}
