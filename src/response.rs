use crate::cast::CastConfig;
use crate::error::RecordError;
use crate::metadata::{FieldDefinition, FieldKind, FieldRegistry, FieldResult, PortalRegistry};
use crate::node::{FieldNode, RecordNode, RelatedSetNode};
use roxmltree::{Document, Node};
use smol_str::SmolStr;

// ─── Datasource ─────────────────────────────────────────────────────────────

/// The `datasource` element of a response header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Datasource {
    pub database: SmolStr,
    pub layout: SmolStr,
    pub table: SmolStr,
    /// Server notation, e.g. `MM/dd/yyyy`.
    pub date_format: String,
    pub time_format: String,
    pub timestamp_format: String,
    pub total_count: u64,
}

impl CastConfig {
    /// Formats the server announced in its response header.
    pub fn from_datasource(datasource: &Datasource) -> Self {
        CastConfig::from_server_formats(
            &datasource.date_format,
            &datasource.time_format,
            &datasource.timestamp_format,
        )
    }
}

// ─── Response ───────────────────────────────────────────────────────────────

/// A response document split into header metadata and record nodes, before
/// any value is cast.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Server error code, passed through uninterpreted. `0` means success.
    pub error_code: u32,
    pub datasource: Option<Datasource>,
    pub fields: FieldRegistry,
    pub portal_fields: PortalRegistry,
    pub count: u64,
    pub fetch_size: u64,
    pub records: Vec<RecordNode>,
}

impl Response {
    /// Parse `fmresultset` XML. Element names are matched without namespace.
    pub fn parse(xml: &str) -> Result<Self, RecordError> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        if root.tag_name().name() != "fmresultset" {
            return Err(RecordError::MalformedResponse(format!(
                "expected fmresultset root, found {}",
                root.tag_name().name()
            )));
        }

        let mut response = Response::default();
        for child in root.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "error" => response.error_code = parse_attr(child, "code")?.unwrap_or(0),
                "datasource" => response.datasource = Some(parse_datasource(child)?),
                "metadata" => parse_metadata(child, &mut response)?,
                "resultset" => {
                    response.count = parse_attr(child, "count")?.unwrap_or(0);
                    response.fetch_size = parse_attr(child, "fetch-size")?.unwrap_or(0);
                    for record in elements(child, "record") {
                        response.records.push(parse_record(record)?);
                    }
                }
                _ => {}
            }
        }

        tracing::debug!(
            error_code = response.error_code,
            fields = response.fields.len(),
            portals = response.portal_fields.len(),
            records = response.records.len(),
            "parsed response"
        );
        Ok(response)
    }
}

// ─── Element readers ────────────────────────────────────────────────────────

fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn required_attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, RecordError> {
    node.attribute(name).ok_or_else(|| {
        RecordError::MalformedResponse(format!(
            "<{}> is missing attribute {name:?}",
            node.tag_name().name()
        ))
    })
}

fn parse_attr<T: std::str::FromStr>(node: Node<'_, '_>, name: &str) -> Result<Option<T>, RecordError> {
    match node.attribute(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            RecordError::MalformedResponse(format!(
                "<{}> attribute {name:?} has invalid value {raw:?}",
                node.tag_name().name()
            ))
        }),
    }
}

fn yes_no(node: Node<'_, '_>, name: &str) -> bool {
    node.attribute(name)
        .is_some_and(|v| v.eq_ignore_ascii_case("yes"))
}

fn parse_datasource(node: Node<'_, '_>) -> Result<Datasource, RecordError> {
    let defaults = Datasource {
        date_format: "MM/dd/yyyy".into(),
        time_format: "HH:mm:ss".into(),
        timestamp_format: "MM/dd/yyyy HH:mm:ss".into(),
        ..Datasource::default()
    };
    let text = |name: &str| node.attribute(name).map(SmolStr::new).unwrap_or_default();
    Ok(Datasource {
        database: text("database"),
        layout: text("layout"),
        table: text("table"),
        date_format: node
            .attribute("date-format")
            .map_or(defaults.date_format, str::to_owned),
        time_format: node
            .attribute("time-format")
            .map_or(defaults.time_format, str::to_owned),
        timestamp_format: node
            .attribute("timestamp-format")
            .map_or(defaults.timestamp_format, str::to_owned),
        total_count: parse_attr(node, "total-count")?.unwrap_or(0),
    })
}

fn parse_field_definition(node: Node<'_, '_>) -> Result<FieldDefinition, RecordError> {
    let name = required_attr(node, "name")?;
    let result = required_attr(node, "result")?.parse::<FieldResult>()?;
    let kind = match node.attribute("type") {
        Some(kind) => kind.parse::<FieldKind>()?,
        None => FieldKind::Normal,
    };
    let mut definition = FieldDefinition::new(name, result)
        .with_kind(kind)
        .with_max_repeat(parse_attr(node, "max-repeat")?.unwrap_or(1));
    definition.global = yes_no(node, "global");
    definition.not_empty = yes_no(node, "not-empty");
    Ok(definition)
}

fn parse_metadata(node: Node<'_, '_>, response: &mut Response) -> Result<(), RecordError> {
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "field-definition" => response.fields.define(parse_field_definition(child)?),
            "relatedset-definition" => {
                let table = required_attr(child, "table")?;
                let registry = response
                    .portal_fields
                    .get_or_insert_with(table, FieldRegistry::new);
                for definition in elements(child, "field-definition") {
                    registry.define(parse_field_definition(definition)?);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Concatenated text content, so entities and CDATA sections split across
/// several text nodes come back whole.
fn inner_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}

fn parse_record(node: Node<'_, '_>) -> Result<RecordNode, RecordError> {
    let mut record = RecordNode {
        mod_id: node.attribute("mod-id").map(SmolStr::new),
        record_id: node.attribute("record-id").map(SmolStr::new),
        ..RecordNode::default()
    };
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "field" => {
                let mut field = FieldNode::new(required_attr(child, "name")?);
                field.data = elements(child, "data").map(inner_text).collect();
                record.fields.push(field);
            }
            "relatedset" => {
                let mut related = RelatedSetNode::new(required_attr(child, "table")?);
                for row in elements(child, "record") {
                    related.records.push(parse_record(row)?);
                }
                record.related_sets.push(related);
            }
            _ => {}
        }
    }
    Ok(record)
}
