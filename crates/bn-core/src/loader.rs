//! XMLBIF 0.3 network reader.
//!
//! Reads `VARIABLE` blocks (`NAME`, `OUTCOME`, `PROPERTY`) and `DEFINITION`
//! blocks (`FOR`, `GIVEN`, `TABLE`). A table is a flat list of numbers taken
//! in `(P(true), P(false))` pairs, one pair per parent assignment in CPT
//! index order. The first declared outcome is the `true` value.
//!
//! The loaded network is reordered so parents precede children, then
//! validated, so anything this module returns is ready for inference.

use crate::network::{BayesianNetwork, CptRow, Variable};
use bn_common::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;
use xml::reader::{EventReader, XmlEvent};

#[derive(Debug, Default)]
struct VariableDecl {
    name: Option<String>,
    outcomes: Vec<String>,
}

#[derive(Debug, Default)]
struct DefinitionDecl {
    target: Option<String>,
    given: Vec<String>,
    table: Option<String>,
}

#[derive(Debug)]
enum Block {
    Variable(VariableDecl),
    Definition(DefinitionDecl),
}

#[derive(Debug, Default)]
struct Document {
    name: Option<String>,
    variables: Vec<VariableDecl>,
    definitions: Vec<DefinitionDecl>,
}

/// Load a network from an XMLBIF file.
pub fn load_file(path: &Path) -> Result<BayesianNetwork> {
    let file = File::open(path)?;
    let network = load_reader(BufReader::new(file))?;
    debug!(
        path = %path.display(),
        variables = network.len(),
        "loaded network file"
    );
    Ok(network)
}

/// Load a network from XMLBIF text.
pub fn load_str(xml: &str) -> Result<BayesianNetwork> {
    load_reader(xml.as_bytes())
}

/// Load a network from any XMLBIF byte stream.
pub fn load_reader<R: Read>(reader: R) -> Result<BayesianNetwork> {
    build(parse(reader)?)
}

fn parse<R: Read>(reader: R) -> Result<Document> {
    let mut document = Document::default();
    let mut block: Option<Block> = None;
    let mut text = String::new();

    for event in EventReader::new(reader) {
        match event.map_err(|e| Error::Load(format!("malformed XML: {}", e)))? {
            XmlEvent::StartElement { name, .. } => {
                text.clear();
                match name.local_name.to_ascii_uppercase().as_str() {
                    "VARIABLE" => block = Some(Block::Variable(VariableDecl::default())),
                    "DEFINITION" | "PROBABILITY" => {
                        block = Some(Block::Definition(DefinitionDecl::default()))
                    }
                    _ => {}
                }
            }
            XmlEvent::Characters(chunk) | XmlEvent::CData(chunk) => text.push_str(&chunk),
            XmlEvent::EndElement { name } => {
                let tag = name.local_name.to_ascii_uppercase();
                let value = text.trim().to_string();
                text.clear();
                match (tag.as_str(), block.as_mut()) {
                    ("NAME", Some(Block::Variable(v))) => v.name = Some(value),
                    ("NAME", None) => document.name = Some(value),
                    ("OUTCOME", Some(Block::Variable(v))) => v.outcomes.push(value),
                    ("FOR", Some(Block::Definition(d))) => d.target = Some(value),
                    ("GIVEN", Some(Block::Definition(d))) => d.given.push(value),
                    ("TABLE", Some(Block::Definition(d))) => d.table = Some(value),
                    // PROPERTY and unknown tags carry nothing the model uses
                    _ => {}
                }
                match (tag.as_str(), block.take()) {
                    ("VARIABLE", Some(Block::Variable(v))) => document.variables.push(v),
                    ("DEFINITION" | "PROBABILITY", Some(Block::Definition(d))) => {
                        document.definitions.push(d)
                    }
                    (_, open) => block = open,
                }
            }
            _ => {}
        }
    }
    Ok(document)
}

fn build(document: Document) -> Result<BayesianNetwork> {
    let mut network = BayesianNetwork::new(document.name.unwrap_or_default());

    for decl in document.variables {
        let name = decl
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::Load("VARIABLE without a NAME".to_string()))?;
        let mut variable = Variable::new(&name);
        match decl.outcomes.len() {
            0 => {}
            2 => variable.set_outcomes(decl.outcomes),
            n => {
                return Err(Error::Load(format!(
                    "variable {} has {} outcomes; only boolean variables are supported",
                    name, n
                )))
            }
        }
        network.add_variable(variable)?;
    }

    let mut defined: HashSet<String> = HashSet::new();
    for definition in document.definitions {
        let target = definition
            .target
            .ok_or_else(|| Error::Load("DEFINITION without a FOR".to_string()))?;
        network.position(&target)?;
        if !defined.insert(target.clone()) {
            return Err(Error::Load(format!("{} is defined more than once", target)));
        }
        for parent in &definition.given {
            network.connect(parent, &target)?;
        }
        let rows = parse_table(&target, definition.table.as_deref().unwrap_or(""))?;
        network.variable_mut(&target)?.set_cpt(rows);
    }

    network.sort_topologically()?;
    network.validate()?;
    Ok(network)
}

/// Split a TABLE body into `(P(true), P(false))` rows.
fn parse_table(variable: &str, text: &str) -> Result<Vec<CptRow>> {
    let values = text
        .split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| {
                Error::Load(format!("TABLE for {}: '{}' is not a number", variable, token))
            })
        })
        .collect::<Result<Vec<f64>>>()?;
    if values.len() % 2 != 0 {
        return Err(Error::Load(format!(
            "TABLE for {} has {} numbers; expected (true, false) pairs",
            variable,
            values.len()
        )));
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| CptRow::new(pair[0], pair[1]))
        .collect())
}
