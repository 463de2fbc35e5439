//! Runs a parsed script against a container
//!
//! Statements are applied in order through the layout construction API.
//! Names bound with `let` live for the duration of one run.

use std::collections::HashMap;

use crate::error::{ScriptError, Span};
use crate::layout::{AnchorId, Component, Container, FormLayout, Insets, LayoutConfig, Size};
use crate::script::ast::*;
use crate::stylesheet::StubShades;

/// Border and margin names every script can refer to
pub const BUILTIN_NAMES: [&str; 8] = [
    "top",
    "left",
    "bottom",
    "right",
    "top_margin",
    "left_margin",
    "bottom_margin",
    "right_margin",
];

/// Applies script statements to a container
pub struct Interpreter<'a> {
    container: &'a mut Container,
    default_stub_size: Size,
    shades: Option<&'a mut StubShades>,
    names: HashMap<String, AnchorId>,
}

impl<'a> Interpreter<'a> {
    pub fn new(container: &'a mut Container, config: &LayoutConfig) -> Self {
        Self {
            container,
            default_stub_size: config.default_stub_size,
            shades: None,
            names: HashMap::new(),
        }
    }

    /// Color stubs without an explicit fill from `shades`
    pub fn with_shades(mut self, shades: &'a mut StubShades) -> Self {
        self.shades = Some(shades);
        self
    }

    /// Anchors bound with `let` so far
    pub fn names(&self) -> &HashMap<String, AnchorId> {
        &self.names
    }

    /// Apply every statement; stops at the first failing one
    pub fn run(&mut self, script: &Script) -> Result<(), ScriptError> {
        for statement in &script.statements {
            self.execute(&statement.node, &statement.span)?;
        }
        tracing::debug!(
            statements = script.statements.len(),
            children = self.container.len(),
            "script applied"
        );
        Ok(())
    }

    fn execute(&mut self, statement: &Statement, span: &Span) -> Result<(), ScriptError> {
        let layout_err = |err| ScriptError::layout(err, span.clone());
        match statement {
            Statement::Margins {
                top,
                left,
                bottom,
                right,
            } => {
                self.container
                    .layout_mut()
                    .set_margins(Insets::new(*top, *left, *bottom, *right));
            }
            Statement::Gap {
                horizontal,
                vertical,
            } => {
                let layout = self.container.layout_mut();
                layout.set_horizontal_gap(*horizontal);
                layout.set_vertical_gap(*vertical);
            }
            Statement::Let { name, value } => {
                if BUILTIN_NAMES.contains(&name.node.as_str()) {
                    return Err(ScriptError::ReservedName {
                        name: name.node.to_string(),
                        span: name.span.clone(),
                    });
                }
                let anchor = match value {
                    AnchorExpr::AutoSize(related) => {
                        let related = self.resolve(related)?;
                        self.container
                            .layout_mut()
                            .create_auto_size_anchor(related)
                            .map_err(layout_err)?
                    }
                    AnchorExpr::Relative(related, offset) => {
                        let related = self.resolve(related)?;
                        self.container
                            .layout_mut()
                            .create_anchor(related, *offset)
                            .map_err(layout_err)?
                    }
                    AnchorExpr::Absolute(orientation, position) => self
                        .container
                        .layout_mut()
                        .create_absolute_anchor(*orientation, *position),
                };
                tracing::trace!(name = %name.node, %anchor, "anchor bound");
                self.names.insert(name.node.to_string(), anchor);
            }
            Statement::Relate {
                anchor,
                related,
                offset,
            } => {
                let anchor = self.resolve(anchor)?;
                let related = self.resolve(related)?;
                let graph = self.container.layout_mut().graph_mut();
                let offset = match offset {
                    Some(offset) => *offset,
                    None => graph.require(anchor).map_err(layout_err)?.relative_position(),
                };
                graph.set_relation(anchor, related, offset).map_err(layout_err)?;
            }
            Statement::Absolute { anchor, position } => {
                let anchor = self.resolve(anchor)?;
                let graph = self.container.layout_mut().graph_mut();
                graph.clear_relation(anchor).map_err(layout_err)?;
                graph
                    .set_absolute_position(anchor, *position)
                    .map_err(layout_err)?;
            }
            Statement::AutoSize { anchor, enabled } => {
                let anchor = self.resolve(anchor)?;
                self.container
                    .layout_mut()
                    .graph_mut()
                    .set_auto_size(anchor, *enabled)
                    .map_err(layout_err)?;
            }
            Statement::Stub(stub) => self.add_stub(stub, span)?,
        }
        Ok(())
    }

    fn add_stub(&mut self, stub: &StubDecl, span: &Span) -> Result<(), ScriptError> {
        let constraints = match &stub.placement {
            Placement::Edges {
                top,
                left,
                bottom,
                right,
            } => {
                let top = self.resolve_optional(top.as_ref())?;
                let left = self.resolve_optional(left.as_ref())?;
                let bottom = self.resolve_optional(bottom.as_ref())?;
                let right = self.resolve_optional(right.as_ref())?;
                self.container.layout().constraints(top, left, bottom, right)
            }
            Placement::Cell { column, row } => self
                .container
                .layout_mut()
                .cell(*column, *row)
                .map_err(|err| ScriptError::layout(err, span.clone()))?,
            Placement::Cells {
                begin_column,
                begin_row,
                end_column,
                end_row,
            } => self
                .container
                .layout_mut()
                .cells(*begin_column, *begin_row, *end_column, *end_row)
                .map_err(|err| ScriptError::layout(err, span.clone()))?,
        };

        let size = stub
            .size
            .map(|(width, height)| Size::new(width, height))
            .unwrap_or(self.default_stub_size);
        let mut component = match &stub.label {
            Some(label) => Component::new(label.clone(), size),
            None => Component::stub(size),
        };
        let fill = match &stub.fill {
            Some(fill) => Some(fill.clone()),
            None => self.shades.as_mut().and_then(|shades| shades.next()),
        };
        if let Some(fill) = fill {
            component = component.with_fill(fill);
        }

        self.container
            .add(component, constraints)
            .map_err(|err| ScriptError::layout(err, span.clone()))?;
        Ok(())
    }

    fn resolve_optional(
        &mut self,
        reference: Option<&Spanned<AnchorRef>>,
    ) -> Result<Option<AnchorId>, ScriptError> {
        reference.map(|r| self.resolve(r)).transpose()
    }

    /// Look up a name or generate the referenced lane anchor
    fn resolve(&mut self, reference: &Spanned<AnchorRef>) -> Result<AnchorId, ScriptError> {
        let layout = self.container.layout_mut();
        let lane = match &reference.node {
            AnchorRef::ColumnLeft(i) => layout.column_left(*i),
            AnchorRef::ColumnRight(i) => layout.column_right(*i),
            AnchorRef::RowTop(i) => layout.row_top(*i),
            AnchorRef::RowBottom(i) => layout.row_bottom(*i),
            AnchorRef::Named(name) => match builtin_anchor(layout, name.as_str()) {
                Some(anchor) => Ok(anchor),
                None => match self.names.get(name.as_str()) {
                    Some(anchor) => Ok(*anchor),
                    None => {
                        return Err(ScriptError::UnknownAnchor {
                            name: name.to_string(),
                            span: reference.span.clone(),
                            suggestions: find_similar(&self.names, name.as_str(), 2),
                        })
                    }
                },
            },
        };
        lane.map_err(|err| ScriptError::layout(err, reference.span.clone()))
    }
}

fn builtin_anchor(layout: &FormLayout, name: &str) -> Option<AnchorId> {
    let anchor = match name {
        "top" => layout.top_anchor(),
        "left" => layout.left_anchor(),
        "bottom" => layout.bottom_anchor(),
        "right" => layout.right_anchor(),
        "top_margin" => layout.top_margin_anchor(),
        "left_margin" => layout.left_margin_anchor(),
        "bottom_margin" => layout.bottom_margin_anchor(),
        "right_margin" => layout.right_margin_anchor(),
        _ => return None,
    };
    Some(anchor)
}

/// Known names within a maximum edit distance, closest first
fn find_similar(names: &HashMap<String, AnchorId>, target: &str, max_distance: usize) -> Vec<String> {
    let mut candidates: Vec<(String, usize)> = names
        .keys()
        .map(String::as_str)
        .chain(BUILTIN_NAMES)
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            if dist <= max_distance && dist > 0 {
                Some((name.to_string(), dist))
            } else {
                None
            }
        })
        .collect();

    candidates.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    candidates
        .into_iter()
        .map(|(name, _)| name)
        .take(3)
        .collect()
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    // Single rolling row of the edit matrix
    let mut row: Vec<usize> = (0..=n).collect();
    for (i, ca) in a_chars.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[n]
}

/// Parse `source` and apply it to `container`
pub fn run_script(
    source: &str,
    container: &mut Container,
    config: &LayoutConfig,
) -> Result<HashMap<String, AnchorId>, ScriptError> {
    let script = super::parse(source)?;
    let mut interpreter = Interpreter::new(container, config);
    interpreter.run(&script)?;
    Ok(interpreter.names)
}
