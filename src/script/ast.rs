//! Abstract Syntax Tree types for the layout script

use crate::layout::Orientation;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Valid identifier (alphanumeric + underscore, starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root AST node - a complete script
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub statements: Vec<Spanned<Statement>>,
}

/// One script statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `margins top left bottom right`
    Margins {
        top: i32,
        left: i32,
        bottom: i32,
        right: i32,
    },
    /// `gap horizontal vertical`
    Gap { horizontal: i32, vertical: i32 },
    /// `let name = anchor(...)`
    Let {
        name: Spanned<Identifier>,
        value: AnchorExpr,
    },
    /// `relate anchor to related [+|- offset]`
    Relate {
        anchor: Spanned<AnchorRef>,
        related: Spanned<AnchorRef>,
        /// Kept from the anchor when absent
        offset: Option<i32>,
    },
    /// `absolute anchor position`
    Absolute {
        anchor: Spanned<AnchorRef>,
        position: i32,
    },
    /// `autosize anchor on|off`
    AutoSize {
        anchor: Spanned<AnchorRef>,
        enabled: bool,
    },
    /// `stub ["label"] [(w, h)] [#color] at placement`
    Stub(StubDecl),
}

/// Right-hand side of a `let`
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorExpr {
    /// `anchor(ref)`
    AutoSize(Spanned<AnchorRef>),
    /// `anchor(ref, offset)`
    Relative(Spanned<AnchorRef>, i32),
    /// `anchor(horizontal|vertical, position)`
    Absolute(Orientation, i32),
}

/// A reference to an existing or generated anchor
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorRef {
    /// A `let` binding or a border/margin name
    Named(Identifier),
    ColumnLeft(i32),
    ColumnRight(i32),
    RowTop(i32),
    RowBottom(i32),
}

impl std::fmt::Display for AnchorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnchorRef::Named(name) => write!(f, "{}", name),
            AnchorRef::ColumnLeft(i) => write!(f, "col_left({})", i),
            AnchorRef::ColumnRight(i) => write!(f, "col_right({})", i),
            AnchorRef::RowTop(i) => write!(f, "row_top({})", i),
            AnchorRef::RowBottom(i) => write!(f, "row_bottom({})", i),
        }
    }
}

/// A placeholder child
#[derive(Debug, Clone, PartialEq)]
pub struct StubDecl {
    pub label: Option<String>,
    pub size: Option<(i32, i32)>,
    pub fill: Option<String>,
    pub placement: Placement,
}

/// Where a stub is attached
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// `(top, left, bottom, right)`, each side a reference or `null`
    Edges {
        top: Option<Spanned<AnchorRef>>,
        left: Option<Spanned<AnchorRef>>,
        bottom: Option<Spanned<AnchorRef>>,
        right: Option<Spanned<AnchorRef>>,
    },
    /// `cell(column, row)`
    Cell { column: i32, row: i32 },
    /// `cells(begin_column, begin_row, end_column, end_row)`
    Cells {
        begin_column: i32,
        begin_row: i32,
        end_column: i32,
        end_row: i32,
    },
}
