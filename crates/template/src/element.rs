//! Parsed template elements and the linked element list.

/// One parsed unit of a template.
///
/// Block openers carry the index links wired up by the parser: a
/// `ForHeader` knows its `EndFor`, an `IfHeader` knows its optional `Else`
/// and its `EndIf`, and the closers point back at their openers. The links
/// let the executor jump by plain cursor arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Literal text emitted verbatim.
    Text(String),
    /// `{{ expr }}` output expression.
    Value(String),
    /// `{% FOR var IN expr %}`. `end` is the index of the matching ENDFOR.
    ForHeader {
        var: String,
        source: String,
        end: usize,
    },
    /// `{% BREAKIF expr %}`. `parent` is the index of the owning FOR header.
    BreakIf { guard: String, parent: usize },
    /// `{% ENDFOR %}`. `parent` is the index of the owning FOR header.
    EndFor { parent: usize },
    /// `{% IF expr %}`. `end` is the index of the matching ENDIF.
    IfHeader {
        condition: String,
        else_index: Option<usize>,
        end: usize,
    },
    /// `{% ELSE %}`.
    Else,
    /// `{% ENDIF %}`.
    EndIf,
    /// Left-trim the next emitted text run (a trailing `-` tag marker).
    SpaceControl,
}

/// The linked element list produced by parsing.
///
/// Immutable once built; all runtime loop state lives in the executor.
/// Rebuilt fresh on every render call.
#[derive(Debug, Default)]
pub struct Program {
    elements: Vec<ElementKind>,
}

impl Program {
    pub(crate) fn from_elements(elements: Vec<ElementKind>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[ElementKind] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
