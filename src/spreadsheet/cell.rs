/// Vertical script offset of a formatting run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ScriptOffset {
    /// Regular baseline text
    #[default]
    None,
    Superscript,
    Subscript,
    /// Any other offset declared by the file; cannot be normalized
    Other(String),
}

impl ScriptOffset {
    /// Maps a SpreadsheetML `vertAlign` value to an offset.
    pub(crate) fn parse(value: &str) -> Self {
        match value {
            "baseline" => Self::None,
            "superscript" => Self::Superscript,
            "subscript" => Self::Subscript,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// A contiguous span of cell text sharing one script offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub offset: ScriptOffset,
}

impl TextRun {
    pub fn new(text: &str, offset: ScriptOffset) -> Self {
        TextRun {
            text: text.to_owned(),
            offset,
        }
    }

    pub fn plain(text: &str) -> Self {
        Self::new(text, ScriptOffset::None)
    }
}

/// Content of one physical cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellContent {
    #[default]
    Blank,
    Boolean(bool),
    Number(f64),
    /// Text made of formatting runs; plain text is a single run
    Text(Vec<TextRun>),
    /// Formula cell holding its expression
    Formula(String),
    /// Error value such as `#N/A`
    Error(String),
}

impl CellContent {
    /// Creates plain text content without formatting runs.
    pub fn text(text: &str) -> Self {
        CellContent::Text(vec![TextRun::plain(text)])
    }

    /// Short name of the content kind used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CellContent::Blank => "blank",
            CellContent::Boolean(_) => "boolean",
            CellContent::Number(_) => "number",
            CellContent::Text(_) => "text",
            CellContent::Formula(_) => "formula",
            CellContent::Error(_) => "error",
        }
    }
}

/// One edge of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BorderSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// A styled border line on one cell edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BorderLine {
    /// Style name such as "thin", "medium" or "none"
    pub style: String,
    /// Explicit RGB color; `None` for automatic, theme or indexed colors
    pub color: Option<[u8; 3]>,
}

impl BorderLine {
    pub fn new(style: &str, color: Option<[u8; 3]>) -> Self {
        BorderLine {
            style: style.to_owned(),
            color,
        }
    }

    /// A thin line in the default color.
    pub fn thin() -> Self {
        Self::new("thin", None)
    }

    /// A line is visible unless its style is "none" or every RGB byte is at or above `threshold`.
    pub fn is_visible(&self, threshold: u8) -> bool {
        if self.style.is_empty() || self.style == "none" {
            return false;
        }
        match self.color {
            Some(rgb) => rgb.iter().any(|&byte| byte < threshold),
            None => true,
        }
    }
}

/// Parses an `RRGGBB` or `AARRGGBB` hex color, ignoring the alpha byte.
pub(crate) fn parse_rgb(value: &str) -> Option<[u8; 3]> {
    let hex = match value.len() {
        8 => value.get(2..)?,
        6 => value,
        _ => return None,
    };
    let byte = |index: usize| u8::from_str_radix(hex.get(index..index + 2)?, 16).ok();
    Some([byte(0)?, byte(2)?, byte(4)?])
}

/// Border lines on the four edges of a cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellBorder {
    pub top: Option<BorderLine>,
    pub bottom: Option<BorderLine>,
    pub left: Option<BorderLine>,
    pub right: Option<BorderLine>,
}

impl CellBorder {
    pub fn side(&self, side: BorderSide) -> Option<&BorderLine> {
        match side {
            BorderSide::Top => self.top.as_ref(),
            BorderSide::Bottom => self.bottom.as_ref(),
            BorderSide::Left => self.left.as_ref(),
            BorderSide::Right => self.right.as_ref(),
        }
    }

    pub(crate) fn set_side(&mut self, side: BorderSide, line: BorderLine) {
        match side {
            BorderSide::Top => self.top = Some(line),
            BorderSide::Bottom => self.bottom = Some(line),
            BorderSide::Left => self.left = Some(line),
            BorderSide::Right => self.right = Some(line),
        }
    }
}

/// A physical cell: its content and its border lines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    pub border: CellBorder,
}
