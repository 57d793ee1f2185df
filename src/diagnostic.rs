use owo_colors::OwoColorize;

/// Byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`, used for end-of-input errors.
    pub fn point(offset: usize) -> Self {
        Self { start: offset, end: offset }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<chumsky::span::SimpleSpan> for Span {
    fn from(span: chumsky::span::SimpleSpan) -> Self {
        Span::new(span.start, span.end)
    }
}

/// Points at a span with an optional message rendered under the caret line.
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Option<&'static str>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (index, ch) in source.char_indices() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn line_text(source: &str, line_num: usize) -> Option<&str> {
    source.split('\n').nth(line_num.saturating_sub(1))
}

/// Renders diagnostics in the familiar `error[E0101]: ...` layout.
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    origin: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, origin: &'a str, use_color: bool) -> Self {
        Self {
            source,
            origin,
            use_color,
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        self.render_header(&mut output, diagnostic);

        if let Some(label) = diagnostic.labels.first() {
            let (line, col) = line_col(self.source, label.span.start);
            let width = line.to_string().len();
            let gutter = " ".repeat(width + 1);

            output.push_str(&format!(
                "{}{} {}:{}:{}\n",
                " ".repeat(width),
                self.blue("-->"),
                self.origin,
                line,
                col
            ));
            output.push_str(&format!("{}{}\n", gutter, self.blue("|")));

            for label in &diagnostic.labels {
                self.render_label(&mut output, label, width);
            }

            output.push_str(&format!("{}{}\n", gutter, self.blue("|")));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!(" {} {}\n", self.blue("="), note));
        }

        output
    }

    fn render_header(&self, output: &mut String, diagnostic: &Diagnostic) {
        let severity = if self.use_color {
            "error".red().bold().to_string()
        } else {
            "error".to_string()
        };
        let message = if self.use_color {
            diagnostic.message.bold().to_string()
        } else {
            diagnostic.message.clone()
        };

        match diagnostic.code {
            Some(code) => output.push_str(&format!("{}[{}]: {}\n", severity, code, message)),
            None => output.push_str(&format!("{}: {}\n", severity, message)),
        }
    }

    fn render_label(&self, output: &mut String, label: &Label, width: usize) {
        let (line, col) = line_col(self.source, label.span.start);
        let Some(text) = line_text(self.source, line) else {
            return;
        };

        output.push_str(&format!(
            "{:>width$} {} {}\n",
            line,
            self.blue("|"),
            text,
            width = width
        ));

        // Carets stop at the end of the line for spans crossing a newline.
        let remaining = text.chars().count().saturating_sub(col - 1);
        let carets = "^".repeat(label.span.len().clamp(1, remaining.max(1)));
        let mut marker = format!("{}{}", " ".repeat(col - 1), carets);
        if !label.message.is_empty() {
            marker.push(' ');
            marker.push_str(&label.message);
        }
        let marker = if self.use_color {
            marker.red().to_string()
        } else {
            marker
        };
        output.push_str(&format!("{} {} {}\n", " ".repeat(width), self.blue("|"), marker));
    }

    fn blue(&self, text: &str) -> String {
        if self.use_color {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Renders every diagnostic followed by an abort summary line.
pub fn render_diagnostics(source: &str, origin: &str, diagnostics: &[Diagnostic], use_color: bool) -> String {
    let renderer = DiagnosticRenderer::new(source, origin, use_color);
    let mut output = String::new();

    for diagnostic in diagnostics {
        output.push_str(&renderer.render(diagnostic));
        output.push('\n');
    }

    let errors = diagnostics.len();
    if errors > 0 {
        output.push_str(&format!(
            "error: aborting due to {} error{}\n",
            errors,
            if errors == 1 { "" } else { "s" }
        ));
    }

    output
}
