//! Scoped style blocks and the shared token resolution tables.
//!
//! Every widget resolves semantic colors and sizes through this module so the
//! `(role, value)` lookups exist once. Token references always end in a literal
//! fallback, which keeps widgets legible with no theme applied.

/// Builds `var(--token, fallback)`.
pub fn var(token: &str, fallback: &str) -> String {
    format!("var({token}, {fallback})")
}

/// Builds a nested fallback chain: `var(--a, var(--b, literal))`.
pub fn var_chain(tokens: &[&str], literal: &str) -> String {
    tokens
        .iter()
        .rev()
        .fold(literal.to_string(), |fallback, token| var(token, &fallback))
}

/// `var(--component-<component>-<property>-<size>, literal)`.
pub fn component_token(component: &str, property: &str, size: Size, literal: &str) -> String {
    var(
        &format!("--component-{component}-{property}-{}", size.token()),
        literal,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Semantic color names shared by every widget.
pub enum SemanticColor {
    /// Brand accent.
    Primary,
    /// Secondary accent.
    Secondary,
    /// Neutral surface color.
    Base,
    /// Positive state.
    Success,
    /// Cautionary state.
    Warning,
    /// Failure state.
    Error,
    /// Informational state.
    Help,
}

impl SemanticColor {
    /// Every semantic color in table order.
    pub const ALL: [Self; 7] = [
        Self::Primary,
        Self::Secondary,
        Self::Base,
        Self::Success,
        Self::Warning,
        Self::Error,
        Self::Help,
    ];

    /// Attribute token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Base => "base",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Help => "help",
        }
    }

    /// Parses an attribute token.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|color| color.token() == raw.trim())
    }

    const fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
            Self::Base => 2,
            Self::Success => 3,
            Self::Warning => 4,
            Self::Error => 5,
            Self::Help => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Role a color plays inside a widget style.
pub enum ColorRole {
    /// Foreground/content color (`--<c>-content--`).
    Content,
    /// Muted foreground (`--<c>-content-light`).
    ContentLight,
    /// Application background (`--<c>-background-app`).
    BackgroundApp,
    /// Component surface (`--<c>-background-component`).
    BackgroundComponent,
    /// Hover surface (`--<c>-background-hover`).
    BackgroundHover,
    /// Pressed/active surface (`--<c>-background-active`).
    BackgroundActive,
    /// Border (`--<c>-background-border`).
    BackgroundBorder,
}

impl ColorRole {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Content => "content--",
            Self::ContentLight => "content-light",
            Self::BackgroundApp => "background-app",
            Self::BackgroundComponent => "background-component",
            Self::BackgroundHover => "background-hover",
            Self::BackgroundActive => "background-active",
            Self::BackgroundBorder => "background-border",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Content => 0,
            Self::ContentLight => 1,
            Self::BackgroundApp => 2,
            Self::BackgroundComponent => 3,
            Self::BackgroundHover => 4,
            Self::BackgroundActive => 5,
            Self::BackgroundBorder => 6,
        }
    }
}

/// Literal fallbacks indexed by `[role][color]` (primary, secondary, base, success,
/// warning, error, help).
const LITERAL_FALLBACKS: [[&str; 7]; 7] = [
    // content
    [
        "#0070f3", "#6c757d", "#1d1d1d", "#28a745", "#ffc107", "#dc3545", "#6f42c1",
    ],
    // content-light
    [
        "#5aa2f7", "#a1a8ae", "#6b6f72", "#6fc583", "#ffd75e", "#e8737e", "#a07fd8",
    ],
    // background-app
    [
        "#f1f6fa", "#f1f6fa", "#f1f6fa", "#f1f6fa", "#f1f6fa", "#f1f6fa", "#f1f6fa",
    ],
    // background-component
    [
        "#e6f0fe", "#eceef0", "#ffffff", "#e9f6ec", "#fff8e1", "#fbe9eb", "#f0ebf9",
    ],
    // background-hover
    [
        "#cce1fd", "#d9dcdf", "#d7dbde", "#d4edda", "#fff0c2", "#f6d3d7", "#e2d8f3",
    ],
    // background-active
    [
        "#99c3fb", "#c2c7cc", "#bcc0c3", "#a9dbb4", "#ffe285", "#eda7af", "#c5b1e6",
    ],
    // background-border
    [
        "#99c3fb", "#c2c7cc", "#d7dbde", "#a9dbb4", "#ffe285", "#eda7af", "#c5b1e6",
    ],
];

/// Literal fallback for `(role, color)`.
pub const fn literal_fallback(role: ColorRole, color: SemanticColor) -> &'static str {
    LITERAL_FALLBACKS[role.index()][color.index()]
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Resolved `color` attribute: a semantic name or a literal CSS color.
pub enum WidgetColor {
    /// One of the shared semantic colors.
    Semantic(SemanticColor),
    /// Unknown names pass through as literal CSS values.
    Literal(String),
}

impl Default for WidgetColor {
    fn default() -> Self {
        Self::Semantic(SemanticColor::Base)
    }
}

impl WidgetColor {
    /// Parses a `color` attribute; missing or empty values use `default`.
    pub fn parse(raw: Option<&str>, default: SemanticColor) -> Self {
        match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
            None => Self::Semantic(default),
            Some(raw) => SemanticColor::parse(raw)
                .map(Self::Semantic)
                .unwrap_or_else(|| Self::Literal(raw.to_string())),
        }
    }

    /// Class/`data-*` token: the semantic name, or `custom` for literals.
    pub fn token(&self) -> &str {
        match self {
            Self::Semantic(color) => color.token(),
            Self::Literal(_) => "custom",
        }
    }

    /// CSS value for `role` with its fallback chain.
    pub fn resolve(&self, role: ColorRole) -> String {
        match self {
            Self::Semantic(color) => var(
                &format!("--{}-{}", color.token(), role.suffix()),
                literal_fallback(role, *color),
            ),
            Self::Literal(literal) => literal.clone(),
        }
    }

    /// Literal color used where a computed value is needed (contrast checks).
    pub fn literal(&self, role: ColorRole) -> &str {
        match self {
            Self::Semantic(color) => literal_fallback(role, *color),
            Self::Literal(literal) => literal,
        }
    }
}

/// Black or white text, whichever contrasts better with a `#rgb`/`#rrggbb` background.
/// Non-hex colors get white text.
pub fn contrast_text_color(background: &str) -> &'static str {
    let Some(hex) = background.trim().strip_prefix('#') else {
        return "#fff";
    };
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|ch| [ch, ch]).collect(),
        6 => hex.to_string(),
        _ => return "#fff",
    };
    let channel = |at: usize| u8::from_str_radix(&expanded[at..at + 2], 16).ok();
    let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) else {
        return "#fff";
    };
    let luminance = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
    if luminance > 150 {
        "#000"
    } else {
        "#fff"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Size scale shared by every widget.
pub enum Size {
    /// Compact.
    Small,
    /// Default.
    Medium,
    /// Spacious.
    Large,
}

impl Default for Size {
    fn default() -> Self {
        Self::Medium
    }
}

impl Size {
    /// Attribute token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Parses a `size` attribute; unknown or missing values fall back to medium.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("small") => Self::Small,
            Some("large") => Self::Large,
            _ => Self::Medium,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One size-keyed metric: optional token per size plus a literal fallback.
pub struct SizeScale {
    tokens: [Option<&'static str>; 3],
    literals: [&'static str; 3],
}

impl SizeScale {
    /// CSS value for `size`.
    pub fn resolve(&self, size: Size) -> String {
        let literal = self.literals[size.index()];
        match self.tokens[size.index()] {
            Some(token) => var(token, literal),
            None => literal.to_string(),
        }
    }

    /// Literal value for `size` without the token reference.
    pub fn literal(&self, size: Size) -> &'static str {
        self.literals[size.index()]
    }
}

/// Control heights (buttons, sliders, inputs).
pub const CONTROL_HEIGHT: SizeScale = SizeScale {
    tokens: [
        Some("--sizing-small"),
        Some("--sizing-medium"),
        Some("--sizing-large"),
    ],
    literals: ["27px", "35px", "51px"],
};

/// Outer padding and gaps.
pub const SPACING: SizeScale = SizeScale {
    tokens: [
        Some("--spacing-x-small"),
        Some("--spacing-small"),
        Some("--spacing-medium"),
    ],
    literals: ["4px", "8px", "16px"],
};

/// Inner content padding.
pub const INNER_SPACING: SizeScale = SizeScale {
    tokens: [
        Some("--spacing-2x-small"),
        Some("--spacing-x-small"),
        Some("--spacing-small"),
    ],
    literals: ["2px", "4px", "8px"],
};

/// Body text size.
pub const FONT_SIZE: SizeScale = SizeScale {
    tokens: [
        Some("--font-size-small"),
        Some("--font-size-paragraph"),
        Some("--font-size-h5"),
    ],
    literals: ["12px", "14px", "18px"],
};

/// Badge text size.
pub const BADGE_FONT_SIZE: SizeScale = SizeScale {
    tokens: [Some("--size-p"), Some("--size-h5"), Some("--size-h4")],
    literals: ["16px", "18px", "20px"],
};

/// Badge minimum diameter.
pub const BADGE_MIN_SIZE: SizeScale = SizeScale {
    tokens: [None, None, None],
    literals: ["15px", "18px", "22px"],
};

/// Avatar diameter.
pub const AVATAR_SIZE: SizeScale = SizeScale {
    tokens: [
        Some("--component-avatar-size-small"),
        Some("--component-avatar-size-medium"),
        Some("--component-avatar-size-large"),
    ],
    literals: ["32px", "40px", "56px"],
};

/// Switch track height.
pub const SWITCH_HEIGHT: SizeScale = SizeScale {
    tokens: [None, None, None],
    literals: ["24px", "32px", "40px"],
};

/// Progress bar thickness.
pub const PROGRESS_HEIGHT: SizeScale = SizeScale {
    tokens: [
        Some("--component-progress-size-small"),
        Some("--component-progress-size-medium"),
        Some("--component-progress-size-large"),
    ],
    literals: ["4px", "8px", "12px"],
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// CSS rule with ordered declarations.
pub struct Rule {
    selector: String,
    declarations: Vec<(String, String)>,
}

impl Rule {
    /// Empty rule for `selector`.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: Vec::new(),
        }
    }

    /// Adds a declaration.
    pub fn decl(mut self, property: &str, value: impl Into<String>) -> Self {
        self.declarations.push((property.to_string(), value.into()));
        self
    }

    fn write(&self, out: &mut String) {
        out.push_str(&self.selector);
        out.push_str(" {");
        for (property, value) in &self.declarations {
            out.push(' ');
            out.push_str(property);
            out.push_str(": ");
            out.push_str(value);
            out.push(';');
        }
        out.push_str(" }\n");
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Scoped style block: static CSS text followed by generated rules.
pub struct StyleSheet {
    base: Vec<&'static str>,
    rules: Vec<Rule>,
}

impl StyleSheet {
    /// Sheet starting with a static CSS block.
    pub fn new(base: &'static str) -> Self {
        Self {
            base: vec![base],
            rules: Vec::new(),
        }
    }

    /// Appends a generated rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends a static CSS block.
    pub fn raw(mut self, css: &'static str) -> Self {
        self.base.push(css);
        self
    }

    /// Serialized CSS text.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for block in &self.base {
            out.push_str(block.trim());
            out.push('\n');
        }
        for rule in &self.rules {
            rule.write(&mut out);
        }
        out
    }
}

impl From<StyleSheet> for String {
    fn from(sheet: StyleSheet) -> Self {
        sheet.to_css()
    }
}
