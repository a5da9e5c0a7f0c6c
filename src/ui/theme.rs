use ratatui::prelude::*;

/// Theme errors
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Unknown theme '{0}' (available: {1})")]
    UnknownTheme(String, String),
}

/// Runtime theme with direct field access for all UI elements
#[derive(Debug, Clone)]
pub struct Theme {
    // === Default Colors ===
    pub default_fg: Color,
    pub default_bg: Color,

    // === Modal Backgrounds ===
    pub modal_bg: Color,
    pub error_modal_bg: Color,

    // === Other Backgrounds ===
    pub selection_bg: Color,
    pub status_bar_bg: Color,

    // === Navigation ===
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub tab_divider: Style,

    // === Record Table ===
    pub table_header: Style,
    pub row_text: Style,
    pub row_text_selected: Style,
    pub row_email: Style,
    pub row_actions: Style,
    pub table_item_count: Style,
    pub empty_text: Style,

    // === Form Modal ===
    pub form_title: Style,
    pub form_label: Style,
    pub form_input: Style,
    pub form_input_border: Style,
    pub form_input_focused_border: Style,
    pub form_button: Style,
    pub form_button_primary: Style,

    // === Static Pages ===
    pub page_title: Style,
    pub page_text: Style,

    // === Status Bar ===
    pub status_key: Style,
    pub status_desc: Style,

    // === Help Modal ===
    pub help_title: Style,
    pub help_header: Style,
    pub help_key: Style,
    pub help_desc: Style,
    pub help_footer: Style,

    // === Error / Alert Modals ===
    pub error_text: Style,
    pub error_border: Style,
    pub alert_border: Style,

    // === Flash Messages ===
    pub flash_error: Style,
    pub flash_warn: Style,
    pub flash_info: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (dark)
    pub fn catppuccin_mocha() -> Self {
        let fg = Color::Rgb(205, 214, 244);
        let bg = Color::Rgb(30, 30, 46);
        let subtext = Color::Rgb(166, 173, 200);
        let blue = Color::Rgb(137, 180, 250);
        let yellow = Color::Rgb(249, 226, 175);
        let red = Color::Rgb(243, 139, 168);

        Theme {
            default_fg: fg,
            default_bg: bg,

            modal_bg: Color::Rgb(24, 24, 37),
            error_modal_bg: Color::Rgb(24, 24, 37),

            selection_bg: Color::Rgb(49, 50, 68),
            status_bar_bg: Color::Rgb(49, 50, 68),

            tab_active: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(subtext),
            tab_divider: Style::default().fg(Color::Rgb(108, 112, 134)),

            table_header: Style::default().fg(subtext).add_modifier(Modifier::BOLD),
            row_text: Style::default().fg(fg),
            row_text_selected: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            row_email: Style::default().fg(Color::Rgb(137, 220, 235)),
            row_actions: Style::default().fg(subtext),
            table_item_count: Style::default().fg(subtext).add_modifier(Modifier::DIM),
            empty_text: Style::default().fg(subtext).add_modifier(Modifier::ITALIC),

            form_title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            form_label: Style::default().fg(subtext),
            form_input: Style::default().fg(yellow),
            form_input_border: Style::default().fg(Color::Rgb(108, 112, 134)),
            form_input_focused_border: Style::default().fg(blue),
            form_button: Style::default().fg(subtext),
            form_button_primary: Style::default().fg(blue).add_modifier(Modifier::BOLD),

            page_title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            page_text: Style::default().fg(fg),

            status_key: Style::default().fg(fg).add_modifier(Modifier::BOLD),
            status_desc: Style::default().fg(subtext),

            help_title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            help_header: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
            help_desc: Style::default().fg(fg),
            help_footer: Style::default().fg(subtext),

            error_text: Style::default().fg(fg),
            error_border: Style::default().fg(red),
            alert_border: Style::default().fg(yellow),

            flash_error: Style::default().fg(red),
            flash_warn: Style::default().fg(yellow),
            flash_info: Style::default().fg(subtext),
        }
    }

    /// Catppuccin Latte theme (light)
    pub fn catppuccin_latte() -> Self {
        let fg = Color::Rgb(76, 79, 105);
        let bg = Color::Rgb(239, 241, 245);
        let subtext = Color::Rgb(108, 111, 133);
        let blue = Color::Rgb(30, 102, 245);
        let yellow = Color::Rgb(223, 142, 29);
        let red = Color::Rgb(210, 15, 57);

        Theme {
            default_fg: fg,
            default_bg: bg,

            modal_bg: Color::Rgb(230, 233, 239),
            error_modal_bg: Color::Rgb(230, 233, 239),

            selection_bg: Color::Rgb(204, 208, 218),
            status_bar_bg: Color::Rgb(204, 208, 218),

            tab_active: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(subtext),
            tab_divider: Style::default().fg(Color::Rgb(156, 160, 176)),

            table_header: Style::default().fg(subtext).add_modifier(Modifier::BOLD),
            row_text: Style::default().fg(fg),
            row_text_selected: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            row_email: Style::default().fg(Color::Rgb(4, 165, 229)),
            row_actions: Style::default().fg(subtext),
            table_item_count: Style::default().fg(subtext).add_modifier(Modifier::DIM),
            empty_text: Style::default().fg(subtext).add_modifier(Modifier::ITALIC),

            form_title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            form_label: Style::default().fg(subtext),
            form_input: Style::default().fg(yellow),
            form_input_border: Style::default().fg(Color::Rgb(156, 160, 176)),
            form_input_focused_border: Style::default().fg(blue),
            form_button: Style::default().fg(subtext),
            form_button_primary: Style::default().fg(blue).add_modifier(Modifier::BOLD),

            page_title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            page_text: Style::default().fg(fg),

            status_key: Style::default().fg(fg).add_modifier(Modifier::BOLD),
            status_desc: Style::default().fg(subtext),

            help_title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            help_header: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
            help_desc: Style::default().fg(fg),
            help_footer: Style::default().fg(subtext),

            error_text: Style::default().fg(fg),
            error_border: Style::default().fg(red),
            alert_border: Style::default().fg(yellow),

            flash_error: Style::default().fg(red),
            flash_warn: Style::default().fg(yellow),
            flash_info: Style::default().fg(subtext),
        }
    }

    /// Load a built-in theme by name
    pub fn load(name: &str) -> Result<Self, ThemeError> {
        BuiltInTheme::from_name(name)
            .map(|t| t.to_theme())
            .ok_or_else(|| {
                let available = BuiltInTheme::all()
                    .iter()
                    .map(|t| t.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                ThemeError::UnknownTheme(name.to_string(), available)
            })
    }
}

/// Themes compiled into the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltInTheme {
    CatppuccinMocha,
    CatppuccinLatte,
}

impl BuiltInTheme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "mocha" | "catppuccin-mocha" | "dark" => Some(BuiltInTheme::CatppuccinMocha),
            "latte" | "catppuccin-latte" | "light" => Some(BuiltInTheme::CatppuccinLatte),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltInTheme::CatppuccinMocha => "mocha",
            BuiltInTheme::CatppuccinLatte => "latte",
        }
    }

    pub fn all() -> &'static [BuiltInTheme] {
        &[BuiltInTheme::CatppuccinMocha, BuiltInTheme::CatppuccinLatte]
    }

    pub fn to_theme(&self) -> Theme {
        match self {
            BuiltInTheme::CatppuccinMocha => Theme::catppuccin_mocha(),
            BuiltInTheme::CatppuccinLatte => Theme::catppuccin_latte(),
        }
    }
}
