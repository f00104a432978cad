use crate::application::{App, AppMode, SectionProgress, SubmissionState};
use crate::domain::{FieldId, FieldKind, FieldSpec, SCHEMA};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_form(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if app.mode == AppMode::Help {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let spec = app.selected.spec();
    let header = Paragraph::new(format!(
        "intake - Member Recruitment Application | {} > {}",
        spec.section, spec.label
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let progress = app.store.summary();
    let mut items = Vec::new();
    let mut selected_index = 0;
    let mut current_section = None;

    for spec in SCHEMA.iter() {
        if current_section != Some(spec.section) {
            current_section = Some(spec.section);
            if let Some(section) = progress.iter().find(|p| p.section == spec.section) {
                items.push(ListItem::new(section_line(section)));
            }
        }

        let selected = spec.id == app.selected;
        if selected {
            selected_index = items.len();
        }

        let mut lines = vec![field_line(app, spec, selected)];
        if selected {
            if let Some(options) = options_line(app, spec) {
                lines.push(options);
            }
        }
        if let Some(message) = app.store.errors().get(spec.id) {
            lines.push(Line::from(Span::styled(
                format!("    ! {}", message),
                Style::default().fg(Color::Red),
            )));
        }
        items.push(ListItem::new(lines));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Application"))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    let mut state = ListState::default().with_selected(Some(selected_index));
    f.render_stateful_widget(list, area, &mut state);
}

fn section_line(progress: &SectionProgress) -> Line<'static> {
    let complete = progress.filled == progress.required;
    let counter_style = if complete {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Yellow)
    };
    Line::from(vec![
        Span::styled(
            progress.section.to_string(),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ),
        Span::styled(
            format!("  {}/{} required", progress.filled, progress.required),
            counter_style,
        ),
    ])
}

fn field_line(app: &App, spec: &FieldSpec, selected: bool) -> Line<'static> {
    let record = app.store.record();
    let marker = if spec.requirement.is_required() { " *" } else { "" };
    let label_style = if app.store.errors().contains(spec.id) {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    let value = match spec.kind {
        FieldKind::Text { max_len } => {
            let text = record.text(spec.id);
            let shown = if selected && app.mode == AppMode::Editing {
                with_cursor(text, app.cursor_position)
            } else {
                text.to_string()
            };
            match max_len {
                Some(limit) => format!("{}  ({}/{})", shown, text.chars().count(), limit),
                None => shown,
            }
        }
        FieldKind::SingleChoice(_) => match record.text(spec.id) {
            "" => "<select>".to_string(),
            choice => choice.to_string(),
        },
        FieldKind::MultiChoice(_) => record.selections(spec.id).join(", "),
        FieldKind::Boolean => {
            let check = if record.flag(spec.id) { "[x]" } else { "[ ]" };
            return Line::from(vec![
                Span::raw(format!("  {} ", check)),
                Span::styled(format!("{}{}", spec.label, marker), label_style),
            ]);
        }
    };

    Line::from(vec![
        Span::styled(format!("  {}{}: ", spec.label, marker), label_style),
        Span::raw(value),
    ])
}

fn options_line(app: &App, spec: &FieldSpec) -> Option<Line<'static>> {
    let record = app.store.record();
    let spans: Vec<Span<'static>> = match spec.kind {
        FieldKind::SingleChoice(options) => options
            .iter()
            .map(|option| {
                let mark = if record.text(spec.id) == *option { "(•)" } else { "( )" };
                Span::raw(format!("{} {}  ", mark, option))
            })
            .collect(),
        FieldKind::MultiChoice(options) => options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let checked = record.selections(spec.id).iter().any(|item| item == *option);
                let text = format!("{} {}", if checked { "[x]" } else { "[ ]" }, option);
                let style = if index == app.option_cursor {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                Span::styled(text, style)
            })
            .flat_map(|span| [span, Span::raw("  ")])
            .collect(),
        FieldKind::Text { .. } | FieldKind::Boolean => return None,
    };

    let mut line = vec![Span::raw("    ")];
    line.extend(spans);
    Some(Line::from(line))
}

fn with_cursor(text: &str, cursor: usize) -> String {
    let mut shown: String = text.chars().take(cursor).collect();
    shown.push('▏');
    shown.extend(text.chars().skip(cursor));
    shown
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref message) = app.status_message {
                message.clone()
            } else if let Some(banner) = app.submission_banner() {
                banner
            } else {
                hints_for(app.selected).to_string()
            }
        }
        AppMode::Editing => "Editing (Enter/Esc to finish, Ctrl+V: paste)".to_string(),
        AppMode::Help => "↑↓/jk: scroll | Home: top | Esc/q: close help".to_string(),
    };

    let style = match (app.mode, app.store.submission()) {
        (AppMode::Editing, _) => Style::default().fg(Color::Green),
        (AppMode::Help, _) => Style::default().fg(Color::Cyan),
        (AppMode::Normal, _) if app.status_message.is_some() => Style::default().fg(Color::Yellow),
        (AppMode::Normal, SubmissionState::Succeeded { .. }) => Style::default().fg(Color::Green),
        (AppMode::Normal, SubmissionState::Failed { .. }) => Style::default().fg(Color::Red),
        (AppMode::Normal, SubmissionState::InFlight) => Style::default().fg(Color::Yellow),
        (AppMode::Normal, SubmissionState::Idle) => Style::default(),
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn hints_for(field: FieldId) -> &'static str {
    match field.kind() {
        FieldKind::Text { .. } => "Enter: edit | Del: clear | ↑↓: move | Ctrl+S: submit | F1/?: help | q: quit",
        FieldKind::SingleChoice(_) => "←→: choose | Del: clear | ↑↓: move | Ctrl+S: submit | F1/?: help | q: quit",
        FieldKind::MultiChoice(_) => "←→: option | Space: toggle | ↑↓: move | Ctrl+S: submit | F1/?: help | q: quit",
        FieldKind::Boolean => "Space: check/uncheck | ↑↓: move | Ctrl+S: submit | F1/?: help | q: quit",
    }
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Help (Line {}/{})", start_line + 1, help_lines.len()))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });

    f.render_widget(help_widget, popup_area);
}

pub const HELP_TEXT: &str = r#"MEMBER RECRUITMENT APPLICATION

=== FILLING IN THE FORM ===
Fields marked * are required. Each section header shows how many of
its required fields are filled in.

Text fields        Enter to edit, type, Enter/Esc when done
                   Ctrl+V pastes from the clipboard while editing
                   Long answers are capped at 500 or 300 characters
Choice fields      ←/→ (or h/l) step through the options
                   Del/Backspace clears the choice
Checkbox groups    ←/→ move between options, Space toggles one
Declarations       Space checks or unchecks

=== NAVIGATION ===
↑↓ or j/k          Move between fields
PgUp/PgDn          Jump five fields
Home/End           First/last field

=== SUBMITTING ===
Ctrl+S             Validate and submit the application
                   Problems are listed under each field and the
                   cursor jumps to the first one. Editing a field
                   clears its message; everything is checked again
                   on the next submit.
                   While a submission is in progress you can keep
                   editing, but cannot submit again.
                   On success the form is cleared and your
                   application ID is shown in the status bar.

=== OTHER ===
F1 or ?            Show this help
q                  Quit"#;
