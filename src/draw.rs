use crate::app::{App, MenuItem};
use crate::state::app_state::Focus;
use crate::state::network::LoadingState;
use crate::ui::layout::LayoutAreas;
use pickem_api::{Game, Pick, WeekSchedule, team_slug};
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal, backend::Backend};
use tui_logger::TuiLoggerWidget;

pub fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState) {
    let size = terminal.size().unwrap_or_default();
    // Too cramped to lay anything out.
    if size.width <= 10 || size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(size);

    terminal
        .draw(|f| {
            if let Some(message) = &app.state.load_error {
                draw_load_error(f, f.area(), message);
                return;
            }

            layout.update(f.area(), app.settings.full_screen);
            if !app.settings.full_screen {
                draw_tabs(f, layout.tab_bar, app, loading);
            }

            match app.state.active_tab {
                _ if app.state.schedule.is_none() => {
                    draw_placeholder(f, layout.main, "Loading this week's games...");
                }
                MenuItem::Sheet => draw_sheet(f, layout.main, app),
                MenuItem::Review => draw_review(f, layout.main, app),
                MenuItem::Help => draw_help(f, layout.main),
            }

            draw_status_bar(f, layout.status_bar, app);
            if app.state.show_logs {
                draw_logs(f, layout.main);
            }
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App, loading: LoadingState) {
    let selected = match app.state.active_tab {
        MenuItem::Sheet | MenuItem::Help => 0,
        MenuItem::Review => 1,
    };
    let tabs = Tabs::new(vec![Line::from("Sheet"), Line::from("Review")])
        .block(default_border(Color::DarkGray).title(" picksheet "))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, tab_bar[0]);

    let spinner = Paragraph::new(format!("{} ", loading.spinner))
        .alignment(Alignment::Right)
        .block(default_border(Color::DarkGray));
    f.render_widget(spinner, tab_bar[1]);
}

fn draw_load_error(f: &mut Frame, area: Rect, message: &str) {
    let block = default_border(Color::Red).title(" could not load this week ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "The week's games could not be loaded.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_owned()),
        Line::from(""),
        Line::from(Span::styled("Press q to quit.", Style::default().fg(Color::Gray))),
    ];
    f.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

fn draw_placeholder(f: &mut Frame, area: Rect, message: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        inner,
    );
}

// ---------------------------------------------------------------------------
// Sheet tab
// ---------------------------------------------------------------------------

fn draw_sheet(f: &mut Frame, area: Rect, app: &App) {
    let Some(schedule) = app.state.schedule.as_ref() else {
        return;
    };

    let [form_area, error_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(7)]).areas(area);

    let mut lines: Vec<Line> = Vec::new();
    let mut focused_line = 0usize;

    lines.push(header_line(schedule));
    lines.push(Line::from(""));

    let focus = app.state.focus;

    fn push_row<'a>(
        lines: &mut Vec<Line<'a>>,
        focused_line: &mut usize,
        focus: Focus,
        row_focus: Focus,
        line: Line<'a>,
    ) {
        if focus == row_focus {
            *focused_line = lines.len();
        }
        lines.push(line);
    }

    push_row(
        &mut lines,
        &mut focused_line,
        focus,
        Focus::Name,
        text_row("Name", &app.state.form.name, focus == Focus::Name),
    );
    push_row(
        &mut lines,
        &mut focused_line,
        focus,
        Focus::Email,
        text_row("Email", &app.state.form.email, focus == Focus::Email),
    );
    lines.push(Line::from(""));

    for (n, game) in schedule.games.iter().enumerate() {
        let pick = app.state.form.picks.get(&game.id).copied();
        push_row(
            &mut lines,
            &mut focused_line,
            focus,
            Focus::Game(n),
            game_row(n, game, pick, focus == Focus::Game(n)),
        );
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tiebreakers (total points)",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (n, entry) in app.state.form.tiebreakers.iter().enumerate() {
        let label = schedule
            .find_game(&entry.game_id)
            .map(Game::matchup)
            .unwrap_or_else(|| entry.game_id.clone());
        push_row(
            &mut lines,
            &mut focused_line,
            focus,
            Focus::Tiebreaker(n),
            text_row(&format!("  {label}"), &entry.total, focus == Focus::Tiebreaker(n)),
        );
    }

    lines.push(Line::from(""));
    push_row(
        &mut lines,
        &mut focused_line,
        focus,
        Focus::Submit,
        submit_row(app, focus == Focus::Submit),
    );

    let block = default_border(Color::DarkGray).title(format!(" week {} ", schedule.week));
    let inner_height = block.inner(form_area).height as usize;
    let scroll = focused_line.saturating_sub(inner_height.saturating_sub(1)) as u16;

    f.render_widget(
        Paragraph::new(lines).block(block).scroll((scroll, 0)),
        form_area,
    );

    draw_errors(f, error_area, app);
}

fn header_line(schedule: &WeekSchedule) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("Week {}", schedule.week),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(deadline) = schedule.deadline {
        spans.push(Span::styled(
            format!("   picks due {}", deadline.format("%a %b %-d, %H:%M UTC")),
            Style::default().fg(Color::Gray),
        ));
        if deadline < chrono::Utc::now() {
            spans.push(Span::styled(
                "  (deadline passed)",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
    }
    Line::from(spans)
}

fn text_row(label: &str, value: &str, focused: bool) -> Line<'static> {
    let cursor = if focused { "_" } else { "" };
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{} {label}: ", marker(focused)), style),
        Span::styled(format!("{value}{cursor}"), style.add_modifier(Modifier::BOLD)),
    ])
}

fn game_row(n: usize, game: &Game, pick: Option<Pick>, focused: bool) -> Line<'static> {
    let base = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let side_style = |chosen: bool, team: &str| {
        let style = base.fg(team_color(team));
        if chosen {
            style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            style
        }
    };

    let picked_label = match pick {
        Some(p) => format!("  → {}", p.winner_name(game)),
        None => "  → (no pick)".to_owned(),
    };
    let label_style = if pick.is_some() {
        base.add_modifier(Modifier::BOLD)
    } else {
        base.fg(Color::DarkGray)
    };

    Line::from(vec![
        Span::styled(format!("{} {:>2}. ", marker(focused), n + 1), base),
        Span::styled(game.away.clone(), side_style(pick == Some(Pick::Away), &game.away)),
        Span::styled(" @ ", base),
        Span::styled(game.home.clone(), side_style(pick == Some(Pick::Home), &game.home)),
        Span::styled(picked_label, label_style),
    ])
}

fn submit_row(app: &App, focused: bool) -> Line<'static> {
    let ready = app.errors().is_empty() && !app.state.submitting;
    let label = if app.state.submitting {
        "[ Submitting... ]"
    } else if ready {
        "[ Submit picks ]"
    } else {
        "[ Submit picks ] (finish the sheet first)"
    };
    let mut style = if ready {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Line::from(vec![
        Span::raw(format!("{} ", marker(focused))),
        Span::styled(label, style),
    ])
}

fn marker(focused: bool) -> &'static str {
    if focused { ">" } else { " " }
}

fn draw_errors(f: &mut Frame, area: Rect, app: &App) {
    let errors = app.errors();
    let block = default_border(if errors.is_empty() { Color::Green } else { Color::DarkGray });
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = if errors.is_empty() {
        vec![Line::from(Span::styled(
            "Sheet complete. Enter on the submit row (or s) sends it.",
            Style::default().fg(Color::Green),
        ))]
    } else {
        errors
            .iter()
            .map(|(field, message)| {
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", field.label()),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(message.clone(), Style::default().fg(Color::Red)),
                ])
            })
            .collect()
    };
    f.render_widget(Paragraph::new(lines), inner);
}

/// Stable accent color per team, derived from the logo-slug convention so
/// the same team always renders the same way.
fn team_color(name: &str) -> Color {
    const PALETTE: [Color; 6] = [
        Color::Cyan,
        Color::Green,
        Color::Magenta,
        Color::Blue,
        Color::LightRed,
        Color::LightYellow,
    ];
    let slug = team_slug(name);
    let hash = slug
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    PALETTE[hash % PALETTE.len()]
}

// ---------------------------------------------------------------------------
// Review tab
// ---------------------------------------------------------------------------

fn draw_review(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" what gets sent ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(payload) = app.compose_payload() else {
        f.render_widget(Paragraph::new("Nothing to review until the week loads."), inner);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Subject: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(payload.subject_line.clone()),
        ]),
        Line::from(""),
    ];
    for body_line in pickem_api::mailto::render_mail_body(&payload).lines() {
        lines.push(Line::from(body_line.to_owned()));
    }

    let errors = app.errors();
    if !errors.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Not submittable yet: {} field(s) need attention.", errors.len()),
            Style::default().fg(Color::Red),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Help + chrome
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = [
        "1 Sheet   2 Review   ? Help (Esc to leave)",
        "",
        "Up/Down, Tab      move between rows",
        "type              edit name, email, tiebreaker totals",
        "a / Left          pick the away team",
        "h / Right         pick the home team",
        "t                 call it a tie",
        "Space             cycle the pick",
        "Delete            clear the pick",
        "Enter             next row; on the submit row, submit",
        "s                 submit (when the sheet is complete)",
        "x                 export a printable sheet",
        "\"                 toggle the log pane",
        "q / Ctrl-C        quit",
    ]
    .iter()
    .map(|s| Line::from(*s))
    .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }
    let text = app
        .state
        .status_line
        .clone()
        .unwrap_or_else(|| "?: help   q: quit".to_owned());
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Gray)),
        area,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let [_, log_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Percentage(40)]).areas(area);
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(widget, log_area);
}
