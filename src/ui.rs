use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        BarChart, Block, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState, Tabs,
        Wrap,
    },
};

use crate::domain::{HELP_TEXT, PromptMode};
use crate::engine::SortDirection;
use crate::model::{Model, Tab, TableData};
use crate::overview;

pub const HEADER_HEIGHT: u16 = 1;
pub const FOOTER_HEIGHT: u16 = 1;
pub const STATUSLINE_HEIGHT: u16 = 1;
pub const COLUMN_WIDTH_MARGIN: usize = 2;
pub const MAX_COLUMN_WIDTH: usize = 48;
pub const KPI_CARD_HEIGHT: u16 = 4;
pub const REVENUE_BAR_WIDTH: u16 = 3;
const PASSWORD_MASK: char = '•';

#[derive(Debug, Default)]
pub struct TableUI {
    table_state: TableState,
}

impl TableUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let [header, body, statusline] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(STATUSLINE_HEIGHT),
        ])
        .areas(frame.area());

        self.draw_header(model, frame, header);
        if model.signing_in() {
            self.draw_login(model, frame, body);
        } else if let Some(table) = model.active_table() {
            self.draw_table(table, frame, body);
        } else if model.tab() == Tab::Overview {
            self.draw_overview(model, frame, body);
        } else {
            self.draw_settings(model, frame, body);
        }
        self.draw_statusline(model, frame, statusline);

        if model.show_help() {
            self.draw_help(frame);
        }
    }

    fn draw_header(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let [tabs_area, user_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(40)]).areas(area);

        let selected = Tab::ALL.iter().position(|t| *t == model.tab()).unwrap_or(0);
        let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
            .select(selected)
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .divider("|");
        frame.render_widget(tabs, tabs_area);

        let user = match model.user() {
            Some(user) => Line::from(vec![
                "signed in as ".dark_gray(),
                user.name.clone().bold(),
                format!(" ({:?})", user.role).dark_gray(),
            ]),
            None => Line::from("not signed in".dark_gray()),
        };
        frame.render_widget(Paragraph::new(user).right_aligned(), user_area);
    }

    fn draw_login(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let (email, password_len) = match model.prompt() {
            Some((PromptMode::LoginEmail, input)) => (input.input.clone(), 0),
            Some((PromptMode::LoginPassword, input)) => {
                (model.login_email().to_string(), input.input.chars().count())
            }
            _ => (model.login_email().to_string(), 0),
        };

        let lines = vec![
            Line::from("Welcome back".bold()),
            Line::from("Sign in to access your dashboard".dark_gray()),
            Line::default(),
            Line::from(vec!["Email     ".dark_gray(), email.into()]),
            Line::from(vec![
                "Password  ".dark_gray(),
                PASSWORD_MASK.to_string().repeat(password_len).into(),
            ]),
            Line::default(),
            Line::from("Enter continues, Esc goes back".dark_gray()),
        ];
        let area = centered(area, 56, 9);
        let form = Paragraph::new(lines).block(Block::bordered().title(" omnidash ".bold()));
        frame.render_widget(Clear, area);
        frame.render_widget(form, area);
    }

    fn draw_overview(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let [welcome_area, cards_area, bottom_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(KPI_CARD_HEIGHT),
            Constraint::Fill(1),
        ])
        .areas(area);

        let name = model.user().map(|u| u.name.as_str()).unwrap_or("User");
        let welcome = Paragraph::new(vec![
            Line::from(format!(" Welcome back, {name}").bold()),
            Line::from(" Here's what's happening with your projects today.".dark_gray()),
        ]);
        frame.render_widget(welcome, welcome_area);

        let kpis = overview::kpis();
        let card_areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(cards_area);
        for (kpi, card_area) in kpis.iter().zip(card_areas.iter()) {
            let card = Paragraph::new(vec![
                Line::from(kpi.display_value().bold()),
                Line::from(kpi.change.green()),
            ])
            .block(Block::bordered().title(format!(" {} ", kpi.title)));
            frame.render_widget(card, *card_area);
        }

        let [chart_area, feed_area] =
            Layout::horizontal([Constraint::Percentage(57), Constraint::Percentage(43)])
                .areas(bottom_area);

        let (best, _) = overview::best_month();
        let summary = format!(
            " ${} this year, best month {best} ",
            overview::group_thousands(overview::yearly_revenue() as f64, 0)
        );
        let chart = BarChart::default()
            .block(
                Block::bordered()
                    .title(" Revenue Over Time ".bold())
                    .title_bottom(summary),
            )
            .data(&overview::REVENUE_BY_MONTH[..])
            .bar_width(REVENUE_BAR_WIDTH)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Blue))
            .value_style(Style::default().fg(Color::Black).bg(Color::Blue));
        frame.render_widget(chart, chart_area);

        let items: Vec<ListItem> = overview::recent_activity()
            .iter()
            .map(|a| {
                ListItem::new(vec![
                    Line::from(vec![
                        format!(" {} ", a.initial()).black().on_cyan(),
                        " ".into(),
                        a.user.bold(),
                        " ".into(),
                        a.action.dark_gray(),
                    ]),
                    Line::from(vec![
                        "    ".into(),
                        a.target.cyan(),
                        format!("  {}", a.time).dark_gray(),
                    ]),
                ])
            })
            .collect();
        let feed = List::new(items).block(Block::bordered().title(" Recent Activity ".bold()));
        frame.render_widget(feed, feed_area);
    }

    fn draw_table(&mut self, table: &TableData, frame: &mut Frame, area: Rect) {
        let view = table.derive();
        let sort = table.view.sort();

        let [table_area, footer_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(FOOTER_HEIGHT)]).areas(area);

        // Header with sort indicator and the key that sorts by the column
        let headers: Vec<String> = table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let indicator = match sort {
                    Some(s) if s.key == column.key => match s.direction {
                        SortDirection::Ascending => " ▲",
                        SortDirection::Descending => " ▼",
                    },
                    _ => "",
                };
                if idx < 9 {
                    format!("{}{} [{}]", column.label, indicator, idx + 1)
                } else {
                    format!("{}{}", column.label, indicator)
                }
            })
            .collect();

        let widths: Vec<Constraint> = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let widest = view
                    .rows
                    .iter()
                    .map(|r| r.cells[idx].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0);
                let width = (widest + COLUMN_WIDTH_MARGIN).min(MAX_COLUMN_WIDTH);
                Constraint::Length(width as u16)
            })
            .collect();

        let header = Row::new(headers.into_iter().map(Cell::from))
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD))
            .height(1);
        let rows: Vec<Row> = view
            .rows
            .iter()
            .map(|r| Row::new(r.cells.iter().map(|c| Cell::from(c.as_str()))).height(1))
            .collect();

        let mut title = vec![Span::from(format!(" {} ", table.name)).bold()];
        if !table.view.search().is_empty() {
            title.push(format!("search: {:?} ", table.view.search()).yellow());
        }

        let widget = Table::new(rows, widths)
            .header(header)
            .block(Block::bordered().title(Line::from(title)))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .column_spacing(1);

        self.table_state.select(if view.rows.is_empty() {
            None
        } else {
            Some(table.cursor)
        });
        frame.render_stateful_widget(widget, table_area, &mut self.table_state);

        let (first, last) = view.showing();
        let mut footer = vec![
            "Showing ".dark_gray(),
            first.to_string().bold(),
            " to ".dark_gray(),
            last.to_string().bold(),
            " of ".dark_gray(),
            view.total.to_string().bold(),
            " results".dark_gray(),
            format!("  page {}/{}", view.page, view.total_pages).into(),
        ];
        footer.push(if view.has_previous() { "  ◀ p".into() } else { "    ".into() });
        footer.push(if view.has_next() { "  n ▶".into() } else { "".into() });
        frame.render_widget(Paragraph::new(Line::from(footer)), footer_area);
    }

    fn draw_settings(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let settings = model.settings();
        let check = |on: bool| if on { "[x]" } else { "[ ]" };

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(" Profile".bold()));
        match model.user() {
            Some(user) => {
                lines.push(Line::from(format!("   {} <{}>", user.name, user.email)));
                lines.push(Line::from(
                    format!("   {:?} of {}   (r to rename)", user.role, user.organization_id)
                        .dark_gray(),
                ));
            }
            None => lines.push(Line::from("   not signed in".dark_gray())),
        }
        lines.push(Line::default());

        lines.push(Line::from(" Team".bold()));
        lines.push(Line::from(format!(
            "   {} members, {} pending invites, owner {}   (i to invite)",
            settings.team_members.len(),
            model.pending_invites(),
            model.owner().map(|o| o.name.as_str()).unwrap_or("-"),
        )));
        lines.push(Line::default());

        let plan = &settings.plan;
        lines.push(Line::from(" Billing".bold()));
        lines.push(Line::from(format!(
            "   {} {} / {:?}   (P to switch)",
            plan.name, plan.price, plan.interval
        )));
        for feature in &plan.features {
            lines.push(Line::from(format!("     - {feature}").dark_gray()));
        }
        let pm = &settings.payment_method;
        lines.push(Line::from(format!(
            "   {:?} •••• {}  expires {:02}/{}   (c to change)",
            pm.brand, pm.last4, pm.expiry_month, pm.expiry_year
        )));
        lines.push(Line::default());

        let n = settings.notifications;
        lines.push(Line::from(" Notifications".bold()));
        lines.push(Line::from(format!("   {} Email updates      (e)", check(n.email))));
        lines.push(Line::from(format!("   {} Marketing          (m)", check(n.marketing))));
        lines.push(Line::from(format!("   {} Security alerts    (s)", check(n.security))));

        let panel = Paragraph::new(Text::from(lines))
            .block(Block::bordered().title(" Settings ".bold()))
            .wrap(Wrap { trim: false });
        frame.render_widget(panel, area);
    }

    fn draw_statusline(&self, model: &Model, frame: &mut Frame, area: Rect) {
        match model.prompt() {
            Some((mode, input)) => {
                let label = match mode {
                    PromptMode::Search => "Search: ",
                    PromptMode::Invite => "Invite email: ",
                    PromptMode::Profile => "Full name: ",
                    PromptMode::Card => "Card number, MM/YY: ",
                    PromptMode::LoginEmail => "Email: ",
                    PromptMode::LoginPassword => "Password: ",
                };
                let shown = match mode {
                    PromptMode::LoginPassword => {
                        PASSWORD_MASK.to_string().repeat(input.input.chars().count())
                    }
                    _ => input.input.clone(),
                };
                let line = Line::from(vec![label.yellow().bold(), shown.into()]);
                frame.render_widget(Paragraph::new(line), area);
                let x = area.x + (label.chars().count() + input.cursor_pos) as u16;
                frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), area.y));
            }
            None => {
                frame.render_widget(Paragraph::new(model.status_message().dark_gray()), area);
            }
        }
    }

    fn draw_help(&self, frame: &mut Frame) {
        let area = centered(frame.area(), 64, 26);
        let popup = Paragraph::new(HELP_TEXT)
            .block(Block::bordered().title(" Help ".bold()).title_bottom(" Esc to close "));
        frame.render_widget(Clear, area);
        frame.render_widget(popup, area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
