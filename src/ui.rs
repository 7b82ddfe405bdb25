use anyhow::Result;
use bank_ledger::{Branch, Customer, LedgerEntry, SessionState};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Statement,
    Customers,
    Branches,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Statement => Page::Customers,
            Page::Customers => Page::Branches,
            Page::Branches => Page::Statement,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Statement => Page::Branches,
            Page::Customers => Page::Statement,
            Page::Branches => Page::Customers,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Statement => "Statement",
            Page::Customers => "Customers",
            Page::Branches => "Branches",
        }
    }
}

/// Read-only copy of the session taken when the dashboard opens
pub struct App {
    pub entries: Vec<LedgerEntry>,
    pub balance: f64,
    pub withdrawal_count: u32,
    pub max_withdrawals: u32,
    pub customers: Vec<Customer>,
    pub branches: Vec<Branch>,
    pub selected_branch: String,
    pub current_page: Page,
    pub state: TableState,
}

impl App {
    pub fn new(session: &SessionState) -> Self {
        let mut state = TableState::default();
        state.select(Some(0));

        Self {
            entries: session.ledger.history().to_vec(),
            balance: session.ledger.balance(),
            withdrawal_count: session.ledger.withdrawal_count(),
            max_withdrawals: session.policy.max_withdrawals,
            customers: session.registry.list_sorted().into_iter().cloned().collect(),
            branches: session.branches.all().to_vec(),
            selected_branch: session.selected_branch.clone(),
            current_page: Page::Statement,
            state,
        }
    }

    fn row_count(&self) -> usize {
        match self.current_page {
            Page::Statement => self.entries.len(),
            Page::Customers => self.customers.len(),
            Page::Branches => self.branches.len(),
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.state.select(Some(0));
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.state.select(Some(0));
    }

    pub fn next(&mut self) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < count => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }
}

pub fn run_dashboard(session: &SessionState) -> Result<()> {
    let mut app = App::new(session);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(%err, "dashboard failed");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Statement => render_statement(f, chunks[1], app),
        Page::Customers => render_customers(f, chunks[1], app),
        Page::Branches => render_branches(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Statement, Page::Customers, Page::Branches];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Balance: {:.2}", app.balance),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Withdrawals: {}/{}", app.withdrawal_count, app.max_withdrawals),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

fn titled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(title)
}

fn highlight() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

fn render_statement(f: &mut Frame, area: Rect, app: &mut App) {
    if app.entries.is_empty() {
        let empty = Paragraph::new(bank_ledger::ledger::NO_TRANSACTIONS)
            .block(titled_block(" Statement "));
        f.render_widget(empty, area);
        return;
    }

    let rows = app.entries.iter().map(|entry| {
        let color = match entry.kind {
            bank_ledger::EntryKind::Deposit => Color::Green,
            bank_ledger::EntryKind::Withdrawal => Color::Red,
        };

        Row::new(vec![
            Cell::from(entry.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::from(entry.kind.as_str()).style(Style::default().fg(color)),
            Cell::from(format!("{:.2}", entry.amount)).style(Style::default().fg(color)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(21),
            Constraint::Length(12),
            Constraint::Length(14),
        ],
    )
    .header(header_row(&["Recorded", "Type", "Amount"]))
    .block(titled_block(" Statement "))
    .highlight_style(highlight())
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_customers(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = app.customers.iter().map(|customer| {
        let accounts = if customer.accounts.is_empty() {
            "-".to_string()
        } else {
            customer
                .accounts
                .iter()
                .map(|a| format!("{} ({})", a.account_number, a.account_type.as_str()))
                .collect::<Vec<_>>()
                .join(", ")
        };

        Row::new(vec![
            Cell::from(format!("#{}", customer.sequence_number)),
            Cell::from(truncate(&customer.full_name, 28)),
            Cell::from(customer.tax_id.clone()),
            Cell::from(customer.birth_date.clone()),
            Cell::from(accounts),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(30),
            Constraint::Length(13),
            Constraint::Length(12),
            Constraint::Min(20),
        ],
    )
    .header(header_row(&["#", "Name", "Tax id", "Born", "Accounts"]))
    .block(titled_block(" Customers "))
    .highlight_style(highlight())
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_branches(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = app.branches.iter().map(|branch| {
        let style = if branch.code == app.selected_branch {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(branch.code.clone()),
            Cell::from(branch.name.clone()),
            Cell::from(truncate(&branch.address, 30)),
            Cell::from(format!("{}/{}", branch.city, branch.state)),
        ])
        .style(style)
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(32),
            Constraint::Min(18),
        ],
    )
    .header(header_row(&["Code", "Name", "Address", "City"]))
    .block(titled_block(" Branches "))
    .highlight_style(highlight())
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.row_count();

    let status_spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected.min(total), total),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Page | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Back to menu"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
