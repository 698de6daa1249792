use anyhow::Result;
use card_wallet::{Action, BankAccount, BankChoices, SubmissionOutcome, WalletState};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Bank,
    CardNumber,
    ExpirationDate,
    Cvv,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Bank => FormField::CardNumber,
            FormField::CardNumber => FormField::ExpirationDate,
            FormField::ExpirationDate => FormField::Cvv,
            FormField::Cvv => FormField::Bank,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            FormField::Bank => FormField::Cvv,
            FormField::CardNumber => FormField::Bank,
            FormField::ExpirationDate => FormField::CardNumber,
            FormField::Cvv => FormField::ExpirationDate,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            FormField::Bank => "Bank",
            FormField::CardNumber => "Card number",
            FormField::ExpirationDate => "MM/YY",
            FormField::Cvv => "CVV",
        }
    }
}

pub struct App {
    pub wallet: WalletState,
    pub state: TableState,
    pub focus: FormField,
    /// Result of the last Add press, for the status bar
    pub last_outcome: Option<SubmissionOutcome>,
}

impl App {
    pub fn new(wallet: WalletState) -> Self {
        let mut state = TableState::default();
        if !wallet.is_empty() {
            state.select(Some(0));
        }

        Self {
            wallet,
            state,
            focus: FormField::CardNumber,
            last_outcome: None,
        }
    }

    /// Route one action through the wallet, then fix up selection
    pub fn dispatch(&mut self, action: Action) {
        let submitted = action == Action::Submit;
        let outcome = self.wallet.apply(action);
        if submitted {
            self.last_outcome = outcome;
        }
        self.clamp_selection();
    }

    pub fn selected_account(&self) -> Option<&BankAccount> {
        self.state.selected().and_then(|i| self.wallet.registry.get(i))
    }

    pub fn open_form(&mut self) {
        self.focus = FormField::CardNumber;
        self.last_outcome = None;
        self.dispatch(Action::OpenForm);
    }

    pub fn remove_selected(&mut self) {
        if let Some(account) = self.selected_account().cloned() {
            self.dispatch(Action::Remove(account));
        }
    }

    pub fn next(&mut self) {
        let len = self.wallet.registry.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.wallet.registry.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn clamp_selection(&mut self) {
        let len = self.wallet.registry.len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            Some(_) => {}
        }
    }

    /// Text of a field after typing `ch` at the end
    fn typed(&self, field: FormField, ch: char) -> Option<Action> {
        let form = &self.wallet.form;
        match field {
            FormField::Bank => None,
            FormField::CardNumber => {
                Some(Action::CardNumberChanged(format!("{}{}", form.card_number, ch)))
            }
            FormField::ExpirationDate => {
                Some(Action::ExpirationDateChanged(format!("{}{}", form.expiration_date, ch)))
            }
            FormField::Cvv => Some(Action::CvvChanged(format!("{}{}", form.cvv, ch))),
        }
    }

    /// Text of a field after one Backspace
    fn erased(&self, field: FormField) -> Option<Action> {
        let form = &self.wallet.form;
        let drop_last = |s: &str| {
            let mut s = s.to_string();
            s.pop();
            s
        };
        match field {
            FormField::Bank => None,
            FormField::CardNumber => Some(Action::CardNumberChanged(drop_last(&form.card_number))),
            FormField::ExpirationDate => {
                Some(Action::ExpirationDateChanged(drop_last(&form.expiration_date)))
            }
            FormField::Cvv => Some(Action::CvvChanged(drop_last(&form.cvv))),
        }
    }

    fn cycle_bank(&mut self, forward: bool) {
        let current = self.wallet.form.selected_bank.as_deref();
        let choice = if forward {
            self.wallet.banks.next(current)
        } else {
            self.wallet.banks.previous(current)
        };
        if let Some(name) = choice.map(str::to_string) {
            self.dispatch(Action::BankSelected(name));
        }
    }

    /// Handle one key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        if self.wallet.is_adding_account {
            self.handle_form_key(key);
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('a') => self.open_form(),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Home if !self.wallet.is_empty() => self.state.select(Some(0)),
            KeyCode::End if !self.wallet.is_empty() => {
                self.state.select(Some(self.wallet.registry.len() - 1))
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.dispatch(Action::CloseForm),
            KeyCode::Enter => self.dispatch(Action::Submit),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.focus = self.focus.previous();
                } else {
                    self.focus = self.focus.next();
                }
            }
            KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Right if self.focus == FormField::Bank => self.cycle_bank(true),
            KeyCode::Left if self.focus == FormField::Bank => self.cycle_bank(false),
            KeyCode::Backspace => {
                if let Some(action) = self.erased(self.focus) {
                    self.dispatch(action);
                }
            }
            KeyCode::Char(ch) => {
                if let Some(action) = self.typed(self.focus, ch) {
                    self.dispatch(action);
                }
            }
            _ => {}
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "UI loop failed");
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
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Account list
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.wallet.is_empty() {
        render_empty_state(f, chunks[1]);
    } else {
        render_accounts(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);

    // Entry form sits on top of the list, like a sheet
    if app.wallet.is_adding_account {
        let area = centered_rect(60, 20, f.size());
        f.render_widget(Clear, area);
        render_form(f, area, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Wallet",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Accounts: {}", app.wallet.registry.len()),
            Style::default().fg(Color::White),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_empty_state(f: &mut Frame, area: Rect) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Your wallet is empty",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Connect a bank account to start tracking activity"),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("a", Style::default().fg(Color::Yellow)),
            Span::raw(" to connect a bank account"),
        ]),
    ];

    let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White)),
        );

    f.render_widget(paragraph, area);
}

fn render_accounts(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Bank", "Card number", "Balance"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.wallet.summaries().into_iter().map(|summary| {
        let cells = vec![
            Cell::from(summary.bank_logo),
            Cell::from(summary.card_number),
            Cell::from(format!("{:.2}", summary.balance)).style(Style::default().fg(Color::Green)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(24),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Accounts "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Connect bank account ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Bank
            Constraint::Length(3), // Card number
            Constraint::Length(3), // Expiration + CVV
            Constraint::Min(0),    // Errors / hint
        ])
        .split(inner);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    let form = &app.wallet.form;
    let bank = BankChoices::label(form.selected_bank.as_deref());

    render_field(f, rows[0], app, FormField::Bank, &format!("◀ {} ▶", bank), true);
    render_field(
        f,
        rows[1],
        app,
        FormField::CardNumber,
        &form.card_number,
        form.validity.card_number,
    );
    render_field(
        f,
        bottom[0],
        app,
        FormField::ExpirationDate,
        &form.expiration_date,
        form.validity.expiration_date,
    );
    render_field(f, bottom[1], app, FormField::Cvv, &form.cvv, form.validity.cvv);

    let mut messages: Vec<Line> = Vec::new();
    if !form.validity.card_number {
        messages.push(error_line("Card number must be 16 digits"));
    }
    if !form.validity.expiration_date {
        messages.push(error_line("Expiration date must be MM/YY"));
    }
    if !form.validity.cvv {
        messages.push(error_line("CVV must be 3 digits"));
    }
    messages.push(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Add | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Next field | "),
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" Bank | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" Close"),
    ]));

    f.render_widget(Paragraph::new(messages), rows[3]);
}

fn render_field(f: &mut Frame, area: Rect, app: &App, field: FormField, value: &str, valid: bool) {
    let border = if !valid {
        Style::default().fg(Color::Red)
    } else if app.focus == field {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input = Paragraph::new(value.to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", field.title())),
    );

    f.render_widget(input, area);
}

fn error_line(message: &str) -> Line<'_> {
    Line::from(Span::styled(message, Style::default().fg(Color::Red)))
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.wallet.registry.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(SubmissionOutcome::Accepted(account)) = &app.last_outcome {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Added {}", account.masked_card_number()),
            Style::default().fg(Color::Green),
        ));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("a", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Add | "));
    status_spans.push(Span::styled("d", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Delete | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

/// Rect of `percent_x` width and `height` rows, centered in `r`
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
