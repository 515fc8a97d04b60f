use anyhow::Result;
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
use salary_calculator::{
    CalculatorStore, ExpenseCategory, ExpenseRecord, IncomeCategory, IncomeRecord, ItemCategory,
    RecordPatch,
};
use std::io;

const CURRENCY: &str = "MYR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Summary,
    Expenses,
    Income,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Summary => Page::Expenses,
            Page::Expenses => Page::Income,
            Page::Income => Page::Summary,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Summary => Page::Income,
            Page::Expenses => Page::Summary,
            Page::Income => Page::Expenses,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Summary => "Summary",
            Page::Expenses => "Expenses",
            Page::Income => "Additional Income",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Expense,
    Income,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Amount,
    Category,
}

impl FormField {
    fn next(&self) -> Self {
        match self {
            FormField::Name => FormField::Amount,
            FormField::Amount => FormField::Category,
            FormField::Category => FormField::Name,
        }
    }

    fn previous(&self) -> Self {
        match self {
            FormField::Name => FormField::Category,
            FormField::Amount => FormField::Name,
            FormField::Category => FormField::Amount,
        }
    }
}

/// Draft for a new or edited record. Lives only in the UI until submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordForm {
    pub kind: RecordKind,
    /// Id of the record being edited, `None` when adding
    pub editing: Option<String>,
    pub name: String,
    pub amount: String,
    /// Index into the kind's category list
    pub category: usize,
    pub focus: FormField,
}

impl RecordForm {
    pub fn new(kind: RecordKind) -> Self {
        let category = match kind {
            RecordKind::Expense => ExpenseCategory::default().index(),
            RecordKind::Income => IncomeCategory::default().index(),
        };

        RecordForm {
            kind,
            editing: None,
            name: String::new(),
            amount: String::new(),
            category,
            focus: FormField::Name,
        }
    }

    pub fn edit_expense(record: &ExpenseRecord) -> Self {
        RecordForm {
            kind: RecordKind::Expense,
            editing: Some(record.id.clone()),
            name: record.name.clone(),
            amount: record.amount.to_string(),
            category: record.category.index(),
            focus: FormField::Name,
        }
    }

    pub fn edit_income(record: &IncomeRecord) -> Self {
        RecordForm {
            kind: RecordKind::Income,
            editing: Some(record.id.clone()),
            name: record.name.clone(),
            amount: record.amount.to_string(),
            category: record.category.index(),
            focus: FormField::Name,
        }
    }

    pub fn expense_category(&self) -> ExpenseCategory {
        ExpenseCategory::ALL[self.category % ExpenseCategory::ALL.len()]
    }

    pub fn income_category(&self) -> IncomeCategory {
        IncomeCategory::ALL[self.category % IncomeCategory::ALL.len()]
    }

    pub fn category_label(&self) -> &'static str {
        match self.kind {
            RecordKind::Expense => self.expense_category().label(),
            RecordKind::Income => self.income_category().label(),
        }
    }

    fn cycle_category(&mut self, forward: bool) {
        self.category = match (self.kind, forward) {
            (RecordKind::Expense, true) => self.expense_category().next().index(),
            (RecordKind::Expense, false) => self.expense_category().previous().index(),
            (RecordKind::Income, true) => self.income_category().next().index(),
            (RecordKind::Income, false) => self.income_category().previous().index(),
        };
    }

    fn input(&mut self, c: char) {
        match self.focus {
            FormField::Name => self.name.push(c),
            FormField::Amount => {
                if c.is_ascii_digit() || c == '.' {
                    self.amount.push(c);
                }
            }
            FormField::Category => {
                if c == ' ' {
                    self.cycle_category(true);
                }
            }
        }
    }

    fn backspace(&mut self) {
        match self.focus {
            FormField::Name => {
                self.name.pop();
            }
            FormField::Amount => {
                self.amount.pop();
            }
            FormField::Category => {}
        }
    }

    /// Name must be non-empty and amount a positive number
    pub fn validate(&self) -> Result<(String, f64), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }

        let amount = match self.amount.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => value,
            _ => return Err("Amount must be a number greater than 0".to_string()),
        };

        Ok((name.to_string(), amount))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    /// Salary input buffer
    Salary(String),
    Form(RecordForm),
}

/// Salary input that does not parse to a non-negative number becomes 0
pub fn parse_salary(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or(0.0)
}

pub struct App {
    pub store: CalculatorStore,
    pub current_page: Page,
    pub expenses_state: TableState,
    pub income_state: TableState,
    pub mode: Mode,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: CalculatorStore) -> Self {
        let mut app = Self {
            store,
            current_page: Page::Summary,
            expenses_state: TableState::default(),
            income_state: TableState::default(),
            mode: Mode::Normal,
            status: None,
            should_quit: false,
        };
        app.clamp_selection();
        app
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    fn list_len(&self, page: Page) -> usize {
        match page {
            Page::Summary => 0,
            Page::Expenses => self.store.expenses().len(),
            Page::Income => self.store.additional_income().len(),
        }
    }

    fn table_state(&mut self, page: Page) -> Option<&mut TableState> {
        match page {
            Page::Summary => None,
            Page::Expenses => Some(&mut self.expenses_state),
            Page::Income => Some(&mut self.income_state),
        }
    }

    /// Keep both selections inside their lists after adds and deletes
    fn clamp_selection(&mut self) {
        for page in [Page::Expenses, Page::Income] {
            let len = self.list_len(page);
            if let Some(state) = self.table_state(page) {
                let selected = match state.selected() {
                    _ if len == 0 => None,
                    Some(i) if i >= len => Some(len - 1),
                    Some(i) => Some(i),
                    None => Some(0),
                };
                state.select(selected);
            }
        }
    }

    pub fn next(&mut self) {
        let page = self.current_page;
        let len = self.list_len(page);
        if len == 0 {
            return;
        }
        if let Some(state) = self.table_state(page) {
            let i = match state.selected() {
                Some(i) if i >= len - 1 => 0,
                Some(i) => i + 1,
                None => 0,
            };
            state.select(Some(i));
        }
    }

    pub fn previous(&mut self) {
        let page = self.current_page;
        let len = self.list_len(page);
        if len == 0 {
            return;
        }
        if let Some(state) = self.table_state(page) {
            let i = match state.selected() {
                Some(0) | None => len - 1,
                Some(i) => i - 1,
            };
            state.select(Some(i));
        }
    }

    fn select_last(&mut self) {
        let page = self.current_page;
        let len = self.list_len(page);
        if let Some(state) = self.table_state(page) {
            state.select(len.checked_sub(1));
        }
    }

    fn selected_id(&self) -> Option<String> {
        match self.current_page {
            Page::Summary => None,
            Page::Expenses => self
                .expenses_state
                .selected()
                .and_then(|i| self.store.expenses().get(i))
                .map(|record| record.id.clone()),
            Page::Income => self
                .income_state
                .selected()
                .and_then(|i| self.store.additional_income().get(i))
                .map(|record| record.id.clone()),
        }
    }

    // ========================================================================
    // KEY HANDLING
    // ========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Salary(_) => self.handle_salary_key(key),
            Mode::Form(_) => self.handle_form_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.previous_page();
                } else {
                    self.next_page();
                }
                return;
            }
            KeyCode::BackTab => {
                self.previous_page();
                return;
            }
            KeyCode::Char('1') => {
                self.current_page = Page::Summary;
                return;
            }
            KeyCode::Char('2') => {
                self.current_page = Page::Expenses;
                return;
            }
            KeyCode::Char('3') => {
                self.current_page = Page::Income;
                return;
            }
            _ => {}
        }

        // Nothing below may touch the store until saved data is loaded
        if !self.store.is_hydrated() {
            self.status = Some("Still loading saved data...".to_string());
            return;
        }

        match key.code {
            KeyCode::Char('s') => {
                let salary = self.store.salary();
                let buffer = if salary > 0.0 {
                    salary.to_string()
                } else {
                    String::new()
                };
                self.mode = Mode::Salary(buffer);
            }
            KeyCode::Char('a') => match self.current_page {
                Page::Expenses => self.mode = Mode::Form(RecordForm::new(RecordKind::Expense)),
                Page::Income => self.mode = Mode::Form(RecordForm::new(RecordKind::Income)),
                Page::Summary => {}
            },
            KeyCode::Char('e') | KeyCode::Enter => self.start_edit(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Home => {
                let page = self.current_page;
                let len = self.list_len(page);
                if let Some(state) = self.table_state(page) {
                    state.select(if len > 0 { Some(0) } else { None });
                }
            }
            KeyCode::End => self.select_last(),
            _ => {}
        }
    }

    fn handle_salary_key(&mut self, key: KeyEvent) {
        let Mode::Salary(buffer) = &mut self.mode else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                let salary = parse_salary(buffer);
                self.store.set_salary(salary);
                self.status = Some(format!("Salary set to {}", format_money(salary)));
                self.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => buffer.push(c),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Enter {
            self.submit_form();
            return;
        }

        let Mode::Form(form) = &mut self.mode else {
            return;
        };

        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.status = None;
            }
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.previous(),
            KeyCode::Left if form.focus == FormField::Category => form.cycle_category(false),
            KeyCode::Right if form.focus == FormField::Category => form.cycle_category(true),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.input(c),
            _ => {}
        }
    }

    fn start_edit(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };

        let form = match self.current_page {
            Page::Expenses => self
                .store
                .state()
                .find_expense(&id)
                .map(RecordForm::edit_expense),
            Page::Income => self
                .store
                .state()
                .find_income(&id)
                .map(RecordForm::edit_income),
            Page::Summary => None,
        };

        if let Some(form) = form {
            self.mode = Mode::Form(form);
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };

        let deleted = match self.current_page {
            Page::Expenses => self.store.delete_expense(&id),
            Page::Income => self.store.delete_income(&id),
            Page::Summary => false,
        };

        if deleted {
            self.status = Some("Deleted".to_string());
        }
        self.clamp_selection();
    }

    fn submit_form(&mut self) {
        let form = match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Form(form) => form,
            other => {
                self.mode = other;
                return;
            }
        };

        let (name, amount) = match form.validate() {
            Ok(valid) => valid,
            Err(message) => {
                self.status = Some(message);
                self.mode = Mode::Form(form);
                return;
            }
        };

        let added = form.editing.is_none();
        match (form.kind, &form.editing) {
            (RecordKind::Expense, None) => {
                self.store
                    .add_expense(name.clone(), amount, form.expense_category());
            }
            (RecordKind::Expense, Some(id)) => {
                let patch = RecordPatch::new()
                    .name(name.clone())
                    .amount(amount)
                    .category(form.expense_category());
                self.store.update_expense(id, &patch);
            }
            (RecordKind::Income, None) => {
                self.store
                    .add_income(name.clone(), amount, form.income_category());
            }
            (RecordKind::Income, Some(id)) => {
                let patch = RecordPatch::new()
                    .name(name.clone())
                    .amount(amount)
                    .category(form.income_category());
                self.store.update_income(id, &patch);
            }
        }

        self.clamp_selection();
        if added {
            self.select_last();
            self.status = Some(format!("Added {}", name));
        } else {
            self.status = Some(format!("Updated {}", name));
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

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Windows reports releases too
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key);
            if app.should_quit {
                return Ok(());
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

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

    if !app.store.is_hydrated() {
        render_loading(f, chunks[1]);
    } else {
        match app.current_page {
            Page::Summary => render_summary(f, chunks[1], app),
            Page::Expenses => render_expenses(f, chunks[1], app),
            Page::Income => render_income(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);

    match &app.mode {
        Mode::Normal => {}
        Mode::Salary(buffer) => render_salary_popup(f, buffer),
        Mode::Form(form) => render_form_popup(f, form),
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Summary, Page::Expenses, Page::Income];

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

        tab_spans.push(Span::styled(format!("{} {}", i + 1, page.title()), style));
    }

    let net = app.store.net_income();
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("↓ {}", format_money(app.store.total_expenses())),
        Style::default().fg(Color::Red),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("↑ {}", format_money(app.store.total_additional_income())),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Net: {}", format_money(net)),
        Style::default().fg(net_color(net)).add_modifier(Modifier::BOLD),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Personal Finance Calculator "),
    );

    f.render_widget(header, area);
}

fn render_loading(f: &mut Frame, area: Rect) {
    let loading = Paragraph::new("Loading saved data...")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(loading, area);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let state = app.store.state();
    let salary = state.salary;
    let total_expenses = state.total_expenses();
    let total_additional = state.total_additional_income();
    let net = state.net_income();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[0]);

    let mut income_lines = vec![
        Line::from(Span::styled(
            format_money(salary + total_additional),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Salary: {}", format_money(salary))),
    ];
    if total_additional > 0.0 {
        income_lines.push(Line::from(format!(
            "+ Additional: {}",
            format_money(total_additional)
        )));
    }
    render_card(f, cards[0], " Total Income ", Color::Green, income_lines);

    render_card(
        f,
        cards[1],
        " Total Expenses ",
        Color::Red,
        vec![
            Line::from(Span::styled(
                format_money(total_expenses),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from("Monthly spending"),
        ],
    );

    render_card(
        f,
        cards[2],
        " Net Income ",
        net_color(net),
        vec![
            Line::from(Span::styled(
                format_money(net),
                Style::default().fg(net_color(net)).add_modifier(Modifier::BOLD),
            )),
            Line::from(if net >= 0.0 {
                "Available for savings"
            } else {
                "Budget deficit"
            }),
        ],
    );

    let mut analysis = vec![Line::from("")];
    match state.breakdown() {
        Some(breakdown) if salary > 0.0 => {
            analysis.push(Line::from(vec![
                Span::raw("  Expenses as % of total income: "),
                Span::styled(
                    format_percent(breakdown.expense_ratio),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            analysis.push(Line::from(vec![
                Span::raw("  Savings rate:                  "),
                Span::styled(
                    format_percent(breakdown.savings_rate),
                    Style::default()
                        .fg(net_color(net))
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        _ => analysis.push(Line::from(Span::styled(
            "  Press s to enter your monthly salary",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))),
    }

    let expense_shares = state.expenses_by_category();
    if !expense_shares.is_empty() {
        analysis.push(Line::from(""));
        analysis.push(Line::from(Span::styled(
            "  Expenses by category",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        for share in expense_shares {
            analysis.push(share_line(share.category.label(), share.total, share.percentage));
        }
    }

    let income_shares = state.income_by_category();
    if !income_shares.is_empty() {
        analysis.push(Line::from(""));
        analysis.push(Line::from(Span::styled(
            "  Additional income by category",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        for share in income_shares {
            analysis.push(share_line(share.category.label(), share.total, share.percentage));
        }
    }

    let paragraph = Paragraph::new(analysis).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Spending Analysis "),
    );
    f.render_widget(paragraph, rows[1]);
}

fn share_line(label: &str, total: f64, percentage: f64) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("  {:<20}", label)),
        Span::raw(format!("{:>16}", format_money(total))),
        Span::styled(
            format!("{:>8}", format_percent(percentage)),
            Style::default().fg(Color::Cyan),
        ),
    ])
}

fn render_card(f: &mut Frame, area: Rect, title: &str, color: Color, lines: Vec<Line>) {
    let card = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title.to_string()),
    );
    f.render_widget(card, area);
}

fn render_expenses(f: &mut Frame, area: Rect, app: &mut App) {
    let rows: Vec<Row> = app
        .store
        .expenses()
        .iter()
        .map(|record| record_row(&record.name, record.category.label(), record.amount, Color::Red))
        .collect();

    let title = format!(
        " Expenses  -{} ",
        format_money(app.store.total_expenses())
    );
    let empty = "No expenses added yet. Press a to add your first expense.";
    render_record_table(f, area, rows, title, empty, &mut app.expenses_state);
}

fn render_income(f: &mut Frame, area: Rect, app: &mut App) {
    let rows: Vec<Row> = app
        .store
        .additional_income()
        .iter()
        .map(|record| {
            record_row(&record.name, record.category.label(), record.amount, Color::Green)
        })
        .collect();

    let title = format!(
        " Additional Income  +{} ",
        format_money(app.store.total_additional_income())
    );
    let empty = "No additional income added yet. Press a to add a source.";
    render_record_table(f, area, rows, title, empty, &mut app.income_state);
}

fn record_row(name: &str, category: &str, amount: f64, color: Color) -> Row<'static> {
    Row::new(vec![
        Cell::from(truncate(name, 40)),
        Cell::from(category.to_string()),
        Cell::from(format!("{:>14}", format_amount(amount))).style(Style::default().fg(color)),
    ])
    .height(1)
}

fn render_record_table(
    f: &mut Frame,
    area: Rect,
    rows: Vec<Row>,
    title: String,
    empty: &str,
    state: &mut TableState,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(title);

    if rows.is_empty() {
        let placeholder = Paragraph::new(vec![Line::from(""), Line::from(empty.to_string())])
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let header_cells = ["Name", "Category", "Amount"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let table = Table::new(
        rows,
        [
            Constraint::Length(42),
            Constraint::Length(22),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(message) = &app.status {
        status_spans.push(Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" | "));
    }

    let hints: &[(&str, &str)] = match (&app.mode, app.current_page) {
        (Mode::Salary(_), _) => &[("Enter", "Save"), ("Esc", "Cancel")],
        (Mode::Form(_), _) => &[
            ("Tab", "Field"),
            ("←/→", "Category"),
            ("Enter", "Save"),
            ("Esc", "Cancel"),
        ],
        (Mode::Normal, Page::Summary) => &[("s", "Salary"), ("Tab", "Page"), ("q", "Quit")],
        (Mode::Normal, _) => &[
            ("a", "Add"),
            ("e", "Edit"),
            ("d", "Delete"),
            ("↑/↓", "Nav"),
            ("Tab", "Page"),
            ("q", "Quit"),
        ],
    };

    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            status_spans.push(Span::raw(" | "));
        }
        let key_color = if *key == "q" { Color::Red } else { Color::Yellow };
        status_spans.push(Span::styled(*key, Style::default().fg(key_color)));
        status_spans.push(Span::raw(format!(" {}", action)));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_salary_popup(f: &mut Frame, buffer: &str) {
    let area = centered_rect(50, 7, f.size());
    f.render_widget(Clear, area);

    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  Base salary: ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{}_", buffer)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Invalid input is saved as 0",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let popup = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Monthly Salary "),
    );
    f.render_widget(popup, area);
}

fn render_form_popup(f: &mut Frame, form: &RecordForm) {
    let area = centered_rect(60, 10, f.size());
    f.render_widget(Clear, area);

    let field_style = |field: FormField| {
        if form.focus == field {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        }
    };
    let cursor = |field: FormField| if form.focus == field { "_" } else { "" };

    let (name_label, placeholder) = match form.kind {
        RecordKind::Expense => ("Expense Name", "e.g., Netflix"),
        RecordKind::Income => ("Income Source", "e.g., Uber driving"),
    };

    let name_value = if form.name.is_empty() && form.focus != FormField::Name {
        Span::styled(placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(format!("{}{}", form.name, cursor(FormField::Name)))
    };

    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {:<14}", name_label), field_style(FormField::Name)),
            name_value,
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {:<14}", "Amount"), field_style(FormField::Amount)),
            Span::raw(format!("{}{}", form.amount, cursor(FormField::Amount))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {:<14}", "Category"), field_style(FormField::Category)),
            Span::raw(format!("◀ {} ▶", form.category_label())),
        ]),
    ];

    let title = match (form.kind, form.editing.is_some()) {
        (RecordKind::Expense, false) => " Add Expense ",
        (RecordKind::Expense, true) => " Edit Expense ",
        (RecordKind::Income, false) => " Add Income ",
        (RecordKind::Income, true) => " Edit Income ",
    };

    let popup = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title),
    );
    f.render_widget(popup, area);
}

/// Rectangle `percent_x` wide and `height` rows tall, centred in `area`
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn net_color(net: f64) -> Color {
    if net >= 0.0 {
        Color::Blue
    } else {
        Color::LightRed
    }
}

/// Thousands-separated, two decimals: 4300 -> "4,300.00"
pub fn format_amount(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, grouped, fraction)
}

pub fn format_money(value: f64) -> String {
    format!("{} {}", CURRENCY, format_amount(value))
}

/// One decimal place: 23.456 -> "23.5%"
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
